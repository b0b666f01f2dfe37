// regparse_types.rs - Parser types
// Syntax tree nodes produced by regparse and consumed by regcomp.

use crate::regint::ClassRanges;

// === Anchor Types ===
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorType {
    BeginBuf,
    EndBuf,
}

// === Quantifier bounds ===
pub const REPEAT_INFINITE: Option<u32> = None;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuantNode {
    pub body: Box<Node>,
    pub lower: u32,
    /// `None` for an unbounded upper limit.
    pub upper: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CClassNode {
    /// Normalized (sorted, coalesced) ranges.
    pub ranges: ClassRanges,
    pub not: bool,
}

/// A parenthesized subexpression. `regnum` is `None` for `(?:...)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BagNode {
    pub regnum: Option<usize>,
    pub body: Box<Node>,
}

// === Node ===
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Matches the empty string (empty pattern, empty branch, `()`).
    Empty,
    Char(u8),
    AnyChar,
    CClass(CClassNode),
    Anchor(AnchorType),
    Quant(QuantNode),
    Bag(BagNode),
    /// Concatenation.
    List(Vec<Node>),
    /// Alternation, first branch has priority.
    Alt(Vec<Node>),
}

impl Node {
    /// Whether a quantifier may be applied to this node.
    pub fn is_quantifiable(&self) -> bool {
        !matches!(self, Node::Anchor(_) | Node::Quant(_))
    }
}

/// Minimum number of subject bytes `node` can consume.
pub fn tree_min_len(node: &Node) -> u32 {
    match node {
        Node::Empty | Node::Anchor(_) => 0,
        Node::Char(_) | Node::AnyChar | Node::CClass(_) => 1,
        Node::Bag(bag) => tree_min_len(&bag.body),
        Node::Quant(qn) => tree_min_len(&qn.body).saturating_mul(qn.lower),
        Node::List(items) => items
            .iter()
            .fold(0u32, |acc, n| acc.saturating_add(tree_min_len(n))),
        Node::Alt(branches) => branches.iter().map(tree_min_len).min().unwrap_or(0),
    }
}

// === ParseEnv ===
pub struct ParseEnv {
    /// Capturing groups allocated so far.
    pub num_mem: usize,
    pub parse_depth: u32,
    pub parse_depth_limit: u32,
}

impl ParseEnv {
    pub fn new(parse_depth_limit: u32) -> Self {
        ParseEnv {
            num_mem: 0,
            parse_depth: 0,
            parse_depth_limit,
        }
    }
}
