// regcomp.rs - Compiler
// Converts Node trees into bytecode (Inst arrays).
//
// Two passes walk the same tree: compile_length_tree computes the exact
// instruction count, compile_tree emits into a Program reserved to that
// size. Structure: operation management → quantifier compilation →
// alternation → tree compilation → entry points.

use tracing::trace;

use crate::regdef::*;
use crate::regint::*;
use crate::regparse::{re_get_parse_depth_limit, re_parse_tree};
use crate::regparse_types::*;

// ============================================================================
// Constants
// ============================================================================

// Every instruction is one slot in the insts array.
const SIZE_INC: usize = 1;

const OPSIZE_JUMP: usize = 1;
const OPSIZE_SPLIT: usize = 1;
const OPSIZE_SAVE: usize = 1;
const OPSIZE_MATCH: usize = 1;
const OPSIZE_EMPTY_CHECK_START: usize = 1;
const OPSIZE_EMPTY_CHECK_END: usize = 1;

// Save(0) + body + Save(1) + Match
const OPSIZE_PROGRAM_FRAME: usize = OPSIZE_SAVE * 2 + OPSIZE_MATCH;

// ============================================================================
// Operation management
// ============================================================================

#[inline]
fn add_op(reg: &mut Program, inst: Inst) -> InstAddr {
    reg.insts.push(inst);
    reg.insts.len() - 1
}

#[inline]
fn ops_curr_offset(reg: &Program) -> InstAddr {
    reg.insts.len()
}

#[inline]
fn empty_check_len(body: &Node) -> usize {
    if tree_min_len(body) == 0 {
        OPSIZE_EMPTY_CHECK_START + OPSIZE_EMPTY_CHECK_END
    } else {
        0
    }
}

// ============================================================================
// Utility functions
// ============================================================================

/// `a + b`, failing once the sum passes [`MAX_PROGRAM_SIZE`].
#[inline]
fn len_add(a: usize, b: usize) -> Result<usize, i32> {
    match a.checked_add(b) {
        Some(n) if n <= MAX_PROGRAM_SIZE => Ok(n),
        _ => Err(REERR_TOO_BIG_PROGRAM),
    }
}

/// `a * b`, failing once the product passes [`MAX_PROGRAM_SIZE`].
#[inline]
fn len_mul(a: usize, b: usize) -> Result<usize, i32> {
    match a.checked_mul(b) {
        Some(n) if n <= MAX_PROGRAM_SIZE => Ok(n),
        _ => Err(REERR_TOO_BIG_PROGRAM),
    }
}

// ============================================================================
// Quantifier compilation
// ============================================================================

/// `body*` (lower == 0) or the trailing `body+` of an unbounded repeat.
fn compile_length_infinite_loop(
    body: &Node,
    body_len: usize,
    at_least_once: bool,
) -> Result<usize, i32> {
    let ec = empty_check_len(body);
    let len = len_add(body_len, ec + OPSIZE_SPLIT)?;
    if at_least_once {
        Ok(len)
    } else {
        len_add(len, OPSIZE_JUMP)
    }
}

fn compile_length_quantifier_node(qn: &QuantNode) -> Result<usize, i32> {
    let body_len = compile_length_tree(&qn.body)?;
    let lower = qn.lower as usize;
    match qn.upper {
        None if lower == 0 => compile_length_infinite_loop(&qn.body, body_len, false),
        None => len_add(
            len_mul(lower - 1, body_len)?,
            compile_length_infinite_loop(&qn.body, body_len, true)?,
        ),
        Some(upper) => {
            let optional = upper as usize - lower;
            len_add(
                len_mul(lower, body_len)?,
                len_mul(optional, len_add(OPSIZE_SPLIT, body_len)?)?,
            )
        }
    }
}

fn compile_tree_n_times(node: &Node, n: usize, reg: &mut Program) -> Result<(), i32> {
    for _ in 0..n {
        compile_tree(node, reg)?;
    }
    Ok(())
}

fn compile_infinite_loop(
    body: &Node,
    body_len: usize,
    at_least_once: bool,
    reg: &mut Program,
) -> Result<(), i32> {
    let check_id = if tree_min_len(body) == 0 {
        let id = reg.num_empty_check;
        reg.num_empty_check += 1;
        Some(id)
    } else {
        None
    };
    let ec = empty_check_len(body);

    if at_least_once {
        // L: [ecs] body [ece] split L, next
        let top = ops_curr_offset(reg);
        if let Some(id) = check_id {
            add_op(reg, Inst::EmptyCheckStart(id));
        }
        compile_tree(body, reg)?;
        if let Some(id) = check_id {
            add_op(reg, Inst::EmptyCheckEnd(id));
        }
        let next = ops_curr_offset(reg) + OPSIZE_SPLIT;
        add_op(reg, Inst::Split(top, next));
    } else {
        // L: split L+1, out; [ecs] body [ece] jump L; out:
        let top = ops_curr_offset(reg);
        let out = top + OPSIZE_SPLIT + body_len + ec + OPSIZE_JUMP;
        add_op(reg, Inst::Split(top + SIZE_INC, out));
        if let Some(id) = check_id {
            add_op(reg, Inst::EmptyCheckStart(id));
        }
        compile_tree(body, reg)?;
        if let Some(id) = check_id {
            add_op(reg, Inst::EmptyCheckEnd(id));
        }
        add_op(reg, Inst::Jump(top));
    }
    Ok(())
}

fn compile_quantifier_node(qn: &QuantNode, reg: &mut Program) -> Result<(), i32> {
    let body_len = compile_length_tree(&qn.body)?;
    let lower = qn.lower as usize;
    match qn.upper {
        None if lower == 0 => compile_infinite_loop(&qn.body, body_len, false, reg),
        None => {
            compile_tree_n_times(&qn.body, lower - 1, reg)?;
            compile_infinite_loop(&qn.body, body_len, true, reg)
        }
        Some(upper) => {
            compile_tree_n_times(&qn.body, lower, reg)?;
            // Greedy optional copies all bail out to the same exit.
            let optional = upper as usize - lower;
            let out = ops_curr_offset(reg) + optional * (OPSIZE_SPLIT + body_len);
            for _ in 0..optional {
                let here = ops_curr_offset(reg);
                add_op(reg, Inst::Split(here + SIZE_INC, out));
                compile_tree(&qn.body, reg)?;
            }
            Ok(())
        }
    }
}

// ============================================================================
// Alternation
// ============================================================================

fn compile_length_alt_node(branches: &[Node]) -> Result<usize, i32> {
    let mut len = 0;
    for branch in branches {
        len = len_add(len, compile_length_tree(branch)?)?;
    }
    let glue = len_mul(branches.len().saturating_sub(1), OPSIZE_SPLIT + OPSIZE_JUMP)?;
    len_add(len, glue)
}

fn compile_alt_node(branches: &[Node], reg: &mut Program) -> Result<(), i32> {
    let out = ops_curr_offset(reg) + compile_length_alt_node(branches)?;
    let last = branches.len().saturating_sub(1);
    for (i, branch) in branches.iter().enumerate() {
        if i < last {
            // split body, next-branch; body; jump out
            let here = ops_curr_offset(reg);
            let next = here + OPSIZE_SPLIT + compile_length_tree(branch)? + OPSIZE_JUMP;
            add_op(reg, Inst::Split(here + SIZE_INC, next));
            compile_tree(branch, reg)?;
            add_op(reg, Inst::Jump(out));
        } else {
            compile_tree(branch, reg)?;
        }
    }
    Ok(())
}

// ============================================================================
// Main compilation passes
// ============================================================================

/// Pass 1: number of instructions `node` will emit. Fails with
/// `REERR_TOO_BIG_PROGRAM` once the count passes [`MAX_PROGRAM_SIZE`].
pub fn compile_length_tree(node: &Node) -> Result<usize, i32> {
    match node {
        Node::Empty => Ok(0),
        Node::Char(_) | Node::AnyChar | Node::CClass(_) | Node::Anchor(_) => Ok(SIZE_INC),
        Node::Bag(bag) => {
            let body = compile_length_tree(&bag.body)?;
            if bag.regnum.is_some() {
                len_add(body, OPSIZE_SAVE * 2)
            } else {
                Ok(body)
            }
        }
        Node::Quant(qn) => compile_length_quantifier_node(qn),
        Node::List(items) => {
            let mut len = 0;
            for item in items {
                len = len_add(len, compile_length_tree(item)?)?;
            }
            Ok(len)
        }
        Node::Alt(branches) => compile_length_alt_node(branches),
    }
}

/// Pass 2: append the instructions for `node` to `reg`.
pub fn compile_tree(node: &Node, reg: &mut Program) -> Result<(), i32> {
    match node {
        Node::Empty => {}
        Node::Char(c) => {
            add_op(reg, Inst::Char(*c));
        }
        Node::AnyChar => {
            add_op(reg, Inst::Any);
        }
        Node::CClass(cc) => {
            add_op(
                reg,
                Inst::Class {
                    ranges: cc.ranges.clone(),
                    negated: cc.not,
                },
            );
        }
        Node::Anchor(AnchorType::BeginBuf) => {
            add_op(reg, Inst::AnchorStart);
        }
        Node::Anchor(AnchorType::EndBuf) => {
            add_op(reg, Inst::AnchorEnd);
        }
        Node::Bag(bag) => match bag.regnum {
            Some(n) => {
                add_op(reg, Inst::Save(n * 2));
                compile_tree(&bag.body, reg)?;
                add_op(reg, Inst::Save(n * 2 + 1));
            }
            None => compile_tree(&bag.body, reg)?,
        },
        Node::Quant(qn) => compile_quantifier_node(qn, reg)?,
        Node::List(items) => {
            for item in items {
                compile_tree(item, reg)?;
            }
        }
        Node::Alt(branches) => compile_alt_node(branches, reg)?,
    }
    Ok(())
}

// ============================================================================
// Entry points
// ============================================================================

/// Sizing pass: the exact number of instructions `pattern` compiles to.
///
/// Patterns whose program would exceed [`MAX_PROGRAM_SIZE`] fail here with
/// `REERR_TOO_BIG_PROGRAM`, before anything is allocated.
pub fn re_sizecode(pattern: &[u8]) -> Result<usize, i32> {
    let mut env = ParseEnv::new(re_get_parse_depth_limit());
    let root = re_parse_tree(pattern, &mut env)?;
    len_add(compile_length_tree(&root)?, OPSIZE_PROGRAM_FRAME)
}

/// Emission pass into a program reserved with [`Program::with_capacity`]
/// using the value returned by [`re_sizecode`].
pub fn re_compilecode(pattern: &[u8], reg: &mut Program, size: usize) -> Result<(), i32> {
    let mut env = ParseEnv::new(re_get_parse_depth_limit());
    let root = re_parse_tree(pattern, &mut env)?;

    reg.insts.clear();
    reg.num_empty_check = 0;
    reg.sub = env.num_mem;

    add_op(reg, Inst::Save(0));
    compile_tree(&root, reg)?;
    add_op(reg, Inst::Save(1));
    add_op(reg, Inst::Match);

    if reg.len() != size {
        return Err(REERR_CODE_LENGTH_MISMATCH);
    }
    reg.set_optimize_info();
    Ok(())
}

/// Measure, allocate exactly, then fill.
pub fn re_compile(pattern: &[u8]) -> Result<Program, i32> {
    let size = re_sizecode(pattern)?;
    let mut reg = Program::with_capacity(size);
    re_compilecode(pattern, &mut reg, size)?;
    trace!(
        target: "ure::compile",
        insts = reg.len(),
        groups = reg.sub,
        "compiled pattern"
    );
    Ok(reg)
}
