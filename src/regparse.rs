// regparse.rs - Pattern parser
// Converts a regex pattern (byte string) into a Node tree.
//
// Recursive descent: alternation → branch (concatenation) → quantified atom
// → atom. Group nesting is bounded by the parse depth limit.

use std::sync::atomic::{AtomicU32, Ordering};

use smallvec::SmallVec;

use crate::regdef::*;
use crate::regint::*;
use crate::regparse_types::*;

// ============================================================================
// Global State
// ============================================================================

static PARSE_DEPTH_LIMIT: AtomicU32 = AtomicU32::new(DEFAULT_PARSE_DEPTH_LIMIT);

pub fn re_get_parse_depth_limit() -> u32 {
    PARSE_DEPTH_LIMIT.load(Ordering::Relaxed)
}

/// Set the maximum group nesting depth. `0` restores the default.
pub fn re_set_parse_depth_limit(depth: u32) {
    if depth == 0 {
        PARSE_DEPTH_LIMIT.store(DEFAULT_PARSE_DEPTH_LIMIT, Ordering::Relaxed);
    } else {
        PARSE_DEPTH_LIMIT.store(depth, Ordering::Relaxed);
    }
}

// ============================================================================
// Escapes
// ============================================================================

/// A class member: either one byte or a shorthand set (`\d`, `\W`, ...).
enum ClassValue {
    Byte(u8),
    Set(&'static [ByteRange], bool),
}

fn shorthand_class(c: u8) -> Option<(&'static [ByteRange], bool)> {
    match c {
        b'd' => Some((DIGIT_RANGES, false)),
        b'D' => Some((DIGIT_RANGES, true)),
        b's' => Some((SPACE_RANGES, false)),
        b'S' => Some((SPACE_RANGES, true)),
        b'w' => Some((WORD_RANGES, false)),
        b'W' => Some((WORD_RANGES, true)),
        _ => None,
    }
}

fn conv_backslash_value(c: u8) -> u8 {
    match c {
        b'n' => b'\n',
        b't' => b'\t',
        b'r' => b'\r',
        b'f' => 0x0c,
        b'v' => 0x0b,
        b'a' => 0x07,
        _ => c,
    }
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'a> {
    pattern: &'a [u8],
    p: usize,
    env: &'a mut ParseEnv,
}

impl<'a> Parser<'a> {
    #[inline]
    fn peek(&self) -> Option<u8> {
        self.pattern.get(self.p).copied()
    }

    #[inline]
    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.pattern.get(self.p + offset).copied()
    }

    fn prs_alts(&mut self) -> Result<Node, i32> {
        let mut branches = vec![self.prs_branch()?];
        while self.peek() == Some(b'|') {
            self.p += 1;
            branches.push(self.prs_branch()?);
        }
        if branches.len() == 1 {
            Ok(branches.pop().unwrap_or(Node::Empty))
        } else {
            Ok(Node::Alt(branches))
        }
    }

    fn prs_branch(&mut self) -> Result<Node, i32> {
        let mut items = Vec::new();
        while let Some(c) = self.peek() {
            if c == b'|' || c == b')' {
                break;
            }
            let atom = self.prs_atom()?;
            items.push(self.prs_quantifiers(atom)?);
        }
        Ok(match items.len() {
            0 => Node::Empty,
            1 => items.pop().unwrap_or(Node::Empty),
            _ => Node::List(items),
        })
    }

    fn prs_atom(&mut self) -> Result<Node, i32> {
        let c = self.pattern[self.p];
        self.p += 1;
        match c {
            b'(' => self.prs_bag(),
            b'[' => self.prs_cclass(),
            b'.' => Ok(Node::AnyChar),
            b'^' => Ok(Node::Anchor(AnchorType::BeginBuf)),
            b'$' => Ok(Node::Anchor(AnchorType::EndBuf)),
            b'*' | b'+' | b'?' => Err(REERR_TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED),
            b'{' => {
                if fetch_interval(self.pattern, self.p - 1)?.is_some() {
                    Err(REERR_TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED)
                } else {
                    Ok(Node::Char(b'{'))
                }
            }
            b'\\' => self.prs_escape(),
            _ => Ok(Node::Char(c)),
        }
    }

    fn prs_escape(&mut self) -> Result<Node, i32> {
        let c = self.peek().ok_or(REERR_END_PATTERN_AT_ESCAPE)?;
        self.p += 1;
        if let Some((ranges, not)) = shorthand_class(c) {
            return Ok(Node::CClass(CClassNode {
                ranges: SmallVec::from_slice(ranges),
                not,
            }));
        }
        Ok(Node::Char(conv_backslash_value(c)))
    }

    fn prs_bag(&mut self) -> Result<Node, i32> {
        let regnum = if self.peek() == Some(b'?') {
            match self.peek_at(1) {
                Some(b':') => {
                    self.p += 2;
                    None
                }
                None => return Err(REERR_END_PATTERN_IN_GROUP),
                Some(_) => return Err(REERR_UNDEFINED_GROUP_OPTION),
            }
        } else {
            self.env.num_mem += 1;
            if self.env.num_mem > MAX_CAPTURE_NUM {
                return Err(REERR_TOO_MANY_CAPTURES);
            }
            Some(self.env.num_mem)
        };

        self.env.parse_depth += 1;
        if self.env.parse_depth > self.env.parse_depth_limit {
            return Err(REERR_PARSE_DEPTH_LIMIT_OVER);
        }
        let body = self.prs_alts()?;
        self.env.parse_depth -= 1;

        if self.peek() != Some(b')') {
            return Err(REERR_END_PATTERN_WITH_UNMATCHED_PARENTHESIS);
        }
        self.p += 1;
        Ok(Node::Bag(BagNode {
            regnum,
            body: Box::new(body),
        }))
    }

    fn prs_quantifiers(&mut self, atom: Node) -> Result<Node, i32> {
        let mut node = atom;
        let mut quantified = false;
        loop {
            let (lower, upper, next_p) = match self.peek() {
                Some(b'*') => (0, REPEAT_INFINITE, self.p + 1),
                Some(b'+') => (1, REPEAT_INFINITE, self.p + 1),
                Some(b'?') => (0, Some(1), self.p + 1),
                Some(b'{') => match fetch_interval(self.pattern, self.p)? {
                    Some(interval) => interval,
                    None => break,
                },
                _ => break,
            };
            if quantified {
                return Err(REERR_NESTED_REPEAT_OPERATOR);
            }
            if !node.is_quantifiable() {
                return Err(REERR_TARGET_OF_REPEAT_OPERATOR_INVALID);
            }
            self.p = next_p;
            node = Node::Quant(QuantNode {
                body: Box::new(node),
                lower,
                upper,
            });
            quantified = true;
        }
        Ok(node)
    }

    fn fetch_class_value(&mut self) -> Result<ClassValue, i32> {
        let c = self.pattern[self.p];
        self.p += 1;
        if c != b'\\' {
            return Ok(ClassValue::Byte(c));
        }
        let e = self.peek().ok_or(REERR_END_PATTERN_AT_ESCAPE)?;
        self.p += 1;
        Ok(match shorthand_class(e) {
            Some((ranges, not)) => ClassValue::Set(ranges, not),
            None => ClassValue::Byte(conv_backslash_value(e)),
        })
    }

    fn prs_cclass(&mut self) -> Result<Node, i32> {
        let not = if self.peek() == Some(b'^') {
            self.p += 1;
            true
        } else {
            false
        };
        if self.peek().is_none() {
            return Err(REERR_END_PATTERN_AT_LEFT_BRACKET);
        }

        let mut ranges = ClassRanges::new();
        let mut first = true;
        loop {
            let c = self.peek().ok_or(REERR_PREMATURE_END_OF_CHAR_CLASS)?;
            // A leading ']' is a literal member.
            if c == b']' && !first {
                self.p += 1;
                break;
            }
            first = false;

            let is_range = |parser: &Self| {
                parser.peek() == Some(b'-')
                    && parser.peek_at(1).is_some_and(|n| n != b']')
            };

            match self.fetch_class_value()? {
                ClassValue::Set(set, negated) => {
                    if is_range(self) {
                        return Err(REERR_CHAR_CLASS_VALUE_AT_START_OF_RANGE);
                    }
                    if negated {
                        ranges.extend(invert_ranges(set));
                    } else {
                        ranges.extend_from_slice(set);
                    }
                }
                ClassValue::Byte(lo) => {
                    if is_range(self) {
                        self.p += 1;
                        match self.fetch_class_value()? {
                            ClassValue::Set(..) => {
                                return Err(REERR_CHAR_CLASS_VALUE_AT_END_OF_RANGE)
                            }
                            ClassValue::Byte(hi) => {
                                if hi < lo {
                                    return Err(REERR_EMPTY_RANGE_IN_CHAR_CLASS);
                                }
                                ranges.push((lo, hi));
                            }
                        }
                    } else {
                        ranges.push((lo, lo));
                    }
                }
            }
        }

        normalize_ranges(&mut ranges);
        Ok(Node::CClass(CClassNode { ranges, not }))
    }
}

/// Try to read `{m}`, `{m,}`, `{,n}` or `{m,n}` starting at the `{` at `start`.
/// Returns `Ok(None)` when the text is not an interval (the brace is literal).
fn fetch_interval(pattern: &[u8], start: usize) -> Result<Option<(u32, Option<u32>, usize)>, i32> {
    fn scan_number(pattern: &[u8], p: &mut usize) -> Option<u64> {
        let begin = *p;
        let mut n: u64 = 0;
        while let Some(c) = pattern.get(*p).filter(|c| c.is_ascii_digit()) {
            n = (n * 10 + (c - b'0') as u64).min(u32::MAX as u64);
            *p += 1;
        }
        if *p == begin {
            None
        } else {
            Some(n)
        }
    }

    let mut p = start + 1;
    let lower = scan_number(pattern, &mut p);
    let upper = if pattern.get(p) == Some(&b',') {
        p += 1;
        let upper = scan_number(pattern, &mut p);
        if lower.is_none() && upper.is_none() {
            return Ok(None);
        }
        upper
    } else {
        match lower {
            Some(n) => Some(n),
            None => return Ok(None),
        }
    };
    if pattern.get(p) != Some(&b'}') {
        return Ok(None);
    }
    p += 1;

    let lower = lower.unwrap_or(0);
    let limit = MAX_REPEAT_NUM as u64;
    if lower > limit || upper.is_some_and(|u| u > limit) {
        return Err(REERR_TOO_BIG_NUMBER_FOR_REPEAT_RANGE);
    }
    if upper.is_some_and(|u| u < lower) {
        return Err(REERR_UPPER_SMALLER_THAN_LOWER_IN_REPEAT_RANGE);
    }
    Ok(Some((lower as u32, upper.map(|u| u as u32), p)))
}

// ============================================================================
// Entry point
// ============================================================================

/// Parse `pattern` into a syntax tree, counting capture groups into `env`.
pub fn re_parse_tree(pattern: &[u8], env: &mut ParseEnv) -> Result<Node, i32> {
    let mut parser = Parser { pattern, p: 0, env };
    let root = parser.prs_alts()?;
    if parser.p < pattern.len() {
        // prs_alts only stops early at an unbalanced ')'.
        return Err(REERR_UNMATCHED_CLOSE_PARENTHESIS);
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn parse(pattern: &[u8]) -> Result<(Node, usize), i32> {
        let mut env = ParseEnv::new(DEFAULT_PARSE_DEPTH_LIMIT);
        let node = re_parse_tree(pattern, &mut env)?;
        Ok((node, env.num_mem))
    }

    #[test]
    fn parse_literal_list() {
        let (node, n) = parse(b"ab").unwrap();
        assert_eq!(node, Node::List(vec![Node::Char(b'a'), Node::Char(b'b')]));
        assert_eq!(n, 0);
    }

    #[test]
    fn parse_empty_pattern_and_branches() {
        assert_eq!(parse(b"").unwrap().0, Node::Empty);
        assert_eq!(
            parse(b"a|").unwrap().0,
            Node::Alt(vec![Node::Char(b'a'), Node::Empty])
        );
    }

    #[test]
    fn parse_groups_numbered_by_open_paren() {
        let (node, n) = parse(b"((a)(?:b))").unwrap();
        assert_eq!(n, 2);
        let Node::Bag(outer) = node else { panic!("expected bag") };
        assert_eq!(outer.regnum, Some(1));
        let Node::List(items) = *outer.body else { panic!("expected list") };
        assert!(matches!(&items[0], Node::Bag(BagNode { regnum: Some(2), .. })));
        assert!(matches!(&items[1], Node::Bag(BagNode { regnum: None, .. })));
    }

    #[test]
    fn parse_quantifiers() {
        let (node, _) = parse(b"a{2,5}").unwrap();
        assert_eq!(
            node,
            Node::Quant(QuantNode { body: Box::new(Node::Char(b'a')), lower: 2, upper: Some(5) })
        );
        let (node, _) = parse(b"a{,3}").unwrap();
        assert!(matches!(node, Node::Quant(QuantNode { lower: 0, upper: Some(3), .. })));
        let (node, _) = parse(b"a{4,}").unwrap();
        assert!(matches!(node, Node::Quant(QuantNode { lower: 4, upper: None, .. })));
    }

    #[test]
    fn parse_literal_braces() {
        let (node, _) = parse(b"a{x}").unwrap();
        assert_eq!(
            node,
            Node::List(vec![Node::Char(b'a'), Node::Char(b'{'), Node::Char(b'x'), Node::Char(b'}')])
        );
        let (node, _) = parse(b"{").unwrap();
        assert_eq!(node, Node::Char(b'{'));
    }

    #[test]
    fn parse_class_ranges_and_shorthands() {
        let (node, _) = parse(br"[a-c\d_]").unwrap();
        let expected: ClassRanges = smallvec![(b'0', b'9'), (b'_', b'_'), (b'a', b'c')];
        assert_eq!(node, Node::CClass(CClassNode { ranges: expected, not: false }));

        let (node, _) = parse(b"[^]a-]").unwrap();
        let expected: ClassRanges = smallvec![(b'-', b'-'), (b']', b']'), (b'a', b'a')];
        assert_eq!(node, Node::CClass(CClassNode { ranges: expected, not: true }));
    }

    #[test]
    fn parse_escapes() {
        assert_eq!(parse(br"\n").unwrap().0, Node::Char(b'\n'));
        assert_eq!(parse(br"\.").unwrap().0, Node::Char(b'.'));
        assert!(matches!(parse(br"\W").unwrap().0, Node::CClass(CClassNode { not: true, .. })));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(parse(b"(a").unwrap_err(), REERR_END_PATTERN_WITH_UNMATCHED_PARENTHESIS);
        assert_eq!(parse(b"a)").unwrap_err(), REERR_UNMATCHED_CLOSE_PARENTHESIS);
        assert_eq!(parse(b"*a").unwrap_err(), REERR_TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED);
        assert_eq!(parse(b"a|+").unwrap_err(), REERR_TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED);
        assert_eq!(parse(b"a**").unwrap_err(), REERR_NESTED_REPEAT_OPERATOR);
        assert_eq!(parse(b"^*").unwrap_err(), REERR_TARGET_OF_REPEAT_OPERATOR_INVALID);
        assert_eq!(parse(b"[").unwrap_err(), REERR_END_PATTERN_AT_LEFT_BRACKET);
        assert_eq!(parse(b"[ab").unwrap_err(), REERR_PREMATURE_END_OF_CHAR_CLASS);
        assert_eq!(parse(b"[z-a]").unwrap_err(), REERR_EMPTY_RANGE_IN_CHAR_CLASS);
        assert_eq!(parse(br"[\d-z]").unwrap_err(), REERR_CHAR_CLASS_VALUE_AT_START_OF_RANGE);
        assert_eq!(parse(br"[a-\d]").unwrap_err(), REERR_CHAR_CLASS_VALUE_AT_END_OF_RANGE);
        assert_eq!(parse(b"a\\").unwrap_err(), REERR_END_PATTERN_AT_ESCAPE);
        assert_eq!(parse(b"(?=a)").unwrap_err(), REERR_UNDEFINED_GROUP_OPTION);
        assert_eq!(parse(b"(?").unwrap_err(), REERR_END_PATTERN_IN_GROUP);
        assert_eq!(parse(b"a{3,2}").unwrap_err(), REERR_UPPER_SMALLER_THAN_LOWER_IN_REPEAT_RANGE);
        assert_eq!(parse(b"a{1001}").unwrap_err(), REERR_TOO_BIG_NUMBER_FOR_REPEAT_RANGE);
    }

    #[test]
    fn parse_depth_limit() {
        let mut env = ParseEnv::new(3);
        assert!(re_parse_tree(b"(((a)))", &mut env).is_ok());
        let mut env = ParseEnv::new(3);
        assert_eq!(re_parse_tree(b"((((a))))", &mut env).unwrap_err(), REERR_PARSE_DEPTH_LIMIT_OVER);
    }
}
