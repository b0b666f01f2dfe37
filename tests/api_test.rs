// api_test.rs - Integration tests for the idiomatic Rust API.

use ure::api::{self, Pattern, PatternBuilder};
use ure::error::RegexError;
use ure::prelude::*;
use ure::regdef::*;

// === Pattern::new ===

#[test]
fn simple_pattern() {
    let re = Pattern::new(r"\d+").unwrap();
    let m = re.search("abc 123 def").unwrap().unwrap();
    assert_eq!(m.as_str(), "123");
}

#[test]
fn byte_pattern_and_subject() {
    let re = Pattern::new_bytes(b"\xff+").unwrap();
    let m = re.search(&b"a\xff\xffb"[..]).unwrap().unwrap();
    assert_eq!(m.span(0).unwrap(), (1, 3));
    assert_eq!(m.as_bytes(), b"\xff\xff");
}

#[test]
fn no_match_returns_none() {
    let re = Pattern::new(r"xyz").unwrap();
    assert!(re.search("abc").unwrap().is_none());
    assert!(!re.is_match("abc").unwrap());
}

#[test]
fn empty_pattern() {
    let re = Pattern::new(r"").unwrap();
    let m = re.search("hello").unwrap().unwrap();
    assert_eq!(m.start(0).unwrap(), 0);
    assert_eq!(m.end(0).unwrap(), 0);
    assert_eq!(m.group(0).unwrap(), Some(&b""[..]));
}

#[test]
fn invalid_pattern_syntax_error() {
    let err = Pattern::new(r"(unclosed").unwrap_err();
    match err {
        RegexError::Syntax { code, .. } => {
            assert_eq!(code, REERR_END_PATTERN_WITH_UNMATCHED_PARENTHESIS)
        }
        other => panic!("expected Syntax error, got {:?}", other),
    }
}

#[test]
fn invalid_pattern_empty_char_class() {
    let err = Pattern::new(r"[]").unwrap_err();
    assert!(matches!(err, RegexError::Syntax { .. }));
}

#[test]
fn invalid_patterns_never_compile() {
    for pat in ["a)", "*", "a**", "[b-a]", "x{2,1}", "(?<n>a)", "\\"] {
        let err = Pattern::new(pat).unwrap_err();
        assert!(err.is_compile_error(), "{pat:?} gave {err:?}");
    }
}

#[test]
fn oversized_program_is_a_syntax_error() {
    let pattern = format!("{}a{}", "(?:".repeat(7), "){1000}".repeat(7));
    let err = Pattern::new(&pattern).unwrap_err();
    match err {
        RegexError::Syntax { code, ref message } => {
            assert_eq!(code, REERR_TOO_BIG_PROGRAM);
            assert_eq!(message, "too big compiled program");
        }
        other => panic!("expected Syntax error, got {:?}", other),
    }
    assert!(err.is_compile_error());
}

#[test]
fn too_many_captures() {
    let err = Pattern::new(&"()".repeat(MAX_CAPTURE_NUM + 1)).unwrap_err();
    assert!(
        matches!(err, RegexError::Syntax { code, .. } if code == REERR_TOO_MANY_CAPTURES),
        "{err:?}"
    );
}

#[test]
fn nesting_past_default_depth() {
    let depth = DEFAULT_PARSE_DEPTH_LIMIT as usize;
    let deep = format!("{}a{}", "(".repeat(depth + 1), ")".repeat(depth + 1));
    let err = Pattern::new(&deep).unwrap_err();
    assert_eq!(err, RegexError::ParseDepthLimitOver);
    assert_eq!(err.code(), REERR_PARSE_DEPTH_LIMIT_OVER);
    assert!(err.is_compile_error());
}

// === Grammar ===

#[test]
fn alternation_prefers_left_branch() {
    let re = Pattern::new("ab|a").unwrap();
    assert_eq!(re.search("ab").unwrap().unwrap().as_str(), "ab");
    let re = Pattern::new("a|ab").unwrap();
    assert_eq!(re.search("ab").unwrap().unwrap().as_str(), "a");
}

#[test]
fn quantifiers() {
    let re = Pattern::new("ba+c?d*").unwrap();
    assert_eq!(re.search("xbaaacdd!").unwrap().unwrap().as_str(), "baaacdd");
    let re = Pattern::new("a{2,3}").unwrap();
    assert_eq!(re.search("aaaa").unwrap().unwrap().as_str(), "aaa");
    let re = Pattern::new("a{,2}b").unwrap();
    assert_eq!(re.search("aaab").unwrap().unwrap().as_str(), "aab");
}

#[test]
fn literal_brace() {
    let re = Pattern::new("a{x").unwrap();
    assert!(re.is_match("a{x").unwrap());
}

#[test]
fn classes() {
    let re = Pattern::new(r"[a-c\d]+").unwrap();
    assert_eq!(re.search("zzb2a9q").unwrap().unwrap().as_str(), "b2a9");
    let re = Pattern::new(r"[^\s]+").unwrap();
    assert_eq!(re.search("  word  ").unwrap().unwrap().as_str(), "word");
    let re = Pattern::new(r"\w+\W").unwrap();
    assert_eq!(re.search("__x9!").unwrap().unwrap().as_str(), "__x9!");
    let re = Pattern::new(r"[]a]+").unwrap();
    assert_eq!(re.search("x]a]").unwrap().unwrap().as_str(), "]a]");
}

#[test]
fn dot_matches_newline() {
    let re = Pattern::new("a.b").unwrap();
    assert!(re.is_match("a\nb").unwrap());
}

#[test]
fn escapes() {
    let re = Pattern::new(r"\t\.\n").unwrap();
    assert!(re.is_match("x\t.\n").unwrap());
    assert!(!re.is_match("x\tx\n").unwrap());
}

#[test]
fn anchors() {
    let re = Pattern::new("^ab$").unwrap();
    assert!(re.is_match("ab").unwrap());
    assert!(!re.is_match("xab").unwrap());
    assert!(!re.is_match("abx").unwrap());
}

#[test]
fn nested_groups_numbered_by_open_paren() {
    let re = Pattern::new("((a)(?:b)(c))").unwrap();
    assert_eq!(re.group_count(), 4);
    let m = re.search("abc").unwrap().unwrap();
    assert_eq!(
        m.groups(),
        vec![Some(&b"abc"[..]), Some(&b"a"[..]), Some(&b"c"[..])]
    );
}

#[test]
fn repeated_group_keeps_last_iteration() {
    let re = Pattern::new("(ab|cd)+").unwrap();
    let m = re.search("abcdab!").unwrap().unwrap();
    assert_eq!(m.span(0).unwrap(), (0, 6));
    assert_eq!(m.span(1).unwrap(), (4, 6));
}

// === match / search windows ===

#[test]
fn match_vs_search() {
    let re = Pattern::new(r"\d").unwrap();
    assert!(re.match_at_start("a1").unwrap().is_none());
    assert!(re.search("a1").unwrap().is_some());
    assert!(re.match_within("a1", 1, None).unwrap().is_some());
}

#[test]
fn search_window() {
    let re = Pattern::new("o").unwrap();
    let m = re.search_within("foo boo", 3, None).unwrap().unwrap();
    assert_eq!(m.span(0).unwrap(), (5, 6));
    assert!(re.search_within("foo boo", 3, Some(5)).unwrap().is_none());
}

#[test]
fn empty_window_never_matches() {
    let re = Pattern::new("").unwrap();
    assert!(re.search_within("abc", 1, Some(1)).unwrap().is_none());
    assert!(re.match_within("abc", 4, None).unwrap().is_none());
    assert!(re.match_within("abc", 3, None).unwrap().is_some());
}

// === Match accessors ===

#[test]
fn match_accessors_share_validation() {
    let re = Pattern::new("(a)(x)?").unwrap();
    let m = re.search("a").unwrap().unwrap();
    assert_eq!(m.group_count(), 3);
    assert_eq!(m.group(2).unwrap(), None);
    assert_eq!(m.span(2).unwrap(), (-1, -1));
    for err in [
        m.group(3).map(|_| ()),
        m.span(3).map(|_| ()),
        m.start(3).map(|_| ()),
        m.end(3).map(|_| ()),
    ] {
        assert_eq!(err, Err(RegexError::NoSuchGroup(3)));
    }
}

#[test]
fn match_outlives_pattern() {
    let subject = String::from("key=value");
    let m = {
        let re = Pattern::new("=(.*)").unwrap();
        re.search(&subject).unwrap().unwrap()
    };
    assert_eq!(m.group(1).unwrap(), Some(&b"value"[..]));
    assert_eq!(m.to_string(), "<match num=2>");
}

// === PatternBuilder ===

#[test]
fn builder_flags() {
    let re = PatternBuilder::new("a")
        .flags(CompileFlags::from_bits_truncate(RE_FLAG_DEBUG | 0x1))
        .build()
        .unwrap();
    assert!(re.is_match("a").unwrap());
    assert!(re.dump().contains("char 'a'"));
}

#[test]
fn builder_stack_limit() {
    let re = Pattern::builder("(a|b)*c").match_stack_limit(16).build().unwrap();
    assert_eq!(re.match_stack_limit(), 16);
    let long = "ab".repeat(100);
    let err = re.search(&long).unwrap_err();
    assert_eq!(err, RegexError::MatchStackLimitOver);
    assert_eq!(err.code(), REERR_MATCH_STACK_LIMIT_OVER);

    let re = Pattern::builder("(a|b)*c").match_stack_limit(0).build().unwrap();
    assert!(!re.is_match(&long).unwrap());
}

#[test]
fn nullable_loop_terminates() {
    let re = Pattern::new("(a*)*b").unwrap();
    assert!(re.search("aaaa").unwrap().is_none());
    let m = re.search("aab").unwrap().unwrap();
    assert_eq!(m.span(0).unwrap(), (0, 3));
}

// === Module-level functions ===

#[test]
fn module_functions_share_engine() {
    let m = api::search(r"(\d+)-(\d+)", "id 12-34 end").unwrap().unwrap();
    assert_eq!(m.span(0).unwrap(), (3, 8));
    assert!(api::match_at_start("id", "id 12").unwrap().is_some());
    assert_eq!(
        api::split(r"\s+", "a  b c", 0).unwrap(),
        vec![&b"a"[..], b"b", b"c"]
    );
    assert_eq!(&*api::sub(r"(\w)(\w)", r"\2\1", "abcd", 1).unwrap(), b"bacd");
}

#[test]
fn compile_with_debug_flag() {
    let re = api::compile("x|y", CompileFlags::DEBUG).unwrap();
    let dump = re.dump();
    assert!(dump.contains("split"));
    assert!(dump.ends_with("groups: 0"));
    assert_eq!(re.as_bytes(), b"x|y");
}
