// error.rs - Idiomatic Rust error types.
//
// Groups the internal i32 error codes into semantic variants while
// keeping the numeric code available through `code()`.

use std::fmt;

use crate::regdef::*;
use crate::regerror::re_error_code_to_format;

/// Error type for pattern compilation, matching and substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexError {
    /// Malformed pattern.
    Syntax { code: i32, message: String },
    /// Groups nested deeper than the parse depth limit.
    ParseDepthLimitOver,
    /// Group number outside `0..group_count`.
    NoSuchGroup(usize),
    /// Operation deliberately unsupported for this pattern.
    NotImplemented(&'static str),
    /// Backtrack stack budget exhausted; the pattern stays usable.
    MatchStackLimitOver,
    /// Internal engine bug (should not occur in correct usage).
    InternalBug { code: i32, message: String },
    /// Other error not covered by specific variants.
    Other(i32),
}

impl fmt::Display for RegexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegexError::Syntax { message, .. } => write!(f, "invalid pattern: {}", message),
            RegexError::ParseDepthLimitOver => write!(f, "parse depth limit over"),
            RegexError::NoSuchGroup(n) => write!(f, "no such group: {}", n),
            RegexError::NotImplemented(what) => write!(f, "not implemented: {}", what),
            RegexError::MatchStackLimitOver => write!(f, "match-stack limit over"),
            RegexError::InternalBug { message, .. } => write!(f, "internal error: {}", message),
            RegexError::Other(code) => write!(f, "error code {}", code),
        }
    }
}

impl std::error::Error for RegexError {}

impl From<i32> for RegexError {
    fn from(code: i32) -> Self {
        match code {
            REERR_MATCH_STACK_LIMIT_OVER => RegexError::MatchStackLimitOver,
            REERR_PARSE_DEPTH_LIMIT_OVER => RegexError::ParseDepthLimitOver,

            // Internal bugs
            REERR_CODE_LENGTH_MISMATCH => RegexError::InternalBug {
                code,
                message: re_error_code_to_format(code).to_string(),
            },

            // Syntax / pattern errors (range -100..-999)
            c if re_is_pattern_error(c) => RegexError::Syntax {
                code: c,
                message: re_error_code_to_format(c).to_string(),
            },

            _ => RegexError::Other(code),
        }
    }
}

impl RegexError {
    /// Returns the numeric error code.
    pub fn code(&self) -> i32 {
        match self {
            RegexError::Syntax { code, .. } => *code,
            RegexError::ParseDepthLimitOver => REERR_PARSE_DEPTH_LIMIT_OVER,
            RegexError::NoSuchGroup(_) => REERR_NO_SUCH_GROUP,
            RegexError::NotImplemented(_) => REERR_NOT_IMPLEMENTED,
            RegexError::MatchStackLimitOver => REERR_MATCH_STACK_LIMIT_OVER,
            RegexError::InternalBug { code, .. } => *code,
            RegexError::Other(code) => *code,
        }
    }

    /// Whether this error came from compiling a malformed pattern.
    pub fn is_compile_error(&self) -> bool {
        matches!(self, RegexError::Syntax { .. } | RegexError::ParseDepthLimitOver)
    }
}
