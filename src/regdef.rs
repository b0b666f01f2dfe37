// regdef.rs - Public definitions
// Compile flags, error codes and limit defaults shared by every stage.

use bitflags::bitflags;

// === Compile Flags ===

bitflags! {
    /// Flags accepted by [`crate::api::compile`].
    ///
    /// Only diagnostic flags exist; none of them changes what a pattern matches.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CompileFlags: u32 {
        /// Dump the compiled program through `tracing` at debug level.
        const DEBUG = 0x1000;
    }
}

/// Numeric value of [`CompileFlags::DEBUG`], for hosts passing plain integers.
pub const RE_FLAG_DEBUG: u32 = 0x1000;

// === Limits ===

pub const DEFAULT_MATCH_STACK_LIMIT_SIZE: u32 = 1_000_000;
// Parsing, compiling and dropping a tree each recurse once per nesting
// level; this depth fits a 2 MiB thread stack in unoptimized builds.
pub const DEFAULT_PARSE_DEPTH_LIMIT: u32 = 256;
pub const MAX_REPEAT_NUM: u32 = 1000;
// Instructions per compiled program, frame included.
pub const MAX_PROGRAM_SIZE: usize = 1_000_000;
pub const MAX_CAPTURE_NUM: usize = 32767;

// === Result Codes ===

// internal error
pub const REERR_CODE_LENGTH_MISMATCH: i32 = -14;
pub const REERR_MATCH_STACK_LIMIT_OVER: i32 = -15;
pub const REERR_PARSE_DEPTH_LIMIT_OVER: i32 = -16;

// general error
pub const REERR_NO_SUCH_GROUP: i32 = -31;
pub const REERR_NOT_IMPLEMENTED: i32 = -32;

// syntax error
pub const REERR_END_PATTERN_AT_LEFT_BRACKET: i32 = -101;
pub const REERR_PREMATURE_END_OF_CHAR_CLASS: i32 = -103;
pub const REERR_END_PATTERN_AT_ESCAPE: i32 = -104;
pub const REERR_CHAR_CLASS_VALUE_AT_END_OF_RANGE: i32 = -110;
pub const REERR_CHAR_CLASS_VALUE_AT_START_OF_RANGE: i32 = -111;
pub const REERR_TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED: i32 = -113;
pub const REERR_TARGET_OF_REPEAT_OPERATOR_INVALID: i32 = -114;
pub const REERR_NESTED_REPEAT_OPERATOR: i32 = -115;
pub const REERR_UNMATCHED_CLOSE_PARENTHESIS: i32 = -116;
pub const REERR_END_PATTERN_WITH_UNMATCHED_PARENTHESIS: i32 = -117;
pub const REERR_END_PATTERN_IN_GROUP: i32 = -118;
pub const REERR_UNDEFINED_GROUP_OPTION: i32 = -119;

// values error (syntax error)
pub const REERR_TOO_BIG_NUMBER_FOR_REPEAT_RANGE: i32 = -201;
pub const REERR_UPPER_SMALLER_THAN_LOWER_IN_REPEAT_RANGE: i32 = -202;
pub const REERR_EMPTY_RANGE_IN_CHAR_CLASS: i32 = -203;
pub const REERR_TOO_MANY_CAPTURES: i32 = -210;
pub const REERR_TOO_BIG_PROGRAM: i32 = -211;

/// Whether `code` belongs to the pattern-syntax range.
#[inline]
pub fn re_is_pattern_error(code: i32) -> bool {
    (-999..=-100).contains(&code)
}
