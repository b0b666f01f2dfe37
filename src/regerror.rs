// regerror.rs - Error messages
// Maps error codes to human-readable messages.

use crate::regdef::*;

/// Message for an error code.
pub fn re_error_code_to_format(code: i32) -> &'static str {
    match code {
        REERR_CODE_LENGTH_MISMATCH => "emitted code length differs from computed size (bug)",
        REERR_MATCH_STACK_LIMIT_OVER => "match-stack limit over",
        REERR_PARSE_DEPTH_LIMIT_OVER => "parse depth limit over",
        REERR_NO_SUCH_GROUP => "no such group",
        REERR_NOT_IMPLEMENTED => "not implemented",
        REERR_END_PATTERN_AT_LEFT_BRACKET => "end pattern at left bracket",
        REERR_PREMATURE_END_OF_CHAR_CLASS => "premature end of char-class",
        REERR_END_PATTERN_AT_ESCAPE => "end pattern at escape",
        REERR_CHAR_CLASS_VALUE_AT_END_OF_RANGE => "char-class value at end of range",
        REERR_CHAR_CLASS_VALUE_AT_START_OF_RANGE => "char-class value at start of range",
        REERR_TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED => {
            "target of repeat operator is not specified"
        }
        REERR_TARGET_OF_REPEAT_OPERATOR_INVALID => "target of repeat operator is invalid",
        REERR_NESTED_REPEAT_OPERATOR => "nested repeat operator",
        REERR_UNMATCHED_CLOSE_PARENTHESIS => "unmatched close parenthesis",
        REERR_END_PATTERN_WITH_UNMATCHED_PARENTHESIS => "end pattern with unmatched parenthesis",
        REERR_END_PATTERN_IN_GROUP => "end pattern in group",
        REERR_UNDEFINED_GROUP_OPTION => "undefined group option",
        REERR_TOO_BIG_NUMBER_FOR_REPEAT_RANGE => "too big number for repeat range",
        REERR_UPPER_SMALLER_THAN_LOWER_IN_REPEAT_RANGE => {
            "upper is smaller than lower in repeat range"
        }
        REERR_EMPTY_RANGE_IN_CHAR_CLASS => "empty range in char class",
        REERR_TOO_MANY_CAPTURES => "too many captures",
        REERR_TOO_BIG_PROGRAM => "too big compiled program",
        _ => "undefined error code",
    }
}
