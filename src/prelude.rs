// prelude.rs - Convenient re-exports for the idiomatic API.
//
//! # Prelude
//!
//! ```
//! use ure::prelude::*;
//!
//! let re = Pattern::new(r"\d+").unwrap();
//! let m = re.search("answer: 42").unwrap().unwrap();
//! assert_eq!(m.as_str(), "42");
//! ```

pub use crate::api::{Match, Pattern, PatternBuilder, Replacement};
pub use crate::error::RegexError;
pub use crate::regdef::CompileFlags;
