//! # ure
//!
//! Compact backtracking regular-expression engine over byte strings.
//!
//! A pattern is compiled in two passes (size, then emit) into a linear
//! bytecode program, which a backtracking VM runs against a subject window.
//! On top of that sit `match`/`search`, `split` and template substitution
//! with backreferences.
//!
//! ## Quick Start
//!
//! ```rust
//! use ure::prelude::*;
//!
//! let re = Pattern::new(r"(\d+)-(\d+)").unwrap();
//! let m = re.search("id 12-34 end").unwrap().unwrap();
//! assert_eq!(m.span(0).unwrap(), (3, 8));
//! assert_eq!(m.group(1).unwrap(), Some(&b"12"[..]));
//!
//! let out = re.sub(r"\2-\1", "id 12-34 end", 0).unwrap();
//! assert_eq!(&*out, b"id 34-12 end");
//! ```
//!
//! For fine-grained control, use [`PatternBuilder`](api::PatternBuilder):
//!
//! ```rust
//! use ure::prelude::*;
//!
//! let re = Pattern::builder(r"(a|b)*c")
//!     .debug(true)
//!     .match_stack_limit(50_000)
//!     .build()
//!     .unwrap();
//! assert!(re.is_match("ababc").unwrap());
//! ```
//!
//! ## Low-Level API
//!
//! The stage entry points are public as well:
//!
//! ```rust
//! use ure::regcomp::{re_compilecode, re_sizecode};
//! use ure::regexec::{re_search, Subject};
//! use ure::regint::Program;
//!
//! let size = re_sizecode(b"b+").unwrap();
//! let mut reg = Program::with_capacity(size);
//! re_compilecode(b"b+", &mut reg, size).unwrap();
//!
//! let caps = re_search(&reg, &Subject::new(b"abbc"), 0, 0).unwrap().unwrap();
//! assert_eq!(&caps[..2], &[Some(1), Some(3)]);
//! ```
//!
//! ## Module Structure
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`regdef`] | Compile flags, error codes, limit defaults |
//! | [`regint`] | Instruction set and `Program` |
//! | [`regparse_types`] | Syntax tree |
//! | [`regparse`] | Pattern parser |
//! | [`regcomp`] | Tree-to-bytecode compiler |
//! | [`regexec`] | VM executor and search driver |
//! | [`regdump`] | Program listing |
//! | [`regerror`] | Error messages |
//! | [`error`] | `RegexError` |
//! | [`api`] | `Pattern`, `Match`, split and sub |

pub mod api;
pub mod error;
pub mod prelude;
pub mod regcomp;
pub mod regdef;
pub mod regdump;
pub mod regerror;
pub mod regexec;
pub mod regint;
pub mod regparse;
pub mod regparse_types;
