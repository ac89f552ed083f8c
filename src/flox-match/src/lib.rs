//! flox-match - launcher-style fuzzy matching
//!
//! Matches a typed query against candidate labels the way a desktop launcher
//! does: word initials and capitals first (acronyms), then ordered substrings.
//! Each match carries a relevance score and the char positions to highlight.
//!
//! ```
//! use flox_match::{fuzzy_match, SearchPrecision};
//!
//! let result = fuzzy_match("fl", "Flow Launcher", true, SearchPrecision::Regular);
//! assert!(result.matched);
//! assert_eq!(result.index_list, vec![0, 5]);
//! ```

pub mod apps;
pub mod config;
pub mod error;
pub mod highlight;
pub mod matcher;
pub mod precision;
pub mod rank;

pub use error::{Error, Result};
pub use matcher::{fuzzy_match, MatchResult, StringMatcher};
pub use precision::SearchPrecision;
pub use rank::{rank, Item, Ranked};
