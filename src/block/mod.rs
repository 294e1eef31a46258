//! Block structure tracking for ERA basic.
//!
//! This module tracks nested constructs to determine indentation and to
//! report mismatched keywords:
//! - [`BlockType`]: the kinds of paired constructs (IF, FOR, SELECTCASE, ...)
//! - [`BlockStack`]: LIFO of open blocks with the two-level recovery rule
//! - [`KeywordTable`]: priority-ordered keyword rules with their indent deltas

pub mod stack;
pub mod table;
pub mod types;

pub use stack::{decide_pop, BlockStack, OpenBlock, PopDecision};
pub use table::{build_keyword_table, KeywordRule, KeywordTable, Role};
pub use types::BlockType;
