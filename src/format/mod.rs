//! ERA basic indentation.
//!
//! [`IndentEngine`] consumes lines in document order, maintains the block
//! stack and produces the re-indented text of each line together with the
//! structural diagnostics of the document.

pub mod indenter;

pub use indenter::{IndentEngine, IndentState};
