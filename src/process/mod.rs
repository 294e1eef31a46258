//! Document and file processing.
//!
//! Each document is processed in a single forward pass:
//! - Split into lines, keeping line endings and any leading BOM
//! - Feed every line through one [`IndentEngine`](crate::format::IndentEngine)
//! - Reassemble the text and collect per-line edits and diagnostics
//!
//! The entry points are [`format_document`], [`format_range`] and
//! [`check_document`] for in-memory text, and [`format_file`] which reads a
//! buffered reader, applies the in-file directive and writes the result to
//! any `Write` implementation.

pub mod pipeline;

pub use pipeline::{
    check_document, effective_config, format_document, format_file, format_range, FileReport,
    FormatOutput, LineRange, TextEdit,
};
