//! ERA basic line scanning.
//!
//! - [`patterns`]: Precompiled regex patterns for block keywords and markers
//! - [`comment`]: Comment stripping that honors the `;!;` and `;#;` pragmas
//! - [`LineClassifier`]: Maps one line to a stack action and indent deltas

pub mod classifier;
pub mod comment;
pub mod patterns;

pub use classifier::{Classification, LineClassifier, LineKind, StackAction};
pub use comment::{split_line, strip_comment, LineText};
