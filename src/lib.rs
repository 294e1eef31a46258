//! erafmt - Indentation formatter and block checker for ERA basic scripts
//!
//! Re-indents `.erb`/`.erh` sources by tracking nested blocks and reports
//! unpaired or missing block keywords.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::struct_excessive_bools)]

pub mod block;
pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod directive;
pub mod error;
pub mod format;
pub mod parser;
pub mod process;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::Config;
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity, SourceRange};
pub use directive::{find_directive, parse_directive, DirectiveOverrides};
pub use error::Result;
pub use format::IndentEngine;
pub use process::{
    check_document, format_document, format_file, format_range, FileReport, FormatOutput,
    LineRange, TextEdit,
};
