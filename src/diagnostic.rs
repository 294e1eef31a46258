//! Structural diagnostics and source locations.
//!
//! A [`Diagnostic`] is produced whenever a closing keyword cannot be paired
//! with the block it is supposed to close, or when a block is still open at
//! a function boundary or at the end of the document. Diagnostics never stop
//! processing; they accumulate beside the indentation output.
//!
//! [`Diagnostic::to_codespan`] converts a diagnostic into a
//! `codespan-reporting` diagnostic so the CLI can render it with a snippet
//! of the offending line.

use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic as CodespanDiagnostic, Label};

use crate::block::BlockType;

/// Half-open, zero-based range of text
///
/// Columns count characters (Unicode scalar values), not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceRange {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl SourceRange {
    #[must_use]
    pub fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Range covering `start_col..end_col` on a single line
    #[must_use]
    pub fn on_line(line: usize, start_col: usize, end_col: usize) -> Self {
        Self::new(line, start_col, line, end_col)
    }

    /// Range for the byte span `bytes` of `text`, located on `line`
    ///
    /// The byte offsets must lie on character boundaries of `text`.
    #[must_use]
    pub fn from_byte_span(line: usize, text: &str, bytes: Range<usize>) -> Self {
        let start_col = text[..bytes.start].chars().count();
        let end_col = start_col + text[bytes.start..bytes.end].chars().count();
        Self::on_line(line, start_col, end_col)
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line + 1, self.start_col + 1)
    }
}

/// Diagnostic severity
///
/// Structural mismatches are always reported as warnings; the formatter still
/// produces output for every line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Warning,
}

/// The three classes of structural mismatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A closing keyword was found while no block was open
    UnpairedStart,
    /// A block was left without its closing keyword
    MissingEnd,
    /// A closing keyword matched neither the innermost block nor its parent
    UnpairedEnd,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::UnpairedStart => "unpaired-start",
            DiagnosticKind::MissingEnd => "missing-end",
            DiagnosticKind::UnpairedEnd => "unpaired-end",
        };
        write!(f, "{name}")
    }
}

/// A structural diagnostic anchored at a source range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub range: SourceRange,
    pub message: String,
    pub kind: DiagnosticKind,
    pub block: BlockType,
    pub severity: Severity,
}

impl Diagnostic {
    /// A close keyword for `block` was found with an empty stack
    #[must_use]
    pub fn unpaired_start(block: BlockType, range: SourceRange) -> Self {
        Self::new(
            DiagnosticKind::UnpairedStart,
            block,
            range,
            format!("Missing start for block {block}."),
        )
    }

    /// The block opened at `range` was never closed
    #[must_use]
    pub fn missing_end(block: BlockType, range: SourceRange) -> Self {
        Self::new(
            DiagnosticKind::MissingEnd,
            block,
            range,
            format!("Missing end for block {block}."),
        )
    }

    /// A close keyword for `block` does not pair with any open block nearby
    #[must_use]
    pub fn unpaired_end(block: BlockType, range: SourceRange) -> Self {
        Self::new(
            DiagnosticKind::UnpairedEnd,
            block,
            range,
            format!("Unpaired end for block {block}."),
        )
    }

    fn new(kind: DiagnosticKind, block: BlockType, range: SourceRange, message: String) -> Self {
        Self {
            range,
            message,
            kind,
            block,
            severity: Severity::Warning,
        }
    }

    /// Convert to a codespan-reporting diagnostic for display.
    ///
    /// `source` must be the text the diagnostic was computed from. A leading
    /// byte order mark is accounted for.
    #[must_use]
    pub fn to_codespan(&self, file_id: usize, source: &str) -> CodespanDiagnostic<usize> {
        let start = byte_offset(source, self.range.start_line, self.range.start_col);
        let end = byte_offset(source, self.range.end_line, self.range.end_col).max(start);
        CodespanDiagnostic::warning()
            .with_message(&self.message)
            .with_code(self.kind.to_string())
            .with_labels(vec![Label::primary(file_id, start..end)])
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: warning: {}", self.range, self.message)
    }
}

/// Byte offset of (`line`, `col`) in `source`, clamped to the end of the line
fn byte_offset(source: &str, line: usize, col: usize) -> usize {
    let mut offset = 0;
    for (idx, text) in source.split_inclusive('\n').enumerate() {
        if idx == line {
            let mut content = text.trim_end_matches(['\n', '\r']);
            if idx == 0 {
                if let Some(rest) = content.strip_prefix('\u{feff}') {
                    offset += '\u{feff}'.len_utf8();
                    content = rest;
                }
            }
            let within = content
                .char_indices()
                .nth(col)
                .map_or(content.len(), |(i, _)| i);
            return offset + within;
        }
        offset += text.len();
    }
    source.len()
}
