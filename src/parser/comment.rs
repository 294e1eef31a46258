/// Comment handling for ERA basic lines
///
/// A line comment starts at `;`. Two prefixes look like comments but are not:
/// `;!;` and `;#;` mark lines that the engine executes, so the text after the
/// marker is code.
use crate::parser::patterns::PRAGMA_RE;

/// Comment delimiter
pub const COMMENT_CHAR: char = ';';

/// Two-character markers that turn a `;` into a structural pragma
const PRAGMA_MARKERS: [&str; 2] = ["!;", "#;"];

/// A line split into its scannable part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineText<'a> {
    /// Code with any trailing comment removed
    Code {
        /// The code text
        text: &'a str,
        /// Byte offset of `text` within the original line
        offset: usize,
    },
    /// The whole line is a comment
    Comment {
        /// Comment body after the delimiter, trailing comment removed
        body: &'a str,
        /// Byte offset of `body` within the original line
        offset: usize,
    },
}

/// Byte index of the first comment delimiter in `text`, skipping pragma markers
#[must_use]
pub fn find_comment_start(text: &str) -> Option<usize> {
    let mut search_from = 0;
    while let Some(pos) = text[search_from..].find(COMMENT_CHAR) {
        let idx = search_from + pos;
        let rest = &text[idx + COMMENT_CHAR.len_utf8()..];
        match PRAGMA_MARKERS.iter().find(|marker| rest.starts_with(**marker)) {
            Some(marker) => search_from = idx + COMMENT_CHAR.len_utf8() + marker.len(),
            None => return Some(idx),
        }
    }
    None
}

/// Remove a trailing comment from `text`
#[must_use]
pub fn strip_comment(text: &str) -> &str {
    match find_comment_start(text) {
        Some(idx) => &text[..idx],
        None => text,
    }
}

/// Split a line into code or comment
#[must_use]
pub fn split_line(line: &str) -> LineText<'_> {
    if let Some(marker) = PRAGMA_RE.find(line) {
        let offset = marker.end();
        return LineText::Code {
            text: strip_comment(&line[offset..]),
            offset,
        };
    }

    let trimmed = line.trim_start();
    if trimmed.starts_with(COMMENT_CHAR) {
        let offset = line.len() - trimmed.len() + COMMENT_CHAR.len_utf8();
        return LineText::Comment {
            body: strip_comment(&line[offset..]),
            offset,
        };
    }

    LineText::Code {
        text: strip_comment(line),
        offset: 0,
    }
}
