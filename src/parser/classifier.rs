/// `LineClassifier` - decides what a single line does to the block stack
///
/// Classification is a pure function of the line text, the type of the
/// innermost open block, and the configuration. The caller applies the
/// returned [`StackAction`] and indent deltas.
use crate::block::{build_keyword_table, BlockType, KeywordTable, Role};
use crate::config::Config;
use crate::diagnostic::SourceRange;
use crate::parser::comment::{split_line, LineText};
use crate::parser::patterns::{CONNECT_CLOSE_RE, CONNECT_OPEN_RE, SKIP_END_RE, SKIP_START_RE};

/// Why a line was classified the way it was
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `[SKIPSTART]`
    SkipStart,
    /// `[SKIPEND]`
    SkipEnd,
    /// `{` on its own
    ConnectOpen,
    /// `}` on its own
    ConnectClose,
    /// Inside a skip region or connection block; not scanned
    Opaque,
    /// The statement governed by the preceding SIF
    SifBody,
    /// Comment-only line that is not scanned
    Comment,
    /// Matched a row of the keyword table
    Keyword(Role),
    /// Nothing structural
    Plain,
}

/// Mutation of the block stack requested by a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackAction {
    None,
    Push(BlockType, SourceRange),
    Pop(BlockType, SourceRange),
    /// Force-close every open block (function boundary)
    CloseAll,
}

/// Result of classifying one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: LineKind,
    pub action: StackAction,
    /// Delta applied to this line
    pub current: i32,
    /// Delta applied from the next line on
    pub next: i32,
    /// Reset the indent level to zero before applying `current`
    pub reset_indent: bool,
}

impl Classification {
    fn new(kind: LineKind, action: StackAction, current: i32, next: i32) -> Self {
        Self {
            kind,
            action,
            current,
            next,
            reset_indent: false,
        }
    }

    fn plain(kind: LineKind) -> Self {
        Self::new(kind, StackAction::None, 0, 0)
    }
}

/// Per-line classifier holding the keyword table
#[derive(Clone)]
pub struct LineClassifier {
    table: KeywordTable,
    comment_indent: bool,
}

impl LineClassifier {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            table: build_keyword_table(config.function_indent),
            comment_indent: config.comment_indent,
        }
    }

    /// Classify `line` (zero-based `line_number`) given the innermost open block
    #[must_use]
    pub fn classify(&self, line_number: usize, line: &str, top: Option<BlockType>) -> Classification {
        // Skip markers are recognized before anything else, comments included
        if let Some(range) = keyword_range(&SKIP_START_RE, line_number, line) {
            return Classification::new(
                LineKind::SkipStart,
                StackAction::Push(BlockType::Skip, range),
                0,
                0,
            );
        }
        if let Some(range) = keyword_range(&SKIP_END_RE, line_number, line) {
            return Classification::new(
                LineKind::SkipEnd,
                StackAction::Pop(BlockType::Skip, range),
                0,
                0,
            );
        }
        if top == Some(BlockType::Skip) {
            return Classification::plain(LineKind::Opaque);
        }

        // Connection blocks: interior lines are indented but never scanned
        if let Some(range) = keyword_range(&CONNECT_OPEN_RE, line_number, line) {
            return Classification::new(
                LineKind::ConnectOpen,
                StackAction::Push(BlockType::Connect, range),
                0,
                1,
            );
        }
        if let Some(range) = keyword_range(&CONNECT_CLOSE_RE, line_number, line) {
            return Classification::new(
                LineKind::ConnectClose,
                StackAction::Pop(BlockType::Connect, range),
                -1,
                0,
            );
        }
        if top == Some(BlockType::Connect) {
            return Classification::plain(LineKind::Opaque);
        }

        // SIF governs exactly one line; its close is synthetic
        if top == Some(BlockType::Sif) {
            let range = SourceRange::on_line(line_number, 0, line.chars().count());
            return Classification::new(
                LineKind::SifBody,
                StackAction::Pop(BlockType::Sif, range),
                0,
                -1,
            );
        }

        let (text, offset) = match split_line(line) {
            LineText::Code { text, offset } => (text, offset),
            LineText::Comment { body, offset } if self.comment_indent => (body, offset),
            LineText::Comment { .. } => return Classification::plain(LineKind::Comment),
        };

        let Some((rule, span)) = self.table.first_match(text) else {
            return Classification::plain(LineKind::Plain);
        };
        let range =
            SourceRange::from_byte_span(line_number, line, offset + span.start..offset + span.end);

        let action = match rule.role {
            Role::Open(block) => StackAction::Push(block, range),
            Role::Close(block) => StackAction::Pop(block, range),
            Role::Mid(_) => StackAction::None,
            Role::FunctionHeader => StackAction::CloseAll,
        };
        let mut classification =
            Classification::new(LineKind::Keyword(rule.role), action, rule.current, rule.next);
        classification.reset_indent = rule.role == Role::FunctionHeader;
        classification
    }
}

/// Range of the `kw` group of `re` in `line`, if it matches
fn keyword_range(re: &regex::Regex, line_number: usize, line: &str) -> Option<SourceRange> {
    let caps = re.captures(line)?;
    let kw = caps.name("kw")?;
    Some(SourceRange::from_byte_span(line_number, line, kw.range()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> LineClassifier {
        LineClassifier::new(&Config::default())
    }

    #[test]
    fn test_plain_line() {
        let c = classifier().classify(0, "PRINTL hello", None);
        assert_eq!(c.kind, LineKind::Plain);
        assert_eq!(c.action, StackAction::None);
        assert_eq!((c.current, c.next), (0, 0));
    }

    #[test]
    fn test_open_keyword_range() {
        let c = classifier().classify(7, "    FOR I, 0, 10", None);
        assert_eq!(
            c.action,
            StackAction::Push(BlockType::For, SourceRange::on_line(7, 4, 7))
        );
        assert_eq!((c.current, c.next), (0, 1));
    }

    #[test]
    fn test_close_keyword() {
        let c = classifier().classify(2, "ENDIF", Some(BlockType::If));
        assert_eq!(
            c.action,
            StackAction::Pop(BlockType::If, SourceRange::on_line(2, 0, 5))
        );
        assert_eq!((c.current, c.next), (-1, 0));
    }

    #[test]
    fn test_mid_keyword_leaves_stack() {
        let c = classifier().classify(3, "ELSE", Some(BlockType::If));
        assert_eq!(c.kind, LineKind::Keyword(Role::Mid(BlockType::If)));
        assert_eq!(c.action, StackAction::None);
        assert_eq!((c.current, c.next), (-1, 1));
    }

    #[test]
    fn test_trailing_comment_is_ignored() {
        let c = classifier().classify(0, "PRINTL A ;ENDIF", None);
        assert_eq!(c.kind, LineKind::Plain);
    }

    #[test]
    fn test_comment_line_not_scanned_by_default() {
        let c = classifier().classify(0, ";IF A", None);
        assert_eq!(c.kind, LineKind::Comment);
        assert_eq!(c.action, StackAction::None);
    }

    #[test]
    fn test_comment_line_scanned_with_comment_indent() {
        let config = Config {
            comment_indent: true,
            ..Default::default()
        };
        let c = LineClassifier::new(&config).classify(4, "  ;IF A", None);
        assert_eq!(
            c.action,
            StackAction::Push(BlockType::If, SourceRange::on_line(4, 3, 5))
        );
    }

    #[test]
    fn test_pragma_line_is_code() {
        let c = classifier().classify(1, ";!;FOR I, 0, 3", None);
        assert_eq!(
            c.action,
            StackAction::Push(BlockType::For, SourceRange::on_line(1, 3, 6))
        );
    }

    #[test]
    fn test_connect_block_is_opaque() {
        let cls = classifier();
        let open = cls.classify(0, "{", None);
        assert_eq!(open.kind, LineKind::ConnectOpen);
        assert_eq!(open.next, 1);

        let inner = cls.classify(1, "IF A", Some(BlockType::Connect));
        assert_eq!(inner.kind, LineKind::Opaque);
        assert_eq!(inner.action, StackAction::None);

        let close = cls.classify(2, "}", Some(BlockType::Connect));
        assert_eq!(close.kind, LineKind::ConnectClose);
        assert_eq!(close.current, -1);
    }

    #[test]
    fn test_skip_region_is_opaque() {
        let cls = classifier();
        let start = cls.classify(0, "[SKIPSTART]", None);
        assert_eq!(
            start.action,
            StackAction::Push(BlockType::Skip, SourceRange::on_line(0, 0, 11))
        );
        let inner = cls.classify(1, "NEXT", Some(BlockType::Skip));
        assert_eq!(inner.kind, LineKind::Opaque);
        let end = cls.classify(2, "[SKIPEND]", Some(BlockType::Skip));
        assert_eq!(end.kind, LineKind::SkipEnd);
    }

    #[test]
    fn test_skip_markers_win_over_comments() {
        let c = classifier().classify(0, "[SKIPSTART] ;reason", None);
        assert_eq!(c.kind, LineKind::SkipStart);
    }

    #[test]
    fn test_sif_body_closes_sif() {
        let c = classifier().classify(1, "IF A", Some(BlockType::Sif));
        assert_eq!(c.kind, LineKind::SifBody);
        assert!(matches!(c.action, StackAction::Pop(BlockType::Sif, _)));
        assert_eq!((c.current, c.next), (0, -1));
    }

    #[test]
    fn test_function_header() {
        let c = classifier().classify(0, "@SYSTEM_TITLE", Some(BlockType::If));
        assert_eq!(c.kind, LineKind::Keyword(Role::FunctionHeader));
        assert_eq!(c.action, StackAction::CloseAll);
        assert!(c.reset_indent);
        assert_eq!(c.next, 0);

        let config = Config {
            function_indent: true,
            ..Default::default()
        };
        let c = LineClassifier::new(&config).classify(0, "@SYSTEM_TITLE", None);
        assert_eq!(c.next, 1);
    }
}
