/// `IndentEngine` - block-based indentation tracker
///
/// Drives a [`BlockStack`] through the [`LineClassifier`] and keeps a running
/// indent level. Each line contributes two deltas: one applied to the line
/// itself and one applied from the following line on. For formatting, the
/// per-line call order is fixed:
///
/// `update_next()` -> `resolve()` -> `update_current()` -> `set_indent()`
///
/// For a diagnostics-only pass, calling `resolve()` per line followed by
/// `finish()` is enough.
use crate::block::BlockStack;
use crate::config::Config;
use crate::diagnostic::Diagnostic;
use crate::parser::{Classification, LineClassifier, StackAction};

/// Running indent level and the deltas waiting to be folded into it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndentState {
    /// Indent level of the line being processed (never negative)
    pub level: usize,
    /// Delta for the current line, folded by `update_current`
    pub pending_current: i32,
    /// Delta for the next line, folded by `update_next`
    pub pending_next: i32,
    /// Reset the level to zero in `update_current` (function header)
    pub pending_reset: bool,
}

/// Add a signed delta to an indent level, clamping at zero
fn apply_delta(level: usize, delta: i32) -> usize {
    let magnitude = usize::try_from(delta.unsigned_abs()).unwrap_or(usize::MAX);
    if delta < 0 {
        level.saturating_sub(magnitude)
    } else {
        level.saturating_add(magnitude)
    }
}

/// `IndentEngine` owns the state of one document pass
pub struct IndentEngine {
    classifier: LineClassifier,
    stack: BlockStack,
    state: IndentState,
    diagnostics: Vec<Diagnostic>,
    /// One level of indentation (spaces or a tab)
    indent_unit: String,
}

impl IndentEngine {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            classifier: LineClassifier::new(config),
            stack: BlockStack::new(),
            state: IndentState::default(),
            diagnostics: Vec::new(),
            indent_unit: config.indent_unit(),
        }
    }

    /// Fold the previous line's next-delta into the level
    pub fn update_next(&mut self) {
        self.state.level = apply_delta(self.state.level, self.state.pending_next);
        self.state.pending_next = 0;
    }

    /// Classify a line, mutate the block stack and record its deltas
    pub fn resolve(&mut self, line_number: usize, text: &str) -> Classification {
        let classification = self
            .classifier
            .classify(line_number, text, self.stack.top_type());

        match classification.action {
            StackAction::None => {}
            StackAction::Push(block, range) => self.stack.push(block, range),
            StackAction::Pop(block, range) => {
                if let Some(diagnostic) = self.stack.pop(block, range) {
                    self.diagnostics.push(diagnostic);
                }
            }
            StackAction::CloseAll => {
                let residual = self.stack.close_all();
                self.diagnostics.extend(residual);
            }
        }

        self.state.pending_current = classification.current;
        self.state.pending_next = classification.next;
        self.state.pending_reset = classification.reset_indent;
        classification
    }

    /// Fold the current line's delta into the level
    pub fn update_current(&mut self) {
        if self.state.pending_reset {
            self.state.level = 0;
            self.state.pending_reset = false;
        }
        self.state.level = apply_delta(self.state.level, self.state.pending_current);
        self.state.pending_current = 0;
    }

    /// Re-indent `text` at the current level
    ///
    /// Lines that are blank after trimming are returned unchanged.
    #[must_use]
    pub fn set_indent(&self, text: &str) -> String {
        let content = text.trim_start();
        if content.is_empty() {
            return text.to_string();
        }
        let mut result =
            String::with_capacity(self.indent_unit.len() * self.state.level + content.len());
        for _ in 0..self.state.level {
            result.push_str(&self.indent_unit);
        }
        result.push_str(content);
        result
    }

    /// Run the full formatting protocol for one line
    pub fn format_line(&mut self, line_number: usize, text: &str) -> String {
        self.update_next();
        self.resolve(line_number, text);
        self.update_current();
        self.set_indent(text)
    }

    /// Diagnostics-only processing of one line
    pub fn check_line(&mut self, line_number: usize, text: &str) {
        self.resolve(line_number, text);
    }

    /// Close every residual block and return all diagnostics of the pass
    pub fn finish(&mut self) -> Vec<Diagnostic> {
        let residual = self.stack.close_all();
        self.diagnostics.extend(residual);
        std::mem::take(&mut self.diagnostics)
    }

    /// Take the diagnostics collected so far
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Diagnostics collected so far
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Current indent level
    #[must_use]
    pub fn indent_level(&self) -> usize {
        self.state.level
    }

    #[must_use]
    pub fn state(&self) -> IndentState {
        self.state
    }

    /// Number of open blocks
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Blocks still open after the lines seen so far
    #[must_use]
    pub fn stack(&self) -> &BlockStack {
        &self.stack
    }

    /// Start a new pass; open blocks are dropped without diagnostics
    pub fn reset(&mut self) {
        self.stack.clear();
        self.state = IndentState::default();
        self.diagnostics.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use crate::diagnostic::{DiagnosticKind, SourceRange};

    fn levels(config: &Config, lines: &[&str]) -> Vec<usize> {
        let mut engine = IndentEngine::new(config);
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                engine.update_next();
                engine.resolve(i, line);
                engine.update_current();
                engine.indent_level()
            })
            .collect()
    }

    #[test]
    fn test_apply_delta_clamps() {
        assert_eq!(apply_delta(0, -1), 0);
        assert_eq!(apply_delta(1, -2), 0);
        assert_eq!(apply_delta(2, 1), 3);
        assert_eq!(apply_delta(3, 0), 3);
    }

    #[test]
    fn test_simple_if() {
        let config = Config::default();
        assert_eq!(levels(&config, &["IF A", "PRINTL A", "ENDIF"]), vec![0, 1, 0]);
    }

    #[test]
    fn test_if_else() {
        let config = Config::default();
        assert_eq!(
            levels(
                &config,
                &["IF A", "X = 1", "ELSEIF B", "X = 2", "ELSE", "X = 3", "ENDIF"]
            ),
            vec![0, 1, 0, 1, 0, 1, 0]
        );
    }

    #[test]
    fn test_nested_loops() {
        let config = Config::default();
        let mut engine = IndentEngine::new(&config);
        let lines = ["FOR I, 0, 3", "WHILE A", "A -= 1", "WEND", "NEXT"];
        let mut seen = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            engine.format_line(i, line);
            seen.push((engine.indent_level(), engine.depth()));
        }
        assert_eq!(seen, vec![(0, 1), (1, 2), (2, 2), (1, 1), (0, 0)]);
        assert!(engine.finish().is_empty());
    }

    #[test]
    fn test_select_case_levels() {
        let config = Config::default();
        assert_eq!(
            levels(
                &config,
                &["SELECTCASE X", "CASE 1", "A", "CASEELSE", "B", "ENDSELECT"]
            ),
            vec![0, 1, 2, 1, 2, 0]
        );
    }

    #[test]
    fn test_sif_indents_one_line() {
        let config = Config::default();
        let mut engine = IndentEngine::new(&config);
        let out: Vec<String> = ["SIF cond", "A()", "B()"]
            .iter()
            .enumerate()
            .map(|(i, line)| engine.format_line(i, line))
            .collect();
        assert_eq!(out, vec!["SIF cond", "    A()", "B()"]);
        assert!(engine.finish().is_empty());
    }

    #[test]
    fn test_close_on_empty_stack_clamps() {
        let config = Config::default();
        let mut engine = IndentEngine::new(&config);
        assert_eq!(engine.format_line(0, "  ENDIF"), "ENDIF");
        assert_eq!(engine.indent_level(), 0);
        let diagnostics = engine.finish();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UnpairedStart);
    }

    #[test]
    fn test_missing_inner_end() {
        let config = Config::default();
        let mut engine = IndentEngine::new(&config);
        for (i, line) in ["FOR I, 0, 3", "  IF I", "  NEXT"].iter().enumerate() {
            engine.check_line(i, line);
        }
        assert_eq!(engine.depth(), 0);
        let diagnostics = engine.finish();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::MissingEnd);
        assert_eq!(diagnostics[0].block, BlockType::If);
        assert_eq!(diagnostics[0].range, SourceRange::on_line(1, 2, 4));
    }

    #[test]
    fn test_function_header_resets_and_closes() {
        let config = Config::default();
        let mut engine = IndentEngine::new(&config);
        engine.format_line(0, "@FIRST");
        engine.format_line(1, "IF A");
        engine.format_line(2, "B = 1");
        assert_eq!(engine.indent_level(), 1);
        assert_eq!(engine.format_line(3, "  @SECOND"), "@SECOND");
        assert_eq!(engine.depth(), 0);
        assert_eq!(engine.diagnostics().len(), 1);
        assert_eq!(engine.diagnostics()[0].block, BlockType::If);
    }

    #[test]
    fn test_function_indent() {
        let config = Config {
            function_indent: true,
            ..Default::default()
        };
        assert_eq!(
            levels(&config, &["@MAIN", "IF A", "B", "ENDIF", "@NEXT_FUNC", "C"]),
            vec![0, 1, 2, 1, 0, 1]
        );
    }

    #[test]
    fn test_set_indent_with_tabs() {
        let config = Config {
            insert_spaces: false,
            ..Default::default()
        };
        let mut engine = IndentEngine::new(&config);
        engine.format_line(0, "IF A");
        assert_eq!(engine.format_line(1, "    PRINTL A"), "\tPRINTL A");
    }

    #[test]
    fn test_blank_line_unchanged() {
        let config = Config::default();
        let mut engine = IndentEngine::new(&config);
        engine.format_line(0, "IF A");
        assert_eq!(engine.format_line(1, "   "), "   ");
        assert_eq!(engine.format_line(2, ""), "");
    }

    #[test]
    fn test_reset() {
        let config = Config::default();
        let mut engine = IndentEngine::new(&config);
        engine.format_line(0, "IF A");
        engine.format_line(1, "NEXT");
        engine.format_line(2, "WHILE 1");
        engine.reset();
        assert_eq!(engine.depth(), 0);
        assert_eq!(engine.indent_level(), 0);
        assert!(engine.diagnostics().is_empty());
        assert_eq!(engine.state(), IndentState::default());
    }
}
