/// `BlockStack` - stack of open blocks with mismatch recovery
///
/// Tracks the lexical nesting of successfully matched openers. Closing a
/// block that does not sit on top of the stack applies a one-level lookahead:
/// if the block below the top matches, the top is assumed to be missing its
/// terminator and both are removed.
use crate::block::BlockType;
use crate::diagnostic::{Diagnostic, SourceRange};

/// An opened block and the range of its opening keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenBlock {
    pub block: BlockType,
    pub open_range: SourceRange,
}

/// Outcome of closing a block against a stack snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopDecision {
    /// Stack is empty, nothing to close
    Unpaired,
    /// Top of stack matches
    Matched,
    /// The block below the top matches; the top was never terminated
    Recovered(OpenBlock),
    /// Nothing nearby matches; the top is dropped to resynchronize
    Stray,
}

/// Decide how closing `expected` applies to `blocks` (bottom to top)
#[must_use]
pub fn decide_pop(blocks: &[OpenBlock], expected: BlockType) -> PopDecision {
    match blocks {
        [] => PopDecision::Unpaired,
        [.., top] if top.block == expected => PopDecision::Matched,
        [.., below, top] if below.block == expected => PopDecision::Recovered(*top),
        _ => PopDecision::Stray,
    }
}

/// LIFO stack of open blocks
#[derive(Debug, Clone, Default)]
pub struct BlockStack {
    blocks: Vec<OpenBlock>,
}

impl BlockStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a block
    pub fn push(&mut self, block: BlockType, open_range: SourceRange) {
        self.blocks.push(OpenBlock { block, open_range });
    }

    /// Close a block of type `expected` whose closing keyword sits at `close_range`
    ///
    /// Returns a diagnostic when the close does not pair with the top of the stack.
    pub fn pop(&mut self, expected: BlockType, close_range: SourceRange) -> Option<Diagnostic> {
        match decide_pop(&self.blocks, expected) {
            PopDecision::Unpaired => Some(Diagnostic::unpaired_start(expected, close_range)),
            PopDecision::Matched => {
                self.blocks.pop();
                None
            }
            PopDecision::Recovered(unclosed) => {
                self.blocks.truncate(self.blocks.len() - 2);
                Some(Diagnostic::missing_end(unclosed.block, unclosed.open_range))
            }
            PopDecision::Stray => {
                self.blocks.pop();
                Some(Diagnostic::unpaired_end(expected, close_range))
            }
        }
    }

    /// Check whether the innermost open block has type `block`
    #[must_use]
    pub fn peek_type_is(&self, block: BlockType) -> bool {
        self.top_type() == Some(block)
    }

    /// Type of the innermost open block
    #[must_use]
    pub fn top_type(&self) -> Option<BlockType> {
        self.blocks.last().map(|open| open.block)
    }

    /// Force-close every open block, innermost first
    ///
    /// Yields one missing-end diagnostic per block.
    pub fn close_all(&mut self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::with_capacity(self.blocks.len());
        while let Some(open) = self.blocks.pop() {
            diagnostics.push(Diagnostic::missing_end(open.block, open.open_range));
        }
        diagnostics
    }

    /// Discard all open blocks without diagnostics
    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Open blocks from outermost to innermost
    pub fn iter(&self) -> impl Iterator<Item = &OpenBlock> {
        self.blocks.iter()
    }
}
