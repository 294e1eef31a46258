/// Block types for ERA basic constructs
use std::fmt;

/// ERA basic block types
///
/// Every variant except `Sif` has its own closing keyword. `Sif` is closed
/// synthetically by the line that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    // Control flow
    If,
    SelectCase,
    PrintData,
    DataList,
    For,
    While,
    Repeat,
    TryC,
    TryList,
    Loop,

    // Structural regions
    Connect,
    Sif,
    Skip,
}

impl BlockType {
    /// All block types, in declaration order
    pub const ALL: [BlockType; 13] = [
        BlockType::If,
        BlockType::SelectCase,
        BlockType::PrintData,
        BlockType::DataList,
        BlockType::For,
        BlockType::While,
        BlockType::Repeat,
        BlockType::TryC,
        BlockType::TryList,
        BlockType::Loop,
        BlockType::Connect,
        BlockType::Sif,
        BlockType::Skip,
    ];

    /// Check if lines inside this block are excluded from keyword scanning
    #[must_use]
    pub fn is_opaque(self) -> bool {
        matches!(self, BlockType::Connect | BlockType::Skip)
    }

    /// Check if this block has a closing keyword in the source text
    #[must_use]
    pub fn has_terminator(self) -> bool {
        !matches!(self, BlockType::Sif)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockType::If => "IF",
            BlockType::SelectCase => "SELECTCASE",
            BlockType::PrintData => "PRINTDATA",
            BlockType::DataList => "DATALIST",
            BlockType::For => "FOR",
            BlockType::While => "WHILE",
            BlockType::Repeat => "REPEAT",
            BlockType::TryC => "TRYC",
            BlockType::TryList => "TRYLIST",
            BlockType::Loop => "LOOP",
            BlockType::Connect => "CONNECT",
            BlockType::Sif => "SIF",
            BlockType::Skip => "SKIP",
        };
        write!(f, "{name}")
    }
}
