/// Keyword table builder - creates the priority-ordered matcher for block keywords
use std::ops::Range;

use regex::Regex;

use crate::block::BlockType;
use crate::parser::patterns::{
    CASE_RE, CATCH_RE, DATALIST_RE, DO_RE, ELSE_RE, ENDCATCH_RE, ENDDATA_RE, ENDFUNC_RE, ENDIF_RE,
    ENDLIST_RE, ENDSELECT_RE, FOR_RE, FUNCTION_RE, IF_RE, LOOP_RE, NEXT_RE, PRINTDATA_RE,
    REND_RE, REPEAT_RE, SELECTCASE_RE, SIF_RE, TRYC_RE, TRYLIST_RE, WEND_RE, WHILE_RE,
};

/// What a matched keyword does to the block stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Opens a block of the given type
    Open(BlockType),
    /// Continues the given block (ELSE, CASE, CATCH); stack untouched
    Mid(BlockType),
    /// Closes a block of the given type
    Close(BlockType),
    /// `@NAME` function header; resets indentation and closes every block
    FunctionHeader,
}

/// One row of the keyword table
#[derive(Clone)]
pub struct KeywordRule {
    re: &'static Regex,
    pub role: Role,
    /// Delta applied to the matching line itself
    pub current: i32,
    /// Delta applied from the following line on
    pub next: i32,
}

impl KeywordRule {
    #[must_use]
    pub fn new(re: &'static Regex, role: Role, current: i32, next: i32) -> Self {
        Self {
            re,
            role,
            current,
            next,
        }
    }

    /// Byte span of the keyword if `line` starts with it
    #[must_use]
    pub fn find(&self, line: &str) -> Option<Range<usize>> {
        self.re
            .captures(line)
            .and_then(|caps| caps.name("kw"))
            .map(|m| m.range())
    }
}

/// Priority-ordered keyword table; the first matching rule wins
#[derive(Clone)]
pub struct KeywordTable {
    rules: Vec<KeywordRule>,
}

impl KeywordTable {
    /// First rule matching `line`, with the byte span of its keyword
    #[must_use]
    pub fn first_match(&self, line: &str) -> Option<(&KeywordRule, Range<usize>)> {
        self.rules
            .iter()
            .find_map(|rule| rule.find(line).map(|span| (rule, span)))
    }
}

/// Build the keyword table
///
/// # Arguments
/// * `function_indent` - Whether the body of a function is indented one level
///   below its `@NAME` header
#[must_use]
pub fn build_keyword_table(function_indent: bool) -> KeywordTable {
    use BlockType as B;
    use Role::{Close, FunctionHeader, Mid, Open};

    let rules = vec![
        // IF/ELSEIF/ELSE/ENDIF
        KeywordRule::new(&IF_RE, Open(B::If), 0, 1),
        KeywordRule::new(&ELSE_RE, Mid(B::If), -1, 1),
        KeywordRule::new(&ENDIF_RE, Close(B::If), -1, 0),
        // SELECTCASE/CASE/ENDSELECT: CASE sits one level in, its body two
        KeywordRule::new(&SELECTCASE_RE, Open(B::SelectCase), 0, 2),
        KeywordRule::new(&CASE_RE, Mid(B::SelectCase), -1, 1),
        KeywordRule::new(&ENDSELECT_RE, Close(B::SelectCase), -2, 0),
        // PRINTDATA/STRDATA ... ENDDATA
        KeywordRule::new(&PRINTDATA_RE, Open(B::PrintData), 0, 1),
        KeywordRule::new(&ENDDATA_RE, Close(B::PrintData), -1, 0),
        // DATALIST/ENDLIST
        KeywordRule::new(&DATALIST_RE, Open(B::DataList), 0, 1),
        KeywordRule::new(&ENDLIST_RE, Close(B::DataList), -1, 0),
        // FOR/NEXT
        KeywordRule::new(&FOR_RE, Open(B::For), 0, 1),
        KeywordRule::new(&NEXT_RE, Close(B::For), -1, 0),
        // WHILE/WEND
        KeywordRule::new(&WHILE_RE, Open(B::While), 0, 1),
        KeywordRule::new(&WEND_RE, Close(B::While), -1, 0),
        // REPEAT/REND
        KeywordRule::new(&REPEAT_RE, Open(B::Repeat), 0, 1),
        KeywordRule::new(&REND_RE, Close(B::Repeat), -1, 0),
        // DO/LOOP
        KeywordRule::new(&DO_RE, Open(B::Loop), 0, 1),
        KeywordRule::new(&LOOP_RE, Close(B::Loop), -1, 0),
        // TRYC*/CATCH/ENDCATCH
        KeywordRule::new(&TRYC_RE, Open(B::TryC), 0, 1),
        KeywordRule::new(&CATCH_RE, Mid(B::TryC), -1, 1),
        KeywordRule::new(&ENDCATCH_RE, Close(B::TryC), -1, 0),
        // TRY*LIST/ENDFUNC
        KeywordRule::new(&TRYLIST_RE, Open(B::TryList), 0, 1),
        KeywordRule::new(&ENDFUNC_RE, Close(B::TryList), -1, 0),
        // SIF: closed synthetically by the next line
        KeywordRule::new(&SIF_RE, Open(B::Sif), 0, 1),
        // @NAME
        KeywordRule::new(&FUNCTION_RE, FunctionHeader, 0, i32::from(function_indent)),
    ];

    KeywordTable { rules }
}
