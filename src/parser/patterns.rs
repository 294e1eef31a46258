/// Regex patterns for ERA basic syntax
///
/// All patterns are compiled once at first use with `LazyLock`.
///
/// Block keywords are anchored at the start of the line and matched
/// case-sensitively on word boundaries. Every keyword pattern exposes the
/// keyword itself as the named group `kw`, which becomes the source range
/// attached to diagnostics.
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Build a regex from a compile-time constant pattern.
///
/// # Panics
///
/// Panics if the pattern is invalid. Every caller passes a compile-time
/// constant that is exercised by a unit test.
pub(crate) fn build_re(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .unicode(true)
        .build()
        .unwrap_or_else(|_| panic!("Invalid regex pattern: {pattern}"))
}

/// Build a line-start keyword pattern capturing `keyword` as `kw`
fn keyword_re(keyword: &str) -> Regex {
    build_re(&format!(r"{SOL_STR}(?P<kw>{keyword})\b"))
}

const SOL_STR: &str = r"^\s*"; // Start of line

// ===== STRUCTURAL REGIONS =====

pub static SKIP_START_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}(?P<kw>\[SKIPSTART\])")));
pub static SKIP_END_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}(?P<kw>\[SKIPEND\])")));

// Connection syntax: a line holding a single brace
pub static CONNECT_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}(?P<kw>\{{)\s*$")));
pub static CONNECT_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}(?P<kw>\}})\s*$")));

// ===== BLOCK KEYWORDS =====

// IF/ELSEIF/ELSE/ENDIF
pub static IF_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("IF"));
pub static ELSE_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("ELSEIF|ELSE"));
pub static ENDIF_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("ENDIF"));

// SELECTCASE/CASE/CASEELSE/ENDSELECT
pub static SELECTCASE_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("SELECTCASE"));
pub static CASE_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("CASE(?:ELSE)?"));
pub static ENDSELECT_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("ENDSELECT"));

// FOR/NEXT
pub static FOR_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("FOR"));
pub static NEXT_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("NEXT"));

// WHILE/WEND
pub static WHILE_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("WHILE"));
pub static WEND_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("WEND"));

// DO/LOOP
pub static DO_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("DO"));
pub static LOOP_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("LOOP"));

// REPEAT/REND
pub static REPEAT_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("REPEAT"));
pub static REND_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("REND"));

// TRYCCALL/TRYCGOTO/TRYCJUMP (+FORM) ... CATCH ... ENDCATCH
pub static TRYC_RE: LazyLock<Regex> =
    LazyLock::new(|| keyword_re("TRYC(?:CALL|JUMP|GOTO)(?:FORM)?"));
pub static CATCH_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("CATCH"));
pub static ENDCATCH_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("ENDCATCH"));

// TRYCALLLIST/TRYGOTOLIST/TRYJUMPLIST ... ENDFUNC
pub static TRYLIST_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("TRY(?:CALL|JUMP|GOTO)LIST"));
pub static ENDFUNC_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("ENDFUNC"));

// PRINTDATA (K/D, L/W variants) and STRDATA ... ENDDATA
pub static PRINTDATA_RE: LazyLock<Regex> =
    LazyLock::new(|| keyword_re("PRINTDATA(?:K|D)?(?:L|W)?|STRDATA"));
pub static ENDDATA_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("ENDDATA"));

// DATALIST/ENDLIST
pub static DATALIST_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("DATALIST"));
pub static ENDLIST_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("ENDLIST"));

// Single-line conditional
pub static SIF_RE: LazyLock<Regex> = LazyLock::new(|| keyword_re("SIF"));

// Function header: @NAME, @NAME(ARG), @NAME, ARG
pub static FUNCTION_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}(?P<kw>@[^\s(,;]*)")));

// ===== COMMENTS =====

/// Structural pragma prefix: `;!;` and `;#;` lines are code, not comments
pub static PRAGMA_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"^\s*;[!#];"));

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
        re.captures(line)
            .and_then(|caps| caps.name("kw"))
            .map(|m| m.as_str())
    }

    #[test]
    fn test_all_patterns_compile() {
        let all: [&LazyLock<Regex>; 30] = [
            &SKIP_START_RE,
            &SKIP_END_RE,
            &CONNECT_OPEN_RE,
            &CONNECT_CLOSE_RE,
            &IF_RE,
            &ELSE_RE,
            &ENDIF_RE,
            &SELECTCASE_RE,
            &CASE_RE,
            &ENDSELECT_RE,
            &FOR_RE,
            &NEXT_RE,
            &WHILE_RE,
            &WEND_RE,
            &DO_RE,
            &LOOP_RE,
            &REPEAT_RE,
            &REND_RE,
            &TRYC_RE,
            &CATCH_RE,
            &ENDCATCH_RE,
            &TRYLIST_RE,
            &ENDFUNC_RE,
            &PRINTDATA_RE,
            &ENDDATA_RE,
            &DATALIST_RE,
            &ENDLIST_RE,
            &SIF_RE,
            &FUNCTION_RE,
            &PRAGMA_RE,
        ];
        for re in all {
            assert!(!re.as_str().is_empty());
        }
    }

    #[test]
    fn test_if_family() {
        assert_eq!(keyword(&IF_RE, "IF A == 1"), Some("IF"));
        assert_eq!(keyword(&IF_RE, "  IF(A)"), Some("IF"));
        assert_eq!(keyword(&IF_RE, "ELSEIF A"), None);
        assert_eq!(keyword(&IF_RE, "SIF A"), None);
        assert_eq!(keyword(&IF_RE, "IFX = 1"), None);
        assert_eq!(keyword(&ELSE_RE, "ELSEIF A"), Some("ELSEIF"));
        assert_eq!(keyword(&ELSE_RE, "\tELSE"), Some("ELSE"));
        assert_eq!(keyword(&ENDIF_RE, "ENDIF"), Some("ENDIF"));
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert!(!IF_RE.is_match("if A"));
        assert!(!FOR_RE.is_match("for I, 0, 10"));
    }

    #[test]
    fn test_select_case() {
        assert_eq!(keyword(&SELECTCASE_RE, "SELECTCASE X"), Some("SELECTCASE"));
        assert_eq!(keyword(&CASE_RE, "CASE 1, 2"), Some("CASE"));
        assert_eq!(keyword(&CASE_RE, "CASEELSE"), Some("CASEELSE"));
        assert_eq!(keyword(&ENDSELECT_RE, "ENDSELECT"), Some("ENDSELECT"));
    }

    #[test]
    fn test_try_families() {
        assert_eq!(keyword(&TRYC_RE, "TRYCCALL FOO"), Some("TRYCCALL"));
        assert_eq!(keyword(&TRYC_RE, "TRYCJUMPFORM FOO_%X%"), Some("TRYCJUMPFORM"));
        assert_eq!(keyword(&TRYC_RE, "TRYCALLLIST"), None);
        assert_eq!(keyword(&TRYLIST_RE, "TRYCALLLIST"), Some("TRYCALLLIST"));
        assert_eq!(keyword(&TRYLIST_RE, "TRYGOTOLIST"), Some("TRYGOTOLIST"));
        assert_eq!(keyword(&TRYLIST_RE, "TRYCALL FOO"), None);
    }

    #[test]
    fn test_data_families() {
        assert_eq!(keyword(&PRINTDATA_RE, "PRINTDATA"), Some("PRINTDATA"));
        assert_eq!(keyword(&PRINTDATA_RE, "PRINTDATAL"), Some("PRINTDATAL"));
        assert_eq!(keyword(&PRINTDATA_RE, "PRINTDATAKW"), Some("PRINTDATAKW"));
        assert_eq!(keyword(&PRINTDATA_RE, "STRDATA STR"), Some("STRDATA"));
        assert_eq!(keyword(&DATALIST_RE, "DATALIST"), Some("DATALIST"));
        assert!(!DATALIST_RE.is_match("DATA foo"));
    }

    #[test]
    fn test_structural_regions() {
        assert!(SKIP_START_RE.is_match("[SKIPSTART]"));
        assert!(SKIP_END_RE.is_match("  [SKIPEND]"));
        assert!(CONNECT_OPEN_RE.is_match("{"));
        assert!(CONNECT_OPEN_RE.is_match("  {  "));
        assert!(!CONNECT_OPEN_RE.is_match("{ A"));
        assert!(CONNECT_CLOSE_RE.is_match("\t}"));
    }

    #[test]
    fn test_function_header() {
        assert_eq!(keyword(&FUNCTION_RE, "@SHOP"), Some("@SHOP"));
        assert_eq!(keyword(&FUNCTION_RE, "@FOO(ARG, ARGS)"), Some("@FOO"));
        assert_eq!(keyword(&FUNCTION_RE, "@BAR, ARG"), Some("@BAR"));
        assert!(!FUNCTION_RE.is_match("PRINTL @"));
    }

    #[test]
    fn test_pragma() {
        assert!(PRAGMA_RE.is_match(";!;PRINTL A"));
        assert!(PRAGMA_RE.is_match("  ;#;IF DEBUG"));
        assert!(!PRAGMA_RE.is_match("; comment"));
    }
}
