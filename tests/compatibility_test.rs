//! Compatibility tests against expected output
//!
//! These tests verify correct formatting by comparing erafmt output
//! against hand-checked files under `tests/fixtures/out`.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs;
use std::io::{BufReader, Cursor};

use erafmt::process::{format_document, format_file};
use erafmt::Config;

/// Run erafmt on input and compare with expected output
fn test_compatibility(input_path: &str, expected_path: &str, config: &Config) {
    let input = fs::read_to_string(input_path)
        .unwrap_or_else(|e| panic!("Failed to read input file {input_path}: {e}"));

    let expected = fs::read_to_string(expected_path)
        .unwrap_or_else(|e| panic!("Failed to read expected file {expected_path}: {e}"));

    let cursor = Cursor::new(input.as_bytes());
    let reader = BufReader::new(cursor);
    let mut output = Vec::new();

    let report = format_file(reader, &mut output, config, input_path)
        .unwrap_or_else(|e| panic!("erafmt failed on {input_path}: {e}"));
    assert!(
        report.diagnostics.is_empty(),
        "unexpected diagnostics in {input_path}: {:?}",
        report.diagnostics
    );

    let result = String::from_utf8(output)
        .unwrap_or_else(|e| panic!("Invalid UTF-8 in output for {input_path}: {e}"));

    // Compare line by line for better error messages
    let result_lines: Vec<&str> = result.lines().collect();
    let expected_lines: Vec<&str> = expected.lines().collect();

    if result_lines.len() != expected_lines.len() {
        eprintln!("=== Line count mismatch for {input_path} ===");
        eprintln!(
            "Expected {} lines, got {} lines",
            expected_lines.len(),
            result_lines.len()
        );
        panic!("Line count mismatch");
    }

    let mut differences = Vec::new();
    for (i, (result_line, expected_line)) in
        result_lines.iter().zip(expected_lines.iter()).enumerate()
    {
        if result_line != expected_line {
            differences.push((i + 1, *expected_line, *result_line));
        }
    }

    if !differences.is_empty() {
        eprintln!("\n=== Differences in {input_path} ===");
        eprintln!("Found {} differences:", differences.len());
        for (line_num, expected, got) in differences.iter().take(10) {
            eprintln!("\nLine {line_num}:");
            eprintln!("  expected: {expected:?}");
            eprintln!("  got:      {got:?}");
        }
        if differences.len() > 10 {
            eprintln!("\n... and {} more differences", differences.len() - 10);
        }
        panic!("{} differences found", differences.len());
    }

    // Formatting the expected output again must be a no-op
    let again = format_document(&expected, config);
    assert!(
        again.edits.is_empty(),
        "{expected_path} is not stable: {:?}",
        again.edits
    );
}

/// Get fixture paths relative to the crate root
fn get_fixture_path(dir: &str, file: &str) -> String {
    format!("{}/tests/fixtures/{dir}/{file}", env!("CARGO_MANIFEST_DIR"))
}

// ============================================================================
// Fixture files
// ============================================================================

/// Every block family with default settings
#[test]
fn test_shop_compatibility() {
    let input = get_fixture_path("in", "SHOP.ERB");
    let expected = get_fixture_path("out", "SHOP.ERB");
    test_compatibility(&input, &expected, &Config::default());
}

/// Skip regions, connection blocks, pragmas and comment lines
#[test]
fn test_regions_compatibility() {
    let input = get_fixture_path("in", "REGIONS.ERB");
    let expected = get_fixture_path("out", "REGIONS.ERB");
    test_compatibility(&input, &expected, &Config::default());
}

/// Tab indentation with function bodies indented
#[test]
fn test_functions_compatibility() {
    let input = get_fixture_path("in", "FUNCTIONS.ERB");
    let expected = get_fixture_path("out", "FUNCTIONS.ERB");
    let config = Config {
        insert_spaces: false,
        function_indent: true,
        ..Default::default()
    };
    test_compatibility(&input, &expected, &config);
}

// ============================================================================
// Individual Feature Tests - Smaller scope for debugging
// ============================================================================

fn format_str(input: &str, config: &Config) -> String {
    let mut output = Vec::new();
    format_file(Cursor::new(input.as_bytes()), &mut output, config, "test.erb").unwrap();
    String::from_utf8(output).unwrap()
}

#[test]
fn test_compat_nested_loops() {
    let input = "FOR I, 0, 2\nFOR J, 0, 2\nPRINTV I*J\nNEXT\nNEXT\n";
    let expected = "FOR I, 0, 2\n    FOR J, 0, 2\n        PRINTV I*J\n    NEXT\nNEXT\n";
    assert_eq!(format_str(input, &Config::default()), expected);
}

#[test]
fn test_compat_tab_size_two() {
    let input = "WHILE 1\nBREAK\nWEND\n";
    let config = Config {
        tab_size: 2,
        ..Default::default()
    };
    assert_eq!(format_str(input, &config), "WHILE 1\n  BREAK\nWEND\n");
}

#[test]
fn test_compat_datalist() {
    let input = "PRINTDATA\nDATALIST\nDATA A\nDATA B\nENDLIST\nENDDATA\n";
    let expected = "PRINTDATA\n    DATALIST\n        DATA A\n        DATA B\n    ENDLIST\nENDDATA\n";
    assert_eq!(format_str(input, &Config::default()), expected);
}

#[test]
fn test_compat_trylist() {
    let input = "TRYCALLLIST\nFUNC A\nFUNC B\nENDFUNC\n";
    let expected = "TRYCALLLIST\n    FUNC A\n    FUNC B\nENDFUNC\n";
    assert_eq!(format_str(input, &Config::default()), expected);
}

#[test]
fn test_compat_comment_indent() {
    let input = "IF A\n;IF B\nX\n;ENDIF\nENDIF\n";
    let config = Config {
        comment_indent: true,
        ..Default::default()
    };
    assert_eq!(
        format_str(input, &config),
        "IF A\n    ;IF B\n        X\n    ;ENDIF\nENDIF\n"
    );
    // Without comment scanning, the commented keywords are ignored
    assert_eq!(
        format_str(input, &Config::default()),
        "IF A\n    ;IF B\n    X\n    ;ENDIF\nENDIF\n"
    );
}

#[test]
fn test_compat_lowercase_is_not_a_keyword() {
    let input = "if A\nX\nendif\n";
    assert_eq!(format_str(input, &Config::default()), input);
}

#[test]
fn test_compat_blank_lines_untouched() {
    let input = "IF A\n\n   \nB\nENDIF\n";
    assert_eq!(
        format_str(input, &Config::default()),
        "IF A\n\n   \n    B\nENDIF\n"
    );
}
