//! Inline directive parsing for `;erafmt:` comments
//!
//! Supports in-file configuration overrides via special comments:
//! `;erafmt: --tab-size 2 --use-tabs`

use std::sync::LazyLock;

use regex::Regex;

use crate::config::Config;
use crate::parser::patterns::build_re;

/// Pattern to match erafmt directives
static ERAFMT_DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"(?i)^\s*;\s*erafmt:\s*(.*?)\s*$"));

/// Parsed directive options that can override config
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectiveOverrides {
    /// Values outside 1..=16 are rejected by config validation.
    pub tab_size: Option<usize>,
    pub insert_spaces: Option<bool>,
    pub function_indent: Option<bool>,
    pub comment_indent: Option<bool>,
}

impl DirectiveOverrides {
    /// Check if any overrides are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tab_size.is_none()
            && self.insert_spaces.is_none()
            && self.function_indent.is_none()
            && self.comment_indent.is_none()
    }

    /// Override the fields of `config` that this directive sets
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(v) = self.tab_size {
            config.tab_size = v;
        }
        if let Some(v) = self.insert_spaces {
            config.insert_spaces = v;
        }
        if let Some(v) = self.function_indent {
            config.function_indent = v;
        }
        if let Some(v) = self.comment_indent {
            config.comment_indent = v;
        }
    }
}

/// Check if a line contains an erafmt directive
#[must_use]
pub fn is_directive_line(line: &str) -> bool {
    ERAFMT_DIRECTIVE_RE.is_match(line)
}

/// Parse an erafmt directive line and return option overrides
///
/// # Returns
/// * `Some(DirectiveOverrides)` if the line is a directive with at least one known option
/// * `None` otherwise
#[must_use]
pub fn parse_directive(line: &str) -> Option<DirectiveOverrides> {
    let caps = ERAFMT_DIRECTIVE_RE.captures(line)?;
    let args_str = caps.get(1)?.as_str();
    parse_directive_args(args_str)
}

/// Parse directive arguments into overrides
fn parse_directive_args(args_str: &str) -> Option<DirectiveOverrides> {
    let mut overrides = DirectiveOverrides::default();
    let mut tokens = args_str.split_whitespace();

    while let Some(token) = tokens.next() {
        match token {
            "-t" | "--tab-size" => {
                overrides.tab_size = tokens.next().and_then(|v| v.parse().ok());
            }
            "--use-tabs" => overrides.insert_spaces = Some(false),
            "--use-spaces" => overrides.insert_spaces = Some(true),
            "--function-indent" => overrides.function_indent = Some(true),
            "--no-function-indent" => overrides.function_indent = Some(false),
            "--comment-indent" => overrides.comment_indent = Some(true),
            "--no-comment-indent" => overrides.comment_indent = Some(false),
            _ => {
                // Unknown option, skip
            }
        }
    }

    if overrides.is_empty() {
        None
    } else {
        Some(overrides)
    }
}

/// Scan a document for erafmt directives and return the first found
///
/// Only the first directive line is used (subsequent ones are ignored).
#[must_use]
pub fn find_directive(source: &str) -> Option<DirectiveOverrides> {
    source
        .lines()
        .find(|line| is_directive_line(line))
        .and_then(parse_directive)
}
