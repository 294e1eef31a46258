//! Document formatting pipeline
//!
//! Splits a document into lines (keeping each line ending), runs one
//! [`IndentEngine`] pass over them and reassembles the text. A leading UTF-8
//! byte order mark is carried over untouched and is never seen by the engine.

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{bail, Context};

use crate::config::Config;
use crate::diagnostic::Diagnostic;
use crate::directive::{find_directive, DirectiveOverrides};
use crate::format::IndentEngine;
use crate::Result;

const BOM: char = '\u{feff}';

/// Replacement of one whole line, without its line ending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Zero-based line number
    pub line: usize,
    pub new_text: String,
}

/// Inclusive, zero-based range of lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn contains(&self, line: usize) -> bool {
        (self.start..=self.end).contains(&line)
    }
}

/// Parses the 1-based `START:END` form used on the command line
impl FromStr for LineRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (start, end) = s
            .split_once(':')
            .ok_or_else(|| format!("expected START:END, got '{s}'"))?;
        let start: usize = start
            .trim()
            .parse()
            .map_err(|_| format!("invalid start line '{start}'"))?;
        let end: usize = end
            .trim()
            .parse()
            .map_err(|_| format!("invalid end line '{end}'"))?;
        if start == 0 || end == 0 {
            return Err("line numbers start at 1".to_string());
        }
        if start > end {
            return Err(format!("start line {start} is after end line {end}"));
        }
        Ok(Self::new(start - 1, end - 1))
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start + 1, self.end + 1)
    }
}

/// Result of formatting a document
#[derive(Debug, Clone, Default)]
pub struct FormatOutput {
    /// The formatted document
    pub text: String,
    /// One edit per line whose indentation changed
    pub edits: Vec<TextEdit>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FormatOutput {
    #[must_use]
    pub fn is_changed(&self) -> bool {
        !self.edits.is_empty()
    }
}

/// Outcome of [`format_file`]
#[derive(Debug, Clone)]
pub struct FileReport {
    /// The decoded input text, for rendering diagnostics
    pub source: String,
    pub changed: bool,
    /// Formatting was refused because of diagnostics (`skip_on_error`)
    pub skipped: bool,
    pub diagnostics: Vec<Diagnostic>,
    /// In-file directive that was applied, if any
    pub directive: Option<DirectiveOverrides>,
}

/// A physical line and the terminator that followed it
struct SourceLine<'a> {
    text: &'a str,
    ending: &'a str,
}

fn split_bom(source: &str) -> (&str, &str) {
    match source.strip_prefix(BOM) {
        Some(rest) => (&source[..BOM.len_utf8()], rest),
        None => ("", source),
    }
}

/// Split into lines, keeping `\n` / `\r\n` terminators apart from the text
fn split_lines(body: &str) -> Vec<SourceLine<'_>> {
    body.split_inclusive('\n')
        .map(|raw| {
            let content_len = raw
                .strip_suffix("\r\n")
                .or_else(|| raw.strip_suffix('\n'))
                .map_or(raw.len(), str::len);
            let (text, ending) = raw.split_at(content_len);
            SourceLine { text, ending }
        })
        .collect()
}

/// Formatted text of every line plus the diagnostics of the pass
fn indent_lines(lines: &[SourceLine<'_>], config: &Config) -> (Vec<String>, Vec<Diagnostic>) {
    let mut engine = IndentEngine::new(config);
    let formatted = lines
        .iter()
        .enumerate()
        .map(|(idx, line)| engine.format_line(idx, line.text))
        .collect();
    (formatted, engine.finish())
}

/// Build edits for changed lines accepted by `keep`, and the resulting text
fn assemble(
    bom: &str,
    lines: &[SourceLine<'_>],
    formatted: Vec<String>,
    keep: impl Fn(usize) -> bool,
) -> (String, Vec<TextEdit>) {
    let mut text = String::with_capacity(
        bom.len() + lines.iter().map(|l| l.text.len() + 2).sum::<usize>(),
    );
    text.push_str(bom);
    let mut edits = Vec::new();

    for (idx, (line, new_text)) in lines.iter().zip(formatted).enumerate() {
        if new_text != line.text && keep(idx) {
            text.push_str(&new_text);
            edits.push(TextEdit {
                line: idx,
                new_text,
            });
        } else {
            text.push_str(line.text);
        }
        text.push_str(line.ending);
    }

    (text, edits)
}

fn format_filtered(source: &str, config: &Config, keep: impl Fn(usize) -> bool) -> FormatOutput {
    let (bom, body) = split_bom(source);
    let lines = split_lines(body);
    let (formatted, diagnostics) = indent_lines(&lines, config);

    if config.skip_on_error && !diagnostics.is_empty() {
        return FormatOutput {
            text: source.to_string(),
            edits: Vec::new(),
            diagnostics,
        };
    }

    let (text, edits) = assemble(bom, &lines, formatted, keep);
    FormatOutput {
        text,
        edits,
        diagnostics,
    }
}

/// Re-indent a whole document
#[must_use]
pub fn format_document(source: &str, config: &Config) -> FormatOutput {
    format_filtered(source, config, |_| true)
}

/// Re-indent only the lines in `range`
///
/// The whole document is still processed so indentation inside the range
/// reflects the blocks opened before it. Diagnostics cover the whole document.
#[must_use]
pub fn format_range(source: &str, config: &Config, range: LineRange) -> FormatOutput {
    format_filtered(source, config, |line| range.contains(line))
}

/// Collect the structural diagnostics of a document without formatting it
#[must_use]
pub fn check_document(source: &str, config: &Config) -> Vec<Diagnostic> {
    let (_, body) = split_bom(source);
    let mut engine = IndentEngine::new(config);
    for (idx, line) in split_lines(body).iter().enumerate() {
        engine.check_line(idx, line.text);
    }
    engine.finish()
}

/// `config` with the document's in-file directive applied
///
/// Returns the directive alongside so callers can report it.
pub fn effective_config(
    source: &str,
    config: &Config,
) -> Result<(Config, Option<DirectiveOverrides>)> {
    let (_, body) = split_bom(source);
    let Some(directive) = find_directive(body) else {
        return Ok((config.clone(), None));
    };
    let mut effective = config.clone();
    directive.apply_to(&mut effective);
    if let Some(error) = effective.validate() {
        bail!("invalid erafmt directive: {error}");
    }
    Ok((effective, Some(directive)))
}

/// Format one file read from `input`, writing the result to `output`
///
/// The in-file directive, if present, overrides `config`. Input must be UTF-8.
pub fn format_file<R: BufRead, W: Write>(
    mut input: R,
    output: &mut W,
    config: &Config,
    filename: &str,
) -> Result<FileReport> {
    let mut bytes = Vec::new();
    input
        .read_to_end(&mut bytes)
        .with_context(|| format!("failed to read {filename}"))?;
    let source =
        String::from_utf8(bytes).with_context(|| format!("{filename} is not valid UTF-8"))?;

    let (config, directive) =
        effective_config(&source, config).with_context(|| format!("in {filename}"))?;
    let formatted = format_document(&source, &config);
    output.write_all(formatted.text.as_bytes())?;

    let skipped = config.skip_on_error && !formatted.diagnostics.is_empty();
    Ok(FileReport {
        changed: formatted.is_changed(),
        skipped,
        diagnostics: formatted.diagnostics,
        directive,
        source,
    })
}
