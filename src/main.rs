//! erafmt - Indentation formatter and block checker for ERA basic scripts

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs::File;
use std::io::{self, BufReader, Cursor, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use erafmt::process::{effective_config, format_file, format_range, FileReport};
use erafmt::{parse_args, CliArgs, Config, Diagnostic, Result};
use glob::Pattern;
use rayon::prelude::*;
use similar::TextDiff;
use walkdir::WalkDir;

/// ERA basic script extensions to process (compared case-insensitively)
const SCRIPT_EXTENSIONS: &[&str] = &["erb", "erh"];

/// Default maximum file size in bytes (100 MB)
/// Files larger than this are skipped to prevent memory exhaustion
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Name used for diagnostics and diffs of piped input
const STDIN_NAME: &str = "<stdin>";

/// A processed document, ready to be reported
struct FileOutcome {
    report: FileReport,
    formatted: String,
}

/// Totals over every processed input
#[derive(Default)]
struct Summary {
    processed: usize,
    changed: usize,
    diagnostics: usize,
    errors: usize,
}

fn main() -> Result<()> {
    let args = parse_args();

    let use_stdin =
        args.inputs.is_empty() || (args.inputs.len() == 1 && args.inputs[0].as_os_str() == "-");

    // No inputs and running interactively: print usage instead of waiting on stdin
    if args.inputs.is_empty() && io::stdin().is_terminal() {
        print_usage();
        return Ok(());
    }

    if use_stdin {
        let config = build_config(&args, None)?;
        let summary = process_stdin(&config, &args)?;
        exit_for(&summary, &args);
        return Ok(());
    }

    if args.range.is_some() && (args.inputs.len() != 1 || !args.inputs[0].is_file()) {
        anyhow::bail!("--range requires exactly one input file");
    }

    // An explicit config file applies to every input; otherwise each file
    // discovers its own
    let base_config = if args.config.is_some() {
        Some(build_config(&args, None)?)
    } else {
        None
    };

    if let Some(jobs) = args.jobs {
        if jobs > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
            {
                eprintln!("Warning: failed to configure thread pool: {e}");
            }
        }
    }

    let files = collect_files(&args);

    if files.is_empty() {
        if !args.silent {
            eprintln!("No ERA basic files found to format.");
        }
        return Ok(());
    }

    let results: Vec<(PathBuf, Result<Option<FileOutcome>>)> = if args.jobs == Some(1) {
        files
            .iter()
            .map(|path| (path.clone(), process_path(path, base_config.as_ref(), &args)))
            .collect()
    } else {
        files
            .par_iter()
            .map(|path| (path.clone(), process_path(path, base_config.as_ref(), &args)))
            .collect()
    };

    // Report in input order once every file is done, so output never interleaves
    let mut summary = Summary::default();
    for (path, result) in results {
        match result {
            Ok(Some(outcome)) => {
                report_outcome(&path.display().to_string(), &outcome, &args, &mut summary)?;
            }
            Ok(None) => {}
            Err(e) => {
                summary.errors += 1;
                eprintln!("Error formatting {}: {e:#}", path.display());
            }
        }
    }

    print_summary(&summary, &args);
    exit_for(&summary, &args);
    Ok(())
}

/// Build configuration from CLI args and optional config file
///
/// If `for_path` is provided and no explicit config file is specified,
/// uses auto-discovery to find config files in parent directories.
fn build_config(args: &CliArgs, for_path: Option<&Path>) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        if args.debug {
            eprintln!(
                "[DEBUG] Using explicit config file: {}",
                config_path.display()
            );
        }
        Config::from_toml_file(config_path)?
    } else {
        let start = match for_path {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir().unwrap_or_default(),
        };
        if args.debug {
            let discovered = Config::discover_config_files(&start);
            if discovered.is_empty() {
                eprintln!("[DEBUG] No config files discovered for: {}", start.display());
            } else {
                eprintln!("[DEBUG] Discovered config files for {}:", start.display());
                for f in &discovered {
                    eprintln!("[DEBUG]   - {}", f.display());
                }
            }
        }
        Config::from_discovered_files(&start)
    };

    // Override with CLI arguments
    if let Some(tab_size) = args.tab_size {
        config.tab_size = tab_size;
    }
    if args.use_tabs {
        config.insert_spaces = false;
    }
    if args.function_indent {
        config.function_indent = true;
    }
    if args.comment_indent {
        config.comment_indent = true;
    }
    if args.skip_on_error {
        config.skip_on_error = true;
    }

    if args.debug {
        print_config_debug(&config);
    }

    if let Some(error) = config.validate() {
        anyhow::bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

/// Print configuration values in debug mode
fn print_config_debug(config: &Config) {
    eprintln!("[DEBUG] Configuration:");
    eprintln!("[DEBUG]   tab_size: {}", config.tab_size);
    eprintln!("[DEBUG]   insert_spaces: {}", config.insert_spaces);
    eprintln!("[DEBUG]   function_indent: {}", config.function_indent);
    eprintln!("[DEBUG]   comment_indent: {}", config.comment_indent);
    eprintln!("[DEBUG]   skip_on_error: {}", config.skip_on_error);
}

/// Collect all files to process, handling directories and recursive flag
fn collect_files(args: &CliArgs) -> Vec<PathBuf> {
    let exclude_patterns: Vec<Pattern> = args
        .exclude
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();

    let custom_extensions = &args.extensions;

    let mut files = Vec::new();

    for input in &args.inputs {
        if input.is_file() {
            if !is_excluded(input, &exclude_patterns) {
                files.push(input.clone());
            }
        } else if input.is_dir() {
            if args.recursive {
                // WalkDir reports symlink loops as errors; those entries are skipped
                for entry in WalkDir::new(input)
                    .follow_links(true)
                    .max_depth(256)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(std::result::Result::ok)
                {
                    let path = entry.path();
                    if path.is_file()
                        && is_script_file(path, custom_extensions)
                        && !is_excluded(path, &exclude_patterns)
                    {
                        files.push(path.to_path_buf());
                    }
                }
            } else if let Ok(entries) = std::fs::read_dir(input) {
                let mut direct: Vec<PathBuf> = entries
                    .filter_map(std::result::Result::ok)
                    .map(|entry| entry.path())
                    .filter(|path| {
                        path.is_file()
                            && is_script_file(path, custom_extensions)
                            && !is_excluded(path, &exclude_patterns)
                    })
                    .collect();
                direct.sort();
                files.append(&mut direct);
            }
        } else {
            eprintln!("Warning: {} does not exist", input.display());
        }
    }

    files
}

/// Check if a path matches any exclusion pattern
fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy();

    for pattern in patterns {
        if pattern.matches(&path_str) {
            return true;
        }

        if let Some(file_name) = path.file_name() {
            if pattern.matches(&file_name.to_string_lossy()) {
                return true;
            }
        }

        // Directory patterns match any path component
        for component in path.components() {
            if let std::path::Component::Normal(c) = component {
                if pattern.matches(&c.to_string_lossy()) {
                    return true;
                }
            }
        }
    }

    false
}

/// Check if a file has a script extension
/// Checks against both default extensions and any custom extensions provided
fn is_script_file(path: &Path, custom_extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SCRIPT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
                || custom_extensions.iter().any(|custom| {
                    let custom_ext = custom.strip_prefix('.').unwrap_or(custom);
                    ext.eq_ignore_ascii_case(custom_ext)
                })
        })
}

/// Format one file from disk; `None` when the file was skipped
fn process_path(
    path: &Path,
    base_config: Option<&Config>,
    args: &CliArgs,
) -> Result<Option<FileOutcome>> {
    let metadata = std::fs::metadata(path)?;
    let file_size = metadata.len();
    if file_size > DEFAULT_MAX_FILE_SIZE {
        if !args.silent {
            eprintln!(
                "Skipping {} ({} MB exceeds limit of {} MB)",
                path.display(),
                file_size / (1024 * 1024),
                DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
            );
        }
        return Ok(None);
    }

    let config = match base_config {
        Some(config) => config.clone(),
        None => build_config(args, Some(path))?,
    };

    let mut contents = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut contents)?;

    let name = path.display().to_string();
    let outcome = format_source(&contents, &name, &config, args)?;

    if !args.stdout && !args.diff && !args.check && outcome.report.changed {
        std::fs::write(path, outcome.formatted.as_bytes())?;
    }

    Ok(Some(outcome))
}

/// Format an in-memory document, honoring `--range`
fn format_source(
    contents: &[u8],
    name: &str,
    config: &Config,
    args: &CliArgs,
) -> Result<FileOutcome> {
    let Some(range) = args.range else {
        let mut output = Vec::new();
        let report = format_file(Cursor::new(contents), &mut output, config, name)?;
        let formatted = String::from_utf8(output)?;
        return Ok(FileOutcome { report, formatted });
    };

    let source = std::str::from_utf8(contents)
        .map_err(|e| anyhow::anyhow!("{name} is not valid UTF-8: {e}"))?
        .to_string();
    let (config, directive) = effective_config(&source, config)?;
    let output = format_range(&source, &config, range);
    let skipped = config.skip_on_error && !output.diagnostics.is_empty();
    Ok(FileOutcome {
        report: FileReport {
            changed: output.is_changed(),
            skipped,
            diagnostics: output.diagnostics,
            directive,
            source,
        },
        formatted: output.text,
    })
}

/// Print diagnostics, output and diffs for one document
fn report_outcome(
    name: &str,
    outcome: &FileOutcome,
    args: &CliArgs,
    summary: &mut Summary,
) -> Result<()> {
    let report = &outcome.report;
    summary.processed += 1;
    summary.diagnostics += report.diagnostics.len();
    if report.changed {
        summary.changed += 1;
    }

    if args.debug {
        if let Some(directive) = &report.directive {
            eprintln!("[DEBUG] Found file directive in {name}: {directive:?}");
        }
        eprintln!(
            "[DEBUG] {name}: {} diagnostics, changed: {}",
            report.diagnostics.len(),
            report.changed
        );
    }

    if !args.silent || args.check {
        render_diagnostics(name, &report.source, &report.diagnostics, args);
    }
    if report.skipped && !args.silent {
        eprintln!(
            "Skipping {name}: {} structural problems (skip_on_error)",
            report.diagnostics.len()
        );
    }

    if args.check {
        if report.changed {
            println!("Would reformat: {name}");
        }
    } else if args.diff {
        if report.changed {
            let diff = TextDiff::from_lines(report.source.as_str(), outcome.formatted.as_str());
            let unified = diff
                .unified_diff()
                .context_radius(3)
                .header(&format!("a/{name}"), &format!("b/{name}"))
                .to_string();
            io::stdout().write_all(unified.as_bytes())?;
        }
    } else if args.stdout || name == STDIN_NAME {
        io::stdout().write_all(outcome.formatted.as_bytes())?;
    } else if report.changed && !args.silent {
        eprintln!("Formatted: {name}");
    }

    Ok(())
}

/// Render diagnostics with a snippet of the offending line
fn render_diagnostics(name: &str, source: &str, diagnostics: &[Diagnostic], args: &CliArgs) {
    if diagnostics.is_empty() {
        return;
    }
    let color_choice = if args.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(name.to_string(), source.to_string());
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    for diagnostic in diagnostics {
        let rendered = diagnostic.to_codespan(file_id, source);
        if term::emit_to_write_style(&mut writer.lock(), &config, &files, &rendered).is_err() {
            eprintln!("{name}:{diagnostic}");
        }
    }
}

/// Process input from stdin, output to stdout
fn process_stdin(config: &Config, args: &CliArgs) -> Result<Summary> {
    let mut stdin_contents = Vec::new();
    io::stdin().read_to_end(&mut stdin_contents)?;

    let stdin_size = u64::try_from(stdin_contents.len()).unwrap_or(u64::MAX);
    if stdin_size > DEFAULT_MAX_FILE_SIZE {
        anyhow::bail!(
            "stdin input too large ({} MB exceeds limit of {} MB)",
            stdin_size / (1024 * 1024),
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        );
    }

    let outcome = format_source(&stdin_contents, STDIN_NAME, config, args)?;
    let mut summary = Summary::default();
    report_outcome(STDIN_NAME, &outcome, args, &mut summary)?;
    Ok(summary)
}

fn print_summary(summary: &Summary, args: &CliArgs) {
    if args.silent {
        return;
    }
    if args.check {
        eprintln!(
            "Checked {} files: {} would be reformatted, {} diagnostics, {} errors.",
            summary.processed, summary.changed, summary.diagnostics, summary.errors
        );
    } else if summary.errors == 0 {
        eprintln!(
            "Processed {} files ({} changed) successfully.",
            summary.processed, summary.changed
        );
    } else {
        eprintln!(
            "Processed {} files ({} changed), {} errors.",
            summary.processed, summary.changed, summary.errors
        );
    }
}

/// `--check` fails when anything needs attention
fn exit_for(summary: &Summary, args: &CliArgs) {
    if args.check && (summary.changed > 0 || summary.diagnostics > 0 || summary.errors > 0) {
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        "erafmt v{} - ERA basic indentation formatter",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Usage:");
    println!("  erafmt [OPTIONS] <FILE>...");
    println!("  erafmt [OPTIONS] -r <DIRECTORY>");
    println!("  erafmt [OPTIONS] -              # Read from stdin");
    println!("  cat SHOP.ERB | erafmt           # Pipe input");
    println!();
    println!("Examples:");
    println!("  erafmt SHOP.ERB                 # Format single file in-place");
    println!("  erafmt -r ERB/                  # Recursively format directory");
    println!("  erafmt --check -r ERB/          # Report problems, exit 1 if any");
    println!("  erafmt -d SHOP.ERB              # Show unified diff");
    println!("  erafmt --range 10:40 SHOP.ERB   # Re-indent lines 10 to 40 only");
    println!("  erafmt -t 2 --use-tabs SHOP.ERB # Tabs, 2-column tab size");
    println!();
    println!("Options:");
    println!("  -t, --tab-size <NUM>            Indent width [default: 4]");
    println!("      --use-tabs                  Indent with tab characters");
    println!("      --function-indent           Indent function bodies below @NAME");
    println!("      --comment-indent            Scan comment lines for block keywords");
    println!("      --skip-on-error             Leave files with block errors unchanged");
    println!("  -s, --stdout                    Output to stdout");
    println!("  -d, --diff                      Show diff");
    println!("      --check                     Check only; exit 1 on problems");
    println!("      --range <START:END>         Restrict formatting to a line range");
    println!("  -c, --config <FILE>             Config file path (overrides auto-discovery)");
    println!("  -r, --recursive                 Process directories recursively");
    println!("  -e, --exclude <PATTERN>         Exclude files/dirs matching pattern (repeatable)");
    println!("  -x, --extension <EXT>           Additional script extension (repeatable)");
    println!("  -j, --jobs <NUM>                Parallel jobs (0=auto, 1=sequential)");
    println!("      --no-color                  Disable colored diagnostics");
    println!("  -D, --debug                     Enable debug output");
    println!("  -S, --silent                    Silent mode");
    println!("  -h, --help                      Print help");
    println!();
    println!("Supported extensions: .erb, .erh (case-insensitive)");
    println!();
    println!("Config file auto-discovery:");
    println!("  Searches for erafmt.toml in parent directories");
    println!("  starting from the file being formatted up to the root directory.");
    println!("  Also checks erafmt.toml in the home directory.");
    println!("  More specific configs (closer to file) override less specific ones.");
}
