//! Command-line interface for erafmt.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Arg, ArgAction, Command};

use crate::process::LineRange;

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Files or directories to format
    pub inputs: Vec<PathBuf>,

    /// Width of one indent level in spaces
    pub tab_size: Option<usize>,

    /// Indent with tab characters
    pub use_tabs: bool,

    /// Indent function bodies below their `@NAME` header
    pub function_indent: bool,

    /// Scan comment-only lines for block keywords
    pub comment_indent: bool,

    /// Leave files with structural diagnostics untouched
    pub skip_on_error: bool,

    /// Output to stdout instead of in-place
    pub stdout: bool,

    /// Show diff without modifying files
    pub diff: bool,

    /// Only report diagnostics and files that would change
    pub check: bool,

    /// Restrict formatting to these lines (single file only)
    pub range: Option<LineRange>,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Recursive directory processing
    pub recursive: bool,

    /// Silent mode (no progress output)
    pub silent: bool,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    pub jobs: Option<usize>,

    /// Exclude patterns for files/directories (glob patterns)
    pub exclude: Vec<String>,

    /// Custom script file extensions (in addition to defaults)
    pub extensions: Vec<String>,

    /// Disable colored diagnostics
    pub no_color: bool,

    /// Enable debug output
    pub debug: bool,
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("erafmt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Indentation formatter and block checker for ERA basic scripts")
        .arg(
            Arg::new("inputs")
                .help("Files or directories to format")
                .value_name("FILE")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("tab-size")
                .short('t')
                .long("tab-size")
                .help("Number of spaces per indent level [default: 4]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("use-tabs")
                .long("use-tabs")
                .help("Indent with tab characters instead of spaces")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("function-indent")
                .long("function-indent")
                .help("Indent function bodies one level below the @NAME header")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("comment-indent")
                .long("comment-indent")
                .help("Treat block keywords in comment lines as structure")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("skip-on-error")
                .long("skip-on-error")
                .help("Leave files with unpaired or missing block keywords unchanged")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("stdout")
                .short('s')
                .long("stdout")
                .help("Output to stdout instead of modifying files in-place")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("diff")
                .short('d')
                .long("diff")
                .help("Show diff without modifying files")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Report diagnostics and files that need formatting; exit 1 if any")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("range")
                .long("range")
                .help("Only re-indent lines START through END (1-based, inclusive)")
                .value_name("START:END")
                .value_parser(LineRange::from_str),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to configuration file (overrides auto-discovery)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .help("Recursively format directories")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .help("Exclude files/directories matching pattern (glob syntax, can be repeated)")
                .value_name("PATTERN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("extension")
                .short('x')
                .long("extension")
                .help("Additional script file extension (can be repeated, e.g., -x txt)")
                .value_name("EXT")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Number of parallel jobs (0=auto, 1=sequential)")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored diagnostics")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug output (shows config, directives, diagnostic counts)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('S')
                .long("silent")
                .help("Silent mode (no progress output, for editor integration)")
                .action(ArgAction::SetTrue),
        )
}

/// Parse CLI arguments from command line
#[must_use]
pub fn parse_args() -> CliArgs {
    args_from_matches(&build_cli().get_matches())
}

/// Parse CLI arguments from an iterator (for testing)
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

/// Convert clap `ArgMatches` to `CliArgs`
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        tab_size: matches.get_one::<usize>("tab-size").copied(),
        use_tabs: matches.get_flag("use-tabs"),
        function_indent: matches.get_flag("function-indent"),
        comment_indent: matches.get_flag("comment-indent"),
        skip_on_error: matches.get_flag("skip-on-error"),
        stdout: matches.get_flag("stdout"),
        diff: matches.get_flag("diff"),
        check: matches.get_flag("check"),
        range: matches.get_one::<LineRange>("range").copied(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        recursive: matches.get_flag("recursive"),
        exclude: matches
            .get_many::<String>("exclude")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        extensions: matches
            .get_many::<String>("extension")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        jobs: matches.get_one::<usize>("jobs").copied(),
        no_color: matches.get_flag("no-color"),
        debug: matches.get_flag("debug"),
        silent: matches.get_flag("silent"),
    }
}
