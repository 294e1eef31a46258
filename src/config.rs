//! Configuration management for erafmt.
//!
//! This module provides the [`Config`] struct which controls indentation behavior.
//! Configuration can be loaded from:
//! - TOML files (`erafmt.toml`)
//! - CLI arguments (which override file settings)
//! - In-file directives (`;erafmt: --tab-size 2`)
//!
//! Config files are auto-discovered by searching parent directories from the file
//! being formatted up to the filesystem root, plus the user's home directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Config file names to search for (in order of priority, later overrides earlier)
const CONFIG_FILE_NAMES: &[&str] = &["erafmt.toml"];

/// Get the user's home directory
fn dirs_home() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    // Fallback for Windows
    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

// Serde default functions
fn default_tab_size() -> usize {
    4
}
fn default_true() -> bool {
    true
}

/// Main configuration struct for erafmt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Width of one indent level in spaces (default: 4)
    #[serde(default = "default_tab_size")]
    pub tab_size: usize,

    /// Indent with spaces instead of a tab character (default: true)
    #[serde(default = "default_true")]
    pub insert_spaces: bool,

    /// Indent function bodies one level below their `@NAME` header (default: false)
    #[serde(default)]
    pub function_indent: bool,

    /// Scan comment-only lines for block keywords (default: false)
    #[serde(default)]
    pub comment_indent: bool,

    /// Leave a document untouched when it has any diagnostic (default: false)
    #[serde(default)]
    pub skip_on_error: bool,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so we can distinguish between
/// "explicitly set" and "not specified" when merging configs.
#[derive(Debug, Clone, Default, Deserialize)]
struct PartialConfig {
    pub tab_size: Option<usize>,
    pub insert_spaces: Option<bool>,
    pub function_indent: Option<bool>,
    pub comment_indent: Option<bool>,
    pub skip_on_error: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tab_size: 4,
            insert_spaces: true,
            function_indent: false,
            comment_indent: false,
            skip_on_error: false,
        }
    }
}

impl Config {
    /// Maximum reasonable tab size
    const MAX_TAB_SIZE: usize = 16;

    /// Validate configuration values are within reasonable bounds
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.tab_size == 0 {
            return Some("tab_size must be at least 1".to_string());
        }
        if self.tab_size > Self::MAX_TAB_SIZE {
            return Some(format!(
                "tab_size {} exceeds maximum of {}",
                self.tab_size,
                Self::MAX_TAB_SIZE
            ));
        }
        None
    }

    /// One level of indentation: `tab_size` spaces, or a single tab
    #[must_use]
    pub fn indent_unit(&self) -> String {
        if self.insert_spaces {
            " ".repeat(self.tab_size)
        } else {
            "\t".to_string()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let partial: PartialConfig = toml::from_str(&contents)?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(v) = partial.tab_size {
            self.tab_size = v;
        }
        if let Some(v) = partial.insert_spaces {
            self.insert_spaces = v;
        }
        if let Some(v) = partial.function_indent {
            self.function_indent = v;
        }
        if let Some(v) = partial.comment_indent {
            self.comment_indent = v;
        }
        if let Some(v) = partial.skip_on_error {
            self.skip_on_error = v;
        }
    }

    /// Discover config files from parent directories of a given path
    ///
    /// Searches from the file's directory up to the root, then adds home directory config.
    /// Returns list of config file paths in order of priority (least specific first).
    #[must_use]
    pub fn discover_config_files(start_path: &Path) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        // Home directory config first (lowest priority)
        if let Some(home) = dirs_home() {
            for config_name in CONFIG_FILE_NAMES {
                let home_config = home.join(config_name);
                if home_config.is_file() {
                    config_files.push(home_config);
                }
            }
        }

        let start_dir = if start_path.is_file() {
            start_path.parent().map(Path::to_path_buf)
        } else if start_path.is_dir() {
            Some(start_path.to_path_buf())
        } else {
            std::env::current_dir().ok()
        };

        if let Some(dir) = start_dir {
            let mut ancestors: Vec<PathBuf> = dir.ancestors().map(Path::to_path_buf).collect();
            // Root first, so more specific files come later
            ancestors.reverse();

            for ancestor in ancestors {
                for config_name in CONFIG_FILE_NAMES {
                    let config_path = ancestor.join(config_name);
                    if config_path.is_file() && !config_files.contains(&config_path) {
                        config_files.push(config_path);
                    }
                }
            }
        }

        config_files
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Later files override earlier ones (only explicitly set values).
    /// Malformed files are reported on stderr and skipped.
    #[must_use]
    pub fn from_discovered_files(start_path: &Path) -> Self {
        let mut config = Self::default();
        for path in &Self::discover_config_files(start_path) {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => config.apply_partial(&partial),
                    Err(e) => eprintln!("Warning: failed to parse {}: {e}", path.display()),
                },
                Err(e) => eprintln!("Warning: failed to read {}: {e}", path.display()),
            }
        }
        config
    }
}
