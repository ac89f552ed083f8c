//! Configuration module for flox-match

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::matcher::StringMatcher;
use crate::precision::SearchPrecision;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Acronym precision level, by setting name
    #[serde(default)]
    pub search_precision: SearchPrecision,

    /// Compare case-insensitively
    #[serde(default = "default_ignore_case")]
    pub ignore_case: bool,

    /// Default item source
    #[serde(default = "default_mode")]
    pub default_mode: String,

    /// Window height in lines
    #[serde(default = "default_height")]
    pub height: u16,

    /// Show border
    #[serde(default = "default_border")]
    pub border: bool,

    /// Maximum number of results shown, 0 for no limit
    #[serde(default)]
    pub max_results: usize,

    /// Custom application directories
    #[serde(default)]
    pub app_dirs: Vec<PathBuf>,

    /// Colors
    #[serde(default)]
    pub colors: Colors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Colors {
    #[serde(default = "default_fg")]
    pub fg: String,

    #[serde(default = "default_bg")]
    pub bg: String,

    #[serde(default = "default_highlight")]
    pub highlight: String,

    #[serde(default = "default_border_color")]
    pub border: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_precision: SearchPrecision::default(),
            ignore_case: default_ignore_case(),
            default_mode: default_mode(),
            height: default_height(),
            border: default_border(),
            max_results: 0,
            app_dirs: Vec::new(),
            colors: Colors::default(),
        }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight: default_highlight(),
            border: default_border_color(),
        }
    }
}

fn default_ignore_case() -> bool {
    true
}

fn default_mode() -> String {
    "apps".to_string()
}

fn default_height() -> u16 {
    40
}

fn default_border() -> bool {
    true
}

fn default_fg() -> String {
    "#eceff4".to_string()
}

fn default_bg() -> String {
    "#2e3440".to_string()
}

fn default_highlight() -> String {
    "#88c0d0".to_string()
}

fn default_border_color() -> String {
    "#4c566a".to_string()
}

impl Config {
    /// Load configuration from an explicit path, the XDG config file, or defaults.
    ///
    /// An explicit path must exist and parse. A broken XDG file is logged and
    /// replaced by defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(p) = path {
            return Self::load_from(p);
        }

        if let Some(config_file) = default_path() {
            if config_file.exists() {
                match Self::load_from(&config_file) {
                    Ok(config) => return Ok(config),
                    Err(e) => warn!("{e}, using defaults"),
                }
            }
        }

        Ok(Self::default())
    }

    /// Read and parse one config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config = toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Matcher built from the configured case rule and precision
    pub fn matcher(&self) -> StringMatcher {
        StringMatcher::new()
            .with_ignore_case(self.ignore_case)
            .with_precision(self.search_precision)
    }
}

/// `$XDG_CONFIG_HOME/flox-match/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("flox-match/config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search_precision, SearchPrecision::Regular);
        assert!(config.ignore_case);
        assert_eq!(config.default_mode, "apps");
        assert_eq!(config.height, 40);
        assert_eq!(config.max_results, 0);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("");
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.search_precision, SearchPrecision::Regular);
        assert_eq!(config.colors.highlight, "#88c0d0");
    }

    #[test]
    fn test_load_precision_and_case() {
        let file = write_config(
            r##"
search_precision = "Low"
ignore_case = false
max_results = 25

[colors]
highlight = "#ff0000"
"##,
        );
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.search_precision, SearchPrecision::Low);
        assert!(!config.ignore_case);
        assert_eq!(config.max_results, 25);
        assert_eq!(config.colors.highlight, "#ff0000");
        assert_eq!(config.colors.fg, "#eceff4");

        let matcher = config.matcher();
        assert_eq!(matcher.precision(), SearchPrecision::Low);
        assert!(!matcher.ignore_case());
    }

    #[test]
    fn test_lowercase_precision_name() {
        let file = write_config("search_precision = \"low\"\n");
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.search_precision, SearchPrecision::Low);

        let file = write_config("search_precision = \"None\"\n");
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.search_precision, SearchPrecision::None);
    }

    #[test]
    fn test_unknown_precision_rejected() {
        let file = write_config("search_precision = \"Extreme\"\n");
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }
}
