//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.demographics.toml` files.

use crate::cli::OutputFormat;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".demographics.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input dataset settings.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Aggregation settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Print the text report to stdout.
    #[serde(default = "default_true")]
    pub print_report: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            print_report: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Input dataset settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path of the delimited-text dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: None,
            delimiter: default_delimiter(),
        }
    }
}

fn default_delimiter() -> char {
    ','
}

impl DatasetConfig {
    /// Returns the delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() {
            bail!(
                "Delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            );
        }
        Ok(self.delimiter as u8)
    }
}

/// Labels and targets used by the aggregation queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Country whose most common occupation is reported.
    #[serde(default = "default_target_country")]
    pub target_country: String,

    /// Education levels counted as higher education.
    #[serde(default = "default_higher_education")]
    pub higher_education: Vec<String>,

    /// Salary bracket counted as rich.
    #[serde(default = "default_rich_label")]
    pub rich_label: String,

    /// The other salary bracket.
    #[serde(default = "default_poor_label")]
    pub poor_label: String,

    /// Sex label whose mean age is reported.
    #[serde(default = "default_male_label")]
    pub male_label: String,

    /// Education label whose share is reported.
    #[serde(default = "default_bachelors_label")]
    pub bachelors_label: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_country: default_target_country(),
            higher_education: default_higher_education(),
            rich_label: default_rich_label(),
            poor_label: default_poor_label(),
            male_label: default_male_label(),
            bachelors_label: default_bachelors_label(),
        }
    }
}

fn default_target_country() -> String {
    "India".to_string()
}

fn default_higher_education() -> Vec<String> {
    vec!["Bachelors", "Masters", "Doctorate"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_rich_label() -> String {
    ">50K".to_string()
}

fn default_poor_label() -> String {
    "<=50K".to_string()
}

fn default_male_label() -> String {
    "Male".to_string()
}

fn default_bachelors_label() -> String {
    "Bachelors".to_string()
}

/// Report output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Format used when writing the report to a file.
    #[serde(default)]
    pub format: OutputFormat,

    /// File the report is written to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load `.demographics.toml` from a directory.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Load the explicit config file if given, else `.demographics.toml`
    /// from `dir`, else defaults. A file that exists but fails to parse is
    /// an error.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        Ok(Self::load_from_dir(dir)
            .with_context(|| format!("Failed to load {}", CONFIG_FILE_NAME))?
            .unwrap_or_default())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.dataset.path = Some(data.clone());
        }

        if let Some(ref country) = args.target_country {
            self.analysis.target_country = country.clone();
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(ref output) = args.output {
            self.report.output = Some(output.clone());
        }

        if args.no_print {
            self.general.print_report = false;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
