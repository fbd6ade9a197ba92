//! Configuration for the checker
//!
//! Reads configuration from:
//! - `.waylintrc.yaml` / `.waylintrc.json` or `waylint.yaml` (project-level)
//! - the same names in the home directory (user-level)
//! - built-in presets named in `extends`

use crate::diagnostic::Style;
use crate::rule::Topic;
use crate::thresholds::{ThresholdOverrides, Thresholds};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default number of features evaluated per parallel batch
pub const DEFAULT_BATCH_SIZE: usize = 4096;

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Enable parallel processing
    pub parallel: bool,

    /// Number of parallel jobs (0 = auto-detect)
    pub jobs: usize,

    /// Features pulled from the source per batch
    pub batch_size: usize,

    /// Collect per-rule timing statistics
    pub timing: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            jobs: 0,
            batch_size: DEFAULT_BATCH_SIZE,
            timing: false,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,

    /// Color mode
    pub color: ColorMode,

    /// Verbose output
    pub verbose: bool,

    /// Show statistics
    pub statistics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: ColorMode::Auto,
            verbose: false,
            statistics: true,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored console lines
    #[default]
    Text,
    /// GeoJSON feature per line
    Json,
    /// SQLite database, one table per layer
    Sqlite,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" | "geojson" | "ndjson" => Ok(OutputFormat::Json),
            "sqlite" | "db" => Ok(OutputFormat::Sqlite),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Color mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Rule configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Disabled rules
    pub disabled: Vec<String>,

    /// Enabled rules (empty = all)
    pub enabled: Vec<String>,

    /// Select rules by id prefix (e.g., "ref-" selects all road number rules)
    pub extend: Vec<String>,

    /// Ignore rules by id prefix
    pub ignore: Vec<String>,

    /// Style overrides (rule_id -> style)
    pub style: HashMap<String, Style>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extend from other configuration files or presets
    pub extends: Vec<String>,

    /// Engine settings
    pub engine: EngineConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Rule configuration
    pub rules: RulesConfig,

    /// Rule topics to run (empty = all)
    pub topics: Vec<Topic>,

    /// Plausibility bounds for numeric tags; unset ones keep their defaults
    pub thresholds: ThresholdOverrides,
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a preset configuration by name
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::preset_recommended()),
            "lenient" => Some(Self::preset_lenient()),
            "minimal" => Some(Self::preset_minimal()),
            _ => None,
        }
    }

    /// Recommended preset - every rule, default styles
    fn preset_recommended() -> Self {
        Self::default()
    }

    /// Lenient preset - policy findings reported as advisory
    fn preset_lenient() -> Self {
        let mut config = Self::default();
        for rule_id in ["public-restrictive-access", "access-not-conform", "goods-not-used"] {
            config
                .rules
                .style
                .insert(rule_id.to_string(), Style::Redundant);
        }
        config
    }

    /// Minimal preset - only hard data errors
    fn preset_minimal() -> Self {
        Self {
            topics: vec![
                Topic::Reference,
                Topic::Speed,
                Topic::Dimensions,
                Topic::Lanes,
                Topic::Structure,
            ],
            ..Self::default()
        }
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_depth(path, 0)
    }

    /// Load with recursion depth limit (to prevent infinite loops)
    fn load_with_depth(path: &Path, depth: usize) -> Result<Self, ConfigError> {
        const MAX_DEPTH: usize = 10;
        if depth >= MAX_DEPTH {
            return Err(ConfigError::Invalid(
                "Maximum config inheritance depth exceeded".to_string(),
            ));
        }

        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let mut config: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown config file format: {}",
                    ext
                )))
            }
        };

        if !config.extends.is_empty() {
            let base_dir = path.parent().unwrap_or(Path::new("."));
            let mut base_config = Self::default();

            for extend in &config.extends.clone() {
                let extended = if let Some(preset) = Self::preset(extend) {
                    preset
                } else {
                    let extend_path = if Path::new(extend).is_absolute() {
                        PathBuf::from(extend)
                    } else {
                        base_dir.join(extend)
                    };
                    Self::load_with_depth(&extend_path, depth + 1)?
                };
                base_config.merge(extended);
            }

            // Current file wins over everything it extends
            base_config.merge(config);
            config = base_config;
        }

        config
            .resolved_thresholds()
            .validate()
            .map_err(ConfigError::Invalid)?;

        Ok(config)
    }

    /// Bounds in effect after filling unset ones from the defaults
    pub fn resolved_thresholds(&self) -> Thresholds {
        self.thresholds.resolve()
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Self) {
        // Extends are not inherited

        if other.engine.jobs != 0 {
            self.engine.jobs = other.engine.jobs;
        }
        self.engine.parallel = other.engine.parallel;
        if other.engine.batch_size != DEFAULT_BATCH_SIZE {
            self.engine.batch_size = other.engine.batch_size;
        }
        if other.engine.timing {
            self.engine.timing = true;
        }

        if other.output.format != OutputFormat::Text {
            self.output.format = other.output.format;
        }
        if other.output.verbose {
            self.output.verbose = true;
        }
        if other.output.color != ColorMode::Auto {
            self.output.color = other.output.color;
        }
        if !other.output.statistics {
            self.output.statistics = false;
        }

        self.rules.disabled.extend(other.rules.disabled);
        if !other.rules.enabled.is_empty() {
            self.rules.enabled = other.rules.enabled;
        }
        self.rules.extend.extend(other.rules.extend);
        self.rules.ignore.extend(other.rules.ignore);
        self.rules.style.extend(other.rules.style);

        if !other.topics.is_empty() {
            self.topics = other.topics;
        }

        self.thresholds.merge(&other.thresholds);
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_names = [
            ".waylintrc.yaml",
            ".waylintrc.yml",
            ".waylintrc.json",
            "waylint.yaml",
            "waylint.yml",
            "waylint.json",
        ];

        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                log::info!("Using configuration {}", path.display());
                return Self::load(&path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            for name in &config_names {
                let path = home.join(name);
                if path.exists() {
                    log::info!("Using configuration {}", path.display());
                    return Self::load(&path);
                }
            }
        }

        Ok(Self::default())
    }

    /// Merge CLI arguments into configuration
    pub fn merge_cli(
        &mut self,
        format: Option<OutputFormat>,
        jobs: Option<usize>,
        disabled_rules: Option<Vec<String>>,
        enabled_rules: Option<Vec<String>>,
        topics: Option<Vec<Topic>>,
    ) {
        if let Some(f) = format {
            self.output.format = f;
        }
        if let Some(j) = jobs {
            self.engine.jobs = j;
        }
        if let Some(disabled) = disabled_rules {
            self.rules.disabled.extend(disabled);
        }
        if let Some(enabled) = enabled_rules {
            self.rules.enabled = enabled;
        }
        if let Some(topics) = topics {
            self.topics = topics;
        }
    }

    /// Add prefixes to extend (select rules by prefix)
    pub fn add_extend_prefixes(&mut self, prefixes: Vec<String>) {
        self.rules.extend.extend(prefixes);
    }

    /// Add prefixes to ignore
    pub fn add_ignore_prefixes(&mut self, prefixes: Vec<String>) {
        self.rules.ignore.extend(prefixes);
    }

    /// Check if a rule is enabled
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        if self.rules.disabled.iter().any(|id| id == rule_id) {
            return false;
        }

        // Prefixes match case-insensitively
        let rule_lower = rule_id.to_lowercase();
        if self
            .rules
            .ignore
            .iter()
            .any(|prefix| rule_lower.starts_with(&prefix.to_lowercase()))
        {
            return false;
        }

        if !self.rules.enabled.is_empty() {
            return self.rules.enabled.iter().any(|id| id == rule_id);
        }

        if !self.rules.extend.is_empty() {
            return self
                .rules
                .extend
                .iter()
                .any(|prefix| rule_lower.starts_with(&prefix.to_lowercase()));
        }

        true
    }

    /// Check if a topic is selected
    pub fn is_topic_enabled(&self, topic: Topic) -> bool {
        self.topics.is_empty() || self.topics.contains(&topic)
    }

    /// Get style override for a rule
    pub fn get_style_override(&self, rule_id: &str) -> Option<Style> {
        self.rules.style.get(rule_id).copied()
    }

    /// Every rule id the configuration names explicitly
    pub fn referenced_rule_ids(&self) -> impl Iterator<Item = &str> {
        self.rules
            .disabled
            .iter()
            .chain(self.rules.enabled.iter())
            .chain(self.rules.style.keys())
            .map(String::as_str)
    }
}
