use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::PaletteKind;
use crate::data::loader::{LoadOptions, DEFAULT_NULL_VALUES};
use crate::data::model::FieldNames;
use crate::view::ViewMode;

pub const DEFAULT_SOURCE_URL: &str =
    "https://vincentarelbundock.github.io/Rdatasets/csv/ggplot2/msleep.csv";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "SourceConfig::default_url")]
    pub url: String,
    #[serde(default = "SourceConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "SourceConfig::default_null_values")]
    pub null_values: Vec<String>,
}

impl SourceConfig {
    fn default_url() -> String {
        DEFAULT_SOURCE_URL.to_string()
    }
    fn default_timeout_secs() -> u64 {
        30
    }
    fn default_null_values() -> Vec<String> {
        DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect()
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            timeout_secs: Self::default_timeout_secs(),
            null_values: Self::default_null_values(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    #[serde(default = "ColumnConfig::default_category")]
    pub category: String,
    #[serde(default = "ColumnConfig::default_size")]
    pub size: String,
    #[serde(default = "ColumnConfig::default_duration")]
    pub duration: String,
}

impl ColumnConfig {
    fn default_category() -> String {
        "vore".to_string()
    }
    fn default_size() -> String {
        "bodywt".to_string()
    }
    fn default_duration() -> String {
        "sleep_total".to_string()
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            category: Self::default_category(),
            size: Self::default_size(),
            duration: Self::default_duration(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliderConfig {
    /// Number of labelled marks under the range control.
    #[serde(default = "SliderConfig::default_marks")]
    pub marks: usize,
    #[serde(default = "SliderConfig::default_step")]
    pub step: f64,
}

impl SliderConfig {
    fn default_marks() -> usize {
        10
    }
    fn default_step() -> f64 {
        0.01
    }
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            marks: Self::default_marks(),
            step: Self::default_step(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub palette: PaletteKind,
    /// Appended to category values in labels (`herbi` → `herbivore`).
    #[serde(default = "DisplayConfig::default_category_suffix")]
    pub category_suffix: String,
    #[serde(default)]
    pub default_tab: ViewMode,
}

impl DisplayConfig {
    fn default_category_suffix() -> String {
        "vore".to_string()
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            palette: PaletteKind::default(),
            category_suffix: Self::default_category_suffix(),
            default_tab: ViewMode::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub columns: ColumnConfig,
    #[serde(default)]
    pub slider: SliderConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Read `path` as TOML. A missing file yields the defaults; an unreadable
    /// or malformed one yields the defaults with a warning.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(cfg) => {
                    log::info!("Loaded config from {}", path.display());
                    cfg
                }
                Err(err) => {
                    log::warn!("Failed to parse config {}: {err}. Using defaults.", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Failed to read config {}: {err}. Using defaults.", path.display());
                Self::default()
            }
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            fields: FieldNames {
                category: self.columns.category.clone(),
                size: self.columns.size.clone(),
                duration: self.columns.duration.clone(),
            },
            null_values: self.source.null_values.clone(),
            timeout: Duration::from_secs(self.source.timeout_secs),
            palette: self.display.palette,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let cfg = AppConfig::load_or_default(Path::new("/no/such/sleepscope.toml"));
        assert_eq!(cfg.source.url, DEFAULT_SOURCE_URL);
        assert_eq!(cfg.slider.marks, 10);
        assert_eq!(cfg.display.default_tab, ViewMode::Table);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[columns]\nsize = \"brainwt\"\n\n[display]\npalette = \"hsl\"\ndefault_tab = \"chart\""
        )
        .unwrap();
        let cfg = AppConfig::load_or_default(file.path());
        assert_eq!(cfg.columns.size, "brainwt");
        assert_eq!(cfg.columns.category, "vore");
        assert_eq!(cfg.display.palette, PaletteKind::Hsl);
        assert_eq!(cfg.display.default_tab, ViewMode::Chart);
        assert_eq!(cfg.source.timeout_secs, 30);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[slider\nmarks = ").unwrap();
        let cfg = AppConfig::load_or_default(file.path());
        assert_eq!(cfg.slider.marks, 10);
    }

    #[test]
    fn test_load_options_follow_config() {
        let mut cfg = AppConfig::default();
        cfg.source.timeout_secs = 5;
        cfg.columns.duration = "sleep_rem".into();
        let opts = cfg.load_options();
        assert_eq!(opts.timeout, Duration::from_secs(5));
        assert_eq!(opts.fields.duration, "sleep_rem");
        assert!(opts.null_values.iter().any(|v| v == "NA"));
    }
}
