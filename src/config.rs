//! freightcalc configuration
//!
//! Loaded from `freightcalc.yaml`:
//!
//! ```yaml
//! rates: rates/2019_import_rates.yaml
//! missing_rate: error
//! report:
//!   directory: /home/me/Desktop
//!   filename: freight_estimate.txt
//!   format: table
//! ```
//!
//! Every field is optional. CLI flags and `FREIGHTCALC_RATES` override the
//! file.

use crate::error::{Error, Result};
use crate::rates::MissingRate;
use crate::report::ReportFormat;
use crate::weight::BufferSchedule;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the working directory
pub const CONFIG_FILE: &str = "freightcalc.yaml";

/// Environment variable overriding the rate table path
pub const RATES_ENV: &str = "FREIGHTCALC_RATES";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "freightcalc Config")]
pub struct FreightConfig {
    /// Rate table file. Relative paths resolve against the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rates: Option<PathBuf>,

    /// Behavior when a weight up to 70 kg has no break row
    #[serde(default)]
    pub missing_rate: MissingRate,

    /// Override of the default cushion schedule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer: Option<BufferSchedule>,

    /// Saved report settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// Where and how the saved report is written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportConfig {
    /// Output directory (default: the user's Desktop)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    #[serde(default = "default_filename")]
    pub filename: String,

    #[serde(default)]
    pub format: ReportFormat,

    #[serde(default = "default_title")]
    pub title: String,
}

fn default_filename() -> String {
    "freight_estimate.txt".to_string()
}

fn default_title() -> String {
    "Freight Estimate".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            filename: default_filename(),
            format: ReportFormat::default(),
            title: default_title(),
        }
    }
}

/// The user's Desktop directory, from `HOME` or `USERPROFILE`
pub fn desktop_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join("Desktop"))
}

impl ReportConfig {
    /// Full path of the report file
    pub fn output_path(&self) -> Result<PathBuf> {
        let dir = match &self.directory {
            Some(dir) => dir.clone(),
            None => desktop_dir().ok_or_else(|| {
                Error::Config("cannot locate the Desktop directory; set report.directory".into())
            })?,
        };
        Ok(dir.join(&self.filename))
    }
}

impl FreightConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: FreightConfig = serde_norway::from_str(yaml)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", CONFIG_FILE, e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, resolving relative paths against its directory
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        let mut config = Self::from_yaml(&content)?;
        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Load `freightcalc.yaml` from `dir` if it exists, otherwise defaults
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    fn rebase(&mut self, base: &Path) {
        if let Some(rates) = self.rates.as_mut().filter(|p| p.is_relative()) {
            *rates = base.join(&*rates);
        }
        if let Some(dir) = self.report.directory.as_mut().filter(|p| p.is_relative()) {
            *dir = base.join(&*dir);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(buffer) = &self.buffer {
            buffer.validate()?;
        }
        if self.report.filename.trim().is_empty() {
            return Err(Error::Config("report.filename must not be empty".into()));
        }
        Ok(())
    }

    /// Apply command-line and environment overrides
    pub fn apply_overrides(
        &mut self,
        rates: Option<PathBuf>,
        env_rates: Option<PathBuf>,
        output_dir: Option<PathBuf>,
    ) {
        if let Some(rates) = rates.or(env_rates) {
            self.rates = Some(rates);
        }
        if let Some(dir) = output_dir {
            self.report.directory = Some(dir);
        }
    }

    pub fn rates_path(&self) -> Result<&Path> {
        self.rates.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "no rate table configured; pass --rates, set {} or add `rates:` to {}",
                RATES_ENV, CONFIG_FILE
            ))
        })
    }

    pub fn buffer_schedule(&self) -> BufferSchedule {
        self.buffer.clone().unwrap_or_default()
    }
}
