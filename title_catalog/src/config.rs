//! Application configuration: TOML file, environment overrides, validation.
//!
//! Every key has a default, so an empty file (or no file at all) is a valid
//! configuration. Precedence, lowest to highest:
//! 1. built-in defaults ([`AppConfig::default`])
//! 2. the TOML file ([`load_config_str`] / [`load_config_path`])
//! 3. environment: `DATABASE_URL`, `TITLE_CATALOG_LOG`, `TITLE_CATALOG_PRECISION`
//!    ([`AppConfig::apply_env`])
//! 4. CLI flags (applied by the binary)
//!
//! ```toml
//! database_url = "sqlite:titles.db"
//! log_level = "info"
//!
//! [load]
//! has_headers = true
//! delimiter = ","
//! duplicate_policy = "keep_first"
//!
//! [normalize]
//! separator = ", "
//! fields = ["country", "genre"]
//!
//! [report]
//! precision = 2
//! min_titles = 10
//! limit = 10
//! ```

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use shared_utils::env::{get_env_var_opt, parse_env_var};

use crate::analytics::MAX_PRECISION;
use crate::loader::{DuplicatePolicy, LoadOptions};
use crate::normalize::{DelimitedField, LIST_SEPARATOR};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// SQLite database path or `sqlite:` URL.
    pub database_url: String,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// CSV loading.
    pub load: LoadCfg,
    /// Normalization.
    pub normalize: NormalizeCfg,
    /// Reports.
    pub report: ReportCfg,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "titles.db".to_string(),
            log_level: "info".to_string(),
            load: LoadCfg::default(),
            normalize: NormalizeCfg::default(),
            report: ReportCfg::default(),
        }
    }
}

/// `[load]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadCfg {
    /// First CSV row is a header.
    pub has_headers: bool,
    /// Single-character field delimiter.
    pub delimiter: String,
    /// Duplicate `show_id` handling.
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for LoadCfg {
    fn default() -> Self {
        Self {
            has_headers: true,
            delimiter: ",".to_string(),
            duplicate_policy: DuplicatePolicy::KeepFirst,
        }
    }
}

impl LoadCfg {
    /// Convert to loader options; the delimiter must be one ASCII character.
    pub fn options(&self) -> anyhow::Result<LoadOptions> {
        Ok(LoadOptions {
            has_headers: self.has_headers,
            delimiter: delimiter_byte(&self.delimiter)?,
        })
    }
}

/// `[normalize]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizeCfg {
    /// List separator inside delimited cells.
    pub separator: String,
    /// Fields normalized by `normalize --field all`.
    pub fields: Vec<DelimitedField>,
}

impl Default for NormalizeCfg {
    fn default() -> Self {
        Self {
            separator: LIST_SEPARATOR.to_string(),
            fields: DelimitedField::ALL.to_vec(),
        }
    }
}

/// `[report]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportCfg {
    /// Decimal places for percentages.
    pub precision: u32,
    /// Minimum titles per entity for share reports.
    pub min_titles: i64,
    /// Row limit for top-N style reports.
    pub limit: i64,
}

impl Default for ReportCfg {
    fn default() -> Self {
        Self {
            precision: 2,
            min_titles: 10,
            limit: 10,
        }
    }
}


fn delimiter_byte(s: &str) -> anyhow::Result<u8> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => bail!("delimiter must be a single ASCII character, got {s:?}"),
    }
}

impl AppConfig {
    /// Check cross-field constraints.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database_url.trim().is_empty() {
            bail!("database_url cannot be empty");
        }
        delimiter_byte(&self.load.delimiter)?;
        if self.normalize.separator.is_empty() {
            bail!("normalize.separator cannot be empty");
        }
        if self.normalize.fields.is_empty() {
            bail!("normalize.fields must name at least one field");
        }
        if self.report.precision > MAX_PRECISION {
            bail!(
                "report.precision must be at most {MAX_PRECISION}, got {}",
                self.report.precision
            );
        }
        if self.report.min_titles < 0 || self.report.limit < 1 {
            bail!("report.min_titles must be >= 0 and report.limit >= 1");
        }
        Ok(())
    }

    /// Override `report.precision` from the command line and re-validate.
    pub fn set_precision(&mut self, precision: u32) -> anyhow::Result<()> {
        self.report.precision = precision;
        self.validate()
    }

    /// Apply environment overrides.
    pub fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Some(url) = get_env_var_opt("DATABASE_URL")? {
            self.database_url = url;
        }
        if let Some(level) = get_env_var_opt("TITLE_CATALOG_LOG")? {
            self.log_level = level;
        }
        if let Some(p) = parse_env_var::<u32>("TITLE_CATALOG_PRECISION")? {
            self.report.precision = p;
        }
        Ok(())
    }
}

/// Parse and validate a configuration from a TOML string.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(toml_str).context("failed to parse config TOML")?;
    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

/// Read a configuration file from disk, parse, and validate it.
pub fn load_config_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<AppConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}
