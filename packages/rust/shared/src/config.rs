//! Site configuration for Pagesmith.
//!
//! Config lives at `<site root>/pagesmith.toml`. Every section is optional.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PagesmithError, Result};

/// Default configuration file name, looked up in the site root.
pub const CONFIG_FILE_NAME: &str = "pagesmith.toml";

// ---------------------------------------------------------------------------
// Config structs (matching pagesmith.toml schema)
// ---------------------------------------------------------------------------

/// Top-level site config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Where content is read from and pages are written to.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Metadata fetching behaviour.
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// `[paths]` section. All paths are relative to the site root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding `finds.json`, `publications.json`, etc.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Directory of Markdown writing documents.
    #[serde(default = "default_writing_dir")]
    pub writing_dir: String,

    /// Page template used for each Markdown writing.
    #[serde(default = "default_writing_template")]
    pub writing_template: String,

    /// Output directory for generated writing pages.
    #[serde(default = "default_writing_output_dir")]
    pub writing_output_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            writing_dir: default_writing_dir(),
            writing_template: default_writing_template(),
            writing_output_dir: default_writing_output_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "_data".into()
}
fn default_writing_dir() -> String {
    "_data/writing".into()
}
fn default_writing_template() -> String {
    "_templates/writing.html".into()
}
fn default_writing_output_dir() -> String {
    "writing".into()
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Whether to scrape Open Graph metadata at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pause after each network fetch, in ms.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Skip TLS certificate verification for metadata requests only.
    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_timeout_secs(),
            delay_ms: default_delay_ms(),
            accept_invalid_certs: true,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_delay_ms() -> u64 {
    500
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load `pagesmith.toml` from the site root. Returns defaults if the file does not exist.
pub fn load_site_config(root: &Path) -> Result<SiteConfig> {
    let path = root.join(CONFIG_FILE_NAME);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(SiteConfig::default());
    }

    load_config_from(&path)
}

/// Load the site config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<SiteConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PagesmithError::io(path, e))?;

    let config: SiteConfig = toml::from_str(&content).map_err(|e| {
        PagesmithError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    if config.fetch.timeout_secs == 0 {
        return Err(PagesmithError::config(format!(
            "{}: fetch.timeout_secs must be greater than zero",
            path.display()
        )));
    }

    Ok(config)
}

/// Write a default `pagesmith.toml` into the site root.
/// Returns the path to the created file.
pub fn init_config(root: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root).map_err(|e| PagesmithError::io(root, e))?;

    let path = root.join(CONFIG_FILE_NAME);
    let config = SiteConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PagesmithError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PagesmithError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
