//! Polygon credentials loading
//!
//! Credentials live in a TOML file next to the invocation, by default
//! `polygon.toml`:
//!
//! ```toml
//! [polygon]
//! key = "your-api-key"
//! secret = "your-api-secret"
//! # base_url = "https://polygon.codeforces.com/api"
//! ```
//!
//! The file is deliberately separate from the statement inputs so it can be
//! kept out of version control.

use std::path::Path;

use serde::Deserialize;

use crate::error::PolygonError;

/// Default API endpoint
const DEFAULT_BASE_URL: &str = "https://polygon.codeforces.com/api";

/// Contents of the `[polygon]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PolygonConfig {
    /// API key
    pub key: String,
    /// API secret used for request signing
    pub secret: String,
    /// API endpoint, overridable for mirrors
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    polygon: PolygonConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Load credentials from a TOML file.
pub fn load_config(path: &Path) -> Result<PolygonConfig, PolygonError> {
    let raw = std::fs::read_to_string(path).map_err(|err| {
        PolygonError::Config(format!(
            "cannot read credentials file '{}': {}",
            path.display(),
            err
        ))
    })?;
    let file: ConfigFile = toml::from_str(&raw).map_err(|err| {
        PolygonError::Config(format!(
            "credentials file '{}' must contain a [polygon] section with key and secret: {}",
            path.display(),
            err
        ))
    })?;
    Ok(file.polygon)
}
