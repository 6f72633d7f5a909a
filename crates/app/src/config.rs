//! Runtime configuration.

use std::path::PathBuf;

/// Environment variable holding the catalog path or URL.
pub const CATALOG_VAR: &str = "STOCKTAKE_CATALOG";
/// Environment variable holding the export directory.
pub const EXPORT_DIR_VAR: &str = "STOCKTAKE_EXPORT_DIR";

const DEFAULT_CATALOG: &str = "data.csv";
const DEFAULT_EXPORT_DIR: &str = ".";

/// Where the catalog listing is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLocation {
    File(PathBuf),
    Url(String),
}

impl CatalogLocation {
    /// `http://` and `https://` values are URLs; anything else is a path.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            CatalogLocation::Url(value.to_string())
        } else {
            CatalogLocation::File(PathBuf::from(value))
        }
    }
}

impl core::fmt::Display for CatalogLocation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CatalogLocation::File(path) => write!(f, "{}", path.display()),
            CatalogLocation::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub catalog: CatalogLocation,
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogLocation::parse(DEFAULT_CATALOG),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; unset or blank values fall back to
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let catalog = match get(CATALOG_VAR) {
            Some(value) => CatalogLocation::parse(&value),
            None => {
                tracing::warn!("{CATALOG_VAR} not set; using {DEFAULT_CATALOG}");
                CatalogLocation::parse(DEFAULT_CATALOG)
            }
        };

        let export_dir = get(EXPORT_DIR_VAR).map(PathBuf::from).unwrap_or_else(|| {
            tracing::debug!("{EXPORT_DIR_VAR} not set; exporting to the working directory");
            PathBuf::from(DEFAULT_EXPORT_DIR)
        });

        Self { catalog, export_dir }
    }
}
