//! One-shot catalog loading.
//!
//! Fetching the listing is the only operation that can fail. A failure is
//! logged and the application continues with an empty catalog.

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;

use stocktake_catalog::{parse_catalog, Catalog, CategoryRules};

use crate::config::CatalogLocation;

/// Source of the raw catalog listing.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the whole listing as text.
    async fn fetch(&self) -> anyhow::Result<String>;

    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
}

/// Listing stored on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    async fn fetch(&self) -> anyhow::Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read catalog at {:?}", self.path))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Listing served over HTTP next to the application.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
}

#[cfg(feature = "http")]
impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl CatalogSource for HttpSource {
    async fn fetch(&self) -> anyhow::Result<String> {
        let response = reqwest::get(&self.url)
            .await
            .with_context(|| format!("failed to fetch catalog from {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("catalog request to {} returned {status}", self.url);
        }

        response
            .text()
            .await
            .with_context(|| format!("failed to read catalog body from {}", self.url))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Pick the source for a configured location.
///
/// URLs need the `http` feature; without it this returns an error.
pub fn source_for(location: &CatalogLocation) -> anyhow::Result<Box<dyn CatalogSource>> {
    match location {
        CatalogLocation::File(path) => Ok(Box::new(FileSource::new(path.clone()))),
        #[cfg(feature = "http")]
        CatalogLocation::Url(url) => Ok(Box::new(HttpSource::new(url.clone()))),
        #[cfg(not(feature = "http"))]
        CatalogLocation::Url(url) => {
            anyhow::bail!("cannot fetch {url}: built without the `http` feature")
        }
    }
}

/// Fetch and parse the catalog. Never fails: errors are logged and an empty
/// catalog is returned.
pub async fn load_catalog(source: &dyn CatalogSource, rules: &CategoryRules) -> Catalog {
    let origin = source.describe();

    match source.fetch().await {
        Ok(text) => {
            let catalog = Catalog::from_items(parse_catalog(&text, rules));
            tracing::info!(
                source = %origin,
                items = catalog.len(),
                products = catalog.products().len(),
                "catalog loaded"
            );
            catalog
        }
        Err(err) => {
            tracing::error!(source = %origin, "error loading catalog: {err:#}");
            Catalog::empty()
        }
    }
}

/// [`load_catalog`] from a configured location with the default rule table.
pub async fn load_configured(location: &CatalogLocation) -> Catalog {
    match source_for(location) {
        Ok(source) => load_catalog(source.as_ref(), &CategoryRules::default()).await,
        Err(err) => {
            tracing::error!(source = %location, "error loading catalog: {err:#}");
            Catalog::empty()
        }
    }
}
