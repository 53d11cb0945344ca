use crate::config::Config;
use crate::error::Result;
use crate::github::GithubClient;
use crate::marketplace::{CatalogEntry, MarketplaceClient};
use std::sync::Arc;

/// Remote source of vendordep versions and descriptor content.
pub trait MarketplaceSource: Send + Sync {
    fn fetch_catalog(&self, project_year: &str) -> Result<Vec<CatalogEntry>>;

    fn fetch_descriptor(&self, location: &str) -> Result<Option<serde_json::Value>>;
}

/// Latest published release of the build framework.
#[derive(Debug, Clone)]
pub struct FrameworkRelease {
    pub version: String,
    pub html_url: Option<String>,
}

pub trait ReleaseSource: Send + Sync {
    /// Unlike the per-dependency lookups this has no fallback, so a failed
    /// fetch is an error rather than "no release".
    fn latest_framework_release(&self) -> Result<FrameworkRelease>;
}

pub struct RemoteFactory;

impl RemoteFactory {
    pub fn create_marketplace() -> Result<Arc<dyn MarketplaceSource>> {
        Ok(Arc::new(MarketplaceClient::new()?))
    }

    pub fn create_releases(config: &Config) -> Result<Arc<dyn ReleaseSource>> {
        Ok(Arc::new(GithubClient::new(config.github_token.clone())?))
    }
}
