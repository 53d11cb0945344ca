use crate::error::{Result, VduError};
use crate::remote::MarketplaceSource;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const MARKETPLACE_URL: &str =
    "https://frcmaven.wpi.edu/artifactory/vendordeps/vendordep-marketplace";

/// One published vendordep version in the marketplace catalog.
///
/// The catalog holds many entries per `uuid`, one for each published version.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub uuid: String,
    pub version: String,
    /// Descriptor location: an absolute URL or a path relative to the
    /// marketplace base.
    pub path: String,
    #[serde(default)]
    pub website: Option<String>,
}

/// Client for the WPILib vendordep marketplace.
pub struct MarketplaceClient {
    client: Client,
    base_url: String,
}

impl MarketplaceClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(MARKETPLACE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Url::parse(base_url).map_err(|_| {
            VduError::ProjectValidation(format!("Invalid marketplace URL: {base_url}"))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("vdu")
            .build()
            .map_err(|e| VduError::Io(std::io::Error::other(e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_json(&self, url: &str) -> Option<serde_json::Value> {
        if std::env::var("VDU_VERBOSE").is_ok() {
            eprintln!("[VERBOSE] Fetching: {}", url);
        }

        let response = match self.client.get(url).send() {
            Ok(resp) => resp,
            Err(e) => {
                if std::env::var("VDU_VERBOSE").is_ok() {
                    eprintln!("[VERBOSE] Request failed: {}", e);
                }
                return None;
            }
        };

        if !response.status().is_success() {
            if std::env::var("VDU_VERBOSE").is_ok() {
                eprintln!("[VERBOSE] HTTP {}: {}", response.status(), url);
            }
            return None;
        }

        response.json().ok()
    }

    fn resolve_location(&self, location: &str) -> String {
        if location.starts_with("http://") || location.starts_with("https://") {
            location.to_string()
        } else {
            format!("{}/{}", self.base_url, location.trim_start_matches('/'))
        }
    }
}

impl MarketplaceSource for MarketplaceClient {
    /// Fetch the year's catalog. A failed fetch degrades to an empty catalog:
    /// every catalog-mode descriptor then reports "no match" instead of the
    /// run aborting.
    fn fetch_catalog(&self, project_year: &str) -> Result<Vec<CatalogEntry>> {
        let url = format!("{}/{}.json", self.base_url, project_year);
        let Some(value) = self.get_json(&url) else {
            return Ok(Vec::new());
        };

        let entries: Vec<CatalogEntry> = serde_json::from_value(value).map_err(|e| {
            VduError::Descriptor(format!("Failed to parse marketplace catalog: {}", e))
        })?;

        Ok(entries)
    }

    fn fetch_descriptor(&self, location: &str) -> Result<Option<serde_json::Value>> {
        let url = self.resolve_location(location);
        Ok(self.get_json(&url))
    }
}
