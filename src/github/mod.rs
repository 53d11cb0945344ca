use crate::error::{Result, VduError};
use crate::remote::{FrameworkRelease, ReleaseSource};
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const GITHUB_API: &str = "https://api.github.com";
const FRAMEWORK_REPO: &str = "wpilibsuite/allwpilib";

/// Thin GitHub REST client covering the two things the tool needs: the
/// latest WPILib release and create-or-update of the single update PR.
pub struct GithubClient {
    client: Client,
    token: Option<String>,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: Option<String>,
}

impl GithubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_api_base(token, GITHUB_API)
    }

    pub fn with_api_base(token: Option<String>, api_base: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("vdu")
            .build()
            .map_err(|e| VduError::Io(std::io::Error::other(e)))?;

        Ok(Self {
            client,
            token,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Find the single open PR for the given head/base pair, if any.
    pub fn find_open_pull(
        &self,
        repo_slug: &str,
        base: &str,
        head: &str,
    ) -> Result<Option<PullRequest>> {
        let url = format!("{}/repos/{}/pulls", self.api_base, repo_slug);
        let response = self
            .authorize(self.client.get(&url))
            .query(&[("state", "open"), ("base", base), ("head", head)])
            .send()
            .map_err(|e| VduError::GithubApi(format!("Failed to list pull requests: {}", e)))?;

        if !response.status().is_success() {
            return Err(VduError::GithubApi(format!(
                "Listing pull requests returned HTTP {}",
                response.status()
            )));
        }

        let mut pulls: Vec<PullRequest> = response
            .json()
            .map_err(|e| VduError::GithubApi(format!("Failed to parse pull request list: {}", e)))?;

        if pulls.is_empty() {
            Ok(None)
        } else {
            Ok(Some(pulls.remove(0)))
        }
    }

    pub fn create_pull(
        &self,
        repo_slug: &str,
        base: &str,
        head: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        let url = format!("{}/repos/{}/pulls", self.api_base, repo_slug);
        let payload = json!({
            "base": base,
            "head": head,
            "title": title,
            "body": body,
            "draft": true,
        });

        let response = self
            .authorize(self.client.post(&url))
            .json(&payload)
            .send()
            .map_err(|e| VduError::GithubApi(format!("Failed to create pull request: {}", e)))?;

        if !response.status().is_success() {
            return Err(VduError::GithubApi(format!(
                "Creating pull request returned HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .map_err(|e| VduError::GithubApi(format!("Failed to parse created pull request: {}", e)))
    }

    pub fn update_pull(&self, repo_slug: &str, number: u64, title: &str, body: &str) -> Result<()> {
        let url = format!("{}/repos/{}/pulls/{}", self.api_base, repo_slug, number);
        let payload = json!({ "title": title, "body": body });

        let response = self
            .authorize(self.client.patch(&url))
            .json(&payload)
            .send()
            .map_err(|e| VduError::GithubApi(format!("Failed to update pull request: {}", e)))?;

        if !response.status().is_success() {
            return Err(VduError::GithubApi(format!(
                "Updating pull request #{} returned HTTP {}",
                number,
                response.status()
            )));
        }

        Ok(())
    }
}

impl ReleaseSource for GithubClient {
    fn latest_framework_release(&self) -> Result<FrameworkRelease> {
        let url = format!(
            "{}/repos/{}/releases/latest",
            self.api_base, FRAMEWORK_REPO
        );

        if std::env::var("VDU_VERBOSE").is_ok() {
            eprintln!("[VERBOSE] Fetching: {}", url);
        }

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .map_err(|e| VduError::GithubApi(format!("Failed to fetch latest release: {}", e)))?;

        if !response.status().is_success() {
            return Err(VduError::GithubApi(format!(
                "Latest release lookup returned HTTP {}",
                response.status()
            )));
        }

        let release: Release = response
            .json()
            .map_err(|e| VduError::GithubApi(format!("Failed to parse release: {}", e)))?;

        // Release tags carry a leading "v" the build file does not use.
        Ok(FrameworkRelease {
            version: release.tag_name.trim_start_matches('v').to_string(),
            html_url: release.html_url,
        })
    }
}
