use std::env;

/// Settings read from the environment, matching the CI framing the tool
/// usually runs under.
#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub base_branch: String,
    /// `owner/repo` slug of the GitHub repository to open the PR against.
    pub repo_slug: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            github_token: env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            base_branch: env::var("BASE_BRANCH").unwrap_or_else(|_| "main".to_string()),
            repo_slug: env::var("REPO_PATH").ok().filter(|r| !r.is_empty()),
        }
    }

    /// Head ref in `owner:branch` form, with the owner taken from the slug.
    pub fn head_ref(&self, branch: &str) -> Option<String> {
        let slug = self.repo_slug.as_deref()?;
        let owner = slug.split('/').next()?;
        if owner.is_empty() {
            return None;
        }
        Some(format!("{}:{}", owner, branch))
    }
}
