use thiserror::Error;

#[derive(Error, Debug)]
pub enum VduError {
    #[error("Project validation failed: {0}")]
    ProjectValidation(String),

    #[error("Vendordep descriptor error: {0}")]
    Descriptor(String),

    #[error("Build file error: {0}")]
    BuildFile(String),

    #[error("Git operation failed: {0}")]
    GitOperation(String),

    #[error("GitHub API error: {0}")]
    GithubApi(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VduError>;
