use crate::error::{Result, VduError};
use crate::utils::paths;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Branch the update PR is maintained on. Fixed so repeated runs refresh the
/// same pull request instead of opening new ones.
pub const UPDATE_BRANCH: &str = "vendordeps-update";

/// VersionControlAgent handles Git operations with hardened input validation.
pub struct VersionControlAgent {
    project_path: PathBuf,
}

impl VersionControlAgent {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Result<Self> {
        let project_path = Self::validate_git_path(project_path.as_ref())?;
        Ok(Self { project_path })
    }

    /// Check if the working directory is clean
    pub fn is_working_directory_clean(&self) -> Result<bool> {
        let output = self.run_git(&["status", "--porcelain"])?;
        Self::ensure_success(&output, "git status")?;
        Ok(output.stdout.is_empty())
    }

    /// Create the update branch, or reset it onto the current HEAD when a
    /// previous run left it behind.
    pub fn prepare_update_branch(&self) -> Result<String> {
        let output = self.run_git(&["checkout", "-B", UPDATE_BRANCH])?;
        Self::ensure_success(&output, "git checkout -B")?;
        Ok(UPDATE_BRANCH.to_string())
    }

    /// Stage the build file and the vendordeps directory.
    pub fn stage_update_paths(&self) -> Result<()> {
        for rel in ["build.gradle", "vendordeps"] {
            let full = self.project_path.join(rel);
            paths::ensure_within(&full, &self.project_path).map_err(|err| {
                VduError::GitOperation(format!("Refusing to stage unsafe path: {err}"))
            })?;

            let output = self.run_git(&["add", rel])?;
            Self::ensure_success(&output, "git add")?;
        }
        Ok(())
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        let output = self.run_git(&["commit", "-m", message])?;
        Self::ensure_success(&output, "git commit")?;
        Ok(())
    }

    /// Force-push the update branch, setting its upstream on first push.
    pub fn push_force(&self) -> Result<()> {
        let output = self.run_git(&[
            "push",
            "--force",
            "--set-upstream",
            "origin",
            UPDATE_BRANCH,
        ])?;
        Self::ensure_success(&output, "git push")?;
        Ok(())
    }

    fn run_git(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .current_dir(&self.project_path)
            .args(args)
            .output()
            .map_err(|e| {
                VduError::GitOperation(format!(
                    "Failed to execute git command '{}': {e}",
                    args.join(" ")
                ))
            })
    }

    fn ensure_success(output: &Output, command: &str) -> Result<()> {
        if output.status.success() {
            return Ok(());
        }

        Err(VduError::GitOperation(format!(
            "{} failed: {}",
            command,
            String::from_utf8_lossy(&output.stderr)
        )))
    }

    fn validate_git_path(path: &Path) -> Result<PathBuf> {
        let dangerous = [';', '|', '&', '$', '`', '\n', '\r'];
        let path_str = path.to_string_lossy();
        if let Some(ch) = dangerous.iter().find(|c| path_str.contains(**c)) {
            return Err(VduError::GitOperation(format!(
                "Path contains dangerous character: '{}'",
                ch
            )));
        }

        if !path.is_absolute() {
            return Err(VduError::GitOperation(
                "Only absolute paths are allowed for Git operations".to_string(),
            ));
        }

        paths::canonical_project_dir(path)
            .map_err(|err| VduError::GitOperation(format!("Invalid Git path: {}", err)))
    }
}
