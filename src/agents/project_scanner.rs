use crate::error::{Result, VduError};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// ProjectScannerAgent validates the robot project structure and reads the
/// competition year from the WPILib preferences file.
pub struct ProjectScannerAgent {
    project_path: PathBuf,
}

impl ProjectScannerAgent {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
        }
    }

    pub fn validate(&self) -> Result<ProjectInfo> {
        let build_gradle_path = self.project_path.join("build.gradle");
        if !build_gradle_path.exists() {
            return Err(VduError::ProjectValidation(
                "build.gradle not found".to_string(),
            ));
        }

        let vendordeps_dir = self.project_path.join("vendordeps");
        if !vendordeps_dir.is_dir() {
            return Err(VduError::ProjectValidation(
                "vendordeps directory not found".to_string(),
            ));
        }

        let project_year = self.read_project_year()?;

        let git_dir = self.project_path.join(".git");
        let has_git = git_dir.exists() && git_dir.is_dir();

        Ok(ProjectInfo {
            project_path: self.project_path.clone(),
            build_gradle_path,
            vendordeps_dir,
            project_year,
            has_git,
        })
    }

    fn read_project_year(&self) -> Result<String> {
        let preferences_path = self
            .project_path
            .join(".wpilib")
            .join("wpilib_preferences.json");

        let content = fs::read_to_string(&preferences_path).map_err(|_| {
            VduError::ProjectValidation(".wpilib/wpilib_preferences.json not found".to_string())
        })?;

        let preferences: Value = serde_json::from_str(&content).map_err(|e| {
            VduError::ProjectValidation(format!("Failed to parse wpilib_preferences.json: {}", e))
        })?;

        // projectYear has been serialized both as a string and as a number
        // over the years.
        match preferences.get("projectYear") {
            Some(Value::String(year)) if !year.is_empty() => Ok(year.clone()),
            Some(Value::Number(year)) => Ok(year.to_string()),
            _ => Err(VduError::ProjectValidation(
                "wpilib_preferences.json has no projectYear".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectInfo {
    #[allow(dead_code)]
    pub project_path: PathBuf,
    pub build_gradle_path: PathBuf,
    pub vendordeps_dir: PathBuf,
    pub project_year: String,
    pub has_git: bool,
}
