use crate::error::{Result, VduError};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Locates and rewrites the GradleRIO version declaration inside
/// `build.gradle`.
///
/// Only the quoted version substring is touched; every other byte of the
/// file is preserved, so re-running the patch is idempotent.
pub struct BuildFilePatcher {
    build_gradle: PathBuf,
}

fn gradlerio_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"id "edu\.wpi\.first\.GradleRIO" version "(?P<version>\d+\.\d+\.\d+)""#)
            .expect("GradleRIO version regex is valid")
    })
}

impl BuildFilePatcher {
    pub fn new<P: AsRef<Path>>(build_gradle: P) -> Self {
        Self {
            build_gradle: build_gradle.as_ref().to_path_buf(),
        }
    }

    /// Read the current GradleRIO version out of the build file. Absence is
    /// fatal: without a current version there is nothing to compare against.
    pub fn current_framework_version(&self) -> Result<String> {
        let content = self.read()?;
        let caps = gradlerio_re().captures(&content).ok_or_else(|| {
            VduError::BuildFile(format!(
                "Could not locate the GradleRIO version in '{}'",
                self.build_gradle.display()
            ))
        })?;
        Ok(caps["version"].to_string())
    }

    /// Replace the version substring with `new_version`, leaving the rest of
    /// the file byte-identical.
    pub fn apply_version(&self, new_version: &str) -> Result<()> {
        let content = self.read()?;
        let caps = gradlerio_re().captures(&content).ok_or_else(|| {
            VduError::BuildFile(format!(
                "Could not locate the GradleRIO version in '{}'",
                self.build_gradle.display()
            ))
        })?;

        let span = caps.name("version").expect("version group always captured");
        let mut patched = String::with_capacity(content.len());
        patched.push_str(&content[..span.start()]);
        patched.push_str(new_version);
        patched.push_str(&content[span.end()..]);

        fs::write(&self.build_gradle, patched)?;
        Ok(())
    }

    fn read(&self) -> Result<String> {
        fs::read_to_string(&self.build_gradle).map_err(|e| {
            VduError::BuildFile(format!(
                "Failed to read '{}': {}",
                self.build_gradle.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const BUILD_GRADLE: &str = r#"plugins {
    id "java"
    id "edu.wpi.first.GradleRIO" version "2024.1.1"
}

def ROBOT_MAIN_CLASS = "frc.robot.Main"
"#;

    fn write_build_file(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("build.gradle");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reads_current_version() {
        let dir = tempdir().unwrap();
        let path = write_build_file(dir.path(), BUILD_GRADLE);
        let patcher = BuildFilePatcher::new(&path);
        assert_eq!(patcher.current_framework_version().unwrap(), "2024.1.1");
    }

    #[test]
    fn missing_version_is_fatal() {
        let dir = tempdir().unwrap();
        let path = write_build_file(dir.path(), "plugins { id \"java\" }\n");
        let patcher = BuildFilePatcher::new(&path);
        assert!(matches!(
            patcher.current_framework_version(),
            Err(VduError::BuildFile(_))
        ));
    }

    #[test]
    fn patches_only_the_version_substring() {
        let dir = tempdir().unwrap();
        let path = write_build_file(dir.path(), BUILD_GRADLE);
        let patcher = BuildFilePatcher::new(&path);

        patcher.apply_version("2024.2.1").unwrap();

        let patched = fs::read_to_string(&path).unwrap();
        assert_eq!(patched, BUILD_GRADLE.replace("2024.1.1", "2024.2.1"));
        assert_eq!(patcher.current_framework_version().unwrap(), "2024.2.1");
    }

    #[test]
    fn repatching_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = write_build_file(dir.path(), BUILD_GRADLE);
        let patcher = BuildFilePatcher::new(&path);

        patcher.apply_version("2024.2.1").unwrap();
        let first = fs::read_to_string(&path).unwrap();
        patcher.apply_version("2024.2.1").unwrap();
        let second = fs::read_to_string(&path).unwrap();
        assert_eq!(first, second);
    }
}
