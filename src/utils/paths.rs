use crate::error::{Result, VduError};
use std::path::{Path, PathBuf};

/// Canonicalise a project directory and refuse system locations.
pub fn canonical_project_dir(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();

    let canonical = path.canonicalize().map_err(|e| {
        VduError::ProjectValidation(format!("Invalid path '{}': {e}", path.display()))
    })?;

    if !canonical.is_dir() {
        return Err(VduError::ProjectValidation(format!(
            "Path '{}' is not a directory",
            canonical.display()
        )));
    }

    const FORBIDDEN: &[&str] = &["/etc", "/sys", "/proc", "/dev", "/boot"];

    for forbidden in FORBIDDEN {
        if canonical.starts_with(forbidden) {
            return Err(VduError::ProjectValidation(format!(
                "Access to system directory '{}' is not allowed",
                forbidden
            )));
        }
    }

    Ok(canonical)
}

/// Ensure `file_path` resolves inside `base_dir`.
pub fn ensure_within(file_path: impl AsRef<Path>, base_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let file_path = file_path.as_ref();
    let base_dir = base_dir.as_ref();

    let canonical_file = file_path.canonicalize().map_err(|e| {
        VduError::ProjectValidation(format!("Invalid file path '{}': {e}", file_path.display()))
    })?;

    let canonical_base = base_dir.canonicalize().map_err(|e| {
        VduError::ProjectValidation(format!(
            "Invalid base directory '{}': {e}",
            base_dir.display()
        ))
    })?;

    if !canonical_file.starts_with(&canonical_base) {
        return Err(VduError::ProjectValidation(
            "Path is outside the project directory".to_string(),
        ));
    }

    Ok(canonical_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn accepts_directory() {
        let dir = tempdir().unwrap();
        assert!(canonical_project_dir(dir.path()).is_ok());
    }

    #[test]
    fn rejects_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "test").unwrap();
        assert!(matches!(
            canonical_project_dir(&file),
            Err(VduError::ProjectValidation(_))
        ));
    }

    #[test]
    fn rejects_system_directory() {
        assert!(canonical_project_dir("/etc").is_err());
    }

    #[test]
    fn rejects_path_outside_base() {
        let dir = tempdir().unwrap();
        assert!(ensure_within("/tmp", dir.path()).is_err());
    }

    #[test]
    fn accepts_path_inside_base() {
        let dir = tempdir().unwrap();
        let inner = dir.path().join("vendordeps");
        fs::create_dir(&inner).unwrap();
        assert!(ensure_within(&inner, dir.path()).is_ok());
    }
}
