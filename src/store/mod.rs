use crate::error::{Result, VduError};
use std::fs;
use std::path::{Path, PathBuf};

pub mod descriptor;
pub use descriptor::{FileNaming, Lookup, VendorDescriptor};

/// On-disk store of vendordep descriptor files.
///
/// Holds the invariant that exactly one descriptor file exists per dependency
/// after an update: replacements are written before the superseded file is
/// deleted, so an interrupted run can leave a stray extra file but never a
/// missing one.
pub struct VendorDepStore {
    dir: PathBuf,
}

impl VendorDepStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read every descriptor in the store, sorted by filename.
    ///
    /// A file that fails to parse aborts the whole run; skipping it would
    /// leave the change report describing a store we did not fully read.
    pub fn list_descriptors(&self) -> Result<Vec<VendorDescriptor>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            VduError::Descriptor(format!(
                "Failed to read vendordeps directory '{}': {}",
                self.dir.display(),
                e
            ))
        })?;

        let mut file_names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name.ends_with(".json") {
                file_names.push(name);
            }
        }
        file_names.sort();

        let mut descriptors = Vec::with_capacity(file_names.len());
        for name in file_names {
            let content = fs::read_to_string(self.dir.join(&name))?;
            descriptors.push(VendorDescriptor::from_json(&name, &content)?);
        }

        Ok(descriptors)
    }

    /// Persist `new_content` under `new_file_name`, removing the descriptor's
    /// old file when the name changed.
    ///
    /// The vendordep format is self-describing: when the content carries a
    /// `fileName` field it is stamped with the name we actually write to.
    pub fn replace(
        &self,
        old: &VendorDescriptor,
        new_content: &serde_json::Value,
        new_file_name: &str,
    ) -> Result<()> {
        let mut content = new_content.clone();
        if let Some(object) = content.as_object_mut() {
            if object.contains_key("fileName") {
                object.insert(
                    "fileName".to_string(),
                    serde_json::Value::String(new_file_name.to_string()),
                );
            }
        }

        let rendered = serde_json::to_string_pretty(&content)?;
        fs::write(self.dir.join(new_file_name), rendered)?;

        let old_file_name = old.file_name();
        if old_file_name != new_file_name {
            fs::remove_file(self.dir.join(&old_file_name))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn write_descriptor(dir: &Path, name: &str, content: &serde_json::Value) {
        fs::write(dir.join(name), serde_json::to_string_pretty(content).unwrap()).unwrap();
    }

    #[test]
    fn lists_descriptors_sorted_by_file_name() {
        let dir = tempdir().unwrap();
        write_descriptor(
            dir.path(),
            "REVLib.json",
            &json!({ "version": "2024.2.0", "jsonUrl": "https://example.com/REVLib.json" }),
        );
        write_descriptor(
            dir.path(),
            "Phoenix6-24.1.0.json",
            &json!({ "name": "Phoenix6", "version": "24.1.0", "uuid": "abc" }),
        );

        let store = VendorDepStore::new(dir.path());
        let descriptors = store.list_descriptors().unwrap();

        let names: Vec<_> = descriptors.iter().map(|d| d.file_name()).collect();
        assert_eq!(names, vec!["Phoenix6-24.1.0.json", "REVLib.json"]);
    }

    #[test]
    fn malformed_descriptor_aborts_listing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Broken.json"), "{ not valid json").unwrap();
        write_descriptor(
            dir.path(),
            "Phoenix6-24.1.0.json",
            &json!({ "name": "Phoenix6", "version": "24.1.0", "uuid": "abc" }),
        );

        let store = VendorDepStore::new(dir.path());
        assert!(matches!(
            store.list_descriptors(),
            Err(VduError::Descriptor(_))
        ));
    }

    #[test]
    fn ignores_non_json_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "notes").unwrap();
        write_descriptor(
            dir.path(),
            "Phoenix6-24.1.0.json",
            &json!({ "name": "Phoenix6", "version": "24.1.0", "uuid": "abc" }),
        );

        let store = VendorDepStore::new(dir.path());
        assert_eq!(store.list_descriptors().unwrap().len(), 1);
    }

    #[test]
    fn replace_renames_versioned_descriptor() {
        let dir = tempdir().unwrap();
        write_descriptor(
            dir.path(),
            "Phoenix6-24.1.0.json",
            &json!({ "name": "Phoenix6", "version": "24.1.0", "uuid": "abc" }),
        );

        let store = VendorDepStore::new(dir.path());
        let old = store.list_descriptors().unwrap().remove(0);

        let new_content = json!({ "name": "Phoenix6", "version": "24.3.0", "uuid": "abc" });
        store
            .replace(&old, &new_content, "Phoenix6-24.3.0.json")
            .unwrap();

        assert!(!dir.path().join("Phoenix6-24.1.0.json").exists());
        let written = fs::read_to_string(dir.path().join("Phoenix6-24.3.0.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["version"], "24.3.0");
    }

    #[test]
    fn replace_keeps_plain_file_name_in_place() {
        let dir = tempdir().unwrap();
        write_descriptor(
            dir.path(),
            "REVLib.json",
            &json!({ "version": "2024.2.0", "jsonUrl": "https://example.com/REVLib.json" }),
        );

        let store = VendorDepStore::new(dir.path());
        let old = store.list_descriptors().unwrap().remove(0);

        let new_content =
            json!({ "version": "2024.2.4", "jsonUrl": "https://example.com/REVLib.json" });
        store.replace(&old, &new_content, "REVLib.json").unwrap();

        assert!(dir.path().join("REVLib.json").exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn replace_stamps_file_name_field() {
        let dir = tempdir().unwrap();
        write_descriptor(
            dir.path(),
            "Phoenix6-24.1.0.json",
            &json!({
                "fileName": "Phoenix6-24.1.0.json",
                "name": "Phoenix6",
                "version": "24.1.0",
                "uuid": "abc"
            }),
        );

        let store = VendorDepStore::new(dir.path());
        let old = store.list_descriptors().unwrap().remove(0);

        let new_content = json!({
            "fileName": "stale-name.json",
            "name": "Phoenix6",
            "version": "24.3.0",
            "uuid": "abc"
        });
        store
            .replace(&old, &new_content, "Phoenix6-24.3.0.json")
            .unwrap();

        let written = fs::read_to_string(dir.path().join("Phoenix6-24.3.0.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["fileName"], "Phoenix6-24.3.0.json");
    }
}
