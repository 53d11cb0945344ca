use std::fmt::Write;

/// One applied update, kept for reporting only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRecord {
    pub name: String,
    pub old_version: String,
    pub new_version: String,
    pub website: Option<String>,
}

/// Ordered collection of applied updates.
///
/// Records are appended in the order dependencies were processed, so the
/// rendered report is stable run-over-run for identical inputs.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    records: Vec<UpdateRecord>,
    framework_updated: bool,
    vendor_updated: bool,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_framework_update(&mut self, record: UpdateRecord) {
        self.records.push(record);
        self.framework_updated = true;
    }

    pub fn push_vendor_update(&mut self, record: UpdateRecord) {
        self.records.push(record);
        self.vendor_updated = true;
    }

    pub fn records(&self) -> &[UpdateRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[allow(dead_code)]
    pub fn framework_updated(&self) -> bool {
        self.framework_updated
    }

    #[allow(dead_code)]
    pub fn vendor_updated(&self) -> bool {
        self.vendor_updated
    }

    /// Commit message naming everything that changed.
    pub fn commit_message(&self) -> String {
        let names: Vec<&str> = self.records.iter().map(|r| r.name.as_str()).collect();
        format!("Updating {}", names.join(", "))
    }

    /// PR title built from the categories that changed, e.g.
    /// `WPILib and Vendor Dependency Updates`.
    pub fn pr_title(&self) -> String {
        let mut parts = Vec::new();
        if self.framework_updated {
            parts.push("WPILib");
        }
        if self.vendor_updated {
            parts.push("Vendor Dependency");
        }
        format!("{} Updates", parts.join(" and "))
    }

    /// Markdown PR body listing every applied update.
    pub fn pr_body(&self) -> String {
        let mut body = String::from("## Dependency updates\n\n");
        body.push_str("| Dependency | Old version | New version |\n");
        body.push_str("| --- | --- | --- |\n");

        for record in &self.records {
            let name = match &record.website {
                Some(website) => format!("[{}]({})", record.name, website),
                None => record.name.clone(),
            };
            let _ = writeln!(
                body,
                "| {} | `{}` | `{}` |",
                name, record.old_version, record.new_version
            );
        }

        body.push_str("\nThis pull request was generated automatically by vdu.\n");
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, old: &str, new: &str, website: Option<&str>) -> UpdateRecord {
        UpdateRecord {
            name: name.to_string(),
            old_version: old.to_string(),
            new_version: new.to_string(),
            website: website.map(|w| w.to_string()),
        }
    }

    #[test]
    fn empty_change_set_gates_the_run() {
        let changes = ChangeSet::new();
        assert!(changes.is_empty());
        assert!(!changes.framework_updated());
        assert!(!changes.vendor_updated());
    }

    #[test]
    fn records_keep_insertion_order() {
        let mut changes = ChangeSet::new();
        changes.push_framework_update(record("WPILib", "2024.1.1", "2024.2.1", None));
        changes.push_vendor_update(record("Phoenix6", "24.1.0", "24.3.0", None));
        changes.push_vendor_update(record("REVLib", "2024.2.0", "2024.2.4", None));

        let names: Vec<_> = changes.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["WPILib", "Phoenix6", "REVLib"]);
    }

    #[test]
    fn title_reflects_updated_categories() {
        let mut changes = ChangeSet::new();
        changes.push_vendor_update(record("Phoenix6", "24.1.0", "24.3.0", None));
        assert_eq!(changes.pr_title(), "Vendor Dependency Updates");

        changes.push_framework_update(record("WPILib", "2024.1.1", "2024.2.1", None));
        assert_eq!(changes.pr_title(), "WPILib and Vendor Dependency Updates");
    }

    #[test]
    fn body_links_website_when_present() {
        let mut changes = ChangeSet::new();
        changes.push_vendor_update(record(
            "Phoenix6",
            "24.1.0",
            "24.3.0",
            Some("https://ctr-electronics.com"),
        ));
        changes.push_vendor_update(record("REVLib", "2024.2.0", "2024.2.4", None));

        let body = changes.pr_body();
        assert!(body.contains("[Phoenix6](https://ctr-electronics.com)"));
        assert!(body.contains("| REVLib | `2024.2.0` | `2024.2.4` |"));
    }

    #[test]
    fn commit_message_names_all_updates() {
        let mut changes = ChangeSet::new();
        changes.push_framework_update(record("WPILib", "2024.1.1", "2024.2.1", None));
        changes.push_vendor_update(record("Phoenix6", "24.1.0", "24.3.0", None));
        assert_eq!(changes.commit_message(), "Updating WPILib, Phoenix6");
    }
}
