use crate::error::{Result, VduError};
use crate::gradle::BuildFilePatcher;
use crate::marketplace::CatalogEntry;
use crate::marketplace::version::{Version, VersionComparator};
use crate::remote::{FrameworkRelease, MarketplaceSource, ReleaseSource};
use crate::report::{ChangeSet, UpdateRecord};
use crate::store::{Lookup, VendorDepStore, VendorDescriptor};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;

/// UpdateResolver decides, per dependency, whether a newer version exists and
/// orchestrates fetch + persist. Processing is strictly sequential; a failure
/// on one vendordep is logged and never blocks the remaining ones.
pub struct UpdateResolver {
    marketplace: Arc<dyn MarketplaceSource>,
    releases: Arc<dyn ReleaseSource>,
}

impl UpdateResolver {
    pub fn new(marketplace: Arc<dyn MarketplaceSource>, releases: Arc<dyn ReleaseSource>) -> Self {
        Self {
            marketplace,
            releases,
        }
    }

    /// Check the GradleRIO declaration in `build.gradle` against the latest
    /// WPILib release and rewrite it when a newer release exists for the
    /// project's competition year.
    pub fn update_framework(
        &self,
        patcher: &BuildFilePatcher,
        project_year: &str,
        changes: &mut ChangeSet,
    ) -> Result<bool> {
        match self.framework_candidate(patcher, project_year)? {
            Some((current, release)) => {
                patcher.apply_version(&release.version)?;
                changes.push_framework_update(UpdateRecord {
                    name: "WPILib".to_string(),
                    old_version: current,
                    new_version: release.version,
                    website: release.html_url,
                });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Same decision as [`update_framework`] without touching the build file.
    pub fn check_framework(
        &self,
        patcher: &BuildFilePatcher,
        project_year: &str,
        changes: &mut ChangeSet,
    ) -> Result<bool> {
        match self.framework_candidate(patcher, project_year)? {
            Some((current, release)) => {
                changes.push_framework_update(UpdateRecord {
                    name: "WPILib".to_string(),
                    old_version: current,
                    new_version: release.version,
                    website: release.html_url,
                });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn framework_candidate(
        &self,
        patcher: &BuildFilePatcher,
        project_year: &str,
    ) -> Result<Option<(String, FrameworkRelease)>> {
        let current = patcher.current_framework_version()?;
        let release = self.releases.latest_framework_release()?;

        // Releases for a different competition year are not eligible even
        // when numerically newer; GradleRIO versions track the year.
        if !release.version.starts_with(project_year) {
            if std::env::var("VDU_VERBOSE").is_ok() {
                eprintln!(
                    "[VERBOSE] Latest release {} is outside project year {}",
                    release.version, project_year
                );
            }
            return Ok(None);
        }

        if !VersionComparator::is_newer(&release.version, &current) {
            return Ok(None);
        }

        Ok(Some((current, release)))
    }

    /// Resolve every descriptor in the store against the marketplace catalog
    /// (or its direct URL), persisting each eligible replacement.
    pub fn update_vendor_deps(
        &self,
        store: &VendorDepStore,
        project_year: &str,
        changes: &mut ChangeSet,
    ) -> Result<()> {
        self.process_vendor_deps(store, project_year, changes, true)
    }

    /// Resolve without persisting anything.
    pub fn check_vendor_deps(
        &self,
        store: &VendorDepStore,
        project_year: &str,
        changes: &mut ChangeSet,
    ) -> Result<()> {
        self.process_vendor_deps(store, project_year, changes, false)
    }

    fn process_vendor_deps(
        &self,
        store: &VendorDepStore,
        project_year: &str,
        changes: &mut ChangeSet,
        apply: bool,
    ) -> Result<()> {
        let descriptors = store.list_descriptors()?;

        // One catalog fetch per run. A broken catalog degrades to an empty
        // one so direct-URL descriptors still get resolved.
        let catalog = match self.marketplace.fetch_catalog(project_year) {
            Ok(catalog) => catalog,
            Err(e) => {
                eprintln!(
                    "{}",
                    format!("Warning: marketplace catalog unavailable: {}", e).yellow()
                );
                Vec::new()
            }
        };

        let pb = ProgressBar::new(descriptors.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  [{bar:40}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        for descriptor in descriptors {
            pb.set_message(format!("Checking {}", descriptor.display_name));

            match self.resolve_descriptor(store, &catalog, &descriptor, apply) {
                Ok(Some(record)) => changes.push_vendor_update(record),
                Ok(None) => {}
                Err(e) => {
                    pb.suspend(|| {
                        eprintln!(
                            "{}",
                            format!(
                                "Warning: skipping {}: {}",
                                descriptor.display_name, e
                            )
                            .yellow()
                        );
                    });
                }
            }

            pb.inc(1);
        }
        pb.finish_and_clear();

        Ok(())
    }

    fn resolve_descriptor(
        &self,
        store: &VendorDepStore,
        catalog: &[CatalogEntry],
        descriptor: &VendorDescriptor,
        apply: bool,
    ) -> Result<Option<UpdateRecord>> {
        match &descriptor.lookup {
            Lookup::Marketplace { uuid } => {
                let Some(entry) = Self::latest_catalog_entry(catalog, uuid) else {
                    return Ok(None);
                };

                if !VersionComparator::is_newer(&entry.version, &descriptor.current_version) {
                    return Ok(None);
                }

                if apply {
                    let Some(content) = self.marketplace.fetch_descriptor(&entry.path)? else {
                        return Ok(None);
                    };
                    let new_file_name = descriptor.naming.with_version(&entry.version);
                    store.replace(descriptor, &content, &new_file_name)?;
                }

                Ok(Some(UpdateRecord {
                    name: descriptor.display_name.clone(),
                    old_version: descriptor.current_version.clone(),
                    new_version: entry.version.clone(),
                    website: entry.website.clone(),
                }))
            }
            Lookup::DirectUrl { url } => {
                let Some(content) = self.marketplace.fetch_descriptor(url)? else {
                    return Ok(None);
                };

                let remote_version = content
                    .get("version")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| {
                        VduError::Descriptor(format!(
                            "Remote descriptor at '{}' has no version field",
                            url
                        ))
                    })?
                    .to_string();

                if !VersionComparator::is_newer(&remote_version, &descriptor.current_version) {
                    return Ok(None);
                }

                let website = content
                    .get("website")
                    .and_then(|v| v.as_str())
                    .map(|w| w.to_string())
                    .or_else(|| descriptor.website.clone());

                if apply {
                    let new_file_name = descriptor.naming.with_version(&remote_version);
                    store.replace(descriptor, &content, &new_file_name)?;
                }

                Ok(Some(UpdateRecord {
                    name: descriptor.display_name.clone(),
                    old_version: descriptor.current_version.clone(),
                    new_version: remote_version,
                    website,
                }))
            }
        }
    }

    /// Maximum version among all catalog entries sharing a uuid, not merely
    /// the first match.
    fn latest_catalog_entry<'a>(catalog: &'a [CatalogEntry], uuid: &str) -> Option<&'a CatalogEntry> {
        catalog
            .iter()
            .filter(|entry| entry.uuid == uuid)
            .max_by(|a, b| Version::parse(&a.version).cmp(&Version::parse(&b.version)))
    }
}
