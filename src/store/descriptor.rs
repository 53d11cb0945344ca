use crate::error::{Result, VduError};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

/// Where the latest version of a vendordep is looked up.
///
/// The two modes are mutually exclusive: a descriptor that carries a content
/// `uuid` is resolved through the marketplace catalog, one that only carries
/// a `jsonUrl` is fetched directly. A descriptor with neither is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Marketplace { uuid: String },
    DirectUrl { url: String },
}

/// One vendordep descriptor file, parsed from `vendordeps/*.json`.
#[derive(Debug, Clone)]
pub struct VendorDescriptor {
    pub display_name: String,
    pub current_version: String,
    pub lookup: Lookup,
    pub naming: FileNaming,
    pub website: Option<String>,
}

impl VendorDescriptor {
    pub fn file_name(&self) -> String {
        self.naming.file_name()
    }
}

#[derive(Debug, Deserialize)]
struct RawDescriptor {
    name: Option<String>,
    version: String,
    uuid: Option<String>,
    #[serde(rename = "jsonUrl")]
    json_url: Option<String>,
    website: Option<String>,
}

impl VendorDescriptor {
    /// Parse descriptor JSON as read from `file_name`.
    ///
    /// The marketplace lookup wins when both a `uuid` and a `jsonUrl` are
    /// present, since the catalog is the source of truth for published
    /// vendordeps.
    pub fn from_json(file_name: &str, content: &str) -> Result<Self> {
        let raw: RawDescriptor = serde_json::from_str(content)
            .map_err(|e| VduError::Descriptor(format!("Failed to parse '{}': {}", file_name, e)))?;

        let naming = FileNaming::parse(file_name)?;

        let lookup = match (raw.uuid, raw.json_url) {
            (Some(uuid), _) if !uuid.is_empty() => Lookup::Marketplace { uuid },
            (_, Some(url)) if !url.is_empty() => Lookup::DirectUrl { url },
            _ => {
                return Err(VduError::Descriptor(format!(
                    "'{}' declares neither a uuid nor a jsonUrl",
                    file_name
                )));
            }
        };

        let display_name = raw.name.unwrap_or_else(|| naming.stem().to_string());

        Ok(Self {
            display_name,
            current_version: raw.version,
            lookup,
            naming,
            website: raw.website.filter(|w| !w.is_empty()),
        })
    }
}

/// Filename convention of a descriptor on disk.
///
/// The grammar is deliberately small: `<stem>-<version>.json` where
/// `<version>` is `MAJOR.MINOR.PATCH` with an optional pre-release suffix,
/// or `<stem>.json` when the name is version-agnostic. Updates must keep
/// whichever convention the original file used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileNaming {
    Versioned { stem: String, version: String },
    Plain { stem: String },
}

fn versioned_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<stem>.+)-(?P<version>\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?)\.json$")
            .expect("versioned filename regex is valid")
    })
}

impl FileNaming {
    pub fn parse(file_name: &str) -> Result<Self> {
        if !file_name.ends_with(".json") {
            return Err(VduError::Descriptor(format!(
                "'{}' is not a .json descriptor file",
                file_name
            )));
        }

        if let Some(caps) = versioned_name_re().captures(file_name) {
            return Ok(FileNaming::Versioned {
                stem: caps["stem"].to_string(),
                version: caps["version"].to_string(),
            });
        }

        let stem = file_name.trim_end_matches(".json");
        if stem.is_empty() {
            return Err(VduError::Descriptor(format!(
                "'{}' has an empty descriptor name",
                file_name
            )));
        }

        Ok(FileNaming::Plain {
            stem: stem.to_string(),
        })
    }

    pub fn stem(&self) -> &str {
        match self {
            FileNaming::Versioned { stem, .. } | FileNaming::Plain { stem } => stem,
        }
    }

    pub fn file_name(&self) -> String {
        match self {
            FileNaming::Versioned { stem, version } => format!("{}-{}.json", stem, version),
            FileNaming::Plain { stem } => format!("{}.json", stem),
        }
    }

    /// Filename to persist an updated descriptor under, preserving the
    /// convention observed on the original file.
    pub fn with_version(&self, new_version: &str) -> String {
        match self {
            FileNaming::Versioned { stem, .. } => format!("{}-{}.json", stem, new_version),
            FileNaming::Plain { stem } => format!("{}.json", stem),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_versioned_file_name() {
        let naming = FileNaming::parse("Phoenix6-24.1.0.json").unwrap();
        assert_eq!(
            naming,
            FileNaming::Versioned {
                stem: "Phoenix6".to_string(),
                version: "24.1.0".to_string(),
            }
        );
        assert_eq!(naming.with_version("24.3.0"), "Phoenix6-24.3.0.json");
    }

    #[test]
    fn parses_plain_file_name() {
        let naming = FileNaming::parse("REVLib.json").unwrap();
        assert_eq!(
            naming,
            FileNaming::Plain {
                stem: "REVLib".to_string(),
            }
        );
        assert_eq!(naming.with_version("2024.2.4"), "REVLib.json");
    }

    #[test]
    fn versioned_name_keeps_hyphenated_stem() {
        let naming = FileNaming::parse("WPILib-New-Commands-1.0.0.json").unwrap();
        assert_eq!(naming.stem(), "WPILib-New-Commands");
        assert_eq!(
            naming.with_version("2.0.0"),
            "WPILib-New-Commands-2.0.0.json"
        );
    }

    #[test]
    fn versioned_name_accepts_prerelease_suffix() {
        let naming = FileNaming::parse("Phoenix6-24.1.0-beta-2.json").unwrap();
        match naming {
            FileNaming::Versioned { version, .. } => assert_eq!(version, "24.1.0-beta-2"),
            other => panic!("expected versioned naming, got {:?}", other),
        }
    }

    #[test]
    fn rejects_non_json_file_name() {
        assert!(FileNaming::parse("Phoenix6-24.1.0.toml").is_err());
    }

    #[test]
    fn descriptor_prefers_marketplace_lookup() {
        let json = r#"{
            "name": "Phoenix6",
            "version": "24.1.0",
            "uuid": "e995de00-2c64-4df5-8831-c1441420ff19",
            "jsonUrl": "https://maven.ctr-electronics.com/Phoenix6.json"
        }"#;
        let descriptor = VendorDescriptor::from_json("Phoenix6-24.1.0.json", json).unwrap();
        assert_eq!(
            descriptor.lookup,
            Lookup::Marketplace {
                uuid: "e995de00-2c64-4df5-8831-c1441420ff19".to_string()
            }
        );
        assert_eq!(descriptor.display_name, "Phoenix6");
        assert_eq!(descriptor.current_version, "24.1.0");
    }

    #[test]
    fn descriptor_falls_back_to_direct_url() {
        let json = r#"{
            "version": "2024.2.4",
            "jsonUrl": "https://software-metadata.revrobotics.com/REVLib.json"
        }"#;
        let descriptor = VendorDescriptor::from_json("REVLib.json", json).unwrap();
        assert_eq!(
            descriptor.lookup,
            Lookup::DirectUrl {
                url: "https://software-metadata.revrobotics.com/REVLib.json".to_string()
            }
        );
        // Name falls back to the filename stem in direct-URL mode.
        assert_eq!(descriptor.display_name, "REVLib");
    }

    #[test]
    fn descriptor_without_lookup_is_rejected() {
        let json = r#"{ "name": "Orphan", "version": "1.0.0" }"#;
        let err = VendorDescriptor::from_json("Orphan.json", json).unwrap_err();
        assert!(matches!(err, VduError::Descriptor(_)));
    }

    #[test]
    fn malformed_json_is_a_typed_error() {
        let err = VendorDescriptor::from_json("Broken.json", "{ not json").unwrap_err();
        assert!(matches!(err, VduError::Descriptor(_)));
    }
}
