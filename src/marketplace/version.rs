use std::cmp::Ordering;

/// Version representation covering the formats seen in vendordep descriptors
/// and WPILib release tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub original: String,
    pub parsed: VersionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionKind {
    Semantic(semver::Version),
    Numeric(Vec<u32>),
    Unknown(String),
}

impl Version {
    pub fn parse(version: &str) -> Self {
        let parsed = if let Ok(v) = semver::Version::parse(version) {
            VersionKind::Semantic(v)
        } else if let Some(numeric) = Self::parse_numeric(version) {
            VersionKind::Numeric(numeric)
        } else {
            VersionKind::Unknown(version.to_string())
        };

        Version {
            original: version.to_string(),
            parsed,
        }
    }

    fn parse_numeric(version: &str) -> Option<Vec<u32>> {
        let parts: Vec<&str> = version.split('.').collect();
        let mut numbers = Vec::new();

        for part in parts {
            if let Ok(num) = part.parse::<u32>() {
                numbers.push(num);
            } else {
                return None;
            }
        }

        if numbers.is_empty() { None } else { Some(numbers) }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.parsed, &other.parsed) {
            (VersionKind::Semantic(a), VersionKind::Semantic(b)) => a.cmp(b),
            (VersionKind::Numeric(a), VersionKind::Numeric(b)) => {
                for (av, bv) in a.iter().zip(b.iter()) {
                    match av.cmp(bv) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                }
                a.len().cmp(&b.len())
            }
            // Semantic versions and bare numeric tuples compare per component
            // too ("2024.1" against "2024.1.1").
            (VersionKind::Semantic(a), VersionKind::Numeric(b)) => {
                let a_parts = [a.major, a.minor, a.patch];
                let b_parts: Vec<u64> = b.iter().map(|v| u64::from(*v)).collect();
                cmp_components(&a_parts, &b_parts)
            }
            (VersionKind::Numeric(a), VersionKind::Semantic(b)) => {
                let a_parts: Vec<u64> = a.iter().map(|v| u64::from(*v)).collect();
                let b_parts = [b.major, b.minor, b.patch];
                cmp_components(&a_parts, &b_parts)
            }
            _ => self.original.cmp(&other.original),
        }
    }
}

fn cmp_components(a: &[u64], b: &[u64]) -> Ordering {
    for (av, bv) in a.iter().zip(b.iter()) {
        match av.cmp(bv) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

pub struct VersionComparator;

impl VersionComparator {
    /// Check if version `a` is strictly newer than version `b`
    pub fn is_newer(a: &str, b: &str) -> bool {
        let va = Version::parse(a);
        let vb = Version::parse(b);
        va > vb
    }
}
