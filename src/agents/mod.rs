pub mod project_scanner;
pub mod update_resolver;
pub mod version_control;

pub use project_scanner::ProjectScannerAgent;
pub use update_resolver::UpdateResolver;
pub use version_control::{UPDATE_BRANCH, VersionControlAgent};
