pub mod catalog;
pub mod version;

pub use catalog::{CatalogEntry, MarketplaceClient};
pub use version::VersionComparator;
