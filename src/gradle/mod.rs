pub mod build_patcher;

pub use build_patcher::BuildFilePatcher;
