pub mod manifest_parser;
pub mod mirror_scanner;
pub mod update_runner;
pub mod version_control;

pub use manifest_parser::ManifestParser;
pub use mirror_scanner::MirrorScannerAgent;
pub use update_runner::{BARE_SUFFIX, RemoteRefresher, RunSummary, TargetOutcome, UpdateRunner};
pub use version_control::{GitClient, GitRefresher};
