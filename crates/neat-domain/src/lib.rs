#![deny(clippy::all, warnings)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

pub mod init;
pub mod manifest;
pub mod options;

pub use init::{InitReport, Initializer, CONFIG_NAME, TEMPLATE_NAME};
pub use manifest::{sanitize_package_candidate, Manifest, ManifestError, MANIFEST_NAME};
pub use options::{
    Conflict, InitOptions, KeepExisting, ManifestSection, OverwritePrompt, PackageManager,
    PromptPolicy, DEFAULT_TARGET_DIR,
};
