//! Shared types, error model, and configuration for Pagesmith.
//!
//! This crate is the foundation depended on by all other Pagesmith crates.
//! It provides:
//! - [`PagesmithError`]: the unified error type
//! - Content record types ([`Find`], [`Publication`], [`Project`], [`WritingEntry`])
//!   and scraped [`FetchedMetadata`]
//! - Configuration ([`SiteConfig`], [`FetchConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    CONFIG_FILE_NAME, FetchConfig, PathsConfig, SiteConfig, init_config, load_config_from,
    load_site_config,
};
pub use error::{PagesmithError, Result};
pub use types::{
    FetchedMetadata, Find, PLACEHOLDER_URL, Project, Publication, WritingEntry, Year, non_empty,
};
