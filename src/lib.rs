pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{Cli, Command};
pub use config::SiteConfig;

pub use adapters::{HttpContentProvider, InMemoryContentStore, LocalStorage};
pub use core::{compose, CategoryExporter, MenuCache, NavTree, PageComposer, SectionRegistry, SiteRenderer};
pub use domain::section::{Block, SectionType};
pub use utils::error::{CmsError, Result};
