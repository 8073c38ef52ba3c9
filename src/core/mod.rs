pub mod breadcrumbs;
pub mod composer;
pub mod export;
pub mod menu_cache;
pub mod navigation;
pub mod registry;
pub mod site;

pub use crate::domain::ports::{ConfigProvider, ContentProvider, Storage};
pub use crate::utils::error::Result;
pub use composer::{compose, Composition, PageComposer, RenderedSection};
pub use export::CategoryExporter;
pub use menu_cache::MenuCache;
pub use navigation::{NavLink, NavTree};
pub use registry::SectionRegistry;
pub use site::{Outcome, SiteRenderer};
