//! Protolab Data -- loads raw prototype dumps from disk and turns them into a
//! derived catalog.
//!
//! A dump directory holds `data-raw.{ron,toml,json}` (category, then name,
//! then record) and optionally `settings.{ron,toml,json}`.

pub mod catalog;
pub mod loader;
pub mod settings;

pub use catalog::{Catalog, RawDump, build_catalog, load_catalog};
pub use loader::DataLoadError;
pub use settings::{DumpSettings, load_settings};
