//! Data-file front end for the nursery engine.
//!
//! Foods, species and server settings live in RON, TOML or JSON files. The
//! loader finds them by base name, resolves the food names in species diets
//! to engine ids, and hands back a frozen [`nursery_core::catalog::Catalog`].

pub mod loader;
pub mod schema;

use std::path::Path;

use nursery_core::catalog::Catalog;
use nursery_core::settings::ServerSettings;

pub use loader::{DataLoadError, load_catalog, load_settings, load_settings_or_default};

/// Everything a data directory describes.
#[derive(Debug)]
pub struct NurseryData {
    pub catalog: Catalog,
    pub settings: ServerSettings,
}

/// Load the catalog and (optional) `settings.*` from one directory.
pub fn load_nursery_data(dir: &Path) -> Result<NurseryData, DataLoadError> {
    Ok(NurseryData {
        catalog: load_catalog(dir)?,
        settings: load_settings_or_default(dir)?,
    })
}
