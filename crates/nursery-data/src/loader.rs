//! Resolution pipeline: reads data files, resolves food names, builds the catalog.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers, plus the two entry points built on them:
//! [`load_catalog`] and [`load_settings`].

use nursery_core::catalog::{Catalog, CatalogBuilder, CatalogError};
use nursery_core::id::{FoodId, SpeciesId};
use nursery_core::settings::ServerSettings;
use nursery_core::species::{CreatureSpecies, DietEntry};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::schema::{FoodData, SpeciesData};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate name was found.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// A record parsed but its values are unusable.
    #[error("invalid record in {file}: {detail}")]
    Invalid { file: PathBuf, detail: String },

    /// The resolved records did not form a valid catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn parse_error(path: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    const EXTENSIONS: [&'static str; 3] = ["ron", "toml", "json"];
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for `{base_name}.ron`, `.toml` or `.json`.
///
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// more than one format exists for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in Format::EXTENSIONS {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if !candidate.exists() {
            continue;
        }
        if let Some(existing) = found.take() {
            return Err(DataLoadError::ConflictingFormats {
                a: existing,
                b: candidate,
            });
        }
        found = Some(candidate);
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    if detect_format(path)? != Format::Toml {
        return deserialize_file(path);
    }

    let content = std::fs::read_to_string(path)?;
    let table: toml::Table = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
    let array = table
        .get(toml_key)
        .ok_or_else(|| parse_error(path, format!("missing key '{toml_key}' in TOML file")))?
        .clone();
    array
        .try_into()
        .map_err(|e: toml::de::Error| parse_error(path, e))
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Look up a name in a map, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

/// Check whether a name already exists in a map, returning a `DuplicateName`
/// error if so.
pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Pipeline
// ===========================================================================

/// Load `foods.*` and `species.*` from `dir` into a frozen catalog.
///
/// Foods are registered in file order, so the first food is `FoodId(0)`.
/// Species diets name foods; every name must resolve.
pub fn load_catalog(dir: &Path) -> Result<Catalog, DataLoadError> {
    let foods_path = require_data_file(dir, "foods")?;
    let species_path = require_data_file(dir, "species")?;

    let foods: Vec<FoodData> = deserialize_list(&foods_path, "foods")?;
    let species: Vec<SpeciesData> = deserialize_list(&species_path, "species")?;

    let mut builder = CatalogBuilder::new();

    let mut food_ids: HashMap<String, FoodId> = HashMap::new();
    for data in &foods {
        check_duplicate(&food_ids, &data.name, &foods_path)?;
        let item = data.to_item();
        item.validate().map_err(|e| DataLoadError::Invalid {
            file: foods_path.clone(),
            detail: e.to_string(),
        })?;
        let id = builder.register_food(&data.name, item);
        food_ids.insert(data.name.clone(), id);
    }

    let mut species_ids: HashMap<String, SpeciesId> = HashMap::new();
    for data in &species {
        check_duplicate(&species_ids, &data.name, &species_path)?;
        let mut diet = Vec::with_capacity(data.diet.len());
        for entry in &data.diet {
            let food = *resolve_name(&food_ids, entry.food(), &species_path, "food")?;
            diet.push(DietEntry::with_multiplier(food, entry.multiplier()));
        }
        let id = builder.register_species(&data.name, to_species(data, diet));
        species_ids.insert(data.name.clone(), id);
    }

    let catalog = builder.build()?;
    log::info!(
        "loaded {} foods and {} species from {}",
        catalog.food_count(),
        catalog.species_count(),
        dir.display()
    );
    Ok(catalog)
}

fn to_species(data: &SpeciesData, diet: Vec<DietEntry>) -> CreatureSpecies {
    CreatureSpecies {
        name: data.name.clone(),
        age_speed: data.age_speed,
        age_speed_mult: data.age_speed_mult,
        birth_type: data.birth_type,
        birth_speed: data.birth_speed,
        birth_speed_mult: data.birth_speed_mult,
        base_food_rate: data.base_food_rate,
        baby_food_rate: data.baby_food_rate,
        extra_baby_food_rate: data.extra_baby_food_rate,
        weight: data.weight,
        diet,
    }
}

/// Load server settings from one RON, TOML or JSON file.
///
/// Absent keys keep their defaults.
pub fn load_settings(path: &Path) -> Result<ServerSettings, DataLoadError> {
    let settings: ServerSettings = deserialize_file(path)?;
    log::debug!("loaded server settings from {}", path.display());
    Ok(settings)
}

/// Load `settings.*` from `dir` if present, defaults otherwise.
pub fn load_settings_or_default(dir: &Path) -> Result<ServerSettings, DataLoadError> {
    match find_data_file(dir, "settings")? {
        Some(path) => load_settings(&path),
        None => Ok(ServerSettings::default()),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
