//! Serde data file structs for catalog content.
//!
//! These structs define the on-disk format for foods and species. They are
//! deserialized from RON, JSON, or TOML data files and then resolved into
//! engine types by the loader. Species reference foods by name.

use nursery_core::food::FoodItem;
use nursery_core::species::BirthType;
use serde::Deserialize;

// ===========================================================================
// Foods
// ===========================================================================

/// A food definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct FoodData {
    pub name: String,
    pub points: f64,
    /// Seconds to spoil in a player inventory. 0 = never.
    #[serde(default)]
    pub spoil_seconds: f64,
    pub stack_size: u32,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub waste_points: f64,
}

impl FoodData {
    pub fn to_item(&self) -> FoodItem {
        FoodItem {
            name: self.name.clone(),
            points: self.points,
            spoil_seconds: self.spoil_seconds,
            stack_size: self.stack_size,
            weight: self.weight,
            waste_points: self.waste_points,
        }
    }
}

// ===========================================================================
// Species
// ===========================================================================

/// A diet entry, supporting both the short name form and the full form with
/// a per-species multiplier.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DietData {
    /// Short form: `"raw_meat"` -- multiplier 1.
    Short(String),
    /// Full form with an explicit multiplier.
    Full {
        food: String,
        #[serde(default = "default_multiplier")]
        multiplier: f64,
    },
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_one() -> f64 {
    1.0
}

impl DietData {
    pub fn food(&self) -> &str {
        match self {
            DietData::Short(name) => name,
            DietData::Full { food, .. } => food,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            DietData::Short(_) => 1.0,
            DietData::Full { multiplier, .. } => *multiplier,
        }
    }
}

/// A species definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesData {
    pub name: String,
    pub age_speed: f64,
    #[serde(default = "default_one")]
    pub age_speed_mult: f64,
    #[serde(default)]
    pub birth_type: BirthType,
    pub birth_speed: f64,
    #[serde(default = "default_one")]
    pub birth_speed_mult: f64,
    pub base_food_rate: f64,
    pub baby_food_rate: f64,
    pub extra_baby_food_rate: f64,
    pub weight: f64,
    /// Permitted foods in preference order.
    #[serde(default)]
    pub diet: Vec<DietData>,
}

// ===========================================================================
// TOML wrappers (TOML does not support top-level arrays)
// ===========================================================================

/// Wrapper for a list of foods in TOML format.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlFoods {
    pub foods: Vec<FoodData>,
}

/// Wrapper for a list of species in TOML format.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlSpecies {
    pub species: Vec<SpeciesData>,
}

// ===========================================================================
// Tests
// ===========================================================================
