//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::catalog::{Catalog, CatalogBuilder};
use crate::food::FoodItem;
use crate::growth::GrowthModel;
use crate::id::*;
use crate::settings::ServerSettings;
use crate::species::{BirthType, CreatureInstance, CreatureSpecies, DietEntry};

// ===========================================================================
// Food constructors
// ===========================================================================

pub fn raw_meat_id() -> FoodId {
    FoodId(0)
}
pub fn cooked_meat_id() -> FoodId {
    FoodId(1)
}
pub fn berries_id() -> FoodId {
    FoodId(2)
}
pub fn prime_meat_id() -> FoodId {
    FoodId(3)
}

/// 50 points, stacks of 20, spoils in 600 s, weighs 0.25.
pub fn raw_meat() -> FoodItem {
    FoodItem {
        name: "raw_meat".to_string(),
        points: 50.0,
        spoil_seconds: 600.0,
        stack_size: 20,
        weight: 0.25,
        waste_points: 0.0,
    }
}

pub fn cooked_meat() -> FoodItem {
    FoodItem {
        name: "cooked_meat".to_string(),
        points: 70.0,
        spoil_seconds: 1200.0,
        stack_size: 30,
        weight: 0.1,
        waste_points: 2.0,
    }
}

pub fn berries() -> FoodItem {
    FoodItem {
        name: "berries".to_string(),
        points: 20.0,
        spoil_seconds: 600.0,
        stack_size: 100,
        weight: 0.02,
        waste_points: 1.0,
    }
}

pub fn prime_meat() -> FoodItem {
    FoodItem {
        name: "prime_meat".to_string(),
        points: 50.0,
        spoil_seconds: 400.0,
        stack_size: 20,
        weight: 0.1,
        waste_points: 0.0,
    }
}

// ===========================================================================
// Species constructors
// ===========================================================================

pub fn carnivore_id() -> SpeciesId {
    SpeciesId(0)
}
pub fn herbivore_id() -> SpeciesId {
    SpeciesId(1)
}

/// Large carnivore with the reference catalog growth constants.
pub fn carnivore() -> CreatureSpecies {
    CreatureSpecies {
        name: "carnivore".to_string(),
        age_speed: 0.000003,
        age_speed_mult: 1.7,
        birth_type: BirthType::Incubation,
        birth_speed: 0.005556,
        birth_speed_mult: 1.7,
        base_food_rate: 0.001852,
        baby_food_rate: 25.5,
        extra_baby_food_rate: 20.0,
        weight: 500.0,
        diet: vec![
            DietEntry::new(raw_meat_id()),
            DietEntry::new(cooked_meat_id()),
            DietEntry::with_multiplier(prime_meat_id(), 0.5),
        ],
    }
}

/// Live-bearing herbivore.
pub fn herbivore() -> CreatureSpecies {
    CreatureSpecies {
        name: "herbivore".to_string(),
        age_speed: 0.000035,
        age_speed_mult: 1.0,
        birth_type: BirthType::Gestation,
        birth_speed: 0.000035,
        birth_speed_mult: 2.0,
        base_food_rate: 0.001543,
        baby_food_rate: 25.5,
        extra_baby_food_rate: 20.0,
        weight: 350.0,
        diet: vec![DietEntry::new(berries_id())],
    }
}

// ===========================================================================
// Catalog and model helpers
// ===========================================================================

/// Catalog with the four foods and two species above, registered in id order.
pub fn reference_catalog() -> Catalog {
    let mut b = CatalogBuilder::new();
    b.register_food("raw_meat", raw_meat());
    b.register_food("cooked_meat", cooked_meat());
    b.register_food("berries", berries());
    b.register_food("prime_meat", prime_meat());
    b.register_species("carnivore", carnivore());
    b.register_species("herbivore", herbivore());
    match b.build() {
        Ok(catalog) => catalog,
        Err(e) => panic!("reference catalog must build: {e}"),
    }
}

pub fn carnivore_model(settings: &ServerSettings) -> GrowthModel {
    match GrowthModel::new(&carnivore(), settings) {
        Ok(model) => model,
        Err(e) => panic!("carnivore model must build: {e}"),
    }
}

pub fn baby_carnivore(progress: f64) -> CreatureInstance {
    CreatureInstance::new(carnivore_id(), progress)
}

/// Relative closeness check for floating-point assertions.
pub fn approx(a: f64, b: f64, rel: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= rel * a.abs().max(b.abs())
}
