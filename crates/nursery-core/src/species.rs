//! Creature species reference data and per-creature instance records.

use serde::{Deserialize, Serialize};

use crate::error::NurseryError;
use crate::id::{FoodId, SpeciesId};

/// How a species' offspring arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BirthType {
    /// Egg, hatched after an incubation period.
    #[default]
    Incubation,
    /// Live birth after a gestation period.
    Gestation,
}

/// A food the species will eat, with its per-species effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DietEntry {
    pub food: FoodId,
    /// Multiplier on the food's points for this species (1.0 = as listed).
    pub multiplier: f64,
}

impl DietEntry {
    pub fn new(food: FoodId) -> Self {
        Self {
            food,
            multiplier: 1.0,
        }
    }

    pub fn with_multiplier(food: FoodId, multiplier: f64) -> Self {
        Self { food, multiplier }
    }
}

/// Immutable growth-rate constants for one species.
///
/// `birth_speed`/`birth_speed_mult` hold the egg constants for
/// [`BirthType::Incubation`] species and the gestation constants for
/// [`BirthType::Gestation`] species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureSpecies {
    pub name: String,
    pub age_speed: f64,
    pub age_speed_mult: f64,
    pub birth_type: BirthType,
    pub birth_speed: f64,
    pub birth_speed_mult: f64,
    pub base_food_rate: f64,
    pub baby_food_rate: f64,
    pub extra_baby_food_rate: f64,
    /// Reference carry weight of an adult.
    pub weight: f64,
    /// Permitted foods in preference order.
    #[serde(default)]
    pub diet: Vec<DietEntry>,
}

impl CreatureSpecies {
    /// Diet entry for `food`, if the species eats it.
    pub fn diet_entry(&self, food: FoodId) -> Option<&DietEntry> {
        self.diet.iter().find(|d| d.food == food)
    }

    pub fn eats(&self, food: FoodId) -> bool {
        self.diet_entry(food).is_some()
    }

    /// Per-species multiplier for `food`; 1.0 when the food is not listed.
    pub fn food_multiplier(&self, food: FoodId) -> f64 {
        self.diet_entry(food).map(|d| d.multiplier).unwrap_or(1.0)
    }
}

/// One tracked creature (or `quantity` identical ones).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureInstance {
    pub species: SpeciesId,
    /// Fraction of growth elapsed, 0 = newborn, 1 = adult.
    pub maturation_progress: f64,
    /// Number of identical instances (batched trough scenarios).
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Creature-specific stomach cap. Enables the growth-fill bonus rate.
    #[serde(default)]
    pub max_food_capacity: Option<f64>,
    /// Leveled carry weight. Falls back to the species reference weight.
    #[serde(default)]
    pub weight: Option<f64>,
}

fn default_quantity() -> u32 {
    1
}

impl CreatureInstance {
    pub fn new(species: SpeciesId, maturation_progress: f64) -> Self {
        Self {
            species,
            maturation_progress,
            quantity: 1,
            max_food_capacity: None,
            weight: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_max_food_capacity(mut self, capacity: f64) -> Self {
        self.max_food_capacity = Some(capacity);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Lenient normalization for interactive callers.
    ///
    /// Progress is clamped into `[0, 1]` (NaN becomes 0), a non-positive or
    /// non-finite weight becomes the species reference weight, and a zero
    /// quantity becomes 1. Never fails.
    pub fn normalized(&self, species: &CreatureSpecies) -> CreatureInstance {
        let progress = normalize_progress(self.maturation_progress);
        if progress != self.maturation_progress {
            log::warn!(
                "maturation progress {} clamped to {progress}",
                self.maturation_progress
            );
        }
        CreatureInstance {
            species: self.species,
            maturation_progress: progress,
            quantity: self.quantity.max(1),
            max_food_capacity: self.max_food_capacity.filter(|c| c.is_finite() && *c > 0.0),
            weight: Some(normalize_weight(self.weight, species)),
        }
    }

    /// Strict validation for programmatic callers.
    ///
    /// Returns [`NurseryError::OutOfRange`] instead of clamping.
    pub fn validated(&self, species: &CreatureSpecies) -> Result<CreatureInstance, NurseryError> {
        let p = self.maturation_progress;
        if !(0.0..=1.0).contains(&p) {
            return Err(NurseryError::OutOfRange {
                field: "maturation_progress",
                value: p,
            });
        }
        if let Some(w) = self.weight {
            if !(w.is_finite() && w > 0.0) {
                return Err(NurseryError::OutOfRange {
                    field: "weight",
                    value: w,
                });
            }
        }
        if let Some(c) = self.max_food_capacity {
            if !(c.is_finite() && c > 0.0) {
                return Err(NurseryError::OutOfRange {
                    field: "max_food_capacity",
                    value: c,
                });
            }
        }
        if self.quantity == 0 {
            return Err(NurseryError::OutOfRange {
                field: "quantity",
                value: 0.0,
            });
        }
        Ok(CreatureInstance {
            weight: Some(self.weight.unwrap_or(species.weight)),
            ..self.clone()
        })
    }

    /// Carry weight after normalization.
    pub fn effective_weight(&self, species: &CreatureSpecies) -> f64 {
        normalize_weight(self.weight, species)
    }
}

/// Clamp a maturation fraction into `[0, 1]`; NaN becomes 0.
pub fn normalize_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

fn normalize_weight(weight: Option<f64>, species: &CreatureSpecies) -> f64 {
    match weight {
        Some(w) if w.is_finite() && w > 0.0 => w,
        _ => species.weight,
    }
}
