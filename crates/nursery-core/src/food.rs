//! Food items and the value objects derived from them.
//!
//! A [`FoodItem`] is catalog data. A [`FoodValue`] is the normalized view the
//! simulators work with: points and spoil time after container, nursing and
//! per-species multipliers. A [`ConsumptionRate`] converts a points-per-second
//! drain into items per second.

use serde::{Deserialize, Serialize};

use crate::error::NurseryError;
use crate::settings::ServerSettings;

/// Spoil-time multiplier of a creature's personal inventory.
pub const INVENTORY_SPOIL_MULTIPLIER: f64 = 4.0;

/// Spoil-time multiplier of a shared feeding trough.
pub const TROUGH_SPOIL_MULTIPLIER: f64 = 4.0;

/// A food item as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    /// Nutritional value of one item.
    pub points: f64,
    /// Seconds for one item to spoil in a player inventory. 0 = never spoils.
    pub spoil_seconds: f64,
    /// Maximum items per stack.
    pub stack_size: u32,
    /// Carry weight of one item.
    pub weight: f64,
    /// Points generated as waste when the item leaves a trough.
    #[serde(default)]
    pub waste_points: f64,
}

impl FoodItem {
    /// Check the item for values that would break the simulators.
    pub fn validate(&self) -> Result<(), NurseryError> {
        FoodValue::new(self.points, self.spoil_seconds, self.waste_points)?;
        if self.stack_size == 0 {
            return Err(NurseryError::InvalidConfiguration(format!(
                "food '{}' has a stack size of 0",
                self.name
            )));
        }
        if !(self.weight.is_finite() && self.weight >= 0.0) {
            return Err(NurseryError::InvalidConfiguration(format!(
                "food '{}' has invalid weight {}",
                self.name, self.weight
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FoodValue
// ---------------------------------------------------------------------------

/// Normalized nutritional value and spoil time of one food item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodValue {
    points: f64,
    spoil_seconds: f64,
    waste_points: f64,
}

impl FoodValue {
    /// Rejects negative or non-finite points, spoil time, or waste.
    pub fn new(points: f64, spoil_seconds: f64, waste_points: f64) -> Result<Self, NurseryError> {
        for (name, v) in [
            ("points", points),
            ("spoil_seconds", spoil_seconds),
            ("waste_points", waste_points),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(NurseryError::InvalidConfiguration(format!(
                    "food {name} must be non-negative, got {v}"
                )));
            }
        }
        Ok(Self {
            points,
            spoil_seconds,
            waste_points,
        })
    }

    pub fn from_item(item: &FoodItem) -> Result<Self, NurseryError> {
        Self::new(item.points, item.spoil_seconds, item.waste_points)
    }

    pub fn points(&self) -> f64 {
        self.points
    }

    pub fn spoil_seconds(&self) -> f64 {
        self.spoil_seconds
    }

    pub fn waste_points(&self) -> f64 {
        self.waste_points
    }

    /// Whether the item spoils at all.
    pub fn spoils(&self) -> bool {
        self.spoil_seconds > 0.0
    }

    /// Scale spoil time (container or server multiplier).
    pub fn with_spoil_multiplier(self, multiplier: f64) -> Self {
        Self {
            spoil_seconds: self.spoil_seconds * multiplier.max(0.0),
            ..self
        }
    }

    /// Scale points by a feeding-assist effectiveness.
    pub fn with_nursing_effectiveness(self, multiplier: f64) -> Self {
        Self {
            points: self.points * multiplier.max(0.0),
            ..self
        }
    }

    /// Scale points by a per-species food multiplier.
    pub fn with_species_multiplier(self, multiplier: f64) -> Self {
        Self {
            points: self.points * multiplier.max(0.0),
            ..self
        }
    }
}

// ---------------------------------------------------------------------------
// ConsumptionRate
// ---------------------------------------------------------------------------

/// A food drain expressed both in points and in items per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRate {
    pub points_per_second: f64,
    pub items_per_second: f64,
}

impl ConsumptionRate {
    /// `items_per_second` is 0 when the food has no points and never negative.
    pub fn new(points_per_second: f64, food: &FoodValue) -> Self {
        let points_per_second = points_per_second.max(0.0);
        let items_per_second = if food.points() > 0.0 {
            points_per_second / food.points()
        } else {
            0.0
        };
        Self {
            points_per_second,
            items_per_second,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Number of items needed to supply `points`, given a per-species multiplier.
///
/// Returns 0 when the effective item value is 0.
pub fn food_points_to_items(points: f64, food: &FoodItem, species_multiplier: f64) -> f64 {
    let per_item = food.points * species_multiplier.max(0.0);
    if per_item > 0.0 {
        points / per_item
    } else {
        0.0
    }
}

/// Spoil time of one item inside a container with the given multiplier.
pub fn container_spoil_seconds(
    food: &FoodItem,
    container_multiplier: f64,
    settings: &ServerSettings,
) -> f64 {
    food.spoil_seconds * container_multiplier.max(0.0) * settings.consumables_spoil_time.max(0.0)
}

/// Stack size after the server stack multiplier. Never below 1.
pub fn effective_stack_size(food: &FoodItem, settings: &ServerSettings) -> u32 {
    let scaled = (food.stack_size as f64 * settings.stack_multiplier).floor();
    if scaled.is_finite() && scaled >= 1.0 {
        scaled.min(u32::MAX as f64) as u32
    } else {
        1
    }
}
