//! Steady-state fill estimates for a feeding container.
//!
//! These are closed-form approximations, not simulations: the creatures'
//! current consumption is treated as constant and every stack spoils at a
//! fixed rate. They answer "how many stacks should go in" fast enough for
//! interactive recommendations; [`crate::trough`] gives the exact answer.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::NurseryError;
use crate::food::{
    ConsumptionRate, FoodValue, container_spoil_seconds, effective_stack_size,
};
use crate::growth::GrowthModel;
use crate::id::FoodId;
use crate::settings::ServerSettings;
use crate::species::CreatureInstance;

/// Why a requested duration cannot be met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitReason {
    /// Even a single full stack spoils before the duration ends.
    Spoilage,
    /// The creatures eat a full container before the duration ends.
    Consumption,
    /// The stacks needed exceed the container's slots.
    Capacity,
}

/// Recommended fill for a desired duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackPlan {
    pub stacks_needed: u32,
    pub max_achievable_duration_hours: f64,
    pub is_achievable: bool,
    pub limit_reason: Option<LimitReason>,
    /// Containers needed when one full container is not enough.
    pub troughs_needed: Option<u32>,
}

/// Largest fill at which consumption keeps pace with per-stack spoilage.
///
/// Unbounded (`u32::MAX`) when nothing spoils.
pub fn max_stacks_for(consumption_items_per_second: f64, spoilage_rate_per_stack: f64) -> u32 {
    if spoilage_rate_per_stack <= 0.0 {
        return u32::MAX;
    }
    let ratio = (consumption_items_per_second.max(0.0) / spoilage_rate_per_stack).floor();
    if ratio >= u32::MAX as f64 {
        u32::MAX
    } else {
        ratio as u32
    }
}

/// Closed-form fill calculator for one food type and a group of creatures.
#[derive(Debug, Clone)]
pub struct EfficiencyCalculator {
    consumption: ConsumptionRate,
    stack_size: u32,
    /// Seconds for one item to spoil in the container. 0 = never.
    spoil_seconds: f64,
    use_stasis_mode: bool,
}

impl EfficiencyCalculator {
    /// Aggregate the current consumption of `creatures` for `food`.
    ///
    /// Creatures whose species does not eat the food contribute nothing.
    pub fn new(
        catalog: &Catalog,
        settings: &ServerSettings,
        creatures: &[CreatureInstance],
        food: FoodId,
        container_multiplier: f64,
    ) -> Result<Self, NurseryError> {
        let item = catalog.require_food(food)?;
        let value = FoodValue::from_item(item)?.with_nursing_effectiveness(settings.nursing_multiplier);

        let mut consumption = ConsumptionRate {
            points_per_second: 0.0,
            items_per_second: 0.0,
        };
        for instance in creatures {
            let species = catalog.require_species(instance.species)?;
            let Some(diet) = species.diet_entry(food) else {
                continue;
            };
            let instance = instance.normalized(species);
            let model = GrowthModel::new(species, settings)?;
            let rate = model.food_rate_at_progress(instance.maturation_progress)
                * instance.quantity as f64;
            let per_species = ConsumptionRate::new(rate, &value.with_species_multiplier(diet.multiplier));
            consumption.points_per_second += per_species.points_per_second;
            consumption.items_per_second += per_species.items_per_second;
        }

        Ok(Self {
            consumption,
            stack_size: effective_stack_size(item, settings),
            spoil_seconds: container_spoil_seconds(item, container_multiplier, settings),
            use_stasis_mode: settings.use_stasis_mode,
        })
    }

    pub fn consumption(&self) -> ConsumptionRate {
        self.consumption
    }

    pub fn stack_size(&self) -> u32 {
        self.stack_size
    }

    /// Items per second one non-empty stack loses to spoilage.
    pub fn spoilage_rate_per_stack(&self) -> f64 {
        if self.spoil_seconds > 0.0 {
            1.0 / self.spoil_seconds
        } else {
            0.0
        }
    }

    /// Equilibrium fill level (see [`max_stacks_for`]).
    pub fn max_stacks(&self) -> u32 {
        max_stacks_for(self.consumption.items_per_second, self.spoilage_rate_per_stack())
    }

    /// Recommended stack count for a container with `max_slots` slots.
    pub fn smart_fill(&self, max_slots: u32) -> u32 {
        if self.consumption.items_per_second <= 0.0 {
            return 0;
        }
        self.max_stacks().min(max_slots).max(1.min(max_slots))
    }

    /// Stacks needed to cover `desired_hours`, within `max_slots` slots.
    pub fn calculate_stacks_for_duration(&self, desired_hours: f64, max_slots: u32) -> StackPlan {
        let desired = desired_hours.max(0.0) * 3600.0;
        let stack = self.stack_size as f64;
        let spoil_rate = self.spoilage_rate_per_stack();
        let consumption = self.consumption.items_per_second;

        // A full stack can never outlast its own spoilage.
        let spoil_ceiling = if spoil_rate > 0.0 {
            stack * self.spoil_seconds
        } else {
            f64::INFINITY
        };
        if desired > spoil_ceiling {
            return StackPlan {
                stacks_needed: max_slots,
                max_achievable_duration_hours: spoil_ceiling / 3600.0,
                is_achievable: false,
                limit_reason: Some(LimitReason::Spoilage),
                troughs_needed: None,
            };
        }

        let slots = max_slots as f64;
        let depletion = consumption + slots * spoil_rate;
        let consumption_limited = if depletion > 0.0 {
            slots * stack / depletion
        } else {
            f64::INFINITY
        };
        let max_duration = consumption_limited.min(spoil_ceiling);
        let max_hours = max_duration / 3600.0;

        if desired > max_duration {
            let troughs = if max_duration > 0.0 {
                (desired / max_duration).ceil().min(u32::MAX as f64) as u32
            } else {
                u32::MAX
            };
            return StackPlan {
                stacks_needed: max_slots,
                max_achievable_duration_hours: max_hours,
                is_achievable: false,
                limit_reason: Some(LimitReason::Consumption),
                troughs_needed: Some(troughs),
            };
        }

        let needed = if self.use_stasis_mode {
            self.stasis_stacks(desired, max_slots)
        } else {
            self.render_stacks(desired, max_slots)
        };
        match needed {
            Some(n) => StackPlan {
                stacks_needed: n,
                max_achievable_duration_hours: max_hours,
                is_achievable: true,
                limit_reason: None,
                troughs_needed: None,
            },
            None => StackPlan {
                stacks_needed: max_slots,
                max_achievable_duration_hours: max_hours,
                is_achievable: false,
                limit_reason: Some(LimitReason::Capacity),
                troughs_needed: None,
            },
        }
    }

    /// Offline container: every stack is charged the spoilage of the whole
    /// duration up front.
    fn stasis_stacks(&self, duration: f64, max_slots: u32) -> Option<u32> {
        let eaten = self.consumption.items_per_second * duration;
        if eaten <= 0.0 {
            return Some(0);
        }
        let spoiled_fraction = (duration * self.spoilage_rate_per_stack() / self.stack_size as f64).min(1.0);
        let capacity = self.stack_size as f64 * (1.0 - spoiled_fraction);
        if capacity <= 0.0 {
            return None;
        }
        let n = (eaten / capacity).ceil();
        (n <= max_slots as f64).then_some(n as u32)
    }

    /// Loaded container: stacks are eaten one after another, and each stack
    /// spoils only until the creatures finish it.
    ///
    /// With consumption `c`, per-stack spoilage `r` and stack size `s`, the
    /// time covered by the first `k` stacks is
    ///
    /// ```text
    /// T(k) = s / r * (1 - (c / (c + r))^k)     (r > 0)
    /// T(k) = k * s / c                         (r = 0)
    /// ```
    ///
    /// so the count is solved directly and never approaches the spoil
    /// ceiling `s / r` one slot at a time.
    fn render_stacks(&self, duration: f64, max_slots: u32) -> Option<u32> {
        let consumption = self.consumption.items_per_second;
        if consumption <= 0.0 || duration <= 0.0 {
            return Some(0);
        }
        let spoil_rate = self.spoilage_rate_per_stack();
        let stack = self.stack_size as f64;
        if spoil_rate > 0.0 && duration * spoil_rate >= stack {
            return None;
        }

        let decay = (spoil_rate / consumption).ln_1p();
        let spoils = decay > 0.0;
        let covered = |k: f64| {
            if spoils {
                stack / spoil_rate * -(-k * decay).exp_m1()
            } else {
                k * stack / consumption
            }
        };
        let mut k = if spoils {
            (-(-duration * spoil_rate / stack).ln_1p() / decay).ceil()
        } else {
            (duration * consumption / stack).ceil()
        };
        if !k.is_finite() {
            return None;
        }
        k = k.max(1.0);

        // Correct for rounding in the estimate.
        for _ in 0..4 {
            if k > 1.0 && covered(k - 1.0) >= duration {
                k -= 1.0;
            } else if covered(k) < duration {
                k += 1.0;
            } else {
                break;
            }
        }
        (k <= max_slots as f64).then_some(k as u32)
    }
}
