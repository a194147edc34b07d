//! Buffer time: how long a fixed food supply keeps one growing creature fed.
//!
//! Items are split into stacks. Every non-empty stack spoils on its own
//! timer, so more stacks means more items lost per step, while the creature
//! only ever eats from the first non-empty stack. Optional periodic
//! consolidation pools what is left and rebuilds full stacks, which cuts the
//! number of stacks spoiling in parallel.
//!
//! # Step pipeline
//!
//! Each call to [`StackSpoilageSim::step`] advances 60 simulated seconds:
//!
//! 1. **Consolidate** -- if a consolidation boundary was crossed, pool and rebuild.
//! 2. **Spoil** -- every non-empty stack loses `step / spoil_seconds` items.
//! 3. **Eat** -- the step's consumption is drawn from the first non-empty stack.
//! 4. **Clamp** -- stacks driven below zero are set to zero.

use serde::{Deserialize, Serialize};

use crate::error::NurseryError;
use crate::food::{FoodItem, FoodValue, INVENTORY_SPOIL_MULTIPLIER, effective_stack_size};
use crate::growth::GrowthModel;
use crate::settings::ServerSettings;

/// Simulated seconds per step.
pub const BUFFER_STEP_SECONDS: f64 = 60.0;

/// Safety cap: 100 simulated days.
pub const BUFFER_TIME_CAP_SECONDS: f64 = 8_640_000.0;

// ---------------------------------------------------------------------------
// Request / report
// ---------------------------------------------------------------------------

/// Input to a buffer-time run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferRequest {
    /// Items of the food type carried at the start.
    pub initial_items: f64,
    /// Maturation fraction of the creature at the start.
    pub start_progress: f64,
    /// Seconds between consolidations. 0 disables consolidation.
    #[serde(default)]
    pub consolidation_interval: f64,
    /// Diet multiplier of the creature for this food. Scales item value.
    #[serde(default = "default_species_multiplier")]
    pub species_multiplier: f64,
}

fn default_species_multiplier() -> f64 {
    1.0
}

impl BufferRequest {
    pub fn new(initial_items: f64, start_progress: f64) -> Self {
        Self {
            initial_items,
            start_progress,
            consolidation_interval: 0.0,
            species_multiplier: 1.0,
        }
    }

    pub fn with_species_multiplier(mut self, multiplier: f64) -> Self {
        self.species_multiplier = multiplier;
        self
    }

    pub fn with_consolidation(mut self, interval: f64) -> Self {
        self.consolidation_interval = interval;
        self
    }
}

/// Result of a buffer-time run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferReport {
    /// Seconds until every stack was empty (or the cap).
    pub seconds: f64,
    /// The run hit the 100-day cap. Treat as effectively unlimited.
    pub capped: bool,
}

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

/// Working state of one buffer-time run. Owned exclusively by the call.
#[derive(Debug, Clone)]
pub struct StackSpoilageSim {
    stacks: Vec<f64>,
    stack_size: f64,
    spoil_per_step: f64,
    points_per_item: f64,
    model: GrowthModel,
    /// Seconds since birth when the run started.
    start_elapsed: f64,
    /// Seconds simulated so far.
    elapsed: f64,
    consolidation_interval: f64,
    next_consolidation: f64,
}

impl StackSpoilageSim {
    pub fn new(
        model: &GrowthModel,
        food: &FoodItem,
        settings: &ServerSettings,
        request: &BufferRequest,
    ) -> Result<Self, NurseryError> {
        let value = FoodValue::from_item(food)?
            .with_spoil_multiplier(INVENTORY_SPOIL_MULTIPLIER * settings.consumables_spoil_time)
            .with_nursing_effectiveness(settings.nursing_multiplier)
            .with_species_multiplier(request.species_multiplier);
        let stack_size = effective_stack_size(food, settings) as f64;
        let spoil_per_step = if value.spoils() {
            BUFFER_STEP_SECONDS / value.spoil_seconds()
        } else {
            0.0
        };
        let initial = if request.initial_items.is_finite() {
            request.initial_items.max(0.0)
        } else {
            0.0
        };
        let interval = if request.consolidation_interval.is_finite() {
            request.consolidation_interval.max(0.0)
        } else {
            0.0
        };

        Ok(Self {
            stacks: build_stacks(initial, stack_size),
            stack_size,
            spoil_per_step,
            points_per_item: value.points(),
            model: *model,
            start_elapsed: model.elapsed_at(request.start_progress),
            elapsed: 0.0,
            consolidation_interval: interval,
            next_consolidation: interval,
        })
    }

    /// Current item count per stack, in construction order.
    pub fn stacks(&self) -> &[f64] {
        &self.stacks
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn remaining_items(&self) -> f64 {
        self.stacks.iter().sum()
    }

    pub fn is_exhausted(&self) -> bool {
        self.stacks.iter().all(|&c| c <= 0.0)
    }

    /// Advance one 60-second step.
    pub fn step(&mut self) {
        // Phase 1: consolidate.
        if self.consolidation_interval > 0.0 && self.elapsed >= self.next_consolidation {
            let pool: f64 = self.stacks.iter().map(|c| c.max(0.0)).sum();
            self.stacks = build_stacks(pool, self.stack_size);
            while self.next_consolidation <= self.elapsed {
                self.next_consolidation += self.consolidation_interval;
            }
        }

        // Phase 2: every non-empty stack spoils independently.
        for count in self.stacks.iter_mut().filter(|c| **c > 0.0) {
            *count -= self.spoil_per_step;
        }

        // Phase 3: eat from the first stack that still has items.
        let rate = self.model.food_rate_at(self.start_elapsed + self.elapsed);
        let eaten = if self.points_per_item > 0.0 {
            rate * BUFFER_STEP_SECONDS / self.points_per_item
        } else {
            0.0
        };
        if let Some(count) = self.stacks.iter_mut().find(|c| **c > 0.0) {
            *count -= eaten;
        }

        // Phase 4: clamp.
        for count in &mut self.stacks {
            if *count < 0.0 {
                *count = 0.0;
            }
        }

        self.elapsed += BUFFER_STEP_SECONDS;
    }

    /// Step until the supply is gone or the cap is reached.
    pub fn run(self) -> BufferReport {
        self.run_until(BUFFER_TIME_CAP_SECONDS)
    }

    /// Step until the supply is gone or `horizon` seconds have passed.
    ///
    /// `seconds >= horizon` in the report means the supply outlasted the
    /// horizon. The horizon never exceeds the 100-day cap.
    pub fn run_until(mut self, horizon: f64) -> BufferReport {
        let horizon = horizon.min(BUFFER_TIME_CAP_SECONDS);
        while !self.is_exhausted() && self.elapsed < horizon {
            self.step();
        }
        let capped = !self.is_exhausted() && self.elapsed >= BUFFER_TIME_CAP_SECONDS;
        if capped {
            log::debug!(
                "buffer simulation reached the {BUFFER_TIME_CAP_SECONDS}s cap with {:.1} items left",
                self.remaining_items()
            );
        }
        BufferReport {
            seconds: self.elapsed,
            capped,
        }
    }
}

/// Split `items` into full stacks followed by one partial stack.
fn build_stacks(items: f64, stack_size: f64) -> Vec<f64> {
    let mut stacks = Vec::new();
    let mut left = items;
    while left > 0.0 {
        let take = left.min(stack_size);
        stacks.push(take);
        left -= take;
    }
    stacks
}

/// Seconds of unattended survival for one creature on a fixed supply.
pub fn buffer_time(
    model: &GrowthModel,
    food: &FoodItem,
    settings: &ServerSettings,
    request: &BufferRequest,
) -> Result<BufferReport, NurseryError> {
    Ok(StackSpoilageSim::new(model, food, settings, request)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn settings() -> ServerSettings {
        ServerSettings::default()
    }

    #[test]
    fn no_food_means_no_buffer() {
        let m = carnivore_model(&settings());
        let report = buffer_time(&m, &raw_meat(), &settings(), &BufferRequest::new(0.0, 0.1)).unwrap();
        assert_eq!(report.seconds, 0.0);
        assert!(!report.capped);

        let nan = buffer_time(&m, &raw_meat(), &settings(), &BufferRequest::new(f64::NAN, 0.1)).unwrap();
        assert_eq!(nan.seconds, 0.0);
    }

    #[test]
    fn stacks_are_full_then_partial() {
        let m = carnivore_model(&settings());
        let sim = StackSpoilageSim::new(&m, &raw_meat(), &settings(), &BufferRequest::new(45.0, 0.1))
            .unwrap();
        assert_eq!(sim.stacks(), &[20.0, 20.0, 5.0]);
    }

    #[test]
    fn spoilage_hits_every_stack_but_eating_only_the_first() {
        let m = carnivore_model(&settings());
        let mut sim =
            StackSpoilageSim::new(&m, &raw_meat(), &settings(), &BufferRequest::new(60.0, 0.5))
                .unwrap();
        sim.step();
        let spoil = 60.0 / (600.0 * 4.0);
        let eaten = m.food_rate_at(m.elapsed_at(0.5)) * 60.0 / 50.0;
        let s = sim.stacks();
        assert!(approx(s[0], 20.0 - spoil - eaten, 1e-12));
        assert!(approx(s[1], 20.0 - spoil, 1e-12));
        assert!(approx(s[2], 20.0 - spoil, 1e-12));
        assert_eq!(sim.elapsed(), 60.0);
    }

    #[test]
    fn species_multiplier_scales_item_value() {
        let m = carnivore_model(&settings());
        let req = BufferRequest::new(40.0, 0.5);
        let halved = buffer_time(&m, &raw_meat(), &settings(), &req.with_species_multiplier(0.5)).unwrap();
        let half_points = FoodItem {
            points: 25.0,
            ..raw_meat()
        };
        let expected = buffer_time(&m, &half_points, &settings(), &req).unwrap();
        assert_eq!(halved, expected);

        let full = buffer_time(&m, &raw_meat(), &settings(), &req).unwrap();
        assert!(halved.seconds < full.seconds);
    }

    #[test]
    fn adult_buffer_is_finite_and_step_aligned() {
        let m = carnivore_model(&settings());
        let report = buffer_time(&m, &raw_meat(), &settings(), &BufferRequest::new(40.0, 1.0)).unwrap();
        assert!(report.seconds > 0.0);
        assert!(!report.capped);
        assert_eq!(report.seconds % BUFFER_STEP_SECONDS, 0.0);
    }

    #[test]
    fn more_food_lasts_at_least_as_long() {
        let m = carnivore_model(&settings());
        let small = buffer_time(&m, &raw_meat(), &settings(), &BufferRequest::new(20.0, 0.05)).unwrap();
        let large = buffer_time(&m, &raw_meat(), &settings(), &BufferRequest::new(80.0, 0.05)).unwrap();
        assert!(large.seconds >= small.seconds);
    }

    #[test]
    fn consolidation_slows_spoilage() {
        // An adult eats slowly, so most loss is spoilage across many stacks.
        let m = carnivore_model(&settings());
        let plain = buffer_time(&m, &raw_meat(), &settings(), &BufferRequest::new(200.0, 1.0)).unwrap();
        let sorted = buffer_time(
            &m,
            &raw_meat(),
            &settings(),
            &BufferRequest::new(200.0, 1.0).with_consolidation(600.0),
        )
        .unwrap();
        assert!(sorted.seconds > plain.seconds, "{} vs {}", sorted.seconds, plain.seconds);
    }

    #[test]
    fn nonperishable_food_with_no_value_hits_cap() {
        let m = carnivore_model(&settings());
        let food = FoodItem {
            points: 0.0,
            spoil_seconds: 0.0,
            ..raw_meat()
        };
        let report = buffer_time(&m, &food, &settings(), &BufferRequest::new(5.0, 0.1)).unwrap();
        assert!(report.capped);
        assert_eq!(report.seconds, BUFFER_TIME_CAP_SECONDS);
    }

    #[test]
    fn longer_spoil_time_extends_buffer() {
        let m = carnivore_model(&settings());
        let req = BufferRequest::new(100.0, 1.0);
        let normal = buffer_time(&m, &raw_meat(), &settings(), &req).unwrap();
        let slow = buffer_time(
            &m,
            &raw_meat(),
            &ServerSettings {
                consumables_spoil_time: 3.0,
                ..Default::default()
            },
            &req,
        )
        .unwrap();
        assert!(slow.seconds > normal.seconds);
    }

    #[test]
    fn invalid_food_is_rejected() {
        let m = carnivore_model(&settings());
        let food = FoodItem {
            points: -5.0,
            ..raw_meat()
        };
        assert!(buffer_time(&m, &food, &settings(), &BufferRequest::new(5.0, 0.1)).is_err());
    }
}
