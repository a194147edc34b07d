//! Hand-feed threshold: the earliest maturation at which a baby can carry
//! enough food to feed itself until it reaches the Juvenile threshold.
//!
//! Binary search over `[0, 0.1]` using the buffer-time simulation as the
//! oracle. The search assumes that buffer time minus time-to-Juvenile only
//! improves as the creature grows: carry capacity rises with maturation and
//! the food rate falls. `tests/proptest_core.rs` guards that assumption.

use serde::{Deserialize, Serialize};

use crate::buffer::{BufferRequest, StackSpoilageSim};
use crate::error::NurseryError;
use crate::food::FoodItem;
use crate::growth::{GrowthModel, JUVENILE_PROGRESS};
use crate::settings::ServerSettings;

/// Fixed bisection count; far below f64 resolution of `[0, 0.1]` after 50.
pub const THRESHOLD_ITERATIONS: u32 = 50;

/// Result of the threshold search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandFeedThreshold {
    /// Maturation percent (0..=10) from which the creature self-sustains.
    pub threshold_percent: f64,
    /// Seconds after birth at which that maturation is reached.
    pub threshold_time_seconds: f64,
    /// Whether any probe was feasible. When false the threshold is 0.
    pub feasible: bool,
}

/// Whole items of `food` a creature of `weight` can carry at `progress`.
pub fn carry_capacity_items(weight: f64, progress: f64, food: &FoodItem) -> Result<f64, NurseryError> {
    if !(food.weight.is_finite() && food.weight > 0.0) {
        return Err(NurseryError::InvalidConfiguration(format!(
            "food '{}' needs a positive weight to compute carry capacity",
            food.name
        )));
    }
    let carried = weight.max(0.0) * progress.clamp(0.0, 1.0);
    Ok((carried / food.weight).floor())
}

/// Find the earliest maturation in `[0, 0.1]` at which the creature's own
/// inventory covers the time left until it is Juvenile.
///
/// `species_multiplier` is the creature's diet multiplier for `food`.
/// Reports the last feasible midpoint; 0 with `feasible = false` when no
/// probe was feasible.
pub fn solve_hand_feed_threshold(
    model: &GrowthModel,
    food: &FoodItem,
    species_multiplier: f64,
    settings: &ServerSettings,
    weight: f64,
) -> Result<HandFeedThreshold, NurseryError> {
    let mut lo = 0.0;
    let mut hi = JUVENILE_PROGRESS;
    let mut candidate = None;

    for _ in 0..THRESHOLD_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        let time_to_juvenile = model.baby_time - model.maturation_time * mid;
        if time_to_juvenile <= 0.0 {
            hi = mid;
            continue;
        }

        let capacity = carry_capacity_items(weight, mid, food)?;
        let request = BufferRequest::new(capacity, mid).with_species_multiplier(species_multiplier);
        let buffer = StackSpoilageSim::new(model, food, settings, &request)?.run_until(time_to_juvenile);
        log::trace!(
            "threshold probe {mid:.6}: {capacity} items last {}s of {time_to_juvenile:.0}s",
            buffer.seconds
        );

        if buffer.seconds >= time_to_juvenile {
            candidate = Some(mid);
            hi = mid;
        } else {
            lo = mid;
        }
    }

    if candidate.is_none() {
        log::debug!("no self-sustaining maturation below {JUVENILE_PROGRESS} for '{}'", food.name);
    }
    let threshold = candidate.unwrap_or(0.0);
    Ok(HandFeedThreshold {
        threshold_percent: threshold * 100.0,
        threshold_time_seconds: threshold * model.maturation_time,
        feasible: candidate.is_some(),
    })
}
