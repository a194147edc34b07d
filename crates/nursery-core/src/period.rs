//! Food consumed over a time window of growth.
//!
//! The food-rate curve is linear between birth and maturity, so the food
//! eaten over a window is a trapezoid:
//!
//! ```text
//! food(start, end) = 0.5 * dt * (rate(start) - rate(end)) + rate(end) * dt
//! ```
//!
//! with `end` clamped to `[start, maturation_time]`.

use serde::{Deserialize, Serialize};

use crate::food::{FoodItem, food_points_to_items};
use crate::growth::GrowthModel;
use crate::settings::ServerSettings;

/// Seconds in one day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Maximum number of days the daily breakdown will emit.
pub const MAX_BREAKDOWN_DAYS: usize = 100;

/// Food points consumed between `start` and `end` seconds after birth.
///
/// Zero-length and inverted windows yield 0. The window is cut off at
/// maturity.
pub fn food_for_period(model: &GrowthModel, start: f64, end: f64) -> f64 {
    let start = start.max(0.0);
    let end = end.min(model.maturation_time).max(start);
    let dt = end - start;
    if dt <= 0.0 {
        return 0.0;
    }
    let rate_start = model.food_rate_at(start);
    let rate_end = model.food_rate_at(end);
    0.5 * dt * (rate_start - rate_end) + rate_end * dt
}

/// Food points from `progress` to adulthood.
pub fn total_food_to_adulthood(model: &GrowthModel, progress: f64) -> f64 {
    food_to_progress(model, progress, 1.0)
}

/// Food points to grow from one maturation fraction to another.
pub fn food_to_progress(model: &GrowthModel, from: f64, to: f64) -> f64 {
    food_for_period(model, model.elapsed_at(from), model.elapsed_at(to))
}

/// Food needed for one day of growth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFood {
    /// 1-based day index.
    pub day: u32,
    pub start_seconds: f64,
    pub end_seconds: f64,
    /// Food points, loss factor applied.
    pub points: f64,
    /// Items of the chosen food, loss factor applied.
    pub items: f64,
}

/// Day-by-day food requirement from `progress` until maturity.
///
/// The last day is partial when maturity falls inside it. Emits at most
/// [`MAX_BREAKDOWN_DAYS`] entries.
pub fn daily_breakdown(
    model: &GrowthModel,
    progress: f64,
    food: &FoodItem,
    species_multiplier: f64,
    settings: &ServerSettings,
) -> Vec<DailyFood> {
    let mut days = Vec::new();
    let mut start = model.elapsed_at(progress);

    while start < model.maturation_time && days.len() < MAX_BREAKDOWN_DAYS {
        let end = (start + SECONDS_PER_DAY).min(model.maturation_time);
        let points = settings.with_loss(food_for_period(model, start, end));
        days.push(DailyFood {
            day: days.len() as u32 + 1,
            start_seconds: start,
            end_seconds: end,
            points,
            items: food_points_to_items(points, food, species_multiplier),
        });
        start = end;
    }

    if start < model.maturation_time {
        log::debug!(
            "daily breakdown stopped at {MAX_BREAKDOWN_DAYS} days with {:.0}s of growth left",
            model.maturation_time - start
        );
    }
    days
}
