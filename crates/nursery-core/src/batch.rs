//! Many independent simulations in one call.
//!
//! Every buffer run and threshold search owns its state, so a batch needs no
//! coordination. With the `parallel` feature the work is spread over the
//! rayon pool; without it the same results come back sequentially, in input
//! order either way.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::buffer::{BufferReport, BufferRequest, buffer_time};
use crate::error::NurseryError;
use crate::food::FoodItem;
use crate::growth::GrowthModel;
use crate::settings::ServerSettings;
use crate::threshold::{HandFeedThreshold, solve_hand_feed_threshold};

/// Buffer time for each request, in input order.
pub fn buffer_times(
    model: &GrowthModel,
    food: &FoodItem,
    settings: &ServerSettings,
    requests: &[BufferRequest],
) -> Result<Vec<BufferReport>, NurseryError> {
    #[cfg(feature = "parallel")]
    let iter = requests.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = requests.iter();

    iter.map(|r| buffer_time(model, food, settings, r)).collect()
}

/// Hand-feed threshold for each carry weight, in input order.
pub fn hand_feed_thresholds(
    model: &GrowthModel,
    food: &FoodItem,
    species_multiplier: f64,
    settings: &ServerSettings,
    weights: &[f64],
) -> Result<Vec<HandFeedThreshold>, NurseryError> {
    #[cfg(feature = "parallel")]
    let iter = weights.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = weights.iter();

    iter.map(|&w| solve_hand_feed_threshold(model, food, species_multiplier, settings, w))
        .collect()
}
