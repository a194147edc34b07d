//! Growth model: maturation and birth timings and the food-rate curve.
//!
//! The food rate starts at `max_food_rate` at birth, decays linearly by
//! `decay_per_second`, and reaches `min_food_rate` exactly at maturity. Past
//! maturity the rate stays at the floor.
//!
//! ```text
//! maturation_time = 1 / (age_speed * age_speed_mult * maturation_speed)   (/2 with gen2 growth)
//! birth_time      = 100 / (egg_speed * egg_speed_mult * hatch_speed)       (incubation)
//!                 = 1 / (gestation_speed * gestation_speed_mult * hatch_speed) (gestation)
//!                                                                          (/1.5 with gen2 hatch)
//! max_food_rate   = base * baby * extra_baby * consumption_speed
//! min_food_rate   = base * consumption_speed
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{NurseryError, require_positive};
use crate::settings::ServerSettings;
use crate::species::{BirthType, CreatureSpecies, normalize_progress};

/// Maturation fraction at which a creature counts as Juvenile.
pub const JUVENILE_PROGRESS: f64 = 0.1;

/// Growth timings and food-rate curve for one species under one server.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthModel {
    /// Seconds from birth to adulthood.
    pub maturation_time: f64,
    /// Seconds from birth to the Juvenile threshold.
    pub baby_time: f64,
    /// Incubation or gestation seconds.
    pub birth_time: f64,
    /// Food points per second at birth.
    pub max_food_rate: f64,
    /// Food points per second at and after maturity.
    pub min_food_rate: f64,
    /// Linear decrease of the food rate per second of growth.
    pub decay_per_second: f64,
}

impl GrowthModel {
    /// Compute every timing once.
    ///
    /// Fails with [`NurseryError::InvalidConfiguration`] when a growth or
    /// birth divisor is zero, negative, or non-finite, or when a food-rate
    /// constant is negative.
    pub fn new(species: &CreatureSpecies, settings: &ServerSettings) -> Result<Self, NurseryError> {
        let maturation_time = maturation_time(species, settings)?;
        let birth_time = birth_time(species, settings)?;

        for (name, v) in [
            ("basefoodrate", species.base_food_rate),
            ("babyfoodrate", species.baby_food_rate),
            ("extrababyfoodrate", species.extra_baby_food_rate),
            ("consumptionSpeed", settings.consumption_speed),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(NurseryError::InvalidConfiguration(format!(
                    "{name} must be non-negative, got {v}"
                )));
            }
        }

        let min_food_rate = species.base_food_rate * settings.consumption_speed;
        // Baby multipliers below 1 would make the curve rise; flatten it.
        let max_food_rate = (species.base_food_rate
            * species.baby_food_rate
            * species.extra_baby_food_rate
            * settings.consumption_speed)
            .max(min_food_rate);
        let decay_per_second = (max_food_rate - min_food_rate) / maturation_time;

        Ok(Self {
            maturation_time,
            baby_time: maturation_time * JUVENILE_PROGRESS,
            birth_time,
            max_food_rate,
            min_food_rate,
            decay_per_second,
        })
    }

    /// Instantaneous food rate (points/s) at `elapsed` seconds after birth.
    pub fn food_rate_at(&self, elapsed: f64) -> f64 {
        let elapsed = elapsed.max(0.0);
        (self.max_food_rate - self.decay_per_second * elapsed).max(self.min_food_rate)
    }

    /// Food rate at a maturation fraction.
    pub fn food_rate_at_progress(&self, progress: f64) -> f64 {
        self.food_rate_at(self.elapsed_at(progress))
    }

    /// Seconds since birth at a maturation fraction (clamped into `[0, 1]`).
    pub fn elapsed_at(&self, progress: f64) -> f64 {
        normalize_progress(progress) * self.maturation_time
    }

    /// Maturation fraction after `elapsed` seconds.
    pub fn progress_at(&self, elapsed: f64) -> f64 {
        normalize_progress(elapsed / self.maturation_time)
    }

    /// Seconds to grow from one fraction to another. Zero if `to <= from`.
    pub fn time_to_progress(&self, from: f64, to: f64) -> f64 {
        (self.elapsed_at(to) - self.elapsed_at(from)).max(0.0)
    }

    /// Seconds from `progress` to adulthood.
    pub fn time_to_adult(&self, progress: f64) -> f64 {
        self.time_to_progress(progress, 1.0)
    }

    /// Seconds from `progress` to the Juvenile threshold.
    pub fn time_to_juvenile(&self, progress: f64) -> f64 {
        self.time_to_progress(progress, JUVENILE_PROGRESS)
    }
}

/// Seconds from birth to adulthood.
pub fn maturation_time(
    species: &CreatureSpecies,
    settings: &ServerSettings,
) -> Result<f64, NurseryError> {
    let rate = require_positive("agespeed", species.age_speed)?
        * require_positive("agespeedmult", species.age_speed_mult)?
        * require_positive("maturationSpeed", settings.maturation_speed)?;
    let time = require_positive("maturation rate", rate).map(|r| 1.0 / r)?;
    let time = if settings.gen2_growth_effect {
        time / 2.0
    } else {
        time
    };
    if time.is_finite() {
        Ok(time)
    } else {
        Err(NurseryError::InvalidConfiguration(format!(
            "maturation time is not finite for '{}'",
            species.name
        )))
    }
}

/// Incubation or gestation seconds.
pub fn birth_time(
    species: &CreatureSpecies,
    settings: &ServerSettings,
) -> Result<f64, NurseryError> {
    let (speed_name, mult_name, numerator) = match species.birth_type {
        BirthType::Incubation => ("eggspeed", "eggspeedmult", 100.0),
        BirthType::Gestation => ("gestationspeed", "gestationspeedmult", 1.0),
    };
    let rate = require_positive(speed_name, species.birth_speed)?
        * require_positive(mult_name, species.birth_speed_mult)?
        * require_positive("hatchSpeed", settings.hatch_speed)?;
    let time = numerator / require_positive("birth rate", rate)?;
    let time = if settings.gen2_hatch_effect {
        time / 1.5
    } else {
        time
    };
    if time.is_finite() {
        Ok(time)
    } else {
        Err(NurseryError::InvalidConfiguration(format!(
            "birth time is not finite for '{}'",
            species.name
        )))
    }
}
