//! Server-wide speed and economy settings.
//!
//! Every field has a default, and absent keys in a settings file fall back to
//! those defaults rather than failing. Keys use the host game's camelCase
//! names (`consumptionSpeed`, `gen2GrowthEffect`, ...).

use serde::{Deserialize, Serialize};

/// Recognized server options that scale growth, birth, food and spoilage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerSettings {
    /// Food-drain multiplier applied to the whole food-rate curve.
    pub consumption_speed: f64,
    /// Growth-speed multiplier.
    pub maturation_speed: f64,
    /// Birth/incubation speed multiplier.
    pub hatch_speed: f64,
    /// Percent surcharge added to computed food totals.
    pub loss_factor: f64,
    /// Birth time is divided by 1.5 when set.
    #[serde(rename = "gen2HatchEffect")]
    pub gen2_hatch_effect: bool,
    /// Maturation time is halved when set.
    #[serde(rename = "gen2GrowthEffect")]
    pub gen2_growth_effect: bool,
    /// Spoil duration multiplier.
    pub consumables_spoil_time: f64,
    /// Stack size multiplier.
    pub stack_multiplier: f64,
    /// Effective food points multiplier (feeding-assist items).
    pub nursing_multiplier: f64,
    /// Offline containers: spoilage computed once over the whole duration.
    pub use_stasis_mode: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            consumption_speed: 1.0,
            maturation_speed: 1.0,
            hatch_speed: 1.0,
            loss_factor: 0.0,
            gen2_hatch_effect: false,
            gen2_growth_effect: false,
            consumables_spoil_time: 1.0,
            stack_multiplier: 1.0,
            nursing_multiplier: 1.0,
            use_stasis_mode: false,
        }
    }
}

impl ServerSettings {
    /// Apply the `loss_factor` surcharge to a computed food total.
    pub fn with_loss(&self, amount: f64) -> f64 {
        amount * (1.0 + self.loss_factor.max(0.0) / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_table() {
        let s = ServerSettings::default();
        assert_eq!(s.consumption_speed, 1.0);
        assert_eq!(s.maturation_speed, 1.0);
        assert_eq!(s.hatch_speed, 1.0);
        assert_eq!(s.loss_factor, 0.0);
        assert!(!s.gen2_hatch_effect);
        assert!(!s.gen2_growth_effect);
        assert_eq!(s.consumables_spoil_time, 1.0);
        assert_eq!(s.stack_multiplier, 1.0);
        assert_eq!(s.nursing_multiplier, 1.0);
        assert!(!s.use_stasis_mode);
    }

    #[test]
    fn absent_keys_fall_back_to_defaults() {
        let s: ServerSettings =
            serde_json::from_str(r#"{"maturationSpeed": 5.0, "gen2GrowthEffect": true}"#).unwrap();
        assert_eq!(s.maturation_speed, 5.0);
        assert!(s.gen2_growth_effect);
        assert_eq!(s.consumption_speed, 1.0);
        assert_eq!(s.nursing_multiplier, 1.0);
    }

    #[test]
    fn empty_object_is_default() {
        let s: ServerSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(s, ServerSettings::default());
    }

    #[test]
    fn loss_factor_is_percent_surcharge() {
        let s = ServerSettings {
            loss_factor: 25.0,
            ..Default::default()
        };
        assert!((s.with_loss(400.0) - 500.0).abs() < 1e-9);
        assert_eq!(ServerSettings::default().with_loss(400.0), 400.0);
    }

    #[test]
    fn negative_loss_factor_is_ignored() {
        let s = ServerSettings {
            loss_factor: -10.0,
            ..Default::default()
        };
        assert_eq!(s.with_loss(100.0), 100.0);
    }
}
