//! Nursery Core -- the growth and feeding engine for creature rearing.
//!
//! Answers the questions a player asks while raising a baby creature: how
//! long until it matures, how much food it needs, how long a shared feeding
//! trough lasts before food spoils, how many stacks to put in, and when the
//! baby can carry enough food to stop being hand-fed.
//!
//! # Model
//!
//! A species' food rate falls linearly from a baby maximum at birth to an
//! adult floor at maturity. Food over a window is the closed-form area under
//! that line ([`period`]). Everything that involves spoilage is simulated in
//! fixed steps: one creature eating from its own stacks ([`buffer`], 60 s
//! steps) and many creatures sharing a trough ([`trough`], 1 s ticks). The
//! [`threshold`] solver bisects over the buffer simulation and the
//! [`efficiency`] calculator sizes trough fills in closed form.
//!
//! # Catalog Lifecycle
//!
//! Species and foods are registered once and then frozen:
//!
//! ```rust,ignore
//! let mut b = CatalogBuilder::new();
//! let meat = b.register_food("raw_meat", raw_meat);
//! let rex = b.register_species("rex", rex);
//! let catalog = b.build()?;
//! let plan = plan_rearing(&catalog, &ServerSettings::default(),
//!     &RearingRequest::new(rex, meat, 0.05))?;
//! ```
//!
//! # Key Types
//!
//! - [`growth::GrowthModel`] -- Timings and food-rate curve for one species.
//! - [`buffer::StackSpoilageSim`] -- Personal inventory simulation.
//! - [`trough::TroughSim`] -- Shared container simulation.
//! - [`efficiency::EfficiencyCalculator`] -- Stack counts for a target duration.
//! - [`catalog::Catalog`] -- Immutable species and food catalog.
//! - [`plan::RearingPlan`] -- Every per-creature answer in one record.

pub mod batch;
pub mod buffer;
pub mod catalog;
pub mod efficiency;
pub mod error;
pub mod food;
pub mod growth;
pub mod id;
pub mod period;
pub mod plan;
pub mod settings;
pub mod species;
pub mod threshold;
pub mod trough;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
