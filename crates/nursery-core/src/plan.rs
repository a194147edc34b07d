//! Rearing plan: the single call an interactive front end makes.
//!
//! Looks up the species and food, normalizes (or validates) the creature
//! inputs, and bundles every per-creature answer the engine can give:
//! timings, food to adulthood, a daily breakdown, how long the creature's
//! own inventory lasts, and when it can start feeding itself.

use serde::{Deserialize, Serialize};

use crate::buffer::{BufferReport, BufferRequest, buffer_time};
use crate::catalog::Catalog;
use crate::error::NurseryError;
use crate::food::{FoodItem, effective_stack_size, food_points_to_items};
use crate::growth::GrowthModel;
use crate::id::{FoodId, SpeciesId};
use crate::period::{DailyFood, daily_breakdown, total_food_to_adulthood};
use crate::settings::ServerSettings;
use crate::species::{CreatureInstance, CreatureSpecies};
use crate::threshold::{HandFeedThreshold, carry_capacity_items, solve_hand_feed_threshold};

/// What the caller knows about one creature.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RearingRequest {
    pub species: Option<SpeciesId>,
    pub food: Option<FoodId>,
    /// Fraction of growth elapsed.
    pub maturation_progress: f64,
    /// Leveled carry weight. `None` uses the species reference weight.
    pub weight: Option<f64>,
    /// Stacks of `food` on hand. When set, the plan reports how long that
    /// supply feeds the creature.
    pub stacks: Option<f64>,
}

impl RearingRequest {
    pub fn new(species: SpeciesId, food: FoodId, maturation_progress: f64) -> Self {
        Self {
            species: Some(species),
            food: Some(food),
            maturation_progress,
            weight: None,
            stacks: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_stacks(mut self, stacks: f64) -> Self {
        self.stacks = Some(stacks);
        self
    }
}

/// Everything the engine can say about raising one creature on one food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RearingPlan {
    pub species: SpeciesId,
    pub food: FoodId,
    /// Maturation fraction the plan was computed for, after normalization.
    pub maturation_progress: f64,
    /// Carry weight the plan was computed for.
    pub weight: f64,
    pub model: GrowthModel,
    pub elapsed_seconds: f64,
    pub time_to_adult_seconds: f64,
    /// Zero once Juvenile.
    pub time_to_juvenile_seconds: f64,
    /// Current food rate in points per second.
    pub food_rate: f64,
    /// Food points to adulthood, loss factor applied.
    pub food_to_adult_points: f64,
    /// Items of `food` to adulthood, loss factor applied.
    pub food_to_adult_items: f64,
    pub daily: Vec<DailyFood>,
    /// Whole items of `food` the creature can carry right now.
    pub carry_capacity_items: f64,
    /// How long a full personal inventory lasts.
    pub carry_buffer: BufferReport,
    /// How long the requested stacks last, if any were given.
    pub supply_buffer: Option<BufferReport>,
    pub hand_feed: HandFeedThreshold,
}

impl RearingPlan {
    pub fn is_adult(&self) -> bool {
        self.time_to_adult_seconds <= 0.0
    }

    /// The creature's own inventory outlasts the time to Juvenile.
    pub fn self_sufficient(&self) -> bool {
        self.carry_buffer.capped || self.carry_buffer.seconds >= self.time_to_juvenile_seconds
    }
}

/// Build a plan, clamping out-of-range inputs.
pub fn plan_rearing(
    catalog: &Catalog,
    settings: &ServerSettings,
    request: &RearingRequest,
) -> Result<RearingPlan, NurseryError> {
    let (species_id, species, food_id, food) = lookup(catalog, request)?;
    let mut instance = CreatureInstance::new(species_id, request.maturation_progress);
    instance.weight = request.weight;
    let instance = instance.normalized(species);

    let stacks = match request.stacks {
        Some(s) if s.is_finite() && s >= 0.0 => Some(s),
        Some(s) => {
            log::warn!("ignoring stack count {s}");
            None
        }
        None => None,
    };
    build_plan(settings, species, food_id, food, &instance, stacks)
}

/// Build a plan, rejecting out-of-range inputs with
/// [`NurseryError::OutOfRange`].
pub fn plan_rearing_strict(
    catalog: &Catalog,
    settings: &ServerSettings,
    request: &RearingRequest,
) -> Result<RearingPlan, NurseryError> {
    let (species_id, species, food_id, food) = lookup(catalog, request)?;
    let mut instance = CreatureInstance::new(species_id, request.maturation_progress);
    instance.weight = request.weight;
    let instance = instance.validated(species)?;

    if let Some(s) = request.stacks {
        if !(s.is_finite() && s >= 0.0) {
            return Err(NurseryError::OutOfRange {
                field: "stacks",
                value: s,
            });
        }
    }
    build_plan(settings, species, food_id, food, &instance, request.stacks)
}

fn lookup<'a>(
    catalog: &'a Catalog,
    request: &RearingRequest,
) -> Result<(SpeciesId, &'a CreatureSpecies, FoodId, &'a FoodItem), NurseryError> {
    let species_id = request.species.ok_or(NurseryError::MissingInput("species"))?;
    let food_id = request.food.ok_or(NurseryError::MissingInput("food"))?;
    let species = catalog.require_species(species_id)?;
    let food = catalog.require_food(food_id)?;
    if !species.eats(food_id) {
        log::warn!("'{}' does not list '{}' in its diet", species.name, food.name);
    }
    Ok((species_id, species, food_id, food))
}

fn build_plan(
    settings: &ServerSettings,
    species: &CreatureSpecies,
    food_id: FoodId,
    food: &FoodItem,
    instance: &CreatureInstance,
    stacks: Option<f64>,
) -> Result<RearingPlan, NurseryError> {
    let model = GrowthModel::new(species, settings)?;
    let progress = instance.maturation_progress;
    let weight = instance.effective_weight(species);
    let multiplier = species.food_multiplier(food_id);

    let food_to_adult_points = settings.with_loss(total_food_to_adulthood(&model, progress));
    let food_to_adult_items = food_points_to_items(food_to_adult_points, food, multiplier);

    let carry = carry_capacity_items(weight, progress, food)?;
    let carry_buffer = buffer_time(
        &model,
        food,
        settings,
        &BufferRequest::new(carry, progress).with_species_multiplier(multiplier),
    )?;

    let supply_buffer = match stacks {
        Some(s) => {
            let items = s * effective_stack_size(food, settings) as f64;
            let request = BufferRequest::new(items, progress).with_species_multiplier(multiplier);
            Some(buffer_time(&model, food, settings, &request)?)
        }
        None => None,
    };

    Ok(RearingPlan {
        species: instance.species,
        food: food_id,
        maturation_progress: progress,
        weight,
        elapsed_seconds: model.elapsed_at(progress),
        time_to_adult_seconds: model.time_to_adult(progress),
        time_to_juvenile_seconds: model.time_to_juvenile(progress),
        food_rate: model.food_rate_at_progress(progress),
        food_to_adult_points,
        food_to_adult_items,
        daily: daily_breakdown(&model, progress, food, multiplier, settings),
        carry_capacity_items: carry,
        carry_buffer,
        supply_buffer,
        hand_feed: solve_hand_feed_threshold(&model, food, multiplier, settings, weight)?,
        model,
    })
}
