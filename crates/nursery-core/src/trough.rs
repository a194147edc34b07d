//! Shared feeding trough: many creatures, many food stacks, one-second ticks.
//!
//! Each creature accumulates hunger at its own metabolic rate and eats one
//! item once hunger has built up past the eating threshold and exceeds the
//! item's effective value. Each stack carries its own spoilage countdown and
//! loses one item whenever the countdown runs out.
//!
//! Everything that leaves the trough is accounted for, so a report always
//! decomposes as
//!
//! ```text
//! total_food   = eaten_food + spoiled_food
//! total_points = eaten_points + spoiled_points + wasted_points
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::NurseryError;
use crate::food::{FoodValue, container_spoil_seconds, effective_stack_size, TROUGH_SPOIL_MULTIPLIER};
use crate::growth::GrowthModel;
use crate::id::FoodId;
use crate::settings::ServerSettings;
use crate::species::CreatureInstance;

/// Safety cap: 3 simulated days of one-second ticks.
pub const TROUGH_TIME_CAP_SECONDS: u64 = 259_200;

/// Hunger that must accumulate before a creature tries to eat.
pub const HUNGER_THRESHOLD: f64 = 20.0;

/// Share of a declared stomach capacity refilled over the growth period.
pub const GROWTH_FILL_COEFFICIENT: f64 = 0.75;

// ---------------------------------------------------------------------------
// Setup / report
// ---------------------------------------------------------------------------

/// What goes into the trough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TroughSetup {
    pub creatures: Vec<CreatureInstance>,
    /// Stack count per food type. Fractional counts make a partial stack.
    pub stacks: BTreeMap<FoodId, f64>,
    /// Spoil-time multiplier of the container.
    #[serde(default = "default_container_multiplier")]
    pub container_multiplier: f64,
}

fn default_container_multiplier() -> f64 {
    TROUGH_SPOIL_MULTIPLIER
}

impl Default for TroughSetup {
    fn default() -> Self {
        Self {
            creatures: Vec::new(),
            stacks: BTreeMap::new(),
            container_multiplier: TROUGH_SPOIL_MULTIPLIER,
        }
    }
}

impl TroughSetup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_creature(mut self, creature: CreatureInstance) -> Self {
        self.creatures.push(creature);
        self
    }

    pub fn with_stacks(mut self, food: FoodId, count: f64) -> Self {
        *self.stacks.entry(food).or_insert(0.0) += count;
        self
    }

    pub fn with_container_multiplier(mut self, multiplier: f64) -> Self {
        self.container_multiplier = multiplier;
        self
    }
}

/// Outcome of a trough simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TroughReport {
    /// Seconds until the trough was empty (or the cap).
    pub seconds: u64,
    /// The run hit the 3-day cap.
    pub capped: bool,
    /// Items placed in the trough.
    pub initial_food: u64,
    /// Items still in the trough at the end (non-zero only when capped).
    pub remaining_food: u64,
    /// Items that left the trough.
    pub total_food: u64,
    pub eaten_food: u64,
    pub spoiled_food: u64,
    /// Points (nutrition plus waste) of the items that left the trough.
    pub total_points: f64,
    pub eaten_points: f64,
    pub spoiled_points: f64,
    pub wasted_points: f64,
}

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct TroughStack {
    items: u32,
    /// Ticks for one item to spoil. `None` for food that never spoils.
    spoil_ticks: Option<u64>,
    countdown: u64,
    points: f64,
    waste_points: f64,
}

#[derive(Debug, Clone)]
struct TroughCreature {
    hunger: f64,
    food_rate: f64,
    min_food_rate: f64,
    decay_per_second: f64,
    growth_fill: f64,
    /// Effective points of one item per stack index; `None` = not edible.
    item_values: Vec<Option<f64>>,
}

impl TroughCreature {
    fn growing(&self) -> bool {
        self.food_rate > self.min_food_rate
    }
}

/// Working state of one trough run. Owned exclusively by the call.
#[derive(Debug, Clone)]
pub struct TroughSim {
    stacks: Vec<TroughStack>,
    creatures: Vec<TroughCreature>,
    tick: u64,
    report: TroughReport,
}

impl TroughSim {
    pub fn new(
        catalog: &Catalog,
        settings: &ServerSettings,
        setup: &TroughSetup,
    ) -> Result<Self, NurseryError> {
        if setup.stacks.is_empty() {
            return Err(NurseryError::MissingInput("food stacks"));
        }
        if setup.creatures.is_empty() {
            return Err(NurseryError::MissingInput("creatures"));
        }

        // Stacks, in food-id order.
        let mut stacks = Vec::new();
        let mut stack_foods = Vec::new();
        for (&food_id, &count) in &setup.stacks {
            let food = catalog.require_food(food_id)?;
            let value = FoodValue::from_item(food)?;
            let stack_size = effective_stack_size(food, settings);
            let spoil_seconds = container_spoil_seconds(food, setup.container_multiplier, settings);
            let spoil_ticks = (spoil_seconds > 0.0).then(|| (spoil_seconds.ceil() as u64).max(1));

            for items in split_stack_count(count, stack_size) {
                stacks.push(TroughStack {
                    items,
                    spoil_ticks,
                    countdown: spoil_ticks.unwrap_or(0),
                    points: value.points(),
                    waste_points: value.waste_points(),
                });
                stack_foods.push(food_id);
            }
        }

        // Creatures, one per unit of quantity.
        let mut creatures = Vec::new();
        for instance in &setup.creatures {
            let species = catalog.require_species(instance.species)?;
            let instance = instance.normalized(species);
            let model = GrowthModel::new(species, settings)?;
            let growth_fill = instance
                .max_food_capacity
                .map(|cap| GROWTH_FILL_COEFFICIENT * cap / model.maturation_time)
                .unwrap_or(0.0);
            let item_values: Vec<Option<f64>> = stacks
                .iter()
                .zip(&stack_foods)
                .map(|(stack, &food)| {
                    species
                        .diet_entry(food)
                        .map(|d| stack.points * settings.nursing_multiplier * d.multiplier)
                        .filter(|v| *v > 0.0)
                })
                .collect();
            let creature = TroughCreature {
                hunger: 0.0,
                food_rate: model.food_rate_at_progress(instance.maturation_progress),
                min_food_rate: model.min_food_rate,
                decay_per_second: model.decay_per_second,
                growth_fill,
                item_values,
            };
            for _ in 0..instance.quantity {
                creatures.push(creature.clone());
            }
        }

        let initial_food = stacks.iter().map(|s| s.items as u64).sum();
        Ok(Self {
            stacks,
            creatures,
            tick: 0,
            report: TroughReport {
                initial_food,
                ..Default::default()
            },
        })
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.iter().all(|s| s.items == 0)
    }

    pub fn remaining_food(&self) -> u64 {
        self.stacks.iter().map(|s| s.items as u64).sum()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance one second: creatures eat, then stacks spoil.
    pub fn step(&mut self) {
        for creature in &mut self.creatures {
            creature.hunger += creature.food_rate;
            if creature.growing() {
                creature.hunger += creature.growth_fill;
                creature.food_rate =
                    (creature.food_rate - creature.decay_per_second).max(creature.min_food_rate);
            }
            if creature.hunger < HUNGER_THRESHOLD {
                continue;
            }

            let first = self
                .stacks
                .iter()
                .enumerate()
                .find_map(|(i, s)| match creature.item_values[i] {
                    Some(value) if s.items > 0 => Some((i, value)),
                    _ => None,
                });
            if let Some((i, value)) = first {
                if value < creature.hunger {
                    let stack = &mut self.stacks[i];
                    stack.items -= 1;
                    creature.hunger -= value;
                    self.report.eaten_food += 1;
                    self.report.eaten_points += stack.points;
                    self.report.wasted_points += stack.waste_points;
                }
            }
        }

        for stack in &mut self.stacks {
            let Some(spoil_ticks) = stack.spoil_ticks else {
                continue;
            };
            if stack.items == 0 {
                continue;
            }
            stack.countdown -= 1;
            if stack.countdown == 0 {
                stack.items -= 1;
                stack.countdown = spoil_ticks;
                self.report.spoiled_food += 1;
                self.report.spoiled_points += stack.points;
                self.report.wasted_points += stack.waste_points;
            }
        }

        self.tick += 1;
    }

    /// Tick until the trough is empty or the cap is reached.
    pub fn run(mut self) -> TroughReport {
        while !self.is_empty() && self.tick < TROUGH_TIME_CAP_SECONDS {
            self.step();
        }
        let remaining = self.remaining_food();
        let mut report = self.report;
        report.seconds = self.tick;
        report.capped = remaining > 0;
        report.remaining_food = remaining;
        report.total_food = report.eaten_food + report.spoiled_food;
        report.total_points = report.eaten_points + report.spoiled_points + report.wasted_points;
        if report.capped {
            log::debug!(
                "trough simulation reached the {TROUGH_TIME_CAP_SECONDS}s cap with {remaining} items left"
            );
        }
        report
    }
}

/// Item counts for `count` stacks: whole stacks, then one partial stack.
///
/// Negative and non-finite counts yield nothing.
fn split_stack_count(count: f64, stack_size: u32) -> Vec<u32> {
    if !(count.is_finite() && count > 0.0) {
        return Vec::new();
    }
    let whole = count.floor();
    let mut items = vec![stack_size; whole as usize];
    let partial = ((count - whole) * stack_size as f64).round() as u32;
    if partial > 0 {
        items.push(partial.min(stack_size));
    }
    items
}

/// Simulate a shared trough until it is empty or three days have passed.
pub fn simulate_trough(
    catalog: &Catalog,
    settings: &ServerSettings,
    setup: &TroughSetup,
) -> Result<TroughReport, NurseryError> {
    Ok(TroughSim::new(catalog, settings, setup)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn meat_trough(progress: f64, stacks: f64) -> TroughSetup {
        TroughSetup::new()
            .with_creature(baby_carnivore(progress))
            .with_stacks(raw_meat_id(), stacks)
    }

    #[test]
    fn reference_scenario_consumes_food() {
        let catalog = reference_catalog();
        let report =
            simulate_trough(&catalog, &ServerSettings::default(), &meat_trough(0.1, 5.0)).unwrap();
        assert!(report.seconds > 0);
        assert!(report.eaten_food > 0);
        assert!(report.total_food > 0);
        assert_eq!(report.initial_food, 100);
        assert!(!report.capped);
    }

    #[test]
    fn report_decomposes() {
        let catalog = reference_catalog();
        let setup = TroughSetup::new()
            .with_creature(baby_carnivore(0.3).with_quantity(2))
            .with_stacks(raw_meat_id(), 2.0)
            .with_stacks(cooked_meat_id(), 1.5);
        let r = simulate_trough(&catalog, &ServerSettings::default(), &setup).unwrap();
        assert_eq!(r.total_food, r.eaten_food + r.spoiled_food);
        assert_eq!(r.total_food + r.remaining_food, r.initial_food);
        assert!(approx(
            r.total_points,
            r.eaten_points + r.spoiled_points + r.wasted_points,
            1e-12
        ));
        // Cooked meat carries waste points.
        assert!(r.wasted_points > 0.0);
    }

    #[test]
    fn eats_only_when_hunger_exceeds_item_value() {
        let catalog = reference_catalog();
        let mut sim = TroughSim::new(&catalog, &ServerSettings::default(), &meat_trough(0.5, 1.0)).unwrap();
        let creature = &mut sim.creatures[0];
        creature.food_rate = 0.0;
        creature.min_food_rate = 0.0;
        creature.growth_fill = 0.0;
        creature.hunger = 50.0;

        sim.step();
        assert_eq!(sim.report.eaten_food, 0);
        assert_eq!(sim.creatures[0].hunger, 50.0);

        sim.creatures[0].hunger = 50.5;
        sim.step();
        assert_eq!(sim.report.eaten_food, 1);
        assert!(approx(sim.creatures[0].hunger, 0.5, 1e-12));
    }

    #[test]
    fn partial_stacks_are_built() {
        assert_eq!(split_stack_count(2.5, 20), vec![20, 20, 10]);
        assert_eq!(split_stack_count(0.0, 20), Vec::<u32>::new());
        assert_eq!(split_stack_count(-1.0, 20), Vec::<u32>::new());
        assert_eq!(split_stack_count(f64::NAN, 20), Vec::<u32>::new());
        assert_eq!(split_stack_count(1.01, 20), vec![20]);
    }

    #[test]
    fn no_eaters_means_everything_spoils() {
        let catalog = reference_catalog();
        // Herbivores do not eat meat.
        let setup = TroughSetup::new()
            .with_creature(CreatureInstance::new(herbivore_id(), 0.5))
            .with_stacks(raw_meat_id(), 1.0);
        let r = simulate_trough(&catalog, &ServerSettings::default(), &setup).unwrap();
        assert_eq!(r.eaten_food, 0);
        assert_eq!(r.spoiled_food, 20);
        // One stack loses an item every 2400 s.
        assert_eq!(r.seconds, 20 * 2400);
    }

    #[test]
    fn nursing_reduces_items_eaten() {
        let catalog = reference_catalog();
        let setup = meat_trough(0.1, 5.0);
        let plain = simulate_trough(&catalog, &ServerSettings::default(), &setup).unwrap();
        let nursed = simulate_trough(
            &catalog,
            &ServerSettings {
                nursing_multiplier: 2.0,
                ..Default::default()
            },
            &setup,
        )
        .unwrap();
        assert!(nursed.eaten_food < plain.eaten_food);
        assert!(nursed.seconds > plain.seconds);
    }

    #[test]
    fn more_creatures_empty_the_trough_faster() {
        let catalog = reference_catalog();
        let one = simulate_trough(&catalog, &ServerSettings::default(), &meat_trough(0.2, 5.0)).unwrap();
        let four = TroughSetup::new()
            .with_creature(baby_carnivore(0.2).with_quantity(4))
            .with_stacks(raw_meat_id(), 5.0);
        let four = simulate_trough(&catalog, &ServerSettings::default(), &four).unwrap();
        assert!(four.seconds < one.seconds);
    }

    #[test]
    fn growth_fill_increases_consumption_rate() {
        let catalog = reference_catalog();
        let plain = simulate_trough(&catalog, &ServerSettings::default(), &meat_trough(0.5, 3.0)).unwrap();
        let filling = TroughSetup::new()
            .with_creature(baby_carnivore(0.5).with_max_food_capacity(20_000.0))
            .with_stacks(raw_meat_id(), 3.0);
        let filling = simulate_trough(&catalog, &ServerSettings::default(), &filling).unwrap();
        assert!(filling.eaten_food >= plain.eaten_food);
        assert!(filling.seconds <= plain.seconds);
    }

    #[test]
    fn nonperishable_uneaten_food_hits_cap() {
        let mut b = crate::catalog::CatalogBuilder::new();
        let kibble = b.register_food(
            "kibble",
            crate::food::FoodItem {
                spoil_seconds: 0.0,
                ..raw_meat()
            },
        );
        let mut species = herbivore();
        species.diet.clear();
        let id = b.register_species("herbivore", species);
        let catalog = b.build().unwrap();
        let setup = TroughSetup::new()
            .with_creature(CreatureInstance::new(id, 0.5))
            .with_stacks(kibble, 1.0);
        let r = simulate_trough(&catalog, &ServerSettings::default(), &setup).unwrap();
        assert!(r.capped);
        assert_eq!(r.seconds, TROUGH_TIME_CAP_SECONDS);
        assert_eq!(r.remaining_food, 20);
        assert_eq!(r.total_food, 0);
    }

    #[test]
    fn missing_inputs_fail_fast() {
        let catalog = reference_catalog();
        let no_food = TroughSetup::new().with_creature(baby_carnivore(0.1));
        assert!(matches!(
            simulate_trough(&catalog, &ServerSettings::default(), &no_food),
            Err(NurseryError::MissingInput("food stacks"))
        ));
        let no_creatures = TroughSetup::new().with_stacks(raw_meat_id(), 1.0);
        assert!(matches!(
            simulate_trough(&catalog, &ServerSettings::default(), &no_creatures),
            Err(NurseryError::MissingInput("creatures"))
        ));
    }

    #[test]
    fn unknown_food_is_a_catalog_error() {
        let catalog = reference_catalog();
        let setup = TroughSetup::new()
            .with_creature(baby_carnivore(0.1))
            .with_stacks(FoodId(42), 1.0);
        assert!(matches!(
            simulate_trough(&catalog, &ServerSettings::default(), &setup),
            Err(NurseryError::Catalog(_))
        ));
    }
}
