//! Integration test: Shared trough from data files
//!
//! Loads a catalog with a meat eater and a plant eater sharing one trough,
//! sizes the fill with the efficiency calculator, then checks the tick
//! simulation against that plan and the accounting invariants.

use std::fs;
use std::path::PathBuf;

use nursery_core::efficiency::EfficiencyCalculator;
use nursery_core::food::TROUGH_SPOIL_MULTIPLIER;
use nursery_core::settings::ServerSettings;
use nursery_core::species::CreatureInstance;
use nursery_core::trough::{TroughSetup, simulate_trough};
use nursery_data::load_catalog;

fn write_catalog(suffix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "nursery_trough_{suffix}_{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();

    fs::write(
        dir.join("foods.toml"),
        r#"
[[foods]]
name = "raw_meat"
points = 50.0
spoil_seconds = 600.0
stack_size = 20
weight = 0.1

[[foods]]
name = "berries"
points = 20.0
spoil_seconds = 600.0
stack_size = 100
weight = 0.02
waste_points = 1.0
"#,
    )
    .unwrap();
    fs::write(
        dir.join("species.toml"),
        r#"
[[species]]
name = "rex"
age_speed = 0.000003
age_speed_mult = 1.7
birth_speed = 0.005556
birth_speed_mult = 1.7
base_food_rate = 0.001852
baby_food_rate = 25.5
extra_baby_food_rate = 20.0
weight = 500.0
diet = ["raw_meat"]

[[species]]
name = "grazer"
age_speed = 0.000035
birth_type = "gestation"
birth_speed = 0.000035
birth_speed_mult = 2.0
base_food_rate = 0.001543
baby_food_rate = 25.5
extra_baby_food_rate = 20.0
weight = 350.0
diet = ["berries"]
"#,
    )
    .unwrap();
    dir
}

#[test]
fn mixed_trough_accounts_for_every_item() {
    let dir = write_catalog("mixed");
    let catalog = load_catalog(&dir).unwrap();
    let rex = catalog.species_id("rex").unwrap();
    let grazer = catalog.species_id("grazer").unwrap();

    let setup = TroughSetup::new()
        .with_creature(CreatureInstance::new(rex, 0.1).with_quantity(2))
        .with_creature(CreatureInstance::new(grazer, 0.3))
        .with_stacks(catalog.food_id("raw_meat").unwrap(), 4.0)
        .with_stacks(catalog.food_id("berries").unwrap(), 1.5);
    let r = simulate_trough(&catalog, &ServerSettings::default(), &setup).unwrap();

    assert_eq!(r.initial_food, 4 * 20 + 150);
    assert_eq!(r.total_food + r.remaining_food, r.initial_food);
    assert_eq!(r.total_food, r.eaten_food + r.spoiled_food);
    assert!(r.eaten_food > 0 && r.spoiled_food > 0);
    assert!(r.wasted_points > 0.0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn efficiency_plan_holds_up_in_the_trough() {
    let dir = write_catalog("efficiency");
    let catalog = load_catalog(&dir).unwrap();
    let settings = ServerSettings::default();
    let meat = catalog.food_id("raw_meat").unwrap();
    let babies = [CreatureInstance::new(catalog.species_id("rex").unwrap(), 0.2).with_quantity(3)];

    let calc = EfficiencyCalculator::new(&catalog, &settings, &babies, meat, TROUGH_SPOIL_MULTIPLIER).unwrap();
    let fill = calc.smart_fill(60);
    assert!(fill >= 1 && fill <= calc.max_stacks());

    let plan = calc.calculate_stacks_for_duration(3.0, 60);
    assert!(plan.is_achievable, "{plan:?}");

    let setup = TroughSetup::new()
        .with_creature(babies[0].clone())
        .with_stacks(meat, plan.stacks_needed as f64);
    let r = simulate_trough(&catalog, &settings, &setup).unwrap();
    assert!(r.seconds as f64 >= 0.5 * 3.0 * 3600.0, "{r:?}");
    assert!(!r.capped);

    let _ = fs::remove_dir_all(&dir);
}
