use crate::food::FoodItem;
use crate::id::*;
use crate::species::CreatureSpecies;
use std::collections::HashMap;

/// Builder for constructing an immutable Catalog.
/// Three-phase lifecycle: registration -> mutation -> finalization.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    foods: Vec<FoodItem>,
    food_name_to_id: HashMap<String, FoodId>,
    species: Vec<CreatureSpecies>,
    species_name_to_id: HashMap<String, SpeciesId>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase 1: Register a food type. Returns its ID.
    ///
    /// The catalog name is the key; `food.name` is overwritten with it.
    pub fn register_food(&mut self, name: &str, mut food: FoodItem) -> FoodId {
        let id = FoodId(self.foods.len() as u32);
        food.name = name.to_string();
        self.foods.push(food);
        self.food_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Phase 1: Register a species. Returns its ID.
    pub fn register_species(&mut self, name: &str, mut species: CreatureSpecies) -> SpeciesId {
        let id = SpeciesId(self.species.len() as u32);
        species.name = name.to_string();
        self.species.push(species);
        self.species_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Phase 2: Mutate an existing species by name.
    pub fn mutate_species<F>(&mut self, name: &str, f: F) -> Result<(), CatalogError>
    where
        F: FnOnce(&mut CreatureSpecies),
    {
        let id = self
            .species_name_to_id
            .get(name)
            .ok_or(CatalogError::NotFound(name.to_string()))?;
        f(&mut self.species[id.0 as usize]);
        Ok(())
    }

    /// Phase 2: Mutate an existing food by name.
    pub fn mutate_food<F>(&mut self, name: &str, f: F) -> Result<(), CatalogError>
    where
        F: FnOnce(&mut FoodItem),
    {
        let id = self
            .food_name_to_id
            .get(name)
            .ok_or(CatalogError::NotFound(name.to_string()))?;
        f(&mut self.foods[id.0 as usize]);
        Ok(())
    }

    pub fn food_id(&self, name: &str) -> Option<FoodId> {
        self.food_name_to_id.get(name).copied()
    }

    pub fn species_id(&self, name: &str) -> Option<SpeciesId> {
        self.species_name_to_id.get(name).copied()
    }

    /// Phase 3: Finalize and build the immutable catalog.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        if self.food_name_to_id.len() != self.foods.len() {
            return Err(CatalogError::Duplicate(first_duplicate(
                self.foods.iter().map(|f| f.name.as_str()),
            )));
        }
        if self.species_name_to_id.len() != self.species.len() {
            return Err(CatalogError::Duplicate(first_duplicate(
                self.species.iter().map(|s| s.name.as_str()),
            )));
        }

        // Validate: all diet references must exist
        for species in &self.species {
            for entry in &species.diet {
                if entry.food.0 as usize >= self.foods.len() {
                    return Err(CatalogError::InvalidFoodRef {
                        species: species.name.clone(),
                        food: entry.food,
                    });
                }
            }
        }

        Ok(Catalog {
            foods: self.foods,
            food_name_to_id: self.food_name_to_id,
            species: self.species,
            species_name_to_id: self.species_name_to_id,
        })
    }
}

fn first_duplicate<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let mut seen = std::collections::HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return name.to_string();
        }
    }
    String::new()
}

/// Immutable catalog of species and foods. Frozen after build(). Thread-safe to share.
#[derive(Debug)]
pub struct Catalog {
    foods: Vec<FoodItem>,
    food_name_to_id: HashMap<String, FoodId>,
    species: Vec<CreatureSpecies>,
    species_name_to_id: HashMap<String, SpeciesId>,
}

impl Catalog {
    pub fn food(&self, id: FoodId) -> Option<&FoodItem> {
        self.foods.get(id.0 as usize)
    }

    pub fn species(&self, id: SpeciesId) -> Option<&CreatureSpecies> {
        self.species.get(id.0 as usize)
    }

    pub fn food_id(&self, name: &str) -> Option<FoodId> {
        self.food_name_to_id.get(name).copied()
    }

    pub fn species_id(&self, name: &str) -> Option<SpeciesId> {
        self.species_name_to_id.get(name).copied()
    }

    pub fn food_count(&self) -> usize {
        self.foods.len()
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    /// Foods in registration order.
    pub fn foods(&self) -> impl Iterator<Item = (FoodId, &FoodItem)> {
        self.foods
            .iter()
            .enumerate()
            .map(|(i, f)| (FoodId(i as u32), f))
    }

    /// Species in registration order.
    pub fn all_species(&self) -> impl Iterator<Item = (SpeciesId, &CreatureSpecies)> {
        self.species
            .iter()
            .enumerate()
            .map(|(i, s)| (SpeciesId(i as u32), s))
    }

    /// Like [`food`](Self::food), but a missing id is an error.
    pub fn require_food(&self, id: FoodId) -> Result<&FoodItem, CatalogError> {
        self.food(id).ok_or(CatalogError::UnknownFood(id))
    }

    /// Like [`species`](Self::species), but a missing id is an error.
    pub fn require_species(&self, id: SpeciesId) -> Result<&CreatureSpecies, CatalogError> {
        self.species(id).ok_or(CatalogError::UnknownSpecies(id))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("duplicate name: {0}")]
    Duplicate(String),
    #[error("species '{species}' lists unknown food {food:?}")]
    InvalidFoodRef { species: String, food: FoodId },
    #[error("unknown food: {0:?}")]
    UnknownFood(FoodId),
    #[error("unknown species: {0:?}")]
    UnknownSpecies(SpeciesId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::DietEntry;
    use crate::test_utils::*;

    fn setup_builder() -> CatalogBuilder {
        let mut b = CatalogBuilder::new();
        let meat = b.register_food("raw_meat", raw_meat());
        let mut rex = carnivore();
        rex.diet = vec![DietEntry::new(meat)];
        b.register_species("rex", rex);
        b
    }

    #[test]
    fn register_and_build() {
        let cat = setup_builder().build().unwrap();
        assert_eq!(cat.food_count(), 1);
        assert_eq!(cat.species_count(), 1);
    }

    #[test]
    fn lookup_by_name() {
        let cat = setup_builder().build().unwrap();
        assert!(cat.food_id("raw_meat").is_some());
        assert!(cat.species_id("rex").is_some());
        assert!(cat.food_id("nonexistent").is_none());
    }

    #[test]
    fn register_overwrites_record_name() {
        let cat = setup_builder().build().unwrap();
        let id = cat.food_id("raw_meat").unwrap();
        assert_eq!(cat.food(id).unwrap().name, "raw_meat");
    }

    #[test]
    fn mutate_species() {
        let mut builder = setup_builder();
        builder
            .mutate_species("rex", |s| s.weight = 900.0)
            .unwrap();
        let cat = builder.build().unwrap();
        let rex = cat.species(cat.species_id("rex").unwrap()).unwrap();
        assert_eq!(rex.weight, 900.0);
    }

    #[test]
    fn mutate_nonexistent_fails() {
        let mut builder = setup_builder();
        match builder.mutate_species("nonexistent", |_| {}) {
            Err(CatalogError::NotFound(name)) => assert_eq!(name, "nonexistent"),
            other => panic!("expected NotFound, got: {other:?}"),
        }
        assert!(builder.mutate_food("nonexistent", |_| {}).is_err());
    }

    #[test]
    fn invalid_diet_ref_fails() {
        let mut b = CatalogBuilder::new();
        let mut rex = carnivore();
        rex.diet = vec![DietEntry::new(FoodId(999))];
        b.register_species("rex", rex);
        match b.build() {
            Err(CatalogError::InvalidFoodRef { species, food }) => {
                assert_eq!(species, "rex");
                assert_eq!(food, FoodId(999));
            }
            other => panic!("expected InvalidFoodRef, got: {other:?}"),
        }
    }

    #[test]
    fn duplicate_food_name_fails() {
        let mut b = CatalogBuilder::new();
        b.register_food("raw_meat", raw_meat());
        b.register_food("raw_meat", raw_meat());
        assert!(matches!(b.build(), Err(CatalogError::Duplicate(n)) if n == "raw_meat"));
    }

    #[test]
    fn get_nonexistent_returns_none() {
        let cat = setup_builder().build().unwrap();
        assert!(cat.food(FoodId(999)).is_none());
        assert!(cat.species(SpeciesId(999)).is_none());
        assert!(matches!(
            cat.require_food(FoodId(999)),
            Err(CatalogError::UnknownFood(FoodId(999)))
        ));
        assert!(cat.require_species(SpeciesId(0)).is_ok());
    }

    #[test]
    fn iteration_follows_registration_order() {
        let cat = reference_catalog();
        let names: Vec<&str> = cat.foods().map(|(_, f)| f.name.as_str()).collect();
        assert_eq!(names, vec!["raw_meat", "cooked_meat", "berries", "prime_meat"]);
    }

    #[test]
    fn empty_catalog_builds_successfully() {
        let cat = CatalogBuilder::new().build().unwrap();
        assert_eq!(cat.food_count(), 0);
        assert_eq!(cat.species_count(), 0);
    }
}
