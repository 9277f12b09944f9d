//! Card catalog loader.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use circuit_core::{
    ActionStep, CardDefinition, CardType, ParticlePlacement, StepVector, TargetRule,
};
use serde::Deserialize;

use crate::loaders::{LoadResult, parse_ron, read_file};

/// One card as authored in RON. Optional fields fall back to the defaults of
/// [`CardDefinition::new`].
#[derive(Debug, Clone, Deserialize)]
struct CardEntry {
    id: String,
    #[serde(default)]
    name: Option<String>,
    card_type: CardType,
    #[serde(default)]
    steps: StepVector,
    #[serde(default)]
    value: i32,
    #[serde(default)]
    duration: Option<f32>,
    #[serde(default)]
    target: Option<TargetRule>,
    #[serde(default)]
    actions: Vec<ActionStep>,
    #[serde(default)]
    particle_placement: ParticlePlacement,
}

impl CardEntry {
    fn into_definition(self) -> CardDefinition {
        let mut definition = CardDefinition::new(self.id, self.card_type, self.steps, self.value)
            .with_particle_placement(self.particle_placement);
        if let Some(name) = self.name {
            definition.name = name;
        }
        if let Some(duration) = self.duration {
            definition = definition.with_duration(duration);
        }
        if let Some(target) = self.target {
            definition = definition.with_target(target);
        }
        definition.actions = self.actions;
        definition
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    cards: Vec<CardEntry>,
}

/// Validated card definitions keyed by id.
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: BTreeMap<String, Arc<CardDefinition>>,
}

impl CardCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> LoadResult<Self> {
        CardLoader::parse(include_str!("../../data/cards.ron"))
    }

    /// Validates and adds a definition. Malformed or duplicate cards are
    /// fatal load errors.
    pub fn register(&mut self, definition: CardDefinition) -> LoadResult<Arc<CardDefinition>> {
        definition
            .validate()
            .with_context(|| format!("card '{}' rejected", definition.id))?;
        if self.cards.contains_key(&definition.id) {
            anyhow::bail!("duplicate card id '{}'", definition.id);
        }
        let definition = Arc::new(definition);
        self.cards
            .insert(definition.id.clone(), Arc::clone(&definition));
        Ok(definition)
    }

    pub fn get(&self, id: &str) -> Option<Arc<CardDefinition>> {
        self.cards.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cards.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.cards.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CardDefinition>> {
        self.cards.values()
    }
}

/// Loader for card catalogs from RON files.
pub struct CardLoader;

impl CardLoader {
    /// Load a card catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<CardCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parse a card catalog from RON text.
    ///
    /// RON format: `(cards: [(id: "jab", card_type: Attack, steps: (x: 1, y: 1), value: 2), ...])`
    pub fn parse(content: &str) -> LoadResult<CardCatalog> {
        let file: CatalogFile = parse_ron(content, "card catalog")?;

        let mut catalog = CardCatalog::new();
        for entry in file.cards {
            catalog.register(entry.into_definition())?;
        }
        tracing::debug!(cards = catalog.len(), "card catalog loaded");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use circuit_core::{ActionKind, CardDefinitionError};

    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = CardCatalog::builtin().unwrap();
        assert!(catalog.len() >= 10);

        let firebolt = catalog.get("firebolt").unwrap();
        assert_eq!(firebolt.card_type, CardType::Attack);
        assert_eq!(firebolt.actions[0].sequence[0].kind, ActionKind::Fire);
        assert_eq!(firebolt.particle_placement, ParticlePlacement::FirstTargetOnce);

        let kindle = catalog.get("kindle").unwrap();
        assert_eq!(kindle.target, TargetRule::Caster);
        assert_eq!(kindle.max_time_in_use, 0.5);
    }

    #[test]
    fn optional_fields_accept_bare_and_wrapped_values() {
        let catalog = CardLoader::parse(
            r#"(cards: [
                (id: "poke", name: "Poke", card_type: Attack, steps: (x: 1, y: 1), value: 1, duration: 0.25, target: NearestEnemy),
                (id: "prod", name: Some("Prod"), card_type: Attack, steps: (x: 1, y: 1), value: 1, duration: Some(0.75)),
            ])"#,
        )
        .unwrap();

        let poke = catalog.get("poke").unwrap();
        assert_eq!(poke.name, "Poke");
        assert_eq!(poke.max_time_in_use, 0.25);
        assert_eq!(poke.target, TargetRule::NearestEnemy);
        let prod = catalog.get("prod").unwrap();
        assert_eq!(prod.name, "Prod");
        assert_eq!(prod.max_time_in_use, 0.75);
    }

    #[test]
    fn negative_attack_steps_fail_the_load() {
        let err = CardLoader::parse(
            r#"(cards: [(id: "bad", card_type: Attack, steps: (x: -1, y: 1), value: 1)])"#,
        )
        .unwrap_err();
        let cause = err.downcast_ref::<CardDefinitionError>().unwrap();
        assert!(matches!(cause, CardDefinitionError::NegativeAttackSteps { .. }));
    }

    #[test]
    fn negative_duration_fails_the_load() {
        let result = CardLoader::parse(
            r#"(cards: [(id: "slow", card_type: Movement, steps: (x: 0, y: 1), duration: -1.0)])"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_ids_fail_the_load() {
        let result = CardLoader::parse(
            r#"(cards: [
                (id: "jab", card_type: Attack, steps: (x: 1, y: 1), value: 1),
                (id: "jab", card_type: Attack, steps: (x: 1, y: 1), value: 2),
            ])"#,
        );
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(cards: [(id: "hop", card_type: Movement, steps: (x: 0, y: 2))])"#
        )
        .unwrap();

        let catalog = CardLoader::load(file.path()).unwrap();
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["hop"]);
        assert_eq!(catalog.get("hop").unwrap().steps, StepVector::new(0, 2));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CardLoader::load(&dir.path().join("cards.ron")).is_err());
    }
}
