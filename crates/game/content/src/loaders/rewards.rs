//! Reward pool loader.
//!
//! A reward pool that names a card the catalog does not know is a content
//! bug, but not one worth stopping a session for: the entry is refused with
//! an error diagnostic and the rest of the table still loads.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use circuit_core::CardDefinition;
use circuit_core::rng::{PcgRng, compute_seed};
use serde::Deserialize;

use crate::loaders::{CardCatalog, LoadResult, parse_ron, read_file};

#[derive(Debug, Clone, Deserialize)]
struct RewardFile {
    pools: BTreeMap<String, Vec<String>>,
}

/// Named pools of card rewards.
#[derive(Debug, Clone, Default)]
pub struct RewardTable {
    pools: BTreeMap<String, Vec<Arc<CardDefinition>>>,
    refused: Vec<String>,
}

impl RewardTable {
    /// Resolves every id against `catalog`, refusing the unknown ones.
    pub fn resolve(pools: BTreeMap<String, Vec<String>>, catalog: &CardCatalog) -> Self {
        let mut table = Self::default();
        for (pool, ids) in pools {
            let mut cards = Vec::with_capacity(ids.len());
            for id in ids {
                match catalog.get(&id) {
                    Some(card) => cards.push(card),
                    None => {
                        tracing::error!(pool = %pool, card = %id, "reward references unknown card, refusing it");
                        table.refused.push(id);
                    }
                }
            }
            table.pools.insert(pool, cards);
        }
        table
    }

    pub fn pool(&self, name: &str) -> &[Arc<CardDefinition>] {
        self.pools.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn pool_names(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }

    /// Ids dropped at load time because the catalog lacked them.
    pub fn refused(&self) -> &[String] {
        &self.refused
    }

    /// Deterministic pick from `pool`; the `counter`th offer of a session
    /// always yields the same card for the same seed.
    pub fn pick(&self, pool: &str, game_seed: u64, counter: u64) -> Option<Arc<CardDefinition>> {
        let cards = self.pool(pool);
        if cards.is_empty() {
            return None;
        }
        let mut rng = PcgRng::new(compute_seed(game_seed, counter));
        cards.get(rng.index(cards.len())).cloned()
    }
}

/// Loader for reward tables from RON files.
pub struct RewardLoader;

impl RewardLoader {
    pub fn load(path: &Path, catalog: &CardCatalog) -> LoadResult<RewardTable> {
        let content = read_file(path)?;
        Self::parse(&content, catalog).with_context(|| format!("in {}", path.display()))
    }

    /// RON format: `(pools: {"common": ["jab", "step"], ...})`
    pub fn parse(content: &str, catalog: &CardCatalog) -> LoadResult<RewardTable> {
        let file: RewardFile = parse_ron(content, "reward table")?;
        Ok(RewardTable::resolve(file.pools, catalog))
    }

    /// The reward table shipped with the crate.
    pub fn builtin(catalog: &CardCatalog) -> LoadResult<RewardTable> {
        Self::parse(include_str!("../../data/rewards.ron"), catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rewards_resolve_fully() {
        let catalog = CardCatalog::builtin().unwrap();
        let table = RewardLoader::builtin(&catalog).unwrap();
        assert!(table.refused().is_empty());
        assert_eq!(table.pool_names().count(), 3);
        assert!(table.pool("rare").iter().any(|card| card.id == "firebolt"));
    }

    #[test]
    fn unknown_card_is_refused_and_loading_continues() {
        let catalog = CardCatalog::builtin().unwrap();
        let table = RewardLoader::parse(
            r#"(pools: {"loot": ["jab", "phantom", "step"], "empty": ["ghost"]})"#,
            &catalog,
        )
        .unwrap();

        // Pools resolve in name order.
        assert_eq!(table.refused(), ["ghost".to_string(), "phantom".to_string()]);
        let loot: Vec<_> = table.pool("loot").iter().map(|card| card.id.as_str()).collect();
        assert_eq!(loot, vec!["jab", "step"]);
        assert!(table.pool("empty").is_empty());
        assert!(table.pick("empty", 0, 0).is_none());
    }

    #[test]
    fn picks_are_reproducible() {
        let catalog = CardCatalog::builtin().unwrap();
        let table = RewardLoader::builtin(&catalog).unwrap();
        let first: Vec<_> = (0..5)
            .filter_map(|n| table.pick("common", 7, n))
            .map(|card| card.id.clone())
            .collect();
        let second: Vec<_> = (0..5)
            .filter_map(|n| table.pick("common", 7, n))
            .map(|card| card.id.clone())
            .collect();
        assert_eq!(first.len(), 5);
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_table_is_an_error() {
        let catalog = CardCatalog::new();
        assert!(RewardLoader::parse("(pools: [])", &catalog).is_err());
    }
}
