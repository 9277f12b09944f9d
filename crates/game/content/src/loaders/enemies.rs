//! Enemy template loader.

use std::path::Path;

use anyhow::Context;
use circuit_core::EnemyTemplate;
use serde::Deserialize;

use crate::loaders::{CardCatalog, LoadResult, parse_ron, read_file};

#[derive(Debug, Clone, Deserialize)]
struct EnemyEntry {
    name: String,
    max_health: u32,
    #[serde(default)]
    sockets: usize,
    #[serde(default)]
    cards: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct EnemyFile {
    enemies: Vec<EnemyEntry>,
}

/// Loader for enemy templates from RON files.
///
/// Card ids are resolved against the catalog; unknown ids are refused the
/// same way reward entries are.
pub struct EnemyLoader;

impl EnemyLoader {
    pub fn load(path: &Path, catalog: &CardCatalog) -> LoadResult<Vec<EnemyTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content, catalog).with_context(|| format!("in {}", path.display()))
    }

    /// RON format: `(enemies: [(name: "grub", max_health: 3, cards: ["bite"]), ...])`
    pub fn parse(content: &str, catalog: &CardCatalog) -> LoadResult<Vec<EnemyTemplate>> {
        let file: EnemyFile = parse_ron(content, "enemy templates")?;

        let mut templates = Vec::with_capacity(file.enemies.len());
        for entry in file.enemies {
            if entry.max_health == 0 {
                anyhow::bail!("enemy '{}' has no health", entry.name);
            }
            let cards = entry
                .cards
                .iter()
                .filter_map(|id| {
                    let card = catalog.get(id);
                    if card.is_none() {
                        tracing::error!(enemy = %entry.name, card = %id, "enemy references unknown card, refusing it");
                    }
                    card
                })
                .collect();
            let mut template = EnemyTemplate::new(entry.name, entry.max_health).with_cards(cards);
            template.sockets = template.sockets.max(entry.sockets);
            templates.push(template);
        }
        Ok(templates)
    }

    /// The enemy roster shipped with the crate.
    pub fn builtin(catalog: &CardCatalog) -> LoadResult<Vec<EnemyTemplate>> {
        Self::parse(include_str!("../../data/enemies.ron"), catalog)
    }
}
