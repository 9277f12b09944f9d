//! Content factory for loading everything a session needs from one place.

use std::path::{Path, PathBuf};

use circuit_core::{EnemyTemplate, GameConfig};

use crate::loaders::{
    CardCatalog, CardLoader, ConfigLoader, EnemyLoader, LoadResult, RewardLoader, RewardTable,
};

/// Everything loaded from a data set.
#[derive(Debug, Clone)]
pub struct ContentBundle {
    pub config: GameConfig,
    pub cards: CardCatalog,
    pub rewards: RewardTable,
    pub enemies: Vec<EnemyTemplate>,
}

impl ContentBundle {
    /// The data set embedded in the crate.
    pub fn builtin() -> LoadResult<Self> {
        let cards = CardCatalog::builtin()?;
        Ok(Self {
            config: ConfigLoader::builtin()?,
            rewards: RewardLoader::builtin(&cards)?,
            enemies: EnemyLoader::builtin(&cards)?,
            cards,
        })
    }
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── cards.ron
/// ├── rewards.ron
/// └── enemies.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the card catalog from `cards.ron`.
    pub fn load_cards(&self) -> LoadResult<CardCatalog> {
        CardLoader::load(&self.data_dir.join("cards.ron"))
    }

    /// Load reward pools from `rewards.ron`.
    pub fn load_rewards(&self, catalog: &CardCatalog) -> LoadResult<RewardTable> {
        RewardLoader::load(&self.data_dir.join("rewards.ron"), catalog)
    }

    /// Load enemy templates from `enemies.ron`.
    pub fn load_enemies(&self, catalog: &CardCatalog) -> LoadResult<Vec<EnemyTemplate>> {
        EnemyLoader::load(&self.data_dir.join("enemies.ron"), catalog)
    }

    pub fn load_all(&self) -> LoadResult<ContentBundle> {
        let cards = self.load_cards()?;
        Ok(ContentBundle {
            config: self.load_config()?,
            rewards: self.load_rewards(&cards)?,
            enemies: self.load_enemies(&cards)?,
            cards,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_a_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        for file in ["config.toml", "cards.ron", "rewards.ron", "enemies.ron"] {
            std::fs::copy(data.join(file), dir.path().join(file)).unwrap();
        }

        let bundle = ContentFactory::new(dir.path()).load_all().unwrap();
        let builtin = ContentBundle::builtin().unwrap();
        assert_eq!(bundle.config, builtin.config);
        assert_eq!(bundle.cards.len(), builtin.cards.len());
        assert_eq!(bundle.enemies, builtin.enemies);
    }

    #[test]
    fn missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ContentFactory::new(dir.path().join("absent")).load_all().is_err());
    }
}
