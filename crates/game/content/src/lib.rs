//! Data-driven content definitions and loaders.
//!
//! This crate turns RON/TOML data files into validated core types:
//! - Card catalog (RON), validated with `CardDefinition::validate`
//! - Reward pools (RON), resolved against the catalog
//! - Enemy templates (RON) for the spawner
//! - Game configuration (TOML)
//!
//! The default data set ships embedded in the crate; [`ContentFactory`] reads
//! the same files from a directory instead.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CardCatalog, CardLoader, ConfigLoader, ContentBundle, ContentFactory, EnemyLoader,
    LoadResult, RewardLoader, RewardTable,
};
