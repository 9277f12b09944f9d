//! Content loaders for reading game data from files.
//!
//! Every loader offers `load(path)` for files on disk and `parse(content)`
//! for in-memory text; the embedded defaults go through `parse`.

pub mod cards;
pub mod config;
pub mod enemies;
pub mod factory;
pub mod rewards;

pub use cards::{CardCatalog, CardLoader};
pub use config::ConfigLoader;
pub use enemies::EnemyLoader;
pub use factory::{ContentBundle, ContentFactory};
pub use rewards::{RewardLoader, RewardTable};

use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Parses RON with `implicit_some`, so optional fields may be written bare
/// (`name: "Jab"`) as well as wrapped (`Some("Jab")`).
pub(crate) fn parse_ron<T: DeserializeOwned>(content: &str, what: &str) -> LoadResult<T> {
    ron::Options::default()
        .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
        .from_str(content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {} RON: {}", what, e))
}
