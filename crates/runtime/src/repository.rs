//! File-based snapshot persistence.

use std::fs;
use std::path::{Path, PathBuf};

use circuit_core::SessionSnapshot;

use crate::Result;

/// Stores session snapshots as `snapshot_{turn}.json` files.
///
/// Writes go to a temp file first and are renamed into place, so a crash
/// never leaves a half-written snapshot behind.
pub struct SnapshotRepository {
    base_dir: PathBuf,
}

impl SnapshotRepository {
    /// Creates the repository, creating `base_dir` if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn snapshot_path(&self, turn: u32) -> PathBuf {
        self.base_dir.join(format!("snapshot_{}.json", turn))
    }

    pub fn save(&self, turn: u32, snapshot: &SessionSnapshot) -> Result<PathBuf> {
        let path = self.snapshot_path(turn);
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(snapshot)?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(turn, path = %path.display(), "snapshot saved");
        Ok(path)
    }

    pub fn load(&self, turn: u32) -> Result<Option<SessionSnapshot>> {
        let path = self.snapshot_path(turn);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let snapshot = serde_json::from_slice(&bytes)?;
        tracing::debug!(turn, path = %path.display(), "snapshot loaded");
        Ok(Some(snapshot))
    }

    pub fn exists(&self, turn: u32) -> bool {
        self.snapshot_path(turn).exists()
    }

    /// Turns with a stored snapshot, ascending.
    pub fn list_turns(&self) -> Result<Vec<u32>> {
        let mut turns = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(turn) = filename
                    .strip_prefix("snapshot_")
                    .and_then(|s| s.strip_suffix(".json"))
                && let Ok(turn) = turn.parse::<u32>()
            {
                turns.push(turn);
            }
        }
        turns.sort_unstable();
        Ok(turns)
    }

    /// Most recent snapshot, if any.
    pub fn latest(&self) -> Result<Option<(u32, SessionSnapshot)>> {
        let Some(&turn) = self.list_turns()?.last() else {
            return Ok(None);
        };
        Ok(self.load(turn)?.map(|snapshot| (turn, snapshot)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_directory_has_no_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SnapshotRepository::new(dir.path().join("saves")).unwrap();
        assert!(repo.list_turns().unwrap().is_empty());
        assert!(repo.latest().unwrap().is_none());
        assert!(repo.load(3).unwrap().is_none());
    }

    #[test]
    fn saves_and_lists_by_turn() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SnapshotRepository::new(dir.path()).unwrap();
        let snapshot = SessionSnapshot::default();
        repo.save(4, &snapshot).unwrap();
        repo.save(1, &snapshot).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(repo.list_turns().unwrap(), vec![1, 4]);
        assert!(repo.exists(4));
        let (turn, loaded) = repo.latest().unwrap().unwrap();
        assert_eq!(turn, 4);
        assert_eq!(loaded, snapshot);
    }
}
