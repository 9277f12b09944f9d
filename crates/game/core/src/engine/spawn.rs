//! Enemy spawning at the end of enemy passes.

use std::fmt;
use std::sync::Arc;

use crate::card::CardDefinition;
use crate::circuit::CircuitBoard;
use crate::rng::{PcgRng, compute_seed};
use crate::state::{CharacterId, CharacterSpec, SessionState, Team};

/// Decides where (and whether) a new enemy appears.
///
/// `sequence` counts the enemies spawned before this one in the session, so
/// a resumed session continues the same placement stream.
pub trait EnemySpawner: fmt::Debug {
    fn spawn(&mut self, state: &mut SessionState, sequence: u64) -> Option<CharacterId>;
}

/// What a spawned enemy looks like and which cards it plays.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyTemplate {
    pub name: String,
    pub max_health: u32,
    pub sockets: usize,
    /// Slotted in order into the first sockets.
    pub cards: Vec<Arc<CardDefinition>>,
}

impl EnemyTemplate {
    pub fn new(name: impl Into<String>, max_health: u32) -> Self {
        Self {
            name: name.into(),
            max_health,
            sockets: 0,
            cards: Vec::new(),
        }
    }

    pub fn with_cards(mut self, cards: Vec<Arc<CardDefinition>>) -> Self {
        self.sockets = self.sockets.max(cards.len());
        self.cards = cards;
        self
    }
}

/// Spawns on a random free cell of the grid's top row.
///
/// Each spawn draws from its own PCG stream seeded by the session seed and
/// the spawn sequence number, so placement is reproducible.
#[derive(Clone, Debug, PartialEq)]
pub struct RowSpawner {
    template: EnemyTemplate,
}

impl RowSpawner {
    pub fn new(template: EnemyTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &EnemyTemplate {
        &self.template
    }
}

impl EnemySpawner for RowSpawner {
    fn spawn(&mut self, state: &mut SessionState, sequence: u64) -> Option<CharacterId> {
        let row = state.grid.top_row()?;
        let free = state.grid.free_cells_in_row(row);
        if free.is_empty() {
            tracing::warn!(row, "spawn row full, enemy spawn skipped");
            return None;
        }

        let mut rng = PcgRng::new(compute_seed(state.config.game_seed, sequence));
        let at = free[rng.index(free.len())];

        let name = format!("{}-{}", self.template.name, sequence + 1);
        let spec = CharacterSpec::new(name, Team::Enemy, self.template.max_health);
        let id = match state.spawn_character(spec, at) {
            Ok(id) => id,
            Err(error) => {
                tracing::warn!(%error, "enemy spawn failed");
                return None;
            }
        };

        let mut board = CircuitBoard::with_sockets(self.template.sockets);
        for (socket, definition) in self.template.cards.iter().enumerate() {
            let card = state.new_card(Arc::clone(definition));
            if let Err(error) = board.insert(socket, card) {
                tracing::warn!(%error, enemy = %id, "template card not slotted");
            }
        }
        state.set_board(id, board);

        tracing::info!(enemy = %id, position = %at, "enemy spawned");
        Some(id)
    }
}
