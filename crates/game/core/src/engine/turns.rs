use crate::config::GameConfig;
use crate::state::Team;

/// The coordinator's four states.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPhase {
    /// Previewing the player's queued cards on a shadow session.
    #[default]
    PlayerSimulation,
    /// Previewing the enemies' response on the same shadow session.
    EnemySimulation,
    PlayerTurn,
    EnemyTurn,
}

impl TurnPhase {
    pub const fn is_simulation(self) -> bool {
        matches!(self, TurnPhase::PlayerSimulation | TurnPhase::EnemySimulation)
    }

    /// Team whose circuits run in this phase.
    pub const fn team(self) -> Team {
        match self {
            TurnPhase::PlayerSimulation | TurnPhase::PlayerTurn => Team::Player,
            TurnPhase::EnemySimulation | TurnPhase::EnemyTurn => Team::Enemy,
        }
    }
}

/// Turn bookkeeping owned by the coordinator.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    pub phase: TurnPhase,
    /// Seconds spent in the current phase.
    pub turn_timer: f32,
    /// Completed enemy passes left before the next spawn.
    pub spawn_countdown: u32,
    /// Completed player+enemy rounds.
    pub turn_number: u32,
    /// Enemies spawned so far; seeds the next spawn placement.
    #[cfg_attr(feature = "serde", serde(default))]
    pub enemies_spawned: u64,
    /// Set when the player's circuit changed and the preview is stale.
    pub recalculate: bool,
}

impl TurnState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: TurnPhase::default(),
            turn_timer: 0.0,
            spawn_countdown: config.enemy_spawn_interval,
            turn_number: 0,
            enemies_spawned: 0,
            recalculate: false,
        }
    }

    /// Counts one completed enemy pass; true when a spawn is due.
    ///
    /// The countdown restarts from `interval` whenever it fires.
    pub fn count_down_spawn(&mut self, interval: u32) -> bool {
        self.spawn_countdown = self.spawn_countdown.saturating_sub(1);
        if self.spawn_countdown == 0 {
            self.spawn_countdown = interval;
            true
        } else {
            false
        }
    }
}
