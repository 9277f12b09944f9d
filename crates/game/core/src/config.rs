/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Seconds added to a card's timer before it fires again on a retrigger.
    pub retrigger_delay: f32,

    /// Number of completed enemy-turn passes between enemy spawns.
    pub enemy_spawn_interval: u32,

    /// Damage dealt by the Fire status when the afflicted team's turn starts.
    pub burn_damage: u32,

    /// Seconds between consecutive cards of a single draw effect.
    pub draw_interval: f32,

    /// Seed for deterministic spawn placement.
    pub game_seed: u64,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of sockets on a single circuit board.
    pub const MAX_SOCKETS: usize = 8;
    /// Maximum number of cards held in hand; extra draws go to discard.
    pub const MAX_HAND_SIZE: usize = 10;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_RETRIGGER_DELAY: f32 = 0.2;
    pub const DEFAULT_ENEMY_SPAWN_INTERVAL: u32 = 3;
    pub const DEFAULT_BURN_DAMAGE: u32 = 1;
    pub const DEFAULT_DRAW_INTERVAL: f32 = 0.15;

    pub fn new() -> Self {
        Self {
            retrigger_delay: Self::DEFAULT_RETRIGGER_DELAY,
            enemy_spawn_interval: Self::DEFAULT_ENEMY_SPAWN_INTERVAL,
            burn_damage: Self::DEFAULT_BURN_DAMAGE,
            draw_interval: Self::DEFAULT_DRAW_INTERVAL,
            game_seed: 0,
        }
    }

    pub fn with_retrigger_delay(mut self, retrigger_delay: f32) -> Self {
        self.retrigger_delay = retrigger_delay;
        self
    }

    pub fn with_enemy_spawn_interval(mut self, interval: u32) -> Self {
        self.enemy_spawn_interval = interval;
        self
    }

    pub fn with_seed(mut self, game_seed: u64) -> Self {
        self.game_seed = game_seed;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
