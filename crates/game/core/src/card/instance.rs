use std::fmt;
use std::sync::Arc;

use crate::simulate::CardPlan;

use super::CardDefinition;

/// Unique identifier for a card instance within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card#{}", self.0)
    }
}

/// Where a card currently lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardZone {
    DrawPile,
    Hand,
    Socket,
    Discard,
}

/// Per-activation lifecycle of a slotted card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardPhase {
    #[default]
    Idle,
    ComputingTargets,
    EffectsQueued,
    /// Effects applied; the card's duration is counting down.
    Active,
    Expired,
}

/// A card instance: shared definition plus per-pass activation state.
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub id: CardId,
    pub definition: Arc<CardDefinition>,
    pub zone: CardZone,
    pub phase: CardPhase,
    /// Targets computed by the most recent activation.
    pub last_plan: Option<CardPlan>,
    pub particle_spawned: bool,
    /// Activations this pass.
    pub triggers_used: u32,
    /// Retriggers granted by the socket this pass.
    pub triggers_granted: u32,
}

impl Card {
    pub fn new(id: CardId, definition: Arc<CardDefinition>) -> Self {
        Self {
            id,
            definition,
            zone: CardZone::DrawPile,
            phase: CardPhase::Idle,
            last_plan: None,
            particle_spawned: false,
            triggers_used: 0,
            triggers_granted: 0,
        }
    }

    /// Clears activation state at the start of a pass.
    pub fn deactivate(&mut self) {
        self.phase = CardPhase::Idle;
        self.particle_spawned = false;
        self.triggers_used = 0;
        self.triggers_granted = 0;
    }

    pub fn is_activated(&self) -> bool {
        self.triggers_used > 0
    }

    /// True once every granted retrigger has been spent.
    pub fn max_triggers_reached(&self) -> bool {
        self.triggers_used > self.triggers_granted
    }
}
