//! Event log fed by the turn coordinator.
//!
//! [`EventRecorder`] is the runtime's [`EffectSink`]: every committed effect,
//! resolved card plan and phase change is appended to a bounded log that
//! presentation layers drain once per frame.

use std::collections::VecDeque;

use circuit_core::{CardId, CardPlan, CharacterId, Coord, Effect, EffectSink, TurnPhase};
use serde::{Deserialize, Serialize};

/// High-level occurrences a host reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged {
        from: TurnPhase,
        to: TurnPhase,
        turn: u32,
    },

    /// A card resolved its targets; emitted before the card's effects.
    CardPlayed {
        character: CharacterId,
        card: CardId,
        cells: Vec<Coord>,
        blocked: bool,
    },

    Effect(Effect),
}

/// Bounded in-memory log of [`GameEvent`]s. The oldest events are dropped
/// once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct EventRecorder {
    events: VecDeque<GameEvent>,
    capacity: usize,
    dropped: u64,
}

impl EventRecorder {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub fn record(&mut self, event: GameEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    pub fn events(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events lost to the capacity bound since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    /// Committed effects only, in order.
    pub fn effects(&self) -> impl Iterator<Item = &Effect> {
        self.events.iter().filter_map(|event| match event {
            GameEvent::Effect(effect) => Some(effect),
            _ => None,
        })
    }
}

impl Default for EventRecorder {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EffectSink for EventRecorder {
    fn plan_resolved(&mut self, actor: CharacterId, card: CardId, plan: &CardPlan) {
        self.record(GameEvent::CardPlayed {
            character: actor,
            card,
            cells: plan.highlighted(),
            blocked: plan.is_blocked(),
        });
    }

    fn phase_changed(&mut self, from: TurnPhase, to: TurnPhase, turn: u32) {
        self.record(GameEvent::PhaseChanged { from, to, turn });
    }

    fn emit(&mut self, effect: &Effect) {
        self.record(GameEvent::Effect(effect.clone()));
    }
}
