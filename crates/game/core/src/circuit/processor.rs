//! Per-character sequencer over the filled sockets of a circuit board.
//!
//! A processor walks the active cards one at a time. Each activation sets the
//! in-flight timer to the card's duration; a card with retrigger charges left
//! fires again after an extra `retrigger_delay` before the index advances.
//! Running past the last active card is the normal end of a pass.

use crate::card::{Card, CardPhase};
use crate::simulate::{CardSimulator, EffectSink, SimulationPhase};
use crate::state::{BrainType, Character, CharacterId, SessionState};

use super::CircuitBoard;

/// Where a processor reads its cards from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardSource {
    /// The owner's own circuit board in the session state.
    Own,
    /// A private copy of `leader`'s board, taken on every reset.
    Mirror { leader: CharacterId },
}

#[derive(Clone, Debug, PartialEq)]
pub struct CircuitProcessor {
    owner: CharacterId,
    source: CardSource,
    /// Position in the active (filled) socket list of the next activation.
    index: usize,
    remaining: f32,
    retriggers: u32,
    mirror: Option<CircuitBoard>,
    in_flight: Option<usize>,
}

impl CircuitProcessor {
    pub fn new(owner: CharacterId, source: CardSource) -> Self {
        Self {
            owner,
            source,
            index: 0,
            remaining: 0.0,
            retriggers: 0,
            mirror: None,
            in_flight: None,
        }
    }

    /// Builds the processor matching a character's brain.
    pub fn for_character(character: &Character) -> Self {
        let source = match character.brain {
            BrainType::Independent => CardSource::Own,
            BrainType::Listener { leader } => CardSource::Mirror { leader },
        };
        Self::new(character.id, source)
    }

    /// A processor that plays a copy of `leader`'s queued cards.
    pub fn listener(owner: CharacterId, leader: CharacterId) -> Self {
        Self::new(owner, CardSource::Mirror { leader })
    }

    pub fn owner(&self) -> CharacterId {
        self.owner
    }

    pub fn source(&self) -> CardSource {
        self.source
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn retriggers(&self) -> u32 {
        self.retriggers
    }

    /// The board a mirroring processor is playing, if any.
    pub fn mirrored_board(&self) -> Option<&CircuitBoard> {
        self.mirror.as_ref()
    }

    /// Starts a new pass: clears timers and deactivates every card.
    ///
    /// Mirroring processors take a fresh copy of the leader's board,
    /// enhancements included.
    pub fn reset(&mut self, state: &mut SessionState) {
        self.remaining = 0.0;
        self.index = 0;
        self.retriggers = 0;
        self.in_flight = None;
        match self.source {
            CardSource::Own => {
                if let Some(board) = state.board_mut(self.owner) {
                    board.reset_cards();
                }
            }
            CardSource::Mirror { leader } => {
                self.mirror = state.board(leader).cloned().map(|mut board| {
                    board.reset_cards();
                    board
                });
                if self.mirror.is_none() {
                    tracing::debug!(owner = %self.owner, leader = %leader, "mirror leader has no circuit board");
                }
            }
        }
    }

    /// Advances the in-flight timer and activates the next card when it runs
    /// out. Returns false once the pass is complete.
    pub fn tick(
        &mut self,
        dt: f32,
        state: &mut SessionState,
        phase: SimulationPhase,
        sink: &mut dyn EffectSink,
    ) -> bool {
        self.remaining -= dt;
        if self.remaining > 0.0 {
            return true;
        }
        if state.character(self.owner).is_none() {
            return false;
        }
        let Some(mut board) = self.checkout(state) else {
            return false;
        };
        let busy = self.activate_next(&mut board, state, phase, sink);
        self.checkin(state, board);
        busy
    }

    /// Removes the card at `position` in the active list.
    ///
    /// Cards before the processing index shift the index down by one so the
    /// card that slides into the vacated slot is not skipped.
    pub fn discard(&mut self, state: &mut SessionState, position: usize) -> Option<Card> {
        let board = match self.source {
            CardSource::Own => state.board_mut(self.owner)?,
            CardSource::Mirror { .. } => self.mirror.as_mut()?,
        };
        let socket = *board.active_sockets().get(position)?;
        let card = board.take(socket)?;

        if position < self.index {
            self.index -= 1;
        } else if position == self.index && self.retriggers > 0 {
            self.retriggers = 0;
        }
        if self.in_flight == Some(socket) {
            self.in_flight = None;
        }
        Some(card)
    }

    fn activate_next(
        &mut self,
        board: &mut CircuitBoard,
        state: &mut SessionState,
        phase: SimulationPhase,
        sink: &mut dyn EffectSink,
    ) -> bool {
        if let Some(card) = self.in_flight.take().and_then(|socket| board.card_mut(socket)) {
            card.phase = CardPhase::Expired;
        }

        let active = board.active_sockets();
        let Some(&socket) = active.get(self.index) else {
            return false;
        };

        let outcome = CardSimulator::new(state).activate(self.owner, board, socket, phase, sink);
        self.remaining = board
            .card(socket)
            .map(|card| card.definition.max_time_in_use)
            .unwrap_or_default();
        self.in_flight = Some(socket);

        let exhausted = outcome
            .as_ref()
            .is_none_or(|outcome| outcome.max_triggers_reached);
        if exhausted {
            self.index += 1;
            self.retriggers = 0;
        } else {
            self.remaining += state.config.retrigger_delay;
            self.retriggers += 1;
            tracing::debug!(
                owner = %self.owner,
                socket,
                retriggers = self.retriggers,
                "card retriggering"
            );
        }
        true
    }

    fn checkout(&mut self, state: &mut SessionState) -> Option<CircuitBoard> {
        match self.source {
            CardSource::Own => state.take_board(self.owner),
            CardSource::Mirror { .. } => self.mirror.take(),
        }
    }

    fn checkin(&mut self, state: &mut SessionState, board: CircuitBoard) {
        match self.source {
            CardSource::Own => {
                // The owner may have been removed while its board was out.
                if state.character(self.owner).is_some() {
                    state.set_board(self.owner, board);
                }
            }
            CardSource::Mirror { .. } => self.mirror = Some(board),
        }
    }
}
