//! Persistence view of a session.
//!
//! A snapshot carries only what cannot be rebuilt from content: characters,
//! cells that differ from their build-time values, socket enhancements and
//! card placements. Card definitions are referenced by id and resolved
//! through a lookup on restore.
//!
//! Turn bookkeeping and the reward counter live outside [`SessionState`];
//! whoever owns them fills those fields in before saving.

use std::sync::Arc;

use crate::card::{CardDefinition, CardId, CardZone, Deck};
use crate::circuit::{CircuitBoard, SocketEnhancement};
use crate::config::GameConfig;
use crate::engine::TurnState;

use super::{Character, CharacterId, GridCell, GridIndex, SessionError, SessionState};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SocketRecord {
    pub owner: CharacterId,
    pub index: usize,
    pub card: Option<CardId>,
    pub enhancement: SocketEnhancement,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardRecord {
    pub id: CardId,
    pub owner: CharacterId,
    pub definition: String,
    pub zone: CardZone,
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionSnapshot {
    /// Characters in roster order, team by team.
    pub characters: Vec<Character>,
    pub cells: Vec<GridCell>,
    /// Every socket of every board, empty ones included.
    pub sockets: Vec<SocketRecord>,
    /// Deck cards in zone order (draw pile, hand, discard), then socketed cards.
    pub cards: Vec<CardRecord>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub turn: TurnState,
    /// Reward offers made so far.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rewards_offered: u64,
}

impl SessionState {
    pub fn snapshot(&self) -> SessionSnapshot {
        let characters = self
            .rosters
            .values()
            .flatten()
            .filter_map(|id| self.characters.get(id).cloned())
            .collect();

        let cells = self
            .grid
            .cells()
            .filter(|cell| !cell.is_pristine())
            .cloned()
            .collect();

        let mut sockets = Vec::new();
        let mut cards = Vec::new();
        for (owner, deck) in &self.decks {
            cards.extend(deck.cards().map(|card| CardRecord {
                id: card.id,
                owner: *owner,
                definition: card.definition.id.clone(),
                zone: card.zone,
            }));
        }
        for (owner, board) in &self.boards {
            for (index, socket) in board.sockets().iter().enumerate() {
                sockets.push(SocketRecord {
                    owner: *owner,
                    index,
                    card: socket.card.as_ref().map(|card| card.id),
                    enhancement: socket.enhancement,
                });
                if let Some(card) = &socket.card {
                    cards.push(CardRecord {
                        id: card.id,
                        owner: *owner,
                        definition: card.definition.id.clone(),
                        zone: CardZone::Socket,
                    });
                }
            }
        }

        SessionSnapshot {
            characters,
            cells,
            sockets,
            cards,
            turn: TurnState::default(),
            rewards_offered: 0,
        }
    }

    /// Rebuilds a session on a freshly built grid.
    ///
    /// `lookup` resolves card definition ids; an unknown id fails the whole
    /// restore.
    pub fn restore(
        grid: GridIndex,
        config: GameConfig,
        snapshot: &SessionSnapshot,
        lookup: impl Fn(&str) -> Option<Arc<CardDefinition>>,
    ) -> Result<Self, SessionError> {
        let mut state = SessionState::new(grid, config);

        for cell in &snapshot.cells {
            if !state.grid.contains(cell.coord) {
                return Err(SessionError::OffGrid(cell.coord));
            }
            state.grid.set_surface(cell.coord, cell.surface);
            state.grid.set_status(cell.coord, cell.status);
            state.grid.set_corpse(cell.coord, cell.corpse);
        }
        for character in &snapshot.characters {
            state.insert_character(character.clone())?;
        }

        for record in &snapshot.sockets {
            if state.character(record.owner).is_none() {
                return Err(SessionError::UnknownCharacter(record.owner));
            }
            let board = state.boards.entry(record.owner).or_default();
            while board.len() <= record.index {
                board.add_socket()?;
            }
            if let Some(socket) = board.socket_mut(record.index) {
                socket.enhancement = record.enhancement;
            }
        }

        for record in &snapshot.cards {
            let definition = lookup(&record.definition)
                .ok_or_else(|| SessionError::UnknownDefinition(record.definition.clone()))?;
            let mut card = state.new_card(definition);
            card.id = record.id;
            state.next_card_id = state.next_card_id.max(record.id.0 + 1);

            match record.zone {
                CardZone::Socket => {
                    let index = snapshot
                        .sockets
                        .iter()
                        .find(|socket| socket.owner == record.owner && socket.card == Some(record.id))
                        .map(|socket| socket.index)
                        .ok_or(SessionError::UnknownCard(record.id))?;
                    state
                        .boards
                        .entry(record.owner)
                        .or_insert_with(CircuitBoard::default)
                        .insert(index, card)?;
                }
                CardZone::DrawPile => state.deck_entry(record.owner).push_draw_pile(card),
                CardZone::Hand => state.deck_entry(record.owner).add_to_hand(card),
                CardZone::Discard => state.deck_entry(record.owner).discard(card),
            }
        }

        Ok(state)
    }

    fn deck_entry(&mut self, owner: CharacterId) -> &mut Deck {
        self.decks.entry(owner).or_default()
    }
}
