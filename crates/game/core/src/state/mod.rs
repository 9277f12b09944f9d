//! Authoritative session state.
//!
//! [`SessionState`] is the explicit context every component receives by
//! reference: the grid, characters and their team rosters, circuit boards,
//! decks and pending timed actions. Character positions and grid occupancy
//! are only changed together, through the methods here.
mod character;
mod common;
mod grid;
mod snapshot;
mod timers;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use character::{BrainType, Character, CharacterSpec, StatusTag, Team};
pub use common::{CharacterId, Coord, ResourceMeter};
pub use grid::{GridCell, GridIndex, SurfaceEffect};
pub use snapshot::{CardRecord, SessionSnapshot, SocketRecord};
pub use timers::{TimedAction, TimedQueue};

use crate::card::{Card, CardDefinition, CardId, Deck};
use crate::circuit::{CircuitBoard, CircuitError};
use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub config: GameConfig,
    /// Occupancy must stay in step with character positions, so outside the
    /// crate the grid is read-only; see [`SessionState::grid`].
    pub(crate) grid: GridIndex,
    /// Deferred actions (card draws) resolved by the turn coordinator.
    pub timers: TimedQueue<TimedAction>,
    characters: BTreeMap<CharacterId, Character>,
    /// Team members in spawn order; this is the processing order.
    rosters: BTreeMap<Team, Vec<CharacterId>>,
    boards: BTreeMap<CharacterId, CircuitBoard>,
    decks: BTreeMap<CharacterId, Deck>,
    next_character_id: u32,
    next_card_id: u32,
}

impl SessionState {
    pub fn new(grid: GridIndex, config: GameConfig) -> Self {
        Self {
            config,
            grid,
            timers: TimedQueue::new(),
            characters: BTreeMap::new(),
            rosters: BTreeMap::new(),
            boards: BTreeMap::new(),
            decks: BTreeMap::new(),
            next_character_id: 1,
            next_card_id: 1,
        }
    }

    pub fn grid(&self) -> &GridIndex {
        &self.grid
    }

    /// Places a new character on a free cell and appends it to its roster.
    pub fn spawn_character(
        &mut self,
        spec: CharacterSpec,
        at: Coord,
    ) -> Result<CharacterId, SessionError> {
        let id = CharacterId(self.next_character_id);
        let character = Character {
            id,
            name: spec.name,
            team: spec.team,
            brain: spec.brain,
            health: ResourceMeter::full(spec.max_health),
            status: StatusTag::None,
            position: at,
        };
        self.insert_character(character)?;
        tracing::debug!(character = %id, team = %spec.team, position = %at, "character spawned");
        Ok(id)
    }

    fn insert_character(&mut self, mut character: Character) -> Result<(), SessionError> {
        // Saved meters are untrusted input.
        character.health = ResourceMeter::new(character.health.current, character.health.maximum);
        let at = character.position;
        let cell = self.grid.get(at).ok_or(SessionError::OffGrid(at))?;
        if let Some(occupant) = cell.occupant {
            return Err(SessionError::CellOccupied { coord: at, occupant });
        }
        self.grid.set_occupant(at, Some(character.id));
        self.rosters.entry(character.team).or_default().push(character.id);
        self.next_character_id = self.next_character_id.max(character.id.0 + 1);
        self.characters.insert(character.id, character);
        Ok(())
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id)
    }

    /// Characters in id order.
    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    pub fn roster(&self, team: Team) -> &[CharacterId] {
        self.rosters.get(&team).map(Vec::as_slice).unwrap_or_default()
    }

    /// Living members of `team` in roster order.
    pub fn members(&self, team: Team) -> impl Iterator<Item = &Character> {
        self.roster(team)
            .iter()
            .filter_map(|id| self.characters.get(id))
    }

    /// Moves a character, transferring cell ownership in one step.
    pub fn move_character(&mut self, id: CharacterId, to: Coord) -> Result<(), SessionError> {
        let from = self
            .characters
            .get(&id)
            .map(Character::position)
            .ok_or(SessionError::UnknownCharacter(id))?;
        if from == to {
            return Ok(());
        }
        let cell = self.grid.get(to).ok_or(SessionError::OffGrid(to))?;
        if let Some(occupant) = cell.occupant {
            return Err(SessionError::CellOccupied { coord: to, occupant });
        }

        self.grid.set_occupant(from, None);
        self.grid.set_occupant(to, Some(id));
        if let Some(character) = self.characters.get_mut(&id) {
            character.position = to;
        }
        Ok(())
    }

    /// Removes up to `amount` health, returning the amount removed.
    pub fn apply_damage(&mut self, id: CharacterId, amount: u32) -> u32 {
        self.characters
            .get_mut(&id)
            .map(|character| character.health.drain(amount))
            .unwrap_or(0)
    }

    pub fn apply_heal(&mut self, id: CharacterId, amount: u32) -> u32 {
        self.characters
            .get_mut(&id)
            .map(|character| character.health.restore(amount))
            .unwrap_or(0)
    }

    pub fn set_status(&mut self, id: CharacterId, status: StatusTag) -> bool {
        match self.characters.get_mut(&id) {
            Some(character) => {
                character.status = status;
                true
            }
            None => false,
        }
    }

    /// Removes a dead character from its roster and cell, leaving a corpse.
    ///
    /// The character's board and deck go with it.
    pub fn remove_character(&mut self, id: CharacterId) -> Option<Character> {
        let character = self.characters.remove(&id)?;
        if let Some(roster) = self.rosters.get_mut(&character.team) {
            roster.retain(|member| *member != id);
        }
        self.grid.set_occupant(character.position, None);
        self.grid.set_corpse(character.position, true);
        self.boards.remove(&id);
        self.decks.remove(&id);
        Some(character)
    }

    pub fn board(&self, owner: CharacterId) -> Option<&CircuitBoard> {
        self.boards.get(&owner)
    }

    pub fn board_mut(&mut self, owner: CharacterId) -> Option<&mut CircuitBoard> {
        self.boards.get_mut(&owner)
    }

    pub fn set_board(&mut self, owner: CharacterId, board: CircuitBoard) {
        self.boards.insert(owner, board);
    }

    pub(crate) fn take_board(&mut self, owner: CharacterId) -> Option<CircuitBoard> {
        self.boards.remove(&owner)
    }

    pub fn deck(&self, owner: CharacterId) -> Option<&Deck> {
        self.decks.get(&owner)
    }

    pub fn deck_mut(&mut self, owner: CharacterId) -> Option<&mut Deck> {
        self.decks.get_mut(&owner)
    }

    pub fn set_deck(&mut self, owner: CharacterId, deck: Deck) {
        self.decks.insert(owner, deck);
    }

    /// Creates a card instance with a fresh id.
    pub fn new_card(&mut self, definition: Arc<CardDefinition>) -> Card {
        let id = CardId(self.next_card_id);
        self.next_card_id += 1;
        Card::new(id, definition)
    }

    /// Draws one card for `owner`; `None` when there is nothing to draw.
    pub fn draw_card(&mut self, owner: CharacterId) -> Option<CardId> {
        self.decks.get_mut(&owner)?.draw()
    }

    /// Moves a hand card into a board socket.
    pub fn slot_from_hand(
        &mut self,
        owner: CharacterId,
        card: CardId,
        socket: usize,
    ) -> Result<(), SessionError> {
        let board = self
            .boards
            .get_mut(&owner)
            .ok_or(SessionError::NoCircuitBoard(owner))?;
        let deck = self
            .decks
            .get_mut(&owner)
            .ok_or(SessionError::UnknownCard(card))?;
        let taken = deck
            .take_from_hand(card)
            .ok_or(SessionError::UnknownCard(card))?;
        // Hand the card back if the socket refuses it.
        if let Err(error) = board.insert(socket, taken.clone()) {
            deck.add_to_hand(taken);
            return Err(error.into());
        }
        Ok(())
    }
}

/// Errors raised by direct edits of the session state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("character {0} does not exist")]
    UnknownCharacter(CharacterId),

    #[error("cell {0} is off the grid")]
    OffGrid(Coord),

    #[error("cell {coord} is already occupied by {occupant}")]
    CellOccupied { coord: Coord, occupant: CharacterId },

    #[error("character {0} has no circuit board")]
    NoCircuitBoard(CharacterId),

    #[error("card {0} is not available")]
    UnknownCard(CardId),

    #[error("card definition '{0}' is not in the catalog")]
    UnknownDefinition(String),

    #[error(transparent)]
    Circuit(#[from] CircuitError),
}

impl GameError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CellOccupied { .. } => ErrorSeverity::Recoverable,
            Self::OffGrid(_) | Self::UnknownCard(_) | Self::NoCircuitBoard(_) => {
                ErrorSeverity::Validation
            }
            Self::UnknownCharacter(_) => ErrorSeverity::Internal,
            Self::UnknownDefinition(_) => ErrorSeverity::Fatal,
            Self::Circuit(error) => error.severity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> SessionState {
        SessionState::new(GridIndex::rectangular(3, 3), GameConfig::default())
    }

    #[test]
    fn spawn_claims_cell_and_roster_slot() {
        let mut state = state();
        let a = state
            .spawn_character(CharacterSpec::new("a", Team::Enemy, 3), Coord::new(0, 2))
            .unwrap();
        let b = state
            .spawn_character(CharacterSpec::new("b", Team::Enemy, 3), Coord::new(1, 2))
            .unwrap();

        assert_eq!(state.roster(Team::Enemy), &[a, b]);
        assert_eq!(state.grid.occupant(Coord::new(0, 2)), Some(a));
        assert!(state.roster(Team::Player).is_empty());
    }

    #[test]
    fn spawn_refuses_taken_or_missing_cells() {
        let mut state = state();
        let a = state
            .spawn_character(CharacterSpec::new("a", Team::Player, 3), Coord::new(1, 1))
            .unwrap();
        assert_eq!(
            state.spawn_character(CharacterSpec::new("b", Team::Enemy, 3), Coord::new(1, 1)),
            Err(SessionError::CellOccupied {
                coord: Coord::new(1, 1),
                occupant: a
            })
        );
        assert_eq!(
            state.spawn_character(CharacterSpec::new("c", Team::Enemy, 3), Coord::new(7, 7)),
            Err(SessionError::OffGrid(Coord::new(7, 7)))
        );
    }

    #[test]
    fn move_keeps_position_and_occupancy_in_sync() {
        let mut state = state();
        let a = state
            .spawn_character(CharacterSpec::new("a", Team::Player, 3), Coord::new(0, 0))
            .unwrap();
        state.move_character(a, Coord::new(0, 1)).unwrap();

        assert_eq!(state.character(a).unwrap().position(), Coord::new(0, 1));
        assert_eq!(state.grid().occupant(Coord::new(0, 1)), Some(a));
        assert!(state.grid().is_free(Coord::new(0, 0)));
    }

    #[test]
    fn failed_move_changes_nothing() {
        let mut state = state();
        let a = state
            .spawn_character(CharacterSpec::new("a", Team::Player, 3), Coord::new(0, 0))
            .unwrap();
        let b = state
            .spawn_character(CharacterSpec::new("b", Team::Enemy, 3), Coord::new(0, 1))
            .unwrap();

        assert!(state.move_character(a, Coord::new(0, 1)).is_err());
        assert!(state.move_character(a, Coord::new(0, 9)).is_err());
        assert_eq!(state.character(a).unwrap().position(), Coord::new(0, 0));
        assert_eq!(state.grid.occupant(Coord::new(0, 1)), Some(b));
    }

    #[test]
    fn removal_leaves_corpse() {
        let mut state = state();
        let a = state
            .spawn_character(CharacterSpec::new("a", Team::Enemy, 1), Coord::new(2, 2))
            .unwrap();
        state.set_board(a, CircuitBoard::with_sockets(1));

        let removed = state.remove_character(a).unwrap();
        assert_eq!(removed.id, a);
        let cell = state.grid.get(Coord::new(2, 2)).unwrap();
        assert!(cell.corpse);
        assert!(cell.is_free());
        assert!(state.roster(Team::Enemy).is_empty());
        assert!(state.board(a).is_none());
    }

    #[test]
    fn heal_and_damage_clamp() {
        let mut state = state();
        let a = state
            .spawn_character(CharacterSpec::new("a", Team::Player, 5), Coord::new(0, 0))
            .unwrap();
        assert_eq!(state.apply_damage(a, 7), 5);
        assert!(!state.character(a).unwrap().is_alive());
        assert_eq!(state.apply_heal(a, 9), 5);
        assert_eq!(state.apply_damage(CharacterId(42), 1), 0);
    }

    #[test]
    fn restored_health_is_clamped_to_maximum() {
        let mut state = state();
        let a = state
            .spawn_character(CharacterSpec::new("a", Team::Player, 5), Coord::new(0, 0))
            .unwrap();
        let mut snapshot = state.snapshot();
        snapshot.characters[0].health = ResourceMeter {
            current: 50,
            maximum: 5,
        };

        let mut restored = SessionState::restore(
            GridIndex::rectangular(3, 3),
            GameConfig::default(),
            &snapshot,
            |_| None,
        )
        .unwrap();
        assert_eq!(restored.character(a).unwrap().health, ResourceMeter::full(5));
        assert_eq!(restored.apply_heal(a, 3), 0);
    }
}
