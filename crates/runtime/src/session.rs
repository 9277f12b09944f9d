//! Session orchestrator.
//!
//! A [`Session`] owns everything one game needs: the session state, the turn
//! coordinator, the loaded content and the event log. It is single-threaded
//! and advances only when the host calls [`Session::tick`].

use std::path::PathBuf;
use std::sync::Arc;

use circuit_content::ContentBundle;
use circuit_core::{
    CardDefinition, CardId, CharacterId, CharacterSpec, CircuitBoard, Coord, Deck, EnemySpawner,
    GameConfig, GridIndex, PreviewReport, RowSpawner, SessionError, SessionSnapshot,
    SessionState, TurnCoordinator, TurnPhase, TurnState,
};

use crate::events::{EventRecorder, GameEvent};
use crate::repository::SnapshotRepository;
use crate::{Result, RuntimeError};

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Overrides the configuration that ships with the content when set.
    pub game_config: Option<GameConfig>,
    pub grid_width: u32,
    pub grid_height: u32,
    /// Events kept before the oldest are dropped.
    pub event_capacity: usize,
    /// Template used by the default spawner; the first loaded one when unset.
    pub enemy_template: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: None,
            grid_width: 5,
            grid_height: 8,
            event_capacity: 1024,
            enemy_template: None,
        }
    }
}

pub struct Session {
    state: SessionState,
    coordinator: TurnCoordinator,
    content: ContentBundle,
    recorder: EventRecorder,
    rewards_offered: u64,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn content(&self) -> &ContentBundle {
        &self.content
    }

    pub fn phase(&self) -> TurnPhase {
        self.coordinator.phase()
    }

    pub fn turn(&self) -> &TurnState {
        self.coordinator.turn()
    }

    /// The last completed preview of the queued turn.
    pub fn preview(&self) -> Option<&PreviewReport> {
        self.coordinator.preview_report()
    }

    pub fn events(&self) -> impl Iterator<Item = &GameEvent> {
        self.recorder.events()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.recorder.drain()
    }

    pub fn recorder(&self) -> &EventRecorder {
        &self.recorder
    }

    pub fn tick(&mut self, dt: f32) -> TurnPhase {
        self.coordinator
            .tick(&mut self.state, dt, &mut self.recorder)
    }

    pub fn request_end_turn(&mut self) -> bool {
        self.coordinator.request_end_turn()
    }

    pub fn request_recalculate(&mut self) {
        self.coordinator.request_recalculate();
    }

    /// Spawns a character with an empty board of `sockets` sockets and an
    /// empty deck.
    pub fn spawn(&mut self, spec: CharacterSpec, at: Coord, sockets: usize) -> Result<CharacterId> {
        let id = self.state.spawn_character(spec, at)?;
        self.state.set_board(id, CircuitBoard::with_sockets(sockets));
        self.state.set_deck(id, Deck::new());
        self.circuit_edited();
        Ok(id)
    }

    /// Creates a card from the catalog in `owner`'s hand.
    pub fn give_card(&mut self, owner: CharacterId, card: &str) -> Result<CardId> {
        let card = self.instantiate(card)?;
        let id = card.id;
        self.deck_for(owner)?.add_to_hand(card);
        Ok(id)
    }

    /// Puts catalog cards on top of `owner`'s draw pile, last one on top.
    pub fn stock_draw_pile(&mut self, owner: CharacterId, cards: &[&str]) -> Result<()> {
        for name in cards {
            let card = self.instantiate(name)?;
            self.deck_for(owner)?.push_draw_pile(card);
        }
        Ok(())
    }

    /// Moves a hand card into a socket.
    pub fn slot_card(&mut self, owner: CharacterId, card: CardId, socket: usize) -> Result<()> {
        self.state.slot_from_hand(owner, card, socket)?;
        self.circuit_edited();
        Ok(())
    }

    /// Creates a catalog card directly in a socket.
    pub fn place_card(&mut self, owner: CharacterId, card: &str, socket: usize) -> Result<CardId> {
        let card = self.instantiate(card)?;
        let id = card.id;
        self.board_for(owner)?.insert(socket, card)?;
        self.circuit_edited();
        Ok(id)
    }

    pub fn swap_sockets(&mut self, owner: CharacterId, a: usize, b: usize) -> Result<()> {
        self.board_for(owner)?.swap(a, b)?;
        self.circuit_edited();
        Ok(())
    }

    /// Removes the card at `position` of `owner`'s active socket list and
    /// puts it in the discard pile.
    ///
    /// During a live turn the owner's processor keeps its index aligned.
    pub fn discard_from_circuit(
        &mut self,
        owner: CharacterId,
        position: usize,
    ) -> Result<Option<CardId>> {
        let live = !self.coordinator.phase().is_simulation();
        let card = match self.coordinator.processor_mut(owner).filter(|_| live) {
            Some(processor) => processor.discard(&mut self.state, position),
            None => {
                let board = self
                    .state
                    .board_mut(owner)
                    .ok_or(RuntimeError::NoCircuitBoard(owner))?;
                board
                    .active_sockets()
                    .get(position)
                    .copied()
                    .and_then(|socket| board.take(socket))
            }
        };
        let Some(card) = card else {
            return Ok(None);
        };
        let id = card.id;
        self.deck_for(owner)?.discard(card);
        self.circuit_edited();
        Ok(Some(id))
    }

    /// Deterministic reward offer from a content pool.
    pub fn offer_reward(&mut self, pool: &str) -> Option<Arc<CardDefinition>> {
        let card = self
            .content
            .rewards
            .pick(pool, self.state.config.game_seed, self.rewards_offered);
        self.rewards_offered += 1;
        card
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            turn: self.coordinator.turn().clone(),
            rewards_offered: self.rewards_offered,
            ..self.state.snapshot()
        }
    }

    /// Saves a snapshot keyed by the current turn number.
    pub fn save(&self, repository: &SnapshotRepository) -> Result<PathBuf> {
        repository.save(self.turn().turn_number, &self.snapshot())
    }

    fn instantiate(&mut self, card: &str) -> Result<circuit_core::Card> {
        let definition = self
            .content
            .cards
            .get(card)
            .ok_or_else(|| RuntimeError::UnknownCard(card.to_string()))?;
        Ok(self.state.new_card(definition))
    }

    fn deck_for(&mut self, owner: CharacterId) -> Result<&mut Deck> {
        if self.state.character(owner).is_none() {
            return Err(SessionError::UnknownCharacter(owner).into());
        }
        if self.state.deck(owner).is_none() {
            self.state.set_deck(owner, Deck::new());
        }
        self.state
            .deck_mut(owner)
            .ok_or(RuntimeError::Session(SessionError::UnknownCharacter(owner)))
    }

    fn board_for(&mut self, owner: CharacterId) -> Result<&mut CircuitBoard> {
        self.state
            .board_mut(owner)
            .ok_or(RuntimeError::NoCircuitBoard(owner))
    }

    /// Board edits while previewing invalidate the preview.
    fn circuit_edited(&mut self) {
        if self.coordinator.phase().is_simulation() {
            self.coordinator.request_recalculate();
        }
    }
}

/// Builder for [`Session`].
pub struct SessionBuilder {
    config: RuntimeConfig,
    content: Option<ContentBundle>,
    grid: Option<GridIndex>,
    snapshot: Option<SessionSnapshot>,
    spawner: Option<Box<dyn EnemySpawner>>,
}

impl SessionBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            content: None,
            grid: None,
            snapshot: None,
            spawner: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Content to use instead of the embedded data set.
    pub fn content(mut self, content: ContentBundle) -> Self {
        self.content = Some(content);
        self
    }

    /// Grid to use instead of a `grid_width` x `grid_height` rectangle.
    pub fn grid(mut self, grid: GridIndex) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Resumes from a saved snapshot.
    pub fn snapshot(mut self, snapshot: SessionSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn spawner(mut self, spawner: impl EnemySpawner + 'static) -> Self {
        self.spawner = Some(Box::new(spawner));
        self
    }

    pub fn build(self) -> Result<Session> {
        let content = match self.content {
            Some(content) => content,
            None => ContentBundle::builtin().map_err(RuntimeError::Content)?,
        };
        let game_config = self
            .config
            .game_config
            .clone()
            .unwrap_or_else(|| content.config.clone());
        let grid = self.grid.unwrap_or_else(|| {
            GridIndex::rectangular(self.config.grid_width, self.config.grid_height)
        });

        let state = match &self.snapshot {
            Some(snapshot) => {
                SessionState::restore(grid, game_config.clone(), snapshot, |id| content.cards.get(id))?
            }
            None => SessionState::new(grid, game_config.clone()),
        };

        let mut coordinator = TurnCoordinator::new(&game_config);
        if let Some(snapshot) = &self.snapshot {
            coordinator.resume(snapshot.turn.clone());
        }
        match self.spawner {
            Some(spawner) => coordinator.set_spawner(spawner),
            None => {
                let template = match &self.config.enemy_template {
                    Some(name) => Some(
                        content
                            .enemies
                            .iter()
                            .find(|template| &template.name == name)
                            .ok_or_else(|| RuntimeError::UnknownEnemy(name.clone()))?,
                    ),
                    None => content.enemies.first(),
                };
                if let Some(template) = template {
                    coordinator.set_spawner(Box::new(RowSpawner::new(template.clone())));
                }
            }
        }

        tracing::info!(
            cells = state.grid().len(),
            cards = content.cards.len(),
            restored = self.snapshot.is_some(),
            "session built"
        );

        Ok(Session {
            state,
            coordinator,
            content,
            recorder: EventRecorder::new(self.config.event_capacity),
            rewards_offered: self
                .snapshot
                .as_ref()
                .map_or(0, |snapshot| snapshot.rewards_offered),
        })
    }
}
