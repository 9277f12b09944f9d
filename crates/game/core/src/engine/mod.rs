//! Turn coordination.
//!
//! The [`TurnCoordinator`] is the top-level state machine of a session. It
//! cycles through the two preview states and the two live turns, fans each
//! tick out to the circuit processors of the active team and decides when
//! enemies spawn. It owns no game data: every call receives the
//! [`SessionState`] it acts on.

mod preview;
mod spawn;
mod turns;

pub use preview::{PlannedCard, PreviewReport, PreviewSession};
pub use spawn::{EnemySpawner, EnemyTemplate, RowSpawner};
pub use turns::{TurnPhase, TurnState};

use crate::circuit::CircuitProcessor;
use crate::config::GameConfig;
use crate::simulate::{Effect, EffectSink, SimulationPhase, strike};
use crate::state::{CharacterId, SessionState, StatusTag, Team, TimedAction};

#[derive(Debug)]
pub struct TurnCoordinator {
    turn: TurnState,
    /// Live processors of the team whose turn it is, in roster order.
    processors: Vec<CircuitProcessor>,
    preview: Option<PreviewSession>,
    report: Option<PreviewReport>,
    spawner: Option<Box<dyn EnemySpawner>>,
    end_turn_requested: bool,
}

impl TurnCoordinator {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            turn: TurnState::new(config),
            processors: Vec::new(),
            preview: None,
            report: None,
            spawner: None,
            end_turn_requested: false,
        }
    }

    pub fn with_spawner(mut self, spawner: impl EnemySpawner + 'static) -> Self {
        self.spawner = Some(Box::new(spawner));
        self
    }

    pub fn set_spawner(&mut self, spawner: Box<dyn EnemySpawner>) {
        self.spawner = Some(spawner);
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn phase(&self) -> TurnPhase {
        self.turn.phase
    }

    pub fn processors(&self) -> &[CircuitProcessor] {
        &self.processors
    }

    pub fn processor_mut(&mut self, owner: CharacterId) -> Option<&mut CircuitProcessor> {
        self.processors
            .iter_mut()
            .find(|processor| processor.owner() == owner)
    }

    /// The last completed preview.
    pub fn preview_report(&self) -> Option<&PreviewReport> {
        self.report.as_ref()
    }

    /// Continues from saved turn bookkeeping.
    ///
    /// Previews always restart from scratch. A save taken during a live turn
    /// resumes at the next player preview, since live processors are not
    /// persisted.
    pub fn resume(&mut self, turn: TurnState) {
        self.turn = turn;
        if !self.turn.phase.is_simulation() {
            tracing::warn!(phase = %self.turn.phase, "resuming a live turn at the next preview");
            self.turn.phase = TurnPhase::PlayerSimulation;
            self.turn.turn_timer = 0.0;
        }
        self.processors.clear();
        self.preview = None;
        self.report = None;
        self.end_turn_requested = false;
    }

    /// Asks to commit the previewed turn. Only honored while previewing.
    pub fn request_end_turn(&mut self) -> bool {
        if self.turn.phase.is_simulation() {
            self.end_turn_requested = true;
            true
        } else {
            tracing::debug!(phase = %self.turn.phase, "end turn ignored outside simulation");
            false
        }
    }

    /// Marks the preview stale; it restarts from scratch on the next
    /// simulation tick.
    pub fn request_recalculate(&mut self) {
        self.turn.recalculate = true;
    }

    /// Advances the session by `dt` seconds and returns the phase afterwards.
    pub fn tick(
        &mut self,
        state: &mut SessionState,
        dt: f32,
        sink: &mut dyn EffectSink,
    ) -> TurnPhase {
        self.turn.turn_timer += dt;
        resolve_timers(state, dt, sink);
        match self.turn.phase {
            TurnPhase::PlayerSimulation | TurnPhase::EnemySimulation => {
                self.tick_simulation(state, dt, sink)
            }
            TurnPhase::PlayerTurn | TurnPhase::EnemyTurn => self.tick_live(state, dt, sink),
        }
        self.turn.phase
    }

    /// Counts down one completed enemy pass and spawns when due.
    pub fn decide_enemy_spawn(&mut self, state: &mut SessionState) -> Option<CharacterId> {
        if !self
            .turn
            .count_down_spawn(state.config.enemy_spawn_interval)
        {
            return None;
        }
        let spawned = match self.spawner.as_mut() {
            Some(spawner) => spawner.spawn(state, self.turn.enemies_spawned),
            None => {
                tracing::debug!("enemy spawn due but no spawner configured");
                None
            }
        };
        if spawned.is_some() {
            self.turn.enemies_spawned += 1;
        }
        spawned
    }

    fn tick_simulation(&mut self, state: &mut SessionState, dt: f32, sink: &mut dyn EffectSink) {
        if self.end_turn_requested {
            self.end_turn_requested = false;
            self.turn.recalculate = false;
            self.preview = None;
            self.begin_live(state, Team::Player, sink);
            self.enter(TurnPhase::PlayerTurn, sink);
            return;
        }

        if std::mem::take(&mut self.turn.recalculate) || self.preview.is_none() {
            self.preview = Some(PreviewSession::start(state));
            if self.turn.phase != TurnPhase::PlayerSimulation {
                self.enter(TurnPhase::PlayerSimulation, sink);
            }
        }
        let Some(preview) = self.preview.as_mut() else {
            return;
        };
        if preview.tick(dt) {
            return;
        }

        if self.turn.phase == TurnPhase::PlayerSimulation {
            preview.begin(Team::Enemy);
            self.enter(TurnPhase::EnemySimulation, sink);
        } else {
            if let Some(done) = self.preview.take() {
                let report = done.finish();
                tracing::debug!(
                    plans = report.plans.len(),
                    effects = report.effects.len(),
                    "preview published"
                );
                self.report = Some(report);
            }
            self.enter(TurnPhase::PlayerSimulation, sink);
        }
    }

    fn tick_live(&mut self, state: &mut SessionState, dt: f32, sink: &mut dyn EffectSink) {
        // Every processor ticks each frame; the team is busy while any is.
        let mut busy = false;
        for processor in &mut self.processors {
            busy |= processor.tick(dt, state, SimulationPhase::Live, sink);
        }
        if busy {
            return;
        }

        match self.turn.phase {
            TurnPhase::PlayerTurn => {
                self.begin_live(state, Team::Enemy, sink);
                self.enter(TurnPhase::EnemyTurn, sink);
            }
            TurnPhase::EnemyTurn => {
                self.processors.clear();
                self.decide_enemy_spawn(state);
                self.turn.turn_number += 1;
                self.enter(TurnPhase::PlayerSimulation, sink);
            }
            TurnPhase::PlayerSimulation | TurnPhase::EnemySimulation => {}
        }
    }

    fn begin_live(&mut self, state: &mut SessionState, team: Team, sink: &mut dyn EffectSink) {
        tick_statuses(state, team, sink);
        let members: Vec<_> = state
            .members(team)
            .map(CircuitProcessor::for_character)
            .collect();
        self.processors = members
            .into_iter()
            .map(|mut processor| {
                processor.reset(state);
                processor
            })
            .collect();
    }

    fn enter(&mut self, phase: TurnPhase, sink: &mut dyn EffectSink) {
        sink.phase_changed(self.turn.phase, phase, self.turn.turn_number);
        tracing::info!(
            from = %self.turn.phase,
            to = %phase,
            turn = self.turn.turn_number,
            "turn phase changed"
        );
        self.turn.phase = phase;
        self.turn.turn_timer = 0.0;
    }
}

/// Resolves statuses at the start of `team`'s pass: Fire burns once and
/// clears, Shocked clears.
pub(crate) fn tick_statuses(state: &mut SessionState, team: Team, sink: &mut dyn EffectSink) {
    let members: Vec<_> = state
        .members(team)
        .map(|character| (character.id, character.status))
        .collect();
    for (id, status) in members {
        if status == StatusTag::None {
            continue;
        }
        state.set_status(id, StatusTag::None);
        sink.emit(&Effect::SetStatus {
            character: id,
            status: StatusTag::None,
        });
        if status == StatusTag::Fire {
            for effect in strike(state, id, state.config.burn_damage, id) {
                sink.emit(&effect);
            }
        }
    }
}

fn resolve_timers(state: &mut SessionState, dt: f32, sink: &mut dyn EffectSink) {
    if state.timers.is_empty() {
        return;
    }
    for action in state.timers.advance(dt) {
        match action {
            TimedAction::DrawCard { character } => match state.draw_card(character) {
                Some(card) => sink.emit(&Effect::CardDrawn { character, card }),
                None => tracing::debug!(character = %character, "nothing to draw"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::card::{ActionKind, ActionStep, CardDefinition, CardType, Deck, StepVector};
    use crate::circuit::CircuitBoard;
    use crate::simulate::NullSink;
    use crate::state::{CharacterSpec, Coord, GridIndex};

    fn state() -> SessionState {
        SessionState::new(GridIndex::rectangular(3, 4), GameConfig::default())
    }

    fn arm(state: &mut SessionState, owner: CharacterId, defs: Vec<CardDefinition>) {
        let mut board = CircuitBoard::with_sockets(defs.len().max(1));
        for (socket, def) in defs.into_iter().enumerate() {
            let card = state.new_card(Arc::new(def));
            board.insert(socket, card).unwrap();
        }
        state.set_board(owner, board);
    }

    fn jab(duration: f32) -> CardDefinition {
        CardDefinition::new("jab", CardType::Attack, StepVector::new(1, 1), 1).with_duration(duration)
    }

    fn run_until(
        coordinator: &mut TurnCoordinator,
        state: &mut SessionState,
        phase: TurnPhase,
    ) -> usize {
        for ticks in 0..1000 {
            if coordinator.tick(state, 0.25, &mut NullSink) == phase {
                return ticks;
            }
        }
        panic!("never reached {phase}");
    }

    #[derive(Default)]
    struct PhaseLog(Vec<(TurnPhase, TurnPhase)>);

    impl EffectSink for PhaseLog {
        fn phase_changed(&mut self, from: TurnPhase, to: TurnPhase, _turn: u32) {
            self.0.push((from, to));
        }
    }

    #[test]
    fn transitions_reach_the_sink() {
        let mut state = state();
        let mut coordinator = TurnCoordinator::new(&state.config);
        let mut log = PhaseLog::default();
        coordinator.request_end_turn();
        for _ in 0..3 {
            coordinator.tick(&mut state, 0.25, &mut log);
        }
        assert_eq!(
            log.0,
            vec![
                (TurnPhase::PlayerSimulation, TurnPhase::PlayerTurn),
                (TurnPhase::PlayerTurn, TurnPhase::EnemyTurn),
                (TurnPhase::EnemyTurn, TurnPhase::PlayerSimulation),
            ]
        );
    }

    #[test]
    fn end_turn_only_while_previewing() {
        let mut state = state();
        let mut coordinator = TurnCoordinator::new(&state.config);
        assert!(coordinator.request_end_turn());
        coordinator.tick(&mut state, 0.25, &mut NullSink);
        assert_eq!(coordinator.phase(), TurnPhase::PlayerTurn);
        assert!(!coordinator.request_end_turn());
    }

    #[test]
    fn one_busy_player_keeps_the_turn() {
        let mut state = state();
        let idle = state
            .spawn_character(CharacterSpec::new("idle", Team::Player, 5), Coord::new(0, 0))
            .unwrap();
        let busy = state
            .spawn_character(CharacterSpec::new("busy", Team::Player, 5), Coord::new(2, 0))
            .unwrap();
        arm(&mut state, idle, Vec::new());
        arm(&mut state, busy, vec![jab(2.0)]);

        let mut coordinator = TurnCoordinator::new(&state.config);
        coordinator.request_end_turn();
        coordinator.tick(&mut state, 0.25, &mut NullSink);
        assert_eq!(coordinator.processors().len(), 2);

        // First processor reports done, second is mid-card.
        for _ in 0..4 {
            assert_eq!(
                coordinator.tick(&mut state, 0.25, &mut NullSink),
                TurnPhase::PlayerTurn
            );
        }
        let ticks = run_until(&mut coordinator, &mut state, TurnPhase::EnemyTurn);
        assert!(ticks >= 3);
    }

    #[test]
    fn full_round_returns_to_simulation() {
        let mut state = state();
        let hero = state
            .spawn_character(CharacterSpec::new("hero", Team::Player, 5), Coord::new(1, 0))
            .unwrap();
        let foe = state
            .spawn_character(CharacterSpec::new("foe", Team::Enemy, 5), Coord::new(1, 1))
            .unwrap();
        arm(&mut state, hero, vec![jab(0.5)]);
        arm(&mut state, foe, vec![jab(0.5)]);

        let mut coordinator = TurnCoordinator::new(&state.config);
        coordinator.request_end_turn();
        run_until(&mut coordinator, &mut state, TurnPhase::EnemyTurn);
        run_until(&mut coordinator, &mut state, TurnPhase::PlayerSimulation);

        assert_eq!(coordinator.turn().turn_number, 1);
        assert_eq!(state.character(hero).unwrap().health.current, 4);
        assert_eq!(state.character(foe).unwrap().health.current, 4);
    }

    #[test]
    fn preview_publishes_without_committing() {
        let mut state = state();
        let hero = state
            .spawn_character(CharacterSpec::new("hero", Team::Player, 5), Coord::new(1, 0))
            .unwrap();
        let foe = state
            .spawn_character(CharacterSpec::new("foe", Team::Enemy, 5), Coord::new(1, 1))
            .unwrap();
        arm(&mut state, hero, vec![jab(0.5)]);
        arm(&mut state, foe, vec![jab(0.5)]);

        let mut coordinator = TurnCoordinator::new(&state.config);
        run_until(&mut coordinator, &mut state, TurnPhase::EnemySimulation);
        run_until(&mut coordinator, &mut state, TurnPhase::PlayerSimulation);

        let report = coordinator.preview_report().unwrap();
        assert_eq!(report.damage_to(foe), 1);
        assert_eq!(report.damage_to(hero), 1);
        assert_eq!(state.character(foe).unwrap().health.current, 5);
        assert_eq!(state.character(hero).unwrap().health.current, 5);
    }

    #[test]
    fn recalculate_restarts_preview() {
        let mut state = state();
        let hero = state
            .spawn_character(CharacterSpec::new("hero", Team::Player, 5), Coord::new(1, 0))
            .unwrap();
        arm(&mut state, hero, vec![jab(2.0)]);

        let mut coordinator = TurnCoordinator::new(&state.config);
        coordinator.tick(&mut state, 0.25, &mut NullSink);
        arm(&mut state, hero, vec![jab(0.0), jab(0.0)]);
        coordinator.request_recalculate();
        run_until(&mut coordinator, &mut state, TurnPhase::EnemySimulation);
        run_until(&mut coordinator, &mut state, TurnPhase::PlayerSimulation);

        assert_eq!(coordinator.preview_report().unwrap().plans.len(), 2);
    }

    #[test]
    fn spawns_follow_enemy_pass_count() {
        let config = GameConfig::new().with_enemy_spawn_interval(2);
        let mut state = SessionState::new(GridIndex::rectangular(3, 4), config);
        let bite = CardDefinition::new("bite", CardType::Attack, StepVector::new(1, 1), 1);
        let template = EnemyTemplate::new("grub", 2).with_cards(vec![Arc::new(bite)]);
        let mut coordinator =
            TurnCoordinator::new(&state.config).with_spawner(RowSpawner::new(template));

        let mut counts = Vec::new();
        for _ in 0..4 {
            coordinator.request_end_turn();
            run_until(&mut coordinator, &mut state, TurnPhase::EnemyTurn);
            run_until(&mut coordinator, &mut state, TurnPhase::PlayerSimulation);
            counts.push(state.roster(Team::Enemy).len());
        }
        assert_eq!(counts, vec![0, 1, 1, 2]);
        assert_eq!(coordinator.turn().enemies_spawned, 2);
    }

    fn play_round(coordinator: &mut TurnCoordinator, state: &mut SessionState) {
        coordinator.request_end_turn();
        run_until(coordinator, state, TurnPhase::EnemyTurn);
        run_until(coordinator, state, TurnPhase::PlayerSimulation);
    }

    #[test]
    fn resumed_turn_continues_spawn_stream() {
        let config = GameConfig::new().with_enemy_spawn_interval(1).with_seed(9);
        let spawner = || {
            let bite = CardDefinition::new("bite", CardType::Attack, StepVector::new(1, 1), 1);
            RowSpawner::new(EnemyTemplate::new("grub", 2).with_cards(vec![Arc::new(bite)]))
        };
        let enemies = |state: &SessionState| {
            state
                .members(Team::Enemy)
                .map(|enemy| enemy.position())
                .collect::<Vec<_>>()
        };

        let mut straight_state = SessionState::new(GridIndex::rectangular(6, 4), config.clone());
        let mut straight = TurnCoordinator::new(&config).with_spawner(spawner());
        play_round(&mut straight, &mut straight_state);
        play_round(&mut straight, &mut straight_state);

        let mut state = SessionState::new(GridIndex::rectangular(6, 4), config.clone());
        let mut first = TurnCoordinator::new(&config).with_spawner(spawner());
        play_round(&mut first, &mut state);
        let mut second = TurnCoordinator::new(&config).with_spawner(spawner());
        second.resume(first.turn().clone());
        assert_eq!(second.turn().turn_number, 1);
        assert_eq!(second.turn().enemies_spawned, 1);
        play_round(&mut second, &mut state);

        assert_eq!(enemies(&state), enemies(&straight_state));
        assert_eq!(second.turn(), straight.turn());
    }

    #[test]
    fn resuming_a_live_turn_restarts_at_preview() {
        let state = state();
        let mut coordinator = TurnCoordinator::new(&state.config);
        let saved = TurnState {
            phase: TurnPhase::EnemyTurn,
            turn_timer: 1.5,
            turn_number: 4,
            ..TurnState::new(&state.config)
        };
        coordinator.resume(saved);
        assert_eq!(coordinator.phase(), TurnPhase::PlayerSimulation);
        assert_eq!(coordinator.turn().turn_number, 4);
        assert_eq!(coordinator.turn().turn_timer, 0.0);
    }

    #[test]
    fn fire_burns_at_team_start() {
        let mut state = state();
        let foe = state
            .spawn_character(CharacterSpec::new("foe", Team::Enemy, 5), Coord::new(1, 3))
            .unwrap();
        state.set_status(foe, StatusTag::Fire);

        let mut coordinator = TurnCoordinator::new(&state.config);
        coordinator.request_end_turn();
        let mut log: Vec<Effect> = Vec::new();
        while coordinator.tick(&mut state, 0.25, &mut log) != TurnPhase::EnemyTurn {}

        let foe_state = state.character(foe).unwrap();
        assert_eq!(foe_state.status, StatusTag::None);
        assert_eq!(foe_state.health.current, 4);
        assert!(log.contains(&Effect::Damage {
            target: foe,
            amount: 1,
            instigator: foe
        }));
    }

    #[test]
    fn queued_draws_resolve_over_ticks() {
        let mut state = state();
        let hero = state
            .spawn_character(CharacterSpec::new("hero", Team::Player, 5), Coord::new(1, 0))
            .unwrap();
        let study = CardDefinition::new("study", CardType::Attack, StepVector::new(1, 1), 0)
            .with_action(ActionStep::new(ActionKind::Draw).with_value(2));
        arm(&mut state, hero, vec![study]);
        let mut deck = Deck::new();
        for _ in 0..3 {
            let card = state.new_card(Arc::new(jab(0.5)));
            deck.push_draw_pile(card);
        }
        state.set_deck(hero, deck);

        let mut coordinator = TurnCoordinator::new(&state.config);
        coordinator.request_end_turn();
        let mut log: Vec<Effect> = Vec::new();
        for _ in 0..8 {
            coordinator.tick(&mut state, 0.25, &mut log);
        }

        let drawn = log
            .iter()
            .filter(|effect| matches!(effect, Effect::CardDrawn { .. }))
            .count();
        assert_eq!(drawn, 2);
        assert_eq!(state.deck(hero).unwrap().hand().len(), 2);
    }
}
