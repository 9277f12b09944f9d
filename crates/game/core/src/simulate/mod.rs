//! Card activation: from a slotted card to targets and applied effects.
//!
//! [`CardSimulator::preview`] computes where a card would act without
//! touching anything. [`CardSimulator::activate`] runs the full activation:
//! it consults the socket enhancement, walks the card's action sequence and
//! applies every effect to the session state, reporting each one to the sink
//! in application order.
mod effect;

use std::sync::Arc;

pub use effect::{Effect, EffectSink, NullSink, VisualAnchor};

use crate::card::{
    ActionKind, ActionStep, CardDefinition, CardId, CardPhase, CardType, ParticlePlacement,
    TargetRule,
};
use crate::circuit::CircuitBoard;
use crate::state::{Character, CharacterId, Coord, SessionState, StatusTag, Team, TimedAction};
use crate::targeting::{
    Footprint, MovementPath, Orientation, attack_footprint, movement_path, nearest,
};

/// Whether an activation commits to the real session or feeds a preview.
///
/// Both phases mutate the state they are given; previews run on a shadow
/// copy. Only live activations queue card draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimulationPhase {
    Preview,
    Live,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffGrant {
    pub kind: ActionKind,
    pub amount: u32,
}

/// Targets computed for one activation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardPlan {
    Attack(Footprint),
    Movement(MovementPath),
    Buff { grants: Vec<BuffGrant> },
}

impl CardPlan {
    /// Cells a preview should highlight.
    pub fn highlighted(&self) -> Vec<Coord> {
        match self {
            CardPlan::Attack(footprint) => footprint.cells.clone(),
            CardPlan::Movement(path) => vec![path.destination],
            CardPlan::Buff { .. } => Vec::new(),
        }
    }

    pub fn orientation(&self) -> Option<Orientation> {
        match self {
            CardPlan::Attack(footprint) => Some(footprint.orientation),
            CardPlan::Movement(path) => Some(path.orientation),
            CardPlan::Buff { .. } => None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, CardPlan::Movement(path) if path.is_blocked())
    }
}

/// What one activation did.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivationOutcome {
    pub card: CardId,
    pub plan: CardPlan,
    /// The action the socket enhancement resolved to.
    pub resolved: ActionKind,
    pub effects: Vec<Effect>,
    pub max_triggers_reached: bool,
}

pub struct CardSimulator<'a> {
    state: &'a mut SessionState,
}

struct Activation<'b> {
    actor: CharacterId,
    team: Team,
    definition: &'b CardDefinition,
    plan: &'b CardPlan,
    resolved: ActionKind,
    phase: SimulationPhase,
    socket: usize,
    board: &'b mut CircuitBoard,
    sink: &'b mut dyn EffectSink,
    effects: Vec<Effect>,
}

impl Activation<'_> {
    fn emit(&mut self, effect: Effect) {
        self.sink.emit(&effect);
        self.effects.push(effect);
    }
}

impl<'a> CardSimulator<'a> {
    pub fn new(state: &'a mut SessionState) -> Self {
        Self { state }
    }

    /// Targets `definition` would have if `actor` played it now.
    pub fn preview(&self, actor: CharacterId, definition: &CardDefinition) -> Option<CardPlan> {
        let character = self.state.character(actor)?;
        Some(plan_card(self.state, character, definition))
    }

    /// Activates the card in `board[socket]` for `actor`.
    ///
    /// Returns `None` when the socket is empty or the actor is gone.
    pub fn activate(
        &mut self,
        actor: CharacterId,
        board: &mut CircuitBoard,
        socket: usize,
        phase: SimulationPhase,
        sink: &mut dyn EffectSink,
    ) -> Option<ActivationOutcome> {
        let (card_id, definition) = {
            let card = board.card_mut(socket)?;
            card.phase = CardPhase::ComputingTargets;
            (card.id, Arc::clone(&card.definition))
        };
        let Some(character) = self.state.character(actor) else {
            tracing::debug!(actor = %actor, card = %card_id, "activation skipped, actor missing");
            return None;
        };
        let team = character.team;
        let plan = plan_card(self.state, character, &definition);

        let resolved = match definition.card_type {
            CardType::Buff => ActionKind::None,
            CardType::Attack | CardType::Movement => {
                board.consume_enhancement(socket, definition.primary_action())
            }
        };
        if let Some(card) = board.card_mut(socket) {
            card.triggers_used += 1;
            if resolved == ActionKind::Retrigger {
                card.triggers_granted += 1;
            }
            card.phase = CardPhase::EffectsQueued;
        }
        sink.plan_resolved(actor, card_id, &plan);

        let mut activation = Activation {
            actor,
            team,
            definition: &definition,
            plan: &plan,
            resolved,
            phase,
            socket,
            board: &mut *board,
            sink,
            effects: Vec::new(),
        };
        for step in definition.effective_actions() {
            self.run_step(&mut activation, &step);
        }
        let effects = activation.effects;

        let card = board.card_mut(socket)?;
        card.phase = CardPhase::Active;
        card.last_plan = Some(plan.clone());
        let max_triggers_reached = card.max_triggers_reached();
        tracing::debug!(
            actor = %actor,
            card = %card_id,
            definition = %definition.id,
            %resolved,
            %phase,
            effects = effects.len(),
            "card activated"
        );

        Some(ActivationOutcome {
            card: card_id,
            plan,
            resolved,
            effects,
            max_triggers_reached,
        })
    }

    fn run_step(&mut self, activation: &mut Activation<'_>, step: &ActionStep) {
        let amount = activation.definition.magnitude(step);
        match step.kind {
            ActionKind::None => {}
            ActionKind::Attack => self.attack(activation, amount),
            ActionKind::Heal => self.heal(activation, amount),
            ActionKind::Move => self.relocate(activation),
            ActionKind::Draw => self.draw(activation, amount),
            kind @ (ActionKind::Fire | ActionKind::Shock | ActionKind::Retrigger) => {
                if activation.definition.card_type == CardType::Buff {
                    grant(activation, kind, amount);
                } else if let Some(status) = kind.status() {
                    self.inflict(activation, kind, status);
                }
            }
        }
        spawn_particles(activation, step);
        for nested in &step.sequence {
            self.run_step(activation, nested);
        }
    }

    fn attack(&mut self, activation: &mut Activation<'_>, amount: u32) {
        let plan = activation.plan;
        let CardPlan::Attack(footprint) = plan else {
            return;
        };
        let element = activation.resolved.status();
        // Cell by cell: status, then damage, then a possible death.
        for &coord in &footprint.cells {
            if let Some(status) = element {
                self.state.grid.set_status(coord, status);
                activation.emit(Effect::SetCellStatus { coord, status });
            }
            let Some(target) = self.hostile_at(activation, coord) else {
                continue;
            };
            if let Some(status) = element {
                self.state.set_status(target, status);
                activation.emit(Effect::SetStatus {
                    character: target,
                    status,
                });
            }
            for effect in strike(self.state, target, amount, activation.actor) {
                activation.emit(effect);
            }
        }
    }

    fn inflict(&mut self, activation: &mut Activation<'_>, kind: ActionKind, status: StatusTag) {
        let plan = activation.plan;
        match plan {
            CardPlan::Attack(footprint) => {
                for &coord in &footprint.cells {
                    if let Some(target) = self.hostile_at(activation, coord) {
                        self.state.set_status(target, status);
                        activation.emit(Effect::SetStatus {
                            character: target,
                            status,
                        });
                    }
                }
            }
            CardPlan::Movement(_) | CardPlan::Buff { .. } => {
                let Some(coord) = self.state.character(activation.actor).map(Character::position)
                else {
                    return;
                };
                if let Some(surface) = kind.surface() {
                    self.state.grid.set_surface(coord, surface);
                    activation.emit(Effect::SetSurface { coord, surface });
                }
            }
        }
    }

    fn heal(&mut self, activation: &mut Activation<'_>, amount: u32) {
        let plan = activation.plan;
        let targets: Vec<CharacterId> = match plan {
            CardPlan::Attack(footprint) if activation.definition.target != TargetRule::Caster => {
                footprint
                    .cells
                    .iter()
                    .filter_map(|coord| self.state.grid.occupant(*coord))
                    .filter(|id| {
                        self.state
                            .character(*id)
                            .is_some_and(|character| character.team == activation.team)
                    })
                    .collect()
            }
            _ => vec![activation.actor],
        };
        for target in targets {
            self.state.apply_heal(target, amount);
            activation.emit(Effect::Heal {
                target,
                amount,
                instigator: activation.actor,
            });
        }
    }

    fn relocate(&mut self, activation: &mut Activation<'_>) {
        let plan = activation.plan;
        let CardPlan::Movement(path) = plan else {
            return;
        };
        let mut to = path.destination;
        if let Err(error) = self.state.move_character(activation.actor, to) {
            tracing::debug!(actor = %activation.actor, %error, "move refused");
            to = path.origin;
        }
        activation.emit(Effect::Move {
            character: activation.actor,
            from: path.origin,
            to,
            glide: activation.definition.max_time_in_use,
            blocked: path.is_blocked(),
        });
        if let Some(surface) = activation.resolved.surface() {
            self.state.grid.set_surface(to, surface);
            activation.emit(Effect::SetSurface { coord: to, surface });
        }
    }

    fn draw(&mut self, activation: &mut Activation<'_>, count: u32) {
        if count == 0 {
            return;
        }
        activation.emit(Effect::DrawCards {
            character: activation.actor,
            count,
        });
        if activation.phase == SimulationPhase::Live {
            let interval = self.state.config.draw_interval;
            for i in 0..count {
                self.state.timers.push(
                    i as f32 * interval,
                    TimedAction::DrawCard {
                        character: activation.actor,
                    },
                );
            }
        }
    }

    fn hostile_at(&self, activation: &Activation<'_>, coord: Coord) -> Option<CharacterId> {
        let occupant = self.state.grid.occupant(coord)?;
        let character = self.state.character(occupant)?;
        if occupant != activation.actor && activation.team.is_hostile_to(character.team) {
            Some(occupant)
        } else {
            None
        }
    }
}

fn grant(activation: &mut Activation<'_>, kind: ActionKind, amount: u32) {
    match activation.board.grant_after(activation.socket, kind, amount) {
        Some(target) => {
            tracing::debug!(actor = %activation.actor, socket = target, %kind, amount, "enhancement granted");
            activation.emit(Effect::GrantBuff {
                character: activation.actor,
                kind,
                amount,
            });
        }
        None => {
            tracing::debug!(actor = %activation.actor, socket = activation.socket, %kind, "buff fizzled, no next socket");
        }
    }
}

fn spawn_particles(activation: &mut Activation<'_>, step: &ActionStep) {
    let Some(visual) = step.particle else {
        return;
    };
    let orientation = activation
        .plan
        .orientation()
        .unwrap_or(Orientation::for_team(activation.team))
        .heading();
    let caster = VisualAnchor::Character(activation.actor);
    let cells = activation.plan.highlighted();

    let anchors = match activation.definition.particle_placement {
        ParticlePlacement::EachTarget if cells.is_empty() => match activation.plan {
            CardPlan::Buff { .. } => vec![caster],
            _ => Vec::new(),
        },
        ParticlePlacement::EachTarget => cells.into_iter().map(VisualAnchor::Cell).collect(),
        ParticlePlacement::Caster => vec![caster],
        ParticlePlacement::FirstTargetOnce => {
            let Some(card) = activation.board.card_mut(activation.socket) else {
                return;
            };
            if card.particle_spawned {
                return;
            }
            card.particle_spawned = true;
            vec![cells.first().map_or(caster, |cell| VisualAnchor::Cell(*cell))]
        }
    };
    for anchor in anchors {
        activation.emit(Effect::SpawnVisual {
            visual,
            anchor,
            orientation,
        });
    }
}

/// Deals damage and removes the target if it dies.
pub(crate) fn strike(
    state: &mut SessionState,
    target: CharacterId,
    amount: u32,
    instigator: CharacterId,
) -> Vec<Effect> {
    state.apply_damage(target, amount);
    let mut effects = vec![Effect::Damage {
        target,
        amount,
        instigator,
    }];
    if state.character(target).is_some_and(|character| !character.is_alive()) {
        if let Some(dead) = state.remove_character(target) {
            tracing::info!(character = %target, name = %dead.name, coord = %dead.position(), "character died");
            effects.push(Effect::Death {
                character: target,
                coord: dead.position(),
            });
        }
    }
    effects
}

fn plan_card(state: &SessionState, character: &Character, definition: &CardDefinition) -> CardPlan {
    let origin = character.position();
    match definition.card_type {
        CardType::Attack if definition.target == TargetRule::Caster => CardPlan::Attack(
            Footprint::caster(origin, Orientation::for_team(character.team)),
        ),
        CardType::Attack => {
            let orientation = aim(state, character, definition.target);
            CardPlan::Attack(attack_footprint(&state.grid, origin, definition.steps, orientation))
        }
        CardType::Movement => {
            let orientation = aim(state, character, definition.target);
            CardPlan::Movement(movement_path(&state.grid, origin, definition.steps, orientation))
        }
        CardType::Buff => {
            let mut grants = Vec::new();
            for step in &definition.actions {
                collect_grants(definition, step, &mut grants);
            }
            CardPlan::Buff { grants }
        }
    }
}

fn collect_grants(definition: &CardDefinition, step: &ActionStep, out: &mut Vec<BuffGrant>) {
    if step.kind.is_enhancement() {
        out.push(BuffGrant {
            kind: step.kind,
            amount: definition.magnitude(step),
        });
    }
    for nested in &step.sequence {
        collect_grants(definition, nested, out);
    }
}

/// Frame a card acts in, re-aimed at the nearest target for auto rules.
fn aim(state: &SessionState, character: &Character, rule: TargetRule) -> Orientation {
    let base = Orientation::for_team(character.team);
    let origin = character.position();
    let target = match rule {
        TargetRule::Forward | TargetRule::Caster => return base,
        TargetRule::Backward => return base.mirrored(),
        TargetRule::NearestEnemy => nearest(
            origin,
            character
                .team
                .opponents()
                .iter()
                .flat_map(|team| state.members(*team)),
        ),
        TargetRule::NearestAlly => nearest(
            origin,
            state
                .members(character.team)
                .filter(|member| member.id != character.id),
        ),
    };
    match target {
        Some(target) => base.toward(origin, target.position()),
        None => {
            tracing::debug!(actor = %character.id, ?rule, "no target found, keeping facing");
            base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardDefinition, StepVector, VisualKind};
    use crate::config::GameConfig;
    use crate::state::{CharacterSpec, GridIndex, SurfaceEffect};

    struct Fixture {
        state: SessionState,
        hero: CharacterId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut state = SessionState::new(GridIndex::rectangular(3, 3), GameConfig::default());
            let hero = state
                .spawn_character(CharacterSpec::new("hero", Team::Player, 10), Coord::new(0, 0))
                .unwrap();
            Self { state, hero }
        }

        fn spawn(&mut self, team: Team, health: u32, at: Coord) -> CharacterId {
            self.state
                .spawn_character(CharacterSpec::new("npc", team, health), at)
                .unwrap()
        }

        fn board(&mut self, defs: Vec<CardDefinition>, sockets: usize) -> CircuitBoard {
            let mut board = CircuitBoard::with_sockets(sockets);
            for (socket, def) in defs.into_iter().enumerate() {
                let card = self.state.new_card(Arc::new(def));
                board.insert(socket, card).unwrap();
            }
            board
        }

        fn activate(
            &mut self,
            board: &mut CircuitBoard,
            socket: usize,
            phase: SimulationPhase,
        ) -> ActivationOutcome {
            let mut sink: Vec<Effect> = Vec::new();
            let outcome = CardSimulator::new(&mut self.state)
                .activate(self.hero, board, socket, phase, &mut sink)
                .unwrap();
            assert_eq!(sink, outcome.effects);
            outcome
        }
    }

    fn jab(value: i32) -> CardDefinition {
        CardDefinition::new("jab", CardType::Attack, StepVector::new(1, 1), value)
    }

    fn damage_to(effects: &[Effect], who: CharacterId) -> Vec<u32> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Damage { target, amount, .. } if *target == who => Some(*amount),
                _ => None,
            })
            .collect()
    }

    fn fire_status_on(effects: &[Effect], who: CharacterId) -> bool {
        effects.iter().any(|effect| {
            matches!(effect, Effect::SetStatus { character, status: StatusTag::Fire } if *character == who)
        })
    }

    #[test]
    fn forward_jab_hits_enemy_in_front() {
        let mut fx = Fixture::new();
        let foe = fx.spawn(Team::Enemy, 10, Coord::new(0, 1));
        let mut board = fx.board(vec![jab(3)], 1);

        let outcome = fx.activate(&mut board, 0, SimulationPhase::Live);
        let CardPlan::Attack(footprint) = &outcome.plan else {
            panic!("expected attack plan");
        };
        assert_eq!(footprint.cells, vec![Coord::new(0, 1)]);
        assert_eq!(
            outcome.effects,
            vec![Effect::Damage {
                target: foe,
                amount: 3,
                instigator: fx.hero
            }]
        );
        assert_eq!(fx.state.character(foe).unwrap().health.current, 7);
        assert_eq!(board.card(0).unwrap().phase, CardPhase::Active);
    }

    #[test]
    fn allies_are_never_damaged() {
        let mut fx = Fixture::new();
        let ally = fx.spawn(Team::Player, 10, Coord::new(0, 1));
        let mut board = fx.board(
            vec![CardDefinition::new("sweep", CardType::Attack, StepVector::new(3, 2), 4)],
            1,
        );
        board.socket_mut(0).unwrap().enhancement.apply(ActionKind::Fire, 1);

        let outcome = fx.activate(&mut board, 0, SimulationPhase::Live);
        assert!(damage_to(&outcome.effects, ally).is_empty());
        assert!(!fire_status_on(&outcome.effects, ally));
        assert_eq!(fx.state.character(ally).unwrap().health.current, 10);
        // The cell itself still burns.
        assert_eq!(
            fx.state.grid.get(Coord::new(0, 1)).unwrap().status,
            StatusTag::Fire
        );
    }

    #[test]
    fn later_sockets_draw_on_a_board_fire_charge() {
        let mut fx = Fixture::new();
        let foe = fx.spawn(Team::Enemy, 30, Coord::new(0, 1));
        let mut board = fx.board(vec![jab(1), jab(2), jab(3)], 3);
        board.socket_mut(0).unwrap().enhancement.apply(ActionKind::Fire, 2);

        let mut statuses = Vec::new();
        let mut charges = Vec::new();
        for socket in 0..3 {
            let outcome = fx.activate(&mut board, socket, SimulationPhase::Live);
            statuses.push(fire_status_on(&outcome.effects, foe));
            charges.push(board.socket(0).unwrap().enhancement.charges());
        }

        assert_eq!(statuses, vec![true, true, false]);
        assert_eq!(charges, vec![1, 0, 0]);
        assert!(board.enhancements().iter().all(|enhancement| enhancement.is_empty()));
    }

    #[test]
    fn blocked_movement_still_counts() {
        let mut fx = Fixture::new();
        fx.spawn(Team::Enemy, 5, Coord::new(0, 1));
        let mut board = fx.board(
            vec![CardDefinition::new("dash", CardType::Movement, StepVector::new(0, 2), 0)],
            1,
        );

        let outcome = fx.activate(&mut board, 0, SimulationPhase::Live);
        assert!(outcome.plan.is_blocked());
        assert_eq!(
            outcome.effects[0],
            Effect::Move {
                character: fx.hero,
                from: Coord::new(0, 0),
                to: Coord::new(0, 0),
                glide: 0.5,
                blocked: true
            }
        );
        assert_eq!(fx.state.character(fx.hero).unwrap().position(), Coord::new(0, 0));
        assert_eq!(board.card(0).unwrap().triggers_used, 1);
    }

    #[test]
    fn shocked_movement_electrifies_destination() {
        let mut fx = Fixture::new();
        let mut board = fx.board(
            vec![CardDefinition::new("step", CardType::Movement, StepVector::new(1, 1), 0)],
            1,
        );
        board.socket_mut(0).unwrap().enhancement.apply(ActionKind::Shock, 1);

        fx.activate(&mut board, 0, SimulationPhase::Live);
        let cell = fx.state.grid.get(Coord::new(1, 1)).unwrap();
        assert_eq!(cell.occupant, Some(fx.hero));
        assert_eq!(cell.surface, SurfaceEffect::Electrified);
    }

    #[test]
    fn nearest_enemy_rotates_footprint() {
        let mut fx = Fixture::new();
        let foe = fx.spawn(Team::Enemy, 10, Coord::new(2, 0));
        let mut board = fx.board(
            vec![CardDefinition::new("lance", CardType::Attack, StepVector::new(1, 2), 2)
                .with_target(TargetRule::NearestEnemy)],
            1,
        );

        let outcome = fx.activate(&mut board, 0, SimulationPhase::Live);
        assert_eq!(outcome.plan.highlighted(), vec![Coord::new(1, 0), Coord::new(2, 0)]);
        assert_eq!(damage_to(&outcome.effects, foe), vec![2]);
    }

    #[test]
    fn lethal_damage_leaves_corpse() {
        let mut fx = Fixture::new();
        let foe = fx.spawn(Team::Enemy, 2, Coord::new(0, 1));
        let mut board = fx.board(vec![jab(3)], 1);

        let outcome = fx.activate(&mut board, 0, SimulationPhase::Live);
        assert!(outcome.effects.contains(&Effect::Death {
            character: foe,
            coord: Coord::new(0, 1)
        }));
        assert!(fx.state.character(foe).is_none());
        assert!(fx.state.roster(Team::Enemy).is_empty());
        assert!(fx.state.grid.get(Coord::new(0, 1)).unwrap().corpse);
    }

    #[test]
    fn buff_grants_next_socket_or_fizzles() {
        let mut fx = Fixture::new();
        let kindle = CardDefinition::new("kindle", CardType::Buff, StepVector::default(), 2)
            .with_action(ActionStep::new(ActionKind::Fire));
        let mut board = fx.board(vec![kindle.clone(), kindle], 2);

        let first = fx.activate(&mut board, 0, SimulationPhase::Live);
        assert_eq!(
            first.effects,
            vec![Effect::GrantBuff {
                character: fx.hero,
                kind: ActionKind::Fire,
                amount: 2
            }]
        );
        assert_eq!(board.socket(1).unwrap().enhancement.charges(), 2);

        let last = fx.activate(&mut board, 1, SimulationPhase::Live);
        assert!(last.effects.is_empty());
        assert_eq!(last.resolved, ActionKind::None);
    }

    #[test]
    fn draws_are_queued_only_when_live() {
        let mut fx = Fixture::new();
        let study = jab(1).with_action(ActionStep::new(ActionKind::Draw).with_value(2));
        let mut board = fx.board(vec![study], 1);

        let preview = fx.activate(&mut board, 0, SimulationPhase::Preview);
        assert!(preview.effects.contains(&Effect::DrawCards {
            character: fx.hero,
            count: 2
        }));
        assert!(fx.state.timers.is_empty());

        fx.activate(&mut board, 0, SimulationPhase::Live);
        assert_eq!(fx.state.timers.len(), 2);
    }

    #[test]
    fn first_target_particle_spawns_once() {
        let mut fx = Fixture::new();
        let flare = CardDefinition::new("flare", CardType::Attack, StepVector::new(3, 1), 1)
            .with_action(ActionStep::new(ActionKind::Attack).with_particle(VisualKind::Spark))
            .with_particle_placement(ParticlePlacement::FirstTargetOnce);
        let mut board = fx.board(vec![flare], 1);

        let count = |effects: &[Effect]| {
            effects
                .iter()
                .filter(|effect| matches!(effect, Effect::SpawnVisual { .. }))
                .count()
        };
        let first = fx.activate(&mut board, 0, SimulationPhase::Live);
        let second = fx.activate(&mut board, 0, SimulationPhase::Live);
        assert_eq!(count(&first.effects), 1);
        assert_eq!(count(&second.effects), 0);
    }

    #[test]
    fn preview_leaves_state_untouched() {
        let mut fx = Fixture::new();
        fx.spawn(Team::Enemy, 1, Coord::new(0, 1));
        let before = fx.state.clone();

        let simulator = CardSimulator::new(&mut fx.state);
        let plan = simulator.preview(fx.hero, &jab(9)).unwrap();
        assert_eq!(plan.highlighted(), vec![Coord::new(0, 1)]);
        assert_eq!(fx.state, before);
    }

    #[test]
    fn retrigger_enhancement_grants_extra_trigger() {
        let mut fx = Fixture::new();
        let mut board = fx.board(vec![jab(1)], 1);
        board.socket_mut(0).unwrap().enhancement.apply(ActionKind::Retrigger, 1);

        let first = fx.activate(&mut board, 0, SimulationPhase::Live);
        assert_eq!(first.resolved, ActionKind::Retrigger);
        assert!(!first.max_triggers_reached);
        let second = fx.activate(&mut board, 0, SimulationPhase::Live);
        assert_eq!(second.resolved, ActionKind::None);
        assert!(second.max_triggers_reached);
    }
}
