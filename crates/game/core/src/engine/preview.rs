//! Non-committing simulation passes.
//!
//! A [`PreviewSession`] clones the session into a shadow copy and plays every
//! queued circuit there through listener processors. Nothing reaches the
//! real state or sink; effects land in a [`PreviewReport`] instead.

use std::collections::BTreeSet;

use crate::card::CardId;
use crate::circuit::CircuitProcessor;
use crate::simulate::{CardPlan, Effect, EffectSink, SimulationPhase};
use crate::state::{BrainType, CharacterId, Coord, SessionState, Team};

use super::tick_statuses;

/// One previewed activation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedCard {
    pub character: CharacterId,
    pub card: CardId,
    pub cells: Vec<Coord>,
    pub blocked: bool,
}

/// Everything a preview pass would have done.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreviewReport {
    pub plans: Vec<PlannedCard>,
    pub effects: Vec<Effect>,
    /// Where every surviving character ends up.
    pub positions: Vec<(CharacterId, Coord)>,
}

impl PreviewReport {
    pub fn highlighted_cells(&self) -> BTreeSet<Coord> {
        self.plans
            .iter()
            .flat_map(|plan| plan.cells.iter().copied())
            .collect()
    }

    pub fn position_of(&self, character: CharacterId) -> Option<Coord> {
        self.positions
            .iter()
            .find(|(id, _)| *id == character)
            .map(|(_, coord)| *coord)
    }

    pub fn casualties(&self) -> Vec<CharacterId> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Death { character, .. } => Some(*character),
                _ => None,
            })
            .collect()
    }

    pub fn damage_to(&self, character: CharacterId) -> u32 {
        self.effects
            .iter()
            .map(|effect| match effect {
                Effect::Damage { target, amount, .. } if *target == character => *amount,
                _ => 0,
            })
            .sum()
    }
}

impl EffectSink for PreviewReport {
    fn plan_resolved(&mut self, actor: CharacterId, card: CardId, plan: &CardPlan) {
        self.plans.push(PlannedCard {
            character: actor,
            card,
            cells: plan.highlighted(),
            blocked: plan.is_blocked(),
        });
    }

    fn emit(&mut self, effect: &Effect) {
        self.effects.push(effect.clone());
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PreviewSession {
    shadow: SessionState,
    processors: Vec<CircuitProcessor>,
    report: PreviewReport,
    team: Team,
}

impl PreviewSession {
    /// Clones `state` and starts previewing the player team.
    pub fn start(state: &SessionState) -> Self {
        let mut shadow = state.clone();
        shadow.timers.clear();
        let mut session = Self {
            shadow,
            processors: Vec::new(),
            report: PreviewReport::default(),
            team: Team::Player,
        };
        session.begin(Team::Player);
        session
    }

    /// Starts `team`'s pass on the shadow state.
    pub fn begin(&mut self, team: Team) {
        self.team = team;
        tick_statuses(&mut self.shadow, team, &mut self.report);
        let members: Vec<(CharacterId, BrainType)> = self
            .shadow
            .members(team)
            .map(|character| (character.id, character.brain))
            .collect();
        self.processors = members
            .into_iter()
            .map(|(id, brain)| {
                let leader = match brain {
                    BrainType::Independent => id,
                    BrainType::Listener { leader } => leader,
                };
                let mut processor = CircuitProcessor::listener(id, leader);
                processor.reset(&mut self.shadow);
                processor
            })
            .collect();
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn shadow(&self) -> &SessionState {
        &self.shadow
    }

    /// Ticks every listener; true while any is still busy.
    pub fn tick(&mut self, dt: f32) -> bool {
        let mut busy = false;
        for processor in &mut self.processors {
            busy |= processor.tick(dt, &mut self.shadow, SimulationPhase::Preview, &mut self.report);
        }
        busy
    }

    pub fn finish(self) -> PreviewReport {
        let mut report = self.report;
        report.positions = self
            .shadow
            .characters()
            .map(|character| (character.id, character.position()))
            .collect();
        report
    }
}
