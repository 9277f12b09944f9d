//! Immutable card data.
//!
//! A [`CardDefinition`] is authored content: it is validated once when the
//! catalog is loaded and shared between card instances through an `Arc`.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{StatusTag, SurfaceEffect};

/// Deepest nesting allowed for action sub-sequences.
pub const MAX_ACTION_DEPTH: usize = 4;

/// What the card does to the grid when it activates.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardType {
    Movement,
    Attack,
    Buff,
}

/// How the card picks the direction (or cell) it acts on.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetRule {
    /// The caster's own cell.
    Caster,
    Forward,
    Backward,
    NearestAlly,
    NearestEnemy,
}

impl TargetRule {
    pub fn is_auto_target(self) -> bool {
        matches!(self, TargetRule::NearestAlly | TargetRule::NearestEnemy)
    }
}

/// Kind of a single action; also the currency of socket enhancements.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    /// No-op; what an exhausted enhancement resolves to.
    #[default]
    None,
    Attack,
    Heal,
    Move,
    Draw,
    Fire,
    Shock,
    Retrigger,
}

impl ActionKind {
    pub const fn is_element(self) -> bool {
        matches!(self, ActionKind::Fire | ActionKind::Shock)
    }

    /// Kinds a buff card can store in a socket.
    pub const fn is_enhancement(self) -> bool {
        matches!(
            self,
            ActionKind::Fire | ActionKind::Shock | ActionKind::Retrigger
        )
    }

    pub const fn status(self) -> Option<StatusTag> {
        match self {
            ActionKind::Fire => Some(StatusTag::Fire),
            ActionKind::Shock => Some(StatusTag::Shocked),
            _ => None,
        }
    }

    pub const fn surface(self) -> Option<SurfaceEffect> {
        match self {
            ActionKind::Fire => Some(SurfaceEffect::Burning),
            ActionKind::Shock => Some(SurfaceEffect::Electrified),
            _ => None,
        }
    }
}

/// Presentation-side particle identifier passed through to the sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VisualKind {
    Hit,
    Burn,
    Spark,
    Heal,
    Buff,
    Dust,
    Custom(u16),
}

/// Where a step's particle is spawned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParticlePlacement {
    /// One particle per footprint cell.
    #[default]
    EachTarget,
    /// One particle on the caster.
    Caster,
    /// One particle on the first footprint cell, once per turn pass.
    FirstTargetOnce,
}

/// Step vector in the caster's frame: `x` is lateral width, `y` forward depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepVector {
    pub x: i32,
    pub y: i32,
}

impl StepVector {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One entry of a card's action sequence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionStep {
    pub kind: ActionKind,
    /// Magnitude override; falls back to the card's `value`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub particle: Option<VisualKind>,
    /// Runs after this step, depth first.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sequence: Vec<ActionStep>,
}

impl ActionStep {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            value: None,
            particle: None,
            sequence: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: i32) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_particle(mut self, particle: VisualKind) -> Self {
        self.particle = Some(particle);
        self
    }

    pub fn then(mut self, step: ActionStep) -> Self {
        self.sequence.push(step);
        self
    }

    fn depth(&self) -> usize {
        1 + self.sequence.iter().map(ActionStep::depth).max().unwrap_or(0)
    }

    fn visit<'a>(&'a self, out: &mut Vec<&'a ActionStep>) {
        out.push(self);
        for step in &self.sequence {
            step.visit(out);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardDefinition {
    pub id: String,
    pub name: String,
    pub card_type: CardType,
    /// Movement delta or attack footprint, depending on `card_type`.
    pub steps: StepVector,
    pub value: i32,
    /// Seconds the card stays active once triggered.
    pub max_time_in_use: f32,
    pub target: TargetRule,
    #[cfg_attr(feature = "serde", serde(default))]
    pub actions: Vec<ActionStep>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub particle_placement: ParticlePlacement,
}

impl CardDefinition {
    pub fn new(id: impl Into<String>, card_type: CardType, steps: StepVector, value: i32) -> Self {
        let target = match card_type {
            CardType::Buff => TargetRule::Caster,
            CardType::Movement | CardType::Attack => TargetRule::Forward,
        };
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            card_type,
            steps,
            value,
            max_time_in_use: 0.5,
            target,
            actions: Vec::new(),
            particle_placement: ParticlePlacement::default(),
        }
    }

    pub fn with_target(mut self, target: TargetRule) -> Self {
        self.target = target;
        self
    }

    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.max_time_in_use = seconds;
        self
    }

    pub fn with_action(mut self, step: ActionStep) -> Self {
        self.actions.push(step);
        self
    }

    pub fn with_particle_placement(mut self, placement: ParticlePlacement) -> Self {
        self.particle_placement = placement;
        self
    }

    /// The action sequence, or the single step implied by the card type when
    /// none was authored.
    pub fn effective_actions(&self) -> Vec<ActionStep> {
        if !self.actions.is_empty() {
            return self.actions.clone();
        }
        match self.card_type {
            CardType::Attack => vec![ActionStep::new(ActionKind::Attack)],
            CardType::Movement => vec![ActionStep::new(ActionKind::Move)],
            CardType::Buff => Vec::new(),
        }
    }

    /// The action requested from the socket enhancement on activation.
    pub fn primary_action(&self) -> ActionKind {
        self.effective_actions()
            .first()
            .map(|step| step.kind)
            .unwrap_or_default()
    }

    /// Magnitude of a step, falling back to the card value. Never negative.
    pub fn magnitude(&self, step: &ActionStep) -> u32 {
        step.value.unwrap_or(self.value).max(0) as u32
    }

    /// Checks the data invariants the simulation relies on.
    pub fn validate(&self) -> Result<(), CardDefinitionError> {
        if self.id.trim().is_empty() {
            return Err(CardDefinitionError::MissingId);
        }
        let id = || self.id.clone();

        if self.card_type == CardType::Attack && (self.steps.x < 0 || self.steps.y < 0) {
            return Err(CardDefinitionError::NegativeAttackSteps {
                id: id(),
                x: self.steps.x,
                y: self.steps.y,
            });
        }
        if !self.max_time_in_use.is_finite() || self.max_time_in_use < 0.0 {
            return Err(CardDefinitionError::InvalidDuration { id: id() });
        }
        if self.value < 0 {
            return Err(CardDefinitionError::NegativeValue {
                id: id(),
                value: self.value,
            });
        }

        let depth = self.actions.iter().map(ActionStep::depth).max().unwrap_or(0);
        if depth > MAX_ACTION_DEPTH {
            return Err(CardDefinitionError::SequenceTooDeep { id: id(), depth });
        }

        let mut steps = Vec::new();
        for step in &self.actions {
            step.visit(&mut steps);
        }
        for step in steps {
            if let Some(value) = step.value.filter(|value| *value < 0) {
                return Err(CardDefinitionError::NegativeValue { id: id(), value });
            }
            let allowed = match self.card_type {
                CardType::Buff => step.kind != ActionKind::Attack && step.kind != ActionKind::Move,
                CardType::Attack | CardType::Movement => step.kind != ActionKind::Retrigger,
            };
            if !allowed {
                return Err(CardDefinitionError::ActionNotAllowed {
                    id: id(),
                    card_type: self.card_type,
                    kind: step.kind,
                });
            }
        }

        if self.card_type == CardType::Buff
            && !self.actions.iter().any(|step| step.kind.is_enhancement())
        {
            return Err(CardDefinitionError::BuffWithoutEnhancement { id: id() });
        }

        Ok(())
    }
}

/// Malformed card data. Always fatal: such a card must not enter the catalog.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CardDefinitionError {
    #[error("card definition has an empty id")]
    MissingId,

    #[error("card '{id}' has negative attack steps ({x}, {y})")]
    NegativeAttackSteps { id: String, x: i32, y: i32 },

    #[error("card '{id}' has a negative or non-finite duration")]
    InvalidDuration { id: String },

    #[error("card '{id}' has negative value {value}")]
    NegativeValue { id: String, value: i32 },

    #[error("card '{id}' nests actions {depth} deep")]
    SequenceTooDeep { id: String, depth: usize },

    #[error("card '{id}' of type {card_type} cannot run {kind} actions")]
    ActionNotAllowed {
        id: String,
        card_type: CardType,
        kind: ActionKind,
    },

    #[error("buff card '{id}' grants no enhancement")]
    BuffWithoutEnhancement { id: String },
}

impl GameError for CardDefinitionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingId => "CARD_MISSING_ID",
            Self::NegativeAttackSteps { .. } => "CARD_NEGATIVE_STEPS",
            Self::InvalidDuration { .. } => "CARD_INVALID_DURATION",
            Self::NegativeValue { .. } => "CARD_NEGATIVE_VALUE",
            Self::SequenceTooDeep { .. } => "CARD_SEQUENCE_TOO_DEEP",
            Self::ActionNotAllowed { .. } => "CARD_ACTION_NOT_ALLOWED",
            Self::BuffWithoutEnhancement { .. } => "CARD_BUFF_WITHOUT_ENHANCEMENT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_without_actions_defaults_to_attack_step() {
        let card = CardDefinition::new("jab", CardType::Attack, StepVector::new(1, 1), 3);
        assert_eq!(card.primary_action(), ActionKind::Attack);
        assert!(card.validate().is_ok());
    }

    #[test]
    fn negative_attack_steps_are_fatal() {
        let card = CardDefinition::new("bad", CardType::Attack, StepVector::new(-1, 2), 3);
        let err = card.validate().unwrap_err();
        assert!(matches!(err, CardDefinitionError::NegativeAttackSteps { .. }));
        assert!(err.severity().is_fatal());
    }

    #[test]
    fn movement_may_step_backwards() {
        let card = CardDefinition::new("retreat", CardType::Movement, StepVector::new(0, -2), 0);
        assert!(card.validate().is_ok());
    }

    #[test]
    fn buff_needs_an_enhancement_step() {
        let empty = CardDefinition::new("dud", CardType::Buff, StepVector::default(), 2);
        assert!(matches!(
            empty.validate(),
            Err(CardDefinitionError::BuffWithoutEnhancement { .. })
        ));

        let kindle = empty.with_action(ActionStep::new(ActionKind::Fire));
        assert!(kindle.validate().is_ok());
    }

    #[test]
    fn retrigger_steps_only_on_buffs() {
        let card = CardDefinition::new("loop", CardType::Attack, StepVector::new(1, 1), 1)
            .with_action(ActionStep::new(ActionKind::Attack).then(ActionStep::new(ActionKind::Retrigger)));
        assert!(matches!(
            card.validate(),
            Err(CardDefinitionError::ActionNotAllowed { kind: ActionKind::Retrigger, .. })
        ));
    }

    #[test]
    fn rejects_non_finite_duration() {
        let card = CardDefinition::new("slow", CardType::Attack, StepVector::new(1, 1), 1)
            .with_duration(f32::INFINITY);
        assert!(matches!(
            card.validate(),
            Err(CardDefinitionError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn step_value_overrides_card_value() {
        let card = CardDefinition::new("combo", CardType::Attack, StepVector::new(1, 1), 3);
        assert_eq!(card.magnitude(&ActionStep::new(ActionKind::Attack)), 3);
        assert_eq!(
            card.magnitude(&ActionStep::new(ActionKind::Attack).with_value(5)),
            5
        );
    }
}
