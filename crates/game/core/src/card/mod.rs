//! Card definitions, instances and decks.
mod deck;
mod definition;
mod instance;

pub use deck::Deck;
pub use definition::{
    ActionKind, ActionStep, CardDefinition, CardDefinitionError, CardType, MAX_ACTION_DEPTH,
    ParticlePlacement, StepVector, TargetRule, VisualKind,
};
pub use instance::{Card, CardId, CardPhase, CardZone};
