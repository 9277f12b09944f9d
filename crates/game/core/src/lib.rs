//! Deterministic turn resolution for the circuit-board tactics game.
//!
//! `circuit-core` defines the canonical rules: the grid index, card geometry,
//! socket enhancements, per-character circuit sequencing and the turn
//! coordinator. Everything advances through explicit `tick(dt)` calls and
//! reports effects to an [`EffectSink`]; rendering, audio and persistence
//! formats live outside this crate.
pub mod card;
pub mod circuit;
pub mod config;
pub mod engine;
pub mod error;
pub mod rng;
pub mod simulate;
pub mod state;
pub mod targeting;

pub use card::{
    ActionKind, ActionStep, Card, CardDefinition, CardDefinitionError, CardId, CardPhase,
    CardType, CardZone, Deck, ParticlePlacement, StepVector, TargetRule, VisualKind,
};
pub use circuit::{
    CardSource, CircuitBoard, CircuitError, CircuitProcessor, Socket, SocketEnhancement,
};
pub use config::GameConfig;
pub use engine::{
    EnemySpawner, EnemyTemplate, PlannedCard, PreviewReport, PreviewSession, RowSpawner,
    TurnCoordinator, TurnPhase, TurnState,
};
pub use error::{ErrorSeverity, GameError};
pub use simulate::{
    ActivationOutcome, BuffGrant, CardPlan, CardSimulator, Effect, EffectSink, NullSink,
    SimulationPhase, VisualAnchor,
};
pub use state::{
    BrainType, CardRecord, Character, CharacterId, CharacterSpec, Coord, GridCell, GridIndex,
    ResourceMeter, SessionError, SessionSnapshot, SessionState, SocketRecord, StatusTag,
    SurfaceEffect, Team, TimedAction, TimedQueue,
};
pub use targeting::{
    Direction, Footprint, MoveStep, MovementPath, Orientation, StepAxis, attack_footprint,
    movement_path, nearest,
};
