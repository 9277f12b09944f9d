//! Session orchestration for the circuit tactics core.
//!
//! The runtime owns a [`SessionState`](circuit_core::SessionState), the
//! [`TurnCoordinator`](circuit_core::TurnCoordinator) that drives it and the
//! loaded content. Hosts call [`Session::tick`] once per frame and read back
//! the recorded [`GameEvent`]s.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the orchestrator and its builder
//! - [`events`] records effects and phase changes for presentation layers
//! - [`repository`] persists session snapshots
//! - [`telemetry`] installs the tracing subscriber
pub mod error;
pub mod events;
pub mod repository;
pub mod session;
pub mod telemetry;

pub use error::{Result, RuntimeError};
pub use events::{EventRecorder, GameEvent};
pub use repository::SnapshotRepository;
pub use session::{RuntimeConfig, Session, SessionBuilder};
pub use telemetry::init_tracing;
