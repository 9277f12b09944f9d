//! Circuit boards: sockets, their enhancements and the per-character
//! processor that plays them in order.
mod board;
mod processor;
mod socket;

pub use board::{CircuitBoard, CircuitError};
pub use processor::{CardSource, CircuitProcessor};
pub use socket::{Socket, SocketEnhancement};
