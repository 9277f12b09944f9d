use arrayvec::ArrayVec;

use crate::card::{ActionKind, Card, CardId, CardZone};
use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};

use super::{Socket, SocketEnhancement};

type Sockets = ArrayVec<Socket, { GameConfig::MAX_SOCKETS }>;

/// Ordered sockets of one character. Socket order is play order.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CircuitBoard {
    sockets: Sockets,
}

impl CircuitBoard {
    /// Creates a board with `count` empty sockets (capped at `MAX_SOCKETS`).
    pub fn with_sockets(count: usize) -> Self {
        let mut sockets = Sockets::new();
        for _ in 0..count.min(GameConfig::MAX_SOCKETS) {
            sockets.push(Socket::default());
        }
        Self { sockets }
    }

    pub fn add_socket(&mut self) -> Result<usize, CircuitError> {
        self.sockets
            .try_push(Socket::default())
            .map_err(|_| CircuitError::BoardFull)?;
        Ok(self.sockets.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.sockets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sockets.is_empty()
    }

    pub fn socket(&self, index: usize) -> Option<&Socket> {
        self.sockets.get(index)
    }

    pub fn socket_mut(&mut self, index: usize) -> Option<&mut Socket> {
        self.sockets.get_mut(index)
    }

    pub fn sockets(&self) -> &[Socket] {
        &self.sockets
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.socket(index)?.card.as_ref()
    }

    pub fn card_mut(&mut self, index: usize) -> Option<&mut Card> {
        self.socket_mut(index)?.card.as_mut()
    }

    /// Slots a card into an empty socket.
    pub fn insert(&mut self, index: usize, mut card: Card) -> Result<(), CircuitError> {
        let len = self.sockets.len();
        let socket = self
            .sockets
            .get_mut(index)
            .ok_or(CircuitError::SocketOutOfRange { index, len })?;
        if let Some(existing) = &socket.card {
            return Err(CircuitError::SocketOccupied {
                index,
                card: existing.id,
            });
        }
        card.zone = CardZone::Socket;
        card.deactivate();
        socket.card = Some(card);
        Ok(())
    }

    /// Removes the card from a socket, leaving the enhancement in place.
    pub fn take(&mut self, index: usize) -> Option<Card> {
        self.sockets.get_mut(index)?.card.take()
    }

    /// Exchanges the cards of two sockets; enhancements stay with the sockets.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), CircuitError> {
        let len = self.sockets.len();
        for index in [a, b] {
            if index >= len {
                return Err(CircuitError::SocketOutOfRange { index, len });
            }
        }
        if a != b {
            let card_a = self.sockets[a].card.take();
            let card_b = std::mem::replace(&mut self.sockets[b].card, card_a);
            self.sockets[a].card = card_b;
        }
        Ok(())
    }

    /// Socket indices holding a card, in play order.
    pub fn active_sockets(&self) -> Vec<usize> {
        self.sockets
            .iter()
            .enumerate()
            .filter(|(_, socket)| socket.is_filled())
            .map(|(index, _)| index)
            .collect()
    }

    /// Grants an enhancement to the socket after `source`.
    ///
    /// Returns the socket that received it, or `None` when `source` is the
    /// last socket.
    pub fn grant_after(&mut self, source: usize, kind: ActionKind, amount: u32) -> Option<usize> {
        let target = source + 1;
        let socket = self.sockets.get_mut(target)?;
        socket.enhancement.apply(kind, amount);
        Some(target)
    }

    /// Resolves the enhancement an activation in `socket` receives.
    ///
    /// The socket's own enhancement is consulted first. Otherwise the first
    /// socket on the board holding an elemental charge lends it. Retrigger
    /// charges only ever serve their own socket.
    pub fn consume_enhancement(&mut self, socket: usize, requested: ActionKind) -> ActionKind {
        let own = self
            .sockets
            .get(socket)
            .is_some_and(|slot| !slot.enhancement.is_empty());
        let lender = if own {
            Some(socket)
        } else {
            self.sockets
                .iter()
                .position(|slot| slot.enhancement.kind().is_element())
        };
        lender
            .and_then(|index| self.sockets.get_mut(index))
            .map(|slot| slot.enhancement.consume(requested))
            .unwrap_or_default()
    }

    pub fn enhancements(&self) -> Vec<SocketEnhancement> {
        self.sockets.iter().map(|socket| socket.enhancement).collect()
    }

    pub fn find_card(&self, id: CardId) -> Option<usize> {
        self.sockets
            .iter()
            .position(|socket| socket.card.as_ref().is_some_and(|card| card.id == id))
    }

    /// Deactivates every slotted card.
    pub fn reset_cards(&mut self) {
        for socket in &mut self.sockets {
            if let Some(card) = &mut socket.card {
                card.deactivate();
            }
        }
    }
}

/// Errors raised while editing a circuit board.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CircuitError {
    #[error("socket {index} out of range (board has {len})")]
    SocketOutOfRange { index: usize, len: usize },

    #[error("socket {index} already holds {card}")]
    SocketOccupied { index: usize, card: CardId },

    #[error("circuit board already has the maximum number of sockets")]
    BoardFull,
}

impl GameError for CircuitError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SocketOutOfRange { .. } => ErrorSeverity::Validation,
            Self::SocketOccupied { .. } | Self::BoardFull => ErrorSeverity::Recoverable,
        }
    }
}
