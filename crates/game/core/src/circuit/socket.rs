//! Socket enhancement: elemental and retrigger charges stored on a socket.

use crate::card::{ActionKind, Card};

/// `{kind, charges}` pair.
///
/// Charges never go negative and the kind is [`ActionKind::None`] exactly
/// when no charges remain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SocketEnhancement {
    kind: ActionKind,
    charges: u32,
}

impl SocketEnhancement {
    pub fn new(kind: ActionKind, charges: u32) -> Self {
        let mut enhancement = Self::default();
        enhancement.apply(kind, charges);
        enhancement
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn charges(&self) -> u32 {
        self.charges
    }

    pub fn is_empty(&self) -> bool {
        self.kind == ActionKind::None
    }

    /// Stacks onto a matching enhancement, otherwise replaces it.
    pub fn apply(&mut self, action: ActionKind, amount: u32) {
        if action == self.kind {
            self.charges = self.charges.saturating_add(amount);
        } else {
            self.kind = action;
            self.charges = amount;
        }
        if self.kind == ActionKind::None || self.charges == 0 {
            self.clear();
        }
    }

    /// Resolves the action a card activation actually performs.
    ///
    /// A request matching the stored kind is free. Any other request spends
    /// one charge and is overridden by the stored kind; with no charges left
    /// the result is [`ActionKind::None`].
    pub fn consume(&mut self, requested: ActionKind) -> ActionKind {
        if requested == self.kind {
            return requested;
        }
        if self.charges == 0 {
            return ActionKind::None;
        }
        let resolved = self.kind;
        self.charges -= 1;
        if self.charges == 0 {
            self.clear();
        }
        resolved
    }

    pub fn clear(&mut self) {
        self.kind = ActionKind::None;
        self.charges = 0;
    }
}

/// A slot on a circuit board: at most one card plus its enhancement.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Socket {
    pub card: Option<Card>,
    pub enhancement: SocketEnhancement,
}

impl Socket {
    pub fn is_filled(&self) -> bool {
        self.card.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_stacks_matching_kind() {
        let mut enhancement = SocketEnhancement::new(ActionKind::Fire, 2);
        enhancement.apply(ActionKind::Fire, 3);
        assert_eq!(enhancement.kind(), ActionKind::Fire);
        assert_eq!(enhancement.charges(), 5);
    }

    #[test]
    fn apply_replaces_other_kind() {
        let mut enhancement = SocketEnhancement::new(ActionKind::Fire, 4);
        enhancement.apply(ActionKind::Shock, 1);
        assert_eq!(enhancement.kind(), ActionKind::Shock);
        assert_eq!(enhancement.charges(), 1);
    }

    #[test]
    fn matching_request_is_free() {
        let mut enhancement = SocketEnhancement::new(ActionKind::Fire, 1);
        assert_eq!(enhancement.consume(ActionKind::Fire), ActionKind::Fire);
        assert_eq!(enhancement.charges(), 1);
    }

    #[test]
    fn other_request_spends_and_overrides() {
        let mut enhancement = SocketEnhancement::new(ActionKind::Shock, 2);
        assert_eq!(enhancement.consume(ActionKind::Attack), ActionKind::Shock);
        assert_eq!(enhancement.charges(), 1);
        assert_eq!(enhancement.kind(), ActionKind::Shock);
    }

    #[test]
    fn exhausted_resolves_to_none() {
        let mut enhancement = SocketEnhancement::default();
        assert_eq!(enhancement.consume(ActionKind::Attack), ActionKind::None);
        assert_eq!(enhancement.charges(), 0);
    }

    #[test]
    fn kind_clears_exactly_when_charges_hit_zero() {
        let mut enhancement = SocketEnhancement::new(ActionKind::Retrigger, 3);
        let mut seen = Vec::new();
        for _ in 0..5 {
            let before = enhancement.charges();
            enhancement.consume(ActionKind::Move);
            // Never negative, and the kind is present iff charges remain.
            assert!(enhancement.charges() <= before);
            assert_eq!(enhancement.is_empty(), enhancement.charges() == 0);
            seen.push(enhancement.charges());
        }
        assert_eq!(seen, vec![2, 1, 0, 0, 0]);
    }

    #[test]
    fn zero_amount_leaves_socket_empty() {
        let enhancement = SocketEnhancement::new(ActionKind::Fire, 0);
        assert!(enhancement.is_empty());
    }
}
