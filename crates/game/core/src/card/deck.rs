use crate::config::GameConfig;

use super::{Card, CardId, CardZone};

/// Draw pile, hand and discard pile of one character.
///
/// The top of the draw pile is the end of `draw_pile`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Deck {
    draw_pile: Vec<Card>,
    hand: Vec<Card>,
    discard: Vec<Card>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a card on top of the draw pile.
    pub fn push_draw_pile(&mut self, mut card: Card) {
        card.zone = CardZone::DrawPile;
        self.draw_pile.push(card);
    }

    /// Draws the top card into hand, recycling the discard pile when the
    /// draw pile is empty. A draw with a full hand goes straight to discard.
    pub fn draw(&mut self) -> Option<CardId> {
        if self.draw_pile.is_empty() {
            self.recycle_discard();
        }
        let card = self.draw_pile.pop()?;
        let id = card.id;
        if self.hand.len() >= GameConfig::MAX_HAND_SIZE {
            tracing::debug!(card = %id, "hand full, drawn card discarded");
            self.discard(card);
        } else {
            self.add_to_hand(card);
        }
        Some(id)
    }

    pub fn add_to_hand(&mut self, mut card: Card) {
        card.zone = CardZone::Hand;
        self.hand.push(card);
    }

    pub fn take_from_hand(&mut self, id: CardId) -> Option<Card> {
        let index = self.hand.iter().position(|card| card.id == id)?;
        Some(self.hand.remove(index))
    }

    pub fn discard(&mut self, mut card: Card) {
        card.deactivate();
        card.zone = CardZone::Discard;
        self.discard.push(card);
    }

    pub fn draw_pile(&self) -> &[Card] {
        &self.draw_pile
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard
    }

    /// All cards in zone order: draw pile, hand, discard.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.draw_pile
            .iter()
            .chain(self.hand.iter())
            .chain(self.discard.iter())
    }

    fn recycle_discard(&mut self) {
        // Oldest discard ends on top.
        while let Some(mut card) = self.discard.pop() {
            card.zone = CardZone::DrawPile;
            self.draw_pile.push(card);
        }
    }
}
