//! Effect instructions and the sink boundary.
//!
//! The simulator applies effects to [`SessionState`](crate::state::SessionState)
//! itself and reports each one to an [`EffectSink`] so presentation layers can
//! play animations, particles and sounds. Sinks are fire-and-forget: nothing
//! they do feeds back into resolution.

use crate::card::{ActionKind, CardId, VisualKind};
use crate::engine::TurnPhase;
use crate::state::{CharacterId, Coord, StatusTag, SurfaceEffect};
use crate::targeting::Direction;

use super::CardPlan;

/// Where a visual is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VisualAnchor {
    Cell(Coord),
    Character(CharacterId),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    Damage {
        target: CharacterId,
        amount: u32,
        instigator: CharacterId,
    },
    Heal {
        target: CharacterId,
        amount: u32,
        instigator: CharacterId,
    },
    SetStatus {
        character: CharacterId,
        status: StatusTag,
    },
    SetCellStatus {
        coord: Coord,
        status: StatusTag,
    },
    SetSurface {
        coord: Coord,
        surface: SurfaceEffect,
    },
    GrantBuff {
        character: CharacterId,
        kind: ActionKind,
        amount: u32,
    },
    Move {
        character: CharacterId,
        from: Coord,
        to: Coord,
        /// Seconds the presentation glide should take.
        glide: f32,
        blocked: bool,
    },
    /// A draw of `count` cards was queued.
    DrawCards {
        character: CharacterId,
        count: u32,
    },
    /// A queued draw resolved.
    CardDrawn {
        character: CharacterId,
        card: CardId,
    },
    SpawnVisual {
        visual: VisualKind,
        anchor: VisualAnchor,
        orientation: Direction,
    },
    Death {
        character: CharacterId,
        coord: Coord,
    },
}

/// Receiver of resolved effects.
///
/// Every method has an empty default so sinks implement only what they care
/// about. [`emit`](EffectSink::emit) dispatches an [`Effect`] to the matching
/// method; sinks that want the raw effect stream override it instead.
pub trait EffectSink {
    fn apply_damage(&mut self, _target: CharacterId, _amount: u32, _instigator: CharacterId) {}

    fn apply_heal(&mut self, _target: CharacterId, _amount: u32, _instigator: CharacterId) {}

    fn set_status(&mut self, _character: CharacterId, _status: StatusTag) {}

    fn set_cell_status(&mut self, _coord: Coord, _status: StatusTag) {}

    fn set_surface(&mut self, _coord: Coord, _surface: SurfaceEffect) {}

    fn grant_buff(&mut self, _character: CharacterId, _kind: ActionKind, _amount: u32) {}

    fn move_character(&mut self, _character: CharacterId, _from: Coord, _to: Coord, _glide: f32) {}

    fn draw_cards(&mut self, _character: CharacterId, _count: u32) {}

    fn card_drawn(&mut self, _character: CharacterId, _card: CardId) {}

    fn spawn_visual(&mut self, _visual: VisualKind, _anchor: VisualAnchor, _orientation: Direction) {}

    fn character_died(&mut self, _character: CharacterId, _coord: Coord) {}

    /// Targets of an activation, reported before any of its effects.
    fn plan_resolved(&mut self, _actor: CharacterId, _card: CardId, _plan: &CardPlan) {}

    /// The turn coordinator moved to another state.
    fn phase_changed(&mut self, _from: TurnPhase, _to: TurnPhase, _turn: u32) {}

    fn emit(&mut self, effect: &Effect) {
        match *effect {
            Effect::Damage {
                target,
                amount,
                instigator,
            } => self.apply_damage(target, amount, instigator),
            Effect::Heal {
                target,
                amount,
                instigator,
            } => self.apply_heal(target, amount, instigator),
            Effect::SetStatus { character, status } => self.set_status(character, status),
            Effect::SetCellStatus { coord, status } => self.set_cell_status(coord, status),
            Effect::SetSurface { coord, surface } => self.set_surface(coord, surface),
            Effect::GrantBuff {
                character,
                kind,
                amount,
            } => self.grant_buff(character, kind, amount),
            Effect::Move {
                character,
                from,
                to,
                glide,
                ..
            } => self.move_character(character, from, to, glide),
            Effect::DrawCards { character, count } => self.draw_cards(character, count),
            Effect::CardDrawn { character, card } => self.card_drawn(character, card),
            Effect::SpawnVisual {
                visual,
                anchor,
                orientation,
            } => self.spawn_visual(visual, anchor, orientation),
            Effect::Death { character, coord } => self.character_died(character, coord),
        }
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EffectSink for NullSink {}

impl EffectSink for Vec<Effect> {
    fn emit(&mut self, effect: &Effect) {
        self.push(effect.clone());
    }
}
