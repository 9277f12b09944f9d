//! Characters occupying the grid.

use super::{CharacterId, Coord, ResourceMeter};

/// Side a character fights for.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Team {
    Player,
    Enemy,
    Neutral,
}

impl Team {
    /// Teams whose members this team may damage and auto-target.
    pub const fn opponents(self) -> &'static [Team] {
        match self {
            Team::Player => &[Team::Enemy],
            Team::Enemy => &[Team::Player],
            Team::Neutral => &[Team::Player, Team::Enemy],
        }
    }

    pub fn is_hostile_to(self, other: Team) -> bool {
        self != other
    }
}

/// How a character chooses the cards it plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BrainType {
    /// Plays the cards slotted in its own circuit board.
    Independent,
    /// Mirrors the queued cards of `leader`.
    Listener { leader: CharacterId },
}

/// Status condition carried by a character or marked on a cell.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusTag {
    #[default]
    None,
    Fire,
    Shocked,
}

/// A combatant on the grid.
///
/// `position` always equals the coordinate of the cell whose occupant is this
/// character; only [`super::SessionState`] moves characters so the two never
/// drift apart.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub team: Team,
    pub brain: BrainType,
    pub health: ResourceMeter,
    pub status: StatusTag,
    pub(crate) position: Coord,
}

impl Character {
    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }
}

/// Blueprint used to spawn a character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterSpec {
    pub name: String,
    pub team: Team,
    pub brain: BrainType,
    pub max_health: u32,
}

impl CharacterSpec {
    pub fn new(name: impl Into<String>, team: Team, max_health: u32) -> Self {
        Self {
            name: name.into(),
            team,
            brain: BrainType::Independent,
            max_health,
        }
    }

    pub fn listening_to(mut self, leader: CharacterId) -> Self {
        self.brain = BrainType::Listener { leader };
        self
    }
}
