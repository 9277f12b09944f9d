//! Facing, local frames and auto-target rotation.

use crate::state::{Coord, Team};

/// Angle at and beyond which auto-targeting mirrors instead of rotating.
pub const MIRROR_THRESHOLD_DEGREES: f32 = 172.0;

/// Cardinal direction on the grid. `North` is +y.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub const fn clockwise(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    pub const fn counter_clockwise(self) -> Self {
        self.clockwise().clockwise().clockwise()
    }

    pub const fn reversed(self) -> Self {
        self.clockwise().clockwise()
    }
}

/// A character's local frame: depth runs along `facing` (times
/// `depth_sign`), lateral width runs along `facing` turned clockwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Orientation {
    pub facing: Direction,
    pub depth_sign: i32,
}

impl Orientation {
    pub const fn new(facing: Direction) -> Self {
        Self {
            facing,
            depth_sign: 1,
        }
    }

    /// Players look up the scrolling grid, enemies look down it.
    pub const fn for_team(team: Team) -> Self {
        match team {
            Team::Enemy => Self::new(Direction::South),
            Team::Player | Team::Neutral => Self::new(Direction::North),
        }
    }

    /// Flips depth only; the lateral axis is unchanged.
    pub const fn mirrored(self) -> Self {
        Self {
            facing: self.facing,
            depth_sign: -self.depth_sign,
        }
    }

    pub const fn is_mirrored(self) -> bool {
        self.depth_sign < 0
    }

    /// Direction a step of positive depth actually travels.
    pub const fn heading(self) -> Direction {
        if self.depth_sign < 0 {
            self.facing.reversed()
        } else {
            self.facing
        }
    }

    /// Maps a local `(lateral, depth)` offset to a grid delta.
    pub fn project(self, lateral: i32, depth: i32) -> (i32, i32) {
        let (fx, fy) = self.facing.delta();
        let (rx, ry) = self.facing.clockwise().delta();
        let depth = depth * self.depth_sign;
        (rx * lateral + fx * depth, ry * lateral + fy * depth)
    }

    /// Distance between two cells along the depth axis.
    pub fn depth_distance(self, from: Coord, to: Coord) -> i32 {
        let (fx, fy) = self.facing.delta();
        ((to.x - from.x) * fx + (to.y - from.y) * fy).abs()
    }

    /// Distance between two cells along the lateral axis.
    pub fn lateral_distance(self, from: Coord, to: Coord) -> i32 {
        let (rx, ry) = self.facing.clockwise().delta();
        ((to.x - from.x) * rx + (to.y - from.y) * ry).abs()
    }

    /// Re-aims this frame at `target`.
    ///
    /// Targets within 45 degrees of the heading keep the frame, lateral
    /// targets rotate a quarter turn toward their side, and targets at
    /// [`MIRROR_THRESHOLD_DEGREES`] or beyond mirror depth. Anything between
    /// turns the facing around.
    pub fn toward(self, from: Coord, target: Coord) -> Self {
        if from == target {
            return self;
        }
        let (ux, uy) = self.heading().delta();
        let offset = ((target.x - from.x) as f32, (target.y - from.y) as f32);
        let angle = signed_angle((ux as f32, uy as f32), offset);
        let magnitude = angle.abs();

        if magnitude >= MIRROR_THRESHOLD_DEGREES {
            self.mirrored()
        } else if magnitude <= 45.0 {
            self
        } else if magnitude < 135.0 {
            // Positive angles fall on the left of the heading.
            let heading = self.heading();
            Self::new(if angle > 0.0 {
                heading.counter_clockwise()
            } else {
                heading.clockwise()
            })
        } else {
            Self::new(self.heading().reversed())
        }
    }
}

/// Signed angle in degrees from `reference` to `vector`, positive when
/// `vector` lies counter-clockwise (to the left) of `reference`.
pub fn signed_angle(reference: (f32, f32), vector: (f32, f32)) -> f32 {
    let cross = reference.0 * vector.1 - reference.1 * vector.0;
    let dot = reference.0 * vector.0 + reference.1 * vector.1;
    cross.atan2(dot).to_degrees()
}
