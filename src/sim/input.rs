//! Per-frame directional input
//!
//! Keyboard and swipe sources are merged by the host into one value that is
//! passed to the tick and reset every frame.

use glam::Vec2;

use crate::consts::SWIPE_DOT_THRESHOLD;

/// Four one-frame direction flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionalInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl DirectionalInput {
    pub const NONE: Self = Self {
        left: false,
        right: false,
        up: false,
        down: false,
    };

    pub fn left() -> Self {
        Self {
            left: true,
            ..Self::NONE
        }
    }

    pub fn right() -> Self {
        Self {
            right: true,
            ..Self::NONE
        }
    }

    pub fn up() -> Self {
        Self {
            up: true,
            ..Self::NONE
        }
    }

    pub fn down() -> Self {
        Self {
            down: true,
            ..Self::NONE
        }
    }

    /// Classify a swipe (screen delta, y up) into at most one direction
    pub fn from_swipe(delta: Vec2) -> Self {
        let dir = delta.normalize_or_zero();

        if dir.dot(Vec2::X) > SWIPE_DOT_THRESHOLD {
            Self::right()
        } else if dir.dot(Vec2::NEG_X) > SWIPE_DOT_THRESHOLD {
            Self::left()
        } else if dir.dot(Vec2::Y) > SWIPE_DOT_THRESHOLD {
            Self::up()
        } else if dir.dot(Vec2::NEG_Y) > SWIPE_DOT_THRESHOLD {
            Self::down()
        } else {
            Self::NONE
        }
    }

    /// Combine two sources (e.g. keyboard and swipe)
    pub fn merge(self, other: Self) -> Self {
        Self {
            left: self.left || other.left,
            right: self.right || other.right,
            up: self.up || other.up,
            down: self.down || other.down,
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::NONE
    }
}
