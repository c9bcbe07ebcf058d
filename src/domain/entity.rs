/// The actor and its per-tick input.
///
/// World space is in pixels, y grows upward, one tile is 16 px.
/// The actor is an 8×8 box described by its center.

use std::ops::{Add, AddAssign};

/// Actor spawn point (center, world pixels).
pub const SPAWN: Vec2 = Vec2 { x: 32.0, y: 128.0 };

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// Per-tick input intent. Axes are -1, 0 or 1; up is +1.
/// Built from whatever is held at sample time (last state wins).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Intent {
    pub move_x: i8,
    pub move_y: i8,
    /// Jump / swim stroke / ladder drop-off.
    pub primary: bool,
    /// Run boost.
    pub modifier: bool,
}

impl Intent {
    /// Combine two held-button sources (keyboard + gamepad).
    /// Opposing axes cancel.
    pub fn merge(self, other: Intent) -> Intent {
        Intent {
            move_x: (self.move_x + other.move_x).clamp(-1, 1),
            move_y: (self.move_y + other.move_y).clamp(-1, 1),
            primary: self.primary || other.primary,
            modifier: self.modifier || other.modifier,
        }
    }
}

/// The single simulated body.
#[derive(Clone, Debug)]
pub struct ActorState {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Position before the most recent committed move.
    pub prev: Vec2,
    pub on_ground: bool,
    pub on_ladder: bool,
    /// Tick of the last jump or swim stroke.
    pub last_jump_tick: u64,
}

impl ActorState {
    pub fn new(pos: Vec2) -> Self {
        ActorState {
            pos,
            vel: Vec2::ZERO,
            prev: pos,
            on_ground: false,
            on_ladder: false,
            last_jump_tick: 0,
        }
    }

    pub fn spawn() -> Self {
        ActorState::new(SPAWN)
    }
}
