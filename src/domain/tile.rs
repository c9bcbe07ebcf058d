/// Tile kinds and their properties.
/// Properties are queried via methods, not stored per cell,
/// so tile semantics are centralized here.

use std::ops::{BitAnd, BitOr, BitOrAssign};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TileKind {
    #[default]
    Empty,
    Solid,          // '#': always blocks
    Water,          // 'w': slows and lets the actor swim
    Ladder,         // 'l': climbable, and a one-way wall on its right face
    Field,          // 'f': upward conveyor
    OneWayPlatform, // '1': blocks only when landed on from above
}

impl TileKind {
    pub fn from_char(ch: char) -> Option<TileKind> {
        match ch {
            '#' => Some(TileKind::Solid),
            'w' => Some(TileKind::Water),
            'l' => Some(TileKind::Ladder),
            'f' => Some(TileKind::Field),
            '1' => Some(TileKind::OneWayPlatform),
            '.' => Some(TileKind::Empty),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            TileKind::Empty => '.',
            TileKind::Solid => '#',
            TileKind::Water => 'w',
            TileKind::Ladder => 'l',
            TileKind::Field => 'f',
            TileKind::OneWayPlatform => '1',
        }
    }

    /// Contents flags this kind contributes. One-way kinds contribute
    /// nothing here; they block only through `TileMap::is_solid_at`.
    pub fn contents(self) -> Contents {
        match self {
            TileKind::Solid => Contents::SOLID,
            TileKind::Water => Contents::WATER,
            TileKind::Ladder => Contents::LADDER,
            TileKind::Field => Contents::FIELD,
            TileKind::Empty | TileKind::OneWayPlatform => Contents::NONE,
        }
    }

    /// Display color (r, g, b) for the renderer.
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            TileKind::Solid => (255, 0, 0),
            TileKind::Water => (0, 0, 255),
            TileKind::Ladder => (255, 255, 0),
            TileKind::Field => (0, 255, 255),
            TileKind::OneWayPlatform => (128, 0, 0),
            TileKind::Empty => (255, 255, 255),
        }
    }
}

/// Bit set of tile contents a point can be in.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Contents(u8);

impl Contents {
    pub const NONE: Contents = Contents(0);
    pub const SOLID: Contents = Contents(1 << 0);
    pub const WATER: Contents = Contents(1 << 1);
    pub const LADDER: Contents = Contents(1 << 2);
    pub const FIELD: Contents = Contents(1 << 3);

    /// Does this set share any flag with `other`?
    pub fn intersects(self, other: Contents) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for Contents {
    type Output = Contents;
    fn bitor(self, rhs: Contents) -> Contents {
        Contents(self.0 | rhs.0)
    }
}

impl BitOrAssign for Contents {
    fn bitor_assign(&mut self, rhs: Contents) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Contents {
    type Output = Contents;
    fn bitand(self, rhs: Contents) -> Contents {
        Contents(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_codes_cover_every_kind() {
        for ch in ['#', 'w', 'l', 'f', '1', '.'] {
            let kind = TileKind::from_char(ch).unwrap();
            assert_eq!(kind.to_char(), ch);
        }
        assert_eq!(TileKind::from_char('x'), None);
    }

    #[test]
    fn one_way_kinds_have_no_solid_flag() {
        assert!(!TileKind::OneWayPlatform.contents().intersects(Contents::SOLID));
        assert!(!TileKind::Ladder.contents().intersects(Contents::SOLID));
        assert_eq!(TileKind::OneWayPlatform.contents(), Contents::NONE);
    }

    #[test]
    fn ladder_is_climbable_contents() {
        assert_eq!(TileKind::Ladder.contents(), Contents::LADDER);
    }

    #[test]
    fn contents_set_ops() {
        let mut c = Contents::WATER;
        c |= Contents::FIELD;
        assert!(c.intersects(Contents::FIELD));
        assert!(!c.intersects(Contents::LADDER));
        assert_eq!(c & Contents::WATER, Contents::WATER);
        assert_eq!(Contents::SOLID | Contents::NONE, Contents::SOLID);
    }
}
