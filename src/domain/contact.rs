/// Contact queries built on the same corner probes as the resolver.
///
///   - `on_ground`: is there something underfoot right now?
///   - `on_contents`: does any corner touch water / ladder / field?

use super::collision::{clear_bottom, clear_left, clear_right};
use super::corner::{Corner, CornerCode, HALF_EXTENT};
use super::entity::Vec2;
use super::map::{Sweep, TileMap};
use super::tile::Contents;

/// Is the actor at `pos` standing on something?
///
/// Only the two bottom corners are probed, through the one-way-aware
/// solidity test with no motion (the move has already been committed).
/// Both corners down means ground. A single corner counts as ground when
/// it is at least as deep into the floor as into the side, i.e. the same
/// tie-break the convex resolver uses.
pub fn on_ground(map: &TileMap, pos: Vec2) -> bool {
    let sweep = Sweep::at_rest(pos);
    let code = CornerCode::probe(|corner| match corner {
        Corner::BottomLeft => {
            map.is_solid_at(Vec2::new(pos.x - HALF_EXTENT, pos.y - HALF_EXTENT), sweep)
        }
        Corner::BottomRight => {
            map.is_solid_at(Vec2::new(pos.x + HALF_EXTENT, pos.y - HALF_EXTENT), sweep)
        }
        Corner::TopLeft | Corner::TopRight => false,
    });

    match code.bits() {
        0x4 => clear_bottom(pos) <= clear_left(pos),
        0x8 => clear_bottom(pos) <= clear_right(pos),
        0xc | 0xd | 0xe => true,
        _ => false,
    }
}

/// Does any corner of the box at `pos` touch a tile with `flags`?
pub fn on_contents(map: &TileMap, pos: Vec2, flags: Contents) -> bool {
    Corner::ALL
        .iter()
        .any(|c| map.classify(c.probe(pos)).intersects(flags))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::corner::SLOP;
    use crate::domain::map::fixtures::{empty_room, room_with};

    /// Center y of an actor resting on the top of grid row `row`.
    fn resting_y(row: usize) -> f32 {
        (row as f32 + 1.0) * 16.0 - SLOP + HALF_EXTENT
    }

    #[test]
    fn resting_on_floor_is_ground() {
        let map = empty_room();
        assert!(on_ground(&map, Vec2::new(100.0, resting_y(0))));
    }

    #[test]
    fn hovering_is_not_ground() {
        let map = empty_room();
        assert!(!on_ground(&map, Vec2::new(100.0, resting_y(0) + 1.0)));
        assert!(!on_ground(&map, Vec2::new(100.0, 120.0)));
    }

    #[test]
    fn resting_on_platform_is_ground() {
        let map = room_with(&[(6, 5, '1'), (7, 5, '1')]);
        assert!(on_ground(&map, Vec2::new(112.0, resting_y(5))));
    }

    #[test]
    fn inside_platform_is_not_ground() {
        // bottom edge deep inside the platform: walked in from the side
        let map = room_with(&[(6, 5, '1'), (7, 5, '1')]);
        assert!(!on_ground(&map, Vec2::new(112.0, 88.0)));
    }

    #[test]
    fn ledge_corner_counts_as_ground() {
        // only the bottom-left corner is over the block (5,5), barely
        let map = room_with(&[(5, 5, '#')]);
        let pos = Vec2::new(99.5, resting_y(5));
        assert!(on_ground(&map, pos));
    }

    #[test]
    fn wall_beside_is_not_ground() {
        // bottom-right corner touches the face of block (5,5) deep below its top
        let map = room_with(&[(5, 5, '#')]);
        let pos = Vec2::new(76.0 + SLOP, 90.0);
        assert!(!on_ground(&map, pos));
    }

    #[test]
    fn single_corner_tie_counts_as_ground() {
        // one corner in block (5,5), equally deep into its top and its side
        let map = room_with(&[(5, 5, '#')]);
        assert!(on_ground(&map, Vec2::new(99.0, 99.0)));
        assert!(on_ground(&map, Vec2::new(77.0, 99.0)));
        // a quarter pixel deeper on y and the side wins
        assert!(!on_ground(&map, Vec2::new(99.0, 98.75)));
        assert!(!on_ground(&map, Vec2::new(77.0, 98.75)));
    }

    #[test]
    fn contents_any_corner() {
        let map = room_with(&[(5, 5, 'w'), (9, 9, 'l'), (12, 3, 'f')]);
        // only the top-right corner is in the water tile
        let pos = Vec2::new(78.0, 78.0);
        assert!(on_contents(&map, pos, Contents::WATER));
        assert!(!on_contents(&map, pos, Contents::LADDER));
        assert!(on_contents(&map, Vec2::new(152.0, 152.0), Contents::LADDER));
        assert!(on_contents(&map, Vec2::new(200.0, 56.0), Contents::FIELD));
        assert!(on_contents(
            &map,
            Vec2::new(200.0, 56.0),
            Contents::FIELD | Contents::WATER,
        ));
    }
}
