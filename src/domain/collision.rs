/// Collision resolution for one tentative move.
///
/// ## Passes
///
/// `clip` runs three passes in order, each seeing the corrections of the
/// one before:
///   1. one-way platforms (`1`): push up onto the platform
///   2. one-way walls (`l`): push right out of the wall face
///   3. solid tiles (`#`): full corner-code dispatch
///
/// Solid runs last so it always has the final word.
///
/// ## Depths
///
/// Each `clear_*` helper returns the distance that moves one box edge out
/// of the tile it penetrates, minus `SLOP`. The box is left overlapping the
/// surface by `SLOP` so the next tick's probes still report contact.

use super::corner::{Contact, Corner, CornerCode, Side, HALF_EXTENT, SLOP};
use super::entity::Vec2;
use super::map::{gap_to_next_line, gap_to_prev_line, Sweep, TileMap};
use super::tile::TileKind;

/// Platform codes that mean the bottom edge has landed.
const PLATFORM_LANDING: [CornerCode; 8] = [
    CornerCode::from_bits(0x4),
    CornerCode::from_bits(0x7),
    CornerCode::from_bits(0x8),
    CornerCode::from_bits(0xb),
    CornerCode::BOTTOM,
    CornerCode::from_bits(0xd),
    CornerCode::from_bits(0xe),
    CornerCode::ALL,
];

/// One-way wall codes that mean the left edge is inside the wall.
const WALL_FROM_RIGHT: [CornerCode; 3] = [
    CornerCode::from_bits(0x1),
    CornerCode::from_bits(0x4),
    CornerCode::LEFT,
];

/// Push +x to free the left edge.
#[inline]
pub fn clear_left(next: Vec2) -> f32 {
    gap_to_next_line(next.x - HALF_EXTENT) - SLOP
}

/// Push -x to free the right edge.
#[inline]
pub fn clear_right(next: Vec2) -> f32 {
    gap_to_prev_line(next.x + HALF_EXTENT) - SLOP
}

/// Push +y to free the bottom edge.
#[inline]
pub fn clear_bottom(next: Vec2) -> f32 {
    gap_to_next_line(next.y - HALF_EXTENT) - SLOP
}

/// Push -y to free the top edge.
#[inline]
pub fn clear_top(next: Vec2) -> f32 {
    gap_to_prev_line(next.y + HALF_EXTENT) - SLOP
}

/// Corner code over tiles of `kind` that block the sweep `prev → next`.
pub fn corner_code(map: &TileMap, prev: Vec2, next: Vec2, kind: TileKind) -> CornerCode {
    let sweep = Sweep::new(prev, next);
    CornerCode::probe(|corner| {
        let p = corner.probe(next);
        map.tile_at(p) == kind && map.is_solid_at(p, sweep)
    })
}

/// Resolve the tentative position `next` (reached from `prev`) against the
/// map, adjusting `next` and `vel` in place. Returns the solid-pass contact.
pub fn clip(map: &TileMap, prev: Vec2, next: &mut Vec2, vel: &mut Vec2) -> Contact {
    clip_platforms(map, prev, next, vel);
    clip_walls(map, prev, next, vel);
    clip_solid(map, prev, next, vel)
}

/// One-way platform pass. Returns true if the actor was landed.
pub fn clip_platforms(map: &TileMap, prev: Vec2, next: &mut Vec2, vel: &mut Vec2) -> bool {
    let code = corner_code(map, prev, *next, TileKind::OneWayPlatform);
    if !code.is_any(&PLATFORM_LANDING) {
        return false;
    }
    next.y += clear_bottom(*next);
    vel.y = 0.0;
    true
}

/// One-way wall pass (ladder tiles). Returns true if the actor was pushed.
pub fn clip_walls(map: &TileMap, prev: Vec2, next: &mut Vec2, vel: &mut Vec2) -> bool {
    let code = corner_code(map, prev, *next, TileKind::Ladder);
    if !code.is_any(&WALL_FROM_RIGHT) {
        return false;
    }
    next.x += clear_left(*next);
    vel.x = 0.0;
    true
}

/// Solid pass: dispatch on the corner code against `#` tiles.
pub fn clip_solid(map: &TileMap, prev: Vec2, next: &mut Vec2, vel: &mut Vec2) -> Contact {
    let contact = corner_code(map, prev, *next, TileKind::Solid).contact();
    match contact {
        Contact::Clear | Contact::Diagonal => {}
        Contact::Edge(side) => resolve_edge(side, next, vel),
        Contact::Convex(corner) => resolve_convex(corner, next, vel),
        Contact::Concave(corner) => resolve_concave(corner, next, vel),
        Contact::Trapped => {
            next.x += 1.0;
            vel.x = 0.0;
            vel.y = 0.0;
        }
    }
    contact
}

fn resolve_edge(side: Side, next: &mut Vec2, vel: &mut Vec2) {
    match side {
        Side::Left => {
            next.x += clear_left(*next);
            vel.x = 0.0;
        }
        Side::Right => {
            next.x -= clear_right(*next);
            vel.x = 0.0;
        }
        Side::Top => {
            next.y -= clear_top(*next);
            vel.y = 0.0;
        }
        Side::Bottom => {
            next.y += clear_bottom(*next);
            vel.y = 0.0;
        }
    }
}

/// A single corner is inside a tile: back out along the shallower axis,
/// vertical on a tie. Velocity on that axis is cut only if it points into
/// the surface.
fn resolve_convex(corner: Corner, next: &mut Vec2, vel: &mut Vec2) {
    let left = matches!(corner, Corner::TopLeft | Corner::BottomLeft);
    let bottom = matches!(corner, Corner::BottomLeft | Corner::BottomRight);

    let dx = if left { clear_left(*next) } else { clear_right(*next) };
    let dy = if bottom { clear_bottom(*next) } else { clear_top(*next) };

    if dx < dy {
        if left {
            next.x += dx;
            if vel.x < 0.0 {
                vel.x = 0.0;
            }
        } else {
            next.x -= dx;
            if vel.x > 0.0 {
                vel.x = 0.0;
            }
        }
    } else if bottom {
        next.y += dy;
        if vel.y < 0.0 {
            vel.y = 0.0;
        }
    } else {
        next.y -= dy;
        if vel.y > 0.0 {
            vel.y = 0.0;
        }
    }
}

/// Three corners are inside: clear both walls of the L. The side walls and
/// the ceiling are cleared flush to the grid line; the floor keeps `SLOP`.
fn resolve_concave(inner: Corner, next: &mut Vec2, vel: &mut Vec2) {
    let left = matches!(inner, Corner::TopLeft | Corner::BottomLeft);
    let bottom = matches!(inner, Corner::BottomLeft | Corner::BottomRight);

    if left {
        next.x += gap_to_next_line(next.x - HALF_EXTENT);
    } else {
        next.x -= gap_to_prev_line(next.x + HALF_EXTENT);
    }
    if bottom {
        next.y += clear_bottom(*next);
    } else {
        next.y -= gap_to_prev_line(next.y + HALF_EXTENT);
    }
    vel.x = 0.0;
    vel.y = 0.0;
}
