/// Movement: forces, tentative move, collision, ground refresh.
///
/// Processing order for one tick:
///   1. Forces (skipped entirely while on a ladder)
///      - water if the center tile is water, air otherwise
///      - field lift on top, while vy is under the guard
///   2. Tentative position = pos + vel
///   3. Collision resolution (may edit both)
///   4. Commit: prev ← pos, pos ← tentative
///   5. Ground flag from the new position

use crate::domain::collision;
use crate::domain::contact;
use crate::domain::corner::Contact;
use crate::domain::entity::{ActorState, Vec2};
use crate::domain::map::TileMap;
use crate::domain::tile::Contents;

const GRAVITY: f32 = 1.0;

const AIR_MAX_FALL: f32 = 5.0;
const AIR_MAX_RUN: f32 = 5.0;

const WATER_MAX_SINK: f32 = 2.0;
const WATER_MAX_SWIM: f32 = 2.0;

const FIELD_LIFT: f32 = 1.0;
/// Field lift only applies while vy is below this. Not a hard cap.
const FIELD_GUARD: f32 = 10.0;

/// What happened during `integrate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionReport {
    /// Result of the solid collision pass.
    pub contact: Contact,
    /// Ground flag went from false to true.
    pub landed: bool,
}

fn apply_air(vel: &mut Vec2) {
    vel.y = (vel.y - GRAVITY).max(-AIR_MAX_FALL);
    vel.x = vel.x.clamp(-AIR_MAX_RUN, AIR_MAX_RUN);
}

fn apply_water(vel: &mut Vec2) {
    vel.y = (vel.y - GRAVITY).max(-WATER_MAX_SINK);
    vel.x = vel.x.clamp(-WATER_MAX_SWIM, WATER_MAX_SWIM);
}

/// Advance the actor one tick.
pub fn integrate(map: &TileMap, actor: &mut ActorState) -> MotionReport {
    if !actor.on_ladder {
        if map.classify(actor.pos).intersects(Contents::WATER) {
            apply_water(&mut actor.vel);
        } else {
            apply_air(&mut actor.vel);
        }

        if contact::on_contents(map, actor.pos, Contents::FIELD) && actor.vel.y < FIELD_GUARD {
            actor.vel.y += FIELD_LIFT;
        }
    }

    let mut next = actor.pos + actor.vel;
    let contact = collision::clip(map, actor.pos, &mut next, &mut actor.vel);

    actor.prev = actor.pos;
    actor.pos = next;

    let was_on_ground = actor.on_ground;
    actor.on_ground = contact::on_ground(map, actor.pos);

    MotionReport {
        contact,
        landed: !was_on_ground && actor.on_ground,
    }
}
