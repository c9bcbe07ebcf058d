/// Player control: turn the tick's intent into velocity changes.
///
/// Runs before `motion::integrate`. Deltas from running, swimming and
/// jumping are gathered first and added after the ladder rules, so a
/// ladder that overwrites velocity still gets them on top.

use crate::domain::contact;
use crate::domain::corner::HALF_EXTENT;
use crate::domain::entity::{ActorState, Intent, Vec2};
use crate::domain::map::TileMap;
use crate::domain::tile::Contents;

use super::event::SimEvent;

const GROUND_FRICTION: f32 = 0.7;
const FRICTION_SNAP: f32 = 0.1;
const RUN_ACCEL: f32 = 0.25;
const RUN_BOOST: f32 = 2.0;
const AIR_ACCEL: f32 = 0.1;

const SWIM_STROKE: f32 = 5.0;
const SWIM_COOLDOWN: u64 = 5;

const JUMP_IMPULSE: f32 = 5.0;
const JUMP_COOLDOWN: u64 = 10;
/// Extra lift per tick while the jump button stays held.
const JUMP_HOLD_LIFT: f32 = 1.0;
const JUMP_HOLD_TICKS: u64 = 10;

const LADDER_SPEED: f32 = 1.0;

/// Apply one tick of input to `actor`. Events are appended to `events`.
pub fn control(
    map: &TileMap,
    actor: &mut ActorState,
    intent: Intent,
    tick: u64,
    events: &mut Vec<SimEvent>,
) {
    let was_on_ladder = actor.on_ladder;
    let move_x = f32::from(intent.move_x);
    let mut delta = Vec2::ZERO;

    // sampled before anything moves
    let feet = map.classify(Vec2::new(actor.pos.x, actor.pos.y - HALF_EXTENT));

    if actor.on_ground {
        if intent.move_x == 0 {
            actor.vel.x *= GROUND_FRICTION;
            if actor.vel.x.abs() < FRICTION_SNAP {
                actor.vel.x = 0.0;
            }
        }
        let mut run = RUN_ACCEL * move_x;
        if intent.modifier {
            run *= RUN_BOOST;
        }
        delta.x += run;
    } else {
        delta.x += AIR_ACCEL * move_x;
    }

    if feet.intersects(Contents::WATER)
        && intent.primary
        && tick > actor.last_jump_tick + SWIM_COOLDOWN
    {
        delta.y += SWIM_STROKE;
        actor.last_jump_tick = tick;
        events.push(SimEvent::SwimStroke);
    }

    if (actor.on_ground || actor.on_ladder)
        && intent.primary
        && tick > actor.last_jump_tick + JUMP_COOLDOWN
    {
        delta.y += JUMP_IMPULSE;
        actor.last_jump_tick = tick;
        actor.on_ladder = false;
        events.push(SimEvent::Jumped);
    }

    if tick < actor.last_jump_tick + JUMP_HOLD_TICKS && intent.primary && actor.vel.y > 0.0 {
        delta.y += JUMP_HOLD_LIFT;
    }

    climb(map, actor, intent);

    actor.vel += delta;

    match (was_on_ladder, actor.on_ladder) {
        (false, true) => events.push(SimEvent::LadderAttached),
        (true, false) => events.push(SimEvent::LadderDetached),
        _ => {}
    }
}

/// Ladder attach/detach rules, then ladder velocity if still attached.
fn climb(map: &TileMap, actor: &mut ActorState, intent: Intent) {
    let touching = contact::on_contents(map, actor.pos, Contents::LADDER);

    if touching {
        if !actor.on_ladder && intent.move_y > 0 {
            actor.on_ladder = true;
            actor.vel = Vec2::ZERO;
        }
        // walked off the bottom
        if actor.on_ladder && actor.on_ground && intent.move_y <= 0 {
            actor.on_ladder = false;
        }
    }

    if actor.on_ladder && !touching {
        actor.on_ladder = false;
    }

    // drop off
    if actor.on_ladder && intent.move_y < 0 && intent.primary {
        actor.on_ladder = false;
    }

    if actor.on_ladder {
        actor.vel = Vec2::new(
            LADDER_SPEED * f32::from(intent.move_x.signum()),
            LADDER_SPEED * f32::from(intent.move_y.signum()),
        );
    }
}
