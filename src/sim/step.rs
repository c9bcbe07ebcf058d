/// The step function: advances the simulation by one tick.
///
/// Processing order:
///   1. Tick counter
///   2. Player control (intent → velocity, ladder state)
///   3. Movement (forces → tentative move → collision → commit)
///   4. Motion events (trapped nudge, landing)
///
/// Everything the tick learns is returned as `SimEvent`s for the front end.

use tracing::{debug, trace, warn};

use crate::domain::corner::Contact;
use crate::domain::entity::{ActorState, Intent};
use super::event::SimEvent;
use super::motion;
use super::player;
use super::world::SimulationState;

pub fn step(state: &mut SimulationState, intent: Intent) -> Vec<SimEvent> {
    let mut events: Vec<SimEvent> = Vec::new();
    state.tick += 1;

    player::control(&state.map, &mut state.actor, intent, state.tick, &mut events);

    let report = motion::integrate(&state.map, &mut state.actor);
    if report.contact == Contact::Trapped {
        events.push(SimEvent::Trapped { at: state.actor.pos });
    }
    if report.landed {
        events.push(SimEvent::Landed);
    }

    let a = &state.actor;
    trace!(
        tick = state.tick,
        x = a.pos.x,
        y = a.pos.y,
        dx = a.pos.x - a.prev.x,
        dy = a.pos.y - a.prev.y,
        on_ground = a.on_ground,
        on_ladder = a.on_ladder,
        "moved"
    );

    for event in &events {
        match event {
            SimEvent::Trapped { at } => {
                warn!(tick = state.tick, x = at.x, y = at.y, "actor trapped, nudged right")
            }
            other => debug!(tick = state.tick, event = ?other, "sim event"),
        }
    }

    events
}

/// Put the actor back at spawn, at rest. The tick counter keeps running.
pub fn reset(state: &mut SimulationState) {
    state.actor = ActorState::spawn();
    debug!(tick = state.tick, "actor reset to spawn");
}
