/// SimulationState: everything one running simulation owns.
///
/// The map is immutable after construction; the actor is the only
/// thing a tick mutates. The renderer only reads `actor.pos`.

use crate::domain::entity::{ActorState, Vec2};
use crate::domain::map::TileMap;

pub struct SimulationState {
    pub map: TileMap,
    pub actor: ActorState,
    /// Ticks run so far. The first tick is 1.
    pub tick: u64,
}

impl SimulationState {
    pub fn new(map: TileMap) -> Self {
        SimulationState {
            map,
            actor: ActorState::spawn(),
            tick: 0,
        }
    }

    /// Actor center, for drawing.
    #[inline]
    pub fn actor_position(&self) -> Vec2 {
        self.actor.pos
    }
}
