/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and logging;
/// nothing here feeds back into physics.

use crate::domain::entity::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimEvent {
    Jumped,
    SwimStroke,
    LadderAttached,
    LadderDetached,
    /// Ground flag went from false to true this tick.
    Landed,
    /// All four corners were inside solid tiles; the actor was nudged.
    Trapped { at: Vec2 },
}
