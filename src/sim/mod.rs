pub mod clock;
pub mod event;
pub mod motion;
pub mod player;
pub mod step;
pub mod world;
