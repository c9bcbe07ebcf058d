pub mod collision;
pub mod contact;
pub mod corner;
pub mod entity;
pub mod map;
pub mod tile;
