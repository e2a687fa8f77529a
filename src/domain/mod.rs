pub mod combat;
pub mod entity;
pub mod geometry;
pub mod movement;
pub mod rules;
