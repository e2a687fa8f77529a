pub mod collision;
pub mod event;
pub mod screen;
pub mod spawner;
pub mod step;
pub mod world;
