pub mod config;
pub mod direction;
pub mod events;
pub mod game;
pub mod grid;
pub mod levels;
pub mod position;
