pub mod combat;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod game;
pub mod geometry;
pub mod input;
pub mod render;
pub mod spawner;
