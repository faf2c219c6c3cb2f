//! Maze model, move legality, prompt strategies and the probe setup pipeline.

pub mod config;
pub mod error;
pub mod maze;
pub mod message;
pub mod moves;
pub mod path;
pub mod probe;
pub mod prompt;
pub mod reply;
pub mod strategy;

pub use error::{Error, Result};
pub use maze::{Maze, Position};
pub use moves::{Move, legal_moves};
pub use strategy::{Strategy, StrategyRegistry, registry};
