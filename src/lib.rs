//! NeuroPong: a Pong training ground for evolved neural controllers.
//!
//! Each agent of a generation gets its own ball and pair of paddles. The
//! episode loop feeds the agent observations, applies its paddle moves and
//! scores it by survival, paddle hits and the final miss. Breeding is left to
//! an [`ai::EvolutionDriver`].

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod training;
pub mod ui;

pub use error::{Result, SimError};
