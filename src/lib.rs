//! A Flappy Bird clone for the terminal.
//!
//! [`game::GameLoop`] owns the whole simulation and is advanced once per frame;
//! everything else is a collaborator around it: [`render`] draws it,
//! [`input`] feeds it, [`store`] remembers the best score, [`appearance`]
//! swaps in custom bird faces and [`sound`] beeps.

pub mod appearance;
pub mod bird;
pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod pipe;
pub mod render;
pub mod sound;
pub mod store;
pub mod ticker;

pub use config::{GameConfig, Variant};
pub use error::{Error, Result};
pub use game::{GameEvent, GameLoop, Input, Mode};
