//! # flappy-badge
//!
//! A side-scrolling "flappy" game engine for small microcontrollers with a
//! pixel display and no room for a frame buffer, plus board support for the
//! Disobey 2026 badge.
//!
//! The engine is hardware-agnostic:
//! - **Game state** ([`state`]): bird and obstacle kinematics, score
//! - **Engine** ([`engine`]): velocity, collision and scoring per tick
//! - **Scheduler** ([`scheduler`]): the two periodic tasks and the state they share
//! - **Compositor** ([`compositor`], [`sprite`], [`screen`]): partial redraw by
//!   re-sampling the background under moving sprites
//! - **Store** ([`store`]): high score on an I2C EEPROM with its write settle delay
//! - **Session** ([`session`]): the foreground Idle/Playing/Over flow
//!
//! With the `badge` feature the crate also brings up the badge's display,
//! buttons and EEPROM header.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! let peripherals = flappy_badge::init();
//! let resources = flappy_badge::split_resources!(peripherals);
//!
//! let display: flappy_badge::Display = resources.display.into();
//! let buttons: flappy_badge::Buttons = resources.buttons.into();
//! let eeprom: flappy_badge::BadgeEeprom = resources.eeprom.into();
//! ```

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod compositor;
pub mod config;
pub mod engine;
pub mod io;
pub mod rng;
pub mod scheduler;
pub mod screen;
pub mod session;
pub mod sprite;
pub mod state;
pub mod store;

#[cfg(test)]
mod testing;

pub use compositor::{
    Compositor,
    SpriteCompositor,
};
pub use config::Config;
pub use engine::Tick;
pub use io::{
    DigitalInput,
    Line,
    StatusReadout,
    Surface,
};
pub use rng::{
    RandomSource,
    XorShift32,
};
pub use scheduler::{
    InputTask,
    RenderJob,
    RenderTask,
    SharedGame,
};
pub use screen::Screen;
pub use session::Session;
pub use state::GameState;
pub use store::{
    Eeprom,
    PersistentStore,
};

#[cfg(feature = "badge")]
mod board;
#[cfg(feature = "badge")]
mod buttons;
#[cfg(feature = "badge")]
mod display;

#[cfg(feature = "badge")]
pub use board::*;
#[cfg(feature = "badge")]
pub use buttons::Buttons;
#[cfg(feature = "badge")]
pub use display::Display;
