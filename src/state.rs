//! The mutable game record shared by the periodic tasks.

use crate::config::Config;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bird {
    /// Altitude. The only coordinate that moves.
    pub x: i32,
    pub y: i32,
    pub v: i32,
    pub a: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Barrier {
    /// Centre of the obstacle along the scroll axis.
    pub pos: i32,
}

/// The passable opening of the live obstacle, along the bird's altitude axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gap {
    pub offset: i32,
    pub width: i32,
}

impl Gap {
    /// Whether altitude `x` lies in `[offset, offset + width]`.
    pub const fn contains(&self, x: i32) -> bool {
        x >= self.offset && x <= self.offset + self.width
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GameState {
    pub bird: Bird,
    pub barrier: Barrier,
    pub gap: Gap,
    pub score: u32,
    /// Set while the bird sits inside the obstacle band.
    pub in_gap: bool,
    /// Only ever goes false -> true; cleared by [`GameState::reset`].
    pub game_over: bool,
}

impl GameState {
    /// Fresh state with the gap at the bottom of its range.
    pub const fn new(config: &Config) -> Self {
        Self {
            bird: Bird {
                x: config.bird_x0,
                y: config.bird_y,
                v: config.bird_v0,
                a: config.gravity,
            },
            barrier: Barrier {
                pos: config.barrier_start,
            },
            gap: Gap {
                offset: config.gap_offset_min,
                width: config.gap_width,
            },
            score: 0,
            in_gap: false,
            game_over: false,
        }
    }

    /// Start a new session with the first gap at `gap_offset`.
    pub fn reset(&mut self, config: &Config, gap_offset: i32) {
        *self = Self::new(config);
        self.gap.offset = gap_offset;
    }
}
