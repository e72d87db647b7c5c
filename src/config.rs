//! Playfield geometry and gameplay tunables.
//!
//! Geometry is fixed at compile time because sprite storage is sized from it.
//! Everything that only changes how the game plays lives in [`Config`].

use embassy_time::Duration;
use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
};

// ── Playfield ───────────────────────────────────────────────────────────────

/// Playfield width in pixels (portrait panel).
pub const FIELD_W: u32 = 170;
/// Playfield height in pixels.
pub const FIELD_H: u32 = 320;

/// Height of the status strip at the top of the screen.
pub const HUD_H: u32 = 12;

/// Width of the ground band along the left edge.
pub const GROUND_W: u32 = 10;

/// Pixel value sprites use for "do not paint".
pub const TRANSPARENT: Rgb565 = Rgb565::MAGENTA;

// ── Sprites ─────────────────────────────────────────────────────────────────

pub const BIRD_W: u32 = 19;
pub const BIRD_H: u32 = 19;
/// Transparent margin around the bird; must exceed the largest per-tick move.
pub const BIRD_PAD: u32 = 8;
pub const BIRD_TILE_W: u32 = BIRD_W + 2 * BIRD_PAD;
pub const BIRD_TILE_H: u32 = BIRD_H + 2 * BIRD_PAD;
pub const BIRD_PIXELS: usize = (BIRD_TILE_W * BIRD_TILE_H) as usize;

pub const BARRIER_W: u32 = FIELD_W - 2 * BARRIER_PAD;
pub const BARRIER_H: u32 = 20;
pub const BARRIER_PAD: u32 = 5;
pub const BARRIER_TILE_W: u32 = BARRIER_W + 2 * BARRIER_PAD;
pub const BARRIER_TILE_H: u32 = BARRIER_H + 2 * BARRIER_PAD;
pub const BARRIER_PIXELS: usize = (BARRIER_TILE_W * BARRIER_TILE_H) as usize;
/// Horizontal centre of the obstacle tile.
pub const BARRIER_CENTER_X: i32 = (BARRIER_TILE_W / 2) as i32;

/// Capacity of the transient compositing tile (4 KiB of `Rgb565`).
pub const STRIP_PIXELS: usize = 2048;

/// Longest string the status readout shows.
pub const READOUT_LEN: usize = 8;

// ── Tunables ────────────────────────────────────────────────────────────────

/// Gameplay tunables shared by the periodic tasks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Bird altitude at reset.
    pub bird_x0: i32,
    /// Bird position along the scroll axis (never changes).
    pub bird_y: i32,
    /// Velocity at reset.
    pub bird_v0: i32,
    /// Acceleration applied every input tick.
    pub gravity: i32,
    /// Reaching this altitude ends the game.
    pub bird_min_x: i32,
    /// Altitude ceiling; the bird is clamped here.
    pub bird_max_x: i32,
    /// Lower velocity clamp.
    pub v_min: i32,
    /// Velocity set while the flap line is asserted; also the upper clamp.
    pub v_boost: i32,

    /// Obstacle centre at (re)spawn.
    pub barrier_start: i32,
    /// Once the obstacle centre drops below this it respawns.
    pub barrier_reset: i32,
    /// Obstacle scroll per render tick.
    pub barrier_speed: i32,
    /// Half height of the band in which the bird and obstacle overlap.
    pub band_half_height: i32,

    pub gap_width: i32,
    pub gap_offset_min: i32,
    /// Gap offsets are drawn from `gap_offset_min..gap_offset_min + span`.
    pub gap_offset_span: u32,

    /// Period of the input/velocity task.
    pub input_period: Duration,
    /// Period of the render/collision task.
    pub render_period: Duration,
}

impl Config {
    pub const DEFAULT: Self = Self {
        bird_x0: 85,
        bird_y: 140,
        bird_v0: 3,
        gravity: -1,
        bird_min_x: 20,
        bird_max_x: 150,
        v_min: -7,
        v_boost: 6,

        barrier_start: FIELD_H as i32 - (BARRIER_TILE_H / 2) as i32,
        barrier_reset: 100,
        barrier_speed: 2,
        band_half_height: ((BARRIER_H + BIRD_H) / 2) as i32,

        gap_width: 50,
        gap_offset_min: 30,
        gap_offset_span: 80,

        input_period: Duration::from_millis(25),
        render_period: Duration::from_millis(30),
    };

    #[must_use]
    pub const fn with_gravity(mut self, gravity: i32) -> Self {
        self.gravity = gravity;
        self
    }

    #[must_use]
    pub const fn with_velocity_limits(mut self, v_min: i32, v_boost: i32) -> Self {
        self.v_min = v_min;
        self.v_boost = v_boost;
        self
    }

    #[must_use]
    pub const fn with_barrier_speed(mut self, speed: i32) -> Self {
        self.barrier_speed = speed;
        self
    }

    #[must_use]
    pub const fn with_gap(mut self, width: i32, offset_min: i32, offset_span: u32) -> Self {
        self.gap_width = width;
        self.gap_offset_min = offset_min;
        self.gap_offset_span = offset_span;
        self
    }

    #[must_use]
    pub const fn with_periods(mut self, input: Duration, render: Duration) -> Self {
        self.input_period = input;
        self.render_period = render;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}
