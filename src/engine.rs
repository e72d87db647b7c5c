//! Physics, collision and scoring.
//!
//! Each periodic task body is split into a state half that runs inside the
//! critical section ([`input_tick`], [`advance`]) and a drawing half that
//! runs outside it ([`present`]). The state half returns everything the
//! drawing half needs, so nothing is read back from the shared state while
//! pixels are being pushed.

use embedded_graphics::prelude::Point;

use crate::{
    compositor::Compositor,
    config::Config,
    rng::RandomSource,
    state::{
        GameState,
        Gap,
    },
};

/// Why the game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Crash {
    /// Bird hit the ground.
    Floor,
    /// Bird was in the obstacle band outside the gap.
    Barrier,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BarrierStep {
    /// Obstacle moved to `pos`.
    Scrolled { pos: i32 },
    /// Obstacle went off the end and was re-created at the start with `gap`.
    Respawned { gap: Gap },
}

/// What a live render tick changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    pub bird: Point,
    pub barrier: BarrierStep,
    pub score: u32,
    /// The bird cleared an obstacle this tick.
    pub scored: bool,
}

/// Outcome of one render tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tick {
    /// Game was already over; nothing changed.
    Halted,
    /// Game ended this tick. Nothing is drawn.
    Crashed(Crash),
    Advanced(Frame),
}

impl Tick {
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Advanced(_))
    }
}

/// Input/velocity task body.
///
/// Gravity pulls the velocity down to `v_min`; while `pressed` the velocity
/// is set to `v_boost` outright, so holding the line never stacks.
pub fn input_tick(state: &mut GameState, config: &Config, pressed: bool) {
    let bird = &mut state.bird;
    bird.v = bird.v.saturating_add(bird.a).max(config.v_min);
    if pressed {
        bird.v = config.v_boost;
    }
    bird.v = bird.v.clamp(config.v_min, config.v_boost);
}

/// Draw a gap offset from `gap_offset_min..gap_offset_min + gap_offset_span`.
pub fn next_gap_offset<R: RandomSource + ?Sized>(config: &Config, rng: &mut R) -> i32 {
    let roll = rng.next().checked_rem(config.gap_offset_span).unwrap_or(0);
    config.gap_offset_min + roll as i32
}

/// State half of the render/collision task body.
///
/// Collision and scoring look at the gap as it was at the start of the tick;
/// a respawn only takes effect for the next one.
pub fn advance<R: RandomSource + ?Sized>(state: &mut GameState, config: &Config, rng: &mut R) -> Tick {
    if state.game_over {
        return Tick::Halted;
    }

    let bird = &mut state.bird;
    bird.x = bird.x.saturating_add(bird.v);
    if bird.x <= config.bird_min_x {
        state.game_over = true;
        return Tick::Crashed(Crash::Floor);
    }

    let mut scored = false;
    if (bird.y - state.barrier.pos).abs() <= config.band_half_height {
        state.in_gap = true;
        if !state.gap.contains(bird.x) {
            state.game_over = true;
            return Tick::Crashed(Crash::Barrier);
        }
    } else if state.in_gap {
        state.score = state.score.saturating_add(1);
        state.in_gap = false;
        scored = true;
    }

    bird.x = bird.x.min(config.bird_max_x);
    let bird = Point::new(bird.x, bird.y);

    state.barrier.pos -= config.barrier_speed;
    let barrier = if state.barrier.pos < config.barrier_reset {
        state.barrier.pos = config.barrier_start;
        state.gap.offset = next_gap_offset(config, rng);
        debug!("obstacle respawned, gap at {}", state.gap.offset);
        BarrierStep::Respawned { gap: state.gap }
    } else {
        BarrierStep::Scrolled {
            pos: state.barrier.pos,
        }
    };

    Tick::Advanced(Frame {
        bird,
        barrier,
        score: state.score,
        scored,
    })
}

/// Drawing half of the render/collision task body.
pub fn present<C: Compositor + ?Sized>(tick: &Tick, compositor: &mut C) {
    let Tick::Advanced(frame) = tick else {
        return;
    };
    match frame.barrier {
        BarrierStep::Scrolled { pos } => {
            compositor.draw_bird(frame.bird, Some(pos));
            compositor.draw_barrier(pos, frame.bird);
        }
        BarrierStep::Respawned { gap } => compositor.respawn(frame.bird, gap, frame.score),
    }
}

/// One whole render tick against an exclusively borrowed state.
pub fn render_tick<C, R>(state: &mut GameState, config: &Config, compositor: &mut C, rng: &mut R) -> Tick
where
    C: Compositor + ?Sized,
    R: RandomSource + ?Sized,
{
    let tick = advance(state, config, rng);
    present(&tick, compositor);
    tick
}
