//! The two periodic tasks and the state they share.
//!
//! The input task and the render task run on their own tickers, independent
//! of each other and of the foreground loop. Everything they share goes
//! through [`SharedGame`]: the game record behind a critical-section mutex
//! that is held only for the record's read-modify-write, and a start latch.
//!
//! The render task is armed by handing it a [`RenderJob`] and disarms itself
//! by returning [`Control::Disarm`] once the game is over, after which the
//! job goes back to whoever armed it.

use core::{
    cell::RefCell,
    sync::atomic::{
        AtomicBool,
        Ordering,
    },
};

use embassy_sync::blocking_mutex::{
    Mutex,
    raw::CriticalSectionRawMutex,
};
use embassy_time::{
    Duration,
    Ticker,
};

use crate::{
    compositor::Compositor,
    config::Config,
    engine::{
        self,
        Tick,
    },
    io::{
        DigitalInput,
        Line,
    },
    rng::RandomSource,
    state::GameState,
};

/// The game record plus the start latch, shareable as a `static`.
pub struct SharedGame {
    state: Mutex<CriticalSectionRawMutex, RefCell<GameState>>,
    start: AtomicBool,
}

impl SharedGame {
    pub const fn new(config: &Config) -> Self {
        Self {
            state: Mutex::new(RefCell::new(GameState::new(config))),
            start: AtomicBool::new(false),
        }
    }

    /// Run `f` on the record inside a critical section.
    ///
    /// Keep `f` short: no drawing, no I/O.
    pub fn with<T>(&self, f: impl FnOnce(&mut GameState) -> T) -> T {
        self.state.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn snapshot(&self) -> GameState {
        self.with(|state| *state)
    }

    pub fn is_over(&self) -> bool {
        self.with(|state| state.game_over)
    }

    pub fn latch_start(&self) {
        self.start.store(true, Ordering::Release);
    }

    /// Consume a pending start request.
    pub fn take_start(&self) -> bool {
        self.start.swap(false, Ordering::AcqRel)
    }
}

/// What a periodic task wants after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Control {
    Continue,
    /// Stop ticking until re-armed.
    Disarm,
}

/// A task body driven at a fixed period.
///
/// `tick` runs to completion without blocking or awaiting.
pub trait Periodic {
    fn tick(&mut self) -> Control;
}

/// Tick `task` every `period` until it disarms.
///
/// Missed deadlines are not made up: the ticker skips ahead.
pub async fn run<T: Periodic + ?Sized>(task: &mut T, period: Duration) {
    let mut ticker = Ticker::every(period);
    loop {
        ticker.next().await;
        if task.tick() == Control::Disarm {
            return;
        }
    }
}

/// Turns level samples into rising-edge events.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeDetector {
    prev: bool,
}

impl EdgeDetector {
    pub const fn new() -> Self {
        Self { prev: false }
    }

    /// `true` when `level` is high and the previous sample was low.
    pub fn rising(&mut self, level: bool) -> bool {
        let edge = level && !self.prev;
        self.prev = level;
        edge
    }
}

/// Input/velocity task: samples the flap line every tick and latches start
/// presses for the foreground.
pub struct InputTask<'a, I> {
    shared: &'a SharedGame,
    config: &'a Config,
    input: I,
    start: EdgeDetector,
}

impl<'a, I: DigitalInput> InputTask<'a, I> {
    pub const fn new(shared: &'a SharedGame, config: &'a Config, input: I) -> Self {
        Self {
            shared,
            config,
            input,
            start: EdgeDetector::new(),
        }
    }
}

impl<I: DigitalInput> Periodic for InputTask<'_, I> {
    fn tick(&mut self) -> Control {
        let pressed = self.input.read(Line::Flap);
        let config = self.config;
        self.shared.with(|state| {
            // The record is frozen once the game is over.
            if !state.game_over {
                engine::input_tick(state, config, pressed);
            }
        });

        if self.start.rising(self.input.read(Line::Start)) {
            self.shared.latch_start();
        }
        Control::Continue
    }
}

/// What the render task needs exclusively while it is armed.
pub struct RenderJob<C, R> {
    pub compositor: C,
    pub rng: R,
}

/// Render/collision task: advances the record, then draws the result.
pub struct RenderTask<'a, C, R> {
    shared: &'a SharedGame,
    config: &'a Config,
    job: RenderJob<C, R>,
}

impl<'a, C: Compositor, R: RandomSource> RenderTask<'a, C, R> {
    /// Arm a render task with `job`.
    pub const fn new(shared: &'a SharedGame, config: &'a Config, job: RenderJob<C, R>) -> Self {
        Self { shared, config, job }
    }

    pub const fn job(&self) -> &RenderJob<C, R> {
        &self.job
    }

    /// Hand the job back.
    pub fn into_job(self) -> RenderJob<C, R> {
        self.job
    }
}

impl<C: Compositor, R: RandomSource> Periodic for RenderTask<'_, C, R> {
    fn tick(&mut self) -> Control {
        let config = self.config;
        let rng = &mut self.job.rng;
        let tick = self.shared.with(|state| engine::advance(state, config, rng));

        engine::present(&tick, &mut self.job.compositor);

        match tick {
            Tick::Advanced(frame) => {
                if frame.scored {
                    info!("score {}", frame.score);
                }
                Control::Continue
            }
            Tick::Crashed(crash) => {
                info!("game over: {}", crash);
                Control::Disarm
            }
            Tick::Halted => Control::Disarm,
        }
    }
}
