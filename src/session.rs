//! Foreground session flow and the high-score policy.

use core::fmt::Write as _;

use embedded_hal_async::delay::DelayNs;
use heapless::String;

use crate::{
    compositor::Compositor,
    store::{
        ByteStore,
        PersistentStore,
    },
};

/// What an erased medium reads back as.
pub const BLANK_RECORD: u32 = u32::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Waiting for a start press.
    Idle,
    /// Render task armed.
    Playing,
    /// Game over, render task disarmed.
    Over,
}

/// A phase change that is not `Idle -> Playing -> Over -> Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfOrder {
    pub from: Phase,
    pub to: Phase,
}

/// What happened to the stored high score at the end of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Record {
    /// The session beat `previous` and was saved.
    NewBest { previous: u32 },
    /// `best` still stands; nothing was written.
    Kept { best: u32 },
}

/// Phase tracking plus the last high score seen.
#[derive(Debug)]
pub struct Session {
    phase: Phase,
    best: Option<u32>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub const fn new() -> Self {
        Self {
            phase: Phase::Idle,
            best: None,
        }
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// High score as last read or written, if the store has answered.
    pub const fn best(&self) -> Option<u32> {
        self.best
    }

    fn step(&mut self, from: Phase, to: Phase) -> Result<(), OutOfOrder> {
        if self.phase != from {
            return Err(OutOfOrder { from: self.phase, to });
        }
        self.phase = to;
        Ok(())
    }

    /// `Idle -> Playing`.
    pub fn begin(&mut self) -> Result<(), OutOfOrder> {
        self.step(Phase::Idle, Phase::Playing)?;
        info!("session started");
        Ok(())
    }

    /// `Playing -> Over`.
    pub fn end(&mut self) -> Result<(), OutOfOrder> {
        self.step(Phase::Playing, Phase::Over)
    }

    /// `Over -> Idle`.
    pub fn reset(&mut self) -> Result<(), OutOfOrder> {
        self.step(Phase::Over, Phase::Idle)
    }

    /// Read the high score and put it on the status readout.
    ///
    /// A failed read is logged and shown as `HI --`; play goes on without it.
    pub async fn open<B, D, C>(&mut self, store: &mut PersistentStore<B, D>, readout: &mut C) -> Option<u32>
    where
        B: ByteStore,
        D: DelayNs,
        C: Compositor + ?Sized,
    {
        let mut text: String<12> = String::new();
        match store.get_high_score().await {
            Ok(raw) => {
                let best = stored_value(raw);
                self.best = Some(best);
                info!("high score {}", best);
                let _ = write!(text, "HI {best}");
            }
            Err(err) => {
                warn!("high score unavailable: {}", err);
                let _ = text.push_str("HI --");
            }
        }
        readout.show_text(&text);
        self.best
    }

    /// Apply the end-of-session policy for `score`.
    ///
    /// The stored value is re-read and only overwritten when `score` beats
    /// it. Store failures are logged and yield `None`; nothing is retried.
    pub async fn close<B, D>(&mut self, store: &mut PersistentStore<B, D>, score: u32) -> Option<Record>
    where
        B: ByteStore,
        D: DelayNs,
    {
        info!("session over, score {}", score);
        let stored = match store.get_high_score().await {
            Ok(raw) => stored_value(raw),
            Err(err) => {
                warn!("high score unavailable, not saving: {}", err);
                return None;
            }
        };

        if score <= stored {
            self.best = Some(stored);
            return Some(Record::Kept { best: stored });
        }

        match store.save_high_score(score).await {
            Ok(()) => {
                info!("new high score {} (was {})", score, stored);
                self.best = Some(score);
                Some(Record::NewBest { previous: stored })
            }
            Err(err) => {
                error!("saving high score failed: {}", err);
                None
            }
        }
    }
}

/// An erased record counts as no record at all.
const fn stored_value(raw: u32) -> u32 {
    if raw == BLANK_RECORD { 0 } else { raw }
}
