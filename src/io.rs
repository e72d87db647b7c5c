//! Interfaces to the hardware the engine talks to.

use embedded_graphics::prelude::Point;

use crate::sprite::Canvas;

/// Somewhere to put composited pixels.
pub trait Surface {
    type Error;

    /// Draw `canvas` with its top-left corner at `origin`. Synchronous from
    /// the caller's point of view.
    fn blit<const N: usize>(&mut self, origin: Point, canvas: &Canvas<N>) -> Result<(), Self::Error>;
}

/// Short, best-effort status text (score, high score, prompts).
pub trait StatusReadout {
    fn display_text(&mut self, text: &str, max_len: usize);
}

/// Digital input lines the game samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// Held to climb.
    Flap,
    /// Starts a session.
    Start,
}

/// Instantaneous level read of an input line. No debouncing.
pub trait DigitalInput {
    /// `true` while the line is asserted.
    fn read(&mut self, line: Line) -> bool;
}

impl<I: DigitalInput + ?Sized> DigitalInput for &mut I {
    fn read(&mut self, line: Line) -> bool {
        (**self).read(line)
    }
}
