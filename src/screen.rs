//! Adapter from an `embedded-graphics` draw target to the engine's display
//! interfaces.

use embedded_graphics::{
    mono_font::{
        MonoTextStyle,
        ascii::FONT_6X10,
    },
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{
        PrimitiveStyle,
        Rectangle,
    },
    text::{
        Baseline,
        Text,
    },
};
use heapless::String;

use crate::{
    config::{
        FIELD_W,
        HUD_H,
        READOUT_LEN,
    },
    io::{
        StatusReadout,
        Surface,
    },
    sprite::{
        Canvas,
        Raster as _,
    },
};

/// Background of the status strip.
pub const HUD_BG: Rgb565 = Rgb565::new(2, 4, 6);

/// A draw target used both as the blit surface and as the status readout.
///
/// Status text goes into a strip across the top of the screen.
pub struct Screen<D> {
    target: D,
    text: String<READOUT_LEN>,
}

impl<D> Screen<D> {
    pub const fn new(target: D) -> Self {
        Self {
            target,
            text: String::new(),
        }
    }

    pub const fn target(&self) -> &D {
        &self.target
    }

    pub const fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }

    /// The text most recently sent to the readout, after truncation.
    pub fn last_text(&self) -> &str {
        self.text.as_str()
    }
}

impl<D: DrawTarget<Color = Rgb565>> Surface for Screen<D> {
    type Error = D::Error;

    fn blit<const N: usize>(&mut self, origin: Point, canvas: &Canvas<N>) -> Result<(), Self::Error> {
        let area = Rectangle::new(origin, canvas.size());
        self.target
            .fill_contiguous(&area, canvas.pixels().iter().copied())
    }
}

impl<D: DrawTarget<Color = Rgb565>> StatusReadout for Screen<D> {
    fn display_text(&mut self, text: &str, max_len: usize) {
        self.text.clear();
        for ch in text.chars().take(max_len) {
            if self.text.push(ch).is_err() {
                break;
            }
        }

        let strip = Rectangle::new(Point::zero(), Size::new(FIELD_W, HUD_H));
        if strip
            .into_styled(PrimitiveStyle::with_fill(HUD_BG))
            .draw(&mut self.target)
            .is_err()
        {
            error!("status strip clear failed");
            return;
        }

        let style = MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE);
        if Text::with_baseline(self.text.as_str(), Point::new(2, 1), style, Baseline::Top)
            .draw(&mut self.target)
            .is_err()
        {
            error!("status text draw failed");
        }
    }
}
