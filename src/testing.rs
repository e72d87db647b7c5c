//! Host-side stand-ins for the display, input and store.

use std::{
    string::{
        String,
        ToString as _,
    },
    vec::Vec,
};

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{
        PointsIter,
        Rectangle,
    },
};

use crate::{
    compositor::Compositor,
    config::{
        FIELD_H,
        FIELD_W,
    },
    io::{
        DigitalInput,
        Line,
    },
    rng::RandomSource,
    state::{
        GameState,
        Gap,
    },
    store::ByteStore,
};

/// In-memory panel that records every rectangle fill it receives.
pub struct Framebuffer {
    size: Size,
    pixels: Vec<Rgb565>,
    pub fills: Vec<Rectangle>,
}

impl Framebuffer {
    pub fn new() -> Self {
        Self::with_size(Size::new(FIELD_W, FIELD_H))
    }

    pub fn with_size(size: Size) -> Self {
        Self {
            size,
            pixels: vec![Rgb565::BLACK; (size.width * size.height) as usize],
            fills: Vec::new(),
        }
    }

    pub fn at(&self, x: i32, y: i32) -> Rgb565 {
        self.pixels[(y as u32 * self.size.width + x as u32) as usize]
    }

    fn set(&mut self, p: Point, color: Rgb565) {
        if p.x >= 0 && p.y >= 0 && (p.x as u32) < self.size.width && (p.y as u32) < self.size.height {
            let i = (p.y as u32 * self.size.width + p.x as u32) as usize;
            self.pixels[i] = color;
        }
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            self.set(p, color);
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.fills.push(*area);
        for (p, color) in area.points().zip(colors) {
            self.set(p, color);
        }
        Ok(())
    }
}

/// Input lines driven directly by the test.
#[derive(Default)]
pub struct Lines {
    pub flap: bool,
    pub start: bool,
}

impl DigitalInput for Lines {
    fn read(&mut self, line: Line) -> bool {
        match line {
            Line::Flap => self.flap,
            Line::Start => self.start,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Busy;

/// Byte store backed by a small array, with optional failure injection.
pub struct MemStore {
    pub bytes: [u8; 16],
    pub writes: Vec<(u16, u8)>,
    pub reads: usize,
    /// Fail every write once this many have succeeded.
    pub fail_writes_after: Option<usize>,
    /// Fail every read once this many have succeeded.
    pub fail_reads_after: Option<usize>,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            bytes: [0xFF; 16],
            writes: Vec::new(),
            reads: 0,
            fail_writes_after: None,
            fail_reads_after: None,
        }
    }
}

impl ByteStore for MemStore {
    type Error = Busy;

    async fn write(&mut self, address: u16, byte: u8) -> Result<(), Busy> {
        if self.fail_writes_after.is_some_and(|n| self.writes.len() >= n) {
            return Err(Busy);
        }
        self.bytes[address as usize] = byte;
        self.writes.push((address, byte));
        Ok(())
    }

    async fn read(&mut self, address: u16) -> Result<u8, Busy> {
        if self.fail_reads_after.is_some_and(|n| self.reads >= n) {
            return Err(Busy);
        }
        self.reads += 1;
        Ok(self.bytes[address as usize])
    }
}

/// Async delay that only adds up how long it was asked to wait.
#[derive(Default)]
pub struct Stopwatch {
    pub waited_ns: u64,
    pub calls: usize,
}

impl embedded_hal_async::delay::DelayNs for Stopwatch {
    async fn delay_ns(&mut self, ns: u32) {
        self.waited_ns += u64::from(ns);
        self.calls += 1;
    }
}

/// One call made through [`Recorder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Draw {
    Begin,
    Bird(Point, Option<i32>),
    Barrier(i32, Point),
    Respawn(Point, Gap, u32),
    Text(String),
}

/// Compositor that only remembers what it was asked to draw.
#[derive(Default)]
pub struct Recorder {
    pub calls: Vec<Draw>,
}

impl Compositor for Recorder {
    fn begin(&mut self, _state: &GameState) {
        self.calls.push(Draw::Begin);
    }

    fn draw_bird(&mut self, bird: Point, barrier: Option<i32>) {
        self.calls.push(Draw::Bird(bird, barrier));
    }

    fn draw_barrier(&mut self, pos: i32, bird: Point) {
        self.calls.push(Draw::Barrier(pos, bird));
    }

    fn respawn(&mut self, bird: Point, gap: Gap, score: u32) {
        self.calls.push(Draw::Respawn(bird, gap, score));
    }

    fn show_text(&mut self, text: &str) {
        self.calls.push(Draw::Text(text.to_string()));
    }
}

/// Replays a fixed list of words, then repeats the last one.
pub struct Sequence {
    words: Vec<u32>,
    next: usize,
}

impl Sequence {
    pub fn new(words: &[u32]) -> Self {
        Self {
            words: words.to_vec(),
            next: 0,
        }
    }
}

impl RandomSource for Sequence {
    fn next(&mut self) -> u32 {
        let word = self.words[self.next.min(self.words.len() - 1)];
        self.next += 1;
        word
    }
}
