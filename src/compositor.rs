//! Partial-redraw rendering of the playfield.
//!
//! There is no frame buffer. Every redraw re-samples the static backdrop for
//! the region being touched, paints the sprites that fall inside it and
//! blits the result. Large regions are composed in horizontal strips so the
//! scratch tile stays small.
//!
//! Both sprites are composed into every region they intersect, so moving one
//! never wipes the other.

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::Rectangle,
};
use heapless::String;

use crate::{
    config::{
        BARRIER_CENTER_X,
        BARRIER_H,
        BARRIER_PAD,
        BARRIER_PIXELS,
        BARRIER_TILE_H,
        BARRIER_TILE_W,
        BARRIER_W,
        BIRD_PAD,
        BIRD_PIXELS,
        BIRD_TILE_H,
        BIRD_TILE_W,
        FIELD_H,
        FIELD_W,
        GROUND_W,
        HUD_H,
        READOUT_LEN,
        STRIP_PIXELS,
        TRANSPARENT,
    },
    io::{
        StatusReadout,
        Surface,
    },
    screen::HUD_BG,
    sprite::{
        Canvas,
        Raster,
        RasterMut as _,
        Sprite,
        extract,
        overlay,
    },
    state::{
        GameState,
        Gap,
    },
};

/// What the engine draws through.
///
/// Positions are sprite centres in playfield coordinates: `x` is altitude,
/// `y` runs along the scroll axis.
pub trait Compositor {
    /// Paint the whole playfield for a freshly reset session.
    fn begin(&mut self, state: &GameState);

    /// Redraw the bird at `bird`. `barrier` is the obstacle centre if it is
    /// on screen.
    fn draw_bird(&mut self, bird: Point, barrier: Option<i32>);

    /// Redraw the obstacle centred on `pos`.
    fn draw_barrier(&mut self, pos: i32, bird: Point);

    /// Wipe the playfield, rebuild the obstacle around `gap` and report
    /// `score`. The new obstacle shows up on the next [`Self::draw_barrier`].
    fn respawn(&mut self, bird: Point, gap: Gap, score: u32);

    fn show_text(&mut self, text: &str);
}

impl<C: Compositor + ?Sized> Compositor for &mut C {
    fn begin(&mut self, state: &GameState) {
        (**self).begin(state);
    }

    fn draw_bird(&mut self, bird: Point, barrier: Option<i32>) {
        (**self).draw_bird(bird, barrier);
    }

    fn draw_barrier(&mut self, pos: i32, bird: Point) {
        (**self).draw_barrier(pos, bird);
    }

    fn respawn(&mut self, bird: Point, gap: Gap, score: u32) {
        (**self).respawn(bird, gap, score);
    }

    fn show_text(&mut self, text: &str) {
        (**self).show_text(text);
    }
}

// ── Artwork ─────────────────────────────────────────────────────────────────

const SKY_LOW: (u8, u8) = (8, 36);
const GROUND_DARK: Rgb565 = Rgb565::new(12, 20, 2);
const GROUND_LIGHT: Rgb565 = Rgb565::new(18, 34, 4);
const PIPE_EDGE: Rgb565 = Rgb565::new(2, 16, 2);
const PIPE_LIGHT: Rgb565 = Rgb565::new(14, 60, 10);
const PIPE_BODY: Rgb565 = Rgb565::new(6, 46, 4);

/// Beak points along +y, the direction of travel.
const BIRD_ART: [&str; 19] = [
    ".......KKKKK.......",
    ".....KKYYYYYKK.....",
    "....KYYYYYYYYYK....",
    "...KYYYYYYYYYYYK...",
    "..KYYYYYYYYYYYYYK..",
    "..KYYYYYYYYYYYYYK..",
    ".KWWWYYYYYYYYYYYYK.",
    ".KWWWWYYYYYYYYYYYK.",
    ".KWWWWYYYYYYYYYYYK.",
    ".KWWWYYYYYYYYWWWYK.",
    ".KYYYYYYYYYYWWKWYK.",
    "..KYYYYYYYYYWWKWK..",
    "..KYYYYYYYYYYWWWK..",
    "...KYYYYYYYYYYYK...",
    "....KYYYYOOOYYK....",
    ".....KKKOOOOOKK....",
    ".......KOOOOOK.....",
    "........KOOOK......",
    ".........KKK.......",
];

fn bird_palette(c: char) -> Option<Rgb565> {
    match c {
        'K' => Some(Rgb565::BLACK),
        'Y' => Some(Rgb565::YELLOW),
        'W' => Some(Rgb565::WHITE),
        'O' => Some(Rgb565::CSS_ORANGE),
        _ => None,
    }
}

/// The static picture behind the sprites: status strip, ground band along
/// the low-altitude edge, sky brightening with altitude.
#[derive(Clone, Copy, Debug, Default)]
pub struct Backdrop;

impl Raster for Backdrop {
    fn size(&self) -> Size {
        Size::new(FIELD_W, FIELD_H)
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb565 {
        if y < HUD_H {
            return HUD_BG;
        }
        if x < GROUND_W {
            return if ((x + y) / 3) % 2 == 0 { GROUND_DARK } else { GROUND_LIGHT };
        }
        let t = (x - GROUND_W) * 24 / (FIELD_W - GROUND_W);
        Rgb565::new(SKY_LOW.0 + (t / 2) as u8, SKY_LOW.1 + t as u8, 31)
    }
}

// ── Compositing ─────────────────────────────────────────────────────────────

/// A sprite placed somewhere on the playfield.
struct Layer<'a> {
    raster: &'a dyn Raster,
    origin: Point,
    key: Rgb565,
}

fn field() -> Rectangle {
    Rectangle::new(Point::zero(), Size::new(FIELD_W, FIELD_H))
}

/// Tile covering the bird sprite centred on `bird`.
pub fn bird_region(bird: Point) -> Rectangle {
    Rectangle::new(
        bird - Point::new((BIRD_TILE_W / 2) as i32, (BIRD_TILE_H / 2) as i32),
        Size::new(BIRD_TILE_W, BIRD_TILE_H),
    )
}

/// Tile covering the obstacle sprite centred on `pos`.
pub fn barrier_region(pos: i32) -> Rectangle {
    Rectangle::new(
        Point::new(
            BARRIER_CENTER_X - (BARRIER_TILE_W / 2) as i32,
            pos - (BARRIER_TILE_H / 2) as i32,
        ),
        Size::new(BARRIER_TILE_W, BARRIER_TILE_H),
    )
}

/// Re-sample `backdrop` over `region`, paint `layers` in order and blit.
fn compose<S: Surface>(surface: &mut S, backdrop: &Backdrop, region: Rectangle, layers: &[Layer<'_>]) {
    let region = region.intersection(&field());
    let width = region.size.width.min(STRIP_PIXELS as u32);
    if width == 0 {
        return;
    }
    let rows_per_strip = STRIP_PIXELS as u32 / width;

    let mut row = 0;
    while row < region.size.height {
        let rows = rows_per_strip.min(region.size.height - row);
        let origin = region.top_left + Point::new(0, row as i32);

        let mut tile = Canvas::<STRIP_PIXELS>::new(width, rows, Rgb565::BLACK);
        extract(&mut tile, backdrop, origin);
        for layer in layers {
            overlay(&mut tile, layer.origin - origin, layer.raster, layer.key);
        }
        if surface.blit(origin, &tile).is_err() {
            error!("blit at ({}, {}) failed", origin.x, origin.y);
        }

        row += rows;
    }
}

/// [`Compositor`] that redraws only the tiles around moving sprites.
pub struct SpriteCompositor<S> {
    surface: S,
    backdrop: Backdrop,
    bird: Sprite<BIRD_PIXELS>,
    barrier: Sprite<BARRIER_PIXELS>,
}

impl<S: Surface + StatusReadout> SpriteCompositor<S> {
    pub fn new(surface: S) -> Self {
        let mut bird = Sprite::blank(BIRD_TILE_W, BIRD_TILE_H, TRANSPARENT);
        bird.paint_art(
            Point::new(BIRD_PAD as i32, BIRD_PAD as i32),
            &BIRD_ART,
            bird_palette,
        );

        let mut compositor = Self {
            surface,
            backdrop: Backdrop,
            bird,
            barrier: Sprite::blank(BARRIER_TILE_W, BARRIER_TILE_H, TRANSPARENT),
        };
        compositor.rebuild_barrier(Gap {
            offset: 0,
            width: -1,
        });
        compositor
    }

    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub const fn bird_sprite(&self) -> &Sprite<BIRD_PIXELS> {
        &self.bird
    }

    pub const fn barrier_sprite(&self) -> &Sprite<BARRIER_PIXELS> {
        &self.barrier
    }

    /// Repaint the obstacle sprite with `gap` cut out of it.
    pub fn rebuild_barrier(&mut self, gap: Gap) {
        let canvas = &mut self.barrier.canvas;
        canvas.fill(self.barrier.key);

        for y in 0..BARRIER_H {
            for x in 0..BARRIER_W {
                let edge = y == 0 || y == BARRIER_H - 1 || x == 0 || x == BARRIER_W - 1;
                let color = if edge {
                    PIPE_EDGE
                } else if y < 4 {
                    PIPE_LIGHT
                } else {
                    PIPE_BODY
                };
                canvas.set_pixel(BARRIER_PAD + x, BARRIER_PAD + y, color);
            }
        }

        let left = barrier_region(0).top_left.x;
        for col in 0..BARRIER_TILE_W {
            if gap.contains(left + col as i32) {
                for row in 0..BARRIER_TILE_H {
                    canvas.set_pixel(col, row, self.barrier.key);
                }
            }
        }
    }

    fn bird_layer(sprite: &Sprite<BIRD_PIXELS>, bird: Point) -> Layer<'_> {
        Layer {
            raster: sprite,
            origin: bird_region(bird).top_left,
            key: sprite.key,
        }
    }

    fn barrier_layer(sprite: &Sprite<BARRIER_PIXELS>, pos: i32) -> Layer<'_> {
        Layer {
            raster: sprite,
            origin: barrier_region(pos).top_left,
            key: sprite.key,
        }
    }

    fn show_score(&mut self, score: u32) {
        let mut text: String<12> = String::new();
        if core::fmt::write(&mut text, format_args!("{score}")).is_ok() {
            self.show_text(&text);
        }
    }
}

impl<S: Surface + StatusReadout> Compositor for SpriteCompositor<S> {
    fn begin(&mut self, state: &GameState) {
        self.rebuild_barrier(state.gap);
        let bird = Point::new(state.bird.x, state.bird.y);
        compose(
            &mut self.surface,
            &self.backdrop,
            field(),
            &[
                Self::barrier_layer(&self.barrier, state.barrier.pos),
                Self::bird_layer(&self.bird, bird),
            ],
        );
    }

    fn draw_bird(&mut self, bird: Point, barrier: Option<i32>) {
        let bird_layer = Self::bird_layer(&self.bird, bird);
        match barrier {
            Some(pos) => compose(
                &mut self.surface,
                &self.backdrop,
                bird_region(bird),
                &[Self::barrier_layer(&self.barrier, pos), bird_layer],
            ),
            None => compose(&mut self.surface, &self.backdrop, bird_region(bird), &[bird_layer]),
        }
    }

    fn draw_barrier(&mut self, pos: i32, bird: Point) {
        compose(
            &mut self.surface,
            &self.backdrop,
            barrier_region(pos),
            &[
                Self::barrier_layer(&self.barrier, pos),
                Self::bird_layer(&self.bird, bird),
            ],
        );
    }

    fn respawn(&mut self, bird: Point, gap: Gap, score: u32) {
        compose(
            &mut self.surface,
            &self.backdrop,
            field(),
            &[Self::bird_layer(&self.bird, bird)],
        );
        self.rebuild_barrier(gap);
        self.show_score(score);
    }

    fn show_text(&mut self, text: &str) {
        self.surface.display_text(text, READOUT_LEN);
    }
}
