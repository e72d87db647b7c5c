//! Whole rounds played on the host: both periodic tasks interleaved by hand,
//! the real compositor drawing into memory, and the high score kept in a
//! fake EEPROM.

use core::{
    cell::Cell,
    convert::Infallible,
};

use embassy_futures::block_on;
use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{
        PointsIter,
        Rectangle,
    },
};
use flappy_badge::{
    Config,
    DigitalInput,
    InputTask,
    Line,
    PersistentStore,
    RenderJob,
    RenderTask,
    Screen,
    Session,
    SharedGame,
    SpriteCompositor,
    XorShift32,
    compositor::Compositor,
    config::{
        FIELD_H,
        FIELD_W,
        HUD_H,
    },
    scheduler::{
        Control,
        Periodic,
    },
    session::Record,
    store::ByteStore,
};

struct Panel {
    pixels: Vec<Rgb565>,
}

impl Panel {
    fn new() -> Self {
        Self {
            pixels: vec![Rgb565::BLACK; (FIELD_W * FIELD_H) as usize],
        }
    }

    fn at(&self, x: u32, y: u32) -> Rgb565 {
        self.pixels[(y * FIELD_W + x) as usize]
    }
}

impl OriginDimensions for Panel {
    fn size(&self) -> Size {
        Size::new(FIELD_W, FIELD_H)
    }
}

impl DrawTarget for Panel {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Rgb565>>,
    {
        for Pixel(p, color) in pixels {
            if p.x >= 0 && p.y >= 0 && (p.x as u32) < FIELD_W && (p.y as u32) < FIELD_H {
                self.pixels[(p.y as u32 * FIELD_W + p.x as u32) as usize] = color;
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct Eeprom {
    cells: Vec<u8>,
    writes: usize,
}

impl ByteStore for Eeprom {
    type Error = Infallible;

    async fn write(&mut self, address: u16, byte: u8) -> Result<(), Infallible> {
        let address = usize::from(address);
        if self.cells.len() <= address {
            self.cells.resize(address + 1, 0xFF);
        }
        self.cells[address] = byte;
        self.writes += 1;
        Ok(())
    }

    async fn read(&mut self, address: u16) -> Result<u8, Infallible> {
        Ok(self.cells.get(usize::from(address)).copied().unwrap_or(0xFF))
    }
}

#[derive(Default)]
struct Settle {
    ms: u64,
}

impl embedded_hal_async::delay::DelayNs for Settle {
    async fn delay_ns(&mut self, ns: u32) {
        self.ms += u64::from(ns) / 1_000_000;
    }
}

/// Holds the flap line while the bird is below a point near the bottom of
/// the live gap.
struct Autopilot<'a> {
    shared: &'a SharedGame,
    flying: &'a Cell<bool>,
}

impl DigitalInput for Autopilot<'_> {
    fn read(&mut self, line: Line) -> bool {
        match line {
            Line::Flap if self.flying.get() => {
                let state = self.shared.snapshot();
                state.bird.x < state.gap.offset + 20
            }
            _ => false,
        }
    }
}

type Scene = SpriteCompositor<Screen<Panel>>;

/// Tick both tasks until the render task disarms, grounding the bird once
/// the readout shows `stop_at`.
fn play_round(
    shared: &SharedGame,
    config: &Config,
    scene: &mut Scene,
    rng: XorShift32,
    stop_at: Option<&str>,
) -> XorShift32 {
    let flying = Cell::new(stop_at.is_some());
    let mut input = InputTask::new(
        shared,
        config,
        Autopilot {
            shared,
            flying: &flying,
        },
    );
    let mut render = RenderTask::new(
        shared,
        config,
        RenderJob {
            compositor: &mut *scene,
            rng,
        },
    );

    for _ in 0..5_000 {
        input.tick();
        if render.tick() == Control::Disarm {
            return render.into_job().rng;
        }
        if stop_at.is_some_and(|text| render.job().compositor.surface().last_text() == text) {
            flying.set(false);
        }
    }
    panic!("round never ended");
}

#[test]
fn rounds_score_and_keep_the_best() {
    let config = Config::DEFAULT;
    let shared = SharedGame::new(&config);
    let mut scene = SpriteCompositor::new(Screen::new(Panel::new()));
    let mut store = PersistentStore::new(Eeprom::default(), Settle::default());
    let mut session = Session::new();
    let mut rng = XorShift32::new(0x5EED);

    // Erased EEPROM: no record yet.
    assert_eq!(block_on(session.open(&mut store, &mut scene)), Some(0));
    assert_eq!(scene.surface().last_text(), "HI 0");

    // Round one: fly through three pipes, then give up.
    session.begin().unwrap();
    let gap = flappy_badge::engine::next_gap_offset(&config, &mut rng);
    shared.with(|state| state.reset(&config, gap));
    scene.begin(&shared.snapshot());
    rng = play_round(&shared, &config, &mut scene, rng, Some("3"));
    session.end().unwrap();

    let first = shared.snapshot();
    assert!(first.game_over);
    assert_eq!(first.score, 3);
    assert_eq!(block_on(session.close(&mut store, first.score)), Some(Record::NewBest { previous: 0 }));

    // Something was written into the status strip.
    let hud = Rectangle::new(Point::zero(), Size::new(FIELD_W, HUD_H));
    assert!(hud.points().any(|p| scene.surface().target().at(p.x as u32, p.y as u32) == Rgb565::WHITE));

    // Round two: never flap, crash on the floor with nothing scored.
    session.reset().unwrap();
    assert_eq!(block_on(session.open(&mut store, &mut scene)), Some(3));
    session.begin().unwrap();
    shared.with(|state| state.reset(&config, gap));
    scene.begin(&shared.snapshot());
    play_round(&shared, &config, &mut scene, rng, None);
    session.end().unwrap();

    let second = shared.snapshot();
    assert_eq!(second.score, 0);
    assert_eq!(block_on(session.close(&mut store, second.score)), Some(Record::Kept { best: 3 }));

    let (eeprom, settle) = store.into_inner();
    assert_eq!(eeprom.writes, 4);
    assert_eq!(&eeprom.cells[..4], &3_u32.to_le_bytes());
    assert_eq!(settle.ms, 4 * 5);
}

#[test]
fn disarmed_render_task_leaves_the_record_alone() {
    let config = Config::DEFAULT;
    let shared = SharedGame::new(&config);
    let mut scene = SpriteCompositor::new(Screen::new(Panel::new()));
    play_round(&shared, &config, &mut scene, XorShift32::new(1), None);
    let over = shared.snapshot();

    // Re-arming on a finished game draws nothing and changes nothing.
    let mut render = RenderTask::new(
        &shared,
        &config,
        RenderJob {
            compositor: &mut scene,
            rng: XorShift32::new(2),
        },
    );
    assert_eq!(render.tick(), Control::Disarm);
    assert_eq!(shared.snapshot(), over);
}
