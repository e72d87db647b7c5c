//! Flappy bird for the Disobey 2026 badge.
//!
//! - Start begins a round
//! - Hold A to climb, let go to fall
//! - Fly through the gap in each pipe; touching the ground or a pipe ends
//!   the round
//! - The best score lives in an I2C EEPROM on the expansion header

#![no_std]
#![no_main]

use core::fmt::Write as _;

use defmt::info;
use embassy_executor::Spawner;
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::Channel,
};
use embassy_time::{
    Delay,
    Duration,
    Instant,
    Timer,
};
use esp_backtrace as _;
use esp_hal::timer::timg::TimerGroup;
use esp_println as _;
#[allow(clippy::wildcard_imports)]
use flappy_badge::*;
use flappy_badge::{
    engine,
    scheduler,
};

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

type Scene = SpriteCompositor<Screen<Display<'static>>>;
type Job = RenderJob<&'static mut Scene, XorShift32>;

/// How often the foreground looks for a start press.
const START_POLL: Duration = Duration::from_millis(50);
/// How long the final score stays up before the next round can start.
const GAME_OVER_PAUSE: Duration = Duration::from_secs(2);

static CONFIG: Config = Config::DEFAULT;
static SHARED: SharedGame = SharedGame::new(&Config::DEFAULT);

/// Foreground -> render task: a job to run until the game ends.
static ARM: Channel<CriticalSectionRawMutex, Job, 1> = Channel::new();
/// Render task -> foreground: the job back, game over.
static DONE: Channel<CriticalSectionRawMutex, Job, 1> = Channel::new();

#[embassy_executor::task]
async fn input_task(buttons: Buttons) {
    let mut task = InputTask::new(&SHARED, &CONFIG, buttons);
    scheduler::run(&mut task, CONFIG.input_period).await;
}

#[embassy_executor::task]
async fn render_task() {
    loop {
        let job = ARM.receive().await;
        let mut task = RenderTask::new(&SHARED, &CONFIG, job);
        scheduler::run(&mut task, CONFIG.render_period).await;
        DONE.send(task.into_job()).await;
    }
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let peripherals = flappy_badge::init();
    let resources = split_resources!(peripherals);

    esp_alloc::heap_allocator!(size: 64 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let display: Display<'static> = resources.display.into();
    let buttons: Buttons = resources.buttons.into();
    let eeprom: BadgeEeprom<'static> = resources.eeprom.into();

    let mut scene: &'static mut Scene = mk_static!(Scene, SpriteCompositor::new(Screen::new(display)));
    let mut store = PersistentStore::new(eeprom, Delay);
    let mut session = Session::new();
    let mut rng: Option<XorShift32> = None;

    spawner.must_spawn(input_task(buttons));
    spawner.must_spawn(render_task());

    scene.begin(&SHARED.snapshot());
    session.open(&mut store, &mut *scene).await;
    info!("press Start");

    loop {
        while !SHARED.take_start() {
            Timer::after(START_POLL).await;
        }

        // Seeded from the first press, so every power-up plays differently.
        let mut dice = rng
            .take()
            .unwrap_or_else(|| XorShift32::new(Instant::now().as_ticks() as u32));
        let gap = engine::next_gap_offset(&CONFIG, &mut dice);

        session.begin().unwrap();
        SHARED.with(|state| state.reset(&CONFIG, gap));
        scene.begin(&SHARED.snapshot());
        scene.show_text("0");

        ARM.send(RenderJob {
            compositor: scene,
            rng: dice,
        })
        .await;
        let job = DONE.receive().await;
        scene = job.compositor;
        rng = Some(job.rng);
        session.end().unwrap();

        let score = SHARED.snapshot().score;
        session.close(&mut store, score).await;

        let mut text: heapless::String<12> = heapless::String::new();
        let _ = write!(text, "OVER {score}");
        scene.show_text(&text);
        Timer::after(GAME_OVER_PAUSE).await;

        session.reset().unwrap();
        session.open(&mut store, &mut *scene).await;
        // Presses made during the round or the pause don't count.
        SHARED.take_start();
    }
}
