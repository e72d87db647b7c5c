//! Pin map and bring-up for the Disobey 2026 badge.
//!
//! The EEPROM is not on the badge itself; it hangs off the expansion header
//! on I2C0.

use esp_hal::{
    Async,
    assign_resources,
    clock::{
        Clock,
        CpuClock,
    },
    i2c::master::{
        Config as I2cConfig,
        I2c,
    },
    rom,
    time::Rate,
};

use crate::store::Eeprom;

/// StaticCell helper: moves a value into a `static` exactly once.
#[macro_export]
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write($val);
        x
    }};
}

/// The high-score EEPROM on the expansion header.
pub type BadgeEeprom<'a> = Eeprom<I2c<'a, Async>>;

/// Bus speed for the header EEPROM.
const EEPROM_BUS_KHZ: u32 = 100;

// ── Pin / peripheral assignments ────────────────────────────────────────────

assign_resources! {
    pub Resources<'d> {
        display: DisplayResources<'d> {
            dc: GPIO15,
            rst: GPIO7,
            sck: GPIO4,
            cs: GPIO6,
            miso: GPIO16,
            mosi: GPIO5,
            spi: SPI2,
            dma: DMA_CH0,
            backlight: GPIO19,
        },
        buttons: ButtonResources<'d> {
            a: GPIO13,
            start: GPIO12,
        },
        eeprom: EepromResources<'d> {
            sda: GPIO9,
            scl: GPIO10,
            i2c: I2C0,
        },
        boot: BootResources<'d> {
            pin: GPIO0,
        }
    }
}

// ── Board initialisation ────────────────────────────────────────────────────

/// The ESP32-S3 has to pass through an intermediate CPU clock on its way to
/// the target frequency.
fn set_cpu_clock(cpu_clock_speed: CpuClock) {
    let _ = esp_hal::peripherals::SYSTEM::regs()
        .sysclk_conf()
        .modify(|_, w| unsafe { w.soc_clk_sel().bits(1) });
    let _ = esp_hal::peripherals::SYSTEM::regs()
        .cpu_per_conf()
        .modify(|_, w| unsafe {
            let _ = w.pll_freq_sel().set_bit();
            w.cpuperiod_sel().bits(match cpu_clock_speed {
                CpuClock::_80MHz => 0,
                CpuClock::_160MHz => 1,
                CpuClock::_240MHz => 2,
                _ => panic!("Unsupported CPU clock speed"),
            })
        });

    rom::ets_update_cpu_frequency_rom(cpu_clock_speed.frequency().as_mhz());
}

/// Bring up clocks and return the raw peripheral set.
///
/// Call once at the top of `main`, then split with [`split_resources!`].
#[must_use]
pub fn init() -> esp_hal::peripherals::Peripherals {
    set_cpu_clock(CpuClock::_160MHz);
    esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::max()))
}

// ── Resource → driver conversions ───────────────────────────────────────────

impl From<esp_hal::peripherals::Peripherals> for Resources<'_> {
    fn from(peripherals: esp_hal::peripherals::Peripherals) -> Self {
        split_resources!(peripherals)
    }
}

impl<'a> From<EepromResources<'a>> for I2c<'a, Async> {
    fn from(res: EepromResources<'a>) -> Self {
        let config = I2cConfig::default().with_frequency(Rate::from_khz(EEPROM_BUS_KHZ));
        I2c::new(res.i2c, config)
            .unwrap()
            .with_sda(res.sda)
            .with_scl(res.scl)
            .into_async()
    }
}

impl<'a> From<EepromResources<'a>> for BadgeEeprom<'a> {
    fn from(res: EepromResources<'a>) -> Self {
        Eeprom::new(res.into())
    }
}
