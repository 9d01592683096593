//! Shared SPI bus demo
//!
//! An SH1106 panel and a SPI NOR flash on the same SPI0 bus. Each device
//! gets its own chip select through `embassy-embedded-hal`'s blocking
//! shared-bus `SpiDeviceWithConfig`, which locks the bus and applies the
//! device's clock settings per transaction. The panel shows a counter and
//! the flash JEDEC ID read between frames.
//!
//! # Wiring
//!
//! | Signal     | Pico 2 Pin | Notes             |
//! |------------|------------|-------------------|
//! | SPI0 SCK   | GP18       | shared            |
//! | SPI0 MOSI  | GP19       | shared            |
//! | SPI0 MISO  | GP16       | flash only        |
//! | OLED CS    | GP17       |                   |
//! | OLED D/C   | GP20       |                   |
//! | OLED RST   | GP21       | active low        |
//! | Flash CS   | GP13       |                   |

#![no_std]
#![no_main]

use core::cell::RefCell;
use core::fmt::Write as _;

use defmt::*;
use embassy_embedded_hal::shared_bus::blocking::spi::SpiDeviceWithConfig;
use embassy_executor::Spawner;
use embassy_rp as hal;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::spi::{self, Spi};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Delay, Duration, Timer};
use embedded_hal::spi::{Operation, SpiDevice as _};
use heapless::String;
use {defmt_rtt as _, panic_probe as _};

use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;

use sh1106_oled_display_rs::{DisplaySize128x64, ResetPin, Sh1106, Sh1106Config, SpiConfig, SpiInterface};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = hal::block::ImageDef::secure_exe();

/// HAL bus settings for the panel, from the driver's recommended defaults.
fn oled_spi_config() -> spi::Config {
    let wanted = SpiConfig::default();
    let mut config = spi::Config::default();
    config.frequency = wanted.frequency;
    config.polarity = match wanted.mode.polarity {
        embedded_hal::spi::Polarity::IdleLow => spi::Polarity::IdleLow,
        embedded_hal::spi::Polarity::IdleHigh => spi::Polarity::IdleHigh,
    };
    config.phase = match wanted.mode.phase {
        embedded_hal::spi::Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
        embedded_hal::spi::Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
    };
    config
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("SH1106 shared SPI demo starting");

    let spi = Spi::new_blocking(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, spi::Config::default());
    let bus: Mutex<NoopRawMutex, _> = Mutex::new(RefCell::new(spi));

    let oled_dev = SpiDeviceWithConfig::new(&bus, Output::new(p.PIN_17, Level::High), oled_spi_config());
    let mut flash_cfg = spi::Config::default();
    flash_cfg.frequency = 1_000_000;
    let mut flash = SpiDeviceWithConfig::new(&bus, Output::new(p.PIN_13, Level::High), flash_cfg);

    let iface = SpiInterface::new(oled_dev, Output::new(p.PIN_20, Level::Low));
    let reset = ResetPin::new(Output::new(p.PIN_21, Level::High), Delay);

    let mut oled: Sh1106<_, DisplaySize128x64, _> =
        match Sh1106::with_reset(iface, reset, Sh1106Config::default()) {
            Ok(oled) => oled,
            Err(e) => defmt::panic!("OLED init failed: {}", e.error),
        };
    info!("OLED initialised");

    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let mut frame: u32 = 0;

    loop {
        let mut id = [0u8; 3];
        if flash
            .transaction(&mut [Operation::Write(&[0x9F]), Operation::Read(&mut id)])
            .is_err()
        {
            warn!("flash read failed");
        }

        let mut line: String<32> = String::new();
        let _ = write!(line, "frame {}", frame);
        let mut jedec: String<32> = String::new();
        let _ = write!(jedec, "jedec {:02x}{:02x}{:02x}", id[0], id[1], id[2]);

        oled.clear();
        Text::new(&line, Point::new(0, 10), style).draw(&mut oled).ok();
        Text::new(&jedec, Point::new(0, 24), style).draw(&mut oled).ok();
        if let Err(e) = oled.show() {
            warn!("show failed: {}", e);
        }

        frame = frame.wrapping_add(1);
        Timer::after(Duration::from_millis(100)).await;
    }
}
