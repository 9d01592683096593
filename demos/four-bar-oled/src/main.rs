//! Four-bar SH1106 demo
//!
//! Drives a 128×64 SH1106 module over blocking I2C with a hardware reset
//! line, draws four horizontal bars and sweeps their lengths.
//!
//! # Wiring
//!
//! | Signal    | Pico 2 Pin | Notes           |
//! |-----------|------------|-----------------|
//! | I2C0 SDA  | GP20       |                 |
//! | I2C0 SCL  | GP21       |                 |
//! | OLED RST  | GP22       | active low      |
//! | OLED VCC  | 3V3        |                 |
//! | OLED GND  | GND        |                 |
//!
//! Each bar row is 16 px tall with a 14 px fill; bar width is
//! `value * 128 / 127` for values 0–127.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp as hal;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_time::{Delay, Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use sh1106_oled_display_rs::{
    DisplaySize128x64, I2cInterface, ResetPin, Sh1106, Sh1106Config, DEFAULT_ADDRESS,
};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = hal::block::ImageDef::secure_exe();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("SH1106 four-bar demo starting");

    let i2c = I2c::new_blocking(p.I2C0, p.PIN_21, p.PIN_20, i2c::Config::default());
    let reset = ResetPin::new(Output::new(p.PIN_22, Level::High), Delay);

    let mut oled: Sh1106<_, DisplaySize128x64, _> = match Sh1106::with_reset(
        I2cInterface::new(i2c, DEFAULT_ADDRESS),
        reset,
        Sh1106Config::default(),
    ) {
        Ok(oled) => oled,
        Err(e) => defmt::panic!("OLED init failed: {}", e.error),
    };
    info!("OLED initialised");

    let mut values: [u8; 4] = [0, 32, 64, 96];

    loop {
        oled.clear();

        for (i, &v) in values.iter().enumerate() {
            let y = (i as i32) * 16;
            let bar_width = (v as u32) * 128 / 127;

            Rectangle::new(Point::new(0, y + 1), Size::new(bar_width, 14))
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(&mut oled)
                .ok();
        }

        if let Err(e) = oled.show() {
            warn!("show failed: {}", e);
        }

        for v in values.iter_mut() {
            *v = (*v + 1) % 128;
        }

        Timer::after(Duration::from_millis(33)).await;
    }
}
