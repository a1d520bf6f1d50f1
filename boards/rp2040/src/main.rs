#![no_main]
#![no_std]

use defmt::*;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::{Driver, InterruptHandler};
use panic_probe as _;
use touchkeep::config::{ScreenConfig, TouchKeepConfig, TouchUsbConfig};
use touchkeep::mapper::ScreenSize;
use touchkeep::run_touchkeep;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => InterruptHandler<USB>;
});

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("touchkeep start!");
    // Initialize peripherals
    let p = embassy_rp::init(Default::default());

    // Create the usb driver, from the HAL
    let driver = Driver::new(p.USB, Irqs);

    let usb_config = TouchUsbConfig {
        vid: 0xcafe,
        pid: 0x4000,
        manufacturer: "touchkeep",
        product_name: "touchkeep digitizer",
        serial_number: "rp2040:000001",
        remote_wakeup: true,
    };

    let screen_config = match ScreenSize::new(1080, 2640) {
        Ok(size) => ScreenConfig {
            size,
            ..Default::default()
        },
        Err(e) => defmt::panic!("Invalid screen size: {:?}", e),
    };

    let config = TouchKeepConfig {
        usb_config,
        screen_config,
        ..Default::default()
    };

    // Start serving
    if let Err(e) = run_touchkeep(driver, config).await {
        error!("touchkeep stopped: {:?}", e);
    }
}
