//! Keep-awake touchscreen firmware.
//!
//! The device enumerates as a single-finger USB touchscreen and periodically
//! injects taps and swipes, see [`scheduler::KeepAlive`]. Boards build a
//! [`config::TouchKeepConfig`] and call [`run_touchkeep`].
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod channel;
pub mod config;
pub mod error;
pub mod gesture;
pub mod hid;
pub mod mapper;
pub mod report;
pub mod scheduler;
pub mod state;
pub mod time;
pub mod usb;

use embassy_futures::join::join3;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Ticker;
use embassy_usb::driver::Driver;

use crate::config::TouchKeepConfig;
use crate::error::TouchKeepError;
use crate::hid::HidTransport;
use crate::scheduler::KeepAlive;
use crate::time::Timestamp;
use crate::usb::{UsbContactWriter, UsbTransport, add_contact_writer, new_usb_builder, run_usb_device};

pub type RawMutex = CriticalSectionRawMutex;

/// Run the touchkeep firmware.
///
/// Serves the usb device, writes contact reports and runs the keep-alive
/// scheduler, all concurrently. Returns an error before touching the usb
/// device if the gesture tables in `config` are invalid, otherwise never returns.
pub async fn run_touchkeep<D: Driver<'static>>(driver: D, config: TouchKeepConfig<'static>) -> Result<(), TouchKeepError> {
    let keep_alive = KeepAlive::new(
        &config.keep_alive_config,
        &config.screen_config,
        config.gesture_timing,
        config.report_layout,
    )
    .inspect_err(|e| error!("Invalid keep-alive configuration: {:?}", e))?;

    let mut builder = new_usb_builder(driver, config.usb_config);
    let mut writer = UsbContactWriter::new(add_contact_writer(&mut builder, config.report_layout));
    let usb_device = builder.build();

    info!(
        "touchkeep started, screen {}x{}, layout {:?}",
        config.screen_config.size.width(),
        config.screen_config.size.height(),
        config.report_layout
    );

    let transport = UsbTransport::new(config.usb_config.remote_wakeup);
    join3(
        run_usb_device(usb_device),
        writer.run(),
        run_scheduler(keep_alive, transport, config.keep_alive_config.poll_interval),
    )
    .await;

    Ok(())
}

/// The cooperative scheduling loop.
pub async fn run_scheduler<T: HidTransport>(
    mut keep_alive: KeepAlive,
    mut transport: T,
    poll_interval: embassy_time::Duration,
) {
    let mut ticker = Ticker::every(poll_interval);
    loop {
        // Transport errors are logged by the scheduler and retried on the next tick
        let _ = keep_alive.poll(Timestamp::now(), &mut transport);
        ticker.next().await;
    }
}
