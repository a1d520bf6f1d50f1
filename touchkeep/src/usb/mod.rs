pub mod descriptor;

use core::sync::atomic::Ordering;

use embassy_futures::select::{Either, select};
use embassy_sync::signal::Signal;
use embassy_usb::class::hid::{HidBootProtocol, HidSubclass, HidWriter, ReportId, RequestHandler, State};
use embassy_usb::control::OutResponse;
use embassy_usb::driver::Driver;
use embassy_usb::{Builder, Handler, UsbDevice};
use static_cell::StaticCell;

use crate::RawMutex;
use crate::channel::CONTACT_REPORT_CHANNEL;
use crate::config::TouchUsbConfig;
use crate::hid::HidTransport;
use crate::report::{ContactReport, MAX_REPORT_SIZE, ReportLayout};
use crate::state::{REMOTE_WAKEUP_ENABLED, USB_SUSPENDED, UsbState, get_usb_state, is_suspended, set_usb_state};
use crate::usb::descriptor::report_descriptor;

pub(crate) static USB_REMOTE_WAKEUP: Signal<RawMutex, ()> = Signal::new();

/// Poll interval of the interrupt IN endpoint, in ms
const HID_POLL_MS: u8 = 10;
const HID_MAX_PACKET_SIZE: u16 = 16;

pub(crate) fn new_usb_builder<D: Driver<'static>>(driver: D, usb_config: TouchUsbConfig<'static>) -> Builder<'static, D> {
    // Create embassy-usb Config
    let mut config = embassy_usb::Config::new(usb_config.vid, usb_config.pid);
    config.manufacturer = Some(usb_config.manufacturer);
    config.product = Some(usb_config.product_name);
    config.serial_number = Some(usb_config.serial_number);
    config.max_power = 100;
    config.supports_remote_wakeup = usb_config.remote_wakeup;
    config.max_packet_size_0 = 64;

    // Create embassy-usb DeviceBuilder using the driver and config.
    static CONFIG_DESC: StaticCell<[u8; 128]> = StaticCell::new();
    static BOS_DESC: StaticCell<[u8; 16]> = StaticCell::new();
    static MSOS_DESC: StaticCell<[u8; 16]> = StaticCell::new();
    static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

    let mut builder = Builder::new(
        driver,
        config,
        &mut CONFIG_DESC.init([0; 128])[..],
        &mut BOS_DESC.init([0; 16])[..],
        &mut MSOS_DESC.init([0; 16])[..],
        &mut CONTROL_BUF.init([0; 64])[..],
    );

    static DEVICE_HANDLER: StaticCell<UsbDeviceHandler> = StaticCell::new();
    builder.handler(DEVICE_HANDLER.init(UsbDeviceHandler::new()));

    builder
}

/// Add the digitizer interface, with the report descriptor of `layout`.
pub(crate) fn add_contact_writer<D: Driver<'static>>(
    builder: &mut Builder<'static, D>,
    layout: ReportLayout,
) -> HidWriter<'static, D, MAX_REPORT_SIZE> {
    static STATE: StaticCell<State> = StaticCell::new();
    static REQUEST_HANDLER: StaticCell<UsbRequestHandler> = StaticCell::new();

    let hid_config = embassy_usb::class::hid::Config {
        report_descriptor: report_descriptor(layout),
        request_handler: Some(REQUEST_HANDLER.init(UsbRequestHandler {})),
        poll_ms: HID_POLL_MS,
        max_packet_size: HID_MAX_PACKET_SIZE,
        hid_subclass: HidSubclass::No,
        hid_boot_protocol: HidBootProtocol::None,
    };
    HidWriter::new(builder, STATE.init(State::new()), hid_config)
}

/// Run the usb device, issuing a remote wakeup when requested while suspended.
pub(crate) async fn run_usb_device<D: Driver<'static>>(mut usb_device: UsbDevice<'static, D>) {
    loop {
        usb_device.run_until_suspend().await;
        match select(usb_device.wait_resume(), USB_REMOTE_WAKEUP.wait()).await {
            Either::First(_) => {
                // The host resumed by itself, drop wakeup requests made while suspended
                USB_REMOTE_WAKEUP.reset();
            }
            Either::Second(_) => {
                info!("USB wakeup remote");
                if let Err(e) = usb_device.remote_wakeup().await {
                    warn!("USB wakeup remote error: {:?}", e)
                }
            }
        }
    }
}

/// Drains [`CONTACT_REPORT_CHANNEL`] into the HID endpoint.
pub(crate) struct UsbContactWriter<D: Driver<'static>> {
    writer: HidWriter<'static, D, MAX_REPORT_SIZE>,
}

impl<D: Driver<'static>> UsbContactWriter<D> {
    pub(crate) fn new(writer: HidWriter<'static, D, MAX_REPORT_SIZE>) -> Self {
        Self { writer }
    }

    pub(crate) async fn run(&mut self) {
        loop {
            let report = CONTACT_REPORT_CHANNEL.receive().await;
            if let Err(e) = self.writer.write(report.as_bytes()).await {
                error!("Send contact report error: {:?}", e);
            }
        }
    }
}

/// [`HidTransport`] backed by the usb device.
///
/// Accepted reports are queued in [`CONTACT_REPORT_CHANNEL`] and written by
/// [`UsbContactWriter`].
pub struct UsbTransport {
    remote_wakeup: bool,
}

impl UsbTransport {
    pub fn new(remote_wakeup: bool) -> Self {
        Self { remote_wakeup }
    }
}

impl HidTransport for UsbTransport {
    fn is_mounted(&self) -> bool {
        get_usb_state() == UsbState::Configured
    }

    fn is_ready(&self) -> bool {
        if is_suspended() {
            if self.remote_wakeup && REMOTE_WAKEUP_ENABLED.load(Ordering::Acquire) {
                USB_REMOTE_WAKEUP.signal(());
            }
            return false;
        }
        !CONTACT_REPORT_CHANNEL.is_full()
    }

    fn send_report(&mut self, report: &ContactReport) -> bool {
        CONTACT_REPORT_CHANNEL.try_send(*report).is_ok()
    }
}

pub(crate) struct UsbRequestHandler {}

impl RequestHandler for UsbRequestHandler {
    fn set_report(&mut self, id: ReportId, data: &[u8]) -> OutResponse {
        info!("Set report for {:?}: {:?}", id, data);
        OutResponse::Accepted
    }
}

pub(crate) struct UsbDeviceHandler {}

impl UsbDeviceHandler {
    fn new() -> Self {
        UsbDeviceHandler {}
    }
}

impl Handler for UsbDeviceHandler {
    fn enabled(&mut self, enabled: bool) {
        USB_SUSPENDED.store(false, Ordering::Release);
        if enabled {
            info!("Device enabled");
            set_usb_state(UsbState::Enabled);
        } else {
            info!("Device disabled");
            set_usb_state(UsbState::Disabled);
        }
    }

    fn reset(&mut self) {
        set_usb_state(UsbState::Enabled);
        info!("Bus reset, the Vbus current limit is 100mA");
    }

    fn addressed(&mut self, addr: u8) {
        info!("USB address set to: {}", addr);
    }

    fn configured(&mut self, configured: bool) {
        if configured {
            set_usb_state(UsbState::Configured);
            info!("Device configured, it may now draw up to the configured current from Vbus.")
        } else {
            set_usb_state(UsbState::Enabled);
            info!("Device is no longer configured, the Vbus current limit is 100mA.");
        }
    }

    fn suspended(&mut self, suspended: bool) {
        USB_SUSPENDED.store(suspended, Ordering::Release);
        if !suspended {
            USB_REMOTE_WAKEUP.reset();
        }
        if suspended {
            info!("Device suspended, the Vbus current limit is 500µA (or 2.5mA for high-power devices with remote wakeup enabled).");
        } else {
            info!("Device resumed");
        }
    }

    fn remote_wakeup_enabled(&mut self, enabled: bool) {
        REMOTE_WAKEUP_ENABLED.store(enabled, Ordering::Release);
        info!("Remote wakeup enabled state: {}", enabled);
    }
}
