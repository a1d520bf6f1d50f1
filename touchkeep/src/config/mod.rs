use ::heapless::Vec;
use embassy_time::Duration;

use crate::gesture::{GestureSpec, SequenceStep};
use crate::mapper::{ScreenPoint, ScreenSize};
use crate::report::ReportLayout;

/// Maximum number of gestures in one choreography.
pub const MAX_SEQUENCE_STEPS: usize = 8;

/// A choreography: gestures run one after another.
pub type Sequence = Vec<SequenceStep, MAX_SEQUENCE_STEPS>;

/// The config struct for the touchkeep firmware.
///
/// Everything is fixed at build time, the board crate fills it in and hands it to
/// [`crate::run_touchkeep`].
#[derive(Clone, Debug, Default)]
pub struct TouchKeepConfig<'a> {
    pub usb_config: TouchUsbConfig<'a>,
    pub screen_config: ScreenConfig,
    pub gesture_timing: GestureTiming,
    pub keep_alive_config: KeepAliveConfig,
    /// Report layout, selects both the encoder and the HID report descriptor
    pub report_layout: ReportLayout,
}

/// Virtual screen the gesture tables are written against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenConfig {
    pub size: ScreenSize,
    /// Reject gesture points outside the screen at startup
    pub bounds_check: bool,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            size: ScreenSize::default(),
            bounds_check: true,
        }
    }
}

/// Timing of the gesture primitives
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GestureTiming {
    /// Time between press and release of a tap
    pub tap_hold: Duration,
    /// Time between two events of a swipe
    pub swipe_step: Duration,
    /// Time after a release before another gesture may start
    pub settle: Duration,
}

impl Default for GestureTiming {
    fn default() -> Self {
        Self {
            tap_hold: Duration::from_millis(50),
            swipe_step: Duration::from_millis(10),
            settle: Duration::from_millis(50),
        }
    }
}

/// Keep-alive choreography and cadences
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeepAliveConfig {
    /// Period of the filler choreography, start to start
    pub idle_fill_interval: Duration,
    /// Short pattern that keeps the host's touch subsystem from timing out
    pub filler: Sequence,
    /// Period of the active choreography, measured from the end of the previous run
    pub long_interval: Duration,
    /// Scroll-and-tap pattern run once per long interval
    pub active: Sequence,
    /// How often the scheduler loop polls the clock
    pub poll_interval: Duration,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            idle_fill_interval: Duration::from_millis(5000),
            filler: Vec::from_iter([
                SequenceStep::new(GestureSpec::Tap(ScreenPoint::new(500, 2000)), Duration::from_millis(200)),
                SequenceStep::new(GestureSpec::Tap(ScreenPoint::new(540, 1320)), Duration::from_millis(0)),
            ]),
            long_interval: Duration::from_millis(600_000),
            active: Vec::from_iter([
                SequenceStep::new(
                    GestureSpec::Swipe {
                        from: ScreenPoint::new(540, 2000),
                        to: ScreenPoint::new(540, 800),
                        steps: 20,
                    },
                    Duration::from_millis(1000),
                ),
                SequenceStep::new(GestureSpec::Tap(ScreenPoint::new(540, 1320)), Duration::from_millis(500)),
                SequenceStep::new(GestureSpec::Tap(ScreenPoint::new(900, 2050)), Duration::from_millis(500)),
                SequenceStep::new(GestureSpec::Tap(ScreenPoint::new(180, 2050)), Duration::from_millis(0)),
            ]),
            poll_interval: Duration::from_millis(1),
        }
    }
}

/// Configurations for usb
#[derive(Clone, Copy, Debug)]
pub struct TouchUsbConfig<'a> {
    /// Vender id
    pub vid: u16,
    /// Product id
    pub pid: u16,
    /// Manufacturer
    pub manufacturer: &'a str,
    /// Product name
    pub product_name: &'a str,
    /// Serial number
    pub serial_number: &'a str,
    /// Wake a suspended host when a gesture is due
    pub remote_wakeup: bool,
}

impl Default for TouchUsbConfig<'_> {
    fn default() -> Self {
        Self {
            vid: 0xcafe,
            pid: 0x4000,
            manufacturer: "touchkeep",
            product_name: "touchkeep digitizer",
            serial_number: "000001",
            remote_wakeup: true,
        }
    }
}
