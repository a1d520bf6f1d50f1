#![allow(dead_code)]

use embassy_time::Duration;
use heapless::Vec as HVec;
use touchkeep::config::{GestureTiming, KeepAliveConfig, ScreenConfig};
use touchkeep::gesture::{GestureSpec, SequenceStep};
use touchkeep::hid::HidTransport;
use touchkeep::report::{ContactReport, ReportLayout};
use touchkeep::scheduler::KeepAlive;
use touchkeep::time::Timestamp;

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// A report captured by [`RecordingTransport`], with the time it was sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentReport {
    pub at: u32,
    pub bytes: Vec<u8>,
}

impl SentReport {
    /// Tip switch of an extended layout report
    pub fn pressed(&self) -> bool {
        self.bytes[1] & 0x01 != 0
    }

    pub fn x(&self) -> u16 {
        u16::from_le_bytes([self.bytes[2], self.bytes[3]])
    }

    pub fn y(&self) -> u16 {
        u16::from_le_bytes([self.bytes[4], self.bytes[5]])
    }
}

/// Transport that records every accepted report
pub struct RecordingTransport {
    pub mounted: bool,
    pub ready: bool,
    /// Refuse reports even when ready
    pub reject: bool,
    pub now: u32,
    pub sent: Vec<SentReport>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            mounted: true,
            ready: true,
            reject: false,
            now: 0,
            sent: Vec::new(),
        }
    }
}

impl HidTransport for RecordingTransport {
    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn send_report(&mut self, report: &ContactReport) -> bool {
        if self.reject {
            return false;
        }
        self.sent.push(SentReport {
            at: self.now,
            bytes: report.as_bytes().to_vec(),
        });
        true
    }
}

pub fn tap_step(x: u16, y: u16, pause_ms: u64) -> SequenceStep {
    SequenceStep::new(
        GestureSpec::Tap(touchkeep::mapper::ScreenPoint::new(x, y)),
        Duration::from_millis(pause_ms),
    )
}

pub fn swipe_step(from: (u16, u16), to: (u16, u16), steps: u16, pause_ms: u64) -> SequenceStep {
    SequenceStep::new(
        GestureSpec::Swipe {
            from: touchkeep::mapper::ScreenPoint::new(from.0, from.1),
            to: touchkeep::mapper::ScreenPoint::new(to.0, to.1),
            steps,
        },
        Duration::from_millis(pause_ms),
    )
}

pub fn keep_alive_config(
    idle_fill_ms: u64,
    filler: &[SequenceStep],
    long_ms: u64,
    active: &[SequenceStep],
) -> KeepAliveConfig {
    KeepAliveConfig {
        idle_fill_interval: Duration::from_millis(idle_fill_ms),
        filler: HVec::from_slice(filler).unwrap(),
        long_interval: Duration::from_millis(long_ms),
        active: HVec::from_slice(active).unwrap(),
        poll_interval: Duration::from_millis(1),
    }
}

pub fn create_keep_alive(config: &KeepAliveConfig) -> KeepAlive {
    KeepAlive::new(
        config,
        &ScreenConfig::default(),
        GestureTiming::default(),
        ReportLayout::Extended,
    )
    .unwrap()
}

/// Poll once per millisecond in `[from, to)`, wrapping around `u32::MAX`.
pub fn run_millis(keep_alive: &mut KeepAlive, transport: &mut RecordingTransport, from: u32, to: u32) {
    let mut now = from;
    while now != to {
        transport.now = now;
        let _ = keep_alive.poll(Timestamp::from_millis(now), transport);
        now = now.wrapping_add(1);
    }
}

/// Times of all press reports that start a gesture
pub fn gesture_starts(sent: &[SentReport]) -> Vec<u32> {
    let mut starts = Vec::new();
    let mut pressed = false;
    for r in sent {
        if r.pressed() && !pressed {
            starts.push(r.at);
        }
        pressed = r.pressed();
    }
    starts
}
