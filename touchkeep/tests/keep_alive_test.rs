mod common;

use touchkeep::config::{KeepAliveConfig, ScreenConfig};
use touchkeep::error::TouchKeepError;
use touchkeep::mapper::ScreenPoint;
use touchkeep::scheduler::{Cadence, Phase, RunnerEvent};
use touchkeep::time::Timestamp;

use crate::common::*;

const NEVER: u64 = 3_600_000;

#[test]
fn test_filler_cadence() {
    let config = keep_alive_config(
        5000,
        &[tap_step(500, 2000, 200), tap_step(540, 1320, 0)],
        NEVER,
        &[],
    );
    let mut keep_alive = create_keep_alive(&config);
    let mut transport = RecordingTransport::new();

    run_millis(&mut keep_alive, &mut transport, 1, 12_000);

    let at: Vec<(u32, bool)> = transport.sent.iter().map(|r| (r.at, r.pressed())).collect();
    assert_eq!(
        at,
        vec![
            (5000, true),
            (5050, false),
            (5300, true),
            (5350, false),
            (10000, true),
            (10050, false),
            (10300, true),
            (10350, false),
        ]
    );

    let screen = ScreenConfig::default().size;
    let first = screen.map(ScreenPoint::new(500, 2000));
    let second = screen.map(ScreenPoint::new(540, 1320));
    assert_eq!((transport.sent[0].x(), transport.sent[0].y()), (first.x, first.y));
    assert_eq!((transport.sent[2].x(), transport.sent[2].y()), (second.x, second.y));
    assert_eq!(keep_alive.state().idle_cycle_timer, Timestamp::from_millis(10000));
}

#[test]
fn test_tap_report_bytes() {
    let config = keep_alive_config(1000, &[tap_step(900, 2050, 0)], NEVER, &[]);
    let mut keep_alive = create_keep_alive(&config);
    let mut transport = RecordingTransport::new();

    run_millis(&mut keep_alive, &mut transport, 1, 1200);

    assert_eq!(transport.sent.len(), 2);
    assert_eq!(transport.sent[0].bytes, vec![0x01, 0x03, 0xA9, 0x6A, 0x64, 0x63]);
    assert_eq!(transport.sent[1].bytes, vec![0x01, 0x00, 0xA9, 0x6A, 0x64, 0x63]);
    assert_eq!(transport.sent[1].at - transport.sent[0].at, 50);
}

#[test]
fn test_active_waits_for_running_gesture() {
    // The long interval expires while the filler tap is held down
    let config = keep_alive_config(
        1000,
        &[tap_step(100, 100, 0)],
        1020,
        &[swipe_step((540, 2000), (540, 800), 2, 0), tap_step(200, 200, 0)],
    );
    let mut keep_alive = create_keep_alive(&config);
    let mut transport = RecordingTransport::new();

    run_millis(&mut keep_alive, &mut transport, 1, 1021);
    assert_eq!(keep_alive.state().phase, Phase::Pressed);
    assert_eq!(keep_alive.state().cadence, Some(Cadence::Filler));
    assert_eq!(transport.sent.len(), 1);

    run_millis(&mut keep_alive, &mut transport, 1021, 1100);
    // Only the filler release went out, the active swipe waits for the settle delay
    assert_eq!(transport.sent.len(), 2);
    assert_eq!(transport.sent[1].at, 1050);
    assert!(!transport.sent[1].pressed());

    run_millis(&mut keep_alive, &mut transport, 1100, 1101);
    assert_eq!(keep_alive.state().cadence, Some(Cadence::Active));
    assert_eq!(transport.sent.len(), 3);
    assert_eq!(transport.sent[2].at, 1100);
    assert!(transport.sent[2].pressed());
    let start = ScreenConfig::default().size.map(ScreenPoint::new(540, 2000));
    assert_eq!((transport.sent[2].x(), transport.sent[2].y()), (start.x, start.y));
}

#[test]
fn test_active_wins_when_both_due() {
    let config = keep_alive_config(1000, &[tap_step(100, 100, 0)], 1000, &[tap_step(300, 300, 0)]);
    let mut keep_alive = create_keep_alive(&config);
    let mut transport = RecordingTransport::new();

    run_millis(&mut keep_alive, &mut transport, 1, 1001);
    assert_eq!(keep_alive.state().cadence, Some(Cadence::Active));
    assert_eq!(transport.sent.len(), 1);
    assert_eq!(transport.sent[0].at, 1000);
    let active = ScreenConfig::default().size.map(ScreenPoint::new(300, 300));
    assert_eq!((transport.sent[0].x(), transport.sent[0].y()), (active.x, active.y));

    run_millis(&mut keep_alive, &mut transport, 1001, 1300);
    // The filler only starts once the active run has settled
    assert_eq!(gesture_starts(&transport.sent), vec![1000, 1101]);
    let filler = ScreenConfig::default().size.map(ScreenPoint::new(100, 100));
    assert_eq!((transport.sent[2].x(), transport.sent[2].y()), (filler.x, filler.y));
    assert_eq!(keep_alive.state().active_cycle_timer, Timestamp::from_millis(1100));
}

#[test]
fn test_active_cycle_restarts_after_completion() {
    let config = keep_alive_config(NEVER, &[], 1000, &[tap_step(300, 300, 0)]);
    let mut keep_alive = create_keep_alive(&config);
    let mut transport = RecordingTransport::new();

    run_millis(&mut keep_alive, &mut transport, 1, 3000);

    // Tap at 1000, done at 1100, next run 1000 ms later
    assert_eq!(gesture_starts(&transport.sent), vec![1000, 2100]);
    assert_eq!(keep_alive.state().active_cycle_timer, Timestamp::from_millis(2200));
}

#[test]
fn test_not_ready_keeps_cursor() {
    let config = keep_alive_config(1000, &[tap_step(500, 2000, 0)], NEVER, &[]);
    let mut keep_alive = create_keep_alive(&config);
    let mut transport = RecordingTransport::new();

    run_millis(&mut keep_alive, &mut transport, 1, 1050);
    assert_eq!(keep_alive.state().phase, Phase::Pressed);
    assert_eq!(keep_alive.state().cursor, 1);

    transport.ready = false;
    for t in 1050..1053 {
        transport.now = t;
        assert_eq!(
            keep_alive.poll(Timestamp::from_millis(t), &mut transport),
            Err(TouchKeepError::TransportNotReady)
        );
        assert_eq!(keep_alive.state().cursor, 1);
        assert_eq!(keep_alive.state().phase, Phase::Pressed);
    }
    assert_eq!(transport.sent.len(), 1);

    transport.ready = true;
    transport.now = 1053;
    let event = keep_alive.poll(Timestamp::from_millis(1053), &mut transport);
    assert!(matches!(event, Ok(RunnerEvent::Emitted(step)) if !step.event.pressed));
    assert_eq!(keep_alive.state().phase, Phase::Released);
    assert_eq!(keep_alive.state().last_event_time, Timestamp::from_millis(1053));
    assert_eq!(transport.sent[1].at, 1053);
}

#[test]
fn test_unmounted_and_rejected_transport() {
    let config = keep_alive_config(1000, &[tap_step(500, 2000, 0)], NEVER, &[]);
    let mut keep_alive = create_keep_alive(&config);
    let mut transport = RecordingTransport::new();
    transport.mounted = false;

    run_millis(&mut keep_alive, &mut transport, 1, 1000);
    transport.now = 1000;
    assert_eq!(
        keep_alive.poll(Timestamp::from_millis(1000), &mut transport),
        Err(TouchKeepError::TransportNotReady)
    );

    transport.mounted = true;
    transport.reject = true;
    transport.now = 1001;
    assert_eq!(
        keep_alive.poll(Timestamp::from_millis(1001), &mut transport),
        Err(TouchKeepError::TransportRejected)
    );
    assert_eq!(keep_alive.state().cursor, 0);

    transport.reject = false;
    run_millis(&mut keep_alive, &mut transport, 1002, 1200);
    assert_eq!(gesture_starts(&transport.sent), vec![1002]);
    assert_eq!(transport.sent.len(), 2);
}

#[test]
fn test_replay_is_byte_identical() {
    let config = KeepAliveConfig {
        idle_fill_interval: embassy_time::Duration::from_millis(700),
        long_interval: embassy_time::Duration::from_millis(4000),
        ..KeepAliveConfig::default()
    };

    let mut runs = Vec::new();
    for _ in 0..2 {
        let mut keep_alive = create_keep_alive(&config);
        let mut transport = RecordingTransport::new();
        run_millis(&mut keep_alive, &mut transport, 1, 20_000);
        runs.push(transport.sent);
    }
    assert!(!runs[0].is_empty());
    assert_eq!(runs[0], runs[1]);
}

#[test]
fn test_gestures_never_interleave() {
    let config = KeepAliveConfig {
        idle_fill_interval: embassy_time::Duration::from_millis(300),
        long_interval: embassy_time::Duration::from_millis(2500),
        ..KeepAliveConfig::default()
    };
    let mut keep_alive = create_keep_alive(&config);
    let mut transport = RecordingTransport::new();
    run_millis(&mut keep_alive, &mut transport, 1, 30_000);

    // Every gesture ends with a release, the next press waits out the settle delay
    let mut last_release: Option<u32> = None;
    let mut pressed = false;
    for report in &transport.sent {
        if report.pressed() && !pressed {
            if let Some(released_at) = last_release {
                assert!(report.at - released_at >= 50, "press at {} too close to release", report.at);
            }
        }
        if !report.pressed() {
            assert!(pressed, "release at {} without a press", report.at);
            last_release = Some(report.at);
        }
        pressed = report.pressed();
    }
    assert!(gesture_starts(&transport.sent).len() > 10);
}

#[test]
fn test_timers_survive_wraparound() {
    let config = keep_alive_config(1000, &[tap_step(500, 2000, 0)], NEVER, &[]);
    let mut keep_alive = create_keep_alive(&config);
    let mut transport = RecordingTransport::new();

    let start = u32::MAX - 1500;
    run_millis(&mut keep_alive, &mut transport, start, 600);

    assert_eq!(
        gesture_starts(&transport.sent),
        vec![start, start.wrapping_add(1000), start.wrapping_add(2000)]
    );
    assert_eq!(start.wrapping_add(2000), 499);
    // The last tap was released across the wrap
    assert!(transport.sent.iter().all(|r| r.at >= start || r.at < 600));
    assert_eq!(transport.sent.len(), 6);
}
