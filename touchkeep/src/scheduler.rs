//! Gesture scheduling.
//!
//! [`GestureRunner`] plays a single gesture against the transport. [`KeepAlive`]
//! sits on top of it and decides which gesture comes next: the filler
//! choreography every `idle_fill_interval`, the active choreography every
//! `long_interval`. Both are driven by [`KeepAlive::poll`], which never blocks.

use heapless::Vec;

use crate::config::{GestureTiming, KeepAliveConfig, MAX_SEQUENCE_STEPS, ScreenConfig, Sequence};
use crate::error::TouchKeepError;
use crate::gesture::{Gesture, GestureStep};
use crate::hid::HidTransport;
use crate::report::{ReportLayout, encode};
use crate::time::{Deadline, Timestamp, duration_millis};

/// Phase of the gesture state machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// No gesture is running
    #[default]
    Idle,
    /// A gesture is running and the next event is pending. Until the press
    /// itself is delivered, no contact is down on the host yet
    Pressed,
    /// The contact was released, waiting out the settle delay
    Released,
}

/// What happened during one poll of the [`GestureRunner`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunnerEvent {
    /// Nothing to do
    Idle,
    /// A deadline is armed but not elapsed yet
    Waiting,
    /// A report was handed to the transport
    Emitted(GestureStep),
    /// The settle delay elapsed, the runner is idle again
    Completed,
}

/// Plays one gesture at a time.
pub struct GestureRunner {
    phase: Phase,
    gesture: Option<Gesture>,
    /// Index of the next event to emit
    cursor: usize,
    deadline: Deadline,
    last_event_time: Timestamp,
    layout: ReportLayout,
}

impl GestureRunner {
    pub fn new(layout: ReportLayout) -> Self {
        Self {
            phase: Phase::Idle,
            gesture: None,
            cursor: 0,
            deadline: Deadline::default(),
            last_event_time: Timestamp::ZERO,
            layout,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn last_event_time(&self) -> Timestamp {
        self.last_event_time
    }

    /// Start a gesture, its first event is due immediately.
    ///
    /// Returns `false` and leaves the running gesture untouched if the runner is not idle.
    pub fn start(&mut self, gesture: Gesture, now: Timestamp) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.gesture = Some(gesture);
        self.cursor = 0;
        self.deadline = Deadline::immediate(now);
        self.phase = Phase::Pressed;
        true
    }

    /// Advance the running gesture.
    ///
    /// At most one event is emitted per poll. If the transport can't take the
    /// report, the cursor stays where it is and the same event is retried on the
    /// next poll.
    pub fn poll<T: HidTransport>(&mut self, now: Timestamp, transport: &mut T) -> Result<RunnerEvent, TouchKeepError> {
        match self.phase {
            Phase::Idle => Ok(RunnerEvent::Idle),
            Phase::Pressed => {
                if !self.deadline.is_elapsed(now) {
                    return Ok(RunnerEvent::Waiting);
                }
                let Some(step) = self.gesture.and_then(|g| g.step(self.cursor)) else {
                    // Can't happen: the release moves the runner to `Released`
                    self.reset();
                    return Ok(RunnerEvent::Idle);
                };

                let report = encode(&step.event, self.layout);
                transport.try_send(&report)?;
                trace!("Contact event sent: {:?}", step.event);

                self.cursor += 1;
                self.last_event_time = now;
                self.deadline = Deadline::after(now, step.delay);
                if !step.event.pressed {
                    self.phase = Phase::Released;
                }
                Ok(RunnerEvent::Emitted(step))
            }
            Phase::Released => {
                if !self.deadline.is_elapsed(now) {
                    return Ok(RunnerEvent::Waiting);
                }
                self.reset();
                Ok(RunnerEvent::Completed)
            }
        }
    }

    fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.gesture = None;
        self.cursor = 0;
    }
}

/// Which choreography is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cadence {
    Filler,
    Active,
}

/// Snapshot of the scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScheduleState {
    pub phase: Phase,
    /// Index of the next event of the running gesture
    pub cursor: usize,
    pub last_event_time: Timestamp,
    /// Start of the last filler run
    pub idle_cycle_timer: Timestamp,
    /// End of the last active run, or boot
    pub active_cycle_timer: Timestamp,
    /// The choreography in progress, if any
    pub cadence: Option<Cadence>,
}

/// A built gesture of a choreography
#[derive(Debug, Clone, Copy)]
struct PlannedGesture {
    gesture: Gesture,
    pause_after_ms: u32,
}

type Plan = Vec<PlannedGesture, MAX_SEQUENCE_STEPS>;

/// Progress through a choreography
#[derive(Debug, Clone, Copy)]
struct SequenceCursor {
    cadence: Cadence,
    /// Index of the next gesture to start
    next: usize,
    next_start: Deadline,
}

/// The keep-alive scheduler.
///
/// Owns all scheduling state. Call [`KeepAlive::poll`] repeatedly from a single loop.
pub struct KeepAlive {
    runner: GestureRunner,
    filler: Plan,
    active: Plan,
    idle_fill_interval: u32,
    long_interval: u32,
    idle_cycle_timer: Timestamp,
    active_cycle_timer: Timestamp,
    sequence: Option<SequenceCursor>,
    /// Last transport error, used to log stalls once
    stalled: Option<TouchKeepError>,
}

impl KeepAlive {
    /// Build the scheduler, validating every gesture of both choreographies.
    ///
    /// Timers start at zero.
    pub fn new(
        config: &KeepAliveConfig,
        screen: &ScreenConfig,
        timing: GestureTiming,
        layout: ReportLayout,
    ) -> Result<Self, TouchKeepError> {
        Ok(Self {
            runner: GestureRunner::new(layout),
            filler: plan(&config.filler, screen, timing)?,
            active: plan(&config.active, screen, timing)?,
            idle_fill_interval: duration_millis(config.idle_fill_interval),
            long_interval: duration_millis(config.long_interval),
            idle_cycle_timer: Timestamp::ZERO,
            active_cycle_timer: Timestamp::ZERO,
            sequence: None,
            stalled: None,
        })
    }

    pub fn state(&self) -> ScheduleState {
        ScheduleState {
            phase: self.runner.phase(),
            cursor: self.runner.cursor(),
            last_event_time: self.runner.last_event_time(),
            idle_cycle_timer: self.idle_cycle_timer,
            active_cycle_timer: self.active_cycle_timer,
            cadence: self.sequence.map(|s| s.cadence),
        }
    }

    /// Run one scheduling step at `now`.
    pub fn poll<T: HidTransport>(&mut self, now: Timestamp, transport: &mut T) -> Result<RunnerEvent, TouchKeepError> {
        let event = self.poll_runner(now, transport)?;
        if event == RunnerEvent::Completed {
            self.finish_gesture(now);
        }

        if self.runner.phase() == Phase::Idle
            && let Some(gesture) = self.next_gesture(now)
        {
            self.runner.start(gesture, now);
            // The press goes out in the same poll
            return self.poll_runner(now, transport);
        }
        Ok(event)
    }

    fn poll_runner<T: HidTransport>(&mut self, now: Timestamp, transport: &mut T) -> Result<RunnerEvent, TouchKeepError> {
        match self.runner.poll(now, transport) {
            Ok(event) => {
                if self.stalled.take().is_some() {
                    info!("Transport available again, resuming gesture");
                }
                Ok(event)
            }
            Err(e) => {
                if self.stalled != Some(e) {
                    warn!("Contact report delayed: {:?}", e);
                    self.stalled = Some(e);
                }
                Err(e)
            }
        }
    }

    /// Arm the pause after the gesture that just completed.
    fn finish_gesture(&mut self, now: Timestamp) {
        if let Some(seq) = self.sequence.as_mut() {
            let plan = match seq.cadence {
                Cadence::Filler => &self.filler,
                Cadence::Active => &self.active,
            };
            let pause = seq
                .next
                .checked_sub(1)
                .and_then(|i| plan.get(i))
                .map_or(0, |p| p.pause_after_ms);
            seq.next_start = Deadline::new(now, pause);
        }
    }

    fn long_interval_due(&self, now: Timestamp) -> bool {
        now.millis_since(self.active_cycle_timer) >= self.long_interval
    }

    fn idle_fill_due(&self, now: Timestamp) -> bool {
        now.millis_since(self.idle_cycle_timer) >= self.idle_fill_interval
    }

    /// Pick the gesture to start now, if any. Only called while the runner is idle.
    fn next_gesture(&mut self, now: Timestamp) -> Option<Gesture> {
        let active_running = matches!(self.sequence, Some(SequenceCursor { cadence: Cadence::Active, .. }));
        if !active_running && self.long_interval_due(now) {
            if self.active.is_empty() {
                self.active_cycle_timer = now;
            } else {
                if self.sequence.is_some() {
                    debug!("Filler interrupted by the active sequence");
                }
                info!("Starting active sequence");
                self.sequence = Some(SequenceCursor {
                    cadence: Cadence::Active,
                    next: 0,
                    next_start: Deadline::immediate(now),
                });
            }
        }

        if self.sequence.is_none() && self.idle_fill_due(now) {
            self.idle_cycle_timer = now;
            if !self.filler.is_empty() {
                debug!("Starting filler sequence");
                self.sequence = Some(SequenceCursor {
                    cadence: Cadence::Filler,
                    next: 0,
                    next_start: Deadline::immediate(now),
                });
            }
        }

        let seq = self.sequence?;
        if !seq.next_start.is_elapsed(now) {
            return None;
        }
        let plan = match seq.cadence {
            Cadence::Filler => &self.filler,
            Cadence::Active => &self.active,
        };
        match plan.get(seq.next) {
            Some(planned) => {
                let gesture = planned.gesture;
                if let Some(s) = self.sequence.as_mut() {
                    s.next += 1;
                }
                Some(gesture)
            }
            None => {
                if seq.cadence == Cadence::Active {
                    info!("Active sequence done");
                    self.active_cycle_timer = now;
                }
                self.sequence = None;
                None
            }
        }
    }
}

fn plan(sequence: &Sequence, screen: &ScreenConfig, timing: GestureTiming) -> Result<Plan, TouchKeepError> {
    let mut plan = Plan::new();
    for step in sequence {
        let gesture = step.gesture.build(&screen.size, timing, screen.bounds_check).inspect_err(|_| {
            error!("Invalid gesture in keep-alive table: {:?}", step.gesture);
        })?;
        plan.push(PlannedGesture {
            gesture,
            pause_after_ms: duration_millis(step.pause_after),
        })
        .map_err(|_| TouchKeepError::InvalidParameter)?;
    }
    Ok(plan)
}
