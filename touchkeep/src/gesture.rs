//! Gesture primitives: tap and swipe.
//!
//! A [`Gesture`] is evaluated lazily: every step is computed from its index, so
//! a gesture is a small `Copy` value and replaying it always yields the same
//! events.

use embassy_time::Duration;

use crate::config::GestureTiming;
use crate::error::TouchKeepError;
use crate::mapper::{NormalizedPoint, ScreenPoint, ScreenSize};

/// One instantaneous contact state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ContactEvent {
    pub position: NormalizedPoint,
    pub pressed: bool,
}

impl ContactEvent {
    pub const fn new(position: NormalizedPoint, pressed: bool) -> Self {
        Self { position, pressed }
    }
}

/// A contact event and the delay before the next one.
///
/// For the final release, `delay` is the settle delay of the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GestureStep {
    pub event: ContactEvent,
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum GestureKind {
    Tap {
        at: NormalizedPoint,
    },
    Swipe {
        from: NormalizedPoint,
        to: NormalizedPoint,
        steps: u16,
    },
}

/// A finite, ordered sequence of [`GestureStep`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gesture {
    kind: GestureKind,
    timing: GestureTiming,
}

impl Gesture {
    /// Press and release at `at`.
    pub const fn tap_at(at: NormalizedPoint, timing: GestureTiming) -> Self {
        Self {
            kind: GestureKind::Tap { at },
            timing,
        }
    }

    /// Press at `from`, move in `steps` linear steps to `to`, release at `to`.
    pub fn swipe_between(
        from: NormalizedPoint,
        to: NormalizedPoint,
        steps: u16,
        timing: GestureTiming,
    ) -> Result<Self, TouchKeepError> {
        if steps == 0 {
            return Err(TouchKeepError::InvalidParameter);
        }
        Ok(Self {
            kind: GestureKind::Swipe { from, to, steps },
            timing,
        })
    }

    /// Number of contact events in the gesture.
    pub const fn len(&self) -> usize {
        match self.kind {
            GestureKind::Tap { .. } => 2,
            GestureKind::Swipe { steps, .. } => steps as usize + 2,
        }
    }

    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Pause after the release before another gesture may start.
    pub const fn settle(&self) -> Duration {
        self.timing.settle
    }

    /// The step at `index`, `None` past the release.
    pub fn step(&self, index: usize) -> Option<GestureStep> {
        let last = self.len() - 1;
        if index > last {
            return None;
        }
        let step = match self.kind {
            GestureKind::Tap { at } => {
                if index == 0 {
                    GestureStep {
                        event: ContactEvent::new(at, true),
                        delay: self.timing.tap_hold,
                    }
                } else {
                    GestureStep {
                        event: ContactEvent::new(at, false),
                        delay: self.timing.settle,
                    }
                }
            }
            GestureKind::Swipe { from, to, steps } => {
                if index == 0 {
                    GestureStep {
                        event: ContactEvent::new(from, true),
                        delay: self.timing.swipe_step,
                    }
                } else if index == last {
                    GestureStep {
                        event: ContactEvent::new(to, false),
                        delay: self.timing.settle,
                    }
                } else {
                    GestureStep {
                        event: ContactEvent::new(interpolate(from, to, index as u16, steps), true),
                        delay: self.timing.swipe_step,
                    }
                }
            }
        };
        Some(step)
    }

    pub fn iter(&self) -> GestureIter {
        GestureIter {
            gesture: *self,
            index: 0,
        }
    }
}

impl IntoIterator for &Gesture {
    type Item = GestureStep;
    type IntoIter = GestureIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the steps of a [`Gesture`].
pub struct GestureIter {
    gesture: Gesture,
    index: usize,
}

impl Iterator for GestureIter {
    type Item = GestureStep;

    fn next(&mut self) -> Option<Self::Item> {
        let step = self.gesture.step(self.index)?;
        self.index += 1;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.gesture.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GestureIter {}

/// Linear interpolation in normalized space, truncating toward zero.
fn interpolate(from: NormalizedPoint, to: NormalizedPoint, step: u16, steps: u16) -> NormalizedPoint {
    let axis = |a: u16, b: u16| -> u16 {
        let a = a as i64;
        let b = b as i64;
        (a + (b - a) * step as i64 / steps as i64) as u16
    };
    NormalizedPoint::new(axis(from.x, to.x), axis(from.y, to.y))
}

/// Tap at a screen point.
pub fn tap(point: ScreenPoint, screen: &ScreenSize, timing: GestureTiming) -> Gesture {
    Gesture::tap_at(screen.map(point), timing)
}

/// Swipe between two screen points. `steps` must be at least 1.
pub fn swipe(
    start: ScreenPoint,
    end: ScreenPoint,
    steps: u16,
    screen: &ScreenSize,
    timing: GestureTiming,
) -> Result<Gesture, TouchKeepError> {
    Gesture::swipe_between(screen.map(start), screen.map(end), steps, timing)
}

/// A gesture as written in the keep-alive choreography.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GestureSpec {
    Tap(ScreenPoint),
    Swipe {
        from: ScreenPoint,
        to: ScreenPoint,
        steps: u16,
    },
}

impl GestureSpec {
    /// Build the gesture on `screen`.
    ///
    /// With `bounds_check`, points outside the screen are rejected.
    pub fn build(
        &self,
        screen: &ScreenSize,
        timing: GestureTiming,
        bounds_check: bool,
    ) -> Result<Gesture, TouchKeepError> {
        let map = |p: ScreenPoint| {
            if bounds_check {
                screen.checked_map(p)
            } else {
                Ok(screen.map(p))
            }
        };
        match *self {
            GestureSpec::Tap(at) => Ok(Gesture::tap_at(map(at)?, timing)),
            GestureSpec::Swipe { from, to, steps } => Gesture::swipe_between(map(from)?, map(to)?, steps, timing),
        }
    }
}

/// One entry of a choreography: a gesture and the pause after it returns to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceStep {
    pub gesture: GestureSpec,
    pub pause_after: Duration,
}

impl SequenceStep {
    pub const fn new(gesture: GestureSpec, pause_after: Duration) -> Self {
        Self { gesture, pause_after }
    }
}
