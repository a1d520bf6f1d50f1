//! Conversion from logical screen pixels to the digitizer's absolute range.

use core::num::NonZeroU16;

use crate::error::TouchKeepError;

/// Logical maximum of the X/Y usages declared in the report descriptor.
pub const LOGICAL_MAX: u16 = 0x7FFF;

const DEFAULT_WIDTH: NonZeroU16 = NonZeroU16::new(1080).unwrap();
const DEFAULT_HEIGHT: NonZeroU16 = NonZeroU16::new(2640).unwrap();

/// A pixel coordinate on the virtual screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScreenPoint {
    pub x: u16,
    pub y: u16,
}

impl ScreenPoint {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// A coordinate in the digitizer's output range `[0, LOGICAL_MAX]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NormalizedPoint {
    pub x: u16,
    pub y: u16,
}

impl NormalizedPoint {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    pub const fn is_in_range(&self) -> bool {
        self.x <= LOGICAL_MAX && self.y <= LOGICAL_MAX
    }
}

/// Resolution of the virtual screen the gestures are authored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScreenSize {
    width: NonZeroU16,
    height: NonZeroU16,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl ScreenSize {
    pub fn new(width: u16, height: u16) -> Result<Self, TouchKeepError> {
        match (NonZeroU16::new(width), NonZeroU16::new(height)) {
            (Some(width), Some(height)) => Ok(Self { width, height }),
            _ => Err(TouchKeepError::InvalidParameter),
        }
    }

    pub const fn width(&self) -> u16 {
        self.width.get()
    }

    pub const fn height(&self) -> u16 {
        self.height.get()
    }

    pub const fn contains(&self, point: ScreenPoint) -> bool {
        point.x <= self.width.get() && point.y <= self.height.get()
    }

    /// Map a screen point to the digitizer range.
    ///
    /// Points outside the screen are not rejected, they map past `LOGICAL_MAX`.
    pub const fn map(&self, point: ScreenPoint) -> NormalizedPoint {
        NormalizedPoint {
            x: scale(point.x, self.width.get()),
            y: scale(point.y, self.height.get()),
        }
    }

    /// Like [`ScreenSize::map`], but rejects points outside the screen.
    pub fn checked_map(&self, point: ScreenPoint) -> Result<NormalizedPoint, TouchKeepError> {
        if self.contains(point) {
            Ok(self.map(point))
        } else {
            Err(TouchKeepError::InvalidParameter)
        }
    }
}

/// `floor(logical * LOGICAL_MAX / dimension)`, saturating at `u16::MAX`.
const fn scale(logical: u16, dimension: u16) -> u16 {
    let scaled = logical as u32 * LOGICAL_MAX as u32 / dimension as u32;
    if scaled > u16::MAX as u32 { u16::MAX } else { scaled as u16 }
}

/// Map `point` on a `screen`, see [`ScreenSize::map`].
pub const fn map(point: ScreenPoint, screen: &ScreenSize) -> NormalizedPoint {
    screen.map(point)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_corners() {
        let screen = ScreenSize::default();
        assert_eq!(screen.map(ScreenPoint::new(0, 0)), NormalizedPoint::new(0, 0));
        assert_eq!(
            screen.map(ScreenPoint::new(1080, 2640)),
            NormalizedPoint::new(LOGICAL_MAX, LOGICAL_MAX)
        );
    }

    #[test]
    fn test_map_truncates() {
        let screen = ScreenSize::default();
        // 900 * 32767 / 1080 = 27305.8, 2050 * 32767 / 2640 = 25444.2
        assert_eq!(screen.map(ScreenPoint::new(900, 2050)), NormalizedPoint::new(27305, 25444));
        // 500 * 32767 / 1080 = 15169.9, 2000 * 32767 / 2640 = 24823.4
        assert_eq!(screen.map(ScreenPoint::new(500, 2000)), NormalizedPoint::new(15169, 24823));
    }

    #[test]
    fn test_map_is_monotonic_and_in_range() {
        let screen = ScreenSize::new(1080, 2640).unwrap();
        let mut prev = screen.map(ScreenPoint::new(0, 0));
        for i in 1..=2640u16 {
            let p = screen.map(ScreenPoint::new(i.min(1080), i));
            assert!(p.x >= prev.x && p.y >= prev.y, "not monotonic at {}", i);
            assert!(p.is_in_range());
            prev = p;
        }
    }

    #[test]
    fn test_map_large_screen_does_not_overflow() {
        let screen = ScreenSize::new(4096, u16::MAX).unwrap();
        assert_eq!(screen.map(ScreenPoint::new(4096, u16::MAX)), NormalizedPoint::new(LOGICAL_MAX, LOGICAL_MAX));
        assert_eq!(screen.map(ScreenPoint::new(2048, 0)).x, 16383);
    }

    #[test]
    fn test_out_of_screen_point() {
        let screen = ScreenSize::new(100, 100).unwrap();
        let p = screen.map(ScreenPoint::new(150, 100));
        assert!(!p.is_in_range());
        assert_eq!(p.x, 49150);
        // Far outside saturates instead of wrapping
        assert_eq!(screen.map(ScreenPoint::new(u16::MAX, 0)).x, u16::MAX);
        assert_eq!(
            screen.checked_map(ScreenPoint::new(150, 100)),
            Err(TouchKeepError::InvalidParameter)
        );
        assert!(screen.checked_map(ScreenPoint::new(100, 100)).is_ok());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(ScreenSize::new(0, 10), Err(TouchKeepError::InvalidParameter));
        assert_eq!(ScreenSize::new(10, 0), Err(TouchKeepError::InvalidParameter));
    }
}
