//! Contact report encoding.
//!
//! The byte layout must match the report descriptor registered with the host,
//! see [`crate::usb::descriptor`].

use crate::gesture::ContactEvent;

/// Report id used by [`ReportLayout::Extended`].
pub const CONTACT_REPORT_ID: u8 = 0x01;

/// Largest report produced by any layout.
pub const MAX_REPORT_SIZE: usize = 6;

const STATUS_TIP_SWITCH: u8 = 1 << 0;
const STATUS_IN_RANGE: u8 = 1 << 1;

/// Digitizer report layout, chosen once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportLayout {
    /// 5 bytes, no report id: `[tip, x lo, x hi, y lo, y hi]`
    Legacy,
    /// 6 bytes: `[report id, tip | in range, x lo, x hi, y lo, y hi]`
    #[default]
    Extended,
}

impl ReportLayout {
    pub const fn report_size(&self) -> usize {
        match self {
            ReportLayout::Legacy => 5,
            ReportLayout::Extended => 6,
        }
    }
}

/// An encoded contact report, ready for the HID endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ContactReport {
    buf: [u8; MAX_REPORT_SIZE],
    len: u8,
}

impl ContactReport {
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }

    pub const fn len(&self) -> usize {
        self.len as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Encode one contact event with the given layout.
pub fn encode(event: &ContactEvent, layout: ReportLayout) -> ContactReport {
    let mut buf = [0u8; MAX_REPORT_SIZE];
    let [x_lo, x_hi] = event.position.x.to_le_bytes();
    let [y_lo, y_hi] = event.position.y.to_le_bytes();
    match layout {
        ReportLayout::Legacy => {
            buf[..5].copy_from_slice(&[event.pressed as u8, x_lo, x_hi, y_lo, y_hi]);
        }
        ReportLayout::Extended => {
            let status = if event.pressed {
                STATUS_TIP_SWITCH | STATUS_IN_RANGE
            } else {
                0
            };
            buf.copy_from_slice(&[CONTACT_REPORT_ID, status, x_lo, x_hi, y_lo, y_hi]);
        }
    }

    ContactReport {
        buf,
        len: layout.report_size() as u8,
    }
}
