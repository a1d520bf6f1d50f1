//! HID report descriptors of the digitizer.
//!
//! One descriptor per [`ReportLayout`], each byte-for-byte matching what
//! [`crate::report::encode`] produces for that layout.

use usbd_hid::descriptor::SerializedDescriptor;

use crate::report::ReportLayout;

/// Touch screen, one finger, tip switch only, no report id. 5 byte reports.
pub struct LegacyContactReport;

/// Touch screen, one finger, tip switch + in range, report id 1. 6 byte reports.
pub struct ExtendedContactReport;

#[rustfmt::skip]
const LEGACY_DESCRIPTOR: [u8; 48] = [
    0x05, 0x0D,             // Usage Page (Digitizer)
    0x09, 0x04,             // Usage (Touch Screen)
    0xA1, 0x01,             // Collection (Application)
    0x09, 0x22,             //   Usage (Finger)
    0xA1, 0x02,             //   Collection (Logical)
    0x09, 0x42,             //     Usage (Tip Switch)
    0x15, 0x00,             //     Logical Minimum (0)
    0x25, 0x01,             //     Logical Maximum (1)
    0x75, 0x01,             //     Report Size (1)
    0x95, 0x01,             //     Report Count (1)
    0x81, 0x02,             //     Input (Data, Variable, Absolute)
    0x75, 0x07,             //     Report Size (7)
    0x95, 0x01,             //     Report Count (1)
    0x81, 0x03,             //     Input (Constant)
    0x05, 0x01,             //     Usage Page (Generic Desktop)
    0x09, 0x30,             //     Usage (X)
    0x09, 0x31,             //     Usage (Y)
    0x16, 0x00, 0x00,       //     Logical Minimum (0)
    0x26, 0xFF, 0x7F,       //     Logical Maximum (32767)
    0x75, 0x10,             //     Report Size (16)
    0x95, 0x02,             //     Report Count (2)
    0x81, 0x02,             //     Input (Data, Variable, Absolute)
    0xC0,                   //   End Collection
    0xC0,                   // End Collection
];

#[rustfmt::skip]
const EXTENDED_DESCRIPTOR: [u8; 52] = [
    0x05, 0x0D,             // Usage Page (Digitizer)
    0x09, 0x04,             // Usage (Touch Screen)
    0xA1, 0x01,             // Collection (Application)
    0x85, 0x01,             //   Report ID (1)
    0x09, 0x22,             //   Usage (Finger)
    0xA1, 0x02,             //   Collection (Logical)
    0x09, 0x42,             //     Usage (Tip Switch)
    0x09, 0x32,             //     Usage (In Range)
    0x15, 0x00,             //     Logical Minimum (0)
    0x25, 0x01,             //     Logical Maximum (1)
    0x75, 0x01,             //     Report Size (1)
    0x95, 0x02,             //     Report Count (2)
    0x81, 0x02,             //     Input (Data, Variable, Absolute)
    0x75, 0x06,             //     Report Size (6)
    0x95, 0x01,             //     Report Count (1)
    0x81, 0x03,             //     Input (Constant)
    0x05, 0x01,             //     Usage Page (Generic Desktop)
    0x09, 0x30,             //     Usage (X)
    0x09, 0x31,             //     Usage (Y)
    0x16, 0x00, 0x00,       //     Logical Minimum (0)
    0x26, 0xFF, 0x7F,       //     Logical Maximum (32767)
    0x75, 0x10,             //     Report Size (16)
    0x95, 0x02,             //     Report Count (2)
    0x81, 0x02,             //     Input (Data, Variable, Absolute)
    0xC0,                   //   End Collection
    0xC0,                   // End Collection
];

impl SerializedDescriptor for LegacyContactReport {
    fn desc() -> &'static [u8] {
        &LEGACY_DESCRIPTOR
    }
}

impl SerializedDescriptor for ExtendedContactReport {
    fn desc() -> &'static [u8] {
        &EXTENDED_DESCRIPTOR
    }
}

/// The report descriptor matching `layout`.
pub fn report_descriptor(layout: ReportLayout) -> &'static [u8] {
    match layout {
        ReportLayout::Legacy => LegacyContactReport::desc(),
        ReportLayout::Extended => ExtendedContactReport::desc(),
    }
}
