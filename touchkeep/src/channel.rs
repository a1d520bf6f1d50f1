//! Channel between the scheduler and the USB report writer

use embassy_sync::channel::Channel;

use crate::RawMutex;
use crate::report::ContactReport;

/// The transport takes one report at a time: a report is accepted only when the
/// previous one has been handed to the endpoint.
pub const REPORT_CHANNEL_SIZE: usize = 1;

/// Channel for contact reports from the scheduler to the hid writer
pub static CONTACT_REPORT_CHANNEL: Channel<RawMutex, ContactReport, REPORT_CHANNEL_SIZE> = Channel::new();
