//! The HID transport seen by the gesture scheduler.

use crate::error::TouchKeepError;
use crate::report::ContactReport;

/// Transport that delivers contact reports to the host, via USB.
///
/// Everything here is non-blocking: the scheduler asks whether a report can be
/// sent and retries on its next poll if not.
pub trait HidTransport {
    /// Whether the host has configured the device.
    fn is_mounted(&self) -> bool;

    /// Whether a report can be accepted right now.
    fn is_ready(&self) -> bool;

    /// Hand one report to the transport, returns whether it was accepted.
    fn send_report(&mut self, report: &ContactReport) -> bool;

    /// Check readiness, then send.
    fn try_send(&mut self, report: &ContactReport) -> Result<(), TouchKeepError> {
        if !self.is_mounted() || !self.is_ready() {
            return Err(TouchKeepError::TransportNotReady);
        }
        if !self.send_report(report) {
            return Err(TouchKeepError::TransportRejected);
        }
        Ok(())
    }
}
