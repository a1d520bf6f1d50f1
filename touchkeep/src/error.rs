/// Errors of the gesture pipeline.
///
/// None of them is fatal: transport errors are retried on the next poll and
/// `InvalidParameter` is only produced while building gestures or validating
/// the configuration at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchKeepError {
    /// Zero swipe steps, zero screen dimension or a point outside the screen
    InvalidParameter,
    /// The transport is not mounted or cannot take a report right now
    TransportNotReady,
    /// The transport refused the report
    TransportRejected,
}
