use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Current USB state, see [`UsbState`]
pub(crate) static USB_STATE: AtomicU8 = AtomicU8::new(UsbState::Disabled as u8);
/// Whether the bus is suspended
pub(crate) static USB_SUSPENDED: AtomicBool = AtomicBool::new(false);
/// Whether the host allowed remote wakeup
pub(crate) static REMOTE_WAKEUP_ENABLED: AtomicBool = AtomicBool::new(false);

/// USB state
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsbState {
    // Disconnected
    Disabled = 0x0,
    // Connected, but NOT ready
    Enabled = 0x1,
    // Connected, ready to use
    Configured = 0x2,
}

impl From<u8> for UsbState {
    fn from(state: u8) -> Self {
        match state {
            1 => UsbState::Enabled,
            2 => UsbState::Configured,
            _ => UsbState::Disabled,
        }
    }
}

pub fn get_usb_state() -> UsbState {
    USB_STATE.load(Ordering::Acquire).into()
}

pub(crate) fn set_usb_state(state: UsbState) {
    USB_STATE.store(state as u8, Ordering::Release);
}

pub fn is_suspended() -> bool {
    USB_SUSPENDED.load(Ordering::Acquire)
}
