//! # USB-CDC host link
//!
//! Bindings to PJRC's `usb_serial` (linked by `build.rs`). The device shows
//! up as an ACM serial port; the host signals it is listening by raising
//! DTR.

use bitflags::bitflags;
use model100::{HostLink, PinBank};

bitflags! {
    /// Line state set by the host (`usb_serial_get_control`).
    #[derive(Copy, Clone)]
    pub struct LineControl: u8 {
        const DTR = 0x01;
        const RTS = 0x02;
    }
}

unsafe extern "C" {
    fn usb_init();
    fn usb_configured() -> u8;
    fn usb_serial_getchar() -> i16;
    fn usb_serial_write(buffer: *const u8, size: u16) -> i8;
    fn usb_serial_get_control() -> u8;
    fn usb_serial_flush_input();
}

pub struct UsbSerial {
    _private: (),
}

impl UsbSerial {
    /// Start the USB controller. Enumeration happens in its interrupts.
    ///
    /// # Safety
    /// Call once.
    pub unsafe fn init() -> Self {
        unsafe { usb_init() };
        Self { _private: () }
    }

    pub fn configured(&self) -> bool {
        unsafe { usb_configured() != 0 }
    }

    pub fn control(&self) -> LineControl {
        LineControl::from_bits_truncate(unsafe { usb_serial_get_control() })
    }

    /// Block until the host has configured the device and opened the port,
    /// then throw away anything it sent before that (modem probes and the
    /// like).
    pub fn wait_for_host<B: PinBank>(&mut self, bank: &mut B, settle_ms: u16) {
        while !self.configured() {}
        bank.delay_ms(settle_ms);
        while !self.control().contains(LineControl::DTR) {}
        unsafe { usb_serial_flush_input() };
        log::info!("host connected");
    }
}

impl HostLink for UsbSerial {
    fn read(&mut self) -> Option<u8> {
        match unsafe { usb_serial_getchar() } {
            c @ 0..=0xFF => Some(c as u8),
            _ => None,
        }
    }

    fn write(&mut self, bytes: &[u8]) {
        // the driver takes at most 64 KiB per call
        for chunk in bytes.chunks(u16::MAX as usize) {
            unsafe { usb_serial_write(chunk.as_ptr(), chunk.len() as u16) };
        }
    }
}
