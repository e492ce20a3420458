//! # Board configuration
//!
//! The device has no non-volatile settings. Everything tunable is fixed at
//! build time in a [`Config`]; register values are derived from it.

use crate::error::{Error, Result};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// CPU clock after prescaling, in Hz.
    pub f_cpu: u32,
    /// Hardware UART rate. Unused with the USB link.
    pub baud: u32,
    /// Timer1 OC1C duty driving the negative-voltage charge pump (10-bit).
    pub vee_duty: u16,
    /// Timer1 OC1B duty setting contrast (10-bit).
    pub contrast: u16,
    /// Main loop tick rate.
    pub tick_hz: u16,
    /// Wait between USB enumeration and polling for DTR.
    pub host_settle_ms: u16,
}

impl Config {
    pub const MODEL100: Config = Config {
        f_cpu: 16_000_000,
        baud: 115_200,
        vee_duty: 0x100,
        contrast: 0x280,
        tick_hz: 64,
        host_settle_ms: 1000,
    };

    /// USART divisor for normal-speed async mode, rounded to nearest.
    pub fn ubrr(&self) -> Result<u16> {
        if self.baud == 0 {
            return Err(Error::UnreachableBaud(self.baud));
        }
        let div = (self.f_cpu + 8 * self.baud) / (16 * self.baud);
        match div.checked_sub(1) {
            Some(ubrr) if ubrr <= 0x0FFF => Ok(ubrr as u16),
            _ => Err(Error::UnreachableBaud(self.baud)),
        }
    }

    /// Timer0 CTC compare value at clk/1024 for the loop tick.
    pub fn tick_compare(&self) -> u8 {
        let hz = self.tick_hz.max(1) as u32;
        let top = (self.f_cpu / 1024 / hz).saturating_sub(1);
        top.clamp(1, 255) as u8
    }

    /// Busy-wait iterations per microsecond, assuming four cycles each.
    pub fn spins_per_us(&self) -> u16 {
        ((self.f_cpu / 1_000_000) / 4).max(1) as u16
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::MODEL100
    }
}
