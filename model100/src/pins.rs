//! # Pins and Ports
//!
//! The AT90USB1286 exposes six 8-bit ports, each a triplet of registers:
//!
//! | Register | Meaning                                              |
//! |----------|------------------------------------------------------|
//! | `PINx`   | Sampled input levels                                 |
//! | `DDRx`   | Direction: 1 = output                                |
//! | `PORTx`  | Output latch; on an input bit, 1 enables the pull-up |
//!
//! [`PinBank`] addresses either a whole register or a single [`Pin`], so the
//! display driver can write the data port in one go and flip `EN` on its own.

use bit_field::BitField;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Port {
    pub const ALL: [Port; 6] = [Port::A, Port::B, Port::C, Port::D, Port::E, Port::F];

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One bit of one port.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Pin {
    pub port: Port,
    pub bit: u8,
}

impl Pin {
    pub const fn new(port: Port, bit: u8) -> Self {
        assert!(bit < 8, "pin bit out of range");
        Self { port, bit }
    }

    #[inline(always)]
    pub const fn mask(self) -> u8 {
        1 << self.bit
    }
}

/// Uniform access to the port registers plus the busy-waits the bus
/// protocols are timed with.
pub trait PinBank {
    /// Sample the input pins (`PINx`).
    fn pins(&self, port: Port) -> u8;

    /// Current output latch (`PORTx`).
    fn port(&self, port: Port) -> u8;

    fn set_port(&mut self, port: Port, value: u8);

    /// Current direction register (`DDRx`).
    fn ddr(&self, port: Port) -> u8;

    fn set_ddr(&mut self, port: Port, value: u8);

    fn delay_us(&mut self, us: u16);

    fn delay_ms(&mut self, ms: u16) {
        for _ in 0..ms {
            self.delay_us(1000);
        }
    }

    /// Drive a single output latch bit.
    #[inline]
    fn out(&mut self, pin: Pin, high: bool) {
        let mut value = self.port(pin.port);
        value.set_bit(pin.bit as usize, high);
        self.set_port(pin.port, value);
    }

    /// Set a single direction bit.
    #[inline]
    fn direction(&mut self, pin: Pin, output: bool) {
        let mut value = self.ddr(pin.port);
        value.set_bit(pin.bit as usize, output);
        self.set_ddr(pin.port, value);
    }

    /// Whether the output latch for `pin` is high.
    #[inline]
    fn is_set(&self, pin: Pin) -> bool {
        self.port(pin.port).get_bit(pin.bit as usize)
    }
}
