//! # USART1
//!
//! The alternative host link: 8N1 at [`Config::baud`] on `D2`/`D3`.
//! Received bytes arrive through the `USART1_RX` interrupt, which only
//! calls [`on_receive`] to move the byte into [`RX_QUEUE`]. Transmit polls
//! `UDRE1`.
//!
//! ```ignore
//! #[unsafe(no_mangle)]
//! pub unsafe extern "avr-interrupt" fn __vector_25() {
//!     unsafe { uart::on_receive() };
//! }
//! ```

use bitflags::bitflags;
use volatile_register::RW;

use crate::{config::Config, console::HostLink, error::Result, queue::RxQueue};

const USART1: usize = 0xC8;

bitflags! {
    #[derive(Copy, Clone)]
    pub struct Ucsr1a: u8 {
        const MPCM = 0b0000_0001;
        const U2X  = 0b0000_0010;
        const UPE  = 0b0000_0100;
        const DOR  = 0b0000_1000;
        const FE   = 0b0001_0000;
        const UDRE = 0b0010_0000;
        const TXC  = 0b0100_0000;
        const RXC  = 0b1000_0000;
    }

    #[derive(Copy, Clone)]
    pub struct Ucsr1b: u8 {
        const TXB8  = 0b0000_0001;
        const RXB8  = 0b0000_0010;
        const UCSZ2 = 0b0000_0100;
        const TXEN  = 0b0000_1000;
        const RXEN  = 0b0001_0000;
        const UDRIE = 0b0010_0000;
        const TXCIE = 0b0100_0000;
        const RXCIE = 0b1000_0000;
    }

    #[derive(Copy, Clone)]
    pub struct Ucsr1c: u8 {
        const UCPOL = 0b0000_0001;
        const UCSZ0 = 0b0000_0010;
        const UCSZ1 = 0b0000_0100;
        const USBS  = 0b0000_1000;
        const UPM0  = 0b0001_0000;
        const UPM1  = 0b0010_0000;
        /// 8 data bits, no parity, one stop bit.
        const FRAME_8N1 = Self::UCSZ1.bits() | Self::UCSZ0.bits();
    }
}

#[repr(C)]
pub struct Usart1Regs {
    pub ucsr1a: RW<u8>,
    pub ucsr1b: RW<u8>,
    pub ucsr1c: RW<u8>,
    _reserved: u8,
    pub ubrr1l: RW<u8>,
    pub ubrr1h: RW<u8>,
    pub udr1: RW<u8>,
}

/// Bytes received by the interrupt, waiting for the main loop.
pub static RX_QUEUE: RxQueue<128> = RxQueue::new();

pub struct Usart1 {
    regs: &'static mut Usart1Regs,
}

impl Usart1 {
    /// Configure USART1 for 8N1 with the receive interrupt enabled.
    /// Interrupts still have to be enabled globally.
    ///
    /// # Safety
    /// Must be the only owner of USART1.
    pub unsafe fn new(config: &Config) -> Result<Self> {
        let ubrr = config.ubrr()?;
        let usart = Self {
            regs: unsafe { &mut *(USART1 as *mut Usart1Regs) },
        };
        let [lo, hi] = ubrr.to_le_bytes();
        unsafe {
            usart.regs.ubrr1h.write(hi);
            usart.regs.ubrr1l.write(lo);
            usart.regs.ucsr1c.write(Ucsr1c::FRAME_8N1.bits());
            usart.regs.ucsr1b.write((Ucsr1b::RXEN | Ucsr1b::TXEN | Ucsr1b::RXCIE).bits());
        }
        Ok(usart)
    }

    fn status(&self) -> Ucsr1a {
        Ucsr1a::from_bits_truncate(self.regs.ucsr1a.read())
    }

    fn putc(&mut self, byte: u8) {
        while !self.status().contains(Ucsr1a::UDRE) {}
        unsafe { self.regs.udr1.write(byte) };
    }
}

impl HostLink for Usart1 {
    fn read(&mut self) -> Option<u8> {
        RX_QUEUE.pop()
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.putc(byte);
        }
    }
}

/// Body of the receive interrupt. Drops the byte when the queue is full.
///
/// # Safety
/// Call only from the `USART1_RX` vector.
#[inline(always)]
pub unsafe fn on_receive() {
    let regs = unsafe { &*(USART1 as *const Usart1Regs) };
    RX_QUEUE.push(regs.udr1.read());
}
