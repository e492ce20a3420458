//! # Timers
//!
//! Timer0 runs free in CTC mode and raises `OCF0A` at the loop tick rate;
//! nothing is wired to the interrupt, the loop polls the flag.
//!
//! Timer1 generates the two analog rails the glass needs, as 10-bit fast PWM
//! at clk/1:
//!
//! | Output | Pin  | Feeds                       | Duty              |
//! |--------|------|-----------------------------|-------------------|
//! | OC1B   | `B6` | contrast (`VO`)             | [`Config::contrast`] |
//! | OC1C   | `B7` | Vee charge pump (`V2`)      | [`Config::vee_duty`] |
//!
//! Both outputs clear on compare match and set at `TOP`.

use bitflags::bitflags;
use volatile_register::RW;

use crate::{config::Config, console::Ticker};

const TIFR0: usize = 0x35;
const TIMER0: usize = 0x44;
const TIMER1: usize = 0x80;

bitflags! {
    /// `TIFR0`. Flags are cleared by writing a one.
    #[derive(Copy, Clone)]
    pub struct Tifr0: u8 {
        const TOV0  = 0b0000_0001;
        const OCF0A = 0b0000_0010;
        const OCF0B = 0b0000_0100;
    }

    #[derive(Copy, Clone)]
    pub struct Tccr0a: u8 {
        const WGM00 = 0b0000_0001;
        /// CTC when alone.
        const WGM01 = 0b0000_0010;
    }

    #[derive(Copy, Clone)]
    pub struct Tccr0b: u8 {
        const CS00 = 0b0000_0001;
        const CS01 = 0b0000_0010;
        const CS02 = 0b0000_0100;
        const WGM02 = 0b0000_1000;
        /// clk/1024
        const CLK_1024 = Self::CS02.bits() | Self::CS00.bits();
    }

    #[derive(Copy, Clone)]
    pub struct Tccr1a: u8 {
        const WGM10  = 0b0000_0001;
        const WGM11  = 0b0000_0010;
        const COM1C0 = 0b0000_0100;
        const COM1C1 = 0b0000_1000;
        const COM1B0 = 0b0001_0000;
        const COM1B1 = 0b0010_0000;
        const COM1A0 = 0b0100_0000;
        const COM1A1 = 0b1000_0000;
    }

    #[derive(Copy, Clone)]
    pub struct Tccr1b: u8 {
        const CS10  = 0b0000_0001;
        const CS11  = 0b0000_0010;
        const CS12  = 0b0000_0100;
        const WGM12 = 0b0000_1000;
        const WGM13 = 0b0001_0000;
    }
}

#[repr(C)]
pub struct Timer0Regs {
    pub tccr0a: RW<u8>,
    pub tccr0b: RW<u8>,
    pub tcnt0: RW<u8>,
    pub ocr0a: RW<u8>,
    pub ocr0b: RW<u8>,
}

/// Free-running loop tick on Timer0.
pub struct Tick {
    tifr: &'static mut RW<u8>,
    regs: &'static mut Timer0Regs,
}

impl Tick {
    /// Start Timer0 in CTC mode at clk/1024 with `OCR0A` from `config`.
    ///
    /// # Safety
    /// Must be the only owner of Timer0.
    pub unsafe fn start(config: &Config) -> Self {
        let tick = unsafe {
            Self {
                tifr: &mut *(TIFR0 as *mut RW<u8>),
                regs: &mut *(TIMER0 as *mut Timer0Regs),
            }
        };
        unsafe {
            tick.regs.tccr0a.write(Tccr0a::WGM01.bits());
            tick.regs.tccr0b.write(Tccr0b::CLK_1024.bits());
            tick.regs.ocr0a.write(config.tick_compare());
            tick.tifr.write(Tifr0::OCF0A.bits());
        }
        tick
    }
}

impl Ticker for Tick {
    fn take_tick(&mut self) -> bool {
        if !Tifr0::from_bits_truncate(self.tifr.read()).contains(Tifr0::OCF0A) {
            return false;
        }
        unsafe { self.tifr.write(Tifr0::OCF0A.bits()) };
        true
    }
}

#[repr(C)]
pub struct Timer1Regs {
    pub tccr1a: RW<u8>,
    pub tccr1b: RW<u8>,
    pub tccr1c: RW<u8>,
    _reserved: u8,
    pub tcnt1l: RW<u8>,
    pub tcnt1h: RW<u8>,
    pub icr1l: RW<u8>,
    pub icr1h: RW<u8>,
    pub ocr1al: RW<u8>,
    pub ocr1ah: RW<u8>,
    pub ocr1bl: RW<u8>,
    pub ocr1bh: RW<u8>,
    pub ocr1cl: RW<u8>,
    pub ocr1ch: RW<u8>,
}

/// Contrast and Vee PWM on Timer1.
pub struct Bias {
    regs: &'static mut Timer1Regs,
}

impl Bias {
    /// # Safety
    /// Must be the only owner of Timer1.
    pub unsafe fn start(config: &Config) -> Self {
        let mut bias = Self {
            regs: unsafe { &mut *(TIMER1 as *mut Timer1Regs) },
        };
        let a = Tccr1a::WGM11 | Tccr1a::WGM10 | Tccr1a::COM1C1 | Tccr1a::COM1B1;
        let b = Tccr1b::WGM12 | Tccr1b::CS10;
        unsafe {
            bias.regs.tccr1a.write(a.bits());
            bias.regs.tccr1b.write(b.bits());
        }
        bias.set_vee(config.vee_duty);
        bias.set_contrast(config.contrast);
        bias
    }

    pub fn set_vee(&mut self, duty: u16) {
        let [lo, hi] = duty.min(0x3FF).to_le_bytes();
        // high byte first: it is latched through TEMP
        unsafe {
            self.regs.ocr1ch.write(hi);
            self.regs.ocr1cl.write(lo);
        }
    }

    pub fn set_contrast(&mut self, duty: u16) {
        let [lo, hi] = duty.min(0x3FF).to_le_bytes();
        unsafe {
            self.regs.ocr1bh.write(hi);
            self.regs.ocr1bl.write(lo);
        }
    }
}
