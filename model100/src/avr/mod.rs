//! # AT90USB1286 registers
//!
//! Memory-mapped register blocks for the pieces of the chip the terminal
//! uses. Everything here is a thin `volatile-register` overlay; the logic
//! lives in the hardware-independent modules above.
//!
//! | Block            | Address        | Used for                      |
//! |------------------|----------------|-------------------------------|
//! | [`PortRegs`] ×6  | `$20`-`$31`    | [`Ports`], the real [`PinBank`] |
//! | `TIFR0`          | `$35`          | loop tick flag                |
//! | Timer0           | `$44`-`$48`    | [`timer::Tick`]               |
//! | `CLKPR`          | `$61`          | clock prescaler               |
//! | `ADMUX`          | `$7C`          | ADC off                       |
//! | Timer1           | `$80`-`$8D`    | [`timer::Bias`] PWM           |
//! | USART1           | `$C8`-`$CE`    | [`uart::Usart1`]              |
//!
//! Constructors are `unsafe`: each hands out a `&'static mut` to fixed
//! addresses, so the caller must make sure only one exists.

pub mod timer;
pub mod uart;

use core::hint::black_box;

use volatile_register::RW;

use crate::{
    config::Config,
    pins::{PinBank, Port},
};

const PORTS: usize = 0x20;
const CLKPR: usize = 0x61;
const ADMUX: usize = 0x7C;

const CLKPCE: u8 = 0x80;

/// `PINx`, `DDRx`, `PORTx` for one port.
#[repr(C)]
pub struct PortRegs {
    pub pin: RW<u8>,
    pub ddr: RW<u8>,
    pub port: RW<u8>,
}

/// The six GPIO ports.
pub struct Ports {
    regs: &'static mut [PortRegs; 6],
    spins_per_us: u16,
}

impl Ports {
    /// # Safety
    /// Must be the only live `Ports`.
    pub unsafe fn new(config: &Config) -> Self {
        Self {
            regs: unsafe { &mut *(PORTS as *mut [PortRegs; 6]) },
            spins_per_us: config.spins_per_us(),
        }
    }

    #[inline(always)]
    fn regs(&self, port: Port) -> &PortRegs {
        &self.regs[port.index()]
    }
}

impl PinBank for Ports {
    #[inline(always)]
    fn pins(&self, port: Port) -> u8 {
        self.regs(port).pin.read()
    }

    #[inline(always)]
    fn port(&self, port: Port) -> u8 {
        self.regs(port).port.read()
    }

    #[inline(always)]
    fn set_port(&mut self, port: Port, value: u8) {
        unsafe { self.regs(port).port.write(value) }
    }

    #[inline(always)]
    fn ddr(&self, port: Port) -> u8 {
        self.regs(port).ddr.read()
    }

    #[inline(always)]
    fn set_ddr(&mut self, port: Port, value: u8) {
        unsafe { self.regs(port).ddr.write(value) }
    }

    fn delay_us(&mut self, us: u16) {
        for _ in 0..us {
            for i in 0..self.spins_per_us {
                black_box(i);
            }
        }
    }
}

/// Run the core at the full crystal rate and switch the ADC mux off.
///
/// # Safety
/// Writes `CLKPR`, which has a four-cycle unlock window; call with
/// interrupts disabled.
pub unsafe fn init_cpu() {
    unsafe {
        let clkpr = &*(CLKPR as *const RW<u8>);
        clkpr.write(CLKPCE);
        clkpr.write(0);

        let admux = &*(ADMUX as *const RW<u8>);
        admux.write(0);
    }
}
