//! # Tile driver
//!
//! One HD44102 drives a 50×32 pixel tile: 50 columns by four pages, each
//! page a byte-row of 8 vertical pixels (MSB at the top).
//!
//! Every transfer follows the same handshake and ends with a status read:
//!
//! ```text
//! write: DI, RW=0, EN↑, port out, 2µs, data, 2µs, EN↓ (latch)
//! read:  DI, RW=1, port in, EN↑, 2µs, sample, 2µs, EN↓
//! then:  2µs, port in, DI=0, RW=1, EN↑, 10µs, status, EN↓, RW=0
//! ```
//!
//! The first data read after addressing returns the stale output latch and
//! has to be thrown away; [`TileSelect::read_data`] does that.

use bitflags::bitflags;

use crate::{
    board::{DATA_INSTRUCTION, ENABLE, LCD_DATA, READ_WRITE, TILE_SELECT},
    bus::TileSelect,
    error::{Error, Result},
    pins::{Pin, PinBank},
};

pub const DISPLAY_OFF: u8 = 0x38;
pub const DISPLAY_ON: u8 = 0x39;
pub const COUNT_DOWN: u8 = 0x3A;
/// Column address increments after every data transfer.
pub const COUNT_UP: u8 = 0x3B;
/// Display start page 0. The page lives in the top two bits.
pub const START_PAGE_0: u8 = 0x3E;

const SETUP_US: u16 = 2;
const HOLD_US: u16 = 2;
const STATUS_US: u16 = 10;
const COMMAND_MS: u16 = 1;

bitflags! {
    /// HD44102 status byte.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Status: u8 {
        const BUSY        = 0b1000_0000;
        const COUNT_UP    = 0b0100_0000;
        const DISPLAY_OFF = 0b0010_0000;
        const RESET       = 0b0001_0000;
    }
}

/// Selects the register behind a transfer (the `DI` line).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Register {
    Instruction,
    Data,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Write,
    Read,
}

/// One of the ten controllers. Tiles 0-4 are the top half left to right,
/// 5-9 the bottom half.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Tile(u8);

impl Tile {
    pub const COUNT: u8 = 10;
    pub const WIDTH: u8 = 50;
    pub const HEIGHT: u8 = 32;
    pub const PER_ROW: u8 = 5;

    pub fn new(index: u8) -> Result<Self> {
        if index < Self::COUNT {
            Ok(Self(index))
        } else {
            Err(Error::InvalidTile(index))
        }
    }

    pub(crate) const fn from_index(index: u8) -> Self {
        Self(index)
    }

    pub fn all() -> impl Iterator<Item = Tile> {
        (0..Self::COUNT).map(Tile)
    }

    #[inline(always)]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub const fn select_pin(self) -> Pin {
        TILE_SELECT[self.0 as usize]
    }

    /// Top-left pixel of the tile in frame coordinates.
    pub const fn origin(self) -> (u8, u8) {
        (
            (self.0 % Self::PER_ROW) * Self::WIDTH,
            (self.0 / Self::PER_ROW) * Self::HEIGHT,
        )
    }
}

/// Combined page/column address byte: `((y >> 3) << 6) | x`, with `x` the
/// local column (0-49) and `y` the local pixel row (0-31, multiple of 8).
#[inline(always)]
pub const fn address(x: u8, y: u8) -> u8 {
    ((y >> 3) << 6) | x
}

impl<'a, B: PinBank> TileSelect<'a, B> {
    /// Move one byte to or from the selected controller.
    ///
    /// A write returns the status byte sampled after the latch; a read
    /// returns the byte on the bus. The status is never checked.
    pub fn xfer(&mut self, byte: u8, register: Register, direction: Direction) -> u8 {
        let bank = &mut *self.bank;

        bank.out(DATA_INSTRUCTION, register == Register::Data);
        bank.out(READ_WRITE, direction == Direction::Read);

        let mut value = 0;
        match direction {
            Direction::Write => {
                bank.out(ENABLE, true);
                bank.set_ddr(LCD_DATA, 0xFF);
                bank.delay_us(SETUP_US);
                bank.set_port(LCD_DATA, byte);
            }
            Direction::Read => {
                bank.set_ddr(LCD_DATA, 0x00);
                bank.set_port(LCD_DATA, 0x00); // no pull-ups
                bank.out(ENABLE, true);
                bank.delay_us(SETUP_US);
                value = bank.pins(LCD_DATA);
            }
        }

        bank.delay_us(HOLD_US);
        bank.out(ENABLE, false);

        // released; read back status
        bank.delay_us(HOLD_US);
        bank.set_port(LCD_DATA, 0x00);
        bank.set_ddr(LCD_DATA, 0x00);

        bank.out(DATA_INSTRUCTION, false);
        bank.out(READ_WRITE, true);
        bank.out(ENABLE, true);
        bank.delay_us(STATUS_US);
        let status = bank.pins(LCD_DATA);
        bank.out(ENABLE, false);

        bank.out(READ_WRITE, false);

        match direction {
            Direction::Write => status,
            Direction::Read => value,
        }
    }

    pub fn command(&mut self, byte: u8) -> Status {
        Status::from_bits_truncate(self.xfer(byte, Register::Instruction, Direction::Write))
    }

    pub fn set_address(&mut self, x: u8, y: u8) {
        debug_assert!(x < Tile::WIDTH && y < Tile::HEIGHT);
        self.command(address(x, y));
    }

    pub fn write_data(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.xfer(byte, Register::Data, Direction::Write);
        }
    }

    /// Fill `out` from the current address, discarding the dummy read.
    pub fn read_data(&mut self, out: &mut [u8]) {
        self.xfer(0, Register::Data, Direction::Read);
        for byte in out.iter_mut() {
            *byte = self.xfer(0, Register::Data, Direction::Read);
        }
    }

    /// Bring the controller up: display on, count up, address 0, start
    /// page 0, a millisecond after each.
    pub fn activate(&mut self) -> Status {
        let mut status = Status::empty();
        for cmd in [DISPLAY_ON, COUNT_UP, address(0, 0), START_PAGE_0] {
            status = self.command(cmd);
            self.bank.delay_ms(COMMAND_MS);
        }
        status
    }
}
