//! # Keyboard
//!
//! An 8×8 matrix plus a modifier column. Rows are port A with pull-ups; a
//! pressed key pulls its row low while its column is driven low. The
//! columns are the tile selects, so a scan runs under a
//! [`ScanLease`](crate::bus::ScanLease) and hands the pins back exactly as it
//! found them.
//!
//! ## Scan order
//!
//! 1. Rows to inputs with pull-ups, columns and the modifier pin high.
//! 2. Modifier column low, settle, sample: the complement is the [`Modifiers`].
//! 3. Columns 0-7 low one at a time; the first one with any row down wins.
//! 4. Lease drops, pins restored.
//!
//! Only one key is reported per scan, and ghosting is not detected.
//! Repeat suppression is the caller's job.
//!
//! ## Special keys
//!
//! Bytes `0x80..=0x93` in the layout are non-character keys and bypass case
//! folding. [`KEY_F1`] requests a redraw; the arrows go to the host as
//! `ESC A`..`ESC D` (see [`encode`]).

use bitflags::bitflags;
use heapless::Vec;
use log::trace;

use crate::{
    board::{KEY_COLS, KEY_MODIFIERS, KEY_ROWS},
    bus::{Bus, ScanLease},
    pins::PinBank,
};

const SETTLE_US: u16 = 50;

bitflags! {
    /// Rows of the modifier column, active once complemented.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT     = 0b0000_0001;
        const CONTROL   = 0b0000_0010;
        const GRAPH     = 0b0000_0100;
        const CODE      = 0b0000_1000;
        const NUM_LOCK  = 0b0001_0000;
        const CAPS_LOCK = 0b0010_0000;
        const BREAK     = 0b1000_0000;
    }
}

/// First non-character key code.
pub const SPECIAL: u8 = 0x80;

pub const KEY_F1: u8 = 0x81;
pub const KEY_F2: u8 = 0x82;
pub const KEY_F3: u8 = 0x83;
pub const KEY_F4: u8 = 0x84;
pub const KEY_F5: u8 = 0x85;
pub const KEY_F6: u8 = 0x86;
pub const KEY_F7: u8 = 0x87;
pub const KEY_F8: u8 = 0x88;

pub const KEY_UP: u8 = 0x90;
pub const KEY_DOWN: u8 = 0x91;
pub const KEY_RIGHT: u8 = 0x92;
pub const KEY_LEFT: u8 = 0x93;

const ESC: u8 = 0x1B;

/// Key codes indexed `[column][row]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub normal: [[u8; 8]; 8],
    pub shifted: [[u8; 8]; 8],
}

/// The Model 100 keyboard.
pub static MODEL100: Layout = Layout {
    normal: [
        *b"\x81\x82\x83\x84\x85\x86\x87\x88", // function keys
        *b"zxcvbnml",
        *b"asdfghjk",
        *b"qwertyui",
        *b"op[;',./",
        *b"12345678",
        *b"90-=\x92\x93\x90\x91",
        *b" \x08\t\x1bLC0\n",
    ],
    shifted: [
        *b"\x81\x82\x83\x84\x85\x86\x87\x88",
        *b"ZXCVBNML",
        *b"ASDFGHJK",
        *b"QWERTYUI",
        *b"OP]:\"<>?",
        *b"!@#$%^&*",
        *b"()_+\x92\x93\x90\x91",
        *b" \x08\t\x1bLC0\n",
    ],
};

impl Layout {
    /// The table selected by `mods`: shifted only when SHIFT is held
    /// without CONTROL.
    pub fn table(&self, mods: Modifiers) -> &[[u8; 8]; 8] {
        if mods.contains(Modifiers::SHIFT) && !mods.contains(Modifiers::CONTROL) {
            &self.shifted
        } else {
            &self.normal
        }
    }
}

/// Turn one scanned column into a character.
///
/// The lowest set bit of `rows` picks the row. CONTROL maps `a..z` to
/// `0x01..0x1A` and everything else to nothing; CAPS LOCK swaps case.
/// Returns 0 for no key.
pub fn resolve(layout: &Layout, col: u8, rows: u8, mods: Modifiers) -> u8 {
    if rows == 0 || col >= 8 {
        return 0;
    }
    let row = rows.trailing_zeros() as usize;
    let key = layout.table(mods)[col as usize][row];

    if mods.contains(Modifiers::CONTROL) {
        return if key.is_ascii_lowercase() { key - b'a' + 1 } else { 0 };
    }

    if mods.contains(Modifiers::CAPS_LOCK) {
        if key.is_ascii_lowercase() {
            return key.to_ascii_uppercase();
        }
        if key.is_ascii_uppercase() {
            return key.to_ascii_lowercase();
        }
    }

    key
}

#[inline]
pub fn is_arrow(key: u8) -> bool {
    (KEY_UP..=KEY_LEFT).contains(&key)
}

/// Bytes to send upstream for `key`. Arrows become `ESC A`..`ESC D`; other
/// special keys send nothing.
pub fn encode(key: u8) -> Vec<u8, 2> {
    let mut bytes = Vec::new();
    if is_arrow(key) {
        let _ = bytes.push(ESC);
        let _ = bytes.push(b'A' + (key - KEY_UP));
    } else if key != 0 && key < SPECIAL {
        let _ = bytes.push(key);
    }
    bytes
}

impl<'a, B: PinBank> ScanLease<'a, B> {
    fn drive_for_scan(&mut self) {
        self.bank.set_ddr(KEY_ROWS, 0x00);
        self.bank.set_port(KEY_ROWS, 0xFF); // pull-ups

        self.bank.set_ddr(KEY_COLS, 0xFF);
        self.bank.set_port(KEY_COLS, 0xFF);

        self.bank.direction(KEY_MODIFIERS, true);
        self.bank.out(KEY_MODIFIERS, true);
    }

    /// Pull the modifier column low and sample it.
    pub fn modifiers(&mut self) -> Modifiers {
        self.bank.out(KEY_MODIFIERS, false);
        self.bank.delay_us(SETTLE_US);
        let rows = !self.bank.pins(KEY_ROWS);
        self.bank.out(KEY_MODIFIERS, true);
        Modifiers::from_bits_truncate(rows)
    }

    /// Pull one data column low and return the rows held down.
    pub fn strobe(&mut self, col: u8) -> u8 {
        self.bank.set_port(KEY_COLS, !(1 << col));
        self.bank.delay_us(SETTLE_US);
        let rows = !self.bank.pins(KEY_ROWS);
        self.bank.set_port(KEY_COLS, 0xFF);
        rows
    }
}

impl<B: PinBank> Bus<B> {
    /// Scan the matrix once. Returns the resolved key or 0.
    pub fn scan(&mut self, layout: &Layout) -> u8 {
        let mut lease = self.lease();
        lease.drive_for_scan();

        let mods = lease.modifiers();
        let hit = (0..8u8)
            .map(|col| (col, lease.strobe(col)))
            .find(|&(_, rows)| rows != 0);
        drop(lease);

        match hit {
            Some((col, rows)) => {
                let key = resolve(layout, col, rows, mods);
                trace!("key col {} rows {:08b} mods {:?} -> {:#04x}", col, rows, mods, key);
                key
            }
            None => 0,
        }
    }
}
