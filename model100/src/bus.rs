//! # Bus ownership
//!
//! The keyboard columns are the display's chip selects. Both subsystems are
//! safe to use only if they never run at the same time and each leaves the
//! pins the way the other expects. [`Bus`] owns the [`PinBank`] and hands
//! it out through guards:
//!
//! | Guard            | Taken by        | On creation            | On drop                 |
//! |------------------|-----------------|------------------------|-------------------------|
//! | [`Burst`]        | display         | raise master select    | drop master select      |
//! | [`TileSelect`]   | display (burst) | raise one tile select  | drop that tile select   |
//! | [`ScanLease`]    | keyboard        | snapshot shared pins   | restore the snapshot    |
//!
//! Every guard borrows the bus mutably, so a scan inside a burst does not
//! compile:
//!
//! ```ignore
//! let mut burst = bus.burst();
//! bus.scan(&MODEL100); // error: `bus` is already borrowed
//! ```
//!
//! Between guards the bus is *at rest*: master select and all tile selects
//! are low.

use crate::{
    board::{KEY_COLS, KEY_MODIFIERS, KEY_ROWS, MASTER_SELECT, TILE_SELECT},
    lcd::tile::Tile,
    pins::{Pin, PinBank},
};

pub struct Bus<B: PinBank> {
    bank: B,
}

impl<B: PinBank> Bus<B> {
    pub const fn new(bank: B) -> Self {
        Self { bank }
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    /// Direct access for pins outside the shared set (LED, buzzer, reset).
    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    pub fn into_inner(self) -> B {
        self.bank
    }

    /// Master select and every tile select are low.
    pub fn at_rest(&self) -> bool {
        !self.bank.is_set(MASTER_SELECT) && TILE_SELECT.iter().all(|&pin| !self.bank.is_set(pin))
    }

    /// Open a display burst. Master select stays high until the guard drops.
    pub fn burst(&mut self) -> Burst<'_, B> {
        self.bank.out(MASTER_SELECT, true);
        Burst { bank: &mut self.bank }
    }

    /// Borrow the shared column lines for a keyboard scan.
    pub fn lease(&mut self) -> ScanLease<'_, B> {
        debug_assert!(self.at_rest(), "keyboard scan started with the display selected");
        let saved = Snapshot::take(&self.bank);
        ScanLease {
            bank: &mut self.bank,
            saved,
        }
    }
}

/// Exclusive display access with master select held high.
pub struct Burst<'a, B: PinBank> {
    bank: &'a mut B,
}

impl<'a, B: PinBank> Drop for Burst<'a, B> {
    fn drop(&mut self) {
        self.bank.out(MASTER_SELECT, false);
    }
}

impl<'a, B: PinBank> Burst<'a, B> {
    /// Select one tile for a transaction. Only one tile can be selected at
    /// a time; the select drops with the returned guard.
    pub fn select(&mut self, tile: Tile) -> TileSelect<'_, B> {
        let pin = tile.select_pin();
        self.bank.out(pin, true);
        TileSelect {
            bank: &mut *self.bank,
            tile,
            pin,
        }
    }
}

/// One selected tile inside a [`Burst`]. Transfers live in
/// [`lcd::tile`](crate::lcd::tile).
pub struct TileSelect<'a, B: PinBank> {
    pub(crate) bank: &'a mut B,
    tile: Tile,
    pin: Pin,
}

impl<'a, B: PinBank> Drop for TileSelect<'a, B> {
    fn drop(&mut self) {
        self.bank.out(self.pin, false);
    }
}

impl<'a, B: PinBank> TileSelect<'a, B> {
    pub fn tile(&self) -> Tile {
        self.tile
    }
}

/// Saved state of every register the keyboard scan touches.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub rows_port: u8,
    pub rows_ddr: u8,
    pub cols_port: u8,
    pub cols_ddr: u8,
    pub modifier_port: bool,
    pub modifier_ddr: bool,
}

impl Snapshot {
    pub fn take<B: PinBank>(bank: &B) -> Self {
        Self {
            rows_port: bank.port(KEY_ROWS),
            rows_ddr: bank.ddr(KEY_ROWS),
            cols_port: bank.port(KEY_COLS),
            cols_ddr: bank.ddr(KEY_COLS),
            modifier_port: bank.is_set(KEY_MODIFIERS),
            modifier_ddr: bank.ddr(KEY_MODIFIERS.port) & KEY_MODIFIERS.mask() != 0,
        }
    }

    fn restore<B: PinBank>(&self, bank: &mut B) {
        // Pull-ups off before the columns go low again.
        bank.set_port(KEY_ROWS, self.rows_port);
        bank.set_ddr(KEY_ROWS, self.rows_ddr);
        bank.set_port(KEY_COLS, self.cols_port);
        bank.set_ddr(KEY_COLS, self.cols_ddr);
        bank.out(KEY_MODIFIERS, self.modifier_port);
        bank.direction(KEY_MODIFIERS, self.modifier_ddr);
    }
}

/// The column lines on loan to the keyboard scanner. Scan steps live in
/// [`keyboard`](crate::keyboard).
pub struct ScanLease<'a, B: PinBank> {
    pub(crate) bank: &'a mut B,
    saved: Snapshot,
}

impl<'a, B: PinBank> Drop for ScanLease<'a, B> {
    fn drop(&mut self) {
        self.saved.restore(self.bank);
    }
}

impl<'a, B: PinBank> ScanLease<'a, B> {
    pub fn saved(&self) -> &Snapshot {
        &self.saved
    }
}
