//! # Display
//!
//! The 240×64 panel is ten HD44102 controllers, each owning a 50×32 tile.
//! [`tile`] speaks to one controller; [`frame`] routes frame coordinates to
//! the right tile.
//!
//! ## Bring-up
//!
//! Call [`Bus::init_display`] once at boot, after the bias PWM is running:
//!
//! ```ignore
//! let mut bus = Bus::new(unsafe { Ports::new(&Config::MODEL100) });
//! bus.init_display();
//! bus.write(0, 0, &[0xFF, 0x81, 0x81, 0xFF]);
//! ```
//!
//! Afterwards the bus is left at rest (all selects low) so the keyboard can
//! borrow the column lines between bursts.

pub mod frame;
pub mod tile;

use log::{debug, info};

use crate::{
    board::{
        BUZZER, DATA_INSTRUCTION, ENABLE, LCD_DATA, LCD_RESET, LCD_V2, LCD_VO, MASTER_SELECT,
        READ_WRITE, TILE_SELECT,
    },
    bus::Bus,
    pins::PinBank,
};

pub use frame::{route, Route, HEIGHT, WIDTH};
pub use tile::{Direction, Register, Status, Tile};

const POWER_SETTLE_MS: u16 = 20;

impl<B: PinBank> Bus<B> {
    /// Drive every display line low as an output, release reset and turn
    /// each tile on. One-shot: tiles are never re-initialized.
    pub fn init_display(&mut self) {
        let bank = self.bank_mut();
        bank.set_port(LCD_DATA, 0x00);
        bank.set_ddr(LCD_DATA, 0x00);

        let control = [
            DATA_INSTRUCTION,
            READ_WRITE,
            ENABLE,
            LCD_V2,
            LCD_VO,
            MASTER_SELECT,
            LCD_RESET,
            BUZZER,
        ];
        for pin in control.into_iter().chain(TILE_SELECT) {
            bank.out(pin, false);
            bank.direction(pin, true);
        }

        bank.delay_ms(POWER_SETTLE_MS);
        bank.out(LCD_RESET, true);

        // Master select stays up while each tile is asserted in turn.
        let mut burst = self.burst();
        for tile in Tile::all() {
            let status = burst.select(tile).activate();
            debug!("tile {} up, status {:?}", tile.index(), status);
        }
        drop(burst);

        info!("display up: {} tiles", Tile::COUNT);
    }
}
