//! # Board wiring
//!
//! Pin map of the retrofit board. The HD44102s have CS1 tied to ground, CS2
//! exposed per chip and CS3 common to all chips (named CS1 on the schematic,
//! [`MASTER_SELECT`] here). A chip answers only while both its own select and
//! the master select are high.
//!
//! The nine keyboard columns share wires with the tile selects: columns
//! 0-7 are port F (tiles 0-7) and the modifier column is `E6` (tile 8).
//! Port D0-D3 and B0-B3 are kept free for I2C, the UART and SPI.

use crate::pins::{Pin, Port};

/// HD44102 data bus.
pub const LCD_DATA: Port = Port::C;

/// Keyboard rows. Never shared with the display.
pub const KEY_ROWS: Port = Port::A;

/// Keyboard columns. Shared with tile selects 0-7.
pub const KEY_COLS: Port = Port::F;

/// Modifier column. Shared with the select of tile 8.
pub const KEY_MODIFIERS: Pin = Pin::new(Port::E, 6);

pub const BUZZER: Pin = Pin::new(Port::B, 5);
/// Contrast voltage, OC1B.
pub const LCD_VO: Pin = Pin::new(Port::B, 6);
/// Charge pump for the negative supply, OC1C.
pub const LCD_V2: Pin = Pin::new(Port::B, 7);

pub const LCD_RESET: Pin = Pin::new(Port::D, 4);
pub const MASTER_SELECT: Pin = Pin::new(Port::D, 5);
pub const LED: Pin = Pin::new(Port::D, 6);
/// High = read, low = write.
pub const READ_WRITE: Pin = Pin::new(Port::D, 7);

/// Data is latched on the falling edge.
pub const ENABLE: Pin = Pin::new(Port::E, 0);
/// High = data, low = instruction/status.
pub const DATA_INSTRUCTION: Pin = Pin::new(Port::E, 1);

/// Individual select for each tile, indexed by tile number.
pub const TILE_SELECT: [Pin; 10] = [
    Pin::new(Port::F, 0),
    Pin::new(Port::F, 1),
    Pin::new(Port::F, 2),
    Pin::new(Port::F, 3),
    Pin::new(Port::F, 4),
    Pin::new(Port::F, 5),
    Pin::new(Port::F, 6),
    Pin::new(Port::F, 7),
    Pin::new(Port::E, 6),
    Pin::new(Port::E, 7),
];
