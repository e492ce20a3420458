//! # Model 100 terminal core
//!
//! Hardware layer for the Model 100 motherboard retrofit: a 240×64 display
//! built from ten HD44102 controllers, an 8×9 key matrix that borrows the
//! display's chip-select lines, and a small VT100 emulator that ties the two
//! to a host serial link.
//!
//! ```text
//! host bytes ─▶ vt100 ─▶ font ─▶ lcd::frame ─▶ lcd::tile ─▶ glass
//! key matrix ─▶ keyboard ─▶ console ─▶ host
//! ```
//!
//! Everything that touches pins goes through a [`Bus`](bus::Bus), which owns
//! the [`PinBank`](pins::PinBank). Display bursts and keyboard scans both
//! borrow the bus mutably, so they can never overlap.

#![cfg_attr(not(test), no_std)]

pub mod avr;
pub mod board;
pub mod bus;
pub mod config;
pub mod console;
pub mod error;
pub mod font;
pub mod keyboard;
pub mod lcd;
pub mod pins;
pub mod queue;
pub mod vt100;

pub use bus::Bus;
pub use config::Config;
pub use console::{Console, HostLink, Ticker};
pub use error::{Error, Result};
pub use font::Attr;
pub use keyboard::{Layout, Modifiers};
pub use pins::{Pin, PinBank, Port};
pub use vt100::{Screen, Vt100};
