//! # Console
//!
//! The composed terminal: display bus, emulator, layout and the
//! repeat-suppression state for the keyboard. The firmware owns one and calls
//! [`Console::step`] forever.
//!
//! Each step:
//!
//! 1. Poll the host for one byte and feed it to the emulator.
//! 2. Scan the keyboard once. On a change of key, send it upstream (arrows
//!    as `ESC A`..`ESC D`) or handle it locally (F1 redraws).
//! 3. Clear the tick flag if it is set.

use log::{debug, info, trace};

use crate::{
    bus::Bus,
    font::Attr,
    keyboard::{self, Layout, KEY_F1, MODEL100},
    pins::PinBank,
    vt100::{Vt100, MAX_COLS, MAX_ROWS},
};

/// Byte transport to the host.
pub trait HostLink {
    /// Non-blocking: `None` when nothing is waiting.
    fn read(&mut self) -> Option<u8>;

    /// Blocking until every byte has been handed to the transport.
    fn write(&mut self, bytes: &[u8]);
}

/// Free-running loop tick.
pub trait Ticker {
    /// Whether a tick elapsed since the last call. Clears the flag.
    fn take_tick(&mut self) -> bool;
}

pub struct Console<B: PinBank> {
    pub bus: Bus<B>,
    pub vt: Vt100,
    pub layout: &'static Layout,
    last_key: u8,
    ticks: u32,
}

impl<B: PinBank> Console<B> {
    /// Take the pins, bring the display up and start in the home position.
    pub fn init(bank: B) -> Self {
        let mut bus = Bus::new(bank);
        bus.init_display();
        Self {
            bus,
            vt: Vt100::new(),
            layout: &MODEL100,
            last_key: 0,
            ticks: 0,
        }
    }

    pub fn with_layout(mut self, layout: &'static Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Key reported by the last scan, 0 when nothing is held.
    pub fn last_key(&self) -> u8 {
        self.last_key
    }

    /// Ticks observed by [`step`](Self::step).
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Feed host bytes to the emulator directly.
    pub fn print(&mut self, bytes: &[u8]) {
        self.vt.write(&mut self.bus, bytes);
    }

    /// One pass of the main loop.
    pub fn step<H: HostLink, T: Ticker>(&mut self, host: &mut H, ticker: &mut T) {
        if let Some(byte) = host.read() {
            self.vt.putc(&mut self.bus, byte);
        }

        let key = self.bus.scan(self.layout);
        if key != self.last_key {
            self.last_key = key;
            self.key_down(host, key);
        }

        if ticker.take_tick() {
            self.ticks = self.ticks.wrapping_add(1);
            trace!("tick {}", self.ticks);
        }
    }

    fn key_down<H: HostLink>(&mut self, host: &mut H, key: u8) {
        match key {
            0 => {}
            KEY_F1 => {
                debug!("redraw");
                self.vt.redraw(&mut self.bus);
            }
            _ => {
                let bytes = keyboard::encode(key);
                if !bytes.is_empty() {
                    host.write(&bytes);
                }
            }
        }
    }

    /// Fill the grid with consecutive glyphs starting at `'0'`, cycling
    /// through 64 of them.
    pub fn test_pattern(&mut self) {
        let mut i: u8 = 0;
        for row in 0..MAX_ROWS {
            for col in 0..MAX_COLS {
                i = i.wrapping_add(1);
                self.bus.draw(col, row, b'0' + (i & 0x3F), Attr::NORMAL);
            }
        }
        info!("test pattern drawn");
    }
}
