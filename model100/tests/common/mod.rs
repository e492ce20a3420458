//! Pin-level model of the Model 100 board: ten HD44102 chips on a shared
//! data bus plus the key matrix wired onto their select lines.

#![allow(dead_code)]

use std::collections::VecDeque;

use model100::{
    board::{BUZZER, DATA_INSTRUCTION, ENABLE, KEY_MODIFIERS, MASTER_SELECT, READ_WRITE, TILE_SELECT},
    console::{HostLink, Ticker},
    font::{GLYPH_HEIGHT, GLYPH_WIDTH},
    lcd::Tile,
    Pin, PinBank, Port,
};

const PAGES: usize = 4;
const COLUMNS: usize = Tile::WIDTH as usize;

#[derive(Debug, Clone)]
pub struct Hd44102 {
    pub ram: [[u8; COLUMNS]; PAGES],
    pub page: u8,
    pub column: u8,
    pub on: bool,
    pub count_up: bool,
    pub start_page: u8,
    pub commands: Vec<u8>,
    latch: u8,
}

impl Default for Hd44102 {
    fn default() -> Self {
        Self {
            ram: [[0; COLUMNS]; PAGES],
            page: 0,
            column: 0,
            on: false,
            count_up: false,
            start_page: 0,
            commands: Vec::new(),
            latch: 0,
        }
    }
}

impl Hd44102 {
    fn status(&self) -> u8 {
        let mut status = 0;
        if self.count_up {
            status |= 0x40;
        }
        if !self.on {
            status |= 0x20;
        }
        status
    }

    fn advance(&mut self) {
        self.column = if self.count_up {
            (self.column + 1) % COLUMNS as u8
        } else {
            (self.column + COLUMNS as u8 - 1) % COLUMNS as u8
        };
    }

    fn instruction(&mut self, byte: u8) {
        self.commands.push(byte);
        match byte {
            0x38 => self.on = false,
            0x39 => self.on = true,
            0x3A => self.count_up = false,
            0x3B => self.count_up = true,
            _ if byte & 0x3F == 0x3E => self.start_page = byte >> 6,
            _ if byte & 0x3F < COLUMNS as u8 => {
                self.page = byte >> 6;
                self.column = byte & 0x3F;
            }
            _ => {}
        }
    }

    fn write_data(&mut self, byte: u8) {
        self.ram[self.page as usize][self.column as usize] = byte;
        self.advance();
    }

    fn load_latch(&mut self) {
        self.latch = self.ram[self.page as usize][self.column as usize];
        self.advance();
    }
}

pub struct SimBoard {
    pub port: [u8; 6],
    pub ddr: [u8; 6],
    pub chips: Vec<Hd44102>,
    /// Rows held down, per data column.
    pub keys: [u8; 8],
    /// Rows held down in the modifier column.
    pub modifier_keys: u8,
    pub elapsed_us: u64,
    /// Enable pulses seen by a selected chip.
    pub transfers: usize,
    pub bursts: usize,
    pub bell_pulses: usize,
    /// Set if a chip was ever strobed without master select.
    pub stray_strobe: bool,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBoard {
    pub fn new() -> Self {
        Self {
            port: [0; 6],
            ddr: [0; 6],
            chips: vec![Hd44102::default(); Tile::COUNT as usize],
            keys: [0; 8],
            modifier_keys: 0,
            elapsed_us: 0,
            transfers: 0,
            bursts: 0,
            bell_pulses: 0,
            stray_strobe: false,
        }
    }

    fn level(&self, pin: Pin) -> bool {
        self.port[pin.port.index()] & pin.mask() != 0
    }

    fn driven_low(&self, pin: Pin) -> bool {
        let i = pin.port.index();
        self.ddr[i] & pin.mask() != 0 && self.port[i] & pin.mask() == 0
    }

    fn selected(&self) -> impl Iterator<Item = usize> + '_ {
        let master = self.level(MASTER_SELECT);
        TILE_SELECT
            .iter()
            .enumerate()
            .filter(move |&(_, &pin)| master && self.level(pin))
            .map(|(i, _)| i)
    }

    fn rows(&self) -> u8 {
        let a = Port::A.index();
        // inputs read their pull-up, outputs their latch
        let mut rows = self.port[a];
        for col in 0..8 {
            if self.driven_low(Pin::new(Port::F, col)) {
                rows &= !self.keys[col as usize];
            }
        }
        if self.driven_low(KEY_MODIFIERS) {
            rows &= !self.modifier_keys;
        }
        rows
    }

    fn enable_fell(&mut self) {
        let chips: Vec<usize> = self.selected().collect();
        if chips.is_empty() {
            if TILE_SELECT.iter().any(|&pin| self.level(pin)) {
                self.stray_strobe = true;
            }
            return;
        }
        self.transfers += 1;

        let data = self.level(DATA_INSTRUCTION);
        let read = self.level(READ_WRITE);
        let byte = self.port[Port::C.index()];
        for i in chips {
            let chip = &mut self.chips[i];
            match (read, data) {
                (false, true) => chip.write_data(byte),
                (false, false) => chip.instruction(byte),
                (true, true) => chip.load_latch(),
                (true, false) => {}
            }
        }
    }

    pub fn press(&mut self, col: usize, row: usize) {
        self.keys[col] |= 1 << row;
    }

    pub fn release_all(&mut self) {
        self.keys = [0; 8];
        self.modifier_keys = 0;
    }

    pub fn hold(&mut self, modifiers: model100::Modifiers) {
        self.modifier_keys = modifiers.bits();
    }

    /// Byte at frame column `x`, pixel row `y`.
    pub fn frame_byte(&self, x: u8, y: u8) -> u8 {
        let tile = (y / 32) * 5 + x / 50;
        let chip = &self.chips[tile as usize];
        chip.ram[((y % 32) / 8) as usize][(x % 50) as usize]
    }

    /// The six columns of character cell `(col, row)`.
    pub fn cell(&self, col: u8, row: u8) -> [u8; 6] {
        let x = col * GLYPH_WIDTH;
        let y = row * GLYPH_HEIGHT;
        std::array::from_fn(|i| self.frame_byte(x + i as u8, y))
    }

    pub fn registers(&self) -> ([u8; 6], [u8; 6]) {
        (self.port, self.ddr)
    }
}

impl PinBank for SimBoard {
    fn pins(&self, port: Port) -> u8 {
        match port {
            Port::A => self.rows(),
            Port::C if self.ddr[port.index()] == 0 && self.level(ENABLE) && self.level(READ_WRITE) => {
                let data = self.level(DATA_INSTRUCTION);
                self.selected()
                    .next()
                    .map(|i| {
                        let chip = &self.chips[i];
                        if data { chip.latch } else { chip.status() }
                    })
                    .unwrap_or(0xFF)
            }
            _ => self.port[port.index()],
        }
    }

    fn port(&self, port: Port) -> u8 {
        self.port[port.index()]
    }

    fn set_port(&mut self, port: Port, value: u8) {
        let i = port.index();
        let before = self.port[i];
        self.port[i] = value;

        let fell = |pin: Pin| pin.port == port && before & pin.mask() != 0 && value & pin.mask() == 0;
        let rose = |pin: Pin| pin.port == port && before & pin.mask() == 0 && value & pin.mask() != 0;

        if fell(ENABLE) {
            self.enable_fell();
        }
        if rose(MASTER_SELECT) {
            self.bursts += 1;
        }
        if rose(BUZZER) {
            self.bell_pulses += 1;
        }
    }

    fn ddr(&self, port: Port) -> u8 {
        self.ddr[port.index()]
    }

    fn set_ddr(&mut self, port: Port, value: u8) {
        self.ddr[port.index()] = value;
    }

    fn delay_us(&mut self, us: u16) {
        self.elapsed_us += us as u64;
    }
}

/// Host side of the serial link.
#[derive(Default)]
pub struct MockHost {
    pub inbound: VecDeque<u8>,
    pub outbound: Vec<u8>,
}

impl MockHost {
    pub fn send(&mut self, bytes: &[u8]) {
        self.inbound.extend(bytes);
    }
}

impl HostLink for MockHost {
    fn read(&mut self) -> Option<u8> {
        self.inbound.pop_front()
    }

    fn write(&mut self, bytes: &[u8]) {
        self.outbound.extend_from_slice(bytes);
    }
}

/// Ticks every `period` polls.
pub struct MockTicker {
    pub period: u32,
    polls: u32,
}

impl MockTicker {
    pub fn every(period: u32) -> Self {
        Self { period, polls: 0 }
    }
}

impl Ticker for MockTicker {
    fn take_tick(&mut self) -> bool {
        self.polls += 1;
        self.polls % self.period == 0
    }
}
