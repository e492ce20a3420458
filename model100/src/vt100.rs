//! # VT100 emulation
//!
//! Just enough of a VT100 to run vi and lynx: cursor movement, clears,
//! erase-to-end-of-line and inverse/underline. No scrolling: a line feed on
//! the last row wraps to the top.
//!
//! ```text
//!           ESC            '['           ';'
//! Ground ─────────▶ Escape ─────▶ Csi ─────────▶ CsiArg2
//!   ▲                 │ '(' ')'    │ digits, '?'    │ digits
//!   │                 ▼            │                │
//!   │          IgnoreCharset       │ final          │ final
//!   └─────────────────┴────────────┴────────────────┘
//! ```
//!
//! ESC restarts a sequence from any state. Anything unexpected drops back
//! to `Ground` and is swallowed.

use log::trace;

use crate::{board::BUZZER, bus::Bus, font::Attr, pins::PinBank};

pub const MAX_COLS: u8 = 40;
pub const MAX_ROWS: u8 = 8;

const BEL: u8 = 0x07;
const BS: u8 = 0x08;
const LF: u8 = 0x0A;
const CR: u8 = 0x0D;
const SO: u8 = 0x0E;
const SI: u8 = 0x0F;
const ESC: u8 = 0x1B;

const BELL_PULSE_US: u16 = 100;

/// Where the emulator draws.
pub trait Screen {
    fn draw(&mut self, col: u8, row: u8, ch: u8, attr: Attr);

    fn bell(&mut self) {}
}

impl<B: PinBank> Screen for Bus<B> {
    fn draw(&mut self, col: u8, row: u8, ch: u8, attr: Attr) {
        Bus::draw(self, col, row, ch, attr);
    }

    fn bell(&mut self) {
        let bank = self.bank_mut();
        bank.out(BUZZER, true);
        bank.delay_us(BELL_PULSE_US);
        bank.out(BUZZER, false);
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Ground,
    Escape,
    Csi,
    CsiArg2,
    IgnoreCharset,
}

#[derive(Debug, Clone)]
pub struct Vt100 {
    row: u8,
    col: u8,
    attr: Attr,
    state: State,
    arg1: u8,
    arg2: u8,
    query: bool,
}

impl Default for Vt100 {
    fn default() -> Self {
        Self::new()
    }
}

impl Vt100 {
    pub const fn new() -> Self {
        Self {
            row: 0,
            col: 0,
            attr: Attr::NORMAL,
            state: State::Ground,
            arg1: 0,
            arg2: 0,
            query: false,
        }
    }

    /// `(row, col)`, zero-based.
    pub fn cursor(&self) -> (u8, u8) {
        (self.row, self.col)
    }

    pub fn attr(&self) -> Attr {
        self.attr
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Whether the sequence in progress carried a `?` marker.
    pub fn is_query(&self) -> bool {
        self.query
    }

    pub fn write<S: Screen>(&mut self, screen: &mut S, bytes: &[u8]) {
        for &byte in bytes {
            self.putc(screen, byte);
        }
    }

    /// Feed one byte from the host.
    pub fn putc<S: Screen>(&mut self, screen: &mut S, c: u8) {
        if c == ESC {
            self.state = State::Escape;
            return;
        }

        match self.state {
            State::Ground => self.ground(screen, c),
            State::Escape => self.escape(screen, c),
            State::Csi => self.csi(screen, c),
            State::CsiArg2 => self.csi_arg2(c),
            State::IgnoreCharset => self.state = State::Ground,
        }
    }

    /// Blank every cell. The cursor does not move.
    pub fn clear<S: Screen>(&mut self, screen: &mut S) {
        for row in 0..MAX_ROWS {
            for col in 0..MAX_COLS {
                screen.draw(col, row, b' ', Attr::NORMAL);
            }
        }
    }

    /// Move to a 1-indexed position, clamped to the grid; 0 counts as 1.
    pub fn goto(&mut self, row: u8, col: u8) {
        self.row = row.saturating_sub(1).min(MAX_ROWS - 1);
        self.col = col.saturating_sub(1).min(MAX_COLS - 1);
    }

    /// `ESC c`: blank screen, home, normal attributes.
    pub fn reset<S: Screen>(&mut self, screen: &mut S) {
        self.clear(screen);
        self.row = 0;
        self.col = 0;
        self.attr = Attr::NORMAL;
        self.state = State::Ground;
    }

    /// Local redraw request: blank screen, home, and abandon any sequence
    /// in progress. Attributes are kept.
    pub fn redraw<S: Screen>(&mut self, screen: &mut S) {
        self.clear(screen);
        self.row = 0;
        self.col = 0;
        self.state = State::Ground;
    }

    fn newline(&mut self) {
        self.row = (self.row + 1) % MAX_ROWS;
        self.col = 0;
    }

    fn ground<S: Screen>(&mut self, screen: &mut S, c: u8) {
        match c {
            BEL => screen.bell(),
            BS => {
                screen.draw(self.col, self.row, b' ', Attr::NORMAL);
                if self.col > 0 {
                    self.col -= 1;
                } else {
                    self.col = MAX_COLS - 1;
                    self.row = (self.row + MAX_ROWS - 1) % MAX_ROWS;
                }
            }
            LF => self.newline(),
            CR => self.col = 0,
            // no alternate character sets
            SO | SI => {}
            _ => {
                screen.draw(self.col, self.row, c, self.attr);
                self.col += 1;
                if self.col == MAX_COLS {
                    self.newline();
                }
            }
        }
    }

    fn escape<S: Screen>(&mut self, screen: &mut S, c: u8) {
        self.arg1 = 0;
        self.arg2 = 0;
        self.query = false;

        match c {
            b'c' => self.reset(screen),
            b'[' => self.state = State::Csi,
            b'(' | b')' => self.state = State::IgnoreCharset,
            _ => {
                trace!("dropped ESC {:#04x}", c);
                self.state = State::Ground;
            }
        }
    }

    fn csi<S: Screen>(&mut self, screen: &mut S, c: u8) {
        match c {
            b'0'..=b'9' => self.arg1 = accumulate(self.arg1, c),
            b'?' => self.query = true,
            b';' => self.state = State::CsiArg2,
            _ => {
                self.csi_final(screen, c);
                self.state = State::Ground;
            }
        }
    }

    fn csi_arg2(&mut self, c: u8) {
        match c {
            b'0'..=b'9' => self.arg2 = accumulate(self.arg2, c),
            b'H' => {
                self.goto(self.arg1, self.arg2);
                self.state = State::Ground;
            }
            b'm' => {
                if self.arg1 == 0 {
                    self.attr = Attr::NORMAL;
                }
                match self.arg2 {
                    1 => self.attr |= Attr::UNDERLINE,
                    7 => self.attr |= Attr::INVERSE,
                    _ => {}
                }
                self.state = State::Ground;
            }
            _ => {
                trace!("dropped CSI {};{} {:#04x}", self.arg1, self.arg2, c);
                self.state = State::Ground;
            }
        }
    }

    fn csi_final<S: Screen>(&mut self, screen: &mut S, c: u8) {
        let n = self.arg1;
        match c {
            // home, whatever the argument
            b'H' => {
                self.row = 0;
                self.col = 0;
            }
            b'A' => self.row = self.row.saturating_sub(n),
            b'B' => self.row = self.row.saturating_add(n).min(MAX_ROWS - 1),
            b'C' => self.col = self.col.saturating_add(n).min(MAX_COLS - 1),
            b'D' => self.col = self.col.saturating_sub(n),
            b'J' => {
                // 0/1/2 all clear the whole screen
                self.clear(screen);
                self.row = 0;
                self.col = 0;
            }
            b'K' => {
                for col in self.col..MAX_COLS {
                    screen.draw(col, self.row, b' ', Attr::NORMAL);
                }
            }
            b'm' => self.select_rendition(n),
            _ => trace!("dropped CSI {}{} {:#04x}", if self.query { "?" } else { "" }, n, c),
        }
    }

    fn select_rendition(&mut self, param: u8) {
        match param {
            0 => self.attr = Attr::NORMAL,
            7 => self.attr |= Attr::INVERSE,
            _ => {}
        }
    }
}

#[inline]
fn accumulate(arg: u8, digit: u8) -> u8 {
    arg.saturating_mul(10).saturating_add(digit - b'0')
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Grid {
        cells: [[(u8, Attr); MAX_COLS as usize]; MAX_ROWS as usize],
        draws: usize,
        bells: usize,
    }

    impl Grid {
        fn new() -> Self {
            Self {
                cells: [[(b'.', Attr::NORMAL); MAX_COLS as usize]; MAX_ROWS as usize],
                draws: 0,
                bells: 0,
            }
        }

        fn at(&self, row: u8, col: u8) -> (u8, Attr) {
            self.cells[row as usize][col as usize]
        }

        fn row_text(&self, row: u8) -> String {
            self.cells[row as usize].iter().map(|&(c, _)| c as char).collect()
        }
    }

    impl Screen for Grid {
        fn draw(&mut self, col: u8, row: u8, ch: u8, attr: Attr) {
            self.cells[row as usize][col as usize] = (ch, attr);
            self.draws += 1;
        }

        fn bell(&mut self) {
            self.bells += 1;
        }
    }

    fn run(input: &[u8]) -> (Vt100, Grid) {
        let mut vt = Vt100::new();
        let mut grid = Grid::new();
        vt.write(&mut grid, input);
        (vt, grid)
    }

    #[test]
    fn prints_and_advances() {
        let (vt, grid) = run(b"Hi");
        assert_eq!(vt.cursor(), (0, 2));
        assert_eq!(grid.at(0, 0), (b'H', Attr::NORMAL));
        assert_eq!(grid.at(0, 1), (b'i', Attr::NORMAL));
        assert_eq!(vt.attr(), Attr::NORMAL);
        assert_eq!(grid.draws, 2);
    }

    #[test]
    fn cursor_position_is_one_indexed() {
        let (vt, grid) = run(b"\x1b[2;5HX");
        assert_eq!(grid.at(1, 4).0, b'X');
        assert_eq!(vt.cursor(), (1, 5));
    }

    #[test]
    fn inverse_then_reset() {
        let (_, grid) = run(b"A\x1b[7mB\x1b[0mC");
        assert_eq!(grid.at(0, 0), (b'A', Attr::NORMAL));
        assert_eq!(grid.at(0, 1), (b'B', Attr::INVERSE));
        assert_eq!(grid.at(0, 2), (b'C', Attr::NORMAL));
    }

    #[test]
    fn erase_to_end_of_line_keeps_cursor() {
        let mut vt = Vt100::new();
        let mut grid = Grid::new();
        vt.write(&mut grid, b"\x1b[4;11H");
        assert_eq!(vt.cursor(), (3, 10));

        vt.write(&mut grid, b"\x1b[Kxxx");
        let row = grid.row_text(3);
        assert_eq!(&row[..10], "..........");
        assert_eq!(&row[10..13], "xxx");
        assert_eq!(&row[13..], " ".repeat(27));
        assert_eq!(vt.cursor(), (3, 13));
    }

    #[test]
    fn full_reset() {
        let (vt, grid) = run(b"\x1b[7mjunk\x1b[3;3H\x1bc");
        for row in 0..MAX_ROWS {
            assert_eq!(grid.row_text(row), " ".repeat(40));
            for col in 0..MAX_COLS {
                assert_eq!(grid.at(row, col).1, Attr::NORMAL);
            }
        }
        assert_eq!(vt.cursor(), (0, 0));
        assert_eq!(vt.attr(), Attr::NORMAL);
        assert_eq!(vt.state(), State::Ground);
    }

    #[test]
    fn home_ignores_a_single_argument() {
        let (vt, _) = run(b"\x1b[5;5H\x1b[H");
        assert_eq!(vt.cursor(), (0, 0));
        let (vt, _) = run(b"\x1b[5;5H\x1b[3H");
        assert_eq!(vt.cursor(), (0, 0));
    }

    #[test]
    fn goto_clamps_and_treats_zero_as_one() {
        let (vt, _) = run(b"\x1b[99;99H");
        assert_eq!(vt.cursor(), (7, 39));
        let (vt, _) = run(b"\x1b[0;0H");
        assert_eq!(vt.cursor(), (0, 0));
        let (vt, _) = run(b"\x1b[;7H");
        assert_eq!(vt.cursor(), (0, 6));
    }

    #[test]
    fn relative_moves_clamp() {
        let (vt, _) = run(b"\x1b[3;3H\x1b[9A");
        assert_eq!(vt.cursor(), (0, 2));
        let (vt, _) = run(b"\x1b[3;3H\x1b[200B");
        assert_eq!(vt.cursor(), (7, 2));
        let (vt, _) = run(b"\x1b[3;3H\x1b[255C");
        assert_eq!(vt.cursor(), (2, 39));
        let (vt, _) = run(b"\x1b[3;3H\x1b[2D");
        assert_eq!(vt.cursor(), (2, 0));
        let (vt, _) = run(b"\x1b[3;3H\x1b[999D");
        assert_eq!(vt.cursor(), (2, 0));
    }

    #[test]
    fn clear_screen_homes() {
        let (vt, grid) = run(b"abc\x1b[2J");
        assert_eq!(vt.cursor(), (0, 0));
        assert_eq!(grid.row_text(0), " ".repeat(40));
    }

    #[test]
    fn underline_forms() {
        let (vt, _) = run(b"\x1b[0;1m");
        assert_eq!(vt.attr(), Attr::UNDERLINE);
        let (vt, _) = run(b"\x1b[0m\x1b[;1m");
        assert_eq!(vt.attr(), Attr::UNDERLINE);
        let (vt, _) = run(b"\x1b[7m\x1b[0;1m");
        assert_eq!(vt.attr(), Attr::UNDERLINE);
        let (vt, _) = run(b"\x1b[7m\x1b[5;1m");
        assert_eq!(vt.attr(), Attr::INVERSE | Attr::UNDERLINE);
    }

    #[test]
    fn two_argument_rendition_reads_only_clear_then_second() {
        let (vt, _) = run(b"\x1b[1;7m");
        assert_eq!(vt.attr(), Attr::INVERSE);
        let (vt, _) = run(b"\x1b[7;0m");
        assert_eq!(vt.attr(), Attr::NORMAL);
        let (vt, _) = run(b"\x1b[0;4m");
        assert_eq!(vt.attr(), Attr::NORMAL);
    }

    #[test]
    fn single_argument_rendition() {
        let (vt, _) = run(b"\x1b[7m");
        assert_eq!(vt.attr(), Attr::INVERSE);
        let (vt, _) = run(b"\x1b[1m\x1b[4m");
        assert_eq!(vt.attr(), Attr::NORMAL);
        let (vt, _) = run(b"\x1b[0;1m\x1b[0m");
        assert_eq!(vt.attr(), Attr::NORMAL);
    }

    #[test]
    fn three_parameters_are_not_honored() {
        let (vt, grid) = run(b"\x1b[0;1;7m");
        assert_eq!(vt.attr(), Attr::NORMAL);
        assert_eq!(vt.state(), State::Ground);
        // the tail after the abandoned sequence prints
        assert_eq!(grid.at(0, 0).0, b'7');
        assert_eq!(grid.at(0, 1).0, b'm');
    }

    #[test]
    fn line_feed_and_wrap() {
        let (vt, _) = run(b"ab\n");
        assert_eq!(vt.cursor(), (1, 0));
        let (vt, _) = run(b"\x1b[8;1H\n");
        assert_eq!(vt.cursor(), (0, 0));

        let line = [b'x'; 40];
        let (vt, grid) = run(&line);
        assert_eq!(vt.cursor(), (1, 0));
        assert_eq!(grid.at(0, 39).0, b'x');
    }

    #[test]
    fn carriage_return() {
        let (vt, _) = run(b"hello\r");
        assert_eq!(vt.cursor(), (0, 0));
    }

    #[test]
    fn backspace_erases_and_moves_left() {
        let (vt, grid) = run(b"ab\x08");
        assert_eq!(vt.cursor(), (0, 1));
        assert_eq!(grid.at(0, 2).0, b' ');
        assert_eq!(grid.at(0, 1).0, b'b');
    }

    #[test]
    fn backspace_at_origin_wraps_to_last_cell() {
        let (vt, grid) = run(b"\x08");
        assert_eq!(vt.cursor(), (7, 39));
        assert_eq!(grid.at(0, 0).0, b' ');

        let (vt, _) = run(b"\x1b[3;1H\x08");
        assert_eq!(vt.cursor(), (1, 39));
    }

    #[test]
    fn bell_and_shift_codes() {
        let (vt, grid) = run(b"\x07\x0e\x0f");
        assert_eq!(grid.bells, 1);
        assert_eq!(grid.draws, 0);
        assert_eq!(vt.cursor(), (0, 0));
    }

    #[test]
    fn charset_designation_swallows_one_byte() {
        let (vt, grid) = run(b"\x1b(BZ");
        assert_eq!(grid.at(0, 0).0, b'Z');
        assert_eq!(vt.cursor(), (0, 1));
        let (_, grid) = run(b"\x1b)0Q");
        assert_eq!(grid.at(0, 0).0, b'Q');
    }

    #[test]
    fn query_sequences_return_to_ground() {
        let mut vt = Vt100::new();
        let mut grid = Grid::new();
        vt.write(&mut grid, b"\x1b[?25");
        assert!(vt.is_query());
        assert_eq!(vt.state(), State::Csi);
        vt.putc(&mut grid, b'l');
        assert_eq!(vt.state(), State::Ground);
        assert_eq!(grid.draws, 0);
    }

    #[test]
    fn unknown_escape_is_swallowed() {
        let (vt, grid) = run(b"\x1bZq");
        assert_eq!(vt.state(), State::Ground);
        assert_eq!(grid.at(0, 0).0, b'q');
        assert_eq!(grid.draws, 1);
    }

    #[test]
    fn escape_restarts_a_sequence() {
        let (vt, _) = run(b"\x1b[12\x1b[2;2H");
        assert_eq!(vt.cursor(), (1, 1));
    }

    #[test]
    fn parameters_saturate() {
        let (vt, _) = run(b"\x1b[1;1H\x1b[99999C");
        assert_eq!(vt.cursor(), (0, 39));
    }

    #[test]
    fn redraw_keeps_attributes() {
        let mut vt = Vt100::new();
        let mut grid = Grid::new();
        vt.write(&mut grid, b"\x1b[7mabc\x1b[");
        vt.redraw(&mut grid);
        assert_eq!(vt.cursor(), (0, 0));
        assert_eq!(vt.state(), State::Ground);
        assert_eq!(vt.attr(), Attr::INVERSE);
        assert_eq!(grid.at(0, 0), (b' ', Attr::NORMAL));
    }
}
