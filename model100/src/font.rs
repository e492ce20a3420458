//! # Font
//!
//! 6×8 glyphs for printable ASCII. Each glyph is six column bytes in the
//! display's own format (MSB = top pixel), so a cell is one six-byte burst
//! at pixel `(6·col, 8·row)`. The sixth column and the bottom row are blank,
//! which keeps neighbouring cells apart and leaves room for the underline.

use bitflags::bitflags;

use crate::{
    bus::Bus,
    error::{Error, Result},
    lcd::frame,
    pins::PinBank,
};

pub const GLYPH_WIDTH: u8 = 6;
pub const GLYPH_HEIGHT: u8 = 8;

/// Character grid.
pub const COLS: u8 = frame::WIDTH / GLYPH_WIDTH;
pub const ROWS: u8 = frame::HEIGHT / GLYPH_HEIGHT;

const FIRST: u8 = 0x20;
const LAST: u8 = 0x7E;

bitflags! {
    /// Display attributes applied when a glyph is rendered.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const INVERSE   = 0b0000_0001;
        const UNDERLINE = 0b0000_0010;
    }
}

impl Attr {
    pub const NORMAL: Attr = Attr::empty();
}

const UNDERLINE_BIT: u8 = 0x01;

#[rustfmt::skip]
static FONT: [[u8; GLYPH_WIDTH as usize]; (LAST - FIRST + 1) as usize] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0xFA, 0x00, 0x00, 0x00], // '!'
    [0x00, 0xE0, 0x00, 0xE0, 0x00, 0x00], // '"'
    [0x28, 0xFE, 0x28, 0xFE, 0x28, 0x00], // '#'
    [0x24, 0x54, 0xFE, 0x54, 0x48, 0x00], // '$'
    [0xC4, 0xC8, 0x10, 0x26, 0x46, 0x00], // '%'
    [0x6C, 0x92, 0xAA, 0x44, 0x0A, 0x00], // '&'
    [0x00, 0xA0, 0xC0, 0x00, 0x00, 0x00], // '\''
    [0x00, 0x38, 0x44, 0x82, 0x00, 0x00], // '('
    [0x00, 0x82, 0x44, 0x38, 0x00, 0x00], // ')'
    [0x28, 0x10, 0x7C, 0x10, 0x28, 0x00], // '*'
    [0x10, 0x10, 0x7C, 0x10, 0x10, 0x00], // '+'
    [0x00, 0x0A, 0x0C, 0x00, 0x00, 0x00], // ','
    [0x10, 0x10, 0x10, 0x10, 0x10, 0x00], // '-'
    [0x00, 0x06, 0x06, 0x00, 0x00, 0x00], // '.'
    [0x04, 0x08, 0x10, 0x20, 0x40, 0x00], // '/'
    [0x7C, 0x8A, 0x92, 0xA2, 0x7C, 0x00], // '0'
    [0x00, 0x42, 0xFE, 0x02, 0x00, 0x00], // '1'
    [0x42, 0x86, 0x8A, 0x92, 0x62, 0x00], // '2'
    [0x84, 0x82, 0xA2, 0xD2, 0x8C, 0x00], // '3'
    [0x18, 0x28, 0x48, 0xFE, 0x08, 0x00], // '4'
    [0xE4, 0xA2, 0xA2, 0xA2, 0x9C, 0x00], // '5'
    [0x3C, 0x52, 0x92, 0x92, 0x0C, 0x00], // '6'
    [0x80, 0x8E, 0x90, 0xA0, 0xC0, 0x00], // '7'
    [0x6C, 0x92, 0x92, 0x92, 0x6C, 0x00], // '8'
    [0x60, 0x92, 0x92, 0x94, 0x78, 0x00], // '9'
    [0x00, 0x6C, 0x6C, 0x00, 0x00, 0x00], // ':'
    [0x00, 0x6A, 0x6C, 0x00, 0x00, 0x00], // ';'
    [0x10, 0x28, 0x44, 0x82, 0x00, 0x00], // '<'
    [0x28, 0x28, 0x28, 0x28, 0x28, 0x00], // '='
    [0x00, 0x82, 0x44, 0x28, 0x10, 0x00], // '>'
    [0x40, 0x80, 0x8A, 0x90, 0x60, 0x00], // '?'
    [0x4C, 0x92, 0x9E, 0x82, 0x7C, 0x00], // '@'
    [0x7E, 0x88, 0x88, 0x88, 0x7E, 0x00], // 'A'
    [0xFE, 0x92, 0x92, 0x92, 0x6C, 0x00], // 'B'
    [0x7C, 0x82, 0x82, 0x82, 0x44, 0x00], // 'C'
    [0xFE, 0x82, 0x82, 0x44, 0x38, 0x00], // 'D'
    [0xFE, 0x92, 0x92, 0x92, 0x82, 0x00], // 'E'
    [0xFE, 0x90, 0x90, 0x90, 0x80, 0x00], // 'F'
    [0x7C, 0x82, 0x92, 0x92, 0x5E, 0x00], // 'G'
    [0xFE, 0x10, 0x10, 0x10, 0xFE, 0x00], // 'H'
    [0x00, 0x82, 0xFE, 0x82, 0x00, 0x00], // 'I'
    [0x04, 0x02, 0x82, 0xFC, 0x80, 0x00], // 'J'
    [0xFE, 0x10, 0x28, 0x44, 0x82, 0x00], // 'K'
    [0xFE, 0x02, 0x02, 0x02, 0x02, 0x00], // 'L'
    [0xFE, 0x40, 0x30, 0x40, 0xFE, 0x00], // 'M'
    [0xFE, 0x20, 0x10, 0x08, 0xFE, 0x00], // 'N'
    [0x7C, 0x82, 0x82, 0x82, 0x7C, 0x00], // 'O'
    [0xFE, 0x90, 0x90, 0x90, 0x60, 0x00], // 'P'
    [0x7C, 0x82, 0x8A, 0x84, 0x7A, 0x00], // 'Q'
    [0xFE, 0x90, 0x98, 0x94, 0x62, 0x00], // 'R'
    [0x62, 0x92, 0x92, 0x92, 0x8C, 0x00], // 'S'
    [0x80, 0x80, 0xFE, 0x80, 0x80, 0x00], // 'T'
    [0xFC, 0x02, 0x02, 0x02, 0xFC, 0x00], // 'U'
    [0xF8, 0x04, 0x02, 0x04, 0xF8, 0x00], // 'V'
    [0xFC, 0x02, 0x1C, 0x02, 0xFC, 0x00], // 'W'
    [0xC6, 0x28, 0x10, 0x28, 0xC6, 0x00], // 'X'
    [0xE0, 0x10, 0x0E, 0x10, 0xE0, 0x00], // 'Y'
    [0x86, 0x8A, 0x92, 0xA2, 0xC2, 0x00], // 'Z'
    [0x00, 0xFE, 0x82, 0x82, 0x00, 0x00], // '['
    [0x40, 0x20, 0x10, 0x08, 0x04, 0x00], // '\\'
    [0x00, 0x82, 0x82, 0xFE, 0x00, 0x00], // ']'
    [0x20, 0x40, 0x80, 0x40, 0x20, 0x00], // '^'
    [0x02, 0x02, 0x02, 0x02, 0x02, 0x00], // '_'
    [0x00, 0x80, 0x40, 0x20, 0x00, 0x00], // '`'
    [0x04, 0x2A, 0x2A, 0x2A, 0x1E, 0x00], // 'a'
    [0xFE, 0x12, 0x22, 0x22, 0x1C, 0x00], // 'b'
    [0x1C, 0x22, 0x22, 0x22, 0x04, 0x00], // 'c'
    [0x1C, 0x22, 0x22, 0x12, 0xFE, 0x00], // 'd'
    [0x1C, 0x2A, 0x2A, 0x2A, 0x18, 0x00], // 'e'
    [0x10, 0x7E, 0x90, 0x80, 0x40, 0x00], // 'f'
    [0x30, 0x4A, 0x4A, 0x4A, 0x7C, 0x00], // 'g'
    [0xFE, 0x10, 0x20, 0x20, 0x1E, 0x00], // 'h'
    [0x00, 0x22, 0xBE, 0x02, 0x00, 0x00], // 'i'
    [0x04, 0x02, 0x22, 0xBC, 0x00, 0x00], // 'j'
    [0xFE, 0x08, 0x14, 0x22, 0x00, 0x00], // 'k'
    [0x00, 0x82, 0xFE, 0x02, 0x00, 0x00], // 'l'
    [0x3E, 0x20, 0x18, 0x20, 0x1E, 0x00], // 'm'
    [0x3E, 0x10, 0x20, 0x20, 0x1E, 0x00], // 'n'
    [0x1C, 0x22, 0x22, 0x22, 0x1C, 0x00], // 'o'
    [0x3E, 0x28, 0x28, 0x28, 0x10, 0x00], // 'p'
    [0x10, 0x28, 0x28, 0x18, 0x3E, 0x00], // 'q'
    [0x3E, 0x10, 0x20, 0x20, 0x10, 0x00], // 'r'
    [0x12, 0x2A, 0x2A, 0x2A, 0x04, 0x00], // 's'
    [0x20, 0xFC, 0x22, 0x02, 0x04, 0x00], // 't'
    [0x3C, 0x02, 0x02, 0x04, 0x3E, 0x00], // 'u'
    [0x38, 0x04, 0x02, 0x04, 0x38, 0x00], // 'v'
    [0x3C, 0x02, 0x0C, 0x02, 0x3C, 0x00], // 'w'
    [0x22, 0x14, 0x08, 0x14, 0x22, 0x00], // 'x'
    [0x30, 0x0A, 0x0A, 0x0A, 0x3C, 0x00], // 'y'
    [0x22, 0x26, 0x2A, 0x32, 0x22, 0x00], // 'z'
    [0x00, 0x10, 0x6C, 0x82, 0x00, 0x00], // '{'
    [0x00, 0x00, 0xFE, 0x00, 0x00, 0x00], // '|'
    [0x00, 0x82, 0x6C, 0x10, 0x00, 0x00], // '}'
    [0x10, 0x20, 0x10, 0x08, 0x10, 0x00], // '~'
];

/// Raw glyph columns. Bytes without a glyph come back blank.
pub fn glyph(ch: u8) -> [u8; GLYPH_WIDTH as usize] {
    match ch {
        FIRST..=LAST => FONT[(ch - FIRST) as usize],
        _ => [0; GLYPH_WIDTH as usize],
    }
}

/// Glyph columns with `attr` applied: underline sets the bottom row, then
/// inverse flips every pixel.
pub fn render(ch: u8, attr: Attr) -> [u8; GLYPH_WIDTH as usize] {
    let mut columns = glyph(ch);
    for column in columns.iter_mut() {
        if attr.contains(Attr::UNDERLINE) {
            *column |= UNDERLINE_BIT;
        }
        if attr.contains(Attr::INVERSE) {
            *column ^= 0xFF;
        }
    }
    columns
}

/// Pixel origin of a character cell.
pub fn cell_origin(col: u8, row: u8) -> Result<(u8, u8)> {
    if col < COLS && row < ROWS {
        Ok((col * GLYPH_WIDTH, row * GLYPH_HEIGHT))
    } else {
        Err(Error::InvalidCell { col, row })
    }
}

impl<B: PinBank> Bus<B> {
    /// Draw `ch` at a character cell. Off-grid cells are ignored.
    ///
    /// Tiles are 50 pixels wide, so the cells at columns 8, 16 and 33 straddle
    /// a tile edge; those go out as two bursts.
    pub fn draw(&mut self, col: u8, row: u8, ch: u8, attr: Attr) {
        let Ok((x, y)) = cell_origin(col, row) else {
            log::debug!("draw off grid at ({}, {})", col, row);
            return;
        };

        let columns = render(ch, attr);
        let split = frame::room(x).min(GLYPH_WIDTH);
        let (left, right) = columns.split_at(split as usize);
        self.write(x, y, left);
        if !right.is_empty() {
            self.write(x + split, y, right);
        }
    }
}
