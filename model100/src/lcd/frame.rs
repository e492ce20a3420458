//! # Frame router
//!
//! Maps frame coordinates onto the ten tiles:
//!
//! ```text
//!   x:  0        50       100      150      200     240
//! y=0   ┌────────┬────────┬────────┬────────┬────────┐
//!       │   0    │   1    │   2    │   3    │   4    │
//! y=32  ├────────┼────────┼────────┼────────┼────────┤
//!       │   5    │   6    │   7    │   8    │   9    │
//! y=64  └────────┴────────┴────────┴────────┴────────┘
//! ```
//!
//! A burst never crosses a tile edge. Callers split; the router does not.

use log::trace;

use crate::{
    bus::Bus,
    lcd::tile::Tile,
    pins::PinBank,
};

pub const WIDTH: u8 = 240;
pub const HEIGHT: u8 = 64;

/// A frame coordinate resolved to a tile and tile-local position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Route {
    pub tile: Tile,
    pub x: u8,
    pub y: u8,
}

/// Resolve `(x, y)`; `y` is a pixel row and only its byte-row matters.
pub fn route(x: u8, y: u8) -> Route {
    debug_assert!(x < WIDTH && y < HEIGHT, "({x}, {y}) is off the frame");

    let (half, y) = if y < 32 { (0, y) } else { (5, y - 32) };

    let (column, x) = if x < 50 {
        (0, x)
    } else if x < 100 {
        (1, x - 50)
    } else if x < 150 {
        (2, x - 100)
    } else if x < 200 {
        (3, x - 150)
    } else {
        (4, x - 200)
    };

    Route {
        tile: Tile::from_index(half + column),
        x,
        y,
    }
}

/// Visible columns left in the tile from `x` to its right edge. Tiles 4
/// and 9 are cut off by the glass at `x = 240`, ten columns short.
#[inline]
pub fn room(x: u8) -> u8 {
    debug_assert!(x < WIDTH);
    (Tile::WIDTH - (x % Tile::WIDTH)).min(WIDTH - x)
}

impl<B: PinBank> Bus<B> {
    /// Write `bytes` as consecutive columns starting at `(x, y)`.
    pub fn write(&mut self, x: u8, y: u8, bytes: &[u8]) {
        let route = route(x, y);
        debug_assert!(bytes.len() <= room(x) as usize, "burst crosses a tile edge");
        trace!("lcd write tile {} ({}, {}) x{}", route.tile.index(), route.x, route.y, bytes.len());

        let mut burst = self.burst();
        let mut tile = burst.select(route.tile);
        tile.set_address(route.x, route.y);
        tile.write_data(bytes);
    }

    /// Read consecutive columns starting at `(x, y)` into `out`.
    pub fn read(&mut self, x: u8, y: u8, out: &mut [u8]) {
        let route = route(x, y);
        debug_assert!(out.len() <= room(x) as usize, "burst crosses a tile edge");

        let mut burst = self.burst();
        let mut tile = burst.select(route.tile);
        tile.set_address(route.x, route.y);
        tile.read_data(out);
    }

    /// Write a single column. MSB is the top pixel.
    pub fn display(&mut self, x: u8, y: u8, value: u8) {
        self.write(x, y, &[value]);
    }
}
