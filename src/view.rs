//! The tile layout of the editor screen: a 20x18 grid split into four
//! quadrants, each showing one color's components in hex plus the same
//! color as a raw 15-bit word, a web-style hex code and decimal channels.
//!
//! Tile ids follow the font: `0x10` starts the decimal digits, `0x41`
//! the hex letters, and letter glyphs sit at their ASCII codes. Tile 0
//! is blank and shows pure background color.

use super::color::extend;
use super::editor::Cursor;
use super::palette::{ColorStore, COLOR_COUNT, COMPONENT_COUNT};

/// Tile grid output. Coordinates are tiles, (0, 0) top left.
pub trait TileGrid {
    fn set_tile(&mut self, x: u8, y: u8, tile: u8);

    fn fill_rect(&mut self, x: u8, y: u8, w: u8, h: u8, tile: u8);
}

pub const SCREEN_TILES_X: u8 = 20;
pub const SCREEN_TILES_Y: u8 = 18;

/// Blank tile, shows nothing but the quadrant's background color.
pub const TILE_COLOR: u8 = 0x00;

/// The selection marker glyph.
pub const TILE_MARKER: u8 = 0x67;

/// '#' for the web color codes.
const TILE_HASH: u8 = 0x03;

// Top-left corners of the info blocks, indexed by color.
const COMPONENT_X: [u8; 4] = [1, 11, 1, 11];
const COMPONENT_Y: [u8; 4] = [1, 1, 10, 10];
const RAW_X: [u8; 4] = [3, 13, 3, 13];
const RAW_Y: [u8; 4] = [2, 2, 11, 11];
const HTML_X: [u8; 4] = [1, 11, 1, 11];
const HTML_Y: [u8; 4] = [7, 7, 16, 16];
const DECIMAL_X: [u8; 4] = [3, 13, 3, 13];
const DECIMAL_Y: [u8; 4] = [4, 4, 13, 13];

// Marker cells sit one tile left of each component hex pair.
const MARKER_X: [[u8; 3]; 4] = [
    [0, 3, 6],
    [10, 13, 16],
    [0, 3, 6],
    [10, 13, 16],
];
const MARKER_Y: [u8; 4] = [1, 1, 10, 10];

fn hex_tile(nibble: u8) -> u8 {
    if nibble < 10 {
        nibble + 0x10
    } else {
        nibble - 10 + 0x41
    }
}

fn draw_hex_byte<G: TileGrid>(grid: &mut G, x: u8, y: u8, byte: u8) {
    grid.set_tile(x, y, hex_tile(byte >> 4));
    grid.set_tile(x + 1, y, hex_tile(byte & 0x0F));
}

/// Blanks the whole screen to the quadrant colors.
pub fn init_screen<G: TileGrid>(grid: &mut G) {
    grid.fill_rect(0, 0, SCREEN_TILES_X, SCREEN_TILES_Y, TILE_COLOR);
}

/// Redraws every color's info block. Cheap enough to run every pass,
/// which spares the caller any per-field dirty tracking.
pub fn draw_info<G: TileGrid>(grid: &mut G, store: &ColorStore) {
    for color in 0..COLOR_COUNT as u8 {
        let block = color as usize;

        // The packed word, high byte first so it reads as written.
        let raw = store.raw_of(color).bits();
        draw_hex_byte(grid, RAW_X[block], RAW_Y[block], (raw >> 8) as u8);
        draw_hex_byte(grid, RAW_X[block] + 2, RAW_Y[block], raw as u8);

        // Web color code: '#' and three widened components.
        grid.set_tile(HTML_X[block], HTML_Y[block], TILE_HASH);
        for component in 0..COMPONENT_COUNT as u8 {
            draw_hex_byte(
                grid,
                HTML_X[block] + 1 + 2 * component,
                HTML_Y[block],
                extend(store.get(color, component)),
            );
        }

        draw_decimal(grid, store, color);

        // The editable 5-bit components themselves.
        for component in 0..COMPONENT_COUNT as u8 {
            draw_hex_byte(
                grid,
                COMPONENT_X[block] + 3 * component,
                COMPONENT_Y[block],
                store.get(color, component),
            );
        }
    }
}

/// One labelled row per channel, widened to 0-255 decimal.
fn draw_decimal<G: TileGrid>(grid: &mut G, store: &ColorStore, color: u8) {
    let block = color as usize;
    let x = DECIMAL_X[block];
    let y = DECIMAL_Y[block];

    for (row, label) in [b'R', b'G', b'B'].iter().enumerate() {
        let y = y + row as u8;
        let widened = extend(store.get(color, row as u8));

        grid.set_tile(x, y, *label);
        grid.set_tile(x + 1, y, hex_tile(widened / 100));
        grid.set_tile(x + 2, y, hex_tile(widened / 10 % 10));
        grid.set_tile(x + 3, y, hex_tile(widened % 10));
    }
}

pub fn draw_marker<G: TileGrid>(grid: &mut G, cursor: Cursor) {
    grid.set_tile(
        MARKER_X[cursor.color as usize][cursor.component as usize],
        MARKER_Y[cursor.color as usize],
        TILE_MARKER,
    );
}

/// Removes the marker and repaints the hex pair it pointed at.
pub fn clear_marker<G: TileGrid>(grid: &mut G, cursor: Cursor, store: &ColorStore) {
    let block = cursor.color as usize;

    draw_hex_byte(
        grid,
        COMPONENT_X[block] + 3 * cursor.component,
        COMPONENT_Y[block],
        store.get(cursor.color, cursor.component),
    );
    grid.set_tile(
        MARKER_X[block][cursor.component as usize],
        MARKER_Y[block],
        TILE_COLOR,
    );
}
