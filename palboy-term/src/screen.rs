//! Terminal stand-in for the picture hardware. A [`ScreenState`] holds the
//! tile indices, the attribute map and the palette memory, and paints changed
//! cells with ANSI escapes. The engine talks to it through three thin handles
//! ([`TermGrid`], [`TermRegs`], [`TermBus`]) that share the state behind an
//! `Rc<RefCell>`, since the engine treats grid, registers and packet bus as
//! unrelated devices.

use console::Term;
use fixedbitset::FixedBitSet;
use palboy::{
    extend, PacketBus, PacketCmd, PaletteRegs, Rgb15, TileGrid, BG_ENTRY, SCREEN_TILES_X,
    SCREEN_TILES_Y, TEXT_ENTRY,
};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;

const WIDTH: usize = SCREEN_TILES_X as usize;
const HEIGHT: usize = SCREEN_TILES_Y as usize;

const PALETTE_COUNT: usize = 4;
const ENTRY_COUNT: usize = 4;

/// How many colors the terminal can actually mix.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ColorDepth {
    /// 24-bit escapes, one for each of the 32768 palette values.
    TrueColor,
    /// The 256-color cube. Palette values snap to the nearest cube entry.
    Ansi256,
}

pub struct ScreenState {
    /// Tile index per cell. Starts out as 0xFF so the first fill dirties
    /// every cell even though it writes the blank tile.
    tiles: [[u8; WIDTH]; HEIGHT],
    /// Palette index per cell.
    attrs: [[u8; WIDTH]; HEIGHT],
    palettes: [[Rgb15; ENTRY_COUNT]; PALETTE_COUNT],
    dirty: FixedBitSet,
    depth: ColorDepth,
}

impl ScreenState {
    pub fn new(depth: ColorDepth) -> ScreenState {
        ScreenState {
            tiles: [[0xFF; WIDTH]; HEIGHT],
            attrs: [[0; WIDTH]; HEIGHT],
            palettes: [[Rgb15::BLACK; ENTRY_COUNT]; PALETTE_COUNT],
            dirty: FixedBitSet::with_capacity(WIDTH * HEIGHT),
            depth,
        }
    }

    fn set_tile(&mut self, x: u8, y: u8, tile: u8) {
        let (x, y) = (x as usize, y as usize);
        if self.tiles[y][x] != tile {
            self.tiles[y][x] = tile;
            self.dirty.insert(y * WIDTH + x);
        }
    }

    fn set_attr_rect(&mut self, x: u8, y: u8, width: u8, height: u8, palette: u8) {
        for row in y..y + height {
            for col in x..x + width {
                let (col, row) = (col as usize, row as usize);
                if self.attrs[row][col] != palette {
                    self.attrs[row][col] = palette;
                    self.dirty.insert(row * WIDTH + col);
                }
            }
        }
    }

    fn set_palette_entry(&mut self, palette: u8, entry: u8, color: Rgb15) {
        let slot = &mut self.palettes[palette as usize][entry as usize];
        if *slot == color {
            return;
        }
        *slot = color;

        // Every cell drawn with this palette shows the new color.
        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                if self.attrs[row][col] == palette {
                    self.dirty.insert(row * WIDTH + col);
                }
            }
        }
    }

    /// Repaints every cell that changed since the last call. Each tile is two
    /// terminal columns wide so the picture is roughly square.
    pub fn present(&mut self, term: &Term) -> io::Result<()> {
        let mut out = String::new();

        for idx in self.dirty.ones() {
            let (col, row) = (idx % WIDTH, idx / WIDTH);
            let palette = &self.palettes[self.attrs[row][col] as usize];
            let glyph = tile_glyph(self.tiles[row][col]);

            out.push_str(&format!("\x1b[{};{}H", row + 1, 2 * col + 1));
            push_color(&mut out, self.depth, palette[TEXT_ENTRY as usize], Plane::Foreground);
            push_color(&mut out, self.depth, palette[BG_ENTRY as usize], Plane::Background);
            out.push(glyph);
            out.push(glyph);
        }

        if out.is_empty() {
            return Ok(());
        }

        // Reset attributes and park the cursor below the picture, where any
        // stray log output lands without tearing it up.
        out.push_str(&format!("\x1b[0m\x1b[{};1H", HEIGHT + 1));
        term.write_str(&out)?;
        self.dirty.clear();
        Ok(())
    }
}

#[derive(Copy, Clone)]
enum Plane {
    Foreground,
    Background,
}

fn push_color(out: &mut String, depth: ColorDepth, color: Rgb15, plane: Plane) {
    let (r, g, b) = (
        extend(color.component(0)),
        extend(color.component(1)),
        extend(color.component(2)),
    );
    match depth {
        ColorDepth::TrueColor => {
            let code = match plane {
                Plane::Foreground => 38,
                Plane::Background => 48,
            };
            out.push_str(&format!("\x1b[{};2;{};{};{}m", code, r, g, b));
        }
        ColorDepth::Ansi256 => {
            let code = match plane {
                Plane::Foreground => 38,
                Plane::Background => 48,
            };
            out.push_str(&format!("\x1b[{};5;{}m", code, cube_index(r, g, b)));
        }
    }
}

/// Nearest entry in the 6x6x6 color cube of the 256-color set.
fn cube_index(r: u8, g: u8, b: u8) -> u8 {
    let scale = |c: u8| ((c as u16 * 5 + 127) / 255) as u8;
    16 + 36 * scale(r) + 6 * scale(g) + scale(b)
}

/// The hex digits already sit on their ASCII codes, so most text tiles pass
/// through unchanged. Only the blank, the hash and the marker need a mapping.
fn tile_glyph(tile: u8) -> char {
    match tile {
        0x00 => ' ',
        0x03 => '#',
        0x10..=0x19 => (b'0' + (tile - 0x10)) as char,
        0x67 => '>',
        t if t.is_ascii_graphic() => t as char,
        _ => '?',
    }
}

pub struct TermGrid(pub Rc<RefCell<ScreenState>>);

impl TileGrid for TermGrid {
    fn set_tile(&mut self, x: u8, y: u8, tile: u8) {
        self.0.borrow_mut().set_tile(x, y, tile);
    }

    fn fill_rect(&mut self, x: u8, y: u8, width: u8, height: u8, tile: u8) {
        let mut screen = self.0.borrow_mut();
        for row in y..y + height {
            for col in x..x + width {
                screen.set_tile(col, row, tile);
            }
        }
    }
}

/// Color-register access for the direct backend.
pub struct TermRegs(pub Rc<RefCell<ScreenState>>);

impl PaletteRegs for TermRegs {
    fn set_entry(&mut self, palette: u8, entry: u8, color: Rgb15) {
        self.0.borrow_mut().set_palette_entry(palette, entry, color);
    }

    fn fill_attr_rect(&mut self, x: u8, y: u8, width: u8, height: u8, palette: u8) {
        self.0.borrow_mut().set_attr_rect(x, y, width, height, palette);
    }
}

/// Packet receiver for the packet backend. Decodes the three commands the
/// engine sends and applies them to the same screen state the registers
/// would touch.
pub struct TermBus(pub Rc<RefCell<ScreenState>>);

impl PacketBus for TermBus {
    fn transfer(&mut self, data: &[u8]) {
        match PacketCmd::decode(data[0]) {
            Some(PacketCmd::Pal01) => self.load_palette_pair(0, data),
            Some(PacketCmd::Pal23) => self.load_palette_pair(2, data),
            Some(PacketCmd::AttrBlk) => self.attr_blk(data),
            None => log::warn!("Ignoring unknown packet command {:#04x}", data[0] >> 3),
        }
    }
}

impl TermBus {
    fn load_palette_pair(&mut self, base: u8, data: &[u8]) {
        let mut screen = self.0.borrow_mut();

        // The first word is the shared entry 0 of all palettes.
        let shared = packet_word(data, 1);
        for palette in 0..PALETTE_COUNT as u8 {
            screen.set_palette_entry(palette, 0, shared);
        }

        for half in 0..2u8 {
            let offset = (3 + 6 * half) as usize;
            for entry in 0..3u8 {
                screen.set_palette_entry(
                    base + half,
                    entry + 1,
                    packet_word(data, offset + 2 * entry as usize),
                );
            }
        }
    }

    fn attr_blk(&mut self, data: &[u8]) {
        let mut screen = self.0.borrow_mut();

        for group in 0..data[1] as usize {
            let group = &data[2 + 6 * group..];
            let (control, palette) = (group[0], group[1]);
            let (x1, y1, x2, y2) = (group[2], group[3], group[4], group[5]);

            // Only the "fill inside" bit is ever sent.
            if control & 0x01 != 0 {
                screen.set_attr_rect(x1, y1, x2 - x1 + 1, y2 - y1 + 1, palette);
            }
        }
    }
}

fn packet_word(data: &[u8], offset: usize) -> Rgb15 {
    Rgb15::from_bits(data[offset] as u16 | (data[offset + 1] as u16) << 8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use palboy::{ColorStore, PacketBackend, PaletteUpdate, RenderBackend};

    fn shared_screen() -> Rc<RefCell<ScreenState>> {
        Rc::new(RefCell::new(ScreenState::new(ColorDepth::TrueColor)))
    }

    #[test]
    fn attr_packet_splits_the_screen_into_quadrants() {
        let screen = shared_screen();
        let mut backend = PacketBackend::new(TermBus(Rc::clone(&screen)));
        backend.init_layout();

        let screen = screen.borrow();
        assert_eq!(screen.attrs[0][0], 0);
        assert_eq!(screen.attrs[0][10], 1);
        assert_eq!(screen.attrs[8][19], 1);
        assert_eq!(screen.attrs[9][9], 2);
        assert_eq!(screen.attrs[17][0], 2);
        assert_eq!(screen.attrs[17][19], 3);
    }

    #[test]
    fn palette_packets_land_in_palette_memory() {
        let screen = shared_screen();
        let mut backend = PacketBackend::new(TermBus(Rc::clone(&screen)));
        let store = ColorStore::new();

        backend.apply(&store, PaletteUpdate::All);

        let screen = screen.borrow();
        for palette in 0..PALETTE_COUNT {
            assert_eq!(screen.palettes[palette][0], Rgb15::WHITE);
            assert_eq!(screen.palettes[palette][2], Rgb15::WHITE);
        }
        // Defaults: white, red, green, blue, with readable text on each.
        assert_eq!(screen.palettes[0][1], Rgb15::WHITE);
        assert_eq!(screen.palettes[1][1], Rgb15::new(31, 0, 0));
        assert_eq!(screen.palettes[2][1], Rgb15::new(0, 31, 0));
        assert_eq!(screen.palettes[3][1], Rgb15::new(0, 0, 31));
        assert_eq!(screen.palettes[0][3], Rgb15::BLACK);
        assert_eq!(screen.palettes[3][3], Rgb15::WHITE);
    }

    #[test]
    fn unknown_packet_commands_are_ignored() {
        let screen = shared_screen();
        let mut bus = TermBus(Rc::clone(&screen));
        {
            let mut screen = screen.borrow_mut();
            screen.set_attr_rect(0, 0, 10, 9, 1);
            screen.dirty.clear();
        }

        // A header this display has no handler for.
        let mut packet = [0u8; 16];
        packet[0] = 0x08 << 3 | 1;
        bus.transfer(&packet);

        let screen = screen.borrow();
        assert_eq!(screen.dirty.count_ones(..), 0);
        assert_eq!(screen.attrs[0][0], 1);
        assert_eq!(screen.palettes[0][0], Rgb15::BLACK);
    }

    #[test]
    fn unchanged_tiles_stay_clean() {
        let screen = shared_screen();
        {
            let mut screen = screen.borrow_mut();
            screen.set_tile(4, 2, 0x17);
            screen.dirty.clear();

            screen.set_tile(4, 2, 0x17);
            assert_eq!(screen.dirty.count_ones(..), 0);

            screen.set_tile(4, 2, 0x18);
            assert!(screen.dirty.contains(2 * WIDTH + 4));
        }
    }

    #[test]
    fn palette_write_dirties_exactly_its_cells() {
        let screen = shared_screen();
        let mut screen = screen.borrow_mut();
        screen.set_attr_rect(0, 0, 10, 9, 0);
        screen.set_attr_rect(10, 0, 10, 9, 1);
        screen.dirty.clear();

        screen.set_palette_entry(1, 1, Rgb15::new(10, 20, 30));

        assert_eq!(screen.dirty.count_ones(..), 10 * 9);
        assert!(screen.dirty.contains(10));
        assert!(!screen.dirty.contains(9));
    }

    #[test]
    fn glyphs_cover_the_tile_set() {
        assert_eq!(tile_glyph(0x00), ' ');
        assert_eq!(tile_glyph(0x03), '#');
        assert_eq!(tile_glyph(0x10), '0');
        assert_eq!(tile_glyph(0x19), '9');
        assert_eq!(tile_glyph(0x41), 'A');
        assert_eq!(tile_glyph(0x46), 'F');
        assert_eq!(tile_glyph(0x67), '>');
        assert_eq!(tile_glyph(b'R'), 'R');
    }

    #[test]
    fn cube_index_hits_the_corners() {
        assert_eq!(cube_index(0, 0, 0), 16);
        assert_eq!(cube_index(255, 255, 255), 231);
        assert_eq!(cube_index(255, 0, 0), 16 + 180);
    }
}
