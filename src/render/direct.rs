//! Palette output for hardware with freely writable color registers.

use super::{PaletteRegs, PaletteUpdate, RenderBackend, BG_ENTRY, QUADRANTS, TEXT_ENTRY};
use crate::palette::{ColorStore, COLOR_COUNT};

/// Writes each color straight into its palette: the color itself into
/// the background entry, its contrast shade into the text entry.
pub struct DirectBackend<P: PaletteRegs> {
    regs: P,
}

impl<P: PaletteRegs> DirectBackend<P> {
    pub fn new(regs: P) -> DirectBackend<P> {
        DirectBackend { regs }
    }

    pub fn regs(&self) -> &P {
        &self.regs
    }

    fn write_color(&mut self, store: &ColorStore, color: u8) {
        self.regs.set_entry(color, BG_ENTRY, store.raw_of(color));
        self.regs
            .set_entry(color, TEXT_ENTRY, store.contrast_of(color).text_color());
    }
}

impl<P: PaletteRegs> RenderBackend for DirectBackend<P> {
    fn init_layout(&mut self) {
        for (palette, &(x, y, w, h)) in QUADRANTS.iter().enumerate() {
            self.regs.fill_attr_rect(x, y, w, h, palette as u8);
        }
    }

    fn apply(&mut self, store: &ColorStore, update: PaletteUpdate) {
        match update {
            PaletteUpdate::One(color) => self.write_color(store, color),
            PaletteUpdate::All => {
                for color in 0..COLOR_COUNT as u8 {
                    self.write_color(store, color);
                }
            }
        }
    }

    fn is_slow(&self) -> bool {
        false
    }
}
