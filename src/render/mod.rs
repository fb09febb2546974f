//! Getting palette state onto the screen. Two backends share one trait:
//! [`DirectBackend`] writes palette registers, [`PacketBackend`] speaks
//! the 16-byte command packet protocol of external palette hardware.
//! Both assign palette `i` to screen quadrant `i` once at startup and
//! afterwards only move color data.

mod direct;
mod packet;

pub use direct::DirectBackend;
pub use packet::{PacketBackend, PacketCmd, PACKET_LEN};

use super::color::Rgb15;
use super::palette::ColorStore;

/// Quadrant rectangles in tile coordinates (x, y, w, h), indexed by the
/// palette shown in them.
pub const QUADRANTS: [(u8, u8, u8, u8); 4] = [
    (0, 0, 10, 9),
    (10, 0, 10, 9),
    (0, 9, 10, 9),
    (10, 9, 10, 9),
];

/// Palette entry holding a quadrant's background color. Entry 0 is the
/// shared entry on packet hardware, so backgrounds live in entry 1.
pub const BG_ENTRY: u8 = 1;

/// Palette entry text glyphs are drawn with.
pub const TEXT_ENTRY: u8 = 3;

/// How much of the palette a [`RenderBackend::apply`] call must cover.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PaletteUpdate {
    /// Only this color changed.
    One(u8),
    /// Everything changed, typically after a randomize or reload.
    All,
}

/// A way of realising [`ColorStore`] contents on palette hardware.
pub trait RenderBackend {
    /// One-time layout setup: assigns palette `i` to quadrant `i`.
    fn init_layout(&mut self);

    /// Brings the hardware up to date with `store`. Backends may push
    /// more than the requested color but never less.
    fn apply(&mut self, store: &ColorStore, update: PaletteUpdate);

    /// Whether `apply` is slow enough to double as the repeat delay
    /// between held-button steps.
    fn is_slow(&self) -> bool;
}

/// Directly writable palette registers plus the attribute fill used for
/// the initial quadrant assignment.
pub trait PaletteRegs {
    fn set_entry(&mut self, palette: u8, entry: u8, color: Rgb15);

    fn fill_attr_rect(&mut self, x: u8, y: u8, w: u8, h: u8, palette: u8);
}

/// Transfer channel for command packets. One call hands over a whole
/// command, 16 bytes per frame with the frame count in the header.
pub trait PacketBus {
    fn transfer(&mut self, data: &[u8]);
}
