//! Palette output over the 16-byte command packet protocol. Colors can
//! only be moved two palettes at a time, so the four editor colors map
//! onto two pair packets, and a change to either color of a pair costs a
//! retransmit of the whole pair.

use super::{PacketBus, PaletteUpdate, RenderBackend};
use crate::color::Rgb15;
use crate::palette::ColorStore;
use num_enum::TryFromPrimitive;
use std::convert::TryFrom;

/// Bytes per packet frame.
pub const PACKET_LEN: usize = 16;

/// The command codes the editor sends. Receivers can match headers back
/// to them through [`PacketCmd::decode`].
#[derive(Copy, Clone, PartialEq, Eq, Debug, TryFromPrimitive)]
#[repr(u8)]
pub enum PacketCmd {
    /// Colors of palettes 0 and 1.
    Pal01 = 0x00,
    /// Colors of palettes 2 and 3.
    Pal23 = 0x01,
    /// Rectangular palette attribute assignment.
    AttrBlk = 0x04,
}

impl PacketCmd {
    /// Reads the command back out of a header byte.
    pub fn decode(header: u8) -> Option<PacketCmd> {
        PacketCmd::try_from(header >> 3).ok()
    }
}

/// Packet header byte: command code in the top five bits, frame count in
/// the bottom three.
const fn header(cmd: PacketCmd, frames: u8) -> u8 {
    (cmd as u8) << 3 | frames
}

/// Two-frame attribute command assigning palettes 1-3 to their quadrants
/// (quadrant 0 keeps the power-on palette 0): three inclusive rectangles
/// of (palette, x1, y1, x2, y2), then padding.
const ATTR_BLK_QUADRANTS: [u8; 2 * PACKET_LEN] = [
    header(PacketCmd::AttrBlk, 2),
    0x03,
    0x01, 0x01, 10, 0, 19, 8,
    0x01, 0x02, 0, 9, 9, 17,
    0x01, 0x03, 10, 9, 19, 17,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

fn put_word(data: &mut [u8; PACKET_LEN], at: usize, word: u16) {
    data[at] = word as u8;
    data[at + 1] = (word >> 8) as u8;
}

/// Builds a PAL packet for the pair starting at color `base`. Each half
/// carries four entries: the shared entry 0 (kept white), the background
/// color, a fixed white entry and the contrast text color.
fn pal_packet(cmd: PacketCmd, base: u8, store: &ColorStore) -> [u8; PACKET_LEN] {
    let mut data = [0u8; PACKET_LEN];
    data[0] = header(cmd, 1);
    put_word(&mut data, 1, Rgb15::WHITE.bits());

    for half in 0..2u8 {
        let color = base + half;
        let at = 3 + 6 * half as usize;
        put_word(&mut data, at, store.raw_of(color).bits());
        put_word(&mut data, at + 2, Rgb15::WHITE.bits());
        put_word(&mut data, at + 4, store.contrast_of(color).text_color().bits());
    }

    data
}

/// Renders by retransmitting palette pair packets.
pub struct PacketBackend<B: PacketBus> {
    bus: B,
}

impl<B: PacketBus> PacketBackend<B> {
    pub fn new(bus: B) -> PacketBackend<B> {
        PacketBackend { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    fn send_pair(&mut self, store: &ColorStore, cmd: PacketCmd, base: u8) {
        let data = pal_packet(cmd, base, store);
        log::debug!("Transferring {:?} packet", cmd);
        self.bus.transfer(&data);
    }
}

impl<B: PacketBus> RenderBackend for PacketBackend<B> {
    fn init_layout(&mut self) {
        self.bus.transfer(&ATTR_BLK_QUADRANTS);
    }

    fn apply(&mut self, store: &ColorStore, update: PaletteUpdate) {
        match update {
            PaletteUpdate::One(color) if color < 2 => {
                self.send_pair(store, PacketCmd::Pal01, 0)
            }
            PaletteUpdate::One(_) => self.send_pair(store, PacketCmd::Pal23, 2),
            PaletteUpdate::All => {
                self.send_pair(store, PacketCmd::Pal01, 0);
                self.send_pair(store, PacketCmd::Pal23, 2);
            }
        }
    }

    fn is_slow(&self) -> bool {
        true
    }
}
