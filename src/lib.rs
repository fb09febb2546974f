//! PalBoy is the platform-agnostic core of the PalBoy palette editor.
//! It owns the palette state, the save format, the input handling and
//! the two ways of driving palette hardware, but no actual windowing,
//! key reading or drawing code; that lives in a frontend like
//! palboy-term.
//!
//! A frontend provides four small trait implementations: somewhere to
//! put tiles ([`TileGrid`]), a per-frame button sample ([`Joypad`]), a
//! frame pacer ([`FrameClock`]) and one of the two palette outputs
//! (either [`PaletteRegs`] for hardware with writable color registers,
//! or [`PacketBus`] for hardware that only accepts command packets).
//! Everything else is wiring:
//!
//! ```ignore
//! fn main() {
//!     let sram = FileSram::create("palettes.sav").expect("Could not open save file");
//!
//!     // Pick DirectBackend or PacketBackend depending on what the
//!     // platform supports.
//!     let mut editor = Editor::new(
//!         DirectBackend::new(my_palette_regs),
//!         sram,
//!         Lfsr::from_time(),
//!     );
//!
//!     // Blocks until the joypad reports shutdown (poll() == None).
//!     editor.run(&mut my_joypad, &mut my_clock, &mut my_grid);
//! }
//! ```
//!
//! If you want to watch what the loop is doing, construct the editor
//! with [`Editor::with_debugger`] and a [`debug::DbgEvtLogger`] instead.

mod clock;
mod color;
pub mod debug;
mod editor;
mod joypad;
mod palette;
mod render;
mod rng;
mod sram;
mod view;

pub use clock::FrameClock;
pub use color::{extend, Rgb15, Shade, COMPONENT_MAX, COMPONENT_MIN};
pub use editor::{Cursor, Editor};
pub use joypad::{Action, Buttons, DebounceState, Debouncer, Joypad, TYPEMATIC_DELAY};
pub use palette::{ColorStore, COLOR_COUNT, COMPONENT_COUNT};
pub use render::{
    DirectBackend, PacketBackend, PacketBus, PacketCmd, PaletteRegs, PaletteUpdate, RenderBackend,
    BG_ENTRY, PACKET_LEN, QUADRANTS, TEXT_ENTRY,
};
pub use rng::Lfsr;
pub use sram::{BatteryRam, FileSram, MemSram, SramBridge, SAVE_LEN, SAVE_SENTINEL, SAVE_SLOTS};
pub use view::{TileGrid, SCREEN_TILES_X, SCREEN_TILES_Y, TILE_COLOR, TILE_MARKER};
