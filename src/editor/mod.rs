//! The editor loop: sample buttons, mutate the palette, persist it and
//! push it at the render backend, all paced by the frame clock.
//!
//! The loop sleeps between presses, wakes for input or an outside edit
//! of the save, applies at most one action per pass and only touches
//! battery RAM and palette hardware on passes where something changed.

mod cursor;

pub use cursor::Cursor;

use super::clock::FrameClock;
use super::color::{Rgb15, COMPONENT_MAX, COMPONENT_MIN};
use super::debug::{DbgEvtSrc, EditorEvt, NoDbgLogger};
use super::joypad::{Action, DebounceState, Debouncer, Joypad};
use super::palette::{ColorStore, COLOR_COUNT};
use super::render::{PaletteUpdate, RenderBackend};
use super::rng::Lfsr;
use super::sram::{BatteryRam, SramBridge};
use super::view::{self, TileGrid};

/// What changed since the last flush.
#[derive(Copy, Clone, Debug)]
struct DirtyFlags {
    /// The selected color's value moved.
    selected: bool,
    /// All four colors may have moved and the full palette must go out.
    all: bool,
}

impl DirtyFlags {
    const CLEAN: DirtyFlags = DirtyFlags {
        selected: false,
        all: false,
    };

    const ALL: DirtyFlags = DirtyFlags {
        selected: true,
        all: true,
    };

    fn any(self) -> bool {
        self.selected || self.all
    }

    fn update_for(self, selected_color: u8) -> PaletteUpdate {
        if self.all {
            PaletteUpdate::All
        } else {
            PaletteUpdate::One(selected_color)
        }
    }
}

/// The editor core, generic over the render backend, the battery RAM
/// behind the save and a debug event sink.
pub struct Editor<B: RenderBackend, R: BatteryRam, D: DbgEvtSrc<EditorEvt>> {
    store: ColorStore,
    bridge: SramBridge<R>,
    backend: B,
    cursor: Cursor,
    backup: u8,
    debounce: Debouncer,
    dirty: DirtyFlags,
    rng: Lfsr,
    dbg: D,
}

impl<B: RenderBackend, R: BatteryRam> Editor<B, R, NoDbgLogger> {
    pub fn new(backend: B, ram: R, rng: Lfsr) -> Editor<B, R, NoDbgLogger> {
        Editor::with_debugger(backend, ram, rng, NoDbgLogger)
    }
}

impl<B: RenderBackend, R: BatteryRam, D: DbgEvtSrc<EditorEvt>> Editor<B, R, D> {
    pub fn with_debugger(backend: B, ram: R, rng: Lfsr, dbg: D) -> Editor<B, R, D> {
        let store = ColorStore::new();
        let cursor = Cursor::new();
        let backup = store.get(cursor.color, cursor.component);

        Editor {
            store,
            bridge: SramBridge::new(ram),
            backend,
            cursor,
            backup,
            debounce: Debouncer::new(),
            // Starting dirty makes the first pass persist and render the
            // startup palette without any special casing.
            dirty: DirtyFlags::ALL,
            rng,
            dbg,
        }
    }

    pub fn store(&self) -> &ColorStore {
        &self.store
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn save_ram(&self) -> &R {
        self.bridge.ram()
    }

    pub fn debugger(&mut self) -> &mut D {
        &mut self.dbg
    }

    /// Runs the editor until the joypad reports shutdown.
    pub fn run<J, C, G>(&mut self, joypad: &mut J, clock: &mut C, grid: &mut G)
    where
        J: Joypad,
        C: FrameClock,
        G: TileGrid,
    {
        if self.bridge.load_if_valid(&mut self.store) {
            log::info!("Loaded palette from battery RAM");
        }

        self.backend.init_layout();
        view::init_screen(grid);
        view::draw_marker(grid, self.cursor);
        self.backup = self.store.get(self.cursor.color, self.cursor.component);

        loop {
            view::draw_info(grid, &self.store);

            if self.dirty.any() {
                let update = self.dirty.update_for(self.cursor.color);
                self.bridge.flush(&self.store);
                self.dbg.push(EditorEvt::Flushed);
                self.backend.apply(&self.store, update);
                self.dbg.push(EditorEvt::Applied(update));
            }

            // Repeat delay. A slow backend's transfer already is one.
            if !(self.backend.is_slow() && self.dirty.selected) {
                clock.wait_frame();
            }

            self.dirty = DirtyFlags::CLEAN;

            if self.debounce.typematic_gate(joypad, clock).is_none() {
                return;
            }

            if self.idle_wait(joypad, clock).is_none() {
                return;
            }

            self.dispatch(grid, clock);
        }
    }

    /// Sleeps until a button is down, a press is repeating or the save
    /// changed under us. `None` means shutdown.
    fn idle_wait<J: Joypad, C: FrameClock>(
        &mut self,
        joypad: &mut J,
        clock: &mut C,
    ) -> Option<()> {
        loop {
            clock.wait_frame();
            self.debounce.record(joypad.poll()?);

            if self.bridge.poll_external_change(&mut self.store) {
                self.dirty = DirtyFlags::ALL;
                self.dbg.push(EditorEvt::ExternalReload);
                log::info!("Battery RAM changed externally, adopting its palette");
            }

            if self.dirty.all || self.debounce.state() != DebounceState::Idle {
                return Some(());
            }
        }
    }

    fn dispatch<G: TileGrid, C: FrameClock>(&mut self, grid: &mut G, clock: &mut C) {
        let buttons = self.debounce.current();
        let action = match Action::decode(buttons) {
            Some(action) => action,
            None => {
                if !buttons.is_empty() {
                    log::debug!("Ignoring button combination {:?}", buttons);
                }
                return;
            }
        };

        match action {
            Action::MoveLeft | Action::MoveRight => {
                view::clear_marker(grid, self.cursor, &self.store);

                if action == Action::MoveLeft {
                    self.cursor.retreat();
                } else {
                    self.cursor.advance();
                }

                view::draw_marker(grid, self.cursor);
                self.backup = self.store.get(self.cursor.color, self.cursor.component);
                self.dbg.push(EditorEvt::CursorMoved {
                    color: self.cursor.color,
                    component: self.cursor.component,
                });

                // An extra settle frame between cells
                clock.wait_frame();
            }

            Action::Increment => {
                let value = self.store.get(self.cursor.color, self.cursor.component);
                if value < COMPONENT_MAX {
                    self.set_selected(value + 1);
                    self.backup = value + 1;
                }
            }

            Action::Decrement => {
                let value = self.store.get(self.cursor.color, self.cursor.component);
                if value > COMPONENT_MIN {
                    self.set_selected(value - 1);
                    self.backup = value - 1;
                }
            }

            // The toggles leave the backup alone so a second press can
            // bring the old value back.
            Action::ToggleMax => {
                let value = self.store.get(self.cursor.color, self.cursor.component);
                let next = if value == COMPONENT_MAX {
                    self.backup
                } else {
                    COMPONENT_MAX
                };
                self.set_selected(next);
            }

            Action::ToggleMin => {
                let value = self.store.get(self.cursor.color, self.cursor.component);
                let next = if value == COMPONENT_MIN {
                    self.backup
                } else {
                    COMPONENT_MIN
                };
                self.set_selected(next);
            }

            Action::Randomize => {
                let mut raws = [Rgb15::BLACK; COLOR_COUNT];
                for raw in raws.iter_mut() {
                    let lo = self.rng.next_byte() as u16;
                    let hi = self.rng.next_byte() as u16;
                    *raw = Rgb15::from_bits(lo | hi << 8);
                }

                self.store.load_raw(&raws);
                self.dirty = DirtyFlags::ALL;
                self.dbg.push(EditorEvt::Randomized);
                log::debug!("Randomized all colors");
            }
        }
    }

    fn set_selected(&mut self, value: u8) {
        self.store.set(self.cursor.color, self.cursor.component, value);
        self.dirty.selected = true;
        self.dbg.push(EditorEvt::ComponentSet {
            color: self.cursor.color,
            component: self.cursor.component,
            value,
        });
    }
}
