//! Battery-backed palette persistence. The save is four little-endian
//! 15-bit colors in the first eight bytes of cartridge RAM, with
//! `0xFFFF` in slot 0 (the erased-chip pattern) marking a save that was
//! never written.
//!
//! Cartridge RAM must be enabled before any access and disabled right
//! after, both to protect the chip and because an outside writer may own
//! the bytes in between. [`BankGuard`] ties that bracket to a scope.

use super::color::Rgb15;
use super::palette::{ColorStore, COLOR_COUNT};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One 16-bit slot per color.
pub const SAVE_SLOTS: usize = COLOR_COUNT;

/// Size of the whole save in bytes.
pub const SAVE_LEN: usize = 2 * SAVE_SLOTS;

/// Slot 0 value of a battery that has never been written.
pub const SAVE_SENTINEL: u16 = 0xFFFF;

/// Byte-addressed battery RAM. Reads and writes are only legal between
/// [`enable`](BatteryRam::enable) and [`disable`](BatteryRam::disable).
pub trait BatteryRam {
    fn enable(&mut self);
    fn disable(&mut self);
    fn read(&self, addr: usize) -> u8;
    fn write(&mut self, addr: usize, val: u8);
}

/// Enables the RAM on construction and disables it when dropped, so a
/// bank can never be left open on an early return.
struct BankGuard<'a, R: BatteryRam> {
    ram: &'a mut R,
}

impl<'a, R: BatteryRam> BankGuard<'a, R> {
    fn open(ram: &'a mut R) -> BankGuard<'a, R> {
        ram.enable();
        BankGuard { ram }
    }

    fn read_slot(&self, slot: usize) -> u16 {
        self.ram.read(2 * slot) as u16 | (self.ram.read(2 * slot + 1) as u16) << 8
    }

    fn write_slot(&mut self, slot: usize, word: u16) {
        self.ram.write(2 * slot, word as u8);
        self.ram.write(2 * slot + 1, (word >> 8) as u8);
    }
}

impl<'a, R: BatteryRam> Drop for BankGuard<'a, R> {
    fn drop(&mut self) {
        self.ram.disable();
    }
}

/// Moves palettes between a [`ColorStore`] and battery RAM, one complete
/// four-slot transfer per bank bracket.
pub struct SramBridge<R: BatteryRam> {
    ram: R,
}

impl<R: BatteryRam> SramBridge<R> {
    pub fn new(ram: R) -> SramBridge<R> {
        SramBridge { ram }
    }

    pub fn ram(&self) -> &R {
        &self.ram
    }

    /// Loads the save into `store` unless slot 0 still holds the erased
    /// pattern. Returns whether a save was loaded.
    pub fn load_if_valid(&mut self, store: &mut ColorStore) -> bool {
        let slots = self.read_slots();

        if slots[0] == SAVE_SENTINEL {
            log::debug!("Battery RAM is blank, keeping the startup palette");
            return false;
        }

        store.load_raw(&unpack(slots));
        true
    }

    /// Writes all four colors back to the battery.
    pub fn flush(&mut self, store: &ColorStore) {
        let mut guard = BankGuard::open(&mut self.ram);

        for slot in 0..SAVE_SLOTS {
            guard.write_slot(slot, store.raw_of(slot as u8).bits());
        }
    }

    /// Compares the battery against `store` and, if any slot differs,
    /// adopts the battery's palette wholesale. Returns whether anything
    /// changed. This is what lets an outside process edit the save while
    /// the editor runs.
    pub fn poll_external_change(&mut self, store: &mut ColorStore) -> bool {
        let slots = self.read_slots();

        let changed = slots
            .iter()
            .enumerate()
            .any(|(idx, slot)| *slot != store.raw_of(idx as u8).bits());

        if changed {
            store.load_raw(&unpack(slots));
        }

        changed
    }

    fn read_slots(&mut self) -> [u16; SAVE_SLOTS] {
        let guard = BankGuard::open(&mut self.ram);
        let mut slots = [0u16; SAVE_SLOTS];

        for (idx, slot) in slots.iter_mut().enumerate() {
            *slot = guard.read_slot(idx);
        }

        slots
    }
}

fn unpack(slots: [u16; SAVE_SLOTS]) -> [Rgb15; COLOR_COUNT] {
    [
        Rgb15::from_bits(slots[0]),
        Rgb15::from_bits(slots[1]),
        Rgb15::from_bits(slots[2]),
        Rgb15::from_bits(slots[3]),
    ]
}

/// Battery RAM that lives and dies with the process. Handy for tests and
/// for running without a save file.
pub struct MemSram {
    bytes: [u8; SAVE_LEN],
    enabled: bool,
}

impl MemSram {
    pub fn new() -> MemSram {
        MemSram {
            bytes: [0xFF; SAVE_LEN],
            enabled: false,
        }
    }

    pub fn bytes(&self) -> &[u8; SAVE_LEN] {
        &self.bytes
    }

    /// Raw access from outside the bank bracket, standing in for the
    /// external writers [`SramBridge::poll_external_change`] watches for.
    pub fn bytes_mut(&mut self) -> &mut [u8; SAVE_LEN] {
        &mut self.bytes
    }
}

impl BatteryRam for MemSram {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn read(&self, addr: usize) -> u8 {
        debug_assert!(self.enabled);
        self.bytes[addr]
    }

    fn write(&mut self, addr: usize, val: u8) {
        debug_assert!(self.enabled);
        self.bytes[addr] = val;
    }
}

/// Battery RAM persisted to a file. Enabling the bank reads the file so
/// outside edits are picked up; disabling writes it back if anything
/// changed in between.
pub struct FileSram {
    path: PathBuf,
    cache: [u8; SAVE_LEN],
    dirty: bool,
    enabled: bool,
}

impl FileSram {
    /// Opens (or prepares to create) a save file. A missing file is a
    /// fresh battery; the file itself is only written on the first flush.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<FileSram> {
        let path = path.as_ref().to_path_buf();
        let mut cache = [0xFF; SAVE_LEN];

        match fs::read(&path) {
            Ok(bytes) => {
                for (cached, byte) in cache.iter_mut().zip(bytes) {
                    *cached = byte;
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => (),
            Err(err) => return Err(err),
        }

        Ok(FileSram {
            path,
            cache,
            dirty: false,
            enabled: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BatteryRam for FileSram {
    fn enable(&mut self) {
        self.enabled = true;

        match fs::read(&self.path) {
            Ok(bytes) => {
                for (cached, byte) in self.cache.iter_mut().zip(bytes) {
                    *cached = byte;
                }
            }
            // Not created yet, the cache already holds the erased pattern
            Err(err) if err.kind() == io::ErrorKind::NotFound => (),
            Err(err) => log::warn!(
                "Could not read save file {}, keeping last known palette: {}",
                self.path.display(),
                err
            ),
        }
    }

    fn disable(&mut self) {
        self.enabled = false;

        if self.dirty {
            match fs::write(&self.path, &self.cache) {
                Ok(()) => self.dirty = false,
                Err(err) => log::warn!(
                    "Could not write save file {}: {}",
                    self.path.display(),
                    err
                ),
            }
        }
    }

    fn read(&self, addr: usize) -> u8 {
        debug_assert!(self.enabled);
        self.cache[addr]
    }

    fn write(&mut self, addr: usize, val: u8) {
        debug_assert!(self.enabled);
        self.cache[addr] = val;
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_battery_keeps_startup_palette() {
        let mut bridge = SramBridge::new(MemSram::new());
        let mut store = ColorStore::new();

        assert!(!bridge.load_if_valid(&mut store));
        assert_eq!(store.raw_of(0), Rgb15::WHITE);
    }

    #[test]
    fn flush_then_load_round_trips() {
        let mut bridge = SramBridge::new(MemSram::new());
        let mut store = ColorStore::new();
        store.set(2, 1, 7);
        bridge.flush(&store);

        let mut restored = ColorStore::new();
        restored.set(2, 1, 0);
        assert!(bridge.load_if_valid(&mut restored));
        assert_eq!(restored.get(2, 1), 7);
        assert_eq!(restored.raw_of(0), store.raw_of(0));
    }

    #[test]
    fn only_slot_zero_is_the_sentinel() {
        let mut ram = MemSram::new();
        // Slot 0 holds a real color, slot 1 the erased pattern.
        ram.bytes_mut()[0] = 0x34;
        ram.bytes_mut()[1] = 0x12;

        let mut bridge = SramBridge::new(ram);
        let mut store = ColorStore::new();
        assert!(bridge.load_if_valid(&mut store));
        assert_eq!(store.raw_of(0).bits(), 0x1234);
        // Bit 15 of the erased pattern is dropped on load.
        assert_eq!(store.raw_of(1).bits(), 0x7FFF);
    }

    #[test]
    fn poll_detects_and_adopts_outside_writes() {
        let mut bridge = SramBridge::new(MemSram::new());
        let mut store = ColorStore::new();
        bridge.flush(&store);
        assert!(!bridge.poll_external_change(&mut store));

        // Someone else rewrites color 1 to pure component-1.
        bridge.ram.bytes_mut()[2] = 0xE0;
        bridge.ram.bytes_mut()[3] = 0x03;

        assert!(bridge.poll_external_change(&mut store));
        assert_eq!(store.raw_of(1).bits(), 0x03E0);
        // Adopting the save leaves nothing left to detect.
        assert!(!bridge.poll_external_change(&mut store));
    }

    #[test]
    fn slots_are_little_endian() {
        let mut bridge = SramBridge::new(MemSram::new());
        let mut store = ColorStore::new();
        store.load_raw(&[
            Rgb15::from_bits(0x1234),
            Rgb15::from_bits(0x0005),
            Rgb15::from_bits(0x0600),
            Rgb15::from_bits(0x0000),
        ]);
        bridge.flush(&store);

        let bytes = bridge.ram().bytes();
        assert_eq!(&bytes[..4], &[0x34, 0x12, 0x05, 0x00]);
        assert_eq!(&bytes[4..], &[0x00, 0x06, 0x00, 0x00]);
    }

    struct TraceRam {
        inner: MemSram,
        enables: u32,
        disables: u32,
    }

    impl BatteryRam for TraceRam {
        fn enable(&mut self) {
            self.enables += 1;
            self.inner.enable();
        }

        fn disable(&mut self) {
            self.disables += 1;
            self.inner.disable();
        }

        fn read(&self, addr: usize) -> u8 {
            self.inner.read(addr)
        }

        fn write(&mut self, addr: usize, val: u8) {
            self.inner.write(addr, val);
        }
    }

    #[test]
    fn every_operation_is_one_bank_bracket() {
        let mut bridge = SramBridge::new(TraceRam {
            inner: MemSram::new(),
            enables: 0,
            disables: 0,
        });
        let mut store = ColorStore::new();

        bridge.load_if_valid(&mut store);
        bridge.flush(&store);
        bridge.poll_external_change(&mut store);

        assert_eq!(bridge.ram().enables, 3);
        assert_eq!(bridge.ram().disables, 3);
    }

    #[test]
    fn file_sram_round_trips_through_the_file() {
        let path = std::env::temp_dir().join(format!(
            "palboy-sram-roundtrip-{}.sav",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        {
            let mut bridge = SramBridge::new(match FileSram::create(&path) {
                Ok(sram) => sram,
                Err(err) => panic!("temp save: {}", err),
            });
            let mut store = ColorStore::new();
            assert!(!bridge.load_if_valid(&mut store));
            store.set(0, 0, 3);
            bridge.flush(&store);
        }

        {
            let mut bridge = SramBridge::new(match FileSram::create(&path) {
                Ok(sram) => sram,
                Err(err) => panic!("temp save: {}", err),
            });
            let mut store = ColorStore::new();
            assert!(bridge.load_if_valid(&mut store));
            assert_eq!(store.get(0, 0), 3);
        }

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn file_sram_sees_outside_edits() {
        let path = std::env::temp_dir().join(format!(
            "palboy-sram-external-{}.sav",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        let mut bridge = SramBridge::new(match FileSram::create(&path) {
            Ok(sram) => sram,
            Err(err) => panic!("temp save: {}", err),
        });
        let mut store = ColorStore::new();
        bridge.flush(&store);
        assert!(!bridge.poll_external_change(&mut store));

        let mut bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => panic!("temp save: {}", err),
        };
        bytes[0] = 0x00;
        bytes[1] = 0x00;
        if let Err(err) = fs::write(&path, &bytes) {
            panic!("temp save: {}", err);
        }

        assert!(bridge.poll_external_change(&mut store));
        assert_eq!(store.raw_of(0), Rgb15::BLACK);

        let _ = fs::remove_file(&path);
    }
}
