//! Debug instrumentation for the editor loop. The editor is generic over
//! a [`DbgEvtSrc`], so release builds pay nothing for it while tests and
//! debugging frontends can record what the loop did.

use super::render::PaletteUpdate;
use std::collections::VecDeque;

const MAX_EVTS_LOGGED: usize = 50;

/// Anything the editor considers worth reporting.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum EditorEvt {
    CursorMoved { color: u8, component: u8 },
    ComponentSet { color: u8, component: u8, value: u8 },
    Randomized,
    /// The palette was written back to battery RAM.
    Flushed,
    /// Battery RAM no longer matched the palette and was reloaded.
    ExternalReload,
    /// The palette hardware was brought up to date.
    Applied(PaletteUpdate),
}

/// Sink for debug events. Implementations decide whether to store,
/// forward or drop them.
pub trait DbgEvtSrc<T> {
    fn push(&mut self, evt: T);
    fn pop(&mut self) -> Option<T>;
}

/// Drops everything. The compiler erases any code pushing into this.
pub struct NoDbgLogger;

impl<T> DbgEvtSrc<T> for NoDbgLogger {
    fn push(&mut self, _evt: T) {}

    fn pop(&mut self) -> Option<T> {
        None
    }
}

/// Keeps the last [`MAX_EVTS_LOGGED`] events in a ring.
pub struct DbgEvtLogger<T> {
    evts: VecDeque<T>,
}

impl<T> DbgEvtLogger<T> {
    pub fn new() -> DbgEvtLogger<T> {
        DbgEvtLogger {
            evts: VecDeque::with_capacity(MAX_EVTS_LOGGED),
        }
    }

    pub fn evts(&self) -> impl Iterator<Item = &T> {
        self.evts.iter()
    }
}

impl<T> DbgEvtSrc<T> for DbgEvtLogger<T> {
    fn push(&mut self, evt: T) {
        if self.evts.len() == MAX_EVTS_LOGGED {
            self.evts.pop_front();
        }
        self.evts.push_back(evt)
    }

    fn pop(&mut self) -> Option<T> {
        self.evts.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_drops_oldest_past_capacity() {
        let mut logger = DbgEvtLogger::new();
        for n in 0..(MAX_EVTS_LOGGED + 10) {
            logger.push(n);
        }
        assert_eq!(logger.evts().count(), MAX_EVTS_LOGGED);
        assert_eq!(logger.pop(), Some(10));
    }
}
