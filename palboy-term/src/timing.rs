//! Paces the editor at the picture hardware's refresh rate. A frame wait is
//! also the natural moment to flush the accumulated screen changes, the same
//! way real hardware only shows writes at the next vertical blank.

use crate::screen::ScreenState;
use console::Term;
use palboy::FrameClock;
use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

pub struct TermClock {
    screen: Rc<RefCell<ScreenState>>,
    term: Term,
    frame: Duration,
    deadline: Instant,
}

impl TermClock {
    pub fn new(screen: Rc<RefCell<ScreenState>>, term: Term, frame_rate: f64) -> TermClock {
        let frame = Duration::from_secs_f64(1.0 / frame_rate);
        TermClock {
            screen,
            term,
            frame,
            deadline: Instant::now() + frame,
        }
    }
}

impl FrameClock for TermClock {
    /// Presents pending screen changes, then sleeps out the rest of the
    /// frame. Does not sleep at all if we are already too slow.
    fn wait_frame(&mut self) {
        if let Err(err) = self.screen.borrow_mut().present(&self.term) {
            log::warn!("Could not present frame: {}", err);
        }

        let now = Instant::now();
        if self.deadline > now {
            thread::sleep(self.deadline - now);
            self.deadline += self.frame;
        } else {
            // Too slow. Rebase instead of racing to catch up.
            self.deadline = now + self.frame;
        }
    }
}
