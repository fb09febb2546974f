//! Keyboard input. The console crate only offers a blocking [`Term::read_key`],
//! so a helper thread reads keys and forwards them over a channel. The engine
//! polls [`TermJoypad`] once per frame and sees the union of everything that
//! arrived since the last poll.
//!
//! A held key shows up as the terminal's own auto-repeat stream, which the
//! engine's repeat delay then paces like any other button source.

use console::{Key, Term};
use palboy::{Buttons, Joypad};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

enum InputEvent {
    Press(Buttons),
    Quit,
}

pub struct TermJoypad {
    events: Receiver<InputEvent>,
    quit: bool,
}

pub fn spawn(term: Term) -> TermJoypad {
    let (tx, events) = mpsc::channel();

    thread::spawn(move || loop {
        let event = match term.read_key() {
            Ok(key) => match key_to_event(key) {
                Some(event) => event,
                None => continue,
            },
            // The terminal went away, e.g. the window was closed.
            Err(_) => InputEvent::Quit,
        };

        let quitting = matches!(event, InputEvent::Quit);
        if tx.send(event).is_err() || quitting {
            return;
        }
    });

    TermJoypad {
        events,
        quit: false,
    }
}

fn key_to_event(key: Key) -> Option<InputEvent> {
    let buttons = match key {
        Key::ArrowRight => Buttons::RIGHT,
        Key::ArrowLeft => Buttons::LEFT,
        Key::ArrowUp => Buttons::UP,
        Key::ArrowDown => Buttons::DOWN,
        Key::Char('x') | Key::Char('X') => Buttons::A,
        Key::Char('z') | Key::Char('Z') => Buttons::B,
        Key::Char(' ') | Key::Char('r') | Key::Char('R') => Buttons::SELECT,
        Key::Enter => Buttons::START,
        Key::Escape | Key::Char('q') | Key::Char('Q') => return Some(InputEvent::Quit),
        _ => return None,
    };
    Some(InputEvent::Press(buttons))
}

impl Joypad for TermJoypad {
    fn poll(&mut self) -> Option<Buttons> {
        if self.quit {
            return None;
        }

        let mut buttons = Buttons::empty();
        loop {
            match self.events.try_recv() {
                Ok(InputEvent::Press(pressed)) => buttons |= pressed,
                Ok(InputEvent::Quit) | Err(TryRecvError::Disconnected) => {
                    self.quit = true;
                    return None;
                }
                Err(TryRecvError::Empty) => return Some(buttons),
            }
        }
    }
}
