//! Button input and the typematic press/repeat logic on top of it.
//! Frontends only provide a per-frame button mask; everything about hold
//! delays and auto-repeat lives here.

use super::clock::FrameClock;
use bitflags::bitflags;
use num_enum::TryFromPrimitive;
use std::convert::TryFrom;

bitflags! {
    /// One bit per button, set while the button is held.
    pub struct Buttons: u8 {
        const RIGHT = 0x01;
        const LEFT = 0x02;
        const UP = 0x04;
        const DOWN = 0x08;
        const A = 0x10;
        const B = 0x20;
        const SELECT = 0x40;
        const START = 0x80;
    }
}

/// Source of button state, sampled once per frame.
pub trait Joypad {
    /// The buttons held right now, or `None` once the frontend wants the
    /// editor to shut down.
    fn poll(&mut self) -> Option<Buttons>;
}

/// Editor commands, one per button. The discriminants are the button
/// masks themselves, which makes decoding a strict single-button match:
/// chords and unmapped buttons decode to nothing.
#[derive(Copy, Clone, PartialEq, Eq, Debug, TryFromPrimitive)]
#[repr(u8)]
pub enum Action {
    MoveRight = 0x01,
    MoveLeft = 0x02,
    Increment = 0x04,
    Decrement = 0x08,
    ToggleMax = 0x10,
    ToggleMin = 0x20,
    Randomize = 0x40,
}

impl Action {
    pub fn decode(buttons: Buttons) -> Option<Action> {
        Action::try_from(buttons.bits()).ok()
    }
}

/// Frames a button must stay held before it starts repeating.
pub const TYPEMATIC_DELAY: u8 = 20;

/// Where the debouncer currently is between presses.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DebounceState {
    Idle,
    /// A press (or release) was sampled but has not survived the
    /// typematic delay yet.
    Pressed,
    /// The press outlasted the delay and now fires every frame.
    Repeating,
}

/// Press/repeat bookkeeping: the previously acknowledged mask and the
/// mask sampled this frame.
pub struct Debouncer {
    held: Buttons,
    current: Buttons,
}

impl Debouncer {
    pub fn new() -> Debouncer {
        Debouncer {
            held: Buttons::empty(),
            current: Buttons::empty(),
        }
    }

    /// Stores this frame's sample.
    pub fn record(&mut self, buttons: Buttons) {
        self.current = buttons;
    }

    /// The mask sampled last, the one actions are decoded from.
    pub fn current(&self) -> Buttons {
        self.current
    }

    /// Summarises the two masks. The editor goes back to sleep only in
    /// [`DebounceState::Idle`].
    pub fn state(&self) -> DebounceState {
        if self.current.is_empty() && self.held.is_empty() {
            DebounceState::Idle
        } else if self.current == self.held {
            DebounceState::Repeating
        } else {
            DebounceState::Pressed
        }
    }

    /// Runs the typematic delay for a freshly changed mask: up to
    /// [`TYPEMATIC_DELAY`] frames pass before the press is allowed to
    /// repeat, and releasing everything mid-delay cancels the repeat.
    /// A mask identical to the acknowledged one passes straight through.
    ///
    /// Returns `None` when the joypad reports shutdown.
    pub fn typematic_gate<J: Joypad, C: FrameClock>(
        &mut self,
        joypad: &mut J,
        clock: &mut C,
    ) -> Option<()> {
        if self.held != self.current {
            self.held = self.current;

            for _ in 0..TYPEMATIC_DELAY {
                if joypad.poll()?.is_empty() {
                    self.held = Buttons::empty();
                    break;
                }

                clock.wait_frame();
            }
        }

        Some(())
    }
}
