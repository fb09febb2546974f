//! The selection cursor. Twelve positions, colors row-major with three
//! components each, wrapping at both ends.

use crate::palette::{COLOR_COUNT, COMPONENT_COUNT};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Cursor {
    pub color: u8,
    pub component: u8,
}

impl Cursor {
    pub fn new() -> Cursor {
        Cursor {
            color: 0,
            component: 0,
        }
    }

    /// Moves right one component, wrapping into the next color and from
    /// the last color back to the first.
    pub fn advance(&mut self) {
        if self.component < COMPONENT_COUNT as u8 - 1 {
            self.component += 1;
        } else {
            self.component = 0;
            self.color = if self.color < COLOR_COUNT as u8 - 1 {
                self.color + 1
            } else {
                0
            };
        }
    }

    /// Moves left one component, the exact inverse of [`advance`].
    ///
    /// [`advance`]: Cursor::advance
    pub fn retreat(&mut self) {
        if self.component > 0 {
            self.component -= 1;
        } else {
            self.component = COMPONENT_COUNT as u8 - 1;
            self.color = if self.color > 0 {
                self.color - 1
            } else {
                COLOR_COUNT as u8 - 1
            };
        }
    }
}
