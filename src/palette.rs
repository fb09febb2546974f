//! The editable palette state. Components are stored unpacked so the
//! editor can step a single channel without touching the other two; the
//! packed form is recomputed on demand.

use super::color::{Rgb15, Shade, COMPONENT_MAX};

/// Number of editable colors.
pub const COLOR_COUNT: usize = 4;

/// Components per color.
pub const COMPONENT_COUNT: usize = 3;

/// Four colors of three 5-bit components each. This is the single source
/// of truth; palette hardware and battery RAM are both derived from it.
#[derive(Clone, Debug)]
pub struct ColorStore {
    components: [[u8; COMPONENT_COUNT]; COLOR_COUNT],
}

impl ColorStore {
    /// The startup palette: white, red, green, blue.
    pub fn new() -> ColorStore {
        ColorStore {
            components: [
                [COMPONENT_MAX, COMPONENT_MAX, COMPONENT_MAX],
                [COMPONENT_MAX, 0, 0],
                [0, COMPONENT_MAX, 0],
                [0, 0, COMPONENT_MAX],
            ],
        }
    }

    pub fn get(&self, color: u8, component: u8) -> u8 {
        self.components[color as usize][component as usize]
    }

    /// Stores a component verbatim. Callers clamp to [`COMPONENT_MAX`]
    /// before calling; out-of-range values stay out of range until the
    /// next pack.
    pub fn set(&mut self, color: u8, component: u8, value: u8) {
        self.components[color as usize][component as usize] = value;
    }

    /// Packs one color into its 15-bit form.
    pub fn raw_of(&self, color: u8) -> Rgb15 {
        let c = self.components[color as usize];
        Rgb15::new(c[0], c[1], c[2])
    }

    /// The readable text shade for one color's current value.
    pub fn contrast_of(&self, color: u8) -> Shade {
        let c = self.components[color as usize];
        Shade::of(c[0], c[1], c[2])
    }

    /// Replaces all four colors with unpacked copies of `raws`.
    pub fn load_raw(&mut self, raws: &[Rgb15; COLOR_COUNT]) {
        for (components, raw) in self.components.iter_mut().zip(raws.iter()) {
            for (idx, component) in components.iter_mut().enumerate() {
                *component = raw.component(idx as u8);
            }
        }
    }
}
