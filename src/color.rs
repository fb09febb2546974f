//! The 15-bit color format shared by the palette registers, the packet
//! protocol and the battery saves. Each color is three 5-bit components
//! packed low-to-high; bit 15 stays clear.

/// Smallest value of a 5-bit color component.
pub const COMPONENT_MIN: u8 = 0x00;

/// Largest value of a 5-bit color component.
pub const COMPONENT_MAX: u8 = 0x1F;

/// A packed 15-bit color: component 0 in bits 0-4, component 1 in bits 5-9,
/// component 2 in bits 10-14. Bit 15 is unused and always zero.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Rgb15(u16);

impl Rgb15 {
    pub const BLACK: Rgb15 = Rgb15(0x0000);
    pub const WHITE: Rgb15 = Rgb15(0x7FFF);

    /// Packs three components. Values above 31 are masked down, so callers
    /// that clamp beforehand never lose information.
    pub fn new(c0: u8, c1: u8, c2: u8) -> Rgb15 {
        Rgb15(
            (c0 & COMPONENT_MAX) as u16
                | ((c1 & COMPONENT_MAX) as u16) << 5
                | ((c2 & COMPONENT_MAX) as u16) << 10,
        )
    }

    /// Reinterprets a raw word as a color, discarding bit 15.
    pub fn from_bits(bits: u16) -> Rgb15 {
        Rgb15(bits & 0x7FFF)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    /// Extracts component 0, 1 or 2.
    pub fn component(self, idx: u8) -> u8 {
        debug_assert!(idx < 3);
        ((self.0 >> (5 * idx as u16)) & COMPONENT_MAX as u16) as u8
    }
}

/// Widens a 5-bit component to 8 bits by repeating its three most
/// significant bits in the three least.
pub fn extend(component: u8) -> u8 {
    (component << 3) | (component >> 2)
}

/// Two-level text color chosen against a background color.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Shade {
    /// Black text for light backgrounds.
    Dark,
    /// White text for dark backgrounds.
    Light,
}

impl Shade {
    /// Classifies a background by its luminance weight
    /// `c0*10/3 + c1*10/6 + c2/10`, truncating at every division. The
    /// threshold 23 is the 5-bit equivalent of the usual 186/256 rule.
    pub fn of(c0: u8, c1: u8, c2: u8) -> Shade {
        let weight = c0 as u16 * 10 / 3 + c1 as u16 * 10 / 6 + c2 as u16 / 10;

        if weight > 23 {
            Shade::Dark
        } else {
            Shade::Light
        }
    }

    /// The text color itself: black for [`Shade::Dark`], white for
    /// [`Shade::Light`].
    pub fn text_color(self) -> Rgb15 {
        match self {
            Shade::Dark => Rgb15::BLACK,
            Shade::Light => Rgb15::WHITE,
        }
    }
}
