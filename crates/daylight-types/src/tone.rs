//! Screen tint values.

use core::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A four-channel screen tint: red, green, and blue offsets plus a gray
/// (desaturation) amount.
///
/// No range is enforced here. The host tint system decides what it
/// accepts; conventional hosts clamp color channels to -255..=255 and gray
/// to 0..=255.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Tone {
    /// Red channel offset.
    pub red: i32,
    /// Green channel offset.
    pub green: i32,
    /// Blue channel offset.
    pub blue: i32,
    /// Gray (desaturation) amount.
    pub gray: i32,
}

impl Tone {
    /// The untinted screen.
    pub const NEUTRAL: Self = Self::new(0, 0, 0, 0);

    /// Create a tone from its four channels.
    pub const fn new(red: i32, green: i32, blue: i32, gray: i32) -> Self {
        Self {
            red,
            green,
            blue,
            gray,
        }
    }

    /// The channels in `[red, green, blue, gray]` order.
    pub const fn to_array(self) -> [i32; 4] {
        [self.red, self.green, self.blue, self.gray]
    }
}

impl From<[i32; 4]> for Tone {
    fn from([red, green, blue, gray]: [i32; 4]) -> Self {
        Self::new(red, green, blue, gray)
    }
}

impl From<Tone> for [i32; 4] {
    fn from(tone: Tone) -> Self {
        tone.to_array()
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.red, self.green, self.blue, self.gray
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_conversions_keep_channel_order() {
        let tone = Tone::from([-68, -68, -14, 41]);
        assert_eq!(tone.red, -68);
        assert_eq!(tone.blue, -14);
        assert_eq!(tone.gray, 41);
        assert_eq!(<[i32; 4]>::from(tone), [-68, -68, -14, 41]);
    }

    #[test]
    fn display_uses_parenthesized_list() {
        assert_eq!(Tone::new(-68, -68, -14, 41).to_string(), "(-68, -68, -14, 41)");
        assert_eq!(Tone::NEUTRAL.to_string(), "(0, 0, 0, 0)");
    }

    #[test]
    fn default_is_neutral() {
        assert_eq!(Tone::default(), Tone::NEUTRAL);
    }
}
