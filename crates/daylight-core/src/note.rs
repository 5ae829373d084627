//! Lighting tags in map and event note text.
//!
//! Maps opt into lighting with a tag in their note field:
//!
//! - `<lighting: outside>` or `<lighting: cave>` selects a keyword;
//! - `<tone: (-34, -34, -34, 0)>` pins a fixed tone.
//!
//! Tag names are case-insensitive. The first recognized tag wins; other
//! tags in the note are ignored.

use daylight_types::{GameTime, Tone};

use crate::lighting::Lighting;
use crate::parse::{ParseError, parse_tone};

/// How a map chooses its tint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MapLighting {
    /// No lighting tag: the default tone.
    #[default]
    Inherit,
    /// A lighting keyword resolved through [`Lighting::resolve_tone`].
    Keyword(String),
    /// A fixed tone that ignores the clock.
    Fixed(Tone),
}

impl MapLighting {
    /// Extract the lighting choice from a note.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Tone`] if a `<tone: ...>` tag holds malformed
    /// tone text.
    pub fn from_note(note: &str) -> Result<Self, ParseError> {
        let mut rest = note;
        while let Some(open_at) = rest.find('<') {
            let after = rest.get(open_at.saturating_add(1)..).unwrap_or_default();
            let Some(close_at) = after.find('>') else {
                break;
            };
            let tag = after.get(..close_at).unwrap_or_default();
            rest = after.get(close_at.saturating_add(1)..).unwrap_or_default();

            let Some((name, value)) = tag.split_once(':') else {
                continue;
            };
            match name.trim().to_ascii_lowercase().as_str() {
                "lighting" => return Ok(Self::Keyword(value.trim().to_owned())),
                "tone" => return Ok(Self::Fixed(parse_tone(value)?)),
                _ => {}
            }
        }
        Ok(Self::Inherit)
    }

    /// The tone this map shows at `now`.
    pub fn resolve(&self, lighting: &Lighting, now: GameTime) -> Tone {
        match self {
            Self::Inherit => lighting.default_tone(),
            Self::Keyword(keyword) => lighting.resolve_tone(keyword, now),
            Self::Fixed(tone) => *tone,
        }
    }

    /// Whether the tone can change as the clock moves.
    pub fn follows_clock(&self, lighting: &Lighting) -> bool {
        matches!(self, Self::Keyword(keyword) if lighting.is_outside(keyword))
    }
}
