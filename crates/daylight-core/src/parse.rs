//! Text parsers for clock times, durations, and tones.
//!
//! These run once while configuration, commands, and notes are loaded. A
//! malformed value is a [`ParseError`] surfaced to the operator before the
//! clock ever runs; nothing here is called on the per-frame path.
//!
//! | Parser                | Accepts                                   |
//! |-----------------------|-------------------------------------------|
//! | [`parse_time_of_day`] | `7:05`, `07:05 pm`, `12:00AM`             |
//! | [`parse_duration`]    | `2h 30m`, `1d`, `30m 1D` (any order)      |
//! | [`parse_tone`]        | `(-68, -68, -14, 41)`, `[0 0 0 0]`        |
//! | [`parse_tone_list`]   | `(1,2,3,4) [5,6,7,8]` -> two tones        |

use daylight_types::{GameDuration, GameTime, Tone};

/// Opening brackets accepted around a tone.
const OPENERS: [char; 3] = ['(', '[', '{'];

/// Errors produced while parsing configuration, command, or note text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The text is not an `H:MM` / `HH:MM` clock time.
    #[error("invalid time of day {input:?}: expected H:MM or HH:MM with optional AM/PM")]
    TimeOfDay {
        /// The rejected text.
        input: String,
    },

    /// A duration component could not be represented.
    #[error("invalid duration {input:?}: {reason}")]
    Duration {
        /// The rejected text.
        input: String,
        /// What went wrong.
        reason: String,
    },

    /// The text is not four integers inside one bracket pair.
    #[error("invalid tone {input:?}: expected four integers inside one bracket pair")]
    Tone {
        /// The rejected text.
        input: String,
    },

    /// A clock command could not be understood.
    #[error("invalid command {input:?}: {reason}")]
    Command {
        /// The rejected text.
        input: String,
        /// What went wrong.
        reason: String,
    },
}

/// Parse a clock time such as `7:05 PM` into a time-of-day value.
///
/// Hours are one or two digits, minutes exactly two. An optional `AM`/`PM`
/// marker (any case, optionally preceded by whitespace) switches to the
/// 12-hour convention: 12 AM is hour 0, 12 PM is hour 12, and other PM
/// hours add 12. The result has a day component of zero.
pub fn parse_time_of_day(text: &str) -> Result<GameTime, ParseError> {
    let invalid = || ParseError::TimeOfDay {
        input: text.to_owned(),
    };

    let (hour_text, rest) = text.trim().split_once(':').ok_or_else(invalid)?;
    if hour_text.is_empty() || hour_text.len() > 2 || !is_ascii_digits(hour_text) {
        return Err(invalid());
    }
    let minute_text = rest.get(..2).ok_or_else(invalid)?;
    if !is_ascii_digits(minute_text) {
        return Err(invalid());
    }
    let marker = rest.get(2..).ok_or_else(invalid)?.trim();

    let hour: i64 = hour_text.parse().map_err(|_err| invalid())?;
    let minute: i64 = minute_text.parse().map_err(|_err| invalid())?;
    if minute > 59 {
        return Err(invalid());
    }

    let hour = match marker.to_ascii_lowercase().as_str() {
        "" if hour <= 23 => hour,
        "am" if hour == 12 => 0,
        "am" if (1..=11).contains(&hour) => hour,
        "pm" if hour == 12 => 12,
        "pm" if (1..=11).contains(&hour) => hour.saturating_add(12),
        _ => return Err(invalid()),
    };

    Ok(GameTime::at(hour, minute))
}

/// Parse a duration such as `2h 30m` or `1d`.
///
/// The text is scanned for `<N>d`, `<N>h`, and `<N>m` tokens (unit letter
/// directly after the digits, any case, any order). Missing units count as
/// zero and only the first token of each unit is used; everything else in
/// the text is ignored, so an empty string is a zero duration.
pub fn parse_duration(text: &str) -> Result<GameDuration, ParseError> {
    let mut days = None;
    let mut hours = None;
    let mut minutes = None;

    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if !c.is_ascii_digit() {
            continue;
        }
        let mut end = start.saturating_add(1);
        while let Some((idx, _)) = chars.next_if(|&(_, next)| next.is_ascii_digit()) {
            end = idx.saturating_add(1);
        }

        let slot = match chars.peek().map(|&(_, unit)| unit.to_ascii_lowercase()) {
            Some('d') => &mut days,
            Some('h') => &mut hours,
            Some('m') => &mut minutes,
            _ => continue,
        };
        chars.next();
        if slot.is_some() {
            continue;
        }

        let digits = text.get(start..end).unwrap_or_default();
        let value: i64 = digits.parse().map_err(|err| ParseError::Duration {
            input: text.to_owned(),
            reason: format!("{digits:?}: {err}"),
        })?;
        *slot = Some(value);
    }

    Ok(GameTime::from_parts(
        days.unwrap_or(0),
        hours.unwrap_or(0),
        minutes.unwrap_or(0),
    ))
}

/// Parse the first bracketed group in `text` as a tone.
///
/// The group holds four integers separated by commas and/or whitespace.
/// Any of the channels may carry a sign; by convention gray is unsigned
/// but that is not enforced here.
pub fn parse_tone(text: &str) -> Result<Tone, ParseError> {
    let invalid = || ParseError::Tone {
        input: text.to_owned(),
    };
    let groups = bracket_groups(text).ok_or_else(invalid)?;
    let inner = groups.first().ok_or_else(invalid)?;
    parse_tone_channels(inner).ok_or_else(invalid)
}

/// Parse every bracketed group in `text`, left to right, as a tone.
///
/// Parentheses, square brackets, and curly brackets are all accepted.
/// Text without any group yields an empty list; a malformed or unclosed
/// group is an error.
pub fn parse_tone_list(text: &str) -> Result<Vec<Tone>, ParseError> {
    let invalid = || ParseError::Tone {
        input: text.to_owned(),
    };
    bracket_groups(text)
        .ok_or_else(invalid)?
        .into_iter()
        .map(|inner| parse_tone_channels(inner).ok_or_else(invalid))
        .collect()
}

/// Inner text of each bracket group, or `None` if a group is unclosed.
fn bracket_groups(text: &str) -> Option<Vec<&str>> {
    let mut groups = Vec::new();
    let mut rest = text;
    while let Some(open_at) = rest.find(OPENERS) {
        let mut tail = rest.get(open_at..)?.chars();
        let close = match tail.next()? {
            '(' => ')',
            '[' => ']',
            _ => '}',
        };
        let after = tail.as_str();
        let close_at = after.find(close)?;
        groups.push(after.get(..close_at)?);
        rest = after.get(close_at.saturating_add(1)..)?;
    }
    Some(groups)
}

/// Four comma/whitespace-separated integers.
fn parse_tone_channels(inner: &str) -> Option<Tone> {
    let fields: Vec<&str> = inner
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .collect();
    let [red, green, blue, gray] = fields.as_slice() else {
        return None;
    };
    Some(Tone::new(
        red.parse().ok()?,
        green.parse().ok()?,
        blue.parse().ok()?,
        gray.parse().ok()?,
    ))
}

fn is_ascii_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn minute_of_day(text: &str) -> i64 {
        parse_time_of_day(text).unwrap().minute_of_day()
    }

    #[test]
    fn twelve_hour_markers() {
        assert_eq!(minute_of_day("12:00 AM"), 0);
        assert_eq!(minute_of_day("12:00 PM"), 720);
        assert_eq!(minute_of_day("7:05 AM"), 425);
        assert_eq!(minute_of_day("7:05 PM"), 1145);
    }

    #[test]
    fn markers_are_case_insensitive_and_spacing_optional() {
        assert_eq!(minute_of_day("7:05pm"), 1145);
        assert_eq!(minute_of_day("07:05 Pm"), 1145);
        assert_eq!(minute_of_day("  11:30  am "), 690);
    }

    #[test]
    fn twenty_four_hour_without_marker() {
        assert_eq!(minute_of_day("0:00"), 0);
        assert_eq!(minute_of_day("20:00"), 1200);
        assert_eq!(minute_of_day("23:59"), 1439);
    }

    #[test]
    fn time_of_day_has_day_zero() {
        assert_eq!(parse_time_of_day("23:59").unwrap().days(), 0);
    }

    #[test]
    fn malformed_times_are_rejected() {
        for bad in [
            "", "8", "8:0", "800", ":30", "123:00", "8:60", "24:00", "13:00 PM", "0:30 AM",
            "8:00 XM", "8:00 AM later", "a:bc",
        ] {
            assert!(
                matches!(parse_time_of_day(bad), Err(ParseError::TimeOfDay { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn durations_from_tokens() {
        assert_eq!(parse_duration("2h 30m").unwrap().total_minutes(), 150);
        assert_eq!(parse_duration("1d").unwrap().total_minutes(), 1440);
        assert_eq!(parse_duration("30M 1D 2H").unwrap().total_minutes(), 1440 + 120 + 30);
    }

    #[test]
    fn duration_without_tokens_is_zero() {
        assert_eq!(parse_duration("").unwrap(), GameTime::ZERO);
        assert_eq!(parse_duration("soon").unwrap(), GameTime::ZERO);
        assert_eq!(parse_duration("15 minutes").unwrap(), GameTime::ZERO);
    }

    #[test]
    fn duration_uses_first_token_per_unit() {
        assert_eq!(parse_duration("1h 5h").unwrap().total_minutes(), 60);
    }

    #[test]
    fn duration_overflow_is_an_error() {
        let result = parse_duration("99999999999999999999m");
        assert!(matches!(result, Err(ParseError::Duration { .. })));
    }

    #[test]
    fn tone_in_any_bracket() {
        let expected = Tone::new(-68, -68, -14, 41);
        assert_eq!(parse_tone("(-68, -68, -14, 41)").unwrap(), expected);
        assert_eq!(parse_tone("[-68 -68 -14 41]").unwrap(), expected);
        assert_eq!(parse_tone("{ -68,-68, -14 ,41 }").unwrap(), expected);
        assert_eq!(parse_tone("(-68, -68, -14, 41)").unwrap().to_array(), [-68, -68, -14, 41]);
    }

    #[test]
    fn tone_accepts_signed_gray() {
        assert_eq!(parse_tone("(0, 0, 0, +5)").unwrap().gray, 5);
        assert_eq!(parse_tone("(0, 0, 0, -5)").unwrap().gray, -5);
    }

    #[test]
    fn malformed_tones_are_rejected() {
        for bad in ["", "-68, -68, -14, 41", "(1, 2, 3)", "(1, 2, 3, 4, 5)", "(1, x, 3, 4)", "(1, 2, 3, 4"] {
            assert!(
                matches!(parse_tone(bad), Err(ParseError::Tone { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn tone_list_in_order() {
        let tones = parse_tone_list("(1, 2, 3, 4) [5 6 7 8]\n{-1,-2,-3,0}").unwrap();
        assert_eq!(
            tones,
            vec![
                Tone::new(1, 2, 3, 4),
                Tone::new(5, 6, 7, 8),
                Tone::new(-1, -2, -3, 0),
            ]
        );
    }

    #[test]
    fn tone_list_without_groups_is_empty() {
        assert!(parse_tone_list("").unwrap().is_empty());
        assert!(parse_tone_list("no tones here").unwrap().is_empty());
    }

    #[test]
    fn tone_list_rejects_bad_group() {
        assert!(parse_tone_list("(1, 2, 3, 4) (oops)").is_err());
        assert!(parse_tone_list("(1, 2, 3, 4) [5, 6").is_err());
    }
}
