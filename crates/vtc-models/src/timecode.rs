//! Timecode parsing for media-tool output.
//!
//! The transcode engine reports positions as either `HH:MM:SS.frac` (probe
//! diagnostics and progress markers) or a bare `SS.frac` seconds count.
//! Fractional seconds are truncated, never rounded.

use thiserror::Error;

/// Timecode parsing error.
///
/// Malformed input must surface as an error; a silent zero would corrupt
/// percentage math downstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimecodeError {
    #[error("Timecode cannot be empty")]
    Empty,

    #[error("Invalid {0} value: {1}")]
    InvalidValue(&'static str, String),

    #[error("Invalid timecode format '{0}'. Use HH:MM:SS, HH:MM:SS.frac, SS, or SS.frac")]
    InvalidFormat(String),
}

/// Parse a timecode string to total seconds, truncating any fraction.
///
/// # Examples
/// ```
/// use vtc_models::timecode::parse_time_to_seconds;
/// assert_eq!(parse_time_to_seconds("01:02:03.500").unwrap(), 3723);
/// assert_eq!(parse_time_to_seconds("45.250").unwrap(), 45);
/// ```
pub fn parse_time_to_seconds(ts: &str) -> Result<u64, TimecodeError> {
    let (hours, minutes, seconds) = split_fields(ts)?;
    Ok(hours * 3600 + minutes * 60 + seconds)
}

/// Parse a timecode string to total minutes.
///
/// Colon form returns `H*60 + M`, plus one extra minute if the seconds
/// component is nonzero (ceiling behavior). Bare-seconds form returns
/// `SS / 60` with truncating division.
///
/// # Examples
/// ```
/// use vtc_models::timecode::parse_time_to_minutes;
/// assert_eq!(parse_time_to_minutes("01:02:03.500").unwrap(), 63);
/// assert_eq!(parse_time_to_minutes("01:02:00.000").unwrap(), 62);
/// ```
pub fn parse_time_to_minutes(ts: &str) -> Result<u64, TimecodeError> {
    let trimmed = ts.trim();
    if trimmed.contains(':') {
        let (hours, minutes, seconds) = split_fields(ts)?;
        let mut total = hours * 60 + minutes;
        if seconds > 0 {
            total += 1;
        }
        Ok(total)
    } else {
        let seconds = parse_time_to_seconds(ts)?;
        Ok(seconds / 60)
    }
}

/// Split a timecode into (hours, minutes, seconds), truncating any fraction.
///
/// Colon form requires exactly three fields; the probe tool never emits
/// `MM:SS`.
fn split_fields(ts: &str) -> Result<(u64, u64, u64), TimecodeError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimecodeError::Empty);
    }

    // Truncate the fractional part before splitting fields
    let whole = ts.split('.').next().unwrap_or("");

    if whole.contains(':') {
        let parts: Vec<&str> = whole.split(':').collect();
        if parts.len() != 3 {
            return Err(TimecodeError::InvalidFormat(ts.to_string()));
        }
        let hours = parse_field("hours", parts[0])?;
        let minutes = parse_field("minutes", parts[1])?;
        let seconds = parse_field("seconds", parts[2])?;
        Ok((hours, minutes, seconds))
    } else {
        let seconds = parse_field("seconds", whole)?;
        Ok((0, 0, seconds))
    }
}

fn parse_field(component: &'static str, value: &str) -> Result<u64, TimecodeError> {
    value
        .parse::<u64>()
        .map_err(|_| TimecodeError::InvalidValue(component, value.to_string()))
}
