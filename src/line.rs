use std::borrow::Cow;

use clap::ValueEnum;

use crate::byte_buffer::ByteBuffer;
use crate::error::MalformedReason;

/// What the reducer does with a line that is not `<station>;<number>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum MalformedPolicy {
    /// Stop at the first malformed line and report it.
    #[default]
    Reject,
    /// Log and drop malformed lines.
    Skip,
    /// Fold malformed lines in as NaN measurements.
    Propagate,
}

/// Splits a line (without its terminator) into station and measurement.
pub fn parse_line(line: &[u8]) -> Result<(&str, f64), MalformedReason> {
    let (name, temp) = line
        .split_delimiter()
        .ok_or(MalformedReason::MissingDelimiter)?;

    let name = std::str::from_utf8(name).map_err(|_| MalformedReason::InvalidUtf8)?;
    let temp = std::str::from_utf8(temp).map_err(|_| MalformedReason::InvalidUtf8)?;
    let value = temp
        .parse::<f64>()
        .map_err(|_| MalformedReason::InvalidNumber(temp.to_string()))?;

    Ok((name, value))
}

/// Never fails: a missing delimiter makes the whole line the station, and any
/// measurement that does not parse becomes NaN.
pub fn parse_line_lossy(line: &[u8]) -> (Cow<'_, str>, f64) {
    match line.split_delimiter() {
        Some((name, temp)) => {
            let value = std::str::from_utf8(temp)
                .ok()
                .and_then(|t| t.parse::<f64>().ok())
                .unwrap_or(f64::NAN);
            (String::from_utf8_lossy(name), value)
        }
        None => (String::from_utf8_lossy(line), f64::NAN),
    }
}
