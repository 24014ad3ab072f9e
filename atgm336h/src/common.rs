use core::str::FromStr;

use crate::error::DecodeError;
use crate::sentence::Sentence;

/// Non-empty field at `index`.
pub(crate) fn required_field(sentence: &Sentence, index: usize) -> Result<&str, DecodeError> {
    match sentence.field(index)? {
        "" => Err(DecodeError::MissingField(index)),
        field => Ok(field),
    }
}

pub(crate) fn parse_integer<T: FromStr>(sentence: &Sentence, index: usize) -> Result<T, DecodeError> {
    required_field(sentence, index)?
        .parse::<T>()
        .map_err(|_| DecodeError::InvalidNumber(index))
}

pub(crate) fn parse_float(sentence: &Sentence, index: usize) -> Result<f64, DecodeError> {
    let value = required_field(sentence, index)?
        .parse::<f64>()
        .map_err(|_| DecodeError::InvalidNumber(index))?;
    // "nan" and "inf" parse fine but are never valid NMEA numbers
    if !value.is_finite() {
        return Err(DecodeError::InvalidNumber(index));
    }
    Ok(value)
}

/// Like [`parse_float`], but an absent or empty field is `None`.
pub(crate) fn parse_optional_float(
    sentence: &Sentence,
    index: usize,
) -> Result<Option<f64>, DecodeError> {
    match sentence.field(index) {
        Ok("") | Err(DecodeError::MissingField(_)) => Ok(None),
        Ok(_) => parse_float(sentence, index).map(Some),
        Err(e) => Err(e),
    }
}

pub(crate) struct UtcTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// `HHMMSS` with optional fractional seconds, which are dropped. Values are
/// not range checked.
pub(crate) fn parse_time(str: &str) -> Result<UtcTime, DecodeError> {
    let two_digits = |start: usize| -> Result<u8, DecodeError> {
        let digits = str.get(start..start + 2).ok_or(DecodeError::InvalidTime)?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DecodeError::InvalidTime);
        }
        digits.parse::<u8>().map_err(|_| DecodeError::InvalidTime)
    };
    Ok(UtcTime {
        hour: two_digits(0)?,
        minute: two_digits(2)?,
        second: two_digits(4)?,
    })
}

/// `DDDMM.MMMM` to decimal degrees.
pub(crate) fn degrees_minutes_to_degrees(raw: f64) -> f64 {
    // raw is non-negative, so the cast truncates like floor
    let degrees = (raw / 100.0) as u32 as f64;
    let minutes = raw - degrees * 100.0;
    degrees + minutes / 60.0
}
