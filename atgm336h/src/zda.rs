use crate::common::{parse_time, required_field};
use crate::error::DecodeError;
use crate::message::LocalTime;
use crate::sentence::Sentence;

/// Time of day from a `ZDA` sentence (field 1, `HHMMSS` UTC).
///
/// `utc_offset_hours` is added to the hour modulo 24. Minutes and seconds are
/// passed through untouched, so the result is only correct for whole-hour
/// offsets, and the date (fields 2..=4) is not adjusted when the hour wraps.
pub fn parse_zda(sentence: &Sentence, utc_offset_hours: i8) -> Result<LocalTime, DecodeError> {
    let utc = parse_time(required_field(sentence, 1)?)?;
    let hour = (utc.hour as i16 + utc_offset_hours as i16).rem_euclid(24) as u8;
    Ok(LocalTime {
        hour,
        minute: utc.minute,
        second: utc.second,
    })
}
