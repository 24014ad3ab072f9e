use crate::common::{degrees_minutes_to_degrees, parse_float, required_field};
use crate::error::DecodeError;
use crate::message::Location;
use crate::sentence::Sentence;

/// Position from a `GLL` sentence: fields 1..=4 are latitude, `N`/`S`,
/// longitude, `E`/`W`, both coordinates in `DDDMM.MMMM`.
pub fn parse_gll(sentence: &Sentence) -> Result<Location, DecodeError> {
    Ok(Location {
        latitude: parse_coordinate(sentence, 1, "N", "S")?,
        longitude: parse_coordinate(sentence, 3, "E", "W")?,
    })
}

fn parse_coordinate(
    sentence: &Sentence,
    index: usize,
    positive: &str,
    negative: &str,
) -> Result<f64, DecodeError> {
    let raw = parse_float(sentence, index)?;
    if raw < 0.0 {
        return Err(DecodeError::InvalidNumber(index));
    }
    let degrees = degrees_minutes_to_degrees(raw);

    let direction = required_field(sentence, index + 1)?;
    if direction == positive {
        Ok(degrees)
    } else if direction == negative {
        Ok(-degrees)
    } else {
        Err(DecodeError::InvalidHemisphere(index + 1))
    }
}
