use crate::common::parse_float;
use crate::error::DecodeError;
use crate::sentence::Sentence;

pub const KNOTS_TO_METERS_PER_SECOND: f64 = 0.514444;

/// VTG field read as the speed over ground in knots.
pub const VTG_SPEED_FIELD: usize = 7;

/// Speed over ground in meters per second from a `VTG` sentence.
pub fn parse_vtg(sentence: &Sentence) -> Result<f32, DecodeError> {
    let knots = parse_float(sentence, VTG_SPEED_FIELD)?;
    Ok((knots * KNOTS_TO_METERS_PER_SECOND) as f32)
}
