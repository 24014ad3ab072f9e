use crate::common::{parse_integer, parse_optional_float};
use crate::config::{FieldMap, SatelliteCountField};
use crate::error::DecodeError;
use crate::message::SatelliteCount;
use crate::sentence::Sentence;

/// Satellites used in the fix and HDOP from a `GSA` sentence, at the
/// positions given by `field_map`.
pub fn parse_gsa(sentence: &Sentence, field_map: &FieldMap) -> Result<SatelliteCount, DecodeError> {
    let satellites = match field_map.gsa_satellites {
        SatelliteCountField::Index(index) => parse_integer::<u8>(sentence, index)?,
        SatelliteCountField::UsedSlots { first, last } => {
            // a short sentence means the PRN list itself is cut off
            sentence.field(last)?;
            sentence
                .fields()
                .skip(first)
                .take(last + 1 - first)
                .filter(|prn| !prn.is_empty())
                .count() as u8
        }
    };
    let hdop = parse_optional_float(sentence, field_map.gsa_hdop)?.map(|hdop| hdop as f32);
    Ok(SatelliteCount { satellites, hdop })
}
