use crate::common::parse_integer;
use crate::config::FieldMap;
use crate::error::DecodeError;
use crate::sentence::Sentence;

/// Signal quality figure from a `GSV` sentence.
pub fn parse_gsv(sentence: &Sentence, field_map: &FieldMap) -> Result<u16, DecodeError> {
    parse_integer::<u16>(sentence, field_map.gsv_signal)
}
