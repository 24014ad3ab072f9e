use core::fmt;

use heapless::String;

use crate::error::DecodeError;

/// 82 characters of NMEA sentence plus CR LF.
pub const MAX_SENTENCE_LEN: usize = 84;

/// One text line from the receiver, already matched against a sentence tag
/// such as `$GNGLL`.
///
/// Fields are the comma-separated parts of the line. Field 0 is the tag. A
/// trailing `*hh` checksum is cut off the last field but never checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence(String<MAX_SENTENCE_LEN>);

impl Sentence {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn tag(&self) -> &str {
        self.fields().next().unwrap_or("")
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        let body = match self.0.split_once('*') {
            Some((body, _checksum)) => body,
            None => self.0.as_str(),
        };
        body.split(',')
    }

    /// Field at `index`, which may be empty. Fails only when the sentence has
    /// fewer fields.
    pub fn field(&self, index: usize) -> Result<&str, DecodeError> {
        self.fields()
            .nth(index)
            .ok_or(DecodeError::MissingField(index))
    }
}

impl TryFrom<&str> for Sentence {
    type Error = ();

    fn try_from(line: &str) -> Result<Self, Self::Error> {
        Ok(Self(String::try_from(line)?))
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Sentence {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}
