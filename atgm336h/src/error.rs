use core::fmt;

/// A type-matched sentence whose fields could not be turned into a fix.
///
/// Field indices count from the sentence tag, so `MissingField(1)` on a
/// `$GNZDA` sentence refers to the UTC time field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// The field is absent or empty.
    MissingField(usize),
    /// The field is present but not a (finite) number.
    InvalidNumber(usize),
    /// The time field does not start with six `HHMMSS` digits.
    InvalidTime,
    /// The hemisphere field is not one of the two letters allowed there.
    InvalidHemisphere(usize),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MissingField(index) => write!(f, "field {} is missing", index),
            DecodeError::InvalidNumber(index) => write!(f, "field {} is not a number", index),
            DecodeError::InvalidTime => write!(f, "time field is not in HHMMSS format"),
            DecodeError::InvalidHemisphere(index) => {
                write!(f, "field {} is not a valid hemisphere", index)
            }
        }
    }
}

impl core::error::Error for DecodeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// No sentence with the requested prefix arrived before the deadline.
    /// The module is usually still acquiring a fix; retry later.
    Timeout,
    /// A sentence with the requested prefix arrived but was malformed.
    Decode(DecodeError),
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout)
    }
}

impl From<DecodeError> for Error {
    fn from(error: DecodeError) -> Self {
        Error::Decode(error)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Timeout => write!(f, "timed out waiting for sentence"),
            Error::Decode(e) => write!(f, "malformed sentence: {}", e),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Error::Timeout => None,
            Error::Decode(e) => Some(e),
        }
    }
}
