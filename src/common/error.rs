use std::fmt::{Display, Error, Formatter};

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    /// Input could not be interpreted as text, bytes or a number.
    UnsupportedDataType,
    /// Nothing to encode.
    EmptyData,
    /// Payload exceeds the per-mode byte ceiling or version 40 capacity.
    DataTooLarge,
    /// Correction level is not one of L, M, Q or H.
    InvalidLevel,
    /// GF(256) logarithm of zero or an out-of-range value.
    InvalidArgument,
}

impl Display for QRError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let msg = match *self {
            Self::UnsupportedDataType => "unsupported data type",
            Self::EmptyData => "empty data",
            Self::DataTooLarge => "data too large",
            Self::InvalidLevel => "invalid error correction level",
            Self::InvalidArgument => "invalid argument",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for QRError {}

pub type QRResult<T> = Result<T, QRError>;
