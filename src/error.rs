//! Error types for the CSParve64 library.

use std::fmt;

/// Errors produced by the CSParve64 library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsParve64Error {
    /// Configuration flags word has an unsupported (nonzero) value.
    UnsupportedFlags,
    /// Input key is shorter than the required 8 bytes.
    KeyTooShort,
    /// Data length is less than 8 bytes or not a multiple of 8.
    InvalidDataLength,
}

impl fmt::Display for CsParve64Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsParve64Error::UnsupportedFlags => {
                write!(f, "Configuration flags value is not supported")
            }
            CsParve64Error::KeyTooShort => {
                write!(f, "Input key must be at least 8 bytes long")
            }
            CsParve64Error::InvalidDataLength => {
                write!(f, "Data length must be a nonzero multiple of 8 bytes")
            }
        }
    }
}

impl std::error::Error for CsParve64Error {}
