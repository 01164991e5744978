//! Error types and helpers.
use {core::str::Utf8Error, thiserror::Error};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Buffer overflow: writing {0} bytes exceeds free capacity")]
    BufferOverflow(usize),
    #[error("Buffer underflow: reading {0} bytes exceeds pending bytes")]
    BufferUnderflow(usize),
    #[error("Implausible sequence length: {needed} bytes needed, limit is {limit} bytes")]
    InvalidLength { needed: usize, limit: usize },
    #[error("Invalid bool encoding: {0}")]
    InvalidBoolEncoding(u8),
    #[error("Invalid char encoding: {0:#x}")]
    InvalidCharEncoding(u32),
    #[error(transparent)]
    InvalidUtf8Encoding(#[from] Utf8Error),
    #[cfg(feature = "std")]
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = core::result::Result<T, Error>;

#[cold]
pub const fn buffer_overflow(len: usize) -> Error {
    Error::BufferOverflow(len)
}

#[cold]
pub const fn buffer_underflow(len: usize) -> Error {
    Error::BufferUnderflow(len)
}

#[cold]
pub const fn invalid_length(needed: usize, limit: usize) -> Error {
    Error::InvalidLength { needed, limit }
}

#[cold]
pub const fn invalid_bool_encoding(byte: u8) -> Error {
    Error::InvalidBoolEncoding(byte)
}

#[cold]
pub const fn invalid_char_encoding(val: u32) -> Error {
    Error::InvalidCharEncoding(val)
}

#[cold]
pub const fn invalid_utf8_encoding(error: Utf8Error) -> Error {
    Error::InvalidUtf8Encoding(error)
}
