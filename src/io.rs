//! [`Reader`] and [`Writer`] sink implementations.
//!
//! Every codec in this crate is generic over these two capabilities, so the
//! byte format is identical no matter which sink is behind them: an owned
//! [`Serializer`](crate::buffer::Serializer) buffer, a plain byte slice, a
//! growable `Vec<u8>`, or (with the `std` feature) any [`std::io`] stream
//! wrapped in [`IoReader`]/[`IoWriter`].
#[cfg(feature = "alloc")]
use alloc::vec::Vec;
use crate::error::{buffer_overflow, buffer_underflow, Result};

/// Sink capability: bounded writes of raw bytes.
pub trait Writer {
    /// Write exactly `src.len()` bytes from `src` into the sink.
    fn write(&mut self, src: &[u8]) -> Result<()>;
}

/// Source capability: bounded reads of raw bytes.
pub trait Reader {
    /// Copy exactly `dst.len()` bytes from the source into `dst`.
    ///
    /// On error the source must be left unconsumed.
    fn read_exact(&mut self, dst: &mut [u8]) -> Result<()>;

    /// Read exactly `N` bytes into a new array.
    #[inline(always)]
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        self.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    /// Read a single byte.
    #[inline(always)]
    fn read_byte(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }
}

impl<W: Writer + ?Sized> Writer for &mut W {
    #[inline(always)]
    fn write(&mut self, src: &[u8]) -> Result<()> {
        (*self).write(src)
    }
}

impl<R: Reader + ?Sized> Reader for &mut R {
    #[inline(always)]
    fn read_exact(&mut self, dst: &mut [u8]) -> Result<()> {
        (*self).read_exact(dst)
    }

    #[inline(always)]
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        (*self).read_array()
    }

    #[inline(always)]
    fn read_byte(&mut self) -> Result<u8> {
        (*self).read_byte()
    }
}

/// Split off the first `len` bytes of `input`, advancing it past them.
#[inline(always)]
fn advance_slice_checked<'a>(input: &mut &'a [u8], len: usize) -> Option<&'a [u8]> {
    let (chunk, rest) = input.split_at_checked(len)?;
    *input = rest;
    Some(chunk)
}

/// Split off the first `len` bytes of `input` for writing, advancing it past them.
#[inline(always)]
fn advance_slice_mut_checked<'a>(input: &mut &'a mut [u8], len: usize) -> Option<&'a mut [u8]> {
    let (chunk, rest) = core::mem::take(input).split_at_mut_checked(len)?;
    *input = rest;
    Some(chunk)
}

impl Reader for &[u8] {
    #[inline]
    fn read_exact(&mut self, dst: &mut [u8]) -> Result<()> {
        let Some(chunk) = advance_slice_checked(self, dst.len()) else {
            return Err(buffer_underflow(dst.len()));
        };
        dst.copy_from_slice(chunk);
        Ok(())
    }

    #[inline(always)]
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let Some((chunk, rest)) = self.split_first_chunk() else {
            return Err(buffer_underflow(N));
        };
        *self = rest;
        Ok(*chunk)
    }
}

impl Writer for &mut [u8] {
    #[inline]
    fn write(&mut self, src: &[u8]) -> Result<()> {
        let Some(chunk) = advance_slice_mut_checked(self, src.len()) else {
            return Err(buffer_overflow(src.len()));
        };
        chunk.copy_from_slice(src);
        Ok(())
    }
}

#[cfg(feature = "alloc")]
impl Writer for Vec<u8> {
    #[inline]
    fn write(&mut self, src: &[u8]) -> Result<()> {
        self.extend_from_slice(src);
        Ok(())
    }
}

#[cfg(feature = "std")]
mod std_io {
    use {
        super::{Reader, Writer},
        crate::error::{buffer_overflow, buffer_underflow, Error, Result},
        std::io::{ErrorKind, Read, Write},
    };

    /// Bind the codec to any [`std::io::Read`] stream.
    ///
    /// A truncated stream reports [`Error::BufferUnderflow`], the same
    /// condition a drained in-memory buffer reports, so decode logic does
    /// not need to care which sink it is reading from. Any other IO failure
    /// surfaces as [`Error::Io`].
    pub struct IoReader<R>(R);

    impl<R: Read> IoReader<R> {
        pub fn new(inner: R) -> Self {
            Self(inner)
        }

        /// Consume the adapter and return the underlying stream.
        pub fn into_inner(self) -> R {
            self.0
        }
    }

    impl<R: Read> Reader for IoReader<R> {
        #[inline]
        fn read_exact(&mut self, dst: &mut [u8]) -> Result<()> {
            self.0.read_exact(dst).map_err(|e| match e.kind() {
                ErrorKind::UnexpectedEof => buffer_underflow(dst.len()),
                _ => Error::Io(e),
            })
        }
    }

    /// Bind the codec to any [`std::io::Write`] stream.
    pub struct IoWriter<W>(W);

    impl<W: Write> IoWriter<W> {
        pub fn new(inner: W) -> Self {
            Self(inner)
        }

        /// Flush the underlying stream.
        pub fn flush(&mut self) -> Result<()> {
            self.0.flush().map_err(Error::Io)
        }

        /// Consume the adapter and return the underlying stream.
        pub fn into_inner(self) -> W {
            self.0
        }
    }

    impl<W: Write> Writer for IoWriter<W> {
        #[inline]
        fn write(&mut self, src: &[u8]) -> Result<()> {
            self.0.write_all(src).map_err(|e| match e.kind() {
                ErrorKind::WriteZero => buffer_overflow(src.len()),
                _ => Error::Io(e),
            })
        }
    }
}

#[cfg(feature = "std")]
pub use std_io::{IoReader, IoWriter};
