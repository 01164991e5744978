//! Support for heterogenous sequence count encoding.
use crate::{
    error::{invalid_length, Result},
    io::{Reader, Writer},
};

/// Behavior to support heterogenous sequence count encoding.
///
/// It is possible for sequences to have different count encoding schemes.
/// This trait abstracts over that possibility, allowing users to specify
/// the count encoding scheme for a sequence.
pub trait SeqLen {
    /// Read the element count of a sequence from the reader.
    fn read_len<R: Reader + ?Sized>(reader: &mut R) -> Result<usize>;

    /// Read the element count of a sequence, rejecting counts that are
    /// implausible for elements of type `T` (overflow, or a decoded
    /// allocation size past the scheme's limit).
    #[inline(always)]
    fn read_len_checked<T, R: Reader + ?Sized>(reader: &mut R) -> Result<usize> {
        Self::read_len(reader)
    }

    /// Write the element count of a sequence to the writer.
    fn write_len<W: Writer + ?Sized>(writer: &mut W, len: usize) -> Result<()>;

    /// Calculate the number of bytes needed to encode the given count.
    fn bytes_needed(len: usize) -> Result<usize>;
}

const DEFAULT_PREALLOC_LIMIT: usize = 4 << 20; // 4 MiB

/// [`SeqLen`] implementation matching the native width of the container's
/// size type: the count is a `usize` transcribed as raw native bytes
/// (8 bytes on 64-bit targets).
///
/// The `LIMIT` constant caps the decoded preallocation size in bytes, as a
/// precaution against malicious input causing OOM. The default is 4 MiB.
/// Users may pass a different constant or implement their own [`SeqLen`].
pub struct NativeLen<const LIMIT: usize = DEFAULT_PREALLOC_LIMIT>;

impl<const LIMIT: usize> SeqLen for NativeLen<LIMIT> {
    #[inline(always)]
    fn read_len<R: Reader + ?Sized>(reader: &mut R) -> Result<usize> {
        Ok(usize::from_ne_bytes(reader.read_array()?))
    }

    #[inline(always)]
    fn read_len_checked<T, R: Reader + ?Sized>(reader: &mut R) -> Result<usize> {
        let len = Self::read_len(reader)?;
        let needed = len
            .checked_mul(size_of::<T>().max(1))
            .ok_or(invalid_length(usize::MAX, LIMIT))?;
        if needed > LIMIT {
            return Err(invalid_length(needed, LIMIT));
        }
        Ok(len)
    }

    #[inline(always)]
    fn write_len<W: Writer + ?Sized>(writer: &mut W, len: usize) -> Result<()> {
        writer.write(&len.to_ne_bytes())
    }

    #[inline(always)]
    fn bytes_needed(_len: usize) -> Result<usize> {
        Ok(size_of::<usize>())
    }
}
