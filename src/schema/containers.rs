//! Specialized "container" schema types that opt into optimized read/write
//! implementations or specialized count encodings.
//!
//! # Examples
//!
//! Raw byte vec with the default native count encoding:
//!
//! ```
//! use spancode::{containers::{self, Pod}, compound};
//!
//! struct MyStruct {
//!     vec: Vec<u8>,
//! }
//!
//! compound! {
//!     MyStruct {
//!         vec: containers::Vec<Pod<u8>>,
//!     }
//! }
//! ```
//!
//! Vector with non-trivial elements and a capped count decode:
//!
//! ```
//! use spancode::{containers::{self, Elem}, compound, len::NativeLen};
//!
//! struct Entry {
//!     name: String,
//!     weight: u64,
//! }
//!
//! compound! {
//!     Entry {
//!         name: String,
//!         weight: u64,
//!     }
//! }
//!
//! struct Ledger {
//!     entries: Vec<Entry>,
//! }
//!
//! compound! {
//!     Ledger {
//!         entries: containers::Vec<Elem<Entry>, NativeLen<1024>>,
//!     }
//! }
//! ```
use {
    super::{SchemaRead, SchemaWrite},
    crate::{
        error::Result,
        io::{Reader, Writer},
    },
    core::{marker::PhantomData, mem, slice},
};
#[cfg(feature = "alloc")]
use {
    super::{size_of_elem_iter, write_elem_iter},
    crate::len::{NativeLen, SeqLen},
};

/// Marker for element types whose in-memory representation is a flat,
/// directly copyable bit pattern: every byte is meaningful (no padding)
/// and every bit pattern is a valid value.
///
/// This is the contract that makes bulk byte transcription of whole
/// slices sound. `bool` and `char` are deliberately not `Plain`: they
/// have bit patterns that must be rejected on decode.
///
/// # Safety
///
/// Implementors must guarantee the type has no padding bytes, no
/// invalid bit patterns, and no indirection.
pub unsafe trait Plain: Copy {}

macro_rules! impl_plain {
    ($($type:ty),+) => {
        $(
            // SAFETY: primitive numeric types have no padding and accept
            // any bit pattern.
            unsafe impl Plain for $type {}
        )+
    };
}

impl_plain!(u8, i8, u16, i16, u32, i32, u64, i64, u128, i128, usize, isize, f32, f64);

// SAFETY: an array of `Plain` elements has no padding between elements and
// accepts any bit pattern.
unsafe impl<T: Plain, const N: usize> Plain for [T; N] {}

/// View a slice of `Plain` values as its raw bytes.
#[inline(always)]
pub(crate) fn bytes_of<T: Plain>(values: &[T]) -> &[u8] {
    // SAFETY: `Plain` guarantees every byte of `T` is initialized and
    // meaningful.
    unsafe { slice::from_raw_parts(values.as_ptr().cast::<u8>(), mem::size_of_val(values)) }
}

/// View a slice of `Plain` values as its raw bytes, for writing.
#[inline(always)]
pub(crate) fn bytes_of_mut<T: Plain>(values: &mut [T]) -> &mut [u8] {
    // SAFETY: `Plain` guarantees any bit pattern written through this view
    // leaves each element a valid `T`.
    unsafe { slice::from_raw_parts_mut(values.as_mut_ptr().cast::<u8>(), mem::size_of_val(values)) }
}

/// Indicates that the type is represented by raw bytes, composable with
/// sequence containers or compound types for an optimized read/write
/// implementation.
///
/// Use [`Elem`] with containers whose elements aren't [`Plain`].
///
/// This can be useful outside of sequences as well, for example on byte
/// array fields of a [`compound!`](crate::compound) schema.
pub struct Pod<T>(PhantomData<T>);

/// Indicates that the type is an element of a sequence, encoded by
/// recursing into its own schema.
///
/// Prefer [`Pod`] for types representable as raw bytes.
pub struct Elem<T>(PhantomData<T>);

impl<T: Plain> SchemaWrite for Pod<T> {
    type Src = T;

    #[inline]
    fn size_of(_src: &Self::Src) -> Result<usize> {
        Ok(size_of::<T>())
    }

    #[inline]
    fn write<W: Writer + ?Sized>(writer: &mut W, src: &Self::Src) -> Result<()> {
        writer.write(bytes_of(slice::from_ref(src)))
    }
}

impl<T: Plain> SchemaRead for Pod<T> {
    type Dst = T;

    #[inline]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        // SAFETY: `Plain` guarantees the all-zero pattern is a valid `T`.
        let mut value = unsafe { mem::zeroed::<T>() };
        reader.read_exact(bytes_of_mut(slice::from_mut(&mut value)))?;
        Ok(value)
    }
}

/// A [`Vec`](alloc::vec::Vec) with a customizable count encoding and an
/// optimized read/write implementation for [`Pod`] elements.
#[cfg(feature = "alloc")]
pub struct Vec<S, Len = NativeLen>(PhantomData<S>, PhantomData<Len>);

/// A [`VecDeque`](alloc::collections::VecDeque) with a customizable count
/// encoding and an optimized read/write implementation for [`Pod`] elements.
#[cfg(feature = "alloc")]
pub struct VecDeque<S, Len = NativeLen>(PhantomData<S>, PhantomData<Len>);

/// A [`Box<[T]>`](alloc::boxed::Box) with a customizable count encoding and
/// an optimized read/write implementation for [`Pod`] elements.
#[cfg(feature = "alloc")]
pub struct BoxedSlice<S, Len = NativeLen>(PhantomData<S>, PhantomData<Len>);

#[cfg(feature = "alloc")]
impl<T, Len> SchemaWrite for Vec<Pod<T>, Len>
where
    T: Plain,
    Len: SeqLen,
{
    type Src = alloc::vec::Vec<T>;

    #[inline]
    fn size_of(src: &Self::Src) -> Result<usize> {
        Ok(Len::bytes_needed(src.len())? + mem::size_of_val(src.as_slice()))
    }

    /// One count prefix, then a single bulk copy of the element bytes.
    #[inline]
    fn write<W: Writer + ?Sized>(writer: &mut W, src: &Self::Src) -> Result<()> {
        Len::write_len(writer, src.len())?;
        writer.write(bytes_of(src.as_slice()))
    }
}

#[cfg(feature = "alloc")]
impl<T, Len> SchemaRead for Vec<Pod<T>, Len>
where
    T: Plain,
    Len: SeqLen,
{
    type Dst = alloc::vec::Vec<T>;

    #[inline]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        let len = Len::read_len_checked::<T, _>(reader)?;
        // SAFETY: `Plain` guarantees the all-zero pattern is a valid `T`.
        let mut vec = alloc::vec![unsafe { mem::zeroed::<T>() }; len];
        reader.read_exact(bytes_of_mut(vec.as_mut_slice()))?;
        Ok(vec)
    }
}

#[cfg(feature = "alloc")]
impl<T, Len> SchemaWrite for Vec<Elem<T>, Len>
where
    T: SchemaWrite,
    T::Src: Sized,
    Len: SeqLen,
{
    type Src = alloc::vec::Vec<T::Src>;

    #[inline(always)]
    fn size_of(src: &Self::Src) -> Result<usize> {
        size_of_elem_iter::<T, Len>(src.iter())
    }

    #[inline(always)]
    fn write<W: Writer + ?Sized>(writer: &mut W, src: &Self::Src) -> Result<()> {
        write_elem_iter::<T, Len, W>(writer, src.iter())
    }
}

#[cfg(feature = "alloc")]
impl<T, Len> SchemaRead for Vec<Elem<T>, Len>
where
    T: SchemaRead,
    Len: SeqLen,
{
    type Dst = alloc::vec::Vec<T::Dst>;

    /// Read the count, then each element in order through its own schema.
    ///
    /// The first failing element aborts the whole read; no partial
    /// container is ever surfaced.
    #[inline]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        let len = Len::read_len_checked::<T::Dst, _>(reader)?;
        let mut vec = alloc::vec::Vec::with_capacity(len);
        for _ in 0..len {
            vec.push(T::read(reader)?);
        }
        Ok(vec)
    }
}

#[cfg(feature = "alloc")]
impl<T, Len> SchemaWrite for VecDeque<Pod<T>, Len>
where
    T: Plain,
    Len: SeqLen,
{
    type Src = alloc::collections::VecDeque<T>;

    #[inline(always)]
    fn size_of(src: &Self::Src) -> Result<usize> {
        Ok(Len::bytes_needed(src.len())? + size_of::<T>() * src.len())
    }

    #[inline(always)]
    fn write<W: Writer + ?Sized>(writer: &mut W, src: &Self::Src) -> Result<()> {
        Len::write_len(writer, src.len())?;
        // The deque's storage may be split in two; both halves are
        // contiguous, so two bulk copies cover it.
        let (front, back) = src.as_slices();
        writer.write(bytes_of(front))?;
        writer.write(bytes_of(back))
    }
}

#[cfg(feature = "alloc")]
impl<T, Len> SchemaRead for VecDeque<Pod<T>, Len>
where
    T: Plain,
    Len: SeqLen,
{
    type Dst = alloc::collections::VecDeque<T>;

    #[inline(always)]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        // Leverage the contiguous read optimization of `Vec`;
        // `From<Vec<T>>` for `VecDeque<T>` is basically free.
        Ok(<Vec<Pod<T>, Len>>::read(reader)?.into())
    }
}

#[cfg(feature = "alloc")]
impl<T, Len> SchemaWrite for VecDeque<Elem<T>, Len>
where
    T: SchemaWrite,
    T::Src: Sized,
    Len: SeqLen,
{
    type Src = alloc::collections::VecDeque<T::Src>;

    #[inline(always)]
    fn size_of(src: &Self::Src) -> Result<usize> {
        size_of_elem_iter::<T, Len>(src.iter())
    }

    #[inline(always)]
    fn write<W: Writer + ?Sized>(writer: &mut W, src: &Self::Src) -> Result<()> {
        write_elem_iter::<T, Len, W>(writer, src.iter())
    }
}

#[cfg(feature = "alloc")]
impl<T, Len> SchemaRead for VecDeque<Elem<T>, Len>
where
    T: SchemaRead,
    Len: SeqLen,
{
    type Dst = alloc::collections::VecDeque<T::Dst>;

    #[inline(always)]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        Ok(<Vec<Elem<T>, Len>>::read(reader)?.into())
    }
}

#[cfg(feature = "alloc")]
impl<T, Len> SchemaWrite for BoxedSlice<Pod<T>, Len>
where
    T: Plain,
    Len: SeqLen,
{
    type Src = alloc::boxed::Box<[T]>;

    #[inline]
    fn size_of(src: &Self::Src) -> Result<usize> {
        Ok(Len::bytes_needed(src.len())? + mem::size_of_val(&src[..]))
    }

    #[inline]
    fn write<W: Writer + ?Sized>(writer: &mut W, src: &Self::Src) -> Result<()> {
        Len::write_len(writer, src.len())?;
        writer.write(bytes_of(&src[..]))
    }
}

#[cfg(feature = "alloc")]
impl<T, Len> SchemaRead for BoxedSlice<Pod<T>, Len>
where
    T: Plain,
    Len: SeqLen,
{
    type Dst = alloc::boxed::Box<[T]>;

    #[inline(always)]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        Ok(<Vec<Pod<T>, Len>>::read(reader)?.into_boxed_slice())
    }
}

#[cfg(feature = "alloc")]
impl<T, Len> SchemaWrite for BoxedSlice<Elem<T>, Len>
where
    T: SchemaWrite,
    T::Src: Sized,
    Len: SeqLen,
{
    type Src = alloc::boxed::Box<[T::Src]>;

    #[inline(always)]
    fn size_of(src: &Self::Src) -> Result<usize> {
        size_of_elem_iter::<T, Len>(src.iter())
    }

    #[inline(always)]
    fn write<W: Writer + ?Sized>(writer: &mut W, src: &Self::Src) -> Result<()> {
        write_elem_iter::<T, Len, W>(writer, src.iter())
    }
}

#[cfg(feature = "alloc")]
impl<T, Len> SchemaRead for BoxedSlice<Elem<T>, Len>
where
    T: SchemaRead,
    Len: SeqLen,
{
    type Dst = alloc::boxed::Box<[T::Dst]>;

    #[inline(always)]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        Ok(<Vec<Elem<T>, Len>>::read(reader)?.into_boxed_slice())
    }
}
