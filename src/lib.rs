//! spancode is a bounds-checked byte-queue serializer with a schema-driven
//! codec layer that produces the same raw byte format whether it targets an
//! in-memory buffer or a persistent stream.
//!
//! In short, `spancode` classifies how a value's shape maps onto the wire
//! at build time: trivial values transcribe as their raw native bytes,
//! sequences recurse through their elements behind a count prefix, and user
//! types delegate to their own codec pair. Heterogeneous values compose
//! into one ordered transaction with [`Layout`].
//!
//! # Quickstart
//!
//! Serialize into an owned byte-queue buffer and read the values back in
//! write order:
//!
//! ```
//! use spancode::ArraySerializer;
//!
//! let mut buf = ArraySerializer::<16>::new();
//! buf.write(&0x2Au32).unwrap();
//! buf.write(&0x0102030405060708u64).unwrap();
//!
//! assert_eq!(buf.read::<u32>().unwrap(), 0x2A);
//! assert_eq!(buf.read::<u64>().unwrap(), 0x0102030405060708);
//! ```
//!
//! Group heterogeneous values into one transaction against any sink; a
//! user type supplies its codec with [`compound!`], which composes at any
//! nesting depth:
//!
//! ```
//! use spancode::{compound, HeapSerializer, Layout};
//!
//! struct Station {
//!     id: u32,
//!     samples: Vec<f64>,
//! }
//!
//! compound! {
//!     Station {
//!         id: u32,
//!         samples: Vec<f64>,
//!     }
//! }
//!
//! type Wire = Layout<(i64, Station, String)>;
//!
//! let station = Station { id: 9, samples: vec![0.5, 1.25] };
//!
//! let mut buf = HeapSerializer::with_capacity(128);
//! Wire::write(&mut buf, &13, &station, &"hi".to_string()).unwrap();
//!
//! let (n, back, text) = Wire::read(&mut buf).unwrap();
//! assert_eq!(n, 13);
//! assert_eq!(back.id, 9);
//! assert_eq!(back.samples, station.samples);
//! assert_eq!(text, "hi");
//! ```
//!
//! The same bytes move through OS streams via the `std` adapters:
//!
//! ```
//! use spancode::{io::{IoReader, IoWriter}, Layout};
//! use std::io::Cursor;
//!
//! type Wire = Layout<(u16, Vec<u8>)>;
//!
//! let mut sink = IoWriter::new(Cursor::new(Vec::new()));
//! Wire::write(&mut sink, &7, &vec![1, 2, 3]).unwrap();
//!
//! let bytes = sink.into_inner().into_inner();
//! let mut source = IoReader::new(Cursor::new(bytes));
//! let (tag, payload) = Wire::read(&mut source).unwrap();
//! assert_eq!(tag, 7);
//! assert_eq!(payload, [1, 2, 3]);
//! ```
//!
//! # Wire format
//!
//! The format is a raw byte contract agreed between writer and reader, with
//! no magic number, version tag, checksum, padding, or overall length
//! header. Format compatibility is entirely the caller's responsibility:
//! both ends must use the same schema sequence and the same native
//! representation.
//!
//! - Trivial values: raw native-representation bytes, no framing and no
//!   endianness normalization.
//! - Dynamically sized containers: an unsigned count in the native width of
//!   the container's size type (see [`len::NativeLen`]), then the element
//!   bytes (one bulk copy for contiguous [`Plain`](containers::Plain)
//!   elements, recursively encoded elements otherwise).
//! - Fixed-arity containers (arrays, tuples, [`compound!`] structs): no
//!   count prefix, just the members in order.
//!
//! # Failure model
//!
//! Every failure is synchronous and surfaced immediately as an [`Error`];
//! there is no retry, rollback, or recovery in the core. A failed multi
//! value write can leave a sink holding a partial transaction prefix; the
//! caller decides whether to discard the sink or
//! [`reset`](Serializer::reset) the buffer.
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(feature = "std"), no_std)]
#[cfg(feature = "alloc")]
extern crate alloc;

pub mod buffer;
pub mod error;
pub mod io;
pub mod layout;
pub mod len;
mod schema;

#[cfg(feature = "alloc")]
pub use buffer::HeapSerializer;
pub use {
    buffer::{ArraySerializer, Serializer},
    error::{Error, Result},
    layout::Layout,
    schema::*,
};

use io::{Reader, Writer};

/// Get the serialized size of `value`.
pub fn serialized_size<T>(value: &T) -> Result<usize>
where
    T: SchemaWrite<Src = T> + ?Sized,
{
    T::size_of(value)
}

/// Serialize `value` into the given writer.
pub fn serialize_into<T, W>(writer: &mut W, value: &T) -> Result<()>
where
    T: SchemaWrite<Src = T> + ?Sized,
    W: Writer + ?Sized,
{
    T::write(writer, value)
}

/// Serialize `value` into a new byte vector.
#[cfg(feature = "alloc")]
pub fn serialize<T>(value: &T) -> Result<alloc::vec::Vec<u8>>
where
    T: SchemaWrite<Src = T> + ?Sized,
{
    let mut bytes = alloc::vec::Vec::with_capacity(T::size_of(value)?);
    T::write(&mut bytes, value)?;
    Ok(bytes)
}

/// Deserialize a `T` from the given bytes.
///
/// Trailing bytes are left unread; use [`deserialize_from`] to keep
/// consuming the same source.
pub fn deserialize<T>(bytes: &[u8]) -> Result<T>
where
    T: SchemaRead<Dst = T>,
{
    let mut reader = bytes;
    T::read(&mut reader)
}

/// Deserialize a `T` from the given reader.
pub fn deserialize_from<T, R>(reader: &mut R) -> Result<T>
where
    T: SchemaRead<Dst = T>,
    R: Reader + ?Sized,
{
    T::read(reader)
}

/// Convenience surface for any [`SchemaWrite`], including schema marker
/// types whose `Src` is a foreign container or struct.
pub trait Serialize: SchemaWrite {
    /// Serialize `src` into a new byte vector.
    #[cfg(feature = "alloc")]
    fn serialize(src: &Self::Src) -> Result<alloc::vec::Vec<u8>> {
        let mut bytes = alloc::vec::Vec::with_capacity(Self::size_of(src)?);
        Self::write(&mut bytes, src)?;
        Ok(bytes)
    }

    /// Serialize `src` into the given writer.
    fn serialize_into<W: Writer + ?Sized>(writer: &mut W, src: &Self::Src) -> Result<()> {
        Self::write(writer, src)
    }

    /// Get the serialized size of `src`.
    fn serialized_size(src: &Self::Src) -> Result<usize> {
        Self::size_of(src)
    }
}

impl<T: SchemaWrite + ?Sized> Serialize for T {}

/// Convenience surface for any [`SchemaRead`], including schema marker
/// types whose `Dst` is a foreign container or struct.
pub trait Deserialize: SchemaRead {
    /// Deserialize a `Self::Dst` from the given bytes.
    fn deserialize(bytes: &[u8]) -> Result<Self::Dst> {
        let mut reader = bytes;
        Self::read(&mut reader)
    }

    /// Deserialize a `Self::Dst` from the given reader.
    fn deserialize_from<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        Self::read(reader)
    }
}

impl<T: SchemaRead + ?Sized> Deserialize for T {}
