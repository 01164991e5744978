//! Ordered multi-value transactions over a sink.
//!
//! A [`Layout`] groups up to 16 heterogeneous schemas into one ordered
//! read/write call against any [`Writer`]/[`Reader`]. Values are encoded
//! in argument order with no framing between them, so the composite wire
//! format is simply the concatenation of each member's encoding.
//!
//! There is no rollback: `write` stops at the first failing value (later
//! values are never attempted), which can leave the sink holding a partial
//! prefix of the transaction. Callers must treat a failed layout operation
//! as having possibly corrupted the sink's tail: discard the stream, or
//! [`reset`](crate::Serializer::reset) the buffer.
//!
//! # Example
//!
//! ```
//! use spancode::{HeapSerializer, Layout};
//!
//! type Wire = Layout<(Vec<String>, [f32; 4], i64)>;
//!
//! let names = vec!["ann".to_string(), "joseph".to_string()];
//! let heights = [2.0f32, 3.0, 5.0, 7.0];
//! let measurements = 1234i64;
//!
//! let mut buf = HeapSerializer::with_capacity(256);
//! Wire::write(&mut buf, &names, &heights, &measurements).unwrap();
//!
//! let (names2, heights2, measurements2) = Wire::read(&mut buf).unwrap();
//! assert_eq!(names, names2);
//! assert_eq!(heights, heights2);
//! assert_eq!(measurements, measurements2);
//! ```
use {
    crate::{
        error::Result,
        io::{Reader, Writer},
        schema::{SchemaRead, SchemaWrite},
    },
    core::marker::PhantomData,
};

/// An ephemeral, fixed-arity group of heterogeneous schemas, bound for the
/// duration of a single `read`/`write` call.
pub struct Layout<S>(PhantomData<S>);

macro_rules! impl_layout {
    ($($schema:ident: $value:ident),+) => {
        impl<$($schema),+> Layout<($($schema,)+)>
        where
            $($schema: SchemaWrite,)+
        {
            /// Encode each value in argument order, stopping at (and
            /// reporting) the first failure. Later values are never
            /// attempted.
            #[inline]
            pub fn write<W: Writer + ?Sized>(
                sink: &mut W,
                $($value: &$schema::Src,)+
            ) -> Result<()> {
                $(<$schema as SchemaWrite>::write(sink, $value)?;)+
                Ok(())
            }

            /// Summed encoded size of the whole transaction.
            #[inline]
            pub fn size_of($($value: &$schema::Src,)+) -> Result<usize> {
                Ok(0 $(+ <$schema as SchemaWrite>::size_of($value)?)+)
            }
        }

        impl<$($schema),+> Layout<($($schema,)+)>
        where
            $($schema: SchemaRead,)+
        {
            /// Decode each value in declared order, stopping at the first
            /// failure.
            #[inline]
            pub fn read<R: Reader + ?Sized>(source: &mut R) -> Result<($($schema::Dst,)+)> {
                Ok(($(<$schema as SchemaRead>::read(source)?,)+))
            }
        }
    };
}

impl_layout! { A: a }
impl_layout! { A: a, B: b }
impl_layout! { A: a, B: b, C: c }
impl_layout! { A: a, B: b, C: c, D: d }
impl_layout! { A: a, B: b, C: c, D: d, E: e }
impl_layout! { A: a, B: b, C: c, D: d, E: e, F: f }
impl_layout! { A: a, B: b, C: c, D: d, E: e, F: f, G: g }
impl_layout! { A: a, B: b, C: c, D: d, E: e, F: f, G: g, H: h }
impl_layout! { A: a, B: b, C: c, D: d, E: e, F: f, G: g, H: h, I: i }
impl_layout! { A: a, B: b, C: c, D: d, E: e, F: f, G: g, H: h, I: i, J: j }
impl_layout! { A: a, B: b, C: c, D: d, E: e, F: f, G: g, H: h, I: i, J: j, K: k }
impl_layout! { A: a, B: b, C: c, D: d, E: e, F: f, G: g, H: h, I: i, J: j, K: k, L: l }
impl_layout! { A: a, B: b, C: c, D: d, E: e, F: f, G: g, H: h, I: i, J: j, K: k, L: l, M: m }
impl_layout! { A: a, B: b, C: c, D: d, E: e, F: f, G: g, H: h, I: i, J: j, K: k, L: l, M: m, N: n }
impl_layout! { A: a, B: b, C: c, D: d, E: e, F: f, G: g, H: h, I: i, J: j, K: k, L: l, M: m, N: n, O: o }
impl_layout! { A: a, B: b, C: c, D: d, E: e, F: f, G: g, H: h, I: i, J: j, K: k, L: l, M: m, N: n, O: o, P: p }

#[cfg(all(test, feature = "std"))]
mod tests {
    use {
        super::*,
        crate::{
            compound,
            error::{buffer_overflow, Error, Result},
            ArraySerializer, HeapSerializer,
        },
        std::cell::Cell,
    };

    thread_local! {
        /// Counts attempted writes of [`Probe`] values.
        static PROBE_WRITES: Cell<usize> = const { Cell::new(0) };
    }

    /// Schema that counts how many times it is asked to write.
    struct Probe;

    impl SchemaWrite for Probe {
        type Src = u8;

        fn size_of(_src: &Self::Src) -> Result<usize> {
            Ok(1)
        }

        fn write<W: Writer + ?Sized>(writer: &mut W, src: &Self::Src) -> Result<()> {
            PROBE_WRITES.with(|cell| cell.set(cell.get() + 1));
            u8::write(writer, src)
        }
    }

    /// Schema whose writes always fail.
    struct FailsOnWrite;

    impl SchemaWrite for FailsOnWrite {
        type Src = u8;

        fn size_of(_src: &Self::Src) -> Result<usize> {
            Ok(1)
        }

        fn write<W: Writer + ?Sized>(_writer: &mut W, _src: &Self::Src) -> Result<()> {
            Err(buffer_overflow(1))
        }
    }

    #[test]
    fn write_short_circuits_at_first_failure() {
        PROBE_WRITES.with(|cell| cell.set(0));

        let mut sink = Vec::new();
        let result = Layout::<(u32, FailsOnWrite, Probe)>::write(&mut sink, &0xFEEDu32, &2, &3);

        assert!(matches!(result, Err(Error::BufferOverflow(1))));
        // The third value was never attempted.
        assert_eq!(PROBE_WRITES.with(|cell| cell.get()), 0);
        // The sink still holds the first value's bytes; there is no
        // rollback of a partially written transaction.
        assert_eq!(sink, 0xFEEDu32.to_ne_bytes());
    }

    #[test]
    fn read_short_circuits_and_reports_the_failing_value() {
        let mut sink = Vec::new();
        Layout::<(u16, bool)>::write(&mut sink, &7, &true).unwrap();
        sink[2] = 9;

        let result = Layout::<(u16, bool, u64)>::read(&mut sink.as_slice());
        assert!(matches!(result, Err(Error::InvalidBoolEncoding(9))));
    }

    #[test]
    fn delegated_type_composes_inside_an_outer_layout() {
        #[derive(Debug, PartialEq)]
        struct Reading {
            station: u32,
            values: Vec<f64>,
        }

        // The user type's codec is itself a layout over its fields.
        compound! {
            Reading {
                station: u32,
                values: Vec<f64>,
            }
        }

        type Wire = Layout<(i32, Reading, String)>;

        let reading = Reading {
            station: 42,
            values: vec![0.5, 2.75],
        };

        let mut buf = HeapSerializer::with_capacity(256);
        Wire::write(&mut buf, &13, &reading, &"hi".to_string()).unwrap();

        let (n, back, text) = Wire::read(&mut buf).unwrap();
        assert_eq!(n, 13);
        assert_eq!(back, reading);
        assert_eq!(text, "hi");
    }

    #[test]
    fn failed_buffer_write_is_recovered_by_reset() {
        let mut buf = ArraySerializer::<8>::new();
        let result = Layout::<(u32, u64)>::write(&mut buf, &1, &2);
        assert!(matches!(result, Err(Error::BufferOverflow(8))));
        // The partial prefix (the u32) is still pending; the caller
        // decides what to do with it.
        assert_eq!(buf.pending(), 4);
        buf.reset();
        assert_eq!(buf.free(), 8);
    }

    #[test]
    fn buffer_and_stream_sinks_produce_identical_bytes() {
        use {
            crate::io::{IoReader, IoWriter},
            std::io::Cursor,
        };

        type Wire = Layout<(u32, Vec<u16>, String)>;
        let vals = (7u32, vec![1u16, 2, 3], "abc".to_string());

        let mut buf = HeapSerializer::with_capacity(128);
        Wire::write(&mut buf, &vals.0, &vals.1, &vals.2).unwrap();

        let mut stream = IoWriter::new(Cursor::new(Vec::new()));
        Wire::write(&mut stream, &vals.0, &vals.1, &vals.2).unwrap();

        let stream_bytes = stream.into_inner().into_inner();
        assert_eq!(buf.as_pending(), stream_bytes.as_slice());

        // Bytes produced through one sink are consumable through the other.
        let mut source = IoReader::new(Cursor::new(stream_bytes));
        assert_eq!(Wire::read(&mut source).unwrap(), vals);
    }

    #[test]
    fn composite_encoding_is_a_plain_concatenation() {
        let mut composite = Vec::new();
        Layout::<(u16, u32)>::write(&mut composite, &0xAAAA, &0xBBBBBBBB).unwrap();

        let mut separate = Vec::new();
        crate::serialize_into(&mut separate, &0xAAAAu16).unwrap();
        crate::serialize_into(&mut separate, &0xBBBBBBBBu32).unwrap();

        assert_eq!(composite, separate);
        assert_eq!(
            composite.len(),
            Layout::<(u16, u32)>::size_of(&0xAAAA, &0xBBBBBBBB).unwrap()
        );
    }
}
