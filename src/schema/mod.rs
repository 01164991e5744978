//! Schema traits.
//!
//! A schema classifies, at build time, how a value's shape maps onto the
//! wire: trivial values transcribe as their raw native bytes, sequences
//! recurse through their elements behind a count prefix, and user types
//! supply their own codec pair (usually via [`compound!`](crate::compound)).
//! A type with no viable schema simply has no implementation of these
//! traits, and is rejected by the compiler before any runtime cost is paid.
//!
//! # Example
//!
//! ```
//! use spancode::{compound, containers::{self, Pod}, Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq)]
//! struct Telemetry {
//!     samples: Vec<f64>,
//!     tag: [u8; 4],
//! }
//!
//! compound! {
//!     Telemetry {
//!         samples: containers::Vec<Pod<f64>>,
//!         tag: Pod<[u8; 4]>,
//!     }
//! }
//!
//! let before = Telemetry { samples: vec![1.5, -2.25], tag: *b"grid" };
//! let bytes = Telemetry::serialize(&before).unwrap();
//! let after = Telemetry::deserialize(&bytes).unwrap();
//! assert_eq!(before, after);
//! ```
use crate::{
    error::Result,
    io::{Reader, Writer},
};
#[cfg(feature = "alloc")]
use crate::{error::Error, len::SeqLen};

pub mod containers;
mod impls;

/// Types that can be written (serialized) to a byte sink.
pub trait SchemaWrite {
    type Src: ?Sized;
    /// Get the serialized size of `Self::Src`.
    fn size_of(src: &Self::Src) -> Result<usize>;
    /// Write `Self::Src` to `writer`.
    fn write<W: Writer + ?Sized>(writer: &mut W, src: &Self::Src) -> Result<()>;
}

/// Types that can be read (deserialized) from a byte source.
pub trait SchemaRead {
    type Dst;
    /// Read a `Self::Dst` from `reader`.
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst>;
}

#[cfg(feature = "alloc")]
#[inline(always)]
fn size_of_elem_iter<'a, T, Len>(value: impl ExactSizeIterator<Item = &'a T::Src>) -> Result<usize>
where
    Len: SeqLen,
    T: SchemaWrite + 'a,
    T::Src: 'a,
{
    Ok(Len::bytes_needed(value.len())?
        + value
            .map(T::size_of)
            .try_fold(0, |acc, x| Ok::<_, Error>(acc + x?))?)
}

#[cfg(feature = "alloc")]
#[inline(always)]
fn write_elem_iter<'a, T, Len, W>(
    writer: &mut W,
    src: impl ExactSizeIterator<Item = &'a T::Src>,
) -> Result<()>
where
    Len: SeqLen,
    T: SchemaWrite + 'a,
    T::Src: 'a,
    W: Writer + ?Sized,
{
    Len::write_len(writer, src.len())?;
    for item in src {
        T::write(writer, item)?;
    }
    Ok(())
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use {
        crate::{
            compound,
            containers::{self, Elem, Pod},
            deserialize, serialize, serialized_size, Deserialize, Error, Serialize,
        },
        proptest::prelude::*,
        std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    };

    #[derive(Debug, PartialEq, Eq, Clone)]
    struct SomeStruct {
        a: u64,
        b: u64,
    }

    compound! {
        SomeStruct {
            a: u64,
            b: u64,
        }
    }

    fn strat_some_struct() -> impl Strategy<Value = SomeStruct> {
        (0..=u64::MAX, 0..=u64::MAX).prop_map(|(a, b)| SomeStruct { a, b })
    }

    proptest! {
        #[test]
        fn test_integers(
            val in (
                any::<u8>(),
                any::<i8>(),
                any::<u16>(),
                any::<i16>(),
                any::<u32>(),
                any::<i32>(),
                any::<usize>(),
                any::<isize>(),
                any::<u64>(),
                any::<i64>(),
                any::<u128>(),
                any::<i128>()
            )
        ) {
            type Target = (u8, i8, u16, i16, u32, i32, usize, isize, u64, i64, u128, i128);
            let bytes = serialize(&val).unwrap();
            prop_assert_eq!(bytes.len(), serialized_size(&val).unwrap());
            let back: Target = deserialize(&bytes).unwrap();
            prop_assert_eq!(val, back);
        }

        #[test]
        fn test_floats_bit_identical(bits in (any::<u32>(), any::<u64>())) {
            // Compare bit patterns so NaN payloads are covered too.
            let val = (f32::from_bits(bits.0), f64::from_bits(bits.1));
            let bytes = serialize(&val).unwrap();
            let back: (f32, f64) = deserialize(&bytes).unwrap();
            prop_assert_eq!(back.0.to_bits(), bits.0);
            prop_assert_eq!(back.1.to_bits(), bits.1);
        }

        #[test]
        fn test_vec_elem(vec in proptest::collection::vec(strat_some_struct(), 0..=100)) {
            type Target = containers::Vec<Elem<SomeStruct>>;
            let bytes = Target::serialize(&vec).unwrap();
            prop_assert_eq!(bytes.len(), Target::serialized_size(&vec).unwrap());
            let back = Target::deserialize(&bytes).unwrap();
            prop_assert_eq!(vec, back);
        }

        #[test]
        fn test_vec_pod(vec in proptest::collection::vec(any::<[u8; 32]>(), 0..=100)) {
            type Target = containers::Vec<Pod<[u8; 32]>>;
            let bytes = Target::serialize(&vec).unwrap();
            let back = Target::deserialize(&bytes).unwrap();
            prop_assert_eq!(vec, back);
        }

        #[test]
        fn test_pod_and_elem_paths_agree(vec in proptest::collection::vec(any::<u64>(), 0..=100)) {
            // The bulk path and the per-element path must be byte-compatible
            // for the same container kind.
            type Bulk = containers::Vec<Pod<u64>>;
            type PerElem = containers::Vec<Elem<u64>>;
            let bulk_bytes = Bulk::serialize(&vec).unwrap();
            let elem_bytes = PerElem::serialize(&vec).unwrap();
            prop_assert_eq!(&bulk_bytes, &elem_bytes);

            let via_elem = PerElem::deserialize(&bulk_bytes).unwrap();
            let via_bulk = Bulk::deserialize(&elem_bytes).unwrap();
            prop_assert_eq!(&vec, &via_elem);
            prop_assert_eq!(&vec, &via_bulk);
        }

        #[test]
        fn test_vec_deque(deque in proptest::collection::vec_deque(any::<u64>(), 0..=100)) {
            let bytes = serialize(&deque).unwrap();
            let back: VecDeque<u64> = deserialize(&bytes).unwrap();
            prop_assert_eq!(deque, back);
        }

        #[test]
        fn test_array(array in any::<[u16; 8]>()) {
            // Fixed arity: no count prefix on the wire.
            let bytes = serialize(&array).unwrap();
            prop_assert_eq!(bytes.len(), 8 * size_of::<u16>());
            let back: [u16; 8] = deserialize(&bytes).unwrap();
            prop_assert_eq!(array, back);
        }

        #[test]
        fn test_option(option in proptest::option::of(strat_some_struct())) {
            let bytes = serialize(&option).unwrap();
            let back: Option<SomeStruct> = deserialize(&bytes).unwrap();
            prop_assert_eq!(option, back);
        }

        #[test]
        fn test_string(s in any::<String>()) {
            let bytes = serialize(&s).unwrap();
            let back: String = deserialize(&bytes).unwrap();
            prop_assert_eq!(s, back);
        }

        #[test]
        fn test_bool(val in any::<bool>()) {
            let bytes = serialize(&val).unwrap();
            prop_assert_eq!(bytes.len(), 1);
            let back: bool = deserialize(&bytes).unwrap();
            prop_assert_eq!(val, back);
        }

        #[test]
        fn test_bool_invalid_bit_pattern(val in 2u8..=255) {
            let res: crate::Result<bool> = deserialize(&[val]);
            prop_assert!(matches!(res, Err(Error::InvalidBoolEncoding(b)) if b == val));
        }

        #[test]
        fn test_char(c in any::<char>()) {
            let bytes = serialize(&c).unwrap();
            let back: char = deserialize(&bytes).unwrap();
            prop_assert_eq!(c, back);
        }

        #[test]
        fn test_btree_set(set in proptest::collection::btree_set(any::<i64>(), 0..=64)) {
            let bytes = serialize(&set).unwrap();
            let back: BTreeSet<i64> = deserialize(&bytes).unwrap();
            prop_assert_eq!(set, back);
        }

        #[test]
        fn test_hash_set(set in proptest::collection::hash_set(any::<u32>(), 0..=64)) {
            let bytes = serialize(&set).unwrap();
            let back: HashSet<u32> = deserialize(&bytes).unwrap();
            prop_assert_eq!(set, back);
        }

        #[test]
        fn test_btree_map(map in proptest::collection::btree_map(any::<u32>(), any::<String>(), 0..=64)) {
            let bytes = serialize(&map).unwrap();
            let back: BTreeMap<u32, String> = deserialize(&bytes).unwrap();
            prop_assert_eq!(map, back);
        }

        #[test]
        fn test_hash_map(map in proptest::collection::hash_map(any::<u64>(), any::<u64>(), 0..=64)) {
            let bytes = serialize(&map).unwrap();
            let back: HashMap<u64, u64> = deserialize(&bytes).unwrap();
            prop_assert_eq!(map, back);
        }

        #[test]
        fn test_nested_containers(vec in proptest::collection::vec(
            proptest::collection::vec(any::<String>(), 0..=8), 0..=8,
        )) {
            let bytes = serialize(&vec).unwrap();
            let back: Vec<Vec<String>> = deserialize(&bytes).unwrap();
            prop_assert_eq!(vec, back);
        }

        #[test]
        fn test_compound(val in strat_some_struct()) {
            let bytes = SomeStruct::serialize(&val).unwrap();
            prop_assert_eq!(bytes.len(), 16);
            let back = SomeStruct::deserialize(&bytes).unwrap();
            prop_assert_eq!(val, back);
        }
    }

    #[test]
    fn empty_containers_are_one_count_prefix() {
        let empty: Vec<u64> = Vec::new();
        assert_eq!(serialize(&empty).unwrap().len(), size_of::<usize>());
        assert_eq!(serialize(&String::new()).unwrap().len(), size_of::<usize>());
        assert_eq!(
            serialize(&BTreeSet::<i64>::new()).unwrap().len(),
            size_of::<usize>()
        );

        let back: Vec<u64> = deserialize(&serialize(&empty).unwrap()).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn truncated_input_underflows() {
        let bytes = serialize(&0xDEADBEEFu32).unwrap();
        let res: crate::Result<u32> = deserialize(&bytes[..3]);
        assert!(matches!(res, Err(Error::BufferUnderflow(4))));
    }

    #[test]
    fn container_decode_aborts_on_element_failure() {
        // Three bools, the middle one with an invalid encoding.
        let mut bytes = Vec::new();
        crate::serialize_into(&mut bytes, &vec![true, false, true]).unwrap();
        bytes[size_of::<usize>() + 1] = 7;
        let res: crate::Result<Vec<bool>> = deserialize(&bytes);
        assert!(matches!(res, Err(Error::InvalidBoolEncoding(7))));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut bytes = Vec::new();
        crate::serialize_into(&mut bytes, &String::from("hi")).unwrap();
        bytes[size_of::<usize>()] = 0xFF;
        let res: crate::Result<String> = deserialize(&bytes);
        assert!(matches!(res, Err(Error::InvalidUtf8Encoding(_))));
    }

    #[test]
    fn foreign_type_schema() {
        // Imagine this struct is defined outside our crate.
        #[derive(Debug, PartialEq, Eq)]
        struct ForeignStruct {
            data: Vec<u8>,
            address: [u8; 32],
        }

        compound! {
            struct ForeignSchema => ForeignStruct {
                data: containers::Vec<Pod<u8>>,
                address: Pod<[u8; 32]>,
            }
        }

        let val = ForeignStruct {
            data: vec![1, 2, 3],
            address: [7; 32],
        };
        let bytes = ForeignSchema::serialize(&val).unwrap();
        let back = ForeignSchema::deserialize(&bytes).unwrap();
        assert_eq!(val, back);
    }
}
