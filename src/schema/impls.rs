//! Blanket implementations for std types.
//!
//! Because the blanket implementations must be entirely general (e.g., we
//! need to support `Vec<T>` for any `T`), we can't make any assumptions
//! about the bulk-copyable nature of `T`, so all sequences here treat
//! constituent elements as opaque and recurse per element. Users can opt
//! into [`containers::Vec<Pod<T>>`](crate::containers::Vec) for the
//! single-pass bulk path, but the optimization is per container.
//!
//! Additionally, all sequences here assume the default [`NativeLen`] count
//! encoding, because there is no way to specify a different one without
//! one of the [`containers`](crate::containers) schema types.
#[cfg(feature = "alloc")]
use {
    crate::containers::{self, Elem},
    alloc::{
        boxed::Box,
        collections::{BTreeMap, BTreeSet, VecDeque},
        string::String,
        vec::Vec,
    },
};
#[cfg(feature = "std")]
use {
    core::hash::{BuildHasher, Hash},
    std::collections::{HashMap, HashSet},
};
use {
    crate::{
        error::{invalid_bool_encoding, invalid_char_encoding, Error, Result},
        io::{Reader, Writer},
        len::{NativeLen, SeqLen},
        schema::{SchemaRead, SchemaWrite},
    },
    core::mem::MaybeUninit,
};
#[cfg(feature = "alloc")]
use crate::{error::invalid_utf8_encoding, schema::{size_of_elem_iter, write_elem_iter}};

macro_rules! impl_trivial {
    ($($type:ty),+ $(,)?) => {$(
        impl SchemaWrite for $type {
            type Src = $type;

            #[inline(always)]
            fn size_of(_src: &Self::Src) -> Result<usize> {
                Ok(size_of::<$type>())
            }

            #[inline(always)]
            fn write<W: Writer + ?Sized>(writer: &mut W, src: &Self::Src) -> Result<()> {
                // Raw native representation; no endianness normalization.
                writer.write(&src.to_ne_bytes())
            }
        }

        impl SchemaRead for $type {
            type Dst = $type;

            #[inline(always)]
            fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
                Ok(<$type>::from_ne_bytes(reader.read_array()?))
            }
        }
    )+};
}

impl_trivial!(u8, i8, u16, i16, u32, i32, u64, i64, u128, i128, usize, isize, f32, f64);

impl SchemaWrite for () {
    type Src = ();

    #[inline(always)]
    fn size_of(_src: &Self::Src) -> Result<usize> {
        Ok(0)
    }

    #[inline(always)]
    fn write<W: Writer + ?Sized>(_writer: &mut W, _src: &Self::Src) -> Result<()> {
        Ok(())
    }
}

impl SchemaRead for () {
    type Dst = ();

    #[inline(always)]
    fn read<R: Reader + ?Sized>(_reader: &mut R) -> Result<Self::Dst> {
        Ok(())
    }
}

impl SchemaWrite for bool {
    type Src = bool;

    #[inline]
    fn size_of(_src: &Self::Src) -> Result<usize> {
        Ok(size_of::<u8>())
    }

    #[inline]
    fn write<W: Writer + ?Sized>(writer: &mut W, src: &Self::Src) -> Result<()> {
        u8::write(writer, &(*src as u8))
    }
}

impl SchemaRead for bool {
    type Dst = bool;

    #[inline]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        match reader.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(invalid_bool_encoding(byte)),
        }
    }
}

impl SchemaWrite for char {
    type Src = char;

    #[inline]
    fn size_of(_src: &Self::Src) -> Result<usize> {
        Ok(size_of::<u32>())
    }

    #[inline]
    fn write<W: Writer + ?Sized>(writer: &mut W, src: &Self::Src) -> Result<()> {
        u32::write(writer, &(*src as u32))
    }
}

impl SchemaRead for char {
    type Dst = char;

    #[inline]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        let val = u32::read(reader)?;
        char::from_u32(val).ok_or(invalid_char_encoding(val))
    }
}

impl<T, const N: usize> SchemaWrite for [T; N]
where
    T: SchemaWrite,
    T::Src: Sized,
{
    type Src = [T::Src; N];

    #[inline]
    fn size_of(value: &Self::Src) -> Result<usize> {
        value
            .iter()
            .map(T::size_of)
            .try_fold(0, |acc, x| Ok::<_, Error>(acc + x?))
    }

    /// The arity is part of the type; no count prefix is written.
    #[inline]
    fn write<W: Writer + ?Sized>(writer: &mut W, value: &Self::Src) -> Result<()> {
        for item in value {
            T::write(writer, item)?;
        }
        Ok(())
    }
}

impl<T, const N: usize> SchemaRead for [T; N]
where
    T: SchemaRead,
{
    type Dst = [T::Dst; N];

    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        // SAFETY: an array of `MaybeUninit` needs no initialization.
        let mut slots: [MaybeUninit<T::Dst>; N] = unsafe { MaybeUninit::uninit().assume_init() };
        for i in 0..N {
            match T::read(reader) {
                Ok(value) => {
                    slots[i].write(value);
                }
                Err(e) => {
                    for slot in &mut slots[..i] {
                        // SAFETY: the first `i` slots were initialized above.
                        unsafe { slot.assume_init_drop() };
                    }
                    return Err(e);
                }
            }
        }
        // SAFETY: every slot was initialized in the loop.
        Ok(slots.map(|slot| unsafe { slot.assume_init() }))
    }
}

impl<T> SchemaWrite for Option<T>
where
    T: SchemaWrite,
    T::Src: Sized,
{
    type Src = Option<T::Src>;

    #[inline]
    fn size_of(src: &Self::Src) -> Result<usize> {
        match src {
            Some(value) => Ok(1 + T::size_of(value)?),
            None => Ok(1),
        }
    }

    #[inline]
    fn write<W: Writer + ?Sized>(writer: &mut W, value: &Self::Src) -> Result<()> {
        match value {
            Some(value) => {
                u8::write(writer, &1)?;
                T::write(writer, value)
            }
            None => u8::write(writer, &0),
        }
    }
}

impl<T> SchemaRead for Option<T>
where
    T: SchemaRead,
{
    type Dst = Option<T::Dst>;

    #[inline]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        // The presence tag is a bool on the wire.
        match reader.read_byte()? {
            0 => Ok(None),
            1 => Ok(Some(T::read(reader)?)),
            byte => Err(invalid_bool_encoding(byte)),
        }
    }
}

impl<'a, T> SchemaWrite for &'a T
where
    T: SchemaWrite + ?Sized,
{
    type Src = &'a T::Src;

    #[inline]
    fn size_of(src: &Self::Src) -> Result<usize> {
        T::size_of(src)
    }

    #[inline]
    fn write<W: Writer + ?Sized>(writer: &mut W, value: &Self::Src) -> Result<()> {
        T::write(writer, value)
    }
}

#[cfg(feature = "alloc")]
impl<T> SchemaWrite for Box<T>
where
    T: SchemaWrite,
{
    type Src = Box<T::Src>;

    #[inline]
    fn size_of(src: &Self::Src) -> Result<usize> {
        T::size_of(src)
    }

    #[inline]
    fn write<W: Writer + ?Sized>(writer: &mut W, value: &Self::Src) -> Result<()> {
        T::write(writer, value)
    }
}

#[cfg(feature = "alloc")]
impl<T> SchemaRead for Box<T>
where
    T: SchemaRead,
{
    type Dst = Box<T::Dst>;

    #[inline]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        Ok(Box::new(T::read(reader)?))
    }
}

#[cfg(feature = "alloc")]
impl<T> SchemaWrite for Vec<T>
where
    T: SchemaWrite,
    T::Src: Sized,
{
    type Src = Vec<T::Src>;

    #[inline]
    fn size_of(value: &Self::Src) -> Result<usize> {
        <containers::Vec<Elem<T>, NativeLen>>::size_of(value)
    }

    #[inline]
    fn write<W: Writer + ?Sized>(writer: &mut W, value: &Self::Src) -> Result<()> {
        <containers::Vec<Elem<T>, NativeLen>>::write(writer, value)
    }
}

#[cfg(feature = "alloc")]
impl<T> SchemaRead for Vec<T>
where
    T: SchemaRead,
{
    type Dst = Vec<T::Dst>;

    #[inline]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        <containers::Vec<Elem<T>, NativeLen>>::read(reader)
    }
}

#[cfg(feature = "alloc")]
impl<T> SchemaWrite for VecDeque<T>
where
    T: SchemaWrite,
    T::Src: Sized,
{
    type Src = VecDeque<T::Src>;

    #[inline]
    fn size_of(value: &Self::Src) -> Result<usize> {
        <containers::VecDeque<Elem<T>, NativeLen>>::size_of(value)
    }

    #[inline]
    fn write<W: Writer + ?Sized>(writer: &mut W, value: &Self::Src) -> Result<()> {
        <containers::VecDeque<Elem<T>, NativeLen>>::write(writer, value)
    }
}

#[cfg(feature = "alloc")]
impl<T> SchemaRead for VecDeque<T>
where
    T: SchemaRead,
{
    type Dst = VecDeque<T::Dst>;

    #[inline]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        <containers::VecDeque<Elem<T>, NativeLen>>::read(reader)
    }
}

#[cfg(feature = "alloc")]
impl<T> SchemaWrite for Box<[T]>
where
    T: SchemaWrite,
    T::Src: Sized,
{
    type Src = Box<[T::Src]>;

    #[inline]
    fn size_of(src: &Self::Src) -> Result<usize> {
        <containers::BoxedSlice<Elem<T>, NativeLen>>::size_of(src)
    }

    #[inline]
    fn write<W: Writer + ?Sized>(writer: &mut W, value: &Self::Src) -> Result<()> {
        <containers::BoxedSlice<Elem<T>, NativeLen>>::write(writer, value)
    }
}

#[cfg(feature = "alloc")]
impl<T> SchemaRead for Box<[T]>
where
    T: SchemaRead,
{
    type Dst = Box<[T::Dst]>;

    #[inline]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        <containers::BoxedSlice<Elem<T>, NativeLen>>::read(reader)
    }
}

impl SchemaWrite for str {
    type Src = str;

    #[inline]
    fn size_of(src: &Self::Src) -> Result<usize> {
        Ok(<NativeLen>::bytes_needed(src.len())? + src.len())
    }

    #[inline]
    fn write<W: Writer + ?Sized>(writer: &mut W, src: &Self::Src) -> Result<()> {
        <NativeLen>::write_len(writer, src.len())?;
        writer.write(src.as_bytes())
    }
}

#[cfg(feature = "alloc")]
impl SchemaWrite for String {
    type Src = String;

    #[inline]
    fn size_of(src: &Self::Src) -> Result<usize> {
        <str as SchemaWrite>::size_of(src)
    }

    #[inline]
    fn write<W: Writer + ?Sized>(writer: &mut W, value: &Self::Src) -> Result<()> {
        <str as SchemaWrite>::write(writer, value)
    }
}

#[cfg(feature = "alloc")]
impl SchemaRead for String {
    type Dst = String;

    #[inline]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        let len = <NativeLen>::read_len_checked::<u8, _>(reader)?;
        let mut bytes = alloc::vec![0u8; len];
        reader.read_exact(&mut bytes)?;
        String::from_utf8(bytes).map_err(|e| invalid_utf8_encoding(e.utf8_error()))
    }
}

#[cfg(feature = "alloc")]
impl<T> SchemaWrite for BTreeSet<T>
where
    T: SchemaWrite,
    T::Src: Sized,
{
    type Src = BTreeSet<T::Src>;

    #[inline]
    fn size_of(src: &Self::Src) -> Result<usize> {
        size_of_elem_iter::<T, NativeLen>(src.iter())
    }

    #[inline]
    fn write<W: Writer + ?Sized>(writer: &mut W, src: &Self::Src) -> Result<()> {
        write_elem_iter::<T, NativeLen, W>(writer, src.iter())
    }
}

#[cfg(feature = "alloc")]
impl<T> SchemaRead for BTreeSet<T>
where
    T: SchemaRead,
    T::Dst: Ord,
{
    type Dst = BTreeSet<T::Dst>;

    /// Each decoded element is inserted at its natural sorted position.
    #[inline]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        let len = <NativeLen>::read_len_checked::<T::Dst, _>(reader)?;
        let mut set = BTreeSet::new();
        for _ in 0..len {
            set.insert(T::read(reader)?);
        }
        Ok(set)
    }
}

#[cfg(feature = "alloc")]
impl<K, V> SchemaWrite for BTreeMap<K, V>
where
    K: SchemaWrite,
    K::Src: Sized,
    V: SchemaWrite,
    V::Src: Sized,
{
    type Src = BTreeMap<K::Src, V::Src>;

    #[inline]
    fn size_of(src: &Self::Src) -> Result<usize> {
        let mut total = <NativeLen>::bytes_needed(src.len())?;
        for (key, value) in src {
            total += K::size_of(key)? + V::size_of(value)?;
        }
        Ok(total)
    }

    #[inline]
    fn write<W: Writer + ?Sized>(writer: &mut W, src: &Self::Src) -> Result<()> {
        <NativeLen>::write_len(writer, src.len())?;
        for (key, value) in src {
            K::write(writer, key)?;
            V::write(writer, value)?;
        }
        Ok(())
    }
}

#[cfg(feature = "alloc")]
impl<K, V> SchemaRead for BTreeMap<K, V>
where
    K: SchemaRead,
    K::Dst: Ord,
    V: SchemaRead,
{
    type Dst = BTreeMap<K::Dst, V::Dst>;

    #[inline]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        let len = <NativeLen>::read_len_checked::<(K::Dst, V::Dst), _>(reader)?;
        let mut map = BTreeMap::new();
        for _ in 0..len {
            let key = K::read(reader)?;
            let value = V::read(reader)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "std")]
impl<T, S> SchemaWrite for HashSet<T, S>
where
    T: SchemaWrite,
    T::Src: Sized,
    S: BuildHasher,
{
    type Src = HashSet<T::Src, S>;

    #[inline]
    fn size_of(src: &Self::Src) -> Result<usize> {
        size_of_elem_iter::<T, NativeLen>(src.iter())
    }

    #[inline]
    fn write<W: Writer + ?Sized>(writer: &mut W, src: &Self::Src) -> Result<()> {
        write_elem_iter::<T, NativeLen, W>(writer, src.iter())
    }
}

#[cfg(feature = "std")]
impl<T, S> SchemaRead for HashSet<T, S>
where
    T: SchemaRead,
    T::Dst: Eq + Hash,
    S: BuildHasher + Default,
{
    type Dst = HashSet<T::Dst, S>;

    #[inline]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        let len = <NativeLen>::read_len_checked::<T::Dst, _>(reader)?;
        let mut set = HashSet::with_capacity_and_hasher(len, S::default());
        for _ in 0..len {
            set.insert(T::read(reader)?);
        }
        Ok(set)
    }
}

#[cfg(feature = "std")]
impl<K, V, S> SchemaWrite for HashMap<K, V, S>
where
    K: SchemaWrite,
    K::Src: Sized,
    V: SchemaWrite,
    V::Src: Sized,
    S: BuildHasher,
{
    type Src = HashMap<K::Src, V::Src, S>;

    #[inline]
    fn size_of(src: &Self::Src) -> Result<usize> {
        let mut total = <NativeLen>::bytes_needed(src.len())?;
        for (key, value) in src {
            total += K::size_of(key)? + V::size_of(value)?;
        }
        Ok(total)
    }

    #[inline]
    fn write<W: Writer + ?Sized>(writer: &mut W, src: &Self::Src) -> Result<()> {
        <NativeLen>::write_len(writer, src.len())?;
        for (key, value) in src {
            K::write(writer, key)?;
            V::write(writer, value)?;
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl<K, V, S> SchemaRead for HashMap<K, V, S>
where
    K: SchemaRead,
    K::Dst: Eq + Hash,
    V: SchemaRead,
    S: BuildHasher + Default,
{
    type Dst = HashMap<K::Dst, V::Dst, S>;

    #[inline]
    fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
        let len = <NativeLen>::read_len_checked::<(K::Dst, V::Dst), _>(reader)?;
        let mut map = HashMap::with_capacity_and_hasher(len, S::default());
        for _ in 0..len {
            let key = K::read(reader)?;
            let value = V::read(reader)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

/// Implement [`SchemaWrite`] and [`SchemaRead`] for a struct by specifying
/// its constituent field schemas. Fields are transcribed in declaration
/// order with no framing, exactly like a [`Layout`](crate::Layout) over the
/// same schemas, so user types compose transparently at any nesting depth.
///
/// # Examples
///
/// ```
/// use spancode::compound;
///
/// struct Point {
///     x: u64,
///     y: u64,
/// }
///
/// compound! {
///     Point {
///         x: u64,
///         y: u64,
///     }
/// }
///
/// struct Segment {
///     from: Point,
///     to: Point,
/// }
///
/// compound! {
///     Segment {
///         from: Point,
///         to: Point,
///     }
/// }
/// ```
///
/// This macro also supports declaring a standalone schema marker that maps
/// to a target type. This is useful when the target type is foreign
/// (defined outside the crate); its fields must be visible to the caller.
///
/// ```
/// use spancode::{compound, containers::Pod, Deserialize, Serialize};
///
/// // Imagine this struct is defined outside our crate.
/// #[derive(Debug, PartialEq, Eq)]
/// struct ForeignStruct {
///     field: [u8; 32],
/// }
///
/// compound! {
///     struct ForeignSchema => ForeignStruct {
///         field: Pod<[u8; 32]>,
///     }
/// }
///
/// let value = ForeignStruct { field: [7; 32] };
/// let bytes = ForeignSchema::serialize(&value).unwrap();
/// assert_eq!(ForeignSchema::deserialize(&bytes).unwrap(), value);
/// ```
#[macro_export]
macro_rules! compound {
    ($vis:vis $src:ident { $($field:ident : $schema:ty),+ $(,)? }) => {
        $crate::compound! { $vis $src => $src { $($field: $schema),+ } }
    };
    ($vis:vis struct $src:ident => $target:ty { $($field:ident : $schema:ty),+ $(,)? }) => {
        $vis struct $src;

        $crate::compound! { $vis $src => $target { $($field: $schema),+ } }
    };
    ($vis:vis $src:ident => $target:ty { $($field:ident : $schema:ty),+ $(,)? }) => {
        impl $crate::SchemaWrite for $src {
            type Src = $target;

            #[inline]
            fn size_of(value: &Self::Src) -> $crate::Result<usize> {
                Ok(0 $(+ <$schema as $crate::SchemaWrite>::size_of(&value.$field)?)+)
            }

            #[inline]
            fn write<W: $crate::io::Writer + ?Sized>(
                writer: &mut W,
                value: &Self::Src,
            ) -> $crate::Result<()> {
                $(<$schema as $crate::SchemaWrite>::write(writer, &value.$field)?;)+
                Ok(())
            }
        }

        impl $crate::SchemaRead for $src {
            type Dst = $target;

            #[inline]
            fn read<R: $crate::io::Reader + ?Sized>(
                reader: &mut R,
            ) -> $crate::Result<Self::Dst> {
                type Target = $target;
                $(let $field = <$schema as $crate::SchemaRead>::read(reader)?;)+
                Ok(Target { $($field),+ })
            }
        }
    };
}

macro_rules! impl_tuple {
    ($($schema:ident: $field:tt),+) => {
        impl<$($schema),+> SchemaWrite for ($($schema,)+)
        where
            $($schema: SchemaWrite,)+
            $($schema::Src: Sized,)+
        {
            type Src = ($($schema::Src,)+);

            #[inline]
            fn size_of(value: &Self::Src) -> Result<usize> {
                Ok(0 $(+ <$schema as SchemaWrite>::size_of(&value.$field)?)+)
            }

            #[inline]
            fn write<W: Writer + ?Sized>(writer: &mut W, value: &Self::Src) -> Result<()> {
                $(<$schema as SchemaWrite>::write(writer, &value.$field)?;)+
                Ok(())
            }
        }

        impl<$($schema),+> SchemaRead for ($($schema,)+)
        where
            $($schema: SchemaRead,)+
        {
            type Dst = ($($schema::Dst,)+);

            #[inline]
            fn read<R: Reader + ?Sized>(reader: &mut R) -> Result<Self::Dst> {
                Ok(($(<$schema as SchemaRead>::read(reader)?,)+))
            }
        }
    };
}

impl_tuple! { A: 0, B: 1 }
impl_tuple! { A: 0, B: 1, C: 2 }
impl_tuple! { A: 0, B: 1, C: 2, D: 3 }
impl_tuple! { A: 0, B: 1, C: 2, D: 3, E: 4 }
impl_tuple! { A: 0, B: 1, C: 2, D: 3, E: 4, F: 5 }
impl_tuple! { A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6 }
impl_tuple! { A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7 }
impl_tuple! { A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8 }
impl_tuple! { A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9 }
impl_tuple! { A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10 }
impl_tuple! { A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10, L: 11 }
impl_tuple! { A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10, L: 11, M: 12 }
impl_tuple! { A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10, L: 11, M: 12, N: 13 }
impl_tuple! { A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10, L: 11, M: 12, N: 13, O: 14 }
impl_tuple! { A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10, L: 11, M: 12, N: 13, O: 14, P: 15 }
