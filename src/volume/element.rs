//! This module defines the data element API, which maps each supported
//! NIfTI voxel type to a Rust primitive and knows how to decode one
//! element from raw bytes.
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use byteordered::Endianness;
use num_traits::cast::AsPrimitive;

use crate::typedef::NiftiType;

/// Trait type for characterizing a NIfTI data element, implemented for
/// primitive numeric types which are used by the crate to represent voxel
/// values.
pub trait DataElement: 'static + Sized + Copy + AsPrimitive<f64> {
    /// The `datatype` mapped to the type T
    const DATA_TYPE: NiftiType;

    /// Decode a single element from the start of `bytes`, which must hold
    /// at least `DATA_TYPE.size_of()` bytes.
    fn from_bytes<B: ByteOrder>(bytes: &[u8]) -> Self;
}

impl DataElement for u8 {
    const DATA_TYPE: NiftiType = NiftiType::Uint8;
    fn from_bytes<B: ByteOrder>(bytes: &[u8]) -> Self {
        bytes[0]
    }
}
impl DataElement for i8 {
    const DATA_TYPE: NiftiType = NiftiType::Int8;
    fn from_bytes<B: ByteOrder>(bytes: &[u8]) -> Self {
        bytes[0] as i8
    }
}
impl DataElement for u16 {
    const DATA_TYPE: NiftiType = NiftiType::Uint16;
    fn from_bytes<B: ByteOrder>(bytes: &[u8]) -> Self {
        B::read_u16(bytes)
    }
}
impl DataElement for i16 {
    const DATA_TYPE: NiftiType = NiftiType::Int16;
    fn from_bytes<B: ByteOrder>(bytes: &[u8]) -> Self {
        B::read_i16(bytes)
    }
}
impl DataElement for u32 {
    const DATA_TYPE: NiftiType = NiftiType::Uint32;
    fn from_bytes<B: ByteOrder>(bytes: &[u8]) -> Self {
        B::read_u32(bytes)
    }
}
impl DataElement for i32 {
    const DATA_TYPE: NiftiType = NiftiType::Int32;
    fn from_bytes<B: ByteOrder>(bytes: &[u8]) -> Self {
        B::read_i32(bytes)
    }
}
impl DataElement for f32 {
    const DATA_TYPE: NiftiType = NiftiType::Float32;
    fn from_bytes<B: ByteOrder>(bytes: &[u8]) -> Self {
        B::read_f32(bytes)
    }
}
impl DataElement for f64 {
    const DATA_TYPE: NiftiType = NiftiType::Float64;
    fn from_bytes<B: ByteOrder>(bytes: &[u8]) -> Self {
        B::read_f64(bytes)
    }
}

/// Function decoding one voxel (already positioned) into a `f64`.
pub type ElementReader = fn(&[u8]) -> f64;

fn read_as_f64<T: DataElement, B: ByteOrder>(bytes: &[u8]) -> f64 {
    T::from_bytes::<B>(bytes).as_()
}

fn reader_with_order<B: ByteOrder + 'static>(datatype: NiftiType) -> ElementReader {
    debug_assert_eq!(element_size(datatype), datatype.size_of());
    match datatype {
        NiftiType::Uint8 => read_as_f64::<u8, B>,
        NiftiType::Int8 => read_as_f64::<i8, B>,
        NiftiType::Uint16 => read_as_f64::<u16, B>,
        NiftiType::Int16 => read_as_f64::<i16, B>,
        NiftiType::Uint32 => read_as_f64::<u32, B>,
        NiftiType::Int32 => read_as_f64::<i32, B>,
        NiftiType::Float32 => read_as_f64::<f32, B>,
        NiftiType::Float64 => read_as_f64::<f64, B>,
    }
}

/// Size in bytes of the Rust type `datatype` decodes into.
fn element_size(datatype: NiftiType) -> usize {
    fn size<T: DataElement>(datatype: NiftiType) -> usize {
        debug_assert_eq!(T::DATA_TYPE, datatype);
        std::mem::size_of::<T>()
    }
    match datatype {
        NiftiType::Uint8 => size::<u8>(datatype),
        NiftiType::Int8 => size::<i8>(datatype),
        NiftiType::Uint16 => size::<u16>(datatype),
        NiftiType::Int16 => size::<i16>(datatype),
        NiftiType::Uint32 => size::<u32>(datatype),
        NiftiType::Int32 => size::<i32>(datatype),
        NiftiType::Float32 => size::<f32>(datatype),
        NiftiType::Float64 => size::<f64>(datatype),
    }
}

/// Resolve, once, the decoding function for a data type and byte order.
pub fn element_reader(datatype: NiftiType, endianness: Endianness) -> ElementReader {
    match endianness {
        Endianness::Little => reader_with_order::<LittleEndian>(datatype),
        Endianness::Big => reader_with_order::<BigEndian>(datatype),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_types_match() {
        assert_eq!(<u8 as DataElement>::DATA_TYPE, NiftiType::Uint8);
        assert_eq!(<i16 as DataElement>::DATA_TYPE, NiftiType::Int16);
        assert_eq!(<f64 as DataElement>::DATA_TYPE, NiftiType::Float64);
    }

    #[test]
    fn element_sizes_agree_with_codes() {
        for datatype in [
            NiftiType::Uint8,
            NiftiType::Int8,
            NiftiType::Uint16,
            NiftiType::Int16,
            NiftiType::Uint32,
            NiftiType::Int32,
            NiftiType::Float32,
            NiftiType::Float64,
        ]
        .iter()
        .copied()
        {
            assert_eq!(element_size(datatype), datatype.size_of());
        }
    }

    #[test]
    fn readers_respect_byte_order() {
        let bytes = [0xff, 0xfe, 0x00, 0x00];
        let le = element_reader(NiftiType::Int16, Endianness::Little);
        let be = element_reader(NiftiType::Int16, Endianness::Big);
        assert_eq!(le(&bytes), -257.);
        assert_eq!(be(&bytes), -2.);

        let u = element_reader(NiftiType::Uint16, Endianness::Little);
        assert_eq!(u(&bytes), 65279.);

        let i8r = element_reader(NiftiType::Int8, Endianness::Big);
        assert_eq!(i8r(&bytes), -1.);
    }

    #[test]
    fn readers_32_bit_integers() {
        let le = element_reader(NiftiType::Int32, Endianness::Little);
        let be = element_reader(NiftiType::Int32, Endianness::Big);
        assert_eq!(le(&(-7i32).to_le_bytes()), -7.);
        assert_eq!(be(&(-7i32).to_be_bytes()), -7.);
        assert_eq!(le(&70000i32.to_le_bytes()), 70000.);
        assert_eq!(be(&70000i32.to_be_bytes()), 70000.);

        let le = element_reader(NiftiType::Uint32, Endianness::Little);
        let be = element_reader(NiftiType::Uint32, Endianness::Big);
        assert_eq!(le(&4_000_000_000u32.to_le_bytes()), 4_000_000_000.);
        assert_eq!(be(&4_000_000_000u32.to_be_bytes()), 4_000_000_000.);
        // same bytes, other order
        assert_eq!(be(&1u32.to_le_bytes()), 16_777_216.);
    }

    #[test]
    fn float_readers() {
        let bytes = 1.5f32.to_be_bytes();
        assert_eq!(element_reader(NiftiType::Float32, Endianness::Big)(&bytes), 1.5);
        let bytes = (-2.25f64).to_le_bytes();
        assert_eq!(element_reader(NiftiType::Float64, Endianness::Little)(&bytes), -2.25);
    }
}
