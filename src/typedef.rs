//! This module contains the voxel data types understood by the viewer.
//! Only the scalar encodings which can be shown as grayscale are
//! listed; any other `datatype` code is read as `Uint8`.

use num_traits::FromPrimitive;

/// Data type for representing a NIFTI value type in a volume.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum NiftiType {
    /// unsigned char.
    // NIFTI_TYPE_UINT8           2
    Uint8 = 2,
    /// signed short.
    // NIFTI_TYPE_INT16           4
    Int16 = 4,
    /// signed int.
    // NIFTI_TYPE_INT32           8
    Int32 = 8,
    /// 32 bit float.
    // NIFTI_TYPE_FLOAT32        16
    Float32 = 16,
    /// 64 bit float = double.
    // NIFTI_TYPE_FLOAT64        64
    Float64 = 64,
    /// signed char.
    // NIFTI_TYPE_INT8          256
    Int8 = 256,
    /// unsigned short.
    // NIFTI_TYPE_UINT16        512
    Uint16 = 512,
    /// unsigned int.
    // NIFTI_TYPE_UINT32        768
    Uint32 = 768,
}

impl NiftiType {
    /// Map a raw `datatype` code to a known type, if it is one.
    pub fn from_code(code: i16) -> Option<NiftiType> {
        FromPrimitive::from_i16(code)
    }

    /// Map a raw `datatype` code to a known type, falling back to
    /// `Uint8` for anything unrecognized.
    pub fn from_code_lenient(code: i16) -> NiftiType {
        NiftiType::from_code(code).unwrap_or(NiftiType::Uint8)
    }

    /// Retrieve the size of an element of this data type, in bytes.
    pub fn size_of(&self) -> usize {
        use self::NiftiType::*;
        match *self {
            Int8 | Uint8 => 1,
            Int16 | Uint16 => 2,
            Int32 | Uint32 | Float32 => 4,
            Float64 => 8,
        }
    }

    /// The raw `datatype` code of this type.
    pub fn code(&self) -> i16 {
        *self as i16
    }
}

impl Default for NiftiType {
    fn default() -> Self {
        NiftiType::Uint8
    }
}
