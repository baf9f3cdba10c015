//! This module defines the voxel access API: a typed, bounds-checked,
//! read-only view over the voxel bytes of a loaded file, and the
//! `LoadedVolume` type owning those bytes together with their header.

pub mod element;

use self::element::{element_reader, ElementReader};
use crate::header::VolumeHeader;
use crate::slice::{extract, NormalizedSlice, SliceRequest};
use crate::typedef::NiftiType;

/// Public API for anything voxels can be read from by linear index.
///
/// The linear index follows the NIfTI storage order, with x varying
/// fastest, then y, then z.
pub trait VoxelSource {
    /// Number of addressable voxels.
    fn len(&self) -> usize;

    /// Whether there are no addressable voxels at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the voxel at `index`, or `None` if it lies outside
    /// `0..self.len()`.
    fn read(&self, index: usize) -> Option<f64>;
}

impl VoxelSource for [f64] {
    fn len(&self) -> usize {
        <[f64]>::len(self)
    }

    fn read(&self, index: usize) -> Option<f64> {
        self.get(index).copied()
    }
}

/// A typed view over the voxel data of a buffer, starting at the header's
/// data offset. The decoding function is resolved once, on construction.
#[derive(Clone, Copy)]
pub struct VoxelAccessor<'a> {
    data: &'a [u8],
    len: usize,
    datatype: NiftiType,
    reader: ElementReader,
}

impl<'a> std::fmt::Debug for VoxelAccessor<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoxelAccessor")
            .field("len", &self.len)
            .field("datatype", &self.datatype)
            .finish()
    }
}

impl<'a> VoxelAccessor<'a> {
    /// Bind a view over `buffer[header.data_offset..]`. Nothing is copied.
    ///
    /// The number of addressable voxels is the smaller of what the
    /// remaining bytes hold and what the header declares, so a truncated
    /// file only loses its missing tail.
    pub fn new(buffer: &'a [u8], header: &VolumeHeader) -> Self {
        let data = buffer.get(header.data_offset..).unwrap_or(&[]);
        let len = (data.len() / header.datatype.size_of()).min(header.voxel_count());
        VoxelAccessor {
            data,
            len,
            datatype: header.datatype,
            reader: element_reader(header.datatype, header.endianness),
        }
    }

    /// Get this view's data type.
    pub fn data_type(&self) -> NiftiType {
        self.datatype
    }
}

impl<'a> VoxelSource for VoxelAccessor<'a> {
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn read(&self, index: usize) -> Option<f64> {
        if index >= self.len {
            return None;
        }
        let size = self.datatype.size_of();
        let start = index * size;
        Some((self.reader)(&self.data[start..start + size]))
    }
}

/// A volume fully contained in memory: the raw file bytes plus the
/// header describing them. Owned exclusively by one viewing session.
#[derive(Debug, PartialEq, Clone)]
pub struct LoadedVolume {
    header: VolumeHeader,
    buffer: Vec<u8>,
}

impl LoadedVolume {
    /// Pair a buffer with its (already parsed) header.
    pub fn new(header: VolumeHeader, buffer: Vec<u8>) -> Self {
        LoadedVolume { header, buffer }
    }

    /// Parse the header of `buffer` and take ownership of it.
    pub fn from_bytes(buffer: Vec<u8>) -> crate::Result<Self> {
        let header = VolumeHeader::from_bytes(&buffer)?;
        Ok(LoadedVolume::new(header, buffer))
    }

    /// Obtain a reference to the header.
    pub fn header(&self) -> &VolumeHeader {
        &self.header
    }

    /// Retrieve a reference to the raw file bytes.
    pub fn raw_data(&self) -> &[u8] {
        &self.buffer
    }

    /// Retrieve the raw file bytes, consuming the volume.
    pub fn into_raw_data(self) -> Vec<u8> {
        self.buffer
    }

    /// Create a voxel view over this volume.
    pub fn accessor(&self) -> VoxelAccessor<'_> {
        VoxelAccessor::new(&self.buffer, &self.header)
    }

    /// Extract and normalize a 2D slice.
    pub fn slice(&self, request: SliceRequest) -> NormalizedSlice {
        extract(&self.header, &self.accessor(), request)
    }
}
