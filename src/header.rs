//! This module defines the `VolumeHeader` struct, which describes the
//! layout of a loaded NIfTI-1 (or Analyze 7.5) volume, and the lenient
//! parser producing it.
//!
//! Only the fields needed to address voxels are decoded. Validity is
//! established by an ordered list of detection stages, tried one after
//! the other until one of them accepts the buffer:
//!
//! 1. the NIfTI-1 magic code at offset 344;
//! 2. the Analyze 7.5 `sizeof_hdr` field being 348;
//! 3. plausible looking dimensions at offset 40.
//!
//! Once the format is confirmed, garbled dimensions never fail the parse:
//! the opposite byte order is tried, and then a default 64³ volume is
//! substituted.

use crate::error::{NiftiError, Result};
use crate::typedef::NiftiType;
use crate::util::{read_f32_at, read_i16_at, read_i16_array_at, read_i32_at};
use byteordered::Endianness;
use tracing::{debug, warn};

/// Magic code for NIFTI-1 header files (extention ".hdr").
pub const MAGIC_CODE_NI1: &[u8; 4] = b"ni1\0";
/// Magic code for full NIFTI-1 files (extention ".nii").
pub const MAGIC_CODE_NIP1: &[u8; 4] = b"n+1\0";

/// Size of a NIfTI-1 / Analyze 7.5 header. Shorter buffers are rejected.
pub const MIN_HEADER_SIZE: usize = 348;
/// Offset of the voxel data in a single-file NIfTI-1 volume without
/// extensions.
pub const DEFAULT_DATA_OFFSET: usize = 352;
/// Dimensions substituted when neither byte order yields plausible ones.
pub const DEFAULT_DIM: [u16; 4] = [3, 64, 64, 64];
/// Spatial extents must be strictly below this bound.
pub const MAX_EXTENT: i16 = 1000;

const OFFSET_SIZEOF_HDR: usize = 0;
const OFFSET_DIM: usize = 40;
const OFFSET_DIM4: usize = 48;
const OFFSET_DATATYPE: usize = 70;
const OFFSET_VOX_OFFSET: usize = 108;
const OFFSET_MAGIC: usize = 344;

/// Slices per 64×64 plane assumed by the best-guess header.
const BEST_GUESS_PLANE: usize = 64 * 64;

/// How the validity of a header was established.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeaderFormat {
    /// A NIfTI-1 magic code was found at offset 344.
    Nifti1 {
        /// The magic code found, `b"n+1\0"` or `b"ni1\0"`.
        magic: [u8; 4],
        /// The raw (little endian) `vox_offset` field.
        vox_offset: f32,
    },
    /// `sizeof_hdr` is 348 (Analyze 7.5 or magic-less NIfTI-1).
    Analyze75,
    /// No signature, but the dimension fields look like a volume.
    DimensionHeuristic,
    /// Nothing matched; layout guessed from the buffer length.
    BestGuess,
}

/// A detection stage: inspects the raw buffer and reports a format if
/// it recognizes one.
pub type DetectStage = fn(&[u8]) -> Option<HeaderFormat>;

/// Detection stages, in the order in which they are attempted.
pub const DETECTION_STAGES: [(&str, DetectStage); 3] = [
    ("nifti-1 magic", detect_magic),
    ("analyze 7.5 header size", detect_analyze),
    ("dimension plausibility", detect_plausible_dims),
];

/// Stage 1: look for `"n+1\0"` or `"ni1\0"` at offset 344.
pub fn detect_magic(buf: &[u8]) -> Option<HeaderFormat> {
    let raw = buf.get(OFFSET_MAGIC..OFFSET_MAGIC + 4)?;
    let mut magic = [0; 4];
    magic.copy_from_slice(raw);
    if &magic != MAGIC_CODE_NIP1 && &magic != MAGIC_CODE_NI1 {
        return None;
    }
    let vox_offset = read_f32_at(buf, OFFSET_VOX_OFFSET, Endianness::Little)?;
    Some(HeaderFormat::Nifti1 { magic, vox_offset })
}

/// Stage 2: the little endian `sizeof_hdr` field equals 348.
pub fn detect_analyze(buf: &[u8]) -> Option<HeaderFormat> {
    match read_i32_at(buf, OFFSET_SIZEOF_HDR, Endianness::Little)? {
        348 => Some(HeaderFormat::Analyze75),
        _ => None,
    }
}

/// Stage 3: `dim[0]` is in `1..=7` and the three spatial extents are in
/// `1..1000`, all read as little endian.
pub fn detect_plausible_dims(buf: &[u8]) -> Option<HeaderFormat> {
    let [dim0, nx, ny, nz] = read_i16_array_at::<4>(buf, OFFSET_DIM, Endianness::Little)?;
    let plausible = (1..=7).contains(&dim0)
        && [nx, ny, nz].iter().all(|d| *d > 0 && *d < MAX_EXTENT);
    if plausible {
        Some(HeaderFormat::DimensionHeuristic)
    } else {
        None
    }
}

/// Run the detection stages in order, returning the first match.
///
/// # Errors
///
/// - `NiftiError::TooSmall` if the buffer is shorter than 348 bytes.
/// - `NiftiError::InvalidFormat` if no stage recognizes the buffer.
pub fn detect_format(buf: &[u8]) -> Result<HeaderFormat> {
    if buf.len() < MIN_HEADER_SIZE {
        return Err(NiftiError::TooSmall(buf.len()));
    }
    for (name, stage) in DETECTION_STAGES.iter() {
        if let Some(format) = stage(buf) {
            debug!(stage = *name, ?format, "header format confirmed");
            return Ok(format);
        }
        debug!(stage = *name, "detection stage did not match");
    }
    Err(NiftiError::InvalidFormat)
}

/// Immutable descriptor of a loaded volume: where the voxels are, how
/// they are encoded and how many there are along each axis.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeHeader {
    /// How the header was recognized.
    pub format: HeaderFormat,
    /// `[dim0, nx, ny, nz]`, with all three extents positive.
    pub dim: [u16; 4],
    /// Extent of the 4th dimension, 1 if absent.
    pub frames: u16,
    /// Voxel encoding.
    pub datatype: NiftiType,
    /// The raw `datatype` code, which may not be a known one.
    pub datatype_code: i16,
    /// Byte offset into the buffer where the voxel data begins.
    pub data_offset: usize,
    /// Byte order of the header fields and voxel data.
    pub endianness: Endianness,
    /// Whether `DEFAULT_DIM` replaced unreadable dimensions.
    pub default_dims: bool,
}

impl Default for VolumeHeader {
    fn default() -> VolumeHeader {
        VolumeHeader {
            format: HeaderFormat::BestGuess,
            dim: DEFAULT_DIM,
            frames: 1,
            datatype: NiftiType::Uint8,
            datatype_code: NiftiType::Uint8.code(),
            data_offset: DEFAULT_DATA_OFFSET,
            endianness: Endianness::Little,
            default_dims: true,
        }
    }
}

impl VolumeHeader {
    /// Parse the header of a complete in-memory NIfTI-1 file.
    ///
    /// `datatype`, `dim[4]` and `vox_offset` are read in whichever byte
    /// order the dimensions resolved to.
    ///
    /// # Errors
    ///
    /// - `NiftiError::TooSmall` if the buffer is shorter than 348 bytes.
    /// - `NiftiError::InvalidFormat` if none of the detection stages
    ///   recognize the buffer. See [`best_guess`](#method.best_guess) for
    ///   a last-resort recovery.
    pub fn from_bytes(buf: &[u8]) -> Result<VolumeHeader> {
        let format = detect_format(buf)?;
        let (dim, endianness, default_dims) = read_dims(buf);

        let datatype_code = read_i16_at(buf, OFFSET_DATATYPE, endianness)
            .unwrap_or_else(|| NiftiType::Uint8.code());
        let datatype = NiftiType::from_code(datatype_code).unwrap_or_else(|| {
            warn!(code = datatype_code, "unknown datatype, reading voxels as uint8");
            NiftiType::Uint8
        });

        let frames = if dim[0] >= 4 {
            match read_i16_at(buf, OFFSET_DIM4, endianness) {
                Some(t) if t > 0 => t as u16,
                _ => 1,
            }
        } else {
            1
        };

        let data_offset = match format {
            HeaderFormat::Nifti1 { vox_offset, .. } => {
                let vox_offset = if endianness == Endianness::Little {
                    vox_offset
                } else {
                    read_f32_at(buf, OFFSET_VOX_OFFSET, endianness).unwrap_or(0.)
                };
                if vox_offset > 0. {
                    vox_offset as usize
                } else {
                    DEFAULT_DATA_OFFSET
                }
            }
            HeaderFormat::Analyze75 => MIN_HEADER_SIZE,
            HeaderFormat::DimensionHeuristic | HeaderFormat::BestGuess => DEFAULT_DATA_OFFSET,
        };

        let header = VolumeHeader {
            format,
            dim,
            frames,
            datatype,
            datatype_code,
            data_offset,
            endianness,
            default_dims,
        };
        debug!(?header, "parsed volume header");
        if buf.len() < header.expected_len() {
            warn!(
                expected = header.expected_len(),
                actual = buf.len(),
                "file may be truncated"
            );
        }
        Ok(header)
    }

    /// Build the last-resort header used when no detection stage
    /// recognizes a file: 64×64 uint8 planes, as many as fit in
    /// `len` bytes, starting at offset 352.
    ///
    /// This layout is not derived from any header field. It keeps
    /// something on screen, with no guarantee that it is meaningful.
    pub fn best_guess(len: usize) -> VolumeHeader {
        let nz = (len / BEST_GUESS_PLANE).min(usize::from(u16::MAX)) as u16;
        VolumeHeader {
            dim: [3, 64, 64, nz],
            default_dims: false,
            ..VolumeHeader::default()
        }
    }

    /// Number of dimensions as declared by `dim[0]`.
    pub fn dimensionality(&self) -> usize {
        usize::from(self.dim[0])
    }

    /// Extent along the x axis.
    pub fn nx(&self) -> usize {
        usize::from(self.dim[1])
    }

    /// Extent along the y axis.
    pub fn ny(&self) -> usize {
        usize::from(self.dim[2])
    }

    /// Extent along the z axis.
    pub fn nz(&self) -> usize {
        usize::from(self.dim[3])
    }

    /// Logical number of voxels, including all frames.
    pub fn voxel_count(&self) -> usize {
        self.nx() * self.ny() * self.nz() * usize::from(self.frames)
    }

    /// Minimum buffer length holding every voxel of the volume.
    pub fn expected_len(&self) -> usize {
        self.data_offset
            .saturating_add(self.voxel_count().saturating_mul(self.datatype.size_of()))
    }
}

fn plausible_dims(dims: &[i16; 4]) -> bool {
    let [dim0, nx, ny, nz] = *dims;
    (0..=7).contains(&dim0) && [nx, ny, nz].iter().all(|d| *d > 0 && *d < MAX_EXTENT)
}

/// Read `dim[0..4]` as little endian, then big endian, then give up and
/// use `DEFAULT_DIM`.
fn read_dims(buf: &[u8]) -> ([u16; 4], Endianness, bool) {
    for endianness in [Endianness::Little, Endianness::Big].iter().copied() {
        if let Some(dims) = read_i16_array_at::<4>(buf, OFFSET_DIM, endianness) {
            if plausible_dims(&dims) {
                if endianness == Endianness::Big {
                    debug!(?dims, "dimensions recovered as big endian");
                }
                let mut out = [0u16; 4];
                for (o, d) in out.iter_mut().zip(dims.iter()) {
                    *o = *d as u16;
                }
                return (out, endianness, false);
            }
        }
    }
    warn!(dim = ?DEFAULT_DIM, "dimensions look suspicious, using defaults");
    (DEFAULT_DIM, Endianness::Little, true)
}
