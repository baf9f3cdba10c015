//! Lenient NIfTI-1 volume decoding and multi-planar slice viewing.
//!
//! A complete `.nii` file is held in memory as a [`LoadedVolume`]. Its
//! header is parsed leniently: anything that looks like a NIfTI-1 or
//! Analyze 7.5 header is accepted, and garbled fields are replaced by
//! sensible defaults (with a logged warning) rather than rejected.
//! Axial, sagittal and coronal slices can then be extracted, normalized
//! for display and painted onto an RGBA [`Surface`].
//!
//! The [`viewer`] module wraps all of this into an interactive session
//! with slice stepping and looping playback.
//!
//! # Example
//!
//! ```no_run
//! use niiview::{render, LoadedVolume, Plane, Raster, SliceRequest};
//! # fn run() -> niiview::Result<()> {
//! let volume = LoadedVolume::from_bytes(std::fs::read("brain.nii")?)?;
//! let middle = volume.header().nz() as i64 / 2;
//! let slice = volume.slice(SliceRequest::new(Plane::Axial, middle));
//! let mut raster = Raster::default();
//! render(&slice, &mut raster)?;
//! std::fs::write("slice.png", raster.to_png()?)?;
//! # Ok(())
//! # }
//! ```
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

#[macro_use]
extern crate quick_error;
#[macro_use]
extern crate num_derive;

pub mod error;
pub mod header;
pub mod render;
pub mod slice;
pub mod typedef;
mod util;
pub mod viewer;
pub mod volume;

pub use byteordered::Endianness;
pub use error::{NiftiError, Result};
pub use header::{HeaderFormat, VolumeHeader};
pub use render::{render, Raster, Surface};
pub use slice::{extract, IntensityRange, NormalizedSlice, Plane, SliceRequest};
pub use typedef::NiftiType;
pub use util::is_gz_file;
pub use volume::element::DataElement;
pub use volume::{LoadedVolume, VoxelAccessor, VoxelSource};
