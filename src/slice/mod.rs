//! Multi-planar slice extraction.
//!
//! A slice is a 2D cut through the first frame of a volume, taken along
//! one of the three anatomical planes, with its intensities rescaled to
//! `[0, 1]` for display. Slices are recomputed on every request; the
//! cost is bounded by the pixel count of one plane.

pub mod normalize;
pub mod plane;

pub use self::normalize::{discover_range, IntensityRange};
pub use self::plane::{clamp_index, Plane};

use crate::header::VolumeHeader;
use crate::volume::VoxelSource;
use tracing::trace;

/// Which slice to extract. The index is clamped to the plane's extent
/// before use, so any value is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SliceRequest {
    /// Viewing plane.
    pub plane: Plane,
    /// Slice index along the plane's normal axis.
    pub index: i64,
}

impl SliceRequest {
    /// Create a new slice request.
    pub fn new(plane: Plane, index: i64) -> Self {
        SliceRequest { plane, index }
    }
}

/// A 2D grid of intensities in `[0, 1]`, in row-major order, plus a
/// coverage mask telling which pixels map to an actual voxel.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSlice {
    width: usize,
    height: usize,
    plane: Plane,
    index: usize,
    range: IntensityRange,
    samples: Vec<f32>,
    coverage: Vec<bool>,
}

impl NormalizedSlice {
    /// A slice in which no pixel is covered.
    fn transparent(width: usize, height: usize, plane: Plane, index: usize) -> Self {
        NormalizedSlice {
            width,
            height,
            plane,
            index,
            range: IntensityRange::Default,
            samples: vec![0.; width * height],
            coverage: vec![false; width * height],
        }
    }

    /// Width of the slice in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the slice in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The plane this slice was taken from.
    pub fn plane(&self) -> Plane {
        self.plane
    }

    /// The (clamped) slice index actually extracted.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The intensity range the samples were normalized against.
    pub fn range(&self) -> IntensityRange {
        self.range
    }

    /// All samples, row-major. Uncovered pixels hold 0.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Coverage mask matching `samples`.
    pub fn coverage(&self) -> &[bool] {
        &self.coverage
    }

    /// The sample at `(x, y)`, or `None` if the pixel is not covered or
    /// lies outside the slice.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y * self.width + x;
        if self.coverage[i] {
            Some(self.samples[i])
        } else {
            None
        }
    }

    /// Number of covered pixels.
    pub fn covered_count(&self) -> usize {
        self.coverage.iter().filter(|c| **c).count()
    }

    /// Copy the samples into an `ndarray` of shape `(height, width)`.
    #[cfg(feature = "ndarray_slices")]
    pub fn to_ndarray(&self) -> ndarray::Array2<f32> {
        let width = self.width;
        ndarray::Array2::from_shape_fn((self.height, self.width), |(y, x)| {
            self.samples[y * width + x]
        })
    }
}

/// Extract the slice described by `request` and normalize it.
///
/// Pixels mapping outside the voxel source are left uncovered, and a
/// plane with no slices at all yields a fully uncovered slice. NaN
/// voxels are covered, with a sample of 0.
pub fn extract<V>(header: &VolumeHeader, voxels: &V, request: SliceRequest) -> NormalizedSlice
where
    V: VoxelSource + ?Sized,
{
    let plane = request.plane;
    let (width, height) = plane.slice_shape(header);
    let extent = plane.extent(header);
    let index = clamp_index(request.index, extent);
    if extent == 0 {
        return NormalizedSlice::transparent(width, height, plane, index);
    }

    let sample = |x: usize, y: usize| {
        plane
            .voxel_index(header, index, x, y)
            .and_then(|i| voxels.read(i))
    };

    let (range, sampled) = discover_range(width, height, &sample);
    trace!(%plane, index, ?range, sampled, "slice intensity range");

    let mut samples = Vec::with_capacity(width * height);
    let mut coverage = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            match sample(x, y) {
                Some(v) => {
                    samples.push(range.normalize(v));
                    coverage.push(true);
                }
                None => {
                    samples.push(0.);
                    coverage.push(false);
                }
            }
        }
    }

    NormalizedSlice {
        width,
        height,
        plane,
        index,
        range,
        samples,
        coverage,
    }
}
