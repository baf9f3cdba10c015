//! Anatomical viewing planes and the index arithmetic mapping a 2D pixel
//! of a plane back to a voxel of the volume.

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use crate::error::NiftiError;
use crate::header::VolumeHeader;

/// One of the three orthogonal viewing planes.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Plane {
    /// Horizontal plane, one z index (XY image).
    Axial,
    /// Side plane, one x index (YZ image).
    Sagittal,
    /// Front plane, one y index (XZ image).
    Coronal,
}

impl Default for Plane {
    fn default() -> Self {
        Plane::Axial
    }
}

impl Plane {
    /// All planes, in the order they are offered to the user.
    pub const ALL: [Plane; 3] = [Plane::Axial, Plane::Sagittal, Plane::Coronal];

    /// Number of slices along this plane's normal axis.
    pub fn extent(self, header: &VolumeHeader) -> usize {
        match self {
            Plane::Axial => header.nz(),
            Plane::Sagittal => header.nx(),
            Plane::Coronal => header.ny(),
        }
    }

    /// Width and height of a slice in this plane.
    pub fn slice_shape(self, header: &VolumeHeader) -> (usize, usize) {
        let (nx, ny, nz) = (header.nx(), header.ny(), header.nz());
        match self {
            Plane::Axial => (nx, ny),
            Plane::Sagittal => (ny, nz),
            Plane::Coronal => (nx, nz),
        }
    }

    /// Linear voxel index shown at pixel `(px, py)` of slice `index`.
    ///
    /// Sagittal and coronal images are mirrored on both axes (a 180°
    /// rotation) so that they come out in radiological orientation.
    /// Returns `None` if a mirrored coordinate falls outside the volume.
    pub fn voxel_index(
        self,
        header: &VolumeHeader,
        index: usize,
        px: usize,
        py: usize,
    ) -> Option<usize> {
        let (nx, ny, nz) = (header.nx() as u64, header.ny() as u64, header.nz() as u64);
        let (index, px, py) = (index as u64, px as u64, py as u64);
        let mirror = |extent: u64, p: u64| extent.checked_sub(1)?.checked_sub(p);
        let linear = match self {
            Plane::Axial => px + py * nx + index * nx * ny,
            Plane::Sagittal => index + mirror(ny, px)? * nx + mirror(nz, py)? * nx * ny,
            Plane::Coronal => mirror(nx, px)? + index * nx + mirror(nz, py)? * nx * ny,
        };
        usize::try_from(linear).ok()
    }

    /// The plane's lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Plane::Axial => "axial",
            Plane::Sagittal => "sagittal",
            Plane::Coronal => "coronal",
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Plane {
    type Err = NiftiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Plane::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| NiftiError::InvalidPlane(s.to_string()))
    }
}

/// Clamp a requested slice index into `[0, extent - 1]`. An empty extent
/// clamps to 0.
pub fn clamp_index(index: i64, extent: usize) -> usize {
    if index <= 0 || extent == 0 {
        return 0;
    }
    let last = extent - 1;
    usize::try_from(index).map(|i| i.min(last)).unwrap_or(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(nx: u16, ny: u16, nz: u16) -> VolumeHeader {
        VolumeHeader {
            dim: [3, nx, ny, nz],
            default_dims: false,
            ..VolumeHeader::default()
        }
    }

    #[test]
    fn extents_and_shapes() {
        let h = header(4, 5, 6);
        assert_eq!(Plane::Axial.extent(&h), 6);
        assert_eq!(Plane::Sagittal.extent(&h), 4);
        assert_eq!(Plane::Coronal.extent(&h), 5);
        assert_eq!(Plane::Axial.slice_shape(&h), (4, 5));
        assert_eq!(Plane::Sagittal.slice_shape(&h), (5, 6));
        assert_eq!(Plane::Coronal.slice_shape(&h), (4, 6));
    }

    #[test]
    fn index_mapping() {
        let h = header(4, 5, 6);
        // x + 4y + 20z
        assert_eq!(Plane::Axial.voxel_index(&h, 2, 1, 3), Some(1 + 12 + 40));
        // x = 2, y = 4 - 1, z = 5 - 2
        assert_eq!(Plane::Sagittal.voxel_index(&h, 2, 1, 2), Some(2 + 12 + 60));
        // x = 3 - 0, y = 4, z = 5 - 0
        assert_eq!(Plane::Coronal.voxel_index(&h, 4, 0, 0), Some(3 + 16 + 100));
    }

    #[test]
    fn names() {
        for p in Plane::ALL.iter() {
            assert_eq!(p.to_string().parse::<Plane>().unwrap(), *p);
        }
        assert_eq!(" Coronal".parse::<Plane>().unwrap(), Plane::Coronal);
        assert!(matches!(
            "oblique".parse::<Plane>(),
            Err(NiftiError::InvalidPlane(ref s)) if s == "oblique"
        ));
    }

    #[test]
    fn clamping() {
        assert_eq!(clamp_index(-5, 40), 0);
        assert_eq!(clamp_index(140, 40), 39);
        assert_eq!(clamp_index(12, 40), 12);
        assert_eq!(clamp_index(39, 40), 39);
        assert_eq!(clamp_index(3, 0), 0);
        assert_eq!(clamp_index(i64::MAX, 10), 9);
    }
}
