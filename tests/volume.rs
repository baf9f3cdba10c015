extern crate niiview;
#[macro_use]
extern crate pretty_assertions;

mod util;

use niiview::{LoadedVolume, NiftiType, Plane, SliceRequest, VoxelSource};
use util::{counting_volume, NiftiBuilder};

fn values(volume: &LoadedVolume, plane: Plane, index: i64) -> Vec<f64> {
    let slice = volume.slice(SliceRequest::new(plane, index));
    let (min, max) = slice.range().bounds();
    // undo the normalization to compare against raw voxel values
    slice
        .samples()
        .iter()
        .map(|s| (f64::from(*s) * (max - min) + min).round())
        .collect()
}

#[test]
fn accessor_reads_every_voxel() {
    let buf = counting_volume(3, 4, 5).build();
    let volume = LoadedVolume::from_bytes(buf).unwrap();
    let voxels = volume.accessor();
    assert_eq!(voxels.data_type(), NiftiType::Uint8);
    assert_eq!(voxels.len(), 60);
    for i in 0..60 {
        assert_eq!(voxels.read(i), Some(i as f64));
    }
    assert_eq!(voxels.read(60), None);
}

#[test]
fn accessor_big_endian_u16() {
    let buf = NiftiBuilder::new(2, 2, 1)
        .big_endian()
        .datatype(512)
        .u16_data(vec![1, 256, 65535, 7])
        .build();
    let volume = LoadedVolume::from_bytes(buf).unwrap();
    let voxels = volume.accessor();
    let got: Vec<_> = (0..4).filter_map(|i| voxels.read(i)).collect();
    assert_eq!(got, vec![1., 256., 65535., 7.]);
}

#[test]
fn accessor_32_bit_integers() {
    let buf = NiftiBuilder::new(3, 1, 1)
        .datatype(8)
        .i32_data(vec![-7, 70000, i32::MIN])
        .build();
    let volume = LoadedVolume::from_bytes(buf).unwrap();
    let voxels = volume.accessor();
    assert_eq!(voxels.data_type(), NiftiType::Int32);
    assert_eq!(voxels.len(), 3);
    let got: Vec<_> = (0..3).filter_map(|i| voxels.read(i)).collect();
    assert_eq!(got, vec![-7., 70000., -2147483648.]);

    let buf = NiftiBuilder::new(2, 1, 1)
        .big_endian()
        .datatype(768)
        .u32_data(vec![4_000_000_000, 1])
        .build();
    let volume = LoadedVolume::from_bytes(buf).unwrap();
    let voxels = volume.accessor();
    assert_eq!(voxels.data_type(), NiftiType::Uint32);
    assert_eq!(voxels.read(0), Some(4_000_000_000.));
    assert_eq!(voxels.read(1), Some(1.));
    assert_eq!(voxels.read(2), None);
}

#[test]
fn truncated_file_keeps_its_head() {
    let mut buf = NiftiBuilder::new(4, 4, 4)
        .f32_data((0..64).map(|v| v as f32))
        .build();
    // drop the last 10 voxels and a half
    buf.truncate(buf.len() - 42);
    let volume = LoadedVolume::from_bytes(buf).unwrap();
    let voxels = volume.accessor();
    assert_eq!(voxels.len(), 53);
    assert_eq!(voxels.read(52), Some(52.));
    assert_eq!(voxels.read(53), None);

    // the last axial slice is only partly covered
    let slice = volume.slice(SliceRequest::new(Plane::Axial, 3));
    assert_eq!(slice.covered_count(), 5);
}

#[test]
fn extra_trailing_bytes_are_ignored() {
    let mut buf = counting_volume(2, 2, 2).build();
    buf.extend_from_slice(&[200; 16]);
    let volume = LoadedVolume::from_bytes(buf).unwrap();
    assert_eq!(volume.accessor().len(), 8);
}

#[test]
fn axial_index_mapping() {
    let volume = LoadedVolume::from_bytes(counting_volume(2, 2, 2).build()).unwrap();
    assert_eq!(values(&volume, Plane::Axial, 0), vec![0., 1., 2., 3.]);
    assert_eq!(values(&volume, Plane::Axial, 1), vec![4., 5., 6., 7.]);
}

#[test]
fn sagittal_index_mapping() {
    // pixel (px, py) of sagittal slice x shows voxel (x, ny-1-px, nz-1-py)
    let volume = LoadedVolume::from_bytes(counting_volume(2, 2, 2).build()).unwrap();
    assert_eq!(values(&volume, Plane::Sagittal, 0), vec![6., 4., 2., 0.]);
    assert_eq!(values(&volume, Plane::Sagittal, 1), vec![7., 5., 3., 1.]);
}

#[test]
fn coronal_index_mapping() {
    // pixel (px, py) of coronal slice y shows voxel (nx-1-px, y, nz-1-py)
    let volume = LoadedVolume::from_bytes(counting_volume(2, 2, 2).build()).unwrap();
    assert_eq!(values(&volume, Plane::Coronal, 0), vec![5., 4., 1., 0.]);
    assert_eq!(values(&volume, Plane::Coronal, 1), vec![7., 6., 3., 2.]);
}

#[test]
fn non_cubic_shapes() {
    let volume = LoadedVolume::from_bytes(counting_volume(3, 4, 5).build()).unwrap();
    for plane in Plane::ALL.iter().copied() {
        let slice = volume.slice(SliceRequest::new(plane, 1));
        let (w, h) = plane.slice_shape(volume.header());
        assert_eq!((slice.width(), slice.height()), (w, h));
        assert_eq!(slice.covered_count(), w * h);
    }
    // sagittal slice x = 1: pixel (0, 0) is voxel (1, 3, 4) = 1 + 9 + 48
    assert_eq!(values(&volume, Plane::Sagittal, 1)[0], 58.);
    // coronal slice y = 1: pixel (0, 0) is voxel (2, 1, 4) = 2 + 3 + 48
    assert_eq!(values(&volume, Plane::Coronal, 1)[0], 53.);
}

#[test]
fn raw_data_round_trip() {
    let buf = counting_volume(2, 2, 2).build();
    let volume = LoadedVolume::from_bytes(buf.clone()).unwrap();
    assert_eq!(volume.raw_data(), &buf[..]);
    assert_eq!(volume.into_raw_data(), buf);
}
