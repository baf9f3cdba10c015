//! An application for dumping a NIFTI-1 header and one of its slices.
//!
//! Usage: `slicedump FILE [axial|sagittal|coronal] [INDEX]`
//!
//! The slice (the middle one by default) is written as a PNG image next
//! to the input file. Set `RUST_LOG=debug` to follow header detection.

extern crate niiview;

use std::env;
use std::fs;
use std::path::Path;

use niiview::{render, LoadedVolume, NiftiError, Plane, Raster, SliceRequest, VolumeHeader};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let filename = args.next().expect("Path to NIFTI file is required");
    let plane: Plane = args
        .next()
        .map(|p| p.parse().expect("Invalid plane"))
        .unwrap_or_default();
    let index: Option<i64> = args.next().map(|i| i.parse().expect("Invalid slice index"));

    if niiview::is_gz_file(&filename) {
        eprintln!("{}", NiftiError::UnsupportedFormat(filename));
        std::process::exit(1);
    }

    let data = fs::read(&filename).expect("Failed to read NIFTI file");
    let header = match VolumeHeader::from_bytes(&data) {
        Ok(header) => header,
        Err(NiftiError::InvalidFormat) => {
            eprintln!("Unrecognized header, guessing the volume layout");
            VolumeHeader::best_guess(data.len())
        }
        Err(e) => panic!("Failed to read NIFTI file: {}", e),
    };
    println!("{:#?}", &header);

    let volume = LoadedVolume::new(header, data);
    let index = index.unwrap_or_else(|| plane.extent(volume.header()) as i64 / 2);
    let slice = volume.slice(SliceRequest::new(plane, index));
    println!(
        "{} slice {}: {}x{}, range {:?}",
        plane,
        slice.index(),
        slice.width(),
        slice.height(),
        slice.range()
    );

    if slice.width() == 0 || slice.height() == 0 {
        eprintln!("Slice has no pixels, nothing to write");
        return;
    }

    let mut raster = Raster::default();
    render(&slice, &mut raster).expect("Failed to render slice");
    let png = raster.to_png().expect("Failed to encode PNG");
    let out = Path::new(&filename).with_extension(format!("{}-{}.png", plane, slice.index()));
    fs::write(&out, png).expect("Failed to write PNG");
    println!("Wrote {}", out.display());
}
