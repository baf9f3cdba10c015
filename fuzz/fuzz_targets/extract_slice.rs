#![no_main]
use libfuzzer_sys::fuzz_target;
use niiview::{render, LoadedVolume, Plane, Raster, SliceRequest, VolumeHeader};

fuzz_target!(|data: &[u8]| {
    let header = VolumeHeader::from_bytes(data)
        .unwrap_or_else(|_| VolumeHeader::best_guess(data.len()));
    let volume = LoadedVolume::new(header, data.to_vec());
    let index = data.get(0).copied().unwrap_or(0) as i64 - 16;
    for plane in Plane::ALL.iter().copied() {
        let slice = volume.slice(SliceRequest::new(plane, index));
        let mut raster = Raster::default();
        let _ = render(&slice, &mut raster);
    }
});
