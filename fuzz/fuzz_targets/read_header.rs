#![no_main]
use libfuzzer_sys::fuzz_target;
use niiview::VolumeHeader;

fuzz_target!(|data: &[u8]| {
    if let Ok(header) = VolumeHeader::from_bytes(data) {
        let _ = header.voxel_count();
        let _ = header.expected_len();
        let _ = header.dimensionality();
    }
});
