//! Private utility module
use byteordered::{ByteOrdered, Endianness};
use std::path::Path;

/// Read a 16-bit signed integer at the given byte offset.
/// Returns `None` if the buffer ends before the field does.
pub fn read_i16_at(buf: &[u8], offset: usize, endianness: Endianness) -> Option<i16> {
    let src = buf.get(offset..offset.checked_add(2)?)?;
    ByteOrdered::runtime(src, endianness).read_i16().ok()
}

/// Read a 32-bit signed integer at the given byte offset.
pub fn read_i32_at(buf: &[u8], offset: usize, endianness: Endianness) -> Option<i32> {
    let src = buf.get(offset..offset.checked_add(4)?)?;
    ByteOrdered::runtime(src, endianness).read_i32().ok()
}

/// Read a 32-bit float at the given byte offset.
pub fn read_f32_at(buf: &[u8], offset: usize, endianness: Endianness) -> Option<f32> {
    let src = buf.get(offset..offset.checked_add(4)?)?;
    ByteOrdered::runtime(src, endianness).read_f32().ok()
}

/// Read `N` consecutive 16-bit signed integers starting at the given offset.
pub fn read_i16_array_at<const N: usize>(
    buf: &[u8],
    offset: usize,
    endianness: Endianness,
) -> Option<[i16; N]> {
    let mut out = [0; N];
    for (i, v) in out.iter_mut().enumerate() {
        *v = read_i16_at(buf, offset + 2 * i, endianness)?;
    }
    Some(out)
}

/// Check whether the file name ends in ".gz", ignoring case.
pub fn is_gz_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().to_ascii_lowercase().ends_with(".gz"))
        .unwrap_or(false)
}

/// Check whether the buffer starts with the gzip magic number.
pub fn has_gz_magic(buf: &[u8]) -> bool {
    buf.starts_with(&[0x1f, 0x8b])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames() {
        assert!(!is_gz_file("/path/to/something.nii"));
        assert!(is_gz_file("/path/to/something.nii.gz"));
        assert!(is_gz_file("SCAN.NII.GZ"));
        assert!(!is_gz_file("volume.gz.nii"));
        assert!(!is_gz_file("gz"));
        assert!(!is_gz_file(""));
    }

    #[test]
    fn gz_magic() {
        assert!(has_gz_magic(&[0x1f, 0x8b, 0x08, 0x00]));
        assert!(!has_gz_magic(&[0x5c, 0x01, 0x00, 0x00]));
        assert!(!has_gz_magic(&[0x1f]));
    }

    #[test]
    fn fields_at_offset() {
        let buf = [0x00, 0x01, 0x02, 0x40, 0x00, 0x00, 0xb0, 0x43];
        assert_eq!(read_i16_at(&buf, 0, Endianness::Big), Some(1));
        assert_eq!(read_i16_at(&buf, 0, Endianness::Little), Some(256));
        assert_eq!(read_i32_at(&buf, 0, Endianness::Big), Some(0x0001_0240));
        assert_eq!(read_f32_at(&buf, 4, Endianness::Little), Some(352.));
        assert_eq!(
            read_i16_array_at::<2>(&buf, 2, Endianness::Little),
            Some([0x4002, 0])
        );
        assert_eq!(read_i16_at(&buf, 7, Endianness::Little), None);
        assert_eq!(read_f32_at(&buf, usize::MAX, Endianness::Little), None);
    }
}
