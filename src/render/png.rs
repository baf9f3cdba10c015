//! Minimal RGBA PNG encoding (color type 6, no filtering).
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::convert::TryFrom;
use std::io::{self, Write};

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

pub(crate) fn encode_rgba(pixels: &[u8], width: usize, height: usize) -> io::Result<Vec<u8>> {
    let invalid = |msg: &str| io::Error::new(io::ErrorKind::InvalidInput, msg.to_string());
    if width == 0 || height == 0 {
        return Err(invalid("image has no pixels"));
    }
    if pixels.len() != width * height * 4 {
        return Err(invalid("pixel buffer does not match image size"));
    }
    let w = u32::try_from(width).map_err(|_| invalid("image too wide"))?;
    let h = u32::try_from(height).map_err(|_| invalid("image too tall"))?;

    let mut png = Vec::with_capacity(pixels.len() / 2 + 64);
    png.extend_from_slice(&SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&w.to_be_bytes());
    ihdr.extend_from_slice(&h.to_be_bytes());
    // bit depth, color type (RGBA), compression, filter, interlace
    ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);
    write_chunk(&mut png, b"IHDR", &ihdr);

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::fast());
    for row in pixels.chunks_exact(width * 4) {
        encoder.write_all(&[0])?;
        encoder.write_all(row)?;
    }
    let idat = encoder.finish()?;
    write_chunk(&mut png, b"IDAT", &idat);

    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    #[test]
    fn png_layout() {
        let pixels = [10u8, 20, 30, 255, 0, 0, 0, 0];
        let png = encode_rgba(&pixels, 2, 1).unwrap();
        assert_eq!(&png[..8], &SIGNATURE);
        // IHDR length, type, width, height
        assert_eq!(&png[8..12], &13u32.to_be_bytes());
        assert_eq!(&png[12..16], b"IHDR");
        assert_eq!(&png[16..20], &2u32.to_be_bytes());
        assert_eq!(&png[20..24], &1u32.to_be_bytes());
        assert_eq!(&png[png.len() - 12..png.len() - 4], b"\0\0\0\0IEND");

        // IDAT starts after signature (8) + IHDR chunk (25)
        let idat_len = u32::from_be_bytes([png[33], png[34], png[35], png[36]]) as usize;
        assert_eq!(&png[37..41], b"IDAT");
        let mut raw = Vec::new();
        ZlibDecoder::new(&png[41..41 + idat_len])
            .read_to_end(&mut raw)
            .unwrap();
        assert_eq!(raw, vec![0, 10, 20, 30, 255, 0, 0, 0, 0]);
    }

    #[test]
    fn size_mismatch() {
        assert!(encode_rgba(&[0; 7], 2, 1).is_err());
    }

    #[test]
    fn empty_images_are_refused() {
        for &(w, h) in &[(0, 0), (0, 5), (5, 0)] {
            let err = encode_rgba(&[], w, h).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        }
    }
}
