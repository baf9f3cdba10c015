//! Synthetic NIfTI-1 files for the integration tests.
#![allow(dead_code)]

use byteordered::{ByteOrdered, Endianness};
use std::io::Write;
use tempfile::NamedTempFile;

/// Builds single-file NIfTI-1 buffers with a hand-picked header.
#[derive(Debug, Clone)]
pub struct NiftiBuilder {
    sizeof_hdr: i32,
    dim: [i16; 5],
    datatype: i16,
    vox_offset: f32,
    magic: Option<[u8; 4]>,
    endianness: Endianness,
    data: Vec<u8>,
}

impl NiftiBuilder {
    /// A little endian `n+1` header for an `nx × ny × nz` uint8 volume,
    /// with no voxel data yet.
    pub fn new(nx: i16, ny: i16, nz: i16) -> Self {
        NiftiBuilder {
            sizeof_hdr: 348,
            dim: [3, nx, ny, nz, 1],
            datatype: 2,
            vox_offset: 352.,
            magic: Some(*b"n+1\0"),
            endianness: Endianness::Little,
            data: Vec::new(),
        }
    }

    pub fn sizeof_hdr(mut self, v: i32) -> Self {
        self.sizeof_hdr = v;
        self
    }

    pub fn dim0(mut self, v: i16) -> Self {
        self.dim[0] = v;
        self
    }

    pub fn frames(mut self, t: i16) -> Self {
        self.dim[0] = 4;
        self.dim[4] = t;
        self
    }

    pub fn datatype(mut self, code: i16) -> Self {
        self.datatype = code;
        self
    }

    pub fn vox_offset(mut self, v: f32) -> Self {
        self.vox_offset = v;
        self
    }

    pub fn magic(mut self, magic: Option<&[u8; 4]>) -> Self {
        self.magic = magic.copied();
        self
    }

    pub fn big_endian(mut self) -> Self {
        self.endianness = Endianness::Big;
        self
    }

    pub fn raw_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    pub fn u8_data<I: IntoIterator<Item = u8>>(self, values: I) -> Self {
        let data = values.into_iter().collect();
        self.raw_data(data)
    }

    pub fn u16_data<I: IntoIterator<Item = u16>>(self, values: I) -> Self {
        let e = self.endianness;
        let mut out = ByteOrdered::runtime(Vec::new(), e);
        for v in values {
            out.write_u16(v).unwrap();
        }
        self.raw_data(out.into_inner())
    }

    pub fn i32_data<I: IntoIterator<Item = i32>>(self, values: I) -> Self {
        let e = self.endianness;
        let mut out = ByteOrdered::runtime(Vec::new(), e);
        for v in values {
            out.write_i32(v).unwrap();
        }
        self.raw_data(out.into_inner())
    }

    pub fn u32_data<I: IntoIterator<Item = u32>>(self, values: I) -> Self {
        let e = self.endianness;
        let mut out = ByteOrdered::runtime(Vec::new(), e);
        for v in values {
            out.write_u32(v).unwrap();
        }
        self.raw_data(out.into_inner())
    }

    pub fn f32_data<I: IntoIterator<Item = f32>>(self, values: I) -> Self {
        let e = self.endianness;
        let mut out = ByteOrdered::runtime(Vec::new(), e);
        for v in values {
            out.write_f32(v).unwrap();
        }
        self.raw_data(out.into_inner())
    }

    /// Offset at which the voxel data is placed.
    pub fn data_offset(&self) -> usize {
        if self.vox_offset > 0. {
            self.vox_offset as usize
        } else {
            352
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let offset = self.data_offset();
        let mut buf = vec![0u8; offset];
        let e = self.endianness;
        put(&mut buf, 0, e, |w| w.write_i32(self.sizeof_hdr));
        for (i, d) in self.dim.iter().enumerate() {
            put(&mut buf, 40 + 2 * i, e, |w| w.write_i16(*d));
        }
        put(&mut buf, 70, e, |w| w.write_i16(self.datatype));
        put(&mut buf, 108, e, |w| w.write_f32(self.vox_offset));
        if let Some(magic) = &self.magic {
            buf[344..348].copy_from_slice(magic);
        }
        buf.extend_from_slice(&self.data);
        buf
    }

    /// Write the file to a fresh temporary `.nii` file.
    pub fn write_temp(&self) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".nii")
            .tempfile()
            .unwrap();
        file.write_all(&self.build()).unwrap();
        file.flush().unwrap();
        file
    }
}

fn put<F>(buf: &mut [u8], offset: usize, e: Endianness, f: F)
where
    F: FnOnce(&mut ByteOrdered<&mut [u8], Endianness>) -> std::io::Result<()>,
{
    let mut w = ByteOrdered::runtime(&mut buf[offset..], e);
    f(&mut w).unwrap();
}

/// The 10×10×10 uint16 volume holding `x + 10y + 100z` at `(x, y, z)`.
pub fn ramp_volume() -> NiftiBuilder {
    NiftiBuilder::new(10, 10, 10)
        .datatype(512)
        .u16_data(0..1000)
}

/// Distinct uint8 values `0..n` in storage order.
pub fn counting_volume(nx: i16, ny: i16, nz: i16) -> NiftiBuilder {
    let n = (nx as usize) * (ny as usize) * (nz as usize);
    NiftiBuilder::new(nx, ny, nz).u8_data((0..n).map(|v| v as u8))
}

/// Route `tracing` output through the test harness, honoring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
