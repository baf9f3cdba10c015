//! Rasterization of normalized slices into RGBA pixels.
//!
//! Rendering is synchronous and happens in place on a [`Surface`], which
//! is resized to the slice before being painted.

mod png;

use rgb::RGBA8;

use crate::error::{NiftiError, Result};
use crate::slice::NormalizedSlice;

/// Pixel written for uncovered slice positions.
pub const TRANSPARENT: RGBA8 = RGBA8 {
    r: 0,
    g: 0,
    b: 0,
    a: 0,
};

/// Something slices can be painted onto.
pub trait Surface {
    /// Resize the surface to `width × height` pixels. Pixel contents after
    /// a resize are unspecified.
    fn resize(&mut self, width: usize, height: usize) -> Result<()>;

    /// Mutable access to the pixels, row-major.
    fn pixels_mut(&mut self) -> &mut [RGBA8];
}

/// An in-memory RGBA raster.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<RGBA8>,
}

impl Raster {
    /// Create a transparent raster of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Raster {
            width,
            height,
            pixels: vec![TRANSPARENT; width * height],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[RGBA8] {
        &self.pixels
    }

    /// The pixel at `(x, y)`, if inside the raster.
    pub fn pixel(&self, x: usize, y: usize) -> Option<RGBA8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// The pixels as a flat `RGBARGBA...` byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Encode the raster as an RGBA PNG image.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        png::encode_rgba(self.as_bytes(), self.width, self.height).map_err(NiftiError::from)
    }
}

impl Surface for Raster {
    fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        let len = width
            .checked_mul(height)
            .ok_or_else(|| NiftiError::RenderFailure(format!("{}x{} raster", width, height)))?;
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(len, TRANSPARENT);
        Ok(())
    }

    fn pixels_mut(&mut self) -> &mut [RGBA8] {
        &mut self.pixels
    }
}

/// Map one normalized sample to a gray pixel.
#[inline]
pub fn gray(sample: f32) -> RGBA8 {
    let v = (sample.max(0.).min(1.) * 255.).round() as u8;
    RGBA8::new(v, v, v, 255)
}

/// Paint a slice onto a surface: gray levels for covered pixels,
/// fully transparent pixels elsewhere.
pub fn render<S>(slice: &NormalizedSlice, surface: &mut S) -> Result<()>
where
    S: Surface + ?Sized,
{
    surface.resize(slice.width(), slice.height())?;
    let pixels = surface.pixels_mut();
    let expected = slice.width() * slice.height();
    if pixels.len() != expected {
        return Err(NiftiError::RenderFailure(format!(
            "surface holds {} pixels, slice needs {}",
            pixels.len(),
            expected
        )));
    }
    for ((px, sample), covered) in pixels
        .iter_mut()
        .zip(slice.samples())
        .zip(slice.coverage())
    {
        *px = if *covered { gray(*sample) } else { TRANSPARENT };
    }
    Ok(())
}
