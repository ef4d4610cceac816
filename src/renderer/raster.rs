//! Square RGB pixel buffers

use bytemuck::{Pod, Zeroable};

/// One 8-bit RGB pixel
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Scene colors
pub mod colors {
    use super::Rgb;

    pub const BACKGROUND: Rgb = Rgb::new(255, 255, 255);
    pub const AGENT: Rgb = Rgb::new(0, 255, 0);
    pub const INDICATOR: Rgb = Rgb::new(0, 0, 0);
    pub const WALL: Rgb = Rgb::new(0, 0, 0);
    pub const GOLD: Rgb = Rgb::new(255, 200, 0);
}

/// Channels per pixel
pub const CHANNELS: usize = 3;

/// A square raster, row-major, `(0, 0)` at the top-left
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    size: u32,
    pixels: Vec<Rgb>,
}

impl Raster {
    pub fn new(size: u32, fill: Rgb) -> Self {
        Self {
            size,
            pixels: vec![fill; (size as usize) * (size as usize)],
        }
    }

    /// Edge length in pixels
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// `(height, width, channels)`
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.size as usize, self.size as usize, CHANNELS)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        (x < self.size && y < self.size).then(|| self.pixels[self.index(x, y)])
    }

    /// Write a pixel; out-of-bounds writes are dropped
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Rgb) {
        if x < self.size && y < self.size {
            let i = self.index(x, y);
            self.pixels[i] = color;
        }
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn row(&self, y: u32) -> &[Rgb] {
        let start = self.index(0, y);
        &self.pixels[start..start + self.size as usize]
    }

    /// Interleaved RGB bytes without copying
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Copy a `window x window` block whose top-left pixel is `(left, top)`
    ///
    /// Caller guarantees the block lies inside the raster.
    pub fn window(&self, left: u32, top: u32, window: u32) -> Raster {
        let mut pixels = Vec::with_capacity((window as usize) * (window as usize));
        for y in top..top + window {
            let start = self.index(left, y);
            pixels.extend_from_slice(&self.pixels[start..start + window as usize]);
        }
        Raster {
            size: window,
            pixels,
        }
    }

    /// Channel-major `(3, H, W)` floats in 0..=255
    pub fn to_planar_f32(&self) -> Vec<f32> {
        let n = self.pixels.len();
        let mut out = vec![0.0; n * CHANNELS];
        let (r, rest) = out.split_at_mut(n);
        let (g, b) = rest.split_at_mut(n);
        for (i, px) in self.pixels.iter().enumerate() {
            r[i] = px.r as f32;
            g[i] = px.g as f32;
            b[i] = px.b as f32;
        }
        out
    }

    /// Count pixels of one color
    pub fn count(&self, color: Rgb) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }
}
