use anyhow::Result;
use log::*;
use rayon::prelude::*;
use std::path::Path;

/// 2D RGBA image, channels in [0, 1], row-major from the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl Raster {
    pub fn filled(width: u32, height: u32, pixel: [f32; 4]) -> Self {
        assert!(width > 0 && height > 0, "empty raster {}x{}", width, height);
        Self {
            width,
            height,
            pixels: vec![pixel; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> [f32; 4] {
        assert!(x < self.width && y < self.height);
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, pixel: [f32; 4]) {
        assert!(x < self.width && y < self.height);
        self.pixels[(y * self.width + x) as usize] = pixel;
    }

    /// Nearest-neighbor resample to the target dimensions.
    pub fn resized(&self, width: u32, height: u32) -> Raster {
        assert!(width > 0 && height > 0, "empty raster {}x{}", width, height);

        let mut pixels = vec![[0f32; 4]; (width * height) as usize];
        pixels
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                let sy = (y as u64 * self.height as u64 / height as u64) as u32;
                for (x, out) in row.iter_mut().enumerate() {
                    let sx = (x as u64 * self.width as u64 / width as u64) as u32;
                    *out = self.get(sx, sy);
                }
            });

        Raster {
            width,
            height,
            pixels,
        }
    }

    /// 256x256 output for the inference model. Square inputs scale directly;
    /// anything else scales by its larger side and pads the remainder with
    /// `border`, keeping the image anchored at the top-left.
    pub fn fit256(&self, border: [f32; 4]) -> Raster {
        const TARGET: u32 = 256;

        if self.width == self.height {
            return self.resized(TARGET, TARGET);
        }

        let (w, h) = if self.width > self.height {
            let ratio = self.height as f32 / self.width as f32;
            (TARGET, (TARGET as f32 * ratio).round() as u32)
        } else {
            let ratio = self.width as f32 / self.height as f32;
            ((TARGET as f32 * ratio).round() as u32, TARGET)
        };

        let scaled = self.resized(w.max(1), h.max(1));
        let mut out = Raster::filled(TARGET, TARGET, border);
        for y in 0..scaled.height {
            for x in 0..scaled.width {
                out.set(x, y, scaled.get(x, y));
            }
        }
        out
    }

    /// Writes a PNG, creating missing parent directories first.
    pub fn save_png(&self, path: &str) -> Result<()> {
        if let Some(dir) = Path::new(path).parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }

        let mut img = image::RgbaImage::new(self.width, self.height);
        for (x, y, px) in img.enumerate_pixels_mut() {
            let p = self.get(x, y);
            *px = image::Rgba(p.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8));
        }
        img.save(path)?;
        debug!("save_png: {}x{} -> {}", self.width, self.height, path);
        Ok(())
    }

    pub fn load_png(path: &str) -> Result<Raster> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|px| px.0.map(|v| v as f32 / 255.0))
            .collect();
        Ok(Raster {
            width,
            height,
            pixels,
        })
    }
}

/// Luminance with the usual perceptual weights.
pub fn grayscale(pixel: [f32; 4]) -> f32 {
    0.299 * pixel[0] + 0.587 * pixel[1] + 0.114 * pixel[2]
}

/// RGB to (hue, saturation, value), hue in degrees.
pub fn rgb_to_hsv(pixel: [f32; 4]) -> (f32, f32, f32) {
    let [r, g, b, _] = pixel;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta <= f32::EPSILON {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    let saturation = if max <= f32::EPSILON { 0.0 } else { delta / max };

    (hue, saturation, max)
}
