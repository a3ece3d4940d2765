//! Output canvas for one stitch run.
//!
//! The surface is an RGBA pixel buffer sized `tile_size * width_tiles` by
//! `tile_size * height_tiles`, exclusively owned by a single run. Tiles are
//! drawn by grid slot; encoding consumes the surface.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// Pixel edge length of one source tile in the slippy-map convention.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// JPEG output quality, matching common tile-export tooling.
const JPEG_QUALITY: u8 = 90;

/// Errors raised when the output surface cannot be created.
///
/// Both are fatal to the run; no partial output is produced.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// Pixel dimensions are zero or overflow 32-bit image dimensions
    #[error(
        "cannot create a {width_tiles}x{height_tiles} tile surface at tile size {tile_size}: \
         pixel dimensions out of range"
    )]
    InvalidDimensions {
        width_tiles: u32,
        height_tiles: u32,
        tile_size: u32,
    },

    /// The pixel buffer could not be allocated
    #[error("failed to allocate {bytes} byte pixel buffer")]
    AllocationFailed { bytes: usize },
}

/// Encoding applied to the finished canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    /// Canonical lowercase name, as used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
        }
    }

    /// Parses a configuration name ("png", "jpeg"/"jpg").
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "png" => Some(OutputFormat::Png),
            "jpeg" | "jpg" => Some(OutputFormat::Jpeg),
            _ => None,
        }
    }

    /// Detects the format from a file extension, if recognizable.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_name)
    }

    /// File extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

/// Pixel buffer for one stitch run.
pub struct RenderSurface {
    canvas: RgbaImage,
    tile_size: u32,
    width_tiles: u32,
}

impl RenderSurface {
    /// Allocates a surface of `width_tiles x height_tiles` cells.
    ///
    /// Dimension arithmetic is checked and the buffer reservation is
    /// fallible, so oversized grids fail with a structured error instead
    /// of aborting the process.
    pub fn allocate(
        width_tiles: u32,
        height_tiles: u32,
        tile_size: u32,
    ) -> Result<Self, SurfaceError> {
        let invalid = || SurfaceError::InvalidDimensions {
            width_tiles,
            height_tiles,
            tile_size,
        };

        let width_px = width_tiles.checked_mul(tile_size).ok_or_else(invalid)?;
        let height_px = height_tiles.checked_mul(tile_size).ok_or_else(invalid)?;
        if width_px == 0 || height_px == 0 {
            return Err(invalid());
        }

        let bytes = (width_px as usize)
            .checked_mul(height_px as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(invalid)?;

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(bytes)
            .map_err(|_| SurfaceError::AllocationFailed { bytes })?;
        buffer.resize(bytes, 0);

        let canvas = RgbaImage::from_raw(width_px, height_px, buffer)
            .ok_or(SurfaceError::AllocationFailed { bytes })?;

        Ok(Self {
            canvas,
            tile_size,
            width_tiles,
        })
    }

    /// Surface width in pixels.
    #[inline]
    pub fn width_px(&self) -> u32 {
        self.canvas.width()
    }

    /// Surface height in pixels.
    #[inline]
    pub fn height_px(&self) -> u32 {
        self.canvas.height()
    }

    /// Draws a decoded tile into the cell for enumeration position `slot`.
    ///
    /// The cell's pixel offset is `((slot % width) * tile_size,
    /// (slot / width) * tile_size)`; combined with row-major enumeration
    /// this places tiles in geographic order without a per-tile coordinate
    /// lookup at draw time.
    pub fn draw_tile(&mut self, slot: usize, tile: &DynamicImage) {
        let x = (slot as u64 % self.width_tiles as u64) * self.tile_size as u64;
        let y = (slot as u64 / self.width_tiles as u64) * self.tile_size as u64;
        image::imageops::replace(&mut self.canvas, &tile.to_rgba8(), x as i64, y as i64);
    }

    /// Encodes the surface, consuming it.
    pub fn encode(self, format: OutputFormat) -> Result<Vec<u8>, image::ImageError> {
        let mut out = Cursor::new(Vec::new());

        match format {
            OutputFormat::Png => {
                self.canvas.write_to(&mut out, ImageFormat::Png)?;
            }
            OutputFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgba8(self.canvas).to_rgb8();
                let encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
                rgb.write_with_encoder(encoder)?;
            }
        }

        Ok(out.into_inner())
    }

    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> &image::Rgba<u8> {
        self.canvas.get_pixel(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid_tile(size: u32, rgba: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(size, size, Rgba(rgba)))
    }

    #[test]
    fn test_allocate_dimensions() {
        let surface = RenderSurface::allocate(3, 5, 256).unwrap();
        assert_eq!(surface.width_px(), 768);
        assert_eq!(surface.height_px(), 1280);
    }

    #[test]
    fn test_allocate_rejects_overflow() {
        let result = RenderSurface::allocate(u32::MAX, 2, 256);
        assert!(matches!(
            result,
            Err(SurfaceError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_allocate_rejects_zero() {
        assert!(matches!(
            RenderSurface::allocate(0, 1, 256),
            Err(SurfaceError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            RenderSurface::allocate(1, 1, 0),
            Err(SurfaceError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_draw_tile_offsets() {
        // 2x2 grid of 4px tiles; slots map row-major.
        let mut surface = RenderSurface::allocate(2, 2, 4).unwrap();

        surface.draw_tile(0, &solid_tile(4, [255, 0, 0, 255]));
        surface.draw_tile(1, &solid_tile(4, [0, 255, 0, 255]));
        surface.draw_tile(2, &solid_tile(4, [0, 0, 255, 255]));
        surface.draw_tile(3, &solid_tile(4, [255, 255, 0, 255]));

        assert_eq!(surface.pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(surface.pixel(4, 0), &Rgba([0, 255, 0, 255]));
        assert_eq!(surface.pixel(0, 4), &Rgba([0, 0, 255, 255]));
        assert_eq!(surface.pixel(7, 7), &Rgba([255, 255, 0, 255]));
    }

    #[test]
    fn test_encode_png_round_trips() {
        let mut surface = RenderSurface::allocate(2, 1, 4).unwrap();
        surface.draw_tile(0, &solid_tile(4, [10, 20, 30, 255]));
        surface.draw_tile(1, &solid_tile(4, [40, 50, 60, 255]));

        let bytes = surface.encode(OutputFormat::Png).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();

        assert_eq!(decoded.dimensions(), (8, 4));
        assert_eq!(decoded.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
        assert_eq!(decoded.get_pixel(4, 0), &Rgba([40, 50, 60, 255]));
    }

    #[test]
    fn test_encode_jpeg_produces_jpeg() {
        let surface = RenderSurface::allocate(1, 1, 8).unwrap();
        let bytes = surface.encode(OutputFormat::Jpeg).unwrap();

        // JPEG SOI marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_format_names() {
        assert_eq!(OutputFormat::from_name("png"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_name("JPG"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_name("webp"), None);
        assert_eq!(
            OutputFormat::from_path(Path::new("out/map.jpeg")),
            Some(OutputFormat::Jpeg)
        );
        assert_eq!(OutputFormat::Png.extension(), "png");
    }
}
