// Packed tile data.
//
// Tiles are 8x8 pixels stored sequentially: 64 pixel values per tile, row
// by row. Source data packs 1, 2, 4 or 8 bits per pixel; unpacking expands
// to one byte per pixel up front so addressing stays uniform.

use std::io::Write;

use super::palette::Palette;
use super::GfxError;

/// A sheet of 8x8 tiles, `width` tiles per row.
#[derive(Debug, Clone)]
pub struct Tiles {
    raw: Vec<u8>,
    width: usize,
    height: usize,
}

impl Tiles {
    /// Unpack `data` at `bpp` bits per pixel into a sheet `width` tiles
    /// wide. The last row is padded with zero pixels when the data does
    /// not fill it.
    pub fn new(data: &[u8], width: usize, bpp: usize) -> Result<Self, GfxError> {
        let raw = unpack(data, bpp)?;
        let row_bytes = width * bpp * 8;
        let height = data.len().div_ceil(row_bytes.max(1)).max(1);
        Ok(Self { raw, width, height })
    }

    /// Sheet width in pixels.
    pub fn width_px(&self) -> usize {
        self.width * 8
    }

    /// Sheet height in pixels.
    pub fn height_px(&self) -> usize {
        self.height * 8
    }

    /// Pixel value at sheet coordinates; reads past the data are zero.
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        let tile = (y / 8) * self.width + x / 8;
        let index = tile * 64 + (y % 8) * 8 + x % 8;
        self.raw.get(index).copied().unwrap_or(0)
    }

    /// Render the sheet through `palette` as RGBA8, row-major.
    pub fn render_rgba(&self, palette: &Palette) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width_px() * self.height_px() * 4);
        for y in 0..self.height_px() {
            for x in 0..self.width_px() {
                out.extend_from_slice(&palette.color(self.pixel(x, y)).to_rgba8());
            }
        }
        out
    }

    /// Encode the sheet as a PNG.
    pub fn write_png<W: Write>(&self, palette: &Palette, writer: W) -> Result<(), GfxError> {
        let mut encoder =
            png::Encoder::new(writer, self.width_px() as u32, self.height_px() as u32);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut png_writer = encoder.write_header()?;
        png_writer.write_image_data(&self.render_rgba(palette))?;
        Ok(())
    }
}

/// Expand packed pixels to one byte each, most significant pixel first.
fn unpack(data: &[u8], bpp: usize) -> Result<Vec<u8>, GfxError> {
    let raw = match bpp {
        1 => data
            .iter()
            .flat_map(|&b| (0..8).rev().map(move |i| b >> i & 0x1))
            .collect(),
        2 => data
            .iter()
            .flat_map(|&b| [b >> 6, b >> 4 & 0x3, b >> 2 & 0x3, b & 0x3])
            .collect(),
        4 => data.iter().flat_map(|&b| [b >> 4, b & 0xF]).collect(),
        8 => data.to_vec(),
        other => return Err(GfxError::UnsupportedDepth(other)),
    };
    Ok(raw)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
