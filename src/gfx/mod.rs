// VDP graphics data: packed tiles, 16-color palettes, PNG export.
//
// # Modules
//
// - `color`   — 9-bit hardware color words
// - `palette` — 16-entry color line (CRAM layout)
// - `tiles`   — packed 8x8 tile data and pixel addressing

pub mod color;
pub mod palette;
pub mod tiles;

pub use color::Color;
pub use palette::Palette;
pub use tiles::Tiles;

/// Graphics export failures.
#[derive(Debug, thiserror::Error)]
pub enum GfxError {
    #[error("png encoding: {0}")]
    Png(#[from] png::EncodingError),

    #[error("unsupported bit depth {0}, expected 1, 2, 4 or 8")]
    UnsupportedDepth(usize),
}
