// Cartridge compression codecs.
//
// Two wire formats with real logic survive from the original tool's long
// list of scheme names; everything else there was an empty placeholder and
// is deliberately absent here.
//
// # Modules
//
// - `bitfield` — fixed-width 8/16/32-bit bit vectors
// - `window`   — circular history buffer for back-references
// - `segard`   — run/pattern masks over 32-byte chunks
// - `lzss`     — length/offset back-references (Namco and Technosoft builds)

pub mod bitfield;
pub mod lzss;
pub mod segard;
pub mod window;

use crate::rom::{Exhausted, Rom};

pub use bitfield::{BitField8, BitField16, BitField32};
pub use lzss::Lzss;
pub use segard::Segard;
pub use window::HistoryWindow;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Codec and registry failures.
///
/// Decoded output is never validated against a checksum; corrupt input that
/// still parses produces wrong bytes, not an error. Integrity checking is
/// the caller's job.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The requested algorithm name is not in the registry.
    #[error("unknown compression algorithm {0:?}")]
    UnknownAlgorithm(String),

    /// The compressed stream ended before the codec was done with it.
    #[error("compressed stream truncated: {0}")]
    SourceExhausted(#[from] Exhausted),

    /// The input does not fit the format's 16-bit uncompressed-size header.
    #[error("input is {len} bytes, limit is 65535")]
    InputTooLarge { len: usize },
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// A codec bound to a byte source, selected by algorithm name.
///
/// Closed set: one variant per wire format. `NAMCO` and `TECHNOSOFT` name
/// the same format and share the [`Lzss`] implementation.
#[derive(Debug)]
pub enum Codec {
    Segard(Segard),
    Lzss(Lzss),
}

impl Codec {
    /// Algorithm names accepted by [`Codec::select`].
    pub const ALGORITHMS: [&'static str; 3] = ["SEGARD", "NAMCO", "TECHNOSOFT"];

    /// Look up `algorithm` and bind it to `rom`.
    pub fn select(algorithm: &str, rom: Rom) -> Result<Self, CodecError> {
        match algorithm {
            "SEGARD" => Ok(Self::Segard(Segard::new(rom))),
            "NAMCO" | "TECHNOSOFT" => Ok(Self::Lzss(Lzss::new(rom))),
            _ => Err(CodecError::UnknownAlgorithm(algorithm.to_owned())),
        }
    }

    /// Compress the whole underlying buffer.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Segard(codec) => Ok(codec.encode()),
            Self::Lzss(codec) => codec.encode(),
        }
    }

    /// Decompress starting at the source's cursor position.
    pub fn decode(&mut self) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Segard(codec) => Ok(codec.decode()),
            Self::Lzss(codec) => codec.decode(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
