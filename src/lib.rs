//! Segamd: tools for Sega Genesis / Mega Drive cartridge images.
//!
//! The crate provides:
//! - Cartridge compression codecs, wire-exact with the original games (`codec`)
//! - ROM image loading and cursor reads (`rom`)
//! - Cartridge header decoding and checksum repair (`header`)
//! - Tile graphics and palette handling with PNG export (`gfx`)
//! - Raw PCM to WAV transcoding (`pcm`)
//! - Image digest checksums (`checksum`) and byte-range splitting (`split`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use segamd::codec::Codec;
//! use segamd::rom::Rom;
//!
//! let data = vec![0u8; 64];
//!
//! let packed = Codec::select("SEGARD", Rom::new(data.clone()))
//!     .unwrap()
//!     .encode()
//!     .unwrap();
//! let unpacked = Codec::select("SEGARD", Rom::new(packed))
//!     .unwrap()
//!     .decode()
//!     .unwrap();
//! assert_eq!(unpacked, data);
//! ```

pub mod checksum;
pub mod codec;
pub mod gfx;
pub mod header;
pub mod pcm;
pub mod rom;
pub mod split;

#[cfg(feature = "cli")]
pub mod cli;
