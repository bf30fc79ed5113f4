// Cartridge header at image offset 0x100.
//
// 256 bytes of fixed-width fields: text is Shift-JIS (Japanese releases use
// it for the domestic title), addresses are big-endian 32-bit words. The
// 16-bit checksum at 0x18E is the sum of every big-endian word from 0x200
// to the end of the image, truncated to 16 bits; the boot ROM of some
// consoles refuses to start a cartridge where it does not match.

use encoding_rs::SHIFT_JIS;

/// Header location within the image.
pub const HEADER_OFFSET: usize = 0x100;

/// Header size in bytes.
pub const HEADER_LEN: usize = 0x100;

/// First byte covered by the header checksum.
pub const CHECKSUM_START: usize = 0x200;

/// Absolute offset of the checksum word.
const CHECKSUM_OFFSET: usize = 0x18E;

/// The image is too short to carry a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("image is {len} bytes, a cartridge header needs at least {min}", min = CHECKSUM_START)]
pub struct TruncatedImage {
    pub len: usize,
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Decoded cartridge header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub console: String,
    pub copyright: String,
    pub domestic_title: String,
    pub international_title: String,
    pub serial_number: String,
    pub checksum: u16,
    pub devices: String,
    pub rom_start: u32,
    pub rom_end: u32,
    pub ram_start: u32,
    pub ram_end: u32,
    pub sram_type: [u8; 4],
    pub sram_start: u32,
    pub sram_end: u32,
    pub modem: String,
    pub reserved1: [u8; 40],
    pub region: String,
    pub reserved2: [u8; 13],
}

impl Header {
    /// Decode the header fields of a full cartridge image.
    pub fn parse(image: &[u8]) -> Result<Self, TruncatedImage> {
        if image.len() < CHECKSUM_START {
            return Err(TruncatedImage { len: image.len() });
        }
        let h = &image[HEADER_OFFSET..HEADER_OFFSET + HEADER_LEN];
        let mut reserved1 = [0u8; 40];
        reserved1.copy_from_slice(&h[0xC8..0xF0]);
        let mut reserved2 = [0u8; 13];
        reserved2.copy_from_slice(&h[0xF3..0x100]);
        let mut sram_type = [0u8; 4];
        sram_type.copy_from_slice(&h[0xB0..0xB4]);
        Ok(Self {
            console: decode_sjis(&h[0x00..0x10]),
            copyright: decode_sjis(&h[0x10..0x20]),
            domestic_title: decode_sjis(&h[0x20..0x50]),
            international_title: decode_sjis(&h[0x50..0x80]),
            serial_number: decode_sjis(&h[0x80..0x8E]),
            checksum: u16::from_be_bytes([h[0x8E], h[0x8F]]),
            devices: decode_sjis(&h[0x90..0xA0]),
            rom_start: be32(&h[0xA0..0xA4]),
            rom_end: be32(&h[0xA4..0xA8]),
            ram_start: be32(&h[0xA8..0xAC]),
            ram_end: be32(&h[0xAC..0xB0]),
            sram_type,
            sram_start: be32(&h[0xB4..0xB8]),
            sram_end: be32(&h[0xB8..0xBC]),
            modem: decode_sjis(&h[0xBC..0xC8]),
            reserved1,
            region: decode_sjis(&h[0xF0..0xF3]),
            reserved2,
        })
    }

    /// Re-serialize to the 256-byte wire layout. Text fields are encoded
    /// back to Shift-JIS, space-padded or truncated to their fixed widths.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        put_sjis(&mut out[0x00..0x10], &self.console);
        put_sjis(&mut out[0x10..0x20], &self.copyright);
        put_sjis(&mut out[0x20..0x50], &self.domestic_title);
        put_sjis(&mut out[0x50..0x80], &self.international_title);
        put_sjis(&mut out[0x80..0x8E], &self.serial_number);
        out[0x8E..0x90].copy_from_slice(&self.checksum.to_be_bytes());
        put_sjis(&mut out[0x90..0xA0], &self.devices);
        out[0xA0..0xA4].copy_from_slice(&self.rom_start.to_be_bytes());
        out[0xA4..0xA8].copy_from_slice(&self.rom_end.to_be_bytes());
        out[0xA8..0xAC].copy_from_slice(&self.ram_start.to_be_bytes());
        out[0xAC..0xB0].copy_from_slice(&self.ram_end.to_be_bytes());
        out[0xB0..0xB4].copy_from_slice(&self.sram_type);
        out[0xB4..0xB8].copy_from_slice(&self.sram_start.to_be_bytes());
        out[0xB8..0xBC].copy_from_slice(&self.sram_end.to_be_bytes());
        put_sjis(&mut out[0xBC..0xC8], &self.modem);
        out[0xC8..0xF0].copy_from_slice(&self.reserved1);
        put_sjis(&mut out[0xF0..0xF3], &self.region);
        out[0xF3..0x100].copy_from_slice(&self.reserved2);
        out
    }

    /// Write this header back into a full image.
    pub fn patch(&self, image: &mut [u8]) -> Result<(), TruncatedImage> {
        if image.len() < CHECKSUM_START {
            return Err(TruncatedImage { len: image.len() });
        }
        image[HEADER_OFFSET..HEADER_OFFSET + HEADER_LEN].copy_from_slice(&self.to_bytes());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Checksum
// ---------------------------------------------------------------------------

/// Sum of all big-endian 16-bit words from 0x200 to the end of the image,
/// truncated to 16 bits. A trailing odd byte does not contribute.
pub fn word_checksum(image: &[u8]) -> u16 {
    image[CHECKSUM_START.min(image.len())..]
        .chunks_exact(2)
        .fold(0u16, |sum, w| {
            sum.wrapping_add(u16::from_be_bytes([w[0], w[1]]))
        })
}

/// Recompute the checksum and patch it into the image. Returns the value
/// written.
pub fn update_checksum(image: &mut [u8]) -> Result<u16, TruncatedImage> {
    if image.len() < CHECKSUM_START {
        return Err(TruncatedImage { len: image.len() });
    }
    let sum = word_checksum(image);
    image[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&sum.to_be_bytes());
    Ok(sum)
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn be32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn decode_sjis(bytes: &[u8]) -> String {
    let (text, _, _) = SHIFT_JIS.decode(bytes);
    text.into_owned()
}

fn put_sjis(slot: &mut [u8], text: &str) {
    let (encoded, _, _) = SHIFT_JIS.encode(text);
    let n = encoded.len().min(slot.len());
    slot[..n].copy_from_slice(&encoded[..n]);
    slot[n..].fill(b' ');
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
