// Sliding-window length/offset codec used by Namco and Technosoft titles.
//
// Classic LZSS over a 4096-byte circular history buffer. The window is
// seeded with zero bytes and the write cursor starts at 0xFEE; both values
// are part of the wire contract and must not change.
//
// Wire format, big-endian:
//   header = uncompressed size (u16)
//   body   = { flag(u8) , up to 8 items }, flag bits LSB first:
//              1 -> one literal byte
//              0 -> token(u16): OOOOOOOO OOOOLLLL
//                   length = LLLL + 3, offset = low 12 bits reassembled
//
// Decoding stops once the declared size has been produced. Copies are
// resolved byte by byte: the offset may point at data the same copy is in
// the middle of writing.

use super::bitfield::BitField8;
use super::window::HistoryWindow;
use super::CodecError;
use crate::rom::Rom;

/// Shortest back-reference worth a token.
const MIN_MATCH: usize = 3;

/// Longest back-reference a token can carry (4-bit length field).
const MAX_MATCH: usize = 18;

/// History buffer capacity.
const WINDOW_SIZE: usize = 0x1000;

/// Initial write cursor. Load-bearing: tokens address the window in
/// absolute positions, so encoder and decoder must agree on it.
const WINDOW_START: usize = 0xFEE;

/// Window seed byte.
const WINDOW_FILL: u8 = 0x00;

/// Sliding-window codec bound to a byte source.
#[derive(Debug)]
pub struct Lzss {
    rom: Rom,
}

impl Lzss {
    pub fn new(rom: Rom) -> Self {
        Self { rom }
    }

    /// Compress the whole underlying buffer.
    ///
    /// Fails only if the input cannot be described by the 16-bit size
    /// header; nothing is emitted in that case.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let input = self.rom.data();
        if input.len() > usize::from(u16::MAX) {
            return Err(CodecError::InputTooLarge { len: input.len() });
        }

        let mut out = Vec::new();
        out.extend_from_slice(&(input.len() as u16).to_be_bytes());

        let mut window = HistoryWindow::new(WINDOW_SIZE, WINDOW_FILL);
        window.set_cursor(WINDOW_START);

        let mut flags = BitField8::new();
        let mut group: Vec<u8> = Vec::with_capacity(16);
        let mut bit = 0usize;
        let mut pos = 0usize;
        while pos < input.len() {
            if bit > 7 {
                out.push(flags.value());
                out.extend_from_slice(&group);
                group.clear();
                flags = BitField8::new();
                bit = 0;
            }
            let (offset, length) = find_match(&window, input, pos);
            if length >= MIN_MATCH {
                flags.clear_bit(bit);
                let token = pack_token(offset, length);
                group.push((token >> 8) as u8);
                group.push((token & 0xFF) as u8);
                for _ in 0..length {
                    window.push(input[pos]);
                    pos += 1;
                }
            } else {
                flags.set_bit(bit);
                group.push(input[pos]);
                window.push(input[pos]);
                pos += 1;
            }
            bit += 1;
        }
        if bit > 0 {
            out.push(flags.value());
            out.extend_from_slice(&group);
        }
        Ok(out)
    }

    /// Decompress from the cursor position.
    ///
    /// Running out of input before the size header is satisfied means the
    /// stream is truncated or corrupt and is a hard error.
    pub fn decode(&mut self) -> Result<Vec<u8>, CodecError> {
        let size = usize::from(self.rom.read_u16()?);
        let mut window = HistoryWindow::new(WINDOW_SIZE, WINDOW_FILL);
        window.set_cursor(WINDOW_START);

        let mut out = Vec::with_capacity(size);
        while out.len() < size {
            let mut flags = BitField8::new();
            flags.set_value(self.rom.read_u8()?);
            for bit in 0..8 {
                if out.len() >= size {
                    break;
                }
                if flags.bit(bit) {
                    let b = self.rom.read_u8()?;
                    out.push(b);
                    window.push(b);
                } else {
                    let token = self.rom.read_u16()?;
                    let length = usize::from(token & 0x0F) + MIN_MATCH;
                    let offset = usize::from((token & 0xF0) << 4 | token >> 8);
                    for j in 0..length {
                        if out.len() >= size {
                            break;
                        }
                        let b = window.get((offset + j) as isize);
                        out.push(b);
                        window.push(b);
                    }
                }
            }
        }
        Ok(out)
    }
}

/// Pack a window offset and match length into a 16-bit token.
///
/// Only the low 12 bits of the offset survive; negative offsets from the
/// backward scan wrap into window positions the same way the buffer does.
fn pack_token(offset: isize, length: usize) -> u16 {
    let off = (offset & (WINDOW_SIZE as isize - 1)) as u16;
    (off & 0xFF) << 8 | (off >> 4) & 0xF0 | (length - MIN_MATCH) as u16
}

/// Find the longest window match for the input at `pos`.
///
/// Brute-force scan over every window start, newest first relative to the
/// write cursor. Matches never reach the cursor itself (that region is the
/// data still being produced) and equal lengths resolve to the latest
/// scanned start, which is what the original hardware decompressors were
/// paired with. Returns a length below `MIN_MATCH` when no usable match
/// exists.
fn find_match(window: &HistoryWindow, input: &[u8], pos: usize) -> (isize, usize) {
    if pos + MIN_MATCH >= input.len() {
        return (0, 0);
    }
    let cursor = window.cursor() as isize;
    let mut best_off = 0isize;
    let mut best_len = 0usize;
    for i in 0..=(WINDOW_SIZE + MAX_MATCH) as isize {
        let mut len = 0usize;
        while pos + len < input.len() {
            let wo = cursor - i + len as isize;
            if wo >= cursor || window.get(wo) != input[pos + len] {
                break;
            }
            if len >= MAX_MATCH {
                break;
            }
            len += 1;
        }
        if len >= best_len {
            best_len = len;
            best_off = cursor - i;
        }
    }
    (best_off, best_len)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(data: &[u8]) -> Vec<u8> {
        Lzss::new(Rom::new(data.to_vec())).encode().unwrap()
    }

    fn decode(stream: &[u8]) -> Result<Vec<u8>, CodecError> {
        Lzss::new(Rom::new(stream.to_vec())).decode()
    }

    fn roundtrip(data: &[u8]) {
        let stream = encode(data);
        assert_eq!(decode(&stream).unwrap(), data, "input {data:02X?}");
    }

    #[test]
    fn short_literal_run() {
        // Too short for any match: header, one flag byte of literals.
        let data = [0x41, 0x41, 0x41, 0x42, 0x41, 0x41, 0x41];
        let stream = encode(&data);
        assert_eq!(
            stream,
            [0x00, 0x07, 0x7F, 0x41, 0x41, 0x41, 0x42, 0x41, 0x41, 0x41]
        );
        assert_eq!(decode(&stream).unwrap(), data);
    }

    #[test]
    fn repeated_run_emits_tokens() {
        let stream = encode(&[0x10; 12]);
        assert_eq!(
            stream,
            [0x00, 0x0C, 0x07, 0x10, 0x10, 0x10, 0xEE, 0xF0, 0xEE, 0xF3]
        );
        assert_eq!(decode(&stream).unwrap(), vec![0x10; 12]);
    }

    #[test]
    fn self_referential_copy() {
        // Hand-built stream: one literal, then a 5-byte copy whose offset
        // points at the byte the copy itself keeps extending.
        let stream = [0x00, 0x06, 0x01, 0xAB, 0xEE, 0xF2];
        assert_eq!(decode(&stream).unwrap(), vec![0xAB; 6]);
    }

    #[test]
    fn empty_input() {
        let stream = encode(&[]);
        assert_eq!(stream, [0x00, 0x00]);
        assert_eq!(decode(&stream).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn roundtrips_mixed_content() {
        roundtrip(b"abcabcabcabcabc");
        roundtrip(b"the quick brown fox jumps over the lazy dog");
        roundtrip(&[0xFF; 1000]);
        let ramp: Vec<u8> = (0..600u32).map(|i| (i % 251) as u8).collect();
        roundtrip(&ramp);
    }

    #[test]
    fn truncated_stream_is_an_error() {
        let mut stream = encode(&[0x10; 12]);
        stream.truncate(stream.len() - 1);
        assert!(matches!(
            decode(&stream),
            Err(CodecError::SourceExhausted(_))
        ));
        // A bare header promising data it does not have.
        assert!(matches!(
            decode(&[0x00, 0x04]),
            Err(CodecError::SourceExhausted(_))
        ));
    }

    #[test]
    fn oversized_input_is_rejected() {
        let codec = Lzss::new(Rom::new(vec![0u8; 0x10000]));
        assert!(matches!(
            codec.encode(),
            Err(CodecError::InputTooLarge { len: 0x10000 })
        ));
    }

    #[test]
    fn tokens_stay_inside_format_bounds() {
        // Walk an encoded stream and check every token field.
        let data: Vec<u8> = (0..2048u32).map(|i| (i / 7 % 16) as u8).collect();
        let stream = encode(&data);
        let mut rom = Rom::new(stream);
        let size = usize::from(rom.read_u16().unwrap());
        let mut produced = 0usize;
        'stream: while produced < size {
            let flags = rom.read_u8().unwrap();
            for bit in 0..8 {
                if produced >= size {
                    break 'stream;
                }
                if flags >> bit & 1 != 0 {
                    rom.read_u8().unwrap();
                    produced += 1;
                } else {
                    let token = rom.read_u16().unwrap();
                    let length = usize::from(token & 0x0F) + MIN_MATCH;
                    let offset = usize::from(token & 0xF0) << 4 | usize::from(token >> 8);
                    assert!((MIN_MATCH..=MAX_MATCH).contains(&length));
                    assert!(offset < WINDOW_SIZE);
                    produced += length;
                }
            }
        }
        assert_eq!(produced, size);
    }
}
