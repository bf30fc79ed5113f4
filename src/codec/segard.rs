// SEGARD run/mask codec.
//
// Early first-party titles (Altered Beast, Golden Axe, Columns, ...) store
// graphics in this format. Data is processed in 32-byte chunks; byte values
// repeated more than 5 times in a chunk are described once, with a 32-bit
// mask of the positions they occupy. Remaining positions follow as literals.
//
// Wire format, big-endian:
//   chain      = count(u8) , { value(u8), mask(u32) } * count , literals
//   literals   = one byte per 0 bit of the OR of all masks, MSB first
//   terminator = 0xFF, doubled iff the stream length so far is even
//
// A trailing input chunk shorter than 32 bytes is dropped entirely; the
// format has no way to express it. Decode output is therefore always a
// multiple of 32 bytes and may be longer than the original input.

use crate::rom::Rom;

/// Chunk size; the unit of compression.
const CHUNK: usize = 32;

/// A byte value must occur strictly more than this many times in a chunk
/// to earn a mask entry.
const CANDIDATE_THRESHOLD: u16 = 5;

/// End-of-stream marker. Chunks can never carry this repeat count: at most
/// five values fit six-or-more occurrences into 32 bytes.
const TERMINATOR: u8 = 0xFF;

/// Run/mask codec bound to a byte source.
#[derive(Debug)]
pub struct Segard {
    rom: Rom,
}

impl Segard {
    pub fn new(rom: Rom) -> Self {
        Self { rom }
    }

    /// Compress the whole underlying buffer.
    ///
    /// Deterministic single pass; cannot fail.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for chunk in self.rom.data().chunks_exact(CHUNK) {
            encode_chunk(chunk, &mut out);
        }
        out.push(TERMINATOR);
        // The stream must end on an odd total length.
        if out.len() % 2 == 0 {
            out.push(TERMINATOR);
        }
        out
    }

    /// Decompress from the cursor position until the terminator.
    ///
    /// Running out of input is treated as an implicit terminator; the
    /// format carries no integrity check, so corruption shows up only as
    /// wrong output bytes.
    pub fn decode(&mut self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut chunk = [0u8; CHUNK];
        let Ok(mut repeats) = self.rom.read_u8() else {
            return out;
        };
        while repeats != TERMINATOR {
            let mut pattern = 0u32;
            for _ in 0..repeats {
                let Ok(value) = self.rom.read_u8() else { break };
                let Ok(mask) = self.rom.read_u32() else { break };
                pattern |= mask;
                for (i, slot) in chunk.iter_mut().enumerate() {
                    if mask >> (31 - i) & 1 != 0 {
                        *slot = value;
                    }
                }
            }
            if pattern != u32::MAX {
                'literals: for (i, slot) in chunk.iter_mut().enumerate() {
                    if pattern >> (31 - i) & 1 == 0 {
                        match self.rom.read_u8() {
                            Ok(b) => *slot = b,
                            Err(_) => break 'literals,
                        }
                    }
                }
            }
            out.extend_from_slice(&chunk);
            match self.rom.read_u8() {
                Ok(r) => repeats = r,
                Err(_) => break,
            }
        }
        out
    }
}

/// Encode one 32-byte chunk, appending its chain to `out`.
fn encode_chunk(chunk: &[u8], out: &mut Vec<u8>) {
    let mut counts = [0u16; 256];
    for &b in chunk {
        counts[usize::from(b)] += 1;
    }

    // Candidates serialize in first-occurrence order; the decoder relies on
    // later masks overwriting earlier ones position by position.
    let mut order: Vec<u8> = Vec::new();
    for &b in chunk {
        if counts[usize::from(b)] > CANDIDATE_THRESHOLD && !order.contains(&b) {
            order.push(b);
        }
    }

    out.push(order.len() as u8);
    let mut nonrepeat = 0u32;
    for &value in &order {
        let mut mask = 0u32;
        for &b in chunk {
            mask <<= 1;
            if b == value {
                mask |= 1;
            }
        }
        out.push(value);
        out.extend_from_slice(&mask.to_be_bytes());
        nonrepeat |= mask;
    }

    // Positions no mask covered are emitted verbatim, MSB first.
    if nonrepeat != u32::MAX {
        for (i, &b) in chunk.iter().enumerate() {
            if nonrepeat >> (31 - i) & 1 == 0 {
                out.push(b);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
