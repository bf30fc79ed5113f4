// One CRAM palette line.

use super::color::Color;

/// Colors per palette line.
pub const PALETTE_LEN: usize = 16;

/// A 16-entry palette decoded from big-endian color words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Color; PALETTE_LEN],
}

impl Palette {
    /// Decode 16 big-endian color words. Missing words read as black;
    /// entry 0 is transparent, as the hardware treats it.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut colors = [Color::default(); PALETTE_LEN];
        for (i, slot) in colors.iter_mut().enumerate() {
            let word = match data.get(i * 2..i * 2 + 2) {
                Some(w) => u16::from_be_bytes([w[0], w[1]]),
                None => 0,
            };
            *slot = Color::from_word(word);
        }
        colors[0].a = 0;
        Self { colors }
    }

    /// Entry `index`, wrapping at the palette size.
    pub fn color(&self, index: u8) -> Color {
        self.colors[usize::from(index) % PALETTE_LEN]
    }

    /// All entries in order.
    pub fn colors(&self) -> &[Color; PALETTE_LEN] {
        &self.colors
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
