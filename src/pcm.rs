// Raw PCM sample data.
//
// Z80 sound drivers play raw signed 8-bit samples straight out of the
// cartridge. Transcoding to and from WAV only wraps or unwraps the
// container; sample values are untouched.

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

/// WAV container failures and unsupported source formats.
#[derive(Debug, thiserror::Error)]
pub enum PcmError {
    #[error("wav container: {0}")]
    Wav(#[from] hound::Error),

    #[error("unsupported wav format: {bits}-bit {format:?}, expected 8-bit int")]
    UnsupportedFormat { bits: u16, format: SampleFormat },
}

/// Stream parameters for raw PCM, supplied by the caller; raw dumps carry
/// no self-description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub channels: u16,
    pub sample_rate: u32,
}

impl PcmFormat {
    /// Wrap raw signed 8-bit samples in a WAV container.
    pub fn to_wav(self, data: &[u8]) -> Result<Vec<u8>, PcmError> {
        let spec = WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 8,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &b in data {
            writer.write_sample(b as i8)?;
        }
        writer.finalize()?;
        Ok(cursor.into_inner())
    }
}

/// Unwrap an 8-bit WAV file back to raw signed samples.
pub fn from_wav(data: &[u8]) -> Result<Vec<u8>, PcmError> {
    let mut reader = WavReader::new(Cursor::new(data))?;
    let spec = reader.spec();
    if spec.bits_per_sample != 8 || spec.sample_format != SampleFormat::Int {
        return Err(PcmError::UnsupportedFormat {
            bits: spec.bits_per_sample,
            format: spec.sample_format,
        });
    }
    let mut out = Vec::with_capacity(reader.len() as usize);
    for sample in reader.samples::<i8>() {
        out.push(sample? as u8);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_roundtrip_preserves_samples() {
        let pcm: Vec<u8> = (0..=255u16).map(|v| v as u8).collect();
        let format = PcmFormat {
            channels: 1,
            sample_rate: 4000,
        };
        let wav = format.to_wav(&pcm).unwrap();
        assert_eq!(from_wav(&wav).unwrap(), pcm);
    }

    #[test]
    fn wav_spec_matches_format() {
        let format = PcmFormat {
            channels: 2,
            sample_rate: 22050,
        };
        let wav = format.to_wav(&[0x00, 0x7F, 0x80, 0xFF]).unwrap();
        let reader = WavReader::new(Cursor::new(&wav)).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().sample_rate, 22050);
        assert_eq!(reader.spec().bits_per_sample, 8);
    }

    #[test]
    fn non_8bit_wav_is_rejected() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        writer.write_sample(1234i16).unwrap();
        writer.finalize().unwrap();
        assert!(matches!(
            from_wav(&cursor.into_inner()),
            Err(PcmError::UnsupportedFormat { bits: 16, .. })
        ));
    }

    #[test]
    fn garbage_is_not_a_wav() {
        assert!(from_wav(b"not a riff chunk").is_err());
    }
}
