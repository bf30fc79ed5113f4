// End-to-end codec behavior through the public registry API.

use segamd::codec::{Codec, CodecError};
use segamd::rom::Rom;

fn roundtrip(algorithm: &str, data: &[u8]) -> Vec<u8> {
    let stream = Codec::select(algorithm, Rom::new(data.to_vec()))
        .unwrap()
        .encode()
        .unwrap();
    Codec::select(algorithm, Rom::new(stream))
        .unwrap()
        .decode()
        .unwrap()
}

#[test]
fn segard_forty_zero_bytes() {
    // Only the full 32-byte chunk survives; the trailing 8 bytes are lost
    // to the format, deliberately.
    assert_eq!(roundtrip("SEGARD", &[0u8; 40]), vec![0u8; 32]);
}

#[test]
fn segard_decode_length_is_a_multiple_of_32() {
    for len in [0usize, 31, 32, 33, 63, 64, 100] {
        let data: Vec<u8> = (0..len).map(|i| (i % 5) as u8).collect();
        let decoded = roundtrip("SEGARD", &data);
        assert_eq!(decoded.len(), len / 32 * 32, "input length {len}");
        assert_eq!(decoded, data[..decoded.len()], "input length {len}");
    }
}

#[test]
fn lzss_seven_byte_mixed_run() {
    let data = [0x41, 0x41, 0x41, 0x42, 0x41, 0x41, 0x41];
    assert_eq!(roundtrip("NAMCO", &data), data);
}

#[test]
fn unknown_algorithm_reports_an_error() {
    match Codec::select("UNKNOWN", Rom::new(vec![1, 2, 3])) {
        Err(CodecError::UnknownAlgorithm(name)) => assert_eq!(name, "UNKNOWN"),
        other => panic!("expected UnknownAlgorithm, got {other:?}"),
    }
}

#[test]
fn lzss_handles_a_window_of_history() {
    // Repeats separated by more than the 4096-byte window cannot be
    // referenced, but must still roundtrip.
    let mut data = Vec::new();
    data.extend_from_slice(&[0x11; 600]);
    data.extend((0..5000u32).map(|i| (i % 7) as u8));
    data.extend_from_slice(&[0x11; 600]);
    assert_eq!(roundtrip("NAMCO", &data), data);
}

#[test]
fn lzss_longest_input() {
    let data: Vec<u8> = (0..65535u32).map(|i| (i % 31) as u8).collect();
    assert_eq!(roundtrip("NAMCO", &data), data);
}

#[test]
fn lzss_one_byte_over_the_limit() {
    let codec = Codec::select("NAMCO", Rom::new(vec![0u8; 65536])).unwrap();
    assert!(matches!(
        codec.encode(),
        Err(CodecError::InputTooLarge { len: 65536 })
    ));
}

#[test]
fn lzss_roundtrips_seeded_random_blocks() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0x5EA6);
    for len in [1usize, 17, 255, 1024] {
        let data: Vec<u8> = (0..len).map(|_| rng.random()).collect();
        assert_eq!(roundtrip("NAMCO", &data), data, "length {len}");
    }
}

#[test]
fn segard_mixed_graphics_like_data() {
    // Tile-ish content: long zero runs with sparse detail bytes.
    let mut data = vec![0u8; 256];
    for (i, slot) in data.iter_mut().enumerate() {
        if i % 9 == 4 {
            *slot = (i % 3 + 1) as u8;
        }
    }
    assert_eq!(roundtrip("SEGARD", &data), data);
}
