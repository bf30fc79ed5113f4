#![no_main]
use libfuzzer_sys::fuzz_target;
use segamd::codec::Codec;
use segamd::rom::Rom;

fuzz_target!(|data: &[u8]| {
    // Fuzz both decoders with arbitrary bytes.
    // Decoding must never panic — only return errors or garbage output.
    for algorithm in ["SEGARD", "NAMCO"] {
        let mut codec = Codec::select(algorithm, Rom::new(data.to_vec())).unwrap();
        let _ = codec.decode();
    }

    // Also start mid-buffer, like a stream embedded in a ROM.
    if data.len() >= 2 {
        let mut rom = Rom::new(data.to_vec());
        rom.seek(data.len() / 2);
        let mut codec = Codec::select("NAMCO", rom).unwrap();
        let _ = codec.decode();
    }
});
