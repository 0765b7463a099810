#![no_main]

use libfuzzer_sys::fuzz_target;
use piedpiper::{HuffmanDecoder, HuffmanEncoder};

fuzz_target!(|data: &[u8]| {
    let mut encoder = HuffmanEncoder::default();
    encoder.pack(data).unwrap();
    let (report, compressed) = encoder.finish().unwrap();
    assert_eq!(report.container_len, compressed.len());

    let mut decoder = HuffmanDecoder::default();
    assert_eq!(data, decoder.unpack(&compressed).unwrap());
});
