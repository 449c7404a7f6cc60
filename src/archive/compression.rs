//! Gzip envelope of `.tachibk` files.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Compress a protobuf payload with gzip
pub fn compress(payload: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload)?;
    encoder.finish()
}

/// Strip the gzip envelope
pub fn decompress(content: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(content);
    let mut payload = Vec::new();
    decoder.read_to_end(&mut payload)?;
    Ok(payload)
}
