// Gzip envelope for response bodies

use std::io::{Read, Write};

use flate2::{Compression, read::GzDecoder, write::GzEncoder};

use crate::error::CompressionError;

pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// Gzip `data` at maximum compression effort
pub fn compress(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2 + 32), Compression::best());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

// client-side counterpart: inflate gzip payloads, pass everything else through
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    if !is_gzip(data) {
        return Ok(data.to_vec());
    }
    let mut out = Vec::new();
    GzDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}
