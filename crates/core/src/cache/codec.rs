//! Payload compression for cached article bodies.
//!
//! Content is stored as a zlib stream. The Adler-32 trailer lets a damaged
//! or foreign blob be rejected on read instead of yielding garbage.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::Error;

/// Compress article text for storage.
pub fn compress(text: &str) -> Result<Vec<u8>, Error> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(text.len() / 2), Compression::default());
    encoder
        .write_all(text.as_bytes())
        .map_err(|e| Error::CacheWriteFailed(format!("compression failed: {e}")))?;
    encoder
        .finish()
        .map_err(|e| Error::CacheWriteFailed(format!("compression failed: {e}")))
}

/// Decompress a stored blob back into article text.
pub fn decompress(blob: &[u8]) -> Result<String, Error> {
    let mut decoder = ZlibDecoder::new(blob);
    let mut text = String::new();
    decoder
        .read_to_string(&mut text)
        .map_err(|e| Error::CorruptCacheEntry(format!("decompression failed: {e}")))?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_html() {
        let html = "<article><h1>Hello</h1><p>World &amp; friends</p></article>";
        let blob = compress(html).unwrap();
        assert_eq!(decompress(&blob).unwrap(), html);
    }

    #[test]
    fn test_round_trip_empty() {
        let blob = compress("").unwrap();
        assert_eq!(decompress(&blob).unwrap(), "");
    }

    #[test]
    fn test_round_trip_multibyte() {
        let text = "日本語のテキスト, émoji 🎉 and ümlauts";
        let blob = compress(text).unwrap();
        assert_eq!(decompress(&blob).unwrap(), text);
    }

    #[test]
    fn test_compresses_repetitive_content() {
        let text = "<p>lorem ipsum dolor sit amet</p>".repeat(500);
        let blob = compress(&text).unwrap();
        assert!(blob.len() < text.len() / 4);
        assert_eq!(decompress(&blob).unwrap(), text);
    }

    #[test]
    fn test_deterministic() {
        let a = compress("same input").unwrap();
        let b = compress("same input").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_foreign_blob_is_corrupt() {
        let result = decompress(b"definitely not zlib");
        assert!(matches!(result, Err(Error::CorruptCacheEntry(_))));
    }

    #[test]
    fn test_flipped_byte_is_corrupt() {
        let mut blob = compress(&"checksum me ".repeat(20)).unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0xff;
        assert!(matches!(decompress(&blob), Err(Error::CorruptCacheEntry(_))));
    }

    #[test]
    fn test_invalid_utf8_is_corrupt() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[0xff, 0xfe, 0xfd]).unwrap();
        let blob = encoder.finish().unwrap();
        assert!(matches!(decompress(&blob), Err(Error::CorruptCacheEntry(_))));
    }
}
