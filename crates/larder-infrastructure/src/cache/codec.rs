//! Cold tier envelope codec
//!
//! Values cross the wire as a JSON `CacheEntry<String>` whose `value` is the
//! JSON text of the cached value. Above the size threshold, and only for
//! patterns that enable it, the text is gzip-compressed and base64-encoded.

use std::io::{Read, Write};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use larder_domain::error::Result;
use larder_domain::value_objects::CacheEntry;
use serde_json::Value;

use crate::error_ext::ErrorContext;

/// Encodes values into cold tier envelopes and back
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeCodec {
    compression_threshold: usize,
}

impl EnvelopeCodec {
    pub fn new(compression_threshold: usize) -> Self {
        Self {
            compression_threshold,
        }
    }

    pub fn compression_threshold(&self) -> usize {
        self.compression_threshold
    }

    /// Wrap `value` in an envelope expiring after `ttl`
    pub fn encode(&self, value: &Value, ttl: Duration, compression: bool) -> Result<Vec<u8>> {
        let json = serde_json::to_string(value).serialization_context("Failed to encode value")?;
        let size = json.len();

        let entry = if compression && size > self.compression_threshold {
            CacheEntry::new(BASE64.encode(gzip(json.as_bytes())?), ttl, size).with_compressed(true)
        } else {
            CacheEntry::new(json, ttl, size)
        };

        serde_json::to_vec(&entry).serialization_context("Failed to encode envelope")
    }

    /// Unwrap an envelope; `None` once its embedded expiry has passed
    pub fn decode(&self, bytes: &[u8]) -> Result<Option<CacheEntry<Value>>> {
        let entry: CacheEntry<String> =
            serde_json::from_slice(bytes).serialization_context("Malformed cache envelope")?;
        if entry.is_expired() {
            return Ok(None);
        }

        let json = if entry.compressed {
            let compressed = BASE64
                .decode(entry.value.as_bytes())
                .serialization_context("Invalid base64 payload")?;
            gunzip(&compressed)?
        } else {
            entry.value.clone()
        };

        let value: Value =
            serde_json::from_str(&json).serialization_context("Failed to decode value")?;
        Ok(Some(entry.map(|_| value)))
    }
}

fn gzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(bytes)
        .serialization_context("Failed to compress payload")?;
    encoder
        .finish()
        .serialization_context("Failed to compress payload")
}

fn gunzip(bytes: &[u8]) -> Result<String> {
    let mut text = String::new();
    GzDecoder::new(bytes)
        .read_to_string(&mut text)
        .serialization_context("Failed to decompress payload")?;
    Ok(text)
}
