use crate::error::DecodeError;
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use serde::Serialize;
use std::io::Read;
use tracing::{debug, warn};

/// One way of decompressing the secure payload body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// zlib stream with header
    Zlib,
    /// raw deflate, no header
    Raw,
    Gzip,
    /// zlib after dropping a 2-byte prefix
    ZlibSkip2,
    /// raw deflate after dropping a 2-byte prefix
    RawSkip2,
}

/// Strategies in the order they are tried.
pub const CASCADE: [Strategy; 5] = [
    Strategy::Zlib,
    Strategy::Raw,
    Strategy::Gzip,
    Strategy::ZlibSkip2,
    Strategy::RawSkip2,
];

impl Strategy {
    /// Decompress `buf`; `None` on any error or empty output.
    pub fn apply(self, buf: &[u8]) -> Option<Vec<u8>> {
        let input = match self {
            Strategy::ZlibSkip2 | Strategy::RawSkip2 => buf.get(2..)?,
            _ => buf,
        };
        let mut out = Vec::new();
        let result = match self {
            Strategy::Zlib | Strategy::ZlibSkip2 => ZlibDecoder::new(input).read_to_end(&mut out),
            Strategy::Raw | Strategy::RawSkip2 => DeflateDecoder::new(input).read_to_end(&mut out),
            Strategy::Gzip => GzDecoder::new(input).read_to_end(&mut out),
        };
        match result {
            Ok(_) if !out.is_empty() => Some(out),
            Ok(_) => None,
            Err(err) => {
                debug!(strategy = ?self, %err, "decompression attempt failed");
                None
            }
        }
    }
}

/// What to do when every strategy in [`CASCADE`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecompressionPolicy {
    /// Tokenize the undecompressed buffer instead.
    #[default]
    Lenient,
    /// Fail with [`DecodeError::DecompressionFailed`].
    Strict,
}

/// Output of the cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decompressed {
    pub bytes: Vec<u8>,
    /// `None` when the raw buffer was used as-is.
    pub strategy: Option<Strategy>,
}

/// Run the cascade over `buf` under `policy`.
pub fn decompress(buf: &[u8], policy: DecompressionPolicy) -> Result<Decompressed, DecodeError> {
    for strategy in CASCADE {
        if let Some(bytes) = strategy.apply(buf) {
            debug!(?strategy, input = buf.len(), output = bytes.len(), "payload decompressed");
            return Ok(Decompressed {
                bytes,
                strategy: Some(strategy),
            });
        }
    }

    match policy {
        DecompressionPolicy::Strict => Err(DecodeError::DecompressionFailed),
        DecompressionPolicy::Lenient => {
            warn!(bytes = buf.len(), "all decompression strategies failed, using raw buffer");
            Ok(Decompressed {
                bytes: buf.to_vec(),
                strategy: None,
            })
        }
    }
}
