//! Attachment codec: gzip + base64 with a literal `GZIP:` wire tag.
//!
//! Stored attachments are text payloads in one of two shapes. Legacy rows
//! hold a plain resource reference (typically a `data:` URL) and are served
//! untouched. Newer rows hold the gzip-compressed binary, base64-encoded
//! and prefixed with [`COMPRESSED_TAG`] so the two can never be confused.
//! In memory the distinction is a proper enum rather than prefix sniffing;
//! the literal tag survives only at the storage boundary.

use std::io::{Read, Write};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use flate2::{Compression, read::GzDecoder, write::GzEncoder};
use thiserror::Error;

/// Literal prefix marking a compressed payload on the wire.
pub const COMPRESSED_TAG: &str = "GZIP:";

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("attachment payload is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("attachment could not be decompressed: {0}")]
    Decompression(#[from] std::io::Error),
    #[error("attachment could not be compressed: {message}")]
    Compression { message: String },
}

/// Input accepted by [`compress`]: either a browser-style data URL (the
/// base64 payload follows the first comma) or the raw bytes themselves.
#[derive(Debug, Clone)]
pub enum AttachmentSource<'a> {
    DataUrl(&'a str),
    Bytes(&'a [u8]),
}

/// A stored attachment, decoded from its wire form.
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    /// Legacy payload: an opaque resource reference, served as-is.
    Reference(String),
    /// Compressed payload, inflated back to the original bytes.
    Compressed(Vec<u8>),
}

impl Attachment {
    /// Parse a stored payload, inflating it when the wire tag is present.
    /// Untagged payloads pass through unchanged as references.
    pub fn from_wire(stored: &str) -> Result<Self, AttachmentError> {
        let Some(encoded) = stored.strip_prefix(COMPRESSED_TAG) else {
            return Ok(Self::Reference(stored.to_owned()));
        };

        let compressed = BASE64.decode(encoded)?;
        let mut decoder = GzDecoder::new(std::io::Cursor::new(compressed));
        let mut bytes = Vec::new();
        decoder.read_to_end(&mut bytes)?;
        Ok(Self::Compressed(bytes))
    }
}

/// Compress a payload into its tagged wire form: gzip at maximum level,
/// base64-encoded, prefixed with [`COMPRESSED_TAG`].
pub fn compress(source: AttachmentSource<'_>) -> Result<String, AttachmentError> {
    let bytes = match source {
        AttachmentSource::Bytes(bytes) => bytes.to_vec(),
        AttachmentSource::DataUrl(url) => {
            // In a data URL the base64 payload follows the first comma.
            let payload = url.split_once(',').map_or(url, |(_, rest)| rest);
            BASE64.decode(payload)?
        }
    };

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(&bytes)
        .map_err(|err| AttachmentError::Compression {
            message: err.to_string(),
        })?;
    let compressed = encoder
        .finish()
        .map_err(|err| AttachmentError::Compression {
            message: err.to_string(),
        })?;

    Ok(format!("{COMPRESSED_TAG}{}", BASE64.encode(compressed)))
}
