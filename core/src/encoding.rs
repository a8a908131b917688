//! Base64 ⇄ hex transcoding for providers whose PSBT wire format is hex.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Decode a base64 payload and re-encode it as lowercase hex.
pub fn base64_to_hex(data: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(data)
        .map_err(|e| Error::Encoding(format!("Invalid base64: {}", e)))?;
    Ok(hex::encode(bytes))
}

/// Decode a hex payload and re-encode it as standard base64.
pub fn hex_to_base64(data: &str) -> Result<String> {
    let bytes = hex::decode(data).map_err(|e| Error::Encoding(format!("Invalid hex: {}", e)))?;
    Ok(STANDARD.encode(bytes))
}
