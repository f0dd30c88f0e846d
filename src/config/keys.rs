//! X25519 public key derivation for the sodium key pair.

use x25519_dalek::{X25519_BASEPOINT_BYTES, x25519};

use crate::error::ConfigError;

/// Derive the hex-encoded public key for a hex-encoded X25519 private key.
///
/// An empty private key yields an empty public key.
pub fn derive_public_key(private_key_hex: &str) -> Result<String, ConfigError> {
    let private_key_hex = private_key_hex.trim();
    if private_key_hex.is_empty() {
        return Ok(String::new());
    }

    let bytes = hex::decode(private_key_hex).map_err(|e| ConfigError::InvalidValue {
        key: "X25519_PRIVATE_KEY".into(),
        message: format!("not valid hex: {e}"),
    })?;
    let scalar: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| ConfigError::InvalidValue {
        key: "X25519_PRIVATE_KEY".into(),
        message: format!("expected 32 bytes, got {}", b.len()),
    })?;

    Ok(hex::encode(x25519(scalar, X25519_BASEPOINT_BYTES)))
}
