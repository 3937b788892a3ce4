//! Password hashing
//!
//! scrypt with N=16384, r=16, p=1, dkLen=64 and a random 16-byte salt.
//! Stored format is `hex(salt):hex(key)`; the hex-encoded salt string
//! itself feeds the key derivation, so the stored text round-trips
//! without re-decoding.

use rand::RngCore;
use scrypt::{scrypt, Params};

use crate::error::AuthError;

const SCRYPT_LOG_N: u8 = 14;
const SCRYPT_R: u32 = 16;
const SCRYPT_P: u32 = 1;
const SCRYPT_KEY_LEN: usize = 64;
const SALT_LEN: usize = 16;

/// Hash a password for storage on a credential account row.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let mut salt_bytes = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt_hex = hex::encode(salt_bytes);

    let key = derive_key(password, &salt_hex)?;
    Ok(format!("{}:{}", salt_hex, hex::encode(key)))
}

/// Verify a password against a stored `hex(salt):hex(key)` hash.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let (salt_hex, key_hex) = stored_hash.split_once(':').ok_or_else(|| {
        tracing::error!("Stored password hash has invalid format");
        AuthError::Internal
    })?;

    let expected_key = hex::decode(key_hex).map_err(|e| {
        tracing::error!(error = %e, "Stored password hash has invalid hex");
        AuthError::Internal
    })?;

    let derived_key = derive_key(password, salt_hex)?;
    Ok(constant_time_eq(&derived_key, &expected_key))
}

fn derive_key(password: &str, salt_hex: &str) -> Result<Vec<u8>, AuthError> {
    let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, SCRYPT_KEY_LEN).map_err(|e| {
        tracing::error!(error = %e, "Invalid scrypt parameters");
        AuthError::Internal
    })?;

    let mut output = vec![0u8; SCRYPT_KEY_LEN];
    scrypt(password.as_bytes(), salt_hex.as_bytes(), &params, &mut output).map_err(|e| {
        tracing::error!(error = %e, "scrypt derivation failed");
        AuthError::Internal
    })?;

    Ok(output)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_format() {
        let hash = hash_password("my-secret-password").unwrap();

        let parts: Vec<&str> = hash.split(':').collect();
        assert_eq!(parts.len(), 2);
        // Salt = 16 bytes = 32 hex chars, key = 64 bytes = 128 hex chars
        assert_eq!(parts[0].len(), 32);
        assert_eq!(parts[1].len(), 128);
    }

    #[test]
    fn test_verify_roundtrip() {
        let hash = hash_password("correct horse battery staple").unwrap();

        assert!(verify_password("correct horse battery staple", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_different_salts_per_hash() {
        let hash1 = hash_password("same-password").unwrap();
        let hash2 = hash_password("same-password").unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password("same-password", &hash1).unwrap());
        assert!(verify_password("same-password", &hash2).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("password", "no-colon-here").is_err());
        assert!(verify_password("password", "zz:not-hex").is_err());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }
}
