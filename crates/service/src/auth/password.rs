//! One-way salted password hashing.
//!
//! Argon2id with a fresh random salt per call; the salt and parameters are
//! embedded in the PHC output string, so `verify` needs nothing but the
//! digest. Comparison timing is delegated to the argon2 crate.

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use rand::rngs::OsRng;

use super::errors::AuthError;

pub const ALGORITHM: &str = "argon2";

/// Hash a plaintext password into a self-describing PHC string.
pub fn hash(plaintext: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let digest = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string();
    Ok(digest)
}

/// Check a plaintext against a stored digest. Returns `false` on mismatch
/// and on a digest that does not parse; it never errors.
pub fn verify(plaintext: &str, digest: &str) -> bool {
    match PasswordHash::new(digest) {
        Ok(parsed) => Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_not_plaintext() {
        let digest = hash("s3cret").unwrap();
        assert_ne!(digest, "s3cret");
        assert!(digest.starts_with("$argon2"));
    }

    #[test]
    fn verify_roundtrip() {
        let digest = hash("s3cret").unwrap();
        assert!(verify("s3cret", &digest));
        assert!(!verify("wrong", &digest));
    }

    #[test]
    fn same_plaintext_hashes_differently() {
        let a = hash("s3cret").unwrap();
        let b = hash("s3cret").unwrap();
        assert_ne!(a, b);
        assert!(verify("s3cret", &a));
        assert!(verify("s3cret", &b));
    }

    #[test]
    fn malformed_digest_is_false_not_panic() {
        assert!(!verify("s3cret", "not-a-phc-string"));
        assert!(!verify("s3cret", ""));
    }
}
