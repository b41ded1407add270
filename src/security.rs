use anyhow::anyhow;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, SaltString},
    Argon2, PasswordVerifier,
};

/// One-way password digest capability.
///
/// The services only ever see the digest; the concrete algorithm stays behind
/// this seam so it never leaks into the data model.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password into a storable digest.
    fn hash(&self, password: &str) -> anyhow::Result<String>;

    /// Checks a plaintext password against a stored digest.
    fn verify(&self, password: &str, digest: &str) -> bool;
}

/// Argon2id-backed implementation with a random per-password salt.
#[derive(Default, Clone)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("password hashing failed: {e}"))?;
        Ok(digest.to_string())
    }

    fn verify(&self, password: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hasher = Argon2PasswordHasher;
        let digest = hasher.hash("hunter2").expect("hashing should succeed");
        assert_ne!(digest, "hunter2");
        assert!(hasher.verify("hunter2", &digest));
        assert!(!hasher.verify("wrong", &digest));
    }

    #[test]
    fn same_password_hashes_differently_per_salt() {
        let hasher = Argon2PasswordHasher;
        let a = hasher.hash("pw").unwrap();
        let b = hasher.hash("pw").unwrap();
        assert_ne!(a, b);
    }
}
