//! Credential hashing strategies.
//!
//! Two strategies implement [`CredentialHasher`]:
//!
//! - [`Argon2Hasher`] generates a random salt per credential and stores a PHC
//!   string (`$argon2id$v=19$m=...`), so the digest carries its own salt and
//!   cost parameters.
//! - [`SaltedDigestHasher`] hashes every credential with one process-wide salt
//!   via [`hash_credential`]. It is deterministic and exists for databases
//!   populated by the legacy scheme.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure inside a hashing backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Cost parameters rejected by the algorithm.
    InvalidParams(String),
    /// Stored digest cannot be parsed by this strategy.
    MalformedDigest(String),
    /// Hash computation failed.
    Hashing(String),
}

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParams(message) => write!(f, "invalid hashing parameters: {message}"),
            Self::MalformedDigest(message) => write!(f, "malformed credential digest: {message}"),
            Self::Hashing(message) => write!(f, "credential hashing failed: {message}"),
        }
    }
}

impl Error for CredentialError {}

/// Pluggable password hashing strategy.
pub trait CredentialHasher {
    /// Produces the digest stored alongside the user row.
    fn hash(&self, plain: &str) -> Result<String, CredentialError>;
    /// Checks `plain` against a digest previously returned by [`Self::hash`].
    fn verify(&self, plain: &str, digest: &str) -> Result<bool, CredentialError>;
}

impl<H: CredentialHasher + ?Sized> CredentialHasher for Box<H> {
    fn hash(&self, plain: &str) -> Result<String, CredentialError> {
        (**self).hash(plain)
    }

    fn verify(&self, plain: &str, digest: &str) -> Result<bool, CredentialError> {
        (**self).verify(plain, digest)
    }
}

/// Deterministic salted digest: hex SHA-256 over `salt` followed by `plain`.
///
/// The same `(plain, salt)` pair always yields the same digest. Salt
/// uniqueness is the caller's concern.
pub fn hash_credential(plain: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(plain.as_bytes());
    hex::encode(hasher.finalize())
}

/// Process-wide salt strategy built on [`hash_credential`].
#[derive(Debug, Clone)]
pub struct SaltedDigestHasher {
    salt: String,
}

impl SaltedDigestHasher {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }
}

impl CredentialHasher for SaltedDigestHasher {
    fn hash(&self, plain: &str) -> Result<String, CredentialError> {
        Ok(hash_credential(plain, &self.salt))
    }

    fn verify(&self, plain: &str, digest: &str) -> Result<bool, CredentialError> {
        let expected = hash_credential(plain, &self.salt);
        Ok(constant_time_eq(expected.as_bytes(), digest.as_bytes()))
    }
}

/// Argon2id strategy with a fresh random salt per credential.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Builds a hasher with explicit cost parameters.
    ///
    /// `memory_kib` is the memory cost in KiB, `iterations` the time cost and
    /// `parallelism` the lane count.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, CredentialError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|err| CredentialError::InvalidParams(err.to_string()))?;
        Ok(Self { params })
    }

    fn engine(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plain: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .engine()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|err| CredentialError::Hashing(err.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, plain: &str, digest: &str) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(digest)
            .map_err(|err| CredentialError::MalformedDigest(err.to_string()))?;
        // Cost parameters come from the PHC string, not from `self.params`.
        Ok(self
            .engine()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }
}

/// Slices of different length compare unequal.
fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    left.ct_eq(right).into()
}
