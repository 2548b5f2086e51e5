//! Credential hashing and bearer token primitives.
//!
//! # Responsibility
//! - Turn plaintext passwords into stored digests through a swappable
//!   strategy.
//! - Issue and verify signed, time-bounded tokens carrying a user id.
//!
//! # Invariants
//! - Plaintext passwords and raw tokens are never logged.

pub mod password;
pub mod token;

pub use password::{
    hash_credential, Argon2Hasher, CredentialError, CredentialHasher, SaltedDigestHasher,
};
pub use token::{Clock, ManualClock, SystemClock, TokenClaims, TokenError, TokenSigner};
