//! Signed bearer tokens.
//!
//! Tokens use the compact JWS layout `header.payload.signature`, each part
//! base64url without padding, signed with HMAC-SHA256 over
//! `header.payload`. The payload carries the user id plus `iat`, `nbf` and
//! `exp` in Unix seconds.
//!
//! # Invariants
//! - Only `HS256` headers are accepted; anything else is `InvalidSignature`.
//! - The signature is checked before the payload is trusted.
//! - A token is expired once `now >= exp`.

use crate::model::UserId;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

const SIGNING_ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

/// Token verification and issuance failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Wrong algorithm, wrong key or tampered content.
    InvalidSignature,
    /// Current time is at or past `exp`.
    Expired,
    /// Current time is before `nbf`.
    NotYetValid,
    /// Token structure cannot be decoded.
    Malformed(String),
    /// Signing key is empty or unusable.
    InvalidKey,
    /// Claims could not be serialized.
    Encoding(String),
}

impl Display for TokenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSignature => write!(f, "token signature is invalid"),
            Self::Expired => write!(f, "token has expired"),
            Self::NotYetValid => write!(f, "token is not valid yet"),
            Self::Malformed(message) => write!(f, "malformed token: {message}"),
            Self::InvalidKey => write!(f, "token signing key is invalid"),
            Self::Encoding(message) => write!(f, "token encoding failed: {message}"),
        }
    }
}

impl Error for TokenError {}

/// Claims embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: UserId,
    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "nbf")]
    pub not_before: i64,
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    typ: String,
}

/// Time source for token issuance and expiry checks.
pub trait Clock {
    /// Current time in Unix seconds.
    fn now_unix(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as i64)
            .unwrap_or_default()
    }
}

/// Manually driven clock. Clones share the same instant.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(now_unix: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(now_unix)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let step = whole_seconds(by);
        let _ = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                Some(now.saturating_add(step))
            });
    }

    pub fn set(&self, now_unix: i64) {
        self.now.store(now_unix, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_unix(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Issues and verifies HS256 tokens with one symmetric key.
#[derive(Clone)]
pub struct TokenSigner<C: Clock = SystemClock> {
    key: Vec<u8>,
    clock: C,
}

impl TokenSigner<SystemClock> {
    /// Creates a signer on the wall clock. Rejects an empty key.
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, TokenError> {
        Self::with_clock(key, SystemClock)
    }
}

impl<C: Clock> TokenSigner<C> {
    /// Creates a signer reading time from `clock`. Rejects an empty key.
    pub fn with_clock(key: impl AsRef<[u8]>, clock: C) -> Result<Self, TokenError> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(TokenError::InvalidKey);
        }
        Ok(Self {
            key: key.to_vec(),
            clock,
        })
    }

    /// Issues a token for `user_id` valid from now until now + `ttl`.
    ///
    /// Claims hold whole seconds: a fractional `ttl` rounds up, and an `exp`
    /// past `i64::MAX` saturates.
    pub fn issue(&self, user_id: UserId, ttl: Duration) -> Result<String, TokenError> {
        let issued_at = self.clock.now_unix();
        let claims = TokenClaims {
            user_id,
            issued_at,
            not_before: issued_at,
            expires_at: issued_at.saturating_add(whole_seconds(ttl)),
        };
        self.encode(&claims)
    }

    /// Verifies `token` and returns the embedded user id.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        self.decode(token).map(|claims| claims.user_id)
    }

    /// Verifies `token` and returns its full claims.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed(
                "expected three dot-separated segments".to_string(),
            ));
        };

        let header: TokenHeader = decode_segment(header_b64, "header")?;
        if header.alg != SIGNING_ALGORITHM {
            return Err(TokenError::InvalidSignature);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|err| TokenError::Malformed(format!("signature: {err}")))?;
        let mut mac = self.mac()?;
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let claims: TokenClaims = decode_segment(payload_b64, "payload")?;
        let now = self.clock.now_unix();
        if now < claims.not_before {
            return Err(TokenError::NotYetValid);
        }
        if now >= claims.expires_at {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn encode(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        let header = TokenHeader {
            alg: SIGNING_ALGORITHM.to_string(),
            typ: TOKEN_TYPE.to_string(),
        };
        let header_b64 = encode_segment(&header)?;
        let payload_b64 = encode_segment(claims)?;

        let mut mac = self.mac()?;
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(payload_b64.as_bytes());
        let signature_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{header_b64}.{payload_b64}.{signature_b64}"))
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.key).map_err(|_| TokenError::InvalidKey)
    }
}

fn whole_seconds(duration: Duration) -> i64 {
    let secs = if duration.subsec_nanos() > 0 {
        duration.as_secs().saturating_add(1)
    } else {
        duration.as_secs()
    };
    i64::try_from(secs).unwrap_or(i64::MAX)
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, TokenError> {
    let json = serde_json::to_vec(value).map_err(|err| TokenError::Encoding(err.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_segment<T: for<'de> Deserialize<'de>>(
    segment: &str,
    name: &str,
) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|err| TokenError::Malformed(format!("{name}: {err}")))?;
    serde_json::from_slice(&bytes).map_err(|err| TokenError::Malformed(format!("{name}: {err}")))
}
