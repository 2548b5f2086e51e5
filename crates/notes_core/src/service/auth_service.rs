//! Registration, login and token authentication.
//!
//! # Invariants
//! - Passwords reach the store only as digests from the configured hasher.
//! - Unknown handle, wrong password and an unreadable stored digest all map
//!   to `InvalidCredentials`.
//! - `authenticate` is the single gate the request layer calls per request.

use super::{ServiceError, ServiceResult};
use crate::auth::{Clock, CredentialHasher, SystemClock, TokenSigner};
use crate::model::user::{NewUser, SignUp};
use crate::model::UserId;
use crate::repo::UserRepository;
use log::{error, info, warn};
use std::time::Duration;

/// Auth use-case service.
pub struct AuthService<U: UserRepository, H: CredentialHasher, C: Clock = SystemClock> {
    users: U,
    hasher: H,
    signer: TokenSigner<C>,
    token_ttl: Duration,
}

impl<U: UserRepository, H: CredentialHasher, C: Clock> AuthService<U, H, C> {
    pub fn new(users: U, hasher: H, signer: TokenSigner<C>, token_ttl: Duration) -> Self {
        Self {
            users,
            hasher,
            signer,
            token_ttl,
        }
    }

    /// Registers a user and returns the new id.
    pub fn register(&self, sign_up: &SignUp) -> ServiceResult<UserId> {
        sign_up.validate()?;

        let password_digest = self.hasher.hash(&sign_up.password)?;
        let user_id = self.users.create_user(&NewUser {
            name: sign_up.name.trim().to_string(),
            handle: sign_up.handle.trim().to_string(),
            password_digest,
        })?;

        info!("event=auth_register module=service status=ok user_id={user_id}");
        Ok(user_id)
    }

    /// Checks credentials and issues a bearer token.
    pub fn login(&self, handle: &str, password: &str) -> ServiceResult<String> {
        let Some(user) = self.users.find_by_handle(handle.trim())? else {
            // Keep the unknown-handle path as slow as a real verification.
            let _ = self.hasher.hash(password);
            warn!("event=auth_login module=service status=error error_code=invalid_credentials");
            return Err(ServiceError::InvalidCredentials);
        };

        match self.hasher.verify(password, &user.password_digest) {
            Ok(true) => {}
            Ok(false) => {
                warn!("event=auth_login module=service status=error error_code=invalid_credentials");
                return Err(ServiceError::InvalidCredentials);
            }
            Err(err) => {
                // A digest the configured hasher cannot read fails like a wrong password.
                error!(
                    "event=auth_login module=service status=error error_code=unverifiable_digest user_id={} error={err}",
                    user.id
                );
                return Err(ServiceError::InvalidCredentials);
            }
        }

        let token = self.signer.issue(user.id, self.token_ttl)?;
        info!(
            "event=auth_login module=service status=ok user_id={} ttl_secs={}",
            user.id,
            self.token_ttl.as_secs()
        );
        Ok(token)
    }

    /// Resolves a bearer token to the user id it was issued for.
    pub fn authenticate(&self, token: &str) -> ServiceResult<UserId> {
        self.signer.verify(token).map_err(|err| {
            warn!("event=auth_verify module=service status=error error={err}");
            ServiceError::Token(err)
        })
    }
}
