//! Process configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables named `<PREFIX>__<SECTION>__<KEY>` (for example
//! `NOTES__AUTH__SIGNING_KEY`).

use crate::auth::{Argon2Hasher, CredentialError, CredentialHasher, SaltedDigestHasher};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENV_PREFIX: &str = "NOTES";
const DEFAULT_TOKEN_TTL_SECS: i64 = 12 * 60 * 60;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseSettings {
    /// Database file; `None` opens an in-memory database.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Password hashing strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HasherKind {
    #[default]
    Argon2,
    SaltedDigest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub signing_key: String,
    #[serde(default)]
    pub password_salt: String,
    pub token_ttl_secs: u64,
    #[serde(default)]
    pub hasher: HasherKind,
}

impl AuthSettings {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    /// Builds the configured hashing strategy.
    pub fn credential_hasher(
        &self,
    ) -> Result<Box<dyn CredentialHasher + Send + Sync>, CredentialError> {
        match self.hasher {
            HasherKind::Argon2 => Ok(Box::new(Argon2Hasher::default())),
            HasherKind::SaltedDigest => {
                if self.password_salt.is_empty() {
                    return Err(CredentialError::InvalidParams(
                        "salted_digest hasher requires auth.password_salt".to_string(),
                    ));
                }
                Ok(Box::new(SaltedDigestHasher::new(self.password_salt.clone())))
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    /// Absolute directory for rolling log files; `None` disables file logs.
    #[serde(default)]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Loads settings from `config_file` (if any) and `NOTES__*` variables.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(config_file, DEFAULT_ENV_PREFIX)
    }

    /// Loads settings with an explicit environment prefix.
    pub fn load_from(config_file: Option<&Path>, env_prefix: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("auth.signing_key", "")?
            .set_default("auth.password_salt", "")?
            .set_default("auth.token_ttl_secs", DEFAULT_TOKEN_TTL_SECS)?
            .set_default("auth.hasher", "argon2")?
            .set_default("logging.level", crate::logging::default_log_level())?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        let settings: Self = builder
            .add_source(
                Environment::with_prefix(env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.signing_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "auth.signing_key must be set".to_string(),
            ));
        }
        if self.auth.token_ttl_secs == 0 {
            return Err(ConfigError::Message(
                "auth.token_ttl_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{HasherKind, Settings};
    use std::io::Write;
    use std::path::PathBuf;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            r#"
            [database]
            path = "/var/lib/notes/notes.sqlite3"

            [auth]
            signing_key = "file-key"
            hasher = "salted_digest"
            password_salt = "pepper"
            "#,
        );

        let settings = Settings::load_from(Some(file.path()), "NOTESCFGTESTA").unwrap();
        assert_eq!(settings.auth.signing_key, "file-key");
        assert_eq!(settings.auth.hasher, HasherKind::SaltedDigest);
        assert_eq!(settings.auth.token_ttl_secs, 12 * 60 * 60);
        assert_eq!(
            settings.database.path,
            Some(PathBuf::from("/var/lib/notes/notes.sqlite3"))
        );
        assert!(settings.auth.credential_hasher().is_ok());
    }

    #[test]
    fn environment_overrides_file() {
        let file = write_config(
            r#"
            [auth]
            signing_key = "file-key"
            "#,
        );
        std::env::set_var("NOTESCFGTESTB__AUTH__SIGNING_KEY", "env-key");
        std::env::set_var("NOTESCFGTESTB__AUTH__TOKEN_TTL_SECS", "90");

        let settings = Settings::load_from(Some(file.path()), "NOTESCFGTESTB").unwrap();
        assert_eq!(settings.auth.signing_key, "env-key");
        assert_eq!(settings.auth.token_ttl().as_secs(), 90);
        assert_eq!(settings.auth.hasher, HasherKind::Argon2);
        assert_eq!(settings.database.path, None);
    }

    #[test]
    fn missing_signing_key_is_rejected() {
        let err = Settings::load_from(None, "NOTESCFGTESTC").unwrap_err();
        assert!(err.to_string().contains("signing_key"));
    }

    #[test]
    fn salted_digest_without_salt_is_rejected() {
        let file = write_config(
            r#"
            [auth]
            signing_key = "k"
            hasher = "salted_digest"
            "#,
        );
        let settings = Settings::load_from(Some(file.path()), "NOTESCFGTESTD").unwrap();
        assert!(settings.auth.credential_hasher().is_err());
    }
}
