//! CLI smoke entry point.
//!
//! Usage: `notes_cli [CONFIG_FILE]`
//!
//! Loads settings, opens the configured database, wires every service and
//! prints a short readiness report.

use notes_core::db::schema_version;
use notes_core::{Repositories, Services, Settings, TokenSigner};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("notes_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config_file = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load(config_file.as_deref()).map_err(|err| err.to_string())?;

    let file_logging = notes_core::init_logging_from(&settings.logging)?;

    let conn = match settings.database.path.as_deref() {
        Some(path) => notes_core::open_db(path),
        None => notes_core::open_db_in_memory(),
    }
    .map_err(|err| err.to_string())?;

    let repos = Repositories::try_new(&conn).map_err(|err| err.to_string())?;
    let hasher = settings
        .auth
        .credential_hasher()
        .map_err(|err| err.to_string())?;
    let signer = TokenSigner::new(settings.auth.signing_key.as_bytes())
        .map_err(|err| err.to_string())?;
    let _services = Services::new(repos, hasher, signer, settings.auth.token_ttl());

    let version = schema_version(&conn).map_err(|err| err.to_string())?;
    println!("notes_core version={}", notes_core::core_version());
    println!("schema_version={version}");
    println!(
        "database={}",
        settings
            .database
            .path
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string())
    );
    println!("hasher={:?} file_logging={file_logging}", settings.auth.hasher);
    Ok(())
}
