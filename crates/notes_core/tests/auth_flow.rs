use notes_core::auth::ManualClock;
use notes_core::repo::{SqliteUserRepository, UserRepository};
use notes_core::service::AuthService;
use notes_core::{
    Argon2Hasher, NewNotesList, NotesValidationError, Repositories, SaltedDigestHasher,
    ServiceError, Services, SignUp, TokenError, TokenSigner,
};
use std::time::Duration;

fn fast_argon2() -> Argon2Hasher {
    Argon2Hasher::with_params(1024, 1, 1).unwrap()
}

#[test]
fn register_login_and_authenticate_end_to_end() {
    let conn = notes_core::open_db_in_memory().unwrap();
    let services = Services::new(
        Repositories::try_new(&conn).unwrap(),
        fast_argon2(),
        TokenSigner::new("integration-key").unwrap(),
        Duration::from_secs(3600),
    );

    let user_id = services
        .auth
        .register(&SignUp::new("Ada Lovelace", "ada", "analytical"))
        .unwrap();
    let token = services.auth.login("ada", "analytical").unwrap();
    let caller = services.auth.authenticate(&token).unwrap();
    assert_eq!(caller, user_id);

    let list_id = services
        .lists
        .create(caller, &NewNotesList::new("Engines"))
        .unwrap();
    assert_eq!(services.lists.get_by_id(caller, list_id).unwrap().id, list_id);
}

#[test]
fn duplicate_handle_is_reported() {
    let conn = notes_core::open_db_in_memory().unwrap();
    let services = Services::new(
        Repositories::try_new(&conn).unwrap(),
        fast_argon2(),
        TokenSigner::new("integration-key").unwrap(),
        Duration::from_secs(3600),
    );

    services
        .auth
        .register(&SignUp::new("Ada", "ada", "one"))
        .unwrap();
    let err = services
        .auth
        .register(&SignUp::new("Other Ada", "ada", "two"))
        .unwrap_err();

    assert!(matches!(err, ServiceError::DuplicateHandle(handle) if handle == "ada"));
}

#[test]
fn blank_registration_fields_are_rejected() {
    let conn = notes_core::open_db_in_memory().unwrap();
    let services = Services::new(
        Repositories::try_new(&conn).unwrap(),
        fast_argon2(),
        TokenSigner::new("integration-key").unwrap(),
        Duration::from_secs(3600),
    );

    let err = services
        .auth
        .register(&SignUp::new("Ada", "  ", "pw"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(NotesValidationError::EmptyField(_))
    ));
}

#[test]
fn argon2_digests_are_salted_per_user() {
    let conn = notes_core::open_db_in_memory().unwrap();
    let services = Services::new(
        Repositories::try_new(&conn).unwrap(),
        fast_argon2(),
        TokenSigner::new("integration-key").unwrap(),
        Duration::from_secs(3600),
    );

    services
        .auth
        .register(&SignUp::new("Ada", "ada", "same-password"))
        .unwrap();
    services
        .auth
        .register(&SignUp::new("Grace", "grace", "same-password"))
        .unwrap();

    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let ada = users.find_by_handle("ada").unwrap().unwrap();
    let grace = users.find_by_handle("grace").unwrap().unwrap();
    assert_ne!(ada.password_digest, grace.password_digest);
    assert!(ada.password_digest.starts_with("$argon2id$"));
    assert!(!ada.password_digest.contains("same-password"));
}

#[test]
fn login_failures_do_not_reveal_handle_existence() {
    let conn = notes_core::open_db_in_memory().unwrap();
    let services = Services::new(
        Repositories::try_new(&conn).unwrap(),
        fast_argon2(),
        TokenSigner::new("integration-key").unwrap(),
        Duration::from_secs(3600),
    );
    services
        .auth
        .register(&SignUp::new("Ada", "ada", "right"))
        .unwrap();

    let wrong_password = services.auth.login("ada", "wrong").unwrap_err();
    let unknown_handle = services.auth.login("nobody", "right").unwrap_err();

    assert!(matches!(wrong_password, ServiceError::InvalidCredentials));
    assert!(matches!(unknown_handle, ServiceError::InvalidCredentials));
}

#[test]
fn salted_digest_strategy_is_deterministic() {
    let conn = notes_core::open_db_in_memory().unwrap();
    let clock = ManualClock::new(1_700_000_000);
    let auth = AuthService::new(
        SqliteUserRepository::try_new(&conn).unwrap(),
        SaltedDigestHasher::new("global-salt"),
        TokenSigner::with_clock("integration-key", clock).unwrap(),
        Duration::from_secs(60),
    );

    auth.register(&SignUp::new("Ada", "ada", "pw")).unwrap();

    let stored = SqliteUserRepository::try_new(&conn)
        .unwrap()
        .find_by_handle("ada")
        .unwrap()
        .unwrap();
    assert_eq!(
        stored.password_digest,
        notes_core::auth::hash_credential("pw", "global-salt")
    );
    assert!(auth.login("ada", "pw").is_ok());
}

#[test]
fn tokens_expire_and_reject_foreign_keys() {
    let conn = notes_core::open_db_in_memory().unwrap();
    let clock = ManualClock::new(1_700_000_000);
    let auth = AuthService::new(
        SqliteUserRepository::try_new(&conn).unwrap(),
        SaltedDigestHasher::new("salt"),
        TokenSigner::with_clock("integration-key", clock.clone()).unwrap(),
        Duration::from_secs(30),
    );
    let user_id = auth.register(&SignUp::new("Ada", "ada", "pw")).unwrap();
    let token = auth.login("ada", "pw").unwrap();

    clock.advance(Duration::from_secs(29));
    assert_eq!(auth.authenticate(&token).unwrap(), user_id);

    let other_signer = TokenSigner::with_clock("other-key", clock.clone()).unwrap();
    assert_eq!(
        other_signer.verify(&token),
        Err(TokenError::InvalidSignature)
    );

    clock.advance(Duration::from_secs(1));
    assert!(matches!(
        auth.authenticate(&token),
        Err(ServiceError::Token(TokenError::Expired))
    ));
}

#[test]
fn digest_from_another_hasher_fails_like_wrong_password() {
    let conn = notes_core::open_db_in_memory().unwrap();
    let legacy = AuthService::new(
        SqliteUserRepository::try_new(&conn).unwrap(),
        SaltedDigestHasher::new("salt"),
        TokenSigner::new("integration-key").unwrap(),
        Duration::from_secs(60),
    );
    legacy.register(&SignUp::new("Ada", "ada", "pw")).unwrap();

    let current = AuthService::new(
        SqliteUserRepository::try_new(&conn).unwrap(),
        fast_argon2(),
        TokenSigner::new("integration-key").unwrap(),
        Duration::from_secs(60),
    );
    let known_handle = current.login("ada", "pw").unwrap_err();
    let unknown_handle = current.login("nobody", "pw").unwrap_err();

    assert!(matches!(known_handle, ServiceError::InvalidCredentials));
    assert!(matches!(unknown_handle, ServiceError::InvalidCredentials));
    assert_eq!(known_handle.to_string(), unknown_handle.to_string());
}
