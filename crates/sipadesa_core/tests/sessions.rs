use sipadesa_core::db::open_db_in_memory;
use sipadesa_core::seed::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
use sipadesa_core::{
    Argon2Hasher, RegistrationRequest, SessionService, SqliteSessionRepository,
    SqliteUserRepository, UserRole, UserService,
};

fn hasher() -> Argon2Hasher {
    Argon2Hasher::with_costs(64, 1)
}

#[test]
fn open_resolve_close_lifecycle() {
    let conn = open_db_in_memory().unwrap();
    let hasher = hasher();
    let users = UserService::new(SqliteUserRepository::new(&conn), &hasher);
    let sessions = SessionService::new(SqliteSessionRepository::new(&conn));

    let admin = users
        .login(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
        .unwrap();
    let session = sessions.open(&admin).unwrap();
    assert_eq!(session.token.len(), 48);
    assert!(session.token.chars().all(|c| c.is_ascii_alphanumeric()));

    let resolved = sessions.resolve(&session.token).unwrap().unwrap();
    assert_eq!(resolved.id, admin.id);

    sessions.close(&session.token).unwrap();
    sessions.close(&session.token).unwrap();
    assert!(sessions.resolve(&session.token).unwrap().is_none());
}

#[test]
fn tokens_are_unique_per_session() {
    let conn = open_db_in_memory().unwrap();
    let hasher = hasher();
    let users = UserService::new(SqliteUserRepository::new(&conn), &hasher);
    let sessions = SessionService::new(SqliteSessionRepository::new(&conn));

    let admin = users
        .login(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
        .unwrap();
    let first = sessions.open(&admin).unwrap();
    let second = sessions.open(&admin).unwrap();
    assert_ne!(first.token, second.token);
}

#[test]
fn deleting_user_revokes_their_sessions() {
    let conn = open_db_in_memory().unwrap();
    let hasher = hasher();
    let users = UserService::new(SqliteUserRepository::new(&conn), &hasher);
    let sessions = SessionService::new(SqliteSessionRepository::new(&conn));

    let pending = users
        .register(RegistrationRequest {
            full_name: "Pak Kasi".to_string(),
            username: "kasi".to_string(),
            password: "kasi123".to_string(),
            role: UserRole::Kasi,
        })
        .unwrap();
    users.verify_user(&pending.id, None).unwrap();
    let kasi = users.login("kasi", "kasi123").unwrap();
    let session = sessions.open(&kasi).unwrap();

    users.delete(&kasi.id).unwrap();

    assert!(sessions.resolve(&session.token).unwrap().is_none());
}

#[test]
fn unknown_token_resolves_to_none() {
    let conn = open_db_in_memory().unwrap();
    let sessions = SessionService::new(SqliteSessionRepository::new(&conn));
    assert!(sessions.resolve("not-a-token").unwrap().is_none());
}
