use sipadesa_core::db::open_db_in_memory;
use sipadesa_core::seed::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
use sipadesa_core::{
    export_snapshot, import_snapshot, parse_snapshot, AccountStatus, Argon2Hasher,
    ResidentService, ServiceError, SqliteResidentRepository, SqliteUserRepository, UserService,
    PENDING_VERIFICATION_AREA,
};

fn hasher() -> Argon2Hasher {
    Argon2Hasher::with_costs(64, 1)
}

const SNAPSHOT: &str = r#"{
    "sipadesa_users": [
        {"id": "admin-1", "username": "admin", "password": "admin123", "fullName": "Administrator Desa", "role": "ADMIN"},
        {"id": "u-2", "username": "rt01", "password": "rt01pass", "fullName": "Pak RT", "role": "RT_RW", "area": "Menunggu Verifikasi Admin"},
        {"id": "u-3", "username": "kadus", "password": "kadus1", "fullName": "Bu Kadus", "role": "KADUS", "area": "Dusun Mawar"}
    ],
    "sipadesa_residents": [
        {"id": "7", "nik": "3301000000000007", "fullName": "Agus Salim", "gender": "Laki-laki", "status": "Pindah", "dusun": "Kenanga"}
    ]
}"#;

#[test]
fn import_maps_sentinel_area_to_pending_status() {
    let conn = open_db_in_memory().unwrap();
    let hasher = hasher();

    let snapshot = parse_snapshot(SNAPSHOT).unwrap();
    let report = import_snapshot(&conn, &hasher, &snapshot).unwrap();
    assert_eq!(report.users, 3);
    assert_eq!(report.residents, 1);

    let users = UserService::new(SqliteUserRepository::new(&conn), &hasher);
    let pending = users.get_user("u-2").unwrap().unwrap();
    assert_eq!(pending.status, AccountStatus::PendingVerification);
    assert_eq!(pending.area, None);
    assert!(matches!(
        users.login("rt01", "rt01pass").unwrap_err(),
        ServiceError::PendingVerification
    ));

    let kadus = users.login("kadus", "kadus1").unwrap();
    assert_eq!(kadus.area.as_deref(), Some("Dusun Mawar"));
}

#[test]
fn imported_collections_are_not_reseeded() {
    let conn = open_db_in_memory().unwrap();
    let hasher = hasher();

    import_snapshot(&conn, &hasher, &parse_snapshot(SNAPSHOT).unwrap()).unwrap();

    let residents = ResidentService::new(SqliteResidentRepository::new(&conn));
    let ids: Vec<_> = residents
        .fetch_all()
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["7".to_string()]);
    let agus = residents.get_resident("7").unwrap().unwrap();
    assert_eq!(agus.birth_date, "");
}

#[test]
fn collections_may_be_json_encoded_strings() {
    let document = serde_json::json!({
        "sipadesa_residents": "[{\"id\":\"1\",\"nik\":\"1\",\"fullName\":\"A\",\"gender\":\"Perempuan\",\"status\":\"Kontrak\"}]"
    })
    .to_string();

    let snapshot = parse_snapshot(&document).unwrap();
    assert!(snapshot.users.is_none());
    assert_eq!(snapshot.residents.unwrap().len(), 1);
}

#[test]
fn absent_collection_still_seeds_on_first_access() {
    let conn = open_db_in_memory().unwrap();
    let hasher = hasher();
    let document = r#"{"sipadesa_residents": []}"#;

    import_snapshot(&conn, &hasher, &parse_snapshot(document).unwrap()).unwrap();

    let users = UserService::new(SqliteUserRepository::new(&conn), &hasher);
    assert_eq!(users.fetch_all().unwrap().len(), 1);
    let residents = ResidentService::new(SqliteResidentRepository::new(&conn));
    assert!(residents.fetch_all().unwrap().is_empty());
}

#[test]
fn corrupt_documents_are_reported_not_reset() {
    assert!(matches!(
        parse_snapshot("{not json").unwrap_err(),
        ServiceError::CorruptState(_)
    ));
    assert!(matches!(
        parse_snapshot("[]").unwrap_err(),
        ServiceError::CorruptState(_)
    ));
    assert!(matches!(
        parse_snapshot(r#"{"sipadesa_users": "[{broken"}"#).unwrap_err(),
        ServiceError::CorruptState(_)
    ));
    assert!(matches!(
        parse_snapshot(r#"{"sipadesa_users": [{"id": "x", "role": "MAYOR"}]}"#).unwrap_err(),
        ServiceError::CorruptState(_)
    ));
}

#[test]
fn export_restores_sentinel_and_omits_passwords() {
    let conn = open_db_in_memory().unwrap();
    let hasher = hasher();
    import_snapshot(&conn, &hasher, &parse_snapshot(SNAPSHOT).unwrap()).unwrap();

    let exported = export_snapshot(&conn).unwrap();
    let users = exported.users.unwrap();
    assert_eq!(users.len(), 3);
    assert!(users.iter().all(|user| user.password.is_none()));
    assert_eq!(users[1].area.as_deref(), Some(PENDING_VERIFICATION_AREA));
    assert_eq!(users[2].area.as_deref(), Some("Dusun Mawar"));

    let json = serde_json::to_value(
        export_snapshot(&conn).unwrap(),
    )
    .unwrap();
    assert!(json.get("sipadesa_users").unwrap().is_array());
    assert_eq!(json["sipadesa_residents"][0]["fullName"], "Agus Salim");
}

#[test]
fn fresh_store_export_reimports_with_seed_data() {
    let hasher = hasher();
    let source = open_db_in_memory().unwrap();

    let exported = export_snapshot(&source).unwrap();
    assert!(exported.users.is_none());
    assert!(exported.residents.is_none());
    let json = serde_json::to_string(&exported).unwrap();
    assert_eq!(json, "{}");

    let target = open_db_in_memory().unwrap();
    let report = import_snapshot(&target, &hasher, &parse_snapshot(&json).unwrap()).unwrap();
    assert_eq!(report.users, 0);
    assert_eq!(report.residents, 0);

    let users = UserService::new(SqliteUserRepository::new(&target), &hasher);
    let admin = users
        .login(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
        .unwrap();
    assert!(admin.is_active());
    let residents = ResidentService::new(SqliteResidentRepository::new(&target));
    assert_eq!(residents.fetch_all().unwrap().len(), 2);
}

#[test]
fn export_after_first_access_includes_seed_records() {
    let hasher = hasher();
    let conn = open_db_in_memory().unwrap();
    ResidentService::new(SqliteResidentRepository::new(&conn))
        .fetch_all()
        .unwrap();

    let exported = export_snapshot(&conn).unwrap();
    assert!(exported.users.is_none());
    assert_eq!(exported.residents.unwrap().len(), 2);

    UserService::new(SqliteUserRepository::new(&conn), &hasher)
        .fetch_all()
        .unwrap();
    let users = export_snapshot(&conn).unwrap().users.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, DEFAULT_ADMIN_USERNAME);
}
