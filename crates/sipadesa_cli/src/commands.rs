use anyhow::{bail, Context, Result};
use sipadesa_core::{
    export_snapshot, import_snapshot, open_db, parse_snapshot, AgeRule, Argon2Hasher,
    ResidentScope, ResidentService, SqliteResidentRepository, SqliteUserRepository, UserService,
};
use sipadesa_http::{AppState, ServerConfig};
use std::net::SocketAddr;
use std::path::Path;
use tokio_util::sync::CancellationToken;

pub async fn serve(
    db: &Path,
    bind: SocketAddr,
    simulated_latency_ms: u64,
    age_rule: AgeRule,
) -> Result<()> {
    let conn = open_db(db).with_context(|| format!("opening {}", db.display()))?;
    let config = ServerConfig::new(bind)
        .with_simulated_latency_ms(simulated_latency_ms)
        .with_age_rule(age_rule);
    let state = AppState::new(conn, Argon2Hasher::default(), config);

    let shutdown = CancellationToken::new();
    let server_shutdown = shutdown.clone();
    let mut server = tokio::spawn(sipadesa_http::serve(state, server_shutdown));

    let finished = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            log::info!("event=shutdown module=cli status=requested signal=ctrl_c");
            None
        }
        result = &mut server => Some(result),
    };

    shutdown.cancel();
    let result = match finished {
        Some(result) => result,
        None => server.await,
    };
    result
        .context("http server task panicked")?
        .context("http server failed")?;
    Ok(())
}

pub fn import_legacy(db: &Path, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let snapshot = parse_snapshot(&json)?;
    let conn = open_db(db)?;
    let report = import_snapshot(&conn, &Argon2Hasher::default(), &snapshot)?;
    println!(
        "imported users={} residents={}",
        report.users, report.residents
    );
    Ok(())
}

pub fn export_legacy(db: &Path, output: Option<&Path>) -> Result<()> {
    let conn = open_db(db)?;
    let snapshot = export_snapshot(&conn)?;
    let json = serde_json::to_string_pretty(&snapshot)?;
    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn stats(db: &Path, hamlet: Option<&str>, age_rule: AgeRule) -> Result<()> {
    let conn = open_db(db)?;
    let scope = hamlet.map_or(ResidentScope::All, ResidentScope::hamlet);
    let today = chrono::Local::now().date_naive();
    let stats = ResidentService::new(SqliteResidentRepository::new(&conn))
        .statistics(&scope, today, age_rule)?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

pub fn users(db: &Path) -> Result<()> {
    let conn = open_db(db)?;
    let hasher = Argon2Hasher::default();
    let users = UserService::new(SqliteUserRepository::new(&conn), &hasher).fetch_all()?;
    for user in users {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            user.id,
            user.username,
            user.role.as_str(),
            user.status.as_str(),
            user.area_label().unwrap_or("-")
        );
    }
    Ok(())
}

pub fn verify_user(db: &Path, id: &str, area: Option<&str>) -> Result<()> {
    let conn = open_db(db)?;
    let hasher = Argon2Hasher::default();
    let user = UserService::new(SqliteUserRepository::new(&conn), &hasher).verify_user(id, area)?;
    println!(
        "verified {} as {}",
        user.username,
        user.role.label()
    );
    Ok(())
}

pub fn reset_password(db: &Path, id: &str, password: &str) -> Result<()> {
    if password.trim().is_empty() {
        bail!("password must not be empty");
    }
    let conn = open_db(db)?;
    let hasher = Argon2Hasher::default();
    let user =
        UserService::new(SqliteUserRepository::new(&conn), &hasher).reset_password(id, password)?;
    println!("password reset for {}", user.username);
    Ok(())
}
