//! HTTP adapter over the records core.
//!
//! # Responsibility
//! - Expose the user and resident services as JSON routes.
//! - Authenticate callers by bearer session token and apply role checks.
//!
//! # Invariants
//! - Every storage call runs on a blocking worker under the connection lock.
//! - Password hashes never appear in a response body.

use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use axum::{
    routing::{get, post, put},
    Router,
};
use rusqlite::Connection;
use sipadesa_core::{PasswordHasher, ServiceResult};

pub mod config;
mod error;
mod handlers;
mod models;

pub use config::ServerConfig;
pub use error::ApiError;

use handlers::{
    delete_resident, delete_user, health, list_residents, list_users, login, logout, not_found,
    put_resident, put_user, register, reset_password, resident_stats, verify_user,
};

pub struct AppState<H> {
    db: Arc<Mutex<Connection>>,
    hasher: Arc<H>,
    started_at: SystemTime,
    config: ServerConfig,
}

impl<H> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            hasher: Arc::clone(&self.hasher),
            started_at: self.started_at,
            config: self.config.clone(),
        }
    }
}

impl<H: PasswordHasher + Send + Sync + 'static> AppState<H> {
    pub fn new(conn: Connection, hasher: H, config: ServerConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            hasher: Arc::new(hasher),
            started_at: SystemTime::now(),
            config,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Runs `op` against the shared connection on a blocking worker.
    pub async fn run<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &H) -> ServiceResult<T> + Send + 'static,
    {
        if let Some(delay) = self.config.simulated_latency {
            tokio::time::sleep(delay).await;
        }
        let db = Arc::clone(&self.db);
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || {
            let conn = db
                .lock()
                .map_err(|_| ApiError::internal("database connection lock poisoned"))?;
            op(&conn, hasher.as_ref()).map_err(ApiError::from)
        })
        .await
        .map_err(|err| ApiError::internal(format!("storage worker failed: {err}")))?
    }
}

pub fn router<H: PasswordHasher + Send + Sync + 'static>(state: AppState<H>) -> Router {
    Router::new()
        .route("/health", get(health::<H>))
        .route("/auth/login", post(login::<H>))
        .route("/auth/register", post(register::<H>))
        .route("/auth/logout", post(logout::<H>))
        .route("/users", get(list_users::<H>))
        .route("/users/:id", put(put_user::<H>).delete(delete_user::<H>))
        .route("/users/:id/verify", post(verify_user::<H>))
        .route("/users/:id/password", post(reset_password::<H>))
        .route("/residents", get(list_residents::<H>))
        .route("/residents/stats", get(resident_stats::<H>))
        .route(
            "/residents/:id",
            put(put_resident::<H>).delete(delete_resident::<H>),
        )
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve<H: PasswordHasher + Send + Sync + 'static>(
    state: AppState<H>,
    shutdown: tokio_util::sync::CancellationToken,
) -> std::io::Result<()> {
    let addr = state.config.bind;
    log::info!("event=http_serve module=http status=start addr=http://{addr}");

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("event=http_shutdown module=http status=requested");
        })
        .await?;
    log::info!("event=http_serve module=http status=stopped");
    Ok(())
}
