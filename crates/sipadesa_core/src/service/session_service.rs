//! Login sessions backed by opaque bearer tokens.
//!
//! # Invariants
//! - Tokens are random, never derived from user data.
//! - Closing a session is idempotent.

use super::error::ServiceResult;
use crate::model::user::User;
use crate::model::RecordId;
use crate::repo::session_repo::SessionRepository;
use chrono::Utc;
use log::info;
use rand::distributions::Alphanumeric;
use rand::Rng;

const TOKEN_LEN: usize = 48;

/// Issued session handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: RecordId,
    pub created_at_ms: i64,
}

pub struct SessionService<R: SessionRepository> {
    repo: R,
}

impl<R: SessionRepository> SessionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Issues a new session for an authenticated user.
    pub fn open(&self, user: &User) -> ServiceResult<Session> {
        let session = Session {
            token: generate_token(),
            user_id: user.id.clone(),
            created_at_ms: Utc::now().timestamp_millis(),
        };
        self.repo
            .insert_session(&session.token, &session.user_id, session.created_at_ms)?;
        info!(
            "event=session_open module=session_service status=ok user_id={}",
            session.user_id
        );
        Ok(session)
    }

    /// Current user behind `token`; `None` for unknown or closed sessions.
    pub fn resolve(&self, token: &str) -> ServiceResult<Option<User>> {
        Ok(self.repo.find_session_user(token)?)
    }

    pub fn close(&self, token: &str) -> ServiceResult<()> {
        let removed = self.repo.delete_session(token)?;
        info!("event=session_close module=session_service status=ok removed={removed}");
        Ok(())
    }
}

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}
