use serde::{Deserialize, Serialize};
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, Session, SessionManagerLayer};
use uuid::Uuid;

use crate::{AppError, AppResult, Config};

pub const USER: &str = "user";

/// What a signed-in session knows about its user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
}

pub fn layer(config: &Config) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(config.session_idle))
}

pub async fn current_user(session: &Session) -> AppResult<Option<SessionUser>> {
    Ok(session.get::<SessionUser>(USER).await?)
}

pub async fn require_user(session: &Session) -> AppResult<SessionUser> {
    current_user(session)
        .await?
        .ok_or_else(AppError::unauthorized)
}

pub async fn sign_in(session: &Session, user: SessionUser) -> AppResult<()> {
    session.cycle_id().await?;
    session.insert(USER, user).await?;
    Ok(())
}

pub async fn sign_out(session: &Session) -> AppResult<()> {
    session.flush().await?;
    Ok(())
}
