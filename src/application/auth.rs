//! Admin credential checks and server-side sessions.

use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::rate_limit::LoginRateLimiter;
use crate::application::repos::{
    AdminSessionsRepo, AdminUsersRepo, CreateSessionParams, RepoError,
};
use crate::domain::entities::AdminUserRecord;

pub const ADMIN_LOGIN_TOTAL: &str = "folio_admin_login_total";
pub const ADMIN_SESSIONS_PURGED_TOTAL: &str = "folio_admin_sessions_purged_total";

const TOKEN_PREFIX: &str = "fa";
const MIN_SECRET_LEN: usize = 32;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("too many login attempts")]
    Throttled { retry_after: Duration },
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Error)]
pub enum AdminAuthError {
    #[error("missing session token")]
    Missing,
    #[error("invalid session token")]
    Invalid,
    #[error("expired session")]
    Expired,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Error)]
pub enum AdminAccountError {
    #[error("`{0}` is not a valid email address")]
    InvalidEmail(String),
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("an admin with email `{0}` already exists")]
    Duplicate(String),
    #[error("no admin with email `{0}`")]
    NotFound(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Repo(RepoError),
}

/// The admin a request was authenticated as.
#[derive(Debug, Clone)]
pub struct AdminPrincipal {
    pub user_id: Uuid,
    pub email: String,
    pub session_id: Uuid,
}

/// Result of a successful login. `token` is only ever returned here.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
    pub expires_at: OffsetDateTime,
}

#[derive(Clone)]
pub struct AdminAuthService {
    users: Arc<dyn AdminUsersRepo>,
    sessions: Arc<dyn AdminSessionsRepo>,
    limiter: LoginRateLimiter,
    session_ttl: Duration,
    bcrypt_cost: u32,
}

impl AdminAuthService {
    pub fn new(
        users: Arc<dyn AdminUsersRepo>,
        sessions: Arc<dyn AdminSessionsRepo>,
        limiter: LoginRateLimiter,
        session_ttl: Duration,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            sessions,
            limiter,
            session_ttl,
            bcrypt_cost,
        }
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Forget throttling state for emails with no attempts left in the window.
    pub fn prune_login_attempts(&self) -> usize {
        self.limiter.prune()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, LoginError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }

        let bucket = email.to_lowercase();
        if !self.limiter.allow(&bucket) {
            metrics::counter!(ADMIN_LOGIN_TOTAL, "outcome" => "throttled").increment(1);
            warn!(target = "folio::auth", email = %bucket, "login throttled");
            return Err(LoginError::Throttled {
                retry_after: self.limiter.retry_after(&bucket),
            });
        }

        let Some(user) = self.users.find_by_email(email).await? else {
            metrics::counter!(ADMIN_LOGIN_TOTAL, "outcome" => "invalid").increment(1);
            return Err(LoginError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash).await? {
            metrics::counter!(ADMIN_LOGIN_TOTAL, "outcome" => "invalid").increment(1);
            return Err(LoginError::InvalidCredentials);
        }

        self.limiter.reset(&bucket);
        let issued = self.issue_session(&user).await?;
        metrics::counter!(ADMIN_LOGIN_TOTAL, "outcome" => "success").increment(1);
        info!(target = "folio::auth", admin = %user.email, "admin signed in");
        Ok(issued)
    }

    pub async fn authenticate(&self, token: &str) -> Result<AdminPrincipal, AdminAuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AdminAuthError::Missing);
        }

        let parsed = parse_token(token).ok_or(AdminAuthError::Invalid)?;
        let session = self
            .sessions
            .find_session(parsed.session_id)
            .await?
            .ok_or(AdminAuthError::Invalid)?;

        let now = OffsetDateTime::now_utc();
        if session.expires_at <= now {
            return Err(AdminAuthError::Expired);
        }

        let hashed_input = hash_secret(&parsed.secret);
        if session.token_hash.ct_eq(&hashed_input).unwrap_u8() == 0 {
            return Err(AdminAuthError::Invalid);
        }

        // best-effort last_seen update; do not block auth
        let sessions = self.sessions.clone();
        let session_id = session.id;
        tokio::spawn(async move {
            let _ = sessions.touch_session(session_id, now).await;
        });

        Ok(AdminPrincipal {
            user_id: session.user_id,
            email: session.email,
            session_id: session.id,
        })
    }

    /// Revoke the session behind `token`. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) -> Result<(), RepoError> {
        let Some(parsed) = parse_token(token.trim()) else {
            return Ok(());
        };
        match self.sessions.delete_session(parsed.session_id).await {
            Ok(()) | Err(RepoError::NotFound) => Ok(()),
            Err(err) => Err(err),
        }
    }

    pub async fn purge_expired(&self) -> Result<u64, RepoError> {
        let purged = self
            .sessions
            .delete_expired(OffsetDateTime::now_utc())
            .await?;
        if purged > 0 {
            metrics::counter!(ADMIN_SESSIONS_PURGED_TOTAL).increment(purged);
        }
        Ok(purged)
    }

    pub async fn create_admin(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AdminUserRecord, AdminAccountError> {
        let email = normalize_email(email)?;
        check_password(password)?;
        let hash = hash_password(password, self.bcrypt_cost).await?;

        self.users
            .create_admin(&email, &hash)
            .await
            .map_err(|err| match err {
                RepoError::Duplicate { .. } => AdminAccountError::Duplicate(email.clone()),
                other => AdminAccountError::Repo(other),
            })
    }

    /// Replace the password hash and revoke every session of that admin.
    pub async fn change_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<u64, AdminAccountError> {
        let email = normalize_email(email)?;
        check_password(password)?;

        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(AdminAccountError::Repo)?
            .ok_or_else(|| AdminAccountError::NotFound(email.clone()))?;

        let hash = hash_password(password, self.bcrypt_cost).await?;
        self.users
            .update_password(user.id, &hash)
            .await
            .map_err(AdminAccountError::Repo)?;

        self.sessions
            .delete_sessions_for_user(user.id)
            .await
            .map_err(AdminAccountError::Repo)
    }

    pub async fn list_admins(&self) -> Result<Vec<AdminUserRecord>, RepoError> {
        self.users.list_admins().await
    }

    async fn issue_session(&self, user: &AdminUserRecord) -> Result<IssuedSession, RepoError> {
        let session_id = Uuid::new_v4();
        let secret = generate_secret();
        let token = format!("{TOKEN_PREFIX}_{}_{secret}", session_id.simple());

        let created_at = OffsetDateTime::now_utc();
        let expires_at = created_at + self.session_ttl;

        self.sessions
            .create_session(CreateSessionParams {
                id: session_id,
                user_id: user.id,
                token_hash: hash_secret(&secret),
                created_at,
                expires_at,
            })
            .await?;

        Ok(IssuedSession {
            token,
            user_id: user.id,
            email: user.email.clone(),
            expires_at,
        })
    }
}

async fn verify_password(password: &str, hash: &str) -> Result<bool, LoginError> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(&password, &hash).unwrap_or(false))
        .await
        .map_err(|err| LoginError::Hash(err.to_string()))
}

async fn hash_password(password: &str, cost: u32) -> Result<String, AdminAccountError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(&password, cost))
        .await
        .map_err(|err| AdminAccountError::Hash(err.to_string()))?
        .map_err(|err| AdminAccountError::Hash(err.to_string()))
}

fn normalize_email(email: &str) -> Result<String, AdminAccountError> {
    let email = email.trim();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(email.to_string())
    } else {
        Err(AdminAccountError::InvalidEmail(email.to_string()))
    }
}

fn check_password(password: &str) -> Result<(), AdminAccountError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AdminAccountError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

fn hash_secret(secret: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.finalize().to_vec()
}

fn generate_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

struct ParsedToken {
    session_id: Uuid,
    secret: String,
}

fn parse_token(token: &str) -> Option<ParsedToken> {
    let mut parts = token.splitn(3, '_');
    if parts.next()? != TOKEN_PREFIX {
        return None;
    }
    let session_id = Uuid::parse_str(parts.next()?).ok()?;
    let secret = parts.next()?;
    if secret.len() < MIN_SECRET_LEN {
        return None;
    }
    Some(ParsedToken {
        session_id,
        secret: secret.to_string(),
    })
}
