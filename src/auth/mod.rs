/*!
 * Admin authentication.
 *
 * Two credential strategies are accepted on protected routes, tried in order:
 * a bearer JWT issued at login, then a server-side session referenced by the
 * `sid` cookie. Either one resolves to the admin row in the database; the
 * resolved admin is attached to the request as an extension.
 */

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::entities::admin;
use crate::errors::ServiceError;
use crate::AppState;

pub const SESSION_COOKIE: &str = "sid";

/// JWT payload. Carries only the admin's identity; no expiry claim is set,
/// matching the login contract where tokens stay valid until the secret rotates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
}

/// The authenticated admin, inserted into request extensions by the middleware.
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

impl From<admin::Model> for AuthAdmin {
    fn from(model: admin::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            role: model.role,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No credentials provided")]
    MissingCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Session expired or unknown")]
    InvalidSession,

    #[error("Account no longer exists")]
    UnknownAdmin,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

#[derive(Debug, Clone)]
struct Session {
    admin_id: Uuid,
    expires_at: DateTime<Utc>,
}

/// In-memory session store. Entries expire after the configured TTL and are
/// lazily evicted on lookup.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl_secs: i64,
}

impl SessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl_secs: ttl_secs as i64,
        }
    }

    /// Opens a new session for the admin and returns its opaque id.
    pub async fn open(&self, admin_id: Uuid) -> String {
        let sid: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let session = Session {
            admin_id,
            expires_at: Utc::now() + Duration::seconds(self.ttl_secs),
        };
        self.sessions.write().await.insert(sid.clone(), session);
        sid
    }

    /// Resolves a session id to the admin it belongs to, evicting it if stale.
    pub async fn resolve(&self, sid: &str) -> Option<Uuid> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(sid) {
                Some(session) if session.expires_at > Utc::now() => {
                    return Some(session.admin_id)
                }
                Some(_) => {}
                None => return None,
            }
        }
        self.sessions.write().await.remove(sid);
        None
    }

    pub async fn close(&self, sid: &str) {
        self.sessions.write().await.remove(sid);
    }
}

/// Token issuance and verification plus password hashing.
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
    pub sessions: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(jwt_secret: String, session_ttl_secs: u64) -> Self {
        Self {
            jwt_secret,
            sessions: Arc::new(SessionStore::new(session_ttl_secs)),
        }
    }

    /// Signs a token for the admin. The payload deliberately carries no `exp`.
    pub fn generate_token(&self, admin_id: Uuid, email: &str) -> Result<String, ServiceError> {
        let claims = Claims {
            sub: admin_id,
            email: email.to_string(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::InternalError(format!("Token creation failed: {}", e)))
    }

    /// Verifies a bearer token. Expiry validation is disabled because issued
    /// tokens carry no `exp` claim.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
    }

    pub fn hash_password(&self, password: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ServiceError::HashError(e.to_string()))
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, ServiceError> {
        let parsed = PasswordHash::new(hash).map_err(|e| ServiceError::HashError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn session_cookie(request: &Request) -> Option<String> {
    let raw = request
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Middleware guarding admin routes. Accepts a bearer token or a session
/// cookie; the admin is re-resolved from the database on every request so a
/// deleted account loses access immediately.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    // Credentials are copied out up front; holding a borrow of the request
    // across an await would make this future !Send.
    let bearer = bearer_token(&request).map(str::to_string);
    let sid = session_cookie(&request);
    let admin_id = resolve_admin_id(&state, bearer, sid).await?;

    let admin = admin::Entity::find_by_id(admin_id)
        .one(&*state.db)
        .await
        .map_err(|_| AuthError::UnknownAdmin)?
        .ok_or(AuthError::UnknownAdmin)?;

    debug!(admin_id = %admin.id, "admin authenticated");
    request.extensions_mut().insert(AuthAdmin::from(admin));
    Ok(next.run(request).await)
}

async fn resolve_admin_id(
    state: &AppState,
    bearer: Option<String>,
    sid: Option<String>,
) -> Result<Uuid, AuthError> {
    if let Some(token) = bearer {
        return state
            .auth
            .validate_token(&token)
            .map(|claims| claims.sub);
    }

    if let Some(sid) = sid {
        return state
            .auth
            .sessions
            .resolve(&sid)
            .await
            .ok_or(AuthError::InvalidSession);
    }

    Err(AuthError::MissingCredentials)
}
