//! Username/password accounts and bearer-token authentication.
//!
//! Passwords are stored as argon2 PHC strings. Successful logins are issued an
//! HS256 JWT whose `sub` is the user's id; the token is presented back as
//! `Authorization: Bearer <token>`.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  Json,
  extract::{FromRequestParts, Request, State, rejection::JsonRejection},
  http::{HeaderMap, header, request::Parts},
  middleware::Next,
  response::Response,
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use pokedex_core::{store::PokedexStore, user::UserProfile};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::Error};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const MISSING_TOKEN: &str = "Missing or malformed bearer token";
const INVALID_TOKEN: &str = "Invalid or expired token";

// ─── Tokens ──────────────────────────────────────────────────────────────────

/// JWT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  pub sub:      Uuid,
  pub username: String,
  pub iat:      i64,
  pub exp:      i64,
}

/// Signing material derived from the configured secret.
#[derive(Clone)]
pub struct TokenKeys {
  encoding: EncodingKey,
  decoding: DecodingKey,
  ttl_secs: i64,
}

impl TokenKeys {
  pub fn new(secret: &str, ttl_minutes: i64) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      ttl_secs: ttl_minutes.saturating_mul(60),
    }
  }

  pub fn issue(&self, user_id: Uuid, username: &str) -> Result<String, Error> {
    let iat = Utc::now().timestamp();
    let claims = Claims {
      sub: user_id,
      username: username.to_owned(),
      iat,
      exp: iat.saturating_add(self.ttl_secs),
    };
    Ok(jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)?)
  }

  pub fn verify(&self, token: &str) -> Result<Claims, Error> {
    jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
      .map(|data| data.claims)
      .map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        Error::Unauthorized(INVALID_TOKEN)
      })
  }
}

/// Verify the bearer token in `headers`; used by both the extractor and the
/// route-guarding middleware.
pub fn verify_bearer(headers: &HeaderMap, keys: &TokenKeys) -> Result<Claims, Error> {
  let token = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .ok_or(Error::Unauthorized(MISSING_TOKEN))?;
  keys.verify(token)
}

// ─── Passwords ───────────────────────────────────────────────────────────────

pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::Hash(e.to_string()))
}

pub fn verify_password(password: &str, phc: &str) -> bool {
  PasswordHash::new(phc)
    .map(|parsed| {
      Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
    })
    .unwrap_or(false)
}

// ─── Extractor and middleware ────────────────────────────────────────────────

/// The authenticated caller; present in a handler means the token was valid.
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<AppState<S>> for AuthUser
where
  S: PokedexStore + Clone + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_bearer(&parts.headers, &state.tokens).map(AuthUser)
  }
}

/// Rejects requests without a valid bearer token before they reach a handler.
pub async fn require_bearer<S>(
  State(state): State<AppState<S>>,
  req: Request,
  next: Next,
) -> Result<Response, Error>
where
  S: PokedexStore + Clone + 'static,
{
  verify_bearer(req.headers(), &state.tokens)?;
  Ok(next.run(req).await)
}

// ─── Handlers ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

fn credentials(body: Result<Json<Credentials>, JsonRejection>) -> Result<Credentials, Error> {
  let Json(creds) = body.map_err(|e| Error::BadRequest(e.body_text()))?;
  if creds.username.trim().is_empty() || creds.password.is_empty() {
    return Err(Error::BadRequest("Username and password are required".into()));
  }
  Ok(creds)
}

/// `POST /auth/register`: body `{"username": .., "password": ..}`.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<UserProfile>, Error>
where
  S: PokedexStore + Clone + 'static,
{
  let creds = credentials(body)?;

  let existing = state
    .store
    .find_user(&creds.username)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  if existing.is_some() {
    return Err(Error::BadRequest("User already exists".into()));
  }

  let hash = hash_password(&creds.password)?;
  // A concurrent registration can still claim the name after the lookup.
  let user = state
    .store
    .create_user(creds.username, hash)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or_else(|| Error::BadRequest("User already exists".into()))?;
  Ok(Json(UserProfile::from(&user)))
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
  pub access_token: String,
}

/// `POST /auth/login`: 200 with a token, or 401.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<TokenResponse>, Error>
where
  S: PokedexStore + Clone + 'static,
{
  let creds = body
    .map(|Json(c)| c)
    .map_err(|_| Error::Unauthorized(INVALID_CREDENTIALS))?;

  let user = state
    .store
    .find_user(&creds.username)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .filter(|u| verify_password(&creds.password, &u.password_hash))
    .ok_or(Error::Unauthorized(INVALID_CREDENTIALS))?;

  let access_token = state.tokens.issue(user.user_id, &user.username)?;
  tracing::info!(user_id = %user.user_id, "login");
  Ok(Json(TokenResponse { access_token }))
}

#[derive(Debug, Serialize)]
pub struct WhoAmI {
  pub logged_in_as: Uuid,
  pub username:     String,
}

/// `GET /auth/protected`: echo the caller's identity.
pub async fn protected<S>(
  State(state): State<AppState<S>>,
  AuthUser(claims): AuthUser,
) -> Result<Json<WhoAmI>, Error>
where
  S: PokedexStore + Clone + 'static,
{
  let user = state
    .store
    .get_user(claims.sub)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::Unauthorized(INVALID_TOKEN))?;
  Ok(Json(WhoAmI { logged_in_as: user.user_id, username: user.username }))
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
      header::AUTHORIZATION,
      HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );
    headers
  }

  #[test]
  fn password_round_trip() {
    let hash = hash_password("hunter2").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("hunter2", &hash));
    assert!(!verify_password("hunter3", &hash));
    assert!(!verify_password("hunter2", "not-a-phc-string"));
  }

  #[test]
  fn issued_token_verifies() {
    let keys = TokenKeys::new("secret", 60);
    let id = Uuid::new_v4();
    let token = keys.issue(id, "ash").unwrap();

    let claims = verify_bearer(&bearer(&token), &keys).unwrap();
    assert_eq!(claims.sub, id);
    assert_eq!(claims.username, "ash");
    assert_eq!(claims.exp - claims.iat, 3600);
  }

  #[test]
  fn token_signed_with_other_secret_is_rejected() {
    let token = TokenKeys::new("other", 60).issue(Uuid::new_v4(), "ash").unwrap();
    let keys = TokenKeys::new("secret", 60);
    assert!(matches!(
      verify_bearer(&bearer(&token), &keys),
      Err(Error::Unauthorized(INVALID_TOKEN))
    ));
  }

  #[test]
  fn expired_token_is_rejected() {
    let keys = TokenKeys::new("secret", -10);
    let token = keys.issue(Uuid::new_v4(), "ash").unwrap();
    assert!(matches!(
      verify_bearer(&bearer(&token), &keys),
      Err(Error::Unauthorized(INVALID_TOKEN))
    ));
  }

  #[test]
  fn missing_or_non_bearer_header() {
    let keys = TokenKeys::new("secret", 60);
    assert!(matches!(
      verify_bearer(&HeaderMap::new(), &keys),
      Err(Error::Unauthorized(MISSING_TOKEN))
    ));

    let mut basic = HeaderMap::new();
    basic.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
    assert!(matches!(
      verify_bearer(&basic, &keys),
      Err(Error::Unauthorized(MISSING_TOKEN))
    ));
  }
}
