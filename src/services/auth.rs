//! Login and credential plumbing.
//!
//! Password checking and token issuing sit behind traits. The bcrypt/JWT
//! implementations are the defaults; `PlainPasswordChecker` and
//! `StaticTokenIssuer` are demo placeholders and must not be used in
//! production: the "hash" is a fixed prefix and the token can't be verified.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::models::{Role, User};
use crate::repository::{RepositoryError, UserRepository};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("failed to hash password: {0}")]
    Hashing(String),
    #[error("failed to issue token: {0}")]
    TokenIssue(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub trait PasswordChecker: Send + Sync {
    fn hash(&self, plain: &str) -> Result<String, AuthError>;
    fn verify(&self, hashed: &str, plain: &str) -> bool;
}

/// Claims carried by issued tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user: &User) -> Result<String, AuthError>;
    fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

pub struct BcryptPasswordChecker {
    cost: u32,
}

impl BcryptPasswordChecker {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl PasswordChecker for BcryptPasswordChecker {
    fn hash(&self, plain: &str) -> Result<String, AuthError> {
        bcrypt::hash(plain, self.cost).map_err(|e| AuthError::Hashing(e.to_string()))
    }

    fn verify(&self, hashed: &str, plain: &str) -> bool {
        match bcrypt::verify(plain, hashed) {
            Ok(ok) => ok,
            Err(e) => {
                debug!("bcrypt verify failed: {}", e);
                false
            }
        }
    }
}

/// Placeholder: `hashed-<plain>`. Demo data only.
pub struct PlainPasswordChecker;

impl PasswordChecker for PlainPasswordChecker {
    fn hash(&self, plain: &str) -> Result<String, AuthError> {
        Ok(format!("hashed-{}", plain))
    }

    fn verify(&self, hashed: &str, plain: &str) -> bool {
        hashed.strip_prefix("hashed-") == Some(plain)
    }
}

pub struct JwtTokenIssuer {
    issuer: String,
    expires_in: Duration,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtTokenIssuer {
    pub fn new(secret: &str, issuer: &str, expires_in_hours: i64) -> Self {
        Self {
            issuer: issuer.to_string(),
            expires_in: Duration::hours(expires_in_hours),
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + self.expires_in).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|e| AuthError::TokenIssue(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[self.issuer.as_str()]);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("token rejected: {}", e);
                AuthError::InvalidToken
            })
    }
}

/// Placeholder: `<issuer>-<user id>-<unix seconds>`, no signature, no expiry.
pub struct StaticTokenIssuer {
    issuer: String,
}

impl StaticTokenIssuer {
    pub fn new(issuer: &str) -> Self {
        Self { issuer: issuer.to_string() }
    }
}

impl TokenIssuer for StaticTokenIssuer {
    fn issue(&self, user: &User) -> Result<String, AuthError> {
        Ok(format!("{}-{}-{}", self.issuer, user.id, Utc::now().timestamp()))
    }

    fn verify(&self, _token: &str) -> Result<Claims, AuthError> {
        Err(AuthError::InvalidToken)
    }
}

#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Checked against when the email is unknown: every failed login costs one verify.
const DUMMY_PASSWORD: &str = "hotel-api-dummy-password";

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    checker: Arc<dyn PasswordChecker>,
    issuer: Arc<dyn TokenIssuer>,
    dummy_hash: Option<String>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        checker: Arc<dyn PasswordChecker>,
        issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        let dummy_hash = match checker.hash(DUMMY_PASSWORD) {
            Ok(hash) => Some(hash),
            Err(e) => {
                error!("failed to prepare dummy password hash: {}", e);
                None
            }
        };
        Self { users, checker, issuer, dummy_hash }
    }

    pub fn password_checker(&self) -> Arc<dyn PasswordChecker> {
        self.checker.clone()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        // Unknown email and bad password look the same to the caller.
        let verified = match self.users.find_by_email(email.trim()).await? {
            Some(user) => self.checker.verify(&user.password_hash, password).then_some(user),
            None => {
                if let Some(hash) = &self.dummy_hash {
                    self.checker.verify(hash, password);
                }
                None
            }
        };
        let Some(user) = verified else {
            info!("login rejected for {}", email);
            return Err(AuthError::InvalidCredentials);
        };

        let token = self.issuer.issue(&user).map_err(|e| {
            error!("token issue failed for {}: {}", user.id, e);
            e
        })?;
        info!("user {} logged in as {}", user.id, user.role.as_str());
        Ok(LoginResponse { token, user })
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.issuer.verify(token)
    }
}
