//! Access control: bearer-token authentication and role authorization.
//!
//! Every protected route goes through [`AccessControl`]: `authenticate` turns an
//! `Authorization` header into a [`Principal`], `authorize` checks its role.
//! Accounts are opened and exchanged for tokens through `register` and `login`.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::clients::UserClient;
use crate::domain::{Role, User, UserCreate};
use crate::user_actor::UserError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("Access denied")]
    Forbidden,
    #[error("Token could not be issued: {0}")]
    Issue(String),
    #[error("User directory unavailable: {0}")]
    Unavailable(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("Password hashing failed: {0}")]
    Hash(String),
}

const MIN_PASSWORD_LEN: usize = 6;

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub id: String,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// JWT claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl TokenAuthority {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            role: user.role,
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| AuthError::Issue(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                AuthError::Unauthorized("Token invalid".to_string())
            })
    }
}

/// bcrypt password hashing. Work runs on the blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct Passwords {
    cost: u32,
}

impl Passwords {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let cost = self.cost;
        let password = password.to_string();
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .map_err(|e| AuthError::Hash(e.to_string()))
    }

    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .map_err(|e| AuthError::Hash(e.to_string()))
    }
}

/// A bearer token together with the account it was issued for.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// The single authentication and authorization capability.
#[derive(Clone)]
pub struct AccessControl {
    tokens: Arc<TokenAuthority>,
    passwords: Passwords,
    users: UserClient,
}

impl AccessControl {
    pub fn new(tokens: TokenAuthority, passwords: Passwords, users: UserClient) -> Self {
        Self {
            tokens: Arc::new(tokens),
            passwords,
            users,
        }
    }

    pub fn tokens(&self) -> &TokenAuthority {
        &self.tokens
    }

    pub fn passwords(&self) -> &Passwords {
        &self.passwords
    }

    /// Opens a customer account and signs it in.
    #[instrument(skip(self, password))]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<Session, AuthError> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::InvalidInput("Name, email and password are required".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidInput(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let hash = self.passwords.hash(password).await?;
        let user = self
            .users
            .create_user(UserCreate::customer(name, email).with_password_hash(hash))
            .await
            .map_err(|e| match e {
                UserError::AlreadyExists(_) => AuthError::InvalidInput("User already exists".to_string()),
                UserError::ValidationError(message) => AuthError::InvalidInput(message),
                other => AuthError::Unavailable(other.to_string()),
            })?;
        info!(user_id = %user.id, "Customer registered");

        let token = self.tokens.issue(&user)?;
        Ok(Session { token, user })
    }

    /// Exchanges an email and password for a token. With `Role::Admin` the
    /// account must also hold the admin role.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str, required: Role) -> Result<Session, AuthError> {
        let invalid = || AuthError::Unauthorized("Invalid credentials".to_string());

        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?
            .ok_or_else(invalid)?;
        let hash = user.password_hash.as_deref().ok_or_else(invalid)?;
        if !self.passwords.verify(password, hash).await? {
            debug!(user_id = %user.id, "Password mismatch");
            return Err(invalid());
        }
        if required == Role::Admin && !user.is_admin() {
            warn!(user_id = %user.id, "Admin login by non-admin account");
            return Err(AuthError::Forbidden);
        }

        let token = self.tokens.issue(&user)?;
        Ok(Session { token, user })
    }

    /// Resolves an `Authorization` header value to the current user.
    ///
    /// The role comes from the user directory, not from the token, so a role
    /// change applies to tokens already handed out.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Principal, AuthError> {
        let token = authorization
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AuthError::Unauthorized("No token".to_string()))?;

        let claims = self.tokens.verify(token)?;

        match self.users.get_user(claims.sub.clone()).await {
            Ok(Some(user)) => Ok(Principal { id: user.id, role: user.role }),
            Ok(None) | Err(UserError::NotFound(_)) => {
                warn!(user_id = %claims.sub, "Token subject no longer exists");
                Err(AuthError::Unauthorized("Invalid token".to_string()))
            }
            Err(e) => Err(AuthError::Unavailable(e.to_string())),
        }
    }

    pub fn authorize(&self, principal: &Principal, required: Role) -> Result<(), AuthError> {
        match required {
            Role::Customer => Ok(()),
            Role::Admin if principal.is_admin() => Ok(()),
            Role::Admin => {
                debug!(user_id = %principal.id, "Admin role required");
                Err(AuthError::Forbidden)
            }
        }
    }
}
