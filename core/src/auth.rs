//! Credential verification for dashboard users.
//!
//! RULE: plaintext passwords are never stored. Accounts hold an Argon2
//! PHC string; verification goes through the Authenticator trait so the
//! in-memory directory can be swapped for a real identity provider.

use crate::{config::UserConfig, types::SessionId};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Role '{}' may not filter by agent", role.name())]
    Forbidden { role: Role },

    #[error("User '{username}' already exists")]
    DuplicateUser { username: String },

    #[error("Stored password hash for '{username}' is malformed")]
    MalformedHash { username: String },

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Director,
    Commercial,
    Supervisor,
}

impl Role {
    /// Only management roles may drill down into individual agents.
    pub fn can_filter_by_agent(&self) -> bool {
        matches!(self, Self::Director | Self::Commercial)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Director => "director",
            Self::Commercial => "commercial",
            Self::Supervisor => "supervisor",
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An authenticated user. Logging out is dropping the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub id:       SessionId,
    pub username: String,
    pub role:     Role,
}

/// The contract every credential backend must fulfill.
pub trait Authenticator: Send + Sync {
    fn verify(&self, credentials: &Credentials) -> Result<Session, AuthError>;
}

struct StoredUser {
    role:          Role,
    password_hash: String,
}

/// In-memory user directory backed by Argon2 password hashes.
#[derive(Default)]
pub struct PasswordDirectory {
    users:  HashMap<String, StoredUser>,
    hasher: Argon2<'static>,
}

impl PasswordDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configured accounts. Every stored hash is parsed up
    /// front so a bad config fails at startup, not at first login.
    pub fn from_config(users: &[UserConfig]) -> Result<Self, AuthError> {
        let mut dir = Self::new();
        for u in users {
            dir.insert_hash(&u.username, &u.password_hash, u.role)?;
        }
        Ok(dir)
    }

    /// Hash `password` with a fresh salt and register the account.
    pub fn add_user(&mut self, username: &str, password: &str, role: Role) -> Result<(), AuthError> {
        let hash = hash_password(&self.hasher, password)?;
        self.insert_hash(username, &hash, role)
    }

    pub fn insert_hash(&mut self, username: &str, password_hash: &str, role: Role) -> Result<(), AuthError> {
        if self.users.contains_key(username) {
            return Err(AuthError::DuplicateUser { username: username.to_string() });
        }
        PasswordHash::new(password_hash)
            .map_err(|_| AuthError::MalformedHash { username: username.to_string() })?;
        self.users.insert(
            username.to_string(),
            StoredUser { role, password_hash: password_hash.to_string() },
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Authenticator for PasswordDirectory {
    fn verify(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        // Unknown user and wrong password are indistinguishable to the caller.
        let user = self
            .users
            .get(&credentials.username)
            .ok_or(AuthError::InvalidCredentials)?;
        let parsed = PasswordHash::new(&user.password_hash).map_err(|_| AuthError::MalformedHash {
            username: credentials.username.clone(),
        })?;
        self.hasher
            .verify_password(credentials.password.as_bytes(), &parsed)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let session = Session {
            id:       uuid::Uuid::new_v4().to_string(),
            username: credentials.username.clone(),
            role:     user.role,
        };
        log::info!("Login ok: user={} role={}", session.username, session.role.name());
        Ok(session)
    }
}

/// Produce a PHC-format Argon2 hash, suitable for `UserConfig::password_hash`.
pub fn hash_password(hasher: &Argon2<'_>, password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}
