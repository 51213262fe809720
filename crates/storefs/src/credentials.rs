// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};

pub const ACCESS_KEY_ENV: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN_ENV: &str = "AWS_SESSION_TOKEN";

/// Access keys for the object store
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    pub fn new<A: Into<String>, S: Into<String>>(access_key: A, secret_key: S) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: None,
        }
    }

    #[must_use]
    pub fn with_session_token<T: Into<String>>(mut self, token: T) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Supplies credentials when an object store session is established
pub trait CredentialProvider: Send + Sync {
    fn credentials(&self) -> Result<Credentials>;
}

/// Fixed credentials
#[derive(Debug, Clone)]
pub struct StaticCredentials(pub Credentials);

impl CredentialProvider for StaticCredentials {
    fn credentials(&self) -> Result<Credentials> {
        Ok(self.0.clone())
    }
}

/// Credentials from `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and the
/// optional `AWS_SESSION_TOKEN`
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvCredentials;

impl EnvCredentials {
    /// Resolve credentials through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Credentials(format!("{} is not set", name)))
        };

        Ok(Credentials {
            access_key: required(ACCESS_KEY_ENV)?,
            secret_key: required(SECRET_KEY_ENV)?,
            session_token: lookup(SESSION_TOKEN_ENV).filter(|v| !v.is_empty()),
        })
    }
}

impl CredentialProvider for EnvCredentials {
    fn credentials(&self) -> Result<Credentials> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}
