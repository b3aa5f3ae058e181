// src/config/mod.rs
pub mod consts;
pub mod options;

pub use options::{ExtractOptions, Strictness};

use std::env;

use crate::error::{Result, ScrapeError};
use consts::URI_BASE;

pub const ENV_USERNAME: &str = "LIBRUS_USERNAME";
pub const ENV_PASSWORD: &str = "LIBRUS_PASSWORD";
pub const ENV_URI_BASE: &str = "LIBRUS_URI_BASE";

/// Account and endpoint settings, normally taken from the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub username: String,
    pub password: String,
    pub uri_base: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &"***")
            .field("uri_base", &self.uri_base)
            .finish()
    }
}

impl Config {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            uri_base: s!(URI_BASE),
        }
    }

    /// Reads `LIBRUS_USERNAME`, `LIBRUS_PASSWORD` and optional `LIBRUS_URI_BASE`.
    /// Callers that want `.env` support load it first (see `cli`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let username = lookup(ENV_USERNAME)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ScrapeError::MissingEnv(ENV_USERNAME))?;
        let password = lookup(ENV_PASSWORD)
            .filter(|v| !v.is_empty())
            .ok_or(ScrapeError::MissingEnv(ENV_PASSWORD))?;
        let uri_base = lookup(ENV_URI_BASE)
            .map(|v| v.trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| s!(URI_BASE));

        Ok(Self { username, password, uri_base })
    }
}
