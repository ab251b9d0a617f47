//! SSH server connection attributes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::models::wire::nullable;
use crate::models::{require_range, require_text};

/// How to reach an SSH server registered on the Kaginawa server.
///
/// `key` and `password` are empty when the server holds none; neither is
/// shown by `Debug`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshServer {
    #[serde(deserialize_with = "nullable")]
    host: String,

    #[serde(deserialize_with = "nullable")]
    port: u16,

    #[serde(deserialize_with = "nullable")]
    user: String,

    #[serde(deserialize_with = "nullable")]
    key: String,

    #[serde(deserialize_with = "nullable")]
    password: String,
}

impl SshServer {
    pub fn builder() -> SshServerBuilder {
        SshServerBuilder::default()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Login user
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Private key in PEM format
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

fn redacted(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        "[REDACTED]"
    }
}

impl fmt::Debug for SshServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SshServer")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("key", &redacted(&self.key))
            .field("password", &redacted(&self.password))
            .finish()
    }
}

/// Builds an [`SshServer`]; `build` fails unless a host was set.
#[derive(Clone, Default)]
pub struct SshServerBuilder {
    server: SshServer,
}

impl SshServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: impl Into<String>) -> Result<Self, ValidationError> {
        self.server.host = require_text("host", host)?;
        Ok(self)
    }

    /// Sets the TCP port, 0 to 65535
    pub fn port(mut self, port: i32) -> Result<Self, ValidationError> {
        let port = require_range("port", i64::from(port), 0, i64::from(u16::MAX))?;
        self.server.port = port as u16;
        Ok(self)
    }

    pub fn user(mut self, user: impl Into<String>) -> Result<Self, ValidationError> {
        self.server.user = require_text("user", user)?;
        Ok(self)
    }

    pub fn key(mut self, key: impl Into<String>) -> Result<Self, ValidationError> {
        self.server.key = require_text("key", key)?;
        Ok(self)
    }

    pub fn password(mut self, password: impl Into<String>) -> Result<Self, ValidationError> {
        self.server.password = require_text("password", password)?;
        Ok(self)
    }

    pub fn build(self) -> Result<SshServer, ValidationError> {
        if self.server.host.is_empty() {
            return Err(ValidationError::NotSet("host"));
        }
        Ok(self.server)
    }
}

impl fmt::Debug for SshServerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SshServerBuilder")
            .field("server", &self.server)
            .finish()
    }
}
