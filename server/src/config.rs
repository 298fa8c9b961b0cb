//! Startup configuration, parsed once from the command line.

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::auth::Credentials;

/// Authenticated in-memory TODO list API.
#[derive(Parser)]
#[command(name = "todo-server", version, about, long_about = None)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:3000")]
    pub bind: String,

    /// Operator username accepted by /api/login
    #[arg(long)]
    pub username: String,

    /// Operator password accepted by /api/login
    #[arg(long)]
    pub password: String,

    /// Shared secret used to sign bearer tokens
    #[arg(long)]
    pub secret: String,

    /// Token lifetime in seconds (tokens never expire when omitted)
    #[arg(long)]
    pub token_ttl_secs: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address {addr:?}: {source}")]
    InvalidBind {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("token TTL must be greater than zero")]
    ZeroTtl,
}

#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub credentials: Credentials,
    pub token: TokenConfig,
}

impl ServerArgs {
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let bind = self
            .bind
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidBind {
                addr: self.bind.clone(),
                source,
            })?;

        for (field, value) in [
            ("username", &self.username),
            ("password", &self.password),
            ("secret", &self.secret),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Empty(field));
            }
        }

        let ttl = match self.token_ttl_secs {
            Some(0) => return Err(ConfigError::ZeroTtl),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(Config {
            bind,
            credentials: Credentials::new(self.username, self.password),
            token: TokenConfig {
                secret: self.secret,
                ttl,
            },
        })
    }
}
