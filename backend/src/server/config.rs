//! HTTP server configuration object and helpers.

use std::env;
use std::net::SocketAddr;

use tracing::warn;

use crate::domain::Role;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    bind_addr: SocketAddr,
    database_url: Option<String>,
    admin_role: Role,
}

impl ServerConfig {
    /// Construct a configuration from explicit values.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, database_url: Option<String>, admin_role: Role) -> Self {
        Self {
            bind_addr,
            database_url,
            admin_role,
        }
    }

    /// Read configuration from the environment.
    ///
    /// `BIND_ADDR` defaults to `0.0.0.0:8080`; an absent `DATABASE_URL`
    /// selects the in-memory store; `ADMIN_ROLE` overrides the role
    /// admitted to review endpoints.
    pub fn from_env() -> Result<Self, std::io::Error> {
        let raw_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr: SocketAddr = raw_addr
            .parse()
            .map_err(|err| std::io::Error::other(format!("invalid BIND_ADDR {raw_addr}: {err}")))?;

        let database_url = env::var("DATABASE_URL").ok();

        let admin_role = match env::var("ADMIN_ROLE") {
            Ok(raw) => raw
                .parse::<Role>()
                .map_err(|err| std::io::Error::other(format!("invalid ADMIN_ROLE: {err}")))?,
            Err(_) => Role::Admin,
        };

        if database_url.is_none() {
            warn!("DATABASE_URL not set; using the in-memory store");
        }

        Ok(Self {
            bind_addr,
            database_url,
            admin_role,
        })
    }

    /// Socket address the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// PostgreSQL connection string, when configured.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    /// Role admitted by the review endpoints.
    #[must_use]
    pub fn admin_role(&self) -> Role {
        self.admin_role
    }
}
