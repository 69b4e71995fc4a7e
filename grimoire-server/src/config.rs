//! Server configuration, read from the environment
//!
//! | Env Var                     | Required | Default                  |
//! |-----------------------------|----------|--------------------------|
//! | `GRIMOIRE_STORAGE_PATH`     | no       | `./grimoire_data`        |
//! | `GRIMOIRE_BIND_ADDR`        | no       | `127.0.0.1:4000`         |
//! | `GRIMOIRE_PUBLIC_URL`       | no       | `http://<bind addr>`     |
//! | `GRIMOIRE_JWT_SECRET`       | **yes**  | --                       |
//! | `GRIMOIRE_TOKEN_TTL_HOURS`  | no       | `24`                     |
//! | `GRIMOIRE_CORS_ORIGINS`     | no       | any origin               |

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_STORAGE_PATH: &str = "./grimoire_data";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:4000";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Signing settings for bearer tokens
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens
    pub secret: String,
    /// Token lifetime in hours
    pub token_ttl_hours: i64,
}

/// Which origins may call the API from a browser
#[derive(Debug, Clone, PartialEq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    /// Parse `*` or a comma-separated origin list
    pub fn parse(raw: &str) -> Self {
        if raw.trim() == "*" {
            return CorsOrigins::Any;
        }
        CorsOrigins::List(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Root directory for the book collection, accounts and images
    pub storage_path: PathBuf,
    pub bind_addr: SocketAddr,
    /// Base URL cover image references are built from
    pub public_url: String,
    pub cors_origins: CorsOrigins,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let storage_path = PathBuf::from(
            std::env::var("GRIMOIRE_STORAGE_PATH")
                .unwrap_or_else(|_| DEFAULT_STORAGE_PATH.to_string()),
        );

        let bind_addr: SocketAddr = std::env::var("GRIMOIRE_BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("GRIMOIRE_BIND_ADDR must be a socket address")?;

        let public_url = std::env::var("GRIMOIRE_PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://{bind_addr}"));

        let secret = std::env::var("GRIMOIRE_JWT_SECRET")
            .context("GRIMOIRE_JWT_SECRET must be set in the environment")?;
        if secret.is_empty() {
            bail!("GRIMOIRE_JWT_SECRET must not be empty");
        }

        let token_ttl_hours = match std::env::var("GRIMOIRE_TOKEN_TTL_HOURS") {
            Ok(raw) => raw
                .parse()
                .context("GRIMOIRE_TOKEN_TTL_HOURS must be an integer")?,
            Err(_) => DEFAULT_TOKEN_TTL_HOURS,
        };

        let cors_origins = std::env::var("GRIMOIRE_CORS_ORIGINS")
            .map(|raw| CorsOrigins::parse(&raw))
            .unwrap_or(CorsOrigins::Any);

        Ok(Self {
            storage_path,
            bind_addr,
            public_url,
            cors_origins,
            jwt: JwtConfig {
                secret,
                token_ttl_hours,
            },
        })
    }

    /// Directory cover images are written to and served from
    pub fn images_path(&self) -> PathBuf {
        self.storage_path.join(grimoire_core::assets::IMAGE_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cors_origins() {
        assert_eq!(CorsOrigins::parse(" * "), CorsOrigins::Any);
        assert_eq!(
            CorsOrigins::parse("http://localhost:4200, http://127.0.0.1:4200,"),
            CorsOrigins::List(vec![
                "http://localhost:4200".to_string(),
                "http://127.0.0.1:4200".to_string(),
            ])
        );
    }
}
