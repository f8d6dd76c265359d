use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::net::SocketAddr;
use tracing::{info, warn};

pub const DEFAULT_TMDB_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Process-wide settings, read once at startup and shared read-only.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub tmdb_base_url: String,
    pub listen_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = match env::var("TMDB_API_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => {
                warn!("TMDB_API_KEY is not set - upstream requests will be rejected");
                String::new()
            }
        };
        let tmdb_base_url = env::var("TMDB_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TMDB_BASE.to_string());
        let addr = env::var("CINEVAULT_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let listen_addr = addr
            .parse()
            .with_context(|| format!("Invalid CINEVAULT_ADDR '{}'", addr))?;

        info!("Using TMDB base {}", tmdb_base_url);
        Ok(Self {
            api_key,
            tmdb_base_url: tmdb_base_url.trim_end_matches('/').to_string(),
            listen_addr,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("tmdb_base_url", &self.tmdb_base_url)
            .field("listen_addr", &self.listen_addr)
            .finish()
    }
}
