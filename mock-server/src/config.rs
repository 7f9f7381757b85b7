//! Listener configuration for the mock server binary.

use std::env;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Reads `HOST` and `PORT`, loading a `.env` file first when present.
    /// A `PORT` that is not a number falls back to the default.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(env::var("HOST").ok(), env::var("PORT").ok())
    }

    fn from_vars(host: Option<String>, port: Option<String>) -> Self {
        let port = match port.as_deref().map(str::parse::<u16>) {
            Some(Ok(port)) => port,
            Some(Err(err)) => {
                tracing::warn!(error = %err, "invalid PORT, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }
            None => DEFAULT_PORT,
        };
        Self {
            host: host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
