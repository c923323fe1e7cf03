use std::env;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::set_security_headers;

const DEFAULT_PORT: u16 = 3000;

pub struct Config {
    pub database_url: String,
    pub port: u16,
}

impl Config {
    /// Reads configuration from the environment. The database connection
    /// string is required; startup must fail without it.
    pub fn from_env() -> Result<Self, env::VarError> {
        let database_url = env::var("DATABASE_URL")?;
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self { database_url, port })
    }
}
