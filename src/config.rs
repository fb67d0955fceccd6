use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_path: String,
    pub allowed_origins: Vec<String>,
    pub environment: String,
    pub session_secret_key: String,
    pub session_max_age_secs: i64,
    pub bcrypt_cost: u32,
    /// Upstream quote-of-the-day source. Carried for the presentation layer;
    /// nothing in this crate reads it beyond the startup log.
    pub quote_source_url: String,
    /// Serve quotes from the local collection only. Like `quote_source_url`,
    /// only logged here.
    pub local_mode: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/ledger.db".to_string());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let session_secret_key = env::var("SESSION_SECRET_KEY")
            .map_err(|_| "SESSION_SECRET_KEY must be set for session signing")?;

        let session_max_age_secs = env::var("SESSION_MAX_AGE_SECS")
            .unwrap_or_else(|_| "604800".to_string())
            .parse()
            .map_err(|_| "Invalid SESSION_MAX_AGE_SECS")?;

        let bcrypt_cost = env::var("BCRYPT_COST")
            .unwrap_or_else(|_| bcrypt::DEFAULT_COST.to_string())
            .parse()
            .map_err(|_| "Invalid BCRYPT_COST")?;

        let quote_source_url = env::var("QUOTE_SOURCE_URL")
            .unwrap_or_else(|_| "https://v1.hitokoto.cn/".to_string());

        let local_mode = env::var("LOCAL_MODE")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Config {
            server_host,
            server_port,
            database_path,
            allowed_origins,
            environment,
            session_secret_key,
            session_max_age_secs,
            bcrypt_cost,
            quote_source_url,
            local_mode,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
