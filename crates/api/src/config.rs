use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Directory where uploaded images are stored (default: `./uploads`).
    pub upload_dir: String,
    /// Base URL of the weather forecast API.
    pub weather_api_url: String,
    /// Base URL of the OpenAI-compatible advisor chat endpoint.
    pub advisor_api_url: String,
    /// API key for the advisor endpoint (empty disables the header).
    pub advisor_api_key: String,
    /// Model name sent to the advisor endpoint.
    pub advisor_model: String,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                                        |
    /// |-------------------------|------------------------------------------------|
    /// | `HOST`                  | `0.0.0.0`                                      |
    /// | `PORT`                  | `3000`                                         |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`                        |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                                           |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                                           |
    /// | `UPLOAD_DIR`            | `./uploads`                                    |
    /// | `WEATHER_API_URL`       | `https://api.open-meteo.com/v1/forecast`       |
    /// | `ADVISOR_API_URL`       | `https://api.openai.com/v1/chat/completions`   |
    /// | `ADVISOR_API_KEY`       | *(empty)*                                      |
    /// | `ADVISOR_MODEL`         | `gpt-4o-mini`                                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".into());

        let weather_api_url = std::env::var("WEATHER_API_URL")
            .unwrap_or_else(|_| "https://api.open-meteo.com/v1/forecast".into());

        let advisor_api_url = std::env::var("ADVISOR_API_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".into());

        let advisor_api_key = std::env::var("ADVISOR_API_KEY").unwrap_or_default();

        let advisor_model =
            std::env::var("ADVISOR_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            upload_dir,
            weather_api_url,
            advisor_api_url,
            advisor_api_key,
            advisor_model,
            jwt,
        }
    }
}
