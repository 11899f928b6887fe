/// Configuration for the authrelay server
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_uri: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            google_client_id: String::new(),
            google_client_secret: String::new(),
            google_redirect_uri: "http://localhost:3000/api/auth/callback/google".to_string(),
        }
    }
}

impl Config {
    /// Create config from environment variables
    ///
    /// Client id and secret default to empty strings when unset; the provider
    /// rejects those, which surfaces through the callback `error` path.
    pub fn from_env() -> Self {
        let host = std::env::var("AUTHRELAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("AUTHRELAY_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        Self {
            google_client_id: std::env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            google_client_secret: std::env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
            google_redirect_uri: std::env::var("GOOGLE_REDIRECT_URI").unwrap_or_else(|_| {
                format!("http://localhost:{}/api/auth/callback/google", port)
            }),
            host,
            port,
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
