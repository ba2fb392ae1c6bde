use std::env;
use tracing::warn;

pub const DEFAULT_DOCTORS_SOURCE_URL: &str =
    "https://srijandubey.github.io/campus-api-mock/SRM-C1-25.json";
pub const DEFAULT_SERVER_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub doctors_source_url: String,
    pub server_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            doctors_source_url: env::var("DOCTORS_SOURCE_URL")
                .unwrap_or_else(|_| {
                    warn!("DOCTORS_SOURCE_URL not set, using default");
                    DEFAULT_DOCTORS_SOURCE_URL.to_string()
                }),
            server_port: match env::var("SERVER_PORT") {
                Ok(raw) => raw.parse().unwrap_or_else(|_| {
                    warn!("SERVER_PORT '{}' is not a valid port, using {}", raw, DEFAULT_SERVER_PORT);
                    DEFAULT_SERVER_PORT
                }),
                Err(_) => {
                    warn!("SERVER_PORT not set, using {}", DEFAULT_SERVER_PORT);
                    DEFAULT_SERVER_PORT
                }
            },
        };

        if !config.is_configured() {
            warn!("Application not fully configured - doctor source URL is empty");
        }

        config
    }

    pub fn with_source_url(url: impl Into<String>) -> Self {
        Self {
            doctors_source_url: url.into(),
            server_port: DEFAULT_SERVER_PORT,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.doctors_source_url.is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_source_url(DEFAULT_DOCTORS_SOURCE_URL)
    }
}
