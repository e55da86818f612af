use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Seed account created on startup when no user with that name exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
}

impl Default for AdminSeed {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        }
    }
}

/// Runtime configuration, built once in `main` and handed to the router state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// Static service key accepted via `x-api-key` or `?key=`.
    pub api_key: String,
    /// HMAC secret for bearer access tokens.
    pub token_secret: String,
    pub token_ttl_minutes: i64,
    pub body_limit_bytes: usize,
    pub admin: AdminSeed,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite:rollcall.sqlite".to_string(),
            loglevel: "info".to_string(),
            api_key: "devkey".to_string(),
            token_secret: "super-secret-key-change-me".to_string(),
            token_ttl_minutes: 60,
            body_limit_bytes: 2 * 1024 * 1024,
            admin: AdminSeed::default(),
        }
    }
}

impl Config {
    /// Layer defaults, `config.toml`, then `ROLLCALL_*` environment variables.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment(Toml::file("config.toml")).extract()
    }

    fn figment(file: impl figment::Provider) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(file)
            .merge(Env::prefixed("ROLLCALL_").split("__"))
    }
}
