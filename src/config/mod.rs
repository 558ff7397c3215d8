use serde::Deserialize;

// Top-level configuration, one section per concern
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
    pub features: FeatureFlags,
}

// Application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// bcrypt hashes + signed, expiring JWTs
    Jwt,
    /// demo-only `hashed-` prefix + unsigned token
    Placeholder,
}

// Credential and token settings
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub scheme: AuthScheme,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_expires_in_hours: i64,
    pub bcrypt_cost: u32,
}

// Empty allow-list means the request origin is mirrored back
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FeatureFlags {
    pub enable_auth: bool,
    pub seed_on_startup: bool,
}

/// Flat view of the environment, as the `config` crate sees it (keys lowercased).
#[derive(Debug, Deserialize)]
struct RawEnv {
    host: String,
    port: u16,
    environment: String,
    rust_log: String,
    log_format: String,
    auth_scheme: String,
    jwt_secret: String,
    jwt_issuer: String,
    jwt_expires_in_hours: i64,
    bcrypt_cost: u32,
    cors_allowed_origins: String,
    enable_auth: bool,
    seed_on_startup: bool,
}

const DEFAULT_JWT_SECRET: &str = "change-me";

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let raw: RawEnv = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("environment", "development")?
            .set_default("rust_log", "hotel_api=debug,tower_http=debug")?
            .set_default("log_format", "pretty")?
            .set_default("auth_scheme", "jwt")?
            .set_default("jwt_secret", DEFAULT_JWT_SECRET)?
            .set_default("jwt_issuer", "hotel-api")?
            .set_default("jwt_expires_in_hours", 24)?
            .set_default("bcrypt_cost", 10)?
            .set_default("cors_allowed_origins", "")?
            .set_default("enable_auth", false)?
            .set_default("seed_on_startup", true)?
            .add_source(config::Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawEnv) -> Result<Self, config::ConfigError> {
        let log_format = match raw.log_format.trim().to_lowercase().as_str() {
            "pretty" | "" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(config::ConfigError::Message(format!(
                    "LOG_FORMAT must be pretty or json, got {}",
                    other
                )))
            }
        };
        let scheme = match raw.auth_scheme.trim().to_lowercase().as_str() {
            "jwt" | "" => AuthScheme::Jwt,
            "placeholder" => AuthScheme::Placeholder,
            other => {
                return Err(config::ConfigError::Message(format!(
                    "AUTH_SCHEME must be jwt or placeholder, got {}",
                    other
                )))
            }
        };
        if !(4..=31).contains(&raw.bcrypt_cost) {
            return Err(config::ConfigError::Message(
                "BCRYPT_COST must be between 4 and 31".to_string(),
            ));
        }
        if raw.jwt_expires_in_hours <= 0 {
            return Err(config::ConfigError::Message(
                "JWT_EXPIRES_IN_HOURS must be positive".to_string(),
            ));
        }

        Ok(Config {
            app: AppConfig {
                host: raw.host,
                port: raw.port,
                environment: raw.environment,
                rust_log: raw.rust_log,
                log_format,
            },
            auth: AuthConfig {
                scheme,
                jwt_secret: raw.jwt_secret,
                jwt_issuer: raw.jwt_issuer,
                jwt_expires_in_hours: raw.jwt_expires_in_hours,
                bcrypt_cost: raw.bcrypt_cost,
            },
            cors: CorsConfig {
                allowed_origins: split_origins(&raw.cors_allowed_origins),
            },
            features: FeatureFlags {
                enable_auth: raw.enable_auth,
                seed_on_startup: raw.seed_on_startup,
            },
        })
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn uses_default_secret(&self) -> bool {
        self.auth.jwt_secret == DEFAULT_JWT_SECRET
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
