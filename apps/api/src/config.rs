use anyhow::{bail, Context, Result};

/// Minimum length of `SESSION_SECRET`, in bytes.
pub const MIN_SESSION_SECRET_LEN: usize = 32;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub s3_region: String,
    /// Base URL written into stored resume links. Defaults to `s3_endpoint`.
    pub s3_public_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub session_secret: String,
    pub session_cookie_secure: bool,
    pub session_ttl_days: i64,
    pub bcrypt_cost: u32,
    pub max_resume_bytes: usize,
    pub run_migrations: bool,
    pub admin: Option<AdminSeed>,
    pub port: u16,
    pub rust_log: String,
}

/// Credentials for the admin account created at startup.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3_endpoint = require_env("S3_ENDPOINT")?;
        let session_secret = require_env("SESSION_SECRET")?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            bail!("SESSION_SECRET must be at least {MIN_SESSION_SECRET_LEN} bytes long");
        }

        let admin = match (
            std::env::var("ADMIN_EMAIL").ok(),
            std::env::var("ADMIN_PASSWORD").ok(),
        ) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminSeed {
                    name: std::env::var("ADMIN_NAME")
                        .unwrap_or_else(|_| "Administrator".to_string()),
                    email,
                    password,
                })
            }
            _ => None,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            s3_public_url: std::env::var("S3_PUBLIC_URL").unwrap_or_else(|_| s3_endpoint.clone()),
            s3_endpoint,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            session_secret,
            session_cookie_secure: parse_env("SESSION_COOKIE_SECURE", false)?,
            session_ttl_days: parse_env("SESSION_TTL_DAYS", 14)?,
            bcrypt_cost: parse_env("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            max_resume_bytes: parse_env("MAX_RESUME_BYTES", 10 * 1024 * 1024)?,
            run_migrations: parse_env("RUN_MIGRATIONS", true)?,
            admin,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
