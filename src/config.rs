//! Site configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Parsing goes through a lookup function
//! so the same code path is exercised by tests without touching the process
//! environment.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Configuration error raised at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable required by the selected backend is not set.
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A variable is set to a value that cannot be used.
    #[error("invalid value for {key}: {value}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },
}

/// PostgreSQL connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection string.
    pub url: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Minimum idle connections in the pool.
    pub min_connections: u32,
    /// Timeout in seconds for acquiring a connection.
    pub connect_timeout_secs: u64,
}

/// Which record store backs the gallery.
#[derive(Debug, Clone)]
pub enum RecordStoreConfig {
    /// PostgreSQL.
    Postgres(DatabaseConfig),
    /// A JSON array file at the given path.
    JsonFile(PathBuf),
    /// Process memory (lost on restart).
    Memory,
}

/// Cloudinary account settings.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    /// Cloud name (first path segment of the API URL).
    pub cloud_name: String,
    /// API key.
    pub api_key: String,
    /// API secret used to sign requests.
    pub api_secret: String,
    /// Folder uploads are placed in.
    pub folder: String,
    /// Per-call HTTP timeout. Kept well under the request timeout so a
    /// before/after upload can fail and clean up before the request is cut.
    pub timeout_secs: u64,
}

/// Which object storage keeps uploaded images.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Files on local disk, served back by the site itself.
    Local {
        /// Directory files are written to.
        dir: PathBuf,
        /// URL prefix the directory is served under.
        url_prefix: String,
    },
    /// Cloudinary.
    Cloudinary(CloudinaryConfig),
}

/// Admin principal and session settings.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Admin login name. `None` disables login.
    pub username: Option<String>,
    /// Admin passphrase. `None` disables login.
    pub password: Option<String>,
    /// Secret used to sign session cookies. Random per process when unset.
    pub session_secret: Option<String>,
    /// Session lifetime in seconds.
    pub session_ttl_secs: u64,
    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
}

/// SMTP relay settings for the contact form.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP server host.
    pub host: String,
    /// SMTP server port. 465 uses implicit TLS, anything else STARTTLS.
    pub port: u16,
    /// SMTP login.
    pub username: String,
    /// SMTP password.
    pub password: String,
    /// Mailbox the contact messages are delivered to.
    pub to: String,
    /// Mailbox the messages are sent from.
    pub from: String,
    /// SMTP round-trip timeout in seconds.
    pub timeout_secs: u64,
}

/// Top-level site configuration.
///
/// Loaded once at startup via [`SiteConfig::from_env`].
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,
    /// Directory of static pages and assets.
    pub public_dir: PathBuf,
    /// Gallery record store.
    pub record_store: RecordStoreConfig,
    /// Image object storage.
    pub storage: StorageConfig,
    /// Admin authentication.
    pub admin: AdminConfig,
    /// Contact-form relay; `None` when mail is not configured.
    pub mail: Option<MailConfig>,
    /// Maximum accepted upload request size in bytes.
    pub upload_max_bytes: usize,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl SiteConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a value cannot be parsed or a setting
    /// required by the selected backend is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`SiteConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let listen_addr = match (env.get("LISTEN_ADDR"), env.get("PORT")) {
            (Some(addr), _) => parse_value("LISTEN_ADDR", &addr)?,
            (None, Some(port)) => {
                SocketAddr::from((Ipv4Addr::UNSPECIFIED, parse_value::<u16>("PORT", &port)?))
            }
            (None, None) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 3000)),
        };

        Ok(Self {
            listen_addr,
            public_dir: env.get_or("PUBLIC_DIR", "public").into(),
            record_store: record_store(&env)?,
            storage: storage(&env)?,
            admin: AdminConfig {
                username: env.get("ADMIN_USERNAME"),
                password: env.get("ADMIN_PASSWORD"),
                session_secret: env.get("SESSION_SECRET"),
                session_ttl_secs: env.parse_or("SESSION_TTL_SECS", 86_400),
                cookie_secure: env.bool_or("SESSION_COOKIE_SECURE", false),
            },
            mail: mail(&env)?,
            upload_max_bytes: env.parse_or("UPLOAD_MAX_BYTES", 10 * 1024 * 1024),
            request_timeout_secs: env.parse_or("REQUEST_TIMEOUT_SECS", 30),
        })
    }
}

fn record_store<F>(env: &Env<F>) -> Result<RecordStoreConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let database_url = env.get("DATABASE_URL");
    let selector = env
        .get("RECORD_STORE")
        .unwrap_or_else(|| if database_url.is_some() { "postgres" } else { "json" }.to_string());

    match selector.to_ascii_lowercase().as_str() {
        "postgres" => Ok(RecordStoreConfig::Postgres(DatabaseConfig {
            url: database_url.ok_or(ConfigError::Missing("DATABASE_URL"))?,
            max_connections: env.parse_or("DATABASE_MAX_CONNECTIONS", 10),
            min_connections: env.parse_or("DATABASE_MIN_CONNECTIONS", 2),
            connect_timeout_secs: env.parse_or("DATABASE_CONNECT_TIMEOUT_SECS", 5),
        })),
        "json" => Ok(RecordStoreConfig::JsonFile(
            env.get_or("GALLERY_JSON_PATH", "data/gallery.json").into(),
        )),
        "memory" => Ok(RecordStoreConfig::Memory),
        _ => Err(ConfigError::Invalid {
            key: "RECORD_STORE",
            value: selector,
        }),
    }
}

fn storage<F>(env: &Env<F>) -> Result<StorageConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let cloud_name = env.get("CLOUDINARY_CLOUD_NAME");
    let selector = env
        .get("STORAGE_BACKEND")
        .unwrap_or_else(|| if cloud_name.is_some() { "cloudinary" } else { "local" }.to_string());

    match selector.to_ascii_lowercase().as_str() {
        "local" => Ok(StorageConfig::Local {
            dir: env.get_or("UPLOADS_DIR", "uploads").into(),
            url_prefix: env
                .get_or("UPLOADS_URL_PREFIX", "/uploads")
                .trim_end_matches('/')
                .to_string(),
        }),
        "cloudinary" => Ok(StorageConfig::Cloudinary(CloudinaryConfig {
            cloud_name: cloud_name.ok_or(ConfigError::Missing("CLOUDINARY_CLOUD_NAME"))?,
            api_key: env
                .get("CLOUDINARY_API_KEY")
                .ok_or(ConfigError::Missing("CLOUDINARY_API_KEY"))?,
            api_secret: env
                .get("CLOUDINARY_API_SECRET")
                .ok_or(ConfigError::Missing("CLOUDINARY_API_SECRET"))?,
            folder: env.get_or("CLOUDINARY_FOLDER", "gallery"),
            timeout_secs: storage_call_timeout(env.parse_or("REQUEST_TIMEOUT_SECS", 30)),
        })),
        _ => Err(ConfigError::Invalid {
            key: "STORAGE_BACKEND",
            value: selector,
        }),
    }
}

/// Budget for one object-storage call: a request may make two uploads
/// plus the record insert, all inside the request timeout.
fn storage_call_timeout(request_timeout_secs: u64) -> u64 {
    (request_timeout_secs / 3).max(1)
}

fn mail<F>(env: &Env<F>) -> Result<Option<MailConfig>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(host) = env.get("EMAIL_HOST") else {
        return Ok(None);
    };
    let port = match env.get("EMAIL_PORT") {
        Some(raw) => parse_value("EMAIL_PORT", &raw)?,
        None => 465,
    };
    let username = env.get("EMAIL_USER").ok_or(ConfigError::Missing("EMAIL_USER"))?;
    let password = env.get("EMAIL_PASS").ok_or(ConfigError::Missing("EMAIL_PASS"))?;
    let to = env.get("EMAIL_TO").ok_or(ConfigError::Missing("EMAIL_TO"))?;
    let from = env.get("EMAIL_FROM").unwrap_or_else(|| username.clone());

    Ok(Some(MailConfig {
        host,
        port,
        username,
        password,
        to,
        from,
        timeout_secs: env.parse_or("EMAIL_TIMEOUT_SECS", 10),
    }))
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}

/// Variable lookup with the defaulting helpers used above. Empty values
/// count as unset.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Parses a variable as `T`, returning `default` on missing or invalid
    /// values.
    fn parse_or<T: std::str::FromStr>(&self, key: &str, default: T) -> T {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Parses a variable as a boolean. Accepts `"true"`, `"1"`, `"false"`,
    /// `"0"` (case-insensitive). Returns `default` otherwise.
    fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.get(key).map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("true" | "1") => true,
            Some("false" | "0") => false,
            _ => default,
        }
    }
}
