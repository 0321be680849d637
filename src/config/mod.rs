//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

pub use cli::{
    AdminArgs, AdminCommand, AdminCredentialsArgs, CliArgs, Command, DatabaseOverride,
    MigrateArgs, ServeArgs, ServeOverrides,
};

use std::{net::SocketAddr, num::NonZeroU32, str::FromStr, time::Duration};

use chrono_tz::Tz;
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "folio";
const ENV_PREFIX: &str = "FOLIO";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_ADMIN_HOST: &str = "127.0.0.1";
const DEFAULT_PUBLIC_PORT: u16 = 3000;
const DEFAULT_ADMIN_PORT: u16 = 3001;
const DEFAULT_GRACEFUL_SHUTDOWN_SECS: u64 = 30;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_SESSION_TTL_HOURS: u64 = 12;
const DEFAULT_BCRYPT_COST: u32 = 12;
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;
const DEFAULT_LOGIN_WINDOW_SECS: u64 = 300;
const DEFAULT_LOGIN_MAX_ATTEMPTS: u64 = 10;
const DEFAULT_SESSION_PURGE_INTERVAL_SECS: u64 = 900;
const DEFAULT_SITE_TITLE: &str = "Portfolio";
const DEFAULT_PUBLIC_URL: &str = "http://127.0.0.1:3000/";
const DEFAULT_BLOG_PAGE_SIZE: u32 = 10;
const MAX_BLOG_PAGE_SIZE: u32 = 100;

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub site: SiteSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub public_addr: SocketAddr,
    pub admin_addr: SocketAddr,
    pub graceful_shutdown: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub session_ttl: Duration,
    pub cookie_secure: bool,
    pub bcrypt_cost: u32,
    pub login_window: Duration,
    pub login_max_attempts: NonZeroU32,
    pub session_purge_interval: Duration,
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub title: String,
    /// Always ends with `/`.
    pub public_url: String,
    pub timezone: Tz,
    pub blog_page_size: NonZeroU32,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_location: Option<String>,
    pub social_links: Vec<SocialLinkSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialLinkSettings {
    pub name: String,
    pub url: String,
    pub handle: Option<String>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::Migrate(args)) => raw.apply_database_override(&args.database),
        Some(Command::Admin(args)) => raw.apply_database_override(&args.database),
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    database: RawDatabaseSettings,
    auth: RawAuthSettings,
    site: RawSiteSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(host) = overrides.server_admin_host.as_ref() {
            self.server.admin_host = Some(host.clone());
        }
        if let Some(port) = overrides.public_port {
            self.server.public_port = Some(port);
        }
        if let Some(port) = overrides.admin_port {
            self.server.admin_port = Some(port);
        }
        if let Some(seconds) = overrides.server_graceful_shutdown_seconds {
            self.server.graceful_shutdown_seconds = Some(seconds);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(url) = overrides.database_url.as_ref() {
            self.database.url = Some(url.clone());
        }
        if let Some(max) = overrides.database_max_connections {
            self.database.max_connections = Some(max);
        }
        if let Some(hours) = overrides.auth_session_ttl_hours {
            self.auth.session_ttl_hours = Some(hours);
        }
        if let Some(secure) = overrides.auth_cookie_secure {
            self.auth.cookie_secure = Some(secure);
        }
    }

    fn apply_database_override(&mut self, overrides: &DatabaseOverride) {
        if let Some(url) = overrides.database_url.as_ref() {
            self.database.url = Some(url.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            database,
            auth,
            site,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            database: build_database_settings(database)?,
            auth: build_auth_settings(auth)?,
            site: build_site_settings(site)?,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let admin_host = server
        .admin_host
        .unwrap_or_else(|| DEFAULT_ADMIN_HOST.to_string());

    let public_port = server.public_port.unwrap_or(DEFAULT_PUBLIC_PORT);
    if public_port == 0 {
        return Err(LoadError::invalid(
            "server.public_port",
            "port must be greater than zero",
        ));
    }

    let admin_port = server.admin_port.unwrap_or(DEFAULT_ADMIN_PORT);
    if admin_port == 0 {
        return Err(LoadError::invalid(
            "server.admin_port",
            "port must be greater than zero",
        ));
    }

    let public_addr = parse_socket_addr(&host, public_port)
        .map_err(|reason| LoadError::invalid("server.public_addr", reason))?;
    let admin_addr = parse_socket_addr(&admin_host, admin_port)
        .map_err(|reason| LoadError::invalid("server.admin_addr", reason))?;

    if public_addr == admin_addr {
        return Err(LoadError::invalid(
            "server.admin_port",
            "admin listener must not share the public listener address",
        ));
    }

    let graceful_secs = server
        .graceful_shutdown_seconds
        .unwrap_or(DEFAULT_GRACEFUL_SHUTDOWN_SECS);
    let graceful_shutdown = non_zero_secs(graceful_secs, "server.graceful_shutdown_seconds")?;

    Ok(ServerSettings {
        public_addr,
        admin_addr,
        graceful_shutdown,
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_database_settings(database: RawDatabaseSettings) -> Result<DatabaseSettings, LoadError> {
    let url = trimmed(database.url);
    let max_value = database
        .max_connections
        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
    let max_connections = non_zero_u32(max_value.into(), "database.max_connections")?;

    Ok(DatabaseSettings {
        url,
        max_connections,
    })
}

fn build_auth_settings(auth: RawAuthSettings) -> Result<AuthSettings, LoadError> {
    let ttl_hours = auth.session_ttl_hours.unwrap_or(DEFAULT_SESSION_TTL_HOURS);
    if ttl_hours == 0 {
        return Err(LoadError::invalid(
            "auth.session_ttl_hours",
            "must be greater than zero",
        ));
    }
    let ttl_secs = ttl_hours.checked_mul(3600).ok_or_else(|| {
        LoadError::invalid("auth.session_ttl_hours", "value exceeds supported range")
    })?;

    let bcrypt_cost = auth.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST);
    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
        return Err(LoadError::invalid(
            "auth.bcrypt_cost",
            format!("must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}"),
        ));
    }

    let login_window = non_zero_secs(
        auth.login_window_seconds
            .unwrap_or(DEFAULT_LOGIN_WINDOW_SECS),
        "auth.login_window_seconds",
    )?;
    let login_max_attempts = non_zero_u32(
        auth.login_max_attempts
            .unwrap_or(DEFAULT_LOGIN_MAX_ATTEMPTS),
        "auth.login_max_attempts",
    )?;
    let session_purge_interval = non_zero_secs(
        auth.session_purge_interval_seconds
            .unwrap_or(DEFAULT_SESSION_PURGE_INTERVAL_SECS),
        "auth.session_purge_interval_seconds",
    )?;

    Ok(AuthSettings {
        session_ttl: Duration::from_secs(ttl_secs),
        cookie_secure: auth.cookie_secure.unwrap_or(false),
        bcrypt_cost,
        login_window,
        login_max_attempts,
        session_purge_interval,
    })
}

fn build_site_settings(site: RawSiteSettings) -> Result<SiteSettings, LoadError> {
    let title = trimmed(site.title).unwrap_or_else(|| DEFAULT_SITE_TITLE.to_string());

    let public_url = trimmed(site.public_url).unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string());
    let public_url = normalize_public_url(&public_url)
        .map_err(|reason| LoadError::invalid("site.public_url", reason))?;

    let timezone = match trimmed(site.timezone) {
        Some(name) => name
            .parse::<Tz>()
            .map_err(|err| LoadError::invalid("site.timezone", err.to_string()))?,
        None => Tz::UTC,
    };

    let page_size = site.blog_page_size.unwrap_or(DEFAULT_BLOG_PAGE_SIZE);
    if page_size > MAX_BLOG_PAGE_SIZE {
        return Err(LoadError::invalid(
            "site.blog_page_size",
            format!("must not exceed {MAX_BLOG_PAGE_SIZE}"),
        ));
    }
    let blog_page_size = non_zero_u32(page_size.into(), "site.blog_page_size")?;

    let social_links = site
        .social_links
        .into_iter()
        .map(build_social_link)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SiteSettings {
        title,
        public_url,
        timezone,
        blog_page_size,
        contact_email: trimmed(site.contact_email),
        contact_phone: trimmed(site.contact_phone),
        contact_location: trimmed(site.contact_location),
        social_links,
    })
}

fn build_social_link(raw: RawSocialLink) -> Result<SocialLinkSettings, LoadError> {
    let name = trimmed(raw.name)
        .ok_or_else(|| LoadError::invalid("site.social_links", "every link needs a name"))?;
    let url = trimmed(raw.url)
        .ok_or_else(|| LoadError::invalid("site.social_links", "every link needs a url"))?;
    let parsed = Url::parse(&url)
        .map_err(|err| LoadError::invalid("site.social_links", format!("`{url}`: {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "site.social_links",
            format!("`{url}` must use http or https"),
        ));
    }

    Ok(SocialLinkSettings {
        name,
        url,
        handle: trimmed(raw.handle),
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    admin_host: Option<String>,
    public_port: Option<u16>,
    admin_port: Option<u16>,
    graceful_shutdown_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDatabaseSettings {
    url: Option<String>,
    max_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAuthSettings {
    session_ttl_hours: Option<u64>,
    cookie_secure: Option<bool>,
    bcrypt_cost: Option<u32>,
    login_window_seconds: Option<u64>,
    login_max_attempts: Option<u64>,
    session_purge_interval_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    title: Option<String>,
    public_url: Option<String>,
    timezone: Option<String>,
    blog_page_size: Option<u32>,
    contact_email: Option<String>,
    contact_phone: Option<String>,
    contact_location: Option<String>,
    social_links: Vec<RawSocialLink>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSocialLink {
    name: Option<String>,
    url: Option<String>,
    handle: Option<String>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn normalize_public_url(value: &str) -> Result<String, String> {
    let parsed = Url::parse(value).map_err(|err| format!("invalid url `{value}`: {err}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("`{value}` must use http or https"));
    }
    let mut normalized = parsed.to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Ok(normalized)
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

fn non_zero_secs(value: u64, key: &'static str) -> Result<Duration, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    Ok(Duration::from_secs(value))
}

#[cfg(test)]
mod tests;
