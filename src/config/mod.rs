//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::path::PathBuf;

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Directive;

const LOCAL_CONFIG_BASENAME: &str = "circolare";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_MAIL_BASE_URL: &str = "https://api.resend.com";
const DEFAULT_MAIL_FROM: &str = "Newsletter <onboarding@resend.dev>";
const DEFAULT_MAIL_PLACEHOLDER_TO: &str = "delivered@resend.dev";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";
const DEFAULT_AUTHOR: &str = "Editorial Desk";
const DEFAULT_DIGEST_SIZE: usize = 5;

/// Command-line arguments for the server binary.
#[derive(Debug, Parser)]
#[command(name = "circolare", version, about = "Circolare newsletter server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "CIRCOLARE_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the database connection URL.
    #[arg(long = "database-url", env = "DATABASE_URL", value_name = "URL")]
    pub database_url: Option<String>,

    /// Override the mail provider API key.
    #[arg(long = "mail-api-key", value_name = "KEY")]
    pub mail_api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl From<LogLevel> for Directive {
    fn from(level: LogLevel) -> Self {
        LevelFilter::from(level).into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Sender usable without domain verification in sandboxed deployments.
    pub from: String,
    /// Fixed visible `to` address; real recipients ride in bcc.
    pub placeholder_to: String,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_MAIL_BASE_URL.to_owned(),
            from: DEFAULT_MAIL_FROM.to_owned(),
            placeholder_to: DEFAULT_MAIL_PLACEHOLDER_TO.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Canonical public base URL used for deep links in email.
    pub public_url: String,
    /// Fixed author stamped onto every post at creation.
    pub author: String,
    pub digest_size: usize,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            public_url: DEFAULT_PUBLIC_URL.to_owned(),
            author: DEFAULT_AUTHOR.to_owned(),
            digest_size: DEFAULT_DIGEST_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
    pub mail: MailSettings,
    pub site: SiteSettings,
}

/// Parse the CLI and load settings with file → env → CLI precedence.
pub fn load_with_cli() -> Result<(CliArgs, Settings), ConfigError> {
    let cli = CliArgs::parse();
    let settings = load(&cli)?;
    Ok((cli, settings))
}

fn load(cli: &CliArgs) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = match &cli.config_file {
        Some(path) => builder.add_source(File::from(path.clone())),
        None => builder.add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false)),
    };

    builder = builder.add_source(
        Environment::with_prefix("CIRCOLARE")
            .separator("__")
            .try_parsing(true),
    );

    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(host) = &cli.server_host {
        settings.server.host = host.clone();
    }
    if let Some(port) = cli.server_port {
        settings.server.port = port;
    }
    if let Some(url) = &cli.database_url {
        settings.database.url = Some(url.clone());
    }
    if let Some(key) = &cli.mail_api_key {
        settings.mail.api_key = Some(key.clone());
    }

    // Deep links in outgoing mail are built from this; catch typos at boot.
    url::Url::parse(&settings.site.public_url).map_err(|err| {
        ConfigError::Message(format!(
            "site.public_url `{}` is not a valid URL: {err}",
            settings.site.public_url
        ))
    })?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, DEFAULT_PORT);
        assert_eq!(settings.database.max_connections, DEFAULT_DB_MAX_CONNECTIONS);
        assert!(settings.database.url.is_none());
        assert_eq!(settings.mail.base_url, DEFAULT_MAIL_BASE_URL);
        assert_eq!(settings.site.digest_size, DEFAULT_DIGEST_SIZE);
    }

    #[test]
    fn cli_overrides_win() {
        let cli = CliArgs {
            config_file: None,
            server_host: Some("0.0.0.0".into()),
            server_port: Some(8080),
            database_url: Some("postgres://localhost/circolare".into()),
            mail_api_key: Some("re_test".into()),
        };
        let settings = load(&cli).expect("load");
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(
            settings.database.url.as_deref(),
            Some("postgres://localhost/circolare")
        );
        assert_eq!(settings.mail.api_key.as_deref(), Some("re_test"));
    }
}
