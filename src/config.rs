//! Configuration resolution.
//!
//! Settings are gathered once in `main` into a [`Config`] value that is then
//! passed to the fetcher, the history store, and the notifiers. Sources, in
//! increasing precedence:
//!
//! 1. an optional TOML file (`--config`),
//! 2. environment variables (a `.env` file in the working directory is
//!    loaded first),
//! 3. the three positional arguments.
//!
//! ```toml
//! [search]
//! name = "Flat in Springfield"
//! url = "https://listings.example/api/search"
//! parameters = "?city=springfield&max_price=1200"
//! recipients = ["me@example.com"]
//!
//! [history]
//! dir = "/var/lib/immo-ads"
//!
//! [fetch]
//! timeout_secs = 30
//!
//! [smtp]
//! hostname = "smtp.example.com"
//! port = 587
//! username = "alerts"
//! password = "secret"
//! from = "alerts@example.com"
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `SEARCH_URL` | `search.url` |
//! | `SEARCH_NAME` | `search.name` |
//! | `SEARCH_PARAMETERS` | `search.parameters` |
//! | `EMAIL_TO` | `search.recipients` (comma-separated) |
//! | `HISTORY_DIR` | `history.dir` |
//! | `FETCH_TIMEOUT_SECS` | `fetch.timeout_secs` |
//! | `SMTP_HOSTNAME`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `EMAIL_FROM` | `smtp.*` |

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{WatchError, USAGE};

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub search: SearchConfig,
    pub history: HistoryConfig,
    pub fetch: FetchConfig,
    /// Present whenever `search.recipients` is non-empty.
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub name: String,
    /// Base endpoint; the parameters are appended verbatim.
    pub url: String,
    pub parameters: String,
    pub recipients: Vec<String>,
}

impl SearchConfig {
    pub fn request_url(&self) -> String {
        format!("{}{}", self.url, self.parameters)
    }
}

#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout_secs: u64,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone)]
pub struct SmtpConfig {
    pub hostname: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

// ── File layer ──────────────────────────────────────────────────────────

/// Contents of the optional TOML file. Every field may be left out and
/// supplied by the environment or the command line instead.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub history: HistorySection,
    #[serde(default)]
    pub fetch: FetchSection,
    #[serde(default)]
    pub smtp: SmtpSection,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct SearchSection {
    pub name: Option<String>,
    pub url: Option<String>,
    pub parameters: Option<String>,
    pub recipients: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct HistorySection {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct FetchSection {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_smtp_port() -> u16 {
    587
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct SmtpSection {
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
}

pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let file: ConfigFile =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if file.fetch.timeout_secs == 0 {
        anyhow::bail!("fetch.timeout_secs must be > 0");
    }

    Ok(file)
}

// ── Resolution ──────────────────────────────────────────────────────────

/// Merges the file layer, the environment, and the positional arguments.
///
/// `env` looks up one variable; `main` passes a closure over the process
/// environment and tests pass a map. `args` must hold zero or exactly three
/// values (`SEARCH_NAME EMAIL_RECIPIENTS SEARCH_PARAMETERS`).
pub fn resolve<F>(file: ConfigFile, env: F, args: &[String]) -> Result<Config, WatchError>
where
    F: Fn(&str) -> Option<String>,
{
    let positional = match args {
        [] => None,
        [name, recipients, parameters] => Some((name, recipients, parameters)),
        _ => return Err(WatchError::Usage(USAGE.to_string())),
    };

    let url = env("SEARCH_URL")
        .or(file.search.url)
        .ok_or_else(|| WatchError::missing("SEARCH_URL"))?;

    let (name, recipients, parameters) = match positional {
        Some((name, recipients, parameters)) => (
            name.clone(),
            split_recipients(recipients),
            parameters.clone(),
        ),
        None => {
            let name = env("SEARCH_NAME")
                .or(file.search.name)
                .ok_or_else(|| WatchError::missing("SEARCH_NAME"))?;
            let recipients = match env("EMAIL_TO") {
                Some(list) => split_recipients(&list),
                None => file.search.recipients.unwrap_or_default(),
            };
            let parameters = env("SEARCH_PARAMETERS")
                .or(file.search.parameters)
                .ok_or_else(|| WatchError::missing("SEARCH_PARAMETERS"))?;
            (name, recipients, parameters)
        }
    };

    let dir = env("HISTORY_DIR")
        .map(PathBuf::from)
        .or(file.history.dir)
        .unwrap_or_else(|| PathBuf::from("."));

    let timeout_secs = match env("FETCH_TIMEOUT_SECS") {
        Some(raw) => parse_number(&raw, "FETCH_TIMEOUT_SECS")?,
        None => file.fetch.timeout_secs,
    };
    if timeout_secs == 0 {
        return Err(WatchError::Usage(
            "FETCH_TIMEOUT_SECS must be greater than 0".to_string(),
        ));
    }

    let smtp = if recipients.is_empty() {
        None
    } else {
        Some(resolve_smtp(file.smtp, &env)?)
    };

    Ok(Config {
        search: SearchConfig {
            name,
            url,
            parameters,
            recipients,
        },
        history: HistoryConfig { dir },
        fetch: FetchConfig { timeout_secs },
        smtp,
    })
}

fn resolve_smtp<F>(file: SmtpSection, env: &F) -> Result<SmtpConfig, WatchError>
where
    F: Fn(&str) -> Option<String>,
{
    let port = match env("SMTP_PORT") {
        Some(raw) => parse_number(&raw, "SMTP_PORT")?,
        None => file.port.unwrap_or_else(default_smtp_port),
    };
    Ok(SmtpConfig {
        hostname: env("SMTP_HOSTNAME")
            .or(file.hostname)
            .ok_or_else(|| WatchError::missing("SMTP_HOSTNAME"))?,
        port,
        username: env("SMTP_USERNAME")
            .or(file.username)
            .ok_or_else(|| WatchError::missing("SMTP_USERNAME"))?,
        password: env("SMTP_PASSWORD")
            .or(file.password)
            .ok_or_else(|| WatchError::missing("SMTP_PASSWORD"))?,
        from: env("EMAIL_FROM")
            .or(file.from)
            .ok_or_else(|| WatchError::missing("EMAIL_FROM"))?,
    })
}

fn split_recipients(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number<T: std::str::FromStr>(raw: &str, variable: &str) -> Result<T, WatchError> {
    raw.trim()
        .parse()
        .map_err(|_| WatchError::Usage(format!("{} must be a number, got '{}'", variable, raw)))
}
