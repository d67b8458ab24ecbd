//! Tokotrends: a terminal browser for a marketplace catalog.
//!
//! Tokotrends keeps a product list synchronized with a JSON backend and shows:
//! - The full catalog, a free-text name search, or a single category
//! - Debounced search-as-you-type over the same list
//! - A detail view per product with reviews, average rating and sentiment split
//! - Health and per-endpoint diagnostics for the backend

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                      │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Session (session.rs)                               │  ← Single-owner loop
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, race tags, debounce tickets      │
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Worker Layer  │   │ API Layer     │
//! │ (ui/)         │   │ (worker/)     │   │ (api/)        │
//! │ - Rendering   │   │ - Fetch tasks │   │ - Envelopes   │
//! │ - Theming     │   │ - Responses   │   │ - Accessors   │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                                                  │
//! ┌─────────────────────────────────────────────────────┐
//! │  Transport (transport/) & Domain (domain/)          │
//! │  - HTTP client, timeouts, error classification      │
//! │  - Records, validation, statistics, errors          │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing subscriber, OpenTelemetry file export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`domain`]: Backend records, statistics and errors
//! - [`transport`]: HTTP transport seam
//! - [`api`]: Resource accessors and backend diagnostics
//! - [`worker`]: Executes fetches requested by the state machine
//! - [`session`]: Async runtime owning the state
//! - [`ui`]: Terminal rendering with theme support
//! - [`observability`]: Tracing setup
//!
//! # Configuration
//!
//! Values are layered, lowest precedence first: built-in defaults, an optional
//! TOML file, `TOKOTRENDS_*` environment variables (a `.env` file is honored),
//! and command-line flags.
//!
//! ```toml
//! api_url = "http://127.0.0.1:5000"
//! query_timeout_ms = 10000
//! probe_timeout_ms = 5000
//! debounce_ms = 400
//! trace_level = "debug"
//! trace_file = "/tmp/tokotrends-spans.jsonl"
//! ```
//!
//! # Examples
//!
//! ```rust
//! use tokotrends::{handle_event, AppState, Event};
//!
//! let mut state = AppState::default();
//! let (render, actions) = handle_event(&mut state, &Event::SearchByText("jam".into()))?;
//! assert!(render);
//! assert_eq!(actions.len(), 1);
//! # Ok::<(), tokotrends::TrendsError>(())
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod observability;
pub mod session;
pub mod transport;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event};
pub use domain::{ConfigError, Result, TrendsError};
pub use session::{Session, SessionHandle};
pub use ui::Theme;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "TOKOTRENDS_";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend base URL. Validated by [`Config::api_url`] before any request.
    pub api_url: Option<String>,

    /// Bound for catalog reads. Default: 10s
    pub query_timeout: Duration,

    /// Bound for reachability probes. Default: 5s
    pub probe_timeout: Duration,

    /// Quiescence window for search-as-you-type. Default: 400ms
    pub debounce_window: Duration,

    /// Filter directive for log output (`trace`, `debug`, `info`, ...).
    /// `RUST_LOG` takes precedence. Default: `"info"`
    pub trace_level: Option<String>,

    /// When set, finished spans are appended to this file as JSON lines.
    pub trace_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            query_timeout: Duration::from_millis(10_000),
            probe_timeout: Duration::from_millis(5_000),
            debounce_window: app::input::DEFAULT_DEBOUNCE,
            trace_level: None,
            trace_file: None,
        }
    }
}

impl Config {
    /// Overlays string values onto `self`.
    ///
    /// Recognized keys: `api_url`, `query_timeout_ms`, `probe_timeout_ms`,
    /// `debounce_ms`, `trace_level`, `trace_file`. Unknown keys are ignored;
    /// empty values clear optional settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a duration is not a whole
    /// number of milliseconds.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use std::time::Duration;
    /// use tokotrends::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_url".to_string(), "http://127.0.0.1:5000".to_string());
    /// map.insert("debounce_ms".to_string(), "250".to_string());
    ///
    /// let config = Config::default().merge(&map)?;
    /// assert_eq!(config.debounce_window, Duration::from_millis(250));
    /// # Ok::<(), tokotrends::ConfigError>(())
    /// ```
    pub fn merge(mut self, values: &BTreeMap<String, String>) -> std::result::Result<Self, ConfigError> {
        for (key, value) in values {
            let value = value.trim();
            match key.as_str() {
                "api_url" => self.api_url = non_empty(value),
                "query_timeout_ms" => self.query_timeout = parse_millis(key, value)?,
                "probe_timeout_ms" => self.probe_timeout = parse_millis(key, value)?,
                "debounce_ms" => self.debounce_window = parse_millis(key, value)?,
                "trace_level" => self.trace_level = non_empty(value),
                "trace_file" => self.trace_file = non_empty(value).map(PathBuf::from),
                other => tracing::debug!(key = other, "ignoring unknown configuration key"),
            }
        }
        Ok(self)
    }

    /// Reads a flat TOML table of configuration keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::File`] when the file is unreadable, is not TOML,
    /// or holds a nested table.
    pub fn file_values(path: &Path) -> std::result::Result<BTreeMap<String, String>, ConfigError> {
        let file_error = |reason: String| ConfigError::File {
            path: path.display().to_string(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
        let table: toml::Table = toml::from_str(&content).map_err(|e| file_error(e.to_string()))?;

        table
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    toml::Value::String(s) => s,
                    toml::Value::Integer(i) => i.to_string(),
                    toml::Value::Float(f) => f.to_string(),
                    toml::Value::Boolean(b) => b.to_string(),
                    other => {
                        return Err(file_error(format!(
                            "`{key}` must be a plain value, found {}",
                            other.type_str()
                        )))
                    }
                };
                Ok((key, value))
            })
            .collect()
    }

    /// Collects `TOKOTRENDS_*` variables as lowercase configuration keys.
    #[must_use]
    pub fn env_values<I>(vars: I) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        vars.into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|stripped| (stripped.to_ascii_lowercase(), value))
            })
            .collect()
    }

    /// Builds the effective configuration: defaults, then `file`, then the
    /// process environment (after loading `.env`), then `overrides`.
    ///
    /// # Errors
    ///
    /// Propagates file and value errors. The backend URL is not validated here;
    /// see [`Config::api_url`].
    pub fn load(
        file: Option<&Path>,
        overrides: &BTreeMap<String, String>,
    ) -> std::result::Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }

        let mut config = Self::default();
        if let Some(path) = file {
            config = config.merge(&Self::file_values(path)?)?;
        }
        config
            .merge(&Self::env_values(std::env::vars()))?
            .merge(overrides)
    }

    /// The validated backend base URL.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingApiUrl`] when unset or blank
    /// - [`ConfigError::PlaceholderApiUrl`] for unfilled template values such as
    ///   `${API_URL}`, `<backend>` or `your-backend-host`
    /// - [`ConfigError::InvalidApiUrl`] when not an absolute http(s) URL
    pub fn api_url(&self) -> std::result::Result<Url, ConfigError> {
        let raw = self
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingApiUrl)?;

        if looks_like_placeholder(raw) {
            return Err(ConfigError::PlaceholderApiUrl(raw.to_string()));
        }

        let invalid = |reason: String| ConfigError::InvalidApiUrl {
            url: raw.to_string(),
            reason,
        };
        let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }
        Ok(url)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_millis(key: &str, value: &str) -> std::result::Result<Duration, ConfigError> {
    value
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: "a whole number of milliseconds",
        })
}

fn looks_like_placeholder(raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    let bare = lower
        .split_once("://")
        .map_or(lower.as_str(), |(_, rest)| rest)
        .trim_end_matches('/');

    lower.contains("${")
        || (lower.contains('<') && lower.contains('>'))
        || ["your-", "your_", "changeme", "placeholder"]
            .iter()
            .any(|marker| lower.contains(marker))
        || ["undefined", "null"]
            .iter()
            .any(|word| leads_with_word(&lower, word) || leads_with_word(bare, word))
}

fn leads_with_word(text: &str, word: &str) -> bool {
    text.strip_prefix(word)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', ':']))
}

/// Sets up tracing and starts a session against the configured backend.
///
/// Must be called inside a tokio runtime. The backend URL is validated before
/// anything else happens, so a misconfiguration never reaches the network.
///
/// # Errors
///
/// Returns a [`ConfigError`] (wrapped in [`TrendsError`]) for a missing or
/// invalid backend URL.
pub fn initialize(config: &Config) -> Result<Session> {
    config.api_url()?;
    observability::init_tracing(config);
    tracing::debug!("initializing tokotrends session");
    Session::start(config)
}
