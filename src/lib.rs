//! Unimarket: an embeddable engine for browsing and posting campus
//! marketplace listings.
//!
//! The engine owns the listing discovery and filtering core: filter criteria,
//! a pure matching predicate, query serialization, asynchronous fetch
//! orchestration with stale-response discarding, exclusive detail selection,
//! and the listing-creation validation/submission flow. Everything
//! presentation-level (chrome, navigation, theming, auth UI) belongs to the
//! host embedding the engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Embedding shim (main.rs, or your UI)               │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │ events / actions
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Filter criteria, catalog, selection, composer    │
//! │  - Event handling with last-request-wins commits    │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Remote Layer  │   │ Worker Layer  │
//! │ (ui/)         │   │ (remote/)     │   │ (worker/)     │
//! │ - View models │   │ - Query ser.  │   │ - Fetch tasks │
//! │ - Grid cells  │   │ - HTTP client │   │ - Debounce    │
//! │ - Overlay     │   │ - API seam    │   │ - Cancellation│
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain Layer (domain/)                             │
//! │  - Listing, facet vocabularies, drafts, sessions    │
//! │  - Error taxonomy (domain/error)                    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Data Flow
//!
//! UI events mutate the filter criteria; the query serializer builds request
//! parameters; the fetch worker issues the request (superseding any fetch
//! still in flight) and answers with a response carrying the request's
//! sequence token; the handler commits only the newest token, re-filters the
//! payload through the local predicate, and the host renders the computed
//! view model. A card click drives the selection state machine.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use unimarket::remote::HttpListingApi;
//! use unimarket::worker::MarketWorker;
//! use unimarket::{handle_event, initialize, Action, Config, Event};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let api = Arc::new(HttpListingApi::new(
//!     &config.api_base_url,
//!     config.request_timeout(),
//! )?);
//! let (requests, mut responses) = MarketWorker::spawn(api, config.debounce());
//!
//! let mut state = initialize(&config);
//! let (_render, actions) =
//!     handle_event(&mut state, &Event::SetSearchText("lamp".to_string()))?;
//! for action in actions {
//!     if let Action::PostToWorker(message) = action {
//!         requests.send(message).ok();
//!     }
//! }
//!
//! if let Some(response) = responses.recv().await {
//!     handle_event(&mut state, &Event::WorkerResponse(response))?;
//! }
//! println!("{} visible listings", state.visible.len());
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod domain;
pub mod remote;
pub mod worker;

pub mod ui;

pub use app::{handle_event, Action, AppState, Event, FetchStatus, Selection, UiHooks};
pub use domain::{
    Category, Condition, Listing, ListingDraft, ListingPatch, MarketError, Result, UserSession,
};

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Engine configuration.
///
/// Values come from three layers, each overriding the previous: built-in
/// defaults, an optional TOML config file, and environment variables
/// (`UNIMARKET_API_URL`, `UNIMARKET_PRICE_CEILING`, `UNIMARKET_DEBOUNCE_MS`,
/// `UNIMARKET_TIMEOUT_SECS`, `UNIMARKET_LOG`).
///
/// # Example
///
/// ```toml
/// # unimarket.toml
/// api_base_url = "https://market.example.edu/api"
/// price_ceiling = 1000.0
/// debounce_ms = 250
/// request_timeout_secs = 10
/// log_filter = "unimarket=debug"
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the listings API.
    ///
    /// Default: `http://localhost:5002/api` (the documented local server).
    pub api_base_url: String,

    /// Upper bound of the price-range filter.
    ///
    /// The criteria clamp both bounds to `[0, ceiling]`; a `price_max` equal
    /// to the ceiling is treated as unconstrained and omitted from requests.
    /// Default: `500`.
    pub price_ceiling: f64,

    /// Delay before a catalog fetch touches the network, in milliseconds.
    ///
    /// A burst of filter edits inside the window costs one request. Set to 0
    /// for one-shot tools and tests. Default: `250`.
    pub debounce_ms: u64,

    /// Per-request timeout, in seconds.
    ///
    /// Expiry surfaces as a network error; prior data is retained.
    /// Default: `10`.
    pub request_timeout_secs: u64,

    /// Tracing filter directive (e.g. `"info"`, `"unimarket=debug"`).
    ///
    /// Consumed by the embedding shim when initializing the subscriber.
    /// Default: `None` (host decides).
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5002/api".to_string(),
            price_ceiling: 500.0,
            debounce_ms: 250,
            request_timeout_secs: 10,
            log_filter: None,
        }
    }
}

/// Serde shape of the TOML config file: every key optional.
#[derive(Debug, Default, serde::Deserialize)]
struct ConfigFile {
    api_base_url: Option<String>,
    price_ceiling: Option<f64>,
    debounce_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
    log_filter: Option<String>,
}

impl Config {
    /// Loads configuration: defaults, then the file (if given), then the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Config`] when the file exists but does not
    /// parse, or [`MarketError::Io`] when it cannot be read.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = path {
            config.merge_file(path)?;
        }
        config.merge_map(&env_overrides());
        Ok(config)
    }

    /// Merges a TOML config file over the current values.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Config`] on parse failure, [`MarketError::Io`]
    /// on read failure.
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let contents = std::fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&contents)
            .map_err(|e| MarketError::Config(format!("{}: {e}", path.display())))?;

        if let Some(v) = file.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = file.price_ceiling {
            self.price_ceiling = v;
        }
        if let Some(v) = file.debounce_ms {
            self.debounce_ms = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file.log_filter {
            self.log_filter = Some(v);
        }
        Ok(())
    }

    /// Merges string key/value overrides over the current values.
    ///
    /// Unknown keys are ignored; unparsable numeric values keep the previous
    /// setting. Keys: `api_base_url`, `price_ceiling`, `debounce_ms`,
    /// `request_timeout_secs`, `log_filter`.
    pub fn merge_map(&mut self, overrides: &BTreeMap<String, String>) {
        if let Some(v) = overrides.get("api_base_url") {
            self.api_base_url = v.clone();
        }
        if let Some(v) = overrides.get("price_ceiling") {
            if let Ok(parsed) = v.parse::<f64>() {
                self.price_ceiling = parsed;
            }
        }
        if let Some(v) = overrides.get("debounce_ms") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.debounce_ms = parsed;
            }
        }
        if let Some(v) = overrides.get("request_timeout_secs") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.request_timeout_secs = parsed;
            }
        }
        if let Some(v) = overrides.get("log_filter") {
            self.log_filter = Some(v.clone());
        }
    }

    /// Debounce window as a [`Duration`].
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Collects environment overrides into the `merge_map` key space.
fn env_overrides() -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    let pairs = [
        ("UNIMARKET_API_URL", "api_base_url"),
        ("UNIMARKET_PRICE_CEILING", "price_ceiling"),
        ("UNIMARKET_DEBOUNCE_MS", "debounce_ms"),
        ("UNIMARKET_TIMEOUT_SECS", "request_timeout_secs"),
        ("UNIMARKET_LOG", "log_filter"),
    ];
    for (env_key, config_key) in pairs {
        if let Ok(value) = std::env::var(env_key) {
            map.insert(config_key.to_string(), value);
        }
    }
    map
}

/// Creates a fresh browsing session from configuration.
///
/// The returned state starts idle with unconstrained criteria; the embedding
/// shim typically dispatches an [`Event::Refresh`] right away to populate the
/// catalog.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(api = %config.api_base_url, "initializing browsing session");
    AppState::new(config.price_ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:5002/api");
        assert_eq!(config.price_ceiling, 500.0);
        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_config_file_merges_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "api_base_url = \"https://market.example.edu/api\"\nprice_ceiling = 1000.0"
        )
        .unwrap();

        let mut config = Config::default();
        config.merge_file(file.path()).unwrap();
        assert_eq!(config.api_base_url, "https://market.example.edu/api");
        assert_eq!(config.price_ceiling, 1000.0);
        // Untouched keys keep their defaults.
        assert_eq!(config.debounce_ms, 250);
    }

    #[test]
    fn test_malformed_config_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "price_ceiling = \"not a number\"").unwrap();

        let mut config = Config::default();
        assert!(matches!(
            config.merge_file(file.path()),
            Err(MarketError::Config(_))
        ));
    }

    #[test]
    fn test_map_overrides_ignore_garbage_numbers() {
        let mut config = Config::default();
        let mut overrides = BTreeMap::new();
        overrides.insert("debounce_ms".to_string(), "soon".to_string());
        overrides.insert("api_base_url".to_string(), "http://10.0.0.2/api".to_string());
        config.merge_map(&overrides);

        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.api_base_url, "http://10.0.0.2/api");
    }

    #[test]
    fn test_initialize_starts_idle_and_unconstrained() {
        let state = initialize(&Config::default());
        assert_eq!(state.catalog.status, FetchStatus::Idle);
        assert!(state.criteria.is_unconstrained());
        assert!(state.session.is_none());
    }
}
