//! DOT Transportation Data Portal SDK
//!
//! This crate provides a Rust client for the DOT transportation data
//! service. It offers typed record access for every dataset, a shared
//! snapshot cache, and a schema-driven table engine covering paging,
//! form validation, and mutations.
//!
//! # Features
//!
//! - **Typed record clients**: Strongly-typed reads and writes per entity
//! - **Schema-driven tables**: Columns, form fields, and validation from one declarative schema
//! - **Snapshot caching**: Shared TTL cache with cross-dataset invalidation on writes
//! - **Automatic retries**: Transient failures retried with exponential backoff
//! - **Bearer authentication**: Pluggable token providers, consulted on every attempt
//! - **Comprehensive error handling**: Detailed error types with retryability
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dotport_core::RailroadAccident;
//! use dotport_sdk::{PortalClient, ReadQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PortalClient::builder("http://localhost:5000/api")
//!         .with_token("your-bearer-token")
//!         .build()?;
//!
//!     // Read the most recent railroad accidents
//!     let accidents = client.records::<RailroadAccident>("RailroadAccident");
//!     let page = accidents
//!         .list(&ReadQuery::new().with_top(25).with_order_by("AccidentDate desc"))
//!         .await?;
//!     println!("Fetched {} of {:?} accidents", page.value.len(), page.count);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```rust,no_run
//! use dotport_sdk::PortalClient;
//! use std::time::Duration;
//!
//! let client = PortalClient::builder("https://data.transportation.example.gov/api")
//!     .with_token("token")
//!     .with_timeout(Duration::from_secs(60))
//!     .with_max_retries(5)
//!     .with_cache_ttl(Duration::from_secs(120))
//!     .build()?;
//! # Ok::<(), dotport_sdk::PortalError>(())
//! ```
//!
//! # Error Handling
//!
//! ```rust,no_run
//! use dotport_sdk::{PortalClient, PortalError};
//!
//! async fn handle_errors(client: &PortalClient) {
//!     match client.states().await {
//!         Ok(states) => println!("Loaded {} states", states.len()),
//!         Err(PortalError::Authentication(msg)) => eprintln!("Auth failed: {}", msg),
//!         Err(PortalError::Api { status, message }) => {
//!             eprintln!("API Error ({}): {}", status, message)
//!         }
//!         Err(e) => eprintln!("Other error: {}", e),
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod records;
pub mod store;
pub mod table;

// Re-export main types for convenience
pub use auth::{StaticToken, TokenProvider};
pub use client::HttpClient;
pub use config::PortalConfig;
pub use error::{PortalError, PortalResult};
pub use query::{ReadQuery, ValueEnvelope};
pub use records::RecordsClient;
pub use store::{Snapshot, SnapshotStore, CATEGORY_SUMMARY_KEY, STATE_KEY};
pub use table::{
    Align, Breakpoint, ColumnSpec, RecordTable, RenderFn, RenderHelpers, SubmitOutcome,
    TableSchema, DEFAULT_FETCH_CAP,
};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dotport_core::{CategorySummary, State, StateDirectory, TableRecord};

/// The main client for the transportation data service.
///
/// Owns the HTTP transport and the shared snapshot store. Tables built
/// through [`table`](Self::table) share both, so a successful mutation in
/// one dataset invalidates the cached category rollup everywhere else.
///
/// # Example
///
/// ```rust,no_run
/// use dotport_sdk::PortalClient;
///
/// # async fn example() -> Result<(), dotport_sdk::PortalError> {
/// let client = PortalClient::builder("http://localhost:5000/api")
///     .with_token("your-bearer-token")
///     .build()?;
///
/// let states = client.states().await?;
/// let summaries = client.category_summaries().await?;
/// println!("{} states, {} categories", states.len(), summaries.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: Arc<HttpClient>,
    store: Arc<SnapshotStore>,
}

impl PortalClient {
    /// Create a client from a configuration and a token provider.
    ///
    /// The snapshot store's freshness window comes from the
    /// configuration's `cache_ttl`.
    pub fn new(config: PortalConfig, tokens: Arc<dyn TokenProvider>) -> PortalResult<Self> {
        let cache_ttl = config.cache_ttl;
        let http = Arc::new(HttpClient::new(config, tokens)?);

        Ok(Self {
            http,
            store: Arc::new(SnapshotStore::new(cache_ttl)),
        })
    }

    /// Create a client using a builder pattern.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use dotport_sdk::PortalClient;
    /// use std::time::Duration;
    ///
    /// let client = PortalClient::builder("http://localhost:5000/api")
    ///     .with_token("your-bearer-token")
    ///     .with_timeout(Duration::from_secs(30))
    ///     .build()?;
    /// # Ok::<(), dotport_sdk::PortalError>(())
    /// ```
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// The underlying HTTP client, for requests the typed clients do not
    /// cover.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// The shared snapshot store.
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// The base URL of the data service.
    pub fn base_url(&self) -> &str {
        &self.http.config().base_url
    }

    /// A typed record client for one entity.
    pub fn records<T: TableRecord>(&self, entity: impl Into<String>) -> RecordsClient<T> {
        RecordsClient::new(Arc::clone(&self.http), entity)
    }

    /// A table engine for one dataset schema, sharing this client's
    /// transport and snapshot store.
    pub fn table<T: TableRecord>(&self, schema: TableSchema<T>) -> RecordTable<T> {
        RecordTable::new(schema, Arc::clone(&self.http), Arc::clone(&self.store))
    }

    /// The state reference directory, cached after the first fetch.
    pub async fn states(&self) -> PortalResult<StateDirectory> {
        if let Some(snapshot) = self.store.get::<State>(STATE_KEY) {
            return Ok(StateDirectory::new(snapshot.records.as_ref().clone()));
        }

        let query = ReadQuery::new().with_order_by("Name");
        let envelope = self.records::<State>("State").list(&query).await?;
        let snapshot = Snapshot::new(envelope.value, envelope.count);
        self.store.insert(STATE_KEY, snapshot.clone());
        Ok(StateDirectory::new(snapshot.records.as_ref().clone()))
    }

    /// Per-category record counts for the dashboard, cached after the
    /// first fetch and invalidated by every successful mutation.
    pub async fn category_summaries(&self) -> PortalResult<Snapshot<CategorySummary>> {
        if let Some(snapshot) = self.store.get::<CategorySummary>(CATEGORY_SUMMARY_KEY) {
            return Ok(snapshot);
        }

        let envelope = self
            .records::<CategorySummary>("CategorySummary")
            .list(&ReadQuery::new())
            .await?;
        let snapshot = Snapshot::new(envelope.value, envelope.count);
        self.store.insert(CATEGORY_SUMMARY_KEY, snapshot.clone());
        Ok(snapshot)
    }
}

/// Builder for creating a [`PortalClient`] with fluent configuration.
pub struct ClientBuilder {
    config: PortalConfig,
    tokens: Option<Arc<dyn TokenProvider>>,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("has_tokens", &self.tokens.is_some())
            .finish()
    }
}

impl ClientBuilder {
    /// Start a builder targeting the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: PortalConfig::new(base_url),
            tokens: None,
        }
    }

    /// Authenticate every request with a fixed bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.tokens = Some(Arc::new(StaticToken::new(token)));
        self
    }

    /// Authenticate with a custom token provider.
    pub fn with_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(provider);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_connect_timeout(timeout);
        self
    }

    /// Set the maximum number of retries for transient failures.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.config = self.config.with_max_retries(max_retries);
        self
    }

    /// Enable or disable response logging.
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.config = self.config.with_logging(enable);
        self
    }

    /// Set how long cached snapshots stay fresh.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.config = self.config.with_cache_ttl(ttl);
        self
    }

    /// Build the client.
    ///
    /// Fails when no token provider was configured or the configuration
    /// is invalid.
    pub fn build(self) -> PortalResult<PortalClient> {
        let tokens = self.tokens.ok_or_else(|| {
            PortalError::Configuration(
                "a token provider is required; call with_token or with_token_provider".to_string(),
            )
        })?;
        PortalClient::new(self.config, tokens)
    }
}
