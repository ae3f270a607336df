//! Shared execution context passed to every command.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::ValueEnum;
use dotport_sdk::{PortalClient, PortalConfig, StaticToken};

use crate::cli::Cli;
use crate::config::{CliConfig, Profile, DEFAULT_API_URL};
use crate::output::{OutputFormat, OutputWriter};

/// Resolved configuration plus output plumbing for one invocation.
pub struct Context {
    /// Loaded CLI configuration
    pub config: CliConfig,

    /// Active profile name, if any
    pub profile_name: Option<String>,

    /// Active profile (default when none is configured)
    pub profile: Profile,

    /// Requested output format
    pub output_format: OutputFormat,

    /// Output writer
    pub output: OutputWriter,

    /// Verbose mode flag
    pub verbose: bool,

    /// API URL from flag or environment
    pub api_url_override: Option<String>,

    /// Bearer token from flag or environment
    pub token_override: Option<String>,
}

impl Context {
    /// Build the context from parsed arguments. A missing or unreadable
    /// config file falls back to defaults rather than failing the command.
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = CliConfig::load().unwrap_or_default();

        let profile_name = cli.profile.clone().or_else(|| config.default_profile.clone());
        let profile = config
            .get_profile(profile_name.as_deref())
            .cloned()
            .unwrap_or_default();

        // The flag wins; otherwise the persisted default, then `table`.
        let output_format = cli.output.unwrap_or_else(|| {
            OutputFormat::from_str(&config.settings.output_format, true)
                .unwrap_or(OutputFormat::Table)
        });

        Ok(Self {
            config,
            profile_name,
            profile,
            output_format,
            output: OutputWriter::new(output_format, cli.no_color),
            verbose: cli.verbose,
            api_url_override: cli.api_url.clone(),
            token_override: cli.token.clone(),
        })
    }

    /// Effective data service URL: flag, then profile, then the default.
    pub fn api_url(&self) -> &str {
        self.api_url_override
            .as_deref()
            .or(self.profile.api_url.as_deref())
            .unwrap_or(DEFAULT_API_URL)
    }

    /// Effective bearer token: flag, then profile.
    pub fn token(&self) -> Result<String> {
        self.token_override
            .clone()
            .or_else(|| self.profile.token.clone())
            .context(
                "No bearer token configured. Pass --token, set DOTPORT_TOKEN, \
                 or run `dotport config set token <value>`.",
            )
    }

    /// Rows per page for table views.
    pub fn page_size(&self) -> usize {
        self.config.settings.page_size
    }

    /// Build a portal client from the effective settings.
    pub fn create_client(&self) -> Result<PortalClient> {
        let token = self.token()?;
        let settings = &self.config.settings;

        let mut config = PortalConfig::new(self.api_url())
            .with_timeout(Duration::from_secs(settings.timeout_secs))
            .with_max_retries(settings.max_retries)
            .with_cache_ttl(Duration::from_secs(settings.cache_ttl_secs));

        if self.verbose {
            config = config.with_logging(true);
        }

        PortalClient::new(config, Arc::new(StaticToken::new(token)))
            .context("Failed to create portal client")
    }
}
