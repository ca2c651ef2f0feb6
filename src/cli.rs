//! Command-line interface parsing for Launchdeck
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! the `Config` the binary runs with.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::data::{FilterDirection, DEFAULT_BASE_URL};

/// Default number of pages fetched per run
const DEFAULT_PAGES: u32 = 1;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error types for CLI argument validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// At least one page must be requested
    #[error("Invalid page count: {0}. Request at least one page")]
    InvalidPageCount(u32),

    /// A zero timeout would fail every request
    #[error("Invalid timeout: timeout must be at least one second")]
    InvalidTimeout,

    /// The API root must be an http(s) URL
    #[error("Invalid base URL: '{0}'")]
    InvalidBaseUrl(String),
}

/// Launchdeck - Browse SpaceX launches from the terminal
#[derive(Parser, Debug)]
#[command(name = "launchdeck")]
#[command(about = "Browse SpaceX launches with paging, filtering and patch image caching")]
#[command(version)]
pub struct Cli {
    /// Number of pages to fetch
    #[arg(short, long, default_value_t = DEFAULT_PAGES)]
    pub pages: u32,

    /// Show only successful launches, sorted by date
    ///
    /// Valid directions: ascending (asc), descending (desc)
    #[arg(short, long, value_enum, value_name = "DIRECTION")]
    pub filter: Option<FilterDirection>,

    /// Download and cache the mission patch for every visible launch
    #[arg(long)]
    pub images: bool,

    /// Print the projection as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Skip the company info header
    #[arg(long)]
    pub no_company: bool,

    /// Root URL of the launch API
    #[arg(long, default_value = DEFAULT_BASE_URL, value_name = "URL")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_name = "SECONDS")]
    pub timeout: u64,
}

/// Runtime configuration derived from CLI arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root URL of the launch API
    pub base_url: String,
    /// Number of pages to fetch
    pub pages: u32,
    /// Filter applied after fetching
    pub filter: Option<FilterDirection>,
    /// Whether to prefetch patch images
    pub fetch_images: bool,
    /// Whether to include the company header
    pub show_company: bool,
    /// Whether to print JSON
    pub json: bool,
    /// Timeout applied to every HTTP request
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            pages: DEFAULT_PAGES,
            filter: None,
            fetch_images: false,
            show_company: true,
            json: false,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Creates a Config from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(Config)` with validated settings
    /// * `Err(ConfigError)` if a value is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.pages == 0 {
            return Err(ConfigError::InvalidPageCount(cli.pages));
        }
        if cli.timeout == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if !(cli.base_url.starts_with("http://") || cli.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(cli.base_url.clone()));
        }

        Ok(Config {
            base_url: cli.base_url.clone(),
            pages: cli.pages,
            filter: cli.filter,
            fetch_images: cli.images,
            show_company: !cli.no_company && !cli.json,
            json: cli.json,
            request_timeout: Duration::from_secs(cli.timeout),
        })
    }
}
