//! Botsight: a crawler-readiness auditor
//!
//! This crate fetches a web page and its robots.txt under several simulated
//! crawler identities, extracts a fixed set of crawl signals from the markup
//! and headers, and scores how ready the page is for search engines and
//! AI-assistant retrieval bots.

pub mod config;
pub mod crawler;
pub mod report;
pub mod robots;
pub mod scoring;
pub mod signals;
pub mod url;

use thiserror::Error;

/// Main error type for audit operations
///
/// Only conditions that make scoring meaningless surface here. Degraded
/// signals (missing robots.txt, a failed agent fetch, malformed HTML) are
/// absorbed inside the audit and never become an `AuditError`.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error("Page not found at {url} (HTTP {status})")]
    NotFound { url: String, status: u16 },

    #[error("Could not reach {url}: {message}")]
    Unreachable {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}

impl AuditError {
    /// HTTP-equivalent status code for this failure
    ///
    /// * 400 for a missing or malformed URL
    /// * the target's own status (404/410) when the page does not exist
    /// * the upstream status, or 502 when the target was not reachable at all
    /// * 500 for local failures (configuration, IO)
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidUrl(_) => 400,
            Self::NotFound { status, .. } => *status,
            Self::Unreachable { status, .. } if *status != 0 => *status,
            Self::Unreachable { .. } => 502,
            Self::Config(_) | Self::HttpClient(_) | Self::Io(_) | Self::Render(_) => 500,
        }
    }

    /// Short human-readable message distinguishing the failure classes
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidUrl(_) => "Missing or malformed URL.".to_string(),
            Self::NotFound { .. } => "This page does not exist.".to_string(),
            Self::Unreachable { status: 0, .. } => "Could not reach the page.".to_string(),
            Self::Unreachable { status, .. } => {
                format!("Could not reach the page (HTTP {}).", status)
            }
            other => other.to_string(),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL is empty")]
    Empty,

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_audit, AuditOptions, Auditor};
pub use report::AuditReport;
pub use robots::{evaluate as evaluate_robots, RobotsEvaluation, RobotsRuleSet};
pub use scoring::{score_agent, AgentProfile, Signal};
pub use signals::{PageSignalExtractor, PageSignals, SignalSet};
