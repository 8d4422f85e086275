//! Crawler module for fetching and auditing pages
//!
//! This module contains the core audit logic, including:
//! - HTTP fetching under simulated crawler identities
//! - Concurrent per-agent re-fetching and scoring
//! - Suggestion ranking and extras hints
//! - Overall audit coordination

mod coordinator;
mod fetcher;
mod suggestions;

pub use coordinator::{run_audit, AuditOptions, Auditor};
pub use fetcher::{
    build_http_client, AgentFetcher, FailureKind, FetchFailure, FetchResult, FetchedPage,
};
