//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every section is optional and defaults to the built-in agents,
//! thresholds and weights.
//!
//! # Example
//!
//! ```no_run
//! use botsight::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("botsight.toml")).unwrap();
//! println!("Auditing with {} agents", config.agent_profiles().len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AgentConfig, CategoryWeights, Config, FetcherConfig, ScoringConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
