use crate::config::types::{AgentConfig, Config, FetcherConfig, ScoringConfig};
use crate::scoring::Signal;
use crate::ConfigError;
use std::collections::HashSet;

/// Tolerance when checking that category weights sum to 1.0
const WEIGHT_SUM_EPSILON: f64 = 1e-6;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_scoring_config(&config.scoring)?;
    validate_agents(&config.agents)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > 120 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 120, got {}",
            config.timeout_secs
        )));
    }

    if config.max_redirects > 20 {
        return Err(ConfigError::Validation(format!(
            "max-redirects must be <= 20, got {}",
            config.max_redirects
        )));
    }

    if config.default_user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "default-user-agent cannot be empty".to_string(),
        ));
    }

    if config.default_robots_token.trim().is_empty() {
        return Err(ConfigError::Validation(
            "default-robots-token cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates scoring thresholds and category weights
fn validate_scoring_config(config: &ScoringConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("text-ratio-min", config.text_ratio_min),
        ("strict-text-ratio-min", config.strict_text_ratio_min),
    ] {
        if value.is_nan() || value <= 0.0 || value >= 1.0 {
            return Err(ConfigError::Validation(format!(
                "{} must be between 0 and 1 (exclusive), got {}",
                name, value
            )));
        }
    }

    if config.strict_text_ratio_min < config.text_ratio_min {
        return Err(ConfigError::Validation(format!(
            "strict-text-ratio-min ({}) must not be below text-ratio-min ({})",
            config.strict_text_ratio_min, config.text_ratio_min
        )));
    }

    let weights = &config.category_weights;
    for (name, value) in [
        ("crawlability", weights.crawlability),
        ("discoverability", weights.discoverability),
        ("content", weights.content),
        ("render", weights.render),
        ("i18n", weights.i18n),
    ] {
        if value.is_nan() || value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "category weight '{}' must be non-negative, got {}",
                name, value
            )));
        }
    }

    if (weights.sum() - 1.0).abs() > WEIGHT_SUM_EPSILON {
        return Err(ConfigError::Validation(format!(
            "category weights must sum to 1.0, got {}",
            weights.sum()
        )));
    }

    Ok(())
}

/// Validates agent entries
fn validate_agents(agents: &[AgentConfig]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    let mut names = HashSet::new();

    for agent in agents {
        if agent.key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "agent key cannot be empty".to_string(),
            ));
        }

        if !seen.insert(agent.key.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate agent key '{}'",
                agent.key
            )));
        }

        if agent.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "agent '{}' must have a name",
                agent.key
            )));
        }

        // Names key the per-agent score map
        if !names.insert(agent.name.trim()) {
            return Err(ConfigError::Validation(format!(
                "duplicate agent name '{}' (agent '{}')",
                agent.name, agent.key
            )));
        }

        if agent.user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "agent '{}' must have a user-agent",
                agent.key
            )));
        }

        if let Some(token) = &agent.robots_token {
            if token.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "agent '{}' has an empty robots-token",
                    agent.key
                )));
            }
        }

        let total = agent.weights.total();
        if total > 100 {
            return Err(ConfigError::Validation(format!(
                "weights of agent '{}' sum to {}, must be <= 100",
                agent.key, total
            )));
        }

        // A weight of 1 rounds the half penalty up to the full weight, making
        // an out-of-range description score like a missing one
        if let Some(weight) = agent.weights.get(Signal::MetaDescription) {
            if weight < 2 {
                return Err(ConfigError::Validation(format!(
                    "meta-description weight of agent '{}' must be >= 2, got {}",
                    agent.key, weight
                )));
            }
        }
    }

    Ok(())
}
