use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use botsight::config::load_config;
///
/// let config = load_config(Path::new("botsight.toml")).unwrap();
/// println!("Timeout: {}s", config.fetcher.timeout_secs);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 fingerprint of the effective configuration
///
/// The fingerprint covers every value that influences a score, so two reports
/// with the same fingerprint were produced by the same weights and thresholds.
pub fn compute_config_hash(config: &Config) -> String {
    let mut hasher = Sha256::new();

    let fetcher = &config.fetcher;
    hasher.update(format!(
        "fetcher|{}|{}|{}|{}\n",
        fetcher.timeout_secs,
        fetcher.max_redirects,
        fetcher.default_user_agent,
        fetcher.default_robots_token
    ));

    let scoring = &config.scoring;
    let w = &scoring.category_weights;
    hasher.update(format!(
        "scoring|{}|{}|{}|{}|{}|{}|{}\n",
        scoring.text_ratio_min,
        scoring.strict_text_ratio_min,
        w.crawlability,
        w.discoverability,
        w.content,
        w.render,
        w.i18n
    ));

    for profile in config.agent_profiles() {
        hasher.update(format!(
            "agent|{}|{}|{}|{}",
            profile.key, profile.name, profile.user_agent, profile.robots_token
        ));
        for (signal, points) in profile.weights.iter() {
            hasher.update(format!("|{}={}", signal, points));
        }
        hasher.update("\n");
    }

    hex::encode(hasher.finalize())
}

/// Loads a configuration and returns both the config and its fingerprint
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(&config);
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Signal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[fetcher]
timeout-secs = 5
default-user-agent = "TestCrawler/1.0"
default-robots-token = "testcrawler"

[scoring]
text-ratio-min = 0.2
strict-text-ratio-min = 0.25

[[agent]]
key = "alpha"
name = "Alpha"
user-agent = "Mozilla/5.0 (compatible; AlphaBot/1.0)"
robots-token = "alphabot"

[agent.weights]
robots-allow = 40
anti-ai-directives = 30
meta-description = 10
h1 = 5
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.fetcher.timeout_secs, 5);
        assert_eq!(config.fetcher.max_redirects, 10);
        assert_eq!(config.fetcher.default_robots_token, "testcrawler");
        assert_eq!(config.scoring.text_ratio_threshold(true), 0.25);
        assert_eq!(config.agents.len(), 1);

        let profiles = config.agent_profiles();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].robots_token, "alphabot");
        assert_eq!(profiles[0].weights.get(Signal::RobotsAllow), Some(40));
        assert_eq!(profiles[0].weights.total(), 85);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.fetcher.timeout_secs, 12);
        assert_eq!(config.scoring.text_ratio_threshold(false), 0.18);
        assert_eq!(config.agent_profiles().len(), 5);
    }

    #[test]
    fn test_robots_token_derived_from_user_agent() {
        let config = parse_config(
            r#"
[[agent]]
key = "bing"
name = "Bing"
user-agent = "Mozilla/5.0 (compatible; bingbot/2.0)"
[agent.weights]
robots-allow = 50
"#,
        )
        .unwrap();
        assert_eq!(config.agent_profiles()[0].robots_token, "bingbot");
    }

    #[test]
    fn test_unknown_signal_rejected() {
        let result = parse_config(
            r#"
[[agent]]
key = "x"
name = "X"
user-agent = "X/1.0"
[agent.weights]
page-speed = 10
"#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/botsight.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[fetcher]\ntimeout-secs = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_config_hash_stable() {
        let hash1 = compute_config_hash(&Config::default());
        let hash2 = compute_config_hash(&Config::default());
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_config_hash_changes_with_weights() {
        let mut config = Config::default();
        let before = compute_config_hash(&config);
        config.scoring.text_ratio_min = 0.2;
        assert_ne!(before, compute_config_hash(&config));
    }

    #[test]
    fn test_load_config_with_hash() {
        let file = create_temp_config("[fetcher]\ntimeout-secs = 7\n");
        let (config, hash) = load_config_with_hash(file.path()).unwrap();
        assert_eq!(config.fetcher.timeout_secs, 7);
        assert_eq!(hash, compute_config_hash(&config));
    }
}
