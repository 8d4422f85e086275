use crate::scoring::{builtin_profiles, AgentProfile, WeightTable};
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure
///
/// Every section is optional; missing sections fall back to the built-in
/// defaults, and an empty `[[agent]]` list means the five built-in profiles.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default, rename = "agent")]
    pub agents: Vec<AgentConfig>,
}

impl Config {
    /// Returns the agent profiles this configuration audits with
    pub fn agent_profiles(&self) -> Vec<AgentProfile> {
        if self.agents.is_empty() {
            builtin_profiles()
        } else {
            self.agents.iter().map(AgentProfile::from_config).collect()
        }
    }
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Hard wall-clock timeout per request (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum redirects followed per request
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,

    /// User agent of the general (non-agent-specific) fetch
    #[serde(rename = "default-user-agent", default = "default_user_agent")]
    pub default_user_agent: String,

    /// Robots token checked for the general verdict
    #[serde(rename = "default-robots-token", default = "default_robots_token")]
    pub default_robots_token: String,
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            default_user_agent: default_user_agent(),
            default_robots_token: default_robots_token(),
        }
    }
}

/// Scoring thresholds and category weights
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Minimum text-to-markup ratio for "has static text"
    #[serde(rename = "text-ratio-min", default = "default_text_ratio_min")]
    pub text_ratio_min: f64,

    /// Same threshold in strict mode
    #[serde(rename = "strict-text-ratio-min", default = "default_strict_text_ratio_min")]
    pub strict_text_ratio_min: f64,

    /// Weights of the five categories in the overall score
    #[serde(rename = "category-weights", default)]
    pub category_weights: CategoryWeights,
}

impl ScoringConfig {
    /// Threshold for the given mode
    pub fn text_ratio_threshold(&self, strict: bool) -> f64 {
        if strict {
            self.strict_text_ratio_min
        } else {
            self.text_ratio_min
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            text_ratio_min: default_text_ratio_min(),
            strict_text_ratio_min: default_strict_text_ratio_min(),
            category_weights: CategoryWeights::default(),
        }
    }
}

/// Weights of the categories in the overall score (sum to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CategoryWeights {
    pub crawlability: f64,
    pub discoverability: f64,
    pub content: f64,
    pub render: f64,
    pub i18n: f64,
}

impl CategoryWeights {
    pub fn sum(&self) -> f64 {
        self.crawlability + self.discoverability + self.content + self.render + self.i18n
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            crawlability: 0.35,
            discoverability: 0.25,
            content: 0.20,
            render: 0.15,
            i18n: 0.05,
        }
    }
}

/// One `[[agent]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Stable identifier (e.g., "chatgpt")
    pub key: String,

    /// Display label (e.g., "ChatGPT")
    pub name: String,

    /// Exact `User-Agent` header sent for this agent
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Token matched against robots.txt groups; derived from the user agent
    /// when omitted
    #[serde(rename = "robots-token", default)]
    pub robots_token: Option<String>,

    /// Points per signal
    pub weights: WeightTable,
}

fn default_timeout_secs() -> u64 {
    12
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; OAI-SearchBot/1.0; +https://openai.com/searchbot)".to_string()
}

fn default_robots_token() -> String {
    "oai-searchbot".to_string()
}

fn default_text_ratio_min() -> f64 {
    0.18
}

fn default_strict_text_ratio_min() -> f64 {
    0.22
}
