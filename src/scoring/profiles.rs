//! Agent profiles and their weight tables
//!
//! A profile identifies one simulated crawler: the `User-Agent` it sends, the
//! robots.txt token it answers to, and how many points each signal is worth
//! for it. Profiles are immutable once the configuration is loaded.

use crate::config::AgentConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A weightable per-agent signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Signal {
    /// robots.txt leaves the root open and no noindex directive applies
    RobotsAllow,
    /// No `noai` directive and no AI block in robots.txt
    AntiAiDirectives,
    /// Enough visible text in the server-delivered HTML
    TextWithoutJs,
    /// A `<title>` is present
    MetaTitle,
    /// A meta description is present (half credit when out of range)
    MetaDescription,
    Https,
    #[serde(rename = "status-2xx")]
    Status2xx,
    Canonical,
    Schema,
    H1,
}

impl Signal {
    /// Every signal, in table order
    pub const ALL: [Signal; 10] = [
        Signal::RobotsAllow,
        Signal::AntiAiDirectives,
        Signal::TextWithoutJs,
        Signal::MetaTitle,
        Signal::MetaDescription,
        Signal::Https,
        Signal::Status2xx,
        Signal::Canonical,
        Signal::Schema,
        Signal::H1,
    ];

    /// Configuration name of the signal
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RobotsAllow => "robots-allow",
            Self::AntiAiDirectives => "anti-ai-directives",
            Self::TextWithoutJs => "text-without-js",
            Self::MetaTitle => "meta-title",
            Self::MetaDescription => "meta-description",
            Self::Https => "https",
            Self::Status2xx => "status-2xx",
            Self::Canonical => "canonical",
            Self::Schema => "schema",
            Self::H1 => "h1",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Points awarded per signal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable(BTreeMap<Signal, u32>);

impl WeightTable {
    /// Builds a table from `(signal, points)` pairs
    pub fn from_pairs(pairs: &[(Signal, u32)]) -> Self {
        Self(pairs.iter().copied().collect())
    }

    /// Points for `signal`, if the table defines it
    pub fn get(&self, signal: Signal) -> Option<u32> {
        self.0.get(&signal).copied()
    }

    /// Sum of all points, widened so oversized config weights cannot wrap
    pub fn total(&self) -> u64 {
        self.0.values().map(|&points| u64::from(points)).sum()
    }

    /// Iterates over `(signal, points)` in signal order
    pub fn iter(&self) -> impl Iterator<Item = (Signal, u32)> + '_ {
        self.0.iter().map(|(signal, points)| (*signal, *points))
    }
}

/// Static configuration of one simulated crawler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentProfile {
    /// Stable identifier
    pub key: String,
    /// Display label; keys the per-agent score map
    pub name: String,
    /// Exact `User-Agent` header
    pub user_agent: String,
    /// Lowercase token matched against robots.txt groups
    pub robots_token: String,
    /// Points per signal
    pub weights: WeightTable,
}

impl AgentProfile {
    /// Builds a profile from an `[[agent]]` configuration entry
    pub fn from_config(config: &AgentConfig) -> Self {
        let robots_token = match &config.robots_token {
            Some(token) => token.trim().to_lowercase(),
            None => crate::robots::token_for_user_agent(&config.user_agent).to_string(),
        };

        Self {
            key: config.key.clone(),
            name: config.name.clone(),
            user_agent: config.user_agent.clone(),
            robots_token,
            weights: config.weights.clone(),
        }
    }
}

/// Builds a built-in profile; weights are given in [`Signal::ALL`] order
fn builtin(key: &str, name: &str, user_agent: &str, robots_token: &str, points: [u32; 10]) -> AgentProfile {
    let pairs: Vec<(Signal, u32)> = Signal::ALL.iter().copied().zip(points).collect();
    AgentProfile {
        key: key.to_string(),
        name: name.to_string(),
        user_agent: user_agent.to_string(),
        robots_token: robots_token.to_string(),
        weights: WeightTable::from_pairs(&pairs),
    }
}

/// The five built-in crawler profiles
pub fn builtin_profiles() -> Vec<AgentProfile> {
    vec![
        builtin(
            "chatgpt",
            "ChatGPT",
            "Mozilla/5.0 (compatible; OAI-SearchBot/1.0; +https://oai.com)",
            "gptbot",
            [30, 35, 10, 5, 6, 3, 4, 3, 2, 2],
        ),
        builtin(
            "gemini",
            "Gemini",
            "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
            "googlebot",
            [28, 28, 12, 6, 7, 4, 5, 4, 4, 2],
        ),
        builtin(
            "copilot",
            "Copilot",
            "Mozilla/5.0 (compatible; bingbot/2.0; +http://www.bing.com/bingbot.htm)",
            "bingbot",
            [28, 28, 12, 5, 6, 4, 5, 4, 4, 4],
        ),
        builtin(
            "perplexity",
            "Perplexity",
            "Mozilla/5.0 (compatible; PerplexityBot/1.0; +https://perplexity.ai/bot)",
            "perplexitybot",
            [26, 30, 15, 5, 6, 4, 5, 3, 3, 3],
        ),
        builtin(
            "claude",
            "Claude",
            "Mozilla/5.0 (compatible; ClaudeBot/1.0)",
            "claudebot",
            [26, 30, 12, 6, 6, 4, 5, 3, 4, 4],
        ),
    ]
}
