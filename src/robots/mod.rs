//! Robots.txt handling module
//!
//! This module fetches and parses robots.txt files and answers, per crawler
//! token, whether the site root is open and whether the file carries an
//! AI-restrictive directive. Every failure path is fail-open.

mod parser;

pub use parser::{PathRule, RobotsEvaluation, RobotsRuleSet, RuleKind, WILDCARD};

use crate::crawler::{AgentFetcher, FetchResult};
use url::Url;

/// Evaluates raw robots.txt text for one agent token
///
/// # Arguments
///
/// * `robots_text` - The raw robots.txt content (may be empty)
/// * `agent_token` - The token matched against `User-agent:` groups
///
/// # Returns
///
/// The verdict for the token; empty or unparsable input allows everything.
pub fn evaluate(robots_text: &str, agent_token: &str) -> RobotsEvaluation {
    if robots_text.trim().is_empty() {
        return RobotsEvaluation::allow_all();
    }
    RobotsRuleSet::parse(robots_text).evaluate(agent_token)
}

/// Derives the robots.txt token for a crawler user-agent string
///
/// Used when an agent profile does not name its token explicitly.
pub fn token_for_user_agent(user_agent: &str) -> &'static str {
    let lower = user_agent.to_lowercase();
    if lower.contains("bingbot") {
        "bingbot"
    } else if lower.contains("googlebot") {
        "googlebot"
    } else if lower.contains("perplexity") {
        "perplexitybot"
    } else if lower.contains("claude") {
        "claudebot"
    } else if lower.contains("gptbot") || lower.contains("oai") || lower.contains("openai") {
        "gptbot"
    } else {
        WILDCARD
    }
}

/// Fetches and parses robots.txt for the origin of `page_url`
///
/// Any failure (network error, timeout, non-2xx status) yields an empty rule
/// set, which allows everything.
///
/// # Arguments
///
/// * `fetcher` - The fetcher to use
/// * `page_url` - Any URL on the audited origin
/// * `user_agent` - The user agent string to send
pub async fn fetch_robots(fetcher: &AgentFetcher, page_url: &Url, user_agent: &str) -> RobotsRuleSet {
    let robots_url = match crate::url::robots_url(page_url) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!("Cannot build robots.txt URL for {}: {}", page_url, e);
            return RobotsRuleSet::allow_all();
        }
    };

    match fetcher.fetch(robots_url.as_str(), user_agent).await {
        FetchResult::Response(page) if page.is_success() => {
            tracing::debug!("Fetched robots.txt from {} ({} bytes)", robots_url, page.body.len());
            RobotsRuleSet::parse(&page.body)
        }
        FetchResult::Response(page) => {
            tracing::debug!(
                "robots.txt at {} returned HTTP {}, allowing all",
                robots_url,
                page.status_code
            );
            RobotsRuleSet::allow_all()
        }
        FetchResult::Failure(failure) => {
            tracing::warn!(
                "Failed to fetch robots.txt from {}: {}, allowing all",
                robots_url,
                failure.error
            );
            RobotsRuleSet::allow_all()
        }
    }
}
