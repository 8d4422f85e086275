//! Robots.txt parser implementation
//!
//! A deliberately coarse reading of the robots exclusion format: rules are
//! grouped per user-agent token and only a full-site `Disallow: /` counts as
//! a block. There is no longest-match precedence between allow and disallow.

use std::collections::HashMap;

/// Substrings that identify AI retrieval crawlers in a robots.txt file
const AI_CRAWLER_MARKERS: &[&str] = &[
    "gptbot",
    "oai",
    "openai",
    "chatgpt",
    "perplexity",
    "claude",
    "anthropic",
    "google-extended",
    "ccbot",
];

/// Token of the wildcard group
pub const WILDCARD: &str = "*";

/// Kind of a path rule inside a user-agent group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Allow,
    Disallow,
}

/// One `Allow:`/`Disallow:` line of a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRule {
    pub kind: RuleKind,
    pub path: String,
}

impl std::fmt::Display for PathRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            RuleKind::Allow => write!(f, "Allow: {}", self.path),
            RuleKind::Disallow => write!(f, "Disallow: {}", self.path),
        }
    }
}

/// Verdict for one agent token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobotsEvaluation {
    /// False only when the selected group disallows `/`
    pub allowed: bool,
    /// The file names an AI crawler and disallows something
    pub has_ai_block_signal: bool,
}

impl RobotsEvaluation {
    /// Fail-open verdict used when robots.txt is missing or unreadable
    pub fn allow_all() -> Self {
        Self {
            allowed: true,
            has_ai_block_signal: false,
        }
    }
}

impl Default for RobotsEvaluation {
    fn default() -> Self {
        Self::allow_all()
    }
}

/// Parsed robots.txt rules
///
/// Built fresh from one fetch of robots.txt and shared read-only between the
/// agents of a single audit.
#[derive(Debug, Clone, Default)]
pub struct RobotsRuleSet {
    /// Lowercase user-agent token -> rules in file order
    groups: HashMap<String, Vec<PathRule>>,
    /// `Sitemap:` URLs, in file order
    sitemaps: Vec<String>,
    /// Agent-independent AI block heuristic
    has_ai_block_signal: bool,
}

impl RobotsRuleSet {
    /// Parses raw robots.txt content
    ///
    /// Parsing never fails: lines that are not `key: value` pairs are skipped,
    /// so unparsable input yields an empty rule set that allows everything.
    pub fn parse(content: &str) -> Self {
        let mut groups: HashMap<String, Vec<PathRule>> = HashMap::new();
        let mut sitemaps = Vec::new();
        let mut current: Option<String> = None;

        for line in content.lines() {
            // Strip inline comments, then surrounding whitespace
            let line = match line.find('#') {
                Some(idx) => &line[..idx],
                None => line,
            };
            let trimmed = line.trim();

            if trimmed.is_empty() {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            if value.is_empty() {
                continue;
            }

            match key.as_str() {
                "user-agent" => {
                    let token = value.to_lowercase();
                    groups.entry(token.clone()).or_default();
                    current = Some(token);
                }
                "allow" | "disallow" => {
                    // Rules before the first user-agent line belong to no group
                    let Some(token) = current.as_ref() else {
                        continue;
                    };
                    let kind = if key == "allow" {
                        RuleKind::Allow
                    } else {
                        RuleKind::Disallow
                    };
                    groups.entry(token.clone()).or_default().push(PathRule {
                        kind,
                        path: value.to_string(),
                    });
                }
                "sitemap" => sitemaps.push(value.to_string()),
                _ => {}
            }
        }

        Self {
            groups,
            sitemaps,
            has_ai_block_signal: detect_ai_block(content),
        }
    }

    /// Creates an empty rule set that allows everything
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Returns true if no group was parsed
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the rules that apply to `token`
    ///
    /// The exact (lowercased) token wins; otherwise the wildcard group; otherwise
    /// there are no rules.
    pub fn rules_for(&self, token: &str) -> &[PathRule] {
        let token = token.trim().to_lowercase();
        self.groups
            .get(&token)
            .or_else(|| self.groups.get(WILDCARD))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Checks if the site root is open to `token`
    pub fn is_allowed(&self, token: &str) -> bool {
        !self
            .rules_for(token)
            .iter()
            .any(|rule| rule.kind == RuleKind::Disallow && rule.path == "/")
    }

    /// Evaluates the rule set for one agent token
    pub fn evaluate(&self, token: &str) -> RobotsEvaluation {
        RobotsEvaluation {
            allowed: self.is_allowed(token),
            has_ai_block_signal: self.has_ai_block_signal,
        }
    }

    /// Returns the `Sitemap:` URLs declared in the file
    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    /// Returns the agent-independent AI block heuristic
    pub fn has_ai_block_signal(&self) -> bool {
        self.has_ai_block_signal
    }
}

/// True when the text names a known AI crawler and contains a `disallow:`
fn detect_ai_block(content: &str) -> bool {
    let lower = content.to_lowercase();
    let names_ai = AI_CRAWLER_MARKERS.iter().any(|marker| lower.contains(marker));
    let has_disallow = lower.lines().any(|line| {
        line.split_once(':')
            .map(|(key, _)| key.trim() == "disallow")
            .unwrap_or(false)
    });
    names_ai && has_disallow
}
