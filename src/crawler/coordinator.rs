//! Audit coordinator - main audit orchestration logic
//!
//! This module runs one audit end to end:
//! - Normalizing the target URL
//! - Fetching the page and robots.txt concurrently under the default identity
//! - Scoring the five categories and building the access verdict
//! - Re-fetching the page once per agent profile, concurrently, and scoring
//!   each agent from its own response
//! - Assembling suggestions, extras and the final report

use crate::config::{compute_config_hash, validate, Config};
use crate::crawler::suggestions;
use crate::crawler::{AgentFetcher, FetchResult, FetchedPage};
use crate::report::{
    AccessVerdict, AiDirectives, AuditReport, Extras, MetaDescriptionStats, RawFacts,
    SecurityHeaders,
};
use crate::robots::{fetch_robots, RobotsRuleSet, WILDCARD};
use crate::scoring::{score_agent, score_categories, AgentProfile, CategoryFacts};
use crate::signals::{FetchContext, PageSignalExtractor, PageSignals};
use crate::url::{is_https, normalize_target};
use crate::AuditError;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// Characters of the meta description kept in the extras sample
const META_SAMPLE_CHARS: usize = 200;

/// Per-audit options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditOptions {
    /// Use the stricter text-to-markup threshold
    pub strict: bool,
}

/// Outcome of one agent pipeline
#[derive(Debug, Clone)]
struct AgentOutcome {
    name: String,
    score: u8,
    /// False when the agent's own fetch failed and the score is degraded
    fetched: bool,
}

/// Main audit coordinator structure
///
/// Holds everything that stays fixed across audits: the configuration, the
/// shared HTTP client and the agent profiles.
#[derive(Debug, Clone)]
pub struct Auditor {
    config: Arc<Config>,
    fetcher: AgentFetcher,
    profiles: Arc<Vec<AgentProfile>>,
    fingerprint: String,
}

impl Auditor {
    /// Creates a new auditor instance
    ///
    /// # Arguments
    ///
    /// * `config` - The audit configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Auditor)` - Successfully created auditor
    /// * `Err(AuditError)` - Invalid configuration or HTTP client failure
    pub fn new(config: Config) -> Result<Self, AuditError> {
        let fetcher = AgentFetcher::new(&config.fetcher)?;
        Self::with_fetcher(config, fetcher)
    }

    /// Creates an auditor around an existing fetcher
    pub fn with_fetcher(config: Config, fetcher: AgentFetcher) -> Result<Self, AuditError> {
        validate(&config)?;
        let fingerprint = compute_config_hash(&config);
        let profiles = config.agent_profiles();

        tracing::debug!(
            "Auditor ready with {} agent profiles (config {})",
            profiles.len(),
            fingerprint
        );

        Ok(Self {
            config: Arc::new(config),
            fetcher,
            profiles: Arc::new(profiles),
            fingerprint,
        })
    }

    /// The agent profiles this auditor scores
    pub fn profiles(&self) -> &[AgentProfile] {
        &self.profiles
    }

    /// SHA-256 fingerprint of the active configuration
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Runs one audit
    ///
    /// # Arguments
    ///
    /// * `url` - The page to audit; `https://` is assumed when no scheme is given
    /// * `options` - Per-audit options
    ///
    /// # Returns
    ///
    /// * `Ok(AuditReport)` - The page answered 2xx and was scored
    /// * `Err(AuditError)` - Invalid URL, page not found, or page unreachable
    pub async fn run(&self, url: &str, options: AuditOptions) -> Result<AuditReport, AuditError> {
        let target = normalize_target(url)?;
        let user_agent = self.config.fetcher.default_user_agent.as_str();
        let default_token = self.config.fetcher.default_robots_token.to_lowercase();
        let extractor = PageSignalExtractor::from_config(&self.config.scoring, options.strict);

        tracing::info!("Auditing {} (strict: {})", target, options.strict);

        let (primary, robots) = tokio::join!(
            self.fetcher.fetch(target.as_str(), user_agent),
            fetch_robots(&self.fetcher, &target, user_agent)
        );
        let page = into_success(&target, primary)?;

        let signals = extractor.extract(&page.body, &page.headers);
        let context = FetchContext {
            is_https: is_https(&page.final_url),
            is_status_2xx: page.is_success(),
        };
        let robots_allowed = robots.is_allowed(&default_token);

        let facts = CategoryFacts::collect(
            &signals,
            &context,
            robots_allowed,
            !robots.sitemaps().is_empty(),
            &extractor,
        );
        let scores = score_categories(&facts, &self.config.scoring.category_weights);
        let verdict = build_verdict(&signals, &robots, &default_token);

        tracing::info!(
            "Overall score {} for {} ({} categories, accessible: {})",
            scores.overall,
            target,
            scores.breakdown.len(),
            verdict.accessible
        );

        let robots = Arc::new(robots);
        let per_model_scores = self.score_agents(&target, &robots, extractor).await;
        let agent_readiness = per_model_scores.as_ref().and_then(average_score);

        let mut ranked = scores.suggestions;
        ranked.extend(suggestions::heuristic_suggestions(&signals));
        let ranked = suggestions::rank(ranked);

        let robots_per_bot = self.robots_per_bot(&robots, &default_token);
        let blocked_tokens: Vec<&str> = robots_per_bot
            .iter()
            .filter(|(_, allowed)| !**allowed)
            .map(|(token, _)| token.as_str())
            .collect();
        let extras = build_extras(&signals, robots_per_bot.clone());
        let extras_suggestions = suggestions::extras_suggestions(&signals, &extras, &blocked_tokens);

        let report = AuditReport {
            url: target.to_string(),
            final_url: page.final_url.clone(),
            user_agent: user_agent.to_string(),
            strict: options.strict,
            audited_at: chrono::Utc::now(),
            verdict,
            overall: scores.overall,
            breakdown: scores.breakdown,
            suggestions: ranked,
            extras,
            extras_suggestions,
            per_model_scores,
            agent_readiness,
            raw: RawFacts {
                status: page.status_code,
                content_type: signals.content_type.clone(),
                robots_allowed,
                sitemaps: robots.sitemaps().to_vec(),
            },
            config_fingerprint: self.fingerprint.clone(),
        };

        tracing::info!(
            "Audit of {} finished: overall {}, agent readiness {}",
            report.url,
            report.overall,
            report
                .agent_readiness
                .map_or_else(|| "n/a".to_string(), |r| r.to_string())
        );

        Ok(report)
    }

    /// Fetches and scores the page once per agent profile, concurrently
    ///
    /// Returns `None` when every agent fetch failed or any task panicked.
    async fn score_agents(
        &self,
        target: &Url,
        robots: &Arc<RobotsRuleSet>,
        extractor: PageSignalExtractor,
    ) -> Option<BTreeMap<String, u32>> {
        let mut tasks = JoinSet::new();

        for profile in self.profiles.iter().cloned() {
            let fetcher = self.fetcher.clone();
            let robots = Arc::clone(robots);
            let target = target.clone();
            tasks.spawn(run_agent(fetcher, profile, target, robots, extractor));
        }

        let mut outcomes = Vec::with_capacity(self.profiles.len());
        let mut panicked = false;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    tracing::error!("Agent task for {} failed: {}", target, e);
                    panicked = true;
                }
            }
        }

        if panicked {
            return None;
        }
        if outcomes.is_empty() || outcomes.iter().all(|o| !o.fetched) {
            tracing::warn!(
                "Every agent fetch of {} failed, omitting per-agent scores",
                target
            );
            return None;
        }

        Some(
            outcomes
                .into_iter()
                .map(|o| (o.name, u32::from(o.score)))
                .collect(),
        )
    }

    /// Root verdict for every agent token, the default token and `*`
    fn robots_per_bot(&self, robots: &RobotsRuleSet, default_token: &str) -> BTreeMap<String, bool> {
        let mut per_bot = BTreeMap::new();
        per_bot.insert(default_token.to_string(), robots.is_allowed(default_token));
        per_bot.insert(WILDCARD.to_string(), robots.is_allowed(WILDCARD));
        for profile in self.profiles.iter() {
            per_bot.insert(
                profile.robots_token.clone(),
                robots.is_allowed(&profile.robots_token),
            );
        }
        per_bot
    }
}

/// One agent pipeline: fetch under the agent's identity, extract, score
async fn run_agent(
    fetcher: AgentFetcher,
    profile: AgentProfile,
    target: Url,
    robots: Arc<RobotsRuleSet>,
    extractor: PageSignalExtractor,
) -> AgentOutcome {
    let evaluation = robots.evaluate(&profile.robots_token);

    let (signals, fetched) = match fetcher.fetch(target.as_str(), &profile.user_agent).await {
        FetchResult::Response(page) => {
            let context = FetchContext {
                is_https: is_https(&page.final_url),
                is_status_2xx: page.is_success(),
            };
            if !page.is_success() {
                tracing::debug!(
                    "{} received HTTP {} for {}",
                    profile.name,
                    page.status_code,
                    target
                );
            }
            (
                extractor.extract_signal_set(&page.body, &page.headers, &context, &evaluation),
                true,
            )
        }
        FetchResult::Failure(failure) => {
            tracing::warn!(
                "{} fetch of {} failed ({:?}): {}, scoring from robots.txt only",
                profile.name,
                target,
                failure.kind,
                failure.error
            );
            (
                extractor.degraded_signal_set(target.scheme() == "https", &evaluation),
                false,
            )
        }
    };

    let score = score_agent(&profile, &signals);
    tracing::info!("{} readiness for {}: {}", profile.name, target, score);

    AgentOutcome {
        name: profile.name,
        score,
        fetched,
    }
}

/// Maps the primary fetch onto the error paths that abort an audit
fn into_success(target: &Url, result: FetchResult) -> Result<FetchedPage, AuditError> {
    match result {
        FetchResult::Response(page) if page.is_success() => Ok(page),
        FetchResult::Response(page) if page.is_absent() => {
            tracing::info!("{} returned HTTP {}", target, page.status_code);
            Err(AuditError::NotFound {
                url: target.to_string(),
                status: page.status_code,
            })
        }
        FetchResult::Response(page) => {
            tracing::warn!("{} returned HTTP {}", target, page.status_code);
            Err(AuditError::Unreachable {
                url: target.to_string(),
                status: page.status_code,
                message: format!("HTTP {}", page.status_code),
            })
        }
        FetchResult::Failure(failure) => {
            tracing::warn!("{} unreachable: {}", target, failure.error);
            Err(AuditError::Unreachable {
                url: target.to_string(),
                status: 0,
                message: failure.error,
            })
        }
    }
}

/// Collects the reasons the default crawler cannot index the page
///
/// Each condition is checked on its own; the verdict lists all of them.
fn build_verdict(signals: &PageSignals, robots: &RobotsRuleSet, default_token: &str) -> AccessVerdict {
    let mut reasons = Vec::new();

    if signals.meta_noindex {
        reasons.push("Meta robots: \"noindex/none\"".to_string());
    }
    if signals.x_robots_noindex {
        reasons.push("X-Robots-Tag: \"noindex/none\"".to_string());
    }
    if !robots.is_allowed(default_token) {
        let rules = robots.rules_for(default_token);
        let listed = if rules.is_empty() {
            "(Disallow: /)".to_string()
        } else {
            rules
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        reasons.push(format!("robots.txt blocks \"{}\": {}", default_token, listed));
    }
    if !signals.is_html() {
        let content_type = if signals.content_type.is_empty() {
            "unknown"
        } else {
            signals.content_type.as_str()
        };
        reasons.push(format!("Content-Type is not HTML ({})", content_type));
    }

    AccessVerdict::from_reasons(reasons)
}

fn build_extras(signals: &PageSignals, robots_per_bot: BTreeMap<String, bool>) -> Extras {
    Extras {
        meta_description: MetaDescriptionStats {
            present: signals.meta_description.is_some(),
            length: signals.meta_description_length(),
            ok: signals.meta_description_ok(),
            sample: signals
                .meta_description
                .as_deref()
                .unwrap_or("")
                .chars()
                .take(META_SAMPLE_CHARS)
                .collect(),
        },
        ai_directives: AiDirectives {
            meta_noai: signals.meta_noai,
            x_robots_noai: signals.x_robots_noai,
        },
        robots_per_bot,
        security_headers: SecurityHeaders {
            hsts: signals.hsts,
            csp: signals.csp,
            clickjack_protected: signals.clickjack_protected,
        },
    }
}

/// Rounded mean of the per-agent scores
fn average_score(scores: &BTreeMap<String, u32>) -> Option<u32> {
    if scores.is_empty() {
        return None;
    }
    let total: u32 = scores.values().sum();
    Some((f64::from(total) / scores.len() as f64).round() as u32)
}

/// Runs a single audit with a fresh auditor
///
/// # Arguments
///
/// * `config` - The audit configuration
/// * `url` - The page to audit
/// * `strict` - Use the stricter text ratio threshold
pub async fn run_audit(config: &Config, url: &str, strict: bool) -> Result<AuditReport, AuditError> {
    let auditor = Auditor::new(config.clone())?;
    auditor.run(url, AuditOptions { strict }).await
}
