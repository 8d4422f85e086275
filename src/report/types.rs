//! Report data structures
//!
//! Everything here is serialized as camelCase JSON; optional fields are
//! omitted rather than written as `null`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Qualitative effort needed to act on a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Effort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// One actionable improvement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub title: String,
    /// Score delta recovered by acting on the suggestion
    pub impact_points: u32,
    pub effort: Effort,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Score of one category and the items that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub category: String,
    /// 0–100, never negative
    pub score: u32,
    pub items: BTreeMap<String, bool>,
}

/// Whether the default crawler identity can index the page, and why not
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessVerdict {
    pub accessible: bool,
    pub reasons: Vec<String>,
}

impl AccessVerdict {
    /// Builds a verdict from independently collected reasons
    pub fn from_reasons(reasons: Vec<String>) -> Self {
        Self {
            accessible: reasons.is_empty(),
            reasons,
        }
    }
}

/// Meta description statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDescriptionStats {
    pub present: bool,
    pub length: usize,
    pub ok: bool,
    /// First 200 chars
    pub sample: String,
}

/// AI-specific directives found on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDirectives {
    #[serde(rename = "metaNoAI")]
    pub meta_noai: bool,
    #[serde(rename = "xRobotsNoAI")]
    pub x_robots_noai: bool,
}

/// Presence of security-related response headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityHeaders {
    pub hsts: bool,
    pub csp: bool,
    pub clickjack_protected: bool,
}

/// Supplementary observations outside the scored categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extras {
    pub meta_description: MetaDescriptionStats,
    pub ai_directives: AiDirectives,
    /// robots.txt token -> root allowed
    pub robots_per_bot: BTreeMap<String, bool>,
    pub security_headers: SecurityHeaders,
}

/// A lightweight hint attached to the extras block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraSuggestion {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ExtraSuggestion {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Raw facts from the primary fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFacts {
    pub status: u16,
    pub content_type: String,
    pub robots_allowed: bool,
    pub sitemaps: Vec<String>,
}

/// The complete result of one audit
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    /// Normalized request URL
    pub url: String,
    /// URL after redirects
    pub final_url: String,
    /// User agent of the general fetch
    pub user_agent: String,
    pub strict: bool,
    pub audited_at: DateTime<Utc>,
    pub verdict: AccessVerdict,
    /// Weighted sum of the category scores
    pub overall: u32,
    pub breakdown: Vec<ScoreBreakdown>,
    /// Sorted by impact, highest first
    pub suggestions: Vec<Suggestion>,
    pub extras: Extras,
    pub extras_suggestions: Vec<ExtraSuggestion>,
    /// Agent name -> readiness score; absent when enrichment failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_model_scores: Option<BTreeMap<String, u32>>,
    /// Average of the per-agent scores
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_readiness: Option<u32>,
    pub raw: RawFacts,
    /// SHA-256 of the configuration that produced the scores
    pub config_fingerprint: String,
}

impl AuditReport {
    /// Looks up a category breakdown by name
    pub fn category(&self, name: &str) -> Option<&ScoreBreakdown> {
        self.breakdown.iter().find(|b| b.category == name)
    }

    /// Looks up a suggestion by id
    pub fn suggestion(&self, id: &str) -> Option<&Suggestion> {
        self.suggestions.iter().find(|s| s.id == id)
    }
}
