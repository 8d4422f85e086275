//! Suggestion assembly
//!
//! Category checks raise one suggestion per failed item; a few page-level
//! heuristics add more. This module merges them into the ranked list and
//! builds the extras hints.

use crate::report::{Effort, ExtraSuggestion, Extras, Suggestion};
use crate::signals::{PageSignals, META_DESCRIPTION_LENGTH_OK};
use std::collections::HashSet;

/// Impact of adding `alt` to images
pub const ALT_TEXT_IMPACT: u32 = 8;

/// Impact of fixing the meta description
pub const META_DESCRIPTION_IMPACT: u32 = 5;

/// De-duplicates by id (first wins) and sorts by impact, highest first
///
/// The sort is stable, so equal impacts keep their table order.
pub fn rank(suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    let mut seen = HashSet::new();
    let mut ranked: Vec<Suggestion> = suggestions
        .into_iter()
        .filter(|s| seen.insert(s.id.clone()))
        .collect();
    ranked.sort_by(|a, b| b.impact_points.cmp(&a.impact_points));
    ranked
}

/// Heuristic suggestions read off the primary page
pub fn heuristic_suggestions(page: &PageSignals) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    if page.images_without_alt > 0 {
        suggestions.push(Suggestion {
            id: "alt-text".to_string(),
            title: "Add alt attributes to images".to_string(),
            impact_points: ALT_TEXT_IMPACT,
            effort: Effort::Low,
            detail: Some(format!("{} image(s) without alt", page.images_without_alt)),
        });
    }

    if !page.meta_description_ok() {
        suggestions.push(Suggestion {
            id: "meta-description".to_string(),
            title: format!(
                "Write a meta description of {}–{} characters",
                META_DESCRIPTION_LENGTH_OK.start(),
                META_DESCRIPTION_LENGTH_OK.end()
            ),
            impact_points: META_DESCRIPTION_IMPACT,
            effort: Effort::Low,
            detail: Some(format!("Current length: {}", page.meta_description_length())),
        });
    }

    suggestions
}

/// Hints for the extras block
///
/// `blocked_tokens` lists the robots.txt tokens whose root is disallowed.
pub fn extras_suggestions(
    page: &PageSignals,
    extras: &Extras,
    blocked_tokens: &[&str],
) -> Vec<ExtraSuggestion> {
    let mut hints = Vec::new();
    let range = format!(
        "{}–{}",
        META_DESCRIPTION_LENGTH_OK.start(),
        META_DESCRIPTION_LENGTH_OK.end()
    );

    if !extras.meta_description.present {
        hints.push(ExtraSuggestion::new(format!(
            "Add a meta description ({} characters)",
            range
        )));
    } else if !extras.meta_description.ok {
        hints.push(
            ExtraSuggestion::new(format!("Adjust the meta description to {} characters", range))
                .with_detail(format!("Current: {}", extras.meta_description.length)),
        );
    }

    let security = &extras.security_headers;
    if !security.hsts {
        hints.push(ExtraSuggestion::new(
            "Enable HSTS (Strict-Transport-Security)",
        ));
    }
    if !security.csp {
        hints.push(ExtraSuggestion::new(
            "Define a Content-Security-Policy (basic, with frame-ancestors where it applies)",
        ));
    }
    if !security.clickjack_protected {
        hints.push(ExtraSuggestion::new(
            "Protect against clickjacking (X-Frame-Options or frame-ancestors in CSP)",
        ));
    }

    for token in blocked_tokens {
        hints.push(ExtraSuggestion::new(format!(
            "robots.txt blocks {} (review the rules)",
            token
        )));
    }

    if page.images_without_alt > 0 {
        hints.push(
            ExtraSuggestion::new(format!("Add alt attributes to images (+{})", ALT_TEXT_IMPACT))
                .with_detail(format!("{} without alt", page.images_without_alt)),
        );
    }
    if !page.meta_description_ok() {
        hints.push(ExtraSuggestion::new(format!(
            "Improve the meta description (+{}), aim for {} characters",
            META_DESCRIPTION_IMPACT, range
        )));
    }

    hints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{AiDirectives, MetaDescriptionStats, SecurityHeaders};
    use std::collections::BTreeMap;

    fn suggestion(id: &str, impact: u32) -> Suggestion {
        Suggestion {
            id: id.to_string(),
            title: id.to_string(),
            impact_points: impact,
            effort: Effort::Low,
            detail: None,
        }
    }

    fn extras_for(page: &PageSignals, hardened: bool) -> Extras {
        Extras {
            meta_description: MetaDescriptionStats {
                present: page.meta_description.is_some(),
                length: page.meta_description_length(),
                ok: page.meta_description_ok(),
                sample: String::new(),
            },
            ai_directives: AiDirectives {
                meta_noai: false,
                x_robots_noai: false,
            },
            robots_per_bot: BTreeMap::new(),
            security_headers: SecurityHeaders {
                hsts: hardened,
                csp: hardened,
                clickjack_protected: hardened,
            },
        }
    }

    #[test]
    fn test_rank_dedupes_and_sorts() {
        let ranked = rank(vec![
            suggestion("faq", 4),
            suggestion("http", 40),
            suggestion("title", 12),
            suggestion("faq", 99),
            suggestion("canonical", 12),
        ]);
        let ids: Vec<_> = ranked.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["http", "title", "canonical", "faq"]);
        assert_eq!(ranked[3].impact_points, 4);
    }

    #[test]
    fn test_heuristics_on_clean_page() {
        let page = PageSignals {
            meta_description: Some("x".repeat(100)),
            ..PageSignals::default()
        };
        assert!(heuristic_suggestions(&page).is_empty());
    }

    #[test]
    fn test_heuristics_alt_and_description() {
        let page = PageSignals {
            images_without_alt: 3,
            meta_description: Some("too short".to_string()),
            ..PageSignals::default()
        };
        let suggestions = heuristic_suggestions(&page);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].id, "alt-text");
        assert_eq!(suggestions[0].impact_points, 8);
        assert_eq!(suggestions[1].id, "meta-description");
        assert_eq!(suggestions[1].impact_points, 5);
        assert_eq!(suggestions[1].detail.as_deref(), Some("Current length: 9"));
    }

    #[test]
    fn test_extras_suggestions_missing_everything() {
        let page = PageSignals::default();
        let hints = extras_suggestions(&page, &extras_for(&page, false), &["gptbot"]);
        let titles: Vec<_> = hints.iter().map(|h| h.title.as_str()).collect();
        assert!(titles[0].starts_with("Add a meta description"));
        assert!(titles.iter().any(|t| t.contains("HSTS")));
        assert!(titles.iter().any(|t| t.contains("Content-Security-Policy")));
        assert!(titles.iter().any(|t| t.contains("clickjacking")));
        assert!(titles.contains(&"robots.txt blocks gptbot (review the rules)"));
        assert!(titles.iter().any(|t| t.starts_with("Improve the meta description (+5)")));
    }

    #[test]
    fn test_extras_suggestions_out_of_range_description() {
        let page = PageSignals {
            meta_description: Some("x".repeat(200)),
            ..PageSignals::default()
        };
        let hints = extras_suggestions(&page, &extras_for(&page, true), &[]);
        assert_eq!(hints[0].detail.as_deref(), Some("Current: 200"));
        assert_eq!(hints.len(), 2);
    }
}
