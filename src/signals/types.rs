//! Signal data structures

use serde::Serialize;

/// Inclusive "ok" range for `<title>` length (chars)
pub const TITLE_LENGTH_OK: std::ops::RangeInclusive<usize> = 10..=70;

/// Inclusive "ok" range for meta description length (chars)
pub const META_DESCRIPTION_LENGTH_OK: std::ops::RangeInclusive<usize> = 50..=160;

/// Everything derived from one `(html, headers)` pair
///
/// Pure data: extracting twice from the same input yields equal values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSignals {
    /// Trimmed text of the first `<title>`
    pub title: Option<String>,
    /// Trimmed `content` of `<meta name="description">` (non-empty)
    pub meta_description: Option<String>,
    /// Combined lowercase directives of `<meta name="robots|googlebot">`
    pub meta_robots: String,
    /// Lowercase `X-Robots-Tag` header
    pub x_robots_tag: String,
    /// `noindex`/`none` in meta robots
    pub meta_noindex: bool,
    /// `noindex`/`none` in the `X-Robots-Tag` header
    pub x_robots_noindex: bool,
    /// `noai` in meta robots
    pub meta_noai: bool,
    /// `noai` in the `X-Robots-Tag` header
    pub x_robots_noai: bool,
    /// `href` of `<link rel="canonical">`
    pub canonical_href: Option<String>,
    /// JSON-LD block or `itemscope` element present
    pub has_structured_data: bool,
    /// JSON-LD declares a FAQPage or HowTo
    pub has_faq_schema: bool,
    /// At least one `<h1>` element
    pub has_h1: bool,
    /// Text of the first `<h1>`, trimmed
    pub h1_text: Option<String>,
    /// Lowercase `<html lang>`
    pub lang: Option<String>,
    /// Visible text length over total HTML length
    pub text_to_markup_ratio: f64,
    /// `<img>` elements without an `alt` attribute
    pub images_without_alt: usize,
    /// Content reads like a "not found" page
    pub soft_404: bool,
    /// Markup mentions a paywall or subscription wall
    pub paywall_hint: bool,
    /// `Server`/`CF-Ray` headers point at an anti-bot front
    pub anti_bot_likely: bool,
    /// Lowercase `Content-Type`
    pub content_type: String,
    /// `Strict-Transport-Security` present
    pub hsts: bool,
    /// `Content-Security-Policy` present
    pub csp: bool,
    /// `X-Frame-Options` present or CSP has `frame-ancestors`
    pub clickjack_protected: bool,
}

impl PageSignals {
    /// Title length in chars (0 when absent)
    pub fn title_length(&self) -> usize {
        self.title.as_deref().map_or(0, |t| t.chars().count())
    }

    /// Title length within 10–70 chars
    pub fn title_ok(&self) -> bool {
        TITLE_LENGTH_OK.contains(&self.title_length())
    }

    /// Meta description length in chars (0 when absent)
    pub fn meta_description_length(&self) -> usize {
        self.meta_description
            .as_deref()
            .map_or(0, |d| d.chars().count())
    }

    /// Meta description length within 50–160 chars
    pub fn meta_description_ok(&self) -> bool {
        META_DESCRIPTION_LENGTH_OK.contains(&self.meta_description_length())
    }

    /// Any noindex/none directive, meta or header
    pub fn noindex(&self) -> bool {
        self.meta_noindex || self.x_robots_noindex
    }

    /// Any noai directive, meta or header
    pub fn noai(&self) -> bool {
        self.meta_noai || self.x_robots_noai
    }

    /// The response declares an HTML content type
    pub fn is_html(&self) -> bool {
        self.content_type.contains("text/html")
    }
}

/// Facts about the fetch itself, not the markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchContext {
    /// Final URL uses https
    pub is_https: bool,
    /// Final response status was 2xx
    pub is_status_2xx: bool,
}

/// Flat per-fetch signal record consumed by the per-agent scorer
///
/// Each agent gets its own instance; different agents may be served different
/// HTML by anti-bot systems.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSet {
    pub robots_allowed: bool,
    #[serde(rename = "hasAIRestriction")]
    pub has_ai_restriction: bool,
    #[serde(rename = "hasVisibleTextWithoutJS")]
    pub has_visible_text_without_js: bool,
    pub has_title: bool,
    pub has_meta_description: bool,
    pub meta_description_length_ok: bool,
    pub is_https: bool,
    pub is_status_2xx: bool,
    pub has_canonical: bool,
    pub has_structured_data: bool,
    pub has_h1: bool,
    pub meta_description_length: usize,
    pub text_to_markup_ratio: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_bounds() {
        let mut page = PageSignals {
            title: Some("Short".to_string()),
            ..PageSignals::default()
        };
        assert_eq!(page.title_length(), 5);
        assert!(!page.title_ok());

        page.title = Some("a".repeat(10));
        assert!(page.title_ok());
        page.title = Some("a".repeat(70));
        assert!(page.title_ok());
        page.title = Some("a".repeat(71));
        assert!(!page.title_ok());
    }

    #[test]
    fn test_meta_description_bounds_count_chars() {
        let mut page = PageSignals {
            meta_description: Some("é".repeat(50)),
            ..PageSignals::default()
        };
        assert!(page.meta_description_ok());
        page.meta_description = Some("x".repeat(49));
        assert!(!page.meta_description_ok());
        page.meta_description = Some("x".repeat(161));
        assert!(!page.meta_description_ok());
        page.meta_description = None;
        assert_eq!(page.meta_description_length(), 0);
        assert!(!page.meta_description_ok());
    }
}
