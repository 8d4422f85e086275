//! Page signal extraction
//!
//! Derives [`PageSignals`] from server-delivered HTML and response headers,
//! and folds them together with robots.txt and fetch facts into the flat
//! [`SignalSet`] the per-agent scorer consumes.

use crate::config::ScoringConfig;
use crate::robots::RobotsEvaluation;
use crate::signals::text;
use crate::signals::types::{FetchContext, PageSignals, SignalSet};
use regex::Regex;
use reqwest::header::HeaderMap;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static FAQ_SCHEMA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"@type"\s*:\s*"(faqpage|howto)""#).expect("valid regex")
});

/// A complete `<h1>...</h1>` pair in the raw markup
static H1_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1[\s>].*?</h1\s*>").expect("valid regex"));

/// A complete `<title>...</title>` pair in the raw markup
static TITLE_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<title[^>]*>[^<]*</title\s*>").expect("valid regex"));

/// Meta names whose `content` carries robots directives
const ROBOTS_META_NAMES: &[&str] = &["robots", "googlebot"];

/// Extracts crawl signals from raw pages
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSignalExtractor {
    /// Minimum text-to-markup ratio for "has visible text without JS"
    text_ratio_min: f64,
}

impl Default for PageSignalExtractor {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default(), false)
    }
}

impl PageSignalExtractor {
    /// Creates an extractor with an explicit text ratio threshold
    pub fn new(text_ratio_min: f64) -> Self {
        Self { text_ratio_min }
    }

    /// Creates an extractor for normal or strict mode
    pub fn from_config(config: &ScoringConfig, strict: bool) -> Self {
        Self::new(config.text_ratio_threshold(strict))
    }

    /// The threshold in effect
    pub fn text_ratio_min(&self) -> f64 {
        self.text_ratio_min
    }

    /// True when `ratio` meets the threshold
    pub fn has_sufficient_text(&self, ratio: f64) -> bool {
        ratio >= self.text_ratio_min
    }

    /// Extracts page signals from HTML and headers
    ///
    /// Pure and infallible: malformed or truncated markup simply yields
    /// absent signals.
    pub fn extract(&self, html: &str, headers: &HeaderMap) -> PageSignals {
        extract(html, headers)
    }

    /// Builds the per-agent signal set from already extracted page signals
    pub fn signal_set(
        &self,
        page: &PageSignals,
        context: &FetchContext,
        robots: &RobotsEvaluation,
    ) -> SignalSet {
        SignalSet {
            robots_allowed: robots.allowed && !page.noindex(),
            has_ai_restriction: page.noai() || robots.has_ai_block_signal,
            has_visible_text_without_js: self.has_sufficient_text(page.text_to_markup_ratio),
            has_title: page.title.is_some(),
            has_meta_description: page.meta_description.is_some(),
            meta_description_length_ok: page.meta_description_ok(),
            is_https: context.is_https,
            is_status_2xx: context.is_status_2xx,
            has_canonical: page.canonical_href.is_some(),
            has_structured_data: page.has_structured_data,
            has_h1: page.has_h1,
            meta_description_length: page.meta_description_length(),
            text_to_markup_ratio: page.text_to_markup_ratio,
        }
    }

    /// Extracts and builds the signal set in one step
    pub fn extract_signal_set(
        &self,
        html: &str,
        headers: &HeaderMap,
        context: &FetchContext,
        robots: &RobotsEvaluation,
    ) -> SignalSet {
        let page = self.extract(html, headers);
        self.signal_set(&page, context, robots)
    }

    /// Signal set for an agent whose fetch failed
    ///
    /// Only the robots verdict and the URL scheme are known; every page-derived
    /// signal is false.
    pub fn degraded_signal_set(&self, is_https: bool, robots: &RobotsEvaluation) -> SignalSet {
        let context = FetchContext {
            is_https,
            is_status_2xx: false,
        };
        self.signal_set(&PageSignals::default(), &context, robots)
    }
}

/// Extracts page signals from HTML and headers
pub fn extract(html: &str, headers: &HeaderMap) -> PageSignals {
    let document = Html::parse_document(html);

    let meta_robots = extract_meta_robots(&document);
    let x_robots_tag = header_values(headers, "x-robots-tag").to_lowercase();
    let title = extract_title(&document, html);
    let (has_structured_data, has_faq_schema) = extract_structured_data(&document);
    let h1_text = extract_h1_text(&document, html);
    let visible = text::visible_text(html);

    let csp = header_values(headers, "content-security-policy");
    let server = format!(
        "{} {}",
        header_values(headers, "server"),
        header_values(headers, "cf-ray")
    );

    PageSignals {
        meta_noindex: text::has_noindex(&meta_robots),
        meta_noai: text::has_noai(&meta_robots),
        x_robots_noindex: text::has_noindex(&x_robots_tag),
        x_robots_noai: text::has_noai(&x_robots_tag),
        meta_description: extract_meta_description(&document),
        canonical_href: extract_canonical(&document),
        has_structured_data,
        has_faq_schema,
        has_h1: h1_text.is_some(),
        h1_text: h1_text.filter(|t| !t.is_empty()),
        lang: extract_lang(&document),
        text_to_markup_ratio: text::text_to_markup_ratio(html),
        images_without_alt: count_images_without_alt(&document),
        soft_404: text::looks_like_soft_404(&visible, title.as_deref()),
        paywall_hint: text::has_paywall_hint(html),
        anti_bot_likely: text::looks_anti_bot(&server),
        content_type: header_values(headers, "content-type").to_lowercase(),
        hsts: headers.contains_key("strict-transport-security"),
        csp: !csp.is_empty(),
        clickjack_protected: headers.contains_key("x-frame-options")
            || csp.to_lowercase().contains("frame-ancestors"),
        title,
        meta_robots,
        x_robots_tag,
    }
}

/// Joins every value of a (possibly repeated) header with ", "
fn header_values(headers: &HeaderMap, name: &str) -> String {
    headers
        .get_all(name)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Selects all elements matching a CSS selector (empty on a bad selector)
fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Collapsed text content of an element
fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts the page title from the HTML document
///
/// The parser closes a truncated `<title>` on its own; only a title whose
/// closing tag is present in the markup counts. Inner whitespace is kept.
fn extract_title(document: &Html, html: &str) -> Option<String> {
    if !TITLE_PAIR.is_match(html) {
        return None;
    }
    select_all(document, "title")
        .first()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// `content` of every `<meta>` whose `name` matches one of `names`
fn meta_contents<'a>(document: &'a Html, names: &'a [&'a str]) -> impl Iterator<Item = String> + 'a {
    select_all(document, "meta[name][content]")
        .into_iter()
        .filter(move |element| {
            element
                .value()
                .attr("name")
                .map(|name| names.iter().any(|n| name.trim().eq_ignore_ascii_case(n)))
                .unwrap_or(false)
        })
        .filter_map(|element| element.value().attr("content").map(|c| c.trim().to_string()))
}

/// Combined lowercase directives of robots and googlebot meta tags
fn extract_meta_robots(document: &Html) -> String {
    meta_contents(document, ROBOTS_META_NAMES)
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
        .to_lowercase()
}

/// First non-empty meta description
fn extract_meta_description(document: &Html) -> Option<String> {
    meta_contents(document, &["description"]).find(|c| !c.is_empty())
}

/// `href` of the first `<link rel="canonical">`
fn extract_canonical(document: &Html) -> Option<String> {
    select_all(document, "link[rel][href]")
        .into_iter()
        .filter(|element| {
            element
                .value()
                .attr("rel")
                .map(|rel| {
                    rel.split_whitespace()
                        .any(|token| token.eq_ignore_ascii_case("canonical"))
                })
                .unwrap_or(false)
        })
        .filter_map(|element| element.value().attr("href").map(|h| h.trim().to_string()))
        .find(|href| !href.is_empty())
}

/// Structured data presence and FAQPage/HowTo presence
///
/// The JSON inside `application/ld+json` blocks is never parsed; any such
/// block counts.
fn extract_structured_data(document: &Html) -> (bool, bool) {
    let json_ld: Vec<String> = select_all(document, "script[type]")
        .into_iter()
        .filter(|element| {
            element
                .value()
                .attr("type")
                .map(|t| t.trim().eq_ignore_ascii_case("application/ld+json"))
                .unwrap_or(false)
        })
        .map(|element| element.text().collect::<String>())
        .collect();

    let has_microdata = !select_all(document, "[itemscope]").is_empty();
    let has_faq = json_ld.iter().any(|block| FAQ_SCHEMA.is_match(block));

    (!json_ld.is_empty() || has_microdata, has_faq)
}

/// Text of the first `<h1>`; `Some("")` for an empty heading
///
/// `None` unless the markup holds a closed `<h1>...</h1>` pair.
fn extract_h1_text(document: &Html, html: &str) -> Option<String> {
    if !H1_PAIR.is_match(html) {
        return None;
    }
    select_all(document, "h1").first().map(element_text)
}

/// Lowercase `lang` of the root element
fn extract_lang(document: &Html) -> Option<String> {
    select_all(document, "html[lang]")
        .first()
        .and_then(|element| element.value().attr("lang"))
        .map(|lang| lang.trim().to_lowercase())
        .filter(|lang| !lang.is_empty())
}

/// Number of `<img>` elements without an `alt` attribute
fn count_images_without_alt(document: &Html) -> usize {
    select_all(document, "img")
        .iter()
        .filter(|element| element.value().attr("alt").is_none())
        .count()
}
