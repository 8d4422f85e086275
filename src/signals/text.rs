//! Textual heuristics over raw markup
//!
//! These work on the HTML string directly rather than on a parsed document:
//! the text ratio must be measured against the bytes the server actually
//! delivered, and the soft-404/paywall checks are plain pattern hits.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script\s*>").expect("valid regex"));

static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b.*?</style\s*>").expect("valid regex"));

static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)</?[^>]+>").expect("valid regex"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static NOT_FOUND_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(404|not found|page not found|p[aá]gina no encontrada|no se encontr[oó])\b",
    )
    .expect("valid regex")
});

static PAYWALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)paywall|suscr[ií]bete|suscr[ií]base|subscribe|metered").expect("valid regex")
});

static ANTI_BOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)cloudflare|captcha").expect("valid regex"));

/// Text that would be visible without running JavaScript
///
/// Removes `<script>` and `<style>` blocks and every tag, then collapses
/// whitespace. Unterminated blocks are left in place rather than swallowing
/// the rest of the document.
pub fn visible_text(html: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(html, " ");
    let without_styles = STYLE_BLOCK.replace_all(&without_scripts, " ");
    let without_tags = ANY_TAG.replace_all(&without_styles, " ");
    WHITESPACE
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

/// Visible text length divided by total HTML length (0.0 for empty input)
pub fn text_to_markup_ratio(html: &str) -> f64 {
    let total = html.chars().count();
    if total == 0 {
        return 0.0;
    }
    visible_text(html).chars().count() as f64 / total as f64
}

/// Visible text or title reads like a "not found" page
pub fn looks_like_soft_404(visible: &str, title: Option<&str>) -> bool {
    NOT_FOUND_TEXT.is_match(visible) || title.is_some_and(|t| NOT_FOUND_TEXT.is_match(t))
}

/// Markup mentions a paywall or subscription wall
pub fn has_paywall_hint(html: &str) -> bool {
    PAYWALL.is_match(html)
}

/// `Server`/`CF-Ray` header values point at an anti-bot front
pub fn looks_anti_bot(server_headers: &str) -> bool {
    ANTI_BOT.is_match(server_headers)
}

/// Splits a robots directive list (`"noindex, nofollow"`) into lowercase tokens
pub fn directive_tokens(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
}

/// Directive list contains `noindex` or `none`
pub fn has_noindex(value: &str) -> bool {
    directive_tokens(value).any(|t| t == "noindex" || t == "none")
}

/// Directive list contains `noai`
pub fn has_noai(value: &str) -> bool {
    directive_tokens(value).any(|t| t == "noai")
}
