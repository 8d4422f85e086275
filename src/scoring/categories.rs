//! Aggregate category scoring
//!
//! Five categories start at 100 and lose a fixed penalty per failed item.
//! The penalty tables are static data; [`score_categories`] only walks them.

use crate::config::CategoryWeights;
use crate::report::{Effort, ScoreBreakdown, Suggestion};
use crate::signals::{FetchContext, PageSignalExtractor, PageSignals};
use std::collections::BTreeMap;

/// A scored category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Crawlability,
    Discoverability,
    Content,
    Render,
    Internationalization,
}

impl Category {
    /// Display name used in the breakdown
    pub fn name(&self) -> &'static str {
        match self {
            Self::Crawlability => "Crawlability",
            Self::Discoverability => "Discoverability",
            Self::Content => "Content & Semantics",
            Self::Render => "Render Robustness",
            Self::Internationalization => "Internationalization",
        }
    }

    /// Contribution of this category to the overall score
    pub fn weight(&self, weights: &CategoryWeights) -> f64 {
        match self {
            Self::Crawlability => weights.crawlability,
            Self::Discoverability => weights.discoverability,
            Self::Content => weights.content,
            Self::Render => weights.render,
            Self::Internationalization => weights.i18n,
        }
    }
}

/// A boolean fact checked by one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Item {
    Http2xx,
    Https,
    ContentTypeHtml,
    RobotsAllowed,
    XRobotsOk,
    TitleOk,
    CanonicalOk,
    MetaNoindex,
    SitemapInRobots,
    H1Ok,
    TextRatioOk,
    SchemaOk,
    FaqOk,
    AntiBotLikely,
    PaywallHint,
    Soft404,
    LangAttr,
}

impl Item {
    /// Key used in the breakdown's item map
    pub fn key(&self) -> &'static str {
        match self {
            Self::Http2xx => "http2xx",
            Self::Https => "https",
            Self::ContentTypeHtml => "contentTypeHtml",
            Self::RobotsAllowed => "robotsAllowed",
            Self::XRobotsOk => "xRobotsOk",
            Self::TitleOk => "titleOk",
            Self::CanonicalOk => "canonicalOk",
            Self::MetaNoindex => "metaNoindex",
            Self::SitemapInRobots => "sitemapInRobots",
            Self::H1Ok => "h1Ok",
            Self::TextRatioOk => "textRatioOk",
            Self::SchemaOk => "schemaOk",
            Self::FaqOk => "faqOk",
            Self::AntiBotLikely => "antiBotLikely",
            Self::PaywallHint => "paywallHint",
            Self::Soft404 => "soft404",
            Self::LangAttr => "langAttr",
        }
    }
}

/// The facts every category item is read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryFacts {
    pub http_2xx: bool,
    pub https: bool,
    pub content_type_html: bool,
    pub robots_allowed: bool,
    pub x_robots_ok: bool,
    pub title_ok: bool,
    pub canonical_ok: bool,
    pub meta_noindex: bool,
    pub sitemap_in_robots: bool,
    pub h1_ok: bool,
    pub text_ratio_ok: bool,
    pub schema_ok: bool,
    pub faq_ok: bool,
    pub anti_bot_likely: bool,
    pub paywall_hint: bool,
    pub soft_404: bool,
    pub lang_attr: bool,
}

impl CategoryFacts {
    /// Collects facts from the primary fetch
    ///
    /// `robots_allowed` is the robots.txt verdict for the default token alone;
    /// directives are scored separately by the `xRobotsOk` and `metaNoindex`
    /// items.
    pub fn collect(
        page: &PageSignals,
        context: &FetchContext,
        robots_allowed: bool,
        has_sitemap: bool,
        extractor: &PageSignalExtractor,
    ) -> Self {
        Self {
            http_2xx: context.is_status_2xx,
            https: context.is_https,
            content_type_html: page.is_html(),
            robots_allowed,
            x_robots_ok: !(page.x_robots_noindex || page.x_robots_noai),
            title_ok: page.title_ok(),
            canonical_ok: page.canonical_href.is_some(),
            meta_noindex: page.meta_noindex,
            sitemap_in_robots: has_sitemap,
            h1_ok: page.h1_text.is_some(),
            text_ratio_ok: extractor.has_sufficient_text(page.text_to_markup_ratio),
            schema_ok: page.has_structured_data,
            faq_ok: page.has_faq_schema,
            anti_bot_likely: page.anti_bot_likely,
            paywall_hint: page.paywall_hint,
            soft_404: page.soft_404,
            lang_attr: page.lang.is_some(),
        }
    }

    /// Value of one item
    pub fn value(&self, item: Item) -> bool {
        match item {
            Item::Http2xx => self.http_2xx,
            Item::Https => self.https,
            Item::ContentTypeHtml => self.content_type_html,
            Item::RobotsAllowed => self.robots_allowed,
            Item::XRobotsOk => self.x_robots_ok,
            Item::TitleOk => self.title_ok,
            Item::CanonicalOk => self.canonical_ok,
            Item::MetaNoindex => self.meta_noindex,
            Item::SitemapInRobots => self.sitemap_in_robots,
            Item::H1Ok => self.h1_ok,
            Item::TextRatioOk => self.text_ratio_ok,
            Item::SchemaOk => self.schema_ok,
            Item::FaqOk => self.faq_ok,
            Item::AntiBotLikely => self.anti_bot_likely,
            Item::PaywallHint => self.paywall_hint,
            Item::Soft404 => self.soft_404,
            Item::LangAttr => self.lang_attr,
        }
    }
}

/// One penalized item and the suggestion it raises
#[derive(Debug, Clone, Copy)]
pub struct CategoryCheck {
    pub item: Item,
    /// Item value that costs points
    pub penalize_when: bool,
    pub penalty: u32,
    pub suggestion_id: &'static str,
    pub title: &'static str,
    pub detail: Option<&'static str>,
    pub effort: Effort,
}

impl CategoryCheck {
    /// True when `facts` trigger the penalty
    pub fn fails(&self, facts: &CategoryFacts) -> bool {
        facts.value(self.item) == self.penalize_when
    }

    fn suggestion(&self) -> Suggestion {
        Suggestion {
            id: self.suggestion_id.to_string(),
            title: self.title.to_string(),
            impact_points: self.penalty,
            effort: self.effort,
            detail: self.detail.map(str::to_string),
        }
    }
}

/// A category and its checks, in report order
#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub category: Category,
    pub checks: &'static [CategoryCheck],
}

const fn check(
    item: Item,
    penalize_when: bool,
    penalty: u32,
    suggestion_id: &'static str,
    title: &'static str,
    detail: Option<&'static str>,
    effort: Effort,
) -> CategoryCheck {
    CategoryCheck {
        item,
        penalize_when,
        penalty,
        suggestion_id,
        title,
        detail,
        effort,
    }
}

const CRAWLABILITY: &[CategoryCheck] = &[
    check(Item::Http2xx, false, 40, "http", "The URL does not answer with a 2xx status", None, Effort::Medium),
    check(Item::Https, false, 20, "https", "Serve the page over HTTPS", None, Effort::Low),
    check(
        Item::ContentTypeHtml,
        false,
        8,
        "content-type",
        "Send a text/html Content-Type",
        Some("e.g. Content-Type: text/html; charset=utf-8"),
        Effort::Low,
    ),
    check(
        Item::RobotsAllowed,
        false,
        35,
        "robots",
        "robots.txt blocks the crawler",
        Some("Remove \"Disallow: /\" from the crawler's group or from \"*\"."),
        Effort::Low,
    ),
    check(
        Item::XRobotsOk,
        false,
        25,
        "x-robots",
        "Remove noindex/none/noai from X-Robots-Tag",
        Some("The X-Robots-Tag response header keeps the page out of indexes."),
        Effort::Low,
    ),
];

const DISCOVERABILITY: &[CategoryCheck] = &[
    check(
        Item::TitleOk,
        false,
        12,
        "title",
        "Write a <title> of 10–70 characters",
        Some("Lead with the focus keyword and the brand; avoid long or duplicated titles."),
        Effort::Low,
    ),
    check(
        Item::CanonicalOk,
        false,
        8,
        "canonical",
        "Add <link rel=\"canonical\">",
        Some("e.g. <link rel=\"canonical\" href=\"https://example.com/path/\" />"),
        Effort::Low,
    ),
    check(
        Item::MetaNoindex,
        true,
        25,
        "noindex",
        "Remove the noindex/none meta robots directive",
        Some("e.g. <meta name=\"robots\" content=\"index, follow\">"),
        Effort::Low,
    ),
    check(
        Item::SitemapInRobots,
        false,
        8,
        "sitemap",
        "Declare a Sitemap in robots.txt",
        Some("e.g. Sitemap: https://example.com/sitemap.xml"),
        Effort::Low,
    ),
];

const CONTENT: &[CategoryCheck] = &[
    check(
        Item::H1Ok,
        false,
        10,
        "h1",
        "Add a descriptive H1",
        Some("One H1 per page, clear and carrying the main keyword."),
        Effort::Low,
    ),
    check(
        Item::TextRatioOk,
        false,
        22,
        "ssr",
        "Serve content in the initial HTML (SSR or prerendering)",
        Some("Critical content must not depend on JavaScript to appear."),
        Effort::Medium,
    ),
    check(
        Item::SchemaOk,
        false,
        10,
        "schema",
        "Add schema.org structured data (JSON-LD)",
        Some("Use Article, Product, Organization or whichever type fits."),
        Effort::Medium,
    ),
    check(
        Item::FaqOk,
        false,
        4,
        "faq",
        "Add FAQPage/HowTo markup",
        Some("Describe common questions in JSON-LD where it applies."),
        Effort::Low,
    ),
];

const RENDER: &[CategoryCheck] = &[
    check(
        Item::AntiBotLikely,
        true,
        15,
        "anti-bot",
        "Avoid anti-bot challenges for legitimate crawlers",
        Some("Allow known crawlers through with user-agent specific rules."),
        Effort::Medium,
    ),
    check(
        Item::PaywallHint,
        true,
        12,
        "paywall",
        "Avoid a hard paywall on key content",
        Some("Expose a partial view or an excerpt that can be indexed."),
        Effort::High,
    ),
    check(
        Item::Soft404,
        true,
        25,
        "soft-404",
        "The page looks like a soft 404",
        Some("Return a real 404 status or serve useful content."),
        Effort::Medium,
    ),
];

const INTERNATIONALIZATION: &[CategoryCheck] = &[check(
    Item::LangAttr,
    false,
    5,
    "lang",
    "Set the lang attribute on <html>",
    Some("e.g. <html lang=\"en\">"),
    Effort::Low,
)];

/// Every category, in report order
pub const CATEGORIES: [CategorySpec; 5] = [
    CategorySpec {
        category: Category::Crawlability,
        checks: CRAWLABILITY,
    },
    CategorySpec {
        category: Category::Discoverability,
        checks: DISCOVERABILITY,
    },
    CategorySpec {
        category: Category::Content,
        checks: CONTENT,
    },
    CategorySpec {
        category: Category::Render,
        checks: RENDER,
    },
    CategorySpec {
        category: Category::Internationalization,
        checks: INTERNATIONALIZATION,
    },
];

/// Result of scoring the five categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScores {
    pub breakdown: Vec<ScoreBreakdown>,
    pub overall: u32,
    /// One per failed item, in table order
    pub suggestions: Vec<Suggestion>,
}

/// Scores one category
pub fn score_category(spec: &CategorySpec, facts: &CategoryFacts) -> (ScoreBreakdown, Vec<Suggestion>) {
    let mut score: i64 = 100;
    let mut items = BTreeMap::new();
    let mut suggestions = Vec::new();

    for check in spec.checks {
        items.insert(check.item.key().to_string(), facts.value(check.item));
        if check.fails(facts) {
            score -= i64::from(check.penalty);
            suggestions.push(check.suggestion());
        }
    }

    let breakdown = ScoreBreakdown {
        category: spec.category.name().to_string(),
        score: score.max(0) as u32,
        items,
    };
    (breakdown, suggestions)
}

/// Scores all categories and combines them into the overall score
pub fn score_categories(facts: &CategoryFacts, weights: &CategoryWeights) -> CategoryScores {
    let mut breakdown = Vec::with_capacity(CATEGORIES.len());
    let mut suggestions = Vec::new();
    let mut weighted = 0.0;

    for spec in &CATEGORIES {
        let (category, mut raised) = score_category(spec, facts);
        weighted += f64::from(category.score) * spec.category.weight(weights);
        breakdown.push(category);
        suggestions.append(&mut raised);
    }

    CategoryScores {
        breakdown,
        overall: weighted.round().clamp(0.0, 100.0) as u32,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_good() -> CategoryFacts {
        CategoryFacts {
            http_2xx: true,
            https: true,
            content_type_html: true,
            robots_allowed: true,
            x_robots_ok: true,
            title_ok: true,
            canonical_ok: true,
            meta_noindex: false,
            sitemap_in_robots: true,
            h1_ok: true,
            text_ratio_ok: true,
            schema_ok: true,
            faq_ok: true,
            anti_bot_likely: false,
            paywall_hint: false,
            soft_404: false,
            lang_attr: true,
        }
    }

    fn all_bad() -> CategoryFacts {
        CategoryFacts {
            meta_noindex: true,
            anti_bot_likely: true,
            paywall_hint: true,
            soft_404: true,
            ..CategoryFacts::default()
        }
    }

    #[test]
    fn test_all_good_is_perfect() {
        let scores = score_categories(&all_good(), &CategoryWeights::default());
        assert_eq!(scores.overall, 100);
        assert!(scores.suggestions.is_empty());
        assert!(scores.breakdown.iter().all(|b| b.score == 100));
    }

    #[test]
    fn test_all_bad_floors_at_zero() {
        let scores = score_categories(&all_bad(), &CategoryWeights::default());
        let crawl = &scores.breakdown[0];
        assert_eq!(crawl.category, "Crawlability");
        // 40 + 20 + 8 + 35 + 25 = 128
        assert_eq!(crawl.score, 0);
        assert!(scores.breakdown.iter().all(|b| b.score <= 100));
        assert_eq!(scores.suggestions.len(), 17);
    }

    #[test]
    fn test_breakdown_order_and_items() {
        let scores = score_categories(&all_good(), &CategoryWeights::default());
        let names: Vec<_> = scores.breakdown.iter().map(|b| b.category.as_str()).collect();
        assert_eq!(
            names,
            [
                "Crawlability",
                "Discoverability",
                "Content & Semantics",
                "Render Robustness",
                "Internationalization"
            ]
        );
        assert_eq!(scores.breakdown[0].items.len(), 5);
        assert_eq!(scores.breakdown[1].items["metaNoindex"], false);
        assert_eq!(scores.breakdown[3].items["soft404"], false);
    }

    #[test]
    fn test_overall_weighting() {
        let facts = CategoryFacts {
            https: false,
            lang_attr: false,
            ..all_good()
        };
        let scores = score_categories(&facts, &CategoryWeights::default());
        // 80*0.35 + 100*0.25 + 100*0.20 + 100*0.15 + 95*0.05 = 92.75
        assert_eq!(scores.breakdown[0].score, 80);
        assert_eq!(scores.breakdown[4].score, 95);
        assert_eq!(scores.overall, 93);
    }

    #[test]
    fn test_short_title_costs_twelve() {
        let facts = CategoryFacts {
            title_ok: false,
            ..all_good()
        };
        let scores = score_categories(&facts, &CategoryWeights::default());
        assert_eq!(scores.breakdown[1].score, 88);
        assert_eq!(scores.suggestions.len(), 1);
        assert_eq!(scores.suggestions[0].id, "title");
        assert_eq!(scores.suggestions[0].impact_points, 12);
    }

    #[test]
    fn test_inverted_items_penalize_when_true() {
        let facts = CategoryFacts {
            meta_noindex: true,
            paywall_hint: true,
            ..all_good()
        };
        let scores = score_categories(&facts, &CategoryWeights::default());
        assert_eq!(scores.breakdown[1].score, 75);
        assert_eq!(scores.breakdown[3].score, 88);
        let paywall = scores.suggestions.iter().find(|s| s.id == "paywall").unwrap();
        assert_eq!(paywall.effort, Effort::High);
    }

    #[test]
    fn test_suggestion_ids_are_unique() {
        let mut ids: Vec<_> = CATEGORIES
            .iter()
            .flat_map(|c| c.checks.iter().map(|check| check.suggestion_id))
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_collect_from_page() {
        let page = PageSignals {
            title: Some("A reasonable page title".to_string()),
            h1_text: None,
            has_h1: true,
            x_robots_noai: true,
            content_type: "text/html; charset=utf-8".to_string(),
            text_to_markup_ratio: 0.2,
            lang: Some("en".to_string()),
            ..PageSignals::default()
        };
        let context = FetchContext {
            is_https: true,
            is_status_2xx: true,
        };
        let normal = CategoryFacts::collect(&page, &context, true, false, &PageSignalExtractor::new(0.18));
        assert!(normal.title_ok);
        assert!(!normal.h1_ok);
        assert!(!normal.x_robots_ok);
        assert!(normal.content_type_html);
        assert!(normal.text_ratio_ok);
        assert!(!normal.sitemap_in_robots);

        let strict = CategoryFacts::collect(&page, &context, true, false, &PageSignalExtractor::new(0.22));
        assert!(!strict.text_ratio_ok);
    }
}
