//! Integration tests for the auditor
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! audit pipeline end-to-end: primary fetch, robots.txt, category scoring and
//! the concurrent per-agent re-fetches.

use botsight::config::Config;
use botsight::{run_audit, AuditError, AuditOptions, Auditor};
use std::time::Duration;
use wiremock::matchers::{header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HTML: &str = "text/html; charset=utf-8";

/// A well-formed page with plenty of server-rendered text
fn rich_page(extra_head: &str) -> String {
    let paragraph = "Acme widgets are machined from a single block of steel and tested for ten thousand hours before they leave the factory floor. ";
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<title>Acme Widgets - Industrial widgets since 1950</title>
<meta name="description" content="Acme builds rugged industrial widgets for factories, warehouses and labs.">
<link rel="canonical" href="https://acme.example/">
<script type="application/ld+json">{{"@context":"https://schema.org","@type":"FAQPage"}}</script>
{}
</head>
<body>
<h1>Industrial widgets</h1>
<p>{}</p>
</body>
</html>"#,
        extra_head,
        paragraph.repeat(12)
    )
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, HTML)
}

/// Configuration with a short timeout so failing agents resolve quickly
fn fast_config(default_user_agent: &str) -> Config {
    let mut config = Config::default();
    config.fetcher.timeout_secs = 1;
    config.fetcher.default_user_agent = default_user_agent.to_string();
    config
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/plain"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_successful_audit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(
        &mock_server,
        &format!("User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml\n", base_url),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(rich_page("")))
        .mount(&mock_server)
        .await;

    let report = run_audit(&Config::default(), &base_url, false)
        .await
        .expect("audit should succeed");

    assert_eq!(report.url, format!("{}/", base_url));
    assert_eq!(report.final_url, format!("{}/", base_url));
    assert_eq!(report.raw.status, 200);
    assert!(report.raw.robots_allowed);
    assert_eq!(report.raw.sitemaps, vec![format!("{}/sitemap.xml", base_url)]);
    assert!(report.verdict.accessible, "{:?}", report.verdict.reasons);

    // Only HTTPS is missing: 80 * 0.35 + 100 * 0.65 = 93
    assert_eq!(report.breakdown.len(), 5);
    assert_eq!(report.category("Crawlability").unwrap().score, 80);
    assert_eq!(report.overall, 93);
    assert_eq!(report.suggestions.len(), 1);
    assert_eq!(report.suggestions[0].id, "https");

    // Every agent met every signal except HTTPS
    let per_model = report.per_model_scores.as_ref().expect("per-agent scores");
    assert_eq!(per_model.len(), 5);
    assert_eq!(per_model["ChatGPT"], 97);
    assert_eq!(per_model["Gemini"], 96);
    assert_eq!(report.agent_readiness, Some(96));

    assert_eq!(report.config_fingerprint.len(), 64);
    assert!(report.extras.meta_description.ok);
    assert!(report.extras.robots_per_bot.values().all(|allowed| *allowed));

    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("perModelScores").is_some());
    assert!(json.get("agentReadiness").is_some());
    assert_eq!(json["verdict"]["accessible"], true);
    assert_eq!(json["breakdown"][0]["items"]["http2xx"], true);
}

#[tokio::test]
async fn test_not_found_short_circuits() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/missing", mock_server.uri());
    let err = run_audit(&Config::default(), &url, false)
        .await
        .expect_err("a 404 page is not scored");

    assert!(matches!(err, AuditError::NotFound { status: 404, .. }));
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.user_message(), "This page does not exist.");
}

#[tokio::test]
async fn test_gone_keeps_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&mock_server)
        .await;

    let err = run_audit(&Config::default(), &mock_server.uri(), false)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 410);
}

#[tokio::test]
async fn test_server_error_is_unreachable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let err = run_audit(&Config::default(), &mock_server.uri(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, AuditError::Unreachable { status: 503, .. }));
    assert_eq!(err.status_code(), 503);
}

#[tokio::test]
async fn test_unreachable_target() {
    // Nothing listens on the discard port
    let err = run_audit(&fast_config("AuditProbe/1.0"), "http://127.0.0.1:9/", false)
        .await
        .unwrap_err();

    assert!(matches!(err, AuditError::Unreachable { status: 0, .. }));
    assert_eq!(err.status_code(), 502);
    assert_eq!(err.user_message(), "Could not reach the page.");
}

#[tokio::test]
async fn test_invalid_url() {
    let auditor = Auditor::new(Config::default()).unwrap();
    for bad in ["", "   ", "ftp://example.com/", "https://"] {
        let err = auditor.run(bad, AuditOptions::default()).await.unwrap_err();
        assert_eq!(err.status_code(), 400, "{:?}", bad);
    }
}

#[tokio::test]
async fn test_robots_full_block() {
    let mock_server = MockServer::start().await;

    mount_robots(&mock_server, "User-agent: *\nDisallow: /\n").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(rich_page("")))
        .mount(&mock_server)
        .await;

    let report = run_audit(&Config::default(), &mock_server.uri(), false)
        .await
        .unwrap();

    assert!(!report.verdict.accessible);
    assert_eq!(report.verdict.reasons.len(), 1);
    assert!(report.verdict.reasons[0].contains("oai-searchbot"));
    assert!(report.verdict.reasons[0].contains("Disallow: /"));
    assert!(!report.raw.robots_allowed);

    let crawl = report.category("Crawlability").unwrap();
    assert_eq!(crawl.items["robotsAllowed"], false);
    // HTTPS (20) and robots (35)
    assert_eq!(crawl.score, 45);
    assert_eq!(report.suggestions[0].id, "robots");
    assert_eq!(report.suggestions[0].impact_points, 35);

    // No agent token has its own group, so every agent loses robots-allow
    let per_model = report.per_model_scores.as_ref().unwrap();
    assert_eq!(per_model["ChatGPT"], 67);
    assert_eq!(per_model["Claude"], 70);
    assert!(report.extras.robots_per_bot.values().all(|allowed| !*allowed));
    assert!(report
        .extras_suggestions
        .iter()
        .any(|s| s.title == "robots.txt blocks gptbot (review the rules)"));
}

#[tokio::test]
async fn test_per_agent_user_agent_matching() {
    let mock_server = MockServer::start().await;

    // ClaudeBot is served a page that opts out of AI use
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header_regex("user-agent", "ClaudeBot"))
        .respond_with(html_response(rich_page(
            r#"<meta name="robots" content="noai">"#,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(rich_page("")))
        .mount(&mock_server)
        .await;

    let report = run_audit(&Config::default(), &mock_server.uri(), false)
        .await
        .unwrap();

    let per_model = report.per_model_scores.as_ref().unwrap();
    assert_eq!(per_model["Perplexity"], 96);
    assert_eq!(per_model["Claude"], 66);

    // The primary fetch never saw the directive
    assert!(!report.extras.ai_directives.meta_noai);
    assert!(report.verdict.accessible);
}

#[tokio::test]
async fn test_single_agent_failure_degrades() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header_regex("user-agent", "ClaudeBot"))
        .respond_with(html_response(rich_page("")).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(rich_page("")))
        .mount(&mock_server)
        .await;

    let report = run_audit(&fast_config("AuditProbe/1.0"), &mock_server.uri(), false)
        .await
        .unwrap();

    let per_model = report.per_model_scores.as_ref().unwrap();
    assert_eq!(per_model.len(), 5);
    // Only robots-allow (26) and anti-ai-directives (30) survive a failed fetch
    assert_eq!(per_model["Claude"], 56);
    assert_eq!(per_model["Perplexity"], 96);
    assert!(report.agent_readiness.is_some());
}

#[tokio::test]
async fn test_all_agents_failing_omits_agent_scores() {
    let mock_server = MockServer::start().await;

    // Every built-in agent identifies as "compatible"; the default identity does not
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header_regex("user-agent", "compatible"))
        .respond_with(html_response(rich_page("")).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(rich_page("")))
        .mount(&mock_server)
        .await;

    let report = run_audit(&fast_config("AuditProbe/1.0"), &mock_server.uri(), false)
        .await
        .unwrap();

    assert!(report.per_model_scores.is_none());
    assert!(report.agent_readiness.is_none());
    // HTTPS (-20 crawlability) and no sitemap (-8 discoverability)
    assert_eq!(report.overall, 91);

    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("perModelScores").is_none());
    assert!(json.get("agentReadiness").is_none());
}

#[tokio::test]
async fn test_noindex_header_and_meta() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            html_response(rich_page(r#"<meta name="robots" content="noindex">"#))
                .insert_header("x-robots-tag", "noindex"),
        )
        .mount(&mock_server)
        .await;

    let report = run_audit(&Config::default(), &mock_server.uri(), false)
        .await
        .unwrap();

    assert!(!report.verdict.accessible);
    assert_eq!(report.verdict.reasons.len(), 2);
    assert!(report.suggestion("noindex").is_some());
    assert!(report.suggestion("x-robots").is_some());

    // noindex cancels robots-allow for every agent
    let per_model = report.per_model_scores.as_ref().unwrap();
    assert_eq!(per_model["ChatGPT"], 67);
}
