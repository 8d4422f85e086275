//! Markdown report rendering
//!
//! Renders an [`AuditReport`] as a human-readable document: verdict, score
//! tables, suggestions and extras.

use crate::report::types::AuditReport;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown report to `output_path`
///
/// # Arguments
///
/// * `report` - The finished audit
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(std::io::Error)` - Failed to create or write the file
pub fn write_markdown_report(report: &AuditReport, output_path: &Path) -> std::io::Result<()> {
    let markdown = format_markdown_report(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Formats an audit report as markdown
pub fn format_markdown_report(report: &AuditReport) -> String {
    let mut md = String::new();

    md.push_str("# Crawler Readiness Audit\n\n");

    md.push_str("## Target\n\n");
    md.push_str(&format!("- **URL**: {}\n", report.url));
    if report.final_url != report.url {
        md.push_str(&format!("- **Final URL**: {}\n", report.final_url));
    }
    md.push_str(&format!("- **User Agent**: {}\n", report.user_agent));
    md.push_str(&format!(
        "- **Audited**: {}\n",
        report.audited_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!("- **Strict**: {}\n", yes_no(report.strict)));
    md.push_str(&format!("- **Config Hash**: {}\n\n", report.config_fingerprint));

    md.push_str("## Verdict\n\n");
    if report.verdict.accessible {
        md.push_str("Accessible to the default crawler.\n\n");
    } else {
        md.push_str("**Not accessible** to the default crawler:\n\n");
        for reason in &report.verdict.reasons {
            md.push_str(&format!("- {}\n", reason));
        }
        md.push('\n');
    }

    md.push_str("## Scores\n\n");
    md.push_str(&format!("- **Overall**: {}/100\n", report.overall));
    if let Some(readiness) = report.agent_readiness {
        md.push_str(&format!("- **Agent Readiness**: {}/100\n", readiness));
    }
    md.push('\n');

    md.push_str("| Category | Score |\n");
    md.push_str("|----------|-------|\n");
    for breakdown in &report.breakdown {
        md.push_str(&format!("| {} | {} |\n", breakdown.category, breakdown.score));
    }
    md.push('\n');

    if let Some(per_model) = &report.per_model_scores {
        md.push_str("## Per-Agent Scores\n\n");
        md.push_str("| Agent | Score |\n");
        md.push_str("|-------|-------|\n");
        for (agent, score) in per_model {
            md.push_str(&format!("| {} | {} |\n", agent, score));
        }
        md.push('\n');
    }

    if !report.suggestions.is_empty() {
        md.push_str("## Suggestions\n\n");
        md.push_str("| Impact | Effort | Suggestion |\n");
        md.push_str("|--------|--------|------------|\n");
        for suggestion in &report.suggestions {
            let text = match &suggestion.detail {
                Some(detail) => format!("{} ({})", suggestion.title, detail),
                None => suggestion.title.clone(),
            };
            md.push_str(&format!(
                "| +{} | {} | {} |\n",
                suggestion.impact_points,
                suggestion.effort,
                text.replace('|', "\\|")
            ));
        }
        md.push('\n');
    }

    let extras = &report.extras;
    md.push_str("## Extras\n\n");
    md.push_str(&format!(
        "- **Meta Description**: {} ({} chars, {})\n",
        if extras.meta_description.present {
            "present"
        } else {
            "missing"
        },
        extras.meta_description.length,
        if extras.meta_description.ok {
            "ok"
        } else {
            "out of range"
        }
    ));
    md.push_str(&format!(
        "- **noai**: meta {}, header {}\n",
        yes_no(extras.ai_directives.meta_noai),
        yes_no(extras.ai_directives.x_robots_noai)
    ));
    md.push_str(&format!(
        "- **Security Headers**: HSTS {}, CSP {}, clickjacking protection {}\n",
        yes_no(extras.security_headers.hsts),
        yes_no(extras.security_headers.csp),
        yes_no(extras.security_headers.clickjack_protected)
    ));
    if !report.raw.sitemaps.is_empty() {
        md.push_str(&format!("- **Sitemaps**: {}\n", report.raw.sitemaps.join(", ")));
    }
    md.push('\n');

    md.push_str("| robots.txt token | Allowed |\n");
    md.push_str("|------------------|---------|\n");
    for (token, allowed) in &extras.robots_per_bot {
        md.push_str(&format!("| {} | {} |\n", token, yes_no(*allowed)));
    }
    md.push('\n');

    if !report.extras_suggestions.is_empty() {
        md.push_str("### Additional Hints\n\n");
        for hint in &report.extras_suggestions {
            match &hint.detail {
                Some(detail) => md.push_str(&format!("- {} ({})\n", hint.title, detail)),
                None => md.push_str(&format!("- {}\n", hint.title)),
            }
        }
        md.push('\n');
    }

    md
}
