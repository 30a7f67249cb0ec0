//! Markdown summary generation
//!
//! This module generates a human-readable markdown report of a crawl,
//! including the crawled pages, skipped pages and errors.

use crate::output::report::CrawlReport;
use crate::state::PageState;
use std::fs;
use std::path::Path;

/// Maximum number of rows listed per table
const MAX_ROWS: usize = 200;

/// Writes the markdown report to `output_path`, creating parent directories
pub fn write_markdown_report(report: &CrawlReport, output_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output_path, format_markdown_report(report))
}

/// Formats a crawl report as markdown
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Crawl Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", report.seed_url));
    md.push_str(&format!("- **Domain**: {}\n", report.domain));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    if let Some(finished) = report.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = report.duration() {
        md.push_str(&format!(
            "- **Duration**: {:.2} seconds\n",
            duration.as_secs_f64()
        ));
    }
    let status = if report.cancelled {
        "cancelled"
    } else if report.budget_exhausted {
        "budget exhausted"
    } else {
        "completed"
    };
    md.push_str(&format!("- **Status**: {}\n\n", status));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!(
        "- **Pages Crawled**: {} / {}\n",
        report.pages_fetched, report.page_budget
    ));
    md.push_str(&format!("- **Fetch Attempts**: {}\n", report.pages.len()));
    md.push_str(&format!("- **Skipped**: {}\n", report.skip_count()));
    md.push_str(&format!("- **Errors**: {}\n", report.error_count()));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        report.success_rate()
    ));

    md.push_str("## Attempt Breakdown\n\n");
    md.push_str("| State | Count |\n");
    md.push_str("|-------|-------|\n");
    let counts = report.count_by_state();
    for state in PageState::all_states() {
        md.push_str(&format!(
            "| {} | {} |\n",
            state,
            counts.get(&state).copied().unwrap_or(0)
        ));
    }
    md.push('\n');

    if !report.visited.is_empty() {
        md.push_str("## Crawled Pages\n\n");
        for (index, url) in report.visited.iter().take(MAX_ROWS).enumerate() {
            md.push_str(&format!("{}. {}\n", index + 1, url));
        }
        push_overflow(&mut md, report.visited.len());
    }

    let problems: Vec<_> = report
        .pages
        .iter()
        .filter(|p| !p.state.is_success())
        .collect();
    if !problems.is_empty() {
        md.push_str("## Skipped and Failed Pages\n\n");
        md.push_str("| URL | State | Detail |\n");
        md.push_str("|-----|-------|--------|\n");
        for page in problems.iter().take(MAX_ROWS) {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                page.url,
                page.state,
                page.detail.as_deref().unwrap_or("").replace('|', "\\|")
            ));
        }
        push_overflow(&mut md, problems.len());
    }

    if !report.save_failures.is_empty() {
        md.push_str("## Save Failures\n\n");
        for failure in &report.save_failures {
            md.push_str(&format!("- {}: {}\n", failure.url, failure.error));
        }
        md.push('\n');
    }

    md
}

fn push_overflow(md: &mut String, total: usize) {
    if total > MAX_ROWS {
        md.push_str(&format!("\n... and {} more\n\n", total - MAX_ROWS));
    } else {
        md.push('\n');
    }
}
