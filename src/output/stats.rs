//! Console summary of a finished crawl

use crate::output::report::CrawlReport;

/// Formats the console summary of a crawl
///
/// The last line is always `Done. Links crawled: <n>`.
pub fn format_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Summary ===\n\n");
    out.push_str(&format!("  Seed: {}\n", report.seed_url));
    out.push_str(&format!("  Domain: {}\n", report.domain));
    out.push_str(&format!(
        "  Pages crawled: {} / {} budget\n",
        report.pages_fetched, report.page_budget
    ));
    out.push_str(&format!("  Fetch attempts: {}\n", report.pages.len()));
    if let Some(duration) = report.duration() {
        out.push_str(&format!("  Duration: {:.2}s\n", duration.as_secs_f64()));
    }

    let counts = report.count_by_state();
    if !counts.is_empty() {
        out.push_str("\nAttempts by State:\n");
        // Sort states by count (descending)
        let mut counts: Vec<_> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        for (state, count) in counts {
            out.push_str(&format!("  {}: {}\n", state, count));
        }
    }

    if !report.saved_files.is_empty() || !report.save_failures.is_empty() {
        out.push_str(&format!(
            "\nSaved pages: {} ({} failed)\n",
            report.saved_files.len(),
            report.save_failures.len()
        ));
    }

    if report.cancelled {
        out.push_str("\nCrawl was cancelled before completion\n");
    } else if report.budget_exhausted {
        out.push_str("\nStopped at the page budget\n");
    }

    out.push_str(&format!("\nDone. Links crawled: {}\n", report.pages_fetched));
    out
}

/// Prints the crawl summary to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", format_report(report));
}
