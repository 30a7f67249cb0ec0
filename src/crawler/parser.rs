//! Link and title extraction from fetched pages
//!
//! Only `<a href>` anchors are followed. Scope filtering and deduplication
//! happen in the coordinator, not here.

use scraper::{Html, Selector};
use url::Url;

/// Schemes that never lead to a crawlable page
const IGNORED_SCHEMES: [&str; 4] = ["javascript:", "mailto:", "tel:", "data:"];

/// What the crawler needs from one HTML document
#[derive(Debug, Clone)]
pub struct ParsedPage {
    pub title: Option<String>,

    /// Absolute HTTP(S) URLs of every `<a href>`, in document order
    pub links: Vec<String>,
}

/// Parses a page and collects its title and outbound links
///
/// Relative hrefs are resolved against `base_url`, which must be the URL
/// the page was actually served from. Empty and fragment-only hrefs, the
/// `javascript:`, `mailto:`, `tel:` and `data:` schemes, and anything that
/// is not HTTP(S) once resolved are dropped. Duplicates are kept.
///
/// # Example
///
/// ```
/// use site_crawler::crawler::parse_html;
/// use url::Url;
///
/// let html = r##"<title>Docs</title><a href="intro">Intro</a><a href="#top">Top</a>"##;
/// let page_url = Url::parse("https://example.com/docs/").unwrap();
/// let parsed = parse_html(html, &page_url);
/// assert_eq!(parsed.title.as_deref(), Some("Docs"));
/// assert_eq!(parsed.links, vec!["https://example.com/docs/intro".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: page_title(&document),
        links: anchor_links(&document, base_url),
    }
}

fn page_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let title = document.select(&selector).next()?;
    let text = title.text().collect::<String>();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn anchor_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Turns one href into an absolute HTTP(S) URL, or `None` if it is not followable
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if IGNORED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return None;
    }

    let resolved = base_url.join(href).ok()?;
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}
