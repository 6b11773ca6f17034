//! Website fetching and HTML extraction.

use std::sync::LazyLock;

use quento_core::{ANALYSIS_FETCH_TIMEOUT_SECS, ANALYSIS_USER_AGENT};
use scraper::{Html, Selector};
use url::Url;

use crate::error::AnalyzerError;

static TITLE: LazyLock<Selector> = LazyLock::new(|| sel("title"));
static META: LazyLock<Selector> = LazyLock::new(|| sel("meta"));
static H1: LazyLock<Selector> = LazyLock::new(|| sel("h1"));
static H2: LazyLock<Selector> = LazyLock::new(|| sel("h2"));
static IMG: LazyLock<Selector> = LazyLock::new(|| sel("img"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| sel("a[href]"));
static CANONICAL: LazyLock<Selector> = LazyLock::new(|| sel(r#"link[rel="canonical"]"#));

fn sel(selector: &str) -> Selector {
    Selector::parse(selector).expect("static selector")
}

/// Raw page facts extracted from a single fetch, input to the rule checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub url: String,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub h1_tags: Vec<String>,
    pub h2_tags: Vec<String>,
    pub images: usize,
    pub images_with_alt: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub has_viewport: bool,
    pub has_canonical: bool,
    pub word_count: usize,
    pub html_size: usize,
}

/// Validate a website URL before any background work is dispatched.
///
/// Only absolute http/https URLs with a host are accepted.
pub fn validate_website_url(raw: &str) -> Result<Url, AnalyzerError> {
    let parsed = Url::parse(raw).map_err(|e| AnalyzerError::InvalidUrl(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AnalyzerError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none() {
        return Err(AnalyzerError::InvalidUrl("missing host".to_owned()));
    }
    Ok(parsed)
}

/// Build the HTTP client used for website fetches: fixed timeout, redirects
/// followed, custom user agent.
pub fn build_fetch_client() -> Result<reqwest::Client, AnalyzerError> {
    Ok(reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(ANALYSIS_FETCH_TIMEOUT_SECS))
        .user_agent(ANALYSIS_USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?)
}

/// Fetch the target page and extract a [`PageSnapshot`].
///
/// Non-2xx responses are an error; the caller records the message verbatim
/// on the analysis row. No retry.
pub async fn fetch_page(
    client: &reqwest::Client,
    url: &Url,
) -> Result<PageSnapshot, AnalyzerError> {
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AnalyzerError::HttpStatus { code: status.as_u16() });
    }
    let final_url = response.url().clone();
    let body = response.text().await?;
    Ok(extract_snapshot(&final_url, &body))
}

/// Pure extraction from fetched HTML; separated from the network call so the
/// rule checks are testable on fixtures.
#[must_use]
pub fn extract_snapshot(url: &Url, html: &str) -> PageSnapshot {
    let document = Html::parse_document(html);
    let host = url.host_str().unwrap_or_default();

    let title = document
        .select(&TITLE)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_owned())
        .filter(|t| !t.is_empty());

    let meta_description = meta_content(&document, "description");
    let has_viewport = meta_content(&document, "viewport").is_some();
    let has_canonical = document.select(&CANONICAL).next().is_some();

    let h1_tags = heading_texts(&document, &H1);
    let h2_tags = heading_texts(&document, &H2);

    let mut images = 0usize;
    let mut images_with_alt = 0usize;
    for img in document.select(&IMG) {
        images += 1;
        if img.value().attr("alt").is_some_and(|alt| !alt.trim().is_empty()) {
            images_with_alt += 1;
        }
    }

    let mut internal_links = 0usize;
    let mut external_links = 0usize;
    for anchor in document.select(&ANCHOR) {
        let href = anchor.value().attr("href").unwrap_or_default();
        if href.starts_with('/') || (!host.is_empty() && href.contains(host)) {
            internal_links += 1;
        } else if href.starts_with("http") {
            external_links += 1;
        }
    }

    let text = document.root_element().text().collect::<Vec<_>>().join(" ");
    let word_count = text.split_whitespace().count();

    PageSnapshot {
        url: url.to_string(),
        title,
        meta_description,
        h1_tags,
        h2_tags,
        images,
        images_with_alt,
        internal_links,
        external_links,
        has_viewport,
        has_canonical,
        word_count,
        html_size: html.len(),
    }
}

fn meta_content(document: &Html, name: &str) -> Option<String> {
    document
        .select(&META)
        .find(|m| {
            m.value().attr("name") == Some(name)
                || m.value().attr("property").is_some_and(|p| p == format!("og:{name}"))
        })
        .and_then(|m| m.value().attr("content"))
        .map(str::to_owned)
        .filter(|c| !c.is_empty())
}

fn heading_texts(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(|h| h.text().collect::<String>().trim().to_owned())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"<!doctype html>
<html>
<head>
  <title>Acme Woodworks - Handmade Furniture in Austin</title>
  <meta name="description" content="Handmade hardwood furniture built to order in Austin, Texas. Custom tables, chairs, and shelving with local wood.">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <link rel="canonical" href="https://acme-woodworks.com/">
</head>
<body>
  <h1>Handmade Furniture</h1>
  <h2>Tables</h2>
  <h2>Chairs</h2>
  <img src="/a.jpg" alt="walnut table">
  <img src="/b.jpg">
  <a href="/shop">Shop</a>
  <a href="/about">About</a>
  <a href="https://acme-woodworks.com/contact">Contact</a>
  <a href="https://instagram.com/acme">Instagram</a>
  <p>We build tables and chairs from local hardwood.</p>
</body>
</html>"#;

    fn snapshot() -> PageSnapshot {
        let url = Url::parse("https://acme-woodworks.com/").unwrap();
        extract_snapshot(&url, FIXTURE)
    }

    #[test]
    fn extracts_title_and_meta() {
        let snap = snapshot();
        assert_eq!(
            snap.title.as_deref(),
            Some("Acme Woodworks - Handmade Furniture in Austin")
        );
        assert!(snap.meta_description.as_deref().unwrap().starts_with("Handmade hardwood"));
        assert!(snap.has_viewport);
        assert!(snap.has_canonical);
    }

    #[test]
    fn counts_headings_images_and_links() {
        let snap = snapshot();
        assert_eq!(snap.h1_tags, vec!["Handmade Furniture"]);
        assert_eq!(snap.h2_tags.len(), 2);
        assert_eq!(snap.images, 2);
        assert_eq!(snap.images_with_alt, 1);
        assert_eq!(snap.internal_links, 3);
        assert_eq!(snap.external_links, 1);
    }

    #[test]
    fn url_validation_rejects_bad_input() {
        assert!(validate_website_url("https://example.com").is_ok());
        assert!(validate_website_url("not-a-valid-url").is_err());
        assert!(validate_website_url("ftp://example.com").is_err());
        assert!(validate_website_url("http://").is_err());
    }

    #[tokio::test]
    async fn fetch_surfaces_http_error_status() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = build_fetch_client().unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let err = fetch_page(&client, &url).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::HttpStatus { code: 503 }));
    }

    #[tokio::test]
    async fn fetch_parses_served_page() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FIXTURE))
            .mount(&server)
            .await;

        let client = build_fetch_client().unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let snap = fetch_page(&client, &url).await.unwrap();
        assert_eq!(snap.h1_tags.len(), 1);
        assert!(snap.word_count > 0);
    }
}
