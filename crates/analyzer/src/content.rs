//! Content-quality rule checks.

use quento_core::{ContentReport, HeadingStructure};

use crate::fetch::PageSnapshot;

const TITLE_MIN_LEN: usize = 30;
const TITLE_MAX_LEN: usize = 60;
const META_DESCRIPTION_MIN_LEN: usize = 120;
const MIN_WORD_COUNT: usize = 300;

/// Run the fixed content rules over a page snapshot.
#[must_use]
pub fn analyze_content(snapshot: &PageSnapshot) -> ContentReport {
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    match snapshot.title.as_deref() {
        None => {
            issues.push("Missing page title".to_owned());
            recommendations.push("Add a descriptive page title".to_owned());
        },
        Some(title) if title.chars().count() < TITLE_MIN_LEN => {
            issues.push("Page title too short".to_owned());
            recommendations.push("Expand title to 50-60 characters".to_owned());
        },
        Some(title) if title.chars().count() > TITLE_MAX_LEN => {
            issues.push("Page title too long".to_owned());
            recommendations.push("Shorten title to under 60 characters".to_owned());
        },
        Some(_) => {},
    }

    match snapshot.meta_description.as_deref() {
        None => {
            issues.push("Missing meta description".to_owned());
            recommendations.push("Add a compelling meta description".to_owned());
        },
        Some(description) if description.chars().count() < META_DESCRIPTION_MIN_LEN => {
            issues.push("Meta description too short".to_owned());
            recommendations.push("Expand meta description to 150-160 characters".to_owned());
        },
        Some(_) => {},
    }

    if snapshot.h1_tags.is_empty() {
        issues.push("Missing H1 tag".to_owned());
        recommendations.push("Add a single H1 tag with main keyword".to_owned());
    } else if snapshot.h1_tags.len() > 1 {
        issues.push("Multiple H1 tags found".to_owned());
        recommendations.push("Use only one H1 tag per page".to_owned());
    }

    if snapshot.word_count < MIN_WORD_COUNT {
        issues.push("Low word count".to_owned());
        recommendations.push("Add more content (aim for 500+ words)".to_owned());
    }

    ContentReport {
        title: snapshot.title.clone(),
        meta_description: snapshot.meta_description.clone(),
        word_count: snapshot.word_count,
        heading_structure: HeadingStructure {
            h1_count: snapshot.h1_tags.len(),
            h2_count: snapshot.h2_tags.len(),
        },
        issues,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_snapshot() -> PageSnapshot {
        PageSnapshot {
            url: "https://example.com/".to_owned(),
            title: None,
            meta_description: None,
            h1_tags: Vec::new(),
            h2_tags: Vec::new(),
            images: 0,
            images_with_alt: 0,
            internal_links: 0,
            external_links: 0,
            has_viewport: false,
            has_canonical: false,
            word_count: 0,
            html_size: 0,
        }
    }

    #[test]
    fn bare_page_trips_every_rule() {
        let report = analyze_content(&empty_snapshot());
        assert_eq!(report.issues.len(), 4);
        assert!(report.issues.contains(&"Missing page title".to_owned()));
        assert!(report.issues.contains(&"Missing meta description".to_owned()));
        assert!(report.issues.contains(&"Missing H1 tag".to_owned()));
        assert!(report.issues.contains(&"Low word count".to_owned()));
    }

    #[test]
    fn title_length_bounds() {
        let mut snapshot = empty_snapshot();
        snapshot.title = Some("Too short".to_owned());
        assert!(analyze_content(&snapshot).issues.contains(&"Page title too short".to_owned()));

        snapshot.title = Some("x".repeat(61));
        assert!(analyze_content(&snapshot).issues.contains(&"Page title too long".to_owned()));

        snapshot.title = Some("Acme Woodworks - Handmade Furniture in Austin".to_owned());
        assert!(!analyze_content(&snapshot)
            .issues
            .iter()
            .any(|i| i.contains("title")));
    }

    #[test]
    fn multiple_h1_flagged() {
        let mut snapshot = empty_snapshot();
        snapshot.h1_tags = vec!["One".to_owned(), "Two".to_owned()];
        assert!(analyze_content(&snapshot)
            .issues
            .contains(&"Multiple H1 tags found".to_owned()));
    }

    #[test]
    fn healthy_page_has_no_issues() {
        let mut snapshot = empty_snapshot();
        snapshot.title = Some("Acme Woodworks - Handmade Furniture in Austin".to_owned());
        snapshot.meta_description = Some("d".repeat(150));
        snapshot.h1_tags = vec!["Handmade Furniture".to_owned()];
        snapshot.word_count = 800;
        let report = analyze_content(&snapshot);
        assert!(report.issues.is_empty());
        assert!(report.recommendations.is_empty());
    }
}
