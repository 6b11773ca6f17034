//! Technical SEO rule checks.

use quento_core::{ImageOptimization, LinkStructure, SeoIssue, SeoReport, Severity};

use crate::fetch::PageSnapshot;

const MIN_INTERNAL_LINKS: usize = 3;

/// Run the fixed SEO rules over a page snapshot.
#[must_use]
pub fn analyze_seo(snapshot: &PageSnapshot) -> SeoReport {
    let mut issues = Vec::new();

    if snapshot.images > 0 && snapshot.images_with_alt < snapshot.images {
        let missing = snapshot.images - snapshot.images_with_alt;
        issues.push(SeoIssue {
            severity: Severity::Medium,
            issue: format!("{missing} images missing alt text"),
            recommendation: "Add descriptive alt text to all images".to_owned(),
        });
    }

    if !snapshot.has_viewport {
        issues.push(SeoIssue {
            severity: Severity::High,
            issue: "Missing viewport meta tag".to_owned(),
            recommendation: "Add viewport meta tag for mobile responsiveness".to_owned(),
        });
    }

    if !snapshot.has_canonical {
        issues.push(SeoIssue {
            severity: Severity::Low,
            issue: "Missing canonical URL".to_owned(),
            recommendation: "Add canonical URL to prevent duplicate content".to_owned(),
        });
    }

    if snapshot.internal_links < MIN_INTERNAL_LINKS {
        issues.push(SeoIssue {
            severity: Severity::Medium,
            issue: "Few internal links".to_owned(),
            recommendation: "Add more internal links to improve navigation".to_owned(),
        });
    }

    let image_score = if snapshot.images > 0 {
        snapshot.images_with_alt as f64 / snapshot.images as f64 * 100.0
    } else {
        100.0
    };

    SeoReport {
        issues,
        image_optimization: ImageOptimization {
            total: snapshot.images,
            with_alt: snapshot.images_with_alt,
            score: image_score,
        },
        mobile_ready: snapshot.has_viewport,
        has_canonical: snapshot.has_canonical,
        link_structure: LinkStructure {
            internal: snapshot.internal_links,
            external: snapshot.external_links,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> PageSnapshot {
        PageSnapshot {
            url: "https://example.com/".to_owned(),
            title: None,
            meta_description: None,
            h1_tags: Vec::new(),
            h2_tags: Vec::new(),
            images: 4,
            images_with_alt: 1,
            internal_links: 1,
            external_links: 5,
            has_viewport: false,
            has_canonical: false,
            word_count: 100,
            html_size: 1000,
        }
    }

    #[test]
    fn all_rules_fire_with_expected_severities() {
        let report = analyze_seo(&snapshot());
        assert_eq!(report.issues.len(), 4);

        let severities: Vec<Severity> = report.issues.iter().map(|i| i.severity).collect();
        assert!(severities.contains(&Severity::High)); // viewport
        assert!(severities.contains(&Severity::Low)); // canonical
        assert_eq!(severities.iter().filter(|s| **s == Severity::Medium).count(), 2);

        assert!(report.issues.iter().any(|i| i.issue == "3 images missing alt text"));
    }

    #[test]
    fn image_score_is_a_ratio() {
        let report = analyze_seo(&snapshot());
        assert!((report.image_optimization.score - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn no_images_scores_full() {
        let mut snap = snapshot();
        snap.images = 0;
        snap.images_with_alt = 0;
        let report = analyze_seo(&snap);
        assert!((report.image_optimization.score - 100.0).abs() < f64::EPSILON);
        assert!(!report.issues.iter().any(|i| i.issue.contains("alt text")));
    }

    #[test]
    fn clean_page_has_no_issues() {
        let snap = PageSnapshot {
            images_with_alt: 4,
            internal_links: 10,
            has_viewport: true,
            has_canonical: true,
            ..snapshot()
        };
        let report = analyze_seo(&snap);
        assert!(report.issues.is_empty());
        assert!(report.mobile_ready);
    }
}
