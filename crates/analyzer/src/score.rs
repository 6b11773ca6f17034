//! Fixed-deduction score arithmetic and quick-win selection.

use quento_core::{CategoryScores, ContentReport, SeoReport, Severity, SocialPresence};

const CONTENT_DEDUCTION_PER_ISSUE: i32 = 15;
const MOBILE_SCORE_WITH_VIEWPORT: i32 = 80;
const MOBILE_SCORE_WITHOUT_VIEWPORT: i32 = 40;
/// Placeholder until a real page-speed integration exists.
const SPEED_SCORE: i32 = 70;
const SOCIAL_SCORE_WITH_DATA: i32 = 60;
const SOCIAL_SCORE_WITHOUT_DATA: i32 = 40;
const MAX_QUICK_WINS: usize = 5;

/// Derive the five category scores from the rule reports.
#[must_use]
pub fn calculate_scores(
    content: &ContentReport,
    seo: &SeoReport,
    social: Option<&SocialPresence>,
) -> CategoryScores {
    let content_score =
        (100 - CONTENT_DEDUCTION_PER_ISSUE * content.issues.len() as i32).clamp(0, 100);

    let seo_deductions: i32 = seo.issues.iter().map(|i| i.severity.deduction()).sum();
    let seo_score = (100 - seo_deductions).clamp(0, 100);

    let mobile_score = if seo.mobile_ready {
        MOBILE_SCORE_WITH_VIEWPORT
    } else {
        MOBILE_SCORE_WITHOUT_VIEWPORT
    };

    let social_score =
        if social.is_some() { SOCIAL_SCORE_WITH_DATA } else { SOCIAL_SCORE_WITHOUT_DATA };

    CategoryScores {
        seo: seo_score,
        content: content_score,
        mobile: mobile_score,
        speed: SPEED_SCORE,
        social: social_score,
    }
}

/// Low-effort, high-impact remediations: recommendations attached to high-
/// and medium-severity SEO issues, capped at five, with generic suggestions
/// as filler for clean sites.
#[must_use]
pub fn generate_quick_wins(seo: &SeoReport) -> Vec<String> {
    let mut quick_wins: Vec<String> = seo
        .issues
        .iter()
        .filter(|i| matches!(i.severity, Severity::High | Severity::Medium))
        .map(|i| i.recommendation.clone())
        .collect();

    if quick_wins.is_empty() {
        quick_wins = vec![
            "Consider adding more internal links".to_owned(),
            "Optimize images for faster loading".to_owned(),
            "Add structured data markup".to_owned(),
        ];
    }

    quick_wins.truncate(MAX_QUICK_WINS);
    quick_wins
}

#[cfg(test)]
mod tests {
    use super::*;
    use quento_core::{HeadingStructure, ImageOptimization, LinkStructure, SeoIssue};

    fn content_with_issues(n: usize) -> ContentReport {
        ContentReport {
            title: None,
            meta_description: None,
            word_count: 0,
            heading_structure: HeadingStructure::default(),
            issues: (0..n).map(|i| format!("issue {i}")).collect(),
            recommendations: Vec::new(),
        }
    }

    fn seo_with(issues: Vec<SeoIssue>, mobile_ready: bool) -> SeoReport {
        SeoReport {
            issues,
            image_optimization: ImageOptimization { total: 0, with_alt: 0, score: 100.0 },
            mobile_ready,
            has_canonical: true,
            link_structure: LinkStructure { internal: 5, external: 2 },
        }
    }

    fn issue(severity: Severity) -> SeoIssue {
        SeoIssue {
            severity,
            issue: "x".to_owned(),
            recommendation: format!("fix {severity:?}"),
        }
    }

    #[test]
    fn content_score_deducts_fifteen_per_issue() {
        let seo = seo_with(Vec::new(), true);
        assert_eq!(calculate_scores(&content_with_issues(0), &seo, None).content, 100);
        assert_eq!(calculate_scores(&content_with_issues(2), &seo, None).content, 70);
        // Floored at zero.
        assert_eq!(calculate_scores(&content_with_issues(9), &seo, None).content, 0);
    }

    #[test]
    fn seo_score_deducts_by_severity() {
        let seo = seo_with(
            vec![issue(Severity::High), issue(Severity::Medium), issue(Severity::Low)],
            true,
        );
        let scores = calculate_scores(&content_with_issues(0), &seo, None);
        assert_eq!(scores.seo, 100 - 20 - 10 - 5);
    }

    #[test]
    fn seo_score_floors_at_zero() {
        let seo = seo_with(vec![issue(Severity::High); 6], true);
        assert_eq!(calculate_scores(&content_with_issues(0), &seo, None).seo, 0);
    }

    #[test]
    fn mobile_speed_and_social_constants() {
        let seo_ready = seo_with(Vec::new(), true);
        let seo_not = seo_with(Vec::new(), false);
        let social = SocialPresence {
            platforms_found: vec!["linkedin".to_owned()],
            activity_level: "moderate".to_owned(),
            recommendations: Vec::new(),
        };

        let with = calculate_scores(&content_with_issues(0), &seo_ready, Some(&social));
        assert_eq!(with.mobile, 80);
        assert_eq!(with.speed, 70);
        assert_eq!(with.social, 60);

        let without = calculate_scores(&content_with_issues(0), &seo_not, None);
        assert_eq!(without.mobile, 40);
        assert_eq!(without.social, 40);
    }

    #[test]
    fn quick_wins_only_from_high_and_medium() {
        let seo = seo_with(
            vec![issue(Severity::High), issue(Severity::Low), issue(Severity::Medium)],
            true,
        );
        let wins = generate_quick_wins(&seo);
        assert_eq!(wins.len(), 2);
        assert!(wins.iter().all(|w| !w.contains("Low")));
    }

    #[test]
    fn quick_wins_fall_back_when_clean() {
        let wins = generate_quick_wins(&seo_with(Vec::new(), true));
        assert_eq!(wins.len(), 3);
    }

    #[test]
    fn quick_wins_capped_at_five() {
        let seo = seo_with(vec![issue(Severity::Medium); 8], true);
        assert_eq!(generate_quick_wins(&seo).len(), 5);
    }
}
