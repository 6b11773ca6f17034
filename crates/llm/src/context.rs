//! Analysis context assembly.
//!
//! Selects which analysis sections to surface for the current ring phase and
//! renders them into a bounded text block appended to the system prompt.

use quento_core::{AnalysisResults, RingPhase, MAX_CONTEXT_BLOCK_LEN};

use crate::client::truncate;

/// Analysis data available to the response pipeline.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub website_url: String,
    pub results: AnalysisResults,
}

/// Sections of the analysis surfaced per phase. The mapping is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SectionSelection {
    scores: bool,
    quick_wins: bool,
    content_issues: bool,
    seo_issues: bool,
    competitors: bool,
}

const fn sections_for(phase: RingPhase) -> SectionSelection {
    match phase {
        RingPhase::Core => SectionSelection {
            scores: true,
            quick_wins: true,
            content_issues: false,
            seo_issues: false,
            competitors: false,
        },
        RingPhase::Discover => SectionSelection {
            scores: true,
            quick_wins: false,
            content_issues: true,
            seo_issues: true,
            competitors: true,
        },
        RingPhase::Plan => SectionSelection {
            scores: true,
            quick_wins: true,
            content_issues: false,
            seo_issues: false,
            competitors: false,
        },
        RingPhase::Execute => SectionSelection {
            scores: false,
            quick_wins: true,
            content_issues: false,
            seo_issues: false,
            competitors: false,
        },
        RingPhase::Optimize => SectionSelection {
            scores: true,
            quick_wins: false,
            content_issues: false,
            seo_issues: false,
            competitors: false,
        },
    }
}

impl AnalysisContext {
    /// Render the phase-appropriate context block, bounded to
    /// [`MAX_CONTEXT_BLOCK_LEN`] characters.
    #[must_use]
    pub fn render(&self, phase: RingPhase) -> String {
        let selection = sections_for(phase);
        let results = &self.results;
        let mut out = String::new();

        out.push_str("\n\nWEBSITE ANALYSIS DATA:\n");
        out.push_str(&format!("Website: {}\n", self.website_url));
        out.push_str(&format!("Overall Score: {}/100\n", results.overall_score));

        if selection.scores {
            out.push_str("\nScores:\n");
            for (name, score) in results.scores.named() {
                out.push_str(&format!("- {name}: {score}/100\n"));
            }
        }

        if selection.quick_wins && !results.quick_wins.is_empty() {
            out.push_str("\nQuick Wins Identified:\n");
            for win in &results.quick_wins {
                out.push_str(&format!("- {win}\n"));
            }
        }

        if selection.content_issues && !results.content_analysis.issues.is_empty() {
            out.push_str("\nContent Issues:\n");
            for issue in &results.content_analysis.issues {
                out.push_str(&format!("- {issue}\n"));
            }
        }

        if selection.seo_issues && !results.seo_analysis.issues.is_empty() {
            out.push_str("\nSEO Issues:\n");
            for issue in &results.seo_analysis.issues {
                out.push_str(&format!("- [{:?}] {}\n", issue.severity, issue.issue));
            }
        }

        if selection.competitors && !results.competitors.is_empty() {
            out.push_str("\nCompetitors:\n");
            for competitor in &results.competitors {
                out.push_str(&format!(
                    "- {} ({}), SEO score {}\n",
                    competitor.name, competitor.url, competitor.seo_score
                ));
            }
        }

        out.push_str(
            "\nUse this data to ask relevant, specific questions about their website and \
             business.",
        );

        truncate(&out, MAX_CONTEXT_BLOCK_LEN).to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quento_core::{
        CategoryScores, Competitor, ContentReport, HeadingStructure, ImageOptimization,
        LinkStructure, SeoReport,
    };

    fn context() -> AnalysisContext {
        AnalysisContext {
            website_url: "https://example.com".to_owned(),
            results: AnalysisResults {
                overall_score: 64,
                scores: CategoryScores { seo: 75, content: 55, mobile: 80, speed: 70, social: 40 },
                content_analysis: ContentReport {
                    title: Some("Example".to_owned()),
                    meta_description: None,
                    word_count: 210,
                    heading_structure: HeadingStructure { h1_count: 0, h2_count: 2 },
                    issues: vec!["Missing H1 tag".to_owned()],
                    recommendations: vec!["Add a single H1 tag".to_owned()],
                },
                seo_analysis: SeoReport {
                    issues: Vec::new(),
                    image_optimization: ImageOptimization { total: 2, with_alt: 1, score: 50.0 },
                    mobile_ready: true,
                    has_canonical: false,
                    link_structure: LinkStructure { internal: 4, external: 2 },
                },
                competitors: vec![Competitor {
                    name: "Competitor A".to_owned(),
                    url: "https://competitor-a.com".to_owned(),
                    strengths: vec!["Strong SEO".to_owned()],
                    seo_score: 78,
                }],
                social_presence: None,
                quick_wins: vec!["Add descriptive alt text to all images".to_owned()],
            },
        }
    }

    #[test]
    fn discover_includes_issues_and_competitors() {
        let block = context().render(RingPhase::Discover);
        assert!(block.contains("Content Issues"));
        assert!(block.contains("Competitor A"));
        assert!(!block.contains("Quick Wins"));
    }

    #[test]
    fn execute_surfaces_only_quick_wins() {
        let block = context().render(RingPhase::Execute);
        assert!(block.contains("Quick Wins"));
        assert!(!block.contains("Scores:"));
        assert!(!block.contains("Competitor A"));
    }

    #[test]
    fn block_is_bounded() {
        let mut ctx = context();
        ctx.results.quick_wins = (0..500).map(|i| format!("quick win number {i}")).collect();
        let block = ctx.render(RingPhase::Core);
        assert!(block.len() <= MAX_CONTEXT_BLOCK_LEN);
    }
}
