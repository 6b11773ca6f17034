//! Deterministic strategy document generation.
//!
//! Pure template filling from analysis score bands; no model call in this
//! path. The narrative strings are fixed templates keyed on thresholds.

use chrono::{Duration, NaiveDate};
use quento_core::{
    ActionItem, AnalysisResults, Effort, Priority, Recommendation,
};
use uuid::Uuid;

const STRENGTH_THRESHOLD: i32 = 70;
const GAP_THRESHOLD: i32 = 50;
const MAX_GAPS: usize = 5;
const MAX_PRIORITIES: usize = 5;

/// Everything the generator produces for one strategy.
#[derive(Debug, Clone)]
pub struct GeneratedStrategy {
    pub executive_summary: String,
    pub vision_statement: String,
    pub key_strengths: Vec<String>,
    pub critical_gaps: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub ninety_day_priorities: Vec<String>,
    pub action_items: Vec<ActionItem>,
}

/// Build the full document from analysis results.
#[must_use]
pub fn build_strategy_document(
    strategy_id: Uuid,
    website_url: &str,
    results: &AnalysisResults,
    today: NaiveDate,
) -> GeneratedStrategy {
    GeneratedStrategy {
        executive_summary: executive_summary(website_url, results),
        vision_statement: vision_statement(website_url),
        key_strengths: identify_strengths(results),
        critical_gaps: identify_gaps(results),
        recommendations: build_recommendations(results),
        ninety_day_priorities: ninety_day_priorities(results),
        action_items: build_action_items(strategy_id, results, today),
    }
}

/// Assessment and outlook bands keyed on the overall score.
const fn score_band(score: i32) -> (&'static str, &'static str) {
    if score >= 80 {
        ("is performing well", "fine-tuning for excellence")
    } else if score >= 60 {
        ("has a solid foundation", "strategic improvements")
    } else if score >= 40 {
        ("has significant opportunities for improvement", "focused optimization")
    } else {
        ("requires immediate attention", "foundational rebuilding")
    }
}

fn executive_summary(url: &str, results: &AnalysisResults) -> String {
    let (assessment, outlook) = score_band(results.overall_score);
    let scores = results.scores;
    format!(
        "Based on our comprehensive analysis, {url} {assessment} with an overall score of \
         {}/100. The website scores {}/100 for SEO, {}/100 for content quality, and {}/100 \
         for mobile experience. Our recommended strategy focuses on {outlook} to maximize \
         your digital presence and drive business growth.",
        results.overall_score, scores.seo, scores.content, scores.mobile
    )
}

fn vision_statement(url: &str) -> String {
    format!(
        "Transform {url} into a high-performing digital presence that drives measurable \
         business growth through optimized content, improved user experience, and strategic \
         marketing initiatives."
    )
}

fn identify_strengths(results: &AnalysisResults) -> Vec<String> {
    let scores = results.scores;
    let mut strengths = Vec::new();

    if scores.seo >= STRENGTH_THRESHOLD {
        strengths.push("Strong SEO foundation".to_owned());
    }
    if scores.content >= STRENGTH_THRESHOLD {
        strengths.push("Quality content presence".to_owned());
    }
    if scores.mobile >= STRENGTH_THRESHOLD {
        strengths.push("Good mobile responsiveness".to_owned());
    }
    if scores.speed >= STRENGTH_THRESHOLD {
        strengths.push("Fast page load times".to_owned());
    }
    if results.seo_analysis.image_optimization.score >= 80.0 {
        strengths.push("Well-optimized images".to_owned());
    }
    if results.seo_analysis.has_canonical {
        strengths.push("Proper canonical URL setup".to_owned());
    }

    if strengths.is_empty() {
        strengths.push("Opportunity for significant improvement".to_owned());
    }
    strengths
}

fn identify_gaps(results: &AnalysisResults) -> Vec<String> {
    let scores = results.scores;
    let mut gaps = Vec::new();

    if scores.seo < GAP_THRESHOLD {
        gaps.push("SEO optimization needs work".to_owned());
    }
    if scores.content < GAP_THRESHOLD {
        gaps.push("Content quality and depth".to_owned());
    }
    if scores.mobile < GAP_THRESHOLD {
        gaps.push("Mobile user experience".to_owned());
    }
    if scores.speed < GAP_THRESHOLD {
        gaps.push("Page speed optimization".to_owned());
    }
    if scores.social < GAP_THRESHOLD {
        gaps.push("Social media integration".to_owned());
    }

    for issue in &results.content_analysis.issues {
        if !gaps.iter().any(|g| g.eq_ignore_ascii_case(issue)) {
            let mut capitalized = issue.clone();
            if let Some(first) = capitalized.get_mut(..1) {
                first.make_ascii_uppercase();
            }
            gaps.push(capitalized);
        }
    }

    gaps.truncate(MAX_GAPS);
    gaps
}

fn build_recommendations(results: &AnalysisResults) -> Vec<Recommendation> {
    let scores = results.scores;
    let mut recommendations = Vec::new();

    if scores.seo < 80 {
        recommendations.push(Recommendation {
            id: "seo-optimization".to_owned(),
            title: "Enhance SEO Performance".to_owned(),
            priority: Priority::High,
            summary: "Implement technical SEO improvements to boost search visibility"
                .to_owned(),
            impact: "Increase organic traffic by 30-50%".to_owned(),
            current_state: Some(format!("Current SEO score: {}/100", scores.seo)),
            target_state: Some("Target SEO score: 85+/100".to_owned()),
        });
    }

    if scores.content < 80 {
        recommendations.push(Recommendation {
            id: "content-strategy".to_owned(),
            title: "Content Strategy Enhancement".to_owned(),
            priority: Priority::High,
            summary: "Develop comprehensive content that addresses user needs".to_owned(),
            impact: "Improve engagement and reduce bounce rate".to_owned(),
            current_state: Some(format!("Current content score: {}/100", scores.content)),
            target_state: Some("Target content score: 80+/100".to_owned()),
        });
    }

    if scores.mobile < 70 {
        recommendations.push(Recommendation {
            id: "mobile-optimization".to_owned(),
            title: "Mobile Experience Optimization".to_owned(),
            priority: Priority::Medium,
            summary: "Optimize for mobile users who make up 60%+ of traffic".to_owned(),
            impact: "Capture more mobile conversions".to_owned(),
            current_state: Some(format!("Current mobile score: {}/100", scores.mobile)),
            target_state: Some("Target mobile score: 90+/100".to_owned()),
        });
    }

    if scores.speed < 70 {
        recommendations.push(Recommendation {
            id: "speed-improvement".to_owned(),
            title: "Page Speed Improvement".to_owned(),
            priority: Priority::Medium,
            summary: "Reduce load times for better user experience".to_owned(),
            impact: "Every 1s improvement = 7% more conversions".to_owned(),
            current_state: Some(format!("Current speed score: {}/100", scores.speed)),
            target_state: Some("Target speed score: 85+/100".to_owned()),
        });
    }

    if scores.social < 60 {
        recommendations.push(Recommendation {
            id: "social-presence".to_owned(),
            title: "Build Social Presence".to_owned(),
            priority: Priority::Low,
            summary: "Strengthen social media integration and presence".to_owned(),
            impact: "Increase brand awareness and referral traffic".to_owned(),
            current_state: Some("Limited social integration".to_owned()),
            target_state: Some("Active social presence with website integration".to_owned()),
        });
    }

    recommendations
}

fn ninety_day_priorities(results: &AnalysisResults) -> Vec<String> {
    let mut priorities: Vec<String> = results
        .quick_wins
        .iter()
        .take(2)
        .map(|win| format!("Quick Win: {win}"))
        .collect();

    let mut ranked = results.scores.named();
    ranked.sort_by_key(|(_, score)| *score);
    for (area, score) in ranked.iter().take(3) {
        if *score < 70 {
            priorities.push(format!(
                "Improve {} score from {score} to 70+",
                area.to_uppercase()
            ));
        }
    }

    if priorities.len() < MAX_PRIORITIES {
        priorities.extend(
            [
                "Establish baseline metrics and tracking",
                "Create content calendar for next quarter",
                "Implement user feedback collection",
            ]
            .iter()
            .map(|s| (*s).to_owned()),
        );
    }

    priorities.truncate(MAX_PRIORITIES);
    priorities
}

/// Per-category action items with fixed due-date offsets from `today`.
fn build_action_items(
    strategy_id: Uuid,
    results: &AnalysisResults,
    today: NaiveDate,
) -> Vec<ActionItem> {
    let scores = results.scores;
    let due = |days: i64| Some(today + Duration::days(days));
    let mut items = Vec::new();

    if scores.seo < 80 {
        items.push(ActionItem::new(
            strategy_id,
            "Add missing meta descriptions",
            "Ensure all pages have unique, compelling meta descriptions",
            Priority::High,
            Effort::Small,
            "SEO",
            due(7),
        ));
        items.push(ActionItem::new(
            strategy_id,
            "Optimize image alt texts",
            "Add descriptive alt text to all images",
            Priority::Medium,
            Effort::Small,
            "SEO",
            due(14),
        ));
        items.push(ActionItem::new(
            strategy_id,
            "Implement structured data",
            "Add schema.org markup for better search results",
            Priority::Medium,
            Effort::Medium,
            "SEO",
            due(30),
        ));
    }

    if scores.content < 80 {
        items.push(ActionItem::new(
            strategy_id,
            "Expand homepage content",
            "Add more detailed content about services and value proposition",
            Priority::High,
            Effort::Medium,
            "Content",
            due(14),
        ));
        items.push(ActionItem::new(
            strategy_id,
            "Create blog content strategy",
            "Plan 4 blog posts for the next month",
            Priority::Medium,
            Effort::Large,
            "Content",
            due(21),
        ));
    }

    if scores.mobile < 70 {
        items.push(ActionItem::new(
            strategy_id,
            "Add viewport meta tag",
            "Ensure proper mobile viewport configuration",
            Priority::High,
            Effort::Small,
            "Mobile",
            due(3),
        ));
        items.push(ActionItem::new(
            strategy_id,
            "Test mobile responsiveness",
            "Review and fix mobile layout issues",
            Priority::Medium,
            Effort::Medium,
            "Mobile",
            due(14),
        ));
    }

    items
}
