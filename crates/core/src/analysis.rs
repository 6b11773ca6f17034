use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ParseEnumError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether the background run has finished, successfully or not.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::str::FromStr for AnalysisStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseEnumError::new("analysis status", s)),
        }
    }
}

/// Website analysis request and its lifecycle state.
///
/// `progress` is monotone non-decreasing over the checkpoint sequence; the
/// row is the only observable contract for the background run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub id: Uuid,
    pub user_id: Uuid,
    pub website_url: String,
    pub status: AnalysisStatus,
    pub progress: i32,
    pub include_competitors: bool,
    pub include_social: bool,
    pub results: Option<AnalysisResults>,
    pub error_message: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Analysis {
    #[must_use]
    pub fn new(
        user_id: Uuid,
        website_url: String,
        include_competitors: bool,
        include_social: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            website_url,
            status: AnalysisStatus::Pending,
            progress: 0,
            include_competitors,
            include_social,
            results: None,
            error_message: None,
            started_at: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }
}

/// Severity of a detected SEO issue, driving the score deduction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Points deducted from the SEO score per issue of this severity.
    #[must_use]
    pub const fn deduction(self) -> i32 {
        match self {
            Self::High => 20,
            Self::Medium => 10,
            Self::Low => 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeoIssue {
    pub severity: Severity,
    pub issue: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryScores {
    pub seo: i32,
    pub content: i32,
    pub mobile: i32,
    pub speed: i32,
    pub social: i32,
}

impl CategoryScores {
    /// Integer average of the five category scores.
    #[must_use]
    pub const fn overall(self) -> i32 {
        (self.seo + self.content + self.mobile + self.speed + self.social) / 5
    }

    /// Category name / score pairs, in a fixed order.
    #[must_use]
    pub fn named(self) -> [(&'static str, i32); 5] {
        [
            ("seo", self.seo),
            ("content", self.content),
            ("mobile", self.mobile),
            ("speed", self.speed),
            ("social", self.social),
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeadingStructure {
    pub h1_count: usize,
    pub h2_count: usize,
}

/// Content-quality findings for the fetched page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentReport {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub word_count: usize,
    pub heading_structure: HeadingStructure,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageOptimization {
    pub total: usize,
    pub with_alt: usize,
    /// Percentage of images carrying alt text; 100 when there are no images.
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkStructure {
    pub internal: usize,
    pub external: usize,
}

/// Technical SEO findings for the fetched page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeoReport {
    pub issues: Vec<SeoIssue>,
    pub image_optimization: ImageOptimization,
    pub mobile_ready: bool,
    pub has_canonical: bool,
    pub link_structure: LinkStructure,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Competitor {
    pub name: String,
    pub url: String,
    pub strengths: Vec<String>,
    pub seo_score: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SocialPresence {
    pub platforms_found: Vec<String>,
    pub activity_level: String,
    pub recommendations: Vec<String>,
}

/// Completed analysis document, stored as JSONB but fully typed in Rust.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResults {
    pub overall_score: i32,
    pub scores: CategoryScores,
    pub content_analysis: ContentReport,
    pub seo_analysis: SeoReport,
    pub competitors: Vec<Competitor>,
    pub social_presence: Option<SocialPresence>,
    pub quick_wins: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overall_score_is_integer_mean() {
        let scores =
            CategoryScores { seo: 90, content: 85, mobile: 80, speed: 70, social: 60 };
        assert_eq!(scores.overall(), 77);
    }

    #[test]
    fn severity_deductions() {
        assert_eq!(Severity::High.deduction(), 20);
        assert_eq!(Severity::Medium.deduction(), 10);
        assert_eq!(Severity::Low.deduction(), 5);
    }

    #[test]
    fn terminal_statuses() {
        assert!(AnalysisStatus::Completed.is_terminal());
        assert!(AnalysisStatus::Failed.is_terminal());
        assert!(!AnalysisStatus::Pending.is_terminal());
        assert!(!AnalysisStatus::Processing.is_terminal());
    }
}
