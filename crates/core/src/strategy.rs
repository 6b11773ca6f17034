use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ParseEnumError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StrategyStatus {
    Generating,
    Ready,
    Failed,
}

impl StrategyStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generating => "generating",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl std::str::FromStr for StrategyStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generating" => Ok(Self::Generating),
            "ready" => Ok(Self::Ready),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseEnumError::new("strategy status", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ParseEnumError::new("priority", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Small,
    Medium,
    Large,
}

impl Effort {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl std::str::FromStr for Effort {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(ParseEnumError::new("effort", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Pending,
    InProgress,
    Completed,
}

impl ActionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl std::str::FromStr for ActionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseEnumError::new("action status", s)),
        }
    }
}

/// Single strategic recommendation inside a strategy document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub priority: Priority,
    pub summary: String,
    pub impact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_state: Option<String>,
}

/// Growth strategy document generated from an analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    pub id: Uuid,
    pub user_id: Uuid,
    pub analysis_id: Option<Uuid>,
    pub title: Option<String>,
    pub status: StrategyStatus,
    pub executive_summary: Option<String>,
    pub vision_statement: Option<String>,
    pub key_strengths: Vec<String>,
    pub critical_gaps: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub ninety_day_priorities: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Strategy {
    #[must_use]
    pub fn new(user_id: Uuid, analysis_id: Option<Uuid>, title: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            analysis_id,
            title,
            status: StrategyStatus::Generating,
            executive_summary: None,
            vision_statement: None,
            key_strengths: Vec::new(),
            critical_gaps: Vec::new(),
            recommendations: Vec::new(),
            ninety_day_priorities: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Discrete, assignable task derived from a strategy recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionItem {
    pub id: Uuid,
    pub strategy_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub effort: Effort,
    pub category: Option<String>,
    pub status: ActionStatus,
    pub due_date: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ActionItem {
    #[must_use]
    pub fn new(
        strategy_id: Uuid,
        title: &str,
        description: &str,
        priority: Priority,
        effort: Effort,
        category: &str,
        due_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            strategy_id,
            title: title.to_owned(),
            description: Some(description.to_owned()),
            priority,
            effort,
            category: Some(category.to_owned()),
            status: ActionStatus::Pending,
            due_date,
            completed_at: None,
            notes: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_status_round_trips() {
        for status in [ActionStatus::Pending, ActionStatus::InProgress, ActionStatus::Completed] {
            assert_eq!(status.as_str().parse::<ActionStatus>().unwrap(), status);
        }
    }

    #[test]
    fn new_strategy_is_generating() {
        let strategy = Strategy::new(Uuid::new_v4(), None, None);
        assert_eq!(strategy.status, StrategyStatus::Generating);
        assert!(strategy.recommendations.is_empty());
    }
}
