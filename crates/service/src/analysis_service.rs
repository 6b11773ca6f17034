//! Website analysis: request handling and the background worker.

use std::sync::Arc;

use quento_analyzer::{
    analyze_content, analyze_seo, build_fetch_client, calculate_scores, fetch_page,
    generate_quick_wins, placeholder_competitors, placeholder_social, validate_website_url,
};
use quento_core::{Analysis, AnalysisResults, AnalysisStatus};
use quento_storage::traits::AnalysisStore;
use quento_storage::PgStorage;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::jobs::{Job, JobQueue};

/// Pipeline step names surfaced by the status endpoint.
const STEPS: [&str; 6] = [
    "Fetching website",
    "Analyzing content",
    "Checking SEO",
    "Analyzing competitors",
    "Checking social presence",
    "Generating report",
];

/// Poll-friendly view of a running analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisProgress {
    pub status: AnalysisStatus,
    pub progress: i32,
    pub current_step: String,
    pub steps_completed: Vec<String>,
    pub steps_remaining: Vec<String>,
}

pub struct AnalysisService {
    storage: Arc<PgStorage>,
    jobs: JobQueue,
}

impl AnalysisService {
    #[must_use]
    pub fn new(storage: Arc<PgStorage>, jobs: JobQueue) -> Self {
        Self { storage, jobs }
    }

    /// Validate the URL, insert a pending row, and dispatch the background
    /// job. The caller polls for status.
    pub async fn create_analysis(
        &self,
        user_id: Uuid,
        website_url: &str,
        include_competitors: bool,
        include_social: bool,
    ) -> Result<Analysis, ServiceError> {
        let url = validate_website_url(website_url)?;

        let analysis =
            Analysis::new(user_id, url.to_string(), include_competitors, include_social);
        self.storage.create_analysis(&analysis).await?;
        self.jobs.enqueue(Job::RunAnalysis(analysis.id));
        tracing::info!(analysis_id = %analysis.id, url = %url, "analysis dispatched");

        Ok(analysis)
    }

    pub async fn get_analysis(&self, id: Uuid, user_id: Uuid) -> Result<Analysis, ServiceError> {
        self.storage
            .get_analysis(id, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("analysis", id))
    }

    pub async fn list_analyses(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Analysis>, usize), ServiceError> {
        let page = self.storage.list_analyses(user_id, limit, offset).await?;
        let total = self.storage.count_analyses(user_id).await?;
        Ok((page, total))
    }

    pub async fn get_status(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<AnalysisProgress, ServiceError> {
        let analysis = self.get_analysis(id, user_id).await?;
        Ok(progress_view(analysis.status, analysis.progress))
    }
}

/// Map a progress value onto the fixed step list.
fn progress_view(status: AnalysisStatus, progress: i32) -> AnalysisProgress {
    let step_index = usize::try_from((progress / 20).clamp(0, 5)).unwrap_or(0);
    AnalysisProgress {
        status,
        progress,
        current_step: STEPS[step_index.min(STEPS.len() - 1)].to_owned(),
        steps_completed: STEPS[..step_index].iter().map(|s| (*s).to_owned()).collect(),
        steps_remaining: STEPS[(step_index + 1).min(STEPS.len())..]
            .iter()
            .map(|s| (*s).to_owned())
            .collect(),
    }
}

/// Background worker entry point. Single pass, non-resumable: any failure
/// marks the row `failed` with the error text stored verbatim; no retry.
pub(crate) async fn run_analysis(storage: &PgStorage, analysis_id: Uuid) {
    let analysis = match storage.get_analysis_unscoped(analysis_id).await {
        Ok(Some(analysis)) => analysis,
        Ok(None) => {
            tracing::warn!(%analysis_id, "analysis row disappeared before worker ran");
            return;
        },
        Err(err) => {
            tracing::error!(%analysis_id, %err, "failed to load analysis");
            return;
        },
    };

    if let Err(err) = run_analysis_stages(storage, &analysis).await {
        tracing::warn!(%analysis_id, %err, "analysis failed");
        if let Err(db_err) = storage.fail_analysis(analysis_id, &err).await {
            tracing::error!(%analysis_id, %db_err, "could not record analysis failure");
        }
    }
}

/// The staged pipeline with progress checkpoints committed after each stage.
/// Errors are returned as display strings because the row stores them
/// verbatim.
async fn run_analysis_stages(storage: &PgStorage, analysis: &Analysis) -> Result<(), String> {
    let id = analysis.id;
    let stage = |e: ServiceError| e.to_string();

    storage.mark_analysis_processing(id).await.map_err(|e| e.to_string())?;
    storage.set_analysis_progress(id, 10).await.map_err(|e| e.to_string())?;

    let url = validate_website_url(&analysis.website_url).map_err(|e| stage(e.into()))?;
    let client = build_fetch_client().map_err(|e| stage(e.into()))?;
    let snapshot = fetch_page(&client, &url).await.map_err(|e| stage(e.into()))?;
    storage.set_analysis_progress(id, 20).await.map_err(|e| e.to_string())?;

    let content = analyze_content(&snapshot);
    storage.set_analysis_progress(id, 40).await.map_err(|e| e.to_string())?;

    let seo = analyze_seo(&snapshot);
    storage.set_analysis_progress(id, 60).await.map_err(|e| e.to_string())?;

    let competitors =
        if analysis.include_competitors { placeholder_competitors() } else { Vec::new() };
    storage.set_analysis_progress(id, 80).await.map_err(|e| e.to_string())?;

    let social = analysis.include_social.then(placeholder_social);
    storage.set_analysis_progress(id, 90).await.map_err(|e| e.to_string())?;

    let scores = calculate_scores(&content, &seo, social.as_ref());
    let quick_wins = generate_quick_wins(&seo);
    let results = AnalysisResults {
        overall_score: scores.overall(),
        scores,
        content_analysis: content,
        seo_analysis: seo,
        competitors,
        social_presence: social,
        quick_wins,
    };

    storage.complete_analysis(id, &results).await.map_err(|e| e.to_string())?;
    tracing::info!(analysis_id = %id, overall = results.overall_score, "analysis completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quento_core::ANALYSIS_PROGRESS_CHECKPOINTS;

    #[test]
    fn checkpoint_sequence_is_strictly_increasing_to_100() {
        let mut prev = 0;
        for checkpoint in ANALYSIS_PROGRESS_CHECKPOINTS {
            assert!(checkpoint > prev);
            prev = checkpoint;
        }
        assert_eq!(prev, 100);
    }

    #[test]
    fn progress_maps_to_steps() {
        let view = progress_view(AnalysisStatus::Processing, 0);
        assert_eq!(view.current_step, "Fetching website");
        assert!(view.steps_completed.is_empty());
        assert_eq!(view.steps_remaining.len(), 5);

        let view = progress_view(AnalysisStatus::Processing, 60);
        assert_eq!(view.current_step, "Analyzing competitors");
        assert_eq!(view.steps_completed.len(), 3);

        let view = progress_view(AnalysisStatus::Completed, 100);
        assert_eq!(view.current_step, "Generating report");
        assert!(view.steps_remaining.is_empty());
    }

    #[test]
    fn progress_view_tolerates_intermediate_checkpoints() {
        // 90 sits between step boundaries; it must not panic or skip ahead.
        let view = progress_view(AnalysisStatus::Processing, 90);
        assert_eq!(view.current_step, "Checking social presence");
    }
}
