//! Axum route handlers for the stateless recommendation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::matches::RecommendationBatch;
use crate::models::profile::StudentProfile;
use crate::recommend::recommender::{draft_outreach_email, fetch_recommendations};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub profile: StudentProfile,
    #[serde(default)]
    pub exclude_supervisors: Vec<String>,
    #[serde(default)]
    pub exclude_programs: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailDraftRequest {
    pub professor_name: String,
    pub university: String,
    pub topic: String,
    pub profile: StudentProfile,
}

#[derive(Debug, Serialize)]
pub struct EmailDraftResponse {
    pub draft: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/recommendations
///
/// One full pipeline run: grounded search, JSON extraction, normalization.
/// Exclusion lists let a caller doing its own bookkeeping ask for more
/// results without repeats.
pub async fn handle_fetch_recommendations(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationBatch>, AppError> {
    let batch = fetch_recommendations(
        state.model.as_ref(),
        state.ids.as_ref(),
        &request.profile,
        &request.exclude_supervisors,
        &request.exclude_programs,
    )
    .await?;

    Ok(Json(batch))
}

/// POST /api/v1/recommendations/email-draft
///
/// Drafts a cold outreach email. Always 200 — a failed model call resolves
/// to a placeholder body, never an error response.
pub async fn handle_email_draft(
    State(state): State<AppState>,
    Json(request): Json<EmailDraftRequest>,
) -> Json<EmailDraftResponse> {
    let draft = draft_outreach_email(
        state.model.as_ref(),
        &request.professor_name,
        &request.university,
        &request.topic,
        &request.profile,
    )
    .await;

    Json(EmailDraftResponse { draft })
}
