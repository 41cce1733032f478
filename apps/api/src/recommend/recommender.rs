//! Recommendation orchestration — the full pipeline for one search.
//!
//! Flow: build prompt → one grounded model call → extract/repair JSON →
//! normalize into typed matches → dedup citations.
//!
//! The pipeline is strictly sequential with a single suspension point (the
//! model call) and holds no state across invocations; accumulation across
//! "load more" rounds lives in the session layer.

use tracing::{error, info};

use crate::errors::AppError;
use crate::llm_client::{GenerateOptions, GenerativeModel};
use crate::models::matches::RecommendationBatch;
use crate::models::profile::StudentProfile;
use crate::recommend::extract::parse_model_payload;
use crate::recommend::ids::MatchIdGenerator;
use crate::recommend::normalize::normalize_batch;
use crate::recommend::prompts::{
    build_email_prompt, build_recommendation_prompt, RECOMMENDATION_TEMPERATURE,
};

/// Returned when the email call succeeds but the model sends back nothing.
pub const EMAIL_EMPTY_FALLBACK: &str = "Could not generate email.";
/// Returned when the email call fails outright. Never surfaced as an error.
pub const EMAIL_ERROR_FALLBACK: &str = "Error generating email draft.";

/// Runs one recommendation search for the given profile.
///
/// `exclude_supervisors` / `exclude_programs` carry names from earlier
/// rounds so the model finds different candidates. Transport and service
/// failures surface as the single opaque `FetchFailed`; a reply that cannot
/// be parsed surfaces as the distinct `InvalidFormat`. An exactly-empty
/// reply is neither — it normalizes to an all-empty batch.
pub async fn fetch_recommendations(
    model: &dyn GenerativeModel,
    ids: &dyn MatchIdGenerator,
    profile: &StudentProfile,
    exclude_supervisors: &[String],
    exclude_programs: &[String],
) -> Result<RecommendationBatch, AppError> {
    let prompt = build_recommendation_prompt(profile, exclude_supervisors, exclude_programs);

    let reply = model
        .generate(
            &prompt,
            GenerateOptions {
                web_search: true,
                temperature: Some(RECOMMENDATION_TEMPERATURE),
            },
        )
        .await
        .map_err(|e| {
            error!("Recommendation fetch failed: {e}");
            AppError::FetchFailed
        })?;

    let payload =
        parse_model_payload(&reply.text).map_err(|e| AppError::InvalidFormat(e.to_string()))?;

    let batch = normalize_batch(
        &payload,
        reply.citations,
        &profile.target_degree.to_string(),
        ids,
    );

    info!(
        "Recommendation search returned {} supervisors, {} programs, {} sources",
        batch.supervisors.len(),
        batch.programs.len(),
        batch.grounding_links.len()
    );

    Ok(batch)
}

/// Drafts a cold outreach email to a prospective supervisor.
///
/// Asymmetric error policy vs the main pipeline: this never fails. A failed
/// or empty call resolves to a fixed placeholder string the caller can show
/// as-is.
pub async fn draft_outreach_email(
    model: &dyn GenerativeModel,
    professor_name: &str,
    university: &str,
    topic: &str,
    profile: &StudentProfile,
) -> String {
    let prompt = build_email_prompt(professor_name, university, topic, profile);

    match model.generate(&prompt, GenerateOptions::default()).await {
        Ok(reply) if !reply.text.is_empty() => reply.text,
        Ok(_) => EMAIL_EMPTY_FALLBACK.to_string(),
        Err(e) => {
            error!("Email draft generation failed: {e}");
            EMAIL_ERROR_FALLBACK.to_string()
        }
    }
}
