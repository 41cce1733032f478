//! Axum route handlers for the session API: open a session with an initial
//! search, grow it with "load more", toggle likes, discard it.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::matches::{CitationLink, ProgramMatch, SupervisorMatch};
use crate::models::profile::StudentProfile;
use crate::recommend::recommender::fetch_recommendations;
use crate::session::RecommendationSession;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub profile: StudentProfile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLikeRequest {
    pub kind: LikeKind,
    pub match_id: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeKind {
    Supervisor,
    Program,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLikeResponse {
    pub liked: bool,
    pub saved_count: usize,
}

/// Snapshot of a session as returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub profile: StudentProfile,
    pub supervisors: Vec<SupervisorMatch>,
    pub programs: Vec<ProgramMatch>,
    pub general_advice: String,
    pub grounding_links: Vec<CitationLink>,
    pub liked_supervisor_ids: Vec<String>,
    pub liked_program_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&RecommendationSession> for SessionView {
    fn from(session: &RecommendationSession) -> Self {
        let mut liked_supervisor_ids: Vec<String> =
            session.liked_supervisor_ids.iter().cloned().collect();
        liked_supervisor_ids.sort();
        let mut liked_program_ids: Vec<String> =
            session.liked_program_ids.iter().cloned().collect();
        liked_program_ids.sort();

        SessionView {
            id: session.id,
            profile: session.profile.clone(),
            supervisors: session.supervisors.clone(),
            programs: session.programs.clone(),
            general_advice: session.general_advice.clone(),
            grounding_links: session.grounding_links.clone(),
            liked_supervisor_ids,
            liked_program_ids,
            created_at: session.created_at,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Opens a session for a profile and runs the initial search before
/// returning. A pipeline failure here means no session is created at all.
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<SessionView>, AppError> {
    let batch = fetch_recommendations(
        state.model.as_ref(),
        state.ids.as_ref(),
        &request.profile,
        &[],
        &[],
    )
    .await?;

    let mut session = RecommendationSession::new(request.profile);
    session.absorb_initial(batch);
    info!("Opened session {} for {}", session.id, session.profile.name);

    let view = SessionView::from(&session);
    state.sessions.insert(session);
    Ok(Json(view))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    state
        .sessions
        .with_session(session_id, |session| Json(SessionView::from(&*session)))
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
}

/// POST /api/v1/sessions/:id/load-more
///
/// Replays the pipeline with exclusion lists built from everything the
/// session has already seen, then appends the new batch. Returns 409 if a
/// load-more for this session is already in flight.
pub async fn handle_load_more(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    // Claim the busy flag and snapshot what the pipeline needs, all under
    // one short lock.
    let claim = state
        .sessions
        .with_session(session_id, |session| {
            if !session.begin_load_more() {
                return None;
            }
            Some((session.profile.clone(), session.exclusion_lists()))
        })
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    let (profile, (exclude_supervisors, exclude_programs)) = claim.ok_or_else(|| {
        AppError::Conflict("A load-more request is already in progress for this session".to_string())
    })?;

    let result = fetch_recommendations(
        state.model.as_ref(),
        state.ids.as_ref(),
        &profile,
        &exclude_supervisors,
        &exclude_programs,
    )
    .await;

    // Whatever happened, the flag comes down; on success the batch lands in
    // the same critical section.
    let view = state.sessions.with_session(session_id, |session| {
        session.finish_load_more();
        match result {
            Ok(batch) => {
                session.absorb_more(batch);
                Ok(Json(SessionView::from(&*session)))
            }
            Err(e) => Err(e),
        }
    });

    match view {
        Some(outcome) => outcome,
        // Session was deleted while the call was outstanding.
        None => Err(AppError::NotFound(format!("Session {session_id} not found"))),
    }
}

/// POST /api/v1/sessions/:id/likes
pub async fn handle_toggle_like(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ToggleLikeRequest>,
) -> Result<Json<ToggleLikeResponse>, AppError> {
    state
        .sessions
        .with_session(session_id, |session| {
            let liked = match request.kind {
                LikeKind::Supervisor => session.toggle_like_supervisor(&request.match_id),
                LikeKind::Program => session.toggle_like_program(&request.match_id),
            };
            Json(ToggleLikeResponse {
                liked,
                saved_count: session.saved_supervisors().len() + session.saved_programs().len(),
            })
        })
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    if state.sessions.remove(session_id) {
        Ok(Json(serde_json::json!({ "deleted": true })))
    } else {
        Err(AppError::NotFound(format!("Session {session_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_like_request_accepts_both_kinds() {
        let supervisor: ToggleLikeRequest =
            serde_json::from_str(r#"{"kind": "supervisor", "matchId": "abc"}"#).unwrap();
        assert!(matches!(supervisor.kind, LikeKind::Supervisor));

        let program: ToggleLikeRequest =
            serde_json::from_str(r#"{"kind": "program", "matchId": "def"}"#).unwrap();
        assert!(matches!(program.kind, LikeKind::Program));
    }

    #[test]
    fn test_session_view_sorts_liked_ids() {
        use crate::models::profile::TargetDegree;

        let mut session = RecommendationSession::new(StudentProfile {
            name: "Ada".to_string(),
            major: "CS".to_string(),
            degree_level: "Bachelors".to_string(),
            gpa: "3.9".to_string(),
            research_interests: "compilers".to_string(),
            target_degree: TargetDegree::PhD,
            target_locations: "UK".to_string(),
            experience: "RA".to_string(),
        });
        session.toggle_like_supervisor("zz");
        session.toggle_like_supervisor("aa");

        let view = SessionView::from(&session);
        assert_eq!(view.liked_supervisor_ids, vec!["aa", "zz"]);
    }
}
