// Session bookkeeping: accumulated results, liked items, and the exclusion
// lists that drive "load more". Pure state — the pipeline itself lives in
// recommend and holds nothing between calls.

pub mod handlers;
pub mod store;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::matches::{CitationLink, ProgramMatch, RecommendationBatch, SupervisorMatch};
use crate::models::profile::StudentProfile;
use crate::recommend::citations::dedup_citations;

/// One student's search session: the profile it was opened with, everything
/// found so far, and which results the student has liked.
///
/// Lives in memory only and dies with the process. `load_more_pending` is
/// the busy flag that rejects a second "load more" while one is in flight —
/// concurrent load-more for the same session is disallowed by contract, not
/// handled with locking.
#[derive(Debug, Clone)]
pub struct RecommendationSession {
    pub id: Uuid,
    pub profile: StudentProfile,
    pub supervisors: Vec<SupervisorMatch>,
    pub programs: Vec<ProgramMatch>,
    pub general_advice: String,
    pub grounding_links: Vec<CitationLink>,
    pub liked_supervisor_ids: HashSet<String>,
    pub liked_program_ids: HashSet<String>,
    pub created_at: DateTime<Utc>,
    load_more_pending: bool,
}

impl RecommendationSession {
    pub fn new(profile: StudentProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile,
            supervisors: Vec::new(),
            programs: Vec::new(),
            general_advice: String::new(),
            grounding_links: Vec::new(),
            liked_supervisor_ids: HashSet::new(),
            liked_program_ids: HashSet::new(),
            created_at: Utc::now(),
            load_more_pending: false,
        }
    }

    /// Installs the first batch, replacing any prior state.
    pub fn absorb_initial(&mut self, batch: RecommendationBatch) {
        self.supervisors = batch.supervisors;
        self.programs = batch.programs;
        self.general_advice = batch.general_advice;
        self.grounding_links = batch.grounding_links;
    }

    /// Appends a "load more" batch. The first batch's advice is kept; the
    /// citation lists are re-deduplicated over the concatenation so URIs
    /// stay unique with their first-seen titles.
    pub fn absorb_more(&mut self, batch: RecommendationBatch) {
        self.supervisors.extend(batch.supervisors);
        self.programs.extend(batch.programs);

        let merged = self
            .grounding_links
            .drain(..)
            .chain(batch.grounding_links)
            .collect::<Vec<_>>();
        self.grounding_links = dedup_citations(merged);
    }

    /// Names already seen this session, for the next round's prompt:
    /// supervisor names and program names.
    pub fn exclusion_lists(&self) -> (Vec<String>, Vec<String>) {
        (
            self.supervisors.iter().map(|s| s.name.clone()).collect(),
            self.programs.iter().map(|p| p.program_name.clone()).collect(),
        )
    }

    /// Marks a load-more as in flight. Returns false (and changes nothing)
    /// if one is already outstanding.
    pub fn begin_load_more(&mut self) -> bool {
        if self.load_more_pending {
            return false;
        }
        self.load_more_pending = true;
        true
    }

    pub fn finish_load_more(&mut self) {
        self.load_more_pending = false;
    }

    /// Toggles membership of `id` in the liked-supervisors set; returns the
    /// new liked state.
    pub fn toggle_like_supervisor(&mut self, id: &str) -> bool {
        toggle(&mut self.liked_supervisor_ids, id)
    }

    pub fn toggle_like_program(&mut self, id: &str) -> bool {
        toggle(&mut self.liked_program_ids, id)
    }

    pub fn saved_supervisors(&self) -> Vec<&SupervisorMatch> {
        self.supervisors
            .iter()
            .filter(|s| self.liked_supervisor_ids.contains(&s.id))
            .collect()
    }

    pub fn saved_programs(&self) -> Vec<&ProgramMatch> {
        self.programs
            .iter()
            .filter(|p| self.liked_program_ids.contains(&p.id))
            .collect()
    }
}

fn toggle(set: &mut HashSet<String>, id: &str) -> bool {
    if set.remove(id) {
        false
    } else {
        set.insert(id.to_string());
        true
    }
}
