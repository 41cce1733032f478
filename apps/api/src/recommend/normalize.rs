//! Result normalization — coerces the parsed, untyped model payload into
//! typed match records.
//!
//! The payload is read defensively field by field: anything absent or
//! wrong-typed degrades to the field default instead of failing the batch.
//! The only field that gets real scrutiny is `websiteUrl` — a value that is
//! not an absolute http(s) URL is replaced with a synthesized search-engine
//! query so every record the caller sees is clickable.

use serde_json::Value;
use url::Url;

use crate::models::matches::{CitationLink, ProgramMatch, RecommendationBatch, SupervisorMatch};
use crate::recommend::citations::dedup_citations;
use crate::recommend::ids::MatchIdGenerator;

/// Advice shown when the model supplied none.
pub const ADVICE_PLACEHOLDER: &str = "Strategic advice available upon request.";

const SEARCH_ENGINE_BASE: &str = "https://www.google.com/search";

/// Assembles the full batch from a parsed payload and the grounding links
/// the gateway collected. Missing `supervisors`/`programs` arrays are
/// treated as empty, never as an error.
pub fn normalize_batch(
    payload: &Value,
    grounding: Vec<CitationLink>,
    target_degree: &str,
    ids: &dyn MatchIdGenerator,
) -> RecommendationBatch {
    RecommendationBatch {
        supervisors: elements_of(payload, "supervisors")
            .iter()
            .map(|v| supervisor_from_value(v, ids))
            .collect(),
        programs: elements_of(payload, "programs")
            .iter()
            .map(|v| program_from_value(v, target_degree, ids))
            .collect(),
        general_advice: match payload.get("generalAdvice").and_then(Value::as_str) {
            Some(advice) if !advice.is_empty() => advice.to_string(),
            _ => ADVICE_PLACEHOLDER.to_string(),
        },
        grounding_links: dedup_citations(grounding),
    }
}

fn elements_of<'a>(payload: &'a Value, key: &str) -> &'a [Value] {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn supervisor_from_value(v: &Value, ids: &dyn MatchIdGenerator) -> SupervisorMatch {
    let name = str_field(v, "name");
    let university = str_field(v, "university");
    let department = str_field(v, "department");
    let website_url = website_or_fallback(v, || {
        supervisor_search_url(&name, &university, &department)
    });

    SupervisorMatch {
        id: ids.next_id(),
        research_area: str_field(v, "researchArea"),
        match_reason: str_field(v, "matchReason"),
        match_score: score_field(v),
        recent_paper: v
            .get("recentPaper")
            .and_then(Value::as_str)
            .map(str::to_string),
        website_url,
        name,
        university,
        department,
    }
}

fn program_from_value(v: &Value, target_degree: &str, ids: &dyn MatchIdGenerator) -> ProgramMatch {
    let university = str_field(v, "university");
    let program_name = str_field(v, "programName");
    let degree = match str_field(v, "degree") {
        d if d.is_empty() => target_degree.to_string(),
        d => d,
    };
    let website_url = website_or_fallback(v, || {
        program_search_url(&university, &program_name, &degree)
    });

    ProgramMatch {
        id: ids.next_id(),
        focus: str_field(v, "focus"),
        match_reason: str_field(v, "matchReason"),
        match_score: score_field(v),
        website_url,
        university,
        program_name,
        degree,
    }
}

fn str_field(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn score_field(v: &Value) -> u32 {
    v.get("matchScore").and_then(Value::as_u64).unwrap_or(0) as u32
}

/// The model-supplied URL verbatim if it carries an absolute http(s) scheme,
/// otherwise the caller's synthesized search query.
fn website_or_fallback(v: &Value, fallback: impl FnOnce() -> String) -> String {
    match v.get("websiteUrl").and_then(Value::as_str) {
        Some(u) if is_absolute_url(u) => u.to_string(),
        _ => fallback(),
    }
}

fn is_absolute_url(u: &str) -> bool {
    u.starts_with("http://") || u.starts_with("https://")
}

/// Search-engine query link for a supervisor whose profile URL was missing
/// or relative: name + university + department + "lab profile", encoded as
/// a single `q` parameter.
pub fn supervisor_search_url(name: &str, university: &str, department: &str) -> String {
    search_url(&format!("{name} {university} {department} lab profile"))
}

/// Search-engine query link for a program: university + program name +
/// degree + "admissions".
pub fn program_search_url(university: &str, program_name: &str, degree: &str) -> String {
    search_url(&format!("{university} {program_name} {degree} admissions"))
}

fn search_url(query: &str) -> String {
    Url::parse_with_params(SEARCH_ENGINE_BASE, &[("q", query)])
        .expect("search engine base URL is valid")
        .into()
}
