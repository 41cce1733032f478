use serde::{Deserialize, Serialize};

/// A supervisor recommended by the model, after normalization.
///
/// `id` is assigned locally at normalization time and is unique within a
/// session; it never comes from the model. `website_url` is always an
/// absolute URL after normalization (model-supplied or a synthesized
/// search query — see `recommend::normalize`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorMatch {
    pub id: String,
    pub name: String,
    pub university: String,
    pub department: String,
    pub research_area: String,
    pub match_reason: String,
    /// Model-estimated fit, 0-100. Not independently verified.
    pub match_score: u32,
    pub website_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_paper: Option<String>,
}

/// A graduate program recommended by the model, after normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramMatch {
    pub id: String,
    pub university: String,
    pub program_name: String,
    pub degree: String,
    pub focus: String,
    pub match_reason: String,
    pub match_score: u32,
    pub website_url: String,
}

/// A source link supplied by the model's search tool.
///
/// Within any accumulated collection, `uri` is unique and the first-seen
/// title wins (see `recommend::citations`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationLink {
    pub title: String,
    pub uri: String,
}

/// Normalized output of one pipeline run. Owned by the caller; batches are
/// accumulated by the session layer across "load more" rounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationBatch {
    pub supervisors: Vec<SupervisorMatch>,
    pub programs: Vec<ProgramMatch>,
    pub general_advice: String,
    pub grounding_links: Vec<CitationLink>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supervisor_match_omits_absent_recent_paper() {
        let m = SupervisorMatch {
            id: "abc123def".to_string(),
            name: "Dr. Grace Hopper".to_string(),
            university: "Yale University".to_string(),
            department: "Computer Science".to_string(),
            research_area: "Compilers".to_string(),
            match_reason: "Pioneering compiler work".to_string(),
            match_score: 95,
            website_url: "https://example.edu/hopper".to_string(),
            recent_paper: None,
        };

        let value = serde_json::to_value(&m).unwrap();
        assert!(value.get("recentPaper").is_none());
        assert_eq!(value["websiteUrl"], "https://example.edu/hopper");
        assert_eq!(value["matchScore"], 95);
    }

    #[test]
    fn test_batch_serializes_camel_case() {
        let batch = RecommendationBatch {
            supervisors: vec![],
            programs: vec![],
            general_advice: "Go broad.".to_string(),
            grounding_links: vec![CitationLink {
                title: "Source".to_string(),
                uri: "https://example.org".to_string(),
            }],
        };

        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(value["generalAdvice"], "Go broad.");
        assert_eq!(value["groundingLinks"][0]["uri"], "https://example.org");
    }
}
