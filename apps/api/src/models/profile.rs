use std::fmt;

use serde::{Deserialize, Serialize};

/// Degree the student is applying for. Drives prompt wording and the
/// default `degree` on normalized program matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetDegree {
    Masters,
    PhD,
}

impl fmt::Display for TargetDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetDegree::Masters => write!(f, "Masters"),
            TargetDegree::PhD => write!(f, "PhD"),
        }
    }
}

/// A prospective student's self-reported academic profile.
///
/// Immutable input to a single pipeline run. All fields are free text as
/// entered by the student; the pipeline embeds them verbatim in the prompt
/// and never validates them beyond presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub name: String,
    pub major: String,
    pub degree_level: String,
    pub gpa: String,
    pub research_interests: String,
    pub target_degree: TargetDegree,
    pub target_locations: String,
    pub experience: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_degree_serializes_as_plain_string() {
        assert_eq!(
            serde_json::to_string(&TargetDegree::Masters).unwrap(),
            r#""Masters""#
        );
        assert_eq!(
            serde_json::to_string(&TargetDegree::PhD).unwrap(),
            r#""PhD""#
        );
    }

    #[test]
    fn test_profile_round_trips_camel_case() {
        let json = r#"{
            "name": "Ada Lovelace",
            "major": "Computer Science",
            "degreeLevel": "Bachelors",
            "gpa": "3.9/4.0",
            "researchInterests": "program analysis, compilers",
            "targetDegree": "PhD",
            "targetLocations": "UK, Netherlands",
            "experience": "2 years as research assistant"
        }"#;

        let profile: StudentProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.target_degree, TargetDegree::PhD);
        assert_eq!(profile.degree_level, "Bachelors");

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["degreeLevel"], "Bachelors");
        assert_eq!(back["targetDegree"], "PhD");
    }
}
