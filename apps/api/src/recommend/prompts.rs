//! Prompt construction for the recommendation and email-draft calls.
//!
//! Pure string building — deterministic given the same profile and exclusion
//! lists. The JSON shape requested here must stay in lockstep with what
//! `normalize` reads back out.

use crate::models::profile::StudentProfile;

/// Temperature for the recommendation search call — low, favoring factual,
/// reproducible output over creative phrasing.
pub const RECOMMENDATION_TEMPERATURE: f32 = 0.3;

/// Recommendation prompt skeleton. Placeholders are filled by
/// `build_recommendation_prompt`; `{exclude_supervisors}` and
/// `{exclude_programs}` collapse to empty lines when there is nothing to
/// exclude.
const RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"Act as a rigorous academic consultant.

Student Profile:
- Name: {student_name}
- Target Degree: {target_degree}
- Major/Background: {major} ({degree_level}) - GPA: {gpa}
- Research Interests: {research_interests}
- Experience: {experience}
- Preferred Locations: {target_locations}

Task:
1. Search for 10 REAL, currently active professors/supervisors who match this student's research interests. Prioritize those with active labs.
2. Search for 10 suitable Graduate or PhD PROGRAMS.
3. Calculate a "Match Score" (0-100) for each based on keyword overlap and specialization fit.
4. Find the DIRECT URL for the professor's Lab page or Faculty Profile (not just the university homepage).
5. Find the DIRECT URL for the specific Program or Department page.

Constraint Checklist & Confidence Score:
1. {exclude_supervisors}
2. {exclude_programs}
3. Ensure strictly valid JSON.

Output Format:
You MUST output a valid JSON object strictly adhering to this structure inside a markdown code block.

CRITICAL JSON RULES:
1. Do NOT include any comments.
2. Escape all double quotes inside string values.
3. Do not use unescaped newlines.

{
  "supervisors": [
    {
      "name": "Name",
      "university": "University",
      "department": "Department",
      "researchArea": "Specific focus",
      "matchReason": "Brief explanation of fit",
      "matchScore": 95,
      "websiteUrl": "https://...",
      "recentPaper": "Recent paper title (optional)"
    }
  ],
  "programs": [
    {
      "university": "University",
      "programName": "Program Name",
      "degree": "{target_degree}",
      "focus": "Lab or Track Name",
      "matchReason": "Why this program fits",
      "matchScore": 90,
      "websiteUrl": "https://..."
    }
  ],
  "generalAdvice": "Strategic advice paragraph."
}"#;

/// Outreach email prompt template.
const EMAIL_PROMPT_TEMPLATE: &str = r#"Write a polite, professional cold email from a student to a potential supervisor.

Student: {student_name}, {major}
Professor: {professor_name}, {university}
Research Interest: {topic}

Goal: Inquire about {target_degree} opportunities.
Tone: Academic, humble, concise, professional.
Length: Short (under 200 words).

Output only the email body text."#;

/// Builds the instruction string for one recommendation search.
///
/// Every profile field is embedded verbatim. Exclusion clauses appear only
/// when the corresponding list is non-empty, naming each already-seen entry
/// so the model finds different ones.
pub fn build_recommendation_prompt(
    profile: &StudentProfile,
    exclude_supervisors: &[String],
    exclude_programs: &[String],
) -> String {
    let exclude_supervisors_clause = if exclude_supervisors.is_empty() {
        String::new()
    } else {
        format!(
            "Do NOT include these supervisors (you already found them): {}. Find DIFFERENT ones.",
            exclude_supervisors.join(", ")
        )
    };

    let exclude_programs_clause = if exclude_programs.is_empty() {
        String::new()
    } else {
        format!(
            "Do NOT include these programs: {}.",
            exclude_programs.join(", ")
        )
    };

    RECOMMENDATION_PROMPT_TEMPLATE
        .replace("{student_name}", &profile.name)
        .replace("{target_degree}", &profile.target_degree.to_string())
        .replace("{major}", &profile.major)
        .replace("{degree_level}", &profile.degree_level)
        .replace("{gpa}", &profile.gpa)
        .replace("{research_interests}", &profile.research_interests)
        .replace("{experience}", &profile.experience)
        .replace("{target_locations}", &profile.target_locations)
        .replace("{exclude_supervisors}", &exclude_supervisors_clause)
        .replace("{exclude_programs}", &exclude_programs_clause)
}

/// Builds the instruction string for a single outreach email draft.
pub fn build_email_prompt(
    professor_name: &str,
    university: &str,
    topic: &str,
    profile: &StudentProfile,
) -> String {
    EMAIL_PROMPT_TEMPLATE
        .replace("{student_name}", &profile.name)
        .replace("{major}", &profile.major)
        .replace("{professor_name}", professor_name)
        .replace("{university}", university)
        .replace("{topic}", topic)
        .replace("{target_degree}", &profile.target_degree.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::TargetDegree;

    fn sample_profile() -> StudentProfile {
        StudentProfile {
            name: "Ada Lovelace".to_string(),
            major: "Computer Science".to_string(),
            degree_level: "Bachelors".to_string(),
            gpa: "3.9/4.0".to_string(),
            research_interests: "program analysis, symbolic execution".to_string(),
            target_degree: TargetDegree::PhD,
            target_locations: "UK, Netherlands".to_string(),
            experience: "2 years as a research assistant".to_string(),
        }
    }

    #[test]
    fn test_prompt_embeds_every_profile_field_verbatim() {
        let prompt = build_recommendation_prompt(&sample_profile(), &[], &[]);

        assert!(prompt.contains("Ada Lovelace"));
        assert!(prompt.contains("Computer Science"));
        assert!(prompt.contains("Bachelors"));
        assert!(prompt.contains("3.9/4.0"));
        assert!(prompt.contains("program analysis, symbolic execution"));
        assert!(prompt.contains("2 years as a research assistant"));
        assert!(prompt.contains("UK, Netherlands"));
        assert!(prompt.contains("Target Degree: PhD"));
    }

    #[test]
    fn test_prompt_requests_ten_of_each_and_the_json_shape() {
        let prompt = build_recommendation_prompt(&sample_profile(), &[], &[]);

        assert!(prompt.contains("Search for 10 REAL, currently active professors"));
        assert!(prompt.contains("Search for 10 suitable Graduate or PhD PROGRAMS"));
        for key in [
            "\"supervisors\"",
            "\"programs\"",
            "\"generalAdvice\"",
            "\"websiteUrl\"",
            "\"matchScore\"",
            "\"recentPaper\"",
            "\"programName\"",
        ] {
            assert!(prompt.contains(key), "prompt missing {key}");
        }
        assert!(prompt.contains("Do NOT include any comments."));
        assert!(prompt.contains("Escape all double quotes inside string values."));
        assert!(prompt.contains("Do not use unescaped newlines."));
    }

    #[test]
    fn test_empty_exclusion_lists_add_no_exclusion_text() {
        let prompt = build_recommendation_prompt(&sample_profile(), &[], &[]);
        assert!(!prompt.contains("Do NOT include these supervisors"));
        assert!(!prompt.contains("Do NOT include these programs"));
    }

    #[test]
    fn test_exclusion_lists_appear_verbatim_with_avoid_instruction() {
        let supervisors = vec!["Dr. Alan Turing".to_string(), "Dr. Grace Hopper".to_string()];
        let programs = vec!["MIT EECS PhD".to_string()];
        let prompt = build_recommendation_prompt(&sample_profile(), &supervisors, &programs);

        assert!(prompt.contains("Dr. Alan Turing, Dr. Grace Hopper"));
        assert!(prompt.contains("Find DIFFERENT ones."));
        assert!(prompt.contains("Do NOT include these programs: MIT EECS PhD."));
    }

    #[test]
    fn test_program_example_degree_mirrors_target_degree() {
        let prompt = build_recommendation_prompt(&sample_profile(), &[], &[]);
        assert!(prompt.contains(r#""degree": "PhD""#));
    }

    #[test]
    fn test_email_prompt_embeds_all_parties() {
        let prompt = build_email_prompt(
            "Dr. Barbara Liskov",
            "MIT",
            "distributed systems",
            &sample_profile(),
        );

        assert!(prompt.contains("Ada Lovelace, Computer Science"));
        assert!(prompt.contains("Dr. Barbara Liskov, MIT"));
        assert!(prompt.contains("Research Interest: distributed systems"));
        assert!(prompt.contains("Inquire about PhD opportunities."));
        assert!(prompt.contains("Output only the email body text."));
    }
}
