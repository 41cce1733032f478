// Recommendation pipeline: prompt build → model call → JSON extraction →
// normalization → citation dedup. All model calls go through llm_client —
// no direct Gemini API calls here.

pub mod citations;
pub mod extract;
pub mod handlers;
pub mod ids;
pub mod normalize;
pub mod prompts;
pub mod recommender;
