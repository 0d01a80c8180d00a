// Recommendations: two generation strategies with shared post-processing,
// the per-user cache and completion blocklist, roadmap phases and the
// Profile Mutator behind the "Complete" action.
// External calls go through llm_client and always have a local fallback.

pub mod cache;
pub mod generator;
pub mod handlers;
pub mod local;
pub mod mutator;
pub mod postprocess;
pub mod prompts;
pub mod resources;
pub mod roadmap;
