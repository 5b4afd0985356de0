// Resume evaluation: prompt building, model-backed ranking and screening,
// batch aggregation, and the pass/fail decision policy.
// All model calls go through llm_client, never to the backend directly.

pub mod analysis;
pub mod handlers;
pub mod prompts;
pub mod ranker;
pub mod screener;
pub mod validation;
