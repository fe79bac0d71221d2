// Strategy pipeline: prompt construction, remote generation, response parsing
// and the deterministic fallback used when any of it fails.
// All LLM calls go through llm_client; nothing here talks HTTP directly.

pub mod benchmarks;
pub mod fallback;
pub mod handlers;
pub mod prompts;
pub mod requester;

pub use fallback::{parse_budget, BudgetTier};
pub use requester::request_strategy;
