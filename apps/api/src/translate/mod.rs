// Translation pipeline: prompt build → bounded completion attempts →
// structure validation → whole-document store swap.
// All LLM calls go through llm_client — no direct completion calls here.

pub mod handlers;
pub mod prompts;
pub mod translator;
