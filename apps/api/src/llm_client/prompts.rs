// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Instruction forbidding invented resume content.
pub const FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: Use ONLY information present in the original resume. \
    Do NOT invent, add, or embellish facts, employers, dates, or credentials. \
    If a field is empty in the original, it MUST stay empty in your output.";

/// Instruction pinning the structural shape of the resume JSON.
pub const STRUCTURE_INSTRUCTION: &str = "\
    CRITICAL: Preserve the exact structure, field order, and item count of the \
    resume JSON. Do NOT add, remove, or reorder any fields or array items. \
    Preserve all HTML tags, especially <p></p> tags in summaries.";
