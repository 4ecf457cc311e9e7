// All LLM prompt constants for the translation module.

/// System prompt for resume translation — enforces JSON-only output.
pub const TRANSLATE_SYSTEM: &str = "You are an expert resume translator. \
    You MUST respond with valid JSON only — the full resume object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Translation prompt template.
/// Replace: {direction}, {resume_json}
pub const TRANSLATE_PROMPT_TEMPLATE: &str = r#"Translate the following resume from {direction}.
It is CRITICAL to preserve the exact structure, order, and formatting of the original JSON. Translate ONLY the specified fields.

Current resume:
{resume_json}

TRANSLATION INSTRUCTIONS:
1. Translate ONLY the content of the following fields, keeping their exact position and format:
   - basics.headline
   - sections.summary.content
   - sections.skills.items[].keywords (only if the group name is "Soft Skills")
   - sections.languages.items[].name and description
   - sections.education.items[].date
   - sections.experience.items[].date, position, and summary
2. DO NOT translate or modify any other fields, including:
   - sections.skills.items[].keywords (if the group name is "Hard Skills")
   - Any proper nouns, company names, or technical terms
   - Any field names, IDs, or structural elements
3. Preserve all HTML tags, especially <p></p> tags in summaries
4. For dates, translate month names but keep the exact same format (e.g., "March 2020" becomes "Mars 2020" in French)
5. If a field is empty or just contains "<p></p>", leave it exactly as is
6. Ensure there is a maximum of 5 bullet points per experience item summary, each wrapped in <p></p> tags
7. CRITICAL: Maintain the exact order of all fields and objects in the JSON structure
8. DO NOT add, remove, or reorder any fields or objects in the JSON
9. The final output must be a valid JSON object with the exact same structure, order, and formatting as the input"#;
