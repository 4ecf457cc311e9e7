// All LLM prompt constants for the tailoring module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for resume tailoring — enforces JSON-only output.
pub const TAILOR_SYSTEM: &str = "You are an expert resume writer tailoring an \
    existing resume to a target job description. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Tailoring prompt template.
/// Replace: {structure_instruction}, {fabrication_instruction},
///          {job_description}, {resume_json}
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"Tailor the following resume STRICTLY to this job description:
"{job_description}"

Current resume:
{resume_json}

Return a JSON object with this EXACT structure:
{
  "basics": {
    "headline": "TAILORED headline matching the job description exactly"
  },
  "sections": {
    "summary": {
      "content": "<p>TAILORED summary (2 sentences MAX). If the original is empty, LEAVE EMPTY.</p>"
    },
    "skills": {
      "items": [
        {
          "name": "Soft Skills",
          "keywords": ["keyword1", "keyword2", "keyword3"]
        },
        {
          "name": "Hard Skills",
          "keywords": ["keyword1", "keyword2", "keyword3", "keyword4", "keyword5"]
        }
      ]
    },
    "experience": {
      "items": [
        {
          "summary": "<p>Bullet point 1</p><p>Bullet point 2</p><p>Bullet point 3</p>"
        }
      ]
    }
  }
}

{structure_instruction}

{fabrication_instruction}

CRITICAL INSTRUCTIONS:
1. The headline MUST accurately reflect the job description.
2. If the original summary is empty, the tailored summary MUST also be empty.
3. BOTH soft and hard skills MUST be tailored to the job description.
4. Every skill group EXCEPT "Hard Skills" MUST keep exactly as many keywords
   as the original group has.
5. "Hard Skills" MUST contain EXACTLY 5 keywords, each ONE word naming a
   specific tool or software (e.g. "Salesforce", "Zendesk", "Excel", "Jira").
6. Each experience summary MUST be specifically tailored to the job description.
7. Format each experience summary as 1 to 5 bullet points, each wrapped in
   <p></p> tags. NEVER more than 5.
8. Include one entry in "experience.items" for EVERY experience item in the
   original resume, in the same order.
9. Ensure all changes directly relate to the provided job description."#;

/// System prompt for the hard-skill selection call.
pub const SKILL_PICK_SYSTEM: &str = "You are a resume skills curator. \
    You MUST respond with a valid JSON array of strings only. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

/// Hard-skill selection prompt template.
/// Replace: {headline}, {vocabulary}
pub const SKILL_PICK_PROMPT_TEMPLATE: &str = r#"Select the hard skills that best support this resume headline:
"{headline}"

Choose ONLY from this candidate list:
{vocabulary}

Rules:
1. Return a JSON array of EXACTLY 5 strings.
2. Every entry MUST be a single word with no spaces, copied verbatim from the list.
3. Pick the 5 entries most relevant to the headline.
4. Do NOT return duplicates."#;

/// Candidate vocabulary for the hard-skill selection call. Single-token tool
/// and platform names only.
pub const HARD_SKILL_VOCABULARY: &[&str] = &[
    "Salesforce",
    "Zendesk",
    "Excel",
    "Jira",
    "Confluence",
    "HubSpot",
    "Tableau",
    "PowerBI",
    "Photoshop",
    "Figma",
    "Python",
    "SQL",
    "Rust",
    "Java",
    "TypeScript",
    "React",
    "AWS",
    "Azure",
    "GCP",
    "Docker",
    "Kubernetes",
    "Terraform",
    "Git",
    "Linux",
    "PostgreSQL",
    "MongoDB",
    "Redis",
    "Kafka",
    "SAP",
    "Notion",
];
