//! Tailoring driver — bounded completion attempts, shape validation, store
//! commit.
//!
//! Flow per attempt: complete → strip fences → parse → validate bullet
//! counts and keyword counts → (second call for hard skills if needed) →
//! commit field-by-field → return. A failed attempt never touches the store.

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::{FABRICATION_INSTRUCTION, STRUCTURE_INSTRUCTION};
use crate::llm_client::{strip_json_fences, ChatRequest, CompletionClient, CompletionError};
use crate::models::resume::{ResumeSnapshot, HARD_SKILLS_GROUP};
use crate::store::ResumeStore;
use crate::tailor::prompts::{
    HARD_SKILL_VOCABULARY, SKILL_PICK_PROMPT_TEMPLATE, SKILL_PICK_SYSTEM, TAILOR_PROMPT_TEMPLATE,
    TAILOR_SYSTEM,
};
use crate::tailor::validation::{
    count_bullet_fragments, hard_skill_violation, MAX_BULLETS_PER_EXPERIENCE,
};

/// Attempt budget for the whole tailor operation. Attempts are strictly
/// sequential; the first validated response wins.
pub const MAX_RETRIES: u32 = 3;

const TAILOR_MAX_TOKENS: u32 = 4096;
const TAILOR_TEMPERATURE: f32 = 0.5;
const SKILL_PICK_MAX_TOKENS: u32 = 256;
const SKILL_PICK_TEMPERATURE: f32 = 0.2;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// The tailored subtree returned by the LLM and applied to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoredFields {
    pub basics: TailoredBasics,
    pub sections: TailoredSections,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoredBasics {
    pub headline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoredSections {
    pub summary: TailoredSummary,
    pub skills: TailoredSkills,
    pub experience: TailoredExperience,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoredSummary {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoredSkills {
    #[serde(default)]
    pub items: Vec<TailoredSkillGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoredSkillGroup {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoredExperience {
    #[serde(default)]
    pub items: Vec<TailoredExperienceItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoredExperienceItem {
    #[serde(default)]
    pub summary: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Per-attempt failures
// ────────────────────────────────────────────────────────────────────────────

/// Why one attempt was rejected. Logged with the attempt number and retried;
/// only the last one surfaces, inside `AppError::ExhaustedRetries`.
#[derive(Debug, Error)]
enum AttemptError {
    #[error("completion call failed: {0}")]
    Upstream(#[from] CompletionError),

    #[error("response was not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response has {actual} experience items, resume has {expected}")]
    ExperienceCount { expected: usize, actual: usize },

    #[error("experience item {index} has {count} bullet fragments (expected 1-{MAX_BULLETS_PER_EXPERIENCE})")]
    BulletCount { index: usize, count: usize },

    #[error("response has {actual} skill groups, resume has {expected}")]
    SkillGroupCount { expected: usize, actual: usize },

    #[error("skill group {index} is named '{actual}', resume has '{expected}'")]
    SkillGroupName {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("skill group '{name}' changed keyword count from {expected} to {actual}")]
    KeywordCount {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("hard skill selection invalid: {0}")]
    HardSkills(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Driver
// ────────────────────────────────────────────────────────────────────────────

/// Tailors the loaded resume to `job_description` and applies the accepted
/// fields to the store. The caller guarantees `job_description` is non-empty.
pub async fn tailor_resume(
    client: &dyn CompletionClient,
    store: &dyn ResumeStore,
    job_description: &str,
) -> Result<TailoredFields, AppError> {
    let stored = store
        .get()
        .ok_or_else(|| AppError::NotFound("no resume document is loaded".to_string()))?;
    let snapshot = ResumeSnapshot::from_value(stored.document.clone())?;

    let resume_json = serde_json::to_string_pretty(&stored.document)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize resume: {e}")))?;
    let prompt = TAILOR_PROMPT_TEMPLATE
        .replace("{structure_instruction}", STRUCTURE_INSTRUCTION)
        .replace("{fabrication_instruction}", FABRICATION_INSTRUCTION)
        .replace("{job_description}", job_description)
        .replace("{resume_json}", &resume_json);

    let mut last_failure: Option<AttemptError> = None;

    for attempt in 1..=MAX_RETRIES {
        match run_attempt(client, &snapshot, &prompt).await {
            Ok(fields) => {
                commit(store, &fields)?;
                info!("Resume tailored and applied on attempt {attempt}/{MAX_RETRIES}");
                return Ok(fields);
            }
            Err(e) => {
                warn!("Tailoring attempt {attempt}/{MAX_RETRIES} failed: {e}");
                last_failure = Some(e);
            }
        }
    }

    Err(AppError::ExhaustedRetries {
        attempts: MAX_RETRIES,
        last_cause: last_failure
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
    })
}

/// One complete attempt: call, parse, validate, refine hard skills.
/// Pure with respect to the store — commits happen in the driver.
async fn run_attempt(
    client: &dyn CompletionClient,
    snapshot: &ResumeSnapshot,
    prompt: &str,
) -> Result<TailoredFields, AttemptError> {
    let completion = client
        .complete(ChatRequest::with_system(
            TAILOR_SYSTEM,
            prompt,
            TAILOR_MAX_TOKENS,
            TAILOR_TEMPERATURE,
        ))
        .await?;
    let text = completion.first_text()?;
    let text = strip_json_fences(text);

    let mut fields: TailoredFields = serde_json::from_str(text)?;

    validate_experience(snapshot, &fields)?;
    validate_skill_groups(snapshot, &fields)?;
    ensure_hard_skills(client, &mut fields).await?;

    Ok(fields)
}

/// Experience items must match the resume one-to-one, and every summary must
/// carry 1..=5 paragraph-wrapped bullet fragments.
fn validate_experience(
    snapshot: &ResumeSnapshot,
    fields: &TailoredFields,
) -> Result<(), AttemptError> {
    let expected = snapshot.sections.experience.items.len();
    let actual = fields.sections.experience.items.len();
    if actual != expected {
        return Err(AttemptError::ExperienceCount { expected, actual });
    }

    for (index, item) in fields.sections.experience.items.iter().enumerate() {
        let count = count_bullet_fragments(&item.summary);
        if count == 0 || count > MAX_BULLETS_PER_EXPERIENCE {
            return Err(AttemptError::BulletCount { index, count });
        }
    }

    Ok(())
}

/// Skill groups must match the resume by position and name, and every group
/// except hard skills must keep its keyword count (the hard group is settled
/// by `ensure_hard_skills`).
fn validate_skill_groups(
    snapshot: &ResumeSnapshot,
    fields: &TailoredFields,
) -> Result<(), AttemptError> {
    let expected = snapshot.sections.skills.items.len();
    let actual = fields.sections.skills.items.len();
    if actual != expected {
        return Err(AttemptError::SkillGroupCount { expected, actual });
    }

    for (index, (original, tailored)) in snapshot
        .sections
        .skills
        .items
        .iter()
        .zip(&fields.sections.skills.items)
        .enumerate()
    {
        if original.name != tailored.name {
            return Err(AttemptError::SkillGroupName {
                index,
                expected: original.name.clone(),
                actual: tailored.name.clone(),
            });
        }
        if tailored.name != HARD_SKILLS_GROUP && tailored.keywords.len() != original.keywords.len()
        {
            return Err(AttemptError::KeywordCount {
                name: tailored.name.clone(),
                expected: original.keywords.len(),
                actual: tailored.keywords.len(),
            });
        }
    }

    Ok(())
}

/// Settles the hard-skill group: if the primary response already holds five
/// single-token labels it stands; otherwise a second completion call picks
/// exactly five from the fixed vocabulary, keyed on the tailored headline.
async fn ensure_hard_skills(
    client: &dyn CompletionClient,
    fields: &mut TailoredFields,
) -> Result<(), AttemptError> {
    let group = match fields
        .sections
        .skills
        .items
        .iter_mut()
        .find(|g| g.name == HARD_SKILLS_GROUP)
    {
        Some(group) => group,
        None => return Ok(()), // resume has no hard-skill group to settle
    };

    if hard_skill_violation(&group.keywords).is_none() {
        return Ok(());
    }

    let prompt = SKILL_PICK_PROMPT_TEMPLATE
        .replace("{headline}", &fields.basics.headline)
        .replace("{vocabulary}", &HARD_SKILL_VOCABULARY.join(", "));

    let completion = client
        .complete(ChatRequest::with_system(
            SKILL_PICK_SYSTEM,
            prompt,
            SKILL_PICK_MAX_TOKENS,
            SKILL_PICK_TEMPERATURE,
        ))
        .await?;
    let text = completion.first_text()?;
    let keywords: Vec<String> = serde_json::from_str(strip_json_fences(text))?;

    if let Some(violation) = hard_skill_violation(&keywords) {
        return Err(AttemptError::HardSkills(violation));
    }

    let group = fields
        .sections
        .skills
        .items
        .iter_mut()
        .find(|g| g.name == HARD_SKILLS_GROUP)
        .expect("hard-skill group checked above");
    group.keywords = keywords;
    Ok(())
}

/// Applies the accepted fields to the store one path at a time — the same
/// write granularity the store exposes, so a reader may observe a partially
/// applied update mid-commit.
fn commit(store: &dyn ResumeStore, fields: &TailoredFields) -> Result<(), AppError> {
    store
        .set_value("basics.headline", json!(fields.basics.headline))
        .map_err(commit_error)?;
    store
        .set_value(
            "sections.summary.content",
            json!(fields.sections.summary.content),
        )
        .map_err(commit_error)?;

    for (index, group) in fields.sections.skills.items.iter().enumerate() {
        store
            .set_value(
                &format!("sections.skills.items.{index}.keywords"),
                json!(group.keywords),
            )
            .map_err(commit_error)?;
    }

    for (index, item) in fields.sections.experience.items.iter().enumerate() {
        store
            .set_value(
                &format!("sections.experience.items.{index}.summary"),
                json!(item.summary),
            )
            .map_err(commit_error)?;
    }

    Ok(())
}

fn commit_error(e: crate::store::StoreError) -> AppError {
    AppError::Internal(anyhow::anyhow!("Failed to apply tailored field: {e}"))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
