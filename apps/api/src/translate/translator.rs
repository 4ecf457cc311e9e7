//! Translation driver — same bounded attempt skeleton as tailoring, but the
//! accepted result replaces the whole document instead of individual fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{strip_json_fences, ChatRequest, CompletionClient, CompletionError};
use crate::models::resume::{ResumeSnapshot, HARD_SKILLS_GROUP};
use crate::store::ResumeStore;
use crate::tailor::validation::{count_bullet_fragments, MAX_BULLETS_PER_EXPERIENCE};
use crate::translate::prompts::{TRANSLATE_PROMPT_TEMPLATE, TRANSLATE_SYSTEM};

/// Attempt budget for the whole translate operation.
pub const MAX_RETRIES: u32 = 3;

const TRANSLATE_MAX_TOKENS: u32 = 8192;
const TRANSLATE_TEMPERATURE: f32 = 0.3;

/// Supported translation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    En,
    Fr,
}

impl TargetLanguage {
    /// Human-readable translation direction for the prompt.
    pub fn direction(&self) -> &'static str {
        match self {
            TargetLanguage::En => "French to English",
            TargetLanguage::Fr => "English to French",
        }
    }
}

/// Why one attempt was rejected; retried up to the budget.
#[derive(Debug, Error)]
enum AttemptError {
    #[error("completion call failed: {0}")]
    Upstream(#[from] CompletionError),

    #[error("response was not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("translated document broke structure: {0}")]
    Structure(String),
}

/// Translates the loaded resume to `target` and replaces the stored document
/// with the accepted result.
pub async fn translate_resume(
    client: &dyn CompletionClient,
    store: &dyn ResumeStore,
    target: TargetLanguage,
) -> Result<ResumeSnapshot, AppError> {
    let stored = store
        .get()
        .ok_or_else(|| AppError::NotFound("no resume document is loaded".to_string()))?;
    let snapshot = ResumeSnapshot::from_value(stored.document.clone())?;

    let resume_json = serde_json::to_string_pretty(&stored.document)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize resume: {e}")))?;
    let prompt = TRANSLATE_PROMPT_TEMPLATE
        .replace("{direction}", target.direction())
        .replace("{resume_json}", &resume_json);

    let mut last_failure: Option<AttemptError> = None;

    for attempt in 1..=MAX_RETRIES {
        match run_attempt(client, &snapshot, &prompt).await {
            Ok(translated) => {
                let document = serde_json::to_value(&translated).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("Failed to serialize translation: {e}"))
                })?;
                store.replace(document);
                info!("Resume translated and stored on attempt {attempt}/{MAX_RETRIES}");
                return Ok(translated);
            }
            Err(e) => {
                warn!("Translation attempt {attempt}/{MAX_RETRIES} failed: {e}");
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

async fn run_attempt(
    client: &dyn CompletionClient,
    snapshot: &ResumeSnapshot,
    prompt: &str,
) -> Result<ResumeSnapshot, AttemptError> {
    let completion = client
        .complete(ChatRequest::with_system(
            TRANSLATE_SYSTEM,
            prompt,
            TRANSLATE_MAX_TOKENS,
            TRANSLATE_TEMPERATURE,
        ))
        .await?;
    let text = completion.first_text()?;
    let translated: ResumeSnapshot = serde_json::from_str(strip_json_fences(text))?;

    if let Some(violation) = structure_violation(snapshot, &translated) {
        return Err(AttemptError::Structure(violation));
    }

    Ok(translated)
}

/// Compares a translated document against the original shape. Returns a
/// description of the first violation, or `None` when the structure held.
fn structure_violation(original: &ResumeSnapshot, translated: &ResumeSnapshot) -> Option<String> {
    let counts = [
        (
            "experience",
            original.sections.experience.items.len(),
            translated.sections.experience.items.len(),
        ),
        (
            "skills",
            original.sections.skills.items.len(),
            translated.sections.skills.items.len(),
        ),
        (
            "languages",
            original.sections.languages.items.len(),
            translated.sections.languages.items.len(),
        ),
        (
            "education",
            original.sections.education.items.len(),
            translated.sections.education.items.len(),
        ),
    ];
    for (section, expected, actual) in counts {
        if expected != actual {
            return Some(format!(
                "{section} item count changed from {expected} to {actual}"
            ));
        }
    }

    for (index, (before, after)) in original
        .sections
        .skills
        .items
        .iter()
        .zip(&translated.sections.skills.items)
        .enumerate()
    {
        if before.name != after.name {
            return Some(format!(
                "skill group {index} renamed from '{}' to '{}'",
                before.name, after.name
            ));
        }
        if before.name == HARD_SKILLS_GROUP && before.keywords != after.keywords {
            return Some("hard-skill keywords were modified".to_string());
        }
    }

    for (index, item) in translated.sections.experience.items.iter().enumerate() {
        let count = count_bullet_fragments(&item.summary);
        if count > MAX_BULLETS_PER_EXPERIENCE {
            return Some(format!(
                "experience item {index} has {count} bullet fragments (max {MAX_BULLETS_PER_EXPERIENCE})"
            ));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedClient;
    use crate::store::InMemoryResumeStore;
    use serde_json::{json, Value};

    fn document() -> Value {
        json!({
            "basics": { "headline": "Backend Engineer" },
            "sections": {
                "summary": { "content": "<p>Backend engineer with 8 years of experience.</p>" },
                "skills": {
                    "items": [
                        { "name": "Soft Skills", "keywords": ["Communication", "Teamwork"] },
                        { "name": "Hard Skills", "keywords": ["Rust", "SQL", "Docker", "AWS", "Git"] }
                    ]
                },
                "experience": {
                    "items": [
                        { "date": "March 2020 - Present", "position": "Engineer", "summary": "<p>Built APIs.</p>" }
                    ]
                },
                "languages": { "items": [ { "name": "English", "description": "Native" } ] },
                "education": { "items": [ { "date": "2014 - 2018" } ] }
            }
        })
    }

    fn translated_document() -> Value {
        json!({
            "basics": { "headline": "Ingénieur Backend" },
            "sections": {
                "summary": { "content": "<p>Ingénieur backend avec 8 ans d'expérience.</p>" },
                "skills": {
                    "items": [
                        { "name": "Soft Skills", "keywords": ["Communication", "Travail d'équipe"] },
                        { "name": "Hard Skills", "keywords": ["Rust", "SQL", "Docker", "AWS", "Git"] }
                    ]
                },
                "experience": {
                    "items": [
                        { "date": "Mars 2020 - Présent", "position": "Ingénieur", "summary": "<p>Développé des APIs.</p>" }
                    ]
                },
                "languages": { "items": [ { "name": "Anglais", "description": "Langue maternelle" } ] },
                "education": { "items": [ { "date": "2014 - 2018" } ] }
            }
        })
    }

    fn loaded_store() -> InMemoryResumeStore {
        let store = InMemoryResumeStore::new();
        store.replace(document());
        store
    }

    #[test]
    fn test_target_language_serde_and_direction() {
        let target: TargetLanguage = serde_json::from_str(r#""fr""#).unwrap();
        assert_eq!(target, TargetLanguage::Fr);
        assert_eq!(target.direction(), "English to French");
        assert_eq!(TargetLanguage::En.direction(), "French to English");
    }

    #[tokio::test]
    async fn test_successful_translation_replaces_document() {
        let client = ScriptedClient::new(vec![ScriptedClient::text(
            &translated_document().to_string(),
        )]);
        let store = loaded_store();

        let result = translate_resume(&client, &store, TargetLanguage::Fr)
            .await
            .unwrap();

        assert_eq!(result.basics.headline, "Ingénieur Backend");
        let stored = store.get().unwrap().document;
        assert_eq!(stored["basics"]["headline"], "Ingénieur Backend");
        assert_eq!(
            stored["sections"]["languages"]["items"][0]["name"],
            "Anglais"
        );
    }

    #[tokio::test]
    async fn test_translation_keeps_hard_skills_and_counts() {
        let client = ScriptedClient::new(vec![ScriptedClient::text(
            &translated_document().to_string(),
        )]);
        let store = loaded_store();

        let result = translate_resume(&client, &store, TargetLanguage::Fr)
            .await
            .unwrap();

        let hard = result.skill_group(HARD_SKILLS_GROUP).unwrap();
        assert_eq!(hard.keywords, vec!["Rust", "SQL", "Docker", "AWS", "Git"]);
        assert_eq!(result.sections.experience.items.len(), 1);
        assert_eq!(result.sections.languages.items.len(), 1);
    }

    #[tokio::test]
    async fn test_dropped_experience_item_is_retried() {
        let mut broken = translated_document();
        broken["sections"]["experience"]["items"] = json!([]);

        let client = ScriptedClient::new(vec![
            ScriptedClient::text(&broken.to_string()),
            ScriptedClient::text(&translated_document().to_string()),
        ]);
        let store = loaded_store();

        let result = translate_resume(&client, &store, TargetLanguage::Fr).await;
        assert!(result.is_ok());
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_modified_hard_skills_fail_every_attempt() {
        let mut broken = translated_document();
        broken["sections"]["skills"]["items"][1]["keywords"] =
            json!(["Rouille", "SQL", "Docker", "AWS", "Git"]);
        let text = broken.to_string();

        let client = ScriptedClient::new(vec![
            ScriptedClient::text(&text),
            ScriptedClient::text(&text),
            ScriptedClient::text(&text),
        ]);
        let store = loaded_store();

        let err = translate_resume(&client, &store, TargetLanguage::Fr)
            .await
            .unwrap_err();

        match err {
            AppError::ExhaustedRetries { attempts, last_cause } => {
                assert_eq!(attempts, 3);
                assert!(last_cause.contains("hard-skill"));
            }
            other => panic!("expected ExhaustedRetries, got {other:?}"),
        }
        // Store untouched after a fully failed operation.
        let stored = store.get().unwrap().document;
        assert_eq!(stored["basics"]["headline"], "Backend Engineer");
    }

    #[tokio::test]
    async fn test_six_bullets_in_translation_are_rejected() {
        let mut broken = translated_document();
        broken["sections"]["experience"]["items"][0]["summary"] =
            json!("<p>1</p><p>2</p><p>3</p><p>4</p><p>5</p><p>6</p>");

        let client = ScriptedClient::new(vec![
            ScriptedClient::text(&broken.to_string()),
            ScriptedClient::text(&translated_document().to_string()),
        ]);
        let store = loaded_store();

        assert!(translate_resume(&client, &store, TargetLanguage::Fr)
            .await
            .is_ok());
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_summary_survives_translation() {
        // Rule 5: empty fields are left as-is; zero bullets is not a failure
        // for translation (unlike tailoring).
        let mut source = document();
        source["sections"]["experience"]["items"][0]["summary"] = json!("<p></p>");
        let mut translated = translated_document();
        translated["sections"]["experience"]["items"][0]["summary"] = json!("<p></p>");

        let store = InMemoryResumeStore::new();
        store.replace(source);
        let client = ScriptedClient::new(vec![ScriptedClient::text(&translated.to_string())]);

        assert!(translate_resume(&client, &store, TargetLanguage::Fr)
            .await
            .is_ok());
    }
}
