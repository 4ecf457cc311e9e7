#![allow(dead_code)]

//! Typed resume snapshot — the tailorable subtree, validated on ingress.
//!
//! Only the fields the tailor/translate pipelines touch are typed; everything
//! else rides along in flattened `extra` maps so a stored document round-trips
//! byte-for-byte (serde_json's preserve_order keeps field order stable).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;

/// Skill group name whose keywords are pinned to a 5-entry single-token list.
/// Every other group keeps its keyword count across tailoring.
pub const HARD_SKILLS_GROUP: &str = "Hard Skills";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeSnapshot {
    pub basics: Basics,
    pub sections: Sections,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Basics {
    pub headline: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sections {
    #[serde(default)]
    pub summary: SummarySection,
    #[serde(default)]
    pub skills: SkillsSection,
    #[serde(default)]
    pub experience: ExperienceSection,
    #[serde(default)]
    pub languages: ItemsSection,
    #[serde(default)]
    pub education: ItemsSection,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarySection {
    /// HTML-escaped paragraph, possibly empty or just `<p></p>`.
    #[serde(default)]
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillsSection {
    #[serde(default)]
    pub items: Vec<SkillGroup>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGroup {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceSection {
    #[serde(default)]
    pub items: Vec<ExperienceItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceItem {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub position: String,
    /// Experience summary: paragraph-wrapped bullet fragments.
    #[serde(default)]
    pub summary: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Sections whose items the pipelines count but never reshape (languages,
/// education).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemsSection {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResumeSnapshot {
    /// Validates a raw document against the tailorable-subtree schema.
    pub fn from_value(value: Value) -> Result<Self, AppError> {
        serde_json::from_value(value)
            .map_err(|e| AppError::InvalidInput(format!("resume document has an unexpected shape: {e}")))
    }

    /// Skill group lookup by exact name.
    pub fn skill_group(&self, name: &str) -> Option<&SkillGroup> {
        self.sections.skills.items.iter().find(|g| g.name == name)
    }
}
