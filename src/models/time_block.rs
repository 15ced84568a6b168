use serde::{Deserialize, Serialize};

use super::DraftError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlock {
    pub id: String,
    pub name: String,
    /// Minutes.
    pub duration: u32,
    pub color: String,
    #[serde(rename = "userId")]
    pub owner_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TimeBlockDraft {
    pub name: String,
    pub duration: u32,
    pub color: String,
}

impl TimeBlockDraft {
    pub fn new(name: impl Into<String>, duration: u32, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration,
            color: color.into(),
        }
    }

    /// For callers to run before `add`; the collection does not re-check.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.name.trim().is_empty() {
            return Err(DraftError::Missing("name"));
        }
        if self.duration == 0 {
            return Err(DraftError::NonPositiveDuration);
        }
        Ok(())
    }
}

/// Blocks every new identity starts with.
pub fn default_time_blocks() -> Vec<TimeBlockDraft> {
    vec![
        TimeBlockDraft::new("Morning routine", 60, "#3B82F6"),
        TimeBlockDraft::new("Lunch break", 60, "#10B981"),
        TimeBlockDraft::new("Workout", 60, "#F59E0B"),
        TimeBlockDraft::new("Work", 480, "#3B82F6"),
        TimeBlockDraft::new("Evening time", 120, "#F97316"),
    ]
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TimeBlockPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub color: Option<String>,
}

impl TimeBlockPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn apply_to(&self, block: &mut TimeBlock) {
        if let Some(name) = &self.name {
            block.name = name.clone();
        }
        if let Some(duration) = self.duration {
            block.duration = duration;
        }
        if let Some(color) = &self.color {
            block.color = color.clone();
        }
    }
}
