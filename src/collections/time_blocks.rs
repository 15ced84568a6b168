use super::{EntityCollection, Record};
use crate::{
    models::{default_time_blocks, TimeBlock, TimeBlockDraft, TimeBlockPatch},
    store::keys,
};

impl Record for TimeBlock {
    type Draft = TimeBlockDraft;
    type Patch = TimeBlockPatch;

    const DOMAIN: &'static str = keys::TIME_BLOCKS;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn from_draft(id: String, owner_id: &str, draft: TimeBlockDraft) -> Self {
        TimeBlock {
            id,
            name: draft.name,
            duration: draft.duration,
            color: draft.color,
            owner_id: owner_id.to_string(),
        }
    }

    fn apply(&mut self, patch: &TimeBlockPatch) {
        patch.apply_to(self);
    }

    fn seed() -> Option<Vec<TimeBlockDraft>> {
        Some(default_time_blocks())
    }
}

pub type TimeBlockCollection = EntityCollection<TimeBlock>;

impl EntityCollection<TimeBlock> {
    /// Total planned minutes.
    pub fn sum_durations(&self) -> u64 {
        self.records()
            .iter()
            .map(|block| u64::from(block.duration))
            .sum()
    }

    pub fn total_hours(&self) -> f64 {
        self.sum_durations() as f64 / 60.0
    }
}
