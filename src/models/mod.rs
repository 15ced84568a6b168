pub mod identity;
pub mod task;
pub mod time_block;

pub use identity::Identity;
pub(crate) use identity::Credential;
pub use task::{Category, Priority, Task, TaskDraft, TaskPatch};
pub use time_block::{default_time_blocks, TimeBlock, TimeBlockDraft, TimeBlockPatch};

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Input problems callers should catch before handing a draft to a collection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("duration must be a positive number of minutes")]
    NonPositiveDuration,
}

/// Lets a patch tell "field absent" (`None`) from "field set to null"
/// (`Some(None)`).
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
