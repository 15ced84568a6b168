pub mod audio;
pub mod collections;
pub mod config;
pub mod events;
pub mod models;
pub mod planner;
pub mod session;
pub mod store;
pub mod timer;
pub mod utils;

pub use collections::{CollectionEvent, EntityCollection, TaskCollection, TimeBlockCollection};
pub use config::AppConfig;
pub use events::SubscriptionId;
pub use models::{Identity, Task, TaskDraft, TaskPatch, TimeBlock, TimeBlockDraft, TimeBlockPatch};
pub use planner::Planner;
pub use session::{SessionError, SessionEvent, SessionStore};
pub use store::{KeyedStore, KeyedStoreExt, MemoryStore, SqliteStore};
pub use timer::{TimerController, TimerEvent, TimerSettings, TimerSettingsPatch, TimerSnapshot};

/// Reads the environment, installs the logger and opens the planner on the
/// configured data directory.
pub async fn open_from_env() -> anyhow::Result<Planner> {
    let config = AppConfig::from_env();
    utils::logging::init(&config);

    log::info!("pomoplan starting up...");
    Planner::open(&config).await
}
