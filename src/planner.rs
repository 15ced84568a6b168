use std::{sync::Arc, time::Duration};

use anyhow::Result;
use log::info;

use crate::{
    audio::ChimePlayer,
    collections::{TaskCollection, TimeBlockCollection},
    config::AppConfig,
    models::Identity,
    session::{self, SessionStore},
    store::{KeyedStore, SqliteStore},
    timer::{AlertSink, SilentAlert, TimerController},
};

/// Owns one of each component and keeps them on the same identity: every
/// sign-in or sign-out reloads the task list, the time blocks and the timer
/// settings for the new owner before returning.
pub struct Planner {
    session: SessionStore,
    tasks: TaskCollection,
    time_blocks: TimeBlockCollection,
    timer: TimerController,
}

impl Planner {
    pub async fn open(config: &AppConfig) -> Result<Self> {
        let store: Arc<dyn KeyedStore> = Arc::new(SqliteStore::open(config.database_path())?);
        let alert: Arc<dyn AlertSink> = if config.mute_alerts {
            Arc::new(SilentAlert)
        } else {
            Arc::new(ChimePlayer::new())
        };

        Ok(Self::with_store(store, alert, config.tick_interval).await)
    }

    pub async fn with_store(
        store: Arc<dyn KeyedStore>,
        alert: Arc<dyn AlertSink>,
        tick_interval: Duration,
    ) -> Self {
        let session = SessionStore::restore(Arc::clone(&store));
        let owner = session.identity().map(|identity| identity.id.clone());

        let tasks = TaskCollection::new(Arc::clone(&store), owner.as_deref());
        let time_blocks = TimeBlockCollection::new(Arc::clone(&store), owner.as_deref());
        let timer = TimerController::new(store, alert, tick_interval);
        timer.load_for_identity(owner.as_deref()).await;

        Self {
            session,
            tasks,
            time_blocks,
            timer,
        }
    }

    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
    ) -> session::Result<Identity> {
        let identity = self.session.register(email, password, name)?;
        self.sync_identity().await;
        Ok(identity)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> session::Result<Identity> {
        let identity = self.session.login(email, password)?;
        self.sync_identity().await;
        Ok(identity)
    }

    pub async fn logout(&mut self) {
        self.session.logout();
        self.sync_identity().await;
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.identity()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn tasks(&self) -> &TaskCollection {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskCollection {
        &mut self.tasks
    }

    pub fn time_blocks(&self) -> &TimeBlockCollection {
        &self.time_blocks
    }

    pub fn time_blocks_mut(&mut self) -> &mut TimeBlockCollection {
        &mut self.time_blocks
    }

    pub fn timer(&self) -> &TimerController {
        &self.timer
    }

    async fn sync_identity(&mut self) {
        let owner = self.session.identity().map(|identity| identity.id.clone());

        // Timer first so no tick lands after the switch.
        self.timer.load_for_identity(owner.as_deref()).await;
        self.tasks.load_for_identity(owner.as_deref());
        self.time_blocks.load_for_identity(owner.as_deref());

        info!("Workspace now scoped to {owner:?}");
    }
}
