use std::{sync::Arc, time::Duration};

use log::{debug, error, info, warn};
use serde::Serialize;
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant},
};

use crate::{
    events::{Listeners, SubscriptionId},
    store::{keys, KeyedStore, KeyedStoreExt},
};

use super::{
    AlertSink, Phase, TickOutcome, TimerError, TimerSettings, TimerSettingsPatch, TimerState,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub settings: TimerSettings,
    pub time_remaining: u32,
    pub running: bool,
    pub on_break: bool,
    pub phase: Phase,
    pub current_interval: u32,
}

impl From<&TimerState> for TimerSnapshot {
    fn from(state: &TimerState) -> Self {
        Self {
            settings: state.settings,
            time_remaining: state.time_remaining,
            running: state.is_running(),
            on_break: state.on_break,
            phase: state.phase(),
            current_interval: state.current_interval,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    StateChanged(TimerSnapshot),
    IntervalCompleted { finished: Phase, next: Phase },
    SettingsChanged(TimerSettings),
}

/// Async handle around [`TimerState`]. Owns the one-second tick source; at
/// most one ticker task exists per controller, and spawning a new one aborts
/// the previous one first.
#[derive(Clone)]
pub struct TimerController {
    state: Arc<Mutex<TimerState>>,
    /// Key that settings changes are written to. `None` while signed out, and
    /// also when the owner's stored settings could not be read, so a change
    /// made on top of the fallback defaults never replaces them.
    settings_key: Arc<Mutex<Option<String>>>,
    store: Arc<dyn KeyedStore>,
    alert: Arc<dyn AlertSink>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_interval: Duration,
    listeners: Listeners<TimerEvent>,
}

impl TimerController {
    pub fn new(
        store: Arc<dyn KeyedStore>,
        alert: Arc<dyn AlertSink>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(TimerState::new(TimerSettings::default()))),
            settings_key: Arc::new(Mutex::new(None)),
            store,
            alert,
            ticker: Arc::new(Mutex::new(None)),
            tick_interval,
            listeners: Listeners::new(),
        }
    }

    pub async fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::from(&*self.state.lock().await)
    }

    pub async fn settings(&self) -> TimerSettings {
        self.state.lock().await.settings
    }

    pub fn on_change<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&TimerEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Stops any countdown and switches to `owner_id`'s settings (defaults when
    /// signed out or nothing valid is stored). Runtime state starts over at
    /// focus interval 1. If the stored settings cannot be read, defaults are
    /// used and later changes stay in memory.
    pub async fn load_for_identity(&self, owner_id: Option<&str>) {
        self.cancel_ticker().await;

        let mut settings_key = None;
        let mut stored = None;
        if let Some(owner) = owner_id {
            let key = keys::owned(keys::POMODORO, owner);
            match self.store.load::<TimerSettings>(&key) {
                Ok(settings) => {
                    stored = settings;
                    settings_key = Some(key);
                }
                Err(err) => error!("Failed to load timer settings: {err:#}"),
            }
        }

        let settings = stored
            .filter(|settings| match settings.validate() {
                Ok(()) => true,
                Err(err) => {
                    warn!("Ignoring stored timer settings: {err}");
                    false
                }
            })
            .unwrap_or_default();

        *self.settings_key.lock().await = settings_key;
        let snapshot = {
            let mut state = self.state.lock().await;
            *state = TimerState::new(settings);
            TimerSnapshot::from(&*state)
        };

        debug!("Timer loaded for {owner_id:?}: {settings:?}");
        self.listeners.emit(&TimerEvent::SettingsChanged(settings));
        self.listeners.emit(&TimerEvent::StateChanged(snapshot));
    }

    pub async fn start(&self) {
        let started = self.state.lock().await.start();
        if !started {
            return;
        }

        self.spawn_ticker().await;
        self.emit_state_changed().await;
    }

    pub async fn pause(&self) {
        self.state.lock().await.pause();
        self.cancel_ticker().await;
        self.emit_state_changed().await;
    }

    pub async fn reset(&self) {
        self.state.lock().await.reset();
        self.cancel_ticker().await;
        self.emit_state_changed().await;
    }

    pub async fn skip(&self) {
        let next = self.state.lock().await.skip();
        self.cancel_ticker().await;
        info!("Skipped to {next:?}");
        self.emit_state_changed().await;
    }

    pub async fn update_settings(
        &self,
        patch: TimerSettingsPatch,
    ) -> Result<TimerSettings, TimerError> {
        let (settings, snapshot) = {
            let mut state = self.state.lock().await;
            let merged = state.settings.merged(&patch);
            merged.validate()?;
            state.apply_settings(merged);
            (merged, TimerSnapshot::from(&*state))
        };

        if let Some(key) = self.settings_key.lock().await.as_deref() {
            if let Err(err) = self.store.save(key, &settings) {
                error!("Failed to persist timer settings: {err:#}");
            }
        }

        self.listeners.emit(&TimerEvent::SettingsChanged(settings));
        self.listeners.emit(&TimerEvent::StateChanged(snapshot));
        Ok(settings)
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let listeners = self.listeners.clone();
        let alert = self.alert.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + tick_interval, tick_interval);
            loop {
                interval.tick().await;

                let (outcome, snapshot) = {
                    let mut guard = state.lock().await;
                    if !guard.is_running() {
                        break;
                    }
                    let outcome = guard.tick();
                    (outcome, TimerSnapshot::from(&*guard))
                };

                if let TickOutcome::Completed { finished, next } = outcome {
                    info!("{finished:?} finished; now {next:?}");
                    if let Err(err) = alert.chime() {
                        warn!("Failed to play interval chime: {err:#}");
                    }
                    listeners.emit(&TimerEvent::IntervalCompleted { finished, next });
                }

                listeners.emit(&TimerEvent::StateChanged(snapshot));
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    async fn emit_state_changed(&self) {
        let snapshot = self.snapshot().await;
        self.listeners.emit(&TimerEvent::StateChanged(snapshot));
    }
}
