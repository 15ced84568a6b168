//! Change notification plumbing shared by the session, the collections and the
//! timer. Listeners are plain closures; nothing here assumes a UI framework.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

use log::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync + 'static>;

pub struct Listeners<E> {
    entries: Arc<Mutex<Vec<(SubscriptionId, Listener<E>)>>>,
    next_id: Arc<AtomicU64>,
}

impl<E> Clone for Listeners<E> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        match self.entries.lock() {
            Ok(mut guard) => guard.push((id, Arc::new(listener))),
            Err(poisoned) => poisoned.into_inner().push((id, Arc::new(listener))),
        }
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut guard = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = guard.len();
        guard.retain(|(existing, _)| *existing != id);
        guard.len() != before
    }

    /// Calls every listener with `event`. The registry lock is released first,
    /// so a listener may subscribe or unsubscribe while being notified.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = match self.entries.lock() {
            Ok(guard) => guard.iter().map(|(_, l)| Arc::clone(l)).collect(),
            Err(poisoned) => {
                error!("Listener registry poisoned; recovering");
                poisoned
                    .into_inner()
                    .iter()
                    .map(|(_, l)| Arc::clone(l))
                    .collect()
            }
        };

        for listener in snapshot {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
