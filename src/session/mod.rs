//! Mock sign-in. Credentials are kept in plaintext in the local store; this is
//! a demo session layer, not a security boundary.

pub mod error;

pub use error::{Result, SessionError};

use std::sync::Arc;

use log::{error, info, warn};

use crate::{
    events::{Listeners, SubscriptionId},
    models::{Credential, Identity},
    store::{keys, KeyedStore, KeyedStoreExt},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Identity),
    SignedOut,
}

pub struct SessionStore {
    store: Arc<dyn KeyedStore>,
    identity: Option<Identity>,
    listeners: Listeners<SessionEvent>,
}

impl SessionStore {
    /// Picks up the persisted session pointer, if any. A corrupt pointer is
    /// dropped by the store and the session starts anonymous; so does an
    /// unreadable one, which is left in place.
    pub fn restore(store: Arc<dyn KeyedStore>) -> Self {
        let identity = match store.load::<Identity>(keys::SESSION) {
            Ok(identity) => identity,
            Err(err) => {
                error!("Could not restore session: {err:#}");
                None
            }
        };
        match &identity {
            Some(identity) => info!("Restored session for {}", identity.email),
            None => info!("No stored session; starting anonymous"),
        }

        Self {
            store,
            identity,
            listeners: Listeners::new(),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn on_change<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn register(&mut self, email: &str, password: &str, name: &str) -> Result<Identity> {
        if is_blank(email) || is_blank(password) || is_blank(name) {
            return Err(SessionError::Validation("All fields are required".into()));
        }

        let mut credentials = self.credentials()?;
        if credentials.iter().any(|c| c.email == email) {
            return Err(SessionError::Conflict {
                email: email.to_string(),
            });
        }

        let credential = Credential::new(email, password, name);
        let identity = credential.identity();
        credentials.push(credential);
        self.store
            .save(keys::CREDENTIALS, &credentials)
            .map_err(SessionError::storage)?;

        info!("Registered {} ({})", identity.email, identity.id);
        self.sign_in(identity)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<Identity> {
        if is_blank(email) || is_blank(password) {
            return Err(SessionError::Validation(
                "Email and password are required".into(),
            ));
        }

        let identity = self
            .credentials()?
            .iter()
            .find(|c| c.email == email && c.password == password)
            .map(Credential::identity)
            .ok_or_else(|| {
                warn!("Rejected sign-in for {email}");
                SessionError::Auth
            })?;

        self.sign_in(identity)
    }

    /// Clears the session pointer. Owned data stays in the store.
    pub fn logout(&mut self) {
        if let Err(err) = self.store.remove(keys::SESSION) {
            error!("Failed to clear session pointer: {err:#}");
        }

        if let Some(previous) = self.identity.take() {
            info!("Signed out {}", previous.email);
            self.listeners.emit(&SessionEvent::SignedOut);
        }
    }

    fn sign_in(&mut self, identity: Identity) -> Result<Identity> {
        self.store
            .save(keys::SESSION, &identity)
            .map_err(SessionError::storage)?;

        info!("Signed in {}", identity.email);
        self.identity = Some(identity.clone());
        self.listeners.emit(&SessionEvent::SignedIn(identity.clone()));
        Ok(identity)
    }

    /// The registered accounts. A failed read is an error, never an empty
    /// list, since `register` writes the list back whole.
    fn credentials(&self) -> Result<Vec<Credential>> {
        let credentials = self
            .store
            .load::<Vec<Credential>>(keys::CREDENTIALS)
            .map_err(SessionError::storage)?;
        Ok(credentials.unwrap_or_default())
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{test_support::FlakyStore, MemoryStore};
    use std::sync::Mutex;

    fn store() -> Arc<dyn KeyedStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn register_then_login_returns_same_identity_without_password() {
        let store = store();
        let mut session = SessionStore::restore(Arc::clone(&store));

        let registered = session
            .register("ada@example.com", "hunter2", "Ada")
            .unwrap();
        session.logout();
        let logged_in = session.login("ada@example.com", "hunter2").unwrap();

        assert_eq!(registered, logged_in);
        assert_eq!(logged_in.email, "ada@example.com");
        assert_eq!(logged_in.name, "Ada");

        let pointer = store.get(keys::SESSION).unwrap().unwrap();
        assert!(!pointer.contains("hunter2"));
        assert!(!pointer.contains("password"));
    }

    #[test]
    fn duplicate_email_conflicts_regardless_of_other_fields() {
        let mut session = SessionStore::restore(store());
        session.register("ada@example.com", "one", "Ada").unwrap();

        let err = session
            .register("ada@example.com", "two", "Someone Else")
            .unwrap_err();

        assert_eq!(
            err,
            SessionError::Conflict {
                email: "ada@example.com".into()
            }
        );
    }

    #[test]
    fn wrong_password_is_auth_error() {
        let mut session = SessionStore::restore(store());
        session.register("ada@example.com", "right", "Ada").unwrap();
        session.logout();

        assert_eq!(
            session.login("ada@example.com", "wrong").unwrap_err(),
            SessionError::Auth
        );
        assert_eq!(
            session.login("nobody@example.com", "right").unwrap_err(),
            SessionError::Auth
        );
        assert!(!session.is_authenticated());
    }

    #[test]
    fn blank_fields_are_validation_errors() {
        let mut session = SessionStore::restore(store());

        assert!(matches!(
            session.register("", "pw", "Ada"),
            Err(SessionError::Validation(_))
        ));
        assert!(matches!(
            session.register("ada@example.com", "pw", "  "),
            Err(SessionError::Validation(_))
        ));
        assert!(matches!(
            session.login("ada@example.com", ""),
            Err(SessionError::Validation(_))
        ));
    }

    #[test]
    fn restore_picks_up_pointer_and_heals_corruption() {
        let store = store();
        {
            let mut session = SessionStore::restore(Arc::clone(&store));
            session.register("ada@example.com", "pw", "Ada").unwrap();
        }

        let restored = SessionStore::restore(Arc::clone(&store));
        assert_eq!(
            restored.identity().map(|i| i.email.as_str()),
            Some("ada@example.com")
        );

        store.set(keys::SESSION, "{broken").unwrap();
        let healed = SessionStore::restore(Arc::clone(&store));
        assert!(!healed.is_authenticated());
        assert_eq!(store.get(keys::SESSION).unwrap(), None);
    }

    #[test]
    fn logout_keeps_credentials_and_notifies() {
        let store = store();
        let mut session = SessionStore::restore(Arc::clone(&store));
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        session.on_change(move |event| sink.lock().unwrap().push(event.clone()));

        let identity = session.register("ada@example.com", "pw", "Ada").unwrap();
        session.logout();
        session.logout();

        assert_eq!(
            *events.lock().unwrap(),
            vec![SessionEvent::SignedIn(identity), SessionEvent::SignedOut]
        );
        assert!(store.get(keys::CREDENTIALS).unwrap().is_some());
    }

    #[test]
    fn unreadable_account_list_fails_register_without_overwriting() {
        let flaky = Arc::new(FlakyStore::new());
        let store: Arc<dyn KeyedStore> = flaky.clone();
        let mut session = SessionStore::restore(Arc::clone(&store));
        session.register("a@example.com", "pw", "A").unwrap();
        session.register("b@example.com", "pw", "B").unwrap();
        let accounts_before = store.get(keys::CREDENTIALS).unwrap();

        flaky.fail_next_reads(1);
        let err = session
            .register("c@example.com", "pw", "C")
            .unwrap_err();

        assert!(matches!(err, SessionError::Storage(_)));
        assert_eq!(store.get(keys::CREDENTIALS).unwrap(), accounts_before);
        assert_eq!(
            session.identity().map(|i| i.email.as_str()),
            Some("b@example.com")
        );

        session.logout();
        assert!(session.login("a@example.com", "pw").is_ok());
    }

    #[test]
    fn unreadable_account_list_is_not_reported_as_bad_credentials() {
        let flaky = Arc::new(FlakyStore::new());
        let mut session = SessionStore::restore(flaky.clone());
        session.register("a@example.com", "pw", "A").unwrap();
        session.logout();

        flaky.fail_next_reads(1);

        assert!(matches!(
            session.login("a@example.com", "pw"),
            Err(SessionError::Storage(_))
        ));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn unreadable_pointer_starts_anonymous_and_keeps_it() {
        let flaky = Arc::new(FlakyStore::new());
        {
            let mut session = SessionStore::restore(flaky.clone());
            session.register("a@example.com", "pw", "A").unwrap();
        }

        flaky.fail_next_reads(1);
        let session = SessionStore::restore(flaky.clone());

        assert!(!session.is_authenticated());
        assert!(flaky.keys().contains(&keys::SESSION.to_string()));
    }
}
