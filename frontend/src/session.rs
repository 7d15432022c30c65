//! The signed-in administrator, as an explicit object.
//!
//! A [`SessionManager`] is created once when the app mounts ([`SessionManager::restore`]),
//! activated after a successful login ([`SessionManager::sign_in`]) and torn down on
//! logout ([`SessionManager::sign_out`]). Views receive the current [`Session`] through
//! context instead of reading browser storage themselves.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use gloo::storage::errors::StorageError;
use gloo::storage::{LocalStorage, Storage};
use log::{info, warn};
use shared::{AdminIdentity, LoginRequest};

use crate::error::{GatewayError, SessionError};

const LOG_TARGET: &str = "session";

/// Backend login for administrators.
#[async_trait(?Send)]
pub trait AdminAuth {
    async fn admin_login(&self, request: &LoginRequest) -> Result<AdminIdentity, GatewayError>;
}

/// Where the signed-in identity survives page reloads.
pub trait SessionStore {
    /// `Ok(None)` when nobody is signed in; `Err` when stored data is unreadable.
    fn load(&self) -> Result<Option<AdminIdentity>, SessionError>;
    fn save(&self, identity: &AdminIdentity) -> Result<(), SessionError>;
    fn clear(&self);
}

/// Browser local storage, one JSON entry under `key`
#[derive(Debug, Clone, PartialEq)]
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl SessionStore for LocalStorageStore {
    fn load(&self) -> Result<Option<AdminIdentity>, SessionError> {
        match LocalStorage::get::<AdminIdentity>(&self.key) {
            Ok(identity) => Ok(Some(identity)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(e) => Err(SessionError::Corrupt(e.to_string())),
        }
    }

    fn save(&self, identity: &AdminIdentity) -> Result<(), SessionError> {
        LocalStorage::set(&self.key, identity).map_err(|e| SessionError::Storage(e.to_string()))
    }

    fn clear(&self) {
        LocalStorage::delete(&self.key);
    }
}

/// In-process store holding the raw JSON, like local storage would.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    raw: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Rc::new(RefCell::new(Some(raw.into()))),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<AdminIdentity>, SessionError> {
        match self.raw.borrow().as_deref() {
            None => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| SessionError::Corrupt(e.to_string())),
        }
    }

    fn save(&self, identity: &AdminIdentity) -> Result<(), SessionError> {
        let raw = serde_json::to_string(identity).map_err(|e| SessionError::Storage(e.to_string()))?;
        *self.raw.borrow_mut() = Some(raw);
        Ok(())
    }

    fn clear(&self) {
        *self.raw.borrow_mut() = None;
    }
}

/// Who is signed in right now
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    identity: Option<AdminIdentity>,
}

impl Session {
    pub fn identity(&self) -> Option<&AdminIdentity> {
        self.identity.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }
}

pub struct SessionManager<S: SessionStore> {
    store: S,
    session: Session,
}

impl<S: SessionStore> SessionManager<S> {
    /// Pick up a session persisted by an earlier visit. Unreadable data is discarded.
    pub fn restore(store: S) -> Self {
        let identity = match store.load() {
            Ok(identity) => identity,
            Err(e) => {
                warn!(target: LOG_TARGET, "discarding stored session: {}", e);
                store.clear();
                None
            }
        };
        if let Some(admin) = &identity {
            info!(target: LOG_TARGET, "restored session for {}", admin.display_name());
        }

        Self {
            store,
            session: Session { identity },
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn sign_in(&mut self, identity: AdminIdentity) -> Result<&Session, SessionError> {
        self.store.save(&identity)?;
        info!(target: LOG_TARGET, "signed in as {}", identity.display_name());
        self.session = Session {
            identity: Some(identity),
        };
        Ok(&self.session)
    }

    pub fn sign_out(&mut self) {
        self.store.clear();
        self.session = Session::default();
        info!(target: LOG_TARGET, "signed out");
    }
}

/// Messages for an incomplete login form; empty when it can be submitted.
pub fn validate_login(request: &LoginRequest) -> Vec<&'static str> {
    let mut errors = Vec::new();
    if request.identifier.trim().is_empty() {
        errors.push("Email or phone number is required");
    }
    if request.password.is_empty() {
        errors.push("Password is required");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AdminIdentity {
        AdminIdentity {
            id: "65a1".to_string(),
            name: "Store Admin".to_string(),
            email: "admin@example.com".to_string(),
            phone: String::new(),
        }
    }

    #[test]
    fn test_restore_without_stored_identity() {
        let manager = SessionManager::restore(MemoryStore::default());
        assert!(!manager.session().is_signed_in());
    }

    #[test]
    fn test_sign_in_persists_and_restores() {
        let store = MemoryStore::default();
        let mut manager = SessionManager::restore(store.clone());

        let session = manager.sign_in(admin()).unwrap();
        assert_eq!(session.identity(), Some(&admin()));

        let reloaded = SessionManager::restore(store);
        assert_eq!(reloaded.session().identity().unwrap().name, "Store Admin");
    }

    #[test]
    fn test_sign_out_clears_store() {
        let store = MemoryStore::default();
        let mut manager = SessionManager::restore(store.clone());
        manager.sign_in(admin()).unwrap();

        manager.sign_out();

        assert!(!manager.session().is_signed_in());
        assert_eq!(store.raw(), None);
    }

    #[test]
    fn test_corrupt_storage_restores_signed_out() {
        let store = MemoryStore::with_raw("{not json");
        let manager = SessionManager::restore(store.clone());

        assert!(!manager.session().is_signed_in());
        assert_eq!(store.raw(), None);
    }

    #[test]
    fn test_backend_shaped_identity_restores() {
        let store = MemoryStore::with_raw(r#"{"_id":"1","name":"Owner","role":"admin"}"#);
        let manager = SessionManager::restore(store);
        assert_eq!(manager.session().identity().unwrap().display_name(), "Owner");
    }

    #[test]
    fn test_validate_login() {
        let empty = LoginRequest::default();
        assert_eq!(
            validate_login(&empty),
            vec!["Email or phone number is required", "Password is required"]
        );

        let filled = LoginRequest {
            identifier: "01700000000".to_string(),
            password: "secret".to_string(),
        };
        assert!(validate_login(&filled).is_empty());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_local_storage_round_trip() {
        let store = LocalStorageStore::new("session-test");
        store.clear();
        assert_eq!(store.load(), Ok(None));

        let admin = AdminIdentity {
            id: "1".to_string(),
            name: "Owner".to_string(),
            ..AdminIdentity::default()
        };
        store.save(&admin).unwrap();
        assert_eq!(store.load(), Ok(Some(admin)));

        store.clear();
        assert_eq!(store.load(), Ok(None));
    }
}
