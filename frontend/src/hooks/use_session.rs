use log::error;
use shared::AdminIdentity;
use yew::prelude::*;

use crate::session::{LocalStorageStore, Session, SessionManager};

/// What views see of the session through context.
#[derive(Clone, PartialEq)]
pub struct SessionContext {
    pub session: Session,
    pub sign_in: Callback<AdminIdentity>,
    pub sign_out: Callback<()>,
}

/// Own the session for the whole app. Call once, in the root component.
#[hook]
pub fn use_session_manager(storage_key: &str) -> SessionContext {
    let storage_key = storage_key.to_string();
    let manager = use_mut_ref(move || SessionManager::restore(LocalStorageStore::new(storage_key)));
    let update = use_force_update();

    let sign_in = {
        let manager = manager.clone();
        let update = update.clone();
        use_callback((), move |identity: AdminIdentity, _| {
            if let Err(e) = manager.borrow_mut().sign_in(identity) {
                error!(target: "session", "could not start session: {}", e);
                return;
            }
            update.force_update();
        })
    };

    let sign_out = {
        let manager = manager.clone();
        use_callback((), move |_: (), _| {
            manager.borrow_mut().sign_out();
            update.force_update();
        })
    };

    let session = manager.borrow().session().clone();

    SessionContext {
        session,
        sign_in,
        sign_out,
    }
}

#[hook]
pub fn use_session() -> Option<SessionContext> {
    use_context::<SessionContext>()
}
