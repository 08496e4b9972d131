//! Header navigation model
//!
//! Signed-out users get the auth pages; signed-in users get the app pages
//! and the settings menu. [`HeaderBinding`] keeps the model in step with the
//! session store.

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::SessionResult;
use crate::session::logout::Navigator;
use crate::session::state::{SessionStore, SubscriptionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub title: &'static str,
    pub path: &'static str,
}

impl Page {
    pub fn open(&self, navigator: &dyn Navigator) -> SessionResult<()> {
        navigator.navigate(self.path)
    }
}

pub const AUTHENTICATED_PAGES: &[Page] = &[Page {
    title: "Home",
    path: "/",
}];

pub const UNAUTHENTICATED_PAGES: &[Page] = &[
    Page {
        title: "Login",
        path: "/login",
    },
    Page {
        title: "Signup",
        path: "/signup",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderModel {
    pub pages: &'static [Page],
    pub show_settings: bool,
}

impl HeaderModel {
    pub fn for_session(authenticated: bool) -> Self {
        if authenticated {
            Self {
                pages: AUTHENTICATED_PAGES,
                show_settings: true,
            }
        } else {
            Self {
                pages: UNAUTHENTICATED_PAGES,
                show_settings: false,
            }
        }
    }
}

/// Header model that follows the session store until dropped
pub struct HeaderBinding {
    store: Arc<SessionStore>,
    model: Arc<Mutex<HeaderModel>>,
    subscription: SubscriptionId,
}

impl HeaderBinding {
    pub fn attach(store: Arc<SessionStore>) -> Self {
        let model = Arc::new(Mutex::new(HeaderModel::for_session(store.is_authenticated())));
        let target = Arc::clone(&model);
        let subscription = store.subscribe(move |authenticated| {
            *target.lock().unwrap_or_else(PoisonError::into_inner) =
                HeaderModel::for_session(authenticated);
        });
        Self {
            store,
            model,
            subscription,
        }
    }

    pub fn current(&self) -> HeaderModel {
        *self.model.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for HeaderBinding {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
    }
}
