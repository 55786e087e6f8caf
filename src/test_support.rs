//! Test doubles shared by unit tests across modules.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::error::IdentityError;
use crate::net::identity::IdentityBackend;
use crate::net::types::{Credentials, Identity, Registration};
use crate::state::notifications::{NotificationKind, NotificationSink};

pub fn identity(id: &str, first_name: Option<&str>) -> Identity {
    Identity {
        id: id.to_owned(),
        first_name: first_name.map(ToOwned::to_owned),
        last_name: None,
        email: format!("{id}@example.com"),
    }
}

pub fn credentials(email: &str) -> Credentials {
    Credentials { email: email.to_owned(), password: "hunter2".to_owned() }
}

pub fn registration(first_name: &str) -> Registration {
    Registration {
        first_name: first_name.to_owned(),
        last_name: "Lee".to_owned(),
        email: format!("{}@example.com", first_name.to_ascii_lowercase()),
        password: "hunter2".to_owned(),
        accepts_marketing: false,
    }
}

/// A scripted backend reply, either ready or released later through a gate.
pub enum Reply<T> {
    Now(Result<T, IdentityError>),
    Gated(oneshot::Receiver<Result<T, IdentityError>>),
}

pub type Gate<T> = oneshot::Sender<Result<T, IdentityError>>;

pub fn gated<T>() -> (Gate<T>, Reply<T>) {
    let (tx, rx) = oneshot::channel();
    (tx, Reply::Gated(rx))
}

async fn resolve<T>(reply: Option<Reply<T>>) -> Result<T, IdentityError> {
    match reply {
        Some(Reply::Now(result)) => result,
        Some(Reply::Gated(rx)) => rx
            .await
            .unwrap_or_else(|_| Err(IdentityError::Network("gate dropped".to_owned()))),
        None => Err(IdentityError::Unknown("unscripted call".to_owned())),
    }
}

/// Identity backend with scripted responses and call counters.
#[derive(Default)]
pub struct FakeBackend {
    pub logins: RefCell<VecDeque<Reply<Identity>>>,
    pub registrations: RefCell<VecDeque<Reply<Identity>>>,
    pub current_replies: RefCell<VecDeque<Reply<Option<Identity>>>>,
    pub persisted: RefCell<Option<Identity>>,
    pub current_error: RefCell<Option<IdentityError>>,
    pub logout_error: RefCell<Option<IdentityError>>,
    pub logout_calls: Cell<u32>,
    pub current_calls: Cell<u32>,
}

impl FakeBackend {
    pub fn script_login(&self, reply: Reply<Identity>) {
        self.logins.borrow_mut().push_back(reply);
    }

    pub fn script_register(&self, reply: Reply<Identity>) {
        self.registrations.borrow_mut().push_back(reply);
    }

    /// Override the next `current_identity` read; unscripted reads use `persisted`.
    pub fn script_current(&self, reply: Reply<Option<Identity>>) {
        self.current_replies.borrow_mut().push_back(reply);
    }

    pub fn persist(&self, identity: Identity) {
        *self.persisted.borrow_mut() = Some(identity);
    }
}

#[async_trait(?Send)]
impl IdentityBackend for FakeBackend {
    async fn login(&self, _credentials: &Credentials) -> Result<Identity, IdentityError> {
        let reply = self.logins.borrow_mut().pop_front();
        let identity = resolve(reply).await?;
        *self.persisted.borrow_mut() = Some(identity.clone());
        Ok(identity)
    }

    async fn register(&self, _registration: &Registration) -> Result<Identity, IdentityError> {
        let reply = self.registrations.borrow_mut().pop_front();
        let identity = resolve(reply).await?;
        *self.persisted.borrow_mut() = Some(identity.clone());
        Ok(identity)
    }

    async fn logout(&self) -> Result<(), IdentityError> {
        self.logout_calls.set(self.logout_calls.get() + 1);
        *self.persisted.borrow_mut() = None;
        match self.logout_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn current_identity(&self) -> Result<Option<Identity>, IdentityError> {
        self.current_calls.set(self.current_calls.get() + 1);
        let scripted = self.current_replies.borrow_mut().pop_front();
        if scripted.is_some() {
            return resolve(scripted).await;
        }
        if let Some(err) = self.current_error.borrow().clone() {
            return Err(err);
        }
        Ok(self.persisted.borrow().clone())
    }

    fn is_logged_in(&self) -> bool {
        self.persisted.borrow().is_some()
    }
}

/// Notification sink that records what was pushed.
#[derive(Default)]
pub struct RecordingSink {
    pub pushed: RefCell<Vec<(String, NotificationKind)>>,
}

impl RecordingSink {
    pub fn count(&self, kind: NotificationKind) -> usize {
        self.pushed.borrow().iter().filter(|(_, k)| *k == kind).count()
    }

    pub fn messages(&self) -> Vec<String> {
        self.pushed.borrow().iter().map(|(m, _)| m.clone()).collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, message: &str, kind: NotificationKind) -> String {
        self.pushed.borrow_mut().push((message.to_owned(), kind));
        uuid::Uuid::new_v4().to_string()
    }
}
