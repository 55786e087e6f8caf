//! Command channel between UI forms and the session store.
//!
//! ARCHITECTURE
//! ============
//! Leptos contexts must be `Send + Sync`, but the session store is a
//! single-threaded `Rc` graph. Forms therefore hold a `SessionClient` (a
//! cloneable channel sender) and the app root runs `serve` on a local task.
//! Each command runs concurrently with the others, so overlapping submissions
//! reach the store's ticket ordering instead of being serialized here.

#[cfg(test)]
#[path = "session_client_test.rs"]
mod session_client_test;

use std::rc::Rc;

use futures::StreamExt;
use futures::channel::{mpsc, oneshot};

use super::types::{Credentials, Identity, Registration};
use crate::error::SessionError;
use crate::state::session::SessionStore;

type Reply<T> = oneshot::Sender<T>;

/// A request for the session store.
#[derive(Debug)]
pub enum SessionCommand {
    Login { credentials: Credentials, reply: Reply<Result<Identity, SessionError>> },
    Register { registration: Registration, reply: Reply<Result<Identity, SessionError>> },
    Logout { reply: Reply<()> },
}

/// Handle used by forms and buttons to reach the session store.
#[derive(Clone, Debug)]
pub struct SessionClient {
    tx: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionClient {
    /// Create a client and the receiver to pass to [`serve`].
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionCommand>) {
        let (tx, rx) = mpsc::unbounded();
        (Self { tx }, rx)
    }

    /// # Errors
    ///
    /// The store's login error, or `SessionError::Unavailable` when no
    /// session loop is running.
    pub async fn login(&self, credentials: Credentials) -> Result<Identity, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Login { credentials, reply })?;
        rx.await.map_err(|_| SessionError::Unavailable)?
    }

    /// # Errors
    ///
    /// The store's registration error, or `SessionError::Unavailable`.
    pub async fn register(&self, registration: Registration) -> Result<Identity, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Register { registration, reply })?;
        rx.await.map_err(|_| SessionError::Unavailable)?
    }

    /// # Errors
    ///
    /// `SessionError::Unavailable` when no session loop is running.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Logout { reply })?;
        rx.await.map_err(|_| SessionError::Unavailable)
    }

    fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.tx
            .unbounded_send(command)
            .map_err(|_| SessionError::Unavailable)
    }
}

/// Run commands against `store` until every client is dropped.
pub async fn serve(store: Rc<SessionStore>, commands: mpsc::UnboundedReceiver<SessionCommand>) {
    commands
        .for_each_concurrent(None, move |command| dispatch(Rc::clone(&store), command))
        .await;
    tracing::debug!("session command loop finished");
}

async fn dispatch(store: Rc<SessionStore>, command: SessionCommand) {
    // A dropped reply receiver means the form went away; nothing to report.
    match command {
        SessionCommand::Login { credentials, reply } => {
            let _ = reply.send(store.login(&credentials).await);
        }
        SessionCommand::Register { registration, reply } => {
            let _ = reply.send(store.register(&registration).await);
        }
        SessionCommand::Logout { reply } => {
            store.logout().await;
            let _ = reply.send(());
        }
    }
}
