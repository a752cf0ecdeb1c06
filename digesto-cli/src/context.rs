//! Command context
//!
//! Bundles configuration, the persisted session and the API client, and runs
//! the view guard before a command touches the API.

use anyhow::{Result, anyhow};
use chrono::Utc;
use digesto_client::{ClientError, DigestoClient, FileSessionStore, SessionStore};
use digesto_core::auth::{Decision, Session, View, authorize};
use tracing::{info, warn};

use crate::config::Config;

pub struct Context {
    pub client: DigestoClient,
    pub session: Option<Session>,
    store: FileSessionStore,
}

impl Context {
    /// Load the stored session and build a client carrying its token
    pub fn load(config: &Config) -> Result<Self> {
        let store = config.session_store()?;
        let session = store.load()?;

        let mut client = config.client()?;
        if let Some(session) = &session {
            client.set_token(Some(session.token.clone()));
        }

        Ok(Self {
            client,
            session,
            store,
        })
    }

    /// Run the guard for `view`
    ///
    /// An expired session is discarded on the way.
    pub fn open(&mut self, view: View) -> Result<()> {
        let now = Utc::now();
        if self.session.as_ref().is_some_and(|s| s.is_expired(now)) {
            info!("Stored session expired, discarding it");
            self.discard_session()?;
        }

        match authorize(self.session.as_ref(), view, now) {
            Decision::Allow => Ok(()),
            Decision::RedirectToLogin => Err(anyhow!(
                "You must log in first: digesto login --email <EMAIL>"
            )),
            Decision::Forbidden => {
                let role = self
                    .session
                    .as_ref()
                    .map(|s| s.role_name.clone())
                    .unwrap_or_default();
                Err(anyhow!("Your role ({}) cannot access this view.", role))
            }
        }
    }

    pub fn store_session(&mut self, session: Session) -> Result<()> {
        self.store.save(&session)?;
        self.client.set_token(Some(session.token.clone()));
        self.session = Some(session);
        Ok(())
    }

    pub fn discard_session(&mut self) -> Result<()> {
        self.store.clear()?;
        self.client.set_token(None);
        self.session = None;
        Ok(())
    }

    /// Turn an API error into the message shown to the user
    ///
    /// A 401 means the server no longer accepts the token, so the stored
    /// session is dropped as well.
    pub fn api_error(&mut self, err: ClientError) -> anyhow::Error {
        if err.is_unauthorized() && self.session.is_some() {
            warn!("Session rejected by the server: {}", err);
            if let Err(e) = self.discard_session() {
                warn!("Failed to clear session: {}", e);
            }
        }
        anyhow!(err.user_message())
    }
}
