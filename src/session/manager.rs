use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ClientCommand, Session, SessionError, SessionId, SessionSettings, SessionSnapshot};
use crate::catalog::Catalog;
use crate::content::{ContentProvider, load_feed};

/// Owns every live session. Handlers get sessions from here instead of from
/// any process-wide global.
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
    catalog: Arc<Catalog>,
    provider: Arc<dyn ContentProvider>,
    settings: SessionSettings,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(
        catalog: Arc<Catalog>,
        provider: Arc<dyn ContentProvider>,
        settings: SessionSettings,
    ) -> Self {
        SessionManager {
            sessions: RwLock::new(HashMap::new()),
            catalog,
            provider,
            settings,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Creates a session and starts its one-shot feed fetch in the background.
    pub async fn create_session(&self) -> Result<Arc<Session>, SessionError> {
        let session_id = Uuid::new_v4();
        let session = Session::new(session_id, self.catalog.clone(), self.settings.clone())?;
        self.sessions
            .write()
            .await
            .insert(session_id, session.clone());
        tracing::info!(%session_id, "Session created");

        let provider = self.provider.clone();
        let loading = Arc::downgrade(&session);
        tokio::spawn(async move {
            let videos = load_feed(provider.as_ref()).await;
            match loading.upgrade() {
                Some(session) => session.finish_loading(videos).await,
                None => tracing::debug!(%session_id, "Session gone before feed loaded"),
            }
        });

        Ok(session)
    }

    pub async fn get_session(&self, session_id: &SessionId) -> Result<Arc<Session>, SessionError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::SessionNotFound(session_id.to_string()))
    }

    /// Returns `true` if the session existed.
    pub async fn remove_session(&self, session_id: &SessionId) -> bool {
        let removed = self.sessions.write().await.remove(session_id);
        match removed {
            Some(session) => {
                session.shutdown().await;
                tracing::info!(%session_id, "Session removed");
                true
            }
            None => false,
        }
    }

    pub async fn handle_command(
        &self,
        session_id: &SessionId,
        command: ClientCommand,
    ) -> Result<(), SessionError> {
        let session = self.get_session(session_id).await?;
        tracing::debug!(%session_id, ?command, "Handling command");
        session.handle_command(command).await
    }

    pub async fn snapshot(&self, session_id: &SessionId) -> Result<SessionSnapshot, SessionError> {
        Ok(self.get_session(session_id).await?.snapshot().await)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn list_sessions(&self) -> Vec<SessionId> {
        self.sessions.read().await.keys().copied().collect()
    }

    /// Drops sessions nobody has commanded, polled or subscribed to for `idle_timeout`.
    pub async fn cleanup_idle_sessions(&self, idle_timeout: Duration) -> usize {
        let sessions: Vec<Arc<Session>> = self.sessions.read().await.values().cloned().collect();

        let mut idle = Vec::new();
        for session in sessions {
            if session.is_idle(idle_timeout).await {
                idle.push(session.id());
            }
        }

        for session_id in &idle {
            tracing::info!(%session_id, "Cleaning up idle session");
            self.remove_session(session_id).await;
        }
        idle.len()
    }
}
