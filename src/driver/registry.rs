use crate::driver::config::SessionOptions;
use crate::driver::session::DriverSession;
use crate::error::{AutomationError, Result};
use crate::locator::Platform;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Summary of one registered session
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub platform: Platform,
}

/// Holds every live driver session for one server process, keyed by a
/// generated id. Shared freely; the lock only guards the map, never a
/// WebDriver round-trip.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<DriverSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a new session and register it, returning its id.
    pub async fn create(&self, options: &SessionOptions) -> Result<String> {
        let session = DriverSession::connect(options).await?;
        let session_id = Uuid::new_v4().to_string();
        self.lock_write()?
            .insert(session_id.clone(), Arc::new(session));
        Ok(session_id)
    }

    /// Look up a session. With no id, resolves only when exactly one session
    /// is registered; anything else needs the caller to disambiguate.
    pub fn get(&self, session_id: Option<&str>) -> Result<Arc<DriverSession>> {
        let sessions = self.lock_read()?;
        match session_id {
            Some(id) => sessions
                .get(id)
                .cloned()
                .ok_or_else(|| AutomationError::SessionNotFound(id.to_string())),
            None => match sessions.len() {
                0 => Err(AutomationError::SessionNotFound(
                    "no active sessions".to_string(),
                )),
                1 => Ok(sessions.values().next().cloned().ok_or_else(|| {
                    AutomationError::SessionNotFound("no active sessions".to_string())
                })?),
                n => Err(AutomationError::InvalidParams(format!(
                    "{} sessions are active, session_id is required",
                    n
                ))),
            },
        }
    }

    /// Remove a session from the registry and end it on the server.
    pub async fn dispose(&self, session_id: &str) -> Result<()> {
        let session = self
            .lock_write()?
            .remove(session_id)
            .ok_or_else(|| AutomationError::SessionNotFound(session_id.to_string()))?;
        // Already deregistered; a close failure only means the server-side
        // session will be reaped by its own timeout.
        if let Err(e) = session.close().await {
            log::warn!("Failed to close session {}: {}", session_id, e);
        }
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<SessionInfo>> {
        let sessions = self.lock_read()?;
        let mut infos: Vec<SessionInfo> = sessions
            .iter()
            .map(|(id, session)| SessionInfo {
                session_id: id.clone(),
                platform: session.platform(),
            })
            .collect();
        infos.sort_by(|a, b| a.session_id.cmp(&b.session_id));
        Ok(infos)
    }

    pub fn len(&self) -> usize {
        self.lock_read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, Arc<DriverSession>>>> {
        self.sessions
            .read()
            .map_err(|e| AutomationError::CommandFailed(format!("Session registry poisoned: {}", e)))
    }

    fn lock_write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<DriverSession>>>> {
        self.sessions
            .write()
            .map_err(|e| AutomationError::CommandFailed(format!("Session registry poisoned: {}", e)))
    }
}
