//! In-memory wizard session store shared across handlers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::wizard::session::{GenerationTicket, SessionView, WizardSession};

/// Sessions untouched for this long are evicted.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Sessions keyed by id. Cheap to clone; every clone shares the same map.
///
/// Closures passed to `update` run under the write lock and must not await,
/// which keeps the remote generation call outside the lock.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, WizardSession>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Creates a session, evicting idle ones first.
    pub async fn create(&self) -> SessionView {
        let session = WizardSession::new();
        let view = session.view();

        let mut sessions = self.sessions.write().await;
        let evicted = evict_idle(&mut sessions, self.ttl);
        if evicted > 0 {
            info!("Evicted {evicted} idle wizard sessions");
        }
        sessions.insert(session.id(), session);
        view
    }

    pub async fn view(&self, id: Uuid) -> Result<SessionView, AppError> {
        let sessions = self.sessions.read().await;
        sessions.get(&id).map(WizardSession::view).ok_or_else(|| not_found(id))
    }

    /// Runs `f` against one session under the write lock.
    pub async fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut WizardSession) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        f(session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Drops sessions idle for at least `ttl`. Sessions with a generation in
/// flight are kept so the result still has somewhere to land.
fn evict_idle(sessions: &mut HashMap<Uuid, WizardSession>, ttl: Duration) -> usize {
    let now = Utc::now();
    let before = sessions.len();
    sessions.retain(|_, session| {
        let idle = (now - session.updated_at())
            .to_std()
            .map(|idle| idle >= ttl)
            .unwrap_or(false);
        session.is_generating() || !idle
    });
    before - sessions.len()
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

/// Releases a started generation if its handler is dropped before completing,
/// e.g. when the client disconnects mid-request.
pub struct PendingGeneration {
    store: SessionStore,
    id: Uuid,
    ticket: Option<GenerationTicket>,
}

impl PendingGeneration {
    pub fn new(store: SessionStore, id: Uuid, ticket: GenerationTicket) -> Self {
        Self {
            store,
            id,
            ticket: Some(ticket),
        }
    }

    /// The generation was completed (or discarded) normally.
    pub fn disarm(mut self) {
        self.ticket = None;
    }
}

impl Drop for PendingGeneration {
    fn drop(&mut self) {
        let Some(ticket) = self.ticket.take() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let store = self.store.clone();
        let id = self.id;
        runtime.spawn(async move {
            let released = store
                .update(id, |s| Ok(s.abandon_generation(ticket)))
                .await
                .unwrap_or(false);
            if released {
                debug!("Session {id}: released generation abandoned by its caller");
            }
        });
    }
}
