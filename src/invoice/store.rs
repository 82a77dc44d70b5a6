//! In-memory session store.
//!
//! Sessions live in a moka cache and are evicted after sitting idle, which is
//! the only lifetime form state has.

use moka::future::Cache;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::session::InvoiceSession;

pub type SharedSession = Arc<Mutex<InvoiceSession>>;

#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, SharedSession>,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration, max_capacity: u64) -> Self {
        let sessions = Cache::builder()
            .time_to_idle(idle_timeout)
            .max_capacity(max_capacity)
            .build();
        Self { sessions }
    }

    /// Start a new session with the default form values.
    pub async fn create(&self) -> SharedSession {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(InvoiceSession::new(id)));
        self.sessions.insert(id, session.clone()).await;
        log::info!("Invoice session {} created", id);
        session
    }

    pub async fn get(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.get(id).await
    }

    pub async fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.remove(id).await.is_some();
        if removed {
            log::info!("Invoice session {} removed", id);
        }
        removed
    }
}
