use std::sync::Arc;

use coursehub_store::memory::{MemoryDocumentStore, MemoryIdentityStore, MemoryObjectStorage};
use coursehub_store::ports::{
    CourseStore, EnrollmentStore, IdentityStore, ObjectStorage, ProfileStore,
};
use coursehub_store::postgres::DbPool;
use coursehub_store::repositories::CourseRepo;
use coursehub_store::session::{SessionContext, SessionStores};
use mockable::Clock;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the stores sit behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub courses: CourseRepo,
    pub sessions: SessionStores,
    /// Present when the stores are backed by PostgreSQL; probed by `/health`.
    pub pool: Option<DbPool>,
}

impl AppState {
    /// Wire the repository and session stores over one document store.
    pub fn with_stores<D>(
        config: ServerConfig,
        docs: Arc<D>,
        identities: Arc<dyn IdentityStore>,
        objects: Arc<dyn ObjectStorage>,
        clock: Arc<dyn Clock>,
        pool: Option<DbPool>,
    ) -> Self
    where
        D: CourseStore + EnrollmentStore + ProfileStore + 'static,
    {
        Self {
            config: Arc::new(config),
            courses: CourseRepo::new(docs.clone(), docs.clone(), objects.clone(), clock.clone()),
            sessions: SessionStores {
                identities,
                profiles: docs,
                objects,
                clock,
            },
            pool,
        }
    }

    /// State over fresh in-memory stores.
    pub fn in_memory(config: ServerConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_stores(
            config,
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(MemoryIdentityStore::new()),
            Arc::new(MemoryObjectStorage::new()),
            clock,
            None,
        )
    }

    /// A fresh, unresolved session context for one request.
    pub fn session(&self) -> SessionContext {
        SessionContext::new(self.sessions.clone())
    }
}
