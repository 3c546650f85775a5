//! Client sessions - one gate and one pair of coordinators per browser.
//!
//! The service hosts many browser sessions at once. Each gets its own
//! [`SessionGate`] and its own report and post coordinators, so the
//! one-identity and single-in-flight guarantees hold per browser and
//! separate browsers never interact.
//!
//! Resolving an unknown or missing id yields a transient session that is not
//! stored. Only [`ClientSessionRegistry::register`] stores a session, and it
//! refuses once the registry is full of sessions that are still active.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::handlers::{PostSubmission, ReportSubmission};
use super::{SessionGate, SubmissionCoordinator};
use crate::domain::foundation::{ClientSessionId, Timestamp};
use crate::ports::{DocumentStore, IdentityProvider};

/// Default idle time after which a session is evicted.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Default upper bound on stored sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// The registry is full of active sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("client session capacity of {max} reached")]
pub struct SessionCapacityError {
    pub max: usize,
}

/// State of one browser session.
pub struct ClientSession {
    id: ClientSessionId,
    gate: Arc<SessionGate>,
    reports: SubmissionCoordinator<ReportSubmission>,
    posts: SubmissionCoordinator<PostSubmission>,
    last_seen_secs: AtomicU64,
    registered: AtomicBool,
}

impl ClientSession {
    fn new(id: ClientSessionId, services: &SessionServices) -> Self {
        let gate = Arc::new(SessionGate::new(Arc::clone(&services.identity)));
        Self {
            id,
            reports: SubmissionCoordinator::new(
                ReportSubmission::new(Arc::clone(&services.store)),
                Arc::clone(&gate),
            ),
            posts: SubmissionCoordinator::new(
                PostSubmission::new(Arc::clone(&services.store)),
                Arc::clone(&gate),
            ),
            gate,
            last_seen_secs: AtomicU64::new(Timestamp::now().as_unix_secs()),
            registered: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> ClientSessionId {
        self.id
    }

    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    pub fn reports(&self) -> &SubmissionCoordinator<ReportSubmission> {
        &self.reports
    }

    pub fn posts(&self) -> &SubmissionCoordinator<PostSubmission> {
        &self.posts
    }

    /// Marks the session as used now.
    pub fn touch(&self) {
        self.last_seen_secs
            .store(Timestamp::now().as_unix_secs(), Ordering::Relaxed);
    }

    pub fn last_seen(&self) -> Timestamp {
        Timestamp::from_unix_secs(self.last_seen_secs.load(Ordering::Relaxed))
    }

    /// Whether the session is stored in the registry.
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    fn is_idle_since(&self, cutoff: Timestamp) -> bool {
        self.last_seen().is_before(&cutoff)
    }
}

/// Collaborators every new client session is wired with.
#[derive(Clone)]
pub struct SessionServices {
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn DocumentStore>,
}

/// All live client sessions, keyed by id.
pub struct ClientSessionRegistry {
    sessions: RwLock<HashMap<ClientSessionId, Arc<ClientSession>>>,
    services: SessionServices,
    ttl: Duration,
    max_sessions: usize,
}

impl ClientSessionRegistry {
    pub fn new(services: SessionServices, ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            services,
            ttl,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions;
        self
    }

    /// Returns the stored session for `id`, or a transient session if `id` is
    /// absent or unknown. Transient sessions are not stored until registered.
    pub async fn resolve(&self, id: Option<ClientSessionId>) -> Arc<ClientSession> {
        if let Some(id) = id {
            if let Some(session) = self.sessions.read().await.get(&id) {
                session.touch();
                return Arc::clone(session);
            }
        }

        Arc::new(ClientSession::new(ClientSessionId::new(), &self.services))
    }

    /// Stores `session` so later requests can resolve it by id.
    ///
    /// At capacity, idle sessions are evicted first; if none are idle the
    /// session is refused. Registering a stored session is a no-op.
    pub async fn register(&self, session: &Arc<ClientSession>) -> Result<(), SessionCapacityError> {
        if session.is_registered() {
            return Ok(());
        }

        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            let evicted = Self::evict_idle(&mut sessions, self.cutoff(Timestamp::now()));
            if evicted > 0 {
                tracing::info!(evicted, "Evicted idle client sessions to make room");
            }
        }
        if sessions.len() >= self.max_sessions {
            tracing::warn!(max = self.max_sessions, "Client session capacity reached");
            return Err(SessionCapacityError {
                max: self.max_sessions,
            });
        }

        session.touch();
        sessions.insert(session.id(), Arc::clone(session));
        session.registered.store(true, Ordering::Release);
        tracing::debug!(client_session = %session.id(), "Client session registered");
        Ok(())
    }

    /// Looks up a live session without creating one.
    pub async fn get(&self, id: &ClientSessionId) -> Option<Arc<ClientSession>> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Evicts sessions idle for longer than the TTL as of `now`.
    ///
    /// Returns the number of evicted sessions.
    pub async fn sweep(&self, now: Timestamp) -> usize {
        let mut sessions = self.sessions.write().await;
        let evicted = Self::evict_idle(&mut sessions, self.cutoff(now));
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "Evicted idle client sessions");
        }
        evicted
    }

    fn cutoff(&self, now: Timestamp) -> Timestamp {
        Timestamp::from_unix_secs(now.as_unix_secs().saturating_sub(self.ttl.as_secs()))
    }

    fn evict_idle(
        sessions: &mut HashMap<ClientSessionId, Arc<ClientSession>>,
        cutoff: Timestamp,
    ) -> usize {
        let before = sessions.len();
        sessions.retain(|_, session| {
            let keep = !session.is_idle_since(cutoff);
            if !keep {
                session.registered.store(false, Ordering::Release);
            }
            keep
        });
        before - sessions.len()
    }

    /// Spawns a background task sweeping idle sessions every `interval`.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                registry.sweep(Timestamp::now()).await;
            }
        })
    }
}
