//! SessionGate - anonymous identity bootstrap for one client session.
//!
//! The gate owns the session's identity cell. Nothing else writes it; every
//! other component reads a snapshot with [`SessionGate::current`] or follows
//! changes through [`SessionGate::subscribe`].
//!
//! # Creation
//!
//! The identity provider is asked only when a write actually needs an
//! identity. Concurrent callers share one creation call: the first caller
//! starts it, later callers await the same shared future and receive the
//! same result, success or failure. A creation that has already failed is
//! never handed to a later caller; that caller starts a new one. Once an
//! identity is published the provider is never asked again for this session.

use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::{watch, Mutex};

use crate::domain::foundation::{Identity, IdentityError};
use crate::ports::IdentityProvider;

type PendingCreation = Shared<BoxFuture<'static, Result<Identity, IdentityError>>>;

/// Single-writer identity cell with lazy anonymous creation.
pub struct SessionGate {
    provider: Arc<dyn IdentityProvider>,
    cell: watch::Sender<Option<Identity>>,
    pending: Mutex<Option<PendingCreation>>,
}

impl SessionGate {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (cell, _) = watch::channel(None);
        Self {
            provider,
            cell,
            pending: Mutex::new(None),
        }
    }

    /// Snapshot of the current identity.
    pub fn current(&self) -> Option<Identity> {
        self.cell.borrow().clone()
    }

    /// Receiver notified whenever the identity changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.cell.subscribe()
    }

    /// Returns the current identity, creating an anonymous one if needed.
    pub async fn ensure_identity(&self) -> Result<Identity, IdentityError> {
        if let Some(identity) = self.current() {
            return Ok(identity);
        }

        let creation = {
            let mut pending = self.pending.lock().await;
            if let Some(identity) = self.current() {
                return Ok(identity);
            }
            match pending.as_ref() {
                Some(creation) if !matches!(creation.peek(), Some(Err(_))) => creation.clone(),
                _ => {
                    let provider = Arc::clone(&self.provider);
                    let creation = async move { provider.create_anonymous_identity().await }
                        .boxed()
                        .shared();
                    *pending = Some(creation.clone());
                    tracing::info!("Creating anonymous identity");
                    creation
                }
            }
        };

        let result = creation.clone().await;

        // Publish before releasing the slot so no caller can observe
        // "no identity and nothing pending" after a success.
        if let Ok(identity) = &result {
            self.publish(identity.clone());
        }
        {
            let mut pending = self.pending.lock().await;
            if pending.as_ref().is_some_and(|p| p.ptr_eq(&creation)) {
                *pending = None;
            }
        }

        if let Err(err) = &result {
            tracing::warn!(error = %err, "Anonymous identity creation failed");
        }
        result
    }

    /// Ensures an identity, then runs `intent` exactly once with it.
    ///
    /// If no identity can be established the intent is dropped unrun.
    pub async fn run_gated<F, Fut, T, E>(&self, intent: F) -> Result<T, E>
    where
        F: FnOnce(Identity) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<IdentityError>,
    {
        let identity = self.ensure_identity().await?;
        intent(identity).await
    }

    fn publish(&self, identity: Identity) {
        self.cell.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            tracing::info!(identity_id = %identity.id, "Anonymous identity established");
            *current = Some(identity);
            true
        });
    }
}
