//! Mock identity provider for tests and local development.
//!
//! Mints `anon-1`, `anon-2`, ... and records how often it was asked, so tests
//! can assert the one-creation-per-session guarantee.
//!
//! # Example
//!
//! ```ignore
//! use safe_haven::adapters::auth::MockIdentityProvider;
//!
//! let provider = MockIdentityProvider::new()
//!     .with_delay(Duration::from_millis(50))
//!     .with_error(IdentityError::ProviderDisabled);
//!
//! assert!(provider.create_anonymous_identity().await.is_err());
//! provider.clear_error();
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::foundation::{Identity, IdentityError, IdentityId};
use crate::ports::IdentityProvider;

/// Mock identity provider.
#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    calls: AtomicUsize,
    minted: AtomicUsize,
    delay: Duration,
    /// Error returned by every call while set
    force_error: RwLock<Option<IdentityError>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Forces all calls to fail with `error`.
    pub fn with_error(self, error: IdentityError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Clears the forced error and returns to normal operation.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    /// Number of times `create_anonymous_identity` was called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn create_anonymous_identity(&self) -> Result<Identity, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        let n = self.minted.fetch_add(1, Ordering::SeqCst) + 1;
        let id = IdentityId::new(format!("anon-{}", n))
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;
        tracing::debug!(identity_id = %id, "Mock anonymous identity created");
        Ok(Identity::anonymous(id))
    }
}
