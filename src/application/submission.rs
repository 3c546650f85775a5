//! SubmissionCoordinator - validate, gate, persist; one submission at a time.
//!
//! A coordinator drives one form (incident report or community post) for
//! one client session:
//!
//! 1. A submit while another is in flight is ignored, not queued.
//! 2. The form becomes the retained draft and is validated locally.
//! 3. The gate supplies an identity and the record is persisted under it.
//! 4. Success clears the draft; failure keeps it for a retry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{watch, Mutex};

use super::SessionGate;
use crate::domain::foundation::{DocumentId, FieldErrors, Identity};
use crate::domain::submission::{PersistenceError, SubmissionError, SubmissionStatus};

/// A kind of record that can be submitted through a coordinator.
#[async_trait]
pub trait Submission: Send + Sync {
    /// Raw form values as entered by the user.
    type Form: Clone + Send + Sync;

    /// Form after successful validation.
    type Valid: Send;

    /// Name used in logs.
    const KIND: &'static str;

    /// Validates the form without any I/O.
    fn validate(&self, form: &Self::Form) -> Result<Self::Valid, FieldErrors>;

    /// Writes the record owned by `owner`, returning its id.
    async fn persist(
        &self,
        valid: Self::Valid,
        owner: &Identity,
    ) -> Result<DocumentId, PersistenceError>;
}

/// What happened to one call to [`SubmissionCoordinator::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The record was persisted.
    Submitted { id: DocumentId, owner: Identity },
    /// Validation failed; nothing left the process.
    Rejected(FieldErrors),
    /// Another submission was still in flight.
    Ignored,
    /// Identity creation or persistence failed; the draft was kept.
    Failed(SubmissionError),
}

/// Serializes submissions of one form for one client session.
pub struct SubmissionCoordinator<S: Submission> {
    submission: S,
    gate: Arc<SessionGate>,
    in_flight: AtomicBool,
    draft: Mutex<Option<S::Form>>,
    status: watch::Sender<SubmissionStatus>,
}

impl<S: Submission> SubmissionCoordinator<S> {
    pub fn new(submission: S, gate: Arc<SessionGate>) -> Self {
        let (status, _) = watch::channel(SubmissionStatus::Idle);
        Self {
            submission,
            gate,
            in_flight: AtomicBool::new(false),
            draft: Mutex::new(None),
            status,
        }
    }

    /// Submits a form.
    pub async fn submit(&self, form: S::Form) -> SubmitOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(kind = S::KIND, "Submission already in flight, ignoring");
            return SubmitOutcome::Ignored;
        }
        let _guard = InFlightGuard {
            in_flight: &self.in_flight,
            status: &self.status,
        };

        *self.draft.lock().await = Some(form.clone());

        let valid = match self.submission.validate(&form) {
            Ok(valid) => valid,
            Err(errors) => {
                tracing::debug!(kind = S::KIND, fields = errors.len(), "Submission rejected");
                return SubmitOutcome::Rejected(errors);
            }
        };

        self.transition(SubmissionStatus::Submitting);

        let submission = &self.submission;
        let result = self
            .gate
            .run_gated(|owner| async move {
                let id = submission.persist(valid, &owner).await?;
                Ok::<_, SubmissionError>((id, owner))
            })
            .await;

        match result {
            Ok((id, owner)) => {
                *self.draft.lock().await = None;
                self.transition(SubmissionStatus::Succeeded);
                tracing::info!(kind = S::KIND, document_id = %id, "Submission persisted");
                SubmitOutcome::Submitted { id, owner }
            }
            Err(err) => {
                self.transition(SubmissionStatus::Failed);
                tracing::warn!(kind = S::KIND, error = %err, "Submission failed");
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Current status snapshot.
    pub fn status(&self) -> SubmissionStatus {
        *self.status.borrow()
    }

    /// Receiver notified on every status change.
    pub fn subscribe_status(&self) -> watch::Receiver<SubmissionStatus> {
        self.status.subscribe()
    }

    /// The form kept for retry, if any.
    pub async fn draft(&self) -> Option<S::Form> {
        self.draft.lock().await.clone()
    }

    fn transition(&self, target: SubmissionStatus) {
        self.status.send_if_modified(|current| match current.transition_to(target) {
            Ok(next) => {
                *current = next;
                true
            }
            Err(err) => {
                tracing::error!(kind = S::KIND, error = %err, "Invalid status transition");
                false
            }
        });
    }
}

/// Releases the in-flight flag, failing the status if the submit was dropped.
struct InFlightGuard<'a> {
    in_flight: &'a AtomicBool,
    status: &'a watch::Sender<SubmissionStatus>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.status.send_if_modified(|current| {
            if current.is_in_flight() {
                *current = SubmissionStatus::Failed;
                true
            } else {
                false
            }
        });
        self.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockIdentityProvider;
    use crate::domain::foundation::{IdentityError, ValidationError};
    use crate::ports::IdentityProvider;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;

    /// Minimal submission: a non-empty string, persisted after a delay.
    struct NoteSubmission {
        persisted: AtomicU32,
        delay: Duration,
        fail: AtomicBool,
    }

    impl NoteSubmission {
        fn new(delay: Duration) -> Self {
            Self {
                persisted: AtomicU32::new(0),
                delay,
                fail: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl Submission for NoteSubmission {
        type Form = String;
        type Valid = String;
        const KIND: &'static str = "note";

        fn validate(&self, form: &String) -> Result<String, FieldErrors> {
            if form.is_empty() {
                return Err(ValidationError::empty_field("note").into());
            }
            Ok(form.clone())
        }

        async fn persist(
            &self,
            _valid: String,
            _owner: &Identity,
        ) -> Result<DocumentId, PersistenceError> {
            tokio::time::sleep(self.delay).await;
            if self.fail.load(Ordering::SeqCst) {
                return Err(PersistenceError::unavailable("store offline"));
            }
            self.persisted.fetch_add(1, Ordering::SeqCst);
            Ok(DocumentId::generate())
        }
    }

    fn coordinator(
        provider: &Arc<MockIdentityProvider>,
        delay: Duration,
    ) -> SubmissionCoordinator<NoteSubmission> {
        let gate = Arc::new(SessionGate::new(
            Arc::clone(provider) as Arc<dyn IdentityProvider>
        ));
        SubmissionCoordinator::new(NoteSubmission::new(delay), gate)
    }

    #[tokio::test]
    async fn successful_submit_persists_and_clears_draft() {
        let provider = Arc::new(MockIdentityProvider::new());
        let coordinator = coordinator(&provider, Duration::ZERO);

        let outcome = coordinator.submit("hello".to_string()).await;

        assert!(matches!(outcome, SubmitOutcome::Submitted { .. }));
        assert_eq!(coordinator.status(), SubmissionStatus::Succeeded);
        assert_eq!(coordinator.draft().await, None);
        assert_eq!(coordinator.submission.persisted.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_form_never_touches_identity_or_store() {
        let provider = Arc::new(MockIdentityProvider::new());
        let coordinator = coordinator(&provider, Duration::ZERO);

        let outcome = coordinator.submit(String::new()).await;

        assert!(matches!(outcome, SubmitOutcome::Rejected(ref e) if e.contains("note")));
        assert_eq!(provider.call_count(), 0);
        assert_eq!(coordinator.submission.persisted.load(Ordering::SeqCst), 0);
        assert_eq!(coordinator.status(), SubmissionStatus::Idle);
        assert_eq!(coordinator.draft().await, Some(String::new()));
    }

    #[tokio::test]
    async fn double_submit_persists_exactly_once() {
        let provider = Arc::new(MockIdentityProvider::new());
        let coordinator = coordinator(&provider, Duration::from_millis(50));

        let (first, second) = tokio::join!(
            coordinator.submit("one".to_string()),
            coordinator.submit("two".to_string()),
        );

        let outcomes = [first, second];
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| matches!(o, SubmitOutcome::Submitted { .. }))
                .count(),
            1
        );
        assert!(outcomes.contains(&SubmitOutcome::Ignored));
        assert_eq!(coordinator.submission.persisted.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn identity_failure_keeps_draft_and_fails_status() {
        let provider =
            Arc::new(MockIdentityProvider::new().with_error(IdentityError::unavailable("down")));
        let coordinator = coordinator(&provider, Duration::ZERO);

        let outcome = coordinator.submit("keep me".to_string()).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed(SubmissionError::Identity(IdentityError::unavailable("down")))
        );
        assert_eq!(coordinator.status(), SubmissionStatus::Failed);
        assert_eq!(coordinator.draft().await.as_deref(), Some("keep me"));
        assert_eq!(coordinator.submission.persisted.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn persistence_failure_then_retry_succeeds() {
        let provider = Arc::new(MockIdentityProvider::new());
        let coordinator = coordinator(&provider, Duration::ZERO);
        coordinator.submission.fail.store(true, Ordering::SeqCst);

        let failed = coordinator.submit("retry me".to_string()).await;
        assert!(matches!(
            failed,
            SubmitOutcome::Failed(SubmissionError::Persistence(_))
        ));

        coordinator.submission.fail.store(false, Ordering::SeqCst);
        let retried = coordinator.submit("retry me".to_string()).await;

        assert!(matches!(retried, SubmitOutcome::Submitted { .. }));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn status_moves_through_submitting() {
        let provider = Arc::new(MockIdentityProvider::new());
        let coordinator = Arc::new(coordinator(&provider, Duration::from_millis(50)));
        let mut status = coordinator.subscribe_status();

        let task = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.submit("watch".to_string()).await })
        };

        status.changed().await.unwrap();
        assert_eq!(*status.borrow(), SubmissionStatus::Submitting);

        task.await.unwrap();
        assert_eq!(coordinator.status(), SubmissionStatus::Succeeded);
    }

    #[tokio::test]
    async fn dropped_submit_releases_in_flight_flag() {
        let provider = Arc::new(MockIdentityProvider::new());
        let coordinator = coordinator(&provider, Duration::from_secs(60));

        let _ = tokio::time::timeout(
            Duration::from_millis(20),
            coordinator.submit("abandoned".to_string()),
        )
        .await;

        assert_eq!(coordinator.status(), SubmissionStatus::Failed);
        assert!(!coordinator.in_flight.load(Ordering::SeqCst));
    }
}
