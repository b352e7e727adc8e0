//! # Mutation Guard
//!
//! Single-flight gate for create/update/delete calls against one collection.
//!
//! A second call that arrives while the first is still running is rejected with
//! [`GuardError::Busy`] and its action is never invoked: duplicates are dropped, not
//! queued. The in-flight flag is released when the action finishes, succeeds or fails,
//! and also when the caller drops the future mid-flight.
//!
//! The list controller keeps one guard for form submits and one for deletions, so a
//! pending save does not block an unrelated delete confirmation.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info_span, Instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        })
    }
}

/// A create/update/delete about to be sent to the resource service.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRequest<I, P> {
    pub kind: MutationKind,
    pub target_id: Option<I>,
    pub payload: Option<P>,
}

impl<I, P> MutationRequest<I, P> {
    pub fn create(payload: P) -> Self {
        Self {
            kind: MutationKind::Create,
            target_id: None,
            payload: Some(payload),
        }
    }

    pub fn update(id: I, payload: P) -> Self {
        Self {
            kind: MutationKind::Update,
            target_id: Some(id),
            payload: Some(payload),
        }
    }

    pub fn delete(id: I) -> Self {
        Self {
            kind: MutationKind::Delete,
            target_id: Some(id),
            payload: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GuardError<E> {
    #[error("A {0} is already in flight")]
    Busy(MutationKind),
    #[error("Mutation failed: {0}")]
    Failed(E),
}

/// Single-flight flag shared by clones of the same guard.
#[derive(Debug, Clone)]
pub struct MutationGuard {
    name: &'static str,
    in_flight: Arc<AtomicBool>,
}

impl MutationGuard {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run `action` unless another action holds the guard.
    ///
    /// `action` receives the request back so the caller can move the payload into the
    /// service call without cloning it.
    pub async fn run<I, P, T, E, F, Fut>(
        &self,
        request: MutationRequest<I, P>,
        action: F,
    ) -> Result<T, GuardError<E>>
    where
        I: Display,
        F: FnOnce(MutationRequest<I, P>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let kind = request.kind;
        let Some(_slot) = InFlight::acquire(&self.in_flight) else {
            debug!(guard = self.name, %kind, "Busy, dropping duplicate");
            return Err(GuardError::Busy(kind));
        };

        let target = request
            .target_id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let span = info_span!("mutation", guard = self.name, %kind, target = %target);
        action(request)
            .instrument(span)
            .await
            .map_err(GuardError::Failed)
    }
}

/// Holds the flag for the lifetime of one action.
struct InFlight<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::oneshot;

    type Request = MutationRequest<u32, String>;

    #[tokio::test]
    async fn test_success_releases_guard() {
        let guard = MutationGuard::new("submit");
        let result: Result<u32, GuardError<String>> = guard
            .run(Request::create("a".into()), |req| async move {
                assert_eq!(req.payload.as_deref(), Some("a"));
                Ok(7)
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert!(!guard.is_busy());
    }

    #[tokio::test]
    async fn test_failure_releases_guard() {
        let guard = MutationGuard::new("submit");
        let result: Result<(), GuardError<String>> = guard
            .run(Request::delete(1), |_| async { Err("offline".to_string()) })
            .await;
        assert!(matches!(result, Err(GuardError::Failed(ref e)) if e == "offline"));
        assert!(!guard.is_busy());
    }

    #[tokio::test]
    async fn test_duplicate_is_rejected_without_invoking_action() {
        let guard = MutationGuard::new("delete");
        let calls = Arc::new(AtomicUsize::new(0));
        let (release, wait) = oneshot::channel::<()>();

        let first = {
            let guard = guard.clone();
            let calls = calls.clone();
            tokio::spawn(async move {
                guard
                    .run(Request::delete(1), |_| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        let _ = wait.await;
                        Ok::<_, String>(())
                    })
                    .await
            })
        };

        while !guard.is_busy() {
            tokio::task::yield_now().await;
        }

        let second = guard
            .run(Request::delete(1), |_| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(())
                }
            })
            .await;
        assert!(matches!(second, Err(GuardError::Busy(MutationKind::Delete))));

        release.send(()).unwrap();
        assert!(first.await.unwrap().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!guard.is_busy());
    }

    #[tokio::test]
    async fn test_dropped_future_releases_guard() {
        let guard = MutationGuard::new("submit");
        let pending = guard.run(Request::create("x".into()), |_| async {
            std::future::pending::<Result<(), String>>().await
        });
        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(10), pending).await;
        assert!(timed_out.is_err());
        assert!(!guard.is_busy());
    }

    #[tokio::test]
    async fn test_independent_guards_do_not_block_each_other() {
        let submit = MutationGuard::new("submit");
        let delete = MutationGuard::new("delete");
        let (release, wait) = oneshot::channel::<()>();

        let held = {
            let submit = submit.clone();
            tokio::spawn(async move {
                submit
                    .run(Request::update(3, "draft".into()), |_| async move {
                        let _ = wait.await;
                        Ok::<_, String>(())
                    })
                    .await
            })
        };
        while !submit.is_busy() {
            tokio::task::yield_now().await;
        }

        let result = delete
            .run(Request::delete(9), |_| async { Ok::<_, String>(()) })
            .await;
        assert!(result.is_ok());

        release.send(()).unwrap();
        held.await.unwrap().unwrap();
    }
}
