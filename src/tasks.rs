//! Cancellable async operations
//!
//! The worker side keeps a [`TaskScope`]: one live task per [`TaskKey`],
//! abortable individually, per view, or all at once. The UI side keeps a
//! [`Tickets`] ledger so that a result arriving after its operation was
//! cancelled is recognised and dropped.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::task::AbortHandle;

use crate::error::ContentError;
use crate::models::PlatformId;
use crate::routes::{DashboardView, Route};

/// The screen that started an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewScope {
    /// Login and sign-up
    Auth,
    /// A dashboard view
    Dashboard(DashboardView),
}

impl ViewScope {
    /// Scope owning operations started from a route
    pub const fn of(route: Route) -> Option<Self> {
        match route {
            Route::Splash => None,
            Route::Auth => Some(Self::Auth),
            Route::Dashboard(view) => Some(Self::Dashboard(view)),
        }
    }
}

/// What an operation does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Draft generation
    Generate,
    /// Caption rewrite
    Improve(PlatformId),
    /// Hashtag suggestions
    Hashtags(PlatformId),
    /// Account linking
    Connect(PlatformId),
    /// Account unlinking
    Disconnect(PlatformId),
    /// Sign in
    Login,
    /// Sign up
    Signup,
    /// Publish now
    Publish,
    /// Queue for later
    Schedule,
}

impl OperationKind {
    /// Progress text for the status bar
    pub fn progress(&self) -> String {
        match self {
            Self::Generate => "Generating content...".to_string(),
            Self::Improve(p) => format!("Improving {} caption...", p.name()),
            Self::Hashtags(p) => format!("Finding hashtags for {}...", p.name()),
            Self::Connect(p) => format!("Redirecting to {}...", p.name()),
            Self::Disconnect(p) => format!("Disconnecting {}...", p.name()),
            Self::Login => "Signing in...".to_string(),
            Self::Signup => "Creating account...".to_string(),
            Self::Publish => "Publishing...".to_string(),
            Self::Schedule => "Scheduling...".to_string(),
        }
    }
}

/// Identity of a live operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskKey {
    /// Owning view
    pub scope: ViewScope,
    /// Operation
    pub kind: OperationKind,
}

impl TaskKey {
    /// Key for `kind` started from `scope`
    pub const fn new(scope: ViewScope, kind: OperationKind) -> Self {
        Self { scope, kind }
    }
}

/// Handle tying a result back to the request that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    /// Unique per request
    pub id: u64,
    /// Operation the request belongs to
    pub key: TaskKey,
}

/// Run a future with a deadline
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, ContentError>
where
    F: Future<Output = Result<T, ContentError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| ContentError::TimedOut(limit))?
}

/// Live tasks owned by the async worker
#[derive(Debug, Default)]
pub struct TaskScope {
    tasks: HashMap<TaskKey, AbortHandle>,
}

impl TaskScope {
    /// Empty scope
    pub fn new() -> Self {
        Self::default()
    }

    fn prune(&mut self) {
        self.tasks.retain(|_, handle| !handle.is_finished());
    }

    /// Spawn a task under `key`; refused while one is already running there
    pub fn spawn<F>(&mut self, key: TaskKey, fut: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.prune();
        if self.tasks.contains_key(&key) {
            tracing::debug!(?key, "Task already running");
            return false;
        }
        let handle = tokio::spawn(fut).abort_handle();
        self.tasks.insert(key, handle);
        true
    }

    /// Abort one task
    pub fn cancel(&mut self, key: TaskKey) -> bool {
        self.tasks.remove(&key).is_some_and(|handle| {
            handle.abort();
            true
        })
    }

    /// Abort every task started from a view
    pub fn cancel_scope(&mut self, scope: ViewScope) -> usize {
        let keys: Vec<TaskKey> = self
            .tasks
            .keys()
            .filter(|key| key.scope == scope)
            .copied()
            .collect();
        for key in &keys {
            self.cancel(*key);
        }
        if !keys.is_empty() {
            tracing::debug!(?scope, count = keys.len(), "Cancelled view tasks");
        }
        keys.len()
    }

    /// Abort everything
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }

    /// Number of tasks still running
    pub fn live(&mut self) -> usize {
        self.prune();
        self.tasks.len()
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// Outstanding requests as seen from the UI
#[derive(Debug, Default)]
pub struct Tickets {
    next_id: u64,
    live: HashMap<u64, TaskKey>,
}

impl Tickets {
    /// Empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new request; `None` while the same key is busy
    pub fn issue(&mut self, key: TaskKey) -> Option<Ticket> {
        if self.is_busy(key) {
            return None;
        }
        self.next_id += 1;
        self.live.insert(self.next_id, key);
        Some(Ticket {
            id: self.next_id,
            key,
        })
    }

    /// Settle a ticket; false when it was cancelled or is unknown
    pub fn redeem(&mut self, ticket: &Ticket) -> bool {
        self.live.remove(&ticket.id).is_some()
    }

    /// Whether a ticket is still outstanding
    pub fn is_live(&self, ticket: &Ticket) -> bool {
        self.live.contains_key(&ticket.id)
    }

    /// Whether this exact operation is in flight
    pub fn is_busy(&self, key: TaskKey) -> bool {
        self.live.values().any(|k| *k == key)
    }

    /// Nothing in flight
    pub fn is_idle(&self) -> bool {
        self.live.is_empty()
    }

    /// Void one ticket
    pub fn void(&mut self, key: TaskKey) {
        self.live.retain(|_, k| *k != key);
    }

    /// Void every ticket of a view, returning the operations dropped
    pub fn void_scope(&mut self, scope: ViewScope) -> Vec<TaskKey> {
        let voided: Vec<TaskKey> = self
            .live
            .values()
            .filter(|k| k.scope == scope)
            .copied()
            .collect();
        self.live.retain(|_, k| k.scope != scope);
        voided
    }

    /// Void everything, returning the operations dropped
    pub fn void_all(&mut self) -> Vec<TaskKey> {
        self.live.drain().map(|(_, key)| key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    const CREATE: ViewScope = ViewScope::Dashboard(DashboardView::Create);
    const REVIEW: ViewScope = ViewScope::Dashboard(DashboardView::Review);

    #[tokio::test]
    async fn test_completed_task_delivers() {
        let mut scope = TaskScope::new();
        let (tx, rx) = oneshot::channel();
        assert!(scope.spawn(TaskKey::new(CREATE, OperationKind::Generate), async move {
            let _ = tx.send(42);
        }));
        assert_eq!(rx.await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_cancelled_task_never_delivers() {
        let mut scope = TaskScope::new();
        let key = TaskKey::new(CREATE, OperationKind::Generate);
        let (tx, rx) = oneshot::channel::<u32>();
        scope.spawn(key, async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            let _ = tx.send(1);
        });

        assert!(scope.cancel(key));
        assert!(rx.await.is_err());
        assert!(!scope.cancel(key));
    }

    #[tokio::test]
    async fn test_duplicate_key_refused() {
        let mut scope = TaskScope::new();
        let key = TaskKey::new(REVIEW, OperationKind::Publish);
        assert!(scope.spawn(key, tokio::time::sleep(Duration::from_secs(5))));
        assert!(!scope.spawn(key, async {}));
        assert_eq!(scope.live(), 1);
    }

    #[tokio::test]
    async fn test_cancel_scope_leaves_other_views() {
        let mut scope = TaskScope::new();
        let (tx_review, rx_review) = oneshot::channel::<()>();
        let (tx_create, rx_create) = oneshot::channel::<()>();
        scope.spawn(
            TaskKey::new(REVIEW, OperationKind::Improve(PlatformId::Twitter)),
            async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                let _ = tx_review.send(());
            },
        );
        scope.spawn(TaskKey::new(CREATE, OperationKind::Generate), async move {
            let _ = tx_create.send(());
        });

        assert_eq!(scope.cancel_scope(REVIEW), 1);
        assert!(rx_review.await.is_err());
        assert!(rx_create.await.is_ok());
    }

    #[tokio::test]
    async fn test_drop_aborts_everything() {
        let (tx, rx) = oneshot::channel::<()>();
        {
            let mut scope = TaskScope::new();
            scope.spawn(TaskKey::new(ViewScope::Auth, OperationKind::Login), async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                let _ = tx.send(());
            });
        }
        assert!(rx.await.is_err());
    }

    #[tokio::test]
    async fn test_timeout() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, ContentError>(())
        };
        let err = with_timeout(Duration::from_millis(10), slow).await.unwrap_err();
        assert_eq!(err, ContentError::TimedOut(Duration::from_millis(10)));

        let fast = async { Ok::<_, ContentError>(7) };
        assert_eq!(with_timeout(Duration::from_secs(1), fast).await.unwrap(), 7);
    }

    #[test]
    fn test_tickets_drop_voided_results() {
        let mut tickets = Tickets::new();
        let key = TaskKey::new(REVIEW, OperationKind::Hashtags(PlatformId::LinkedIn));
        let ticket = tickets.issue(key).unwrap();
        assert!(tickets.issue(key).is_none());
        assert!(tickets.is_busy(key));

        assert_eq!(tickets.void_scope(REVIEW), vec![key]);
        assert!(tickets.void_scope(REVIEW).is_empty());
        assert!(!tickets.redeem(&ticket));

        let again = tickets.issue(key).unwrap();
        assert_ne!(again.id, ticket.id);
        assert!(tickets.redeem(&again));
        assert!(tickets.is_idle());
    }

    #[test]
    fn test_scope_of_route() {
        assert_eq!(ViewScope::of(Route::Splash), None);
        assert_eq!(ViewScope::of(Route::Auth), Some(ViewScope::Auth));
        assert_eq!(
            ViewScope::of(Route::Dashboard(DashboardView::Connections)),
            Some(ViewScope::Dashboard(DashboardView::Connections))
        );
    }
}
