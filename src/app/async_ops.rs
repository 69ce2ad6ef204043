//! Async operations for the TUI
//!
//! Uses channels to communicate between the sync TUI loop and async tasks.
//! Every command runs as its own task in a [`TaskScope`], so a view can
//! abort what it started without touching anything else.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::error::ContentError;
use crate::models::{Draft, PlatformId};
use crate::services::{Backend, GenerationRequest, Receipt, Session};
use crate::tasks::{TaskKey, TaskScope, Ticket, ViewScope, with_timeout};

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum AsyncCommand {
    /// Generate a draft
    Generate {
        ticket: Ticket,
        request_id: u64,
        request: GenerationRequest,
    },
    /// Rewrite one caption
    ImproveWriting {
        ticket: Ticket,
        platform: PlatformId,
        text: String,
    },
    /// Hashtags for one caption
    SuggestHashtags {
        ticket: Ticket,
        platform: PlatformId,
        text: String,
    },
    /// Link a social account
    Connect { ticket: Ticket, platform: PlatformId },
    /// Unlink a social account
    Disconnect { ticket: Ticket, platform: PlatformId },
    /// Sign in
    Login {
        ticket: Ticket,
        email: String,
        password: String,
    },
    /// Register
    Signup {
        ticket: Ticket,
        email: String,
        password: String,
        name: String,
    },
    /// Publish now
    Publish { ticket: Ticket, draft: Draft },
    /// Queue for later
    Schedule {
        ticket: Ticket,
        draft: Draft,
        at: DateTime<Utc>,
    },
    /// Abort one operation
    Cancel(TaskKey),
    /// Abort everything a view started
    CancelScope(ViewScope),
    /// Abort everything
    CancelAll,
    /// Shutdown the worker
    Shutdown,
}

/// Results sent back from the async worker to the TUI
#[derive(Debug)]
pub enum AsyncResult {
    /// Draft produced for a generation request
    Generated {
        ticket: Ticket,
        request_id: u64,
        outcome: Result<Draft, ContentError>,
    },
    /// Rewritten caption for one platform
    Improved {
        ticket: Ticket,
        platform: PlatformId,
        outcome: Result<String, ContentError>,
    },
    /// Suggested tags for one platform
    Hashtags {
        ticket: Ticket,
        platform: PlatformId,
        outcome: Result<Vec<String>, ContentError>,
    },
    /// OAuth redirect issued; the flow is still running
    Redirecting {
        ticket: Ticket,
        platform: PlatformId,
        url: String,
    },
    /// OAuth flow finished
    Connected {
        ticket: Ticket,
        platform: PlatformId,
        outcome: Result<(), ContentError>,
    },
    /// Account unlinked
    Disconnected {
        ticket: Ticket,
        platform: PlatformId,
        outcome: Result<(), ContentError>,
    },
    /// Login or signup answered
    SignedIn {
        ticket: Ticket,
        outcome: Result<Session, ContentError>,
    },
    /// Publish or schedule answered
    Finalized {
        ticket: Ticket,
        outcome: Result<Receipt, ContentError>,
    },
    /// The same operation was already running
    Rejected { ticket: Ticket },
}

impl AsyncResult {
    /// Ticket of the request this answers
    pub const fn ticket(&self) -> &Ticket {
        match self {
            Self::Generated { ticket, .. }
            | Self::Improved { ticket, .. }
            | Self::Hashtags { ticket, .. }
            | Self::Redirecting { ticket, .. }
            | Self::Connected { ticket, .. }
            | Self::Disconnected { ticket, .. }
            | Self::SignedIn { ticket, .. }
            | Self::Finalized { ticket, .. }
            | Self::Rejected { ticket } => ticket,
        }
    }

    /// Progress messages don't settle their ticket
    pub const fn is_final(&self) -> bool {
        !matches!(self, Self::Redirecting { .. })
    }
}

/// Channel handles for communicating with the async worker
pub struct AsyncHandle {
    /// Send commands to the worker
    pub cmd_tx: mpsc::Sender<AsyncCommand>,
    /// Receive results from the worker
    pub result_rx: mpsc::Receiver<AsyncResult>,
}

fn launch<F>(
    scope: &mut TaskScope,
    result_tx: &mpsc::Sender<AsyncResult>,
    ticket: Ticket,
    fut: F,
) where
    F: Future<Output = AsyncResult> + Send + 'static,
{
    let tx = result_tx.clone();
    let accepted = scope.spawn(ticket.key, async move {
        let result = fut.await;
        let _ = tx.send(result).await;
    });
    if !accepted {
        tracing::warn!(key = ?ticket.key, "Operation already running");
        let _ = result_tx.try_send(AsyncResult::Rejected { ticket });
    }
}

/// Spawn the async worker and return handles
pub fn spawn_worker<B: Backend>(backend: Arc<B>, limit: Duration) -> AsyncHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<AsyncCommand>(32);
    let (result_tx, result_rx) = mpsc::channel::<AsyncResult>(32);

    tokio::spawn(async move {
        let mut scope = TaskScope::new();

        while let Some(cmd) = cmd_rx.recv().await {
            let backend = Arc::clone(&backend);
            match cmd {
                AsyncCommand::Shutdown => break,
                AsyncCommand::Cancel(key) => {
                    scope.cancel(key);
                }
                AsyncCommand::CancelScope(view) => {
                    scope.cancel_scope(view);
                }
                AsyncCommand::CancelAll => scope.cancel_all(),
                AsyncCommand::Generate {
                    ticket,
                    request_id,
                    request,
                } => launch(&mut scope, &result_tx, ticket, async move {
                    let outcome = with_timeout(limit, backend.generate(request)).await;
                    AsyncResult::Generated {
                        ticket,
                        request_id,
                        outcome,
                    }
                }),
                AsyncCommand::ImproveWriting {
                    ticket,
                    platform,
                    text,
                } => launch(&mut scope, &result_tx, ticket, async move {
                    let outcome = with_timeout(limit, backend.improve_writing(text)).await;
                    AsyncResult::Improved {
                        ticket,
                        platform,
                        outcome,
                    }
                }),
                AsyncCommand::SuggestHashtags {
                    ticket,
                    platform,
                    text,
                } => launch(&mut scope, &result_tx, ticket, async move {
                    let outcome = with_timeout(limit, backend.suggest_hashtags(text)).await;
                    AsyncResult::Hashtags {
                        ticket,
                        platform,
                        outcome,
                    }
                }),
                AsyncCommand::Connect { ticket, platform } => {
                    let tx = result_tx.clone();
                    launch(&mut scope, &result_tx, ticket, async move {
                        let url = backend.authorize_url(platform, &ticket.id.to_string());
                        tracing::info!(platform = platform.id(), %url, "OAuth redirect");
                        let _ = tx
                            .send(AsyncResult::Redirecting {
                                ticket,
                                platform,
                                url,
                            })
                            .await;
                        let outcome = with_timeout(limit, backend.connect(platform)).await;
                        AsyncResult::Connected {
                            ticket,
                            platform,
                            outcome,
                        }
                    });
                }
                AsyncCommand::Disconnect { ticket, platform } => {
                    launch(&mut scope, &result_tx, ticket, async move {
                        let outcome = with_timeout(limit, backend.disconnect(platform)).await;
                        AsyncResult::Disconnected {
                            ticket,
                            platform,
                            outcome,
                        }
                    });
                }
                AsyncCommand::Login {
                    ticket,
                    email,
                    password,
                } => launch(&mut scope, &result_tx, ticket, async move {
                    let outcome = with_timeout(limit, backend.login(email, password)).await;
                    AsyncResult::SignedIn { ticket, outcome }
                }),
                AsyncCommand::Signup {
                    ticket,
                    email,
                    password,
                    name,
                } => launch(&mut scope, &result_tx, ticket, async move {
                    let outcome =
                        with_timeout(limit, backend.signup(email, password, name)).await;
                    AsyncResult::SignedIn { ticket, outcome }
                }),
                AsyncCommand::Publish { ticket, draft } => {
                    launch(&mut scope, &result_tx, ticket, async move {
                        let outcome = with_timeout(limit, backend.publish(draft)).await;
                        AsyncResult::Finalized { ticket, outcome }
                    });
                }
                AsyncCommand::Schedule { ticket, draft, at } => {
                    launch(&mut scope, &result_tx, ticket, async move {
                        let outcome = with_timeout(limit, backend.schedule(draft, at)).await;
                        AsyncResult::Finalized { ticket, outcome }
                    });
                }
            }
        }

        scope.cancel_all();
        tracing::debug!("Async worker stopped");
    });

    AsyncHandle { cmd_tx, result_rx }
}
