//! TUI Application module

mod async_ops;
mod events;
mod state;
mod ui;

pub use async_ops::{AsyncCommand, AsyncHandle, AsyncResult, spawn_worker};
pub use state::{AppState, EditTarget, Mode};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::error::ContentError;
use crate::routes::{DashboardView, Route};
use crate::services::mock::MockStudio;
use crate::services::{Backend, ReceiptKind};

/// Run the TUI application against the mock backend
pub fn run() -> Result<()> {
    let config = Config::load()?;
    let backend = Arc::new(MockStudio::from_config(&config));
    run_with(config, backend)
}

/// Run the TUI with any backend
pub fn run_with<B: Backend>(config: Config, backend: Arc<B>) -> Result<()> {
    // Create tokio runtime
    let rt = Runtime::new().context("Failed to start async runtime")?;

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&interrupted);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .context("Failed to install signal handler")?;
    }

    // Spawn async worker
    let limit = config.operation_timeout();
    let async_handle = rt.block_on(async { spawn_worker(backend, limit) });

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(terminal_backend)?;
    terminal.clear()?;

    let mut state = AppState::new(config);

    // Main loop
    let result = run_app(&mut terminal, &mut state, async_handle, &interrupted);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Let aborted tasks unwind before the runtime goes away
    rt.shutdown_timeout(Duration::from_millis(200));

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    mut async_handle: AsyncHandle,
    interrupted: &AtomicBool,
) -> Result<()> {
    loop {
        // Process any async results
        while let Ok(result) = async_handle.result_rx.try_recv() {
            if let Some(cmd) = handle_async_result(state, result) {
                let _ = async_handle.cmd_tx.blocking_send(cmd);
            }
        }

        // Draw UI
        terminal.draw(|frame| ui::render(frame, state))?;

        // Handle events
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(cmd) = events::handle_key(state, key)
        {
            let _ = async_handle.cmd_tx.blocking_send(cmd);
        }

        // Tick for animations and the splash timer
        state.tick();

        if interrupted.load(Ordering::SeqCst) {
            state.should_quit = true;
        }

        if state.should_quit {
            // Shutdown async worker
            let _ = async_handle.cmd_tx.blocking_send(AsyncCommand::Shutdown);
            break;
        }
    }

    // Save config on exit
    state.config.save()?;

    Ok(())
}

/// Status-bar text for a failed operation
fn failure_notice(error: &ContentError) -> String {
    if error.is_validation() {
        format!("⚠️  {error}")
    } else {
        format!("❌ {error}")
    }
}

/// Apply a worker result to the state, possibly asking for a follow-up
pub fn handle_async_result(state: &mut AppState, result: AsyncResult) -> Option<AsyncCommand> {
    let live = if result.is_final() {
        state.tickets.redeem(result.ticket())
    } else {
        state.tickets.is_live(result.ticket())
    };
    if !live {
        tracing::debug!(ticket = result.ticket().id, "Dropping result of cancelled operation");
        return None;
    }

    match result {
        AsyncResult::Generated {
            request_id,
            outcome,
            ..
        } => {
            match outcome {
                Ok(draft) => {
                    let count = draft.captions().len();
                    if state.lifecycle.complete_generation(request_id, draft) {
                        state.set_status(format!("✨ Generated captions for {count} platform(s)"));
                        return state.navigate(Route::Dashboard(DashboardView::Review));
                    }
                }
                Err(e) => {
                    if state.lifecycle.fail_generation(request_id, &e) {
                        state.set_status(format!("❌ Generation failed: {e}"));
                    }
                }
            }
            None
        }
        AsyncResult::Improved {
            platform, outcome, ..
        } => {
            let applied = outcome
                .map_err(|e| e.to_string())
                .and_then(|text| {
                    state
                        .lifecycle
                        .edit_caption(platform, text)
                        .map_err(|e| e.to_string())
                });
            match applied {
                Ok(()) => state.set_status(format!("✨ {} caption improved", platform.name())),
                Err(e) => state.set_status(format!("❌ {e}")),
            }
            None
        }
        AsyncResult::Hashtags {
            platform, outcome, ..
        } => {
            let applied = outcome.map_err(|e| e.to_string()).and_then(|tags| {
                state
                    .lifecycle
                    .append_hashtags(platform, &tags)
                    .map(|()| tags.len())
                    .map_err(|e| e.to_string())
            });
            match applied {
                Ok(n) => state.set_status(format!("#️⃣  Added {n} hashtags to {}", platform.name())),
                Err(e) => state.set_status(format!("❌ {e}")),
            }
            None
        }
        AsyncResult::Redirecting { platform, url, .. } => {
            state.last_authorize_url = Some(url);
            state.set_status(format!("🔗 Redirecting to {}...", platform.name()));
            None
        }
        AsyncResult::Connected {
            platform, outcome, ..
        } => {
            let ok = outcome.is_ok();
            state.connections.finish_connect(platform, ok);
            match outcome {
                Ok(()) => state.set_status(format!("✅ Connected {}", platform.name())),
                Err(e) => state.set_status(format!("❌ {} connection failed: {e}", platform.name())),
            }
            None
        }
        AsyncResult::Disconnected {
            platform, outcome, ..
        } => {
            match outcome {
                Ok(()) => {
                    state.connections.disconnect(platform);
                    state.set_status(format!("🔌 Disconnected {}", platform.name()));
                }
                Err(e) => state.set_status(format!("❌ {e}")),
            }
            None
        }
        AsyncResult::SignedIn { outcome, .. } => match outcome {
            Ok(session) => {
                let name = session.user.name.clone();
                state.auth.apply_session(session);
                state.set_status(format!("👋 Welcome, {name}"));
                state.navigate(Route::Dashboard(DashboardView::Create))
            }
            Err(e) => {
                state.set_status(failure_notice(&e));
                None
            }
        },
        AsyncResult::Finalized { outcome, .. } => {
            match outcome {
                Ok(receipt) => {
                    let badges: Vec<_> = receipt.platforms.iter().map(|p| p.emoji()).collect();
                    match receipt.kind {
                        ReceiptKind::Published => {
                            state.set_status(format!("✅ Published to {}", badges.join(" ")));
                        }
                        ReceiptKind::Scheduled => state.set_status(format!(
                            "📅 Scheduled for {} on {}",
                            receipt.at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M"),
                            badges.join(" ")
                        )),
                    }
                }
                Err(e) => {
                    state.lifecycle.revert_finalize();
                    state.set_status(failure_notice(&e));
                }
            }
            None
        }
        AsyncResult::Rejected { ticket } => {
            state.set_status(format!("⏳ {}", ticket.key.kind.progress()));
            None
        }
    }
}
