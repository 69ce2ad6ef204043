//! # Contentify ✨
//!
//! An AI-assisted social media content studio for the terminal.
//!
//! ## Overview
//!
//! Contentify turns an idea (or an uploaded image) into platform-tailored
//! captions for Twitter, LinkedIn, Facebook and Instagram. Drafts can be
//! edited, improved, tagged with hashtags, then published or scheduled.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          App                                │
//! │  Routes, key handling, rendering and the main event loop    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │    Lifecycle    │ │      Tasks      │ │     Routes      │
//! │                 │ │                 │ │                 │
//! │ • Draft phases  │ │ • Worker scope  │ │ • Auth gating   │
//! │ • Edits         │ │ • Tickets       │ │ • Views         │
//! │ • Finalize      │ │ • Timeouts      │ │ • Redirects     │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//!          │                   │                   │
//!          └───────────────────┴───────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │    Services     │ │      Auth       │ │     Models      │
//! │                 │ │                 │ │                 │
//! │ • Generation    │ │ • Session gate  │ │ • Draft         │
//! │ • Publishing    │ │ • Login form    │ │ • Platform      │
//! │ • Mock backend  │ │ • Sign up       │ │ • Connections   │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`app`] - TUI application state and event loop
//! - [`auth`] - Session gate and login/sign-up form
//! - [`config`] - Configuration management
//! - [`lifecycle`] - Draft lifecycle state machine
//! - [`models`] - Data models (Draft, Platform, User, API keys)
//! - [`routes`] - Screens and authentication gating
//! - [`services`] - Service traits and the mock backend
//! - [`tasks`] - Cancellable background operations
//! - [`theme`] - Theme support via ratatui-themes
//!
//! ## Example
//!
//! ```no_run
//! use contentify::app;
//!
//! fn main() -> anyhow::Result<()> {
//!     app::run()
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/contentify/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::if_not_else)]
#![allow(clippy::single_match_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::use_self)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::return_self_not_must_use)]

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod handoff;
pub mod lifecycle;
pub mod models;
pub mod paths;
pub mod routes;
pub mod schedule;
pub mod services;
pub mod tasks;
pub mod theme;

// Re-export main types for convenience
pub use app::AppState;
pub use config::Config;
pub use error::{ContentError, ValidationError};
pub use lifecycle::{DraftLifecycle, Phase};
pub use models::{ApiService, ConnectionStatus, Draft, PlatformId, SourceImage, User};
pub use services::mock::MockStudio;
pub use theme::{Theme, ThemeColors};

// Re-export theme types from ratatui-themes crate
pub use ratatui_themes::{ThemeName, ThemePalette};

/// ASCII logo for the application
pub const LOGO: &str = r"
   ______            __             __  _ ____
  / ____/___  ____  / /____  ____  / /_(_) __/_  __
 / /   / __ \/ __ \/ __/ _ \/ __ \/ __/ / /_/ / / /
/ /___/ /_/ / / / / /_/  __/ / / / /_/ / __/ /_/ /
\____/\____/_/ /_/\__/\___/_/ /_/\__/_/_/  \__, /
                                          /____/
";

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
