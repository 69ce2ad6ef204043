//! Application state

use std::time::{Duration, Instant};

use super::async_ops::AsyncCommand;
use crate::auth::{AuthForm, AuthGate, AuthMode};
use crate::config::Config;
use crate::lifecycle::{CreationForm, DraftLifecycle, ReviewEntry};
use crate::models::{ApiKeyVault, ApiService, PlatformId, SocialConnections, SourceImage};
use crate::routes::{self, DashboardView, Route};
use crate::tasks::{OperationKind, TaskKey, Ticket, Tickets, ViewScope};
use crate::theme::{Theme, ThemeMode};

/// Current input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Keys drive navigation and actions
    #[default]
    Normal,
    /// Typing into a text field
    Editing(EditTarget),
    /// Keybinding overlay
    Help,
}

/// Text field being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    /// Free-text post idea
    Idea,
    /// Path of an image to upload
    UploadPath,
    /// Caption of the selected platform
    Caption,
    /// `YYYY-MM-DD HH:MM` publish time
    ScheduleTime,
    /// Key for one external service
    ApiKey(ApiService),
}

impl EditTarget {
    /// Popup title
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idea => "Idea",
            Self::UploadPath => "Image path",
            Self::Caption => "Caption",
            Self::ScheduleTime => "Schedule",
            Self::ApiKey(_) => "API key",
        }
    }
}

/// Rows of the settings view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    /// API key entry
    Key(ApiService),
    /// Light/dark toggle
    Theme,
}

impl SettingsRow {
    /// Rows in display order
    pub const fn all() -> &'static [Self] {
        &[
            Self::Key(ApiService::Gemini),
            Self::Key(ApiService::Imagen),
            Self::Theme,
        ]
    }
}

/// Application state
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Current theme
    pub theme: Theme,
    /// Whether to quit
    pub should_quit: bool,
    /// Input mode
    pub mode: Mode,
    /// Screen being shown
    pub route: Route,
    /// When the splash screen gives way
    pub splash_until: Option<Instant>,

    /// Signed-in user
    pub auth: AuthGate,
    /// Login/signup inputs
    pub auth_form: AuthForm,

    /// Draft state machine and its slot
    pub lifecycle: DraftLifecycle,
    /// Create view inputs
    pub form: CreationForm,
    /// Highlighted platform in the create view
    pub platform_cursor: usize,

    /// Platform tab in the review view
    pub review_platform: PlatformId,
    /// Free-text schedule time
    pub schedule_input: String,

    /// Shared text buffer for the field being edited
    pub edit_buffer: String,

    /// Linked social accounts
    pub connections: SocialConnections,
    /// Highlighted platform in the connections view
    pub connection_cursor: usize,
    /// Last OAuth URL handed out
    pub last_authorize_url: Option<String>,

    /// API keys (memory only)
    pub vault: ApiKeyVault,
    /// Highlighted settings row
    pub settings_cursor: usize,

    /// Requests in flight
    pub tickets: Tickets,

    /// Status message (bottom bar)
    pub status: String,

    /// Tick counter for animations
    tick: u64,
}

impl AppState {
    /// Create a new app state
    pub fn new(config: Config) -> Self {
        let theme = config.active_theme();
        let splash_until = (config.splash_secs > 0)
            .then(|| Instant::now() + Duration::from_secs(config.splash_secs));
        let form = CreationForm::with_platforms(config.default_platforms.iter().copied());

        Self {
            theme,
            should_quit: false,
            mode: Mode::Normal,
            route: if splash_until.is_some() {
                Route::Splash
            } else {
                Route::Auth
            },
            splash_until,
            auth: AuthGate::new(),
            auth_form: AuthForm::default(),
            lifecycle: DraftLifecycle::new(),
            form,
            platform_cursor: 0,
            review_platform: PlatformId::default(),
            schedule_input: String::new(),
            edit_buffer: String::new(),
            connections: SocialConnections::default(),
            connection_cursor: 0,
            last_authorize_url: None,
            vault: ApiKeyVault::default(),
            settings_cursor: 0,
            tickets: Tickets::new(),
            status: String::new(),
            tick: 0,
            config,
        }
    }

    /// Tick for animations and the splash timer
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if let Some(until) = self.splash_until
            && Instant::now() >= until
        {
            self.finish_splash();
        }
    }

    /// Get current tick
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Leave the splash screen
    pub fn finish_splash(&mut self) {
        self.splash_until = None;
        if self.route == Route::Splash {
            self.route = Route::root(self.auth.state());
        }
    }

    /// Set status message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status.clear();
    }

    /// Whether anything is in flight (drives the spinner)
    pub fn is_loading(&self) -> bool {
        !self.tickets.is_idle()
    }

    /// Current dashboard view, if on the dashboard
    pub const fn view(&self) -> Option<DashboardView> {
        match self.route {
            Route::Dashboard(view) => Some(view),
            Route::Splash | Route::Auth => None,
        }
    }

    /// Switch screens. Anything the old view started is cancelled; the
    /// returned command tells the worker to abort it.
    pub fn navigate(&mut self, requested: Route) -> Option<AsyncCommand> {
        let mut target = routes::resolve(requested, self.auth.state());

        if target == Route::Dashboard(DashboardView::Review) {
            match self.lifecycle.open_review() {
                ReviewEntry::Loaded(platform) => {
                    if !self
                        .lifecycle
                        .draft()
                        .is_some_and(|d| d.targets(self.review_platform))
                    {
                        self.review_platform = platform;
                    }
                }
                ReviewEntry::RedirectToCreate => {
                    self.set_status("No draft to review yet. Create one first.");
                    target = Route::Dashboard(DashboardView::Create);
                }
            }
        }

        if target == self.route {
            return None;
        }

        let leaving = ViewScope::of(self.route);
        self.route = target;
        self.mode = Mode::Normal;

        let scope = leaving?;
        match scope {
            ViewScope::Dashboard(DashboardView::Create) => {
                self.lifecycle.cancel_generation();
            }
            ViewScope::Dashboard(DashboardView::Connections) => {
                self.connections.abort_pending();
            }
            _ => {}
        }
        let voided = self.tickets.void_scope(scope);
        if !voided.is_empty() {
            tracing::debug!(?scope, count = voided.len(), "Leaving view with operations in flight");
            self.abandon(&voided);
        }
        Some(AsyncCommand::CancelScope(scope))
    }

    /// Put back whatever the given operations changed before they ran
    pub fn abandon(&mut self, keys: &[TaskKey]) {
        for key in keys {
            match key.kind {
                OperationKind::Generate => {
                    self.lifecycle.cancel_generation();
                }
                OperationKind::Publish | OperationKind::Schedule => {
                    self.lifecycle.revert_finalize();
                }
                OperationKind::Connect(platform) => {
                    self.connections.finish_connect(platform, false);
                }
                OperationKind::Improve(_)
                | OperationKind::Hashtags(_)
                | OperationKind::Disconnect(_)
                | OperationKind::Login
                | OperationKind::Signup => {}
            }
        }
    }

    /// Move to the next sidebar view
    pub fn next_view(&mut self) -> Option<AsyncCommand> {
        let view = self.view()?;
        self.navigate(Route::Dashboard(view.next()))
    }

    /// Move to the previous sidebar view
    pub fn prev_view(&mut self) -> Option<AsyncCommand> {
        let view = self.view()?;
        self.navigate(Route::Dashboard(view.prev()))
    }

    /// Issue a ticket for an operation started from the current view
    pub fn issue(&mut self, kind: OperationKind) -> Option<Ticket> {
        let scope = ViewScope::of(self.route)?;
        let ticket = self.tickets.issue(TaskKey::new(scope, kind));
        if ticket.is_some() {
            self.set_status(kind.progress());
        } else {
            self.set_status("⏳ Already in progress");
        }
        ticket
    }

    /// Flip light/dark and apply the matching palette
    pub fn toggle_theme(&mut self) {
        self.config.theme_mode = self.config.theme_mode.toggle();
        self.theme = self.config.active_theme();
        self.set_status(format!(
            "{} {} mode",
            self.config.theme_mode.icon(),
            self.config.theme_mode.name()
        ));
    }

    /// Active light/dark mode
    pub const fn theme_mode(&self) -> ThemeMode {
        self.config.theme_mode
    }

    /// Platform under the create-view cursor
    pub fn cursor_platform(&self) -> PlatformId {
        PlatformId::all()[self.platform_cursor % PlatformId::all().len()]
    }

    /// Platform under the connections cursor
    pub fn connection_platform(&self) -> PlatformId {
        PlatformId::all()[self.connection_cursor % PlatformId::all().len()]
    }

    /// Row under the settings cursor
    pub fn settings_row(&self) -> SettingsRow {
        SettingsRow::all()[self.settings_cursor % SettingsRow::all().len()]
    }

    /// Platforms of the current draft, in tab order
    pub fn review_platforms(&self) -> Vec<PlatformId> {
        self.lifecycle
            .draft()
            .map(|d| d.platforms().into_iter().collect())
            .unwrap_or_default()
    }

    /// Caption on the selected review tab
    pub fn selected_caption(&self) -> Option<String> {
        self.lifecycle
            .draft()
            .and_then(|d| d.caption(self.review_platform))
            .map(str::to_string)
    }

    /// Move the review tab
    pub fn cycle_review_platform(&mut self, forward: bool) {
        let platforms = self.review_platforms();
        if platforms.is_empty() {
            return;
        }
        let pos = platforms
            .iter()
            .position(|p| *p == self.review_platform)
            .unwrap_or(0);
        let len = platforms.len();
        let next = if forward {
            (pos + 1) % len
        } else {
            (pos + len - 1) % len
        };
        self.review_platform = platforms[next];
    }

    /// Start editing a field, seeding the buffer with its current value
    pub fn begin_edit(&mut self, target: EditTarget) {
        self.edit_buffer = match target {
            EditTarget::Idea => self.form.idea.clone(),
            EditTarget::UploadPath => String::new(),
            EditTarget::Caption => self.selected_caption().unwrap_or_default(),
            EditTarget::ScheduleTime => self.schedule_input.clone(),
            EditTarget::ApiKey(service) => self.vault.record(service).value.clone(),
        };
        self.mode = Mode::Editing(target);
    }

    /// Attach an image from disk
    pub fn attach_upload(&mut self, path: &str) {
        let path = std::path::Path::new(path.trim());
        match std::fs::read(path) {
            Ok(bytes) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let image = SourceImage::uploaded(name, bytes);
                self.set_status(format!("🖼  Attached {}", image.label()));
                self.form.upload = Some(image);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not read image");
                self.set_status(format!("❌ Could not read {}: {e}", path.display()));
            }
        }
    }

    /// Sign out and return to the auth screen
    pub fn logout(&mut self) -> AsyncCommand {
        self.auth.logout();
        let voided = self.tickets.void_all();
        self.abandon(&voided);
        self.connections.abort_pending();
        self.lifecycle.cancel_generation();
        self.lifecycle.discard();
        self.auth_form = AuthForm::default();
        self.route = Route::Auth;
        self.mode = Mode::Normal;
        self.set_status("👋 Signed out");
        AsyncCommand::CancelAll
    }

    /// Auth form submit label
    pub const fn auth_submit_label(&self) -> &'static str {
        match self.auth_form.mode {
            AuthMode::Login => "Sign in",
            AuthMode::Signup => "Sign up",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::services::Session;

    fn state() -> AppState {
        let config = Config {
            splash_secs: 0,
            ..Config::default()
        };
        AppState::new(config)
    }

    fn signed_in() -> AppState {
        let mut state = state();
        state.auth.apply_session(Session {
            token: "t".into(),
            user: User::from_email("1", "sam@example.com"),
        });
        state.navigate(Route::Dashboard(DashboardView::Create));
        state
    }

    #[test]
    fn test_starts_on_auth_without_splash() {
        let state = state();
        assert_eq!(state.route, Route::Auth);
    }

    #[test]
    fn test_splash_then_root() {
        let mut state = AppState::new(Config::default());
        assert_eq!(state.route, Route::Splash);
        state.finish_splash();
        assert_eq!(state.route, Route::Auth);
    }

    #[test]
    fn test_dashboard_gated() {
        let mut state = state();
        state.navigate(Route::Dashboard(DashboardView::Settings));
        assert_eq!(state.route, Route::Auth);
    }

    #[test]
    fn test_review_without_draft_redirects() {
        let mut state = signed_in();
        state.navigate(Route::Dashboard(DashboardView::Review));
        assert_eq!(state.route, Route::Dashboard(DashboardView::Create));
        assert!(state.status.contains("No draft"));
    }

    #[test]
    fn test_leaving_view_voids_tickets() {
        let mut state = signed_in();
        let ticket = state.issue(OperationKind::Generate).unwrap();
        let cmd = state.navigate(Route::Dashboard(DashboardView::Settings));
        assert!(matches!(
            cmd,
            Some(AsyncCommand::CancelScope(ViewScope::Dashboard(
                DashboardView::Create
            )))
        ));
        assert!(!state.tickets.redeem(&ticket));
    }

    fn with_draft() -> AppState {
        let mut state = signed_in();
        state.form.idea = "rooftop garden".into();
        let (request_id, _) = state.lifecycle.begin_generation(&state.form).unwrap();
        let draft = crate::models::Draft::new(
            "rooftop garden",
            SourceImage::Generated {
                data_uri: String::new(),
            },
            std::collections::BTreeMap::from([(PlatformId::Twitter, "Green roofs".to_string())]),
        );
        assert!(state.lifecycle.complete_generation(request_id, draft));
        state.navigate(Route::Dashboard(DashboardView::Review));
        state
    }

    #[test]
    fn test_leaving_connections_mid_connect_allows_retry() {
        let mut state = signed_in();
        state.navigate(Route::Dashboard(DashboardView::Connections));
        assert!(state.connections.begin_connect(PlatformId::Twitter));
        let ticket = state.issue(OperationKind::Connect(PlatformId::Twitter)).unwrap();

        let cmd = state.navigate(Route::Dashboard(DashboardView::Settings));
        assert!(matches!(
            cmd,
            Some(AsyncCommand::CancelScope(ViewScope::Dashboard(
                DashboardView::Connections
            )))
        ));
        assert!(!state.tickets.redeem(&ticket));

        state.navigate(Route::Dashboard(DashboardView::Connections));
        assert_eq!(
            state.connections.status(PlatformId::Twitter),
            crate::models::ConnectionStatus::Disconnected
        );
        assert!(state.connections.begin_connect(PlatformId::Twitter));
    }

    #[test]
    fn test_logout_mid_connect_allows_retry() {
        let mut state = signed_in();
        state.navigate(Route::Dashboard(DashboardView::Connections));
        state.connections.begin_connect(PlatformId::LinkedIn);
        state.issue(OperationKind::Connect(PlatformId::LinkedIn)).unwrap();

        state.logout();
        assert!(state.connections.begin_connect(PlatformId::LinkedIn));
    }

    #[test]
    fn test_leaving_review_mid_publish_reverts() {
        let mut state = with_draft();
        assert_eq!(state.route, Route::Dashboard(DashboardView::Review));
        let before = state.lifecycle.phase();
        state.lifecycle.publish().unwrap();
        state.issue(OperationKind::Publish).unwrap();
        assert!(state.lifecycle.phase().is_final());

        let cmd = state.navigate(Route::Dashboard(DashboardView::Connections));
        assert!(matches!(
            cmd,
            Some(AsyncCommand::CancelScope(ViewScope::Dashboard(
                DashboardView::Review
            )))
        ));
        assert_eq!(state.lifecycle.phase(), before);
        assert!(state.lifecycle.editable().is_ok());
    }

    #[test]
    fn test_leaving_review_mid_schedule_reverts() {
        let mut state = with_draft();
        let at = chrono::Utc::now() + chrono::Duration::hours(2);
        state.lifecycle.schedule(Some(at)).unwrap();
        state.issue(OperationKind::Schedule).unwrap();

        state.navigate(Route::Dashboard(DashboardView::Create));
        assert!(!state.lifecycle.phase().is_final());
    }

    #[test]
    fn test_leaving_review_keeps_settled_publish() {
        let mut state = with_draft();
        state.lifecycle.publish().unwrap();
        let ticket = state.issue(OperationKind::Publish).unwrap();
        assert!(state.tickets.redeem(&ticket));

        state.navigate(Route::Dashboard(DashboardView::Settings));
        assert!(state.lifecycle.phase().is_final());
    }

    #[test]
    fn test_default_platforms_preselected() {
        let state = state();
        assert!(state.form.platforms.contains(&PlatformId::Twitter));
        assert_eq!(state.form.platforms.len(), 1);
    }

    #[test]
    fn test_toggle_theme_updates_config() {
        let mut state = state();
        state.toggle_theme();
        assert_eq!(state.config.theme_mode, ThemeMode::Dark);
        assert_eq!(state.theme, state.config.dark_theme);
    }

    #[test]
    fn test_logout_returns_to_auth() {
        let mut state = signed_in();
        let cmd = state.logout();
        assert!(matches!(cmd, AsyncCommand::CancelAll));
        assert_eq!(state.route, Route::Auth);
        assert!(!state.auth.state().is_authenticated());
    }

    #[test]
    fn test_attach_missing_file_reports() {
        let mut state = signed_in();
        state.attach_upload("/definitely/not/here.png");
        assert!(state.form.upload.is_none());
        assert!(state.status.starts_with("❌"));
    }

    #[test]
    fn test_attach_upload_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beach_day.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let mut state = signed_in();
        state.attach_upload(path.to_str().unwrap());
        assert!(state.form.upload.is_some());
    }
}
