//! Screen routing and auth gating

use crate::auth::AuthState;

/// A dashboard view reachable from the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum DashboardView {
    #[default]
    Create,
    Review,
    Connections,
    Settings,
}

impl DashboardView {
    /// Sidebar order
    pub const fn all() -> &'static [Self] {
        &[Self::Create, Self::Review, Self::Connections, Self::Settings]
    }

    /// Sidebar label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Create => "Create Content",
            Self::Review => "Review & Schedule",
            Self::Connections => "Connections",
            Self::Settings => "Settings",
        }
    }

    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Create => "✏️",
            Self::Review => "📅",
            Self::Connections => "🔗",
            Self::Settings => "⚙️",
        }
    }

    /// Position in the sidebar
    pub const fn index(&self) -> usize {
        match self {
            Self::Create => 0,
            Self::Review => 1,
            Self::Connections => 2,
            Self::Settings => 3,
        }
    }

    /// View for a sidebar position (number keys are 1-based)
    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> Self {
        Self::all()[(self.index() + 1) % Self::all().len()]
    }

    pub fn prev(&self) -> Self {
        let len = Self::all().len();
        Self::all()[(self.index() + len - 1) % len]
    }
}

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    /// Startup splash
    #[default]
    Splash,
    /// Login / signup
    Auth,
    /// Authenticated dashboard
    Dashboard(DashboardView),
}

impl Route {
    /// Where the root path lands for the given auth state
    pub const fn root(auth: &AuthState) -> Self {
        if auth.is_authenticated() {
            Self::Dashboard(DashboardView::Create)
        } else {
            Self::Auth
        }
    }
}

/// Decide which route is actually shown for a requested one
pub fn resolve(requested: Route, auth: &AuthState) -> Route {
    let resolved = match (requested, auth.is_authenticated()) {
        (Route::Splash, _) => Route::Splash,
        (Route::Auth, true) => Route::Dashboard(DashboardView::Create),
        (Route::Dashboard(_), false) => Route::Auth,
        (route, _) => route,
    };
    if resolved != requested {
        tracing::debug!(?requested, ?resolved, "Route redirected");
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn signed_in() -> AuthState {
        AuthState::Authenticated(User::from_email("u1", "jane@example.com"))
    }

    #[test]
    fn test_anonymous_gated_to_auth() {
        for view in DashboardView::all() {
            assert_eq!(
                resolve(Route::Dashboard(*view), &AuthState::Anonymous),
                Route::Auth
            );
        }
        assert_eq!(resolve(Route::Auth, &AuthState::Anonymous), Route::Auth);
    }

    #[test]
    fn test_authenticated_skips_auth() {
        let auth = signed_in();
        assert_eq!(
            resolve(Route::Auth, &auth),
            Route::Dashboard(DashboardView::Create)
        );
        assert_eq!(
            resolve(Route::Dashboard(DashboardView::Settings), &auth),
            Route::Dashboard(DashboardView::Settings)
        );
    }

    #[test]
    fn test_root() {
        assert_eq!(Route::root(&AuthState::Anonymous), Route::Auth);
        assert_eq!(
            Route::root(&signed_in()),
            Route::Dashboard(DashboardView::Create)
        );
    }

    #[test]
    fn test_sidebar_order() {
        let labels: Vec<_> = DashboardView::all().iter().map(DashboardView::label).collect();
        assert_eq!(
            labels,
            ["Create Content", "Review & Schedule", "Connections", "Settings"]
        );
        assert_eq!(DashboardView::Settings.next(), DashboardView::Create);
        assert_eq!(DashboardView::Create.prev(), DashboardView::Settings);
        assert_eq!(DashboardView::from_index(1), Some(DashboardView::Review));
        assert_eq!(DashboardView::from_index(4), None);
    }
}
