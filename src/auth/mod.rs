//! Authentication gate
//!
//! Holds who is signed in for this session. Credentials are checked by an
//! [`IdentityService`](crate::services::IdentityService) on the async worker;
//! the resulting [`Session`] is applied here. Nothing is persisted, so every
//! launch starts anonymous.

use crate::error::ValidationError;
use crate::models::User;
use crate::services::Session;

/// Whether someone is signed in
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl AuthState {
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Anonymous => None,
        }
    }
}

/// Login or signup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    pub const fn toggle(self) -> Self {
        match self {
            Self::Login => Self::Signup,
            Self::Signup => Self::Login,
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Signup => "Create account",
        }
    }
}

/// Input field on the auth screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthField {
    Name,
    #[default]
    Email,
    Password,
}

/// Contents of the login/signup form
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
    pub focus: AuthField,
}

impl AuthForm {
    /// Fields shown for the current mode, in tab order
    pub const fn fields(&self) -> &'static [AuthField] {
        match self.mode {
            AuthMode::Login => &[AuthField::Email, AuthField::Password],
            AuthMode::Signup => &[AuthField::Name, AuthField::Email, AuthField::Password],
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggle();
        if !self.fields().contains(&self.focus) {
            self.focus = AuthField::Email;
        }
    }

    pub fn next_field(&mut self) {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(pos + 1) % fields.len()];
    }

    pub fn prev_field(&mut self) {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(pos + fields.len() - 1) % fields.len()];
    }

    /// Buffer behind the focused field
    pub const fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            AuthField::Name => &mut self.name,
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
        }
    }

    /// Required fields are all filled in
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing_name = self.mode == AuthMode::Signup && self.name.trim().is_empty();
        if self.email.trim().is_empty() || self.password.is_empty() || missing_name {
            return Err(ValidationError::MissingCredentials);
        }
        Ok(())
    }

    /// Forget the password after a submit
    pub fn clear_secret(&mut self) {
        self.password.clear();
    }
}

/// Session holder
#[derive(Debug, Default)]
pub struct AuthGate {
    state: AuthState,
}

impl AuthGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn state(&self) -> &AuthState {
        &self.state
    }

    pub const fn user(&self) -> Option<&User> {
        self.state.user()
    }

    /// Install a session returned by the identity service
    pub fn apply_session(&mut self, session: Session) {
        tracing::info!(email = %session.user.email, "Signed in");
        self.state = AuthState::Authenticated(session.user);
    }

    /// Sign out unconditionally
    pub fn logout(&mut self) {
        if let Some(user) = self.state.user() {
            tracing::info!(email = %user.email, "Signed out");
        }
        self.state = AuthState::Anonymous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContentError;
    use crate::services::IdentityService;
    use crate::services::mock::MockStudio;

    #[test]
    fn test_starts_anonymous() {
        let gate = AuthGate::new();
        assert_eq!(gate.state(), &AuthState::Anonymous);
        assert!(gate.user().is_none());
    }

    #[test]
    fn test_login_session_derives_name_from_email() {
        let studio = MockStudio::instant();
        let mut gate = AuthGate::new();
        let session =
            tokio_test::block_on(studio.login("jane@x.io".into(), "pw".into())).unwrap();
        gate.apply_session(session);
        assert!(gate.state().is_authenticated());
        assert_eq!(gate.user().unwrap().name, "jane");
    }

    #[test]
    fn test_failed_login_yields_no_session() {
        let studio = MockStudio::instant();
        let err = tokio_test::block_on(studio.login("jane@x.io".into(), String::new()))
            .unwrap_err();
        assert_eq!(
            err,
            ContentError::Validation(ValidationError::MissingCredentials)
        );
    }

    #[test]
    fn test_signup_session_uses_given_name() {
        let studio = MockStudio::instant();
        let mut gate = AuthGate::new();
        let session = tokio_test::block_on(studio.signup(
            "a@b.c".into(),
            "pw".into(),
            "Ada Lovelace".into(),
        ))
        .unwrap();
        gate.apply_session(session);
        assert_eq!(gate.user().unwrap().name, "Ada Lovelace");
    }

    #[test]
    fn test_logout_always_resets() {
        let mut gate = AuthGate::new();
        gate.logout();
        assert_eq!(gate.state(), &AuthState::Anonymous);

        gate.apply_session(Session {
            token: "t".into(),
            user: User::from_email("1", "a@b.c"),
        });
        gate.logout();
        assert_eq!(gate.state(), &AuthState::Anonymous);
    }

    #[test]
    fn test_form_fields_follow_mode() {
        let mut form = AuthForm::default();
        assert_eq!(form.fields(), &[AuthField::Email, AuthField::Password]);
        form.next_field();
        assert_eq!(form.focus, AuthField::Password);
        form.next_field();
        assert_eq!(form.focus, AuthField::Email);

        form.toggle_mode();
        assert_eq!(form.mode, AuthMode::Signup);
        form.prev_field();
        assert_eq!(form.focus, AuthField::Name);
        form.focused_mut().push_str("Ada");
        assert_eq!(form.name, "Ada");

        form.toggle_mode();
        assert_eq!(form.focus, AuthField::Email);
    }

    #[test]
    fn test_form_validation() {
        let mut form = AuthForm {
            email: "a@b.c".into(),
            password: "pw".into(),
            ..AuthForm::default()
        };
        assert!(form.validate().is_ok());
        form.mode = AuthMode::Signup;
        assert_eq!(form.validate(), Err(ValidationError::MissingCredentials));
        form.name = "Ada".into();
        assert!(form.validate().is_ok());
    }
}
