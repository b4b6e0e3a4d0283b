//! Login and registration forms.
//!
//! Both screens share one [`AuthForm`] parameterised by [`AuthMode`]; they
//! differ only in the confirm-password field, the endpoint they submit to and
//! how server errors are worded.

use crate::api::{Credentials, ErrorKind, FetchError};

const USERNAME_TAKEN: &str = "This username isn't available. Please try another";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    pub fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Register => "Register",
        }
    }

    fn fields(self) -> &'static [Field] {
        match self {
            AuthMode::Login => &[Field::Username, Field::Password],
            AuthMode::Register => &[Field::Username, Field::Password, Field::Confirm],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Password,
    Confirm,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Username => "Username",
            Field::Password => "Password",
            Field::Confirm => "Confirm Password",
        }
    }

    pub fn is_secret(self) -> bool {
        !matches!(self, Field::Username)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// One line of feedback shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthForm {
    mode: AuthMode,
    pub username: String,
    pub password: String,
    pub confirm: String,
    focus: usize,
    pub banners: Vec<Banner>,
    submitting: bool,
}

impl AuthForm {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            username: String::new(),
            password: String::new(),
            confirm: String::new(),
            focus: 0,
            banners: Vec::new(),
            submitting: false,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn fields(&self) -> &'static [Field] {
        self.mode.fields()
    }

    pub fn focused(&self) -> Field {
        self.fields()[self.focus]
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Password => &self.password,
            Field::Confirm => &self.confirm,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
            Field::Confirm => &mut self.confirm,
        }
    }

    /// Whether the two password fields disagree.  Always `false` for login.
    pub fn passwords_mismatch(&self) -> bool {
        self.mode == AuthMode::Register && self.password != self.confirm
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields().len();
    }

    pub fn focus_previous(&mut self) {
        let len = self.fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn push_char(&mut self, c: char) {
        let field = self.focused();
        self.value_mut(field).push(c);
    }

    pub fn pop_char(&mut self) {
        let field = self.focused();
        self.value_mut(field).pop();
    }

    /// Forget everything typed and every banner.
    pub fn clear(&mut self) {
        *self = Self::new(self.mode);
    }

    /// Validate and hand out the credentials to send.
    ///
    /// Returns `None` when validation fails (banners explain why) or when a
    /// submission is already in flight.
    pub fn submit(&mut self) -> Option<Credentials> {
        if self.submitting {
            return None;
        }

        let username = self.username.trim();
        let mut problems = Vec::new();
        if username.is_empty() {
            problems.push(Banner::error("Username cannot be empty"));
        }
        if self.password.is_empty() {
            problems.push(Banner::error("Password cannot be empty"));
        }
        if self.passwords_mismatch() {
            problems.push(Banner::error("Passwords do not match"));
        }
        if !problems.is_empty() {
            self.banners = problems;
            return None;
        }

        self.submitting = true;
        self.banners.clear();
        Some(Credentials {
            username: username.to_string(),
            password: self.password.clone(),
        })
    }

    /// Record the server's answer.  Returns `true` on success.
    ///
    /// Success clears the form; the caller takes care of navigation.
    pub fn finish(&mut self, result: Result<(), FetchError>) -> bool {
        self.submitting = false;
        match result {
            Ok(()) => {
                self.clear();
                true
            }
            Err(e) => {
                tracing::info!(mode = ?self.mode, error = %e, "authentication rejected");
                self.banners = self.error_banners(&e);
                false
            }
        }
    }

    fn error_banners(&self, error: &FetchError) -> Vec<Banner> {
        if !matches!(error, FetchError::Application { .. }) {
            let message = match self.mode {
                AuthMode::Login => "Login request failed",
                AuthMode::Register => "Registration request failed",
            };
            return vec![Banner::error(message)];
        }

        if self.mode == AuthMode::Register && is_username_taken(error) {
            return vec![Banner::error(USERNAME_TAKEN)];
        }

        error
            .errors()
            .iter()
            .map(|e| {
                if e.message.is_empty() {
                    Banner::error(e.kind.to_string())
                } else {
                    Banner::error(e.message.clone())
                }
            })
            .collect()
    }
}

fn is_username_taken(error: &FetchError) -> bool {
    error.status() == Some(409)
        || error.has_kind(ErrorKind::UniqueViolationError)
        || error.has_kind(ErrorKind::UserAlreadyPresent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use pretty_assertions::assert_eq;

    fn typed(mode: AuthMode, username: &str, password: &str, confirm: &str) -> AuthForm {
        let mut form = AuthForm::new(mode);
        form.username = username.into();
        form.password = password.into();
        form.confirm = confirm.into();
        form
    }

    fn rejected(status: u16, kind: ErrorKind, message: &str) -> Result<(), FetchError> {
        Err(FetchError::Application {
            status,
            errors: vec![ApiError::new(kind, message)],
        })
    }

    fn messages(form: &AuthForm) -> Vec<&str> {
        form.banners.iter().map(|b| b.message.as_str()).collect()
    }

    #[test]
    fn both_empty_fields_are_reported_together() {
        let mut form = typed(AuthMode::Login, "   ", "", "");
        assert_eq!(form.submit(), None);
        assert_eq!(
            messages(&form),
            vec!["Username cannot be empty", "Password cannot be empty"]
        );
    }

    #[test]
    fn single_empty_field_is_reported() {
        let mut form = typed(AuthMode::Login, "alice", "", "");
        assert_eq!(form.submit(), None);
        assert_eq!(messages(&form), vec!["Password cannot be empty"]);
    }

    #[test]
    fn login_submits_trimmed_username() {
        let mut form = typed(AuthMode::Login, "  alice ", "pw", "");
        assert_eq!(
            form.submit(),
            Some(Credentials {
                username: "alice".into(),
                password: "pw".into()
            })
        );
        assert!(form.is_submitting());
    }

    #[test]
    fn duplicate_submit_is_ignored_while_in_flight() {
        let mut form = typed(AuthMode::Login, "alice", "pw", "");
        assert!(form.submit().is_some());
        assert!(form.submit().is_none());
    }

    #[test]
    fn register_mismatch_blocks_submit() {
        let mut form = typed(AuthMode::Register, "alice", "pw", "pW");
        assert!(form.passwords_mismatch());
        assert_eq!(form.submit(), None);
        assert_eq!(messages(&form), vec!["Passwords do not match"]);
    }

    #[test]
    fn login_success_clears_the_form() {
        let mut form = typed(AuthMode::Login, "alice", "pw", "");
        form.submit();
        assert!(form.finish(Ok(())));
        assert_eq!(form.username, "");
        assert_eq!(form.password, "");
        assert!(form.banners.is_empty());
        assert!(!form.is_submitting());
    }

    #[test]
    fn login_failure_shows_server_messages() {
        let mut form = typed(AuthMode::Login, "alice", "pw", "");
        form.submit();
        assert!(!form.finish(rejected(400, ErrorKind::WrongPassword, "Wrong password")));
        assert_eq!(messages(&form), vec!["Wrong password"]);
        assert_eq!(form.username, "alice", "input kept for a retry");
    }

    #[test]
    fn register_conflict_is_reworded() {
        let mut form = typed(AuthMode::Register, "alice", "pw", "pw");
        form.submit();
        form.finish(rejected(409, ErrorKind::Unknown, "duplicate key value"));
        assert_eq!(
            messages(&form),
            vec!["This username isn't available. Please try another"]
        );
    }

    #[test]
    fn register_bodiless_conflict_is_reworded() {
        let mut form = typed(AuthMode::Register, "alice", "pw", "pw");
        form.submit();
        form.finish(crate::api::decode::<serde_json::Value>(409, b"").map(|_| ()));
        assert_eq!(messages(&form), vec![USERNAME_TAKEN]);
    }

    #[test]
    fn register_unique_violation_is_reworded_on_any_status() {
        let mut form = typed(AuthMode::Register, "alice", "pw", "pw");
        form.submit();
        form.finish(rejected(400, ErrorKind::UniqueViolationError, "raw"));
        assert_eq!(messages(&form), vec![USERNAME_TAKEN]);
    }

    #[test]
    fn login_conflict_is_not_reworded() {
        let mut form = typed(AuthMode::Login, "alice", "pw", "");
        form.submit();
        form.finish(rejected(409, ErrorKind::UserAlreadyPresent, "raw"));
        assert_eq!(messages(&form), vec!["raw"]);
    }

    #[test]
    fn empty_server_message_falls_back_to_kind() {
        let mut form = typed(AuthMode::Login, "alice", "pw", "");
        form.submit();
        form.finish(rejected(400, ErrorKind::CookieNotSet, ""));
        assert_eq!(messages(&form), vec!["CookieNotSet"]);
    }

    #[test]
    fn parse_failure_shows_generic_banner() {
        let mut form = typed(AuthMode::Register, "alice", "pw", "pw");
        form.submit();
        let parse = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        form.finish(Err(parse.into()));
        assert_eq!(messages(&form), vec!["Registration request failed"]);
    }

    #[test]
    fn focus_cycles_through_mode_fields() {
        let mut form = AuthForm::new(AuthMode::Login);
        assert_eq!(form.focused(), Field::Username);
        form.focus_next();
        assert_eq!(form.focused(), Field::Password);
        form.focus_next();
        assert_eq!(form.focused(), Field::Username);
        form.focus_previous();
        assert_eq!(form.focused(), Field::Password);

        let mut register = AuthForm::new(AuthMode::Register);
        register.focus_previous();
        assert_eq!(register.focused(), Field::Confirm);
    }

    #[test]
    fn typing_goes_to_the_focused_field() {
        let mut form = AuthForm::new(AuthMode::Login);
        form.push_char('a');
        form.focus_next();
        form.push_char('x');
        form.push_char('y');
        form.pop_char();
        assert_eq!(form.value(Field::Username), "a");
        assert_eq!(form.value(Field::Password), "x");
    }
}
