//! Login form state.

use crate::auth::{AuthApi, Credentials, LoginOutcome, SessionManager};

/// Shown when a login is submitted with an empty field.
pub const MISSING_CREDENTIALS_MESSAGE: &str = "Please fill in all fields";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

impl LoginField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::Password => "Password",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Username => Self::Password,
            Self::Password => Self::Username,
        }
    }
}

/// Credentials being typed plus the error currently displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    draft: Credentials,
    error: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &Credentials {
        &self.draft
    }

    pub fn value(&self, field: LoginField) -> &str {
        match field {
            LoginField::Username => &self.draft.username,
            LoginField::Password => &self.draft.password,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace one field. Any displayed error is cleared.
    pub fn edit(&mut self, field: LoginField, value: impl Into<String>) {
        let value = value.into();
        self.draft = match field {
            LoginField::Username => Credentials {
                username: value,
                ..self.draft.clone()
            },
            LoginField::Password => Credentials {
                password: value,
                ..self.draft.clone()
            },
        };
        self.error = None;
    }

    /// Forget the typed password, keeping the username.
    pub fn clear_password(&mut self) {
        self.draft.password.clear();
    }

    /// Run the presence check.
    ///
    /// Returns the credentials to send, or `None` after setting the
    /// validation message.
    pub fn prepare(&mut self) -> Option<Credentials> {
        if self.draft.is_complete() {
            self.error = None;
            Some(self.draft.clone())
        } else {
            self.error = Some(MISSING_CREDENTIALS_MESSAGE.to_string());
            None
        }
    }

    /// Display the result of a login attempt.
    pub fn apply(&mut self, outcome: &LoginOutcome) {
        self.error = outcome.error().map(str::to_string);
    }

    /// Validate and log in through `session`.
    ///
    /// Returns `None` when the presence check failed and no request was
    /// made.
    pub async fn submit<A: AuthApi>(
        &mut self,
        session: &mut SessionManager<A>,
    ) -> Option<LoginOutcome> {
        let credentials = self.prepare()?;
        let outcome = session
            .login(&credentials.username, &credentials.password)
            .await;
        self.apply(&outcome);
        Some(outcome)
    }
}
