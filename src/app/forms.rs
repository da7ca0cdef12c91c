//! Account forms: login, registration and password management.
//!
//! A [`FormState`] holds field values, focus and the form-local error and
//! notice lines. Results of account operations are reported here only, never
//! through the artwork list.

use crate::auth::service::{validate_email, validate_password, MIN_NEW_PASSWORD};
use crate::domain::error::{GalleryError, Result};

/// The account forms the plugin can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Register,
    ChangePassword,
    DeleteAccount,
    ForgotPassword,
    ResetPassword,
}

impl FormKind {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Register => "Create account",
            Self::ChangePassword => "Change password",
            Self::DeleteAccount => "Delete account",
            Self::ForgotPassword => "Forgot password",
            Self::ResetPassword => "Reset password",
        }
    }

    /// Whether the form can only be used by a signed-in user.
    #[must_use]
    pub const fn requires_auth(self) -> bool {
        matches!(self, Self::ChangePassword | Self::DeleteAccount)
    }

    fn fields(self) -> Vec<FormField> {
        match self {
            Self::Login => vec![FormField::text("Email"), FormField::secret("Password")],
            Self::Register => vec![
                FormField::text("Username"),
                FormField::text("Email"),
                FormField::secret("Password"),
                FormField::secret("Confirm password"),
            ],
            Self::ChangePassword => vec![
                FormField::secret("Current password"),
                FormField::secret("New password"),
                FormField::secret("Confirm new password"),
            ],
            Self::DeleteAccount => vec![FormField::secret("Password")],
            Self::ForgotPassword => vec![FormField::text("Email")],
            Self::ResetPassword => vec![
                FormField::text("Reset token"),
                FormField::secret("New password"),
                FormField::secret("Confirm new password"),
            ],
        }
    }
}

/// One input line of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    /// Rendered masked.
    pub secret: bool,
}

impl FormField {
    const fn text(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            secret: false,
        }
    }

    const fn secret(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            secret: true,
        }
    }
}

/// An open form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub error: Option<String>,
    pub notice: Option<String>,
    /// A request for this form is in flight.
    pub submitting: bool,
}

impl FormState {
    #[must_use]
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            fields: kind.fields(),
            focus: 0,
            error: None,
            notice: None,
            submitting: false,
        }
    }

    /// Value of the field at `index`, empty if out of range.
    #[must_use]
    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", |f| f.value.as_str())
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_previous(&mut self) {
        if !self.fields.is_empty() {
            self.focus = self.focus.checked_sub(1).unwrap_or(self.fields.len() - 1);
        }
    }

    /// Clears every field value and moves focus to the first field.
    pub fn clear_values(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
        self.focus = 0;
    }

    /// Marks the form as waiting for the backend.
    pub fn begin_submit(&mut self) {
        self.error = None;
        self.notice = None;
        self.submitting = true;
    }

    pub fn finish_with_error(&mut self, error: &GalleryError) {
        self.submitting = false;
        self.notice = None;
        self.error = Some(error.to_string());
    }

    pub fn finish_with_notice(&mut self, notice: impl Into<String>) {
        self.submitting = false;
        self.error = None;
        self.notice = Some(notice.into());
    }

    /// Local checks for the password-management forms.
    ///
    /// Login and registration are validated by the auth service.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Validation`] describing the first failing check.
    pub fn validate_account_form(&self) -> Result<()> {
        match self.kind {
            FormKind::ChangePassword => {
                if self.value(0).is_empty() {
                    return Err(GalleryError::Validation("Current password is required".into()));
                }
                check_new_password(self.value(1), self.value(2))
            }
            FormKind::DeleteAccount => {
                if self.value(0).is_empty() {
                    return Err(GalleryError::Validation("Password is required to delete the account".into()));
                }
                Ok(())
            }
            FormKind::ForgotPassword => validate_email(self.value(0).trim()),
            FormKind::ResetPassword => {
                if self.value(0).trim().is_empty() {
                    return Err(GalleryError::Validation("Reset token is required".into()));
                }
                check_new_password(self.value(1), self.value(2))
            }
            FormKind::Login | FormKind::Register => Ok(()),
        }
    }
}

fn check_new_password(new: &str, confirm: &str) -> Result<()> {
    if new != confirm {
        return Err(GalleryError::Validation("New passwords do not match".into()));
    }
    validate_password(new, MIN_NEW_PASSWORD)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(kind: FormKind, values: &[&str]) -> FormState {
        let mut form = FormState::new(kind);
        for (field, value) in form.fields.iter_mut().zip(values) {
            field.value = (*value).to_string();
        }
        form
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let mut form = FormState::new(FormKind::Login);
        form.push_char('a');
        form.focus_next();
        form.push_char('x');
        form.push_char('y');
        form.pop_char();
        assert_eq!(form.value(0), "a");
        assert_eq!(form.value(1), "x");

        form.focus_next();
        assert_eq!(form.focus, 0);
        form.focus_previous();
        assert_eq!(form.focus, 1);
    }

    #[test]
    fn change_password_needs_eight_matching_characters() {
        assert!(filled(FormKind::ChangePassword, &["old", "short", "short"]).validate_account_form().is_err());
        assert!(filled(FormKind::ChangePassword, &["old", "longenough", "longenougH"])
            .validate_account_form()
            .is_err());
        assert!(filled(FormKind::ChangePassword, &["old", "longenough", "longenough"])
            .validate_account_form()
            .is_ok());
    }

    #[test]
    fn reset_requires_token() {
        assert!(filled(FormKind::ResetPassword, &[" ", "longenough", "longenough"])
            .validate_account_form()
            .is_err());
    }

    #[test]
    fn submit_lifecycle_sets_messages() {
        let mut form = FormState::new(FormKind::ForgotPassword);
        form.begin_submit();
        assert!(form.submitting);
        form.finish_with_error(&GalleryError::Validation("Unknown email".into()));
        assert_eq!(form.error.as_deref(), Some("Unknown email"));
        form.finish_with_notice("Check your inbox");
        assert!(form.error.is_none());
        assert!(!form.submitting);
    }
}
