//! Password change for the signed-in admin.

use crate::error::{FormError, RemoteError};
use crate::source::AccountSource;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PasswordChangeForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChangeForm {
    pub const FIELDS: [(&'static str, &'static str); 3] = [
        ("currentPassword", "Current Password"),
        ("newPassword", "New Password"),
        ("confirmPassword", "Confirm New Password"),
    ];

    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "currentPassword" => Some(&self.current_password),
            "newPassword" => Some(&self.new_password),
            "confirmPassword" => Some(&self.confirm_password),
            _ => None,
        }
    }
}

/// Credentials to send once the form is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChangeRequest {
    pub current: String,
    pub new: String,
}

#[derive(Debug, Default)]
pub struct PasswordChange {
    form: PasswordChangeForm,
    open: bool,
    error: Option<String>,
    notice: Option<String>,
}

impl PasswordChange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &PasswordChangeForm {
        &self.form
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn open(&mut self) {
        self.form = PasswordChangeForm::default();
        self.open = true;
        self.error = None;
        self.notice = None;
    }

    pub fn cancel(&mut self) {
        self.form = PasswordChangeForm::default();
        self.open = false;
        self.error = None;
    }

    pub fn update_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        let slot = match name {
            "currentPassword" => &mut self.form.current_password,
            "newPassword" => &mut self.form.new_password,
            "confirmPassword" => &mut self.form.confirm_password,
            _ => return Err(FormError::UnknownField(name.to_string())),
        };
        *slot = value.to_string();
        Ok(())
    }

    /// Validate locally; returns the request to send, or `None` with the
    /// error recorded.
    pub fn prepare(&mut self) -> Option<PasswordChangeRequest> {
        self.error = None;
        self.notice = None;

        let form = &self.form;
        if form.current_password.is_empty()
            || form.new_password.is_empty()
            || form.confirm_password.is_empty()
        {
            self.error = Some("Please fill in all fields".to_string());
            return None;
        }
        if form.new_password != form.confirm_password {
            self.error = Some("New passwords do not match".to_string());
            return None;
        }

        Some(PasswordChangeRequest {
            current: form.current_password.clone(),
            new: form.new_password.clone(),
        })
    }

    pub fn finish(&mut self, result: Result<(), RemoteError>) -> bool {
        match result {
            Ok(()) => {
                tracing::info!("Admin password changed");
                self.form = PasswordChangeForm::default();
                self.open = false;
                self.notice = Some("Password changed successfully".to_string());
                true
            }
            Err(e) => {
                tracing::warn!("Failed to change password: {}", e);
                self.error = Some(
                    e.server_message()
                        .unwrap_or("Failed to change password")
                        .to_string(),
                );
                false
            }
        }
    }

    pub async fn submit<S: AccountSource>(&mut self, source: &S) -> bool {
        let Some(request) = self.prepare() else {
            return false;
        };
        let result = source.change_password(&request.current, &request.new).await;
        self.finish(result)
    }
}
