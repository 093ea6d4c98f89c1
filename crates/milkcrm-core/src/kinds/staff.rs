//! Delivery staff.

use crate::entity::{require, EntityKind, FieldKind, FieldSpec, FormMode};
use crate::error::{FieldError, FormError};
use crate::models::{EntityId, Shift, Staff};
use serde::Serialize;

/// Minimum password length for a new staff login.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy)]
pub struct StaffKind;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffForm {
    pub name: String,
    /// Login identifier; the backend calls it `username`.
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub address: String,
    pub zone: String,
    pub shift: Shift,
}

/// Outgoing staff body. The confirmation never leaves the form, and the
/// password is only present when one was typed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub address: String,
    pub zone: String,
    pub shift: Shift,
}

impl EntityKind for StaffKind {
    type Record = Staff;
    type Form = StaffForm;
    type Payload = StaffPayload;

    const NOUN: &'static str = "staff member";
    const COLLECTION: &'static str = "staff";
    const RESOURCE: &'static str = "staff";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Full Name", FieldKind::Text),
        FieldSpec::new("email", "Email", FieldKind::Text),
        FieldSpec::new("phone", "Phone", FieldKind::Text),
        FieldSpec::new("password", "Password", FieldKind::Secret),
        FieldSpec::new("confirmPassword", "Confirm Password", FieldKind::Secret),
        FieldSpec::new("address", "Address", FieldKind::Text),
        FieldSpec::new("zone", "Zone", FieldKind::Text),
        FieldSpec::new("shift", "Shift", FieldKind::Shift),
    ];

    fn id(record: &Staff) -> &EntityId {
        &record.id
    }

    fn search_fields(record: &Staff) -> Vec<&str> {
        [
            Some(record.name.as_str()),
            record.username.as_deref(),
            record.location.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn form_from(record: &Staff) -> StaffForm {
        let location = record.location.clone().unwrap_or_default();
        StaffForm {
            name: record.name.clone(),
            email: record.username.clone().unwrap_or_default(),
            phone: record.contact_number.clone().unwrap_or_default(),
            password: String::new(),
            confirm_password: String::new(),
            // The backend keeps a single location; it seeds both fields.
            address: location.clone(),
            zone: location,
            shift: record.shift,
        }
    }

    fn field(form: &StaffForm, name: &str) -> Option<String> {
        let value = match name {
            "name" => form.name.clone(),
            "email" => form.email.clone(),
            "phone" => form.phone.clone(),
            "password" => form.password.clone(),
            "confirmPassword" => form.confirm_password.clone(),
            "address" => form.address.clone(),
            "zone" => form.zone.clone(),
            "shift" => form.shift.to_string(),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(form: &mut StaffForm, name: &str, value: &str) -> Result<(), FormError> {
        match name {
            "name" => form.name = value.to_string(),
            "email" => form.email = value.to_string(),
            "phone" => form.phone = value.to_string(),
            "password" => form.password = value.to_string(),
            "confirmPassword" => form.confirm_password = value.to_string(),
            "address" => form.address = value.to_string(),
            "zone" => form.zone = value.to_string(),
            "shift" => {
                form.shift = value
                    .parse()
                    .map_err(|_| FormError::invalid(name, value))?
            }
            _ => return Err(FormError::UnknownField(name.to_string())),
        }
        Ok(())
    }

    fn clears_field_error(name: &str) -> bool {
        matches!(name, "password" | "confirmPassword")
    }

    fn validate(form: &StaffForm, mode: FormMode) -> Result<(), FieldError> {
        if form.password != form.confirm_password {
            return Err(FieldError::new("confirmPassword", "Passwords don't match"));
        }

        // Length is only enforced for a new login; on edit a blank password
        // means "leave unchanged".
        if mode == FormMode::Create && form.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FieldError::new(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }

        require(&form.name, "name", "Full name")?;
        require(&form.email, "email", "Email")?;
        Ok(())
    }

    fn payload(form: &StaffForm, mode: FormMode) -> Result<StaffPayload, FieldError> {
        let password = match mode {
            FormMode::Edit if form.password.is_empty() => None,
            _ => Some(form.password.clone()),
        };

        Ok(StaffPayload {
            name: form.name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            password,
            address: form.address.clone(),
            zone: form.zone.clone(),
            shift: form.shift,
        })
    }
}
