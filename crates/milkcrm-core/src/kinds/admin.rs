//! Admin accounts, managed from the settings screen.

use crate::entity::{EntityKind, FieldKind, FieldSpec, FormMode};
use crate::error::{FieldError, FormError};
use crate::models::{Admin, EntityId};
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct AdminKind;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminPayload {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl EntityKind for AdminKind {
    type Record = Admin;
    type Form = AdminForm;
    type Payload = AdminPayload;

    const NOUN: &'static str = "admin";
    const COLLECTION: &'static str = "admins";
    const RESOURCE: &'static str = "admin";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Name", FieldKind::Text),
        FieldSpec::new("email", "Email", FieldKind::Text),
        FieldSpec::new("password", "Password", FieldKind::Secret),
    ];

    fn id(record: &Admin) -> &EntityId {
        &record.id
    }

    fn search_fields(record: &Admin) -> Vec<&str> {
        vec![&record.name, &record.email]
    }

    fn form_from(record: &Admin) -> AdminForm {
        AdminForm {
            name: record.name.clone(),
            email: record.email.clone(),
            password: String::new(),
        }
    }

    fn field(form: &AdminForm, name: &str) -> Option<String> {
        match name {
            "name" => Some(form.name.clone()),
            "email" => Some(form.email.clone()),
            "password" => Some(form.password.clone()),
            _ => None,
        }
    }

    fn set_field(form: &mut AdminForm, name: &str, value: &str) -> Result<(), FormError> {
        match name {
            "name" => form.name = value.to_string(),
            "email" => form.email = value.to_string(),
            "password" => form.password = value.to_string(),
            _ => return Err(FormError::UnknownField(name.to_string())),
        }
        Ok(())
    }

    fn validate(form: &AdminForm, mode: FormMode) -> Result<(), FieldError> {
        let blank = [
            ("name", form.name.trim().is_empty()),
            ("email", form.email.trim().is_empty()),
            ("password", mode == FormMode::Create && form.password.is_empty()),
        ]
        .into_iter()
        .find_map(|(field, blank)| blank.then_some(field));

        match blank {
            Some(field) => Err(FieldError::new(field, "Please fill in all fields")),
            None => Ok(()),
        }
    }

    fn payload(form: &AdminForm, _mode: FormMode) -> Result<AdminPayload, FieldError> {
        Ok(AdminPayload {
            name: form.name.clone(),
            email: form.email.clone(),
            password: (!form.password.is_empty()).then(|| form.password.clone()),
        })
    }

    fn delete_prompt(record: Option<&Admin>) -> String {
        match record {
            Some(admin) => format!("Delete admin {} ({})? This cannot be undone.", admin.name, admin.email),
            None => "Are you sure you want to delete this admin?".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_every_field() {
        let form = AdminForm {
            name: "Priya".into(),
            email: "priya@dairy.in".into(),
            password: String::new(),
        };
        let err = AdminKind::validate(&form, FormMode::Create).unwrap_err();
        assert_eq!(err.field, "password");
        assert_eq!(err.message, "Please fill in all fields");

        assert!(AdminKind::validate(&form, FormMode::Edit).is_ok());
    }

    #[test]
    fn test_edit_payload_without_password() {
        let record = Admin {
            id: EntityId::new("a1"),
            name: "Priya".into(),
            email: "priya@dairy.in".into(),
        };
        let payload = AdminKind::payload(&AdminKind::form_from(&record), FormMode::Edit).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Priya", "email": "priya@dairy.in"}));
    }
}
