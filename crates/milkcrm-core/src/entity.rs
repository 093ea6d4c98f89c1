//! The entity-shape abstraction the list manager is generic over.
//!
//! Each managed collection (clients, staff, admins) is described by one
//! [`EntityKind`] implementation: the record the backend returns, the editable
//! form draft, the payload sent on create/update, the field mapping between
//! record and form, the validation rules and the searchable fields.

use crate::error::{FieldError, FormError};
use crate::models::EntityId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Whether the form is creating a new entity or editing an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// How a form field is edited and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Write-only; displayed masked.
    Secret,
    Number,
    Shift,
    Flag,
}

/// Static description of one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire/form name, e.g. `pricePerLitre`.
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind }
    }
}

/// Shape of one remotely managed entity collection.
pub trait EntityKind: 'static {
    /// Record as returned by `list`/`create`/`update`.
    type Record: Clone + Debug + DeserializeOwned + 'static;
    /// Local editable draft.
    type Form: Clone + Debug + Default + PartialEq + 'static;
    /// Body sent on create/update.
    type Payload: Clone + Debug + PartialEq + Serialize + 'static;

    /// Singular noun used in messages, e.g. "staff member".
    const NOUN: &'static str;
    /// Plural noun used in messages, e.g. "clients".
    const COLLECTION: &'static str;
    /// Path segment of the REST resource, e.g. `clients`.
    const RESOURCE: &'static str;
    /// Form fields in display order.
    const FIELDS: &'static [FieldSpec];

    fn id(record: &Self::Record) -> &EntityId;

    /// Values of the designated searchable fields. Absent values are skipped.
    fn search_fields(record: &Self::Record) -> Vec<&str>;

    /// Copy the editable fields of a record into a fresh form, applying any
    /// record-to-form renames.
    fn form_from(record: &Self::Record) -> Self::Form;

    /// Current value of a form field as text, or `None` for an unknown name.
    fn field(form: &Self::Form, name: &str) -> Option<String>;

    /// Merge one field into the form.
    fn set_field(form: &mut Self::Form, name: &str, value: &str) -> Result<(), FormError>;

    /// Whether editing `name` clears an outstanding validation error.
    fn clears_field_error(_name: &str) -> bool {
        false
    }

    fn validate(form: &Self::Form, mode: FormMode) -> Result<(), FieldError>;

    /// Build the outgoing payload. Only called after `validate` succeeded.
    fn payload(form: &Self::Form, mode: FormMode) -> Result<Self::Payload, FieldError>;

    /// Text of the confirmation step before deleting `record`.
    fn delete_prompt(_record: Option<&Self::Record>) -> String {
        format!("Are you sure you want to delete this {}?", Self::NOUN)
    }
}

/// Returns the trimmed value, or a "required" error when blank.
pub(crate) fn require<'a>(
    value: &'a str,
    field: &'static str,
    label: &str,
) -> Result<&'a str, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FieldError::required(field, label))
    } else {
        Ok(trimmed)
    }
}

pub(crate) fn parse_flag(field: &str, value: &str) -> Result<bool, FormError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" | "" => Ok(false),
        _ => Err(FormError::invalid(field, value)),
    }
}
