//! Delivery clients.

use crate::entity::{parse_flag, require, EntityKind, FieldKind, FieldSpec, FormMode};
use crate::error::{FieldError, FormError};
use crate::models::{Client, EntityId, Shift};
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct ClientKind;

/// Editable draft of a client. Numeric fields are kept as typed text and
/// parsed on validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientForm {
    pub name: String,
    pub number: String,
    pub location: String,
    pub time_shift: Shift,
    pub price_per_litre: String,
    pub quantity: String,
    pub priority_status: bool,
}

impl Default for ClientForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            number: String::new(),
            location: String::new(),
            time_shift: Shift::Am,
            price_per_litre: "0".to_string(),
            quantity: "0".to_string(),
            priority_status: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    pub name: String,
    pub number: String,
    pub location: String,
    pub time_shift: Shift,
    pub price_per_litre: f64,
    pub quantity: f64,
    pub priority_status: bool,
}

fn parse_amount(value: &str, field: &'static str, label: &str) -> Result<f64, FieldError> {
    let raw = require(value, field, label)?;
    match raw.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(FieldError::new(
            field,
            format!("{label} must be a non-negative number"),
        )),
    }
}

impl EntityKind for ClientKind {
    type Record = Client;
    type Form = ClientForm;
    type Payload = ClientPayload;

    const NOUN: &'static str = "client";
    const COLLECTION: &'static str = "clients";
    const RESOURCE: &'static str = "clients";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Client Name", FieldKind::Text),
        FieldSpec::new("number", "Contact Number", FieldKind::Text),
        FieldSpec::new("location", "Location", FieldKind::Text),
        FieldSpec::new("timeShift", "Time Shift", FieldKind::Shift),
        FieldSpec::new("pricePerLitre", "Price per Litre", FieldKind::Number),
        FieldSpec::new("quantity", "Quantity (Litres)", FieldKind::Number),
        FieldSpec::new("priorityStatus", "Priority", FieldKind::Flag),
    ];

    fn id(record: &Client) -> &EntityId {
        &record.id
    }

    fn search_fields(record: &Client) -> Vec<&str> {
        vec![&record.name, &record.location, &record.number]
    }

    fn form_from(record: &Client) -> ClientForm {
        ClientForm {
            name: record.name.clone(),
            number: record.number.clone(),
            location: record.location.clone(),
            time_shift: record.time_shift,
            price_per_litre: record.price_per_litre.to_string(),
            quantity: record.quantity.to_string(),
            priority_status: record.priority_status,
        }
    }

    fn field(form: &ClientForm, name: &str) -> Option<String> {
        let value = match name {
            "name" => form.name.clone(),
            "number" => form.number.clone(),
            "location" => form.location.clone(),
            "timeShift" => form.time_shift.to_string(),
            "pricePerLitre" => form.price_per_litre.clone(),
            "quantity" => form.quantity.clone(),
            "priorityStatus" => form.priority_status.to_string(),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(form: &mut ClientForm, name: &str, value: &str) -> Result<(), FormError> {
        match name {
            "name" => form.name = value.to_string(),
            "number" => form.number = value.to_string(),
            "location" => form.location = value.to_string(),
            "timeShift" => {
                form.time_shift = value
                    .parse()
                    .map_err(|_| FormError::invalid(name, value))?
            }
            "pricePerLitre" => form.price_per_litre = value.to_string(),
            "quantity" => form.quantity = value.to_string(),
            "priorityStatus" => form.priority_status = parse_flag(name, value)?,
            _ => return Err(FormError::UnknownField(name.to_string())),
        }
        Ok(())
    }

    fn validate(form: &ClientForm, mode: FormMode) -> Result<(), FieldError> {
        Self::payload(form, mode).map(|_| ())
    }

    fn payload(form: &ClientForm, _mode: FormMode) -> Result<ClientPayload, FieldError> {
        require(&form.name, "name", "Client name")?;
        require(&form.number, "number", "Contact number")?;
        require(&form.location, "location", "Location")?;
        let price_per_litre = parse_amount(&form.price_per_litre, "pricePerLitre", "Price per litre")?;
        let quantity = parse_amount(&form.quantity, "quantity", "Quantity")?;

        Ok(ClientPayload {
            name: form.name.clone(),
            number: form.number.clone(),
            location: form.location.clone(),
            time_shift: form.time_shift,
            price_per_litre,
            quantity,
            priority_status: form.priority_status,
        })
    }
}
