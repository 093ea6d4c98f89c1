//! Shared data types for the application.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier assigned by the backend. Opaque and immutable once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Delivery shift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    #[default]
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl Shift {
    pub fn as_str(self) -> &'static str {
        match self {
            Shift::Am => "AM",
            Shift::Pm => "PM",
        }
    }

    /// The other shift.
    pub fn toggled(self) -> Self {
        match self {
            Shift::Am => Shift::Pm,
            Shift::Pm => Shift::Am,
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown shift {0:?}, expected AM or PM")]
pub struct ParseShiftError(String);

impl FromStr for Shift {
    type Err = ParseShiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AM" => Ok(Shift::Am),
            "PM" => Ok(Shift::Pm),
            _ => Err(ParseShiftError(s.to_string())),
        }
    }
}

/// A delivery client as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub name: String,
    /// Contact number.
    pub number: String,
    pub location: String,
    pub time_shift: Shift,
    pub price_per_litre: f64,
    /// Daily quantity in litres.
    pub quantity: f64,
    #[serde(default)]
    pub priority_status: bool,
}

/// A delivery staff member as returned by the backend.
///
/// The password is write-only and never comes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub name: String,
    /// Login identifier.
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    /// Location / delivery zone.
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub shift: Shift,
}

/// An admin account as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub name: String,
    /// Login identifier.
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_decodes_backend_shape() {
        let json = r#"{
            "_id": "c1",
            "name": "Asha",
            "number": "9876543210",
            "location": "Sector 4",
            "timeShift": "PM",
            "pricePerLitre": 56.5,
            "quantity": 2
        }"#;

        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.id.as_str(), "c1");
        assert_eq!(client.time_shift, Shift::Pm);
        assert_eq!(client.quantity, 2.0);
        assert!(!client.priority_status);
    }

    #[test]
    fn test_staff_tolerates_missing_optional_fields() {
        let staff: Staff = serde_json::from_str(r#"{"_id": "s1", "name": "Ravi"}"#).unwrap();
        assert_eq!(staff.username, None);
        assert_eq!(staff.location, None);
        assert_eq!(staff.shift, Shift::Am);
    }

    #[test]
    fn test_shift_parsing() {
        assert_eq!("am".parse::<Shift>().unwrap(), Shift::Am);
        assert_eq!(" PM ".parse::<Shift>().unwrap(), Shift::Pm);
        assert!("noon".parse::<Shift>().is_err());
        assert_eq!(Shift::Am.toggled(), Shift::Pm);
    }
}
