//! The three managed collections.

mod admin;
mod client;
mod staff;

pub use admin::{AdminForm, AdminKind, AdminPayload};
pub use client::{ClientForm, ClientKind, ClientPayload};
pub use staff::{StaffForm, StaffKind, StaffPayload, MIN_PASSWORD_LEN};
