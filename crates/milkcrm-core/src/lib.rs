//! Core models and list management for the milkcrm admin console.
//!
//! This crate provides the generic entity list manager, its three
//! instantiations (clients, staff, admins), the dashboard and account
//! settings state, and the REST client that backs them.

pub mod account;
pub mod dashboard;
pub mod entity;
pub mod error;
pub mod kinds;
pub mod manager;
pub mod models;
pub mod palette;
pub mod rest;
pub mod search;
pub mod source;

pub use account::{PasswordChange, PasswordChangeForm};
pub use dashboard::{DashboardData, DashboardPanel, DashboardQuery, DashboardState};
pub use entity::{EntityKind, FieldKind, FieldSpec, FormMode};
pub use error::{FieldError, FormError, RemoteError};
pub use kinds::{AdminKind, ClientKind, StaffKind};
pub use manager::{
    Confirm, FormState, FormTicket, ListManager, LoadOutcome, LoadTicket, RemoveOutcome, Submission,
    SubmitOutcome, Write,
};
pub use models::{Admin, Client, EntityId, Shift, Staff};
pub use rest::{RestClient, Session};
pub use source::{AccountSource, DashboardSource, RemoteSource};
