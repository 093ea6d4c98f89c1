//! Delivery metrics dashboard.
//!
//! A failed fetch is an explicit state: it never substitutes zeroed data, and
//! the last good data stays available alongside the error.

use crate::error::RemoteError;
use crate::manager::{LoadOutcome, LoadTicket};
use crate::models::{EntityId, Shift};
use crate::source::DashboardSource;
use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardData {
    pub counts: Counts,
    pub today: Today,
    pub monthly: Monthly,
    pub delivery_summary: DeliverySummary,
    pub assignment_status: AssignmentStatus,
    pub priority_clients: Vec<PriorityClient>,
    pub delivery_records: Vec<DeliveryRecord>,
    pub staff_performance: Vec<StaffPerformance>,
    pub shift_analytics: Vec<ShiftAnalytic>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Counts {
    pub total_clients: u64,
    pub total_staff: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Today {
    pub date: String,
    pub quantity: f64,
    pub revenue: f64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Monthly {
    pub quantity: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeliverySummary {
    pub total_deliveries: u64,
    pub delivered: u64,
    pub success_rate: f64,
    pub total_quantity: f64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssignmentStatus {
    pub total_quantity_assigned: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityClient {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub time_shift: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub delivery_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeliveryRecord {
    pub client_name: String,
    pub location: String,
    pub staff: String,
    pub shift: String,
    pub quantity: f64,
    pub price: f64,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StaffPerformance {
    pub staff_name: String,
    pub delivered_count: u64,
    pub not_delivered_count: u64,
    pub total_quantity: f64,
    pub total_revenue: f64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShiftAnalytic {
    pub shift: String,
    pub delivery_count: u64,
    pub delivered_count: u64,
    pub success_rate: f64,
    pub total_quantity: f64,
    pub total_revenue: f64,
}

/// Date and shift the dashboard is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardQuery {
    pub date: NaiveDate,
    /// `None` means both shifts.
    pub shift: Option<Shift>,
}

impl DashboardQuery {
    pub fn today() -> Self {
        Self {
            date: Local::now().date_naive(),
            shift: None,
        }
    }

    /// Query-string pairs for the dashboard endpoint.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("date", self.date.format("%Y-%m-%d").to_string())];
        if let Some(shift) = self.shift {
            params.push(("shift", shift.to_string()));
        }
        params
    }

    /// Move the date by `days` (negative goes back).
    pub fn step(&mut self, days: i64) {
        let delta = Days::new(days.unsigned_abs());
        let moved = if days >= 0 {
            self.date.checked_add_days(delta)
        } else {
            self.date.checked_sub_days(delta)
        };
        if let Some(date) = moved {
            self.date = date;
        }
    }

    /// All → AM → PM → All.
    pub fn cycle_shift(&mut self) {
        self.shift = match self.shift {
            None => Some(Shift::Am),
            Some(Shift::Am) => Some(Shift::Pm),
            Some(Shift::Pm) => None,
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardState {
    /// Nothing requested yet.
    Idle,
    Loading { previous: Option<DashboardData> },
    Loaded(DashboardData),
    Failed {
        message: String,
        previous: Option<DashboardData>,
    },
}

impl DashboardState {
    /// The freshest good data, if any was ever loaded.
    pub fn data(&self) -> Option<&DashboardData> {
        match self {
            DashboardState::Idle => None,
            DashboardState::Loaded(data) => Some(data),
            DashboardState::Loading { previous } | DashboardState::Failed { previous, .. } => {
                previous.as_ref()
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DashboardState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    fn take_data(&mut self) -> Option<DashboardData> {
        match std::mem::replace(self, DashboardState::Idle) {
            DashboardState::Idle => None,
            DashboardState::Loaded(data) => Some(data),
            DashboardState::Loading { previous } | DashboardState::Failed { previous, .. } => {
                previous
            }
        }
    }
}

pub struct DashboardPanel {
    pub query: DashboardQuery,
    state: DashboardState,
    issued: u64,
}

impl DashboardPanel {
    pub fn new(query: DashboardQuery) -> Self {
        Self {
            query,
            state: DashboardState::Idle,
            issued: 0,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn begin_fetch(&mut self) -> LoadTicket {
        self.issued += 1;
        let previous = self.state.take_data();
        self.state = DashboardState::Loading { previous };
        LoadTicket::new(self.issued)
    }

    pub fn finish_fetch(
        &mut self,
        ticket: LoadTicket,
        result: Result<DashboardData, RemoteError>,
    ) -> LoadOutcome {
        if ticket.seq() != self.issued {
            tracing::debug!("Discarding stale dashboard fetch #{}", ticket.seq());
            return LoadOutcome::Stale;
        }

        match result {
            Ok(data) => {
                tracing::info!(
                    "Dashboard loaded for {} ({} deliveries)",
                    self.query.date,
                    data.delivery_summary.total_deliveries
                );
                self.state = DashboardState::Loaded(data);
                LoadOutcome::Applied
            }
            Err(e) => {
                tracing::warn!("Failed to fetch dashboard data: {}", e);
                let previous = self.state.take_data();
                self.state = DashboardState::Failed {
                    message: "Failed to load dashboard data. Please try again.".to_string(),
                    previous,
                };
                LoadOutcome::Failed
            }
        }
    }

    pub async fn fetch<S: DashboardSource>(&mut self, source: &S) -> LoadOutcome {
        let ticket = self.begin_fetch();
        let query = self.query;
        let result = source.dashboard(&query).await;
        self.finish_fetch(ticket, result)
    }
}

/// Format an amount as Indian rupees with lakh/crore digit grouping,
/// e.g. `₹1,23,456.78`.
pub fn format_inr(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let paise = (amount.abs() * 100.0).round() as u64;
    let rupees = (paise / 100).to_string();
    let fraction = paise % 100;

    let grouped = if rupees.len() <= 3 {
        rupees
    } else {
        let (head, tail) = rupees.split_at(rupees.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (front, pair) = rest.split_at(rest.len() - 2);
            groups.push(pair);
            rest = front;
        }
        if !rest.is_empty() {
            groups.push(rest);
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    let sign = if amount < 0.0 && paise > 0 { "-" } else { "" };
    format!("{sign}₹{grouped}.{fraction:02}")
}
