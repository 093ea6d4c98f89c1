//! Fuzzy quick-find across clients and staff.

use crate::models::{Client, EntityId, Staff};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

pub const MAX_RESULTS: usize = 10;

/// Where a palette hit lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Client(EntityId),
    Staff(EntityId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub target: Target,
    pub title: String,
    /// Secondary text shown dimmed next to the title.
    pub detail: String,
    haystack: String,
}

impl Candidate {
    pub fn client(client: &Client) -> Self {
        Self {
            target: Target::Client(client.id.clone()),
            title: client.name.clone(),
            detail: format!("client · {}", client.location),
            haystack: format!("{} {} {}", client.name, client.number, client.location),
        }
    }

    pub fn staff(staff: &Staff) -> Self {
        let location = staff.location.as_deref().unwrap_or_default();
        Self {
            target: Target::Staff(staff.id.clone()),
            title: staff.name.clone(),
            detail: format!("staff · {location}"),
            haystack: format!(
                "{} {} {} {}",
                staff.name,
                staff.username.as_deref().unwrap_or_default(),
                staff.contact_number.as_deref().unwrap_or_default(),
                location
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub candidate: Candidate,
    pub score: i64,
}

/// Best `MAX_RESULTS` fuzzy matches for `query`, highest score first.
/// A blank query yields nothing.
pub fn rank(candidates: impl IntoIterator<Item = Candidate>, query: &str) -> Vec<Hit> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut hits: Vec<Hit> = candidates
        .into_iter()
        .filter_map(|candidate| {
            matcher
                .fuzzy_match(&candidate.haystack, query)
                .map(|score| Hit { candidate, score })
        })
        .collect();

    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(MAX_RESULTS);
    hits
}
