//! Normalised travel plan request

use chrono::{Days, NaiveDate};

use super::{People, Tier};

/// A validated request for travel plans
#[derive(Debug, Clone, PartialEq)]
pub struct PlanQuery {
    pub start: String,
    pub end: String,
    pub days: u32,
    pub budget: String,
    pub dates: Vec<NaiveDate>,
    pub people: People,
}

impl PlanQuery {
    /// Key the whole plan list is cached under
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "plans::{}::{}::{}::{}",
            self.start, self.end, self.days, self.budget
        )
    }

    #[must_use]
    pub fn tier(&self) -> Tier {
        Tier::from_budget(&self.budget)
    }
}

/// A single date on a multi-day trip becomes `days` consecutive dates.
/// Any other input is returned unchanged.
#[must_use]
pub fn expand_dates(dates: &[NaiveDate], days: u32) -> Vec<NaiveDate> {
    match dates {
        [first] if days > 1 => (0..u64::from(days))
            .filter_map(|offset| first.checked_add_days(Days::new(offset)))
            .collect(),
        _ => dates.to_vec(),
    }
}
