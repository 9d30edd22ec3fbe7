//! Filter builder for the category/transaction view
//!
//! Combines the timeline window, account-ownership scope and a free-text
//! search into a single predicate over transactions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{OwnershipType, Transaction};
use crate::timeline::TimelineFilter;

/// Which accounts' transactions to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipFilter {
    #[default]
    All,
    Individual,
    Joint,
}

impl OwnershipFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Individual => "individual",
            Self::Joint => "joint",
        }
    }

    pub fn matches(&self, ownership: OwnershipType) -> bool {
        match self {
            Self::All => true,
            Self::Individual => ownership == OwnershipType::Individual,
            Self::Joint => ownership == OwnershipType::Joint,
        }
    }
}

impl std::str::FromStr for OwnershipFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "individual" => Ok(Self::Individual),
            "joint" => Ok(Self::Joint),
            _ => Err(format!("Unknown ownership filter: {}", s)),
        }
    }
}

impl std::fmt::Display for OwnershipFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Builder for the category view predicate
///
/// The lifetime `'query` ties the search term to the caller's input.
#[derive(Debug, Clone)]
pub struct CategoryFilter<'query> {
    pub today: NaiveDate,
    pub timeline: Option<TimelineFilter>,
    pub ownership: OwnershipFilter,
    pub search: Option<&'query str>,
}

impl<'query> CategoryFilter<'query> {
    /// Create a filter that shows everything, evaluated relative to `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            timeline: None,
            ownership: OwnershipFilter::All,
            search: None,
        }
    }

    /// Set timeline window (None = all time)
    pub fn timeline(mut self, timeline: Option<TimelineFilter>) -> Self {
        self.timeline = timeline;
        self
    }

    /// Set ownership scope
    pub fn ownership(mut self, ownership: OwnershipFilter) -> Self {
        self.ownership = ownership;
        self
    }

    /// Set search query (matches merchant or category name)
    pub fn search(mut self, query: Option<&'query str>) -> Self {
        self.search = query.map(str::trim).filter(|q| !q.is_empty());
        self
    }

    /// True when neither search nor ownership narrows the view
    ///
    /// Empty categories stay visible in that case so new ones can be seen.
    pub fn shows_empty_categories(&self) -> bool {
        self.search.is_none() && self.ownership == OwnershipFilter::All
    }

    /// Whether a transaction passes every configured condition
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(timeline) = self.timeline {
            if !timeline.includes(tx.date, self.today) {
                return false;
            }
        }

        if !self.ownership.matches(tx.ownership_type) {
            return false;
        }

        if let Some(q) = self.search {
            let q = q.to_lowercase();
            if !tx.merchant_name.to_lowercase().contains(&q)
                && !tx.category.to_lowercase().contains(&q)
            {
                return false;
            }
        }

        true
    }
}
