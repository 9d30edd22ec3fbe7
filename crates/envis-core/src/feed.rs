//! Smart insights feed
//!
//! Household-level observations (low balances, duplicate subscriptions,
//! unusual spending, goal milestones). Unlike category insights they are
//! not tied to a category and are removed once dismissed.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What an insight is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Subscription,
    Spending,
    Goal,
    Cashflow,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subscription => "subscription",
            Self::Spending => "spending",
            Self::Goal => "goal",
            Self::Cashflow => "cashflow",
        }
    }

    pub fn all() -> &'static [InsightKind] {
        &[Self::Subscription, Self::Spending, Self::Goal, Self::Cashflow]
    }
}

impl std::str::FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown insight type: {}", s))
    }
}

impl std::fmt::Display for InsightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One card in the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartInsight {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub headline: String,
    pub body: String,
}

/// Ordered list of insights awaiting the family's attention
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsightFeed {
    insights: Vec<SmartInsight>,
}

impl InsightFeed {
    pub fn new(insights: Vec<SmartInsight>) -> Self {
        Self { insights }
    }

    pub fn insights(&self) -> &[SmartInsight] {
        &self.insights
    }

    pub fn is_empty(&self) -> bool {
        self.insights.is_empty()
    }

    /// Insights of one kind, or all of them
    pub fn of_kind(&self, kind: Option<InsightKind>) -> Vec<SmartInsight> {
        self.insights
            .iter()
            .filter(|i| kind.map_or(true, |k| i.kind == k))
            .cloned()
            .collect()
    }

    /// Remove an insight from the feed
    pub fn dismiss(&self, id: &str) -> Result<(Self, SmartInsight)> {
        let insight = self
            .insights
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Insight {}", id)))?;

        let mut feed = self.clone();
        feed.insights.retain(|i| i.id != id);
        tracing::debug!(insight = %id, kind = %insight.kind, "Dismissed insight");
        Ok((feed, insight))
    }
}
