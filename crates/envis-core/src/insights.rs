//! Category insights and the savings-potential projection
//!
//! An insight is static commentary attached to a category when it is
//! authored. Its metrics are typed (`Metric`) so nothing has to be parsed at
//! display time; `MetricParser` exists only to convert legacy free-text
//! values such as `"£50-£80"` when importing older data.
//!
//! The projection answers "what would this be worth in a year?" for the
//! monthly figure behind a category: either the insight's "potential
//! savings" metric or the category's average monthly spend.

use std::collections::BTreeSet;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dates::month_index;
use crate::error::Result;
use crate::models::{CategoryTotals, Transaction, TransactionCategory};

/// A typed metric value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Metric {
    /// A single amount in pounds
    Currency(f64),
    /// An inclusive `(min, max)` range in pounds
    Range(f64, f64),
    /// A whole or fractional percentage
    Percent(f64),
    /// Anything non-numeric ("Netflix, Disney+")
    Text(String),
}

impl Metric {
    /// Monthly pound figure represented by this metric, if any
    ///
    /// Ranges resolve to their midpoint.
    pub fn monthly_amount(&self) -> Option<f64> {
        match self {
            Self::Currency(v) => Some(*v),
            Self::Range(min, max) => Some((min + max) / 2.0),
            Self::Percent(_) | Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Currency(v) => write!(f, "£{}", format_pounds(*v)),
            Self::Range(min, max) => write!(f, "£{}-£{}", format_pounds(*min), format_pounds(*max)),
            Self::Percent(p) => {
                if p.fract() == 0.0 {
                    write!(f, "{:.0}%", p)
                } else {
                    write!(f, "{}%", p)
                }
            }
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

fn format_pounds(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

/// A labelled metric shown under an insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightMetric {
    pub label: String,
    pub value: Metric,
}

impl InsightMetric {
    pub fn new(label: impl Into<String>, value: Metric) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    /// Whether this metric describes a savings potential
    pub fn is_potential(&self) -> bool {
        self.label.to_lowercase().contains("potential")
    }
}

/// Static commentary attached to a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInsight {
    pub headline: String,
    pub body: String,
    #[serde(default)]
    pub metrics: Vec<InsightMetric>,
}

impl CategoryInsight {
    pub fn new(headline: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            body: body.into(),
            metrics: Vec::new(),
        }
    }

    /// Add a metric
    pub fn with_metric(mut self, label: impl Into<String>, value: Metric) -> Self {
        self.metrics.push(InsightMetric::new(label, value));
        self
    }

    /// The first metric labelled as a potential saving
    pub fn potential_metric(&self) -> Option<&InsightMetric> {
        self.metrics.iter().find(|m| m.is_potential())
    }
}

/// Converts legacy free-text metric values into `Metric`
pub struct MetricParser {
    range: Regex,
    percent: Regex,
    single: Regex,
}

impl MetricParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            range: Regex::new(
                r"£?([\d,]+(?:\.\d{1,2})?)\s*-\s*£?([\d,]+(?:\.\d{1,2})?)",
            )?,
            percent: Regex::new(r"^\s*([\d,]+(?:\.\d+)?)\s*%\s*$")?,
            single: Regex::new(r"£?([\d,]+(?:\.\d{1,2})?)")?,
        })
    }

    /// Parse a legacy value, falling back to `Metric::Text`
    pub fn parse(&self, value: &str) -> Metric {
        let number = |s: &str| s.replace(',', "").parse::<f64>().ok();

        if let Some(caps) = self.range.captures(value) {
            if let (Some(min), Some(max)) = (number(&caps[1]), number(&caps[2])) {
                return Metric::Range(min, max);
            }
        }

        if let Some(caps) = self.percent.captures(value) {
            if let Some(p) = number(&caps[1]) {
                return Metric::Percent(p);
            }
        }

        if let Some(caps) = self.single.captures(value) {
            if let Some(v) = number(&caps[1]) {
                return Metric::Currency(v);
            }
        }

        Metric::Text(value.to_string())
    }
}

/// Growth rates applied by the projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRates {
    /// Annual return assumed for an index fund
    pub index_fund_rate: f64,
    /// Annual interest assumed for a savings account
    pub savings_account_rate: f64,
}

impl Default for ProjectionRates {
    fn default() -> Self {
        Self {
            index_fund_rate: 0.08,
            savings_account_rate: 0.045,
        }
    }
}

/// Where the projection's monthly figure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionBasis {
    /// The insight's "potential savings" metric
    PotentialSavings,
    /// Spend to date divided by the months the transactions span
    MonthlyAverage,
}

/// One-year, non-compounding growth of a monthly saving
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsProjection {
    pub basis: ProjectionBasis,
    pub monthly: f64,
    pub yearly_principal: f64,
    pub index_fund: f64,
    pub savings_account: f64,
}

impl SavingsProjection {
    /// Project a monthly saving over twelve months, growing the annual
    /// principal once at each rate
    pub fn from_monthly(monthly: f64, basis: ProjectionBasis, rates: &ProjectionRates) -> Self {
        let yearly_principal = monthly * 12.0;
        Self {
            basis,
            monthly,
            yearly_principal,
            index_fund: yearly_principal * (1.0 + rates.index_fund_rate),
            savings_account: yearly_principal * (1.0 + rates.savings_account_rate),
        }
    }
}

/// Number of distinct calendar months from the earliest to the latest
/// transaction, inclusive (1 for an empty list)
pub fn months_spanned(transactions: &[Transaction]) -> u32 {
    let months: BTreeSet<i32> = transactions.iter().map(|tx| month_index(tx.date)).collect();
    match (months.first(), months.last()) {
        (Some(first), Some(last)) => (last - first + 1).max(1) as u32,
        _ => 1,
    }
}

/// Compute the savings projection for a category
///
/// Returns `None` when the monthly figure is not positive.
pub fn project_savings(
    category: &TransactionCategory,
    rates: &ProjectionRates,
) -> Option<SavingsProjection> {
    let potential = category
        .insight
        .as_ref()
        .and_then(|insight| insight.potential_metric());

    let (monthly, basis) = match potential {
        Some(metric) => (
            metric.value.monthly_amount().unwrap_or(0.0),
            ProjectionBasis::PotentialSavings,
        ),
        None => {
            let months = months_spanned(&category.transactions);
            (
                category.totals.spend_to_date / months as f64,
                ProjectionBasis::MonthlyAverage,
            )
        }
    };

    if monthly > 0.0 {
        Some(SavingsProjection::from_monthly(monthly, basis, rates))
    } else {
        None
    }
}

/// Everything shown when a category's insights are opened
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightSheet {
    pub category_id: String,
    pub name: String,
    pub totals: CategoryTotals,
    pub insight: Option<CategoryInsight>,
    pub projection: Option<SavingsProjection>,
}

impl InsightSheet {
    pub fn for_category(category: &TransactionCategory, rates: &ProjectionRates) -> Self {
        Self {
            category_id: category.id.clone(),
            name: category.name.clone(),
            totals: category.totals,
            insight: category.insight.clone(),
            projection: project_savings(category, rates),
        }
    }
}
