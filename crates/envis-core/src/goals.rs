//! Savings goals

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{month_index, month_start};
use crate::error::{Error, Result};
use crate::models::Goal;

/// Fields supplied when creating a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGoal {
    pub name: String,
    pub target_amount: f64,
    #[serde(with = "crate::dates::month_year")]
    pub target_date: NaiveDate,
    #[serde(default)]
    pub linked_accounts: Vec<String>,
}

/// Partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub target_amount: Option<f64>,
    #[serde(default, with = "optional_month_year")]
    pub target_date: Option<NaiveDate>,
    pub linked_accounts: Option<Vec<String>>,
}

mod optional_month_year {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::dates::{format_month_year, parse_month_year};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        date.map(format_month_year).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| parse_month_year(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Progress figures for a goal relative to a given day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal_id: String,
    /// Whole percent, capped at 100
    pub percent: u8,
    pub remaining: f64,
    /// Whole calendar months until the target month (at least 1)
    pub months_remaining: u32,
    /// Amount to save each month to hit the target, rounded up to whole pounds
    pub monthly_needed: f64,
}

impl Goal {
    /// Percent complete, `min(round(current / target * 100), 100)`
    pub fn progress_percent(&self) -> u8 {
        if self.target_amount <= 0.0 {
            return 0;
        }
        (self.current_amount / self.target_amount * 100.0)
            .round()
            .clamp(0.0, 100.0) as u8
    }

    pub fn is_complete(&self) -> bool {
        self.progress_percent() >= 100
    }

    pub fn progress(&self, today: NaiveDate) -> GoalProgress {
        let remaining = (self.target_amount - self.current_amount).max(0.0);
        let months = (month_index(self.target_date) - month_index(today)).max(1) as u32;
        GoalProgress {
            goal_id: self.id.clone(),
            percent: self.progress_percent(),
            remaining,
            months_remaining: months,
            monthly_needed: (remaining / f64::from(months)).ceil(),
        }
    }
}

fn validate_target(target: f64) -> Result<()> {
    if !target.is_finite() || target <= 0.0 {
        return Err(Error::InvalidData(format!(
            "Target amount must be positive, got {}",
            target
        )));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidData("Goal name cannot be empty".into()));
    }
    Ok(())
}

/// Ordered list of goals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalBook {
    goals: Vec<Goal>,
}

impl GoalBook {
    pub fn new(goals: Vec<Goal>) -> Self {
        Self { goals }
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn get(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&Goal> {
        self.get(id)
            .ok_or_else(|| Error::NotFound(format!("Goal {}", id)))
    }

    /// Goals that have not reached 100 %
    pub fn active_count(&self) -> usize {
        self.goals.iter().filter(|g| !g.is_complete()).count()
    }

    fn next_id(&self) -> String {
        let max = self
            .goals
            .iter()
            .filter_map(|g| g.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }

    /// Add a goal with nothing saved yet
    pub fn create(&self, new_goal: NewGoal) -> Result<(Self, Goal)> {
        validate_name(&new_goal.name)?;
        validate_target(new_goal.target_amount)?;

        let goal = Goal {
            id: self.next_id(),
            name: new_goal.name.trim().to_string(),
            target_amount: new_goal.target_amount,
            current_amount: 0.0,
            target_date: month_start(new_goal.target_date),
            linked_accounts: new_goal.linked_accounts,
        };

        let mut book = self.clone();
        book.goals.push(goal.clone());
        tracing::debug!(goal = %goal.id, name = %goal.name, "Created goal");
        Ok((book, goal))
    }

    pub fn update(&self, id: &str, update: GoalUpdate) -> Result<(Self, Goal)> {
        if let Some(name) = &update.name {
            validate_name(name)?;
        }
        if let Some(target) = update.target_amount {
            validate_target(target)?;
        }

        let mut book = self.clone();
        let goal = book
            .goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| Error::NotFound(format!("Goal {}", id)))?;

        if let Some(name) = update.name {
            goal.name = name.trim().to_string();
        }
        if let Some(target) = update.target_amount {
            goal.target_amount = target;
        }
        if let Some(date) = update.target_date {
            goal.target_date = month_start(date);
        }
        if let Some(accounts) = update.linked_accounts {
            goal.linked_accounts = accounts;
        }

        let updated = goal.clone();
        Ok((book, updated))
    }

    pub fn delete(&self, id: &str) -> Result<Self> {
        self.require(id)?;
        let mut book = self.clone();
        book.goals.retain(|g| g.id != id);
        tracing::debug!(goal = %id, "Deleted goal");
        Ok(book)
    }

    /// Add (or with a negative amount, withdraw) savings; never below zero
    pub fn contribute(&self, id: &str, amount: f64) -> Result<(Self, Goal)> {
        if !amount.is_finite() {
            return Err(Error::InvalidData("Contribution must be a number".into()));
        }

        let mut book = self.clone();
        let goal = book
            .goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| Error::NotFound(format!("Goal {}", id)))?;
        goal.current_amount = (goal.current_amount + amount).max(0.0);

        let updated = goal.clone();
        Ok((book, updated))
    }
}
