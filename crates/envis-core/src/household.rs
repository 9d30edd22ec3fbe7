//! The household aggregate and its JSON snapshot
//!
//! A `Household` owns every collection the app works with. Components
//! transform their own piece and the caller swaps the result back in.
//! Snapshots are written to a temp file in the target directory and then
//! renamed over the old file, so a crash never leaves a half-written file.

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::accounts::{self, BalanceSummary, NewUploadedAccount};
use crate::categories::CategoryStore;
use crate::error::{Error, Result};
use crate::fairness::FairnessData;
use crate::family::Family;
use crate::feed::InsightFeed;
use crate::goals::{GoalBook, GoalProgress};
use crate::insights::{InsightSheet, ProjectionRates};
use crate::models::{ConnectedAccount, Goal, PathwayStep, Transaction, UploadedAccount};
use crate::notifications::{NotificationKind, Notifications};

/// Snapshot format version written to disk
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything the family has in the app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub categories: CategoryStore,
    pub goals: GoalBook,
    pub accounts: Vec<ConnectedAccount>,
    #[serde(default)]
    pub uploaded_accounts: Vec<UploadedAccount>,
    pub family: Family,
    pub pathway: Vec<PathwayStep>,
    #[serde(default)]
    pub fairness: Option<FairnessData>,
    #[serde(default)]
    pub insight_feed: InsightFeed,
    #[serde(default)]
    pub notifications: Notifications,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    household: Household,
}

/// A goal with its progress figures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalSummary {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress: GoalProgress,
}

/// Dashboard payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub summary: BalanceSummary,
    pub recent_transactions: Vec<Transaction>,
    pub goals: Vec<GoalSummary>,
    pub fairness_summary: Option<String>,
    pub unread_notifications: usize,
}

impl Household {
    /// Number of transactions shown on the dashboard feed
    pub const RECENT_LIMIT: usize = 10;

    /// Read a snapshot file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(Error::InvalidData(format!(
                "Snapshot version {} is newer than supported version {}",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }

        let mut household = snapshot.household;
        household.categories = CategoryStore::new(household.categories.categories().to_vec());

        debug!(path = %path.display(), "Loaded household snapshot");
        Ok(household)
    }

    /// Load a snapshot if it exists; `None` when there is no file yet
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Write the snapshot atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            household: self.clone(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(json.as_bytes())?;
        temp.flush()?;
        temp.persist(path).map_err(|e| e.error)?;

        info!(path = %path.display(), "Saved household snapshot");
        Ok(())
    }

    /// Headline figures for the dashboard
    pub fn balance_summary(&self, today: NaiveDate) -> BalanceSummary {
        BalanceSummary::compute(
            &self.accounts,
            &self.categories,
            &self.goals,
            &self.family.invites,
            today,
        )
    }

    /// Most recent transactions across all categories, newest first
    pub fn recent_transactions(&self, limit: usize) -> Vec<Transaction> {
        let mut transactions: Vec<Transaction> = self.categories.transactions().cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        transactions.truncate(limit);
        transactions
    }

    pub fn goal_summaries(&self, today: NaiveDate) -> Vec<GoalSummary> {
        self.goals
            .goals()
            .iter()
            .map(|goal| GoalSummary {
                goal: goal.clone(),
                progress: goal.progress(today),
            })
            .collect()
    }

    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        Dashboard {
            summary: self.balance_summary(today),
            recent_transactions: self.recent_transactions(Self::RECENT_LIMIT),
            goals: self.goal_summaries(today),
            fairness_summary: self.fairness.as_ref().and_then(FairnessData::summary),
            unread_notifications: self.notifications.unread_count(),
        }
    }

    /// Track an account from a statement and announce it
    pub fn add_uploaded_account(
        &self,
        new: NewUploadedAccount,
        now: DateTime<Utc>,
    ) -> Result<(Self, UploadedAccount)> {
        let (uploaded, account) =
            accounts::add_uploaded_account(&self.uploaded_accounts, new, now.date_naive())?;
        let (notifications, _) = self.notifications.push(
            NotificationKind::Account,
            "New Account Added",
            &format!("{} {} has been added", account.provider, account.account_name),
            now,
        );

        let mut household = self.clone();
        household.uploaded_accounts = uploaded;
        household.notifications = notifications;
        Ok((household, account))
    }

    /// Insight sheet for a category, looked up by id or name
    pub fn insight_sheet(&self, category: &str, rates: &ProjectionRates) -> Result<InsightSheet> {
        let category = self
            .categories
            .resolve(category)
            .ok_or_else(|| Error::CategoryNotFound(category.to_string()))?;
        Ok(InsightSheet::for_category(category, rates))
    }
}
