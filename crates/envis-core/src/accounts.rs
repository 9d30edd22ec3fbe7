//! Connected accounts and the dashboard balance summary

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::categories::CategoryStore;
use crate::error::{Error, Result};
use crate::goals::GoalBook;
use crate::models::{
    AccountStatus, ConnectedAccount, FamilyInvite, InviteStatus, UploadedAccount,
    UploadedAccountType,
};
use crate::timeline::TimelineFilter;

/// Headline figures shown at the top of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub total_balance: f64,
    /// Signed sum of this month's transactions
    pub monthly_net_flow: f64,
    pub active_goals: usize,
    /// Accounts needing attention plus invites still open on `today`
    pub pending_alerts: usize,
}

impl BalanceSummary {
    pub fn compute(
        accounts: &[ConnectedAccount],
        categories: &CategoryStore,
        goals: &GoalBook,
        invites: &[FamilyInvite],
        today: NaiveDate,
    ) -> Self {
        let monthly_net_flow = categories
            .transactions()
            .filter(|tx| TimelineFilter::CurrentMonth.includes(tx.date, today))
            .map(|tx| tx.amount)
            .sum();

        let account_alerts = accounts
            .iter()
            .filter(|a| a.status != AccountStatus::Active)
            .count();
        let invite_alerts = invites
            .iter()
            .filter(|i| i.status == InviteStatus::Pending && i.expires_on >= today)
            .count();

        Self {
            total_balance: total_balance(accounts),
            monthly_net_flow,
            active_goals: goals.active_count(),
            pending_alerts: account_alerts + invite_alerts,
        }
    }
}

pub fn total_balance(accounts: &[ConnectedAccount]) -> f64 {
    accounts.iter().map(|a| a.balance).sum()
}

/// Mark an account as freshly synced
pub fn refresh_account(
    accounts: &[ConnectedAccount],
    id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<ConnectedAccount>> {
    if !accounts.iter().any(|a| a.id == id) {
        return Err(Error::NotFound(format!("Account {}", id)));
    }

    tracing::info!(account = %id, "Refreshed account");
    Ok(accounts
        .iter()
        .map(|a| {
            let mut a = a.clone();
            if a.id == id {
                a.status = AccountStatus::Active;
                a.last_synced = now;
            }
            a
        })
        .collect())
}

/// Disconnect an account
pub fn remove_account(accounts: &[ConnectedAccount], id: &str) -> Result<Vec<ConnectedAccount>> {
    if !accounts.iter().any(|a| a.id == id) {
        return Err(Error::NotFound(format!("Account {}", id)));
    }

    tracing::info!(account = %id, "Removed account");
    Ok(accounts.iter().filter(|a| a.id != id).cloned().collect())
}

/// Fields supplied with an uploaded statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUploadedAccount {
    pub account_name: String,
    pub account_type: UploadedAccountType,
    pub provider: String,
    pub balance: f64,
    pub file_name: String,
}

/// Statement formats accepted for upload
pub const STATEMENT_EXTENSIONS: [&str; 2] = ["pdf", "csv"];

fn validate_upload(new: &NewUploadedAccount) -> Result<()> {
    for (field, value) in [
        ("Account name", &new.account_name),
        ("Provider", &new.provider),
        ("Statement file", &new.file_name),
    ] {
        if value.trim().is_empty() {
            return Err(Error::InvalidData(format!("{} cannot be empty", field)));
        }
    }
    if !new.balance.is_finite() || new.balance < 0.0 {
        return Err(Error::InvalidData(format!(
            "Balance must be zero or more, got {}",
            new.balance
        )));
    }

    let extension = new
        .file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    if !STATEMENT_EXTENSIONS.contains(&extension.as_str()) {
        return Err(Error::InvalidData(format!(
            "Statements must be PDF or CSV files: {}",
            new.file_name
        )));
    }
    Ok(())
}

/// Track an account from an uploaded statement
pub fn add_uploaded_account(
    accounts: &[UploadedAccount],
    new: NewUploadedAccount,
    today: NaiveDate,
) -> Result<(Vec<UploadedAccount>, UploadedAccount)> {
    validate_upload(&new)?;

    let max = accounts
        .iter()
        .filter_map(|a| a.id.strip_prefix("up-"))
        .filter_map(|n| n.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    let account = UploadedAccount {
        id: format!("up-{}", max + 1),
        account_name: new.account_name.trim().to_string(),
        account_type: new.account_type,
        provider: new.provider.trim().to_string(),
        balance: new.balance,
        file_name: new.file_name.trim().to_string(),
        uploaded_on: today,
    };

    tracing::info!(account = %account.id, provider = %account.provider, "Added uploaded account");
    let mut updated = accounts.to_vec();
    updated.push(account.clone());
    Ok((updated, account))
}

/// Remove an uploaded account and its statement
pub fn remove_uploaded_account(
    accounts: &[UploadedAccount],
    id: &str,
) -> Result<(Vec<UploadedAccount>, UploadedAccount)> {
    let account = accounts
        .iter()
        .find(|a| a.id == id)
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("Uploaded account {}", id)))?;

    tracing::info!(account = %id, "Removed uploaded account");
    Ok((accounts.iter().filter(|a| a.id != id).cloned().collect(), account))
}

/// Human-friendly "time since last sync"
pub fn sync_age(last_synced: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(last_synced);
    if elapsed.num_minutes() < 1 {
        "Just now".to_string()
    } else if elapsed.num_hours() < 1 {
        format!("{} min ago", elapsed.num_minutes())
    } else if elapsed.num_days() < 1 {
        let hours = elapsed.num_hours();
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else {
        let days = elapsed.num_days();
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OwnershipType;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 28, 12, 0, 0).unwrap()
    }

    fn account(id: &str, balance: f64, status: AccountStatus) -> ConnectedAccount {
        ConnectedAccount {
            id: id.into(),
            bank_name: "Barclays".into(),
            account_name: "Joint Current Account".into(),
            account_type: "Current Account".into(),
            last_four_digits: "4521".into(),
            balance,
            ownership_type: OwnershipType::Joint,
            status,
            last_synced: now() - Duration::days(5),
        }
    }

    #[test]
    fn test_total_balance() {
        let accounts = vec![
            account("1", 2450.75, AccountStatus::Active),
            account("2", 8500.0, AccountStatus::Active),
            account("3", 12500.0, AccountStatus::NeedsRefresh),
        ];
        assert!((total_balance(&accounts) - 23450.75).abs() < 1e-9);
    }

    #[test]
    fn test_refresh_sets_active() {
        let accounts = vec![account("3", 1.0, AccountStatus::NeedsRefresh)];
        let refreshed = refresh_account(&accounts, "3", now()).unwrap();
        assert_eq!(refreshed[0].status, AccountStatus::Active);
        assert_eq!(refreshed[0].last_synced, now());

        assert!(refresh_account(&accounts, "x", now()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_account() {
        let accounts = vec![
            account("1", 1.0, AccountStatus::Active),
            account("2", 2.0, AccountStatus::Active),
        ];
        let remaining = remove_account(&accounts, "1").unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "2");
        assert!(remove_account(&remaining, "1").unwrap_err().is_not_found());
    }

    fn upload(name: &str, file: &str, balance: f64) -> NewUploadedAccount {
        NewUploadedAccount {
            account_name: name.into(),
            account_type: UploadedAccountType::Investment,
            provider: "Vanguard".into(),
            balance,
            file_name: file.into(),
        }
    }

    #[test]
    fn test_add_and_remove_uploaded_account() {
        let today = now().date_naive();
        let (accounts, first) =
            add_uploaded_account(&[], upload(" Stocks ISA ", "statement.PDF", 4200.0), today)
                .unwrap();
        assert_eq!(first.id, "up-1");
        assert_eq!(first.account_name, "Stocks ISA");
        assert_eq!(first.uploaded_on, today);

        let (accounts, second) =
            add_uploaded_account(&accounts, upload("Bonds", "bonds.csv", 0.0), today).unwrap();
        assert_eq!(second.id, "up-2");
        assert_eq!(accounts.len(), 2);

        let (accounts, removed) = remove_uploaded_account(&accounts, "up-1").unwrap();
        assert_eq!(removed.account_name, "Stocks ISA");
        assert_eq!(accounts.len(), 1);
        assert!(remove_uploaded_account(&accounts, "up-1").unwrap_err().is_not_found());

        // Ids are not reused while a later one exists
        let (_, third) =
            add_uploaded_account(&accounts, upload("Cash", "cash.csv", 1.0), today).unwrap();
        assert_eq!(third.id, "up-3");
    }

    #[test]
    fn test_uploaded_account_validation() {
        let today = now().date_naive();
        for bad in [
            upload("  ", "s.pdf", 1.0),
            upload("ISA", "", 1.0),
            upload("ISA", "statement.xlsx", 1.0),
            upload("ISA", "statement", 1.0),
            upload("ISA", "s.pdf", -5.0),
            upload("ISA", "s.pdf", f64::NAN),
        ] {
            assert!(matches!(
                add_uploaded_account(&[], bad, today),
                Err(Error::InvalidData(_))
            ));
        }
    }

    #[test]
    fn test_expired_invites_are_not_alerts() {
        let today = now().date_naive();
        let invite = |expires_on| FamilyInvite {
            id: "inv-1".into(),
            email: "jamie@example.com".into(),
            invited_on: today,
            expires_on,
            status: InviteStatus::Pending,
        };
        let accounts = vec![account("1", 1.0, AccountStatus::Active)];
        let store = CategoryStore::new(vec![]);
        let goals = GoalBook::default();

        let open = [invite(today)];
        let summary = BalanceSummary::compute(&accounts, &store, &goals, &open, today);
        assert_eq!(summary.pending_alerts, 1);

        let lapsed = [invite(today - chrono::Days::new(1))];
        let summary = BalanceSummary::compute(&accounts, &store, &goals, &lapsed, today);
        assert_eq!(summary.pending_alerts, 0);
    }

    #[test]
    fn test_sync_age() {
        assert_eq!(sync_age(now(), now()), "Just now");
        assert_eq!(sync_age(now() - Duration::hours(2), now()), "2 hours ago");
        assert_eq!(sync_age(now() - Duration::days(1), now()), "1 day ago");
        assert_eq!(sync_age(now() - Duration::minutes(5), now()), "5 min ago");
    }
}
