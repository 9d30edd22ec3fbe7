//! Domain models for Envis

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::insights::CategoryInsight;

/// Whether an account (and its transactions) belongs to one person or is shared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipType {
    Individual,
    Joint,
}

impl OwnershipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Joint => "joint",
        }
    }
}

impl std::str::FromStr for OwnershipType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "individual" => Ok(Self::Individual),
            "joint" => Ok(Self::Joint),
            _ => Err(format!("Unknown ownership type: {}", s)),
        }
    }
}

impl std::fmt::Display for OwnershipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A financial transaction from one of the family's accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub merchant_name: String,
    /// Negative = debit, positive = credit
    pub amount: f64,
    #[serde(with = "dates::display_date")]
    pub date: NaiveDate,
    /// Human label of the source account (e.g. "Joint Account")
    pub account_label: String,
    /// Who the account belongs to ("Alex", "Alex & Sam")
    pub account_owner: String,
    pub ownership_type: OwnershipType,
    /// Name of the category this transaction is filed under
    pub category: String,
}

impl Transaction {
    pub fn is_debit(&self) -> bool {
        self.amount < 0.0
    }
}

/// Aggregates derived from a category's current transaction list
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    /// Sum of absolute amounts
    pub spend_to_date: f64,
    /// Whole-percent change against last month (positive = spending more)
    pub month_over_month: i32,
    pub transaction_count: usize,
}

/// A grouping of transactions (e.g. "Groceries")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionCategory {
    /// URL-safe slug, unique within a store
    pub id: String,
    pub name: String,
    pub transactions: Vec<Transaction>,
    pub totals: CategoryTotals,
    /// Last month's spend, captured once when the category is seeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_month_baseline: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight: Option<CategoryInsight>,
}

/// A family savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    /// First day of the target month
    #[serde(with = "dates::month_year")]
    pub target_date: NaiveDate,
    /// Ids of the accounts contributing to this goal
    #[serde(default)]
    pub linked_accounts: Vec<String>,
}

/// Sync status of a connected bank account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    NeedsRefresh,
    Error,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::NeedsRefresh => "needs_refresh",
            Self::Error => "error",
        }
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "needs_refresh" => Ok(Self::NeedsRefresh),
            "error" => Ok(Self::Error),
            _ => Err(format!("Unknown account status: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bank account linked to the family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedAccount {
    pub id: String,
    pub bank_name: String,
    pub account_name: String,
    /// Free text, e.g. "Current Account" or "Savings Account"
    pub account_type: String,
    pub last_four_digits: String,
    pub balance: f64,
    pub ownership_type: OwnershipType,
    pub status: AccountStatus,
    pub last_synced: DateTime<Utc>,
}

/// Kind of account added from an uploaded statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadedAccountType {
    Investment,
    PremiumBonds,
}

impl UploadedAccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Investment => "investment",
            Self::PremiumBonds => "premium_bonds",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Investment => "Investment Account",
            Self::PremiumBonds => "Premium Bonds",
        }
    }
}

impl std::str::FromStr for UploadedAccountType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "investment" => Ok(Self::Investment),
            "premium_bonds" => Ok(Self::PremiumBonds),
            _ => Err(format!("Unknown uploaded account type: {}", s)),
        }
    }
}

impl std::fmt::Display for UploadedAccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An account that cannot be linked, tracked from a PDF or CSV statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedAccount {
    pub id: String,
    pub account_name: String,
    pub account_type: UploadedAccountType,
    pub provider: String,
    pub balance: f64,
    /// Name of the statement file the balance was read from
    pub file_name: String,
    #[serde(with = "dates::display_date")]
    pub uploaded_on: NaiveDate,
}

/// Role of a family member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Membership status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Pending,
}

/// A person in the family group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: MemberRole,
    pub status: MemberStatus,
    #[serde(with = "dates::month_year")]
    pub joined: NaiveDate,
}

impl FamilyMember {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Invitation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Expired,
}

impl InviteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Expired => "expired",
        }
    }
}

impl std::fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An e-mail invitation to join the family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyInvite {
    pub id: String,
    pub email: String,
    pub invited_on: NaiveDate,
    pub expires_on: NaiveDate,
    pub status: InviteStatus,
}

/// One step of the coach's suggested pathway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayStep {
    pub id: String,
    pub step: String,
    pub description: String,
    pub completed: bool,
}
