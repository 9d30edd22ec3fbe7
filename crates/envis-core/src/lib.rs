//! Envis Core Library
//!
//! Shared functionality for the Envis family finance coach:
//! - Transaction categories with derived totals, moves and creation
//! - Timeline, ownership and search filtering of the transaction view
//! - Category insights and the savings-potential projection
//! - Fairness calculator valuing unpaid labour alongside income
//! - Savings goals, scripted coach replies and the pathway checklist
//! - Connected and statement-uploaded accounts, family members and invitations
//! - Smart insights feed and in-app notifications
//! - Household snapshot persistence, CSV export and configuration

pub mod accounts;
pub mod categories;
pub mod coach;
pub mod config;
pub mod dates;
pub mod error;
pub mod export;
pub mod fairness;
pub mod family;
pub mod feed;
pub mod filter;
pub mod goals;
pub mod household;
pub mod insights;
pub mod models;
pub mod notifications;
pub mod seed;
pub mod timeline;

pub use accounts::{BalanceSummary, NewUploadedAccount};
pub use categories::{slugify, CategoryStore};
pub use coach::{CoachReply, CoachScript, Topic};
pub use config::{EnvisConfig, FairnessSettings, ServerSettings};
pub use error::{Error, Result};
pub use export::{export_transactions_csv, TransactionExport};
pub use fairness::{calculate, FairnessData, PartnerData};
pub use family::Family;
pub use feed::{InsightFeed, InsightKind, SmartInsight};
pub use filter::{CategoryFilter, OwnershipFilter};
pub use goals::{GoalBook, GoalProgress, GoalUpdate, NewGoal};
pub use household::{Dashboard, GoalSummary, Household};
pub use insights::{
    CategoryInsight, InsightMetric, InsightSheet, Metric, MetricParser, ProjectionRates,
    SavingsProjection,
};
pub use models::{
    AccountStatus, CategoryTotals, ConnectedAccount, FamilyInvite, FamilyMember, Goal,
    InviteStatus, MemberRole, MemberStatus, OwnershipType, PathwayStep, Transaction,
    TransactionCategory, UploadedAccount, UploadedAccountType,
};
pub use notifications::{Notification, NotificationKind, Notifications};
pub use timeline::TimelineFilter;
