//! Demo household used when no snapshot exists
//!
//! Transactions are fixed September 2025 data. Relative timestamps (account
//! syncs, invitations, notifications) are computed from the `now` passed in.

use chrono::{DateTime, Days, Duration, NaiveDate, Utc};

use crate::categories::CategoryStore;
use crate::coach::{CoachScript, Topic};
use crate::config::FairnessSettings;
use crate::fairness::{calculate, PartnerData};
use crate::family::{Family, INVITE_VALID_DAYS};
use crate::feed::{InsightFeed, InsightKind, SmartInsight};
use crate::goals::GoalBook;
use crate::household::Household;
use crate::insights::{CategoryInsight, Metric};
use crate::models::{
    AccountStatus, ConnectedAccount, FamilyInvite, FamilyMember, Goal, InviteStatus, MemberRole,
    MemberStatus, OwnershipType, PathwayStep, Transaction, TransactionCategory,
};
use crate::notifications::{Notification, NotificationKind, Notifications};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Source accounts as `(label, owner, ownership)`
const JOINT: (&str, &str, OwnershipType) = ("Joint Account", "Alex & Sam", OwnershipType::Joint);
const PERSONAL: (&str, &str, OwnershipType) = ("Personal Account", "Alex", OwnershipType::Individual);
const AMEX: (&str, &str, OwnershipType) = ("Shen's Amex", "Sam", OwnershipType::Individual);

fn tx(
    id: &str,
    merchant: &str,
    amount: f64,
    day: u32,
    account: (&str, &str, OwnershipType),
    category: &str,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        merchant_name: merchant.to_string(),
        amount,
        date: date(2025, 9, day),
        account_label: account.0.to_string(),
        account_owner: account.1.to_string(),
        ownership_type: account.2,
        category: category.to_string(),
    }
}

/// Seeded categories with their September transactions
pub fn categories() -> CategoryStore {
    CategoryStore::new(vec![
        TransactionCategory::seeded(
            "groceries",
            "Groceries",
            vec![
                tx("1", "Tesco", -55.40, 28, JOINT, "Groceries"),
                tx("8", "Sainsbury's", -67.20, 24, JOINT, "Groceries"),
                tx("12", "Waitrose", -42.80, 21, JOINT, "Groceries"),
            ],
            2,
        )
        .with_insight(
            CategoryInsight::new(
                "Rock-solid grocery budget",
                "Your grocery spending has stayed steady for three straight months. That's excellent budgeting.",
            )
            .with_metric("Monthly average", Metric::Currency(420.0))
            .with_metric("Change vs last month", Metric::Percent(2.0)),
        ),
        TransactionCategory::seeded(
            "eating-out",
            "Eating Out",
            vec![
                tx("9", "Costa Coffee", -12.50, 23, PERSONAL, "Eating Out"),
                tx("10", "The Italian Restaurant", -85.00, 22, JOINT, "Eating Out"),
                tx("13", "Pizza Express", -55.00, 20, JOINT, "Eating Out"),
            ],
            24,
        )
        .with_insight(
            CategoryInsight::new(
                "Unusual Spending Detected",
                "Your family's 'Eating Out' spending is £150 higher than your £200 monthly average. Are you aware of this?",
            )
            .with_metric("Monthly average", Metric::Currency(200.0))
            .with_metric("Potential savings", Metric::Range(50.0, 80.0)),
        ),
        TransactionCategory::seeded(
            "entertainment",
            "Entertainment",
            vec![
                tx("4", "Netflix", -11.99, 26, JOINT, "Entertainment"),
                tx("5", "Disney+", -7.99, 25, JOINT, "Entertainment"),
                tx("7", "Prime Video", -8.99, 24, JOINT, "Entertainment"),
            ],
            0,
        )
        .with_insight(
            CategoryInsight::new(
                "Subscription Check-in",
                "We noticed you have 3 similar streaming subscriptions (Netflix, Disney+, Prime Video) costing £35/month. Could you consolidate?",
            )
            .with_metric("Subscriptions", Metric::Text("Netflix, Disney+, Prime Video".into()))
            .with_metric("Monthly cost", Metric::Currency(35.0))
            .with_metric("Potential savings", Metric::Range(10.0, 20.0)),
        ),
        TransactionCategory::seeded(
            "shopping",
            "Shopping",
            vec![
                tx("2", "Amazon.co.uk", -89.99, 27, AMEX, "Shopping"),
                tx("14", "Sports Direct", -34.99, 19, PERSONAL, "Shopping"),
            ],
            -12,
        ),
        TransactionCategory::seeded(
            "transport",
            "Transport",
            vec![
                tx("6", "Shell Petrol", -45.50, 25, PERSONAL, "Transport"),
                tx("11", "Uber", -18.50, 22, PERSONAL, "Transport"),
            ],
            8,
        ),
        TransactionCategory::seeded(
            "savings",
            "Savings",
            vec![tx("15", "Transfer to Savings", -500.00, 15, JOINT, "Savings")],
            0,
        ),
        TransactionCategory::seeded(
            "income",
            "Income",
            vec![tx("3", "Salary Deposit", 2500.00, 27, PERSONAL, "Income")],
            0,
        ),
    ])
}

pub fn goals() -> GoalBook {
    GoalBook::new(vec![
        Goal {
            id: "1".to_string(),
            name: "House Deposit".to_string(),
            target_amount: 20000.0,
            current_amount: 5500.0,
            target_date: date(2028, 10, 1),
            linked_accounts: vec!["1".to_string(), "2".to_string()],
        },
        Goal {
            id: "2".to_string(),
            name: "Family Holiday".to_string(),
            target_amount: 5000.0,
            current_amount: 2800.0,
            target_date: date(2026, 7, 1),
            linked_accounts: vec!["1".to_string()],
        },
    ])
}

pub fn accounts(now: DateTime<Utc>) -> Vec<ConnectedAccount> {
    let account = |id: &str,
                   bank: &str,
                   name: &str,
                   kind: &str,
                   digits: &str,
                   balance: f64,
                   ownership: OwnershipType,
                   status: AccountStatus,
                   synced_ago: Duration| ConnectedAccount {
        id: id.to_string(),
        bank_name: bank.to_string(),
        account_name: name.to_string(),
        account_type: kind.to_string(),
        last_four_digits: digits.to_string(),
        balance,
        ownership_type: ownership,
        status,
        last_synced: now - synced_ago,
    };

    vec![
        account(
            "1",
            "Barclays",
            "Joint Current Account",
            "Current Account",
            "4521",
            2450.75,
            OwnershipType::Joint,
            AccountStatus::Active,
            Duration::hours(2),
        ),
        account(
            "2",
            "Nationwide",
            "Shen's ISA",
            "Savings Account",
            "8834",
            8500.00,
            OwnershipType::Individual,
            AccountStatus::Active,
            Duration::hours(1),
        ),
        account(
            "3",
            "Santander",
            "Personal Savings",
            "Savings Account",
            "2019",
            12500.00,
            OwnershipType::Individual,
            AccountStatus::NeedsRefresh,
            Duration::days(5),
        ),
    ]
}

pub fn family(today: NaiveDate) -> Family {
    let member = |id: &str, first: &str, role: MemberRole| FamilyMember {
        id: id.to_string(),
        first_name: first.to_string(),
        last_name: "Morgan".to_string(),
        email: format!("{}@example.com", first.to_lowercase()),
        role,
        status: MemberStatus::Active,
        joined: date(2024, 1, 1),
    };

    let invited_on = today.checked_sub_days(Days::new(2)).unwrap_or(today);
    let invite = FamilyInvite {
        id: "inv-1".to_string(),
        email: "jamie@example.com".to_string(),
        invited_on,
        expires_on: invited_on
            .checked_add_days(Days::new(INVITE_VALID_DAYS))
            .unwrap_or(invited_on),
        status: InviteStatus::Pending,
    };

    Family::new(
        vec![
            member("1", "Alex", MemberRole::Admin),
            member("2", "Sam", MemberRole::Member),
        ],
        vec![invite],
    )
}

pub fn pathway() -> Vec<PathwayStep> {
    let step = |id: &str, step: &str, description: &str| PathwayStep {
        id: id.to_string(),
        step: step.to_string(),
        description: description.to_string(),
        completed: false,
    };

    vec![
        step(
            "1",
            "This week: Review your eating out spending",
            "Look at your last few restaurant and takeaway purchases. Which ones brought the most value to your family time together?",
        ),
        step(
            "2",
            "Next payday: Move £68 to your House Deposit",
            "This is the amount you spent above your usual eating out average. Even £50 would make a difference.",
        ),
        step(
            "3",
            "By end of month: Plan one special meal at home",
            "Cook something you'd normally order out. Many families find this creates better memories than restaurant visits.",
        ),
        step(
            "4",
            "Ongoing: Keep your grocery spending steady",
            "You've maintained £420/month consistently for three months. That's excellent budgeting - don't change what's working.",
        ),
    ]
}

/// Default partner inputs for the fairness calculator
pub fn partners(settings: &FairnessSettings) -> (PartnerData, PartnerData) {
    (
        PartnerData::new("Alex", 45000.0, 10.0, settings.default_hourly_value),
        PartnerData::new("Sam", 35000.0, 30.0, settings.default_hourly_value),
    )
}

/// The canned coach conversation
pub fn coach_script() -> CoachScript {
    CoachScript::new()
        .with_default(
            Topic::Progress,
            "Every contribution counts. Check in monthly and adjust what you put aside as life changes.",
        )
        .with_default(
            Topic::EatingOut,
            "Eating out is about £68 above your usual this month. Were those meals worth it for your family?",
        )
        .with_default(
            Topic::Groceries,
            "Your grocery spending has stayed rock-solid at £420 for three straight months. Don't change what's working.",
        )
        .with_default(
            Topic::SavingsTip,
            "Try moving savings on payday rather than at the end of the month, so the money is set aside before it can be spent.",
        )
        .with_default(
            Topic::Fairness,
            "Valuing unpaid work at home alongside salaries gives a fairer picture of who contributes what. Try the fairness calculator together.",
        )
        .with_reply(
            "1",
            Topic::Progress,
            "You've saved £5,500 of your £20,000 House Deposit. At £500 a month you're on track for October 2028.",
        )
        .with_reply(
            "1",
            Topic::SavingsTip,
            "Bringing eating out back to your usual level frees £68 a month. At £568/month you'd reach your deposit by December 2027, 11 months earlier.",
        )
        .with_reply(
            "1",
            Topic::EatingOut,
            "That extra £68 on eating out could go toward your House Deposit instead. Even £50 would make a difference.",
        )
        .with_reply(
            "2",
            Topic::Progress,
            "You're over halfway to your Family Holiday with £2,800 of £5,000 saved. Around £220 a month gets you there by July 2026.",
        )
}

pub fn insight_feed() -> InsightFeed {
    let insight = |id: &str, kind, headline: &str, body: &str| SmartInsight {
        id: id.to_string(),
        kind,
        headline: headline.to_string(),
        body: body.to_string(),
    };

    InsightFeed::new(vec![
        insight(
            "1",
            InsightKind::Cashflow,
            "Heads Up: Low Balance Alert",
            "Your £1,500 mortgage payment is due from your Joint Account in 3 days, but the current balance is only £800. We recommend moving £700 from your 'Personal Savings' to avoid issues.",
        ),
        insight(
            "2",
            InsightKind::Subscription,
            "Subscription Check-in",
            "We noticed you have 3 similar streaming subscriptions (Netflix, Disney+, Prime Video) costing £35/month. Could you consolidate?",
        ),
        insight(
            "3",
            InsightKind::Spending,
            "Unusual Spending Detected",
            "Your family's 'Eating Out' spending is £150 higher than your £200 monthly average. Are you aware of this?",
        ),
        insight(
            "4",
            InsightKind::Goal,
            "Great Progress on Your House Deposit!",
            "You've saved £500 towards your goal this month, putting you £83 ahead of schedule. Keep it up!",
        ),
    ])
}

pub fn notifications(now: DateTime<Utc>) -> Notifications {
    let notification = |id: &str,
                        kind: NotificationKind,
                        title: &str,
                        message: &str,
                        ago: Duration,
                        read: bool| Notification {
            id: id.to_string(),
            kind,
            title: title.to_string(),
            message: message.to_string(),
            created_at: now - ago,
            read,
        };

    Notifications::new(vec![
        notification(
            "1",
            NotificationKind::Goal,
            "House Deposit Goal Updated",
            "You're £83 ahead of schedule this month!",
            Duration::hours(2),
            false,
        ),
        notification(
            "2",
            NotificationKind::Insight,
            "New Spending Insight",
            "Eating Out spending is £150 higher than average",
            Duration::hours(5),
            false,
        ),
        notification(
            "3",
            NotificationKind::Account,
            "New Account Added",
            "Barclays Personal Savings has been linked",
            Duration::days(1),
            false,
        ),
        notification(
            "4",
            NotificationKind::Family,
            "Family Invitation Accepted",
            "Sam joined your family account",
            Duration::days(2),
            true,
        ),
    ])
}

/// The full demo household
pub fn household(now: DateTime<Utc>, fairness: &FairnessSettings) -> Household {
    let (partner1, partner2) = partners(fairness);
    Household {
        categories: categories(),
        goals: goals(),
        accounts: accounts(now),
        uploaded_accounts: Vec::new(),
        family: family(now.date_naive()),
        pathway: pathway(),
        fairness: Some(calculate(partner1, partner2, fairness.weeks_per_year)),
        insight_feed: insight_feed(),
        notifications: notifications(now),
    }
}
