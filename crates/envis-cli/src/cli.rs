//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use envis_core::{InsightKind, OwnershipFilter, TimelineFilter, UploadedAccountType};

/// Envis - One family, one complete financial picture
#[derive(Parser)]
#[command(name = "envis")]
#[command(about = "Family financial coaching from the command line", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Household snapshot file
    #[arg(long, env = "ENVIS_STATE", default_value = "envis.json", global = true)]
    pub state: PathBuf,

    /// Config file (defaults to ~/.config/envis/config.toml, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Evaluate timeline windows as of this date (DD Mon YYYY, defaults to today)
    #[arg(long, env = "ENVIS_TODAY", global = true)]
    pub today: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the demo household to the snapshot file
    Init {
        /// Overwrite an existing snapshot
        #[arg(long)]
        force: bool,
    },

    /// Show balances, recent transactions and goal progress
    Dashboard,

    /// Browse and organise spending categories
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Run the fairness calculator
    Fairness {
        /// Partner 1 as "Name,income,hours[,hourly value]"
        #[arg(long, value_parser = parse_partner)]
        partner1: Option<PartnerArg>,

        /// Partner 2 as "Name,income,hours[,hourly value]"
        #[arg(long, value_parser = parse_partner)]
        partner2: Option<PartnerArg>,

        /// Store the result in the household
        #[arg(long)]
        save: bool,
    },

    /// Manage savings goals
    Goals {
        #[command(subcommand)]
        action: Option<GoalsAction>,
    },

    /// Ask the coach about a goal
    Coach {
        /// Goal ID
        goal: String,

        /// Topic: progress, eating-out, groceries, savings-tip, fairness
        topic: String,
    },

    /// The coach's suggested pathway
    Pathway {
        #[command(subcommand)]
        action: Option<PathwayAction>,
    },

    /// Manage connected bank accounts
    Accounts {
        #[command(subcommand)]
        action: Option<AccountsAction>,
    },

    /// Manage family members and invitations
    Family {
        #[command(subcommand)]
        action: Option<FamilyAction>,
    },

    /// Smart insights about the household
    Insights {
        #[command(subcommand)]
        action: Option<InsightsAction>,
    },

    /// In-app notifications
    Notifications {
        #[command(subcommand)]
        action: Option<NotificationsAction>,
    },

    /// Export transactions to CSV
    Export {
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Start the web server
    Serve {
        /// Port to listen on (defaults to config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to config)
        #[arg(long)]
        host: Option<String>,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

/// Filters shared by the category list and export
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Timeline window (current-month, previous-month, current-and-previous,
    /// last-3-months, last-6-months, year-to-date, last-2-years)
    #[arg(short, long, conflicts_with = "all_time")]
    pub timeline: Option<TimelineFilter>,

    /// Ignore the timeline and show every transaction
    #[arg(long)]
    pub all_time: bool,

    /// Ownership: all, individual, joint
    #[arg(long, default_value = "all")]
    pub ownership: OwnershipFilter,

    /// Search merchant or category name
    #[arg(short, long)]
    pub search: Option<String>,
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List categories with totals (default)
    List {
        #[command(flatten)]
        view: ViewArgs,

        /// Also list each category's transactions
        #[arg(long)]
        transactions: bool,
    },

    /// Create an empty category
    Add {
        /// Display name, e.g. "Kids Clubs"
        name: String,

        /// Use this id instead of deriving one from the name (fails if taken)
        #[arg(long)]
        id: Option<String>,
    },

    /// Move transactions into a category
    Move {
        /// Target category (ID or name)
        #[arg(long)]
        to: String,

        /// Transaction IDs to move
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Show the insight and savings projection for a category
    Insight {
        /// Category ID or name
        category: String,
    },

    /// Attach commentary to a category
    Annotate {
        /// Category ID or name
        category: String,

        #[arg(long)]
        headline: String,

        #[arg(long)]
        body: String,

        /// Metric as "Label=value", e.g. "Potential savings=£50-£80" (repeatable)
        #[arg(long = "metric")]
        metrics: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum GoalsAction {
    /// List goals with progress (default)
    List,

    /// Create a goal
    Add {
        name: String,

        /// Target amount in pounds
        #[arg(long)]
        target: f64,

        /// Target month, e.g. "Oct 2028"
        #[arg(long)]
        date: String,

        /// Linked account IDs (comma-separated)
        #[arg(long, value_delimiter = ',')]
        accounts: Vec<String>,
    },

    /// Update a goal
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        target: Option<f64>,

        /// Target month, e.g. "Oct 2028"
        #[arg(long)]
        date: Option<String>,

        /// Linked account IDs (comma-separated)
        #[arg(long, value_delimiter = ',')]
        accounts: Option<Vec<String>>,
    },

    /// Delete a goal
    Delete { id: String },

    /// Add savings to a goal (negative to withdraw)
    Contribute {
        id: String,

        #[arg(allow_hyphen_values = true)]
        amount: f64,
    },
}

#[derive(Subcommand)]
pub enum PathwayAction {
    /// List pathway steps (default)
    List,

    /// Mark a step done or not done
    Toggle { id: String },
}

#[derive(Subcommand)]
pub enum AccountsAction {
    /// List connected accounts (default)
    List,

    /// Refresh an account's connection
    Refresh { id: String },

    /// Disconnect an account
    Remove { id: String },

    /// Track an account from a PDF or CSV statement
    Upload {
        /// Account name, e.g. "Stocks & Shares ISA"
        #[arg(long)]
        name: String,

        /// investment or premium-bonds
        #[arg(long = "type", default_value = "investment")]
        account_type: UploadedAccountType,

        /// Provider, e.g. "Vanguard"
        #[arg(long)]
        provider: String,

        /// Balance shown on the statement
        #[arg(long)]
        balance: f64,

        /// Statement file
        #[arg(long)]
        file: PathBuf,
    },

    /// Remove an uploaded account
    RemoveUpload { id: String },
}

#[derive(Subcommand)]
pub enum FamilyAction {
    /// List members and pending invites (default)
    List,

    /// Invite someone by e-mail
    Invite { email: String },

    /// Cancel a pending invite
    Cancel { id: String },

    /// Remove a family member
    Remove { id: String },
}

#[derive(Subcommand)]
pub enum InsightsAction {
    /// List insights (default)
    List {
        /// Only this type: subscription, spending, goal, cashflow
        #[arg(long = "type")]
        kind: Option<InsightKind>,
    },

    /// Dismiss an insight
    Dismiss { id: String },
}

#[derive(Subcommand)]
pub enum NotificationsAction {
    /// List notifications (default)
    List,

    /// Mark a notification as read
    Read { id: String },

    /// Mark every notification as read
    ReadAll,

    /// Remove a notification
    Remove { id: String },
}

/// Partner inputs parsed from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct PartnerArg {
    pub name: String,
    pub gross_income: f64,
    pub unpaid_hours: f64,
    pub hourly_value: Option<f64>,
}

/// Parse "Name,income,hours[,hourly value]"
pub fn parse_partner(s: &str) -> Result<PartnerArg, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() < 3 || parts.len() > 4 {
        return Err(format!(
            "expected \"Name,income,hours[,hourly value]\", got \"{}\"",
            s
        ));
    }

    let number = |field: &str, value: &str| -> Result<f64, String> {
        let n: f64 = value
            .trim_start_matches('£')
            .replace('_', "")
            .parse()
            .map_err(|_| format!("invalid {}: {}", field, value))?;
        if n < 0.0 {
            return Err(format!("{} cannot be negative", field));
        }
        Ok(n)
    };

    if parts[0].is_empty() {
        return Err("partner name cannot be empty".to_string());
    }

    Ok(PartnerArg {
        name: parts[0].to_string(),
        gross_income: number("income", parts[1])?,
        unpaid_hours: number("hours", parts[2])?,
        hourly_value: parts.get(3).map(|v| number("hourly value", v)).transpose()?,
    })
}
