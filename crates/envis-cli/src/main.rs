//! Envis CLI - Family financial coach
//!
//! Usage:
//!   envis init                      Save the demo household to envis.json
//!   envis dashboard                 Balances, recent transactions, goals
//!   envis categories --all-time     Spending by category
//!   envis fairness                  Contribution ratios with unpaid labour
//!   envis insights                  Smart insights feed
//!   envis serve --port 3000         Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::Session;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    if let Commands::Init { force } = cli.command {
        return commands::cmd_init(&cli.state, cli.config.as_deref(), cli.today.as_deref(), force);
    }

    let mut session = Session::open(&cli.state, cli.config.as_deref(), cli.today.as_deref())?;

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Dashboard => commands::cmd_dashboard(&session),
        Commands::Categories { action } => match action {
            None => commands::cmd_categories_list(&session, &ViewArgs::default(), false),
            Some(CategoriesAction::List { view, transactions }) => {
                commands::cmd_categories_list(&session, &view, transactions)
            }
            Some(CategoriesAction::Add { name, id }) => {
                commands::cmd_categories_add(&mut session, &name, id.as_deref())
            }
            Some(CategoriesAction::Move { to, ids }) => {
                commands::cmd_categories_move(&mut session, &ids, &to)
            }
            Some(CategoriesAction::Insight { category }) => {
                commands::cmd_categories_insight(&session, &category)
            }
            Some(CategoriesAction::Annotate {
                category,
                headline,
                body,
                metrics,
            }) => commands::cmd_categories_annotate(&mut session, &category, &headline, &body, &metrics),
        },
        Commands::Fairness {
            partner1,
            partner2,
            save,
        } => commands::cmd_fairness(&mut session, partner1.as_ref(), partner2.as_ref(), save),
        Commands::Goals { action } => match action {
            None | Some(GoalsAction::List) => commands::cmd_goals_list(&session),
            Some(GoalsAction::Add {
                name,
                target,
                date,
                accounts,
            }) => commands::cmd_goals_add(&mut session, &name, target, &date, accounts),
            Some(GoalsAction::Update {
                id,
                name,
                target,
                date,
                accounts,
            }) => commands::cmd_goals_update(&mut session, &id, name, target, date.as_deref(), accounts),
            Some(GoalsAction::Delete { id }) => commands::cmd_goals_delete(&mut session, &id),
            Some(GoalsAction::Contribute { id, amount }) => {
                commands::cmd_goals_contribute(&mut session, &id, amount)
            }
        },
        Commands::Coach { goal, topic } => commands::cmd_coach(&session, &goal, &topic),
        Commands::Pathway { action } => match action {
            None | Some(PathwayAction::List) => commands::cmd_pathway_list(&session),
            Some(PathwayAction::Toggle { id }) => commands::cmd_pathway_toggle(&mut session, &id),
        },
        Commands::Accounts { action } => match action {
            None | Some(AccountsAction::List) => commands::cmd_accounts_list(&session),
            Some(AccountsAction::Refresh { id }) => commands::cmd_accounts_refresh(&mut session, &id),
            Some(AccountsAction::Remove { id }) => commands::cmd_accounts_remove(&mut session, &id),
            Some(AccountsAction::Upload {
                name,
                account_type,
                provider,
                balance,
                file,
            }) => commands::cmd_accounts_upload(&mut session, &name, account_type, &provider, balance, &file),
            Some(AccountsAction::RemoveUpload { id }) => {
                commands::cmd_accounts_remove_upload(&mut session, &id)
            }
        },
        Commands::Family { action } => match action {
            None | Some(FamilyAction::List) => commands::cmd_family_list(&session),
            Some(FamilyAction::Invite { email }) => commands::cmd_family_invite(&mut session, &email),
            Some(FamilyAction::Cancel { id }) => commands::cmd_family_cancel(&mut session, &id),
            Some(FamilyAction::Remove { id }) => commands::cmd_family_remove(&mut session, &id),
        },
        Commands::Insights { action } => match action {
            None => commands::cmd_insights_list(&session, None),
            Some(InsightsAction::List { kind }) => commands::cmd_insights_list(&session, kind),
            Some(InsightsAction::Dismiss { id }) => commands::cmd_insights_dismiss(&mut session, &id),
        },
        Commands::Notifications { action } => match action {
            None | Some(NotificationsAction::List) => commands::cmd_notifications_list(&session),
            Some(NotificationsAction::Read { id }) => {
                commands::cmd_notifications_read(&mut session, &id)
            }
            Some(NotificationsAction::ReadAll) => commands::cmd_notifications_read_all(&mut session),
            Some(NotificationsAction::Remove { id }) => {
                commands::cmd_notifications_remove(&mut session, &id)
            }
        },
        Commands::Export { output, view } => commands::cmd_export(&session, output.as_deref(), &view),
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(session, host.as_deref(), port, static_dir.as_deref()).await,
    }
}
