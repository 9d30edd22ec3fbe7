//! Goal commands (list, add, update, delete, contribute)

use anyhow::{Context, Result};
use envis_core::dates::{format_month_year, parse_month_year};
use envis_core::{GoalUpdate, NewGoal};

use super::{format_money, truncate, Session};

pub fn cmd_goals_list(session: &Session) -> Result<()> {
    let summaries = session.household.goal_summaries(session.today);

    if summaries.is_empty() {
        println!("No goals yet. Create your first family savings goal with:");
        println!("  envis goals add \"House Deposit\" --target 20000 --date \"Oct 2028\"");
        return Ok(());
    }

    println!();
    println!("🎯 Family Goals");
    println!("   ─────────────────────────────────────────────────────────────");
    for s in &summaries {
        println!(
            "   {:>3}  {:<20} {:>3}%  {} / {}  by {}",
            s.goal.id,
            truncate(&s.goal.name, 20),
            s.progress.percent,
            format_money(s.goal.current_amount),
            format_money(s.goal.target_amount),
            format_month_year(s.goal.target_date)
        );
        if s.progress.remaining > 0.0 {
            println!(
                "        {} to go: about {}/month for {} month(s)",
                format_money(s.progress.remaining),
                format_money(s.progress.monthly_needed),
                s.progress.months_remaining
            );
        }
    }
    println!();
    Ok(())
}

pub fn cmd_goals_add(
    session: &mut Session,
    name: &str,
    target: f64,
    date: &str,
    accounts: Vec<String>,
) -> Result<()> {
    let target_date = parse_month_year(date).context("Invalid --date (use e.g. \"Oct 2028\")")?;

    let (goals, goal) = session.household.goals.create(NewGoal {
        name: name.to_string(),
        target_amount: target,
        target_date,
        linked_accounts: accounts,
    })?;
    session.household.goals = goals;
    session.save()?;

    let progress = goal.progress(session.today);
    println!("✅ Created goal '{}' (id: {})", goal.name, goal.id);
    println!(
        "   Save about {}/month to reach {} by {}",
        format_money(progress.monthly_needed),
        format_money(goal.target_amount),
        format_month_year(goal.target_date)
    );
    Ok(())
}

pub fn cmd_goals_update(
    session: &mut Session,
    id: &str,
    name: Option<String>,
    target: Option<f64>,
    date: Option<&str>,
    accounts: Option<Vec<String>>,
) -> Result<()> {
    let target_date = date
        .map(parse_month_year)
        .transpose()
        .context("Invalid --date (use e.g. \"Oct 2028\")")?;

    let (goals, goal) = session.household.goals.update(
        id,
        GoalUpdate {
            name,
            target_amount: target,
            target_date,
            linked_accounts: accounts,
        },
    )?;
    session.household.goals = goals;
    session.save()?;

    println!("✅ Updated goal '{}' (id: {})", goal.name, goal.id);
    Ok(())
}

pub fn cmd_goals_delete(session: &mut Session, id: &str) -> Result<()> {
    let name = session.household.goals.require(id)?.name.clone();
    session.household.goals = session.household.goals.delete(id)?;
    session.save()?;

    println!("✅ Deleted goal '{}'", name);
    Ok(())
}

pub fn cmd_goals_contribute(session: &mut Session, id: &str, amount: f64) -> Result<()> {
    let (goals, goal) = session.household.goals.contribute(id, amount)?;
    session.household.goals = goals;
    session.save()?;

    println!(
        "✅ {} now at {} of {} ({}%)",
        goal.name,
        format_money(goal.current_amount),
        format_money(goal.target_amount),
        goal.progress_percent()
    );
    if goal.is_complete() {
        println!("   🎉 Goal reached!");
    }
    Ok(())
}
