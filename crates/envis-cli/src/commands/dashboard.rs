//! Dashboard command

use anyhow::Result;
use envis_core::dates::{format_display_date, format_month_year};

use super::{format_money, truncate, Session};

pub fn cmd_dashboard(session: &Session) -> Result<()> {
    let dashboard = session.household.dashboard(session.today);
    let summary = &dashboard.summary;

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│           🏡 Envis Dashboard            │");
    println!("╰─────────────────────────────────────────╯");
    println!("  One family, one complete financial picture");
    println!();
    println!("  Total Balance:     {}", format_money(summary.total_balance));
    let sign = if summary.monthly_net_flow >= 0.0 { "+" } else { "" };
    println!(
        "  This Month:        {}{}",
        sign,
        format_money(summary.monthly_net_flow)
    );
    println!("  🎯 Active Goals:   {}", summary.active_goals);
    println!("  ⚠️  Pending Alerts: {}", summary.pending_alerts);
    println!("  🔔 Unread:         {}", dashboard.unread_notifications);

    if session.seeded {
        println!();
        println!("  (demo data - run 'envis init' to save changes between runs)");
    }

    println!();
    println!("📋 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");
    for tx in &dashboard.recent_transactions {
        println!(
            "   {:>3}  {}  {:<24} {:>12}  {:<14} {}",
            tx.id,
            format_display_date(tx.date),
            truncate(&tx.merchant_name, 24),
            format_money(tx.amount),
            truncate(&tx.category, 14),
            tx.account_label
        );
    }

    if !dashboard.goals.is_empty() {
        println!();
        println!("🎯 Goals");
        println!("   ─────────────────────────────────────────────────────────────");
        for summary in &dashboard.goals {
            println!(
                "   {:<20} {:>3}%  {} of {} by {}",
                truncate(&summary.goal.name, 20),
                summary.progress.percent,
                format_money(summary.goal.current_amount),
                format_money(summary.goal.target_amount),
                format_month_year(summary.goal.target_date)
            );
        }
    }

    if let Some(fairness) = dashboard.fairness_summary {
        println!();
        println!("⚖️  {}", fairness);
    }

    println!();
    Ok(())
}
