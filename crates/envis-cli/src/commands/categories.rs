//! Category commands (list, add, move, insight, annotate)

use anyhow::{bail, Context, Result};
use envis_core::dates::format_display_date;
use envis_core::{CategoryInsight, MetricParser, OwnershipType};

use super::{format_money, truncate, Session};
use crate::cli::ViewArgs;

pub fn cmd_categories_list(session: &Session, view: &ViewArgs, show_transactions: bool) -> Result<()> {
    let filter = session.filter(view);
    let categories = session.household.categories.view(&filter);

    if categories.is_empty() {
        println!("No transactions match those filters.");
        return Ok(());
    }

    let window = match filter.timeline {
        Some(timeline) => timeline.label(),
        None => "All Time",
    };

    println!();
    println!("🗂️  Categories ({}, {})", window, filter.ownership);
    println!("   ─────────────────────────────────────────────────────────────");

    for category in &categories {
        let mom = match category.totals.month_over_month {
            0 => String::new(),
            pct if pct > 0 => format!("↑{}%", pct),
            pct => format!("↓{}%", pct.abs()),
        };
        let insight = if category.insight.is_some() { "💡" } else { "  " };

        println!(
            "   {} {:<16} {:<18} {:>12}  {:>3} tx  {}",
            insight,
            category.id,
            truncate(&category.name, 18),
            format_money(category.totals.spend_to_date),
            category.totals.transaction_count,
            mom
        );

        if show_transactions {
            for tx in &category.transactions {
                let joint = if tx.ownership_type == OwnershipType::Joint { " 👥" } else { "" };
                println!(
                    "        {:>3}  {}  {:<24} {:>12}  {}{}",
                    tx.id,
                    format_display_date(tx.date),
                    truncate(&tx.merchant_name, 24),
                    format_money(tx.amount),
                    tx.account_label,
                    joint
                );
            }
        }
    }

    println!();
    Ok(())
}

pub fn cmd_categories_add(session: &mut Session, name: &str, id: Option<&str>) -> Result<()> {
    let (categories, id) = match id {
        Some(id) => session.household.categories.create_category_with_id(id, name)?,
        None => session.household.categories.create_category(name)?,
    };
    session.household.categories = categories;
    session.save()?;

    println!("✅ Created category '{}' (id: {})", name.trim(), id);
    Ok(())
}

pub fn cmd_categories_move(session: &mut Session, ids: &[String], to: &str) -> Result<()> {
    let target = session
        .household
        .categories
        .resolve(to)
        .map(|c| c.id.clone())
        .with_context(|| format!("Category not found: {}", to))?;

    let unknown: Vec<&str> = ids
        .iter()
        .filter(|id| session.household.categories.find_transaction(id).is_none())
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        println!("   ⚠️  Unknown transaction IDs ignored: {}", unknown.join(", "));
    }

    let moved = session.household.categories.count_movable(ids, &target);
    let categories = session.household.categories.move_transactions(ids, &target)?;
    session.household.categories = categories;
    session.save()?;

    let target = session.household.categories.require(&target)?;
    println!(
        "✅ Moved {} transaction(s) to '{}' ({} total, {})",
        moved,
        target.name,
        target.totals.transaction_count,
        format_money(target.totals.spend_to_date)
    );
    Ok(())
}

pub fn cmd_categories_insight(session: &Session, category: &str) -> Result<()> {
    let sheet = session
        .household
        .insight_sheet(category, &session.config.projection)?;

    println!();
    println!("💡 {} Insights", sheet.name);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Spend to date: {} across {} transactions",
        format_money(sheet.totals.spend_to_date),
        sheet.totals.transaction_count
    );
    if sheet.totals.month_over_month != 0 {
        println!("   vs last month: {:+}%", sheet.totals.month_over_month);
    }

    match &sheet.insight {
        Some(insight) => {
            println!();
            println!("   {}", insight.headline);
            println!("   {}", insight.body);
            for metric in &insight.metrics {
                println!("     • {}: {}", metric.label, metric.value);
            }
        }
        None => {
            println!();
            println!("   No insights for this category yet.");
        }
    }

    if let Some(projection) = &sheet.projection {
        let rates = &session.config.projection;
        println!();
        println!(
            "   📈 Saving {}/month for a year ({} principal):",
            format_money(projection.monthly),
            format_money(projection.yearly_principal)
        );
        println!(
            "      Index fund ({:.1}%):      {}",
            rates.index_fund_rate * 100.0,
            format_money(projection.index_fund)
        );
        println!(
            "      Savings account ({:.1}%): {}",
            rates.savings_account_rate * 100.0,
            format_money(projection.savings_account)
        );
    }

    println!();
    Ok(())
}

pub fn cmd_categories_annotate(
    session: &mut Session,
    category: &str,
    headline: &str,
    body: &str,
    metrics: &[String],
) -> Result<()> {
    let id = session
        .household
        .categories
        .resolve(category)
        .map(|c| c.id.clone())
        .with_context(|| format!("Category not found: {}", category))?;

    let parser = MetricParser::new()?;
    let mut insight = CategoryInsight::new(headline, body);
    for metric in metrics {
        let Some((label, value)) = metric.split_once('=') else {
            bail!("Invalid metric '{}' (expected \"Label=value\")", metric);
        };
        insight = insight.with_metric(label.trim(), parser.parse(value.trim()));
    }

    let count = insight.metrics.len();
    session.household.categories = session
        .household
        .categories
        .attach_insight(&id, Some(insight))?;
    session.save()?;

    println!("✅ Attached insight to '{}' ({} metrics)", id, count);
    Ok(())
}
