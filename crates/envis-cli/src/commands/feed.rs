//! Smart insights feed and notification commands

use anyhow::Result;
use envis_core::accounts::sync_age;
use envis_core::{InsightKind, NotificationKind};

use super::Session;

pub fn cmd_insights_list(session: &Session, kind: Option<InsightKind>) -> Result<()> {
    let insights = session.household.insight_feed.of_kind(kind);

    if insights.is_empty() {
        println!("No new insights at the moment. Check back soon!");
        return Ok(());
    }

    println!();
    println!("💡 Smart Insights");
    println!("   ─────────────────────────────────────────────────────────────");
    for insight in &insights {
        let icon = match insight.kind {
            InsightKind::Subscription => "🔁",
            InsightKind::Spending => "📊",
            InsightKind::Goal => "🎯",
            InsightKind::Cashflow => "⚠️ ",
        };
        println!("   {:>3}  {} {} [{}]", insight.id, icon, insight.headline, insight.kind);
        println!("          {}", insight.body);
    }
    println!();
    Ok(())
}

pub fn cmd_insights_dismiss(session: &mut Session, id: &str) -> Result<()> {
    let (feed, insight) = session.household.insight_feed.dismiss(id)?;
    session.household.insight_feed = feed;
    session.save()?;

    println!("✅ Dismissed '{}'", insight.headline);
    Ok(())
}

pub fn cmd_notifications_list(session: &Session) -> Result<()> {
    let list = &session.household.notifications;

    if list.items().is_empty() {
        println!("No notifications");
        return Ok(());
    }

    println!();
    println!("🔔 Notifications ({} unread)", list.unread_count());
    println!("   ─────────────────────────────────────────────────────────────");
    for n in list.items() {
        let icon = match n.kind {
            NotificationKind::Goal => "🎯",
            NotificationKind::Insight => "💡",
            NotificationKind::Account => "🏦",
            NotificationKind::Family => "👪",
        };
        let unread = if n.read { " " } else { "•" };
        println!(
            "   {:>3} {} {} {:<32} {}",
            n.id,
            unread,
            icon,
            n.title,
            sync_age(n.created_at, session.now)
        );
        println!("              {}", n.message);
    }
    println!();
    Ok(())
}

pub fn cmd_notifications_read(session: &mut Session, id: &str) -> Result<()> {
    session.household.notifications = session.household.notifications.mark_read(id)?;
    session.save()?;

    println!("✅ Marked notification {} as read", id);
    Ok(())
}

pub fn cmd_notifications_read_all(session: &mut Session) -> Result<()> {
    session.household.notifications = session.household.notifications.mark_all_read();
    session.save()?;

    println!("✅ All notifications marked as read");
    Ok(())
}

pub fn cmd_notifications_remove(session: &mut Session, id: &str) -> Result<()> {
    let (list, removed) = session.household.notifications.remove(id)?;
    session.household.notifications = list;
    session.save()?;

    println!("✅ Removed '{}'", removed.title);
    Ok(())
}
