//! Family commands (list, invite, cancel, remove)

use anyhow::Result;
use envis_core::dates::{format_display_date, format_month_year};
use envis_core::MemberRole;

use super::Session;

pub fn cmd_family_list(session: &Session) -> Result<()> {
    let family = session.household.family.expire_invites(session.today);

    println!();
    println!("👪 Family Members");
    println!("   ─────────────────────────────────────────────────────────────");
    for member in &family.members {
        let badge = if member.role == MemberRole::Admin { " 👑" } else { "" };
        println!(
            "   {:>3}  {:<20} {:<28} joined {}{}",
            member.id,
            member.full_name(),
            member.email,
            format_month_year(member.joined),
            badge
        );
    }

    let pending: Vec<_> = family.pending_invites().collect();
    if !pending.is_empty() {
        println!();
        println!("✉️  Pending Invitations ({})", pending.len());
        println!("   ─────────────────────────────────────────────────────────────");
        for invite in pending {
            println!(
                "   {:<7} {:<28} sent {}  expires {}",
                invite.id,
                invite.email,
                format_display_date(invite.invited_on),
                format_display_date(invite.expires_on)
            );
        }
    }

    println!();
    Ok(())
}

pub fn cmd_family_invite(session: &mut Session, email: &str) -> Result<()> {
    let (family, invite) = session
        .household
        .family
        .expire_invites(session.today)
        .invite(email, session.today)?;
    session.household.family = family;
    session.save()?;

    println!(
        "✅ Invitation sent to {} (expires {})",
        invite.email,
        format_display_date(invite.expires_on)
    );
    Ok(())
}

pub fn cmd_family_cancel(session: &mut Session, id: &str) -> Result<()> {
    let (family, invite) = session.household.family.cancel_invite(id)?;
    session.household.family = family;
    session.save()?;

    println!("✅ Invitation to {} has been cancelled", invite.email);
    Ok(())
}

pub fn cmd_family_remove(session: &mut Session, id: &str) -> Result<()> {
    let (family, member) = session.household.family.remove_member(id)?;
    session.household.family = family;
    session.save()?;

    println!("✅ {} has been removed from your family", member.first_name);
    Ok(())
}
