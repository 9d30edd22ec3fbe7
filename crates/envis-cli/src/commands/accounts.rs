//! Account commands (list, refresh, remove, statement uploads)

use std::path::Path;

use anyhow::{Context, Result};
use envis_core::accounts::{
    refresh_account, remove_account, remove_uploaded_account, sync_age, total_balance,
};
use envis_core::dates::format_display_date;
use envis_core::{AccountStatus, NewUploadedAccount, UploadedAccountType};

use super::{format_money, Session};

pub fn cmd_accounts_list(session: &Session) -> Result<()> {
    let accounts = &session.household.accounts;

    if accounts.is_empty() {
        println!("No connected accounts.");
        return Ok(());
    }

    println!();
    println!("🏦 Connected Accounts");
    println!("   ─────────────────────────────────────────────────────────────");
    for account in accounts {
        let status = match account.status {
            AccountStatus::Active => "✅",
            AccountStatus::NeedsRefresh => "🔄",
            AccountStatus::Error => "❌",
        };
        println!(
            "   {:>3}  {} {:<11} {:<24} ••••{}  {:>12}  {} ({})",
            account.id,
            status,
            account.bank_name,
            account.account_name,
            account.last_four_digits,
            format_money(account.balance),
            account.ownership_type,
            sync_age(account.last_synced, session.now)
        );
    }
    println!();
    println!("   Total: {}", format_money(total_balance(accounts)));

    let uploaded = &session.household.uploaded_accounts;
    if !uploaded.is_empty() {
        println!();
        println!("📄 Uploaded Statements");
        println!("   ─────────────────────────────────────────────────────────────");
        for account in uploaded {
            println!(
                "   {:>5}  {:<18} {:<20} {:>12}  {}  uploaded {} ({})",
                account.id,
                account.provider,
                account.account_name,
                format_money(account.balance),
                account.account_type.label(),
                format_display_date(account.uploaded_on),
                account.file_name
            );
        }
    }
    println!();
    Ok(())
}

pub fn cmd_accounts_refresh(session: &mut Session, id: &str) -> Result<()> {
    session.household.accounts = refresh_account(&session.household.accounts, id, session.now)?;
    session.save()?;

    println!("✅ Refreshed account {}", id);
    Ok(())
}

pub fn cmd_accounts_remove(session: &mut Session, id: &str) -> Result<()> {
    session.household.accounts = remove_account(&session.household.accounts, id)?;
    session.save()?;

    println!("✅ Removed account {}", id);
    Ok(())
}

pub fn cmd_accounts_upload(
    session: &mut Session,
    name: &str,
    account_type: UploadedAccountType,
    provider: &str,
    balance: f64,
    file: &Path,
) -> Result<()> {
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid statement path: {}", file.display()))?;

    let (household, account) = session.household.add_uploaded_account(
        NewUploadedAccount {
            account_name: name.to_string(),
            account_type,
            provider: provider.to_string(),
            balance,
            file_name: file_name.to_string(),
        },
        session.now,
    )?;
    session.household = household;
    session.save()?;

    println!(
        "✅ Added {} {} ({}) as {}",
        account.provider,
        account.account_name,
        format_money(account.balance),
        account.id
    );
    Ok(())
}

pub fn cmd_accounts_remove_upload(session: &mut Session, id: &str) -> Result<()> {
    let (uploaded, account) = remove_uploaded_account(&session.household.uploaded_accounts, id)?;
    session.household.uploaded_accounts = uploaded;
    session.save()?;

    println!("✅ Removed {} and its statement", account.account_name);
    Ok(())
}
