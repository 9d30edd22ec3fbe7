//! CSV export of the filtered transaction view

use serde::Serialize;

use crate::categories::CategoryStore;
use crate::dates::format_display_date;
use crate::error::Result;
use crate::filter::CategoryFilter;
use crate::models::Transaction;

/// One exported row
#[derive(Debug, Clone, Serialize)]
pub struct TransactionExport {
    pub id: String,
    pub date: String,
    pub merchant: String,
    pub amount: String,
    pub category: String,
    pub account: String,
    pub owner: String,
    pub ownership: String,
}

impl From<&Transaction> for TransactionExport {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.clone(),
            date: format_display_date(tx.date),
            merchant: tx.merchant_name.clone(),
            amount: format!("{:.2}", tx.amount),
            category: tx.category.clone(),
            account: tx.account_label.clone(),
            owner: tx.account_owner.clone(),
            ownership: tx.ownership_type.to_string(),
        }
    }
}

/// Transactions passing `filter`, newest first
pub fn export_transactions(store: &CategoryStore, filter: &CategoryFilter<'_>) -> Vec<TransactionExport> {
    let mut transactions: Vec<&Transaction> = store.transactions().filter(|tx| filter.matches(tx)).collect();
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
    transactions.into_iter().map(TransactionExport::from).collect()
}

/// Render the filtered view as CSV with a header row
pub fn export_transactions_csv(store: &CategoryStore, filter: &CategoryFilter<'_>) -> Result<String> {
    let rows = export_transactions(store, filter);

    let mut writer = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        writer.write_record([
            "id", "date", "merchant", "amount", "category", "account", "owner", "ownership",
        ])?;
    }
    for row in &rows {
        writer.serialize(row)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    tracing::debug!(rows = rows.len(), "Exported transactions");
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
