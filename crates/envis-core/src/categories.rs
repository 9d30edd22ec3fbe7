//! Category store: grouping, moving and creating transaction categories
//!
//! `CategoryStore` is an owned aggregate. Every mutation takes `&self` and
//! returns a new store, so callers swap the old value out only once the
//! operation has succeeded.
//!
//! Totals are always derived from a category's current transaction list:
//! `transaction_count == transactions.len()` and `spend_to_date` is the sum
//! of absolute amounts. Month-over-month change is measured against
//! `last_month_baseline`, which is captured once when a category is seeded
//! and never re-derived, so repeated moves cannot make it drift.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::filter::CategoryFilter;
use crate::insights::CategoryInsight;
use crate::models::{CategoryTotals, Transaction, TransactionCategory};

impl TransactionCategory {
    /// Create an empty category with zero totals
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            transactions: Vec::new(),
            totals: CategoryTotals::default(),
            last_month_baseline: None,
            insight: None,
        }
    }

    /// Create a category from seed data with a known month-over-month change
    ///
    /// The implied last-month spend (`spend / (1 + pct / 100)`) is stored as
    /// the baseline for all later recomputation.
    pub fn seeded(
        id: impl Into<String>,
        name: impl Into<String>,
        transactions: Vec<Transaction>,
        month_over_month: i32,
    ) -> Self {
        let mut category = Self::new(id, name);
        category.transactions = transactions;

        let spend = sum_abs(&category.transactions);
        let factor = 1.0 + f64::from(month_over_month) / 100.0;
        category.last_month_baseline = if factor > 0.0 && spend > 0.0 {
            Some(spend / factor)
        } else {
            None
        };

        category.recompute_totals();
        category
    }

    /// Attach static commentary
    pub fn with_insight(mut self, insight: CategoryInsight) -> Self {
        self.insight = Some(insight);
        self
    }

    /// Recompute totals from the current transaction list
    pub fn recompute_totals(&mut self) {
        let spend = sum_abs(&self.transactions);
        self.totals = CategoryTotals {
            spend_to_date: spend,
            month_over_month: month_over_month(spend, self.last_month_baseline),
            transaction_count: self.transactions.len(),
        };
    }

    /// Net signed amount of all transactions
    pub fn net_amount(&self) -> f64 {
        self.transactions.iter().map(|tx| tx.amount).sum()
    }
}

fn sum_abs(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(|tx| tx.amount.abs()).sum()
}

fn month_over_month(spend: f64, baseline: Option<f64>) -> i32 {
    match baseline {
        Some(base) if base > 0.0 => ((spend - base) / base * 100.0).round() as i32,
        _ => 0,
    }
}

/// Turn a display name into a category id ("Eating Out" -> "eating-out")
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn validate_category_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidData("Category name cannot be empty".into()));
    }
    Ok(name)
}

/// Ordered collection of categories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryStore {
    categories: Vec<TransactionCategory>,
}

impl CategoryStore {
    /// Build a store, recomputing every category's totals
    pub fn new(categories: Vec<TransactionCategory>) -> Self {
        let mut categories = categories;
        for category in &mut categories {
            category.recompute_totals();
        }
        Self { categories }
    }

    pub fn categories(&self) -> &[TransactionCategory] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Look up a category by id
    pub fn get(&self, id: &str) -> Option<&TransactionCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Look up a category by id, or fail with `CategoryNotFound`
    pub fn require(&self, id: &str) -> Result<&TransactionCategory> {
        self.get(id)
            .ok_or_else(|| Error::CategoryNotFound(id.to_string()))
    }

    /// Resolve a category by id or (case-insensitive) name
    pub fn resolve(&self, id_or_name: &str) -> Option<&TransactionCategory> {
        self.get(id_or_name).or_else(|| {
            self.categories
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(id_or_name))
        })
    }

    /// Like `resolve`, but a miss is `CategoryNotFound`
    pub fn require_resolved(&self, id_or_name: &str) -> Result<&TransactionCategory> {
        self.resolve(id_or_name)
            .ok_or_else(|| Error::CategoryNotFound(id_or_name.to_string()))
    }

    /// Iterate over every transaction in every category
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.categories.iter().flat_map(|c| c.transactions.iter())
    }

    /// Find a transaction by id
    pub fn find_transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions().find(|tx| tx.id == id)
    }

    /// Filtered view of the store
    ///
    /// Spend and count are recomputed over the transactions that pass the
    /// filter; month-over-month keeps the store-level figure. Categories left
    /// empty are dropped unless the filter shows empty categories.
    pub fn view(&self, filter: &CategoryFilter<'_>) -> Vec<TransactionCategory> {
        self.categories
            .iter()
            .map(|category| {
                let transactions: Vec<Transaction> = category
                    .transactions
                    .iter()
                    .filter(|tx| filter.matches(tx))
                    .cloned()
                    .collect();

                let mut view = category.clone();
                view.totals = CategoryTotals {
                    spend_to_date: sum_abs(&transactions),
                    month_over_month: category.totals.month_over_month,
                    transaction_count: transactions.len(),
                };
                view.transactions = transactions;
                view
            })
            .filter(|c| !c.transactions.is_empty() || filter.shows_empty_categories())
            .collect()
    }

    /// Id that `name` would receive if created now
    pub fn next_id_for(&self, name: &str) -> String {
        let base = slugify(name);
        if self.get(&base).is_none() {
            return base;
        }

        let mut counter = 1;
        loop {
            let candidate = format!("{}-{}", base, counter);
            if self.get(&candidate).is_none() {
                return candidate;
            }
            counter += 1;
        }
    }

    /// Create an empty category, suffixing the slug on collision
    ///
    /// Returns the new store and the id assigned to the category.
    pub fn create_category(&self, name: &str) -> Result<(Self, String)> {
        let name = validate_category_name(name)?;
        let id = self.next_id_for(name);
        let store = self.insert_category(TransactionCategory::new(id.clone(), name))?;

        debug!(category = %id, "Created category");
        Ok((store, id))
    }

    /// Create an empty category under an id the caller chose
    ///
    /// The id is slugified but never suffixed; a taken id is
    /// `DuplicateCategorySlug`.
    pub fn create_category_with_id(&self, id: &str, name: &str) -> Result<(Self, String)> {
        let name = validate_category_name(name)?;
        let id = slugify(id);
        let store = self.insert_category(TransactionCategory::new(id.clone(), name))?;

        debug!(category = %id, "Created category with explicit id");
        Ok((store, id))
    }

    /// Append a category whose id is chosen by the caller
    pub fn insert_category(&self, category: TransactionCategory) -> Result<Self> {
        if category.id.is_empty() {
            return Err(Error::InvalidData("Category id cannot be empty".into()));
        }
        if self.get(&category.id).is_some() {
            return Err(Error::DuplicateCategorySlug(category.id));
        }

        let mut store = self.clone();
        let mut category = category;
        category.recompute_totals();
        store.categories.push(category);
        Ok(store)
    }

    /// Replace the insight attached to a category
    pub fn attach_insight(&self, category_id: &str, insight: Option<CategoryInsight>) -> Result<Self> {
        let mut store = self.clone();
        let category = store
            .categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or_else(|| Error::CategoryNotFound(category_id.to_string()))?;
        category.insight = insight;
        Ok(store)
    }

    /// Number of distinct ids that `move_transactions` would actually move
    ///
    /// Unknown ids, repeats and transactions already in the target are not
    /// counted.
    pub fn count_movable(&self, transaction_ids: &[String], target_id: &str) -> usize {
        let wanted: HashSet<&str> = transaction_ids.iter().map(String::as_str).collect();
        self.categories
            .iter()
            .filter(|c| c.id != target_id)
            .flat_map(|c| c.transactions.iter())
            .filter(|tx| wanted.contains(tx.id.as_str()))
            .count()
    }

    /// Move transactions into `target_id`
    ///
    /// Matching transactions are removed from every other category,
    /// relabelled with the target's name and appended to the target in the
    /// order they were found. Ids already in the target, or matching nothing,
    /// are left alone. Totals are recomputed for every touched category.
    pub fn move_transactions(&self, transaction_ids: &[String], target_id: &str) -> Result<Self> {
        let target_name = self.require(target_id)?.name.clone();
        let wanted: HashSet<&str> = transaction_ids.iter().map(String::as_str).collect();

        let mut store = self.clone();
        let mut moving: Vec<Transaction> = Vec::new();

        for category in store.categories.iter_mut().filter(|c| c.id != target_id) {
            let before = category.transactions.len();
            let (taken, kept): (Vec<_>, Vec<_>) = category
                .transactions
                .drain(..)
                .partition(|tx| wanted.contains(tx.id.as_str()));
            category.transactions = kept;

            if category.transactions.len() != before {
                category.recompute_totals();
                moving.extend(taken);
            }
        }

        let unmatched = wanted
            .iter()
            .filter(|id| self.find_transaction(id).is_none())
            .count();
        if unmatched > 0 {
            debug!(unmatched, "Some transaction ids matched nothing");
        }

        let moved = moving.len();
        if let Some(target) = store.categories.iter_mut().find(|c| c.id == target_id) {
            for mut tx in moving {
                tx.category = target_name.clone();
                target.transactions.push(tx);
            }
            target.recompute_totals();
        }

        debug!(target = %target_id, moved, "Moved transactions");
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OwnershipType;
    use crate::timeline::TimelineFilter;
    use chrono::NaiveDate;

    fn tx(id: &str, merchant: &str, amount: f64, category: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            merchant_name: merchant.to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2025, 9, 20).unwrap(),
            account_label: "Joint Account".to_string(),
            account_owner: "Alex & Sam".to_string(),
            ownership_type: OwnershipType::Joint,
            category: category.to_string(),
        }
    }

    fn store() -> CategoryStore {
        CategoryStore::new(vec![
            TransactionCategory::seeded(
                "groceries",
                "Groceries",
                vec![
                    tx("1", "Tesco", -55.40, "Groceries"),
                    tx("8", "Sainsbury's", -67.20, "Groceries"),
                ],
                5,
            ),
            TransactionCategory::seeded(
                "entertainment",
                "Entertainment",
                vec![tx("4", "Netflix", -11.99, "Entertainment")],
                0,
            ),
            TransactionCategory::new("healthcare", "Healthcare"),
        ])
    }

    fn assert_invariants(store: &CategoryStore) {
        for c in store.categories() {
            assert_eq!(c.totals.transaction_count, c.transactions.len());
            let sum: f64 = c.transactions.iter().map(|t| t.amount.abs()).sum();
            assert!((c.totals.spend_to_date - sum).abs() < 1e-9);
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Eating Out"), "eating-out");
        assert_eq!(slugify("  Kids   Clubs "), "kids-clubs");
        assert_eq!(slugify("Groceries"), "groceries");
    }

    #[test]
    fn test_seeded_baseline_reproduces_percentage() {
        let s = store();
        let groceries = s.get("groceries").unwrap();
        assert_eq!(groceries.totals.month_over_month, 5);
        assert!((groceries.totals.spend_to_date - 122.60).abs() < 1e-9);
        assert_eq!(groceries.totals.transaction_count, 2);
    }

    #[test]
    fn test_create_category_collision_suffix() {
        let s = store();
        let (s, id) = s.create_category("Groceries").unwrap();
        assert_eq!(id, "groceries-1");
        let (s, id) = s.create_category("groceries").unwrap();
        assert_eq!(id, "groceries-2");

        let created = s.get("groceries-2").unwrap();
        assert_eq!(created.name, "groceries");
        assert!(created.transactions.is_empty());
        assert_eq!(created.totals, CategoryTotals::default());
    }

    #[test]
    fn test_create_category_rejects_blank() {
        let s = store();
        assert!(matches!(
            s.create_category("   "),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_insert_category_duplicate_slug() {
        let s = store();
        let result = s.insert_category(TransactionCategory::new("groceries", "Groceries"));
        assert!(matches!(result, Err(Error::DuplicateCategorySlug(id)) if id == "groceries"));
    }

    #[test]
    fn test_create_category_with_explicit_id() {
        let s = store();
        let (s, id) = s.create_category_with_id("Kids Clubs", "Kids' Clubs").unwrap();
        assert_eq!(id, "kids-clubs");
        assert_eq!(s.get("kids-clubs").unwrap().name, "Kids' Clubs");

        let err = s
            .create_category_with_id("groceries", "More Groceries")
            .unwrap_err();
        assert!(err.is_conflict());
        assert!(matches!(err, Error::DuplicateCategorySlug(id) if id == "groceries"));
        assert!(matches!(
            s.create_category_with_id("   ", "Blank Id"),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            s.create_category_with_id("pets", " "),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_count_movable_skips_repeats_and_in_place() {
        let s = store();
        let ids: Vec<String> = ["1", "1", "4", "8", "999"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        // "1" and "8" already sit in groceries; "1" is listed twice
        assert_eq!(s.count_movable(&ids, "groceries"), 1);
        assert_eq!(s.count_movable(&ids, "healthcare"), 3);
    }

    #[test]
    fn test_move_transactions() {
        let s = store();
        let moved = s
            .move_transactions(&["1".to_string(), "4".to_string()], "healthcare")
            .unwrap();

        let healthcare = moved.get("healthcare").unwrap();
        assert_eq!(healthcare.transactions.len(), 2);
        assert!(healthcare
            .transactions
            .iter()
            .all(|tx| tx.category == "Healthcare"));

        assert_eq!(moved.get("groceries").unwrap().transactions.len(), 1);
        assert!(moved.get("entertainment").unwrap().transactions.is_empty());
        assert_invariants(&moved);

        // Original store untouched
        assert_eq!(s.get("healthcare").unwrap().transactions.len(), 0);
    }

    #[test]
    fn test_move_to_unknown_category() {
        let s = store();
        let result = s.move_transactions(&["1".to_string()], "nope");
        assert!(matches!(result, Err(Error::CategoryNotFound(_))));
    }

    #[test]
    fn test_move_ignores_unknown_and_in_place_ids() {
        let s = store();
        let moved = s
            .move_transactions(&["1".to_string(), "999".to_string()], "groceries")
            .unwrap();
        assert_eq!(moved, s);
    }

    #[test]
    fn test_move_round_trip_restores_membership_and_mom() {
        let s = store();
        let there = s.move_transactions(&["8".to_string()], "entertainment").unwrap();
        assert_ne!(
            there.get("groceries").unwrap().totals.month_over_month,
            s.get("groceries").unwrap().totals.month_over_month
        );

        let back = there.move_transactions(&["8".to_string()], "groceries").unwrap();
        let ids = |store: &CategoryStore, id: &str| -> Vec<String> {
            let mut ids: Vec<String> = store
                .get(id)
                .unwrap()
                .transactions
                .iter()
                .map(|t| t.id.clone())
                .collect();
            ids.sort();
            ids
        };
        assert_eq!(ids(&back, "groceries"), ids(&s, "groceries"));
        assert_eq!(ids(&back, "entertainment"), ids(&s, "entertainment"));
        assert_eq!(
            back.get("groceries").unwrap().totals,
            s.get("groceries").unwrap().totals
        );
    }

    #[test]
    fn test_view_recomputes_filtered_totals() {
        let s = store();
        let today = NaiveDate::from_ymd_opt(2025, 9, 28).unwrap();

        let filter = CategoryFilter::new(today).search(Some("tesco"));
        let view = s.view(&filter);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, "groceries");
        assert_eq!(view[0].totals.transaction_count, 1);
        assert!((view[0].totals.spend_to_date - 55.40).abs() < 1e-9);

        // Unfiltered view keeps empty categories
        let all = s.view(&CategoryFilter::new(today));
        assert_eq!(all.len(), 3);

        // Timeline that excludes everything still shows categories (no search)
        let prev = CategoryFilter::new(today).timeline(Some(TimelineFilter::PreviousMonth));
        let view = s.view(&prev);
        assert_eq!(view.len(), 3);
        assert!(view.iter().all(|c| c.totals.transaction_count == 0));
    }

    #[test]
    fn test_resolve_by_name() {
        let s = store();
        assert_eq!(s.resolve("ENTERTAINMENT").unwrap().id, "entertainment");
        assert_eq!(s.resolve("groceries").unwrap().name, "Groceries");
        assert!(s.resolve("pets").is_none());
    }
}
