//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `Session` - Loaded config and household, plus the date commands run "as of"
//! - `cmd_init` - Write the demo household to disk
//! - Formatting helpers shared by the other commands

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use envis_core::dates::{noon_utc, parse_display_date};
use envis_core::{seed, CategoryFilter, EnvisConfig, Household};

use crate::cli::ViewArgs;

/// Everything a command needs
pub struct Session {
    pub state_path: PathBuf,
    pub config: EnvisConfig,
    pub household: Household,
    pub today: NaiveDate,
    /// True when `today` came from `--today` rather than the clock
    pub today_pinned: bool,
    pub now: DateTime<Utc>,
    /// True when the household came from seed data rather than a snapshot
    pub seeded: bool,
}

impl Session {
    /// Load config and the household snapshot (or seed data if there is none)
    pub fn open(state_path: &Path, config_path: Option<&Path>, today: Option<&str>) -> Result<Self> {
        let config = EnvisConfig::load(config_path).context("Failed to load configuration")?;
        let pinned = parse_today(today)?;
        let now = clock(pinned);
        let today_pinned = pinned.is_some();
        let today = pinned.unwrap_or_else(|| Local::now().date_naive());

        let loaded = Household::load_optional(state_path)
            .with_context(|| format!("Failed to read snapshot {}", state_path.display()))?;
        let seeded = loaded.is_none();
        let household = match loaded {
            Some(household) => household,
            None => {
                tracing::debug!(path = %state_path.display(), "No snapshot, using demo household");
                seed::household(now, &config.fairness)
            }
        };

        Ok(Self {
            state_path: state_path.to_path_buf(),
            config,
            household,
            today,
            today_pinned,
            now,
            seeded,
        })
    }

    /// Persist the household
    pub fn save(&mut self) -> Result<()> {
        self.household
            .save(&self.state_path)
            .with_context(|| format!("Failed to write snapshot {}", self.state_path.display()))?;
        self.seeded = false;
        Ok(())
    }

    /// Build the view filter from command-line arguments
    pub fn filter<'a>(&self, view: &'a ViewArgs) -> CategoryFilter<'a> {
        let timeline = if view.all_time {
            None
        } else {
            Some(view.timeline.unwrap_or(self.config.default_timeline))
        };

        CategoryFilter::new(self.today)
            .timeline(timeline)
            .ownership(view.ownership)
            .search(view.search.as_deref())
    }
}

fn parse_today(today: Option<&str>) -> Result<Option<NaiveDate>> {
    today
        .map(|s| parse_display_date(s).context("Invalid --today date"))
        .transpose()
}

/// Noon UTC on the pinned day, or the wall clock
fn clock(pinned: Option<NaiveDate>) -> DateTime<Utc> {
    pinned.map(noon_utc).unwrap_or_else(Utc::now)
}

pub fn cmd_init(
    state_path: &Path,
    config_path: Option<&Path>,
    today: Option<&str>,
    force: bool,
) -> Result<()> {
    if state_path.exists() && !force {
        bail!(
            "Snapshot already exists at {} (use --force to overwrite)",
            state_path.display()
        );
    }
    let now = clock(parse_today(today)?);

    println!("🔧 Initializing household at {}...", state_path.display());

    let config = EnvisConfig::load(config_path).context("Failed to load configuration")?;
    let household = seed::household(now, &config.fairness);
    household
        .save(state_path)
        .with_context(|| format!("Failed to write snapshot {}", state_path.display()))?;

    println!(
        "   Seeded {} categories, {} goals, {} accounts",
        household.categories.len(),
        household.goals.goals().len(),
        household.accounts.len()
    );
    println!("✅ Household initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. See the overview: envis dashboard");
    println!("  2. Browse spending: envis categories --all-time");
    println!("  3. Start web API: envis serve");

    Ok(())
}

/// Format pounds with thousands separators ("£12,500.00")
pub fn format_money(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let pence = (amount.abs() * 100.0).round() as u64;
    let pounds = (pence / 100).to_string();

    let mut grouped = String::new();
    for (i, ch) in pounds.chars().enumerate() {
        if i > 0 && (pounds.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}£{}.{:02}", sign, grouped, pence % 100)
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
