//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `accounts` - Account commands (list, refresh, remove, statement uploads)
//! - `categories` - Category commands (list, add, move, insight, annotate)
//! - `coach` - Coach replies and pathway checklist
//! - `core` - Session loading, init and shared formatting helpers
//! - `dashboard` - Dashboard overview
//! - `export` - CSV export of the filtered view
//! - `fairness` - Fairness calculator
//! - `family` - Family member and invitation commands
//! - `feed` - Smart insights feed and notifications
//! - `goals` - Savings goal commands
//! - `serve` - Web server command

pub mod accounts;
pub mod categories;
pub mod coach;
pub mod core;
pub mod dashboard;
pub mod export;
pub mod fairness;
pub mod family;
pub mod feed;
pub mod goals;
pub mod serve;

// Re-export command functions for main.rs
pub use accounts::*;
pub use categories::*;
pub use coach::*;
pub use core::*;
pub use dashboard::*;
pub use export::*;
pub use fairness::*;
pub use family::*;
pub use feed::*;
pub use goals::*;
pub use serve::*;
