//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod accounts;
pub mod categories;
pub mod coach;
pub mod dashboard;
pub mod export;
pub mod fairness;
pub mod family;
pub mod feed;
pub mod goals;
pub mod notifications;

// Re-export all handlers for use in router
pub use accounts::*;
pub use categories::*;
pub use coach::*;
pub use dashboard::*;
pub use export::*;
pub use fairness::*;
pub use family::*;
pub use feed::*;
pub use goals::*;
pub use notifications::*;
