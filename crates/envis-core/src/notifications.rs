//! In-app notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which part of the app raised a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Goal,
    Insight,
    Account,
    Family,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Goal => "goal",
            Self::Insight => "insight",
            Self::Account => "account",
            Self::Family => "family",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

/// Notifications, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Notifications {
    items: Vec<Notification>,
}

impl Notifications {
    pub fn new(items: Vec<Notification>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    fn next_id(&self) -> String {
        let max = self
            .items
            .iter()
            .filter_map(|n| n.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }

    /// Add an unread notification at the top
    pub fn push(
        &self,
        kind: NotificationKind,
        title: &str,
        message: &str,
        now: DateTime<Utc>,
    ) -> (Self, Notification) {
        let notification = Notification {
            id: self.next_id(),
            kind,
            title: title.to_string(),
            message: message.to_string(),
            created_at: now,
            read: false,
        };

        let mut list = self.clone();
        list.items.insert(0, notification.clone());
        (list, notification)
    }

    pub fn mark_read(&self, id: &str) -> Result<Self> {
        let mut list = self.clone();
        let notification = list
            .items
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Error::NotFound(format!("Notification {}", id)))?;
        notification.read = true;
        Ok(list)
    }

    pub fn mark_all_read(&self) -> Self {
        let mut list = self.clone();
        for notification in &mut list.items {
            notification.read = true;
        }
        list
    }

    pub fn remove(&self, id: &str) -> Result<(Self, Notification)> {
        let notification = self
            .items
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Notification {}", id)))?;

        let mut list = self.clone();
        list.items.retain(|n| n.id != id);
        Ok((list, notification))
    }
}
