//! Scripted coach replies and the pathway checklist
//!
//! The coach is a finite lookup table: a reply is chosen by `(goal id, topic)`
//! and falls back to the topic's default when the goal has no specific line.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::PathwayStep;

/// Conversation topics the coach can answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    Progress,
    EatingOut,
    Groceries,
    SavingsTip,
    Fairness,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Progress => "progress",
            Self::EatingOut => "eating-out",
            Self::Groceries => "groceries",
            Self::SavingsTip => "savings-tip",
            Self::Fairness => "fairness",
        }
    }

    pub fn all() -> &'static [Topic] {
        &[
            Self::Progress,
            Self::EatingOut,
            Self::Groceries,
            Self::SavingsTip,
            Self::Fairness,
        ]
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Topic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| Error::InvalidData(format!("Unknown coach topic: {}", s)))
    }
}

/// A reply returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachReply {
    pub goal_id: String,
    pub topic: Topic,
    pub message: String,
    /// True when no goal-specific line existed
    pub is_default: bool,
}

/// Lookup table of canned replies
#[derive(Debug, Clone, Default)]
pub struct CoachScript {
    replies: HashMap<(String, Topic), String>,
    defaults: HashMap<Topic, String>,
}

impl CoachScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a goal-specific reply
    pub fn with_reply(mut self, goal_id: impl Into<String>, topic: Topic, message: impl Into<String>) -> Self {
        self.replies.insert((goal_id.into(), topic), message.into());
        self
    }

    /// Register the fallback reply for a topic
    pub fn with_default(mut self, topic: Topic, message: impl Into<String>) -> Self {
        self.defaults.insert(topic, message.into());
        self
    }

    /// Look up the reply for a goal and topic
    pub fn reply(&self, goal_id: &str, topic: Topic) -> Result<CoachReply> {
        if let Some(message) = self.replies.get(&(goal_id.to_string(), topic)) {
            return Ok(CoachReply {
                goal_id: goal_id.to_string(),
                topic,
                message: message.clone(),
                is_default: false,
            });
        }

        self.defaults
            .get(&topic)
            .map(|message| CoachReply {
                goal_id: goal_id.to_string(),
                topic,
                message: message.clone(),
                is_default: true,
            })
            .ok_or_else(|| Error::NotFound(format!("No coach reply for topic {}", topic)))
    }
}

/// Flip the completed flag of one pathway step
pub fn toggle_step(steps: &[PathwayStep], step_id: &str) -> Result<Vec<PathwayStep>> {
    if !steps.iter().any(|s| s.id == step_id) {
        return Err(Error::NotFound(format!("Pathway step {}", step_id)));
    }

    Ok(steps
        .iter()
        .map(|s| {
            let mut s = s.clone();
            if s.id == step_id {
                s.completed = !s.completed;
            }
            s
        })
        .collect())
}

/// Completed steps out of total
pub fn pathway_progress(steps: &[PathwayStep]) -> (usize, usize) {
    let done = steps.iter().filter(|s| s.completed).count();
    (done, steps.len())
}
