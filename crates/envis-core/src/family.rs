//! Family members and invitations

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{FamilyInvite, FamilyMember, InviteStatus, MemberRole};

/// Days an invitation stays open
pub const INVITE_VALID_DAYS: u64 = 7;

/// Members plus outstanding invitations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub members: Vec<FamilyMember>,
    pub invites: Vec<FamilyInvite>,
}

impl Family {
    pub fn new(members: Vec<FamilyMember>, invites: Vec<FamilyInvite>) -> Self {
        Self { members, invites }
    }

    pub fn pending_invites(&self) -> impl Iterator<Item = &FamilyInvite> {
        self.invites
            .iter()
            .filter(|i| i.status == InviteStatus::Pending)
    }

    fn next_invite_id(&self) -> String {
        let max = self
            .invites
            .iter()
            .filter_map(|i| i.id.strip_prefix("inv-"))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        format!("inv-{}", max + 1)
    }

    /// Invite someone by e-mail
    ///
    /// The newest invitation is listed first.
    pub fn invite(&self, email: &str, today: NaiveDate) -> Result<(Self, FamilyInvite)> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(Error::InvalidData(format!(
                "Please enter a valid email address: {}",
                email
            )));
        }

        let lower = email.to_lowercase();
        if self.members.iter().any(|m| m.email.to_lowercase() == lower) {
            return Err(Error::AlreadyMember(email.to_string()));
        }
        if self.pending_invites().any(|i| i.email.to_lowercase() == lower) {
            return Err(Error::AlreadyInvited(email.to_string()));
        }

        let invite = FamilyInvite {
            id: self.next_invite_id(),
            email: email.to_string(),
            invited_on: today,
            expires_on: today
                .checked_add_days(Days::new(INVITE_VALID_DAYS))
                .unwrap_or(today),
            status: InviteStatus::Pending,
        };

        let mut family = self.clone();
        family.invites.insert(0, invite.clone());
        tracing::info!(invite = %invite.id, email = %invite.email, "Sent family invite");
        Ok((family, invite))
    }

    pub fn cancel_invite(&self, id: &str) -> Result<(Self, FamilyInvite)> {
        let invite = self
            .invites
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Invite {}", id)))?;

        let mut family = self.clone();
        family.invites.retain(|i| i.id != id);
        tracing::info!(invite = %id, "Cancelled family invite");
        Ok((family, invite))
    }

    /// Remove a member; admins cannot be removed
    pub fn remove_member(&self, id: &str) -> Result<(Self, FamilyMember)> {
        let member = self
            .members
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Member {}", id)))?;

        if member.role == MemberRole::Admin {
            return Err(Error::InvalidData(format!(
                "{} is an admin and cannot be removed",
                member.full_name()
            )));
        }

        let mut family = self.clone();
        family.members.retain(|m| m.id != id);
        tracing::info!(member = %id, "Removed family member");
        Ok((family, member))
    }

    /// Mark pending invitations past their expiry date as expired
    pub fn expire_invites(&self, today: NaiveDate) -> Self {
        let mut family = self.clone();
        for invite in &mut family.invites {
            if invite.status == InviteStatus::Pending && invite.expires_on < today {
                invite.status = InviteStatus::Expired;
            }
        }
        family
    }
}
