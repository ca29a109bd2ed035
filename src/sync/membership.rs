//! Plans and applies membership actions for the roster.
//!
//! Idempotent: every action is an unconditional add or remove whose
//! repeat application is a no-op, so re-running the sync on unchanged
//! input converges to the same membership state. Planning is pure;
//! applying drives the directory port one call per (user, group) pair
//! and never lets one pair's failure affect another.

use std::collections::HashSet;
use std::fmt::Write as _;

use tracing::{debug, info, warn};

use crate::ports::{AddOutcome, GroupDirectory, RemoveOutcome};
use crate::roster::Roster;

/// One membership instruction for the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipAction {
    /// Ensure `user` is a member of `group`.
    Add {
        /// The group email.
        group: String,
        /// The user email.
        user: String,
    },
    /// Ensure `user` is not a member of `group`.
    Remove {
        /// The group email.
        group: String,
        /// The user email.
        user: String,
    },
}

/// A removal that was withheld because the user is protected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRemoval {
    /// The group the removal would have targeted.
    pub group: String,
    /// The protected user.
    pub user: String,
}

/// The planned outcome of one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    /// Actions to issue, in roster order then universe order.
    pub actions: Vec<MembershipAction>,
    /// Removals withheld by the protected set.
    pub skipped: Vec<SkippedRemoval>,
}

/// User emails that must never be the target of a removal.
///
/// Comparison is case-insensitive; emails are normalized on insert.
#[derive(Debug, Clone, Default)]
pub struct ProtectedSet {
    emails: HashSet<String>,
}

impl ProtectedSet {
    /// Builds the set from configured email strings.
    #[must_use]
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|email| email.as_ref().trim().to_ascii_lowercase())
            .filter(|email| !email.is_empty())
            .collect();
        Self { emails }
    }

    /// True when `user` must never be removed from a group.
    #[must_use]
    pub fn contains(&self, user: &str) -> bool {
        self.emails.contains(&user.trim().to_ascii_lowercase())
    }
}

/// Plans membership actions for every (user, group) pair.
///
/// Each usable roster row produces exactly one action per group in the
/// universe: an add when the row wants the group, otherwise a remove —
/// withheld (and recorded) when the user is protected.
#[must_use]
pub fn plan_membership(roster: &Roster, protected: &ProtectedSet) -> SyncPlan {
    let mut actions = Vec::new();
    let mut skipped = Vec::new();

    for row in &roster.users {
        for group in &roster.universe {
            if row.wants(group) {
                actions.push(MembershipAction::Add {
                    group: group.clone(),
                    user: row.user.clone(),
                });
            } else if protected.contains(&row.user) {
                skipped.push(SkippedRemoval { group: group.clone(), user: row.user.clone() });
            } else {
                actions.push(MembershipAction::Remove {
                    group: group.clone(),
                    user: row.user.clone(),
                });
            }
        }
    }

    SyncPlan { actions, skipped }
}

/// Tallies of what applying a plan actually did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    /// Users newly added to a group.
    pub added: usize,
    /// Adds that found the user already present.
    pub already_member: usize,
    /// Adds that targeted a group missing from the directory.
    pub group_not_found: usize,
    /// Users actually removed from a group.
    pub removed: usize,
    /// Removes that found the user already absent.
    pub not_member: usize,
    /// Pairs that failed with an unclassified error.
    pub failed: usize,
}

impl ApplyReport {
    /// One-line human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "added {} (already present {}), removed {} (already absent {}), \
             missing groups {}, failures {}",
            self.added,
            self.already_member,
            self.removed,
            self.not_member,
            self.group_not_found,
            self.failed
        )
    }
}

/// Applies planned actions against the directory, one call per pair.
///
/// Expected idempotent outcomes count as success. A missing group on add
/// is a warning. Any other failure is logged and the remaining actions
/// still run; nothing here aborts the run.
pub async fn apply_plan(directory: &dyn GroupDirectory, plan: &SyncPlan) -> ApplyReport {
    let mut report = ApplyReport::default();

    for skip in &plan.skipped {
        info!(user = %skip.user, group = %skip.group, "skipping removal of protected user");
    }

    for action in &plan.actions {
        match action {
            MembershipAction::Add { group, user } => {
                match directory.add_member(group, user).await {
                    Ok(AddOutcome::Added) => {
                        info!(%user, %group, "added member");
                        report.added += 1;
                    }
                    Ok(AddOutcome::AlreadyMember) => {
                        debug!(%user, %group, "already a member");
                        report.already_member += 1;
                    }
                    Ok(AddOutcome::GroupNotFound) => {
                        warn!(%group, "group not found in directory");
                        report.group_not_found += 1;
                    }
                    Err(err) => {
                        warn!(%user, %group, error = %err, "add failed");
                        report.failed += 1;
                    }
                }
            }
            MembershipAction::Remove { group, user } => {
                match directory.remove_member(group, user).await {
                    Ok(RemoveOutcome::Removed) => {
                        info!(%user, %group, "removed member");
                        report.removed += 1;
                    }
                    Ok(RemoveOutcome::NotMember) => {
                        debug!(%user, %group, "not a member");
                        report.not_member += 1;
                    }
                    Err(err) => {
                        warn!(%user, %group, error = %err, "remove failed");
                        report.failed += 1;
                    }
                }
            }
        }
    }

    report
}

/// Formats a plan as a human-readable listing (used by dry runs).
#[must_use]
pub fn format_plan(plan: &SyncPlan) -> String {
    if plan.actions.is_empty() && plan.skipped.is_empty() {
        return "No membership actions to perform.".to_string();
    }

    let mut out = String::new();
    for action in &plan.actions {
        match action {
            MembershipAction::Add { group, user } => {
                let _ = writeln!(out, "  ADD    {user} -> {group}");
            }
            MembershipAction::Remove { group, user } => {
                let _ = writeln!(out, "  REMOVE {user} <- {group}");
            }
        }
    }
    for skip in &plan.skipped {
        let _ = writeln!(out, "  SKIP   {} <- {} (protected)", skip.user, skip.group);
    }
    out.trim_end().to_string()
}
