//! Group directory port for membership operations.

use serde::Deserialize;

use crate::ports::table::PortFuture;

/// Outcome of an add-member call.
///
/// The expected idempotent outcomes are variants, not errors: adding a
/// user who is already a member is a no-op, and a missing group is a
/// per-item condition the caller reports and moves past.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The user was added to the group.
    Added,
    /// The user was already a member; nothing changed.
    AlreadyMember,
    /// The group does not exist in the directory.
    GroupNotFound,
}

/// Outcome of a remove-member call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The user was removed from the group.
    Removed,
    /// The user was not a member (or the group does not exist); nothing
    /// changed.
    NotMember,
}

/// One member of a group as reported by the directory.
///
/// Optional fields default to the empty string so partially-populated
/// member records never fail a row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Member {
    /// The member's email address.
    #[serde(default)]
    pub email: String,
    /// The member's role in the group (e.g. `"MEMBER"`, `"OWNER"`).
    #[serde(default)]
    pub role: String,
    /// The member's type (e.g. `"USER"`, `"GROUP"`).
    #[serde(default, rename = "type")]
    pub member_type: String,
}

/// Manages group membership in an external directory.
///
/// All operations are idempotent; repeating a call converges to the same
/// directory state. Abstracting the directory allows the reconciler and
/// auditor to run against in-memory fakes in tests.
pub trait GroupDirectory: Send + Sync {
    /// Adds `user` to `group` with the default member role.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures outside the enumerated
    /// outcomes (network faults, auth problems, unexpected statuses).
    fn add_member(&self, group: &str, user: &str) -> PortFuture<'_, AddOutcome>;

    /// Removes `user` from `group`.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures outside the enumerated
    /// outcomes.
    fn remove_member(&self, group: &str, user: &str) -> PortFuture<'_, RemoveOutcome>;

    /// Lists the current members of `group`, in directory listing order.
    ///
    /// # Errors
    ///
    /// Returns an error if the group cannot be listed (including when the
    /// group does not exist).
    fn list_members(&self, group: &str) -> PortFuture<'_, Vec<Member>>;
}

#[cfg(test)]
mod tests {
    use super::Member;

    #[test]
    fn member_fields_default_to_empty_strings() {
        let member: Member = serde_json::from_str(r#"{"email": "a@x.org"}"#).unwrap();
        assert_eq!(member.email, "a@x.org");
        assert_eq!(member.role, "");
        assert_eq!(member.member_type, "");
    }

    #[test]
    fn member_type_maps_from_type_key() {
        let member: Member =
            serde_json::from_str(r#"{"email": "a@x.org", "role": "MEMBER", "type": "USER"}"#)
                .unwrap();
        assert_eq!(member.role, "MEMBER");
        assert_eq!(member.member_type, "USER");
    }
}
