//! Live `GroupDirectory` adapter over the Admin SDK Directory API.
//!
//! The idempotent HTTP statuses map onto outcome variants: 409 on insert
//! means the user is already a member, 404 on delete means they were not
//! one. Member listings follow `nextPageToken` until exhausted.

use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::ports::table::PortFuture;
use crate::ports::{AddOutcome, BoxError, GroupDirectory, Member, RemoveOutcome};

const DIRECTORY_API_URL: &str = "https://admin.googleapis.com/admin/directory/v1/groups";

/// Admin SDK Directory client for group membership.
pub struct DirectoryClient {
    http: Client,
    token: String,
}

/// Body of a member insert.
#[derive(Serialize)]
struct InsertBody<'a> {
    email: &'a str,
    role: &'a str,
}

/// One page of a member listing.
#[derive(Deserialize)]
struct MembersPage {
    #[serde(default)]
    members: Vec<Member>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

impl DirectoryClient {
    /// Creates a client using an already-fetched bearer token.
    #[must_use]
    pub fn new(http: Client, token: String) -> Self {
        Self { http, token }
    }
}

/// URL of a group's member collection, with the group email
/// percent-encoded as a path segment.
fn members_url(group: &str) -> Result<Url, BoxError> {
    let mut url = Url::parse(DIRECTORY_API_URL)
        .map_err(|e| format!("Invalid directory endpoint: {e}"))?;
    url.path_segments_mut()
        .map_err(|()| "Directory endpoint cannot be a base URL".to_string())?
        .push(group)
        .push("members");
    Ok(url)
}

/// URL of one member within a group, both identifiers percent-encoded.
fn member_url(group: &str, user: &str) -> Result<Url, BoxError> {
    let mut url = members_url(group)?;
    url.path_segments_mut()
        .map_err(|()| "Directory endpoint cannot be a base URL".to_string())?
        .push(user);
    Ok(url)
}

impl GroupDirectory for DirectoryClient {
    fn add_member(&self, group: &str, user: &str) -> PortFuture<'_, AddOutcome> {
        let group = group.to_string();
        let user = user.to_string();
        Box::pin(async move {
            let url = members_url(&group)?;
            let response = self
                .http
                .post(url)
                .bearer_auth(&self.token)
                .json(&InsertBody { email: &user, role: "MEMBER" })
                .send()
                .await
                .map_err(|e| format!("Member insert request failed for {group}: {e}"))?;

            match response.status() {
                status if status.is_success() => Ok(AddOutcome::Added),
                StatusCode::CONFLICT => Ok(AddOutcome::AlreadyMember),
                StatusCode::NOT_FOUND => Ok(AddOutcome::GroupNotFound),
                status => {
                    let body = response.text().await.unwrap_or_default();
                    Err(format!(
                        "Failed to add {user} to {group} ({}): {body}",
                        status.as_u16()
                    )
                    .into())
                }
            }
        })
    }

    fn remove_member(&self, group: &str, user: &str) -> PortFuture<'_, RemoveOutcome> {
        let group = group.to_string();
        let user = user.to_string();
        Box::pin(async move {
            let url = member_url(&group, &user)?;
            let response = self
                .http
                .delete(url)
                .bearer_auth(&self.token)
                .send()
                .await
                .map_err(|e| format!("Member delete request failed for {group}: {e}"))?;

            match response.status() {
                status if status.is_success() => Ok(RemoveOutcome::Removed),
                StatusCode::NOT_FOUND => Ok(RemoveOutcome::NotMember),
                status => {
                    let body = response.text().await.unwrap_or_default();
                    Err(format!(
                        "Failed to remove {user} from {group} ({}): {body}",
                        status.as_u16()
                    )
                    .into())
                }
            }
        })
    }

    fn list_members(&self, group: &str) -> PortFuture<'_, Vec<Member>> {
        let group = group.to_string();
        Box::pin(async move {
            let base_url = members_url(&group)?;
            let mut members = Vec::new();
            let mut page_token: Option<String> = None;

            loop {
                let mut request = self.http.get(base_url.clone()).bearer_auth(&self.token);
                if let Some(token) = &page_token {
                    request = request.query(&[("pageToken", token)]);
                }
                let response = request
                    .send()
                    .await
                    .map_err(|e| format!("Member list request failed for {group}: {e}"))?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(format!(
                        "Failed to list members of {group} ({}): {body}",
                        status.as_u16()
                    )
                    .into());
                }

                let page: MembersPage = response
                    .json()
                    .await
                    .map_err(|e| format!("Failed to parse member list for {group}: {e}"))?;
                members.extend(page.members);

                match page.next_page_token {
                    Some(token) if !token.is_empty() => page_token = Some(token),
                    _ => break,
                }
            }

            Ok(members)
        })
    }
}
