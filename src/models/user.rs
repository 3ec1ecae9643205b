use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::UserId;

/// Incoming user payload for create and full-replace update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
}

/// A user record that passed validation, with the display name resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidUser {
    pub email: String,
    pub login: String,
    pub name: String,
    pub birthday: NaiveDate,
}

/// Stored user as returned by the storage layer. The friend set is a
/// snapshot of the friendship edges at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub login: String,
    pub name: String,
    pub birthday: NaiveDate,
    #[serde(serialize_with = "super::serialize_sorted")]
    friends: HashSet<UserId>,
}

impl User {
    pub fn from_record(id: UserId, record: ValidUser, friends: HashSet<UserId>) -> Self {
        Self {
            id,
            email: record.email,
            login: record.login,
            name: record.name,
            birthday: record.birthday,
            friends,
        }
    }

    pub fn friends(&self) -> &HashSet<UserId> {
        &self.friends
    }

    pub fn is_friend(&self, other: UserId) -> bool {
        self.friends.contains(&other)
    }

    pub fn friends_count(&self) -> usize {
        self.friends.len()
    }
}
