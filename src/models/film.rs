use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{FilmId, Mpa, MpaId, UserId};

/// Rating reference inside a film payload; only the id is significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MpaRef {
    pub id: MpaId,
}

/// Incoming film payload for create and full-replace update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmRequest {
    #[serde(default)]
    pub id: Option<FilmId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub mpa: Option<MpaRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFilm {
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub mpa_id: MpaId,
}

/// Stored film with its rating resolved and its likes read from the like edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    pub id: FilmId,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub mpa: Mpa,
    #[serde(serialize_with = "super::serialize_sorted")]
    likes: HashSet<UserId>,
}

impl Film {
    pub fn from_record(id: FilmId, record: ValidFilm, mpa: Mpa, likes: HashSet<UserId>) -> Self {
        Self {
            id,
            name: record.name,
            description: record.description,
            release_date: record.release_date,
            duration: record.duration,
            mpa,
            likes,
        }
    }

    pub fn likes(&self) -> &HashSet<UserId> {
        &self.likes
    }

    pub fn likes_count(&self) -> usize {
        self.likes.len()
    }

    pub fn is_liked_by(&self, user_id: UserId) -> bool {
        self.likes.contains(&user_id)
    }
}
