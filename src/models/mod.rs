// Filmorate entity model - users, films, MPA ratings and the edges between them

pub mod edge;
pub mod film;
pub mod mpa;
pub mod user;

pub use edge::{Adjacency, Friendship, Like};
pub use film::{Film, FilmRequest, MpaRef, ValidFilm};
pub use mpa::Mpa;
pub use user::{User, UserRequest, ValidUser};

pub type UserId = i64;
pub type FilmId = i64;
pub type MpaId = i64;

/// Serializes a hash set as an ascending JSON array so responses are stable.
pub(crate) fn serialize_sorted<S>(
    ids: &std::collections::HashSet<i64>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let mut sorted: Vec<&i64> = ids.iter().collect();
    sorted.sort_unstable();
    serde::Serialize::serialize(&sorted, serializer)
}
