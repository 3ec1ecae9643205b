// FriendshipService - directed friend edges and mutual-friend queries
// Sits above UserStorage; friend sets are always read back from the edge table

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{User, UserId},
    storage::UserStorage,
};

#[derive(Clone)]
pub struct FriendshipService {
    users: Arc<dyn UserStorage>,
}

impl FriendshipService {
    pub fn new(users: Arc<dyn UserStorage>) -> Self {
        Self { users }
    }

    /// Adds `friend_id` to the friend set of `user_id`. Already-present edges
    /// are left alone; no reverse edge is created.
    pub async fn add_friend(&self, user_id: UserId, friend_id: UserId) -> AppResult<User> {
        let user = self.users.get_user(user_id).await?;
        if user_id == friend_id {
            return Err(AppError::Validation(format!(
                "User {} can't befriend themselves",
                user_id
            )));
        }
        self.users.get_user(friend_id).await?;

        if user.is_friend(friend_id) {
            tracing::warn!("User {} is in the friend list of user {} already", friend_id, user_id);
            return Ok(user);
        }

        self.users.add_friend(user_id, friend_id).await?;
        tracing::info!("user {} added user {} as a friend", user_id, friend_id);
        self.users.get_user(user_id).await
    }

    /// Removes only the forward edge `user_id -> friend_id`.
    pub async fn delete_friend(&self, user_id: UserId, friend_id: UserId) -> AppResult<User> {
        let user = self.users.get_user(user_id).await?;
        if !user.is_friend(friend_id) {
            return Err(AppError::NotFound(format!(
                "User {} is not in the friend list of user {}",
                friend_id, user_id
            )));
        }

        if !self.users.remove_friend(user_id, friend_id).await? {
            return Err(AppError::NotFound(format!(
                "User {} is not in the friend list of user {}",
                friend_id, user_id
            )));
        }
        tracing::info!("user {} removed user {} from friends", user_id, friend_id);
        self.users.get_user(user_id).await
    }

    pub async fn friends(&self, user_id: UserId) -> AppResult<Vec<User>> {
        let user = self.users.get_user(user_id).await?;
        self.load_users(user.friends()).await
    }

    pub async fn mutual_friends(&self, user_id: UserId, other_id: UserId) -> AppResult<HashSet<UserId>> {
        let user = self.users.get_user(user_id).await?;
        let other = self.users.get_user(other_id).await?;
        Ok(intersect(user.friends(), other.friends()))
    }

    pub async fn common_friends(&self, user_id: UserId, other_id: UserId) -> AppResult<Vec<User>> {
        let ids = self.mutual_friends(user_id, other_id).await?;
        self.load_users(&ids).await
    }

    async fn load_users(&self, ids: &HashSet<UserId>) -> AppResult<Vec<User>> {
        let mut ids: Vec<UserId> = ids.iter().copied().collect();
        ids.sort_unstable();

        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            users.push(self.users.get_user(id).await?);
        }
        Ok(users)
    }
}

/// Walks the smaller set and probes the larger one.
pub fn intersect<T>(a: &HashSet<T>, b: &HashSet<T>) -> HashSet<T>
where
    T: Eq + Hash + Copy,
{
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().filter(|id| large.contains(id)).copied().collect()
}
