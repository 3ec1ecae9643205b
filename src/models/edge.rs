// Edge relations - directed friendships and film likes stored as two-column rows

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::{FilmId, UserId};

/// `from` considers `to` a friend. The reverse edge is independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Friendship {
    pub from: UserId,
    pub to: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Like {
    pub film_id: FilmId,
    pub user_id: UserId,
}

impl From<Friendship> for (UserId, UserId) {
    fn from(edge: Friendship) -> Self {
        (edge.from, edge.to)
    }
}

impl From<Like> for (FilmId, UserId) {
    fn from(edge: Like) -> Self {
        (edge.film_id, edge.user_id)
    }
}

/// Read-side adjacency map built from a batch of edge rows.
#[derive(Debug, Clone)]
pub struct Adjacency<K, V> {
    neighbours: HashMap<K, HashSet<V>>,
}

impl<K, V> Adjacency<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash + Clone,
{
    pub fn from_edges<I, E>(edges: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<(K, V)>,
    {
        let mut neighbours: HashMap<K, HashSet<V>> = HashMap::new();
        for edge in edges {
            let (source, target) = edge.into();
            neighbours.entry(source).or_default().insert(target);
        }
        Self { neighbours }
    }

    /// Targets reachable from `source`; empty when it has no outgoing edges.
    pub fn neighbours(&self, source: &K) -> HashSet<V> {
        self.neighbours.get(source).cloned().unwrap_or_default()
    }

    /// Removes and returns the target set of `source`.
    pub fn take(&mut self, source: &K) -> HashSet<V> {
        self.neighbours.remove(source).unwrap_or_default()
    }

    pub fn edge_count(&self) -> usize {
        self.neighbours.values().map(HashSet::len).sum()
    }
}
