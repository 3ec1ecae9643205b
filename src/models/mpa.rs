use serde::{Deserialize, Serialize};

use super::MpaId;

/// Motion Picture Association rating, a fixed reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mpa {
    pub id: MpaId,
    pub name: String,
}

impl Mpa {
    /// Rows seeded into the reference table, in id order.
    pub const CATALOGUE: [(MpaId, &'static str); 5] =
        [(1, "G"), (2, "PG"), (3, "PG-13"), (4, "R"), (5, "NC-17")];

    pub fn new(id: MpaId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn catalogue() -> Vec<Mpa> {
        Self::CATALOGUE
            .iter()
            .map(|(id, name)| Mpa::new(*id, *name))
            .collect()
    }

    pub fn lookup(id: MpaId) -> Option<Mpa> {
        Self::CATALOGUE
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(id, name)| Mpa::new(*id, *name))
    }
}
