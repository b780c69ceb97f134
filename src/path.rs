use std::convert::TryFrom;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actor::Id;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Path {0:?} is empty or passes through a general twice")]
pub struct InvalidPath(pub Vec<Id>);

/// The chain of generals a message passed through, starting with the commander.
///
/// Paths are compared structurally and ordered lexicographically, so a
/// `BTreeMap<Path, _>` iterates parents before their children.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Id>", into = "Vec<Id>")]
pub struct Path(Vec<Id>);

impl Path {
    /// The path carried by the commander's round 1 broadcast.
    pub fn root(commander: Id) -> Self {
        Self(vec![commander])
    }

    /// Builds a path from raw ids, rejecting empty or repeating sequences.
    pub fn from_ids(ids: Vec<Id>) -> Option<Self> {
        Self::try_from(ids).ok()
    }

    pub fn ids(&self) -> &[Id] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The general that last relayed a message along this path.
    pub fn last(&self) -> Id {
        self.0[self.0.len() - 1]
    }

    pub fn contains(&self, id: Id) -> bool {
        self.0.contains(&id)
    }

    /// This path with `relayer` appended.
    pub fn child(&self, relayer: Id) -> Self {
        let mut ids = self.0.clone();
        ids.push(relayer);
        Self(ids)
    }

    /// The generals in `roster` that `holder` may forward this path to.
    ///
    /// Delivery and decision resolution both go through this predicate, so a
    /// resolver only ever asks for paths the round engine actually produced.
    pub fn relay_targets<'a>(
        &'a self,
        roster: &'a [Id],
        holder: Id,
    ) -> impl Iterator<Item = Id> + 'a {
        roster
            .iter()
            .copied()
            .filter(move |id| *id != holder && !self.contains(*id))
    }
}

impl TryFrom<Vec<Id>> for Path {
    type Error = InvalidPath;

    fn try_from(ids: Vec<Id>) -> Result<Self, Self::Error> {
        let no_repeats = ids
            .iter()
            .enumerate()
            .all(|(i, id)| !ids[..i].contains(id));

        if ids.is_empty() || !no_repeats {
            Err(InvalidPath(ids))
        } else {
            Ok(Self(ids))
        }
    }
}

impl From<Path> for Vec<Id> {
    fn from(path: Path) -> Self {
        path.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join("-");
        write!(f, "{}", joined)
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self, f)
    }
}
