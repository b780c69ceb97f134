use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::path::Path;
use crate::value::Value;

/// Every value a general has been told, keyed by the path it travelled.
///
/// A path can only ever be carried by one message, so entries are write-once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageLog {
    entries: BTreeMap<Path, Value>,
}

impl MessageLog {
    /// Records a delivered value. Returns `false` and leaves the log untouched
    /// if `path` already has an entry.
    pub fn record(&mut self, path: Path, value: Value) -> bool {
        if self.entries.contains_key(&path) {
            false
        } else {
            self.entries.insert(path, value);
            true
        }
    }

    pub fn get(&self, path: &Path) -> Option<Value> {
        self.entries.get(path).copied()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, Value)> {
        self.entries.iter().map(|(path, value)| (path, *value))
    }

    /// The entries that arrived in round `round`.
    pub fn received_in_round(&self, round: usize) -> impl Iterator<Item = (&Path, Value)> {
        self.iter().filter(move |(path, _)| path.len() == round)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_write_once() {
        let mut log = MessageLog::default();
        let path = Path::root(0);

        assert!(log.record(path.clone(), Value::Attack));
        assert!(!log.record(path.clone(), Value::Retreat));

        assert_eq!(log.get(&path), Some(Value::Attack));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_received_in_round_filters_by_path_length() {
        let mut log = MessageLog::default();
        log.record(Path::root(0), Value::Attack);
        log.record(Path::root(0).child(2), Value::Retreat);
        log.record(Path::root(0).child(3), Value::Attack);

        let round_two: Vec<_> = log
            .received_in_round(2)
            .map(|(path, value)| (path.clone(), value))
            .collect();
        assert_eq!(
            round_two,
            vec![
                (Path::root(0).child(2), Value::Retreat),
                (Path::root(0).child(3), Value::Attack),
            ]
        );

        log.clear();
        assert!(log.is_empty());
    }
}
