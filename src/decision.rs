//! Recursive majority resolution over a lieutenant's message log.
//!
//! OM(f) at a path reduces to one OM(f-1) instance per general that could
//! have relayed the path further, bottoming out at OM(0): trust the report.
use log::{debug, warn};

use crate::actor::Id;
use crate::majority::majority;
use crate::message_log::MessageLog;
use crate::path::Path;
use crate::value::Value;

#[derive(Debug)]
pub struct DecisionResolver<'a> {
    owner: Id,
    roster: &'a [Id],
    log: &'a MessageLog,
    missing: usize,
}

impl<'a> DecisionResolver<'a> {
    /// A resolver deciding on behalf of `owner`, reading only `owner`'s log.
    /// `roster` lists every general in ascending id order.
    pub fn new(owner: Id, roster: &'a [Id], log: &'a MessageLog) -> Self {
        Self {
            owner,
            roster,
            log,
            missing: 0,
        }
    }

    pub fn run_decision(&mut self, f: usize, commander: Id) -> Value {
        let decision = self.resolve(&Path::root(commander), f);
        debug!("[DECIDE] {} resolved OM({}) to {}", self.owner, f, decision);
        decision
    }

    pub fn resolve(&mut self, path: &Path, f: usize) -> Value {
        let reported = self.lookup(path);
        if f == 0 {
            return reported;
        }

        let mut candidates = vec![reported];
        for relayer in path.relay_targets(self.roster, self.owner) {
            let child = path.child(relayer);
            if self.log.contains(&child) {
                candidates.push(self.resolve(&child, f - 1));
            }
        }

        majority(candidates)
    }

    /// How many times resolution needed a path the log never received.
    pub fn missing_entries(&self) -> usize {
        self.missing
    }

    fn lookup(&mut self, path: &Path) -> Value {
        match self.log.get(path) {
            Some(value) => value,
            None => {
                warn!(
                    "[DECIDE] {} never received path {}, assuming {}",
                    self.owner,
                    path,
                    Value::DEFAULT
                );
                self.missing += 1;
                Value::DEFAULT
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value::{Attack, Retreat};

    fn log_of(entries: Vec<(Vec<Id>, Value)>) -> MessageLog {
        let mut log = MessageLog::default();
        for (ids, value) in entries {
            assert!(log.record(Path::from_ids(ids).unwrap(), value));
        }
        log
    }

    #[test]
    fn test_om0_trusts_the_direct_report() {
        let roster: Vec<Id> = (0..4).collect();
        let log = log_of(vec![(vec![0], Attack)]);
        let mut resolver = DecisionResolver::new(1, &roster, &log);

        assert_eq!(resolver.run_decision(0, 0), Attack);
        assert_eq!(resolver.missing_entries(), 0);
    }

    #[test]
    fn test_om1_outvotes_a_single_liar() {
        // Lieutenant 3's view when lieutenant 1 lies about the commander's order.
        let roster: Vec<Id> = (0..4).collect();
        let log = log_of(vec![
            (vec![0], Attack),
            (vec![0, 1], Retreat),
            (vec![0, 2], Attack),
        ]);
        let mut resolver = DecisionResolver::new(3, &roster, &log);

        assert_eq!(resolver.run_decision(1, 0), Attack);
        assert_eq!(resolver.missing_entries(), 0);
    }

    #[test]
    fn test_om1_split_view_falls_back_to_default() {
        let roster: Vec<Id> = (0..3).collect();
        let log = log_of(vec![(vec![0], Attack), (vec![0, 2], Retreat)]);
        let mut resolver = DecisionResolver::new(1, &roster, &log);

        assert_eq!(resolver.run_decision(1, 0), Retreat);
    }

    #[test]
    fn test_missing_root_is_counted_and_defaulted() {
        let roster: Vec<Id> = (0..4).collect();
        let log = MessageLog::default();
        let mut resolver = DecisionResolver::new(2, &roster, &log);

        assert_eq!(resolver.run_decision(1, 0), Value::DEFAULT);
        assert_eq!(resolver.missing_entries(), 1);
    }

    #[test]
    fn test_om2_recurses_into_sub_instances() {
        // n = 7, lieutenant 1's view: the commander said Attack, and every
        // relay agrees except those passing through general 6.
        let roster: Vec<Id> = (0..7).collect();
        let mut entries = vec![(vec![0], Attack)];
        for j in 2..7 {
            let value = if j == 6 { Retreat } else { Attack };
            entries.push((vec![0, j], value));
            for k in 2..7 {
                if k != j {
                    let value = if k == 6 { Retreat } else { Attack };
                    entries.push((vec![0, j, k], value));
                }
            }
        }
        let log = log_of(entries);
        let mut resolver = DecisionResolver::new(1, &roster, &log);

        assert_eq!(resolver.run_decision(2, 0), Attack);
        assert_eq!(resolver.missing_entries(), 0);
    }
}
