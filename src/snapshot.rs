use serde::{Deserialize, Serialize};

use crate::actor::Id;
use crate::message_log::MessageLog;
use crate::simulation::Phase;
use crate::value::Value;

/// Read-only picture of a simulation, enough to render it without knowing
/// anything about the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationView {
    pub phase: Phase,
    pub round: usize,
    pub f: Option<usize>,
    pub sender: Option<Id>,
    pub sender_value: Option<Value>,
    pub participants: Vec<ParticipantView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantView {
    pub id: Id,
    pub is_sender: bool,
    pub is_faulty: bool,
    pub log: MessageLog,
    pub final_decision: Option<Value>,
}

impl SimulationView {
    /// Canonical encoding, two runs match iff their encodings match.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    pub fn faulty_count(&self) -> usize {
        self.participants.iter().filter(|p| p.is_faulty).count()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::SimConfig;
    use crate::simulation::Simulation;

    #[test]
    fn test_view_reflects_finished_run() {
        let mut sim = Simulation::configure(
            SimConfig::new(4, 1, 0, Value::Attack).with_faulty(vec![1]),
        )
        .unwrap();
        sim.run_to_completion().unwrap();

        let view = sim.snapshot();
        assert_eq!(view.phase, Phase::Finished);
        assert_eq!(view.round, 2);
        assert_eq!(view.f, Some(1));
        assert_eq!(view.sender, Some(0));
        assert_eq!(view.faulty_count(), 1);

        let faulty = &view.participants[1];
        assert!(faulty.is_faulty);
        assert_eq!(faulty.final_decision, None);
        assert_eq!(faulty.log.len(), 3);

        let decoded = SimulationView::from_bytes(&view.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, view);
    }

    #[test]
    fn test_decoding_rejects_empty_log_paths() {
        #[derive(Serialize)]
        struct RawParticipant {
            id: Id,
            is_sender: bool,
            is_faulty: bool,
            log: BTreeMap<Vec<Id>, Value>,
            final_decision: Option<Value>,
        }

        #[derive(Serialize)]
        struct RawView {
            phase: Phase,
            round: usize,
            f: Option<usize>,
            sender: Option<Id>,
            sender_value: Option<Value>,
            participants: Vec<RawParticipant>,
        }

        let raw = |path: Vec<Id>| {
            let mut log = BTreeMap::new();
            log.insert(path, Value::Attack);
            let view = RawView {
                phase: Phase::Running,
                round: 1,
                f: Some(1),
                sender: Some(0),
                sender_value: Some(Value::Attack),
                participants: vec![RawParticipant {
                    id: 1,
                    is_sender: false,
                    is_faulty: false,
                    log,
                    final_decision: None,
                }],
            };
            bincode::serialize(&view).unwrap()
        };

        let view = SimulationView::from_bytes(&raw(vec![0])).unwrap();
        assert_eq!(view.participants[0].log.len(), 1);

        assert!(SimulationView::from_bytes(&raw(vec![])).is_err());
        assert!(SimulationView::from_bytes(&raw(vec![0, 0])).is_err());
    }

    #[test]
    fn test_unconfigured_view_is_empty() {
        let view = Simulation::new(crate::fault::ParityLiar).snapshot();
        assert_eq!(view.phase, Phase::Setup);
        assert_eq!(view.f, None);
        assert!(view.participants.is_empty());
    }

    #[test]
    fn test_different_faults_give_different_bytes() {
        let run = |faulty: Vec<Id>| {
            let mut sim =
                Simulation::configure(SimConfig::new(4, 1, 0, Value::Attack).with_faulty(faulty))
                    .unwrap();
            sim.run_to_completion().unwrap();
            sim.snapshot().to_bytes().unwrap()
        };

        assert_eq!(run(vec![2]), run(vec![2]));
        assert_ne!(run(vec![2]), run(vec![3]));
    }
}
