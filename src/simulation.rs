use std::fmt;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actor::{Id, Participant};
use crate::config::{ConfigError, SimConfig};
use crate::decision::DecisionResolver;
use crate::fault::{FaultInjector, ParityLiar};
use crate::path::Path;
use crate::snapshot::{ParticipantView, SimulationView};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing configured yet.
    Setup,
    /// Generals laid out, faulty flags may still change.
    Ready,
    Running,
    Finished,
    /// The last configuration was rejected.
    Error,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Setup => "setup",
            Phase::Ready => "ready",
            Phase::Running => "running",
            Phase::Finished => "finished",
            Phase::Error => "error",
        };
        write!(f, "{}", name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToggleError {
    #[error("Faulty generals can only be chosen before the first round (phase: {0})")]
    WrongPhase(Phase),
    #[error("The sender can not be made faulty")]
    SenderImmune,
    #[error("Already at the limit of {f} faulty generals")]
    FaultyQuotaExceeded { f: usize },
    #[error("No general with id {0}")]
    UnknownParticipant(Id),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhaseError {
    #[error("The simulation has already finished")]
    Finished,
    #[error("The simulation is not configured (phase: {0})")]
    NotConfigured(Phase),
}

/// A single value in flight between two generals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Id,
    pub recipient: Id,
    pub value: Value,
    pub path: Path,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: usize,
    pub messages: Vec<Message>,
    pub phase: Phase,
}

/// Drives OM(f) round by round over an in-memory set of generals.
#[derive(Debug, Clone)]
pub struct Simulation<F: FaultInjector = ParityLiar> {
    config: Option<SimConfig>,
    participants: Vec<Participant>,
    phase: Phase,
    round: usize,
    fault: F,
}

impl Simulation<ParityLiar> {
    /// Lays out a simulation using the parity liar for faulty generals.
    pub fn configure(config: SimConfig) -> Result<Self, ConfigError> {
        Self::configure_with(config, ParityLiar)
    }
}

impl<F: FaultInjector> Simulation<F> {
    /// An empty simulation in the `Setup` phase.
    pub fn new(fault: F) -> Self {
        Self {
            config: None,
            participants: Vec::new(),
            phase: Phase::Setup,
            round: 0,
            fault,
        }
    }

    pub fn configure_with(config: SimConfig, fault: F) -> Result<Self, ConfigError> {
        let mut sim = Self::new(fault);
        sim.reset(config)?;
        Ok(sim)
    }

    /// Discards all state and lays out the generals described by `config`.
    ///
    /// An invalid config leaves the simulation in the `Error` phase with no
    /// generals until a valid one is supplied.
    pub fn reset(&mut self, config: SimConfig) -> Result<(), ConfigError> {
        self.participants.clear();
        self.round = 0;

        if let Err(err) = config.validate() {
            warn!("[SETUP] rejected configuration: {}", err);
            self.config = None;
            self.phase = Phase::Error;
            return Err(err);
        }

        self.participants = (0..config.n)
            .map(|id| {
                let mut p = Participant::new(id, id == config.sender);
                p.is_faulty = config.faulty.contains(&id);
                p
            })
            .collect();

        info!(
            "[SETUP] n={} f={} sender={} value={} faulty={:?}",
            config.n, config.f, config.sender, config.sender_value, config.faulty
        );
        self.config = Some(config);
        self.phase = Phase::Ready;
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn config(&self) -> Option<&SimConfig> {
        self.config.as_ref()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, id: Id) -> Option<&Participant> {
        self.participants.get(id)
    }

    /// Flips whether a lieutenant is faulty. Only allowed before the first round.
    pub fn toggle_faulty(&mut self, id: Id) -> Result<(), ToggleError> {
        let config = match (self.phase, self.config.as_mut()) {
            (Phase::Ready, Some(config)) => config,
            (phase, _) => return Err(ToggleError::WrongPhase(phase)),
        };

        let participant = self
            .participants
            .get_mut(id)
            .ok_or(ToggleError::UnknownParticipant(id))?;

        if participant.is_sender {
            return Err(ToggleError::SenderImmune);
        }

        if participant.is_faulty {
            participant.is_faulty = false;
            config.faulty.remove(&id);
        } else if config.faulty.len() < config.f {
            participant.is_faulty = true;
            config.faulty.insert(id);
        } else {
            return Err(ToggleError::FaultyQuotaExceeded { f: config.f });
        }

        info!(
            "[SETUP] general {} is now {}",
            id,
            if participant.is_faulty { "faulty" } else { "honest" }
        );
        Ok(())
    }

    /// Runs the next round of message passing, deciding after round `f + 1`.
    pub fn advance_round(&mut self) -> Result<RoundReport, PhaseError> {
        let config = match (self.phase, &self.config) {
            (Phase::Ready, Some(config)) | (Phase::Running, Some(config)) => config.clone(),
            (Phase::Finished, _) => return Err(PhaseError::Finished),
            (phase, _) => return Err(PhaseError::NotConfigured(phase)),
        };

        self.phase = Phase::Running;
        self.round += 1;

        let messages = if self.round == 1 {
            self.broadcast(&config)
        } else {
            self.relay()
        };
        info!(
            "[ROUND] round {}/{} delivering {} messages",
            self.round,
            config.rounds(),
            messages.len()
        );
        self.deliver(&messages);

        if self.round == config.rounds() {
            self.decide(&config);
            self.phase = Phase::Finished;
        }

        Ok(RoundReport {
            round: self.round,
            messages,
            phase: self.phase,
        })
    }

    /// Convenience function to advance until every honest general has decided.
    pub fn run_to_completion(&mut self) -> Result<Vec<RoundReport>, PhaseError> {
        let mut reports = vec![self.advance_round()?];
        while self.phase != Phase::Finished {
            reports.push(self.advance_round()?);
        }
        Ok(reports)
    }

    /// Final decisions of the honest generals, in id order.
    pub fn decisions(&self) -> Vec<(Id, Value)> {
        self.participants
            .iter()
            .filter(|p| p.is_honest())
            .filter_map(|p| p.final_decision.map(|d| (p.id, d)))
            .collect()
    }

    /// Checks if every honest general has decided on the same value.
    pub fn honest_generals_agree(&self) -> bool {
        let mut decisions = self
            .participants
            .iter()
            .filter(|p| p.is_honest())
            .map(|p| p.final_decision);

        if let Some(reference) = decisions.next() {
            reference.is_some() && decisions.all(|d| d == reference)
        } else {
            true // vacuously, nobody is honest
        }
    }

    pub fn snapshot(&self) -> SimulationView {
        SimulationView {
            phase: self.phase,
            round: self.round,
            f: self.config.as_ref().map(|c| c.f),
            sender: self.config.as_ref().map(|c| c.sender),
            sender_value: self.config.as_ref().map(|c| c.sender_value),
            participants: self
                .participants
                .iter()
                .map(|p| ParticipantView {
                    id: p.id,
                    is_sender: p.is_sender,
                    is_faulty: p.is_faulty,
                    log: p.log.clone(),
                    final_decision: p.final_decision,
                })
                .collect(),
        }
    }

    fn roster(&self) -> Vec<Id> {
        self.participants.iter().map(|p| p.id).collect()
    }

    fn broadcast(&self, config: &SimConfig) -> Vec<Message> {
        let commander = &self.participants[config.sender];
        let path = Path::root(commander.id);
        let roster = self.roster();

        path.relay_targets(&roster, commander.id)
            .map(|recipient| Message {
                sender: commander.id,
                recipient,
                value: self
                    .fault
                    .transmit(config.sender_value, commander.is_faulty, recipient),
                path: path.clone(),
            })
            .collect()
    }

    /// Every general forwards what it heard last round to everyone not yet on
    /// the path. Reads the logs as they stood at the end of the previous round.
    fn relay(&self) -> Vec<Message> {
        let roster = self.roster();
        let mut messages = Vec::new();

        for relayer in self.participants.iter() {
            for (path, value) in relayer.log.received_in_round(self.round - 1) {
                let forwarded = path.child(relayer.id);
                for recipient in path.relay_targets(&roster, relayer.id) {
                    messages.push(Message {
                        sender: relayer.id,
                        recipient,
                        value: self.fault.transmit(value, relayer.is_faulty, recipient),
                        path: forwarded.clone(),
                    });
                }
            }
        }

        messages
    }

    fn deliver(&mut self, messages: &[Message]) {
        for msg in messages {
            debug!(
                "[NET] {}->{} {} via {}",
                msg.sender, msg.recipient, msg.value, msg.path
            );
            let recipient = &mut self.participants[msg.recipient];
            if !recipient.log.record(msg.path.clone(), msg.value) {
                warn!(
                    "[NET] {} already holds path {}, dropping duplicate",
                    msg.recipient, msg.path
                );
            }
        }
    }

    fn decide(&mut self, config: &SimConfig) {
        let roster = self.roster();

        for participant in self.participants.iter_mut() {
            if participant.is_faulty {
                continue;
            }

            let decision = if participant.is_sender {
                config.sender_value
            } else {
                let mut resolver = DecisionResolver::new(participant.id, &roster, &participant.log);
                resolver.run_decision(config.f, config.sender)
            };

            info!("[DECIDE] general {} decides {}", participant.id, decision);
            participant.final_decision = Some(decision);
        }
    }
}
