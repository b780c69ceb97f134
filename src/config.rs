use std::collections::BTreeSet;

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actor::Id;
use crate::value::Value;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("N must be a number, got `{0}`")]
    NonNumericInput(String),
    #[error("N must be >= {0}")]
    NBelowMinimum(usize),
    #[error("Sender {sender} is not one of the {n} generals")]
    SenderOutOfRange { sender: Id, n: usize },
    #[error("Faulty general {id} is not one of the {n} generals")]
    UnknownParticipant { id: Id, n: usize },
    #[error("{faulty} faulty generals configured but only {f} can be tolerated")]
    TooManyFaulty { faulty: usize, f: usize },
}

/// Everything needed to lay out an OM(f) simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    pub n: usize,
    pub f: usize,
    pub sender: Id,
    pub sender_value: Value,
    /// May include the sender, modelling a traitorous commander.
    pub faulty: BTreeSet<Id>,
}

impl SimConfig {
    pub fn new(n: usize, f: usize, sender: Id, sender_value: Value) -> Self {
        Self {
            n,
            f,
            sender,
            sender_value,
            faulty: Default::default(),
        }
    }

    /// Builds a config from a free-text general count. Without one, `n` is
    /// the smallest network that tolerates `f` faulty generals.
    pub fn from_input(
        n: Option<&str>,
        f: usize,
        sender: Id,
        sender_value: Value,
        faulty: impl IntoIterator<Item = Id>,
    ) -> Result<Self, ConfigError> {
        let n = match n {
            Some(raw) => parse_count(raw)?,
            None => min_generals(f),
        };
        Ok(Self::new(n, f, sender, sender_value).with_faulty(faulty))
    }

    pub fn with_faulty(mut self, faulty: impl IntoIterator<Item = Id>) -> Self {
        self.faulty.extend(faulty);
        self
    }

    /// Marks `count` lieutenants faulty, drawn uniformly from those not
    /// already faulty. Asking for more than are available marks all of them.
    pub fn with_random_faults<R: Rng + ?Sized>(mut self, count: usize, rng: &mut R) -> Self {
        let candidates: Vec<Id> = (0..self.n)
            .filter(|id| *id != self.sender && !self.faulty.contains(id))
            .collect();
        let amount = count.min(candidates.len());

        for i in index::sample(rng, candidates.len(), amount).into_iter() {
            self.faulty.insert(candidates[i]);
        }
        self
    }

    /// Smallest network OM(f) is correct for.
    pub fn required_min(&self) -> usize {
        min_generals(self.f)
    }

    /// Number of message rounds before generals may decide.
    pub fn rounds(&self) -> usize {
        self.f + 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n < self.required_min() {
            return Err(ConfigError::NBelowMinimum(self.required_min()));
        }

        if self.sender >= self.n {
            return Err(ConfigError::SenderOutOfRange {
                sender: self.sender,
                n: self.n,
            });
        }

        if let Some(id) = self.faulty.iter().copied().find(|id| *id >= self.n) {
            return Err(ConfigError::UnknownParticipant { id, n: self.n });
        }

        if self.faulty.len() > self.f {
            return Err(ConfigError::TooManyFaulty {
                faulty: self.faulty.len(),
                f: self.f,
            });
        }

        Ok(())
    }
}

/// Parses a general count typed in by a user.
/// OM(f) needs at least `3f + 1` generals.
pub fn min_generals(f: usize) -> usize {
    3 * f + 1
}

pub fn parse_count(raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::NonNumericInput(raw.to_string()))
}
