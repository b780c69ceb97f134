use serde::{Deserialize, Serialize};

use crate::message_log::MessageLog;
use crate::value::Value;

/// Generals are numbered `0..n` and keep their number for the whole simulation.
pub type Id = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: Id,
    pub is_sender: bool,
    pub is_faulty: bool,
    pub log: MessageLog,
    pub final_decision: Option<Value>,
}

impl Participant {
    pub fn new(id: Id, is_sender: bool) -> Self {
        Self {
            id,
            is_sender,
            is_faulty: false,
            log: MessageLog::default(),
            final_decision: None,
        }
    }

    pub fn is_lieutenant(&self) -> bool {
        !self.is_sender
    }

    pub fn is_honest(&self) -> bool {
        !self.is_faulty
    }
}
