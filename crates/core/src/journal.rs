//! In-memory record of every inbound event fed to a run, enough to reproduce it exactly.

use serde::{Deserialize, Serialize};

use crate::config::WardConfig;
use crate::progression::InboundEvent;

pub const JOURNAL_FORMAT_VERSION: u16 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputJournal {
    pub format_version: u16,
    pub seed: String,
    /// `Layout::fingerprint` of the ward the inputs were recorded against.
    pub layout_fingerprint: u64,
    pub config: WardConfig,
    pub inputs: Vec<InputRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub seq: u64,
    pub event: InboundEvent,
}

impl InputJournal {
    pub fn new(seed: &str, config: WardConfig, layout_fingerprint: u64) -> Self {
        Self {
            format_version: JOURNAL_FORMAT_VERSION,
            seed: seed.to_string(),
            layout_fingerprint,
            config,
            inputs: Vec::new(),
        }
    }

    /// Appends `event` with the next sequence number.
    pub fn append(&mut self, event: InboundEvent) {
        let seq = self.inputs.len() as u64;
        self.inputs.push(InputRecord { seq, event });
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}
