//! Headless re-execution of a recorded journal against a fresh run.

use thiserror::Error;
use tracing::debug;

use crate::error::GenerationError;
use crate::journal::InputJournal;
use crate::progression::{EventOutcome, Run, RunSummary};

#[derive(Debug, PartialEq, Error)]
pub enum ReplayError {
    #[error("journal seed could not start a run: {0}")]
    Generation(#[from] GenerationError),
    #[error("journal expects layout {recorded:016x} but its seed now builds {generated:016x}")]
    LayoutMismatch { recorded: u64, generated: u64 },
    #[error("journal record out of order: expected seq {expected}, found {found}")]
    SequenceGap { expected: u64, found: u64 },
}

#[derive(Debug, PartialEq)]
pub struct ReplayResult {
    pub final_snapshot_hash: u64,
    pub outcome: Option<RunSummary>,
    pub applied: usize,
    pub ignored: usize,
}

/// Starts a run from the journal's seed and config and feeds every record in order. The
/// regenerated layout must match the fingerprint the journal was recorded against.
pub fn replay_to_end(journal: &InputJournal) -> Result<ReplayResult, ReplayError> {
    let (run, applied, ignored) = feed_journal(journal)?;
    Ok(ReplayResult {
        final_snapshot_hash: run.snapshot_hash(),
        outcome: run.outcome().cloned(),
        applied,
        ignored,
    })
}

/// Rebuilds the live run a journal describes, for picking up where a crashed session stopped.
pub fn replay_journal_inputs(journal: &InputJournal) -> Result<Run, ReplayError> {
    feed_journal(journal).map(|(run, _, _)| run)
}

fn feed_journal(journal: &InputJournal) -> Result<(Run, usize, usize), ReplayError> {
    let mut run = Run::start(&journal.seed, &journal.config)?;
    let generated = run.layout().fingerprint();
    if generated != journal.layout_fingerprint {
        return Err(ReplayError::LayoutMismatch {
            recorded: journal.layout_fingerprint,
            generated,
        });
    }
    let mut applied = 0;
    let mut ignored = 0;

    for (expected, record) in (0_u64..).zip(&journal.inputs) {
        if record.seq != expected {
            return Err(ReplayError::SequenceGap { expected, found: record.seq });
        }
        match run.handle(record.event.clone()) {
            EventOutcome::Applied => applied += 1,
            EventOutcome::Ignored(reason) => {
                debug!(seq = record.seq, ?reason, "replayed event ignored");
                ignored += 1;
            }
        }
        run.drain_events();
    }

    Ok((run, applied, ignored))
}

#[cfg(test)]
mod tests;
