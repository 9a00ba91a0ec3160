//! Append-only JSONL journal files.
//!
//! Line 1 is the journal header: format version, seed, layout fingerprint and the full config.
//! Each later line is one inbound event whose SHA-256 digest covers the previous digest, so an
//! edited or dropped record stops the load at the line where the chain breaks. Records are
//! flushed as they are written; a crash loses at most the line being written.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::WardConfig;
use crate::journal::{InputJournal, InputRecord, JOURNAL_FORMAT_VERSION};
use crate::progression::InboundEvent;

/// Digest the first record links back to.
const GENESIS_DIGEST: &str = "0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Serialize, Deserialize)]
struct HeaderLine {
    format_version: u16,
    seed: String,
    layout_fingerprint: u64,
    config: WardConfig,
}

impl HeaderLine {
    fn describing(journal: &InputJournal) -> Self {
        Self {
            format_version: journal.format_version,
            seed: journal.seed.clone(),
            layout_fingerprint: journal.layout_fingerprint,
            config: journal.config.clone(),
        }
    }

    fn into_journal(self) -> InputJournal {
        InputJournal {
            format_version: self.format_version,
            seed: self.seed,
            layout_fingerprint: self.layout_fingerprint,
            config: self.config,
            inputs: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RecordLine {
    seq: u64,
    event: InboundEvent,
    prev_digest: String,
    digest: String,
}

/// SHA-256 over the previous digest, the little-endian sequence number and the event's JSON.
fn chain_digest(prev_digest: &str, seq: u64, event: &InboundEvent) -> serde_json::Result<String> {
    let event_json = serde_json::to_vec(event)?;
    let mut hasher = Sha256::new();
    hasher.update(prev_digest.as_bytes());
    hasher.update(seq.to_le_bytes());
    hasher.update(&event_json);
    Ok(format!("{:064x}", hasher.finalize()))
}

/// The point the next appended record attaches to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainHead {
    pub next_seq: u64,
    /// Hex digest of the last record, or the genesis digest for a header-only file.
    pub digest: String,
}

impl ChainHead {
    fn genesis() -> Self {
        Self { next_seq: 0, digest: GENESIS_DIGEST.to_string() }
    }

    fn link(&self, event: &InboundEvent) -> serde_json::Result<RecordLine> {
        Ok(RecordLine {
            seq: self.next_seq,
            event: event.clone(),
            prev_digest: self.digest.clone(),
            digest: chain_digest(&self.digest, self.next_seq, event)?,
        })
    }

    fn advance(&mut self, digest: String) {
        self.next_seq += 1;
        self.digest = digest;
    }
}

pub struct JournalWriter {
    out: BufWriter<File>,
    head: ChainHead,
}

impl JournalWriter {
    /// Starts a file at `path` holding `journal`'s header and any records it already carries.
    pub fn create(path: &Path, journal: &InputJournal) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let out = BufWriter::new(File::create(path)?);
        let mut writer = Self { out, head: ChainHead::genesis() };
        writer.write_line(&HeaderLine::describing(journal))?;
        for record in &journal.inputs {
            writer.append(&record.event)?;
        }
        Ok(writer)
    }

    /// Reopens a file that loaded cleanly; `head` comes from its `LoadedJournal`.
    pub fn resume(path: &Path, head: ChainHead) -> io::Result<Self> {
        let out = BufWriter::new(OpenOptions::new().append(true).open(path)?);
        Ok(Self { out, head })
    }

    pub fn head(&self) -> &ChainHead {
        &self.head
    }

    pub fn append(&mut self, event: &InboundEvent) -> io::Result<()> {
        let record = self.head.link(event)?;
        self.write_line(&record)?;
        self.head.advance(record.digest);
        Ok(())
    }

    fn write_line<T: Serialize>(&mut self, line: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, line)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

#[derive(Debug)]
pub struct LoadedJournal {
    pub journal: InputJournal,
    pub head: ChainHead,
}

#[derive(Debug, Error)]
pub enum JournalLoadError {
    #[error("journal could not be read: {0}")]
    Io(#[from] io::Error),
    #[error("journal file is empty")]
    EmptyFile,
    #[error("journal header on line {line} is invalid: {reason}")]
    InvalidHeader { line: usize, reason: String },
    #[error("journal format version {found} is not supported")]
    UnsupportedVersion { found: u16 },
    #[error("journal record on line {line} is invalid: {reason}")]
    InvalidRecord { line: usize, reason: String },
    #[error("journal line {line} ends before its newline")]
    IncompleteLine { line: usize },
    #[error("journal hash chain breaks on line {line}")]
    HashChainBroken { line: usize },
}

pub fn save_journal_to_file(path: &Path, journal: &InputJournal) -> io::Result<()> {
    JournalWriter::create(path, journal).map(drop)
}

/// Reads and verifies a journal file. Fails at the first line that is cut off, malformed or
/// out of chain; nothing after it is trusted.
pub fn load_journal_from_file(path: &Path) -> Result<LoadedJournal, JournalLoadError> {
    let content = fs::read_to_string(path)?;
    let mut lines = content.split_inclusive('\n').zip(1_usize..);

    let (raw_header, _) = lines.next().ok_or(JournalLoadError::EmptyFile)?;
    let header: HeaderLine = serde_json::from_str(terminated(raw_header, 1)?)
        .map_err(|err| JournalLoadError::InvalidHeader { line: 1, reason: err.to_string() })?;
    if header.format_version != JOURNAL_FORMAT_VERSION {
        return Err(JournalLoadError::UnsupportedVersion { found: header.format_version });
    }
    let mut journal = header.into_journal();

    let mut head = ChainHead::genesis();
    for (raw, line) in lines {
        let record = verify_record(terminated(raw, line)?, line, &head)?;
        head.advance(record.digest);
        journal.inputs.push(InputRecord { seq: record.seq, event: record.event });
    }
    Ok(LoadedJournal { journal, head })
}

fn terminated(raw: &str, line: usize) -> Result<&str, JournalLoadError> {
    raw.strip_suffix('\n').ok_or(JournalLoadError::IncompleteLine { line })
}

fn verify_record(
    text: &str,
    line: usize,
    head: &ChainHead,
) -> Result<RecordLine, JournalLoadError> {
    let invalid = |reason: String| JournalLoadError::InvalidRecord { line, reason };
    let record: RecordLine = serde_json::from_str(text).map_err(|err| invalid(err.to_string()))?;
    if record.seq != head.next_seq {
        return Err(invalid(format!("expected seq {}, found {}", head.next_seq, record.seq)));
    }
    let expected = chain_digest(&head.digest, record.seq, &record.event)
        .map_err(|err| invalid(err.to_string()))?;
    if record.prev_digest != head.digest || record.digest != expected {
        return Err(JournalLoadError::HashChainBroken { line });
    }
    Ok(record)
}
