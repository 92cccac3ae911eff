//! Journal-backed ledger
//!
//! Every put/delete is appended to a single journal file as a checksummed
//! entry. On open the journal is replayed into an ordered map; the map
//! serves get and range_scan.
//!
//! - Append-only, no in-place updates
//! - A mutation is applied to the map only after it is written (and synced
//!   when `sync_writes` is on)
//! - Any checksum failure during replay aborts the open
//! - A failed append truncates the journal back to the last good entry; if
//!   that truncation fails too, the ledger refuses further appends

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::entry::{EntryOp, JournalEntry};
use super::errors::{LedgerError, LedgerResult};
use super::iterator::{SnapshotIterator, StateIterator};
use super::store::{collect_range, validate_key, LedgerStore};

struct JournalState {
    file: File,
    current_offset: u64,
    entry_count: u64,
    entries: BTreeMap<String, Vec<u8>>,
    /// Set when a torn tail could not be truncated away
    halted: bool,
    fault: WriteFault,
}

/// Failures forced onto the next append, for exercising rollback.
#[derive(Debug, Default, Clone, Copy)]
struct WriteFault {
    /// Write only this many bytes of the next entry, then fail
    short_write: Option<usize>,
    /// Fail the truncation that follows a failed append
    rollback: bool,
}

/// Ledger persisted to an append-only journal file.
pub struct FileLedger {
    journal_path: PathBuf,
    sync_writes: bool,
    state: Mutex<JournalState>,
}

impl FileLedger {
    /// Opens or creates the journal at `journal_path` and replays it.
    ///
    /// Creates parent directories if needed.
    ///
    /// # Errors
    ///
    /// - `LedgerError::Io` if the file cannot be created, opened or read
    /// - `LedgerError::Corruption` if any entry fails verification
    pub fn open(journal_path: &Path, sync_writes: bool) -> LedgerResult<Self> {
        if let Some(parent) = journal_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    LedgerError::io(
                        format!("Failed to create ledger directory: {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(journal_path)
            .map_err(|e| {
                LedgerError::io(
                    format!("Failed to open journal: {}", journal_path.display()),
                    e,
                )
            })?;

        let mut data = Vec::new();
        file.read_to_end(&mut data).map_err(|e| {
            LedgerError::io(
                format!("Failed to read journal: {}", journal_path.display()),
                e,
            )
        })?;

        let (entries, entry_count) = replay(&data)?;

        Ok(Self {
            journal_path: journal_path.to_path_buf(),
            sync_writes,
            state: Mutex::new(JournalState {
                file,
                current_offset: data.len() as u64,
                entry_count,
                entries,
                halted: false,
                fault: WriteFault::default(),
            }),
        })
    }

    /// Returns the journal file path.
    pub fn path(&self) -> &Path {
        &self.journal_path
    }

    /// Number of journal entries, including superseded ones.
    pub fn entry_count(&self) -> LedgerResult<u64> {
        Ok(self.state.lock()?.entry_count)
    }

    /// Bytes written to the journal so far.
    pub fn journal_size(&self) -> LedgerResult<u64> {
        Ok(self.state.lock()?.current_offset)
    }

    /// Number of live keys.
    pub fn key_count(&self) -> LedgerResult<usize> {
        Ok(self.state.lock()?.entries.len())
    }

    fn append(&self, entry: JournalEntry) -> LedgerResult<()> {
        let serialized = entry.serialize();
        let mut state = self.state.lock()?;

        if state.halted {
            return Err(LedgerError::Halted {
                offset: state.current_offset,
            });
        }

        if let Err(e) = write_entry(&mut state, &serialized, self.sync_writes) {
            // Some or all of the entry may be on disk. Cut it off so the
            // next append lands on an entry boundary.
            rollback(&mut state, self.sync_writes)?;
            return Err(LedgerError::io(
                format!("Failed to append entry for key: {}", entry.key),
                e,
            ));
        }

        state.current_offset += serialized.len() as u64;
        state.entry_count += 1;
        apply(&mut state.entries, entry);

        Ok(())
    }

    #[cfg(test)]
    fn inject_fault(&self, fault: WriteFault) {
        self.state.lock().unwrap().fault = fault;
    }
}

fn write_entry(state: &mut JournalState, bytes: &[u8], sync_writes: bool) -> io::Result<()> {
    if let Some(len) = state.fault.short_write.take() {
        state.file.write_all(&bytes[..len.min(bytes.len())])?;
        state.file.flush()?;
        return Err(io::Error::new(io::ErrorKind::WriteZero, "short write"));
    }

    state.file.write_all(bytes)?;
    state.file.flush()?;
    if sync_writes {
        state.file.sync_all()?;
    }
    Ok(())
}

/// Truncate the journal to `current_offset`, discarding a torn tail.
fn rollback(state: &mut JournalState, sync_writes: bool) -> LedgerResult<()> {
    let offset = state.current_offset;
    let truncated = if std::mem::take(&mut state.fault.rollback) {
        Err(io::Error::new(io::ErrorKind::Other, "truncate refused"))
    } else {
        state.file.set_len(offset).and_then(|()| {
            if sync_writes {
                state.file.sync_all()
            } else {
                Ok(())
            }
        })
    };

    if truncated.is_err() {
        state.halted = true;
        return Err(LedgerError::Halted { offset });
    }
    Ok(())
}

impl LedgerStore for FileLedger {
    fn get(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        validate_key(key)?;
        Ok(self.state.lock()?.entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> LedgerResult<()> {
        validate_key(key)?;
        self.append(JournalEntry::put(key, value.to_vec()))
    }

    fn delete(&self, key: &str) -> LedgerResult<()> {
        validate_key(key)?;
        self.append(JournalEntry::delete(key))
    }

    fn range_scan(&self, start: &str, end: &str) -> LedgerResult<Box<dyn StateIterator>> {
        let state = self.state.lock()?;
        Ok(Box::new(SnapshotIterator::new(collect_range(
            &state.entries,
            start,
            end,
        ))))
    }
}

fn apply(entries: &mut BTreeMap<String, Vec<u8>>, entry: JournalEntry) {
    match entry.op {
        EntryOp::Put => {
            entries.insert(entry.key, entry.value);
        }
        EntryOp::Delete => {
            entries.remove(&entry.key);
        }
    }
}

/// Rebuilds the key space from raw journal bytes. Latest entry per key wins.
fn replay(data: &[u8]) -> LedgerResult<(BTreeMap<String, Vec<u8>>, u64)> {
    let mut entries = BTreeMap::new();
    let mut offset = 0usize;
    let mut count = 0u64;

    while offset < data.len() {
        let (entry, consumed) = JournalEntry::deserialize(&data[offset..])
            .map_err(|e| LedgerError::corruption_at_offset(offset as u64, e.to_string()))?;
        apply(&mut entries, entry);
        offset += consumed;
        count += 1;
    }

    Ok((entries, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn journal_in(dir: &TempDir) -> PathBuf {
        dir.path().join("ledger.dat")
    }

    #[test]
    fn test_open_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("ledger.dat");

        let ledger = FileLedger::open(&path, true).unwrap();

        assert!(path.exists());
        assert_eq!(ledger.entry_count().unwrap(), 0);
    }

    #[test]
    fn test_writes_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = journal_in(&temp_dir);

        {
            let ledger = FileLedger::open(&path, true).unwrap();
            ledger.put("123", b"one").unwrap();
            ledger.put("456", b"two").unwrap();
            ledger.put("123", b"three").unwrap();
            ledger.delete("456").unwrap();
        }

        let ledger = FileLedger::open(&path, true).unwrap();
        assert_eq!(ledger.get("123").unwrap(), Some(b"three".to_vec()));
        assert_eq!(ledger.get("456").unwrap(), None);
        assert_eq!(ledger.entry_count().unwrap(), 4);
        assert_eq!(ledger.key_count().unwrap(), 1);
        assert_eq!(
            ledger.journal_size().unwrap(),
            fs::metadata(&path).unwrap().len()
        );
    }

    #[test]
    fn test_corrupt_journal_fails_open() {
        let temp_dir = TempDir::new().unwrap();
        let path = journal_in(&temp_dir);

        {
            let ledger = FileLedger::open(&path, false).unwrap();
            ledger.put("123", b"payload").unwrap();
        }

        let mut contents = fs::read(&path).unwrap();
        let mid = contents.len() / 2;
        contents[mid] ^= 0xFF;
        fs::write(&path, contents).unwrap();

        let err = FileLedger::open(&path, false).err().unwrap();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("byte_offset 0"));
    }

    #[test]
    fn test_truncated_tail_reports_offset_of_bad_entry() {
        let temp_dir = TempDir::new().unwrap();
        let path = journal_in(&temp_dir);

        let first_len = JournalEntry::put("123", b"a".to_vec()).serialize().len();
        {
            let ledger = FileLedger::open(&path, false).unwrap();
            ledger.put("123", b"a").unwrap();
            ledger.put("456", b"b").unwrap();
        }

        let contents = fs::read(&path).unwrap();
        fs::write(&path, &contents[..contents.len() - 2]).unwrap();

        match FileLedger::open(&path, false) {
            Err(LedgerError::Corruption { offset, .. }) => {
                assert_eq!(offset, first_len as u64)
            }
            other => panic!("expected corruption, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_range_scan_reads_replayed_state() {
        let temp_dir = TempDir::new().unwrap();
        let path = journal_in(&temp_dir);

        {
            let ledger = FileLedger::open(&path, false).unwrap();
            ledger.put("b", b"2").unwrap();
            ledger.put("a", b"1").unwrap();
        }

        let ledger = FileLedger::open(&path, false).unwrap();
        let mut iter = ledger.range_scan("", "").unwrap();
        assert_eq!(iter.next_entry().unwrap().key, "a");
        assert_eq!(iter.next_entry().unwrap().key, "b");
        assert!(!iter.has_next());
        iter.close().unwrap();
    }

    #[test]
    fn test_short_write_is_rolled_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = journal_in(&temp_dir);

        {
            let ledger = FileLedger::open(&path, true).unwrap();
            ledger.put("100", b"first").unwrap();

            ledger.inject_fault(WriteFault {
                short_write: Some(7),
                ..WriteFault::default()
            });
            let err = ledger.put("200", b"torn").unwrap_err();
            assert_eq!(err.code(), "LEDGER_IO_ERROR");
            assert_eq!(ledger.get("200").unwrap(), None);
            assert_eq!(
                fs::metadata(&path).unwrap().len(),
                ledger.journal_size().unwrap()
            );

            // later writes land on an entry boundary
            ledger.put("300", b"third").unwrap();
        }

        let ledger = FileLedger::open(&path, true).unwrap();
        assert_eq!(ledger.get("100").unwrap(), Some(b"first".to_vec()));
        assert_eq!(ledger.get("200").unwrap(), None);
        assert_eq!(ledger.get("300").unwrap(), Some(b"third".to_vec()));
        assert_eq!(ledger.entry_count().unwrap(), 2);
    }

    #[test]
    fn test_failure_after_full_write_is_rolled_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = journal_in(&temp_dir);

        {
            let ledger = FileLedger::open(&path, false).unwrap();
            ledger.inject_fault(WriteFault {
                short_write: Some(usize::MAX),
                ..WriteFault::default()
            });
            assert!(ledger.delete("100").is_err());
            ledger.put("200", b"kept").unwrap();
        }

        // the failed entry was never applied, so it must not replay either
        let ledger = FileLedger::open(&path, false).unwrap();
        assert_eq!(ledger.entry_count().unwrap(), 1);
        assert_eq!(ledger.get("200").unwrap(), Some(b"kept".to_vec()));
    }

    #[test]
    fn test_failed_rollback_halts_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = journal_in(&temp_dir);

        {
            let ledger = FileLedger::open(&path, false).unwrap();
            ledger.put("100", b"first").unwrap();
            let good_len = ledger.journal_size().unwrap();

            ledger.inject_fault(WriteFault {
                short_write: Some(3),
                rollback: true,
            });
            assert!(matches!(
                ledger.put("200", b"torn"),
                Err(LedgerError::Halted { offset }) if offset == good_len
            ));

            // nothing more is appended after the torn tail
            let err = ledger.put("300", b"refused").unwrap_err();
            assert_eq!(err.code(), "LEDGER_HALTED");
            assert_eq!(fs::metadata(&path).unwrap().len(), good_len + 3);
            assert_eq!(ledger.get("100").unwrap(), Some(b"first".to_vec()));
        }

        // the torn tail is reported at the offset of the last good entry
        match FileLedger::open(&path, false) {
            Err(LedgerError::Corruption { offset, .. }) => {
                let first_len = JournalEntry::put("100", b"first".to_vec()).serialize().len();
                assert_eq!(offset, first_len as u64)
            }
            other => panic!("expected corruption, got {:?}", other.err()),
        }
    }
}
