//! Single-file record store
//!
//! File format:
//! ```text
//! [HEADER: 64 bytes]
//!   - magic: 8 bytes ("IDREG_DB")
//!   - version: 4 bytes (u32 LE)
//!   - flags: 4 bytes
//!   - record_count: 8 bytes (u64 LE)
//!   - reserved: 40 bytes
//!
//! [RECORDS: variable]
//!   - len: 4 bytes (u32 LE)
//!   - bincode-encoded record: len bytes
//! ```
//!
//! Records are append-only. The header count is rewritten after every
//! insert; anything past the last counted record is ignored on open.

use super::RecordStore;
use crate::model::{PassportId, Record};
use crate::{Error, Result, MAGIC, VERSION};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const HEADER_SIZE: u64 = 64;
const COUNT_OFFSET: u64 = 16;

/// Upper bound on a single encoded record, to catch corrupt length prefixes
const MAX_RECORD_SIZE: u32 = 1 << 20;

/// Records loaded from disk, plus the passport id index
struct Cache {
    records: Vec<Record>,
    index: HashMap<PassportId, usize>,
}

impl Cache {
    fn new() -> Self {
        Cache {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }
}

/// A record store backed by a single file
pub struct FileStore {
    /// Path to the registry file
    path: PathBuf,
    /// The file handle
    file: RwLock<File>,
    /// All records, in file order
    cache: RwLock<Cache>,
    /// Current append position
    write_offset: RwLock<u64>,
}

impl FileStore {
    /// Create a new registry file, truncating any existing one
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        let mut header = [0u8; HEADER_SIZE as usize];
        header[0..8].copy_from_slice(MAGIC);
        header[8..12].copy_from_slice(&VERSION.to_le_bytes());
        // flags: 0
        // record_count: 0
        file.write_all(&header)?;
        file.sync_all()?;

        debug!(path = %path.display(), "created registry file");

        Ok(FileStore {
            path,
            file: RwLock::new(file),
            cache: RwLock::new(Cache::new()),
            write_offset: RwLock::new(HEADER_SIZE),
        })
    }

    /// Open an existing registry file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut file = OpenOptions::new().read(true).write(true).open(&path)?;

        let mut header = [0u8; HEADER_SIZE as usize];
        file.read_exact(&mut header).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Error::InvalidFile("Truncated header".into()),
            _ => Error::Io(e),
        })?;

        if &header[0..8] != MAGIC {
            return Err(Error::InvalidFile("Invalid magic bytes".into()));
        }

        let version = u32::from_le_bytes(le_bytes(&header[8..12]));
        if version != VERSION {
            return Err(Error::VersionMismatch {
                expected: VERSION,
                found: version,
            });
        }

        let record_count = u64::from_le_bytes(le_bytes(&header[16..24]));

        let mut cache = Cache::new();
        let mut reader = BufReader::new(&mut file);
        let mut write_offset = HEADER_SIZE;
        for i in 0..record_count {
            let mut len_buf = [0u8; 4];
            reader.read_exact(&mut len_buf).map_err(|e| truncated(e, i))?;
            let len = u32::from_le_bytes(len_buf);
            if len > MAX_RECORD_SIZE {
                return Err(Error::InvalidFile(format!(
                    "Record {} has implausible size {}",
                    i, len
                )));
            }

            let mut data = vec![0u8; len as usize];
            reader.read_exact(&mut data).map_err(|e| truncated(e, i))?;
            let record: Record = bincode::deserialize(&data)?;

            if cache.index.contains_key(&record.passport_id) {
                return Err(Error::InvalidFile(format!(
                    "Duplicate passport id on disk: {}",
                    record.passport_id
                )));
            }
            cache.index.insert(record.passport_id.clone(), cache.records.len());
            cache.records.push(record);
            write_offset += 4 + len as u64;
        }
        drop(reader);

        debug!(path = %path.display(), records = record_count, "opened registry file");

        Ok(FileStore {
            path,
            file: RwLock::new(file),
            cache: RwLock::new(cache),
            write_offset: RwLock::new(write_offset),
        })
    }

    /// Open or create a registry file
    pub fn open_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Flush changes to disk
    pub fn sync(&self) -> Result<()> {
        let count = self.cache.read().records.len() as u64;
        let mut file = self.file.write();
        file.seek(SeekFrom::Start(COUNT_OFFSET))?;
        file.write_all(&count.to_le_bytes())?;
        file.sync_all()?;
        Ok(())
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for FileStore {
    fn insert(&self, record: &Record) -> Result<()> {
        let mut cache = self.cache.write();
        if cache.index.contains_key(&record.passport_id) {
            return Err(Error::DuplicateRecord(record.passport_id.to_string()));
        }

        let data = bincode::serialize(record)?;
        let len = u32::try_from(data.len())
            .ok()
            .filter(|&len| len <= MAX_RECORD_SIZE)
            .ok_or(Error::RecordTooLarge {
                size: data.len(),
                max: MAX_RECORD_SIZE as usize,
            })?;
        let count = cache.records.len() as u64 + 1;

        {
            let mut write_offset = self.write_offset.write();
            let mut file = self.file.write();

            file.seek(SeekFrom::Start(*write_offset))?;
            file.write_all(&len.to_le_bytes())?;
            file.write_all(&data)?;

            // Only count the record once its bytes are written
            file.seek(SeekFrom::Start(COUNT_OFFSET))?;
            file.write_all(&count.to_le_bytes())?;

            *write_offset += 4 + len as u64;
        }

        let pos = cache.records.len();
        cache.index.insert(record.passport_id.clone(), pos);
        cache.records.push(record.clone());

        debug!(passport_id = %record.passport_id, "appended record");
        Ok(())
    }

    fn get(&self, passport_id: &PassportId) -> Result<Option<Record>> {
        let cache = self.cache.read();
        Ok(cache
            .index
            .get(passport_id)
            .map(|&pos| cache.records[pos].clone()))
    }

    fn list_all_records(&self) -> Result<Vec<Record>> {
        Ok(self.cache.read().records.clone())
    }

    fn len(&self) -> usize {
        self.cache.read().records.len()
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        // Best-effort sync on drop
        let _ = self.sync();
    }
}

fn le_bytes<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(slice);
    buf
}

fn truncated(e: std::io::Error, index: u64) -> Error {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof => {
            Error::InvalidFile(format!("Truncated at record {}", index))
        }
        _ => Error::Io(e),
    }
}
