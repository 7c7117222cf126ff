use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

const HASH_BLOCK_SIZE: usize = 64 * 1024;

/// SHA-256 of the full file bytes, read block-wise.
pub fn file_checksum(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut block = vec![0u8; HASH_BLOCK_SIZE];
    loop {
        let n = file.read(&mut block)?;
        if n == 0 {
            break;
        }
        hasher.update(&block[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Content hashes seen so far in the current run, mapped to the first
/// source path that carried them. One instance per run; grows
/// monotonically, never persisted.
#[derive(Debug, Default)]
pub struct ChecksumLedger {
    seen: HashMap<String, PathBuf>,
}

impl ChecksumLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this hash was already seen in the run. When it was not,
    /// records it against `path` and returns false.
    pub fn record_and_check(&mut self, hash: String, path: &Path) -> bool {
        if self.seen.contains_key(&hash) {
            return true;
        }
        self.seen.insert(hash, path.to_path_buf());
        false
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
