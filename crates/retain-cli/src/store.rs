//! Item files on disk
//!
//! One JSON file per item. Writes go through a temp file in the same
//! directory and are renamed over the target, so a crash never leaves a
//! half-written record. Review logs are JSON Lines and only ever appended.
//!
//! Concurrent reviews of one item are serialized through an exclusive lock
//! on a `<item>.lock` sidecar. The item file itself is replaced on every
//! write, so it cannot carry the lock.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use retain_core::{MemoryState, ReviewLog};
use tempfile::NamedTempFile;

/// Exclusive hold on one item, released on drop
pub struct ItemLock {
    file: File,
}

impl Drop for ItemLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Sidecar path guarding `path`
pub fn lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

/// Block until no other process or thread holds the item
pub fn lock_item(path: &Path) -> anyhow::Result<ItemLock> {
    let lock_path = lock_path(path);
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .with_context(|| format!("Failed to open lock file {}", lock_path.display()))?;
    file.lock()
        .with_context(|| format!("Failed to lock {}", lock_path.display()))?;
    Ok(ItemLock { file })
}

/// Read an item record
pub fn read_item(path: &Path) -> anyhow::Result<MemoryState> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read item file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid item record in {}", path.display()))
}

/// Replace an item record atomically
pub fn write_item(path: &Path, item: &MemoryState) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    serde_json::to_writer_pretty(&mut tmp, item)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

/// Append one log entry as a JSON line
pub fn append_log(path: &Path, entry: &ReviewLog) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open review log {}", path.display()))?;
    let mut line = serde_json::to_string(entry)?;
    line.push('\n');
    file.write_all(line.as_bytes())?;
    Ok(())
}
