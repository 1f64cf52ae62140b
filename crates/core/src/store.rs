// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! Flat-file room persistence.
//!
//! One JSON document per room under the store directory, named by the
//! sanitized room id. Writers hold an exclusive advisory lock for the
//! whole read-modify-write transaction; readers take a shared lock. A
//! torn document is therefore never observable, and two racing writers
//! serialize instead of losing an update.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::error::{Error, Result};
use crate::protocol::RoomSummary;
use crate::room::Room;

/// How long a transaction waits for the room lock before failing.
const LOCK_WAIT: Duration = Duration::from_secs(5);

/// Poll interval while waiting for the lock.
const LOCK_RETRY: Duration = Duration::from_millis(10);

/// Replace everything outside `[A-Za-z0-9_-]` so a room id can never
/// escape the store directory.
pub fn sanitize_room_id(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// What a transaction closure asks the store to do with the document.
pub enum Commit {
    /// Leave the stored document untouched.
    Keep,
    /// Replace the document with this room.
    Write(Room),
    /// Remove the document entirely.
    Delete,
}

/// Keyed store of room documents, one file per room.
pub struct RoomStore {
    dir: PathBuf,
}

impl RoomStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(RoomStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_room_id(id)))
    }

    /// Read a room under a shared lock.
    ///
    /// A missing file or an unparsable document reads as absent, never
    /// as an error.
    pub fn read(&self, id: &str) -> Result<Option<Room>> {
        let path = self.path_for(id);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        lock_shared_bounded(&file, &path)?;
        Ok(read_document(&file))
    }

    /// Full replace of a room document under an exclusive lock.
    pub fn write(&self, id: &str, room: &Room) -> Result<()> {
        self.update(id, |_| Ok((Commit::Write(room.clone()), ())))
    }

    /// Atomic read-modify-write transaction on one room.
    ///
    /// The exclusive lock is held across the read, the closure, and the
    /// commit, so a concurrent `update` on the same room cannot observe
    /// or overwrite an intermediate state.
    pub fn update<T>(
        &self,
        id: &str,
        f: impl FnOnce(Option<Room>) -> Result<(Commit, T)>,
    ) -> Result<T> {
        let path = self.path_for(id);
        let file = open_locked(&path)?;
        let was_empty = file.metadata()?.len() == 0;
        let existing = read_document(&file);

        match f(existing) {
            Ok((Commit::Write(room), out)) => {
                write_document(&file, &room)?;
                Ok(out)
            }
            Ok((Commit::Delete, out)) => {
                fs::remove_file(&path)?;
                Ok(out)
            }
            Ok((Commit::Keep, out)) => {
                // Opening with create(true) may have left an empty file
                // behind for a room that does not exist; remove it so
                // `list` never sees phantom rooms.
                if was_empty {
                    let _ = fs::remove_file(&path);
                }
                Ok(out)
            }
            Err(e) => {
                if was_empty {
                    let _ = fs::remove_file(&path);
                }
                Err(e)
            }
        }
    }

    /// Enumerate all stored rooms. Unreadable documents are skipped.
    pub fn list(&self) -> Result<Vec<RoomSummary>> {
        let mut rooms = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Ok(file) = File::open(&path) else {
                continue;
            };
            if lock_shared_bounded(&file, &path).is_err() {
                continue;
            }
            if let Some(room) = read_document(&file) {
                rooms.push(RoomSummary {
                    id: room.id.clone(),
                    rev: room.rev,
                    updated_at: room.updated_at,
                    has_fen: room.fen.as_deref().is_some_and(|f| !f.is_empty()),
                });
            }
        }
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rooms)
    }
}

/// Open the document for writing and take the exclusive lock.
///
/// A racer may delete the file between our open and lock acquisition;
/// verify the locked handle still names the path and reopen if not.
fn open_locked(path: &Path) -> Result<File> {
    loop {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        lock_exclusive_bounded(&file, path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            match fs::metadata(path) {
                Ok(meta) if meta.ino() == file.metadata()?.ino() => return Ok(file),
                _ => continue,
            }
        }
        #[cfg(not(unix))]
        return Ok(file);
    }
}

fn lock_exclusive_bounded(file: &File, path: &Path) -> Result<()> {
    let deadline = Instant::now() + LOCK_WAIT;
    loop {
        match file.try_lock_exclusive() {
            Ok(()) => return Ok(()),
            Err(_) if Instant::now() < deadline => std::thread::sleep(LOCK_RETRY),
            Err(_) => return Err(Error::LockTimeout(path.display().to_string())),
        }
    }
}

fn lock_shared_bounded(file: &File, path: &Path) -> Result<()> {
    let deadline = Instant::now() + LOCK_WAIT;
    loop {
        match file.try_lock_shared() {
            Ok(()) => return Ok(()),
            Err(_) if Instant::now() < deadline => std::thread::sleep(LOCK_RETRY),
            Err(_) => return Err(Error::LockTimeout(path.display().to_string())),
        }
    }
}

fn read_document(mut file: &File) -> Option<Room> {
    let mut buf = String::new();
    if file.read_to_string(&mut buf).is_err() || buf.is_empty() {
        return None;
    }
    serde_json::from_str(&buf).ok()
}

fn write_document(mut file: &File, room: &Room) -> Result<()> {
    let json = serde_json::to_vec(room)?;
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(&json)?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
