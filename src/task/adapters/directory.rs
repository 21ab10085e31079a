//! File-backed durable slot rooted in a capability-scoped directory.

use crate::task::ports::{DurableSlot, DurableSlotError, DurableSlotResult, SlotKey};
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io::ErrorKind;

/// Durable slot storing each key as `<key>.json` inside one directory.
///
/// Writes go to a temporary sibling file that is then renamed over the
/// target, so a reader never sees a half-written value.
#[derive(Debug)]
pub struct DirectorySlot {
    dir: Dir,
}

impl DirectorySlot {
    /// Wraps an already opened directory handle.
    #[must_use]
    pub const fn new(dir: Dir) -> Self {
        Self { dir }
    }

    /// Opens `path`, creating it and its parents when missing.
    ///
    /// # Errors
    ///
    /// Returns [`DurableSlotError::Io`] when the directory cannot be created
    /// or opened.
    pub fn open_or_create(path: &Utf8Path) -> DurableSlotResult<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority()).map_err(DurableSlotError::io)?;
        let dir = Dir::open_ambient_dir(path, ambient_authority()).map_err(DurableSlotError::io)?;
        Ok(Self::new(dir))
    }

    fn file_name(key: &SlotKey) -> String {
        format!("{key}.json")
    }

    fn temp_file_name(key: &SlotKey) -> String {
        format!(".{key}.json.tmp")
    }
}

impl DurableSlot for DirectorySlot {
    fn read(&self, key: &SlotKey) -> DurableSlotResult<Option<String>> {
        match self.dir.read_to_string(Self::file_name(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(DurableSlotError::io(err)),
        }
    }

    fn write(&self, key: &SlotKey, value: &str) -> DurableSlotResult<()> {
        let temp_name = Self::temp_file_name(key);
        self.dir
            .write(&temp_name, value)
            .map_err(DurableSlotError::io)?;
        self.dir
            .rename(&temp_name, &self.dir, Self::file_name(key))
            .map_err(DurableSlotError::io)
    }
}
