use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::ParfindError;

/// A single filesystem entry observed during traversal.
///
/// `metadata` is populated lazily — only when a predicate explicitly needs it
/// (size, permission bits). This avoids a `stat` syscall per entry when the
/// expression only looks at names and types. Once fetched, the result
/// (success or failure) is cached for the entry's lifetime.
pub struct Entry {
    /// Full path as it will be emitted — the root as supplied, joined with
    /// each child name below it.
    pub path: PathBuf,

    /// The entry's file name.
    pub name: String,

    /// What kind of entry this is.
    pub kind: EntryKind,

    meta: OnceLock<io::Result<Metadata>>,
}

/// The kind of a traversed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,

    /// A directory.
    Dir,

    /// A symbolic link.
    Symlink,

    /// A named pipe (FIFO).
    Pipe,

    /// A unix domain socket.
    Socket,

    /// Anything else (device files, etc.).
    Other,
}

impl EntryKind {
    fn from_file_type(ft: fs::FileType) -> Self {
        if ft.is_dir() {
            return Self::Dir;
        }
        if ft.is_file() {
            return Self::File;
        }
        if ft.is_symlink() {
            return Self::Symlink;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if ft.is_fifo() {
                return Self::Pipe;
            }
            if ft.is_socket() {
                return Self::Socket;
            }
        }
        Self::Other
    }
}

impl Entry {
    /// Stat a root path and build its entry.
    ///
    /// Roots follow symlinks (a root that is a link to a directory walks the
    /// directory), and their metadata is already fetched, so it is seeded
    /// into the lazy slot.
    pub fn from_root(path: &Path) -> io::Result<Self> {
        let meta = fs::metadata(path)?;
        let kind = EntryKind::from_file_type(meta.file_type());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let slot = OnceLock::new();
        let _ = slot.set(Ok(meta));
        Ok(Self {
            path: path.to_path_buf(),
            name,
            kind,
            meta: slot,
        })
    }

    /// Build an entry for a child read out of `read_dir`. Does not follow
    /// symlinks and does not stat.
    pub fn from_dir_entry(path: PathBuf, dent: &fs::DirEntry) -> io::Result<Self> {
        let kind = EntryKind::from_file_type(dent.file_type()?);
        Ok(Self {
            path,
            name: dent.file_name().to_string_lossy().into_owned(),
            kind,
            meta: OnceLock::new(),
        })
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    /// The entry's metadata, fetched on first use and cached.
    ///
    /// Children are stat'd without following symlinks, matching how their
    /// kind was read out of the directory.
    pub fn metadata(&self) -> Result<&Metadata, ParfindError> {
        self.meta
            .get_or_init(|| fs::symlink_metadata(&self.path))
            .as_ref()
            .map_err(|e| ParfindError::Metadata {
                path: self.path.clone(),
                kind: e.kind(),
            })
    }

    /// Build an entry from parts, for expression tests that never touch the
    /// filesystem.
    #[cfg(test)]
    pub(crate) fn fake(path: &str, kind: EntryKind) -> Self {
        let path = PathBuf::from(path);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            kind,
            meta: OnceLock::new(),
        }
    }
}
