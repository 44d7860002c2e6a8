use std::fmt;
use std::path::Path;

use crate::entry::{Entry, EntryKind};
use crate::error::ParfindError;
use crate::filter::FileExp;

/// `-type` — exact entry-kind match. One-letter codes follow find:
/// `f` regular file, `d` directory, `p` named pipe, `s` socket.
pub struct FileType(EntryKind);

impl FileType {
    pub fn new(code: &str) -> Result<Self, ParfindError> {
        let kind = match code {
            "f" => EntryKind::File,
            "d" => EntryKind::Dir,
            "p" => EntryKind::Pipe,
            "s" => EntryKind::Socket,
            _ => return Err(ParfindError::InvalidFileType(code.to_string())),
        };
        Ok(Self(kind))
    }
}

impl FileExp for FileType {
    fn matches(&self, _path: &Path, entry: &Entry) -> Result<bool, ParfindError> {
        Ok(entry.kind == self.0)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            EntryKind::File => "file",
            EntryKind::Dir => "dir",
            EntryKind::Pipe => "pipe",
            EntryKind::Socket => "socket",
            EntryKind::Symlink => "symlink",
            EntryKind::Other => "other",
        };
        write!(f, "type({name})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(exp: &FileType, kind: EntryKind) -> bool {
        let entry = Entry::fake("x", kind);
        exp.matches(Path::new("x"), &entry).unwrap()
    }

    #[test]
    fn codes_map_to_kinds() {
        assert!(matches(&FileType::new("f").unwrap(), EntryKind::File));
        assert!(matches(&FileType::new("d").unwrap(), EntryKind::Dir));
        assert!(matches(&FileType::new("p").unwrap(), EntryKind::Pipe));
        assert!(matches(&FileType::new("s").unwrap(), EntryKind::Socket));
    }

    #[test]
    fn kind_must_match_exactly() {
        assert!(!matches(&FileType::new("f").unwrap(), EntryKind::Dir));
        assert!(!matches(&FileType::new("f").unwrap(), EntryKind::Symlink));
        assert!(!matches(&FileType::new("d").unwrap(), EntryKind::File));
    }

    #[test]
    fn unknown_code_is_a_construction_error() {
        for code in ["x", "", "file", "F"] {
            assert!(FileType::new(code).is_err(), "{code:?}");
        }
    }

    #[test]
    fn rendering() {
        assert_eq!(FileType::new("f").unwrap().to_string(), "type(file)");
        assert_eq!(FileType::new("d").unwrap().to_string(), "type(dir)");
    }
}
