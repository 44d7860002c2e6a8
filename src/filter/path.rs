use std::fmt;
use std::path::Path;

use crate::entry::Entry;
use crate::error::ParfindError;
use crate::filter::FileExp;
use crate::glob::Glob;

/// `-path` — glob over the full path as emitted. `*` crosses directory
/// separators, so `*/link/*` matches at any depth.
pub struct PathName(Glob);

/// `-ipath` — case-insensitive dual of [`PathName`].
pub struct IPathName(Glob);

impl PathName {
    pub fn new(pattern: &str) -> Self {
        Self(Glob::new(pattern))
    }
}

impl IPathName {
    pub fn new(pattern: &str) -> Self {
        Self(Glob::new(&pattern.to_uppercase()))
    }
}

impl FileExp for PathName {
    fn matches(&self, path: &Path, _entry: &Entry) -> Result<bool, ParfindError> {
        Ok(self.0.matches(&path.to_string_lossy()))
    }
}

impl FileExp for IPathName {
    fn matches(&self, path: &Path, _entry: &Entry) -> Result<bool, ParfindError> {
        Ok(self.0.matches(&path.to_string_lossy().to_uppercase()))
    }
}

impl fmt::Display for PathName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path({})", self.0)
    }
}

impl fmt::Display for IPathName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ipath({})", self.0)
    }
}
