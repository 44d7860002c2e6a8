use std::fmt;
use std::path::Path;

use crate::entry::Entry;
use crate::error::ParfindError;
use crate::filter::FileExp;
use crate::glob::Glob;

/// `-name` — glob over the entry's file name.
pub struct FileName(Glob);

/// `-iname` — case-insensitive dual. Pattern and candidate are folded to
/// uppercase; the matching algorithm is the same.
pub struct IFileName(Glob);

impl FileName {
    pub fn new(pattern: &str) -> Self {
        Self(Glob::new(pattern))
    }
}

impl IFileName {
    pub fn new(pattern: &str) -> Self {
        Self(Glob::new(&pattern.to_uppercase()))
    }
}

impl FileExp for FileName {
    fn matches(&self, _path: &Path, entry: &Entry) -> Result<bool, ParfindError> {
        Ok(self.0.matches(&entry.name))
    }
}

impl FileExp for IFileName {
    fn matches(&self, _path: &Path, entry: &Entry) -> Result<bool, ParfindError> {
        Ok(self.0.matches(&entry.name.to_uppercase()))
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "name({})", self.0)
    }
}

impl fmt::Display for IFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "iname({})", self.0)
    }
}
