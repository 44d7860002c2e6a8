use std::fmt;
use std::path::Path;

use crate::entry::Entry;
use crate::error::ParfindError;
use crate::filter::FileExp;

/// `-executable` — true when any execute permission bit is set, whichever
/// principal holds it.
pub struct Executable;

#[cfg(unix)]
const EXEC_BITS: u32 = 0o111;

impl FileExp for Executable {
    #[cfg(unix)]
    fn matches(&self, _path: &Path, entry: &Entry) -> Result<bool, ParfindError> {
        use std::os::unix::fs::PermissionsExt;
        let meta = entry.metadata()?;
        Ok(meta.permissions().mode() & EXEC_BITS != 0)
    }

    #[cfg(not(unix))]
    fn matches(&self, _path: &Path, _entry: &Entry) -> Result<bool, ParfindError> {
        Ok(false)
    }
}

impl fmt::Display for Executable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("executable")
    }
}
