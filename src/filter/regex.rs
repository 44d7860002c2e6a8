use std::fmt;
use std::path::Path;

use regex::Regex;

use crate::entry::Entry;
use crate::error::ParfindError;
use crate::filter::FileExp;

/// `-regex` / `-iregex` — anchored whole-string regex over the full path.
pub struct PathRegex(Regex);

/// `-rname` / `-irname` — anchored whole-string regex over the file name.
pub struct RegexName(Regex);

/// Anchor a user pattern so it must cover the whole candidate. The group
/// keeps alternations from escaping the anchors.
fn compile(pattern: &str, insensitive: bool) -> Result<Regex, ParfindError> {
    let anchored = if insensitive {
        format!("^(?i:{pattern})$")
    } else {
        format!("^(?:{pattern})$")
    };
    Ok(Regex::new(&anchored)?)
}

impl PathRegex {
    pub fn new(pattern: &str) -> Result<Self, ParfindError> {
        Ok(Self(compile(pattern, false)?))
    }

    pub fn new_insensitive(pattern: &str) -> Result<Self, ParfindError> {
        Ok(Self(compile(pattern, true)?))
    }
}

impl RegexName {
    pub fn new(pattern: &str) -> Result<Self, ParfindError> {
        Ok(Self(compile(pattern, false)?))
    }

    pub fn new_insensitive(pattern: &str) -> Result<Self, ParfindError> {
        Ok(Self(compile(pattern, true)?))
    }
}

impl FileExp for PathRegex {
    fn matches(&self, path: &Path, _entry: &Entry) -> Result<bool, ParfindError> {
        Ok(self.0.is_match(&path.to_string_lossy()))
    }
}

impl FileExp for RegexName {
    fn matches(&self, _path: &Path, entry: &Entry) -> Result<bool, ParfindError> {
        Ok(self.0.is_match(&entry.name))
    }
}

impl fmt::Display for PathRegex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "regex({})", self.0.as_str())
    }
}

impl fmt::Display for RegexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "regex_name({})", self.0.as_str())
    }
}
