//! Boolean filter expressions over filesystem entries.
//!
//! A filter is a tree of [`FileExp`] nodes: leaf predicates (name and path
//! globs, regexes, type, size, executable) combined with [`AndExp`],
//! [`OrExp`] and [`NotExp`]. Evaluation short-circuits and propagates the
//! first predicate error upward. Every node renders a stable textual form
//! used by the dry-run inspection mode.

use std::fmt;
use std::path::Path;

use crate::entry::Entry;
use crate::error::ParfindError;

mod executable;
mod filetype;
mod name;
mod path;
mod regex;
mod size;

pub use executable::Executable;
pub use filetype::FileType;
pub use name::{FileName, IFileName};
pub use path::{IPathName, PathName};
pub use regex::{PathRegex, RegexName};
pub use size::{Size, SizeCmp};

/// A boolean test over an entry and its path.
///
/// Implementations are pure after construction: no hidden state beyond
/// construction-time parameters, safe to call concurrently from the walker's
/// workers.
pub trait FileExp: fmt::Display + Send + Sync {
    fn matches(&self, path: &Path, entry: &Entry) -> Result<bool, ParfindError>;
}

// ---------------------------------------------------------------------------
// Combinators
// ---------------------------------------------------------------------------

/// Conjunction. The empty conjunction is true.
#[derive(Default)]
pub struct AndExp(pub Vec<Box<dyn FileExp>>);

/// Disjunction of alternatives. The empty disjunction is true: an absent
/// match expression matches everything.
#[derive(Default)]
pub struct OrExp(pub Vec<Box<dyn FileExp>>);

/// Negation of a single child.
pub struct NotExp(Box<dyn FileExp>);

/// Constant expression, from `-true` / `-false`.
pub struct AlwaysExp(pub bool);

impl AndExp {
    pub fn push(&mut self, exp: Box<dyn FileExp>) {
        self.0.push(exp);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl OrExp {
    pub fn push(&mut self, exp: Box<dyn FileExp>) {
        self.0.push(exp);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl NotExp {
    pub fn new(exp: Box<dyn FileExp>) -> Self {
        Self(exp)
    }
}

impl FileExp for AndExp {
    fn matches(&self, path: &Path, entry: &Entry) -> Result<bool, ParfindError> {
        for exp in &self.0 {
            if !exp.matches(path, entry)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl FileExp for OrExp {
    fn matches(&self, path: &Path, entry: &Entry) -> Result<bool, ParfindError> {
        if self.0.is_empty() {
            return Ok(true);
        }
        for exp in &self.0 {
            if exp.matches(path, entry)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl FileExp for NotExp {
    fn matches(&self, path: &Path, entry: &Entry) -> Result<bool, ParfindError> {
        Ok(!self.0.matches(path, entry)?)
    }
}

impl FileExp for AlwaysExp {
    fn matches(&self, _path: &Path, _entry: &Entry) -> Result<bool, ParfindError> {
        Ok(self.0)
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn join(f: &mut fmt::Formatter<'_>, exps: &[Box<dyn FileExp>], sep: &str) -> fmt::Result {
    for (i, exp) in exps.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{exp}")?;
    }
    Ok(())
}

impl fmt::Display for AndExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        join(f, &self.0, " * ")
    }
}

impl fmt::Display for OrExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        join(f, &self.0, " + ")
    }
}

impl fmt::Display for NotExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not {}", self.0)
    }
}

impl fmt::Display for AlwaysExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;

    /// A predicate that always fails, for error-propagation tests.
    struct Broken;

    impl FileExp for Broken {
        fn matches(&self, path: &Path, _entry: &Entry) -> Result<bool, ParfindError> {
            Err(ParfindError::Metadata {
                path: path.to_path_buf(),
                kind: std::io::ErrorKind::PermissionDenied,
            })
        }
    }

    impl fmt::Display for Broken {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("broken")
        }
    }

    fn eval(exp: &dyn FileExp) -> Result<bool, ParfindError> {
        let entry = Entry::fake("a.txt", EntryKind::File);
        exp.matches(Path::new("a.txt"), &entry)
    }

    #[test]
    fn empty_and_is_true() {
        assert!(eval(&AndExp::default()).unwrap());
    }

    #[test]
    fn empty_or_is_true() {
        assert!(eval(&OrExp::default()).unwrap());
    }

    #[test]
    fn and_short_circuits() {
        // false && broken never reaches the broken predicate
        let exp = AndExp(vec![Box::new(AlwaysExp(false)), Box::new(Broken)]);
        assert!(!eval(&exp).unwrap());
    }

    #[test]
    fn or_short_circuits() {
        let exp = OrExp(vec![Box::new(AlwaysExp(true)), Box::new(Broken)]);
        assert!(eval(&exp).unwrap());
    }

    #[test]
    fn errors_propagate() {
        let exp = AndExp(vec![Box::new(Broken), Box::new(AlwaysExp(true))]);
        assert!(eval(&exp).is_err());

        let exp = NotExp::new(Box::new(Broken));
        assert!(eval(&exp).is_err());
    }

    #[test]
    fn double_negation() {
        for value in [true, false] {
            let exp = NotExp::new(Box::new(NotExp::new(Box::new(AlwaysExp(value)))));
            assert_eq!(eval(&exp).unwrap(), value);
        }
    }

    #[test]
    fn rendering() {
        let and = AndExp(vec![
            Box::new(AlwaysExp(true)),
            Box::new(NotExp::new(Box::new(AlwaysExp(false)))),
        ]);
        assert_eq!(and.to_string(), "true * not false");

        let or = OrExp(vec![Box::new(AlwaysExp(true)), Box::new(AlwaysExp(false))]);
        assert_eq!(or.to_string(), "true + false");
    }
}
