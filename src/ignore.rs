//! Gitignore-style suppression rules.
//!
//! An [`IgnoreSet`] is an ordered list of negatable path patterns scoped to
//! the directory whose ignore file produced them. Evaluation walks every
//! pattern in registration order and keeps the polarity of the last match —
//! the same override behavior git applies. Sets inherited from parent
//! directories are merged by concatenation into a fresh set; existing sets
//! are never mutated, so every subtree can share its parent's set by
//! reference.
//!
//! The supported subset is the practically-used one: literal segments, `*`
//! wildcards, `#` comments, `!` negation, leading-`/` anchoring, trailing-`/`
//! directory-only rules. `**` needs no special handling — `*` already spans
//! separators in the path globs.

use std::path::Path;
use std::sync::Arc;

use crate::glob::Glob;

/// One parsed ignore rule.
#[derive(Debug)]
pub struct IgnorePattern {
    glob: Glob,
    /// `!`-prefixed rules un-ignore on match.
    negated: bool,
    /// Trailing-`/` rules only apply to directories.
    dir_only: bool,
}

impl IgnorePattern {
    fn applies(&self, path: &str, is_dir: bool) -> bool {
        if self.dir_only && !is_dir {
            return false;
        }
        self.glob.matches(path)
    }
}

/// An ordered, last-match-wins rule list. Shared by reference down the
/// directory tree; never mutated after construction.
#[derive(Debug, Default)]
pub struct IgnoreSet {
    patterns: Vec<Arc<IgnorePattern>>,
}

/// Join a pattern under its scope directory. A scope of `.` (or empty)
/// anchors at the traversal root without inserting a `./` prefix, so the
/// compiled pattern lines up with the paths the walker emits.
fn scoped(scope: &Path, pattern: &str) -> String {
    let scope = scope.to_string_lossy();
    let scope = scope.trim_end_matches('/');
    if scope.is_empty() || scope == "." {
        pattern.to_string()
    } else {
        format!("{scope}/{pattern}")
    }
}

impl IgnoreSet {
    /// Parse ignore-file contents scoped to the directory that holds the file.
    ///
    /// Lines containing a separator are anchored to the scope; a bare name
    /// registers both the anchored form and an any-depth form, so it matches
    /// directly inside the scope and anywhere below it.
    pub fn parse(contents: &str, scope: &Path) -> Self {
        let mut patterns = Vec::new();
        for line in contents.lines() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (negated, line) = match line.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, line),
            };
            let (dir_only, line) = match line.strip_suffix('/') {
                Some(rest) => (true, rest),
                None => (false, line),
            };
            if line.is_empty() {
                continue;
            }

            let push = |patterns: &mut Vec<Arc<IgnorePattern>>, pat: String| {
                patterns.push(Arc::new(IgnorePattern {
                    glob: Glob::new(&pat),
                    negated,
                    dir_only,
                }));
            };

            if line.contains('/') {
                // Anchored rule: leading slash is already implied by the join.
                push(&mut patterns, scoped(scope, line.trim_start_matches('/')));
            } else {
                // Bare name: inside the scope, and at any depth below it.
                push(&mut patterns, scoped(scope, line));
                push(&mut patterns, scoped(scope, &format!("*/{line}")));
            }
        }
        Self { patterns }
    }

    /// Apply every rule in order; the last matching rule decides. A path no
    /// rule matches is not ignored.
    pub fn matches(&self, path: &str, is_dir: bool) -> bool {
        let mut ignored = false;
        for pattern in &self.patterns {
            if pattern.applies(path, is_dir) {
                ignored = !pattern.negated;
            }
        }
        ignored
    }

    /// Concatenate parent rules before child rules into a new shared set.
    ///
    /// Order matters: the child's rules come last, so they win ties against
    /// inherited rules. An absent or empty side returns the other unchanged —
    /// a reference clone, not a copy.
    pub fn merge(
        parent: Option<&Arc<IgnoreSet>>,
        child: Option<Arc<IgnoreSet>>,
    ) -> Option<Arc<IgnoreSet>> {
        let parent = parent.filter(|s| !s.is_empty());
        let child = child.filter(|s| !s.is_empty());
        match (parent, child) {
            (None, child) => child,
            (Some(parent), None) => Some(Arc::clone(parent)),
            (Some(parent), Some(child)) => {
                let mut patterns =
                    Vec::with_capacity(parent.patterns.len() + child.patterns.len());
                patterns.extend(parent.patterns.iter().cloned());
                patterns.extend(child.patterns.iter().cloned());
                Some(Arc::new(Self { patterns }))
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
