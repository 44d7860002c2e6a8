use std::io::{self, Write};
use std::path::PathBuf;

use crate::error::ParfindError;
use crate::filter::OrExp;
use crate::walker::{WalkOptions, Walker};

// ---------------------------------------------------------------------------
// WalkerBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and executing a walk.
///
/// Created via [`parfind::walker()`](crate::walker()). Configure with chained
/// builder methods, then call [`build()`](WalkerBuilder::build) to get a
/// runnable [`Walker`].
///
/// # Example
///
/// ```rust,ignore
/// let walker = parfind::walker()
///     .matching(expr)
///     .ignore_rules(true)
///     .max_depth(Some(3))
///     .output(std::io::stdout())
///     .build()?;
/// walker.walk(&roots);
/// ```
pub struct WalkerBuilder {
    matcher:       OrExp,
    prunes:        OrExp,
    ignore_rules:  bool,
    ignore_errors: bool,
    max_depth:     Option<usize>,
    threads:       usize,
    print0:        bool,
    global_ignore: Option<PathBuf>,
    out:           Option<Box<dyn Write + Send>>,
    errs:          Option<Box<dyn Write + Send>>,
}

impl Default for WalkerBuilder {
    fn default() -> Self {
        Self {
            matcher:       OrExp::default(),
            prunes:        OrExp::default(),
            ignore_rules:  false,
            ignore_errors: false,
            max_depth:     None,
            threads:       default_threads(),
            print0:        false,
            global_ignore: None,
            out:           None,
            errs:          None,
        }
    }
}

impl WalkerBuilder {
    // ── Expressions ───────────────────────────────────────────────────────

    /// Set the match expression. An empty expression matches everything.
    pub fn matching(mut self, matcher: OrExp) -> Self {
        self.matcher = matcher;
        self
    }

    /// Set the prune expression. A directory it matches is never expanded;
    /// the directory entry itself is still evaluated for emission. An empty
    /// expression prunes nothing.
    pub fn pruning(mut self, prunes: OrExp) -> Self {
        self.prunes = prunes;
        self
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Enable gitignore-style suppression: a `.gitignore` found in a scanned
    /// directory applies to everything below it, with `!`-negation and
    /// last-match-wins overrides.
    pub fn ignore_rules(mut self, yes: bool) -> Self {
        self.ignore_rules = yes;
        self
    }

    /// Log-but-don't-fail mode for per-entry I/O errors: affected branches
    /// are still skipped, but nothing is written to the error sink and the
    /// run is not marked failed.
    pub fn ignore_errors(mut self, yes: bool) -> Self {
        self.ignore_errors = yes;
        self
    }

    /// Maximum traversal depth. `Some(0)` visits the roots only; `None`
    /// (the default) is unlimited.
    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Number of workers for directory scanning.
    ///
    /// Defaults to twice the logical CPU count — the workers spend most of
    /// their time blocked in filesystem calls, so oversubscribing wins.
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = n;
        self
    }

    /// Terminate output records with NUL instead of newline, for consumers
    /// like `xargs -0`.
    pub fn print0(mut self, yes: bool) -> Self {
        self.print0 = yes;
        self
    }

    /// A user-level ignore file parsed once and inherited by every root.
    /// Only consulted when [`ignore_rules`](WalkerBuilder::ignore_rules) is
    /// enabled; a missing file is fine.
    pub fn global_ignore(mut self, path: Option<PathBuf>) -> Self {
        self.global_ignore = path;
        self
    }

    // ── Sinks ─────────────────────────────────────────────────────────────

    /// Where matched paths are written. Defaults to stdout.
    pub fn output(mut self, out: impl Write + Send + 'static) -> Self {
        self.out = Some(Box::new(out));
        self
    }

    /// Where traversal errors are written. Defaults to stderr.
    pub fn errors(mut self, errs: impl Write + Send + 'static) -> Self {
        self.errs = Some(Box::new(errs));
        self
    }

    // ── Build ─────────────────────────────────────────────────────────────

    /// Build the walker and its worker pool.
    ///
    /// # Errors
    ///
    /// Fails only when the thread pool cannot be created.
    pub fn build(self) -> Result<Walker, ParfindError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("parfind-walk-{i}"))
            .build()
            .map_err(|e| ParfindError::ThreadPool(e.to_string()))?;

        let out = self.out.unwrap_or_else(|| Box::new(io::stdout()));
        let errs = self.errs.unwrap_or_else(|| Box::new(io::stderr()));

        let opts = WalkOptions {
            matcher: self.matcher,
            prunes: self.prunes,
            ignore_rules: self.ignore_rules,
            ignore_errors: self.ignore_errors,
            max_depth: self.max_depth,
            separator: if self.print0 { b'\0' } else { b'\n' },
            global_ignore: self.global_ignore,
        };
        Ok(Walker::new(opts, pool, out, errs))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Twice the logical CPU count, with a safe fallback.
fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get() * 2)
        .unwrap_or(8)
}
