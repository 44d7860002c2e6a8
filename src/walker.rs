//! The traversal core: a depth-leveled, concurrent directory walker.
//!
//! Traversal proceeds one full depth level at a time. Every queued directory
//! of level *N* is scanned on a bounded worker pool and fully drained before
//! any level *N+1* work starts; directories discovered during a scan are
//! appended to a shared frontier that is swapped out between levels. Within a
//! level, emission order across branches is unspecified — the output sink is
//! serialized, not globally ordered.

use std::fmt;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, error};

use crate::entry::Entry;
use crate::error::ParfindError;
use crate::filter::{FileExp, OrExp};
use crate::ignore::IgnoreSet;

/// Per-directory ignore rule file.
pub(crate) const IGNORE_FILENAME: &str = ".gitignore";

/// Children of this directory never inherit ignore rules — rules written for
/// tracked content must not filter git's own metadata.
const GIT_DIR: &str = ".git";

/// Starting sink buffer. Frequent small writes dominate a large walk, so the
/// buffer starts big enough to batch them.
const SINK_BUFFER: usize = 1 << 10;

/// Matched output is flushed at least this often during long traversals.
const FLUSH_INTERVAL: Duration = Duration::from_millis(500);

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// A mutex-guarded, buffered byte sink with periodic flushing.
struct Sink {
    out: BufWriter<Box<dyn Write + Send>>,
    last_flush: Instant,
}

impl Sink {
    fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: BufWriter::with_capacity(SINK_BUFFER, out),
            last_flush: Instant::now(),
        }
    }

    fn write_record(&mut self, record: &[u8], separator: u8) -> io::Result<()> {
        self.out.write_all(record)?;
        self.out.write_all(&[separator])?;
        if self.last_flush.elapsed() >= FLUSH_INTERVAL {
            self.out.flush()?;
            self.last_flush = Instant::now();
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

// ---------------------------------------------------------------------------
// Walker
// ---------------------------------------------------------------------------

/// One directory queued for the next depth level, carrying the ignore rules
/// its children inherit. The set is shared by reference — composing a deeper
/// scope builds a new set and leaves this one untouched.
struct Target {
    path: PathBuf,
    ignore: Option<Arc<IgnoreSet>>,
}

/// Traversal parameters passed from the builder to the walker.
///
/// `pub(crate)` — not part of the public API. Callers configure these via
/// the builder methods.
pub(crate) struct WalkOptions {
    pub matcher: OrExp,
    pub prunes: OrExp,
    pub ignore_rules: bool,
    pub ignore_errors: bool,
    pub max_depth: Option<usize>,
    pub separator: u8,
    pub global_ignore: Option<PathBuf>,
}

/// The traversal engine. Built by [`WalkerBuilder`](crate::WalkerBuilder);
/// run with [`walk`](Walker::walk).
pub struct Walker {
    opts: WalkOptions,
    pool: rayon::ThreadPool,
    out: Mutex<Sink>,
    errs: Mutex<Sink>,
    targets: Mutex<Vec<Target>>,
    failed: AtomicBool,
}

impl Walker {
    pub(crate) fn new(
        opts: WalkOptions,
        pool: rayon::ThreadPool,
        out: Box<dyn Write + Send>,
        errs: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            opts,
            pool,
            out: Mutex::new(Sink::new(out)),
            errs: Mutex::new(Sink::new(errs)),
            targets: Mutex::new(Vec::new()),
            failed: AtomicBool::new(false),
        }
    }

    /// Walk every root to completion.
    ///
    /// Roots are evaluated like any other entry (emitted when they match),
    /// then each depth level is scanned in parallel and fully drained before
    /// the next one starts. Traversal errors are reported to the error sink
    /// and abandon only their own branch; check [`failed`](Walker::failed)
    /// afterwards.
    pub fn walk(&self, roots: &[PathBuf]) {
        let inherited = self.load_global_ignore();
        for root in roots {
            match Entry::from_root(root) {
                Ok(entry) => self.walk_root(root.clone(), &entry, inherited.as_ref()),
                Err(e) => self.report(ParfindError::io(root.clone(), e)),
            }
        }

        let mut depth = 1usize;
        while self.opts.max_depth.map_or(true, |max| depth <= max) {
            let batch = mem::take(&mut *self.targets.lock());
            if batch.is_empty() {
                break;
            }
            debug!(depth, dirs = batch.len(), "scanning depth level");
            self.pool
                .install(|| batch.par_iter().for_each(|target| self.scan_dir(target)));
            depth += 1;
        }

        self.finish();
    }

    /// Whether any traversal error was reported during [`walk`](Walker::walk).
    pub fn failed(&self) -> bool {
        self.failed.load(Ordering::Relaxed)
    }

    /// Write the dry-run description — targets plus the compiled expressions —
    /// to the matches sink without touching the filesystem.
    pub fn dry_run(&self, roots: &[PathBuf]) {
        let targets = roots
            .iter()
            .map(|r| r.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        let mut out = self.out.lock();
        if let Err(e) = out.write_record(format!("targets=[{targets}] {self}").as_bytes(), b'\n') {
            error!("write matches sink: {e}");
        }
        if let Err(e) = out.flush() {
            error!("flush matches sink: {e}");
        }
    }

    /// A root is never prune-blocked from expansion: prune governs descent
    /// decisions below a root, while the roots were asked for explicitly.
    fn walk_root(&self, path: PathBuf, entry: &Entry, ignores: Option<&Arc<IgnoreSet>>) {
        if self.is_ignored(&path, entry, ignores) {
            return;
        }
        if !self.emit_if_match(&path, entry) {
            return;
        }
        if entry.is_dir() {
            self.enqueue(path, entry, ignores);
        }
    }

    /// Classify one entry: suppress, emit, enqueue.
    fn walk_entry(&self, path: PathBuf, entry: &Entry, ignores: Option<&Arc<IgnoreSet>>) {
        if self.is_ignored(&path, entry, ignores) {
            return;
        }
        // The match expression sees the directory entry even when the prune
        // expression will stop its expansion right after.
        if !self.emit_if_match(&path, entry) {
            return;
        }
        if entry.is_dir() {
            if !self.opts.prunes.is_empty() {
                match self.opts.prunes.matches(&path, entry) {
                    Ok(true) => return,
                    Ok(false) => {}
                    Err(e) => {
                        self.report(e);
                        return;
                    }
                }
            }
            self.enqueue(path, entry, ignores);
        }
    }

    fn is_ignored(&self, path: &Path, entry: &Entry, ignores: Option<&Arc<IgnoreSet>>) -> bool {
        match ignores {
            Some(set) => set.matches(&path.to_string_lossy(), entry.is_dir()),
            None => false,
        }
    }

    /// Evaluate the match expression and emit on success. Returns false only
    /// when evaluation failed and the branch should be abandoned.
    fn emit_if_match(&self, path: &Path, entry: &Entry) -> bool {
        match self.opts.matcher.matches(path, entry) {
            Ok(true) => {
                self.emit(path);
                true
            }
            Ok(false) => true,
            Err(e) => {
                self.report(e);
                false
            }
        }
    }

    fn enqueue(&self, path: PathBuf, entry: &Entry, ignores: Option<&Arc<IgnoreSet>>) {
        let ignore = if entry.name == GIT_DIR {
            None
        } else {
            ignores.map(Arc::clone)
        };
        self.targets.lock().push(Target { path, ignore });
    }

    /// Scan one queued directory: read children, pick up a fresh ignore file
    /// if one is present, and classify every child against the merged rules.
    fn scan_dir(&self, target: &Target) {
        let children = match read_dir(&target.path) {
            Ok(children) => children,
            Err(e) => {
                self.report(e);
                return;
            }
        };

        let mut ignores = target.ignore.clone();
        if self.opts.ignore_rules && children.iter().any(|d| d.file_name() == IGNORE_FILENAME) {
            match self.load_ignore_file(&target.path) {
                Ok(fresh) => ignores = IgnoreSet::merge(target.ignore.as_ref(), Some(fresh)),
                Err(e) => {
                    self.report(e);
                    return;
                }
            }
        }

        for dent in &children {
            let path = join_path(&target.path, dent);
            match Entry::from_dir_entry(path.clone(), dent) {
                Ok(entry) => self.walk_entry(path, &entry, ignores.as_ref()),
                Err(e) => self.report(ParfindError::io(path, e)),
            }
        }
    }

    fn load_ignore_file(&self, dir: &Path) -> Result<Arc<IgnoreSet>, ParfindError> {
        let path = dir.join(IGNORE_FILENAME);
        let contents =
            fs::read_to_string(&path).map_err(|e| ParfindError::io(path.clone(), e))?;
        Ok(Arc::new(IgnoreSet::parse(&contents, dir)))
    }

    /// Parse the global ignore file once; its rules become every root's
    /// inherited set. A missing file is not an error.
    fn load_global_ignore(&self) -> Option<Arc<IgnoreSet>> {
        if !self.opts.ignore_rules {
            return None;
        }
        let path = self.opts.global_ignore.as_ref()?;
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                self.report(ParfindError::io(path.clone(), e));
                return None;
            }
        };
        let set = IgnoreSet::parse(&contents, Path::new("."));
        if set.is_empty() {
            None
        } else {
            Some(Arc::new(set))
        }
    }

    fn emit(&self, path: &Path) {
        let mut out = self.out.lock();
        if let Err(e) = out.write_record(path.to_string_lossy().as_bytes(), self.opts.separator) {
            error!("write matches sink: {e}");
        }
    }

    fn report(&self, err: ParfindError) {
        if self.opts.ignore_errors && err.is_recoverable() {
            return;
        }
        self.failed.store(true, Ordering::Relaxed);
        let mut errs = self.errs.lock();
        if let Err(e) = errs.write_record(err.to_string().as_bytes(), b'\n') {
            error!("write error sink: {e}");
        }
    }

    /// Buffered output survives until here; a crash mid-run loses at most one
    /// flush interval of it.
    fn finish(&self) {
        if let Err(e) = self.out.lock().flush() {
            error!("flush matches sink: {e}");
        }
        if let Err(e) = self.errs.lock().flush() {
            error!("flush error sink: {e}");
        }
    }
}

impl fmt::Display for Walker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.opts.ignore_rules {
            write!(f, "ignore=true ")?;
        }
        if let Some(depth) = self.opts.max_depth {
            write!(f, "maxdepth={depth} ")?;
        }
        if !self.opts.prunes.is_empty() {
            write!(f, "prunes=[{}] ", self.opts.prunes)?;
        }
        write!(f, "condition=[{}]", self.opts.matcher)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_dir(dir: &Path) -> Result<Vec<fs::DirEntry>, ParfindError> {
    let iter = fs::read_dir(dir).map_err(|e| ParfindError::io(dir.to_path_buf(), e))?;
    let mut children = Vec::new();
    for dent in iter {
        children.push(dent.map_err(|e| ParfindError::io(dir.to_path_buf(), e))?);
    }
    Ok(children)
}

/// Join a child name under its directory without growing a `./` prefix:
/// paths are emitted the way the roots were supplied, and `.` as a root
/// emits bare relative paths.
fn join_path(dir: &Path, dent: &fs::DirEntry) -> PathBuf {
    if dir == Path::new(".") {
        PathBuf::from(dent.file_name())
    } else {
        dir.join(dent.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{AlwaysExp, AndExp, FileType, IPathName, NotExp, PathRegex};

    fn quiet_walker(matcher: OrExp, prunes: OrExp, ignore_rules: bool, depth: Option<usize>) -> Walker {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let opts = WalkOptions {
            matcher,
            prunes,
            ignore_rules,
            ignore_errors: false,
            max_depth: depth,
            separator: b'\n',
            global_ignore: None,
        };
        Walker::new(opts, pool, Box::new(io::sink()), Box::new(io::sink()))
    }

    #[test]
    fn display_renders_flags_then_prunes_then_condition() {
        let mut prunes = OrExp::default();
        let mut prune_group = AndExp::default();
        prune_group.push(Box::new(FileType::new("f").unwrap()));
        prune_group.push(Box::new(IPathName::new("txt/*")));
        prunes.push(Box::new(prune_group));

        let mut matcher = OrExp::default();
        let mut group = AndExp::default();
        group.push(Box::new(NotExp::new(Box::new(
            PathRegex::new(r".*\.name").unwrap(),
        ))));
        matcher.push(Box::new(group));

        let walker = quiet_walker(matcher, prunes, true, None);
        assert_eq!(
            walker.to_string(),
            r"ignore=true prunes=[type(file) * ipath(TXT/*)] condition=[not regex(^(?:.*\.name)$)]"
        );
    }

    #[test]
    fn display_skips_absent_pieces() {
        let mut matcher = OrExp::default();
        matcher.push(Box::new(AlwaysExp(true)));
        let walker = quiet_walker(matcher, OrExp::default(), false, Some(2));
        assert_eq!(walker.to_string(), "maxdepth=2 condition=[true]");
    }
}
