//! # parfind
//!
//! Fast concurrent file finder — find-style expressions, gitignore-aware,
//! depth-leveled parallel walk.
//!
//! parfind owns the traversal engine: a wildcard matcher specialized for
//! filename shapes, a boolean filter-expression algebra, gitignore-style
//! suppression with last-match-wins overrides, and a walker that scans one
//! full depth level at a time across a bounded worker pool. The `parfind`
//! binary is a thin layer that parses find-style arguments into these pieces.
//!
//! # Quick Start
//!
//! ```rust
//! use parfind::filter::{AndExp, FileName, OrExp};
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::write(dir.path().join("invoice.txt"), "x").unwrap();
//! std::fs::write(dir.path().join("report.md"), "x").unwrap();
//!
//! let mut group = AndExp::default();
//! group.push(Box::new(FileName::new("*.txt")));
//! let mut matcher = OrExp::default();
//! matcher.push(Box::new(group));
//!
//! let walker = parfind::walker()
//!     .matching(matcher)
//!     .output(std::io::sink()) // matched paths stream here
//!     .build()
//!     .unwrap();
//! walker.walk(&[dir.path().to_path_buf()]);
//! assert!(!walker.failed());
//! ```
//!
//! # Semantics worth knowing
//!
//! - An empty match expression matches everything; an empty prune expression
//!   prunes nothing.
//! - Depth levels are strict barriers: nothing at depth *N+1* is scanned
//!   before all of depth *N* finished. Emission order across branches within
//!   a level is unspecified.
//! - A directory matched by the prune expression is still evaluated for
//!   emission; only its expansion is skipped.
//! - Ignore rules compose downward: each directory's `.gitignore` is parsed
//!   once, concatenated after the inherited rules, and shared by reference
//!   with every descendant. `.git` directories reset the inheritance.

#![forbid(unsafe_code)]

pub mod cli;
pub mod filter;

mod builder;
mod entry;
mod error;
mod glob;
mod ignore;
mod walker;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::WalkerBuilder;
pub use entry::{Entry, EntryKind};
pub use error::ParfindError;
pub use glob::Glob;
pub use ignore::{IgnorePattern, IgnoreSet};
pub use walker::Walker;

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`WalkerBuilder`] to configure and run a traversal.
///
/// # Example
///
/// ```rust
/// let walker = parfind::walker()
///     .max_depth(Some(0))
///     .output(std::io::sink())
///     .build()
///     .unwrap();
/// walker.walk(&[std::path::PathBuf::from(".")]);
/// ```
pub fn walker() -> WalkerBuilder {
    WalkerBuilder::default()
}
