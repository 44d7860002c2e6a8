//! Wildcard pattern matching specialized for filename shapes.
//!
//! Supports `*` (any run of characters, including none) and `?` (exactly one
//! character). Compilation classifies the pattern once into one of four fast
//! paths — equality, fixed prefix, fixed suffix, substring containment — and
//! falls back to a dynamic-programming matcher for everything else
//! (`?` anywhere, or `*` mixed into the middle of literals).
//!
//! Case-insensitive matching is not a separate algorithm: callers fold both
//! pattern and candidate before compiling/matching.

use std::fmt;

use parking_lot::Mutex;

/// Scratch rows kept per compiled pattern beyond which released rows are
/// dropped instead of pooled.
const MAX_POOLED_ROWS: usize = 8;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// How a compiled pattern is matched. Decided once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchKind {
    /// No wildcards — plain equality.
    Equal,

    /// `prefix*` (trailing stars only) — compare the first `n` bytes.
    Forward(usize),

    /// `*suffix` (leading stars only) — compare the last `n` bytes.
    Backward(usize),

    /// `*literal*` — substring containment of `pattern[start..end]`.
    ForwardBackward { start: usize, end: usize },

    /// Anything else — run the DP matcher.
    General,
}

fn classify(pattern: &str) -> MatchKind {
    let b = pattern.as_bytes();
    if b.contains(&b'?') {
        return MatchKind::General;
    }
    let Some(first_star) = b.iter().position(|&c| c == b'*') else {
        return MatchKind::Equal;
    };
    if first_star > 0 {
        // Literal head. Forward only if every remaining byte is a star.
        if b[first_star..].iter().all(|&c| c == b'*') {
            return MatchKind::Forward(first_star);
        }
        return MatchKind::General;
    }
    // Leading star run.
    let run = b.iter().take_while(|&&c| c == b'*').count();
    if run == b.len() {
        // All stars: degenerate Backward with an empty suffix.
        return MatchKind::Backward(0);
    }
    let rest = &b[run..];
    match rest.iter().position(|&c| c == b'*') {
        // One literal run to the end: fixed suffix.
        None => MatchKind::Backward(rest.len()),
        // A star closes the literal: ForwardBackward only if the tail is all stars.
        Some(lit_len) if rest[lit_len..].iter().all(|&c| c == b'*') => MatchKind::ForwardBackward {
            start: run,
            end: run + lit_len,
        },
        Some(_) => MatchKind::General,
    }
}

// ---------------------------------------------------------------------------
// Glob
// ---------------------------------------------------------------------------

/// A compiled wildcard pattern.
///
/// Construction never fails — any string is a valid pattern over the
/// supported alphabet. A `Glob` is safe to share across threads: the DP
/// scratch rows live in a per-pattern pool and every `matches` call checks
/// out its own rows.
pub struct Glob {
    pattern: String,
    kind: MatchKind,

    // General-case state. Empty for the fast paths.
    runes: Vec<char>,
    rows: Mutex<Vec<Vec<bool>>>,
}

impl Glob {
    pub fn new(pattern: &str) -> Self {
        let kind = classify(pattern);
        let runes = match kind {
            MatchKind::General => pattern.chars().collect(),
            _ => Vec::new(),
        };
        Self {
            pattern: pattern.to_string(),
            kind,
            runes,
            rows: Mutex::new(Vec::new()),
        }
    }

    /// The raw pattern this glob was compiled from.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Whether `text` matches the whole pattern.
    pub fn matches(&self, text: &str) -> bool {
        match self.kind {
            MatchKind::Equal => self.pattern == text,
            MatchKind::Forward(n) => {
                text.len() >= n && text.as_bytes()[..n] == self.pattern.as_bytes()[..n]
            }
            MatchKind::Backward(n) => {
                text.len() >= n
                    && text.as_bytes()[text.len() - n..]
                        == self.pattern.as_bytes()[self.pattern.len() - n..]
            }
            MatchKind::ForwardBackward { start, end } => text.contains(&self.pattern[start..end]),
            MatchKind::General => self.match_general(text),
        }
    }

    /// Wildcard DP over rune sequences.
    ///
    /// Rows correspond to pattern characters, columns to candidate prefixes;
    /// only two rows are live at once. `first` tracks the leftmost column
    /// that can still participate in a match so eliminated prefixes are never
    /// rescanned, and a row with no true columns fails the whole match early.
    fn match_general(&self, text: &str) -> bool {
        if self.runes.is_empty() {
            return text.is_empty();
        }
        let text: Vec<char> = text.chars().collect();
        let n = text.len();
        let (mut prev, mut cur) = self.acquire_rows();

        prev.resize(n + 1, false);
        prev[0] = true; // empty pattern prefix matches empty candidate prefix

        let mut first = 0usize;
        let last = self.runes.len() - 1;
        for (i, &pc) in self.runes.iter().enumerate() {
            cur.clear();
            cur.resize(n + 1, false);
            if pc == '*' {
                if i == last {
                    // Some candidate prefix matched everything before this
                    // star, and the star swallows the rest.
                    self.release_rows(prev, cur);
                    return true;
                }
                for slot in cur.iter_mut().skip(first) {
                    *slot = true;
                }
            } else {
                let mut live = usize::MAX;
                for j in (first + 1)..=n {
                    let ok = prev[j - 1] && (pc == '?' || text[j - 1] == pc);
                    if ok && live == usize::MAX {
                        live = j;
                    }
                    cur[j] = ok;
                }
                if live == usize::MAX {
                    self.release_rows(prev, cur);
                    return false;
                }
                first = live;
            }
            std::mem::swap(&mut prev, &mut cur);
        }

        let matched = prev[n];
        self.release_rows(prev, cur);
        matched
    }

    fn acquire_rows(&self) -> (Vec<bool>, Vec<bool>) {
        let mut pool = self.rows.lock();
        let a = pool.pop().unwrap_or_default();
        let b = pool.pop().unwrap_or_default();
        (a, b)
    }

    /// Rows go back empty: capacity is reused, contents never outlive a call.
    fn release_rows(&self, a: Vec<bool>, b: Vec<bool>) {
        let mut pool = self.rows.lock();
        for mut row in [a, b] {
            if pool.len() >= MAX_POOLED_ROWS {
                break;
            }
            row.clear();
            pool.push(row);
        }
    }

    /// Compile with the fast paths disabled. Test-only: lets property tests
    /// check that every fast path agrees with the DP.
    #[cfg(test)]
    fn general(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            kind: MatchKind::General,
            runes: pattern.chars().collect(),
            rows: Mutex::new(Vec::new()),
        }
    }
}

impl fmt::Display for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl fmt::Debug for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Glob")
            .field("pattern", &self.pattern)
            .field("kind", &self.kind)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
