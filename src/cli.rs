//! Command-line glue: find-style argument parsing and the run driver.
//!
//! The grammar is order-sensitive — `-not` binds to the next primary, `-o`
//! splits alternatives, `-prune` captures every expression before it — so the
//! token stream is parsed with an explicit loop rather than a declarative
//! flag library.

use std::io::Write;
use std::mem;
use std::path::PathBuf;

use crate::builder::WalkerBuilder;
use crate::error::ParfindError;
use crate::filter::{
    AlwaysExp, AndExp, Executable, FileExp, FileName, FileType, IFileName, IPathName, NotExp,
    OrExp, PathName, PathRegex, RegexName, Size,
};

/// Per-user ignore file looked up under the home directory when `-I` is set.
const GLOBAL_IGNORE_FILENAME: &str = ".parfindignore";

pub const USAGE: &str = r#"
Usage: parfind [starting-point...] [flag] [expression]

Parfind is a fast file finder that provides an interface similar to find.

flags are:
  -dry
    Only output the parse result of the expression.
    If this option is specified, the file will not be searched.
  -ignore-error
    Not show errors when opening files, such as permission errors.
  -maxdepth n
    The depth to search. A negative value means unlimited.
    Unlike find, it can be specified at the same time as prune.
  -I
    Ignore files in .gitignore and ~/.parfindignore.

expression are:
  -a -and
    This flag is skipped.
  -empty
    Search empty file and directory.
    This is shorthand of '-size 0c'.
  -executable
    Match files which are executable by current user.
  -false
    Always false.
  -iname string
    Like -name, but the match is case insensitive.
  -ipath string
    Like -path, but the match is case insensitive.
  -iregex string
    Like -regex, but the match is case insensitive.
  -irname string
    Like -rname, but the match is case insensitive.
  -name string
    Search for files using glob expressions.
    This option match only to file name.
  -not
    True if next expression false.
  -o -or
    Evaluate the previous and next expressions with or.
  -path string
    Search for files using wildcard expressions.
    This option match to file path.
  -print
    Add a new line character after the file name. This option is default enabled.
  -print0
    Add a null character after the file name.
  -prune
    Prunes directory that match before expressions.
    example: <expression> -prune
  -regex string
    Search for files using regular expressions.
    This option match to file path.
  -rname string
    Search for files using regular expressions.
    This option match only to file name.
  -size [+|-]n[ckMG]
    The size of file. Should specify the unit of size.
    c(for bytes), k(for KiB), M(for MiB), G(for GiB).
  -true
    Always true.
  -type string
    File is type.
    Support file(f), directory(d), named pipe(p) and socket(s).
"#;

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

struct Parsed {
    roots: Vec<PathBuf>,
    matcher: OrExp,
    prunes: OrExp,
    dry: bool,
    help: bool,
    ignore_rules: bool,
    ignore_errors: bool,
    print0: bool,
    max_depth: Option<usize>,
}

fn parse_args(args: &[String]) -> Result<Parsed, ParfindError> {
    let mut parsed = Parsed {
        roots: Vec::new(),
        matcher: OrExp::default(),
        prunes: OrExp::default(),
        dry: false,
        help: false,
        ignore_rules: false,
        ignore_errors: false,
        print0: false,
        max_depth: None,
    };
    let mut group = AndExp::default();
    let mut is_not = false;

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        i += 1;
        if !arg.starts_with('-') {
            parsed.roots.push(PathBuf::from(arg));
            continue;
        }
        match arg {
            "-h" | "-help" | "--help" => parsed.help = true,

            // flags
            "-dry" => parsed.dry = true,
            "-I" => parsed.ignore_rules = true,
            "-ignore-error" => parsed.ignore_errors = true,
            "-print" => parsed.print0 = false,
            "-print0" => parsed.print0 = true,
            "-maxdepth" => {
                let v = value(args, &mut i, arg)?;
                let depth: i64 = v.parse().map_err(|_| {
                    ParfindError::InvalidArgument(format!("{v} is invalid maxdepth"))
                })?;
                parsed.max_depth = usize::try_from(depth).ok();
            }

            // operators
            "-a" | "-and" => {}
            "-not" => is_not = true,
            "-o" | "-or" => {
                if !group.is_empty() {
                    parsed.matcher.push(Box::new(mem::take(&mut group)));
                }
            }
            "-prune" => {
                // Everything parsed so far becomes the prune expression.
                if !group.is_empty() {
                    parsed.matcher.push(Box::new(mem::take(&mut group)));
                }
                parsed.prunes.0.append(&mut parsed.matcher.0);
            }

            // primaries
            "-empty" => push(&mut group, &mut is_not, Box::new(Size::new("0c")?)),
            "-executable" => push(&mut group, &mut is_not, Box::new(Executable)),
            "-true" => push(&mut group, &mut is_not, Box::new(AlwaysExp(true))),
            "-false" => push(&mut group, &mut is_not, Box::new(AlwaysExp(false))),
            "-name" => {
                let v = value(args, &mut i, arg)?;
                push(&mut group, &mut is_not, Box::new(FileName::new(v)));
            }
            "-iname" => {
                let v = value(args, &mut i, arg)?;
                push(&mut group, &mut is_not, Box::new(IFileName::new(v)));
            }
            "-path" => {
                let v = value(args, &mut i, arg)?;
                push(&mut group, &mut is_not, Box::new(PathName::new(v)));
            }
            "-ipath" => {
                let v = value(args, &mut i, arg)?;
                push(&mut group, &mut is_not, Box::new(IPathName::new(v)));
            }
            "-regex" => {
                let v = value(args, &mut i, arg)?;
                push(&mut group, &mut is_not, Box::new(PathRegex::new(v)?));
            }
            "-iregex" => {
                let v = value(args, &mut i, arg)?;
                push(&mut group, &mut is_not, Box::new(PathRegex::new_insensitive(v)?));
            }
            "-rname" => {
                let v = value(args, &mut i, arg)?;
                push(&mut group, &mut is_not, Box::new(RegexName::new(v)?));
            }
            "-irname" => {
                let v = value(args, &mut i, arg)?;
                push(&mut group, &mut is_not, Box::new(RegexName::new_insensitive(v)?));
            }
            "-type" => {
                let v = value(args, &mut i, arg)?;
                push(&mut group, &mut is_not, Box::new(FileType::new(v)?));
            }
            "-size" => {
                let v = value(args, &mut i, arg)?;
                push(&mut group, &mut is_not, Box::new(Size::new(v)?));
            }

            _ => {
                return Err(ParfindError::InvalidArgument(format!(
                    "unknown option {arg}"
                )))
            }
        }
    }

    // The trailing group always joins the match expression; when no
    // expression was given at all this leaves a vacuous alternative, so an
    // absent expression matches everything.
    parsed.matcher.push(Box::new(group));

    if parsed.roots.is_empty() {
        parsed.roots.push(PathBuf::from("."));
    }
    Ok(parsed)
}

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, ParfindError> {
    let v = args
        .get(*i)
        .ok_or_else(|| ParfindError::InvalidArgument(format!("missing argument for {flag}")))?;
    *i += 1;
    Ok(v)
}

fn push(group: &mut AndExp, is_not: &mut bool, exp: Box<dyn FileExp>) {
    if mem::take(is_not) {
        group.push(Box::new(NotExp::new(exp)));
    } else {
        group.push(exp);
    }
}

fn global_ignore_path() -> Option<PathBuf> {
    std::env::var_os("PARFIND_IGNORE")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(GLOBAL_IGNORE_FILENAME)))
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Parse `args` (including the program name), run the walk, and report the
/// outcome. Matched paths go to `out`, traversal errors to `errout`.
pub fn run<O, E>(args: &[String], out: O, mut errout: E) -> Result<(), ParfindError>
where
    O: Write + Send + 'static,
    E: Write + Send + 'static,
{
    let parsed = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(parsed) => parsed,
        Err(err) => {
            let _ = write!(errout, "{USAGE}");
            return Err(err);
        }
    };
    if parsed.help {
        let _ = write!(errout, "{USAGE}");
        return Ok(());
    }

    let global_ignore = parsed.ignore_rules.then(global_ignore_path).flatten();
    let walker = WalkerBuilder::default()
        .matching(parsed.matcher)
        .pruning(parsed.prunes)
        .ignore_rules(parsed.ignore_rules)
        .ignore_errors(parsed.ignore_errors)
        .max_depth(parsed.max_depth)
        .print0(parsed.print0)
        .global_ignore(global_ignore)
        .output(out)
        .errors(errout)
        .build()?;

    if parsed.dry {
        walker.dry_run(&parsed.roots);
        return Ok(());
    }

    walker.walk(&parsed.roots);
    if walker.failed() {
        return Err(ParfindError::WalkFailed);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(command: &str) -> Parsed {
        let args: Vec<String> = command.split_whitespace().map(String::from).collect();
        parse_args(&args).unwrap()
    }

    #[test]
    fn roots_default_to_cwd() {
        let parsed = parse("-name *.rs");
        assert_eq!(parsed.roots, vec![PathBuf::from(".")]);
    }

    #[test]
    fn roots_collect_before_and_after_flags() {
        let parsed = parse("a b -maxdepth 2 c");
        assert_eq!(
            parsed.roots,
            vec![PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("c")]
        );
        assert_eq!(parsed.max_depth, Some(2));
    }

    #[test]
    fn negative_maxdepth_means_unlimited() {
        assert_eq!(parse("-maxdepth -1").max_depth, None);
        assert_eq!(parse("-maxdepth 0").max_depth, Some(0));
    }

    #[test]
    fn or_splits_alternatives() {
        let parsed = parse("-name *.png -o -name *.jpg");
        assert_eq!(parsed.matcher.to_string(), "name(*.png) + name(*.jpg)");
    }

    #[test]
    fn not_binds_to_the_next_primary_only() {
        let parsed = parse("-not -name *.png -type f");
        assert_eq!(parsed.matcher.to_string(), "not name(*.png) * type(file)");
    }

    #[test]
    fn prune_captures_everything_before_it() {
        let parsed = parse("-name jpg* -o -name png* -prune -irname (1|2).*");
        assert_eq!(parsed.prunes.to_string(), "name(jpg*) + name(png*)");
        assert_eq!(
            parsed.matcher.to_string(),
            "regex_name(^(?i:(1|2).*)$)"
        );
    }

    #[test]
    fn empty_is_size_zero_sugar() {
        let parsed = parse("-empty");
        assert_eq!(parsed.matcher.to_string(), "size(0c)");
    }

    #[test]
    fn and_tokens_are_skipped() {
        let parsed = parse("-type f -a -name *.rs -and -true");
        assert_eq!(
            parsed.matcher.to_string(),
            "type(file) * name(*.rs) * true"
        );
    }

    #[test]
    fn trailing_or_leaves_a_vacuous_alternative() {
        // Same behavior as the flag-hook original: the final group joins the
        // disjunction even when empty, and an empty group is vacuously true.
        let parsed = parse("-name a -o");
        assert_eq!(parsed.matcher.to_string(), "name(a) + ");
    }

    #[test]
    fn construction_errors_surface_eagerly() {
        let args = |s: &str| s.split_whitespace().map(String::from).collect::<Vec<_>>();
        assert!(parse_args(&args("-size 1m")).is_err());
        assert!(parse_args(&args("-type x")).is_err());
        assert!(parse_args(&args("-regex (unclosed")).is_err());
        assert!(parse_args(&args("-maxdepth two")).is_err());
        assert!(parse_args(&args("-name")).is_err());
        assert!(parse_args(&args("-unknown")).is_err());
    }

    #[test]
    fn flags_parse() {
        let parsed = parse("-I -dry -ignore-error -print0");
        assert!(parsed.ignore_rules);
        assert!(parsed.dry);
        assert!(parsed.ignore_errors);
        assert!(parsed.print0);
    }
}
