use std::fmt;
use std::path::Path;

use crate::entry::Entry;
use crate::error::ParfindError;
use crate::filter::FileExp;

/// Comparison direction for `-size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCmp {
    Equal,
    Greater,
    Less,
}

/// `-size [+|-]<n><c|k|M|G>` — compare the entry's byte size.
///
/// No sign means exact equality; `+` strictly greater; `-` strictly less.
/// Units: `c` bytes, `k` KiB, `M` MiB, `G` GiB. The unit is mandatory.
pub struct Size {
    bytes: u64,
    cmp: SizeCmp,
    raw: String,
}

impl Size {
    pub fn new(arg: &str) -> Result<Self, ParfindError> {
        if arg.is_empty() {
            return Err(ParfindError::MissingSizeArgument);
        }
        let (cmp, rest) = match arg.as_bytes()[0] {
            b'+' => (SizeCmp::Greater, &arg[1..]),
            b'-' => (SizeCmp::Less, &arg[1..]),
            _ => (SizeCmp::Equal, arg),
        };
        if rest.is_empty() {
            return Err(ParfindError::InvalidSize(arg.to_string()));
        }

        let unit = rest.chars().next_back().unwrap();
        let scale: u64 = match unit {
            'c' => 1,
            'k' => 1 << 10,
            'M' => 1 << 20,
            'G' => 1 << 30,
            _ => return Err(ParfindError::InvalidSizeUnit(unit)),
        };
        let digits = &rest[..rest.len() - unit.len_utf8()];
        let count: u64 = digits
            .parse()
            .map_err(|_| ParfindError::InvalidSize(arg.to_string()))?;

        Ok(Self {
            bytes: count * scale,
            cmp,
            raw: arg.to_string(),
        })
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn cmp(&self) -> SizeCmp {
        self.cmp
    }
}

impl FileExp for Size {
    fn matches(&self, _path: &Path, entry: &Entry) -> Result<bool, ParfindError> {
        let size = entry.metadata()?.len();
        Ok(match self.cmp {
            SizeCmp::Equal => size == self.bytes,
            SizeCmp::Greater => size > self.bytes,
            SizeCmp::Less => size < self.bytes,
        })
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "size({})", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parsing() {
        let s = Size::new("1k").unwrap();
        assert_eq!(s.bytes(), 1024);
        assert_eq!(s.cmp(), SizeCmp::Equal);

        let s = Size::new("+3c").unwrap();
        assert_eq!(s.bytes(), 3);
        assert_eq!(s.cmp(), SizeCmp::Greater);

        let s = Size::new("-2M").unwrap();
        assert_eq!(s.bytes(), 2 * 1024 * 1024);
        assert_eq!(s.cmp(), SizeCmp::Less);

        let s = Size::new("1G").unwrap();
        assert_eq!(s.bytes(), 1024 * 1024 * 1024);
    }

    #[test]
    fn parse_errors() {
        // missing argument, bare signs, missing or unsupported units
        for arg in ["", "+", "-", "1", "1m", "1K", "kc", "+c"] {
            assert!(Size::new(arg).is_err(), "{arg:?}");
        }
    }

    #[test]
    fn comparison_against_real_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("three.bin");
        fs::write(&path, b"abc").unwrap();
        let entry = Entry::from_root(&path).unwrap();

        let cases = [
            ("3c", true),
            ("2c", false),
            ("+2c", true),
            ("+3c", false),
            ("-4c", true),
            ("-3c", false),
            ("0c", false),
        ];
        for (arg, want) in cases {
            let exp = Size::new(arg).unwrap();
            assert_eq!(exp.matches(&path, &entry).unwrap(), want, "{arg:?}");
        }
    }

    #[test]
    fn empty_file_matches_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, b"").unwrap();
        let entry = Entry::from_root(&path).unwrap();
        assert!(Size::new("0c").unwrap().matches(&path, &entry).unwrap());
    }

    #[test]
    fn rendering() {
        assert_eq!(Size::new("+1k").unwrap().to_string(), "size(+1k)");
    }
}
