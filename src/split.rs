// Byte-range split lists.
//
// A split list is a text file with one extraction per line:
//
//   0x000200,0x000400,assets/title/tiles.bin
//
// Offsets are hexadecimal with a mandatory 0x prefix; the range is
// half-open. Path separators are accepted in either style and normalized
// to the platform. Parsing and slicing live here; writing the files out
// is the CLI's job.

use std::path::{PathBuf, MAIN_SEPARATOR_STR};

/// Split-list failures.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("line {line}: expected 0xSTART,0xEND,PATH, got {text:?}")]
    BadLine { line: usize, text: String },

    #[error("line {line}: range 0x{start:X}..0x{end:X} is empty or reversed")]
    EmptyRange {
        line: usize,
        start: usize,
        end: usize,
    },

    #[error("range 0x{start:X}..0x{end:X} exceeds the {len}-byte image")]
    OutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },
}

/// One line of a split list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitEntry {
    pub start: usize,
    pub end: usize,
    pub path: PathBuf,
}

/// Parse a split list. Blank lines are skipped.
pub fn parse_list(text: &str) -> Result<Vec<SplitEntry>, SplitError> {
    let mut entries = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let bad = || SplitError::BadLine {
            line,
            text: raw.to_owned(),
        };
        let mut fields = trimmed.splitn(3, ',');
        let start = parse_hex(fields.next().ok_or_else(bad)?).ok_or_else(bad)?;
        let end = parse_hex(fields.next().ok_or_else(bad)?).ok_or_else(bad)?;
        let path = fields.next().ok_or_else(bad)?.trim();
        if path.is_empty() {
            return Err(bad());
        }
        if start >= end {
            return Err(SplitError::EmptyRange { line, start, end });
        }
        entries.push(SplitEntry {
            start,
            end,
            path: normalize_separators(path),
        });
    }
    Ok(entries)
}

/// Slice the entry's range out of `data`.
pub fn extract<'a>(data: &'a [u8], entry: &SplitEntry) -> Result<&'a [u8], SplitError> {
    data.get(entry.start..entry.end)
        .ok_or(SplitError::OutOfBounds {
            start: entry.start,
            end: entry.end,
            len: data.len(),
        })
}

fn parse_hex(field: &str) -> Option<usize> {
    let digits = field.trim().strip_prefix("0x")?;
    usize::from_str_radix(digits, 16).ok()
}

fn normalize_separators(path: &str) -> PathBuf {
    PathBuf::from(
        path.replace('\\', MAIN_SEPARATOR_STR)
            .replace('/', MAIN_SEPARATOR_STR),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
