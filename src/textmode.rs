//! The legacy text-to-text converter.
//!
//! Already-textual captures only need two punctuation fixes to become valid
//! systrace input: async begin/finish/counter marks get their last space
//! replaced by `|`, finished sync sections lose a trailing `|`. The
//! interesting lines are recognized by matching the *reversed* line against
//! two anchored patterns, which pins the match to the end of the line
//! without an expensive unanchored scan.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;

static ASYNC_MARK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(\d+)\s+(.*?)\|\d+\|[SFC]\s+:(.*?)\s+:(.*?)\s+(.*?)\s+\]\d+\[\s+\)(\d+)\s*\(\s+(\d+?)-(.*?)\s+",
    )
    .unwrap()
});

static SYNC_MARK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*\|\d+\|E\s+:(.*?)\s+:(.*?)\s+(.*?)\s+\]\d+\[\s+\)(\d+)\s*\(\s+(\d+?)-(.*?)\s+",
    )
    .unwrap()
});

/// Rewrite one line in place. Returns true if the line matched one of the
/// two patterns and was modified.
fn rewrite_line(line: &mut String) -> bool {
    let reversed: String = line.chars().rev().collect();
    if ASYNC_MARK.is_match(&reversed) {
        let trimmed = line.trim_end_matches(' ').len();
        line.truncate(trimmed);
        if let Some(pos) = line.rfind(' ') {
            line.replace_range(pos..pos + 1, "|");
        }
        true
    } else if SYNC_MARK.is_match(&reversed) {
        let trimmed = line.trim_end().len();
        line.truncate(trimmed);
        line.pop();
        line.push('\n');
        true
    } else {
        false
    }
}

/// Run the rewriter over a whole file. Returns the number of modified
/// lines.
pub fn rewrite_text_trace(input: &Path, output: &Path) -> Result<usize, Error> {
    let mut reader = BufReader::new(File::open(input)?);
    let mut writer = BufWriter::new(File::create(output)?);

    let mut rewritten = 0;
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        if rewrite_line(&mut line) {
            rewritten += 1;
        }
        writer.write_all(line.as_bytes())?;
    }
    writer.flush()?;
    Ok(rewritten)
}
