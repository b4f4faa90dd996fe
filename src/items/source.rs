//! Item-list resolution.
//!
//! The `list` option names either a file (or a glob over files) containing
//! one item per line, or is itself an inline list of tokens separated by
//! spaces or commas. File contents are filtered: blank lines are skipped,
//! and lines whose first non-whitespace character is `#` or `!` are
//! comments.

use crate::error::{Result, RunlistError};
use crate::items::WorkItem;
use globset::Glob;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static COMMENT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[#!]").expect("static pattern"));

static INLINE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ ,]+").expect("static pattern"));

/// Resolve the `list` option to a finite, ordered sequence of work items.
///
/// If the value names a readable file, or is a glob matching files in its
/// parent directory, all matching files are read in sorted order. Otherwise
/// the value itself is split on spaces/commas as an inline list.
pub fn resolve_items(list: &str, debug: bool) -> Result<Vec<WorkItem>> {
    let files = matching_files(list)?;
    if files.is_empty() {
        if debug {
            eprintln!("list '{}' matched no files; treating it as inline items", list);
        }
        return Ok(split_inline(list));
    }

    let mut items = Vec::new();
    for file in files {
        if debug {
            eprintln!("reading list file: {}", file.display());
        }
        items.extend(read_list_file(&file)?);
    }
    Ok(items)
}

/// Files the list value resolves to: the literal path if it is a file,
/// otherwise glob matches in the pattern's parent directory. Glob
/// metacharacters are honored in the final path component only.
fn matching_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(pattern);
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(Vec::new());
    };
    if !name.contains(['*', '?', '[']) {
        return Ok(Vec::new());
    }

    let matcher = Glob::new(name)
        .map_err(|e| RunlistError::List(format!("invalid list glob '{}': {}", pattern, e)))?
        .compile_matcher();

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let entries = match std::fs::read_dir(&parent) {
        Ok(entries) => entries,
        Err(_) => return Ok(Vec::new()),
    };

    let mut matches: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| matcher.is_match(n))
        })
        .collect();
    matches.sort();
    Ok(matches)
}

/// Read one list file: one item per line, comments and blanks skipped,
/// surrounding whitespace trimmed.
fn read_list_file(path: &Path) -> Result<Vec<WorkItem>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        RunlistError::List(format!("could not read list file '{}': {}", path.display(), e))
    })?;

    Ok(content
        .lines()
        .filter(|line| !COMMENT_LINE.is_match(line))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(WorkItem::new)
        .collect())
}

/// Split an inline list value on spaces and commas.
fn split_inline(list: &str) -> Vec<WorkItem> {
    INLINE_SEPARATOR
        .split(list)
        .filter(|token| !token.is_empty())
        .map(WorkItem::new)
        .collect()
}
