//! Keyword input loading and slug normalization.
//!
//! Parses an uploaded newline-delimited text blob into a cleaned, ordered,
//! non-empty list of keywords. Order of appearance is preserved and drives
//! output numbering and progress; duplicates are kept (colliding slugs are
//! detected later, at archive-build time).

mod slug;

pub use slug::{normalize, title_case};

use tracing::debug;

use pageforge_shared::{PageForgeError, Result};

/// Parse a raw keyword payload into an ordered list of keywords.
///
/// Decodes the bytes as UTF-8, splits on line boundaries, trims each line,
/// and discards lines that are empty after trimming. Fails with an input
/// error when the bytes are not valid text or no keywords remain.
pub fn load(raw: &[u8]) -> Result<Vec<String>> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| PageForgeError::input(format!("keyword file is not valid UTF-8: {e}")))?;

    let keywords: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if keywords.is_empty() {
        return Err(PageForgeError::input(
            "empty input: the keyword file contains no keywords",
        ));
    }

    debug!(count = keywords.len(), "keywords loaded");
    Ok(keywords)
}
