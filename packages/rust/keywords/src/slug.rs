//! Slug derivation and display-form helpers for keywords.
//!
//! A slug is the filesystem- and URL-safe identifier derived from a keyword:
//! lower-cased, every maximal run of non-alphanumeric characters collapsed to
//! a single hyphen, leading/trailing hyphens stripped. The slug is the base
//! file name for both artifacts of a keyword (`{slug}.html`,
//! `{slug}.html.json`).

use std::sync::LazyLock;

use regex::Regex;

/// Matches a maximal run of characters outside `[0-9a-z]`.
static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9a-z]+").expect("slug regex"));

/// Derive a slug from a keyword.
///
/// Pure and total: every string maps to a slug, possibly the empty string
/// when the keyword contains no alphanumeric characters. Idempotent:
/// `normalize(normalize(k)) == normalize(k)`.
pub fn normalize(keyword: &str) -> String {
    let lowered = keyword.to_lowercase();
    let hyphenated = NON_ALNUM_RE.replace_all(&lowered, "-");
    hyphenated.trim_matches('-').to_string()
}

/// Title-case a keyword for display: first letter of each word upper-cased,
/// the rest lower-cased.
pub fn title_case(keyword: &str) -> String {
    keyword
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_punctuation_runs() {
        assert_eq!(normalize("Hiking  Trails"), "hiking-trails");
        assert_eq!(normalize("Coffee!!Brewing"), "coffee-brewing");
        assert_eq!(normalize("  Coffee!!Brewing  "), "coffee-brewing");
    }

    #[test]
    fn normalize_strips_edge_hyphens() {
        assert_eq!(normalize("--hello--"), "hello");
        assert_eq!(normalize("!wow!"), "wow");
    }

    #[test]
    fn normalize_non_ascii_becomes_hyphen() {
        assert_eq!(normalize("café au lait"), "caf-au-lait");
    }

    #[test]
    fn normalize_no_alphanumerics_is_empty() {
        assert_eq!(normalize("!!!"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for keyword in ["Hiking  Trails", "Coffee!!Brewing", "a--b", "123 GO", "!!!"] {
            let once = normalize(keyword);
            assert_eq!(normalize(&once), once, "not idempotent for {keyword:?}");
        }
    }

    #[test]
    fn normalize_output_alphabet() {
        let slug = normalize("Rust & WebAssembly: 2024 Edition!");
        assert!(
            slug.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        );
        assert!(!slug.starts_with('-'));
        assert!(!slug.ends_with('-'));
        assert!(!slug.contains("--"));
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("hiking trails"), "Hiking Trails");
        assert_eq!(title_case("COFFEE brewing"), "Coffee Brewing");
        assert_eq!(title_case("  spaced   out "), "Spaced Out");
    }
}
