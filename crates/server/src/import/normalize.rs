//! Text and number normalization for spreadsheet input.
//!
//! Headers in the source workbook are typed by hand, so the lookup keys
//! must survive stray casing, accents, newlines and doubled spaces.

use unicode_normalization::UnicodeNormalization;

/// Collapse all whitespace runs (including newlines and tabs) to single
/// spaces and trim. `None`-ish input maps to the empty string upstream.
#[must_use]
pub fn clean_string(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip combining accents: NFD-decompose, then drop combining marks.
#[must_use]
pub fn fold_accents(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

/// Normalize a column header or sheet name for dictionary lookup:
/// accents folded, whitespace collapsed, lowercased.
///
/// `"Code Article"`, `" code   article "` and `"CODE ARTICLE"` all map
/// to `"code article"`.
#[must_use]
pub fn normalize_header(value: &str) -> String {
    clean_string(&fold_accents(value)).to_lowercase()
}

/// Parse the longest leading float prefix of a string, the way
/// spreadsheet cells like `"45.6 €"` or `"12,5"` have historically been
/// read (the comma terminates the number).
///
/// Returns `None` when no digits lead the string.
#[must_use]
pub fn parse_float_prefix(value: &str) -> Option<f64> {
    let s = value.trim();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    if !seen_digit {
        return None;
    }

    s[..end].parse().ok()
}

/// Round half-up to the nearest integer, matching how tier-2 and tier-3
/// prices have always been normalized on import.
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_string_collapses_whitespace() {
        assert_eq!(clean_string("  HP \n ProDesk\t 400  "), "HP ProDesk 400");
        assert_eq!(clean_string(""), "");
        assert_eq!(clean_string("   "), "");
    }

    #[test]
    fn test_normalize_header_variants_collide() {
        for header in ["Code Article", " code   article ", "CODE ARTICLE"] {
            assert_eq!(normalize_header(header), "code article");
        }
    }

    #[test]
    fn test_normalize_header_folds_accents() {
        assert_eq!(normalize_header("Référence"), "reference");
        assert_eq!(normalize_header("Mémoire"), "memoire");
        // The euro sign is not a combining accent and survives.
        assert_eq!(
            normalize_header("Prix de vente €HT T2 -2,5%"),
            "prix de vente €ht t2 -2,5%"
        );
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("45.6"), Some(45.6));
        assert_eq!(parse_float_prefix(" 45.6 € "), Some(45.6));
        assert_eq!(parse_float_prefix("12,5"), Some(12.0));
        assert_eq!(parse_float_prefix("-3.25"), Some(-3.25));
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("n/a"), None);
        assert_eq!(parse_float_prefix("."), None);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(45.6), 46.0);
        assert_eq!(round_half_up(12.487), 12.0);
        assert_eq!(round_half_up(12.5), 13.0);
        assert_eq!(round_half_up(-2.5), -2.0);
    }
}
