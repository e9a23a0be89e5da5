use regex::Regex;
use std::sync::LazyLock;

static ALL_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

/// Split a comma-separated field into trimmed, non-empty tokens.
///
/// Shared by the job-name resolver, the `Load Number:` field, and manual
/// entry — all three carry the same loose "a, b, c" shape.
pub fn split_csv_like(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Derive a label count from the raw `Job Name:` text.
///
/// The field overloads two meanings with no type marker: a literal count
/// ("3") or an enumerated list ("crate a, crate b"). Disambiguation is by
/// content shape alone, in strict priority order:
///
/// 1. empty → `(1, [])`
/// 2. all digits → `(parsed, [])`
/// 3. comma-separated with non-empty tokens → `(token count, tokens)`
/// 4. anything else → `(1, [])`
///
/// Total function — no input fails. A numeric value too large for `u32`
/// degrades to 1 rather than turning a typo into a warehouse-sized print
/// run. A literal "0" is reported as 0; the label plan builder owns the
/// clamp to one label.
pub fn resolve_quantity(job_raw: &str) -> (u32, Vec<String>) {
    let trimmed = job_raw.trim();
    if trimmed.is_empty() {
        return (1, Vec::new());
    }

    if ALL_DIGITS.is_match(trimmed) {
        return (trimmed.parse().unwrap_or(1), Vec::new());
    }

    if trimmed.contains(',') {
        let tokens = split_csv_like(trimmed);
        if !tokens.is_empty() {
            return (tokens.len() as u32, tokens);
        }
    }

    (1, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_one_label() {
        assert_eq!(resolve_quantity(""), (1, vec![]));
        assert_eq!(resolve_quantity("   "), (1, vec![]));
    }

    #[test]
    fn digit_only_input_is_a_literal_count() {
        assert_eq!(resolve_quantity("3"), (3, vec![]));
        assert_eq!(resolve_quantity("  12 "), (12, vec![]));
        assert_eq!(resolve_quantity("0"), (0, vec![]));
    }

    #[test]
    fn comma_list_counts_tokens() {
        let (qty, items) = resolve_quantity("crate a, crate b, crate c");
        assert_eq!(qty, 3);
        assert_eq!(items, vec!["crate a", "crate b", "crate c"]);
    }

    #[test]
    fn empty_tokens_are_dropped_before_counting() {
        let (qty, items) = resolve_quantity("a,, b,");
        assert_eq!(qty, 2);
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn single_word_is_one_label_with_no_items() {
        assert_eq!(resolve_quantity("widget"), (1, vec![]));
    }

    #[test]
    fn only_commas_falls_through_to_one() {
        assert_eq!(resolve_quantity(",,,"), (1, vec![]));
    }

    #[test]
    fn oversized_count_degrades_to_one() {
        assert_eq!(resolve_quantity("99999999999999999999"), (1, vec![]));
    }

    #[test]
    fn split_csv_like_trims_and_drops_empties() {
        assert_eq!(split_csv_like(" c16 , a26 "), vec!["c16", "a26"]);
        assert_eq!(split_csv_like(""), Vec::<String>::new());
        assert_eq!(split_csv_like(" , ,"), Vec::<String>::new());
    }
}
