use super::ShipmentRecord;
use super::quantity::{resolve_quantity, split_csv_like};
use regex::Regex;
use std::sync::LazyLock;

// Each field is an independent keyword-anchored search over the whole page;
// first match wins, absence degrades to the empty default. Patterns are
// compiled once — extraction runs in a per-page loop.
static CARRIER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Carrier:\s*(.+)").unwrap());
static SALES_ORDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Sales Order:\s*(SO-\d+[\w-]*)").unwrap());
static PRO_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Pro Number:\s*(\d+)").unwrap());
static JOB_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Job Name:\s*(.+)").unwrap());
static LOAD_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Load Number:\s*(.+)").unwrap());
static PIECES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Pieces\s*[:\-]?\s*(\d+)").unwrap());

/// Main extraction entry point for one page of BOL text.
pub fn extract(text: &str) -> ShipmentRecord {
    let job_raw = extract_job_raw(text).unwrap_or_default();

    // Legacy documents carry no Job Name field at all — those fall back to
    // a case-insensitive "Pieces" count and bypass the resolver entirely.
    let quantity = if job_raw.is_empty() {
        extract_pieces_count(text).unwrap_or_else(|| resolve_quantity(&job_raw).0)
    } else {
        resolve_quantity(&job_raw).0
    };

    ShipmentRecord {
        sales_order: extract_sales_order(text).unwrap_or_default(),
        carrier_code: extract_carrier_code(text).unwrap_or_default(),
        tracking_id: extract_tracking_id(text).unwrap_or_default(),
        load_tokens: extract_load_tokens(text),
        job_raw,
        quantity,
    }
}

/// First whitespace token after "Carrier:" — the SCAC, not the full name.
pub fn extract_carrier_code(text: &str) -> Option<String> {
    let cap = CARRIER_RE.captures(text)?;
    cap[1].trim().split_whitespace().next().map(str::to_string)
}

/// "Sales Order:" value matching SO-<digits> plus optional word/hyphen tail.
pub fn extract_sales_order(text: &str) -> Option<String> {
    SALES_ORDER_RE.captures(text).map(|c| c[1].to_string())
}

/// Digits after "Pro Number:" — the carrier tracking id.
pub fn extract_tracking_id(text: &str) -> Option<String> {
    PRO_NUMBER_RE.captures(text).map(|c| c[1].to_string())
}

/// Raw "Job Name:" text to end of line, trimmed.
pub fn extract_job_raw(text: &str) -> Option<String> {
    JOB_NAME_RE.captures(text).map(|c| c[1].trim().to_string())
}

/// "Load Number:" tokens in document order.
pub fn extract_load_tokens(text: &str) -> Vec<String> {
    LOAD_NUMBER_RE
        .captures(text)
        .map(|c| split_csv_like(&c[1]))
        .unwrap_or_default()
}

/// Legacy fallback: "Pieces" with optional ":" or "-", any case.
pub fn extract_pieces_count(text: &str) -> Option<u32> {
    PIECES_RE.captures(text).and_then(|c| c[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "\
Ship Date: 07/30/2026
Carrier: FEDX EXPRESS
Sales Order: SO-12345-A
Pro Number: 998877
Job Name: 3
Load Number: c16, a26
";

    #[test]
    fn carrier_code_is_first_token_only() {
        assert_eq!(extract_carrier_code(PAGE).as_deref(), Some("FEDX"));
        assert_eq!(extract_carrier_code("no such label"), None);
    }

    #[test]
    fn sales_order_requires_so_prefix() {
        assert_eq!(extract_sales_order(PAGE).as_deref(), Some("SO-12345-A"));
        assert_eq!(extract_sales_order("Sales Order: 12345"), None);
    }

    #[test]
    fn tracking_id_is_digits_only() {
        assert_eq!(extract_tracking_id(PAGE).as_deref(), Some("998877"));
        assert_eq!(extract_tracking_id("Pro Number: n/a"), None);
    }

    #[test]
    fn load_tokens_keep_document_order() {
        assert_eq!(extract_load_tokens(PAGE), vec!["c16", "a26"]);
        assert_eq!(extract_load_tokens("Load Number:  "), Vec::<String>::new());
    }

    #[test]
    fn pieces_fallback_is_case_insensitive_with_optional_separator() {
        assert_eq!(extract_pieces_count("PIECES 4"), Some(4));
        assert_eq!(extract_pieces_count("pieces: 5"), Some(5));
        assert_eq!(extract_pieces_count("Pieces - 6"), Some(6));
        assert_eq!(extract_pieces_count("no count here"), None);
    }

    #[test]
    fn full_page_extraction() {
        let record = extract(PAGE);
        assert_eq!(record.sales_order, "SO-12345-A");
        assert_eq!(record.carrier_code, "FEDX");
        assert_eq!(record.tracking_id, "998877");
        assert_eq!(record.job_raw, "3");
        assert_eq!(record.quantity, 3);
        assert_eq!(record.load_tokens, vec!["c16", "a26"]);
    }

    #[test]
    fn pieces_wins_only_when_job_name_is_absent() {
        let legacy = "Sales Order: SO-77\nPieces: 5\nLoad Number: a, b\n";
        assert_eq!(extract(legacy).quantity, 5);

        // A present Job Name takes priority over any Pieces text.
        let both = "Sales Order: SO-77\nJob Name: 2\nPieces: 5\n";
        assert_eq!(extract(both).quantity, 2);
    }

    #[test]
    fn extraction_is_total_on_arbitrary_text() {
        let record = extract("");
        assert_eq!(record.sales_order, "");
        assert_eq!(record.carrier_code, "");
        assert_eq!(record.tracking_id, "");
        assert_eq!(record.job_raw, "");
        assert_eq!(record.quantity, 1);
        assert!(record.load_tokens.is_empty());

        // Binary-ish garbage degrades the same way.
        let record = extract("\u{0}\u{1}\u{2} Carrier Pro Pieces");
        assert_eq!(record.quantity, 1);
    }

    #[test]
    fn job_name_as_list_drives_quantity() {
        let page = "Sales Order: SO-9\nJob Name: north dock, south dock\n";
        let record = extract(page);
        assert_eq!(record.quantity, 2);
        assert_eq!(record.job_raw, "north dock, south dock");
    }
}
