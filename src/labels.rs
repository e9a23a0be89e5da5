use crate::heuristics::ShipmentRecord;
use serde::Serialize;
use tracing::debug;

/// One physical label — rendered as one page downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelSpec {
    pub sales_order: String,
    pub carrier_code: String,
    pub tracking_id: String,
    /// Load token for this position, or empty when the record ran out.
    pub load_text: String,
    /// 1-based position within the shipment.
    pub index: u32,
    pub total: u32,
}

/// Expand one shipment into its ordered label sequence.
///
/// Length is exactly `max(1, quantity)`. Load tokens pair to labels by
/// position only: trailing labels past the token list get empty load text,
/// and tokens past the quantity are dropped without error — length
/// mismatches are routine in real documents. The tracking id and carrier
/// ride unchanged on every label (one barcode value per shipment).
pub fn build_labels(record: &ShipmentRecord) -> Vec<LabelSpec> {
    let total = record.quantity.max(1);

    let excess = record.load_tokens.len().saturating_sub(total as usize);
    if excess > 0 {
        debug!(
            sales_order = %record.sales_order,
            excess,
            "more load tokens than labels; extra tokens dropped"
        );
    }

    (1..=total)
        .map(|index| LabelSpec {
            sales_order: record.sales_order.clone(),
            carrier_code: record.carrier_code.clone(),
            tracking_id: record.tracking_id.clone(),
            load_text: record
                .load_tokens
                .get(index as usize - 1)
                .cloned()
                .unwrap_or_default(),
            index,
            total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(quantity: u32, load_tokens: &[&str]) -> ShipmentRecord {
        ShipmentRecord {
            sales_order: "SO-12345-A".to_string(),
            carrier_code: "FEDX".to_string(),
            tracking_id: "998877".to_string(),
            job_raw: String::new(),
            load_tokens: load_tokens.iter().map(|s| s.to_string()).collect(),
            quantity,
        }
    }

    #[test]
    fn length_equals_clamped_quantity() {
        assert_eq!(build_labels(&record(3, &[])).len(), 3);
        assert_eq!(build_labels(&record(1, &[])).len(), 1);
        assert_eq!(build_labels(&record(0, &[])).len(), 1);
    }

    #[test]
    fn output_is_one_indexed_and_order_preserving() {
        let labels = build_labels(&record(4, &[]));
        for (i, label) in labels.iter().enumerate() {
            assert_eq!(label.index, i as u32 + 1);
            assert_eq!(label.total, 4);
        }
    }

    #[test]
    fn short_token_list_pads_with_empty_load_text() {
        let labels = build_labels(&record(3, &["a", "b"]));
        let loads: Vec<&str> = labels.iter().map(|l| l.load_text.as_str()).collect();
        assert_eq!(loads, vec!["a", "b", ""]);
    }

    #[test]
    fn long_token_list_is_truncated() {
        let labels = build_labels(&record(1, &["a", "b"]));
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].load_text, "a");
    }

    #[test]
    fn shipment_fields_ride_on_every_label() {
        for label in build_labels(&record(3, &["c16"])) {
            assert_eq!(label.sales_order, "SO-12345-A");
            assert_eq!(label.carrier_code, "FEDX");
            assert_eq!(label.tracking_id, "998877");
        }
    }
}
