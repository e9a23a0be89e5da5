use crate::heuristics::{self, ShipmentRecord};
use crate::labels::{self, LabelSpec};
use crate::manual::ManualEntryForm;
use tracing::{debug, info};

/// The computed output of one batch run: every label to print, in source
/// order, plus the records that were dropped for having no sales order.
///
/// Skipped records are not errors — they only surface in the debug view.
#[derive(Debug, Default)]
pub struct BatchPlan {
    pub labels: Vec<LabelSpec>,
    pub skipped: Vec<ShipmentRecord>,
}

impl BatchPlan {
    /// Append one record's labels, or file it under `skipped`.
    pub fn add_record(&mut self, record: ShipmentRecord) {
        if record.has_sales_order() {
            info!(
                sales_order = %record.sales_order,
                carrier = %record.carrier_code,
                pro = %record.tracking_id,
                quantity = record.quantity,
                loads = record.load_tokens.len(),
                "Shipment accepted"
            );
            self.labels.extend(labels::build_labels(&record));
        } else {
            debug!("record has no sales order; skipped");
            self.skipped.push(record);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Document-upload path: one record per page of extracted text.
pub fn plan_from_pages<I, S>(pages: I) -> BatchPlan
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut plan = BatchPlan::default();
    for page in pages {
        plan.add_record(heuristics::extract_shipment(page.as_ref()));
    }
    plan
}

/// Manual-entry path: one record per row, blank rows skipped the same way.
pub fn plan_from_form(form: &ManualEntryForm) -> BatchPlan {
    let mut plan = BatchPlan::default();
    for row in &form.rows {
        plan.add_record(row.to_record());
    }
    plan
}
