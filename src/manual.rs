use crate::error::{LabelError, Result};
use crate::heuristics::{ShipmentRecord, split_csv_like};
use serde::Deserialize;
use std::{fs, path::Path};

/// Manual shipment entry, read from a TOML file of `[[row]]` tables.
///
/// ```toml
/// [[row]]
/// sales_order = "SO-1001"
/// tracking_id = "445566"
/// carrier_code = "ODFL"
/// quantity = 2
/// load_numbers = "c16, a26"
/// ```
///
/// Every field is optional; blank rows are tolerated and skipped later by
/// the orchestrator, so a template file with spare rows works as-is.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ManualEntryForm {
    #[serde(default, rename = "row")]
    pub rows: Vec<ManualRow>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ManualRow {
    #[serde(default)]
    pub sales_order: String,
    #[serde(default)]
    pub tracking_id: String,
    #[serde(default)]
    pub carrier_code: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Comma-separated load tokens, same loose shape as the PDF field.
    #[serde(default)]
    pub load_numbers: String,
}

fn default_quantity() -> u32 {
    1
}

impl Default for ManualRow {
    fn default() -> Self {
        ManualRow {
            sales_order: String::new(),
            tracking_id: String::new(),
            carrier_code: String::new(),
            quantity: 1,
            load_numbers: String::new(),
        }
    }
}

impl ManualEntryForm {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| LabelError::Form(e.to_string()))
    }

    /// Reset to the empty form.
    pub fn clear(self) -> Self {
        Self::default()
    }
}

impl ManualRow {
    /// Convert to the same record shape the extractor produces.
    pub fn to_record(&self) -> ShipmentRecord {
        ShipmentRecord {
            sales_order: self.sales_order.trim().to_string(),
            carrier_code: self.carrier_code.trim().to_string(),
            tracking_id: self.tracking_id.trim().to_string(),
            job_raw: String::new(),
            load_tokens: split_csv_like(&self.load_numbers),
            quantity: self.quantity,
        }
    }
}
