use crate::barcode;
use crate::error::{LabelError, Result};
use crate::labels::LabelSpec;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

// Landscape letter, in points. Vertical anchors are baselines measured
// from the bottom edge.
const PAGE_WIDTH: f32 = 792.0;
const PAGE_HEIGHT: f32 = 612.0;
const MARGIN: f32 = 18.0;

const SALES_ORDER_SIZE: f32 = 80.0;
const SALES_ORDER_Y: f32 = 470.0;
const BARCODE_X: f32 = 196.0;
const BARCODE_Y: f32 = 352.0;
const BARCODE_WIDTH: f32 = 400.0;
const BARCODE_HEIGHT: f32 = 100.0;
const TRACKING_SIZE: f32 = 24.0;
const TRACKING_Y: f32 = 318.0;
const LOAD_SIZE: f32 = 34.0;
const LOAD_Y: f32 = 274.0;
const CARRIER_SIZE: f32 = 130.0;
const CARRIER_Y: f32 = 170.0;
const COUNT_SIZE: f32 = 80.0;
const COUNT_Y: f32 = 40.0;

// Approximate Helvetica-Bold advance; close enough to center display text.
const AVG_ADVANCE: f32 = 0.6;

/// Render the whole batch as one document, one page per label.
///
/// Pages come out in slice order — the "i of N" sequence the plan builder
/// established is preserved as the physical page order.
pub fn render_labels(specs: &[LabelSpec]) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(specs.len());
    for spec in specs {
        let content = Content {
            operations: page_operations(spec)?,
        };
        let encoded = content
            .encode()
            .map_err(|e| LabelError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                PAGE_WIDTH.into(),
                PAGE_HEIGHT.into(),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    Ok(doc)
}

/// Content-stream operations for one label page.
fn page_operations(spec: &LabelSpec) -> Result<Vec<Operation>> {
    let mut ops = vec![
        Operation::new("q", vec![]),
        Operation::new("rg", vec![0.into(), 0.into(), 0.into()]),
    ];

    push_centered_text(&mut ops, &spec.sales_order, SALES_ORDER_SIZE, SALES_ORDER_Y);

    // One barcode value per shipment; an empty tracking id just means no
    // barcode on any of its labels.
    if !spec.tracking_id.is_empty() {
        push_barcode(&mut ops, &spec.tracking_id)?;
        push_centered_text(&mut ops, &spec.tracking_id, TRACKING_SIZE, TRACKING_Y);
    }

    if !spec.load_text.is_empty() {
        let line = format!("LOAD: {}", spec.load_text);
        push_centered_text(&mut ops, &line, LOAD_SIZE, LOAD_Y);
    }

    push_centered_text(&mut ops, &spec.carrier_code, CARRIER_SIZE, CARRIER_Y);
    push_centered_text(
        &mut ops,
        &format!("{} of {}", spec.index, spec.total),
        COUNT_SIZE,
        COUNT_Y,
    );

    ops.push(Operation::new("Q", vec![]));
    Ok(ops)
}

fn push_centered_text(ops: &mut Vec<Operation>, text: &str, size: f32, baseline: f32) {
    if text.is_empty() {
        return;
    }
    let width = text.chars().count() as f32 * size * AVG_ADVANCE;
    let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN);
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec!["F1".into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), baseline.into()]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(text)]));
    ops.push(Operation::new("ET", vec![]));
}

/// Draw the Code128 pattern as filled rectangles, one per bar run.
fn push_barcode(ops: &mut Vec<Operation>, value: &str) -> Result<()> {
    let modules = barcode::code128_modules(value)?;
    let module_width = BARCODE_WIDTH / modules.len() as f32;

    let mut i = 0;
    while i < modules.len() {
        if modules[i] == 1 {
            let run_start = i;
            while i < modules.len() && modules[i] == 1 {
                i += 1;
            }
            let x = BARCODE_X + run_start as f32 * module_width;
            let width = (i - run_start) as f32 * module_width;
            ops.push(Operation::new(
                "re",
                vec![
                    x.into(),
                    BARCODE_Y.into(),
                    width.into(),
                    BARCODE_HEIGHT.into(),
                ],
            ));
            ops.push(Operation::new("f", vec![]));
        } else {
            i += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(tracking_id: &str, index: u32, total: u32) -> LabelSpec {
        LabelSpec {
            sales_order: "SO-12345-A".to_string(),
            carrier_code: "FEDX".to_string(),
            tracking_id: tracking_id.to_string(),
            load_text: "c16".to_string(),
            index,
            total,
        }
    }

    #[test]
    fn one_page_per_label() {
        let specs = vec![spec("998877", 1, 3), spec("998877", 2, 3), spec("998877", 3, 3)];
        let mut doc = render_labels(&specs).unwrap();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 3);
    }

    #[test]
    fn empty_tracking_id_omits_the_barcode() {
        let ops = page_operations(&spec("", 1, 1)).unwrap();
        assert!(ops.iter().all(|op| op.operator != "re"));

        let ops = page_operations(&spec("998877", 1, 1)).unwrap();
        assert!(ops.iter().any(|op| op.operator == "re"));
    }

    #[test]
    fn unencodable_tracking_id_is_fatal() {
        assert!(render_labels(&[spec("Ω1", 1, 1)]).is_err());
    }

    #[test]
    fn empty_load_text_draws_no_load_line() {
        let mut label = spec("998877", 1, 1);
        label.load_text = String::new();
        let ops = page_operations(&label).unwrap();
        let text_count = ops.iter().filter(|op| op.operator == "Tj").count();
        // sales order, tracking id, carrier, count — no LOAD line
        assert_eq!(text_count, 4);
    }
}
