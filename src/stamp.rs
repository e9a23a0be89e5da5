use crate::config::StampConfig;
use crate::error::{LabelError, Result};
use chrono::Utc;
use chrono_tz::Tz;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::collections::BTreeMap;

const SIGNATURE_PLACEHOLDER: &str = "__________________";
const STAMP_FONT_KEY: &str = "BLStamp";

/// Overlay line for the shipper signature box: name (or a blank line to
/// sign on) and today's date in the fixed zone.
pub fn signature_line(shipper: &str, tz: Tz) -> String {
    let today = Utc::now().with_timezone(&tz).format("%m/%d/%Y").to_string();
    format_signature(shipper, &today)
}

fn format_signature(shipper: &str, date: &str) -> String {
    let name = if shipper.trim().is_empty() {
        SIGNATURE_PLACEHOLDER
    } else {
        shipper
    };
    format!("{name}    {date}")
}

/// Timestamp for output filenames, same fixed zone as the stamp date.
pub fn batch_timestamp(tz: Tz) -> String {
    Utc::now()
        .with_timezone(&tz)
        .format("%Y%m%d-%H%M%S")
        .to_string()
}

/// Stamp the signature line onto every page of an uploaded BOL.
///
/// Appends a self-contained overlay content stream per page and registers
/// a Helvetica resource; existing page content is never rewritten.
pub fn stamp_pages(doc: &mut Document, line: &str, cfg: &StampConfig) -> Result<()> {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let overlay = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new("rg", vec![0.into(), 0.into(), 0.into()]),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(STAMP_FONT_KEY.as_bytes().to_vec()),
                    cfg.font_size.into(),
                ],
            ),
            Operation::new("Td", vec![cfg.anchor_x.into(), cfg.anchor_y.into()]),
            Operation::new("Tj", vec![Object::string_literal(line)]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = overlay
        .encode()
        .map_err(|e| LabelError::Pdf(e.to_string()))?;

    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    for page_id in pages {
        let stream_id = doc.add_object(Stream::new(dictionary! {}, encoded.clone()));
        append_page_content(doc, page_id, stream_id)?;
        register_stamp_font(doc, page_id, font_id)?;
    }
    Ok(())
}

fn append_page_content(doc: &mut Document, page_id: ObjectId, stream_id: ObjectId) -> Result<()> {
    let existing = page_dict(doc, page_id)?.get(b"Contents").ok().cloned();

    let mut contents: Vec<Object> = match existing {
        Some(Object::Reference(id)) => vec![Object::Reference(id)],
        Some(Object::Array(items)) => items,
        // Contents should be a reference, but a direct stream object still
        // has to survive the rewrite into array form.
        Some(other) => vec![Object::Reference(doc.add_object(other))],
        None => Vec::new(),
    };
    contents.push(Object::Reference(stream_id));

    page_dict_mut(doc, page_id)?.set("Contents", Object::Array(contents));
    Ok(())
}

/// Add the stamp font to the page's font resources. The effective
/// Resources dictionary (own or inherited from the page tree) is
/// materialized as an inline copy first, so inherited entries survive.
fn register_stamp_font(doc: &mut Document, page_id: ObjectId, font_id: ObjectId) -> Result<()> {
    let mut resources = effective_resources(doc, page_id).unwrap_or_else(Dictionary::new);

    let mut fonts = resources
        .get(b"Font")
        .ok()
        .and_then(|f| doc.dereference(f).ok())
        .and_then(|(_, resolved)| resolved.as_dict().ok())
        .cloned()
        .unwrap_or_else(Dictionary::new);
    fonts.set(STAMP_FONT_KEY, Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));

    page_dict_mut(doc, page_id)?.set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// Resources for a page, following the Parent chain when the page itself
/// carries none.
fn effective_resources(doc: &Document, page_id: ObjectId) -> Option<Dictionary> {
    let mut node_id = page_id;
    loop {
        let dict = doc.get_object(node_id).ok()?.as_dict().ok()?;
        if let Ok(res) = dict.get(b"Resources") {
            return doc
                .dereference(res)
                .ok()
                .and_then(|(_, resolved)| resolved.as_dict().ok())
                .cloned();
        }
        node_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
    }
}

/// Concatenate stamped BOL documents into the combined artifact.
///
/// Page order is source order: documents in input order, pages in page
/// order within each. Catalogs and page trees are rebuilt; inherited page
/// attributes are materialized onto each page first so nothing is lost
/// when the old tree nodes are discarded.
pub fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    let mut max_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut page_dicts: BTreeMap<ObjectId, Dictionary> = BTreeMap::new();
    let mut all_objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut doc in documents {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        for (_, page_id) in doc.get_pages() {
            page_dicts.insert(page_id, materialized_page(&doc, page_id)?);
            page_ids.push(page_id);
        }
        all_objects.extend(doc.objects);
    }

    let mut merged = Document::with_version("1.5");
    for (id, object) in all_objects {
        // Catalogs, tree nodes and page dicts are rebuilt below.
        match object_type(&object) {
            Some(b"Catalog") | Some(b"Pages") | Some(b"Page") | Some(b"Outlines") => {}
            _ => {
                merged.objects.insert(id, object);
            }
        }
    }
    merged.max_id = max_id;

    let pages_id = merged.new_object_id();
    for &page_id in &page_ids {
        let Some(mut dict) = page_dicts.remove(&page_id) else {
            continue;
        };
        dict.set("Parent", Object::Reference(pages_id));
        merged.objects.insert(page_id, Object::Dictionary(dict));
    }

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
    let count = kids.len() as i64;
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);
    merged.renumber_objects();
    merged.compress();

    Ok(merged)
}

/// Page dict clone with Resources/MediaBox/CropBox/Rotate pulled down from
/// the page tree when the page doesn't carry its own.
fn materialized_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut dict = page_dict(doc, page_id)?.clone();
    for key in [
        &b"Resources"[..],
        &b"MediaBox"[..],
        &b"CropBox"[..],
        &b"Rotate"[..],
    ] {
        if dict.get(key).is_err() {
            if let Some(value) = inherited_attr(doc, page_id, key) {
                dict.set(key.to_vec(), value);
            }
        }
    }
    Ok(dict)
}

fn inherited_attr(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node_id = page_dict(doc, page_id)
        .ok()?
        .get(b"Parent")
        .ok()?
        .as_reference()
        .ok()?;
    loop {
        let dict = doc.get_object(node_id).ok()?.as_dict().ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        node_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
    }
}

fn object_type(object: &Object) -> Option<&[u8]> {
    match object {
        Object::Dictionary(dict) => match dict.get(b"Type") {
            Ok(Object::Name(name)) => Some(name.as_slice()),
            _ => None,
        },
        _ => None,
    }
}

fn page_dict(doc: &Document, page_id: ObjectId) -> Result<&Dictionary> {
    doc.get_object(page_id)
        .and_then(|o| o.as_dict())
        .map_err(|e| LabelError::Pdf(e.to_string()))
}

fn page_dict_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary> {
    doc.get_object_mut(page_id)
        .and_then(|o| o.as_dict_mut())
        .map_err(|e| LabelError::Pdf(e.to_string()))
}
