// src/pdf_text.rs

use lopdf::{Dictionary, Document, Object};
use tracing::{info, warn};

/// Result of attempting to pull per-page text out of a PDF.
#[derive(Debug)]
pub enum PdfContent {
    /// Extractable text, one entry per page in page order.
    Pages(Vec<String>),
    /// The PDF appears to be scanned / image-only — no text layer to parse.
    ScannedImage,
    /// Something went wrong during extraction.
    Error(String),
}

/// Minimum number of non-whitespace characters we expect from a
/// "real" text PDF. Below this threshold we treat it as scanned.
const MIN_TEXT_CHARS: usize = 30;

/// Main entry point: takes raw PDF bytes and returns `PdfContent`.
pub fn extract_page_texts(pdf_bytes: &[u8]) -> PdfContent {
    // --- Phase 1: structural check ---
    let doc = match Document::load_mem(pdf_bytes) {
        Ok(d) => d,
        Err(e) => return PdfContent::Error(format!("Failed to parse PDF: {e}")),
    };

    if looks_like_scanned(&doc) {
        info!("PDF structural check: likely scanned / image-only");
        return PdfContent::ScannedImage;
    }

    // --- Phase 2: per-page text extraction ---
    match pdf_extract::extract_text_from_mem_by_pages(pdf_bytes) {
        Ok(pages) => {
            let meaningful: usize = pages
                .iter()
                .map(|p| p.chars().filter(|c| !c.is_whitespace()).count())
                .sum();
            if meaningful < MIN_TEXT_CHARS {
                info!(
                    chars = meaningful,
                    "Extracted text too short — treating as scanned"
                );
                PdfContent::ScannedImage
            } else {
                info!(pages = pages.len(), chars = meaningful, "Text extracted");
                PdfContent::Pages(pages)
            }
        }
        Err(e) => {
            warn!(error = %e, "text extraction failed — may be scanned or corrupted");
            PdfContent::ScannedImage
        }
    }
}

/// Heuristic: a page whose resources carry XObject images but no fonts has
/// nothing for a text extractor to find. If ≥80% of pages look like that,
/// the whole document is treated as a scan.
fn looks_like_scanned(doc: &Document) -> bool {
    let pages = doc.get_pages();
    if pages.is_empty() {
        return false; // Can't tell — let text extraction try
    }

    let image_only_pages = pages
        .values()
        .filter(|&&page_id| {
            let Some(page_dict) = doc
                .get_object(page_id)
                .ok()
                .and_then(|o| o.as_dict().ok())
            else {
                return false;
            };
            resource_category_nonempty(doc, page_dict, b"XObject")
                && !resource_category_nonempty(doc, page_dict, b"Font")
        })
        .count();

    let total = pages.len();
    let ratio = image_only_pages as f64 / total as f64;
    info!(
        total_pages = total,
        image_only = image_only_pages,
        ratio = format!("{ratio:.2}"),
        "Scanned-page analysis"
    );

    ratio >= 0.8
}

/// Does this page's Resources dictionary hold a non-empty `category`
/// (e.g. `Font`, `XObject`) entry? Follows references both levels down.
fn resource_category_nonempty(doc: &Document, page_dict: &Dictionary, category: &[u8]) -> bool {
    page_dict
        .get(b"Resources")
        .ok()
        .and_then(|r| deref_dict(doc, r))
        .and_then(|res| res.get(category).ok())
        .and_then(|entry| deref_dict(doc, entry))
        .is_some_and(|d| !d.is_empty())
}

fn deref_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    doc.dereference(object)
        .ok()
        .and_then(|(_, resolved)| resolved.as_dict().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_an_error() {
        let result = extract_page_texts(b"this is not a pdf");
        assert!(matches!(result, PdfContent::Error(_)));
    }
}
