use thiserror::Error;

/// Fatal failures from the rendering/export layer.
///
/// Extraction and quantity derivation never raise — malformed page text
/// only degrades to field defaults — so every variant here comes from the
/// PDF/barcode side or from tooling input (config, row file).
#[derive(Error, Debug)]
pub enum LabelError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("pdf error: {0}")]
    Pdf(String),

    #[error("barcode encoding failed for {0}")]
    Barcode(String),

    #[error("bad manual row file: {0}")]
    Form(String),

    #[error("bad config: {0}")]
    Config(String),

    #[error("unknown time zone: {0}")]
    Zone(String),

    #[error("no shipment produced any labels — nothing to write")]
    NoLabels,
}

pub type Result<T> = std::result::Result<T, LabelError>;
