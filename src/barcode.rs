use crate::error::{LabelError, Result};
use barcoders::sym::code128::Code128;

/// Code128 module pattern for a tracking id: one entry per module,
/// 1 = bar, 0 = space, quiet zones excluded. The caller decides module
/// width when drawing.
///
/// Charset B (the `Ɓ` prefix) covers the full printable-ASCII range, so
/// manual rows with non-numeric PRO values still encode. Anything outside
/// that range is a hard error — the batch aborts rather than printing a
/// label with a silently missing barcode.
pub fn code128_modules(value: &str) -> Result<Vec<u8>> {
    let symbol = Code128::new(format!("\u{0181}{value}"))
        .map_err(|e| LabelError::Barcode(format!("{value:?}: {e}")))?;
    Ok(symbol.encode())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_encode_to_a_binary_module_run() {
        let modules = code128_modules("998877").unwrap();
        assert!(!modules.is_empty());
        assert!(modules.iter().all(|&m| m == 0 || m == 1));
        // Symbols start and end with a bar.
        assert_eq!(modules.first(), Some(&1));
        assert_eq!(modules.last(), Some(&1));
    }

    #[test]
    fn ascii_text_encodes() {
        assert!(code128_modules("PRO-42/A").is_ok());
    }

    #[test]
    fn non_ascii_is_rejected() {
        assert!(code128_modules("Ω998877").is_err());
    }

    #[test]
    fn wider_payload_means_more_modules() {
        let short = code128_modules("1").unwrap();
        let long = code128_modules("123456789").unwrap();
        assert!(long.len() > short.len());
    }
}
