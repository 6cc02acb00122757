//! QR challenge artifacts: canvas data-URL decoding and terminal rendering.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use qrcode::QrCode;
use qrcode::render::unicode;

use crate::error::{Result, WaError};

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Decodes a `canvas.toDataURL()` payload into raw PNG bytes.
pub fn decode_png_data_url(data_url: &str) -> Result<Vec<u8>> {
    let Some(encoded) = data_url.trim().strip_prefix(PNG_DATA_URL_PREFIX) else {
        return Err(WaError::ChallengeExtraction(
            "challenge payload is not a PNG data URL".into(),
        ));
    };
    BASE64
        .decode(encoded)
        .map_err(|err| WaError::ChallengeExtraction(format!("invalid base64 payload: {err}")))
}

/// Renders a QR of `token` as a terminal-friendly unicode block.
///
/// The token is a derived page identifier, not the pairing payload the canvas
/// encodes; the exported PNG is the artifact the operator actually scans.
pub fn render_terminal_qr(token: &str) -> Result<String> {
    let payload = token.trim();
    if payload.is_empty() {
        return Err(WaError::ChallengeExtraction("QR payload is empty".into()));
    }

    let qr = QrCode::new(payload.as_bytes())
        .map_err(|err| WaError::ChallengeExtraction(format!("failed to encode QR: {err}")))?;

    Ok(qr
        .render::<unicode::Dense1x2>()
        .quiet_zone(true)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_png_data_url() {
        // "PNG" in base64, enough to exercise the prefix strip + decode.
        let bytes = decode_png_data_url("data:image/png;base64,UE5H").unwrap();
        assert_eq!(bytes, b"PNG");
    }

    #[test]
    fn rejects_non_png_payloads() {
        let err = decode_png_data_url("data:image/jpeg;base64,UE5H").unwrap_err();
        assert!(matches!(err, WaError::ChallengeExtraction(_)));
    }

    #[test]
    fn rejects_corrupt_base64() {
        let err = decode_png_data_url("data:image/png;base64,???").unwrap_err();
        assert!(matches!(err, WaError::ChallengeExtraction(_)));
    }

    #[test]
    fn terminal_qr_rejects_empty_payload() {
        let err = render_terminal_qr("   ").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn terminal_qr_outputs_multiline_text() {
        let rendered = render_terminal_qr("https://web.whatsapp.com/pairing").unwrap();
        assert!(rendered.lines().count() > 10);
        assert!(rendered.trim().len() > 64);
    }
}
