use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::TrafficError;

/// Single-byte key the eTraffic backend XORs its JSON with before base64.
pub const XOR_KEY: u8 = b'K';

/// Standard alphabet, forgiving like browser `atob`: `=` padding optional,
/// non-zero trailing bits discarded.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// XOR every byte with `key`. Self-inverse.
pub fn xor(bytes: &[u8], key: u8) -> Vec<u8> {
    bytes.iter().map(|b| b ^ key).collect()
}

/// Base64-decode `envelope` (surrounding whitespace ignored) and undo the XOR.
pub fn decode_envelope(envelope: &str) -> Result<Vec<u8>, TrafficError> {
    let raw = BASE64
        .decode(envelope.trim())
        .map_err(|e| TrafficError::Decode(e.to_string()))?;
    Ok(xor(&raw, XOR_KEY))
}

/// Full envelope -> JSON decode. Invalid UTF-8 sequences become U+FFFD.
pub fn decode_payload(envelope: &str) -> Result<serde_json::Value, TrafficError> {
    let bytes = decode_envelope(envelope)?;
    let text = String::from_utf8_lossy(&bytes);
    serde_json::from_str(&text).map_err(|e| TrafficError::Parse(e.to_string()))
}

/// Inverse of [`decode_envelope`], used to build fixtures.
#[cfg(test)]
pub fn encode_envelope(bytes: &[u8]) -> String {
    BASE64.encode(xor(bytes, XOR_KEY))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_is_self_inverse() {
        let samples: [&[u8]; 4] = [b"", b"K", b"{\"a\":1}", &[0x00, 0x4b, 0xff, 0x80]];
        for bytes in samples {
            assert_eq!(xor(&xor(bytes, XOR_KEY), XOR_KEY), bytes);
        }
    }

    #[test]
    fn envelope_round_trip() {
        let all_bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(decode_envelope(&encode_envelope(&all_bytes)).unwrap(), all_bytes);
    }

    #[test]
    fn trims_whitespace() {
        let envelope = format!("  {}\n", encode_envelope(b"[]"));
        assert_eq!(decode_envelope(&envelope).unwrap(), b"[]");
    }

    #[test]
    fn accepts_unpadded_envelope() {
        let envelope = encode_envelope(b"[12]");
        let unpadded = envelope.trim_end_matches('=');
        assert_ne!(envelope, unpadded);
        assert_eq!(decode_envelope(unpadded).unwrap(), b"[12]");
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(matches!(
            decode_envelope("!!!not-base64!!!"),
            Err(TrafficError::Decode(_))
        ));
    }

    #[test]
    fn decodes_json_with_key_order_preserved() {
        let envelope = encode_envelope(r#"{"filtrosVia":[],"filtrosCausa":[]}"#.as_bytes());
        let value = decode_payload(&envelope).unwrap();
        assert_eq!(value.to_string(), r#"{"filtrosVia":[],"filtrosCausa":[]}"#);
    }

    #[test]
    fn decodes_non_ascii_text() {
        let envelope = encode_envelope(r#"{"causa":"Meteorológicos"}"#.as_bytes());
        assert_eq!(decode_payload(&envelope).unwrap()["causa"], "Meteorológicos");
    }

    #[test]
    fn non_json_is_parse_error() {
        let envelope = encode_envelope(b"not json");
        assert!(matches!(decode_payload(&envelope), Err(TrafficError::Parse(_))));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let envelope = encode_envelope(b"{\"a\":\"x\xff\"}");
        let value = decode_payload(&envelope).unwrap();
        assert_eq!(value["a"], "x\u{FFFD}");
    }

    #[test]
    fn invalid_utf8_outside_strings_is_parse_error() {
        let envelope = encode_envelope(&[0xff, 0xfe]);
        assert!(matches!(decode_payload(&envelope), Err(TrafficError::Parse(_))));
    }

    #[test]
    fn discards_non_zero_trailing_bits() {
        assert_eq!(decode_envelope("e31=").unwrap(), decode_envelope("e30=").unwrap());
        assert_eq!(decode_envelope("e30=").unwrap(), xor(b"{}", XOR_KEY));
    }
}
