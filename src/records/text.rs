use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::LoadError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Byte pairs inspected when sniffing UTF-16 without a BOM
const SNIFF_PAIRS: usize = 256;

/// Encoding assumed for files that carry no byte-order mark
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    /// UTF-16 if the content is NUL-interleaved, UTF-8 otherwise
    #[default]
    #[serde(rename = "auto")]
    Auto,
    /// UTF-8
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    /// UTF-16 little endian, the tester's native layout
    #[serde(rename = "utf-16le", alias = "utf-16", alias = "utf16")]
    Utf16Le,
    /// UTF-16 big endian
    #[serde(rename = "utf-16be")]
    Utf16Be,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextEncoding::Auto => "auto",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Utf16Be => "utf-16be",
        };
        f.write_str(name)
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(TextEncoding::Auto),
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "utf-16" | "utf16" | "utf-16le" | "utf16le" => Ok(TextEncoding::Utf16Le),
            "utf-16be" | "utf16be" => Ok(TextEncoding::Utf16Be),
            other => Err(format!(
                "unknown encoding '{other}' (expected auto, utf-8, utf-16le or utf-16be)"
            )),
        }
    }
}

/// Decode file content by its byte-order mark, sniffing UTF-16 when absent.
///
/// Shorthand for [`decode_text_with`] with [`TextEncoding::Auto`].
pub fn decode_text(bytes: &[u8]) -> Result<String, LoadError> {
    decode_text_with(bytes, TextEncoding::Auto)
}

/// Decode file content by its byte-order mark, or by `fallback` without one.
///
/// A BOM always wins. Decoded UTF-8 must not contain NUL bytes: those mean
/// UTF-16 content was read with the wrong encoding.
pub fn decode_text_with(bytes: &[u8], fallback: TextEncoding) -> Result<String, LoadError> {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return utf8(rest);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
        return utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
        return utf16(rest, u16::from_be_bytes);
    }
    match fallback {
        TextEncoding::Utf8 => utf8(bytes),
        TextEncoding::Utf16Le => utf16(bytes, u16::from_le_bytes),
        TextEncoding::Utf16Be => utf16(bytes, u16::from_be_bytes),
        TextEncoding::Auto => match sniff_utf16(bytes) {
            Some(TextEncoding::Utf16Le) => utf16(bytes, u16::from_le_bytes),
            Some(TextEncoding::Utf16Be) => utf16(bytes, u16::from_be_bytes),
            _ => utf8(bytes),
        },
    }
}

/// Guess the byte order of BOM-less UTF-16 from where the NUL bytes sit
fn sniff_utf16(bytes: &[u8]) -> Option<TextEncoding> {
    if bytes.len() < 2 || bytes.len() % 2 != 0 {
        return None;
    }
    let (mut even, mut odd) = (0usize, 0usize);
    let mut pairs = 0usize;
    for pair in bytes.chunks_exact(2).take(SNIFF_PAIRS) {
        pairs += 1;
        even += usize::from(pair[0] == 0);
        odd += usize::from(pair[1] == 0);
    }
    if odd * 2 > pairs && even < odd {
        Some(TextEncoding::Utf16Le)
    } else if even * 2 > pairs && odd < even {
        Some(TextEncoding::Utf16Be)
    } else {
        None
    }
}

fn utf8(bytes: &[u8]) -> Result<String, LoadError> {
    if let Some(offset) = bytes.iter().position(|&b| b == 0) {
        return Err(LoadError::EncodingError(format!(
            "NUL byte at offset {offset} in UTF-8 content; UTF-16 without a byte-order mark?"
        )));
    }
    String::from_utf8(bytes.to_vec()).map_err(|e| LoadError::EncodingError(e.to_string()))
}

fn utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String, LoadError> {
    if bytes.len() % 2 != 0 {
        return Err(LoadError::EncodingError(format!(
            "UTF-16 content has odd length {}",
            bytes.len()
        )));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| LoadError::EncodingError(e.to_string()))
}

/// Parse a number written with either `.` or a custom decimal separator
pub fn parse_decimal(value: &str, decimal_separator: char) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if decimal_separator == '.' {
        value.parse().ok()
    } else {
        value.replace(decimal_separator, ".").parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(s: &str) -> Vec<u8> {
        let mut out = UTF16_LE_BOM.to_vec();
        out.extend(s.encode_utf16().flat_map(|u| u.to_le_bytes()));
        out
    }

    #[test]
    fn test_decode_utf16_le() {
        assert_eq!(decode_text(&utf16le("GUID=ä;1")).unwrap(), "GUID=ä;1");
    }

    #[test]
    fn test_decode_utf16_be() {
        let mut bytes = UTF16_BE_BOM.to_vec();
        bytes.extend("ab".encode_utf16().flat_map(|u| u.to_be_bytes()));
        assert_eq!(decode_text(&bytes).unwrap(), "ab");
    }

    #[test]
    fn test_decode_utf8_with_and_without_bom() {
        assert_eq!(decode_text(b"\xEF\xBB\xBFabc").unwrap(), "abc");
        assert_eq!(decode_text(b"abc").unwrap(), "abc");
    }

    #[test]
    fn test_decode_rejects_broken_input() {
        assert!(matches!(
            decode_text(&[0xFF, 0xFE, 0x41]),
            Err(LoadError::EncodingError(_))
        ));
        assert!(matches!(decode_text(&[0xC3, 0x28]), Err(LoadError::EncodingError(_))));
    }

    fn utf16le_without_bom(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    #[test]
    fn test_decode_utf16_le_without_bom() {
        let bytes = utf16le_without_bom("h0;h1\r\nr1;x");
        assert_eq!(decode_text(&bytes).unwrap(), "h0;h1\r\nr1;x");
        assert_eq!(
            decode_text_with(&bytes, TextEncoding::Utf16Le).unwrap(),
            "h0;h1\r\nr1;x"
        );
    }

    #[test]
    fn test_decode_utf16_be_without_bom() {
        let bytes: Vec<u8> = "GUID={A}"
            .encode_utf16()
            .flat_map(|u| u.to_be_bytes())
            .collect();
        assert_eq!(decode_text(&bytes).unwrap(), "GUID={A}");
    }

    #[test]
    fn test_forced_utf8_rejects_interleaved_nuls() {
        let bytes = utf16le_without_bom("run;guid");
        assert!(matches!(
            decode_text_with(&bytes, TextEncoding::Utf8),
            Err(LoadError::EncodingError(_))
        ));
    }

    #[test]
    fn test_bom_overrides_fallback() {
        assert_eq!(decode_text_with(&utf16le("ab"), TextEncoding::Utf8).unwrap(), "ab");
        assert_eq!(decode_text_with(b"ab", TextEncoding::Auto).unwrap(), "ab");
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!("UTF-16".parse::<TextEncoding>(), Ok(TextEncoding::Utf16Le));
        assert_eq!("utf8".parse::<TextEncoding>(), Ok(TextEncoding::Utf8));
        assert_eq!("utf-16be".parse::<TextEncoding>(), Ok(TextEncoding::Utf16Be));
        assert!("latin1".parse::<TextEncoding>().is_err());
        assert_eq!(TextEncoding::Utf16Le.to_string(), "utf-16le");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("1.5", '.'), Some(1.5));
        assert_eq!(parse_decimal(" 1,5 ", ','), Some(1.5));
        assert_eq!(parse_decimal("", '.'), None);
        assert_eq!(parse_decimal("abc", ','), None);
    }
}
