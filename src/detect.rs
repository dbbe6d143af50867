//! Encoding classification.
//!
//! Resolution order: an explicitly specified encoding always wins, then a BOM
//! if one is present, then byte-level heuristics, then a fixed fallback. The
//! heuristics distinguish pure ASCII, valid UTF-8, and the legacy double-byte
//! East-Asian families; which families are tried, and how strictly, is a
//! policy table keyed by [`DetectionMode`].

use crate::bom::{self, ByteOrderMark};
use crate::codec::{self, EncodingDescriptor, TextEncoding};

/// Heuristic strictness profiles.
///
/// `FirstParty` narrows the candidate set to files produced in-house and
/// demands a high consistency ratio; `ThirdParty` widens the set and accepts
/// a looser ratio; `Normal` is the balanced default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionMode {
    #[default]
    Normal,
    FirstParty,
    ThirdParty,
}

/// Candidate set and acceptance threshold for one detection mode.
struct DetectionProfile {
    candidates: &'static [TextEncoding],
    /// Minimum fraction of bytes that must be covered by valid single bytes
    /// or lead/trail pairs of the candidate encoding.
    threshold: f64,
}

impl DetectionMode {
    fn profile(&self) -> DetectionProfile {
        match self {
            DetectionMode::Normal => DetectionProfile {
                candidates: &[TextEncoding::ShiftJis, TextEncoding::EucJp],
                threshold: 0.75,
            },
            DetectionMode::FirstParty => DetectionProfile {
                candidates: &[TextEncoding::ShiftJis],
                threshold: 0.90,
            },
            DetectionMode::ThirdParty => DetectionProfile {
                candidates: &[
                    TextEncoding::ShiftJis,
                    TextEncoding::EucJp,
                    TextEncoding::EucKr,
                    TextEncoding::Gb18030,
                ],
                threshold: 0.60,
            },
        }
    }
}

/// How the resolved encoding was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionOrigin {
    /// The caller supplied an encoding; heuristics never ran.
    ExplicitlySpecified,
    /// A BOM named the encoding.
    DetectedFromBom,
    /// Byte-level heuristics chose the encoding.
    HeuristicGuess,
    /// Nothing matched with sufficient confidence.
    DefaultFallback,
}

impl DetectionOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionOrigin::ExplicitlySpecified => "specified",
            DetectionOrigin::DetectedFromBom => "BOM",
            DetectionOrigin::HeuristicGuess => "heuristic",
            DetectionOrigin::DefaultFallback => "fallback",
        }
    }
}

/// The outcome of encoding resolution for one file.
#[derive(Debug, Clone, Copy)]
pub struct DetectionResult {
    pub descriptor: &'static EncodingDescriptor,
    /// The marker found at the start of the source buffer, if any.
    pub bom: ByteOrderMark,
    pub bom_exists: bool,
    pub origin: DetectionOrigin,
}

/// Every heuristic miss lands here: windows-1252 is single-byte and total,
/// so a fallback decode cannot itself fail.
const FALLBACK: TextEncoding = TextEncoding::Windows1252;

/// Resolves the encoding to decode `bytes` with.
///
/// `specified` bypasses all detection; explicit caller intent always wins.
/// Empty buffers are valid input and classify as ASCII without error.
pub fn resolve(
    bytes: &[u8],
    specified: Option<&'static EncodingDescriptor>,
    mode: DetectionMode,
) -> DetectionResult {
    let found = bom::detect(bytes);

    if let Some(descriptor) = specified {
        return DetectionResult {
            descriptor,
            bom: found,
            bom_exists: !found.is_none(),
            origin: DetectionOrigin::ExplicitlySpecified,
        };
    }

    if let Some(descriptor) = codec::from_bom(found) {
        return DetectionResult {
            descriptor,
            bom: found,
            bom_exists: true,
            origin: DetectionOrigin::DetectedFromBom,
        };
    }

    let (encoding, origin) = classify(bytes, mode);
    DetectionResult {
        descriptor: codec::descriptor(encoding),
        bom: ByteOrderMark::None,
        bom_exists: false,
        origin,
    }
}

/// Strictly decodes `bytes` under the resolved encoding.
///
/// A leading BOM is stripped only when it is the resolved encoding's own
/// marker; a foreign marker (say, a UTF-8 BOM on a file force-read as
/// Shift_JIS) stays in the payload so that re-encoding reproduces the
/// original bytes. Returns `None` when the payload is malformed.
pub fn decode_with(result: &DetectionResult, bytes: &[u8]) -> Option<String> {
    let payload = if result.bom_exists && result.descriptor.bom == result.bom {
        bom::strip(bytes, result.bom)
    } else {
        bytes
    };
    result.descriptor.decode(payload)
}

fn classify(bytes: &[u8], mode: DetectionMode) -> (TextEncoding, DetectionOrigin) {
    if bytes.is_ascii() {
        // Covers the empty buffer as well.
        return (TextEncoding::Ascii, DetectionOrigin::HeuristicGuess);
    }

    if std::str::from_utf8(bytes).is_ok() {
        return (TextEncoding::Utf8, DetectionOrigin::HeuristicGuess);
    }

    let profile = mode.profile();
    let mut best: Option<(TextEncoding, f64)> = None;
    for &candidate in profile.candidates {
        let ratio = consistency_ratio(bytes, candidate);
        if ratio >= profile.threshold && best.map_or(true, |(_, r)| ratio > r) {
            best = Some((candidate, ratio));
        }
    }

    match best {
        Some((encoding, _)) => (encoding, DetectionOrigin::HeuristicGuess),
        None => (FALLBACK, DetectionOrigin::DefaultFallback),
    }
}

/// Fraction of the buffer covered by byte patterns valid for `candidate`.
///
/// ASCII bytes and complete lead/trail pairs count as consistent; anything
/// else advances one byte without counting.
fn consistency_ratio(bytes: &[u8], candidate: TextEncoding) -> f64 {
    if bytes.is_empty() {
        return 0.0;
    }
    let consistent = match candidate {
        TextEncoding::ShiftJis => score_shift_jis(bytes),
        TextEncoding::EucJp => score_euc_jp(bytes),
        TextEncoding::EucKr => score_euc_kr(bytes),
        TextEncoding::Gb18030 => score_gb18030(bytes),
        _ => 0,
    };
    consistent as f64 / bytes.len() as f64
}

/// Shift_JIS lead bytes 0x81-0x9F and 0xE0-0xFC with trail bytes
/// 0x40-0x7E / 0x80-0xFC. Half-width katakana singles (0xA1-0xDF) are not
/// scored; they collide with EUC lead bytes.
fn score_shift_jis(bytes: &[u8]) -> usize {
    let mut consistent = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b < 0x80 {
            consistent += 1;
            i += 1;
        } else if matches!(b, 0x81..=0x9F | 0xE0..=0xFC)
            && matches!(bytes.get(i + 1), Some(0x40..=0x7E | 0x80..=0xFC))
        {
            consistent += 2;
            i += 2;
        } else {
            i += 1;
        }
    }
    consistent
}

/// EUC-JP: 0xA1-0xFE pairs, 0x8E + half-width kana, 0x8F + two-byte
/// supplementary plane.
fn score_euc_jp(bytes: &[u8]) -> usize {
    let mut consistent = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b < 0x80 {
            consistent += 1;
            i += 1;
        } else if b == 0x8E && matches!(bytes.get(i + 1), Some(0xA1..=0xDF)) {
            consistent += 2;
            i += 2;
        } else if b == 0x8F
            && matches!(bytes.get(i + 1), Some(0xA1..=0xFE))
            && matches!(bytes.get(i + 2), Some(0xA1..=0xFE))
        {
            consistent += 3;
            i += 3;
        } else if matches!(b, 0xA1..=0xFE) && matches!(bytes.get(i + 1), Some(0xA1..=0xFE)) {
            consistent += 2;
            i += 2;
        } else {
            i += 1;
        }
    }
    consistent
}

/// EUC-KR: 0xA1-0xFE lead/trail pairs.
fn score_euc_kr(bytes: &[u8]) -> usize {
    let mut consistent = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b < 0x80 {
            consistent += 1;
            i += 1;
        } else if matches!(b, 0xA1..=0xFE) && matches!(bytes.get(i + 1), Some(0xA1..=0xFE)) {
            consistent += 2;
            i += 2;
        } else {
            i += 1;
        }
    }
    consistent
}

/// GB18030: four-byte sequences are tested before the two-byte form because
/// their second byte (0x30-0x39) is outside the two-byte trail range.
fn score_gb18030(bytes: &[u8]) -> usize {
    let mut consistent = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b < 0x80 {
            consistent += 1;
            i += 1;
        } else if matches!(b, 0x81..=0xFE)
            && matches!(bytes.get(i + 1), Some(0x30..=0x39))
            && matches!(bytes.get(i + 2), Some(0x81..=0xFE))
            && matches!(bytes.get(i + 3), Some(0x30..=0x39))
        {
            consistent += 4;
            i += 4;
        } else if matches!(b, 0x81..=0xFE)
            && matches!(bytes.get(i + 1), Some(0x40..=0x7E | 0x80..=0xFE))
        {
            consistent += 2;
            i += 2;
        } else {
            i += 1;
        }
    }
    consistent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::descriptor;

    #[test]
    fn test_specified_encoding_always_wins() {
        // UTF-8 BOM on the buffer, but the caller said Shift_JIS.
        let mut buf = vec![0xEF, 0xBB, 0xBF];
        buf.extend_from_slice(b"data");
        let result = resolve(
            &buf,
            Some(descriptor(TextEncoding::ShiftJis)),
            DetectionMode::Normal,
        );
        assert_eq!(result.origin, DetectionOrigin::ExplicitlySpecified);
        assert_eq!(result.descriptor.encoding, TextEncoding::ShiftJis);
        // The BOM state still reflects the buffer.
        assert!(result.bom_exists);
    }

    #[test]
    fn test_bom_resolves_without_heuristics() {
        let mut buf = vec![0xFF, 0xFE];
        buf.extend_from_slice(&[0x41, 0x00]);
        let result = resolve(&buf, None, DetectionMode::Normal);
        assert_eq!(result.origin, DetectionOrigin::DetectedFromBom);
        assert_eq!(result.descriptor.encoding, TextEncoding::Utf16Le);
        assert!(result.bom_exists);
    }

    #[test]
    fn test_pure_ascii_classifies_as_ascii_without_bom() {
        let result = resolve(b"only seven bit bytes", None, DetectionMode::Normal);
        assert_eq!(result.descriptor.encoding, TextEncoding::Ascii);
        assert_eq!(result.origin, DetectionOrigin::HeuristicGuess);
        assert!(!result.bom_exists);
    }

    #[test]
    fn test_empty_buffer_resolves_without_error() {
        let result = resolve(b"", None, DetectionMode::Normal);
        assert_eq!(result.descriptor.encoding, TextEncoding::Ascii);
        assert!(!result.bom_exists);
    }

    #[test]
    fn test_multibyte_utf8_classifies_as_utf8() {
        let result = resolve("特別な内容".as_bytes(), None, DetectionMode::Normal);
        assert_eq!(result.descriptor.encoding, TextEncoding::Utf8);
        assert_eq!(result.origin, DetectionOrigin::HeuristicGuess);
        assert!(!result.bom_exists);
    }

    #[test]
    fn test_shift_jis_bytes_classify_as_shift_jis() {
        // "日本語" in Shift_JIS.
        let bytes = [0x93, 0xFA, 0x96, 0x7B, 0x8C, 0xEA];
        let result = resolve(&bytes, None, DetectionMode::Normal);
        assert_eq!(result.descriptor.encoding, TextEncoding::ShiftJis);
        assert_eq!(result.origin, DetectionOrigin::HeuristicGuess);
    }

    #[test]
    fn test_euc_jp_bytes_classify_as_euc_jp() {
        // "日本語" in EUC-JP.
        let bytes = [0xC6, 0xFC, 0xCB, 0xDC, 0xB8, 0xEC];
        let result = resolve(&bytes, None, DetectionMode::Normal);
        assert_eq!(result.descriptor.encoding, TextEncoding::EucJp);
    }

    #[test]
    fn test_first_party_mode_narrows_the_candidate_set() {
        // EUC-JP bytes score poorly as Shift_JIS, and first-party mode tries
        // nothing else, so the fallback applies.
        let bytes = [0xC6, 0xFC, 0xCB, 0xDC, 0xB8, 0xEC];
        let result = resolve(&bytes, None, DetectionMode::FirstParty);
        assert_eq!(result.descriptor.encoding, TextEncoding::Windows1252);
        assert_eq!(result.origin, DetectionOrigin::DefaultFallback);
    }

    #[test]
    fn test_third_party_mode_widens_the_candidate_set() {
        // "한글" in EUC-KR.
        let desc = descriptor(TextEncoding::EucKr);
        let bytes = desc.encode("한글 텍스트").unwrap();
        let result = resolve(&bytes, None, DetectionMode::ThirdParty);
        assert!(matches!(
            result.descriptor.encoding,
            // EUC-KR pairs are also consistent EUC-JP pairs; either answer
            // decodes the scored range, and candidate order breaks the tie.
            TextEncoding::EucJp | TextEncoding::EucKr
        ));
        assert_eq!(result.origin, DetectionOrigin::HeuristicGuess);
    }

    #[test]
    fn test_inconsistent_bytes_fall_back_to_windows_1252() {
        let bytes = [b'A', 0xFF, b'B'];
        let result = resolve(&bytes, None, DetectionMode::Normal);
        assert_eq!(result.descriptor.encoding, TextEncoding::Windows1252);
        assert_eq!(result.origin, DetectionOrigin::DefaultFallback);
    }

    #[test]
    fn test_decode_with_strips_the_detected_bom() {
        let mut buf = vec![0xEF, 0xBB, 0xBF];
        buf.extend_from_slice("中身".as_bytes());
        let result = resolve(&buf, None, DetectionMode::Normal);
        assert_eq!(decode_with(&result, &buf).unwrap(), "中身");
    }

    #[test]
    fn test_decode_with_reports_malformed_payload() {
        let buf = [0xC3, 0x28]; // invalid UTF-8 continuation
        let result = resolve(
            &buf,
            Some(descriptor(TextEncoding::Utf8)),
            DetectionMode::Normal,
        );
        assert!(decode_with(&result, &buf).is_none());
    }
}
