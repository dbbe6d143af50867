//! Byte order mark detection.
//!
//! A BOM identifies both an encoding and, for the multi-byte forms, byte
//! order. Detection is a pure function of the buffer's leading bytes.

/// UTF-8 BOM bytes.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
/// UTF-16 little-endian BOM bytes.
pub const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
/// UTF-16 big-endian BOM bytes.
pub const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];
/// UTF-32 little-endian BOM bytes.
pub const UTF32_LE_BOM: [u8; 4] = [0xFF, 0xFE, 0x00, 0x00];
/// UTF-32 big-endian BOM bytes.
pub const UTF32_BE_BOM: [u8; 4] = [0x00, 0x00, 0xFE, 0xFF];

/// The byte order mark found at the start of a buffer, if any.
///
/// A variant other than `None` guarantees its marker bytes are a verified
/// prefix of the buffer it was detected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrderMark {
    None,
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl ByteOrderMark {
    /// Returns the canonical marker byte sequence (empty for `None`).
    pub const fn as_bytes(&self) -> &'static [u8] {
        match self {
            ByteOrderMark::None => &[],
            ByteOrderMark::Utf8 => &UTF8_BOM,
            ByteOrderMark::Utf16Le => &UTF16_LE_BOM,
            ByteOrderMark::Utf16Be => &UTF16_BE_BOM,
            ByteOrderMark::Utf32Le => &UTF32_LE_BOM,
            ByteOrderMark::Utf32Be => &UTF32_BE_BOM,
        }
    }

    /// Returns the marker length in bytes (0 for `None`).
    pub const fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// `true` when the buffer carries no marker.
    pub const fn is_none(&self) -> bool {
        matches!(self, ByteOrderMark::None)
    }
}

/// Classifies the BOM at the start of `bytes`.
///
/// Markers are checked in a deterministic order: the 3-byte UTF-8 marker,
/// then the 4-byte UTF-32 markers, then the 2-byte UTF-16 markers. UTF-32LE
/// must be tested before UTF-16LE because `FF FE` is a prefix of
/// `FF FE 00 00`. Buffers shorter than the shortest marker yield `None`.
pub fn detect(bytes: &[u8]) -> ByteOrderMark {
    if bytes.starts_with(&UTF8_BOM) {
        return ByteOrderMark::Utf8;
    }
    if bytes.starts_with(&UTF32_LE_BOM) {
        return ByteOrderMark::Utf32Le;
    }
    if bytes.starts_with(&UTF32_BE_BOM) {
        return ByteOrderMark::Utf32Be;
    }
    if bytes.starts_with(&UTF16_LE_BOM) {
        return ByteOrderMark::Utf16Le;
    }
    if bytes.starts_with(&UTF16_BE_BOM) {
        return ByteOrderMark::Utf16Be;
    }
    ByteOrderMark::None
}

/// Returns `bytes` with the given marker removed from the front.
///
/// The marker must have been detected from this buffer, so the prefix is
/// known to be present.
pub fn strip<'a>(bytes: &'a [u8], bom: ByteOrderMark) -> &'a [u8] {
    &bytes[bom.len()..]
}
