//! The codec table: every encoding this tool can read or write.
//!
//! Each entry maps a canonical name and its Windows code-page identifier to a
//! byte-width class, an optional BOM marker, and strict decode/encode
//! routines. UTF-8 and the legacy single/double-byte encodings delegate to
//! `encoding_rs`; UTF-16 and UTF-32 are implemented here because
//! `encoding_rs` follows the WHATWG Encoding Standard and does not encode to
//! them.

use crate::bom::ByteOrderMark;
use crate::errors::{Error, Result};

/// How many bytes a single character may occupy in an encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthClass {
    /// One byte per character (windows-1252, US-ASCII).
    SingleByte,
    /// One to four bytes per character (UTF-8, GB18030, ISO-2022-JP).
    Variable,
    /// Fixed-width code units of two or four bytes, or classic DBCS
    /// lead/trail pairs (UTF-16, UTF-32, Shift_JIS, EUC family, Big5).
    DoubleByte,
}

impl WidthClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidthClass::SingleByte => "single-byte",
            WidthClass::Variable => "variable",
            WidthClass::DoubleByte => "double-byte",
        }
    }
}

/// The fixed set of supported encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
    ShiftJis,
    EucJp,
    EucKr,
    Gb18030,
    Big5,
    Iso2022Jp,
    Windows1252,
    Ascii,
}

/// One row of the codec table.
///
/// Produced once per file per operation and immutable thereafter.
#[derive(Debug)]
pub struct EncodingDescriptor {
    pub encoding: TextEncoding,
    /// Canonical name, also used in reports and error messages.
    pub name: &'static str,
    /// Windows code-page identifier (65001, 932, 1200, ...).
    pub code_page: u32,
    pub width: WidthClass,
    /// The marker this encoding writes when a BOM is requested.
    /// `ByteOrderMark::None` means the encoding has no BOM form and any BOM
    /// policy is a no-op.
    pub bom: ByteOrderMark,
    /// Accepted aliases, lowercase. The code page in decimal is always
    /// accepted as well.
    aliases: &'static [&'static str],
}

static TABLE: [EncodingDescriptor; 13] = [
    EncodingDescriptor {
        encoding: TextEncoding::Utf8,
        name: "UTF-8",
        code_page: 65001,
        width: WidthClass::Variable,
        bom: ByteOrderMark::Utf8,
        aliases: &["utf-8", "utf8"],
    },
    EncodingDescriptor {
        encoding: TextEncoding::Utf16Le,
        name: "UTF-16LE",
        code_page: 1200,
        width: WidthClass::DoubleByte,
        bom: ByteOrderMark::Utf16Le,
        aliases: &["utf-16", "utf-16le", "utf16", "utf16le", "unicode"],
    },
    EncodingDescriptor {
        encoding: TextEncoding::Utf16Be,
        name: "UTF-16BE",
        code_page: 1201,
        width: WidthClass::DoubleByte,
        bom: ByteOrderMark::Utf16Be,
        aliases: &["utf-16be", "utf16be", "unicodefffe"],
    },
    EncodingDescriptor {
        encoding: TextEncoding::Utf32Le,
        name: "UTF-32LE",
        code_page: 12000,
        width: WidthClass::DoubleByte,
        bom: ByteOrderMark::Utf32Le,
        aliases: &["utf-32", "utf-32le", "utf32", "utf32le"],
    },
    EncodingDescriptor {
        encoding: TextEncoding::Utf32Be,
        name: "UTF-32BE",
        code_page: 12001,
        width: WidthClass::DoubleByte,
        bom: ByteOrderMark::Utf32Be,
        aliases: &["utf-32be", "utf32be"],
    },
    EncodingDescriptor {
        encoding: TextEncoding::ShiftJis,
        name: "Shift_JIS",
        code_page: 932,
        width: WidthClass::DoubleByte,
        bom: ByteOrderMark::None,
        aliases: &["shift_jis", "shift-jis", "shiftjis", "sjis", "cp932"],
    },
    EncodingDescriptor {
        encoding: TextEncoding::EucJp,
        name: "EUC-JP",
        code_page: 51932,
        width: WidthClass::DoubleByte,
        bom: ByteOrderMark::None,
        aliases: &["euc-jp", "eucjp"],
    },
    EncodingDescriptor {
        encoding: TextEncoding::EucKr,
        name: "EUC-KR",
        code_page: 51949,
        width: WidthClass::DoubleByte,
        bom: ByteOrderMark::None,
        aliases: &["euc-kr", "euckr"],
    },
    EncodingDescriptor {
        encoding: TextEncoding::Gb18030,
        name: "GB18030",
        code_page: 54936,
        width: WidthClass::Variable,
        bom: ByteOrderMark::None,
        aliases: &["gb18030"],
    },
    EncodingDescriptor {
        encoding: TextEncoding::Big5,
        name: "Big5",
        code_page: 950,
        width: WidthClass::DoubleByte,
        bom: ByteOrderMark::None,
        aliases: &["big5", "big-5", "cp950"],
    },
    EncodingDescriptor {
        encoding: TextEncoding::Iso2022Jp,
        name: "ISO-2022-JP",
        code_page: 50220,
        width: WidthClass::Variable,
        bom: ByteOrderMark::None,
        aliases: &["iso-2022-jp", "iso2022jp", "jis", "csiso2022jp"],
    },
    EncodingDescriptor {
        encoding: TextEncoding::Windows1252,
        name: "windows-1252",
        code_page: 1252,
        width: WidthClass::SingleByte,
        bom: ByteOrderMark::None,
        aliases: &["windows-1252", "cp1252", "latin1", "iso-8859-1"],
    },
    EncodingDescriptor {
        encoding: TextEncoding::Ascii,
        name: "US-ASCII",
        code_page: 20127,
        width: WidthClass::SingleByte,
        bom: ByteOrderMark::None,
        aliases: &["us-ascii", "ascii"],
    },
];

/// Returns the full codec table in declaration order.
pub fn all() -> &'static [EncodingDescriptor] {
    &TABLE
}

/// Returns the descriptor for an encoding variant.
pub fn descriptor(encoding: TextEncoding) -> &'static EncodingDescriptor {
    TABLE
        .iter()
        .find(|d| d.encoding == encoding)
        .unwrap_or(&TABLE[0])
}

/// Resolves a user-supplied encoding name or decimal code page.
///
/// Matching is case-insensitive. Unknown names are fatal for the whole
/// invocation, so this is checked before any file is touched.
pub fn resolve(name: &str) -> Result<&'static EncodingDescriptor> {
    let lowered = name.trim().to_lowercase();
    TABLE
        .iter()
        .find(|d| {
            d.aliases.contains(&lowered.as_str()) || d.code_page.to_string() == lowered
        })
        .ok_or_else(|| Error::UnknownEncoding(name.to_string()))
}

/// Returns the descriptor implied by a BOM marker, if the marker names one.
pub fn from_bom(bom: ByteOrderMark) -> Option<&'static EncodingDescriptor> {
    let encoding = match bom {
        ByteOrderMark::None => return None,
        ByteOrderMark::Utf8 => TextEncoding::Utf8,
        ByteOrderMark::Utf16Le => TextEncoding::Utf16Le,
        ByteOrderMark::Utf16Be => TextEncoding::Utf16Be,
        ByteOrderMark::Utf32Le => TextEncoding::Utf32Le,
        ByteOrderMark::Utf32Be => TextEncoding::Utf32Be,
    };
    Some(descriptor(encoding))
}

impl EncodingDescriptor {
    /// Strictly decodes `bytes` (with any BOM already stripped).
    ///
    /// Returns `None` when the byte stream is malformed for this encoding;
    /// no replacement characters are ever substituted.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self.encoding {
            TextEncoding::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            TextEncoding::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
            TextEncoding::Utf32Le => decode_utf32(bytes, u32::from_le_bytes),
            TextEncoding::Utf32Be => decode_utf32(bytes, u32::from_be_bytes),
            TextEncoding::Ascii => {
                if bytes.is_ascii() {
                    // Safe to interpret directly: 7-bit ASCII is valid UTF-8.
                    String::from_utf8(bytes.to_vec()).ok()
                } else {
                    None
                }
            }
            _ => self
                .rs_encoding()
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|cow| cow.into_owned()),
        }
    }

    /// Strictly encodes `text` into this encoding's byte form, without a BOM.
    ///
    /// Returns `None` when `text` contains a character the encoding cannot
    /// represent.
    pub fn encode(&self, text: &str) -> Option<Vec<u8>> {
        match self.encoding {
            TextEncoding::Utf16Le => Some(encode_utf16(text, u16::to_le_bytes)),
            TextEncoding::Utf16Be => Some(encode_utf16(text, u16::to_be_bytes)),
            TextEncoding::Utf32Le => Some(encode_utf32(text, u32::to_le_bytes)),
            TextEncoding::Utf32Be => Some(encode_utf32(text, u32::to_be_bytes)),
            TextEncoding::Ascii => {
                if text.is_ascii() {
                    Some(text.as_bytes().to_vec())
                } else {
                    None
                }
            }
            _ => {
                let (bytes, _, had_unmappable) = self.rs_encoding().encode(text);
                if had_unmappable {
                    None
                } else {
                    Some(bytes.into_owned())
                }
            }
        }
    }

    /// `true` when this encoding defines a BOM form.
    pub fn has_bom_form(&self) -> bool {
        !self.bom.is_none()
    }

    fn rs_encoding(&self) -> &'static encoding_rs::Encoding {
        match self.encoding {
            TextEncoding::Utf8 => encoding_rs::UTF_8,
            TextEncoding::ShiftJis => encoding_rs::SHIFT_JIS,
            TextEncoding::EucJp => encoding_rs::EUC_JP,
            TextEncoding::EucKr => encoding_rs::EUC_KR,
            TextEncoding::Gb18030 => encoding_rs::GB18030,
            TextEncoding::Big5 => encoding_rs::BIG5,
            TextEncoding::Iso2022Jp => encoding_rs::ISO_2022_JP,
            TextEncoding::Windows1252 => encoding_rs::WINDOWS_1252,
            // UTF-16/32 and ASCII never reach encoding_rs.
            _ => encoding_rs::UTF_8,
        }
    }
}

fn decode_utf16(bytes: &[u8], from_bytes: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| from_bytes([pair[0], pair[1]]))
        .collect();
    // from_utf16 rejects unpaired surrogates, which keeps the decode strict.
    String::from_utf16(&units).ok()
}

fn encode_utf16(text: &str, to_bytes: fn(u16) -> [u8; 2]) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&to_bytes(unit));
    }
    out
}

fn decode_utf32(bytes: &[u8], from_bytes: fn([u8; 4]) -> u32) -> Option<String> {
    if bytes.len() % 4 != 0 {
        return None;
    }
    let mut out = String::with_capacity(bytes.len() / 4);
    for quad in bytes.chunks_exact(4) {
        let value = from_bytes([quad[0], quad[1], quad[2], quad[3]]);
        out.push(char::from_u32(value)?);
    }
    Some(out)
}

fn encode_utf32(text: &str, to_bytes: fn(u32) -> [u8; 4]) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 4);
    for ch in text.chars() {
        out.extend_from_slice(&to_bytes(ch as u32));
    }
    out
}
