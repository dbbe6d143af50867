//! Re-encoding and atomic output.
//!
//! The writer owns the tail of the replace pipeline: line-ending
//! normalization, encoding into the target byte form, the BOM policy, and an
//! atomic whole-file write.

use crate::codec::EncodingDescriptor;
use crate::errors::{Error, Result};
use crate::newline;
use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Governs whether the written file carries a BOM, independent of the
/// read-side state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BomPolicy {
    /// Always write the target encoding's marker (when it defines one).
    Add,
    /// Never write a marker.
    Remove,
    /// Mirror the source file's BOM state.
    #[default]
    Preserve,
}

impl BomPolicy {
    /// Resolves the policy against the source file's BOM state.
    pub fn include_bom(&self, source_had_bom: bool) -> bool {
        match self {
            BomPolicy::Add => true,
            BomPolicy::Remove => false,
            BomPolicy::Preserve => source_had_bom,
        }
    }
}

/// Encodes `text` into `target` and replaces the contents of `path`.
///
/// When `target_newline` is set, every line terminator is first rewritten to
/// it uniformly. The BOM marker is prepended only when the policy resolves to
/// include one *and* the target encoding defines a marker; for single-byte
/// legacy encodings the policy is a no-op.
///
/// The write is atomic: bytes go to a temp file in the destination directory
/// which is then persisted over `path`, preserving the original permissions.
pub fn write_transcoded(
    path: &Path,
    text: &str,
    target: &'static EncodingDescriptor,
    bom_policy: BomPolicy,
    source_had_bom: bool,
    target_newline: Option<&str>,
) -> Result<()> {
    let text: Cow<str> = match target_newline {
        Some(terminator) => Cow::Owned(newline::normalize(text, terminator)),
        None => Cow::Borrowed(text),
    };

    let body = target.encode(&text).ok_or_else(|| Error::Encode {
        path: path.to_path_buf(),
        encoding: target.name,
    })?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut temp_file = NamedTempFile::new_in(parent)?;
    if bom_policy.include_bom(source_had_bom) && target.has_bom_form() {
        temp_file.write_all(target.bom.as_bytes())?;
    }
    temp_file.write_all(&body)?;

    // Preserve file permissions when replacing an existing file.
    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp_file.path(), metadata.permissions())?;
    }
    temp_file.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{descriptor, TextEncoding};
    use crate::detect::{self, DetectionMode};
    use tempfile::TempDir;

    #[test]
    fn test_add_policy_prepends_utf8_marker() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");

        write_transcoded(
            &path,
            "content",
            descriptor(TextEncoding::Utf8),
            BomPolicy::Add,
            false,
            None,
        )
        .unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
        assert_eq!(&bytes[3..], b"content");
    }

    #[test]
    fn test_add_policy_is_a_noop_for_single_byte_encodings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");

        write_transcoded(
            &path,
            "content",
            descriptor(TextEncoding::Windows1252),
            BomPolicy::Add,
            false,
            None,
        )
        .unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"content");
    }

    #[test]
    fn test_remove_policy_strips_a_source_bom() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");

        write_transcoded(
            &path,
            "content",
            descriptor(TextEncoding::Utf8),
            BomPolicy::Remove,
            true,
            None,
        )
        .unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"content");
    }

    #[test]
    fn test_preserve_policy_mirrors_source_state() {
        assert!(BomPolicy::Preserve.include_bom(true));
        assert!(!BomPolicy::Preserve.include_bom(false));
    }

    #[test]
    fn test_newline_override_applies_uniformly() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");

        write_transcoded(
            &path,
            "a\r\nb\nc\r",
            descriptor(TextEncoding::Utf8),
            BomPolicy::Remove,
            false,
            Some("\n"),
        )
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\nc\n");
    }

    #[test]
    fn test_decode_then_rewrite_round_trips_exact_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("roundtrip.txt");

        let desc = descriptor(TextEncoding::Utf16Le);
        let mut original = desc.bom.as_bytes().to_vec();
        original.extend(desc.encode("Line1\r\nLine2 テスト").unwrap());
        fs::write(&path, &original).unwrap();

        let raw = fs::read(&path).unwrap();
        let detection = detect::resolve(&raw, None, DetectionMode::Normal);
        let text = detect::decode_with(&detection, &raw).unwrap();
        write_transcoded(
            &path,
            &text,
            detection.descriptor,
            BomPolicy::Preserve,
            detection.bom_exists,
            None,
        )
        .unwrap();

        assert_eq!(fs::read(&path).unwrap(), original);
    }

    #[test]
    fn test_unrepresentable_character_is_an_encode_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");

        let err = write_transcoded(
            &path,
            "한글",
            descriptor(TextEncoding::ShiftJis),
            BomPolicy::Remove,
            false,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Encode { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_directory_fails_for_that_file_only() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("no_such_dir").join("out.txt");

        let result = write_transcoded(
            &path,
            "content",
            descriptor(TextEncoding::Utf8),
            BomPolicy::Remove,
            false,
            None,
        );
        assert!(result.is_err());
    }
}
