//! Plain-text extraction from uploaded CV files.
//!
//! Extraction sits behind a trait so handlers and tests can swap the
//! filesystem-backed implementation for a canned one. A failure here is a
//! distinct error kind carrying the path and cause -- callers in the
//! submission workflow log it and continue, they never fail the upload.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported CV format '{extension}' for '{path}'")]
    UnsupportedFormat { path: String, extension: String },

    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to extract text from '{path}': {cause}")]
    Parse { path: String, cause: String },
}

/// Capability port for turning a stored CV file into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract_plain_text(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// Filesystem-backed extractor: PDF via `pdf-extract`, legacy `.doc` via a
/// lossy byte salvage. `.docx` is reported as a parse failure rather than
/// silently returning empty text.
pub struct FileTextExtractor;

impl TextExtractor for FileTextExtractor {
    fn extract_plain_text(&self, path: &Path) -> Result<String, ExtractionError> {
        let display = path.display().to_string();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => pdf_extract::extract_text(path).map_err(|e| ExtractionError::Parse {
                path: display,
                cause: e.to_string(),
            }),
            "doc" => {
                let bytes = std::fs::read(path).map_err(|source| ExtractionError::Io {
                    path: display,
                    source,
                })?;
                Ok(salvage_doc_text(&bytes))
            }
            "docx" => Err(ExtractionError::Parse {
                path: display,
                cause: "docx extraction is not available; upload pdf or doc".to_string(),
            }),
            _ => Err(ExtractionError::UnsupportedFormat {
                path: display,
                extension,
            }),
        }
    }
}

/// Best-effort text recovery from a legacy binary .doc: decode lossily and
/// keep printable runs, collapsing everything else to single spaces.
fn salvage_doc_text(bytes: &[u8]) -> String {
    let decoded = String::from_utf8_lossy(bytes);
    let mut out = String::with_capacity(decoded.len());
    let mut last_was_space = false;

    for c in decoded.chars() {
        if c.is_control() || c == '\u{fffd}' {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else {
            out.push(c);
            last_was_space = c == ' ';
        }
    }

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, contents: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        (dir, path)
    }

    #[test]
    fn unknown_extension_is_a_distinct_error() {
        let (_dir, path) = temp_file("resume.txt", b"plain text");
        let err = FileTextExtractor.extract_plain_text(&path).unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat { .. }));
    }

    #[test]
    fn doc_salvage_recovers_printable_text() {
        let (_dir, path) = temp_file("resume.doc", b"C# developer\0\0with SQL\r\nskills");
        let text = FileTextExtractor.extract_plain_text(&path).unwrap();
        assert!(text.contains("C# developer"));
        assert!(text.contains("SQL"));
        assert!(!text.contains('\0'));
    }

    #[test]
    fn docx_reports_failure_not_empty_text() {
        let (_dir, path) = temp_file("resume.docx", b"PK\x03\x04");
        let err = FileTextExtractor.extract_plain_text(&path).unwrap_err();
        assert!(matches!(err, ExtractionError::Parse { .. }));
        assert!(err.to_string().contains("resume.docx"));
    }

    #[test]
    fn corrupt_pdf_reports_parse_failure() {
        let (_dir, path) = temp_file("resume.pdf", b"not actually a pdf");
        let err = FileTextExtractor.extract_plain_text(&path).unwrap_err();
        assert!(matches!(err, ExtractionError::Parse { .. }));
    }

    #[test]
    fn error_messages_name_the_path() {
        let (_dir, path) = temp_file("resume.broken", b"");
        let err = FileTextExtractor.extract_plain_text(&path).unwrap_err();
        assert!(err.to_string().contains("resume.broken"));
    }
}
