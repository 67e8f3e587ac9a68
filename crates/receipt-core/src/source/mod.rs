//! Source documents: classification and raw text acquisition.
//!
//! A source is addressed by a reference string (an object key or a path).
//! Its extension decides how text is obtained:
//!
//! - text files are read as UTF-8,
//! - PDFs have their embedded text extracted,
//! - images are paired with an OCR response stored next to them.
//!
//! Anything else is unsupported and skipped by batch processing.

pub mod ocr;
#[cfg(feature = "pdf")]
pub mod pdf;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SourceError;
use crate::models::config::{normalize_extension, SourcesConfig};

pub use ocr::OcrResponse;

/// How text is obtained from a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Text,
    Pdf,
    Image,
    Unsupported,
}

impl SourceKind {
    /// Whether documents of this kind are processed at all.
    pub fn is_supported(self) -> bool {
        self != SourceKind::Unsupported
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Text => "text",
            SourceKind::Pdf => "pdf",
            SourceKind::Image => "image",
            SourceKind::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

/// Lowercased extension of the last path segment, if any.
pub fn extension(source_ref: &str) -> Option<String> {
    let name = source_ref.rsplit('/').next().unwrap_or(source_ref);
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// MIME type used when uploading a document of this name.
pub fn content_type(source_ref: &str) -> &'static str {
    match extension(source_ref).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("pdf") => "application/pdf",
        Some("txt") | Some("text") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Extension allow-lists per source kind.
#[derive(Debug, Clone)]
pub struct SourcePolicy {
    text: Vec<String>,
    pdf: Vec<String>,
    image: Vec<String>,
}

impl SourcePolicy {
    /// Build the policy from configuration.
    pub fn from_config(config: &SourcesConfig) -> Self {
        let lower = |exts: &[String]| -> Vec<String> {
            exts.iter().map(|e| normalize_extension(e)).collect()
        };
        Self {
            text: lower(&config.text_extensions),
            pdf: lower(&config.pdf_extensions),
            image: lower(&config.image_extensions),
        }
    }

    /// Classify a source reference by its extension (case-insensitive).
    pub fn classify(&self, source_ref: &str) -> SourceKind {
        let Some(ext) = extension(source_ref) else {
            return SourceKind::Unsupported;
        };
        if self.text.contains(&ext) {
            SourceKind::Text
        } else if self.pdf.contains(&ext) {
            SourceKind::Pdf
        } else if self.image.contains(&ext) {
            SourceKind::Image
        } else {
            SourceKind::Unsupported
        }
    }
}

impl Default for SourcePolicy {
    fn default() -> Self {
        Self::from_config(&SourcesConfig::default())
    }
}

/// Provides the raw text of a source document.
pub trait TextProvider {
    /// Return the document text. An empty string means there is nothing to
    /// process.
    fn extract_text(&self, source_ref: &str, kind: SourceKind) -> Result<String, SourceError>;
}

/// In-memory provider: references map directly to their text.
impl TextProvider for HashMap<String, String> {
    fn extract_text(&self, source_ref: &str, kind: SourceKind) -> Result<String, SourceError> {
        if !kind.is_supported() {
            return Err(SourceError::Unsupported(source_ref.to_string()));
        }
        Ok(self.get(source_ref).cloned().unwrap_or_default())
    }
}

/// Filesystem provider rooted at a base directory.
#[derive(Debug, Clone)]
pub struct FsTextProvider {
    root: PathBuf,
    ocr_sidecar_suffix: String,
}

impl FsTextProvider {
    /// Create a provider resolving references relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ocr_sidecar_suffix: SourcesConfig::default().ocr_sidecar_suffix,
        }
    }

    /// Set the suffix used to find an image's OCR response.
    pub fn with_ocr_sidecar_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.ocr_sidecar_suffix = suffix.into();
        self
    }

    /// Resolve a reference to a path.
    pub fn resolve(&self, source_ref: &str) -> PathBuf {
        let path = Path::new(source_ref);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Path of the OCR response belonging to an image.
    pub fn sidecar_path(&self, source_ref: &str) -> PathBuf {
        let mut path = self.resolve(source_ref).into_os_string();
        path.push(&self.ocr_sidecar_suffix);
        PathBuf::from(path)
    }

    fn read(path: &Path) -> Result<Vec<u8>, SourceError> {
        std::fs::read(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    #[cfg(feature = "pdf")]
    fn pdf_text(data: &[u8]) -> Result<String, SourceError> {
        Ok(pdf::extract_pdf_text(data)?)
    }

    #[cfg(not(feature = "pdf"))]
    fn pdf_text(_data: &[u8]) -> Result<String, SourceError> {
        Err(SourceError::Unsupported(
            "PDF support is not enabled".to_string(),
        ))
    }
}

impl TextProvider for FsTextProvider {
    fn extract_text(&self, source_ref: &str, kind: SourceKind) -> Result<String, SourceError> {
        let path = self.resolve(source_ref);
        debug!("Reading {} source {}", kind, path.display());

        match kind {
            SourceKind::Text => {
                let bytes = Self::read(&path)?;
                String::from_utf8(bytes).map_err(|_| SourceError::Encoding(source_ref.to_string()))
            }
            SourceKind::Pdf => Self::pdf_text(&Self::read(&path)?),
            SourceKind::Image => {
                let sidecar = self.sidecar_path(source_ref);
                if !sidecar.exists() {
                    return Err(SourceError::MissingOcrResponse(source_ref.to_string()));
                }
                let bytes = Self::read(&sidecar)?;
                let json = String::from_utf8(bytes)
                    .map_err(|_| SourceError::OcrPayload("response is not UTF-8".to_string()))?;
                Ok(OcrResponse::from_json(&json)?.text())
            }
            SourceKind::Unsupported => Err(SourceError::Unsupported(source_ref.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_extension() {
        let policy = SourcePolicy::default();
        assert_eq!(policy.classify("receipts/a.txt"), SourceKind::Text);
        assert_eq!(policy.classify("receipts/a.TEXT"), SourceKind::Text);
        assert_eq!(policy.classify("scan.PDF"), SourceKind::Pdf);
        assert_eq!(policy.classify("photo.jpeg"), SourceKind::Image);
        assert_eq!(policy.classify("photo.Png"), SourceKind::Image);
        assert_eq!(policy.classify("report.docx"), SourceKind::Unsupported);
        assert_eq!(policy.classify("txt"), SourceKind::Unsupported);
        assert_eq!(policy.classify("dir.txt/notes"), SourceKind::Unsupported);
    }

    #[test]
    fn test_custom_policy() {
        let config = SourcesConfig {
            text_extensions: vec![".md".to_string()],
            ..SourcesConfig::default()
        };
        let policy = SourcePolicy::from_config(&config);
        assert_eq!(policy.classify("notes.md"), SourceKind::Text);
        assert_eq!(policy.classify("notes.txt"), SourceKind::Unsupported);
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type("a.JPG"), "image/jpeg");
        assert_eq!(content_type("a.jpeg"), "image/jpeg");
        assert_eq!(content_type("a.png"), "image/png");
        assert_eq!(content_type("a.pdf"), "application/pdf");
        assert_eq!(content_type("a.txt"), "text/plain");
        assert_eq!(content_type("a.docx"), "application/octet-stream");
        assert_eq!(content_type("README"), "application/octet-stream");
    }

    #[test]
    fn test_fs_text_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("r.txt"), "Shell Gas Station\nTotal: $40.00").unwrap();

        let provider = FsTextProvider::new(dir.path());
        let text = provider.extract_text("r.txt", SourceKind::Text).unwrap();
        assert_eq!(text, "Shell Gas Station\nTotal: $40.00");
    }

    #[test]
    fn test_fs_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.txt"), [0xff, 0xfe, 0x00]).unwrap();

        let provider = FsTextProvider::new(dir.path());
        assert!(matches!(
            provider.extract_text("bad.txt", SourceKind::Text),
            Err(SourceError::Encoding(_))
        ));
    }

    #[test]
    fn test_fs_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FsTextProvider::new(dir.path());
        assert!(matches!(
            provider.extract_text("nope.txt", SourceKind::Text),
            Err(SourceError::Read { .. })
        ));
    }

    #[test]
    fn test_fs_image_uses_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cvs.jpg"), [0u8; 4]).unwrap();
        std::fs::write(
            dir.path().join("cvs.jpg.ocr.json"),
            r#"{"Blocks":[{"BlockType":"LINE","Text":"CVS Pharmacy"},{"BlockType":"LINE","Text":"Total 12.00"}]}"#,
        )
        .unwrap();

        let provider = FsTextProvider::new(dir.path());
        let text = provider.extract_text("cvs.jpg", SourceKind::Image).unwrap();
        assert_eq!(text, "CVS Pharmacy Total 12.00");
    }

    #[test]
    fn test_fs_image_without_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FsTextProvider::new(dir.path());
        assert!(matches!(
            provider.extract_text("cvs.png", SourceKind::Image),
            Err(SourceError::MissingOcrResponse(_))
        ));
    }

    #[test]
    fn test_memory_provider() {
        let mut docs = HashMap::new();
        docs.insert("a.txt".to_string(), "Uber 12.50".to_string());

        assert_eq!(docs.extract_text("a.txt", SourceKind::Text).unwrap(), "Uber 12.50");
        assert_eq!(docs.extract_text("missing.txt", SourceKind::Text).unwrap(), "");
        assert!(docs.extract_text("a.docx", SourceKind::Unsupported).is_err());
    }
}
