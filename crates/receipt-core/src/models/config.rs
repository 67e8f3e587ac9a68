//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ReceiptError;
use crate::expense::rules::MAX_DESCRIPTION_LEN;

/// Main configuration for the receipt pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Source document configuration.
    pub sources: SourcesConfig,

    /// Record store configuration.
    pub store: StoreConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum description length in characters.
    pub description_max_len: usize,

    /// Number of leading source characters kept on each record.
    pub excerpt_len: usize,

    /// Two-digit years that land below this year are moved forward a century.
    pub two_digit_year_cutoff: i32,
}

impl ExtractionConfig {
    /// Check the extraction limits.
    pub fn validate(&self) -> crate::Result<()> {
        if self.description_max_len == 0 || self.description_max_len > MAX_DESCRIPTION_LEN {
            return Err(ReceiptError::Config(format!(
                "extraction.description_max_len must be between 1 and {}",
                MAX_DESCRIPTION_LEN
            )));
        }
        Ok(())
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            description_max_len: 50,
            excerpt_len: 500,
            two_digit_year_cutoff: 1950,
        }
    }
}

/// Which source documents are processed and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Extensions read directly as UTF-8 text.
    pub text_extensions: Vec<String>,

    /// Extensions whose embedded text is extracted as PDF.
    pub pdf_extensions: Vec<String>,

    /// Extensions that need an OCR response.
    pub image_extensions: Vec<String>,

    /// Suffix appended to an image path to locate its OCR response.
    pub ocr_sidecar_suffix: String,
}

/// Canonical form of a configured extension: no leading dot, lower case.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            text_extensions: vec!["txt".to_string(), "text".to_string()],
            pdf_extensions: vec!["pdf".to_string()],
            image_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            ocr_sidecar_suffix: ".ocr.json".to_string(),
        }
    }
}

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the JSON-lines expense ledger.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("expenses.jsonl"),
        }
    }
}

impl ReceiptConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values that would make extraction meaningless.
    pub fn validate(&self) -> crate::Result<()> {
        self.extraction.validate()?;

        let sources = &self.sources;
        let mut seen = std::collections::HashSet::new();
        for ext in sources
            .text_extensions
            .iter()
            .chain(&sources.pdf_extensions)
            .chain(&sources.image_extensions)
        {
            if !seen.insert(normalize_extension(ext)) {
                return Err(ReceiptError::Config(format!(
                    "extension '{}' is listed for more than one source kind",
                    ext
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: ReceiptConfig =
            serde_json::from_str(r#"{"extraction": {"excerpt_len": 200}}"#).unwrap();
        assert_eq!(config.extraction.excerpt_len, 200);
        assert_eq!(config.extraction.description_max_len, 50);
        assert_eq!(config.sources.ocr_sidecar_suffix, ".ocr.json");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ReceiptConfig::default();
        config.store.path = PathBuf::from("/tmp/ledger.jsonl");
        config.save(&path).unwrap();

        let loaded = ReceiptConfig::from_file(&path).unwrap();
        assert_eq!(loaded.store.path, PathBuf::from("/tmp/ledger.jsonl"));
    }

    #[test]
    fn test_rejects_extension_in_two_kinds() {
        let mut config = ReceiptConfig::default();
        config.sources.image_extensions.push("PDF".to_string());
        assert!(matches!(config.validate(), Err(ReceiptError::Config(_))));

        let mut dotted = ReceiptConfig::default();
        dotted.sources.image_extensions.push(".pdf".to_string());
        assert!(matches!(dotted.validate(), Err(ReceiptError::Config(_))));
    }

    #[test]
    fn test_description_max_len_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"extraction": {"description_max_len": 80}}"#).unwrap();
        assert!(matches!(
            ReceiptConfig::from_file(&path),
            Err(ReceiptError::Config(_))
        ));

        let mut config = ReceiptConfig::default();
        config.extraction.description_max_len = 0;
        assert!(config.validate().is_err());
        config.extraction.description_max_len = 50;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(".PDF"), "pdf");
        assert_eq!(normalize_extension("jpeg"), "jpeg");
    }
}
