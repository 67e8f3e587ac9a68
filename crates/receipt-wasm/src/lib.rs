//! WASM bindings for receipt expense extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use receipt_core::models::config::ExtractionConfig;
use receipt_core::source::OcrResponse;
use receipt_core::{
    validate as validate_candidate, Category, ExpenseCandidate, ExpenseExtractor, ExpenseParser,
    ExpenseRecord,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[derive(Serialize)]
struct ExtractOutput {
    record: ExpenseRecord,
    accepted: bool,
    rejection: Option<String>,
    warnings: Vec<String>,
    processing_time_ms: u64,
}

fn extract_with(parser: &ExpenseParser, text: &str, source_ref: &str) -> Result<JsValue, JsValue> {
    let result = parser.extract(text, source_ref);
    let rejection = result.validate().err().map(|r| r.to_string());

    let output = ExtractOutput {
        accepted: rejection.is_none(),
        rejection,
        warnings: result.warnings,
        processing_time_ms: result.processing_time_ms,
        record: result.record,
    };

    serde_wasm_bindgen::to_value(&output).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract an expense from receipt text.
///
/// Returns `{ record, accepted, rejection, warnings, processing_time_ms }`.
/// A record that fails validation is still returned, with `accepted: false`.
#[wasm_bindgen]
pub fn extract_expense_from_text(text: &str, source_ref: &str) -> Result<JsValue, JsValue> {
    extract_with(&ExpenseParser::new(), text, source_ref)
}

/// Categorize receipt text by keyword.
#[wasm_bindgen]
pub fn categorize(text: &str) -> String {
    receipt_core::expense::rules::categorize(text).to_string()
}

/// Names of all categories, in tie-break order.
#[wasm_bindgen]
pub fn categories() -> js_sys::Array {
    Category::ALL
        .iter()
        .map(|c| JsValue::from_str(c.as_str()))
        .collect()
}

#[derive(Serialize)]
struct ValidationOutput {
    valid: bool,
    reason: Option<String>,
}

/// Validate an expense record given as JSON.
///
/// Returns `{ valid, reason }`. Malformed JSON is an error.
#[wasm_bindgen]
pub fn validate(record_json: &str) -> Result<JsValue, JsValue> {
    let candidate =
        ExpenseCandidate::from_json(record_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let reason = validate_candidate(&candidate).err().map(|r| r.to_string());

    serde_wasm_bindgen::to_value(&ValidationOutput {
        valid: reason.is_none(),
        reason,
    })
    .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Expense extractor class for browser use.
#[wasm_bindgen]
pub struct ReceiptExtractor {
    parser: ExpenseParser,
}

#[wasm_bindgen]
impl ReceiptExtractor {
    /// Create a new extractor, optionally from an extraction config object as JSON.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<ReceiptExtractor, JsValue> {
        let config = match config_json {
            Some(json) => serde_json::from_str::<ExtractionConfig>(&json)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => ExtractionConfig::default(),
        };
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            parser: ExpenseParser::from_config(&config),
        })
    }

    /// Extract an expense from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str, source_ref: &str) -> Result<JsValue, JsValue> {
        extract_with(&self.parser, text, source_ref)
    }

    /// Extract an expense from lines recognized by browser-side OCR.
    #[wasm_bindgen]
    pub fn extract_lines(&self, lines: Vec<String>, source_ref: &str) -> Result<JsValue, JsValue> {
        let text = OcrResponse::from_lines(lines).text();
        extract_with(&self.parser, &text, source_ref)
    }

    /// Extract an expense from a text-detection response (`{"Blocks": [...]}`).
    #[wasm_bindgen]
    pub fn extract_ocr_response(&self, response_json: &str, source_ref: &str) -> Result<JsValue, JsValue> {
        let response =
            OcrResponse::from_json(response_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        extract_with(&self.parser, &response.text(), source_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_categorize() {
        assert_eq!(categorize("Starbucks Coffee"), "food");
        assert_eq!(categorize("Uber ride"), "transport");
        assert_eq!(categorize("Random Store"), "other");
    }

    #[wasm_bindgen_test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }

    #[wasm_bindgen_test]
    fn test_extract_from_text() {
        let text = "Starbucks Coffee\nDate: 01/15/2024\nTotal: $4.85";
        assert!(extract_expense_from_text(text, "starbucks.txt").is_ok());

        let extractor = ReceiptExtractor::new(None).unwrap();
        let lines = vec!["Shell Gas Station".to_string(), "Total: $40.00".to_string()];
        assert!(extractor.extract_lines(lines, "shell.png").is_ok());
    }

    #[wasm_bindgen_test]
    fn test_extractor_rejects_bad_config() {
        assert!(ReceiptExtractor::new(Some(r#"{"description_max_len": 80}"#.to_string())).is_err());
        assert!(ReceiptExtractor::new(Some(r#"{"description_max_len": 0}"#.to_string())).is_err());
        assert!(ReceiptExtractor::new(Some(r#"{"description_max_len": 30}"#.to_string())).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_categories_listed_in_order() {
        let names: Vec<String> = categories().iter().filter_map(|v| v.as_string()).collect();
        assert_eq!(categories().length(), 6);
        assert_eq!(names[0], "food");
        assert_eq!(names.len(), 6);
    }
}
