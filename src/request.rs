//! Request builder: parameters + file → submission payload.
//!
//! The compression service is a multipart endpoint. This module decides
//! *which* fields are sent and with what values; it never sends anything.
//! [`SubmissionPayload::into_multipart`] converts the payload into a
//! [`reqwest::multipart::Form`] for whatever pipeline performs the call.
//!
//! ## Field mapping
//!
//! | Field                | Value                                 |
//! |----------------------|---------------------------------------|
//! | `fileInput`          | the document bytes                    |
//! | `expectedOutputSize` | `"5MB"`, always                       |
//! | `optimizeLevel`      | `optimization_level` as decimal text  |
//! | `grayscale`          | `"true"` / `"false"`                  |

use crate::error::CtpsError;
use crate::params::CtpsParameters;
use reqwest::multipart::{Form, Part};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Output ceiling accepted by Brazilian government portals (eSocial etc.).
pub const CTPS_TARGET_SIZE: &str = "5MB";
/// [`CTPS_TARGET_SIZE`] in bytes.
pub const CTPS_TARGET_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Multipart part carrying the document.
pub const FIELD_FILE_INPUT: &str = "fileInput";
/// Target size field; always [`CTPS_TARGET_SIZE`].
pub const FIELD_EXPECTED_OUTPUT_SIZE: &str = "expectedOutputSize";
/// Compression level field.
pub const FIELD_OPTIMIZE_LEVEL: &str = "optimizeLevel";
/// Grayscale flag field.
pub const FIELD_GRAYSCALE: &str = "grayscale";

/// A selected input document.
#[derive(Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Name sent with the multipart part, without directories.
    pub file_name: String,
    /// MIME type of the part.
    pub content_type: String,
    /// Raw document contents.
    pub bytes: Vec<u8>,
}

impl InputFile {
    /// A document with an explicit MIME type.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// An `application/pdf` document.
    pub fn pdf(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(file_name, "application/pdf", bytes)
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-byte document.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the document is already under the 5 MB target.
    pub fn fits_target(&self) -> bool {
        (self.bytes.len() as u64) <= CTPS_TARGET_SIZE_BYTES
    }
}

impl fmt::Debug for InputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

/// The field set sent to the compression service for one submission.
///
/// Serialising it (for logs or `--json` output) describes the file by name
/// and size rather than dumping its bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    #[serde(rename = "fileInput", serialize_with = "serialize_file_summary")]
    file: InputFile,
    #[serde(flatten)]
    fields: BTreeMap<&'static str, String>,
}

impl SubmissionPayload {
    /// The document sent as `fileInput`.
    pub fn file(&self) -> &InputFile {
        &self.file
    }

    /// Value of a text field. `fileInput` is not a text field; use [`file`](Self::file).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Whether the payload carries a field with this name, file included.
    pub fn contains(&self, name: &str) -> bool {
        name == FIELD_FILE_INPUT || self.fields.contains_key(name)
    }

    /// All field names, `fileInput` first.
    pub fn field_names(&self) -> Vec<&'static str> {
        std::iter::once(FIELD_FILE_INPUT)
            .chain(self.fields.keys().copied())
            .collect()
    }

    /// Text fields in name order.
    pub fn text_fields(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Convert into a multipart form for the submission pipeline.
    pub fn into_multipart(self) -> Result<Form, CtpsError> {
        let part = Part::bytes(self.file.bytes)
            .file_name(self.file.file_name)
            .mime_str(&self.file.content_type)
            .map_err(|e| CtpsError::Internal(format!("Invalid content type: {}", e)))?;

        let form = self
            .fields
            .into_iter()
            .fold(Form::new().part(FIELD_FILE_INPUT, part), |form, (name, value)| {
                form.text(name, value)
            });
        Ok(form)
    }
}

fn serialize_file_summary<S: Serializer>(file: &InputFile, s: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct FileSummary<'a> {
        file_name: &'a str,
        content_type: &'a str,
        size: usize,
    }

    FileSummary {
        file_name: &file.file_name,
        content_type: &file.content_type,
        size: file.bytes.len(),
    }
    .serialize(s)
}

/// Build the submission payload for a CTPS compression request.
///
/// Performs no validation: callers are expected to have checked
/// [`crate::params::validate_parameters`] first, and an out-of-range level
/// is passed through as-is.
///
/// `apply_ocr` and `ocr_language` are not sent. The service's OCR fields
/// have not been agreed for this tool, so adding them would change what the
/// service does.
pub fn build_form_data(params: &CtpsParameters, file: &InputFile) -> SubmissionPayload {
    let mut fields = BTreeMap::new();
    fields.insert(FIELD_EXPECTED_OUTPUT_SIZE, CTPS_TARGET_SIZE.to_string());
    fields.insert(FIELD_OPTIMIZE_LEVEL, params.optimization_level.to_string());
    fields.insert(FIELD_GRAYSCALE, params.grayscale.to_string());

    debug!(
        "Built payload for '{}' ({} bytes): level={}, grayscale={}",
        file.file_name,
        file.len(),
        params.optimization_level,
        params.grayscale
    );

    SubmissionPayload {
        file: file.clone(),
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterUpdate;
    use serde_json::json;

    fn sample() -> InputFile {
        InputFile::pdf("ctps.pdf", b"%PDF-1.7\n%%EOF".to_vec())
    }

    #[test]
    fn level_nine_grayscale_payload() {
        let params = CtpsParameters::default()
            .with(ParameterUpdate::OptimizationLevel(9))
            .with(ParameterUpdate::Grayscale(true));
        let payload = build_form_data(&params, &sample());

        assert_eq!(payload.get(FIELD_OPTIMIZE_LEVEL), Some("9"));
        assert_eq!(payload.get(FIELD_GRAYSCALE), Some("true"));
        assert_eq!(payload.get(FIELD_EXPECTED_OUTPUT_SIZE), Some("5MB"));
        assert_eq!(payload.file(), &sample());
        assert_eq!(
            payload.field_names(),
            vec!["fileInput", "expectedOutputSize", "grayscale", "optimizeLevel"]
        );
    }

    #[test]
    fn target_size_is_fixed() {
        for level in [-1, 5, 7, 9, 42] {
            let params = CtpsParameters::default().with(ParameterUpdate::OptimizationLevel(level));
            let payload = build_form_data(&params, &sample());
            assert_eq!(payload.get(FIELD_EXPECTED_OUTPUT_SIZE), Some(CTPS_TARGET_SIZE));
        }
    }

    #[test]
    fn out_of_range_level_passes_through() {
        let params = CtpsParameters::default().with(ParameterUpdate::OptimizationLevel(3));
        let payload = build_form_data(&params, &sample());
        assert_eq!(payload.get(FIELD_OPTIMIZE_LEVEL), Some("3"));
    }

    #[test]
    fn ocr_fields_are_not_sent() {
        let params = CtpsParameters::default()
            .with(ParameterUpdate::ApplyOcr(true))
            .with(ParameterUpdate::OcrLanguage("eng".into()));
        let payload = build_form_data(&params, &sample());
        assert!(!payload.contains("applyOcr"));
        assert!(!payload.contains("ocrLanguage"));
        assert_eq!(payload.field_names().len(), 4);
    }

    #[test]
    fn contains_reports_file_field() {
        let payload = build_form_data(&CtpsParameters::default(), &sample());
        assert!(payload.contains(FIELD_FILE_INPUT));
        assert!(payload.get(FIELD_FILE_INPUT).is_none());
    }

    #[test]
    fn serialises_file_as_summary() {
        let payload = build_form_data(&CtpsParameters::default(), &sample());
        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            v,
            json!({
                "fileInput": {
                    "fileName": "ctps.pdf",
                    "contentType": "application/pdf",
                    "size": 14
                },
                "expectedOutputSize": "5MB",
                "optimizeLevel": "7",
                "grayscale": "false"
            })
        );
    }

    #[test]
    fn into_multipart_accepts_pdf_mime() {
        let payload = build_form_data(&CtpsParameters::default(), &sample());
        let form = payload.into_multipart().expect("multipart form");
        assert!(!form.boundary().is_empty());
    }

    #[test]
    fn into_multipart_rejects_bad_mime() {
        let file = InputFile::new("x.pdf", "not a mime type", vec![1, 2, 3]);
        let payload = build_form_data(&CtpsParameters::default(), &file);
        assert!(matches!(payload.into_multipart(), Err(CtpsError::Internal(_))));
    }

    #[test]
    fn debug_hides_bytes() {
        let dbg = format!("{:?}", sample());
        assert!(dbg.contains("<14 bytes>"), "got: {dbg}");
    }

    #[test]
    fn fits_target_threshold() {
        let small = InputFile::pdf("a.pdf", vec![0; 1024]);
        assert!(small.fits_target());
        let big = InputFile::pdf("b.pdf", vec![0; CTPS_TARGET_SIZE_BYTES as usize + 1]);
        assert!(!big.fits_target());
    }
}
