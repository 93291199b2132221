//! Parameter store for the CTPS compression tool.
//!
//! [`CtpsParameters`] is the user-editable state of one tool session. It is
//! mutated one field at a time through [`ParameterUpdate`] and read (never
//! mutated) when the submission payload is built.
//!
//! Updates are never validated. A slider can pass through level 3 on its way
//! somewhere else and that is fine; [`validate_parameters`] is what gates
//! submission.

use crate::error::CtpsError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Lowest accepted compression level.
pub const MIN_OPTIMIZATION_LEVEL: i32 = 5;
/// Highest accepted compression level.
pub const MAX_OPTIMIZATION_LEVEL: i32 = 9;
/// Default level: aggressive, since CTPS scans are image-heavy.
pub const DEFAULT_OPTIMIZATION_LEVEL: i32 = 7;
/// Tesseract code for Portuguese.
pub const DEFAULT_OCR_LANGUAGE: &str = "por";

/// Compression settings for one CTPS tool session.
///
/// Field names serialise in camelCase to match the names the UI uses for
/// [`ParameterUpdate::from_field`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtpsParameters {
    /// Compression aggressiveness. Valid range: 5–9. Default: 7.
    pub optimization_level: i32,

    /// Discard colour information. Default: false.
    pub grayscale: bool,

    /// Request OCR. Default: false.
    ///
    /// Not forwarded to the compression service; see
    /// [`crate::request::build_form_data`].
    pub apply_ocr: bool,

    /// OCR language code, only meaningful when `apply_ocr` is set. Default: "por".
    pub ocr_language: String,
}

impl Default for CtpsParameters {
    fn default() -> Self {
        Self {
            optimization_level: DEFAULT_OPTIMIZATION_LEVEL,
            grayscale: false,
            apply_ocr: false,
            ocr_language: DEFAULT_OCR_LANGUAGE.to_string(),
        }
    }
}

impl CtpsParameters {
    /// Replace exactly one field, leaving the others untouched.
    pub fn apply(&mut self, update: ParameterUpdate) {
        match update {
            ParameterUpdate::OptimizationLevel(level) => self.optimization_level = level,
            ParameterUpdate::Grayscale(v) => self.grayscale = v,
            ParameterUpdate::ApplyOcr(v) => self.apply_ocr = v,
            ParameterUpdate::OcrLanguage(lang) => self.ocr_language = lang,
        }
    }

    /// Consuming variant of [`apply`](Self::apply).
    pub fn with(mut self, update: ParameterUpdate) -> Self {
        self.apply(update);
        self
    }

    /// Same rule as [`validate_parameters`], but with a reason on failure.
    pub fn check(&self) -> Result<(), CtpsError> {
        if validate_parameters(self) {
            Ok(())
        } else {
            warn!(
                "Rejected compression level {} (accepted {}–{})",
                self.optimization_level, MIN_OPTIMIZATION_LEVEL, MAX_OPTIMIZATION_LEVEL
            );
            Err(CtpsError::InvalidConfiguration {
                level: self.optimization_level,
                min: MIN_OPTIMIZATION_LEVEL,
                max: MAX_OPTIMIZATION_LEVEL,
            })
        }
    }

    /// Hint describing the quality trade-off of the current level.
    pub fn hint(&self) -> CompressionHint {
        CompressionHint::for_level(self.optimization_level)
    }
}

/// Returns true iff the compression level lies in 5–9.
///
/// The OCR fields are not checked: nothing ties `apply_ocr` and
/// `ocr_language` together.
pub fn validate_parameters(params: &CtpsParameters) -> bool {
    (MIN_OPTIMIZATION_LEVEL..=MAX_OPTIMIZATION_LEVEL).contains(&params.optimization_level)
}

// ── Updates ──────────────────────────────────────────────────────────────

/// A single-field update. Each variant binds a field to its value type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum ParameterUpdate {
    /// `optimizationLevel`
    OptimizationLevel(i32),
    /// `grayscale`
    Grayscale(bool),
    /// `applyOcr`
    ApplyOcr(bool),
    /// `ocrLanguage`
    OcrLanguage(String),
}

impl ParameterUpdate {
    /// Field name as used by the UI contract.
    pub fn field_name(&self) -> &'static str {
        match self {
            ParameterUpdate::OptimizationLevel(_) => "optimizationLevel",
            ParameterUpdate::Grayscale(_) => "grayscale",
            ParameterUpdate::ApplyOcr(_) => "applyOcr",
            ParameterUpdate::OcrLanguage(_) => "ocrLanguage",
        }
    }

    /// Build an update from a field name and an untyped JSON value.
    ///
    /// Checks the value's type against the field but not its range.
    pub fn from_field(name: &str, value: &Value) -> Result<Self, CtpsError> {
        let mismatch = |expected: &'static str| CtpsError::FieldTypeMismatch {
            name: name.to_string(),
            expected,
            found: value.to_string(),
        };

        match name {
            "optimizationLevel" => value
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .map(ParameterUpdate::OptimizationLevel)
                .ok_or_else(|| mismatch("an integer")),
            "grayscale" => value
                .as_bool()
                .map(ParameterUpdate::Grayscale)
                .ok_or_else(|| mismatch("a boolean")),
            "applyOcr" => value
                .as_bool()
                .map(ParameterUpdate::ApplyOcr)
                .ok_or_else(|| mismatch("a boolean")),
            "ocrLanguage" => value
                .as_str()
                .map(|s| ParameterUpdate::OcrLanguage(s.to_string()))
                .ok_or_else(|| mismatch("a string")),
            _ => Err(CtpsError::UnknownField {
                name: name.to_string(),
            }),
        }
    }
}

// ── Store ────────────────────────────────────────────────────────────────

/// Owns the parameters of one tool session.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    parameters: CtpsParameters,
}

impl ParameterStore {
    /// A store holding the default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current parameters, read-only.
    pub fn parameters(&self) -> &CtpsParameters {
        &self.parameters
    }

    /// Replace one field. Range is not checked here.
    pub fn update_parameter(&mut self, update: ParameterUpdate) {
        debug!("Parameter update: {:?}", update);
        self.parameters.apply(update);
    }

    /// Restore the defaults.
    pub fn reset(&mut self) {
        self.parameters = CtpsParameters::default();
    }

    /// [`validate_parameters`] on the current parameters.
    pub fn validate(&self) -> bool {
        validate_parameters(&self.parameters)
    }
}

// ── Hints ────────────────────────────────────────────────────────────────

/// What a compression level costs in quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionHint {
    /// Levels up to 6.
    Moderate,
    /// Levels 7 and 8.
    Aggressive,
    /// Level 9 and above.
    Maximum,
}

impl CompressionHint {
    /// Hint for a level. Out-of-range levels map to the nearest band.
    pub fn for_level(level: i32) -> Self {
        match level {
            i32::MIN..=6 => CompressionHint::Moderate,
            7..=8 => CompressionHint::Aggressive,
            _ => CompressionHint::Maximum,
        }
    }

    /// User-facing description of the trade-off.
    pub fn description(&self) -> &'static str {
        match self {
            CompressionHint::Moderate => "Good balance between quality and size reduction",
            CompressionHint::Aggressive => "Aggressive compression - some quality loss",
            CompressionHint::Maximum => "Maximum compression - noticeable quality reduction",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let p = CtpsParameters::default();
        assert_eq!(p.optimization_level, 7);
        assert!(!p.grayscale);
        assert!(!p.apply_ocr);
        assert_eq!(p.ocr_language, "por");
    }

    #[test]
    fn validate_accepts_five_through_nine() {
        for level in 5..=9 {
            let p = CtpsParameters::default().with(ParameterUpdate::OptimizationLevel(level));
            assert!(validate_parameters(&p), "level {level} should be valid");
        }
    }

    #[test]
    fn validate_rejects_out_of_range() {
        for level in [i32::MIN, -1, 0, 4, 10, 100, i32::MAX] {
            let p = CtpsParameters::default().with(ParameterUpdate::OptimizationLevel(level));
            assert!(!validate_parameters(&p), "level {level} should be invalid");
        }
    }

    #[test]
    fn validate_ignores_ocr_fields() {
        let p = CtpsParameters::default()
            .with(ParameterUpdate::ApplyOcr(true))
            .with(ParameterUpdate::OcrLanguage(String::new()));
        assert!(validate_parameters(&p));
    }

    #[test]
    fn grayscale_update_touches_only_grayscale() {
        let before = CtpsParameters {
            optimization_level: 3,
            grayscale: false,
            apply_ocr: true,
            ocr_language: "eng".into(),
        };
        let after = before.clone().with(ParameterUpdate::Grayscale(true));
        assert_eq!(
            after,
            CtpsParameters {
                grayscale: true,
                ..before
            }
        );
    }

    #[test]
    fn check_reports_level() {
        let p = CtpsParameters::default().with(ParameterUpdate::OptimizationLevel(10));
        match p.check() {
            Err(CtpsError::InvalidConfiguration { level, min, max }) => {
                assert_eq!((level, min, max), (10, 5, 9));
            }
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
        assert!(CtpsParameters::default().check().is_ok());
    }

    #[test]
    fn from_field_typed_values() {
        assert_eq!(
            ParameterUpdate::from_field("optimizationLevel", &json!(9)).unwrap(),
            ParameterUpdate::OptimizationLevel(9)
        );
        assert_eq!(
            ParameterUpdate::from_field("grayscale", &json!(true)).unwrap(),
            ParameterUpdate::Grayscale(true)
        );
        assert_eq!(
            ParameterUpdate::from_field("ocrLanguage", &json!("eng")).unwrap(),
            ParameterUpdate::OcrLanguage("eng".into())
        );
        // Out-of-range levels are accepted at update time.
        assert_eq!(
            ParameterUpdate::from_field("optimizationLevel", &json!(3)).unwrap(),
            ParameterUpdate::OptimizationLevel(3)
        );
    }

    #[test]
    fn from_field_rejects_wrong_type() {
        let err = ParameterUpdate::from_field("grayscale", &json!("yes")).unwrap_err();
        assert!(matches!(err, CtpsError::FieldTypeMismatch { .. }));

        let err = ParameterUpdate::from_field("optimizationLevel", &json!(7.5)).unwrap_err();
        assert!(matches!(err, CtpsError::FieldTypeMismatch { .. }));
    }

    #[test]
    fn from_field_rejects_unknown_name() {
        let err = ParameterUpdate::from_field("expectedOutputSize", &json!("10MB")).unwrap_err();
        assert!(matches!(err, CtpsError::UnknownField { .. }));
    }

    #[test]
    fn field_name_round_trips_through_from_field() {
        let update = ParameterUpdate::ApplyOcr(true);
        let again = ParameterUpdate::from_field(update.field_name(), &json!(true)).unwrap();
        assert_eq!(update, again);
    }

    #[test]
    fn store_update_and_reset() {
        let mut store = ParameterStore::new();
        store.update_parameter(ParameterUpdate::OptimizationLevel(4));
        assert!(!store.validate());
        store.update_parameter(ParameterUpdate::OptimizationLevel(8));
        assert!(store.validate());
        assert_eq!(store.parameters().optimization_level, 8);

        store.reset();
        assert_eq!(store.parameters(), &CtpsParameters::default());
    }

    #[test]
    fn serialises_camel_case() {
        let v = serde_json::to_value(CtpsParameters::default()).unwrap();
        assert_eq!(
            v,
            json!({
                "optimizationLevel": 7,
                "grayscale": false,
                "applyOcr": false,
                "ocrLanguage": "por"
            })
        );
    }

    #[test]
    fn hints_by_level() {
        assert_eq!(CompressionHint::for_level(5), CompressionHint::Moderate);
        assert_eq!(CompressionHint::for_level(6), CompressionHint::Moderate);
        assert_eq!(CompressionHint::for_level(7), CompressionHint::Aggressive);
        assert_eq!(CompressionHint::for_level(8), CompressionHint::Aggressive);
        assert_eq!(CompressionHint::for_level(9), CompressionHint::Maximum);
        assert!(CompressionHint::Maximum.description().contains("noticeable"));
    }
}
