//! The CTPS tool as handed to a generic tool-execution framework.
//!
//! The framework owns file selection, dispatch, loading state and undo. What
//! it needs from us fits in one [`ToolOperationConfig`]: default parameters,
//! a validator, a payload builder and the strings that go around them.

use crate::config::ServiceConfig;
use crate::error::CtpsError;
use crate::params::{validate_parameters, CtpsParameters};
use crate::request::{build_form_data, InputFile, SubmissionPayload};
use serde::Serialize;

/// Operation identifier used by the framework.
pub const CTPS_OPERATION_TYPE: &str = "ctps";
/// Shared with the general-purpose compress tool.
pub const CTPS_ENDPOINT: &str = "/api/v1/misc/compress-pdf";
/// Endpoint name the framework checks for availability.
pub const CTPS_ENDPOINT_NAME: &str = "compress-pdf";
/// Prefix for result file names.
pub const CTPS_FILE_PREFIX: &str = "ctps_";
/// Fallback failure text.
pub const CTPS_ERROR_MESSAGE: &str =
    "Failed to compress CTPS document. The file may be too large to compress to 5MB.";

/// How many files one invocation of a tool consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ToolType {
    /// One request per selected file.
    SingleFile,
    /// All selected files go into one request.
    MultiFile,
}

/// Validator signature.
pub type ValidateFn = fn(&CtpsParameters) -> bool;
/// Payload builder signature.
pub type BuildFormDataFn = fn(&CtpsParameters, &InputFile) -> SubmissionPayload;

/// Everything the framework needs to run the CTPS tool.
#[derive(Debug, Clone)]
pub struct ToolOperationConfig {
    pub tool_type: ToolType,
    pub operation_type: &'static str,
    pub endpoint: String,
    pub endpoint_name: &'static str,
    pub file_prefix: String,
    pub default_parameters: CtpsParameters,
    pub validate: ValidateFn,
    pub build_form_data: BuildFormDataFn,
    /// Fallback shown when a submission fails without a usable detail.
    pub error_message: String,
}

/// The stock CTPS bundle.
pub fn ctps_operation_config() -> ToolOperationConfig {
    ToolOperationConfig {
        tool_type: ToolType::SingleFile,
        operation_type: CTPS_OPERATION_TYPE,
        endpoint: CTPS_ENDPOINT.to_string(),
        endpoint_name: CTPS_ENDPOINT_NAME,
        file_prefix: CTPS_FILE_PREFIX.to_string(),
        default_parameters: CtpsParameters::default(),
        validate: validate_parameters,
        build_form_data,
        error_message: CTPS_ERROR_MESSAGE.to_string(),
    }
}

impl ToolOperationConfig {
    /// The stock bundle with endpoint and strings taken from `service`.
    pub fn from_service(service: &ServiceConfig) -> Self {
        Self {
            endpoint: service.endpoint.clone(),
            file_prefix: service.file_prefix.clone(),
            error_message: service.error_message.clone(),
            ..ctps_operation_config()
        }
    }

    /// Run the bundled validator.
    pub fn validate(&self, params: &CtpsParameters) -> bool {
        (self.validate)(params)
    }

    /// Run the bundled payload builder.
    pub fn build(&self, params: &CtpsParameters, file: &InputFile) -> SubmissionPayload {
        (self.build_form_data)(params, file)
    }

    /// Name of the result file for `input_name`.
    pub fn output_file_name(&self, input_name: &str) -> String {
        format!("{}{}", self.file_prefix, input_name)
    }

    /// Text to show for a failed submission: the service's own detail if it
    /// sent one, the fixed fallback otherwise.
    pub fn failure_message(&self, detail: Option<&str>) -> String {
        match detail.map(str::trim) {
            Some(d) if !d.is_empty() => d.to_string(),
            _ => self.error_message.clone(),
        }
    }

    /// [`failure_message`](Self::failure_message) wrapped as an error.
    pub fn failure(&self, detail: Option<&str>) -> CtpsError {
        CtpsError::SubmissionFailed {
            message: self.failure_message(detail),
        }
    }

    /// Derive the submit-button state.
    pub fn submit_gate(
        &self,
        params: &CtpsParameters,
        has_files: bool,
        endpoint_enabled: bool,
    ) -> SubmitGate {
        SubmitGate {
            parameters_valid: self.validate(params),
            has_files,
            endpoint_enabled,
        }
    }
}

/// Inputs of the enabled/disabled state of the submit action. Nothing is
/// stored between calls; the gate is recomputed from current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmitGate {
    /// The bundled validator accepts the parameters.
    pub parameters_valid: bool,
    /// At least one file is selected.
    pub has_files: bool,
    /// The backend reports the endpoint as available.
    pub endpoint_enabled: bool,
}

impl SubmitGate {
    /// All three conditions hold.
    pub fn is_enabled(&self) -> bool {
        self.parameters_valid && self.has_files && self.endpoint_enabled
    }
}

/// Whether submission is allowed, using the stock validator.
pub fn can_submit(params: &CtpsParameters, has_files: bool, endpoint_enabled: bool) -> bool {
    SubmitGate {
        parameters_valid: validate_parameters(params),
        has_files,
        endpoint_enabled,
    }
    .is_enabled()
}
