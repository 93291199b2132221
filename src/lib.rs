//! # ctps-compress
//!
//! Prepare compression requests that shrink a CTPS document (Brazilian
//! work-record booklet) to the 5 MB ceiling enforced by government portals
//! such as eSocial.
//!
//! The crate does not compress anything itself. It owns the user-facing
//! parameters, decides whether they may be submitted, and turns them plus the
//! selected PDF into the multipart payload a remote compression service
//! expects. Sending that payload is left to the caller.
//!
//! ## Flow
//!
//! ```text
//! ParameterStore ──update_parameter──▶ CtpsParameters
//!       │                                   │
//!       └── validate() ──▶ SubmitGate       ▼
//!                              build_form_data(params, file)
//!                                           │
//!                                           ▼
//!                                  SubmissionPayload ──▶ multipart Form
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use ctps_compress::{
//!     build_form_data, InputFile, ParameterStore, ParameterUpdate, CTPS_TARGET_SIZE,
//! };
//!
//! let mut store = ParameterStore::new();
//! store.update_parameter(ParameterUpdate::OptimizationLevel(9));
//! store.update_parameter(ParameterUpdate::Grayscale(true));
//! assert!(store.validate());
//!
//! let file = InputFile::pdf("ctps.pdf", b"%PDF-1.7".to_vec());
//! let payload = build_form_data(store.parameters(), &file);
//! assert_eq!(payload.get("expectedOutputSize"), Some(CTPS_TARGET_SIZE));
//! assert_eq!(payload.get("optimizeLevel"), Some("9"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ctps-compress` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod input;
pub mod params;
pub mod request;
pub mod tool;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use error::CtpsError;
pub use input::{read_input, read_input_sync};
pub use params::{
    validate_parameters, CompressionHint, CtpsParameters, ParameterStore, ParameterUpdate,
};
pub use request::{build_form_data, InputFile, SubmissionPayload, CTPS_TARGET_SIZE};
pub use tool::{can_submit, ctps_operation_config, SubmitGate, ToolOperationConfig, ToolType};
