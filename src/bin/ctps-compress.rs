//! CLI binary for ctps-compress.
//!
//! A thin shim over the library crate that maps CLI flags to parameter
//! updates, validates them, loads the PDF and prints the request that would
//! be sent to the compression service.

use anyhow::{Context, Result};
use clap::Parser;
use ctps_compress::{
    read_input, CtpsParameters, InputFile, ParameterStore, ParameterUpdate, ServiceConfig,
    ToolOperationConfig,
};
use serde_json::json;
use std::io;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Default settings (level 7, colour)
  ctps-compress carteira.pdf

  # Maximum compression, grayscale
  ctps-compress --level 9 --grayscale carteira.pdf

  # Generic field update, as sent by a UI bridge
  ctps-compress --set optimizationLevel=8 --set grayscale=true carteira.pdf

  # Machine-readable output
  ctps-compress --json carteira.pdf > request.json

FIELD VALUES FOR --set:
  Values are read as JSON: optimizationLevel=8, grayscale=true.
  ocrLanguage takes bare text, so ocrLanguage=por and ocrLanguage=123
  both set a string.

COMPRESSION LEVELS:
  5-6   Good balance between quality and size reduction
  7-8   Aggressive compression - some quality loss
  9     Maximum compression - noticeable quality reduction

ENVIRONMENT VARIABLES:
  CTPS_ENDPOINT_URL       Base URL of the compression service
  RUST_LOG                Override log filter (e.g. ctps_compress=debug)
"#;

/// Prepare a 5 MB-target compression request for a CTPS document.
#[derive(Parser, Debug)]
#[command(
    name = "ctps-compress",
    version,
    about = "Prepare a 5 MB-target compression request for a CTPS document",
    long_about = "Validate compression settings for a CTPS (Carteira de Trabalho) PDF and \
print the multipart request that the compression service will receive. The target size is \
fixed at 5 MB, the limit accepted by eSocial and other government systems.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local CTPS PDF file.
    input: PathBuf,

    /// Compression level (5–9).
    #[arg(short, long, env = "CTPS_LEVEL", allow_negative_numbers = true)]
    level: Option<i32>,

    /// Convert to grayscale.
    #[arg(short, long, env = "CTPS_GRAYSCALE")]
    grayscale: bool,

    /// Request OCR (recorded in the parameters, not sent to the service).
    #[arg(long, env = "CTPS_OCR")]
    ocr: bool,

    /// OCR language code.
    #[arg(long, env = "CTPS_OCR_LANGUAGE")]
    ocr_language: Option<String>,

    /// Generic update FIELD=JSON, applied after the typed flags. Repeatable.
    #[arg(long = "set", value_name = "FIELD=JSON")]
    set: Vec<String>,

    /// Base URL of the compression service.
    #[arg(long, env = "CTPS_ENDPOINT_URL", default_value = ctps_compress::config::DEFAULT_BASE_URL)]
    endpoint_url: String,

    /// Request timeout the submission pipeline should use, in seconds.
    #[arg(long, env = "CTPS_TIMEOUT", default_value_t = 120)]
    timeout: u64,

    /// Output JSON instead of a human-readable summary.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CTPS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || cli.json {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Service config ───────────────────────────────────────────────────
    let service = ServiceConfig::builder()
        .base_url(&cli.endpoint_url)
        .timeout_secs(cli.timeout)
        .build()
        .context("Invalid service configuration")?;
    let tool = ToolOperationConfig::from_service(&service);

    // ── Parameters ───────────────────────────────────────────────────────
    let mut store = ParameterStore::new();
    for update in updates_from_cli(&cli)? {
        store.update_parameter(update);
    }
    let params = store.parameters().clone();

    if let Err(e) = params.check() {
        eprintln!("{} {}", red("✘"), e);
        std::process::exit(2);
    }

    // ── Input + payload ──────────────────────────────────────────────────
    let file = read_input(&cli.input)
        .await
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;
    let gate = tool.submit_gate(&params, true, true);
    debug!("Submit gate: {:?}", gate);

    let output_name = tool.output_file_name(&file.file_name);
    let endpoint = service.endpoint_url()?;
    let payload = tool.build(&params, &file);

    if cli.json {
        let out = json!({
            "endpoint": endpoint.as_str(),
            "timeoutSecs": service.timeout_secs,
            "outputFileName": output_name,
            "parameters": &params,
            "hint": params.hint(),
            "submitEnabled": gate.is_enabled(),
            "payload": &payload,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("Failed to serialise request")?
        );
        return Ok(());
    }

    if !cli.quiet {
        print_summary(&params, &payload, endpoint.as_str(), &output_name);
    }

    Ok(())
}

/// Map typed flags and `--set` pairs to parameter updates, in order.
fn updates_from_cli(cli: &Cli) -> Result<Vec<ParameterUpdate>> {
    let mut updates = Vec::new();

    if let Some(level) = cli.level {
        updates.push(ParameterUpdate::OptimizationLevel(level));
    }
    if cli.grayscale {
        updates.push(ParameterUpdate::Grayscale(true));
    }
    if cli.ocr {
        updates.push(ParameterUpdate::ApplyOcr(true));
    }
    if let Some(ref lang) = cli.ocr_language {
        updates.push(ParameterUpdate::OcrLanguage(lang.clone()));
    }
    for pair in &cli.set {
        updates.push(parse_set(pair)?);
    }

    Ok(updates)
}

/// Parse `FIELD=JSON`. Non-JSON text, and any value for `ocrLanguage`, is
/// taken as a string.
fn parse_set(pair: &str) -> Result<ParameterUpdate> {
    let (name, raw) = pair
        .split_once('=')
        .with_context(|| format!("Expected FIELD=VALUE, got '{}'", pair))?;
    let (name, raw) = (name.trim(), raw.trim());
    let parsed = serde_json::from_str::<serde_json::Value>(raw).ok();
    let value = match parsed {
        Some(v @ serde_json::Value::String(_)) => v,
        Some(_) if name == "ocrLanguage" => serde_json::Value::String(raw.to_string()),
        Some(v) => v,
        None => serde_json::Value::String(raw.to_string()),
    };
    ParameterUpdate::from_field(name, &value)
        .with_context(|| format!("Invalid --set '{}'", pair))
}

/// Note shown when the input is over the 5 MB target.
const SIZE_WARNING: &str = "If your file cannot be compressed to under 5MB, try enabling \
grayscale or using a higher compression level. Very large files with many high-resolution \
images may not achieve the 5MB target.";

fn size_warning(file: &InputFile) -> Option<&'static str> {
    if file.fits_target() {
        None
    } else {
        Some(SIZE_WARNING)
    }
}

fn print_summary(
    params: &CtpsParameters,
    payload: &ctps_compress::SubmissionPayload,
    endpoint: &str,
    output_name: &str,
) {
    let file = payload.file();
    eprintln!(
        "{} {}",
        green("✔"),
        bold(&format!("Request ready for {}", file.file_name))
    );
    println!("POST {endpoint}");
    println!(
        "  fileInput           {} {}",
        file.file_name,
        dim(&format!("({:.2} MB)", file.len() as f64 / 1_048_576.0))
    );
    for (name, value) in payload.text_fields() {
        println!("  {name:<19} {value}");
    }
    println!(
        "{}",
        dim(&format!(
            "Level {}: {}",
            params.optimization_level,
            params.hint().description()
        ))
    );
    if params.apply_ocr {
        println!(
            "{}",
            dim(&format!(
                "OCR ({}) is recorded but not sent to the service.",
                params.ocr_language
            ))
        );
    }
    println!("Result file: {output_name}");
    if let Some(note) = size_warning(file) {
        eprintln!("{} {}", bold("Note:"), note);
    }
}
