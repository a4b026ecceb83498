// crates/fa_cli/src/main.rs
//
// `fee-alloc`: runs one engine operation against a JSON data directory and
// prints the `{ success, data?, message? }` envelope on stdout. Logs go to
// stderr. The process exit code reflects the error class.

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const NOT_FOUND: i32 = 3;
    pub const IO: i32 = 4;
}

use std::env;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, error, info};

use args::{Args, Command};

use fa_core::variables::EngineConfig;
use fa_core::{BlockLetter, Period};
use fa_io::canonical_json::write_atomic;
use fa_io::{loader, FsStore, IoError, Store, StoreHandle};
use fa_pipeline::{
    check_data, compute, list_blocks, submit_registration, ApiResponse, CheckRequest, ComputeRequest, EngineCtx,
    PipelineError, RegistrationRequest, SystemClock,
};
use fa_report::{run_export, ExportRequest, ReportError, ReportKind};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Malformed request or data that violates a domain invariant.
    Validation(String),
    /// Missing data directory, snapshot, unit, bundle or block.
    NotFound(String),
    /// Store, filesystem or rendering failure.
    Io(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) | MainError::NotFound(m) | MainError::Io(m) => f.write_str(m),
        }
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(a) => a,
        Err(e) => {
            // --help / --version land here as well.
            let _ = e.print();
            let rc = if e.use_stderr() { exitcodes::VALIDATION } else { exitcodes::OK };
            return ExitCode::from(rc as u8);
        }
    };

    init_logging(args.quiet);

    let rc = match run(&args) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            error!(error = %e, "command failed");
            let _ = print_response(&ApiResponse::<()>::fail(e.to_string()));
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

/// `RUST_LOG` decides the filter (default `info`); `--quiet` forces `warn`.
fn init_logging(quiet: bool) {
    let filter = if quiet {
        "warn".to_string()
    } else {
        env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(args: &Args) -> Result<(), MainError> {
    let config = effective_config(args)?;
    let clock = SystemClock;

    let data_dir = args.data_dir.clone();
    let handle = StoreHandle::lazy(move || {
        let store: Arc<dyn Store> = Arc::new(FsStore::open(data_dir.clone())?);
        Ok(store)
    });
    let store = handle.get().map_err(map_io_err)?;
    let ctx = EngineCtx::new(store, &config, &clock);

    match &args.command {
        Command::Compute { block, period, unit } => {
            let req = ComputeRequest {
                block: block.clone(),
                period: period.clone().unwrap_or_else(|| Period::current().to_string()),
                unit_number: *unit,
            };
            let data = compute(ctx, &req).map_err(map_pipeline_err)?;
            print_response(&ApiResponse::ok(data, "fee calculation completed"))
        }
        Command::Blocks => {
            let listing = list_blocks(store).map_err(map_pipeline_err)?;
            print_response(&ApiResponse::ok(listing, "block structure loaded"))
        }
        Command::Export { kind, period, block, out } => {
            let kind: ReportKind = kind.parse().map_err(map_report_err)?;
            let req = ExportRequest { kind, period: period.clone(), block: block.clone() };
            let output = run_export(ctx, &req).map_err(map_report_err)?;
            match out {
                None => write_stdout(&output.content),
                Some(path) => {
                    write_report(path, &output.content)?;
                    let saved = SavedReport {
                        kind: output.kind,
                        period: output.period,
                        block: output.block,
                        title: output.title,
                        row_count: output.row_count,
                        path: path.display().to_string(),
                    };
                    print_response(&ApiResponse::ok(saved, "report exported"))
                }
            }
        }
        Command::Check { period, block } => {
            let req = CheckRequest { period: period.clone(), block: block.clone() };
            let res = check_data(store, &req).map_err(map_pipeline_err)?;
            print_response(&ApiResponse::ok(res, "data check completed"))
        }
        Command::Register { phone, apartment, building, source } => {
            let req = RegistrationRequest {
                phone: phone.clone(),
                apartment_number: apartment.clone(),
                building: building.clone(),
                source: source.clone(),
                client_address: None,
                user_agent: Some(format!("fee-alloc/{}", env!("CARGO_PKG_VERSION"))),
            };
            let ack = submit_registration(store, &clock, &req).map_err(map_pipeline_err)?;
            print_response(&ApiResponse::ok(ack, "registration saved"))
        }
    }
}

/// `config.json` from the data directory, then command-line overrides.
fn effective_config(args: &Args) -> Result<EngineConfig, MainError> {
    let mut cfg = loader::load_config(&args.data_dir).map_err(map_io_err)?;
    if let Some(rule) = args.utility_rule {
        cfg.utility_rule = rule;
    }
    if let Some(n) = args.exemplar_unit {
        cfg.exemplar.default_unit_number = n;
        cfg.exemplar.per_block.clear();
    }
    debug!(utility_rule = cfg.utility_rule.token(), exemplar = cfg.exemplar.default_unit_number, "configuration resolved");
    Ok(cfg)
}

/// Acknowledgement printed when a report was written to a file.
#[derive(Debug, Serialize)]
struct SavedReport {
    kind: ReportKind,
    period: Period,
    block: Option<BlockLetter>,
    title: String,
    row_count: usize,
    path: String,
}

fn write_report(path: &Path, content: &str) -> Result<(), MainError> {
    write_atomic(path, content.as_bytes()).map_err(|e| MainError::Io(format!("write {}: {e}", path.display())))?;
    info!(path = %path.display(), "report written");
    Ok(())
}

fn print_response<T: Serialize>(resp: &ApiResponse<T>) -> Result<(), MainError> {
    let mut text = serde_json::to_string_pretty(resp).map_err(|e| MainError::Io(format!("encode response: {e}")))?;
    text.push('\n');
    write_stdout(&text)
}

fn write_stdout(text: &str) -> Result<(), MainError> {
    let mut out = std::io::stdout().lock();
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| MainError::Io(format!("stdout: {e}")))
}

/* ------------------------------- error mapping ------------------------------- */

fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::NotFound(_) => NOT_FOUND,
        MainError::Io(_) => IO,
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::NotFound(m) => MainError::NotFound(format!("not found: {m}")),
        e @ (IoError::Json { .. } | IoError::Invalid(_)) => MainError::Validation(e.to_string()),
        e @ (IoError::Io(_) | IoError::Store(_)) => MainError::Io(e.to_string()),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Validation(_) => MainError::Validation(e.to_string()),
        PipelineError::NotFound(_) | PipelineError::EmptyBlock { .. } => MainError::NotFound(e.to_string()),
        PipelineError::Collaborator(_) => MainError::Io(e.to_string()),
    }
}

fn map_report_err(e: ReportError) -> MainError {
    match e {
        ReportError::Pipeline(p) => map_pipeline_err(p),
        ReportError::Validation(_) => MainError::Validation(e.to_string()),
        ReportError::NotFound(_) => MainError::NotFound(e.to_string()),
        ReportError::Csv(_) => MainError::Io(e.to_string()),
    }
}
