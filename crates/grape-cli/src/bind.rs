//! # Bind CLI — Bind a document against a schema.
//!
//! Reads a JSON object from `--input` (or stdin), binds it with the schema
//! from `--schema` under `--mode` and prints the bound output as JSON.
//!
//! Exit codes: `0` when the document binds, `1` when it is rejected. The
//! rejection message goes to stderr.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::schema_file::load_schema;

/// Arguments for `grape bind`.
#[derive(Args, Debug)]
pub struct BindArgs {
    /// Schema definition file (YAML for .yaml/.yml, JSON otherwise).
    #[arg(long)]
    pub schema: PathBuf,

    /// Mode to bind under, e.g. create or update.
    #[arg(long, default_value = "")]
    pub mode: String,

    /// JSON document to bind. Reads stdin when omitted.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Pretty-print the bound output.
    #[arg(long)]
    pub pretty: bool,
}

/// Execute `grape bind` against the process streams.
pub fn run_bind(args: &BindArgs) -> Result<u8> {
    let stdout = io::stdout();
    let stderr = io::stderr();
    match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open input {}", path.display()))?;
            run_bind_with(args, BufReader::new(file), &mut stdout.lock(), &mut stderr.lock())
        }
        None => run_bind_with(args, io::stdin().lock(), &mut stdout.lock(), &mut stderr.lock()),
    }
}

/// Execute `grape bind` with explicit streams.
pub fn run_bind_with<R, W, E>(args: &BindArgs, input: R, out: &mut W, err: &mut E) -> Result<u8>
where
    R: Read,
    W: Write,
    E: Write,
{
    let params = load_schema(&args.schema)?;

    match params.bind_and_validate_reader(input, &args.mode) {
        Ok(bound) => {
            let text = if args.pretty {
                serde_json::to_string_pretty(&bound)?
            } else {
                serde_json::to_string(&bound)?
            };
            writeln!(out, "{text}")?;
            tracing::info!(mode = %args.mode, keys = bound.len(), "document bound");
            Ok(0)
        }
        Err(e) => {
            writeln!(err, "error [{}]: {e}", e.code())?;
            Ok(1)
        }
    }
}
