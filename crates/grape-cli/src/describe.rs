//! # Describe CLI — Print a schema's fields.
//!
//! One line per field, nested schemas indented by two spaces:
//!
//! ```text
//! name: string [required on: create] (validate: required,min=2)
//! address: json
//!   city: string [required on: create]
//! tags: slice of json
//!   label: string
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use grape_params::{Param, Params};

use crate::schema_file::load_schema;

/// Arguments for `grape describe`.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Schema definition file (YAML for .yaml/.yml, JSON otherwise).
    #[arg(long)]
    pub schema: PathBuf,
}

/// Execute `grape describe`.
pub fn run_describe(args: &DescribeArgs) -> Result<u8> {
    let params = load_schema(&args.schema)?;
    let mut out = io::stdout().lock();
    for line in describe(&params) {
        writeln!(out, "{line}")?;
    }
    Ok(0)
}

/// Renders the description lines of a schema.
pub fn describe(params: &Params) -> Vec<String> {
    let mut lines = Vec::new();
    describe_into(params, 0, &mut lines);
    lines
}

fn describe_into(params: &Params, depth: usize, lines: &mut Vec<String>) {
    for param in params.fields() {
        lines.push(format!("{}{}", "  ".repeat(depth), describe_param(param)));
        if let Some(nested) = param.nested() {
            describe_into(nested, depth + 1, lines);
        }
    }
}

fn describe_param(param: &Param) -> String {
    let mut line = format!("{}: ", param.name);
    match param.field_type {
        Some(ty) => line.push_str(ty.as_str()),
        None => line.push_str("any"),
    }
    if let Some(element) = param.element_type {
        line.push_str(" of ");
        line.push_str(element.as_str());
    }
    let modes: Vec<&str> = param.required_on.iter().map(|m| m.trim()).collect();
    if !modes.is_empty() {
        line.push_str(&format!(" [required on: {}]", modes.join(", ")));
    }
    if !param.validate.is_empty() {
        line.push_str(&format!(" (validate: {})", param.validate));
    }
    line
}
