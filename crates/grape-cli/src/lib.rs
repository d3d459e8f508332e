//! # grape-cli — Offline Schema Tooling
//!
//! Provides the `grape` command-line interface for working with schema
//! definition files outside a running service.
//!
//! ## Subcommands
//!
//! - `grape bind` — Bind a JSON document against a schema for a mode and
//!   print the bound output, or the first error.
//! - `grape describe` — Print the fields of a schema, nested schemas
//!   included.
//!
//! ```bash
//! grape bind --schema user.yaml --mode create --input body.json --pretty
//! echo '{"name": "John"}' | grape -v bind --schema user.yaml --mode create
//! grape describe --schema user.yaml
//! ```

pub mod bind;
pub mod describe;
pub mod schema_file;
