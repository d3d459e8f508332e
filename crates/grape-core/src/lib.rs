//! # grape-core — Value Model
//!
//! This crate is the leaf of the grape workspace. It defines the single
//! value type that flows through request binding (`grape-params`) and
//! entity presentation (`grape-entity`).
//!
//! ## Key Design Principles
//!
//! 1. **Closed sum instead of untyped maps.** [`Value`] enumerates every
//!    shape a JSON-decoded request can take: null, bool, integer, float,
//!    string, array and object. Consumers match exhaustively.
//!
//! 2. **Integers and floats are distinct.** JSON decoding always produces
//!    [`Value::Float`]; [`Value::Int`] only appears when a caller builds a
//!    map by hand or when binding coerces a field to an integer.
//!
//! 3. **Deterministic maps.** [`Map`] is a `BTreeMap`, so bound and
//!    presented outputs serialize with sorted keys.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `grape-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod value;

pub use value::{Map, Value};
