//! # grape-params — Request Parameter Binding
//!
//! Declarative validation and binding of untyped request input against an
//! ordered field schema.
//!
//! ## Flow
//!
//! ```text
//!   Params (built once)          Map / Read (per request)
//!          │                            │
//!          └──── bind_and_validate ─────┘
//!                      │
//!          Result<Input, BindError>
//!                      │
//!          Input::to_model(&mut T, &ModelBinding<T>)
//! ```
//!
//! A schema is a list of [`Param`] descriptors. Each descriptor names a
//! field, optionally declares its [`FieldType`], a validation tag and the
//! modes ("create", "update", ...) on which the field is mandatory. Binding
//! walks the descriptors in order, coerces each present value, applies its
//! tag through the [`RuleEngine`] and stops at the first failure. Keys the
//! schema does not mention are copied into the output unchanged.
//!
//! ## Example
//!
//! ```
//! use grape_core::{Map, Value};
//! use grape_params::Params;
//!
//! let mut params = Params::new();
//! params.requires("name").on(["create"]).string();
//! params.optional("age").integer();
//!
//! let mut raw = Map::new();
//! raw.insert("name".into(), Value::from("John"));
//! raw.insert("age".into(), Value::Float(30.0));
//!
//! let input = params.bind_and_validate(&raw, "create").unwrap();
//! assert_eq!(input.integer("age", 0), 30);
//! ```

pub mod bind;
pub mod error;
pub mod field;
pub mod input;
pub mod model;
pub mod rules;
pub mod schema;

pub use error::{BindError, RuleError};
pub use field::FieldType;
pub use input::Input;
pub use model::{to_snake_case, FromValue, ModelBinding};
pub use rules::RuleEngine;
pub use schema::{FieldBuilder, Param, Params};
