//! # grape-axum — Axum Integration
//!
//! Binds request bodies through a grape schema inside an axum handler
//! signature.
//!
//! An endpoint is a marker type implementing [`Endpoint`]: it names the
//! mode and returns the schema. [`Bound<E>`] is the extractor; it buffers
//! the body, decodes it as a JSON object and runs
//! [`Params::bind_and_validate`](grape_params::Params::bind_and_validate).
//!
//! ```
//! use std::sync::OnceLock;
//!
//! use axum::{routing::post, Json, Router};
//! use grape_axum::{Bound, Endpoint};
//! use grape_params::{Input, Params};
//!
//! struct CreateUser;
//!
//! impl Endpoint for CreateUser {
//!     const MODE: &'static str = "create";
//!
//!     fn params() -> &'static Params {
//!         static PARAMS: OnceLock<Params> = OnceLock::new();
//!         PARAMS.get_or_init(|| {
//!             let mut params = Params::new();
//!             params.requires("name").on(["create"]).string();
//!             params
//!         })
//!     }
//! }
//!
//! async fn create_user(input: Bound<CreateUser>) -> Json<Input> {
//!     Json(input.into_inner())
//! }
//!
//! let app: Router = Router::new().route("/users", post(create_user));
//! ```
//!
//! ## Rejections
//!
//! Failures to read the body keep axum's own status and message. Bind
//! failures, including bodies that are not a JSON object, are returned as
//! 422 with the body
//! `{"error": {"code": "...", "message": "...", "field": "..."}}`.

pub mod extract;
pub mod rejection;

pub use extract::{Bound, Endpoint};
pub use rejection::{BindRejection, ErrorBody, ErrorDetail};
