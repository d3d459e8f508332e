//! # Bound Extractor

use std::marker::PhantomData;
use std::ops::Deref;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use grape_params::{Input, Params};

use crate::rejection::BindRejection;

/// A request schema paired with the mode it is bound under.
pub trait Endpoint {
    /// Mode passed to the bind engine, e.g. `"create"`.
    const MODE: &'static str;

    /// The schema. Built once and shared.
    fn params() -> &'static Params;
}

/// Request body bound and validated for endpoint `E`.
pub struct Bound<E> {
    input: Input,
    endpoint: PhantomData<fn() -> E>,
}

impl<E> Bound<E> {
    pub fn into_inner(self) -> Input {
        self.input
    }
}

impl<E> Deref for Bound<E> {
    type Target = Input;

    fn deref(&self) -> &Input {
        &self.input
    }
}

impl<E> std::fmt::Debug for Bound<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Bound").field(&self.input).finish()
    }
}

impl<S, E> FromRequest<S> for Bound<E>
where
    S: Send + Sync,
    E: Endpoint,
{
    type Rejection = BindRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await?;
        let input = E::params().bind_and_validate_reader(body.as_ref(), E::MODE)?;
        Ok(Self {
            input,
            endpoint: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use super::*;
    use axum::body::Body;
    use axum::extract::DefaultBodyLimit;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use grape_core::Value;
    use grape_params::FieldType;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct CreateUser;

    impl Endpoint for CreateUser {
        const MODE: &'static str = "create";

        fn params() -> &'static Params {
            static PARAMS: OnceLock<Params> = OnceLock::new();
            PARAMS.get_or_init(user_params)
        }
    }

    struct UpdateUser;

    impl Endpoint for UpdateUser {
        const MODE: &'static str = "update";

        fn params() -> &'static Params {
            static PARAMS: OnceLock<Params> = OnceLock::new();
            PARAMS.get_or_init(user_params)
        }
    }

    fn user_params() -> Params {
        let mut tag = Params::new();
        tag.requires("label").on(["create"]).string();

        let mut params = Params::new();
        params
            .requires("name")
            .on(["create"])
            .string()
            .validate("required,min=2");
        params.optional("age").integer().validate("gte=0");
        params.optional("tags").slice_of(FieldType::Json, tag);
        params
    }

    async fn create_user(input: Bound<CreateUser>) -> Json<Input> {
        Json(input.into_inner())
    }

    async fn update_user(input: Bound<UpdateUser>) -> Json<Value> {
        Json(Value::from(input.integer("age", -1)))
    }

    fn test_app() -> Router<()> {
        Router::new()
            .route("/users", post(create_user))
            .route("/users/1", post(update_user))
            .route(
                "/limited",
                post(create_user).layer(DefaultBodyLimit::max(8)),
            )
    }

    fn json_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn binds_valid_body() {
        let resp = test_app()
            .oneshot(json_request("/users", r#"{"name": "John", "age": 30.0, "x": 1}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body, serde_json::json!({"name": "John", "age": 30, "x": 1.0}));
    }

    #[tokio::test]
    async fn missing_required_field_is_422() {
        let resp = test_app()
            .oneshot(json_request("/users", r#"{"age": 30}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "MISSING_REQUIRED_FIELD");
        assert_eq!(body["error"]["field"], "name");
    }

    #[tokio::test]
    async fn mode_comes_from_endpoint() {
        let resp = test_app()
            .oneshot(json_request("/users/1", r#"{"age": 41.7}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!(41));
    }

    #[tokio::test]
    async fn rule_failure_is_422() {
        let resp = test_app()
            .oneshot(json_request("/users", r#"{"name": "J"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn nested_element_failure_is_422() {
        let resp = test_app()
            .oneshot(json_request("/users", r#"{"name": "Jo", "tags": [{"x": 1}]}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["field"], "tags");
        assert_eq!(
            body["error"]["message"],
            "element in 'tags' validation failed: missing required field 'label' for create"
        );
    }

    #[tokio::test]
    async fn malformed_body_is_422() {
        let resp = test_app()
            .oneshot(json_request("/users", "{not json"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "DECODE_FAILED");
    }

    #[tokio::test]
    async fn oversized_body_keeps_axum_status() {
        let resp = test_app()
            .oneshot(json_request("/limited", r#"{"name": "a long name"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
