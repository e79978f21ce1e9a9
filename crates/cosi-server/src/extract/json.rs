//! JSON extractor whose rejections use the handler [`Error`] body.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Json as AxumJson, OptionalFromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

/// JSON extractor and response.
///
/// Behaves like [`axum::Json`], except that malformed bodies are answered
/// with a `bad_request` [`ErrorResponse`].
///
/// [`ErrorResponse`]: crate::handler::response::ErrorResponse
#[must_use]
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let extractor = <AxumJson<T> as FromRequest<S>>::from_request(req, state).await;
        extractor.map(|x| Self(x.0)).map_err(Into::into)
    }
}

impl<T, S> OptionalFromRequest<S> for Json<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    /// Yields `None` for a missing or malformed body and only propagates
    /// server-side failures.
    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        match <Self as FromRequest<S>>::from_request(req, state).await {
            Ok(json) => Ok(Some(json)),
            Err(error) if error.kind() == ErrorKind::InternalServerError => Err(error),
            Err(_) => Ok(None),
        }
    }
}

impl<T> IntoResponse for Json<T>
where
    T: Serialize,
{
    #[inline]
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

impl From<JsonRejection> for Error<'static> {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                let message = format!("Invalid request data format: {}", err.body_text());
                ErrorKind::BadRequest.with_message(message)
            }
            JsonRejection::JsonSyntaxError(err) => {
                let detail = err.body_text();
                let message = format!("Invalid JSON syntax in request body: {detail}");
                ErrorKind::BadRequest.with_message(message)
            }
            JsonRejection::MissingJsonContentType(_) => ErrorKind::BadRequest
                .with_message("Expected request with `Content-Type: application/json`"),
            JsonRejection::BytesRejection(err) => {
                let message = format!("Failed to read request body: {}", err.body_text());
                ErrorKind::BadRequest.with_message(message)
            }
            other => {
                let message = other.body_text();
                ErrorKind::InternalServerError.with_message(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum_test::TestServer;
    use serde::Deserialize;

    use super::*;
    use crate::handler::response::ErrorResponse;

    #[derive(Debug, Serialize, Deserialize)]
    struct Echo {
        value: u32,
    }

    async fn echo(Json(echo): Json<Echo>) -> Json<Echo> {
        Json(echo)
    }

    fn server() -> anyhow::Result<TestServer> {
        let app = Router::new().route("/", post(echo));
        TestServer::new(app)
    }

    #[tokio::test]
    async fn round_trips_valid_bodies() -> anyhow::Result<()> {
        let response = server()?.post("/").json(&Echo { value: 7 }).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Echo>().value, 7);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() -> anyhow::Result<()> {
        let response = server()?
            .post("/")
            .json(&serde_json::json!({ "value": "seven" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body = response.json::<ErrorResponse<'static>>();
        assert_eq!(body.name, "bad_request");
        assert!(body.message.starts_with("Invalid request data format"));
        Ok(())
    }

    #[tokio::test]
    async fn missing_content_type_is_bad_request() -> anyhow::Result<()> {
        let response = server()?.post("/").text("{\"value\":1}").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }
}
