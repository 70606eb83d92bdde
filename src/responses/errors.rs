// responses/errors.rs
use astra::{Body, Response, ResponseBuilder};
use serde::Serialize;

use crate::errors::ServerError;

pub type ResultResp = Result<Response, ServerError>;

/// Wire shape for every failure: `{error, details?}`.
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

/// Convert a ServerError into its JSON response.
pub fn error_to_response(err: ServerError) -> Response {
    match err {
        ServerError::NotFound => json_error(404, "not found", None),
        ServerError::BadRequest(msg) => json_error(400, &msg, None),
        ServerError::Unauthorized(msg) => json_error(401, &msg, None),
        ServerError::DbError(msg) => json_error(500, "internal error", Some(&msg)),
        ServerError::XlsxError(msg) => json_error(500, "export failed", Some(&msg)),
        ServerError::InternalError => json_error(500, "internal error", None),
    }
}

pub fn json_error(status: u16, error: &str, details: Option<&str>) -> Response {
    let body = serde_json::to_vec(&ErrorBody { error, details })
        .unwrap_or_else(|_| b"{\"error\":\"internal error\"}".to_vec());

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .expect("static error response must build")
}
