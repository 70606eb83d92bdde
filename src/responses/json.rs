// responses/json.rs
use astra::{Body, ResponseBuilder};
use serde::Serialize;

use crate::errors::ServerError;
use crate::responses::ResultResp;

pub fn json_response<T: Serialize>(body: &T) -> ResultResp {
    json_with_status(200, body)
}

pub fn json_created<T: Serialize>(body: &T) -> ResultResp {
    json_with_status(201, body)
}

pub fn json_with_status<T: Serialize>(status: u16, body: &T) -> ResultResp {
    let bytes = serde_json::to_vec(body).map_err(|_| ServerError::InternalError)?;

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(bytes))
        .map_err(|_| ServerError::InternalError)
}
