// Copyright 2023 Xayn AG
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use actix_web::{
    http::{
        header::{HeaderValue, CONTENT_TYPE},
        StatusCode,
    },
    web::Bytes,
    HttpResponse,
};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

/// Body of an error response if its actual body can't be encoded.
const INTERNAL_SERVER_ERROR: &[u8] = br#"{"kind":"InternalServerError","details":null}"#;

/// The json body shared by all error responses of the service.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody<'a> {
    /// Either the name of an application error or the bare status code of a rewritten response.
    pub(crate) kind: &'a str,
    pub(crate) details: &'a Value,
}

impl<'a> ErrorBody<'a> {
    pub(crate) fn new(kind: &'a str, details: &'a Value) -> Self {
        Self { kind, details }
    }

    fn encode(&self) -> Bytes {
        serde_json::to_vec(self).map(Bytes::from).unwrap_or_else(|error| {
            error!(%error, kind = self.kind, "failed to encode error body");
            Bytes::from_static(INTERNAL_SERVER_ERROR)
        })
    }

    /// Creates a new response with this body.
    pub(crate) fn respond(&self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status)
            .content_type(mime::APPLICATION_JSON)
            .body(self.encode())
    }

    /// Replaces the body of an existing response, its status and other headers are kept.
    pub(crate) fn replace_body<B>(&self, mut response: HttpResponse<B>) -> HttpResponse {
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response.set_body(self.encode()).map_into_boxed_body()
    }
}
