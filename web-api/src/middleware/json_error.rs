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

use std::{fmt::Debug, future::Future};

use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse},
    http::{header::CONTENT_TYPE, StatusCode},
    HttpResponse,
    ResponseError,
};
use derive_more::Display;
use futures_util::TryFutureExt;
use serde_json::{json, Value};

use crate::error::json_error::ErrorBody;

/// Rewrites plain text error responses, e.g. of failed extractors, into json error responses.
pub(crate) fn wrap_non_json_errors<S, B>(
    request: ServiceRequest,
    service: &S,
) -> impl Future<Output = Result<ServiceResponse<BoxBody>, actix_web::Error>> + 'static
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: MessageBody + Debug + 'static,
{
    service
        .call(request)
        .map_ok(wrap_service_response)
        // endpoints turn any `Err(..)` into an `Ok(err_resp)`,
        // so we will only see middleware errors here
        .map_err(WrappedMiddlewareError::wrap)
}

fn wrap_service_response<B: MessageBody + Debug + 'static>(
    response: ServiceResponse<B>,
) -> ServiceResponse<BoxBody> {
    if is_wrappable_error(response.response()) {
        let (request, response) = response.into_parts();
        let (response, body) = response.into_parts();
        let details = extract_message_as_details(body);
        let status = response.status();
        let response = ErrorBody::new(status.as_str(), &details).replace_body(response);
        ServiceResponse::new(request, response)
    } else {
        response.map_into_boxed_body()
    }
}

fn is_wrappable_error<B>(response: &HttpResponse<B>) -> bool {
    let status = response.status();
    (status.is_client_error() || status.is_server_error())
        && response
            .headers()
            .get(CONTENT_TYPE)
            .map_or(true, |content_type| {
                let mime = mime::TEXT_PLAIN.as_ref().as_bytes();
                let bytes = content_type.as_ref();
                bytes == mime || (bytes.starts_with(mime) && bytes.get(mime.len()) == Some(&b';'))
            })
}

fn extract_message_as_details(body: impl MessageBody + Debug) -> Value {
    let opt_bytes = body.try_into_bytes().ok();
    opt_bytes
        .as_deref()
        .and_then(|bytes| std::str::from_utf8(bytes).ok())
        .filter(|msg| !msg.is_empty())
        .map_or(Value::Null, |msg| json!({ "message": msg }))
}

#[derive(Debug, Display)]
#[display(fmt = "{error}")]
struct WrappedMiddlewareError {
    error: actix_web::Error,
}

impl WrappedMiddlewareError {
    fn wrap(error: actix_web::Error) -> actix_web::Error {
        Self { error }.into()
    }
}

impl ResponseError for WrappedMiddlewareError {
    fn status_code(&self) -> StatusCode {
        self.error.as_response_error().status_code()
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let response = self.error.error_response();
        if is_wrappable_error(&response) {
            let (response, body) = response.into_parts();
            let details = extract_message_as_details(body);
            ErrorBody::new(self.status_code().as_str(), &details).replace_body(response)
        } else {
            response
        }
    }
}
