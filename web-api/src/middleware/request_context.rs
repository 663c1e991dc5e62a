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

use std::future::Future;

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue},
    HttpMessage,
};
use derive_more::Display;
use futures_util::{FutureExt, TryFutureExt};
use serde::Serialize;
use tracing::{error_span, trace, Instrument};
use uuid::Uuid;

pub(crate) const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Copy, Debug, Display, Serialize)]
#[serde(transparent)]
pub(crate) struct RequestId(Uuid);

impl RequestId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Sets up the request context.
///
/// This makes the `RequestId` available as extension, returns it as response header and sets up
/// tracing for all calls.
pub(crate) fn setup_request_context<S, B>(
    request: ServiceRequest,
    service: &S,
) -> impl Future<Output = Result<ServiceResponse<B>, actix_web::Error>> + 'static
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    let request_id = RequestId::generate();

    // the request span must have the highest level, otherwise it will not be added to the logs if a
    // subscriber with a stricter level filter than the span level is used
    let span = error_span!(
        "request",
        path = %request.path(),
        method = %request.method(),
        %request_id,
    );

    trace!(parent: &span, "request received");

    request.extensions_mut().insert(request_id);

    service
        .call(request)
        .map_ok(move |mut response| {
            if let Ok(value) = HeaderValue::try_from(request_id.to_string()) {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }
            response
        })
        .instrument(span.clone())
        .inspect(move |_| trace!(parent: &span, "request processed"))
}
