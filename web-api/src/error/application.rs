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

use actix_web::{body::BoxBody, http::StatusCode, HttpResponse, ResponseError};
use derive_more::{Deref, Display};
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use super::json_error::ErrorBody;

/// The error returned by all endpoints.
#[derive(Display, Debug, Deref, Error)]
#[display(fmt = "{}", error)]
pub struct Error {
    #[deref(forward)]
    error: Box<dyn ApplicationError>,
}

impl Error {
    pub fn new(error: impl ApplicationError) -> Self {
        Self {
            error: Box::new(error),
        }
    }
}

impl<T> From<T> for Error
where
    T: ApplicationError,
{
    fn from(error: T) -> Self {
        Self::new(error)
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        self.error.status_code()
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        // the response might not carry all information we want to have in the logs
        error!(error=%self.error);
        ErrorBody::new(self.error.kind(), &self.error.encode_details())
            .respond(self.error.status_code())
    }
}

pub trait ApplicationError: std::error::Error + Send + Sync + 'static {
    fn status_code(&self) -> StatusCode;
    fn kind(&self) -> &str;
    fn encode_details(&self) -> Value {
        Value::Null
    }
}

/// Implements `ApplicationError` for given type using given http status code.
#[macro_export]
macro_rules! impl_application_error {
    ($name:ident => $code:ident) => {
        impl $crate::error::application::ApplicationError for $name {
            fn status_code(&self) -> ::actix_web::http::StatusCode {
                ::actix_web::http::StatusCode::$code
            }

            fn kind(&self) -> &str {
                stringify!($name)
            }

            fn encode_details(&self) -> ::serde_json::Value {
                ::serde_json::to_value(self)
                    .unwrap_or_else(|err| {
                        ::tracing::error!(%err, "serializing error details failed");
                        ::serde_json::Value::Null
                    })
            }
        }
    };
}
