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

use std::borrow::Cow;

use actix_web::http::StatusCode;
use derive_more::From;
use displaydoc::Display;
use serde::Serialize;
use thiserror::Error;
use xayn_ai_recommender::{DimensionMismatch, LoadError};

use super::application::ApplicationError;
use crate::{impl_application_error, Error};

/// Custom error for 400 Bad Request status code.
#[derive(Debug, Error, Display, Serialize, From)]
pub(crate) struct BadRequest {
    pub(crate) message: Cow<'static, str>,
}

impl_application_error!(BadRequest => BAD_REQUEST);

impl From<&'static str> for BadRequest {
    fn from(message: &'static str) -> Self {
        Self {
            message: Cow::Borrowed(message),
        }
    }
}

impl From<String> for BadRequest {
    fn from(message: String) -> Self {
        Self {
            message: Cow::Owned(message),
        }
    }
}

/// The api key is missing or invalid.
#[derive(Debug, Error, Display, Serialize)]
pub(crate) struct InvalidApiKey;

impl_application_error!(InvalidApiKey => UNAUTHORIZED);

/// Reloading the catalog failed, the previous catalog stays in use: {message}
#[derive(Debug, Error, Display, Serialize)]
pub(crate) struct CatalogReloadFailed {
    pub(crate) message: String,
}

impl_application_error!(CatalogReloadFailed => INTERNAL_SERVER_ERROR);

impl From<LoadError> for CatalogReloadFailed {
    fn from(error: LoadError) -> Self {
        Self {
            message: error.to_string(),
        }
    }
}

/// Internal Error: {0}
#[derive(Debug, Display, Error)]
pub(crate) struct InternalError(anyhow::Error);

impl InternalError {
    pub(crate) fn from_message(msg: &'static str) -> Self {
        Self(anyhow::Error::msg(msg))
    }

    pub(crate) fn from_std(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(anyhow::Error::new(error))
    }
}

impl ApplicationError for InternalError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn kind(&self) -> &str {
        "InternalServerError"
    }

    fn encode_details(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

impl From<DimensionMismatch> for Error {
    fn from(error: DimensionMismatch) -> Self {
        InternalError::from_std(error).into()
    }
}
