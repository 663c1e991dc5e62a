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

use actix_web::{dev::Payload, http::header::HeaderValue, web::Data, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    app::AppState,
    error::common::{InternalError, InvalidApiKey},
    utils::serialize_redacted_list,
    Error,
};

pub(crate) const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub(crate) struct Config {
    /// Accepted api keys, authentication is disabled if there are none.
    #[serde(serialize_with = "serialize_redacted_list")]
    pub(crate) api_keys: Vec<Secret<String>>,
}

impl Config {
    fn accepts(&self, key: Option<&[u8]>) -> bool {
        if self.api_keys.is_empty() {
            return true;
        }
        key.map_or(false, |key| {
            self.api_keys
                .iter()
                .any(|valid| constant_time_eq(valid.expose_secret().as_bytes(), key))
        })
    }
}

fn constant_time_eq(lhs: &[u8], rhs: &[u8]) -> bool {
    lhs.len() == rhs.len() && lhs.iter().zip(rhs).fold(0, |acc, (l, r)| acc | (l ^ r)) == 0
}

/// Extractor which only succeeds for requests with a valid api key.
pub(crate) struct Authenticated;

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(request: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(request))
    }
}

fn authenticate(request: &HttpRequest) -> Result<Authenticated, Error> {
    let state = request
        .app_data::<Data<AppState>>()
        .ok_or_else(|| InternalError::from_message("application state is missing"))?;
    let key = request
        .headers()
        .get(API_KEY_HEADER)
        .map(HeaderValue::as_bytes);

    if state.config.auth.accepts(key) {
        Ok(Authenticated)
    } else {
        Err(InvalidApiKey.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(keys: &[&str]) -> Config {
        Config {
            api_keys: keys.iter().map(|key| Secret::new((*key).to_owned())).collect(),
        }
    }

    #[test]
    fn test_no_keys_disables_authentication() {
        assert!(config(&[]).accepts(None));
        assert!(config(&[]).accepts(Some("anything".as_bytes())));
    }

    #[test]
    fn test_keys_are_checked() {
        let config = config(&["first", "second"]);
        assert!(config.accepts(Some("first".as_bytes())));
        assert!(config.accepts(Some("second".as_bytes())));
        assert!(!config.accepts(Some("third".as_bytes())));
        assert!(!config.accepts(Some("firs".as_bytes())));
        assert!(!config.accepts(Some("".as_bytes())));
        assert!(!config.accepts(None));
    }

    #[test]
    fn test_keys_are_redacted() {
        let config = serde_json::to_value(config(&["first"])).unwrap();
        assert_eq!(config, serde_json::json!({ "api_keys": ["[REDACTED]"] }));
    }
}
