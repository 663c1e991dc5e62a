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

use std::{env::current_dir, path::PathBuf};

use actix_web::web::{Data, ServiceConfig};
use tracing::{info, instrument, warn};
use xayn_ai_recommender::{Engine, VectorSpace};

use crate::{
    backoffice,
    config::Config,
    frontoffice,
    net::{self, AppHandle},
};

pub type SetupError = anyhow::Error;

/// State shared by all requests.
pub(crate) struct AppState {
    pub(crate) config: Config,
    pub(crate) engine: Engine,
}

impl AppState {
    /// Loads the catalog artifacts and builds the recommender over them.
    fn create(config: Config) -> Result<Self, SetupError> {
        let paths = config.catalog.paths();
        let space = VectorSpace::load(&paths)?;
        info!(
            vocabulary = space.vocabulary().len(),
            courses = space.len(),
            "loaded the catalog",
        );
        let engine = config.recommender.clone().build(space);

        Ok(Self { config, engine })
    }
}

fn configure_services(config: &mut ServiceConfig) {
    frontoffice::configure_service(config);
    backoffice::configure_service(config);
}

/// Starts the server with the given configuration.
///
/// Fails without starting the server if the configuration is invalid or the catalog can't be
/// loaded.
#[instrument(skip_all)]
pub async fn start(config: Config) -> Result<AppHandle, SetupError> {
    info!({ ?config }, "starting service");

    let pwd = current_dir().unwrap_or_else(|_| PathBuf::from("<no working directory set>"));
    info!(pwd=?pwd);

    config.validate()?;
    if config.auth.api_keys.is_empty() {
        warn!("no api keys are configured, authentication is disabled");
    }

    let net_config = config.net.clone();
    let app_state = tokio::task::spawn_blocking(|| AppState::create(config)).await??;

    net::start_actix_server(&net_config, Data::new(app_state), configure_services)
}

/// Generate application names/env prefixes for the given application.
///
/// This is a macro as it uses `env!("CARGO_BIN_NAME")` which needs to be called
/// in the binary build unit and won't work if used in a library.
#[macro_export]
macro_rules! application_names {
    () => {{
        let name = env!("CARGO_BIN_NAME").replace("-", "_").to_uppercase();
        let name = if name.starts_with("XAYN_") {
            name
        } else {
            format!("XAYN_{name}")
        };
        [name, "XAYN_WEB_API".to_string()]
    }};
}
