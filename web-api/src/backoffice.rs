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
    web::{self, Data, ServiceConfig},
    HttpResponse,
    Responder,
};
use tracing::instrument;
use xayn_ai_recommender::VectorSpace;

use crate::{
    app::AppState,
    auth::Authenticated,
    error::common::{CatalogReloadFailed, InternalError},
    Error,
};

pub(crate) fn configure_service(config: &mut ServiceConfig) {
    config.service(web::resource("/catalog/reload").route(web::post().to(reload_catalog)));
}

/// Replaces the catalog by the artifacts currently found at the configured paths.
#[instrument(skip_all)]
async fn reload_catalog(state: Data<AppState>, _: Authenticated) -> Result<impl Responder, Error> {
    let paths = state.config.catalog.paths();
    let loaded = web::block(move || VectorSpace::load(&paths))
        .await
        .map_err(|_| InternalError::from_message("loading the catalog was canceled"))?;
    state
        .engine
        .reload(|| loaded)
        .await
        .map_err(CatalogReloadFailed::from)?;

    Ok(HttpResponse::NoContent())
}
