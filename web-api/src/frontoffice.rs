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
    web::{self, Data, Json, ServiceConfig},
    HttpResponse,
    Responder,
};
use anyhow::bail;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use xayn_ai_recommender::ScoredCourse;

use crate::{
    app::{AppState, SetupError},
    auth::Authenticated,
    models::{RecommendationsResponse, UnvalidatedStudentRecord},
    Error,
};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
#[cfg_attr(test, serde(deny_unknown_fields))]
pub(crate) struct RecommendationsConfig {
    /// Only courses with a score above this are returned.
    pub(crate) score_threshold: f32,

    /// Max number of courses to return, all are returned if unset.
    pub(crate) max_number_courses: Option<usize>,
}

impl Default for RecommendationsConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.55,
            max_number_courses: None,
        }
    }
}

impl RecommendationsConfig {
    pub(crate) fn validate(&self) -> Result<(), SetupError> {
        if !(0. ..=1.).contains(&self.score_threshold) {
            bail!("invalid score_threshold, expected value from the unit interval");
        }
        if self.max_number_courses == Some(0) {
            bail!("invalid max_number_courses, expected a positive value");
        }

        Ok(())
    }

    fn select(&self, recommendations: Vec<ScoredCourse>) -> Vec<ScoredCourse> {
        recommendations
            .into_iter()
            .filter(|recommendation| recommendation.score > self.score_threshold)
            .take(self.max_number_courses.unwrap_or(usize::MAX))
            .collect_vec()
    }
}

pub(crate) fn configure_service(config: &mut ServiceConfig) {
    config
        .service(web::resource("/recommend").route(web::post().to(recommend)))
        .service(web::resource("/robots.txt").route(web::get().to(robots)));
}

#[instrument(skip_all)]
async fn recommend(
    state: Data<AppState>,
    _: Authenticated,
    Json(body): Json<UnvalidatedStudentRecord>,
) -> Result<impl Responder, Error> {
    let record = body.validate()?;
    let recommendations = state.engine.recommend(&record).await?;
    let recommendations = state.config.recommendations.select(recommendations);
    debug!(count = recommendations.len(), "recommended courses");

    Ok(Json(RecommendationsResponse { recommendations }))
}

async fn robots() -> impl Responder {
    HttpResponse::Ok()
        .content_type(mime::TEXT_PLAIN_UTF_8)
        .body("User-agent: *\nDisallow: /")
}
