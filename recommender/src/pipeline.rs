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

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    career::adjust_for_career_goal,
    catalog::{Course, VectorSpace},
    config::Config,
    filter::is_course_similar,
    profile::{build_weighted_description, StudentRecord},
    similarity::DimensionMismatch,
};

/// A catalog course together with its recommendation score.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ScoredCourse {
    #[serde(flatten)]
    pub course: Arc<Course>,
    /// The score from the unit interval.
    pub score: f32,
}

/// Computes the base recommendations of a student.
///
/// The catalog courses are scored by the similarity to the weighted description of the student,
/// blended with the similarity to the career goal. Courses without a positive score and courses
/// resembling an already taken course are dropped. The result is sorted decreasingly by score,
/// ties keep their catalog order. Neither subjects nor score thresholds are filtered.
#[instrument(skip_all, fields(courses = space.len(), taken = record.courses_taken.len()))]
pub fn recommend_base(
    space: &VectorSpace,
    record: &StudentRecord,
    config: &Config,
) -> Result<Vec<ScoredCourse>, DimensionMismatch> {
    let description = build_weighted_description(record, config.repetition_multiplier());
    let base_scores = space.score(&space.vectorize(&description))?;
    let career_scores = if let Some(career_goal) = record.career_goal() {
        space.score(&space.vectorize(career_goal))?
    } else {
        vec![0.; base_scores.len()]
    };
    let scores = adjust_for_career_goal(&base_scores, &career_scores);

    let mut recommendations = space
        .courses()
        .iter()
        .zip(scores)
        .filter(|(course, score)| {
            *score > 0.
                && !is_course_similar(
                    &course.title,
                    &record.courses_taken,
                    config.redundancy_threshold(),
                )
        })
        .map(|(course, score)| ScoredCourse {
            course: Arc::clone(course),
            score,
        })
        .collect::<Vec<_>>();
    recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));

    Ok(recommendations)
}
