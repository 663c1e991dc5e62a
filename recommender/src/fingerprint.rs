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

use derive_more::{AsRef, Display, Into};
use serde::Serialize;
use serde_json::json;

use crate::profile::StudentRecord;

const NO_GRADE: &str = "NoGrade";

/// A cache key summarizing everything of a student record which affects the base recommendations.
///
/// The allowed subjects are not part of it.
#[derive(AsRef, Into, Clone, Debug, Display, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Derives the fingerprint of a student record.
///
/// The format is the compact json array `[learning gap, career goal, degree program, courses]`
/// where the courses are `{"Course": code, "Grade": grade}` in the given order. A blank career
/// goal is written as `""` and a missing or empty grade as `NoGrade`. Json string escaping keeps
/// the free text fields apart. Changing the format invalidates all cached entries.
pub fn generate_fingerprint(record: &StudentRecord) -> Fingerprint {
    let courses = record
        .courses_taken
        .iter()
        .map(|course| {
            let grade = course
                .grade
                .as_deref()
                .filter(|grade| !grade.is_empty())
                .unwrap_or(NO_GRADE);
            json!({ "Course": course.code, "Grade": grade })
        })
        .collect::<Vec<_>>();

    Fingerprint(
        json!([
            record.calculate_by_learning_gap,
            record.career_goal().unwrap_or_default(),
            record.degree_program,
            courses,
        ])
        .to_string(),
    )
}
